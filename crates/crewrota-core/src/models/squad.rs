//! Squads, squad types, and rotation schemes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named crew within a squad type.
///
/// `ordinal` is the squad's fixed position in the rotation, unique and
/// contiguous from 0 within its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Squad {
    pub name: String,
    pub ordinal: usize,
}

/// A family of mutually-exclusive rotating squads sharing one cadence,
/// e.g. "weekend" or "friday-night".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadType {
    pub name: String,
    pub description: String,
    /// Declared squad count. The resolver refuses to compute an index when
    /// fewer squads than this are actually registered.
    pub squad_count: usize,
}

/// Rotation cadence unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Day,
    Week,
    Fortnight,
}

/// The rotation rule for one squad type.
///
/// Periods are counted as consecutive blocks from `epoch_date`, not from
/// any calendar-native week start, so a weekly rotation can change
/// mid-calendar-week relative to external week numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationScheme {
    pub period_unit: PeriodUnit,
    /// Units per rotation step. Every scheme seen so far uses 1; kept as a
    /// parameter so a longer cadence needs no resolver change.
    pub period_length: u32,
    /// The squad at ordinal 0 is on duty for the period containing this date.
    pub epoch_date: NaiveDate,
}

impl RotationScheme {
    pub fn new(period_unit: PeriodUnit, epoch_date: NaiveDate) -> Self {
        Self {
            period_unit,
            period_length: 1,
            epoch_date,
        }
    }

    /// Signed count of whole rotation periods elapsed between the epoch and
    /// `date`. Negative for dates before the epoch.
    ///
    /// Uses Euclidean (floor) division throughout so the caller's
    /// `rem_euclid` over the squad count stays in range on pre-epoch dates.
    pub fn period_index(&self, date: NaiveDate) -> i64 {
        let elapsed_days = date.signed_duration_since(self.epoch_date).num_days();
        let units = match self.period_unit {
            PeriodUnit::Day => elapsed_days,
            PeriodUnit::Week => elapsed_days.div_euclid(7),
            PeriodUnit::Fortnight => elapsed_days.div_euclid(7).div_euclid(2),
        };
        units.div_euclid(i64::from(self.period_length.max(1)))
    }
}
