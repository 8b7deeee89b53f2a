//! Duty-day composer: assembles the applicable duty assignments for a date.
//!
//! Which schemes apply depends on the weekday, the holiday calendar, and
//! the configured `DutyPolicy`. The output order is fixed (evening, night,
//! weekend/holiday) and inapplicable slots are omitted rather than padded
//! with placeholders.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::debug;

use crate::calendar::HolidayCalendar;
use crate::config::DutyPolicy;
use crate::error::RosterError;
use crate::models::Squad;
use crate::rotation::RotationResolver;

/// The duty slots a day can carry, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DutySlot {
    Evening,
    Night,
    Weekend,
}

impl fmt::Display for DutySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DutySlot::Evening => write!(f, "evening shift"),
            DutySlot::Night => write!(f, "night shift"),
            DutySlot::Weekend => write!(f, "weekend/holiday shift"),
        }
    }
}

/// One resolved duty assignment.
#[derive(Debug, Clone)]
pub struct DutyEntry {
    pub slot: DutySlot,
    pub label: String,
    pub squad_type: String,
    pub squad: Squad,
}

/// A duty resolution failure, tagged with the slot that failed so callers
/// can tell "no duty today" (an empty report) from "computation failed".
#[derive(Debug, Error)]
#[error("{slot} could not be resolved: {source}")]
pub struct ComposeError {
    pub slot: DutySlot,
    #[source]
    pub source: RosterError,
}

pub struct DutyComposer<'a> {
    resolver: RotationResolver<'a>,
    calendar: &'a HolidayCalendar,
    policy: &'a DutyPolicy,
}

impl<'a> DutyComposer<'a> {
    pub fn new(
        resolver: RotationResolver<'a>,
        calendar: &'a HolidayCalendar,
        policy: &'a DutyPolicy,
    ) -> Self {
        Self {
            resolver,
            calendar,
            policy,
        }
    }

    /// The duty assignments applicable on `date` at `clock_time`.
    pub fn duty_report(
        &self,
        date: NaiveDate,
        clock_time: NaiveTime,
    ) -> Result<Vec<DutyEntry>, ComposeError> {
        let policy = self.policy;
        let holiday = self.calendar.is_holiday(date);
        let weekday = date.weekday();
        let mut report = Vec::new();

        // Evening: only while the shift is still ahead, and never on a
        // holiday or the evening before the rest day; the weekend rotation
        // covers those.
        if clock_time < policy.evening_start && !holiday && weekday != policy.pre_rest_day {
            report.push(self.resolve(
                DutySlot::Evening,
                &policy.evening_type,
                "evening".to_string(),
                date,
            )?);
        }

        // Night: the fortnight weekday selects the fortnightly scheme, the
        // other working weekdays the daily one. Weekend and holiday nights
        // belong to the weekend slot, never duplicated here.
        let weekend_day = weekday == policy.pre_rest_day || weekday == policy.rest_day;
        if !holiday && !weekend_day {
            let squad_type = if weekday == policy.fortnight_night_day {
                &policy.friday_night_type
            } else {
                &policy.weekday_night_type
            };
            report.push(self.resolve(DutySlot::Night, squad_type, "night".to_string(), date)?);
        }

        // Weekend/holiday slot.
        if weekend_day || holiday {
            let label = match self.calendar.holiday_label(date) {
                Some(name) => format!("weekend/holiday ({name})"),
                None => "weekend/holiday".to_string(),
            };
            report.push(self.resolve(DutySlot::Weekend, &policy.weekend_type, label, date)?);
        }

        debug!(%date, entries = report.len(), "Duty report composed");
        Ok(report)
    }

    fn resolve(
        &self,
        slot: DutySlot,
        squad_type: &str,
        label: String,
        date: NaiveDate,
    ) -> Result<DutyEntry, ComposeError> {
        let squad = self
            .resolver
            .duty_squad(squad_type, date)
            .map_err(|source| ComposeError { slot, source })?;
        Ok(DutyEntry {
            slot,
            label,
            squad_type: squad_type.to_string(),
            squad,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
