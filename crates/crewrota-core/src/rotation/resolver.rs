//! Rotation resolver: which squad is on duty for a squad type on a date.

use chrono::NaiveDate;
use tracing::trace;

use crate::error::RosterError;
use crate::models::Squad;
use crate::roster::RosterStore;
use crate::rotation::SchemeRegistry;

/// Resolves duty squads from the roster store and the scheme registry.
/// Stateless: every call is a pure function of (roster state, date).
pub struct RotationResolver<'a> {
    store: &'a RosterStore,
    registry: &'a SchemeRegistry,
}

impl<'a> RotationResolver<'a> {
    pub fn new(store: &'a RosterStore, registry: &'a SchemeRegistry) -> Self {
        Self { store, registry }
    }

    /// The squad on duty for `squad_type` on `date`.
    ///
    /// The elapsed-period count can be negative for dates before the
    /// scheme's epoch; `rem_euclid` keeps the index in `[0, N)` either way.
    pub fn duty_squad(&self, squad_type: &str, date: NaiveDate) -> Result<Squad, RosterError> {
        let ty = self
            .store
            .squad_type(squad_type)
            .ok_or_else(|| RosterError::UnknownSquadType(squad_type.to_string()))?;
        let scheme = self
            .registry
            .scheme_for(squad_type)
            .ok_or_else(|| RosterError::NoRotationDefined(squad_type.to_string()))?;

        let squads = self.store.squads_of(squad_type);
        if squads.is_empty() {
            return Err(RosterError::NoRotationDefined(squad_type.to_string()));
        }
        if squads.len() < ty.squad_count {
            return Err(RosterError::RosterIncomplete {
                squad_type: squad_type.to_string(),
                declared: ty.squad_count,
                registered: squads.len(),
            });
        }

        let index = scheme.period_index(date).rem_euclid(ty.squad_count as i64) as usize;
        let squad = squads[index].clone();
        trace!(squad_type, %date, index, squad = %squad.name, "Duty squad resolved");
        Ok(squad)
    }
}

// ============================================================================
// Tests
// ============================================================================
