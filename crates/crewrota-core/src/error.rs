use chrono::NaiveDate;
use thiserror::Error;

/// Errors the engine reports to callers.
///
/// All of these are recoverable outcomes: the resolver and composer never
/// treat bad input as fatal, and the messaging layer is expected to turn
/// each kind into a specific, actionable message.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown squad type: {0}")]
    UnknownSquadType(String),

    #[error("Unknown squad '{squad}' in type '{squad_type}'")]
    UnknownSquad { squad_type: String, squad: String },

    #[error("Unknown member id: {0}")]
    UnknownMember(i64),

    #[error("No rotation defined for squad type: {0}")]
    NoRotationDefined(String),

    #[error("Roster incomplete for '{squad_type}': {registered} of {declared} squads registered")]
    RosterIncomplete {
        squad_type: String,
        declared: usize,
        registered: usize,
    },
}

/// Parse a `YYYY-MM-DD` date string at the configuration/CLI boundary.
///
/// Malformed dates are rejected here so the calendar and resolver only ever
/// see valid `NaiveDate` values.
pub fn parse_date(input: &str) -> Result<NaiveDate, RosterError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| RosterError::InvalidDate(input.to_string()))
}
