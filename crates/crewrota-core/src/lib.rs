//! Crewrota core - duty rotation and squad roster engine.
//!
//! Given a calendar date, the engine deterministically answers "which crew
//! is on duty" for several independently rotating shift schemes, and it
//! maintains the ordered rosters those schemes index into.
//!
//! The pieces, leaf first:
//!
//! - [`calendar::HolidayCalendar`]: is this date a non-working day?
//! - [`roster::RosterStore`]: squad types, squads, members, memberships
//! - [`rotation::SchemeRegistry`]: the rotation rule per squad type
//! - [`rotation::RotationResolver`]: duty-squad index computation
//! - [`report::DutyComposer`]: the assembled duty report for a date
//! - [`config::RosterConfig`]: configuration loading and bootstrap
//!
//! The engine never reads the system clock; callers inject the current
//! date and time, which keeps every resolution deterministic and testable.

pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod roster;
pub mod rotation;

pub use calendar::HolidayCalendar;
pub use config::{DutyPolicy, RosterConfig, SquadTypeConfig};
pub use error::{parse_date, RosterError};
pub use models::{
    DriverClass, HolidayEntry, Member, PeriodUnit, Rank, RotationScheme, Squad, SquadType,
};
pub use report::{ComposeError, DutyComposer, DutyEntry, DutySlot};
pub use roster::{MembershipChange, RosterStore};
pub use rotation::{RotationResolver, SchemeRegistry};
