//! Data models for roster and rotation entities.
//!
//! This module contains the data structures the engine operates on:
//!
//! - `Member`: a crew member with rank and driver qualification
//! - `Squad`, `SquadType`: the rotating crews and their families
//! - `RotationScheme`, `PeriodUnit`: the per-type rotation rule
//! - `HolidayEntry`: a dated holiday with an optional yearly recurrence

pub mod holiday;
pub mod member;
pub mod squad;

pub use holiday::HolidayEntry;
pub use member::{DriverClass, Member, Rank};
pub use squad::{PeriodUnit, RotationScheme, Squad, SquadType};
