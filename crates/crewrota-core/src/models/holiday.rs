//! Holiday entries for the duty calendar.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar holiday.
///
/// Fixed feasts recur on the same month/day every year; moveable ones
/// (e.g. Easter-linked dates) are entered per year with `recurring: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub label: String,
    #[serde(default = "default_recurring")]
    pub recurring: bool,
}

fn default_recurring() -> bool {
    true
}

impl HolidayEntry {
    pub fn new(date: NaiveDate, label: &str, recurring: bool) -> Self {
        Self {
            date,
            label: label.to_string(),
            recurring,
        }
    }

    /// Whether this entry applies to `date`: month/day match for recurring
    /// entries, exact date match otherwise.
    pub fn matches(&self, date: NaiveDate) -> bool {
        if self.recurring {
            self.date.month() == date.month() && self.date.day() == date.day()
        } else {
            self.date == date
        }
    }
}
