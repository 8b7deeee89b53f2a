//! Holiday calendar: answers whether a date is a non-working day.
//!
//! A date is a holiday when it matches a configured entry, or when its
//! weekday is the designated weekly rest day. Entries are seeded by the
//! configuration loader; the calendar never computes moveable feasts
//! itself.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::HolidayEntry;

#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    entries: Vec<HolidayEntry>,
    rest_day: Weekday,
}

impl HolidayCalendar {
    pub fn new(entries: Vec<HolidayEntry>, rest_day: Weekday) -> Self {
        Self { entries, rest_day }
    }

    /// True when `date` is a non-working day, independent of weekday for
    /// listed entries.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.entries.iter().any(|e| e.matches(date)) {
            return true;
        }
        date.weekday() == self.rest_day
    }

    /// The label of the entry covering `date`, if one is listed. Weekly
    /// rest days have no label.
    pub fn holiday_label(&self, date: NaiveDate) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.matches(date))
            .map(|e| e.label.as_str())
    }

    pub fn add_entry(&mut self, entry: HolidayEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HolidayEntry] {
        &self.entries
    }
}
