//! Week identifiers.
//!
//! A competition week is identified by its Monday. Weigh-ins happen at the
//! end of the week but are filed under that Monday.

use chrono::{Datelike, Duration, NaiveDate};

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn previous_week(week: NaiveDate) -> NaiveDate {
    week - Duration::days(7)
}

pub fn next_week(week: NaiveDate) -> NaiveDate {
    week + Duration::days(7)
}

/// Sunday closing the week that starts on `week`.
pub fn week_end(week: NaiveDate) -> NaiveDate {
    week + Duration::days(6)
}
