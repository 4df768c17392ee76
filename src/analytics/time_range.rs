//! Time windows for filtering transactions before they are summarised.

use std::{fmt::Display, str::FromStr};

use serde::Serialize;
use time::{Date, Month};

use crate::Error;

/// How far back from "today" a summary looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TimeRange {
    /// Every transaction, including future dated ones.
    #[default]
    #[serde(rename = "all-time")]
    AllTime,
    #[serde(rename = "last-month")]
    LastMonth,
    #[serde(rename = "last-3-months")]
    Last3Months,
    #[serde(rename = "last-6-months")]
    Last6Months,
    #[serde(rename = "last-year")]
    LastYear,
}

impl TimeRange {
    /// All time ranges, shortest window last.
    pub const ALL: [TimeRange; 5] = [
        TimeRange::AllTime,
        TimeRange::LastYear,
        TimeRange::Last6Months,
        TimeRange::Last3Months,
        TimeRange::LastMonth,
    ];

    /// The name used in query strings and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::AllTime => "all-time",
            TimeRange::LastMonth => "last-month",
            TimeRange::Last3Months => "last-3-months",
            TimeRange::Last6Months => "last-6-months",
            TimeRange::LastYear => "last-year",
        }
    }

    fn months(&self) -> Option<u32> {
        match self {
            TimeRange::AllTime => None,
            TimeRange::LastMonth => Some(1),
            TimeRange::Last3Months => Some(3),
            TimeRange::Last6Months => Some(6),
            TimeRange::LastYear => Some(12),
        }
    }

    /// The first date inside the window ending on `today`, or `None` for [TimeRange::AllTime].
    pub fn start_date(&self, today: Date) -> Option<Date> {
        self.months().map(|months| months_before(today, months))
    }

    /// Whether `date` falls in the window `[start_date, today]`.
    pub fn contains(&self, date: Date, today: Date) -> bool {
        match self.start_date(today) {
            Some(start) => start <= date && date <= today,
            None => true,
        }
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    /// Parse a time range name. The short names used by older clients, e.g.
    /// "3months" or "all", are accepted too.
    ///
    /// # Errors
    /// Returns [Error::InvalidOption] for any other value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all-time" | "all" => Ok(TimeRange::AllTime),
            "last-month" | "1month" => Ok(TimeRange::LastMonth),
            "last-3-months" | "3months" => Ok(TimeRange::Last3Months),
            "last-6-months" | "6months" => Ok(TimeRange::Last6Months),
            "last-year" | "1year" => Ok(TimeRange::LastYear),
            other => Err(Error::InvalidOption(format!(
                "unknown time range \"{other}\", expected one of {}",
                TimeRange::ALL.map(|range| range.as_str()).join(", ")
            ))),
        }
    }
}

/// The same day `months` calendar months before `date`.
///
/// The day is clamped to the length of the target month, so 31 March minus
/// one month is the last day of February.
fn months_before(date: Date, months: u32) -> Date {
    let month_index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 - months as i32;
    let year = month_index.div_euclid(12);
    let Ok(month) = Month::try_from((month_index.rem_euclid(12) + 1) as u8) else {
        return Date::MIN;
    };
    let day = date.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
