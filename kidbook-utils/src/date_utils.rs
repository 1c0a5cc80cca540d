use std::fmt::{Display, Formatter};
use thiserror::*;

use time::{format_description::BorrowedFormatItem, macros::format_description, Weekday};

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const CLOCK_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
const CLOCK_TIME_SHORT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

#[derive(Debug, Error)]
pub enum DateUtilsError {
    #[error("Invalid date: {0}")]
    DateError(#[from] time::error::ComponentRange),

    #[error("Could not parse {0}: {1}")]
    ParseError(String, time::error::Parse),

    #[error("Could not format value: {0}")]
    FormatError(#[from] time::error::Format),

    #[error("Invalid day of week number: {0}")]
    InvalidDayOfWeek(i64),
}

/// Day of week as stored by the schedule tables: 0 is Sunday, 6 is Saturday.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => Self::Monday,
            Weekday::Tuesday => Self::Tuesday,
            Weekday::Wednesday => Self::Wednesday,
            Weekday::Thursday => Self::Thursday,
            Weekday::Friday => Self::Friday,
            Weekday::Saturday => Self::Saturday,
            Weekday::Sunday => Self::Sunday,
        }
    }
}
impl From<DayOfWeek> for Weekday {
    fn from(day_of_week: DayOfWeek) -> Self {
        match day_of_week {
            DayOfWeek::Monday => Self::Monday,
            DayOfWeek::Tuesday => Self::Tuesday,
            DayOfWeek::Wednesday => Self::Wednesday,
            DayOfWeek::Thursday => Self::Thursday,
            DayOfWeek::Friday => Self::Friday,
            DayOfWeek::Saturday => Self::Saturday,
            DayOfWeek::Sunday => Self::Sunday,
        }
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DayOfWeek::Sunday => "Sunday",
                DayOfWeek::Monday => "Monday",
                DayOfWeek::Tuesday => "Tuesday",
                DayOfWeek::Wednesday => "Wednesday",
                DayOfWeek::Thursday => "Thursday",
                DayOfWeek::Friday => "Friday",
                DayOfWeek::Saturday => "Saturday",
            }
        )
    }
}

impl DayOfWeek {
    pub fn to_number(&self) -> u8 {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => Some(DayOfWeek::Sunday),
            1 => Some(DayOfWeek::Monday),
            2 => Some(DayOfWeek::Tuesday),
            3 => Some(DayOfWeek::Wednesday),
            4 => Some(DayOfWeek::Thursday),
            5 => Some(DayOfWeek::Friday),
            6 => Some(DayOfWeek::Saturday),
            _ => None,
        }
    }
}

impl TryFrom<i64> for DayOfWeek {
    type Error = DateUtilsError;

    fn try_from(number: i64) -> Result<Self, Self::Error> {
        u8::try_from(number)
            .ok()
            .and_then(DayOfWeek::from_number)
            .ok_or(DateUtilsError::InvalidDayOfWeek(number))
    }
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_iso_date(value: &str) -> Result<time::Date, DateUtilsError> {
    time::Date::parse(value, ISO_DATE)
        .map_err(|err| DateUtilsError::ParseError(value.to_string(), err))
}

pub fn format_iso_date(date: time::Date) -> Result<String, DateUtilsError> {
    Ok(date.format(ISO_DATE)?)
}

/// Parses a wall clock time. Accepts `HH:MM:SS` and `HH:MM`.
pub fn parse_clock_time(value: &str) -> Result<time::Time, DateUtilsError> {
    time::Time::parse(value, CLOCK_TIME)
        .or_else(|_| time::Time::parse(value, CLOCK_TIME_SHORT))
        .map_err(|err| DateUtilsError::ParseError(value.to_string(), err))
}

/// Formats a wall clock time as `HH:MM:SS`.
pub fn format_clock_time(time: time::Time) -> Result<String, DateUtilsError> {
    Ok(time.format(CLOCK_TIME)?)
}
