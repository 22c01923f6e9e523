mod adapter;
mod consts;
mod field;
mod mask;
mod prelude;
mod range;
mod types;

pub use adapter::{DateAdapter, DisplayFormat, LocaleConfig};
pub use consts::*;
pub use field::{ChangeListener, DateField, TouchListener};
pub use mask::{
    EditKind, FieldState, apply_mask, entry_flagged, field_state, mask_digits, range_flagged,
    strip_digits,
};
pub use range::{ActiveField, DateRange, DateRangeField, RangeChangeListener, RangeError};
pub use types::{Day, Month, Year};

use crate::prelude::*;
use std::str::FromStr;
use types::days_in_month;

/// A validated calendar date.
///
/// Construction is the round-trip check: a (year, month, day) triple that
/// does not name a real day (31 April, 29 February of a non-leap year)
/// cannot exist as a value, so there is no silent rollover into the next
/// month. The month is held as a zero-based index; text forms are
/// one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:02}/{:02}/{}", "self.day.get()", "self.month.number()", "self.year.get()")]
pub struct CalendarDate {
    year: types::Year,
    month: types::Month,
    day: types::Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MONTHS_PER_YEAR)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {month:02}/{year}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Creates a date from already-validated components.
    ///
    /// The day is re-checked against this year and month, since a `Day`
    /// may have been validated in a different context.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the day is past the end of the month.
    pub fn new(
        year: types::Year,
        month: types::Month,
        day: types::Day,
    ) -> Result<Self, ParseError> {
        if day.get() > days_in_month(year, month) {
            return Err(ParseError::InvalidDay {
                month: month.number(),
                day: day.get(),
                year: year.get(),
            });
        }
        Ok(Self { year, month, day })
    }

    /// Creates a date from raw components with a zero-based month index.
    ///
    /// # Errors
    /// Returns the component's `ParseError` if any part is out of range.
    pub fn from_parts(year: u16, month_index: u8, day: u8) -> Result<Self, ParseError> {
        let year = types::Year::new(year)?;
        let month = types::Month::new(month_index)?;
        let day = types::Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// Returns the day of the month (1-based)
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the zero-based month index (0 = January)
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the one-based calendar month number (1 = January)
    pub const fn month_number(&self) -> u8 {
        self.month.number()
    }

    /// Returns the year
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the Day type
    pub const fn day_typed(&self) -> types::Day {
        self.day
    }

    /// Returns the Month type
    pub const fn month_typed(&self) -> types::Month {
        self.month
    }

    /// Returns the Year type
    pub const fn year_typed(&self) -> types::Year {
        self.year
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // Exactly 8 digits: positional DDMMYYYY, the form the input mask
        // produces once separators are stripped
        if trimmed.len() == DATE_DIGITS && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Self::parse_digit_run(trimmed);
        }

        // Otherwise slash-delimited dd/mm/yyyy, exactly three parts
        let parts: Vec<&str> = trimmed.split(MASK_SEPARATOR).map(str::trim).collect();
        if parts.len() == 3 {
            Self::parse_slash_parts(&parts)
        } else {
            Err(ParseError::InvalidFormat(trimmed.to_owned()))
        }
    }
}

impl CalendarDate {
    /// Helper to parse u16 with better error messages
    fn parse_u16(s: &str) -> Result<u16, ParseError> {
        s.parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    /// Helper to parse u8 with better error messages
    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    fn parse_digit_run(digits: &str) -> Result<Self, ParseError> {
        debug_assert!(digits.len() == DATE_DIGITS && digits.is_ascii());

        let day_u8 = Self::parse_u8(&digits[..MONTH_OFFSET])?;
        let month_number = Self::parse_u8(&digits[MONTH_OFFSET..YEAR_OFFSET])?;
        let year_u16 = Self::parse_u16(&digits[YEAR_OFFSET..])?;

        let year = types::Year::new(year_u16)?;
        let month = types::Month::from_number(month_number)?;
        let day = types::Day::new(day_u8, year, month)?;

        Ok(Self { year, month, day })
    }

    fn parse_slash_parts(parts: &[&str]) -> Result<Self, ParseError> {
        if parts.len() != 3 {
            return Err(ParseError::InvalidFormat(parts.join("/")));
        }
        let day_u8 = Self::parse_u8(parts[0])?;
        let month_number = Self::parse_u8(parts[1])?;
        let year_u16 = Self::parse_u16(parts[2])?;

        let year = types::Year::new(year_u16)?;
        let month = types::Month::from_number(month_number)?;
        let day = types::Day::new(day_u8, year, month)?;

        Ok(Self { year, month, day })
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
