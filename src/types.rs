use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_YEAR, MIN_DAY, MONTHS_PER_YEAR,
};
use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use std::num::NonZeroU8;

/// A year value guaranteed to be in the range `1..=MAX_YEAR` (1..=9999)
/// Uses `NonZeroU16` internally, so 0 is not a valid year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's non-zero and <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, ParseError> {
        let non_zero = NonZeroU16::new(value).ok_or(ParseError::InvalidYear(value))?;
        if value > MAX_YEAR {
            return Err(ParseError::InvalidYear(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month stored as a zero-based index in the range `0..MONTHS_PER_YEAR`
/// (0 = January, 11 = December), matching the internal convention of the
/// mask and parser. Text forms are one-based; use [`Month::from_number`]
/// and [`Month::number`] at that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    /// Creates a new Month from a zero-based index
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the index is >= `MONTHS_PER_YEAR`.
    pub fn new(index: u8) -> Result<Self, ParseError> {
        if index >= MONTHS_PER_YEAR {
            return Err(ParseError::InvalidMonth(index.saturating_add(1)));
        }
        Ok(Self(index))
    }

    /// Creates a new Month from a one-based calendar number (1 = January)
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the number is 0 or > `MONTHS_PER_YEAR`.
    pub fn from_number(number: u8) -> Result<Self, ParseError> {
        let index = number
            .checked_sub(1)
            .ok_or(ParseError::InvalidMonth(number))?;
        if index >= MONTHS_PER_YEAR {
            return Err(ParseError::InvalidMonth(number));
        }
        Ok(Self(index))
    }

    /// Returns the zero-based month index
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the one-based calendar number (1 = January)
    #[inline]
    pub const fn number(self) -> u8 {
        self.0 + 1
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Calendar number, not the internal index
        write!(f, "{}", self.number())
    }
}

/// A day value guaranteed to be valid for a given year and month
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(value: u8, year: Year, month: Month) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidDay {
            month: month.number(),
            day: value,
            year: year.get(),
        })?;

        let max_day = days_in_month(year, month);
        if value > max_day {
            return Err(ParseError::InvalidDay {
                month: month.number(),
                day: value,
                year: year.get(),
            });
        }

        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Can't validate without year/month context, so just check minimum
        if value < MIN_DAY {
            return Err(ParseError::InvalidDay {
                month: 0,
                day: value,
                year: 0,
            });
        }
        // Since we validated value >= MIN_DAY (which is 1), value is non-zero
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidDay {
            month: 0,
            day: value,
            year: 0,
        })?;
        Ok(Self(non_zero))
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: Year, month: Month) -> u8 {
    if month.get() == FEBRUARY && is_leap_year(year.get()) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month.get() as usize]
    }
}
