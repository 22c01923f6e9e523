/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Number of months in a year (month indices are `0..MONTHS_PER_YEAR`)
pub const MONTHS_PER_YEAR: u8 = 12;

/// First day of any month
pub const MIN_DAY: u8 = 1;

/// Zero-based index of February
pub const FEBRUARY: u8 = 1;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month, indexed by zero-based month.
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 12] = [
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Separator inserted by the input mask (`dd/mm/yyyy`)
pub const MASK_SEPARATOR: char = '/';
/// Separator between the two halves of a range in text form
pub const RANGE_SEPARATOR: &str = " - ";

/// Digits in a complete date (`DDMMYYYY`)
pub const DATE_DIGITS: usize = 8;
/// Digits in a pasted start+end pair that triggers the range split
pub const RANGE_PASTE_DIGITS: usize = 2 * DATE_DIGITS;

/// Byte offset where the month digits start in `DDMMYYYY`
pub(crate) const MONTH_OFFSET: usize = 2;
/// Byte offset where the year digits start in `DDMMYYYY`
pub(crate) const YEAR_OFFSET: usize = 4;
