//! Lenient parse/format adapter for date fields.
//!
//! Fields never surface parse failures as errors: unparseable text
//! degrades to "no value" and is reported through the validity flag
//! instead. The adapter also carries the locale settings that the rest of
//! the crate reads, injected as a plain value rather than process-global
//! state.

use crate::CalendarDate;

/// Supported display formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayFormat {
    /// `dd/MM/yyyy`, day and month zero-padded, year as-is
    #[default]
    DayMonthYear,
}

/// Locale settings injected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleConfig {
    /// First day of the week: 0 = Sunday, 1 = Monday
    pub first_day_of_week: u8,
    pub display_format: DisplayFormat,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            // Monday-first calendar
            first_day_of_week: 1,
            display_format: DisplayFormat::DayMonthYear,
        }
    }
}

/// Converts between field text and [`CalendarDate`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateAdapter {
    locale: LocaleConfig,
}

impl DateAdapter {
    pub const fn new(locale: LocaleConfig) -> Self {
        Self { locale }
    }

    pub const fn locale(&self) -> &LocaleConfig {
        &self.locale
    }

    pub const fn first_day_of_week(&self) -> u8 {
        self.locale.first_day_of_week
    }

    /// Parses field text, accepting the 8-digit `DDMMYYYY` run and the
    /// slash-delimited `dd/mm/yyyy` form. Anything else, including
    /// impossible calendar dates, produces no value.
    pub fn parse(&self, text: &str) -> Option<CalendarDate> {
        text.parse::<CalendarDate>().ok()
    }

    /// Renders a date for display; an absent date renders as the empty
    /// string.
    pub fn format(&self, date: Option<&CalendarDate>) -> String {
        match (date, self.locale.display_format) {
            (Some(date), DisplayFormat::DayMonthYear) => date.to_string(),
            (None, _) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_monday_first() {
        let adapter = DateAdapter::default();
        assert_eq!(adapter.first_day_of_week(), 1);
        assert_eq!(adapter.locale().display_format, DisplayFormat::DayMonthYear);
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        let adapter = DateAdapter::default();

        let digits = adapter.parse("15052024").unwrap();
        let slashes = adapter.parse("15/05/2024").unwrap();
        assert_eq!(digits, slashes);
    }

    #[test]
    fn test_parse_degrades_to_none() {
        let adapter = DateAdapter::default();

        assert!(adapter.parse("").is_none());
        assert!(adapter.parse("1505").is_none());
        assert!(adapter.parse("31/04/2024").is_none());
        assert!(adapter.parse("garbage").is_none());
    }

    #[test]
    fn test_format() {
        let adapter = DateAdapter::default();
        let date = adapter.parse("01/02/2024").unwrap();

        assert_eq!(adapter.format(Some(&date)), "01/02/2024");
        assert_eq!(adapter.format(None), "");
    }

    #[test]
    fn test_parse_format_round_trip() {
        let adapter = DateAdapter::default();

        for input in ["15052024", "15/05/2024", "29/02/2024"] {
            let date = adapter.parse(input).unwrap();
            let text = adapter.format(Some(&date));
            assert_eq!(adapter.parse(&text), Some(date), "{input} via {text}");
        }
    }
}
