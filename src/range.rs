//! Date-range value and the paired start/end masked fields.
//!
//! A range is a pair of optional dates. No start <= end ordering is
//! enforced here; the enclosing calendar picker owns that policy.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::adapter::DateAdapter;
use crate::consts::{DATE_DIGITS, RANGE_PASTE_DIGITS, RANGE_SEPARATOR};
use crate::field::TouchListener;
use crate::mask::{apply_mask, field_state, mask_digits, range_flagged, strip_digits, EditKind, FieldState};
use crate::{CalendarDate, ParseError};

/// The paired (start, end) value of a range control. Either side may be
/// absent while the user is still filling the other in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateRange {
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
}

/// Error type for range text parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Error parsing one side of the range.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    pub const fn new(start: Option<CalendarDate>, end: Option<CalendarDate>) -> Self {
        Self { start, end }
    }

    /// True when neither side is set
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True when both sides are set
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        f.write_str(RANGE_SEPARATOR)?;
        if let Some(end) = self.end {
            write!(f, "{end}")?;
        }
        Ok(())
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator_count = s.matches(RANGE_SEPARATOR).count();
        if separator_count != 1 {
            return Err(RangeError::InvalidFormat(format!(
                "expected exactly one '{RANGE_SEPARATOR}' separator, found {separator_count}: {s}"
            )));
        }

        let (start_str, end_str) = s.split_once(RANGE_SEPARATOR).ok_or_else(|| {
            RangeError::InvalidFormat(format!(
                "separator '{RANGE_SEPARATOR}' not found despite count == 1"
            ))
        })?;

        let parse_side = |side: &str| -> Result<Option<CalendarDate>, RangeError> {
            let trimmed = side.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.parse::<CalendarDate>()?))
            }
        };

        Ok(Self {
            start: parse_side(start_str)?,
            end: parse_side(end_str)?,
        })
    }
}

impl serde::Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Which of the pair's inputs an event belongs to (and which one holds
/// focus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveField {
    Start,
    End,
}

/// Work scheduled to run after the current input cycle completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    FocusEnd,
}

/// Listener invoked with the new range whenever either side changes.
pub type RangeChangeListener = Box<dyn FnMut(DateRange)>;

/// A pair of masked date inputs sharing one value and one validity flag.
pub struct DateRangeField {
    adapter: DateAdapter,
    start_text: String,
    end_text: String,
    value: DateRange,
    manual_invalid: bool,
    disabled: bool,
    focus: ActiveField,
    deferred: VecDeque<DeferredAction>,
    on_change: Option<RangeChangeListener>,
    on_touched: Option<TouchListener>,
}

impl DateRangeField {
    pub fn new() -> Self {
        Self::with_adapter(DateAdapter::default())
    }

    pub fn with_adapter(adapter: DateAdapter) -> Self {
        Self {
            adapter,
            start_text: String::new(),
            end_text: String::new(),
            value: DateRange::default(),
            manual_invalid: false,
            disabled: false,
            focus: ActiveField::Start,
            deferred: VecDeque::new(),
            on_change: None,
            on_touched: None,
        }
    }

    // --- binding surface ---

    /// Sets the range from the outside; `None` resets both sides.
    /// Does not notify the change listener.
    pub fn write_value(&mut self, value: Option<DateRange>) {
        self.value = value.unwrap_or_default();
        self.start_text = self.adapter.format(self.value.start.as_ref());
        self.end_text = self.adapter.format(self.value.end.as_ref());
        self.refresh_validity();
    }

    pub fn register_on_change(&mut self, listener: impl FnMut(DateRange) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn register_on_touched(&mut self, listener: impl FnMut() + 'static) {
        self.on_touched = Some(Box::new(listener));
    }

    /// Disables or enables the whole pair.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    // --- event handlers ---

    /// Handles a keystroke or paste in one of the two inputs.
    ///
    /// An insertion that leaves exactly sixteen digits in the start field
    /// is treated as a pasted start+end pair: the halves are masked into
    /// their respective fields and the focus move, validity refresh, and
    /// touch notification are deferred until the host drains the queue
    /// with [`DateRangeField::flush_deferred`]. Every other edit goes
    /// through the normal single-field mask.
    pub fn handle_input(&mut self, field: ActiveField, raw_text: &str, edit: EditKind) {
        if self.disabled {
            return;
        }
        self.focus = field;

        let digits = strip_digits(raw_text);
        if field == ActiveField::Start
            && edit == EditKind::Insert
            && digits.len() == RANGE_PASTE_DIGITS
        {
            self.start_text = mask_digits(&digits[..DATE_DIGITS]);
            self.end_text = mask_digits(&digits[DATE_DIGITS..]);
            self.deferred.push_back(DeferredAction::FocusEnd);
            return;
        }

        let masked = apply_mask(raw_text, edit);
        match field {
            ActiveField::Start => self.start_text = masked,
            ActiveField::End => self.end_text = masked,
        }
        self.refresh_validity();
        self.touch();
    }

    /// Runs the work deferred by a sixteen-digit paste. The host calls
    /// this once its current event-handling cycle has completed.
    pub fn flush_deferred(&mut self) {
        while let Some(action) = self.deferred.pop_front() {
            match action {
                DeferredAction::FocusEnd => {
                    self.focus = ActiveField::End;
                    self.refresh_validity();
                    self.touch();
                }
            }
        }
    }

    /// True when a deferred action is waiting for
    /// [`DateRangeField::flush_deferred`].
    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Accepts a selection for one side from the calendar picker.
    pub fn handle_picker_change(&mut self, field: ActiveField, date: Option<CalendarDate>) {
        if self.disabled {
            return;
        }
        match field {
            ActiveField::Start => self.value.start = date,
            ActiveField::End => self.value.end = date,
        }
        if date.is_some() {
            let text = self.adapter.format(date.as_ref());
            match field {
                ActiveField::Start => self.start_text = text,
                ActiveField::End => self.end_text = text,
            }
        }
        self.refresh_validity();
        self.emit_change();
        self.touch();
    }

    /// Reconciles one side's typed text with the value.
    pub fn commit(&mut self, field: ActiveField) {
        let text = match field {
            ActiveField::Start => &self.start_text,
            ActiveField::End => &self.end_text,
        };
        let parsed = self.adapter.parse(text);
        self.handle_picker_change(field, parsed);
    }

    pub fn handle_blur(&mut self) {
        self.touch();
    }

    /// Moves focus between the pair's inputs (host-driven; the split path
    /// moves it itself when flushed).
    pub fn set_focus(&mut self, field: ActiveField) {
        self.focus = field;
    }

    // --- accessors ---

    pub fn start_text(&self) -> &str {
        &self.start_text
    }

    pub fn end_text(&self) -> &str {
        &self.end_text
    }

    pub const fn value(&self) -> DateRange {
        self.value
    }

    pub const fn focused(&self) -> ActiveField {
        self.focus
    }

    /// True when either side is incomplete or names an impossible date.
    pub const fn is_manual_invalid(&self) -> bool {
        self.manual_invalid
    }

    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn state(&self, field: ActiveField) -> FieldState {
        let text = match field {
            ActiveField::Start => &self.start_text,
            ActiveField::End => &self.end_text,
        };
        field_state(&strip_digits(text))
    }

    // --- internals ---

    fn refresh_validity(&mut self) {
        self.manual_invalid =
            range_flagged(&strip_digits(&self.start_text), &strip_digits(&self.end_text));
    }

    fn emit_change(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(self.value);
        }
    }

    fn touch(&mut self) {
        if let Some(listener) = self.on_touched.as_mut() {
            listener();
        }
    }
}

impl Default for DateRangeField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DateRangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateRangeField")
            .field("start_text", &self.start_text)
            .field("end_text", &self.end_text)
            .field("value", &self.value)
            .field("manual_invalid", &self.manual_invalid)
            .field("disabled", &self.disabled)
            .field("focus", &self.focus)
            .field("deferred", &self.deferred)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn date(text: &str) -> CalendarDate {
        text.parse().unwrap()
    }

    // --- DateRange value ---

    #[test]
    fn test_range_default_is_empty() {
        let range = DateRange::default();
        assert!(range.is_empty());
        assert!(!range.is_complete());
    }

    #[test]
    fn test_range_parse_complete() {
        let range = "15/05/2024 - 31/12/2024".parse::<DateRange>().unwrap();
        assert_eq!(range.start, Some(date("15/05/2024")));
        assert_eq!(range.end, Some(date("31/12/2024")));
        assert!(range.is_complete());
    }

    #[test]
    fn test_range_parse_open_ends() {
        let range = " - 31/12/2024".parse::<DateRange>().unwrap();
        assert_eq!(range.start, None);
        assert_eq!(range.end, Some(date("31/12/2024")));

        let range = "15/05/2024 - ".parse::<DateRange>().unwrap();
        assert_eq!(range.start, Some(date("15/05/2024")));
        assert_eq!(range.end, None);

        let range = " - ".parse::<DateRange>().unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_range_parse_does_not_enforce_ordering() {
        // Start past end is accepted; ordering policy lives in the picker
        let range = "31/12/2024 - 15/05/2024".parse::<DateRange>().unwrap();
        assert_eq!(range.start, Some(date("31/12/2024")));
        assert_eq!(range.end, Some(date("15/05/2024")));
    }

    #[test]
    fn test_range_parse_errors() {
        let result = "15/05/2024".parse::<DateRange>();
        assert!(matches!(result, Err(RangeError::InvalidFormat(_))));

        let result = "a - b - c".parse::<DateRange>();
        assert!(matches!(result, Err(RangeError::InvalidFormat(_))));

        let result = "31/04/2024 - 31/12/2024".parse::<DateRange>();
        assert!(matches!(result, Err(RangeError::Parse(_))));
    }

    #[test]
    fn test_range_display() {
        let range = "15/05/2024 - 31/12/2024".parse::<DateRange>().unwrap();
        assert_eq!(range.to_string(), "15/05/2024 - 31/12/2024");

        let range = DateRange::new(Some(date("15/05/2024")), None);
        assert_eq!(range.to_string(), "15/05/2024 - ");

        assert_eq!(DateRange::default().to_string(), " - ");
    }

    #[test]
    fn test_range_serde_round_trip() {
        for text in ["15/05/2024 - 31/12/2024", " - 31/12/2024", " - "] {
            let range = text.parse::<DateRange>().unwrap();
            let json = serde_json::to_string(&range).unwrap();
            let parsed: DateRange = serde_json::from_str(&json).unwrap();
            assert_eq!(range, parsed, "round-tripping {text:?}");
        }
    }

    // --- DateRangeField ---

    #[test]
    fn test_sixteen_digit_paste_splits_into_both_fields() {
        let mut field = DateRangeField::new();
        let touches = Rc::new(RefCell::new(0));
        let touches_seen = Rc::clone(&touches);
        field.register_on_touched(move || *touches_seen.borrow_mut() += 1);

        field.handle_input(ActiveField::Start, "1505202431122024", EditKind::Insert);

        assert_eq!(field.start_text(), "15/05/2024");
        assert_eq!(field.end_text(), "31/12/2024");
        // Focus move, validity and touch wait for the end of the cycle
        assert_eq!(field.focused(), ActiveField::Start);
        assert_eq!(*touches.borrow(), 0);
        assert!(field.has_deferred());

        field.flush_deferred();
        assert_eq!(field.focused(), ActiveField::End);
        assert_eq!(*touches.borrow(), 1);
        assert!(!field.is_manual_invalid());
        assert!(!field.has_deferred());
    }

    #[test]
    fn test_paste_with_separators_still_splits() {
        let mut field = DateRangeField::new();
        field.handle_input(
            ActiveField::Start,
            "15/05/2024 31/12/2024",
            EditKind::Insert,
        );
        assert_eq!(field.start_text(), "15/05/2024");
        assert_eq!(field.end_text(), "31/12/2024");
        assert!(field.has_deferred());
    }

    #[test]
    fn test_split_requires_exactly_sixteen_digits() {
        let mut field = DateRangeField::new();

        // Fifteen digits: normal mask path, truncated to eight
        field.handle_input(ActiveField::Start, "150520243112202", EditKind::Insert);
        assert_eq!(field.start_text(), "15/05/2024");
        assert_eq!(field.end_text(), "");
        assert!(!field.has_deferred());

        // Seventeen digits: same
        let mut field = DateRangeField::new();
        field.handle_input(ActiveField::Start, "15052024311220249", EditKind::Insert);
        assert_eq!(field.start_text(), "15/05/2024");
        assert_eq!(field.end_text(), "");
        assert!(!field.has_deferred());
    }

    #[test]
    fn test_split_only_fires_on_insertion_in_start() {
        // Sixteen digits in the end field: no split
        let mut field = DateRangeField::new();
        field.handle_input(ActiveField::End, "1505202431122024", EditKind::Insert);
        assert_eq!(field.start_text(), "");
        assert_eq!(field.end_text(), "15/05/2024");
        assert!(!field.has_deferred());

        // Deletion leaving sixteen digits: no split, text kept as-is
        let mut field = DateRangeField::new();
        field.handle_input(
            ActiveField::Start,
            "1505202431122024",
            EditKind::DeleteBackward,
        );
        assert_eq!(field.start_text(), "1505202431122024");
        assert!(!field.has_deferred());
        assert!(field.is_manual_invalid());
    }

    #[test]
    fn test_normal_typing_in_each_field() {
        let mut field = DateRangeField::new();

        field.handle_input(ActiveField::Start, "1505", EditKind::Insert);
        assert_eq!(field.start_text(), "15/05");
        assert_eq!(field.focused(), ActiveField::Start);
        assert!(field.is_manual_invalid());

        field.handle_input(ActiveField::Start, "15/052024", EditKind::Insert);
        field.handle_input(ActiveField::End, "31122024", EditKind::Insert);
        assert_eq!(field.start_text(), "15/05/2024");
        assert_eq!(field.end_text(), "31/12/2024");
        assert_eq!(field.focused(), ActiveField::End);
        assert!(!field.is_manual_invalid());
    }

    #[test]
    fn test_combined_flag_is_or_across_sides() {
        let mut field = DateRangeField::new();

        field.handle_input(ActiveField::Start, "15052024", EditKind::Insert);
        assert!(!field.is_manual_invalid());

        field.handle_input(ActiveField::End, "3112", EditKind::Insert);
        assert!(field.is_manual_invalid());

        field.handle_input(ActiveField::End, "31/122024", EditKind::Insert);
        assert!(!field.is_manual_invalid());

        // Complete but impossible start flags the pair
        field.handle_input(ActiveField::Start, "31042024", EditKind::Insert);
        assert!(field.is_manual_invalid());
    }

    #[test]
    fn test_picker_changes_emit_whole_range() {
        let mut field = DateRangeField::new();
        let changes: Rc<RefCell<Vec<DateRange>>> = Rc::default();
        let changes_seen = Rc::clone(&changes);
        field.register_on_change(move |value| changes_seen.borrow_mut().push(value));

        field.handle_picker_change(ActiveField::Start, Some(date("15/05/2024")));
        field.handle_picker_change(ActiveField::End, Some(date("31/12/2024")));

        assert_eq!(field.start_text(), "15/05/2024");
        assert_eq!(field.end_text(), "31/12/2024");
        assert_eq!(
            *changes.borrow(),
            vec![
                DateRange::new(Some(date("15/05/2024")), None),
                DateRange::new(Some(date("15/05/2024")), Some(date("31/12/2024"))),
            ]
        );
    }

    #[test]
    fn test_no_ordering_invariant_on_value() {
        let mut field = DateRangeField::new();
        field.handle_picker_change(ActiveField::Start, Some(date("31/12/2024")));
        field.handle_picker_change(ActiveField::End, Some(date("15/05/2024")));

        // Start past end is carried through untouched
        let value = field.value();
        assert_eq!(value.start, Some(date("31/12/2024")));
        assert_eq!(value.end, Some(date("15/05/2024")));
        assert!(!field.is_manual_invalid());
    }

    #[test]
    fn test_commit_each_side() {
        let mut field = DateRangeField::new();

        field.handle_input(ActiveField::Start, "15052024", EditKind::Insert);
        field.commit(ActiveField::Start);
        assert_eq!(field.value().start, Some(date("15/05/2024")));

        field.handle_input(ActiveField::End, "31042024", EditKind::Insert);
        field.commit(ActiveField::End);
        // Impossible date: no value, text kept for the user to fix
        assert_eq!(field.value().end, None);
        assert_eq!(field.end_text(), "31/04/2024");
        assert!(field.is_manual_invalid());
    }

    #[test]
    fn test_write_value_and_reset() {
        let mut field = DateRangeField::new();
        let changes: Rc<RefCell<Vec<DateRange>>> = Rc::default();
        let changes_seen = Rc::clone(&changes);
        field.register_on_change(move |value| changes_seen.borrow_mut().push(value));

        let range = DateRange::new(Some(date("15/05/2024")), Some(date("31/12/2024")));
        field.write_value(Some(range));
        assert_eq!(field.start_text(), "15/05/2024");
        assert_eq!(field.end_text(), "31/12/2024");
        assert!(changes.borrow().is_empty());

        // None resets both sides
        field.write_value(None);
        assert!(field.value().is_empty());
        assert_eq!(field.start_text(), "");
        assert_eq!(field.end_text(), "");
        assert!(!field.is_manual_invalid());
    }

    #[test]
    fn test_disabled_pair_ignores_events() {
        let mut field = DateRangeField::new();
        field.set_disabled(true);

        field.handle_input(ActiveField::Start, "1505202431122024", EditKind::Insert);
        assert_eq!(field.start_text(), "");
        assert_eq!(field.end_text(), "");
        assert!(!field.has_deferred());

        field.handle_picker_change(ActiveField::Start, Some(date("15/05/2024")));
        assert_eq!(field.value().start, None);
    }

    #[test]
    fn test_blur_touches() {
        let mut field = DateRangeField::new();
        let touches = Rc::new(RefCell::new(0));
        let touches_seen = Rc::clone(&touches);
        field.register_on_touched(move || *touches_seen.borrow_mut() += 1);

        field.handle_blur();
        assert_eq!(*touches.borrow(), 1);
    }
}
