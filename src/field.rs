//! Single-date masked input field.
//!
//! `DateField` owns the state a host UI needs to render one masked date
//! input: the display text, the parsed value, the validity flag, and the
//! disabled flag. The host forwards raw input events and renders the
//! resulting text and flag; the binding surface (`write_value`,
//! `register_on_change`, `register_on_touched`, `set_disabled`) is how an
//! enclosing form reads and writes the field.

use std::fmt;

use crate::adapter::DateAdapter;
use crate::mask::{apply_mask, entry_flagged, field_state, strip_digits, EditKind, FieldState};
use crate::CalendarDate;

/// Listener invoked with the new value whenever the field's value changes.
pub type ChangeListener = Box<dyn FnMut(Option<CalendarDate>)>;
/// Listener invoked whenever the user interacts with the field.
pub type TouchListener = Box<dyn FnMut()>;

/// A masked `dd/mm/yyyy` input field.
pub struct DateField {
    adapter: DateAdapter,
    text: String,
    value: Option<CalendarDate>,
    manual_invalid: bool,
    disabled: bool,
    on_change: Option<ChangeListener>,
    on_touched: Option<TouchListener>,
}

impl DateField {
    pub fn new() -> Self {
        Self::with_adapter(DateAdapter::default())
    }

    pub fn with_adapter(adapter: DateAdapter) -> Self {
        Self {
            adapter,
            text: String::new(),
            value: None,
            manual_invalid: false,
            disabled: false,
            on_change: None,
            on_touched: None,
        }
    }

    // --- binding surface ---

    /// Sets the value from the outside (form reset, initial value).
    /// Does not notify the change listener.
    pub fn write_value(&mut self, value: Option<CalendarDate>) {
        self.value = value;
        self.text = self.adapter.format(value.as_ref());
        self.refresh_validity();
    }

    pub fn register_on_change(&mut self, listener: impl FnMut(Option<CalendarDate>) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn register_on_touched(&mut self, listener: impl FnMut() + 'static) {
        self.on_touched = Some(Box::new(listener));
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    // --- event handlers ---

    /// Handles a keystroke or paste: remasks the text, refreshes the
    /// validity flag, and marks the field touched. The value is not
    /// re-parsed here; that happens on [`DateField::commit`] or when the
    /// calendar picker reports a selection.
    pub fn handle_input(&mut self, raw_text: &str, edit: EditKind) {
        if self.disabled {
            return;
        }
        self.text = apply_mask(raw_text, edit);
        self.refresh_validity();
        self.touch();
    }

    /// Accepts a selection from the calendar picker (or `None` when the
    /// picker clears). A selected date replaces the display text with its
    /// formatted form; clearing keeps whatever the user typed.
    pub fn handle_picker_change(&mut self, date: Option<CalendarDate>) {
        if self.disabled {
            return;
        }
        self.value = date;
        if date.is_some() {
            self.text = self.adapter.format(date.as_ref());
        }
        self.refresh_validity();
        self.emit_change();
        self.touch();
    }

    /// Reconciles typed text with the value: parses the current text and
    /// routes the result through [`DateField::handle_picker_change`].
    pub fn commit(&mut self) {
        let parsed = self.adapter.parse(&self.text);
        self.handle_picker_change(parsed);
    }

    pub fn handle_blur(&mut self) {
        self.touch();
    }

    // --- accessors ---

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn value(&self) -> Option<CalendarDate> {
        self.value
    }

    /// True when the current text is an incomplete entry or a complete
    /// but impossible date; intended for external error styling.
    pub const fn is_manual_invalid(&self) -> bool {
        self.manual_invalid
    }

    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn state(&self) -> FieldState {
        field_state(&strip_digits(&self.text))
    }

    // --- internals ---

    fn refresh_validity(&mut self) {
        self.manual_invalid = entry_flagged(&strip_digits(&self.text));
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

impl Default for DateField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateField")
            .field("text", &self.text)
            .field("value", &self.value)
            .field("manual_invalid", &self.manual_invalid)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}
