//! Incremental digit masking and validity flagging for date fields.
//!
//! Masking is purely textual: it strips non-digits, caps the run at eight
//! digits, and re-inserts `/` separators as the user types. Whether those
//! digits name a real calendar date is a separate pass ([`field_state`] /
//! [`entry_flagged`]) run after every mask update.

use crate::consts::{DATE_DIGITS, MASK_SEPARATOR, MONTH_OFFSET, YEAR_OFFSET};
use crate::CalendarDate;

/// The kind of edit that produced the field's current text.
///
/// Backward deletion bypasses reformatting so the user can remove a
/// separator without it being immediately re-inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// A character was typed or pasted
    Insert,
    /// A backward deletion (backspace)
    DeleteBackward,
}

/// Where a field currently sits in the entry cycle.
///
/// There is no terminal state; every keystroke can move the field in any
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// No digits typed
    Empty,
    /// 1-7 digits, entry still underway
    Partial,
    /// 8 digits naming a real calendar date
    CompleteValid,
    /// 8 digits that fail the round-trip check (e.g. 31/04)
    CompleteInvalid,
}

/// Strips everything but ASCII digits from the field text.
pub fn strip_digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Reformats a digit run into its masked display form, capping at eight
/// digits: `15` stays `15`, `1505` becomes `15/05`, `1505202` becomes
/// `15/05/202`.
pub fn mask_digits(digits: &str) -> String {
    debug_assert!(digits.bytes().all(|b| b.is_ascii_digit()));

    let digits = if digits.len() > DATE_DIGITS {
        &digits[..DATE_DIGITS]
    } else {
        digits
    };

    if digits.len() > YEAR_OFFSET {
        format!(
            "{}{sep}{}{sep}{}",
            &digits[..MONTH_OFFSET],
            &digits[MONTH_OFFSET..YEAR_OFFSET],
            &digits[YEAR_OFFSET..],
            sep = MASK_SEPARATOR,
        )
    } else if digits.len() > MONTH_OFFSET {
        format!(
            "{}{}{}",
            &digits[..MONTH_OFFSET],
            MASK_SEPARATOR,
            &digits[MONTH_OFFSET..],
        )
    } else {
        digits.to_owned()
    }
}

/// Computes the new display text for a field after an edit.
///
/// Insertions are reformatted from the stripped digit run; backward
/// deletions leave the text exactly as the user left it.
pub fn apply_mask(text: &str, edit: EditKind) -> String {
    match edit {
        EditKind::DeleteBackward => text.to_owned(),
        EditKind::Insert => mask_digits(&strip_digits(text)),
    }
}

/// Classifies a digit run into the field state machine.
pub fn field_state(digits: &str) -> FieldState {
    match digits.len() {
        0 => FieldState::Empty,
        len if len < DATE_DIGITS => FieldState::Partial,
        DATE_DIGITS => {
            if digits.parse::<CalendarDate>().is_ok() {
                FieldState::CompleteValid
            } else {
                FieldState::CompleteInvalid
            }
        }
        // An over-long run can only appear on the deletion path, where the
        // text is left untouched; it cannot name a date as-is
        _ => FieldState::CompleteInvalid,
    }
}

/// The per-field validity flag: true when the entry is underway (1-7
/// digits) or complete but naming an impossible date. Empty and fully
/// valid entries are not flagged.
pub fn entry_flagged(digits: &str) -> bool {
    matches!(
        field_state(digits),
        FieldState::Partial | FieldState::CompleteInvalid
    )
}

/// The combined flag for a start/end pair: flagged when either side is.
pub fn range_flagged(start_digits: &str, end_digits: &str) -> bool {
    entry_flagged(start_digits) || entry_flagged(end_digits)
}
