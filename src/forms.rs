//! Transient per-frame view state for the two interactive tabs.
//!
//! The toolkit adapter owns nothing: it receives these structures each frame
//! and the controller resets them when an action completes.

use crate::db::models::{Condition, Size};
use crate::fields;

/// A text buffer with an explicit maximum length. Overflowing input is
/// truncated at a character boundary rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedText {
    buf: String,
    max: usize,
}

impl BoundedText {
    pub fn new(max: usize) -> Self {
        Self {
            buf: String::new(),
            max,
        }
    }

    /// Replace the content, truncating to the maximum length.
    pub fn set(&mut self, value: &str) {
        self.buf.clear();
        for c in value.chars() {
            if self.buf.len() + c.len_utf8() > self.max {
                break;
            }
            self.buf.push(c);
        }
    }

    /// Append one character; ignored once the buffer is full.
    pub fn push(&mut self, c: char) {
        if self.buf.len() + c.len_utf8() <= self.max {
            self.buf.push(c);
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max
    }
}

pub const NAME_MAX: usize = 255;
pub const PHONE_MAX: usize = 15;
pub const DATE_MAX: usize = 15;
pub const DESCRIPTION_MAX: usize = 255;

/// State of the registration tab between frames.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: BoundedText,
    pub phone: BoundedText,
    pub date: BoundedText,
    pub size: Size,
    pub condition: Condition,
    pub description: BoundedText,
    /// Set when a submit was rejected; shown until the user dismisses it.
    pub missing_fields_notice: bool,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            name: BoundedText::new(NAME_MAX),
            phone: BoundedText::new(PHONE_MAX),
            date: BoundedText::new(DATE_MAX),
            size: Size::M,
            condition: Condition::New,
            description: BoundedText::new(DESCRIPTION_MAX),
            missing_fields_notice: false,
        }
    }

    /// Back to defaults: text fields empty, size M, condition New.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Normalize the phone field in place. A failed parse collapses the
    /// field to empty so the user retypes it.
    pub fn commit_phone(&mut self) {
        match fields::normalize_phone(self.phone.as_str()) {
            Ok(phone) => self.phone.set(&phone),
            Err(_) => self.phone.clear(),
        }
    }

    /// Normalize the date field in place, clearing it on failure.
    pub fn commit_date(&mut self) {
        match fields::normalize_date(self.date.as_str()) {
            Ok(date) => self.date.set(&date),
            Err(_) => self.date.clear(),
        }
    }
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

/// State of the donations tab between frames.
#[derive(Debug, Clone)]
pub struct InventoryView {
    /// Donation armed for deletion, awaiting the confirmation gesture.
    pub pending_delete: Option<i64>,
    /// Hide rows already handed out.
    pub only_available: bool,
}

impl InventoryView {
    pub fn new() -> Self {
        Self {
            pending_delete: None,
            only_available: true,
        }
    }
}

impl Default for InventoryView {
    fn default() -> Self {
        Self::new()
    }
}
