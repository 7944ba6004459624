//! Enrollment code input constrained by the selected role

use crate::error::{KioskError, Result};
use crate::STUDENT_ROLE;

/// Code length for students
pub const STUDENT_CODE_LEN: usize = 5;

/// Code length for every other role
pub const DEFAULT_CODE_LEN: usize = 4;

/// Number of digits the given role must enter
pub fn required_code_len(role: &str) -> usize {
    if role == STUDENT_ROLE {
        STUDENT_CODE_LEN
    } else {
        DEFAULT_CODE_LEN
    }
}

/// Live-sanitized enrollment code field
///
/// Every input event replaces the stored value with the digits of the raw
/// field contents, capped at the role's length. Non-digits never survive an
/// input event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnrollmentInput {
    value: String,
}

impl EnrollmentInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the raw field contents from an input event
    pub fn apply(&mut self, raw: &str, role: &str) -> &str {
        self.value = raw
            .chars()
            .filter(char::is_ascii_digit)
            .take(required_code_len(role))
            .collect();
        &self.value
    }

    /// Remove the last digit
    pub fn backspace(&mut self) -> &str {
        self.value.pop();
        &self.value
    }

    /// Check the exact length required for submission
    pub fn validate(&self, role: &str) -> Result<&str> {
        let expected = required_code_len(role);
        if self.value.len() != expected {
            return Err(KioskError::CodeLength { expected });
        }
        Ok(&self.value)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}
