//! Error types for the kiosk core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KioskError>;

/// Everything that can go wrong between a keystroke and the backend.
///
/// None of these are fatal: each one maps to a message shown on the kiosk
/// and control returns to an interactive state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KioskError {
    #[error("Please enter exactly {expected} digits.")]
    CodeLength { expected: usize },

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Locked out. Try again in {remaining_secs} seconds.")]
    LockedOut { remaining_secs: u64 },

    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected backend response: {0}")]
    Protocol(String),

    #[error("Enter ID and password.")]
    MissingCredentials,

    #[error("A request is already in progress.")]
    Busy,

    #[error("Option list `{0}` must not be empty")]
    EmptyOptions(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl KioskError {
    /// Whether the error came from the transport rather than the backend's answer
    pub fn is_system(&self) -> bool {
        matches!(self, KioskError::Network(_) | KioskError::Protocol(_))
    }
}

impl From<std::io::Error> for KioskError {
    fn from(e: std::io::Error) -> Self {
        KioskError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for KioskError {
    fn from(e: serde_json::Error) -> Self {
        KioskError::Storage(e.to_string())
    }
}
