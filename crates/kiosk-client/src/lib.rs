//! HTTP client for the attendance kiosk backend
//!
//! [`HttpBackend`] implements [`kiosk_core::Backend`] against the check-in
//! server's `/login`, `/check-status`, `/check` and `/api/stats` routes.

mod http;
mod toast;

pub use http::{HttpBackend, DEFAULT_TIMEOUT};
pub use toast::parse_toast;
