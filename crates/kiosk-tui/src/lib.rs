//! Attendance kiosk terminal interface
//!
//! Drives the check-in flow from `kiosk-core` against an HTTP backend and
//! renders it with ratatui. The binary lives in `main.rs`.

pub mod app;
pub mod auth;
pub mod ui;

pub use app::{App, KioskConfig};
