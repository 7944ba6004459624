//! Screen implementations

pub mod kiosk;
pub mod login;
