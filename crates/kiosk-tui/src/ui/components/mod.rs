//! Reusable UI components

pub mod header;
pub mod logo;
pub mod notification;
pub mod picker;
pub mod stats;
