//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use chrono::{DateTime, Local};
use ratatui::prelude::*;
use ratatui::widgets::Block;

use crate::app::{AppState, Screen};

/// Main render function - delegates to the current screen
///
/// Click regions are rebuilt on every draw.
pub fn render(frame: &mut Frame, state: &mut AppState, now: DateTime<Local>) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(state.theme.background)),
        area,
    );
    state.hits.clear();

    match state.screen {
        Screen::Login => screens::login::draw(frame, area, state),
        Screen::Kiosk => screens::kiosk::draw(frame, area, state, now),
    }

    if let Some(toast) = &state.toast {
        toast.render(frame, area, &state.theme);
    }
}
