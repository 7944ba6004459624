//! Check-in screen: logo, the active panel and live stats

use chrono::{DateTime, Local};
use kiosk_core::{Panel, Picker};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{AppState, Hit};
use crate::ui::components::{header, logo, picker, stats};
use crate::ui::layout::{centered_rect_fixed, render_footer, section_block, ScreenLayout};

const PANEL_WIDTH: u16 = 44;

pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, now: DateTime<Local>) {
    let layout = ScreenLayout::new(area);
    header::render(frame, layout.header, now, &state.theme);

    let kiosk = &state.kiosk;
    let (_, logo_height) = logo::size(kiosk.logo_scaled);

    let (logo_area, panel_area) = match kiosk.panel {
        None => (layout.content, None),
        Some(panel) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(logo_height),
                    Constraint::Length(1),
                    Constraint::Min(3),
                ])
                .split(layout.content);
            (chunks[0], Some((panel, chunks[2])))
        }
    };

    let logo_region = logo::render(frame, logo_area, kiosk.logo_scaled, &state.theme);
    state.hits.insert(Hit::Logo, logo_region);

    if let Some((panel, area)) = panel_area {
        match panel {
            Panel::Role => draw_picker(frame, area, state, Picker::Role, "Select your role"),
            Panel::Enrollment => draw_enrollment(frame, area, state),
            Panel::Reason => draw_picker(frame, area, state, Picker::Reason, "Reason for visit"),
        }
    }

    stats::render(frame, layout.stats, state.stats.as_ref(), &state.theme);
    render_footer(frame, layout.footer, hints(state.kiosk.panel), &state.theme);
}

fn hints(panel: Option<Panel>) -> &'static [(&'static str, &'static str)] {
    match panel {
        None => &[("Enter", "Check in / out")],
        Some(Panel::Enrollment) => &[("Enter", "Submit"), ("Backspace", "Delete"), ("Esc", "Cancel")],
        Some(_) => &[("↑/↓", "Choose"), ("Enter", "Confirm"), ("Esc", "Cancel")],
    }
}

fn draw_picker(frame: &mut Frame, area: Rect, state: &mut AppState, which: Picker, title: &str) {
    let height = picker::height(state.kiosk.options(which));
    let area = centered_rect_fixed(PANEL_WIDTH, height, area);
    picker::render(frame, area, which, title, &state.kiosk, &state.theme, &mut state.hits);
}

/// `1 2 _ _ _`
pub fn code_slots(value: &str, len: usize) -> String {
    let mut chars = value.chars();
    (0..len)
        .map(|_| chars.next().unwrap_or('_').to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw_enrollment(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let theme = &state.theme;
    let kiosk = &state.kiosk;
    let area = centered_rect_fixed(PANEL_WIDTH, 8, area);

    let title = format!("Enter the last {} digits of your ID", kiosk.code_len);
    let block = section_block(&title, kiosk.enrollment_focused, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Code
            Constraint::Length(1), // Hint
            Constraint::Length(1), // Error
            Constraint::Length(1),
            Constraint::Length(1), // Submit
        ])
        .split(inner);

    let code = Paragraph::new(code_slots(&kiosk.enrollment_value, kiosk.code_len))
        .style(theme.input(kiosk.enrollment_focused).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(code, rows[0]);

    let hint = Paragraph::new(format!("{} digits", kiosk.code_len))
        .style(theme.text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(hint, rows[1]);

    if let Some(error) = &kiosk.enrollment_error {
        let error = Paragraph::new(error.as_str())
            .style(theme.danger())
            .alignment(Alignment::Center);
        frame.render_widget(error, rows[2]);
    }

    let label = if kiosk.busy { "[ Checking… ]" } else { "[ Submit ]" };
    let button_area = centered_rect_fixed(label.chars().count() as u16, 1, rows[4]);
    frame.render_widget(
        Paragraph::new(label).style(theme.button(!kiosk.busy)),
        button_area,
    );
    state.hits.insert(Hit::Submit, button_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_slots() {
        assert_eq!(code_slots("", 4), "_ _ _ _");
        assert_eq!(code_slots("123", 5), "1 2 3 _ _");
        assert_eq!(code_slots("1234", 4), "1 2 3 4");
    }

    #[test]
    fn test_hints_follow_panel() {
        assert_eq!(hints(None)[0].0, "Enter");
        assert!(hints(Some(Panel::Role)).iter().any(|(k, _)| *k == "Esc"));
    }
}
