//! Header component with the wall clock

use chrono::{DateTime, Local};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::Theme;

const TITLE: &str = "◆ LIBRARY ATTENDANCE";

/// `("14:05:09", "Wednesday, October 14, 2026")`
pub fn clock_text(now: DateTime<Local>) -> (String, String) {
    (
        now.format("%H:%M:%S").to_string(),
        now.format("%A, %B %-d, %Y").to_string(),
    )
}

/// Render the header bar
pub fn render(frame: &mut Frame, area: Rect, now: DateTime<Local>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme.border())
        .style(Style::default().bg(theme.background));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(24), Constraint::Length(40)])
        .split(inner);

    let title = Paragraph::new(format!(" {TITLE}")).style(theme.title());
    frame.render_widget(title, chunks[0]);

    let (time, date) = clock_text(now);
    let clock = Paragraph::new(Line::from(vec![
        Span::styled(date, theme.text_secondary()),
        Span::raw("  "),
        Span::styled(time, theme.text().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(clock, chunks[1]);
}
