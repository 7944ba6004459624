//! Live statistics strip

use kiosk_core::LiveStats;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::Theme;

/// Labelled values in display order
pub fn stat_cells(stats: Option<&LiveStats>) -> [(&'static str, String); 4] {
    let value = |f: fn(&LiveStats) -> String| stats.map(f).unwrap_or_else(|| "—".to_string());
    [
        ("Entries today", value(|s| s.total_entries_today.to_string())),
        ("Unique visitors", value(|s| s.unique_visitors_today.to_string())),
        ("Inside now", value(|s| s.currently_inside.to_string())),
        ("Peak hour", value(|s| s.peak_hour_today.clone())),
    ]
}

pub fn render(frame: &mut Frame, area: Rect, stats: Option<&LiveStats>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(inner);

    for (cell, column) in stat_cells(stats).into_iter().zip(columns.iter()) {
        let (label, value) = cell;
        let line = Line::from(vec![
            Span::styled(format!("{label}: "), theme.text_muted()),
            Span::styled(value, theme.text().add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), *column);
    }
}
