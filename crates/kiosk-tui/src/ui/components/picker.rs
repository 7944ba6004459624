//! Vertical option picker used for roles and reasons

use kiosk_core::Picker;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Hit, HitMap, KioskScreen};
use crate::ui::layout::section_block;
use crate::ui::Theme;

/// Render the options, one row each, and record their click regions
pub fn render(
    frame: &mut Frame,
    area: Rect,
    picker: Picker,
    title: &str,
    screen: &KioskScreen,
    theme: &Theme,
    hits: &mut HitMap,
) {
    let options = screen.options(picker);
    let highlight = screen.highlight(picker);
    let block = section_block(title, true, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (index, option) in options.iter().enumerate() {
        let row = inner.y + index as u16;
        if row >= inner.y + inner.height {
            break;
        }
        let row_area = Rect::new(inner.x, row, inner.width, 1);
        let selected = highlight.selected == Some(index);
        let hovered = highlight.hovered == Some(index);
        let marker = if selected { "▶ " } else { "  " };

        let line = Paragraph::new(format!("{marker}{option}")).style(theme.option(selected, hovered));
        frame.render_widget(line, row_area);
        hits.insert(Hit::Option(picker, index), row_area);
    }
}

/// Rows needed to show every option inside a bordered block
pub fn height(options: &[String]) -> u16 {
    options.len() as u16 + 2
}
