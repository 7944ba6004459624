//! Activating logo

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::ui::Theme;

const LOGO_LARGE: &str = r#"
╔═══════════════════════════════╗
║     ▄▄▄  ▄▄▄▄▄  ▄▄▄▄          ║
║    █   █   █   █    █         ║
║    █▀▀▀█   █   █              ║
║    █   █   █    ▀▄▄▀  ◆       ║
║                               ║
║   LIBRARY  ATTENDANCE KIOSK   ║
╚═══════════════════════════════╝
"#;

const LOGO_SMALL: &str = r#"
╔═══════════════════╗
║  ◆  ATTENDANCE    ║
╚═══════════════════╝
"#;

const PROMPT: &str = "Press Enter or click to check in";

fn art(scaled: bool) -> Vec<&'static str> {
    let logo = if scaled { LOGO_LARGE } else { LOGO_SMALL };
    logo.lines().filter(|l| !l.is_empty()).collect()
}

/// Size of the logo block, prompt line included when idle
pub fn size(scaled: bool) -> (u16, u16) {
    let lines = art(scaled);
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    let height = lines.len() as u16;
    if scaled {
        (width, height)
    } else {
        (width.max(PROMPT.width() as u16), height + 2)
    }
}

/// Render the logo centered in `area`; returns the clickable region
pub fn render(frame: &mut Frame, area: Rect, scaled: bool, theme: &Theme) -> Rect {
    let lines = art(scaled);
    let (width, height) = size(scaled);
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let region = Rect::new(x, y, width, height);

    let mut text: Vec<Line> = lines
        .into_iter()
        .map(|l| Line::styled(l, theme.logo(scaled)))
        .collect();
    if !scaled {
        text.push(Line::raw(""));
        text.push(Line::styled(PROMPT, theme.text_muted()));
    }

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), region);
    region
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_logo_is_larger() {
        let (small_w, _) = size(false);
        let (_, large_h) = size(true);
        assert!(large_h > art(false).len() as u16);
        assert_eq!(small_w, PROMPT.width() as u16);
    }
}
