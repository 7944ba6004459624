//! Toast notification component

use kiosk_core::ToastKind;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::ui::Theme;

/// Ticks a toast stays up (4 s at the 250 ms tick rate)
pub const TOAST_TICKS: u64 = 16;

/// Toast notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Message to display
    pub message: String,
    pub kind: ToastKind,
    /// Remaining ticks until dismissal
    pub ttl: u64,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            ttl: TOAST_TICKS,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    /// Check if notification should be dismissed
    pub fn is_expired(&self) -> bool {
        self.ttl == 0
    }

    /// Decrement TTL
    pub fn tick(&mut self) {
        self.ttl = self.ttl.saturating_sub(1);
    }

    pub fn icon(&self) -> &'static str {
        match self.kind {
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
        }
    }

    /// Render at the top-right of `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let style = match self.kind {
            ToastKind::Success => theme.success(),
            ToastKind::Error => theme.danger(),
        };

        let width = (self.message.width() as u16 + 6).min(area.width.saturating_sub(2)).min(60);
        let height = 3;
        let x = area.x + area.width.saturating_sub(width + 2);
        let y = area.y + 1;

        let toast_area = Rect::new(x, y, width, height.min(area.height));

        frame.render_widget(Clear, toast_area);

        let block = Block::default().borders(Borders::ALL).border_style(style);
        let content = Paragraph::new(format!("{} {}", self.icon(), self.message))
            .style(style)
            .alignment(Alignment::Center)
            .block(block);

        frame.render_widget(content, toast_area);
    }
}
