//! Visual theme and color palette

use ratatui::style::{Color, Modifier, Style};

/// Kiosk color palette
pub struct Theme {
    // Branding
    pub brand: Color,
    pub brand_accent: Color,
    pub background: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub selection: Color,
    pub hover: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            brand: Color::Rgb(30, 136, 229),        // #1E88E5
            brand_accent: Color::Rgb(100, 181, 246), // #64B5F6
            background: Color::Rgb(18, 24, 33),     // #121821

            success: Color::Rgb(76, 175, 80), // #4CAF50
            warning: Color::Rgb(255, 152, 0), // #FF9800
            danger: Color::Rgb(244, 67, 54),  // #F44336

            border: Color::Rgb(66, 66, 66),            // #424242
            border_focused: Color::Rgb(100, 181, 246), // #64B5F6
            text_primary: Color::Rgb(250, 250, 250),   // #FAFAFA
            text_secondary: Color::Rgb(189, 189, 189), // #BDBDBD
            text_muted: Color::Rgb(117, 117, 117),     // #757575
            selection: Color::Rgb(30, 136, 229),       // #1E88E5
            hover: Color::Rgb(55, 71, 79),             // #37474F
        }
    }
}

impl Theme {
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    pub fn logo(&self, scaled: bool) -> Style {
        if scaled {
            Style::default()
                .fg(self.brand_accent)
                .add_modifier(Modifier::BOLD)
        } else {
            self.title()
        }
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn danger(&self) -> Style {
        Style::default().fg(self.danger).add_modifier(Modifier::BOLD)
    }

    /// Picker option style: committed selection beats hover
    pub fn option(&self, selected: bool, hovered: bool) -> Style {
        if selected {
            Style::default()
                .bg(self.selection)
                .fg(self.text_primary)
                .add_modifier(Modifier::BOLD)
        } else if hovered {
            Style::default().bg(self.hover).fg(self.text_primary)
        } else {
            Style::default().fg(self.text_secondary)
        }
    }

    pub fn input(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.text_primary).bg(self.background)
        } else {
            Style::default().fg(self.text_secondary).bg(self.background)
        }
    }

    pub fn button(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
                .bg(self.brand)
                .fg(self.text_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(self.border).fg(self.text_muted)
        }
    }
}
