//! Terminal login overlay

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::auth::LoginField;
use crate::ui::layout::{centered_rect_fixed, section_block};

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let dialog = centered_rect_fixed(52, 17, area);

    let border = if state.locked {
        theme.danger()
    } else {
        theme.border_focused()
    };
    let block = Block::default()
        .title(" Kiosk Login ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(border);

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Instructions
            Constraint::Length(3), // ID
            Constraint::Length(3), // Password
            Constraint::Length(2), // Message
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let instructions = Paragraph::new("Sign in to open this terminal for check-ins")
        .style(theme.text_secondary())
        .alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[0]);

    let form = &state.login;
    let id_focused = form.focus == LoginField::Id && !state.locked;
    let id = Paragraph::new(form.id.as_str())
        .style(theme.input(id_focused))
        .block(section_block("ID", id_focused, theme));
    frame.render_widget(id, chunks[1]);

    let pass_focused = form.focus == LoginField::Password && !state.locked;
    let password = Paragraph::new(form.masked_password())
        .style(theme.input(pass_focused))
        .block(section_block("Password", pass_focused, theme));
    frame.render_widget(password, chunks[2]);

    if !state.locked {
        let field = if id_focused { chunks[1] } else { chunks[2] };
        let typed = if id_focused {
            form.id.chars().count()
        } else {
            form.password.chars().count()
        };
        let len = typed as u16;
        frame.set_cursor_position(Position::new(
            (field.x + 1 + len).min(field.right().saturating_sub(2)),
            field.y + 1,
        ));
    }

    let message = if state.login_pending {
        Some(("Signing in…", theme.text_secondary()))
    } else {
        state.login_message.as_deref().map(|m| {
            let style = if state.locked {
                theme.warning()
            } else {
                theme.danger()
            };
            (m, style)
        })
    };
    if let Some((text, style)) = message {
        let line = Paragraph::new(text).style(style).alignment(Alignment::Center);
        frame.render_widget(line, chunks[3]);
    }

    let help = Paragraph::new("[Tab] Switch field   [Enter] Sign in   [Ctrl+C] Quit")
        .style(theme.text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);
}
