//! Terminal login overlay input

mod countdown;

pub use countdown::LockoutCountdown;

use zeroize::Zeroizing;

/// Longest value accepted in either login field
pub const MAX_FIELD_LEN: usize = 64;

/// Which login field receives typed characters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Id,
    Password,
}

/// Contents of the login overlay
#[derive(Default)]
pub struct LoginForm {
    pub id: String,
    /// Wiped on drop and on clear
    pub password: Zeroizing<String>,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tab / Shift+Tab
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Id => LoginField::Password,
            LoginField::Password => LoginField::Id,
        };
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Id => &mut self.id,
            LoginField::Password => &mut *self.password,
        }
    }

    pub fn push(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let field = self.field_mut();
        if field.chars().count() < MAX_FIELD_LEN {
            field.push(c);
        }
    }

    /// Bracketed paste into the focused field; stops at the first newline
    pub fn paste(&mut self, text: &str) {
        for c in text.chars().take_while(|c| *c != '\n' && *c != '\r') {
            self.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    /// Password as dots
    pub fn masked_password(&self) -> String {
        "•".repeat(self.password.chars().count())
    }

    /// After a rejected attempt the password is cleared and refocused
    pub fn clear_password(&mut self) {
        self.password.clear();
        self.focus = LoginField::Password;
    }

    pub fn clear(&mut self) {
        self.id.clear();
        self.password.clear();
        self.focus = LoginField::Id;
    }
}
