//! List selection panels for roles and reasons

use crate::error::{KioskError, Result};

/// What the option list should currently draw
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    /// Option drawn as selected; hidden while another option is hovered
    pub selected: Option<usize>,
    /// Option under the pointer
    pub hovered: Option<usize>,
}

/// Single-choice option list with hover preview
///
/// The committed index only moves through [`select`](Self::select),
/// [`next`](Self::next) and [`previous`](Self::previous). Hovering is a
/// preview and never commits.
#[derive(Clone, Debug)]
pub struct SelectionPanel {
    options: Vec<String>,
    selected: usize,
    hovered: Option<usize>,
}

impl SelectionPanel {
    /// Create a panel; `name` identifies the list in the error
    pub fn new(name: &'static str, options: Vec<String>) -> Result<Self> {
        if options.is_empty() {
            return Err(KioskError::EmptyOptions(name));
        }
        Ok(Self {
            options,
            selected: 0,
            hovered: None,
        })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Label of the committed option
    pub fn selected(&self) -> &str {
        &self.options[self.selected]
    }

    pub fn hover_enter(&mut self, index: usize) -> Highlight {
        if index < self.options.len() {
            self.hovered = Some(index);
        }
        self.highlight()
    }

    pub fn hover_leave(&mut self, index: usize) -> Highlight {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
        self.highlight()
    }

    /// Commit `index`; returns false when it is out of range
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.options.len() {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn next(&mut self) -> usize {
        self.selected = (self.selected + 1) % self.options.len();
        self.selected
    }

    pub fn previous(&mut self) -> usize {
        let len = self.options.len();
        self.selected = (self.selected + len - 1) % len;
        self.selected
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.hovered = None;
    }

    pub fn highlight(&self) -> Highlight {
        Highlight {
            selected: match self.hovered {
                Some(_) => None,
                None => Some(self.selected),
            },
            hovered: self.hovered,
        }
    }
}
