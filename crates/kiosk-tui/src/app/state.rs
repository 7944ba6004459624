//! Application state

use kiosk_core::{Highlight, LiveStats, Panel, Picker};
use ratatui::layout::Rect;

use crate::auth::LoginForm;
use crate::ui::components::notification::Notification;
use crate::ui::Theme;

/// Current screen/view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Terminal login overlay
    #[default]
    Login,

    /// Check-in kiosk
    Kiosk,
}

/// What the flow controller has asked the kiosk screen to show
#[derive(Debug, Clone, Default)]
pub struct KioskScreen {
    pub role_options: Vec<String>,
    pub reason_options: Vec<String>,
    pub role_highlight: Highlight,
    pub reason_highlight: Highlight,
    pub panel: Option<Panel>,
    pub logo_scaled: bool,
    pub enrollment_focused: bool,
    pub enrollment_value: String,
    pub enrollment_error: Option<String>,
    /// Digits expected for the selected role
    pub code_len: usize,
    /// A check-status request is outstanding
    pub busy: bool,
}

impl KioskScreen {
    pub fn options(&self, picker: Picker) -> &[String] {
        match picker {
            Picker::Role => &self.role_options,
            Picker::Reason => &self.reason_options,
        }
    }

    pub fn highlight(&self, picker: Picker) -> Highlight {
        match picker {
            Picker::Role => self.role_highlight,
            Picker::Reason => self.reason_highlight,
        }
    }
}

/// Clickable element under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Logo,
    Submit,
    Option(Picker, usize),
}

/// Screen regions recorded during the last draw
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Hit, Rect)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn insert(&mut self, hit: Hit, area: Rect) {
        self.regions.push((hit, area));
    }

    /// Topmost region containing the cell
    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        self.regions
            .iter()
            .rev()
            .find(|(_, area)| {
                column >= area.x
                    && column < area.x.saturating_add(area.width)
                    && row >= area.y
                    && row < area.y.saturating_add(area.height)
            })
            .map(|(hit, _)| *hit)
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    pub screen: Screen,
    pub theme: Theme,
    pub kiosk: KioskScreen,
    pub login: LoginForm,
    /// Error or countdown line under the login fields
    pub login_message: Option<String>,
    pub login_pending: bool,
    pub locked: bool,
    /// Last successful poll; kept on screen when later polls fail
    pub stats: Option<LiveStats>,
    pub toast: Option<Notification>,
    pub hits: HitMap,
    /// Option currently under the mouse pointer
    pub hovered: Option<(Picker, usize)>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
