//! Terminal implementation of the kiosk surface

use std::time::Duration;

use kiosk_core::{Highlight, KioskView, Panel, Picker, Scheduled};
use tokio::sync::mpsc;

use super::events::Event;
use super::state::KioskScreen;

/// Applies flow effects to the kiosk screen state
///
/// Deferred transitions become spawned sleeps that post [`Event::Deferred`];
/// the controller drops any that belong to an abandoned flow.
pub struct TerminalView<'a> {
    screen: &'a mut KioskScreen,
    events: &'a mpsc::UnboundedSender<Event>,
}

impl<'a> TerminalView<'a> {
    pub fn new(screen: &'a mut KioskScreen, events: &'a mpsc::UnboundedSender<Event>) -> Self {
        Self { screen, events }
    }
}

impl KioskView for TerminalView<'_> {
    fn render_options(&mut self, picker: Picker, options: &[String]) {
        match picker {
            Picker::Role => self.screen.role_options = options.to_vec(),
            Picker::Reason => self.screen.reason_options = options.to_vec(),
        }
    }

    fn highlight(&mut self, picker: Picker, highlight: Highlight) {
        match picker {
            Picker::Role => self.screen.role_highlight = highlight,
            Picker::Reason => self.screen.reason_highlight = highlight,
        }
    }

    fn show_panel(&mut self, panel: Option<Panel>) {
        self.screen.panel = panel;
        if panel != Some(Panel::Enrollment) {
            self.screen.enrollment_focused = false;
        }
    }

    fn set_logo_scaled(&mut self, scaled: bool) {
        self.screen.logo_scaled = scaled;
    }

    fn focus_enrollment(&mut self) {
        self.screen.enrollment_focused = true;
    }

    fn set_enrollment_value(&mut self, value: &str) {
        self.screen.enrollment_value.clear();
        self.screen.enrollment_value.push_str(value);
    }

    fn set_enrollment_error(&mut self, message: Option<&str>) {
        self.screen.enrollment_error = message.map(str::to_string);
    }

    fn schedule(&mut self, after: Duration, scheduled: Scheduled) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // Receiver is gone once the app has quit
            let _ = events.send(Event::Deferred(scheduled));
        });
    }
}
