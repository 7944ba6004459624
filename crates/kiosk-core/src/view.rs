//! Capability interface between the flow logic and a rendering surface

use std::time::Duration;

use crate::selection::Highlight;

/// Option lists the kiosk shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Picker {
    Role,
    Reason,
}

/// Panels inside the login panel; at most one is visible
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    Role,
    Enrollment,
    Reason,
}

/// Transitions that run after an animation delay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// Logo finished scaling up; show the role panel
    RevealRolePanel,
    /// Role click highlight has rendered; move to code entry
    AdvanceToEnrollment,
    /// Reason click highlight has rendered; submit
    SubmitReason,
    /// Panel has slid away; scale the logo back down
    RestoreLogo,
}

/// A deferred transition stamped with the flow generation that scheduled it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub generation: u64,
    pub task: Deferred,
}

/// Everything the flow controller may ask of a surface.
///
/// The surface reports user actions back through the controller's
/// operations; a click on a picker option is the `onSelect` path and goes
/// through `FlowController::click_option`.
pub trait KioskView {
    fn render_options(&mut self, picker: Picker, options: &[String]);

    fn highlight(&mut self, picker: Picker, highlight: Highlight);

    /// Show one panel, or hide the login panel altogether with `None`
    fn show_panel(&mut self, panel: Option<Panel>);

    fn set_logo_scaled(&mut self, scaled: bool);

    fn focus_enrollment(&mut self);

    fn set_enrollment_value(&mut self, value: &str);

    fn set_enrollment_error(&mut self, message: Option<&str>);

    /// Call `FlowController::fire(scheduled)` once `after` has elapsed
    fn schedule(&mut self, after: Duration, scheduled: Scheduled);
}
