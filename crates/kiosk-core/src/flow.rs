//! Check-in step state machine
//!
//! ```text
//!  Idle ──Enter/logo──▶ RoleSelect ──Enter/click──▶ EnrollmentEntry ──Enter/Submit──▶ check-status
//!   ▲                                                                                   │
//!   │                        ┌──────────── reason required ◀───────────── success ◀─────┤
//!   │                        ▼                                                          │
//!   │                  ReasonSelect ──Enter/click──▶ Terminal::WithReason               │
//!   │                                                                                   ▼
//!   └──────────── Escape (any active step), or after either terminal ◀── Terminal::Direct
//! ```
//!
//! The controller owns every piece of flow state. A surface drives it through
//! the public operations and receives effects through [`KioskView`]. Network
//! work is handed back as [`Outbound`] requests; results come back through
//! [`FlowController::resolve_status`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{StatusCheck, StatusReply, SubmissionPayload};
use crate::enrollment::EnrollmentInput;
use crate::error::{KioskError, Result};
use crate::selection::SelectionPanel;
use crate::view::{Deferred, KioskView, Panel, Picker, Scheduled};

/// Logo scale-up before the role panel appears
pub const REVEAL_DELAY: Duration = Duration::from_millis(400);

/// Time for a clicked option's highlight to render
pub const SELECT_DELAY: Duration = Duration::from_millis(200);

/// Panel slide-out before the logo scales back
pub const RESTORE_DELAY: Duration = Duration::from_millis(500);

/// Fallback when the backend rejects without a message
pub const REJECTED_FALLBACK: &str = "Invalid user or role.";

/// Shown when a check-status call fails in transport
pub const SYSTEM_ERROR: &str = "System error. Please try again.";

/// Current stage of the check-in flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FlowStep {
    #[default]
    Idle = 0,
    RoleSelect = 1,
    EnrollmentEntry = 2,
    ReasonSelect = 3,
}

impl FlowStep {
    pub fn is_active(self) -> bool {
        self != FlowStep::Idle
    }
}

/// Keys the kiosk listens to globally
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KioskKey {
    Enter,
    Escape,
    Up,
    Down,
}

/// Identifies one check-status request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// The two ways a flow can end in a submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminal {
    /// Role and code only, straight after a successful check-status
    Direct,
    /// Role, reason and code, after the reason panel
    WithReason,
}

/// When a successful check-status detours through the reason panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonPolicy {
    /// Never ask; the backend records its default reason
    #[default]
    Never,
    /// Ask only when the person is checking in
    OnEntry,
    /// Ask on every check-in and check-out
    Always,
}

impl ReasonPolicy {
    /// Precondition for [`Terminal::WithReason`]
    pub fn requires_reason(self, reply: &StatusReply) -> bool {
        match self {
            ReasonPolicy::Never => false,
            // Unknown presence is treated as an entry
            ReasonPolicy::OnEntry => !reply.user_inside.unwrap_or(false),
            ReasonPolicy::Always => true,
        }
    }

    /// Which terminal a successful reply leads to
    pub fn terminal_for(self, reply: &StatusReply) -> Terminal {
        if self.requires_reason(reply) {
            Terminal::WithReason
        } else {
            Terminal::Direct
        }
    }
}

/// Network work requested by the controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outbound {
    /// Confirm the role+code with the backend, then call `resolve_status`
    CheckStatus { ticket: Ticket, check: StatusCheck },
    /// Post the final entry/exit form
    Submit {
        terminal: Terminal,
        payload: SubmissionPayload,
    },
}

/// Owner of the check-in flow state
pub struct FlowController {
    step: FlowStep,
    roles: SelectionPanel,
    reasons: SelectionPanel,
    code: EnrollmentInput,
    reason_policy: ReasonPolicy,
    error: Option<String>,
    /// Bumped whenever the flow is abandoned; stale deferred work is dropped
    generation: u64,
    next_ticket: u64,
    in_flight: Option<Ticket>,
    /// Logo is scaling up and the role panel is about to appear
    revealing: bool,
}

impl FlowController {
    pub fn new(
        roles: Vec<String>,
        reasons: Vec<String>,
        reason_policy: ReasonPolicy,
    ) -> Result<Self> {
        Ok(Self {
            step: FlowStep::Idle,
            roles: SelectionPanel::new("roles", roles)?,
            reasons: SelectionPanel::new("reasons", reasons)?,
            code: EnrollmentInput::new(),
            reason_policy,
            error: None,
            generation: 0,
            next_ticket: 0,
            in_flight: None,
            revealing: false,
        })
    }

    /// Draw the initial idle screen
    pub fn start(&mut self, view: &mut dyn KioskView) {
        view.render_options(Picker::Role, self.roles.options());
        view.render_options(Picker::Reason, self.reasons.options());
        self.reset(view);
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn selected_role(&self) -> &str {
        self.roles.selected()
    }

    pub fn role_index(&self) -> usize {
        self.roles.selected_index()
    }

    pub fn selected_reason(&self) -> &str {
        self.reasons.selected()
    }

    pub fn reason_index(&self) -> usize {
        self.reasons.selected_index()
    }

    pub fn enrollment_code(&self) -> &str {
        self.code.value()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn reason_policy(&self) -> ReasonPolicy {
        self.reason_policy
    }

    /// Global key handler, interpreted by the current step
    pub fn handle_key(&mut self, key: KioskKey, view: &mut dyn KioskView) -> Option<Outbound> {
        match (key, self.step) {
            (KioskKey::Escape, _) => {
                self.cancel(view);
                None
            }
            (KioskKey::Enter, FlowStep::Idle) => {
                self.activate(view);
                None
            }
            (KioskKey::Enter, FlowStep::RoleSelect) => {
                self.advance_to_enrollment(view);
                None
            }
            (KioskKey::Enter, FlowStep::EnrollmentEntry) => self.submit_enrollment(view),
            (KioskKey::Enter, FlowStep::ReasonSelect) => {
                let index = self.reasons.selected_index();
                self.click_option(Picker::Reason, index, view);
                None
            }
            (KioskKey::Down, FlowStep::RoleSelect) => {
                self.roles.next();
                view.highlight(Picker::Role, self.roles.highlight());
                None
            }
            (KioskKey::Up, FlowStep::RoleSelect) => {
                self.roles.previous();
                view.highlight(Picker::Role, self.roles.highlight());
                None
            }
            (KioskKey::Down, FlowStep::ReasonSelect) => {
                self.reasons.next();
                view.highlight(Picker::Reason, self.reasons.highlight());
                None
            }
            (KioskKey::Up, FlowStep::ReasonSelect) => {
                self.reasons.previous();
                view.highlight(Picker::Reason, self.reasons.highlight());
                None
            }
            _ => None,
        }
    }

    /// Click on the activating logo
    pub fn click_logo(&mut self, view: &mut dyn KioskView) {
        if self.step == FlowStep::Idle {
            self.activate(view);
        }
    }

    pub fn hover_enter(&mut self, picker: Picker, index: usize, view: &mut dyn KioskView) {
        if self.picker_is_active(picker) {
            let highlight = self.panel_mut(picker).hover_enter(index);
            view.highlight(picker, highlight);
        }
    }

    pub fn hover_leave(&mut self, picker: Picker, index: usize, view: &mut dyn KioskView) {
        if self.picker_is_active(picker) {
            let highlight = self.panel_mut(picker).hover_leave(index);
            view.highlight(picker, highlight);
        }
    }

    /// Commit an option, then run the picker's completion after [`SELECT_DELAY`]
    pub fn click_option(&mut self, picker: Picker, index: usize, view: &mut dyn KioskView) {
        if !self.picker_is_active(picker) || !self.panel_mut(picker).select(index) {
            return;
        }
        view.highlight(picker, self.panel_mut(picker).highlight());

        let task = match picker {
            Picker::Role => Deferred::AdvanceToEnrollment,
            Picker::Reason => Deferred::SubmitReason,
        };
        view.schedule(SELECT_DELAY, self.stamp(task));
    }

    pub fn click_submit(&mut self, view: &mut dyn KioskView) -> Option<Outbound> {
        if self.step == FlowStep::EnrollmentEntry {
            self.submit_enrollment(view)
        } else {
            None
        }
    }

    /// Input event on the enrollment field carrying its raw contents
    pub fn input_enrollment(&mut self, raw: &str, view: &mut dyn KioskView) {
        if self.step != FlowStep::EnrollmentEntry {
            return;
        }
        let role = self.roles.selected().to_string();
        let value = self.code.apply(raw, &role);
        view.set_enrollment_value(value);
        self.set_error(None, view);
    }

    pub fn backspace_enrollment(&mut self, view: &mut dyn KioskView) {
        if self.step != FlowStep::EnrollmentEntry {
            return;
        }
        let value = self.code.backspace();
        view.set_enrollment_value(value);
        self.set_error(None, view);
    }

    /// Run a deferred transition that has come due
    pub fn fire(&mut self, scheduled: Scheduled, view: &mut dyn KioskView) -> Option<Outbound> {
        if scheduled.generation != self.generation {
            tracing::trace!(task = ?scheduled.task, "dropping stale deferred transition");
            return None;
        }

        match scheduled.task {
            Deferred::RevealRolePanel if self.revealing => {
                self.revealing = false;
                self.step = FlowStep::RoleSelect;
                view.show_panel(Some(Panel::Role));
                view.highlight(Picker::Role, self.roles.highlight());
                None
            }
            Deferred::AdvanceToEnrollment if self.step == FlowStep::RoleSelect => {
                self.advance_to_enrollment(view);
                None
            }
            Deferred::SubmitReason if self.step == FlowStep::ReasonSelect => {
                Some(self.finish(Terminal::WithReason, view))
            }
            Deferred::RestoreLogo if self.step == FlowStep::Idle && !self.revealing => {
                view.set_logo_scaled(false);
                None
            }
            _ => None,
        }
    }

    /// Apply the backend's answer to an earlier [`Outbound::CheckStatus`]
    pub fn resolve_status(
        &mut self,
        ticket: Ticket,
        result: Result<StatusReply>,
        view: &mut dyn KioskView,
    ) -> Option<Outbound> {
        if self.in_flight != Some(ticket) {
            tracing::debug!(?ticket, "discarding check-status reply for abandoned flow");
            return None;
        }
        self.in_flight = None;

        match result {
            Ok(reply) if reply.success => match self.reason_policy.terminal_for(&reply) {
                Terminal::Direct => Some(self.finish(Terminal::Direct, view)),
                Terminal::WithReason => {
                    self.step = FlowStep::ReasonSelect;
                    view.show_panel(Some(Panel::Reason));
                    view.highlight(Picker::Reason, self.reasons.highlight());
                    None
                }
            },
            Ok(reply) => {
                let message = reply
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| REJECTED_FALLBACK.to_string());
                self.reject(KioskError::Rejected(message), view);
                None
            }
            Err(e) => {
                self.reject(e, view);
                None
            }
        }
    }

    /// Stay in enrollment entry and explain why the code was not accepted
    fn reject(&mut self, error: KioskError, view: &mut dyn KioskView) {
        let message = if error.is_system() {
            tracing::error!("check-status failed: {}", error);
            SYSTEM_ERROR.to_string()
        } else {
            tracing::info!(role = %self.roles.selected(), %error, "check-status rejected");
            error.to_string()
        };
        self.set_error(Some(message), view);
    }

    fn activate(&mut self, view: &mut dyn KioskView) {
        if self.revealing {
            return;
        }
        self.revealing = true;
        view.set_logo_scaled(true);
        view.schedule(REVEAL_DELAY, self.stamp(Deferred::RevealRolePanel));
    }

    fn advance_to_enrollment(&mut self, view: &mut dyn KioskView) {
        self.step = FlowStep::EnrollmentEntry;
        view.show_panel(Some(Panel::Enrollment));
        view.focus_enrollment();
    }

    fn submit_enrollment(&mut self, view: &mut dyn KioskView) -> Option<Outbound> {
        if let Some(ticket) = self.in_flight {
            tracing::debug!(?ticket, "check-status already pending; ignoring submit");
            return None;
        }

        let role = self.roles.selected().to_string();
        let code = match self.code.validate(&role) {
            Ok(code) => code.to_string(),
            Err(e) => {
                self.set_error(Some(e.to_string()), view);
                return None;
            }
        };
        self.set_error(None, view);

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        tracing::debug!(?ticket, %role, "requesting check-status");

        Some(Outbound::CheckStatus {
            ticket,
            check: StatusCheck {
                registry_last_digits: code,
                role,
            },
        })
    }

    fn finish(&mut self, terminal: Terminal, view: &mut dyn KioskView) -> Outbound {
        let payload = SubmissionPayload {
            role: self.roles.selected().to_string(),
            enrollment_code: self.code.value().to_string(),
            reason: match terminal {
                Terminal::Direct => None,
                Terminal::WithReason => Some(self.reasons.selected().to_string()),
            },
        };
        tracing::info!(?terminal, role = %payload.role, "submitting check-in");
        self.reset(view);
        Outbound::Submit { terminal, payload }
    }

    fn cancel(&mut self, view: &mut dyn KioskView) {
        if !self.step.is_active() && !self.revealing {
            return;
        }
        if self.in_flight.is_some() {
            tracing::debug!("abandoning flow with check-status in flight");
        }
        self.clear_flow(view);
        view.schedule(RESTORE_DELAY, self.stamp(Deferred::RestoreLogo));
    }

    fn reset(&mut self, view: &mut dyn KioskView) {
        self.clear_flow(view);
        view.set_logo_scaled(false);
    }

    fn clear_flow(&mut self, view: &mut dyn KioskView) {
        self.generation += 1;
        self.in_flight = None;
        self.revealing = false;
        self.step = FlowStep::Idle;
        self.roles.reset();
        self.reasons.reset();
        self.code.clear();

        view.show_panel(None);
        view.highlight(Picker::Role, self.roles.highlight());
        view.highlight(Picker::Reason, self.reasons.highlight());
        view.set_enrollment_value("");
        self.set_error(None, view);
    }

    fn set_error(&mut self, message: Option<String>, view: &mut dyn KioskView) {
        view.set_enrollment_error(message.as_deref());
        self.error = message;
    }

    fn stamp(&self, task: Deferred) -> Scheduled {
        Scheduled {
            generation: self.generation,
            task,
        }
    }

    fn picker_is_active(&self, picker: Picker) -> bool {
        matches!(
            (picker, self.step),
            (Picker::Role, FlowStep::RoleSelect) | (Picker::Reason, FlowStep::ReasonSelect)
        )
    }

    fn panel_mut(&mut self, picker: Picker) -> &mut SelectionPanel {
        match picker {
            Picker::Role => &mut self.roles,
            Picker::Reason => &mut self.reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KioskError;
    use crate::selection::Highlight;

    /// Surface that records what it was asked to do
    #[derive(Default)]
    struct RecordingView {
        panel: Option<Panel>,
        logo_scaled: bool,
        focused: bool,
        value: String,
        error: Option<String>,
        highlights: Vec<(Picker, Highlight)>,
        pending: Vec<(Duration, Scheduled)>,
    }

    impl KioskView for RecordingView {
        fn render_options(&mut self, _picker: Picker, _options: &[String]) {}

        fn highlight(&mut self, picker: Picker, highlight: Highlight) {
            self.highlights.push((picker, highlight));
        }

        fn show_panel(&mut self, panel: Option<Panel>) {
            self.panel = panel;
            if panel.is_none() {
                self.focused = false;
            }
        }

        fn set_logo_scaled(&mut self, scaled: bool) {
            self.logo_scaled = scaled;
        }

        fn focus_enrollment(&mut self) {
            self.focused = true;
        }

        fn set_enrollment_value(&mut self, value: &str) {
            self.value = value.to_string();
        }

        fn set_enrollment_error(&mut self, message: Option<&str>) {
            self.error = message.map(str::to_string);
        }

        fn schedule(&mut self, after: Duration, scheduled: Scheduled) {
            self.pending.push((after, scheduled));
        }
    }

    impl RecordingView {
        fn run_pending(&mut self, flow: &mut FlowController) -> Vec<Outbound> {
            let due: Vec<_> = self.pending.drain(..).collect();
            due.into_iter()
                .filter_map(|(_, scheduled)| flow.fire(scheduled, self))
                .collect()
        }
    }

    fn controller(policy: ReasonPolicy) -> (FlowController, RecordingView) {
        let mut flow = FlowController::new(
            vec!["Student".into(), "Faculty".into(), "Staff".into()],
            vec!["Self Study".into(), "Reference".into()],
            policy,
        )
        .unwrap();
        let mut view = RecordingView::default();
        flow.start(&mut view);
        (flow, view)
    }

    fn open_role_panel(flow: &mut FlowController, view: &mut RecordingView) {
        flow.handle_key(KioskKey::Enter, view);
        view.run_pending(flow);
        assert_eq!(flow.step(), FlowStep::RoleSelect);
    }

    fn enter_code(flow: &mut FlowController, view: &mut RecordingView, role_index: usize, raw: &str) {
        open_role_panel(flow, view);
        flow.click_option(Picker::Role, role_index, view);
        view.run_pending(flow);
        assert_eq!(flow.step(), FlowStep::EnrollmentEntry);
        flow.input_enrollment(raw, view);
    }

    fn ticket_of(outbound: Option<Outbound>) -> Ticket {
        match outbound {
            Some(Outbound::CheckStatus { ticket, .. }) => ticket,
            other => panic!("expected check-status, got {other:?}"),
        }
    }

    #[test]
    fn test_start_is_idle() {
        let (flow, view) = controller(ReasonPolicy::Never);
        assert_eq!(flow.step(), FlowStep::Idle);
        assert_eq!(flow.step() as u8, 0);
        assert_eq!(view.panel, None);
        assert!(!view.logo_scaled);
    }

    #[test]
    fn test_enter_reveals_role_panel_after_delay() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        flow.handle_key(KioskKey::Enter, &mut view);

        assert!(view.logo_scaled);
        assert_eq!(flow.step(), FlowStep::Idle);
        assert_eq!(view.pending[0].0, REVEAL_DELAY);

        view.run_pending(&mut flow);
        assert_eq!(flow.step(), FlowStep::RoleSelect);
        assert_eq!(view.panel, Some(Panel::Role));
    }

    #[test]
    fn test_double_activation_schedules_once() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        flow.click_logo(&mut view);
        flow.handle_key(KioskKey::Enter, &mut view);
        assert_eq!(view.pending.len(), 1);
    }

    #[test]
    fn test_enter_on_role_moves_to_enrollment() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        open_role_panel(&mut flow, &mut view);
        flow.handle_key(KioskKey::Down, &mut view);
        flow.handle_key(KioskKey::Enter, &mut view);

        assert_eq!(flow.step(), FlowStep::EnrollmentEntry);
        assert_eq!(flow.selected_role(), "Faculty");
        assert_eq!(view.panel, Some(Panel::Enrollment));
        assert!(view.focused);
    }

    #[test]
    fn test_role_click_highlights_before_advancing() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        open_role_panel(&mut flow, &mut view);
        flow.click_option(Picker::Role, 2, &mut view);

        assert_eq!(flow.step(), FlowStep::RoleSelect);
        assert_eq!(
            view.highlights.last(),
            Some(&(Picker::Role, Highlight { selected: Some(2), hovered: None }))
        );
        assert_eq!(view.pending[0].0, SELECT_DELAY);

        view.run_pending(&mut flow);
        assert_eq!(flow.step(), FlowStep::EnrollmentEntry);
        assert_eq!(flow.selected_role(), "Staff");
    }

    #[test]
    fn test_arrow_wraparound_on_roles() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        open_role_panel(&mut flow, &mut view);
        flow.handle_key(KioskKey::Up, &mut view);
        assert_eq!(flow.role_index(), 2);
        flow.handle_key(KioskKey::Down, &mut view);
        assert_eq!(flow.role_index(), 0);
    }

    #[test]
    fn test_hover_ignored_when_panel_inactive() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        let before = view.highlights.len();
        flow.hover_enter(Picker::Role, 1, &mut view);
        flow.click_option(Picker::Role, 1, &mut view);
        assert_eq!(view.highlights.len(), before);
        assert_eq!(flow.role_index(), 0);
    }

    #[test]
    fn test_wrong_length_stays_in_enrollment() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        enter_code(&mut flow, &mut view, 0, "1234");

        assert!(flow.handle_key(KioskKey::Enter, &mut view).is_none());
        assert_eq!(flow.step(), FlowStep::EnrollmentEntry);
        assert_eq!(view.error.as_deref(), Some("Please enter exactly 5 digits."));

        // Typing clears the message
        flow.input_enrollment("12345", &mut view);
        assert_eq!(view.error, None);
    }

    #[test]
    fn test_input_ignored_outside_enrollment() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        flow.input_enrollment("1234", &mut view);
        assert_eq!(flow.enrollment_code(), "");
    }

    #[test]
    fn test_direct_terminal_after_success() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        enter_code(&mut flow, &mut view, 2, "12a3b45");
        assert_eq!(view.value, "1234");

        let outbound = flow.click_submit(&mut view);
        let Some(Outbound::CheckStatus { ticket, check }) = outbound else {
            panic!("expected check-status");
        };
        assert_eq!(check.registry_last_digits, "1234");
        assert_eq!(check.role, "Staff");

        let submitted = flow.resolve_status(ticket, Ok(StatusReply::allowed()), &mut view);
        assert_eq!(
            submitted,
            Some(Outbound::Submit {
                terminal: Terminal::Direct,
                payload: SubmissionPayload {
                    role: "Staff".into(),
                    enrollment_code: "1234".into(),
                    reason: None,
                },
            })
        );
        assert_eq!(flow.step(), FlowStep::Idle);
        assert_eq!(flow.role_index(), 0);
        assert!(!view.logo_scaled);
    }

    #[test]
    fn test_resubmit_rejected_while_in_flight() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        enter_code(&mut flow, &mut view, 1, "4321");

        let ticket = ticket_of(flow.handle_key(KioskKey::Enter, &mut view));
        assert!(flow.is_in_flight());
        assert!(flow.handle_key(KioskKey::Enter, &mut view).is_none());
        assert!(flow.click_submit(&mut view).is_none());

        flow.resolve_status(ticket, Ok(StatusReply::denied("No Faculty found with that code.")), &mut view);
        assert!(!flow.is_in_flight());
        assert_eq!(view.error.as_deref(), Some("No Faculty found with that code."));
        assert_eq!(flow.step(), FlowStep::EnrollmentEntry);

        // The user may resubmit once the reply is in
        assert!(flow.handle_key(KioskKey::Enter, &mut view).is_some());
    }

    #[test]
    fn test_rejection_without_message_uses_fallback() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        enter_code(&mut flow, &mut view, 1, "4321");
        let ticket = ticket_of(flow.click_submit(&mut view));

        let reply = StatusReply {
            success: false,
            ..StatusReply::default()
        };
        flow.resolve_status(ticket, Ok(reply), &mut view);
        assert_eq!(flow.error(), Some(REJECTED_FALLBACK));
    }

    #[test]
    fn test_transport_failure_shows_system_error() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        enter_code(&mut flow, &mut view, 1, "4321");
        let ticket = ticket_of(flow.click_submit(&mut view));

        flow.resolve_status(ticket, Err(KioskError::Network("refused".into())), &mut view);
        assert_eq!(flow.error(), Some(SYSTEM_ERROR));
        assert_eq!(flow.step(), FlowStep::EnrollmentEntry);
    }

    #[test]
    fn test_backend_rejection_error_shows_its_message() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        enter_code(&mut flow, &mut view, 1, "4321");
        let ticket = ticket_of(flow.click_submit(&mut view));

        let denied = Err(KioskError::Rejected("Exit denied: not checked in.".into()));
        flow.resolve_status(ticket, denied, &mut view);
        assert_eq!(flow.error(), Some("Exit denied: not checked in."));
        assert_eq!(flow.step(), FlowStep::EnrollmentEntry);
        assert!(!flow.is_in_flight());
    }

    #[test]
    fn test_protocol_failure_shows_system_error() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        enter_code(&mut flow, &mut view, 1, "4321");
        let ticket = ticket_of(flow.click_submit(&mut view));

        flow.resolve_status(ticket, Err(KioskError::Protocol("HTTP 502".into())), &mut view);
        assert_eq!(flow.error(), Some(SYSTEM_ERROR));
    }

    #[test]
    fn test_escape_discards_late_reply() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        enter_code(&mut flow, &mut view, 1, "4321");
        let ticket = ticket_of(flow.click_submit(&mut view));

        flow.handle_key(KioskKey::Escape, &mut view);
        assert_eq!(flow.step(), FlowStep::Idle);
        assert_eq!(view.panel, None);
        assert_eq!(flow.enrollment_code(), "");
        assert!(!flow.is_in_flight());

        assert!(flow
            .resolve_status(ticket, Ok(StatusReply::allowed()), &mut view)
            .is_none());
        assert_eq!(flow.step(), FlowStep::Idle);
    }

    #[test]
    fn test_escape_resets_indices_and_restores_logo_later() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        open_role_panel(&mut flow, &mut view);
        flow.handle_key(KioskKey::Down, &mut view);
        flow.handle_key(KioskKey::Escape, &mut view);

        assert_eq!(flow.role_index(), 0);
        assert_eq!(flow.reason_index(), 0);
        assert!(view.logo_scaled);
        assert_eq!(view.pending[0].0, RESTORE_DELAY);

        view.run_pending(&mut flow);
        assert!(!view.logo_scaled);
    }

    #[test]
    fn test_escape_cancels_pending_role_advance() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        open_role_panel(&mut flow, &mut view);
        flow.click_option(Picker::Role, 1, &mut view);
        flow.handle_key(KioskKey::Escape, &mut view);

        view.run_pending(&mut flow);
        assert_eq!(flow.step(), FlowStep::Idle);
        assert_eq!(view.panel, None);
    }

    #[test]
    fn test_escape_when_idle_is_noop() {
        let (mut flow, mut view) = controller(ReasonPolicy::Never);
        flow.handle_key(KioskKey::Escape, &mut view);
        assert!(view.pending.is_empty());
    }

    #[test]
    fn test_reason_path_when_required() {
        let (mut flow, mut view) = controller(ReasonPolicy::Always);
        enter_code(&mut flow, &mut view, 0, "54321");
        let ticket = ticket_of(flow.handle_key(KioskKey::Enter, &mut view));

        assert!(flow
            .resolve_status(ticket, Ok(StatusReply::allowed()), &mut view)
            .is_none());
        assert_eq!(flow.step(), FlowStep::ReasonSelect);
        assert_eq!(flow.step() as u8, 3);
        assert_eq!(view.panel, Some(Panel::Reason));

        flow.handle_key(KioskKey::Down, &mut view);
        flow.handle_key(KioskKey::Enter, &mut view);
        let submitted = view.run_pending(&mut flow);
        assert_eq!(
            submitted,
            vec![Outbound::Submit {
                terminal: Terminal::WithReason,
                payload: SubmissionPayload {
                    role: "Student".into(),
                    enrollment_code: "54321".into(),
                    reason: Some("Reference".into()),
                },
            }]
        );
        assert_eq!(flow.step(), FlowStep::Idle);
    }

    #[test]
    fn test_double_reason_commit_submits_once() {
        let (mut flow, mut view) = controller(ReasonPolicy::Always);
        enter_code(&mut flow, &mut view, 1, "1111");
        let ticket = ticket_of(flow.click_submit(&mut view));
        flow.resolve_status(ticket, Ok(StatusReply::allowed()), &mut view);

        flow.click_option(Picker::Reason, 0, &mut view);
        flow.click_option(Picker::Reason, 1, &mut view);
        assert_eq!(view.run_pending(&mut flow).len(), 1);
    }

    #[test]
    fn test_reason_policy_precondition() {
        let entering = StatusReply {
            success: true,
            user_inside: Some(false),
            ..StatusReply::default()
        };
        let leaving = StatusReply {
            success: true,
            user_inside: Some(true),
            ..StatusReply::default()
        };

        assert_eq!(ReasonPolicy::Never.terminal_for(&entering), Terminal::Direct);
        assert_eq!(ReasonPolicy::OnEntry.terminal_for(&entering), Terminal::WithReason);
        assert_eq!(ReasonPolicy::OnEntry.terminal_for(&leaving), Terminal::Direct);
        assert_eq!(
            ReasonPolicy::OnEntry.terminal_for(&StatusReply::allowed()),
            Terminal::WithReason
        );
        assert_eq!(ReasonPolicy::Always.terminal_for(&leaving), Terminal::WithReason);
    }

    #[test]
    fn test_reason_policy_config_names() {
        let policy: ReasonPolicy = serde_json::from_str("\"on_entry\"").unwrap();
        assert_eq!(policy, ReasonPolicy::OnEntry);
    }
}
