//! End-to-end check-in tests for the attendance kiosk
//!
//! These tests drive the flow controller and login gate the way the terminal
//! UI does: keys and clicks go in, network requests come out and are answered
//! by a scripted backend, deferred transitions are fired by hand.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone};
use kiosk_core::{
    Backend, Credentials, FileSessionStore, FlowController, FlowStep, Highlight, KioskKey,
    KioskView, LiveStats, LockoutPolicy, LoginGate, LoginOutcome, MemorySessionStore, Outbound,
    Panel, Picker, ReasonPolicy, Scheduled, Session, SessionStore, StatusCheck, StatusReply,
    SubmissionPayload, SubmissionReceipt, Terminal, ToastKind,
};

// ============================================
// Scripted backend
// ============================================

/// Backend with a fixed directory of people and server-side presence
struct ScriptedBackend {
    password: &'static str,
    people: HashMap<(String, String), &'static str>,
    inside: Mutex<HashSet<(String, String)>>,
    submissions: Mutex<Vec<SubmissionPayload>>,
    login_calls: Mutex<u32>,
}

impl ScriptedBackend {
    fn new() -> Self {
        let people = [
            (("Student", "54321"), "Asha"),
            (("Faculty", "4321"), "Dr. Rao"),
            (("Staff", "1234"), "Ravi"),
        ]
        .into_iter()
        .map(|((role, code), name)| ((role.to_string(), code.to_string()), name))
        .collect();

        Self {
            password: "letmein",
            people,
            inside: Mutex::new(HashSet::new()),
            submissions: Mutex::new(Vec::new()),
            login_calls: Mutex::new(0),
        }
    }

    fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn login(&self, credentials: &Credentials) -> kiosk_core::Result<bool> {
        *self.login_calls.lock().unwrap() += 1;
        Ok(credentials.pass == self.password)
    }

    async fn check_status(&self, check: &StatusCheck) -> kiosk_core::Result<StatusReply> {
        let key = (check.role.clone(), check.registry_last_digits.clone());
        Ok(match self.people.get(&key) {
            Some(name) => StatusReply {
                success: true,
                error: None,
                user_name: Some(name.to_string()),
                user_inside: Some(self.inside.lock().unwrap().contains(&key)),
            },
            None => StatusReply::denied(format!("No {} found with that code.", check.role)),
        })
    }

    async fn submit(&self, payload: &SubmissionPayload) -> kiosk_core::Result<SubmissionReceipt> {
        self.submissions.lock().unwrap().push(payload.clone());
        let key = (payload.role.clone(), payload.enrollment_code.clone());
        let mut inside = self.inside.lock().unwrap();
        let message = if inside.remove(&key) {
            "Goodbye!"
        } else {
            inside.insert(key);
            "Welcome!"
        };
        Ok(SubmissionReceipt {
            message: Some(message.to_string()),
            kind: ToastKind::Success,
        })
    }

    async fn live_stats(&self) -> kiosk_core::Result<LiveStats> {
        Ok(LiveStats {
            currently_inside: self.inside.lock().unwrap().len() as u64,
            ..LiveStats::default()
        })
    }
}

// ============================================
// Kiosk harness
// ============================================

#[derive(Default)]
struct ScriptView {
    panel: Option<Panel>,
    logo_scaled: bool,
    value: String,
    error: Option<String>,
    role_highlight: Highlight,
    timers: Vec<(Duration, Scheduled)>,
}

impl KioskView for ScriptView {
    fn render_options(&mut self, _picker: Picker, _options: &[String]) {}

    fn highlight(&mut self, picker: Picker, highlight: Highlight) {
        if picker == Picker::Role {
            self.role_highlight = highlight;
        }
    }

    fn show_panel(&mut self, panel: Option<Panel>) {
        self.panel = panel;
    }

    fn set_logo_scaled(&mut self, scaled: bool) {
        self.logo_scaled = scaled;
    }

    fn focus_enrollment(&mut self) {}

    fn set_enrollment_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn set_enrollment_error(&mut self, message: Option<&str>) {
        self.error = message.map(str::to_string);
    }

    fn schedule(&mut self, after: Duration, scheduled: Scheduled) {
        self.timers.push((after, scheduled));
    }
}

struct Kiosk {
    flow: FlowController,
    view: ScriptView,
    backend: ScriptedBackend,
    receipts: Vec<(Terminal, SubmissionReceipt)>,
}

impl Kiosk {
    fn new(roles: &[&str], policy: ReasonPolicy) -> Self {
        let mut flow = FlowController::new(
            roles.iter().map(|r| r.to_string()).collect(),
            vec!["Self Study".into(), "Reference".into(), "Group Study".into()],
            policy,
        )
        .unwrap();
        let mut view = ScriptView::default();
        flow.start(&mut view);
        Self {
            flow,
            view,
            backend: ScriptedBackend::new(),
            receipts: Vec::new(),
        }
    }

    async fn key(&mut self, key: KioskKey) {
        let outbound = self.flow.handle_key(key, &mut self.view);
        self.perform(outbound).await;
    }

    async fn click_submit(&mut self) {
        let outbound = self.flow.click_submit(&mut self.view);
        self.perform(outbound).await;
    }

    fn type_raw(&mut self, raw: &str) {
        self.flow.input_enrollment(raw, &mut self.view);
    }

    /// Fire every pending deferred transition as if its delay had elapsed
    async fn elapse(&mut self) {
        while !self.view.timers.is_empty() {
            let due: Vec<_> = self.view.timers.drain(..).collect();
            for (_, scheduled) in due {
                let outbound = self.flow.fire(scheduled, &mut self.view);
                self.perform(outbound).await;
            }
        }
    }

    /// Answer requests the way the terminal's background tasks do
    async fn perform(&mut self, mut outbound: Option<Outbound>) {
        while let Some(request) = outbound.take() {
            match request {
                Outbound::CheckStatus { ticket, check } => {
                    let result = self.backend.check_status(&check).await;
                    outbound = self.flow.resolve_status(ticket, result, &mut self.view);
                }
                Outbound::Submit { terminal, payload } => {
                    let receipt = self.backend.submit(&payload).await.unwrap();
                    self.receipts.push((terminal, receipt));
                }
            }
        }
    }

    async fn open_roles(&mut self) {
        self.key(KioskKey::Enter).await;
        self.elapse().await;
        assert_eq!(self.flow.step(), FlowStep::RoleSelect);
    }

    async fn visit(&mut self, role_index: usize, code: &str) {
        self.open_roles().await;
        self.flow.click_option(Picker::Role, role_index, &mut self.view);
        self.elapse().await;
        self.type_raw(code);
        self.key(KioskKey::Enter).await;
    }
}

// ============================================
// Check-in flows
// ============================================

#[tokio::test]
async fn test_staff_check_in_by_keyboard() {
    let mut kiosk = Kiosk::new(&["Student", "Faculty", "Staff"], ReasonPolicy::Never);

    // Idle -> RoleSelect after the reveal delay
    kiosk.key(KioskKey::Enter).await;
    assert!(kiosk.view.logo_scaled);
    assert_eq!(kiosk.flow.step(), FlowStep::Idle);
    kiosk.elapse().await;
    assert_eq!(kiosk.view.panel, Some(Panel::Role));

    kiosk.key(KioskKey::Down).await;
    kiosk.key(KioskKey::Down).await;
    kiosk.key(KioskKey::Enter).await;
    assert_eq!(kiosk.flow.step(), FlowStep::EnrollmentEntry);
    assert_eq!(kiosk.flow.selected_role(), "Staff");

    kiosk.type_raw("12a3b45");
    assert_eq!(kiosk.view.value, "1234");

    kiosk.key(KioskKey::Enter).await;

    assert_eq!(
        kiosk.backend.submissions(),
        vec![SubmissionPayload {
            role: "Staff".into(),
            enrollment_code: "1234".into(),
            reason: None,
        }]
    );
    assert_eq!(kiosk.receipts[0].0, Terminal::Direct);
    assert_eq!(kiosk.receipts[0].1.message.as_deref(), Some("Welcome!"));
    assert_eq!(kiosk.flow.step(), FlowStep::Idle);
    assert_eq!(kiosk.view.panel, None);
    assert!(!kiosk.view.logo_scaled);
    assert_eq!(kiosk.flow.role_index(), 0);
}

#[tokio::test]
async fn test_student_needs_five_digits() {
    let mut kiosk = Kiosk::new(&["Student", "Faculty"], ReasonPolicy::Never);
    kiosk.visit(0, "5432").await;

    assert_eq!(kiosk.flow.step(), FlowStep::EnrollmentEntry);
    assert_eq!(kiosk.view.error.as_deref(), Some("Please enter exactly 5 digits."));
    assert!(kiosk.backend.submissions().is_empty());

    kiosk.type_raw("54321");
    assert_eq!(kiosk.view.error, None);
    kiosk.click_submit().await;
    assert_eq!(kiosk.backend.submissions().len(), 1);
    assert_eq!(kiosk.flow.step(), FlowStep::Idle);
}

#[tokio::test]
async fn test_input_is_capped_for_student() {
    let mut kiosk = Kiosk::new(&["Student", "Faculty"], ReasonPolicy::Never);
    kiosk.open_roles().await;
    kiosk.key(KioskKey::Enter).await;

    kiosk.type_raw("9a8b7c6d5e4");
    assert_eq!(kiosk.view.value, "98765");
}

#[tokio::test]
async fn test_unknown_code_shows_backend_message() {
    let mut kiosk = Kiosk::new(&["Student", "Faculty"], ReasonPolicy::Never);
    kiosk.visit(1, "9999").await;

    assert_eq!(kiosk.flow.step(), FlowStep::EnrollmentEntry);
    assert_eq!(kiosk.view.error.as_deref(), Some("No Faculty found with that code."));
    assert!(kiosk.backend.submissions().is_empty());

    // Correcting the code and resubmitting works without leaving the panel
    kiosk.type_raw("4321");
    kiosk.key(KioskKey::Enter).await;
    assert_eq!(kiosk.backend.submissions().len(), 1);
}

#[tokio::test]
async fn test_reason_asked_on_entry_only() {
    let mut kiosk = Kiosk::new(&["Student", "Faculty"], ReasonPolicy::OnEntry);

    // Entry: detour through the reason panel
    kiosk.visit(0, "54321").await;
    assert_eq!(kiosk.flow.step(), FlowStep::ReasonSelect);
    assert_eq!(kiosk.view.panel, Some(Panel::Reason));

    kiosk.key(KioskKey::Down).await;
    kiosk.key(KioskKey::Enter).await;
    kiosk.elapse().await;

    // Exit: straight to the direct submission
    kiosk.visit(0, "54321").await;

    let submissions = kiosk.backend.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].reason.as_deref(), Some("Reference"));
    assert_eq!(submissions[1].reason, None);
    assert_eq!(kiosk.receipts[0].0, Terminal::WithReason);
    assert_eq!(kiosk.receipts[1].0, Terminal::Direct);
    assert_eq!(kiosk.receipts[1].1.message.as_deref(), Some("Goodbye!"));
}

#[tokio::test]
async fn test_reason_click_submits_once() {
    let mut kiosk = Kiosk::new(&["Student", "Faculty"], ReasonPolicy::Always);
    kiosk.visit(1, "4321").await;
    assert_eq!(kiosk.flow.step(), FlowStep::ReasonSelect);

    kiosk.flow.click_option(Picker::Reason, 2, &mut kiosk.view);
    kiosk.flow.click_option(Picker::Reason, 2, &mut kiosk.view);
    kiosk.elapse().await;

    let submissions = kiosk.backend.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].reason.as_deref(), Some("Group Study"));
}

#[tokio::test]
async fn test_escape_drops_late_status_reply() {
    let mut kiosk = Kiosk::new(&["Student", "Faculty", "Staff"], ReasonPolicy::Never);
    kiosk.open_roles().await;
    kiosk.flow.click_option(Picker::Role, 2, &mut kiosk.view);
    kiosk.elapse().await;
    kiosk.type_raw("1234");

    // Hold the request instead of answering it
    let Some(Outbound::CheckStatus { ticket, check }) =
        kiosk.flow.handle_key(KioskKey::Enter, &mut kiosk.view)
    else {
        panic!("expected a check-status request");
    };
    assert!(kiosk.flow.handle_key(KioskKey::Enter, &mut kiosk.view).is_none());

    kiosk.key(KioskKey::Escape).await;
    assert_eq!(kiosk.flow.step(), FlowStep::Idle);
    assert_eq!(kiosk.view.value, "");

    let late = kiosk.backend.check_status(&check).await;
    assert!(kiosk.flow.resolve_status(ticket, late, &mut kiosk.view).is_none());
    assert!(kiosk.backend.submissions().is_empty());

    kiosk.elapse().await;
    assert!(!kiosk.view.logo_scaled);
}

#[tokio::test]
async fn test_hover_previews_without_committing() {
    let mut kiosk = Kiosk::new(&["Student", "Faculty", "Staff"], ReasonPolicy::Never);
    kiosk.open_roles().await;

    kiosk.flow.hover_enter(Picker::Role, 2, &mut kiosk.view);
    assert_eq!(kiosk.view.role_highlight, Highlight { selected: None, hovered: Some(2) });
    kiosk.flow.hover_leave(Picker::Role, 2, &mut kiosk.view);
    assert_eq!(kiosk.view.role_highlight, Highlight { selected: Some(0), hovered: None });

    kiosk.key(KioskKey::Up).await;
    assert_eq!(kiosk.flow.role_index(), 2);
}

// ============================================
// Login gating
// ============================================

fn morning() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let backend = ScriptedBackend::new();
    let now = morning();

    let mut gate = LoginGate::new(FileSessionStore::new(&path), LockoutPolicy::default());
    assert!(!gate.restore(now));
    let credentials = gate.begin("front-desk", "letmein", now).unwrap();
    let accepted = backend.login(&credentials).await;
    assert_eq!(gate.resolve(accepted, now), LoginOutcome::Authenticated);

    // A new process on the same day skips the overlay
    let mut restarted = LoginGate::new(FileSessionStore::new(&path), LockoutPolicy::default());
    assert!(restarted.restore(now + TimeDelta::seconds(1)));
    assert_eq!(
        restarted.session().current().map(|s| s.identity.as_str()),
        Some("front-desk")
    );
}

#[test]
fn test_yesterdays_session_requires_login() {
    let now = morning();
    let store = MemorySessionStore::with_session(Session::ending_today(
        "front-desk",
        now - TimeDelta::days(1),
    ));
    let mut gate = LoginGate::new(store, LockoutPolicy::default());
    assert!(!gate.restore(now));
}

#[test]
fn test_corrupt_session_file_requires_login() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = FileSessionStore::new(&path);
    assert!(store.load().is_err());
    let mut gate = LoginGate::new(store, LockoutPolicy::default());
    assert!(!gate.restore(morning()));
}

#[tokio::test]
async fn test_lockout_blocks_backend_until_window_passes() {
    let backend = ScriptedBackend::new();
    let mut gate = LoginGate::new(MemorySessionStore::new(), LockoutPolicy::default());
    let start = morning();

    for attempt in 1..=5 {
        let credentials = gate.begin("front-desk", "guess", start).unwrap();
        let outcome = gate.resolve(backend.login(&credentials).await, start);
        if attempt < 5 {
            assert_eq!(outcome, LoginOutcome::Rejected { lockout_until: None });
            assert_eq!(gate.message(), Some("Invalid credentials."));
        } else {
            assert_eq!(
                outcome,
                LoginOutcome::Rejected {
                    lockout_until: Some(start + TimeDelta::minutes(15))
                }
            );
        }
    }

    let during = start + TimeDelta::seconds(30);
    assert!(gate.begin("front-desk", "letmein", during).is_err());
    assert_eq!(gate.message(), Some("Locked out. Try again in 870 seconds."));
    assert_eq!(*backend.login_calls.lock().unwrap(), 5);

    // The countdown task releases the lockout when the window elapses
    gate.release_lockout();
    let after = start + TimeDelta::minutes(15);
    let credentials = gate.begin("front-desk", "letmein", after).unwrap();
    let outcome = gate.resolve(backend.login(&credentials).await, after);
    assert_eq!(outcome, LoginOutcome::Authenticated);
    assert!(gate.is_authenticated());
}
