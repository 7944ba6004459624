//! Application state and event handling

mod config;
mod events;
mod state;
mod view;

pub use config::{ConfigError, KioskConfig};
pub use events::{Event, EventHandler};
pub use state::{AppState, Hit, HitMap, KioskScreen, Screen};
pub use view::TerminalView;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{
    Event as TerminalEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use kiosk_core::{
    required_code_len, Backend, FlowController, KioskKey, LoginGate, LoginOutcome, Outbound,
    Panel, Picker, SessionStore,
};
use ratatui::Terminal;
use tokio::task::JoinHandle;

use crate::auth::LockoutCountdown;
use crate::ui;
use crate::ui::components::notification::Notification;

/// Redraw interval; drives the clock and toast expiry
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// Toast when the final submission could not be delivered
pub const SUBMIT_FAILED: &str = "Could not record attendance. Please try again.";

/// Main application struct
pub struct App<S: SessionStore> {
    /// Application state
    pub state: AppState,

    /// Whether the app should quit
    pub should_quit: bool,

    flow: FlowController,
    gate: LoginGate<S>,
    backend: Arc<dyn Backend>,
    events: EventHandler,
    countdown: LockoutCountdown,
    stats_interval: Duration,
    stats_task: Option<JoinHandle<()>>,
}

impl<S: SessionStore> App<S> {
    /// Create a new application instance
    pub fn new(
        config: &KioskConfig,
        backend: Arc<dyn Backend>,
        store: S,
    ) -> Result<Self, ConfigError> {
        let flow = FlowController::new(
            config.roles.clone(),
            config.reasons.clone(),
            config.reason_policy,
        )?;

        Ok(Self {
            state: AppState::new(),
            should_quit: false,
            flow,
            gate: LoginGate::new(store, config.lockout_policy()),
            backend,
            events: EventHandler::new(),
            countdown: LockoutCountdown::new(),
            stats_interval: config.stats_interval(),
            stats_task: None,
        })
    }

    pub fn flow(&self) -> &FlowController {
        &self.flow
    }

    pub fn gate(&self) -> &LoginGate<S> {
        &self.gate
    }

    /// Draw the idle kiosk and decide whether the login overlay is needed
    pub fn start(&mut self) {
        let sender = self.events.sender();
        let mut view = TerminalView::new(&mut self.state.kiosk, &sender);
        self.flow.start(&mut view);

        if self.gate.restore(Local::now()) {
            self.enter_kiosk();
        } else {
            self.state.screen = Screen::Login;
        }
        self.sync();
    }

    /// Run the application main loop
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        let mut input = EventStream::new();
        let mut ticker = tokio::time::interval(TICK_RATE);

        self.start();

        while !self.should_quit {
            let now = Local::now();
            terminal
                .draw(|frame| ui::render(frame, &mut self.state, now))
                .context("Failed to draw frame")?;

            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event),
                    Some(Err(e)) => return Err(e).context("Failed to read terminal input"),
                    None => self.should_quit = true,
                },
                Some(event) = self.events.recv() => self.handle_event(event),
                _ = ticker.tick() => self.on_tick(),
            }
        }

        Ok(())
    }

    /// Keyboard, mouse and paste input
    pub fn handle_terminal_event(&mut self, event: TerminalEvent) {
        match event {
            TerminalEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            TerminalEvent::Mouse(mouse) => self.handle_mouse(mouse),
            TerminalEvent::Paste(text) => self.handle_paste(&text),
            _ => {}
        }
        self.sync();
    }

    /// Results posted back by timers and backend tasks
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Deferred(scheduled) => {
                let sender = self.events.sender();
                let mut view = TerminalView::new(&mut self.state.kiosk, &sender);
                let outbound = self.flow.fire(scheduled, &mut view);
                self.dispatch(outbound);
            }
            Event::StatusResolved { ticket, result } => {
                let sender = self.events.sender();
                let mut view = TerminalView::new(&mut self.state.kiosk, &sender);
                let outbound = self.flow.resolve_status(ticket, result, &mut view);
                self.dispatch(outbound);
            }
            Event::LoginResolved(result) => self.on_login_resolved(result),
            Event::Submitted(result) => {
                match result {
                    Ok(receipt) => {
                        if let Some(message) = receipt.message {
                            self.state.toast = Some(Notification::new(message, receipt.kind));
                        }
                    }
                    Err(e) => {
                        tracing::error!("submission failed: {}", e);
                        self.state.toast = Some(Notification::error(SUBMIT_FAILED));
                    }
                }
                self.refresh_stats();
            }
            Event::Stats(Ok(stats)) => self.state.stats = Some(stats),
            Event::Stats(Err(e)) => tracing::warn!("Failed to fetch live stats: {}", e),
            Event::LockoutTick { remaining_secs } => self.gate.show_countdown(remaining_secs),
            Event::LockoutElapsed => {
                self.countdown.stop();
                self.gate.release_lockout();
            }
        }
        self.sync();
    }

    fn on_tick(&mut self) {
        if let Some(toast) = &mut self.state.toast {
            toast.tick();
            if toast.is_expired() {
                self.state.toast = None;
            }
        }
        self.sync();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            tracing::info!("quit requested");
            self.should_quit = true;
            return;
        }

        match self.state.screen {
            Screen::Login => self.handle_login_key(key.code),
            Screen::Kiosk => self.handle_kiosk_key(key.code),
        }
    }

    fn handle_login_key(&mut self, key: KeyCode) {
        let form = &mut self.state.login;
        match key {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_focus(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char(c) => form.push(c),
            _ => {}
        }
    }

    fn handle_kiosk_key(&mut self, key: KeyCode) {
        let sender = self.events.sender();
        let mut view = TerminalView::new(&mut self.state.kiosk, &sender);

        let outbound = match key {
            KeyCode::Enter => self.flow.handle_key(KioskKey::Enter, &mut view),
            KeyCode::Esc => self.flow.handle_key(KioskKey::Escape, &mut view),
            KeyCode::Up => self.flow.handle_key(KioskKey::Up, &mut view),
            KeyCode::Down => self.flow.handle_key(KioskKey::Down, &mut view),
            KeyCode::Backspace => {
                self.flow.backspace_enrollment(&mut view);
                None
            }
            KeyCode::Char(c) => {
                let raw = format!("{}{}", self.flow.enrollment_code(), c);
                self.flow.input_enrollment(&raw, &mut view);
                None
            }
            _ => None,
        };
        self.dispatch(outbound);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state.screen != Screen::Kiosk {
            return;
        }
        let hit = self.state.hits.hit(mouse.column, mouse.row);
        let sender = self.events.sender();
        let mut view = TerminalView::new(&mut self.state.kiosk, &sender);

        let outbound = match mouse.kind {
            MouseEventKind::Moved => {
                let over = match hit {
                    Some(Hit::Option(picker, index)) => Some((picker, index)),
                    _ => None,
                };
                if over != self.state.hovered {
                    if let Some((picker, index)) = self.state.hovered {
                        self.flow.hover_leave(picker, index, &mut view);
                    }
                    if let Some((picker, index)) = over {
                        self.flow.hover_enter(picker, index, &mut view);
                    }
                    self.state.hovered = over;
                }
                None
            }
            MouseEventKind::Down(MouseButton::Left) => match hit {
                Some(Hit::Logo) => {
                    self.flow.click_logo(&mut view);
                    None
                }
                Some(Hit::Option(picker, index)) => {
                    self.flow.click_option(picker, index, &mut view);
                    None
                }
                Some(Hit::Submit) => self.flow.click_submit(&mut view),
                None => None,
            },
            _ => None,
        };
        self.dispatch(outbound);
    }

    fn handle_paste(&mut self, text: &str) {
        match self.state.screen {
            Screen::Login => self.state.login.paste(text),
            Screen::Kiosk => {
                let sender = self.events.sender();
                let mut view = TerminalView::new(&mut self.state.kiosk, &sender);
                let raw = format!("{}{}", self.flow.enrollment_code(), text);
                self.flow.input_enrollment(&raw, &mut view);
            }
        }
    }

    fn submit_login(&mut self) {
        let now = Local::now();
        let form = &self.state.login;
        match self.gate.begin(&form.id, &form.password, now) {
            Ok(credentials) => {
                let backend = Arc::clone(&self.backend);
                let events = self.events.sender();
                tokio::spawn(async move {
                    let result = backend.login(&credentials).await;
                    let _ = events.send(Event::LoginResolved(result));
                });
            }
            Err(e) => tracing::debug!("login not attempted: {}", e),
        }
    }

    fn on_login_resolved(&mut self, result: kiosk_core::Result<bool>) {
        let now = Local::now();
        match self.gate.resolve(result, now) {
            LoginOutcome::Authenticated => {
                self.state.login.clear();
                self.enter_kiosk();
            }
            LoginOutcome::Rejected { lockout_until } => {
                self.state.login.clear_password();
                if let Some(deadline) = lockout_until {
                    let remaining = (deadline - now).to_std().unwrap_or_default();
                    self.countdown.start(remaining, self.events.sender());
                }
            }
            LoginOutcome::Failed | LoginOutcome::Ignored => {}
        }
    }

    fn enter_kiosk(&mut self) {
        self.state.screen = Screen::Kiosk;
        if self.stats_task.is_none() {
            self.spawn_stats_poller();
        }
    }

    fn spawn_stats_poller(&mut self) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.sender();
        let period = self.stats_interval;

        self.stats_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let result = backend.live_stats().await;
                if events.send(Event::Stats(result)).is_err() {
                    break;
                }
            }
        }));
    }

    /// One-off poll, e.g. right after a check-in changed the numbers
    fn refresh_stats(&self) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.sender();
        tokio::spawn(async move {
            let _ = events.send(Event::Stats(backend.live_stats().await));
        });
    }

    /// Hand network work requested by the flow to a background task
    fn dispatch(&mut self, outbound: Option<Outbound>) {
        let Some(outbound) = outbound else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        let events = self.events.sender();

        match outbound {
            Outbound::CheckStatus { ticket, check } => {
                tokio::spawn(async move {
                    let result = backend.check_status(&check).await;
                    let _ = events.send(Event::StatusResolved { ticket, result });
                });
            }
            Outbound::Submit { terminal, payload } => {
                tracing::debug!(?terminal, "posting submission");
                tokio::spawn(async move {
                    let result = backend.submit(&payload).await;
                    let _ = events.send(Event::Submitted(result));
                });
            }
        }
    }

    /// Copy controller and gate state the renderer needs
    fn sync(&mut self) {
        let now = Local::now();
        let kiosk = &mut self.state.kiosk;
        kiosk.code_len = required_code_len(self.flow.selected_role());
        kiosk.busy = self.flow.is_in_flight();

        self.state.login_message = self.gate.message().map(str::to_string);
        self.state.login_pending = self.gate.is_pending();
        self.state.locked = self.gate.is_locked(now);

        if let Some((picker, _)) = self.state.hovered {
            let panel = match picker {
                Picker::Role => Panel::Role,
                Picker::Reason => Panel::Reason,
            };
            if self.state.kiosk.panel != Some(panel) {
                self.state.hovered = None;
            }
        }
    }
}

impl<S: SessionStore> Drop for App<S> {
    fn drop(&mut self) {
        if let Some(task) = self.stats_task.take() {
            task.abort();
        }
    }
}
