//! Event handling for the TUI

use kiosk_core::{LiveStats, Result, Scheduled, StatusReply, SubmissionReceipt, Ticket};
use tokio::sync::mpsc;

/// Events posted back to the UI task by timers and backend calls
#[derive(Debug, Clone)]
pub enum Event {
    /// A deferred flow transition has come due
    Deferred(Scheduled),
    /// Answer to a check-status request
    StatusResolved {
        ticket: Ticket,
        result: Result<StatusReply>,
    },
    /// Answer to a login request
    LoginResolved(Result<bool>),
    /// The final entry/exit form was posted
    Submitted(Result<SubmissionReceipt>),
    /// Live statistics poll finished
    Stats(Result<LiveStats>),
    /// Lockout countdown tick
    LockoutTick { remaining_secs: u64 },
    /// Lockout window elapsed
    LockoutElapsed,
}

/// Channel between background tasks and the UI task
pub struct EventHandler {
    /// Sender for events
    sender: mpsc::UnboundedSender<Event>,
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Get a clone of the sender for other tasks to send events
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Try to receive the next event (non-blocking)
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
