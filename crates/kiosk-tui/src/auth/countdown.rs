//! Lockout countdown task

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::app::Event;

/// How often the remaining time is re-posted
const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Background countdown for an engaged lockout
///
/// Posts [`Event::LockoutTick`] once a second and [`Event::LockoutElapsed`]
/// when the window is over. Stopping or dropping it aborts the task.
#[derive(Default)]
pub struct LockoutCountdown {
    handle: Option<JoinHandle<()>>,
}

impl LockoutCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down `remaining`; replaces any running countdown
    pub fn start(&mut self, remaining: Duration, events: mpsc::UnboundedSender<Event>) {
        self.stop();
        let deadline = Instant::now() + remaining;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval(COUNTDOWN_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    break;
                }
                let remaining_secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
                if events.send(Event::LockoutTick { remaining_secs }).is_err() {
                    return;
                }
                if left < COUNTDOWN_PERIOD {
                    time::sleep_until(deadline).await;
                    break;
                }
            }

            tracing::info!("lockout window elapsed");
            let _ = events.send(Event::LockoutElapsed);
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for LockoutCountdown {
    fn drop(&mut self) {
        self.stop();
    }
}
