//! Kiosk Core - Check-in flow, login gating and lockout
//!
//! This crate holds the interaction logic of the attendance kiosk without any
//! rendering surface. A front end implements [`view::KioskView`] and a
//! [`backend::Backend`], then feeds user input into a [`FlowController`] and a
//! [`LoginGate`].

pub mod backend;
pub mod enrollment;
pub mod error;
pub mod flow;
pub mod lockout;
pub mod login;
pub mod selection;
pub mod session;
pub mod view;

pub use backend::{
    Backend, Credentials, LiveStats, StatusCheck, StatusReply, SubmissionPayload,
    SubmissionReceipt, ToastKind,
};
pub use enrollment::{required_code_len, EnrollmentInput};
pub use error::{KioskError, Result};
pub use flow::{FlowController, FlowStep, KioskKey, Outbound, ReasonPolicy, Terminal, Ticket};
pub use lockout::{LockoutPolicy, LockoutTracker};
pub use login::{LoginGate, LoginOutcome};
pub use selection::{Highlight, SelectionPanel};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionGuard, SessionStore};
pub use view::{Deferred, KioskView, Panel, Picker, Scheduled};

/// Role whose enrollment codes are five digits long
pub const STUDENT_ROLE: &str = "Student";

/// Reason recorded by the backend when none is submitted
pub const DEFAULT_REASON: &str = "Self Study";
