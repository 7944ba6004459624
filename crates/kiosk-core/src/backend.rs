//! Contract with the check-in backend
//!
//! The kiosk never decides who may enter; it only shapes requests. The wire
//! names here match the backend's form and JSON fields.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Login overlay credentials (`POST /login` JSON body)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub id: String,
    pub pass: String,
}

/// "May this role+code check in or out right now?" (`POST /check-status`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCheck {
    pub registry_last_digits: String,
    pub role: String,
}

/// Answer to a [`StatusCheck`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StatusReply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    /// Whether the person currently has an open entry
    #[serde(default)]
    pub user_inside: Option<bool>,
}

impl StatusReply {
    pub fn allowed() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn denied(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Values posted to the backend's check route
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub role: String,
    #[serde(rename = "registry_last_digits")]
    pub enrollment_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Flash message category returned after a submission
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

/// What the backend said about a submission
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub message: Option<String>,
    pub kind: ToastKind,
}

/// Today's counters (`GET /api/stats`)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LiveStats {
    #[serde(default)]
    pub total_entries_today: u64,
    #[serde(default)]
    pub unique_visitors_today: u64,
    #[serde(default)]
    pub currently_inside: u64,
    #[serde(default = "default_peak_hour")]
    pub peak_hour_today: String,
}

fn default_peak_hour() -> String {
    "N/A".to_string()
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            total_entries_today: 0,
            unique_visitors_today: 0,
            currently_inside: 0,
            peak_hour_today: default_peak_hour(),
        }
    }
}

/// Backend endpoints the kiosk talks to
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns true when the backend accepted the credentials
    async fn login(&self, credentials: &Credentials) -> Result<bool>;

    async fn check_status(&self, check: &StatusCheck) -> Result<StatusReply>;

    /// Post the final entry/exit; the backend toggles state server-side
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt>;

    async fn live_stats(&self) -> Result<LiveStats>;
}
