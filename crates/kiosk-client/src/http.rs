//! reqwest-backed implementation of the kiosk backend contract

use std::time::Duration;

use async_trait::async_trait;
use kiosk_core::{
    Backend, Credentials, KioskError, LiveStats, Result, StatusCheck, StatusReply,
    SubmissionPayload, SubmissionReceipt,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::toast::parse_toast;

/// Request timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend reached over HTTP
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct LoginReply {
    #[serde(default)]
    success: bool,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url` (e.g. `http://10.0.0.5:5000`)
    ///
    /// The backend flashes its check-in message into the session cookie set
    /// on the `/check` redirect, so the client keeps a cookie store.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| KioskError::Network(format!("build client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        request
            .send()
            .await
            .map_err(|e| KioskError::Network(format!("{what}: {e}")))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| KioskError::Network(format!("{what}: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                KioskError::Protocol(format!("parse {what}: {e}"))
            } else {
                KioskError::Protocol(format!("{what}: HTTP {status}"))
            }
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<bool> {
        tracing::debug!(id = %credentials.id, "POST /login");
        let response = self
            .send(self.client.post(self.url("/login")).json(credentials), "login")
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(KioskError::Protocol(format!("login: HTTP {status}")));
        }
        let reply: LoginReply = Self::read_json(response, "login").await?;
        Ok(reply.success)
    }

    async fn check_status(&self, check: &StatusCheck) -> Result<StatusReply> {
        tracing::debug!(role = %check.role, "POST /check-status");
        let response = self
            .send(
                self.client.post(self.url("/check-status")).form(check),
                "check-status",
            )
            .await?;

        // A JSON rejection is an answer even when the status is not 2xx
        Self::read_json(response, "check-status").await
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt> {
        tracing::debug!(role = %payload.role, reason = ?payload.reason, "POST /check");
        let response = self
            .send(self.client.post(self.url("/check")).form(payload), "check")
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| KioskError::Network(format!("check: {e}")))?;
        if !status.is_success() {
            return Err(KioskError::Protocol(format!("check: HTTP {status}")));
        }
        Ok(parse_toast(&body))
    }

    async fn live_stats(&self) -> Result<LiveStats> {
        let response = self
            .send(self.client.get(self.url("/api/stats")), "stats")
            .await?;
        Self::read_json(response, "stats").await
    }
}
