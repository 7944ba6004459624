//! Daily login session persisted across kiosk restarts

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{KioskError, Result};

/// Proof of an earlier successful login, valid until the end of that day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Login identity
    #[serde(rename = "id")]
    pub identity: String,
    /// Instant the session stops being valid (RFC 3339 on disk)
    pub expiry: DateTime<Local>,
}

impl Session {
    /// Session expiring at 23:59:59.999 local time on `now`'s day
    pub fn ending_today(identity: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            identity: identity.into(),
            expiry: end_of_day(now),
        }
    }

    pub fn is_valid(&self, now: DateTime<Local>) -> bool {
        now < self.expiry
    }
}

fn end_of_day(now: DateTime<Local>) -> DateTime<Local> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    let naive = now.date_naive().and_time(last_milli);
    // A DST gap at midnight has no 23:59:59.999; fall back to the latest mapping
    Local
        .from_local_datetime(&naive)
        .latest()
        .unwrap_or(now)
}

/// Where the session record lives between restarts
pub trait SessionStore: Send {
    /// Read the stored record, `None` if there never was a login
    fn load(&self) -> Result<Option<Session>>;

    /// Replace the stored record
    fn save(&self, session: &Session) -> Result<()>;
}

/// JSON file holding the single session record
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, contents)?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %self.path.display(), "saved session");
        Ok(())
    }
}

/// In-process store for tests and demo terminals
#[derive(Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            record: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let record = self
            .record
            .lock()
            .map_err(|_| KioskError::Storage("session store poisoned".into()))?;
        Ok(record.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut record = self
            .record
            .lock()
            .map_err(|_| KioskError::Storage("session store poisoned".into()))?;
        *record = Some(session.clone());
        Ok(())
    }
}

/// Decides at startup whether the login overlay is needed
pub struct SessionGuard<S: SessionStore> {
    store: S,
    current: Option<Session>,
}

impl<S: SessionStore> SessionGuard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Read the persisted record once; true if it is still valid at `now`.
    ///
    /// A record that cannot be read is treated as absent.
    pub fn restore(&mut self, now: DateTime<Local>) -> bool {
        self.current = match self.store.load() {
            Ok(Some(session)) if session.is_valid(now) => {
                tracing::info!(identity = %session.identity, "restored kiosk session");
                Some(session)
            }
            Ok(Some(session)) => {
                tracing::info!(expiry = %session.expiry.to_rfc3339(), "stored session expired");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read session record: {}", e);
                None
            }
        };
        self.current.is_some()
    }

    /// Persist a new session ending today
    pub fn establish(&mut self, identity: &str, now: DateTime<Local>) -> Result<&Session> {
        let session = Session::ending_today(identity, now);
        self.store.save(&session)?;
        Ok(&*self.current.insert(session))
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
