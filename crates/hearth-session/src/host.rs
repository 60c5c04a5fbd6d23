//! Host session primitives.
//!
//! The facade does not own session state. It drives a [`SessionHost`], which
//! stands in for whatever request-handling environment actually stores
//! sessions and emits cookies. [`MemoryHost`] is an in-memory host holding a
//! single request's session.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cookie::CookieParams;

/// Lifecycle state of the host session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session is active.
    None,
    /// A session is active.
    Active,
}

/// Session-scoped state held by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Opaque session identifier.
    pub id: String,

    /// User-addressable key-value store.
    pub values: HashMap<String, serde_json::Value>,

    /// Seconds since the epoch of the last touching operation.
    ///
    /// Kept out of `values` so no user key can collide with it.
    pub last_activity: Option<i64>,

    /// When the host created the session.
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionData {
    /// Create an empty session record.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the last-activity stamp.
    pub fn with_last_activity(mut self, at: i64) -> Self {
        self.last_activity = Some(at);
        self
    }

    /// Insert a value.
    pub fn with_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Set creation timestamp.
    pub fn with_created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = Some(ts);
        self
    }
}

/// Session primitives a host environment must provide.
///
/// Implementations own the session record and the outgoing cookie
/// configuration. Callers serialize access to a given host.
pub trait SessionHost {
    /// Current lifecycle state.
    fn status(&self) -> SessionStatus;

    /// Activate a session. No-op when one is already active.
    fn activate(&mut self);

    /// Clear all session data and terminate the session. No-op when none is active.
    fn destroy(&mut self);

    /// Issue a new identifier for the active session, keeping its data.
    fn regenerate_id(&mut self);

    /// Configure the attributes of the outgoing session cookie.
    fn set_cookie_params(&mut self, params: &CookieParams);

    /// The cookie attributes currently configured, if any were set.
    fn cookie_params(&self) -> Option<&CookieParams>;

    /// The active session's record.
    fn data(&self) -> Option<&SessionData>;

    /// Mutable access to the active session's record.
    fn data_mut(&mut self) -> Option<&mut SessionData>;

    /// The active session's identifier.
    fn session_id(&self) -> Option<&str> {
        self.data().map(|data| data.id.as_str())
    }
}

/// An in-memory host holding at most one session.
///
/// Identifiers are random v4 UUIDs.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    session: Option<SessionData>,
    cookie: Option<CookieParams>,
}

impl MemoryHost {
    /// Create a host with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host whose session is already active, as when a request
    /// arrives carrying an existing session cookie.
    pub fn resume(data: SessionData) -> Self {
        Self {
            session: Some(data),
            cookie: None,
        }
    }

    fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl SessionHost for MemoryHost {
    fn status(&self) -> SessionStatus {
        if self.session.is_some() {
            SessionStatus::Active
        } else {
            SessionStatus::None
        }
    }

    fn activate(&mut self) {
        if self.session.is_none() {
            self.session = Some(SessionData::new(Self::new_id()).with_created_at(Utc::now()));
        }
    }

    fn destroy(&mut self) {
        if let Some(mut data) = self.session.take() {
            data.values.clear();
        }
    }

    fn regenerate_id(&mut self) {
        if let Some(data) = self.session.as_mut() {
            data.id = Self::new_id();
        }
    }

    fn set_cookie_params(&mut self, params: &CookieParams) {
        self.cookie = Some(params.clone());
    }

    fn cookie_params(&self) -> Option<&CookieParams> {
        self.cookie.as_ref()
    }

    fn data(&self) -> Option<&SessionData> {
        self.session.as_ref()
    }

    fn data_mut(&mut self) -> Option<&mut SessionData> {
        self.session.as_mut()
    }
}
