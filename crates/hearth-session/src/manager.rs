//! Session facade over a host session with inactivity expiration.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::activity::{ActivityPolicy, DEFAULT_EXPIRATION_SECS};
use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::cookie::CookieParams;
use crate::error::{Error, Result};
use crate::host::{SessionHost, SessionStatus};

/// Starts, expires and reads/writes a host session.
///
/// Each request gets its own manager wrapping that request's host. All
/// mutating operations take `&mut self`; nothing is shared between managers.
#[derive(Debug)]
pub struct SessionManager<H: SessionHost, C: Clock = SystemClock> {
    host: H,
    clock: C,
    policy: ActivityPolicy,
}

impl<H: SessionHost> SessionManager<H, SystemClock> {
    /// Create a manager using the system clock.
    pub fn new(host: H) -> Self {
        Self::with_clock(host, SystemClock)
    }
}

impl<H: SessionHost, C: Clock> SessionManager<H, C> {
    /// Create a manager with an explicit clock.
    pub fn with_clock(host: H, clock: C) -> Self {
        Self {
            host,
            clock,
            policy: ActivityPolicy::default(),
        }
    }

    /// Start or resume a session with the default expiration and cookie params.
    pub fn start(&mut self) -> Result<()> {
        self.start_with(DEFAULT_EXPIRATION_SECS, &CookieParams::default())
    }

    /// Start or resume a session using a loaded configuration.
    pub fn start_with_config(&mut self, config: &SessionConfig) -> Result<()> {
        self.start_with(config.expiration_secs, &config.cookie)
    }

    /// Start or resume a session.
    ///
    /// Cookie params are applied only when a session is created, either because
    /// none was active or because the resumed one had expired. The expiry check
    /// uses the stamp left by the previous request. The session id is
    /// regenerated on every call.
    pub fn start_with(&mut self, expiration_secs: u64, cookie: &CookieParams) -> Result<()> {
        self.policy.set_expiration(expiration_secs);

        if self.host.status() == SessionStatus::None {
            self.host.set_cookie_params(cookie);
            self.host.activate();
            debug!(session_id = ?self.host.session_id(), "Session activated");
        }

        if self.is_expired() {
            debug!(
                session_id = ?self.host.session_id(),
                expiration_secs,
                "Session expired, replacing"
            );
            self.host.destroy();
            self.host.set_cookie_params(cookie);
            self.host.activate();
        }

        self.host.regenerate_id();
        debug!(session_id = ?self.host.session_id(), "Session id regenerated");

        self.touch();
        Ok(())
    }

    /// Clear all session data and terminate the session. Safe without an active session.
    pub fn destroy(&mut self) {
        if let Some(data) = self.host.data_mut() {
            data.values.clear();
        }
        self.host.destroy();
        debug!("Session destroyed");
    }

    /// Store a value under `key`.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        self.ensure_live()?;
        let value = serde_json::to_value(value)?;
        let now = self.clock.now();

        let data = self.host.data_mut().ok_or(Error::NoActiveSession)?;
        data.values.insert(key.to_string(), value);
        data.last_activity = Some(now);

        trace!(key = %key, "Session value set");
        Ok(())
    }

    /// Fetch the value under `key`, converted to `T`.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<T> {
        let value = self.get_value(key)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the raw stored value under `key`.
    ///
    /// Touches the session even when the key turns out to be missing.
    pub fn get_value(&mut self, key: &str) -> Result<serde_json::Value> {
        self.ensure_live()?;
        self.touch();

        let value = self
            .host
            .data()
            .and_then(|data| data.values.get(key))
            .cloned()
            .ok_or_else(|| Error::key_not_found(key))?;

        trace!(key = %key, "Session value read");
        Ok(value)
    }

    /// Delete the value under `key`.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.ensure_live()?;
        let now = self.clock.now();

        let data = self
            .host
            .data_mut()
            .ok_or_else(|| Error::key_not_found(key))?;
        if data.values.remove(key).is_none() {
            return Err(Error::key_not_found(key));
        }
        data.last_activity = Some(now);

        trace!(key = %key, "Session value removed");
        Ok(())
    }

    /// Whether `key` is present. Neither checks expiry nor touches the session.
    pub fn contains(&self, key: &str) -> bool {
        self.host
            .data()
            .is_some_and(|data| data.values.contains_key(key))
    }

    /// Host session lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.host.status()
    }

    /// Pass cookie attributes through to the host.
    pub fn set_cookie_params(&mut self, params: &CookieParams) {
        self.host.set_cookie_params(params);
    }

    /// Cookie attributes the host currently has configured.
    pub fn cookie_params(&self) -> Option<&CookieParams> {
        self.host.cookie_params()
    }

    /// Issue a new session id, keeping the session data.
    pub fn regenerate_id(&mut self) {
        self.host.regenerate_id();
        debug!(session_id = ?self.host.session_id(), "Session id regenerated");
    }

    /// Current session id.
    pub fn id(&self) -> Option<&str> {
        self.host.session_id()
    }

    /// Seconds since the epoch of the last touching operation.
    pub fn last_activity(&self) -> Option<i64> {
        self.host.data().and_then(|data| data.last_activity)
    }

    /// Configured inactivity window in seconds.
    pub fn expiration(&self) -> u64 {
        self.policy.expiration()
    }

    /// Whether the session has been idle longer than the configured window.
    pub fn is_expired(&self) -> bool {
        self.policy.is_expired(self.last_activity(), self.clock.now())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_expired() {
            debug!(
                session_id = ?self.host.session_id(),
                last_activity = ?self.last_activity(),
                "Session expired"
            );
            return Err(Error::Expired);
        }
        Ok(())
    }

    fn touch(&mut self) {
        let now = self.clock.now();
        if let Some(data) = self.host.data_mut() {
            data.last_activity = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::host::{MemoryHost, SessionData};
    use serde_json::json;

    const T0: i64 = 1_700_000_000;

    fn started(expiration: u64) -> (SessionManager<MemoryHost, ManualClock>, ManualClock) {
        let clock = ManualClock::new(T0);
        let mut manager = SessionManager::with_clock(MemoryHost::new(), clock.clone());
        manager
            .start_with(expiration, &CookieParams::default())
            .unwrap();
        (manager, clock)
    }

    #[test]
    fn test_start_activates_and_stamps() {
        let (manager, _) = started(600);

        assert_eq!(manager.status(), SessionStatus::Active);
        assert_eq!(manager.expiration(), 600);
        assert_eq!(manager.last_activity(), Some(T0));
        assert_eq!(manager.cookie_params(), Some(&CookieParams::default()));
    }

    #[test]
    fn test_start_regenerates_id_on_resume() {
        let (mut manager, clock) = started(600);
        let before = manager.id().unwrap().to_string();

        clock.advance(10);
        manager.start_with(600, &CookieParams::default()).unwrap();

        assert_ne!(manager.id().unwrap(), before);
        assert_eq!(manager.last_activity(), Some(T0 + 10));
    }

    #[test]
    fn test_start_keeps_data_when_live() {
        let (mut manager, clock) = started(600);
        manager.set("user", "alice").unwrap();

        clock.advance(600);
        manager.start_with(600, &CookieParams::default()).unwrap();

        assert_eq!(manager.get::<String>("user").unwrap(), "alice");
    }

    #[test]
    fn test_start_replaces_expired_session() {
        let clock = ManualClock::new(T0);
        let host = MemoryHost::resume(
            SessionData::new("stale")
                .with_value("user", json!("alice"))
                .with_last_activity(T0 - 601),
        );
        let mut manager = SessionManager::with_clock(host, clock);
        let cookie = CookieParams::new().with_secure(true);

        manager.start_with(600, &cookie).unwrap();

        assert_eq!(manager.status(), SessionStatus::Active);
        assert_ne!(manager.id(), Some("stale"));
        assert!(!manager.contains("user"));
        assert_eq!(manager.last_activity(), Some(T0));
        assert_eq!(manager.cookie_params(), Some(&cookie));
    }

    #[test]
    fn test_start_resume_does_not_reapply_cookie_params() {
        let clock = ManualClock::new(T0);
        let host = MemoryHost::resume(SessionData::new("live").with_last_activity(T0));
        let mut manager = SessionManager::with_clock(host, clock);

        manager
            .start_with(600, &CookieParams::new().with_secure(true))
            .unwrap();

        assert_eq!(manager.cookie_params(), None);
    }

    #[test]
    fn test_set_get_roundtrip() {
        let (mut manager, _) = started(600);

        manager.set("count", &3u32).unwrap();
        manager.set("tags", &vec!["a", "b"]).unwrap();

        assert_eq!(manager.get::<u32>("count").unwrap(), 3);
        assert_eq!(manager.get::<Vec<String>>("tags").unwrap(), vec!["a", "b"]);
        assert_eq!(manager.get_value("count").unwrap(), json!(3));
    }

    #[test]
    fn test_reserved_name_is_an_ordinary_key() {
        let (mut manager, clock) = started(600);
        clock.advance(5);

        manager.set("LAST_ACTIVITY", &0).unwrap();

        assert_eq!(manager.get::<i64>("LAST_ACTIVITY").unwrap(), 0);
        assert_eq!(manager.last_activity(), Some(T0 + 5));
    }

    #[test]
    fn test_operations_stamp_last_activity() {
        let (mut manager, clock) = started(600);

        clock.advance(1);
        manager.set("k", "v").unwrap();
        assert_eq!(manager.last_activity(), Some(T0 + 1));

        clock.advance(1);
        manager.get::<String>("k").unwrap();
        assert_eq!(manager.last_activity(), Some(T0 + 2));

        clock.advance(1);
        manager.remove("k").unwrap();
        assert_eq!(manager.last_activity(), Some(T0 + 3));
    }

    #[test]
    fn test_get_missing_key_still_touches() {
        let (mut manager, clock) = started(600);
        clock.advance(20);

        let err = manager.get::<String>("absent").unwrap_err();

        assert_eq!(err.missing_key(), Some("absent"));
        assert_eq!(manager.last_activity(), Some(T0 + 20));
    }

    #[test]
    fn test_remove_missing_key_does_not_touch() {
        let (mut manager, clock) = started(600);
        clock.advance(20);

        let err = manager.remove("absent").unwrap_err();

        assert_eq!(err.to_string(), "The key 'absent' was not found.");
        assert_eq!(manager.last_activity(), Some(T0));
    }

    #[test]
    fn test_expired_operations() {
        let (mut manager, clock) = started(60);
        manager.set("k", "v").unwrap();
        clock.advance(61);

        assert!(manager.set("k", "w").unwrap_err().is_expired());
        assert!(manager.get::<String>("k").unwrap_err().is_expired());
        assert!(manager.remove("k").unwrap_err().is_expired());
        assert_eq!(manager.last_activity(), Some(T0));
        assert!(manager.contains("k"));
    }

    #[test]
    fn test_exact_window_is_live() {
        let (mut manager, clock) = started(60);
        clock.advance(60);

        assert!(!manager.is_expired());
        manager.set("k", "v").unwrap();
    }

    #[test]
    fn test_remove_then_contains() {
        let (mut manager, _) = started(600);
        manager.set("k", "v").unwrap();

        manager.remove("k").unwrap();

        assert!(!manager.contains("k"));
    }

    #[test]
    fn test_type_mismatch_is_serialization_error() {
        let (mut manager, _) = started(600);
        manager.set("k", "not a number").unwrap();

        let err = manager.get::<u32>("k").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_operations_without_session() {
        let mut manager = SessionManager::with_clock(MemoryHost::new(), ManualClock::new(T0));

        assert!(matches!(
            manager.set("k", "v").unwrap_err(),
            Error::NoActiveSession
        ));
        assert!(manager.get::<String>("k").unwrap_err().is_key_not_found());
        assert!(manager.remove("k").unwrap_err().is_key_not_found());
    }

    #[test]
    fn test_destroy_clears_and_terminates() {
        let (mut manager, _) = started(600);
        manager.set("k", "v").unwrap();

        manager.destroy();

        assert_eq!(manager.status(), SessionStatus::None);
        assert!(!manager.contains("k"));
        assert!(manager.id().is_none());

        manager.destroy();
        assert_eq!(manager.status(), SessionStatus::None);
    }

    #[test]
    fn test_regenerate_id_preserves_data() {
        let (mut manager, _) = started(600);
        manager.set("k", "v").unwrap();
        let before = manager.id().unwrap().to_string();

        manager.regenerate_id();

        assert_ne!(manager.id().unwrap(), before);
        assert!(manager.contains("k"));
    }

    #[test]
    fn test_start_with_config() {
        let clock = ManualClock::new(T0);
        let mut manager = SessionManager::with_clock(MemoryHost::new(), clock);
        let config = SessionConfig::new()
            .with_expiration(30)
            .with_cookie(CookieParams::new().with_domain("example.com"));

        manager.start_with_config(&config).unwrap();

        assert_eq!(manager.expiration(), 30);
        assert_eq!(manager.cookie_params().unwrap().domain, "example.com");
    }

    #[test]
    fn test_system_clock_start() {
        let mut manager = SessionManager::new(MemoryHost::new());
        manager.start().unwrap();

        let now = chrono::Utc::now().timestamp();
        let stamped = manager.last_activity().unwrap();
        assert!((now - stamped).abs() <= 1);
        assert_eq!(manager.expiration(), 3600);
    }
}
