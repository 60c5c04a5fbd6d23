//! Inactivity expiration.

/// Default inactivity window in seconds.
pub const DEFAULT_EXPIRATION_SECS: u64 = 3600;

/// Decides whether a session has been idle for too long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityPolicy {
    /// Inactivity window in seconds.
    expiration: u64,
}

impl Default for ActivityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRATION_SECS)
    }
}

impl ActivityPolicy {
    /// Create a policy with the given window in seconds.
    pub fn new(expiration: u64) -> Self {
        Self { expiration }
    }

    /// The configured window in seconds.
    pub fn expiration(&self) -> u64 {
        self.expiration
    }

    /// Update the window.
    pub fn set_expiration(&mut self, expiration: u64) {
        self.expiration = expiration;
    }

    /// Check whether a session last touched at `last_activity` is expired at `now`.
    ///
    /// A session with no recorded activity never expires. Otherwise the idle
    /// time must strictly exceed the window; exactly equal is still live.
    pub fn is_expired(&self, last_activity: Option<i64>, now: i64) -> bool {
        match last_activity {
            None => false,
            Some(last) => i128::from(now) - i128::from(last) > i128::from(self.expiration),
        }
    }
}
