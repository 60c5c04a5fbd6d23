//! Wall-clock sources for last-activity stamps.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of wall-clock time in whole seconds since the Unix epoch.
pub trait Clock {
    fn now(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> i64 {
        (**self).now()
    }
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A settable clock.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// advance it while a manager holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock stopped at `at` seconds since the epoch.
    pub fn new(at: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(at)),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, at: i64) {
        self.now.store(at, Ordering::SeqCst);
    }

    /// Move forward by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
