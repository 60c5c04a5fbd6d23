//! Session facade with inactivity expiration.
//!
//! This crate wraps a host environment's session primitives with:
//! - Start/resume that replaces sessions idle past a configured window
//! - Session id regeneration on every start
//! - Typed get/set/remove access to session-scoped values
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_session::{CookieParams, MemoryHost, SessionManager};
//!
//! let mut session = SessionManager::new(MemoryHost::new());
//! session.start_with(1800, &CookieParams::default().with_secure(true))?;
//!
//! session.set("user_id", &42u64)?;
//! let user_id: u64 = session.get("user_id")?;
//! ```

mod activity;
mod clock;
mod config;
mod cookie;
mod error;
mod host;
mod manager;

pub use activity::{ActivityPolicy, DEFAULT_EXPIRATION_SECS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use cookie::{CookieParams, DEFAULT_COOKIE_LIFETIME, DEFAULT_COOKIE_PATH, DEFAULT_SAME_SITE};
pub use error::{ConfigError, Error, Result};
pub use host::{MemoryHost, SessionData, SessionHost, SessionStatus};
pub use manager::SessionManager;
