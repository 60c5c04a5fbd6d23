//! Cookie attributes handed to the host before a session is activated.

use serde::{Deserialize, Serialize};

/// Default cookie lifetime in seconds.
pub const DEFAULT_COOKIE_LIFETIME: u64 = 3600;

/// Default cookie path.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Default same-site policy.
pub const DEFAULT_SAME_SITE: &str = "Lax";

/// Attributes of the outgoing session cookie.
///
/// The facade never interprets these values. They are passed verbatim to
/// [`SessionHost::set_cookie_params`](crate::SessionHost::set_cookie_params),
/// so `same_site` is an opaque string rather than an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieParams {
    /// Cookie lifetime in seconds.
    pub lifetime: u64,
    pub path: String,
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: String,
}

impl Default for CookieParams {
    fn default() -> Self {
        Self {
            lifetime: DEFAULT_COOKIE_LIFETIME,
            path: DEFAULT_COOKIE_PATH.to_string(),
            domain: String::new(),
            secure: false,
            http_only: true,
            same_site: DEFAULT_SAME_SITE.to_string(),
        }
    }
}

impl CookieParams {
    /// Create cookie params with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lifetime(mut self, lifetime: u64) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: impl Into<String>) -> Self {
        self.same_site = same_site.into();
        self
    }
}
