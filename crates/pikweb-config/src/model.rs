//! Immutable client configuration.

use std::fmt;
use std::time::Duration;

/// Settings a single API client is built against.
///
/// A new value is produced whenever the backend URL or the token changes; an
/// existing value is never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    base_url: String,
    access_token: Option<String>,
    timeout: Option<Duration>,
}

impl Configuration {
    /// Build a configuration for `base_url`.
    ///
    /// Empty or whitespace-only tokens are treated as absent.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        access_token: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.filter(|token| !token.trim().is_empty()),
            timeout,
        }
    }

    /// Backend base URL exactly as it was configured.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer token attached to authenticated requests.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Default request timeout; per-call options may override it.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "********"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}
