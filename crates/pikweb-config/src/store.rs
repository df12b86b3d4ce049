//! Process-wide configuration cells.
//!
//! # Design
//! - Each cell holds one string with synchronous get/set and no history.
//! - Client construction sites read through [`ConfigProvider`] instead of
//!   reaching for globals, so tests can inject their own state.
//! - [`SessionStore`] adds the writes a session performs (URL switch, login,
//!   logout) on top of the read side.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tracing::debug;

use crate::model::Configuration;

/// Source of the values every client is constructed from.
pub trait ConfigProvider: Send + Sync {
    /// Currently configured backend base URL.
    fn backend_url(&self) -> String;

    /// Current bearer token, `None` when not logged in.
    fn access_token(&self) -> Option<String>;

    /// Default timeout for clients built from this provider.
    fn request_timeout(&self) -> Option<Duration> {
        None
    }

    /// Snapshot of the current values as a [`Configuration`].
    fn configuration(&self) -> Configuration {
        Configuration::new(
            self.backend_url(),
            self.access_token(),
            self.request_timeout(),
        )
    }
}

/// Mutable session: a [`ConfigProvider`] that also accepts URL and token
/// updates.
pub trait SessionStore: ConfigProvider {
    /// Point every subsequent client at `url`.
    fn set_backend_url(&self, url: String);

    /// Replace the bearer token.
    fn set_token(&self, token: String);

    /// Forget the bearer token.
    fn clear_token(&self);
}

/// Holder of the currently configured backend URL.
#[derive(Debug, Default)]
pub struct BackendUrlStore {
    stored_url: RwLock<String>,
}

impl BackendUrlStore {
    /// Create a store seeded with `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            stored_url: RwLock::new(url.into()),
        }
    }

    /// Current URL value.
    #[must_use]
    pub fn stored_url(&self) -> String {
        self.stored_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the URL. No validation is performed.
    pub fn set_url(&self, url: impl Into<String>) {
        let url = url.into();
        debug!(url = %url, "backend url updated");
        *self
            .stored_url
            .write()
            .unwrap_or_else(PoisonError::into_inner) = url;
    }
}

/// Holder of the current bearer token. Empty means "not logged in".
#[derive(Debug, Default)]
pub struct TokenStore {
    stored_token: RwLock<String>,
}

impl TokenStore {
    /// Create a store seeded with `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            stored_token: RwLock::new(token.into()),
        }
    }

    /// Current token value, possibly empty.
    #[must_use]
    pub fn stored_token(&self) -> String {
        self.stored_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the token.
    pub fn set_token(&self, token: impl Into<String>) {
        *self
            .stored_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token.into();
    }

    /// Forget the token.
    pub fn clear(&self) {
        self.set_token(String::new());
    }
}

/// The backend-URL and token cells bundled as one injectable provider.
#[derive(Debug, Default)]
pub struct SessionState {
    urls: BackendUrlStore,
    tokens: TokenStore,
    timeout: Option<Duration>,
}

impl SessionState {
    /// Create session state for `backend_url` with an optional initial token.
    #[must_use]
    pub fn new(backend_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            urls: BackendUrlStore::new(backend_url),
            tokens: TokenStore::new(token.unwrap_or_default()),
            timeout: None,
        }
    }

    /// Apply `timeout` to every client built from this session.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ConfigProvider for SessionState {
    fn backend_url(&self) -> String {
        self.urls.stored_url()
    }

    fn access_token(&self) -> Option<String> {
        Some(self.tokens.stored_token()).filter(|token| !token.is_empty())
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl SessionStore for SessionState {
    fn set_backend_url(&self, url: String) {
        self.urls.set_url(url);
    }

    fn set_token(&self, token: String) {
        self.tokens.set_token(token);
    }

    fn clear_token(&self) {
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_store_returns_latest_value() {
        let store = BackendUrlStore::new("http://a.example");
        assert_eq!(store.stored_url(), "http://a.example");
        store.set_url("http://b.example");
        assert_eq!(store.stored_url(), "http://b.example");
    }

    #[test]
    fn url_store_accepts_unvalidated_values() {
        let store = BackendUrlStore::default();
        assert_eq!(store.stored_url(), "");
        store.set_url("not a url");
        assert_eq!(store.stored_url(), "not a url");
    }

    #[test]
    fn token_store_clear_empties_value() {
        let store = TokenStore::new("jwt");
        store.clear();
        assert_eq!(store.stored_token(), "");
    }

    #[test]
    fn session_configuration_reflects_both_cells() {
        let session = SessionState::new("http://a.example", None);
        let config = session.configuration();
        assert_eq!(config.base_url(), "http://a.example");
        assert_eq!(config.access_token(), None);

        session.set_token("jwt".to_string());
        session.set_backend_url("http://b.example".to_string());
        let config = session.configuration();
        assert_eq!(config.base_url(), "http://b.example");
        assert_eq!(config.access_token(), Some("jwt"));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn request_timeout_flows_into_configuration() {
        let session = SessionState::new("http://a.example", None)
            .with_request_timeout(Some(Duration::from_secs(3)));
        assert_eq!(session.configuration().timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn session_writes_through_store_trait() {
        let session = SessionState::new("http://a.example", None);
        let store: &dyn SessionStore = &session;
        store.set_backend_url("http://b.example".to_string());
        store.set_token("jwt".to_string());
        assert_eq!(store.backend_url(), "http://b.example");
        assert_eq!(store.access_token().as_deref(), Some("jwt"));
        store.clear_token();
        assert_eq!(store.access_token(), None);
    }

    #[test]
    fn cells_are_independent() {
        let session = SessionState::new("http://a.example", Some("jwt".into()));
        session.clear_token();
        assert_eq!(session.backend_url(), "http://a.example");
        assert_eq!(session.access_token(), None);
    }
}
