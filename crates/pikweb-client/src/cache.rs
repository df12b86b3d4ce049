//! Client-lifecycle cache.
//!
//! # Design
//! - One cache owns one client instance together with the backend URL (and
//!   token) it was built against.
//! - Every access compares the bound values with the provider and rebuilds
//!   the instance from the factory when they no longer match.
//! - Replaced instances are dropped with their last `Arc`; requests already in
//!   flight on them are left alone.

use std::any::type_name;
use std::sync::{Arc, Mutex, PoisonError};

use pikweb_config::{ConfigProvider, Configuration};
use tracing::debug;

use crate::api::ApiSurface;

/// Which configuration changes invalidate a cached client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalenessPolicy {
    /// Only a backend URL change triggers a rebuild; a rotated token is not
    /// picked up until the URL also changes.
    #[default]
    UrlOnly,
    /// A change to either the backend URL or the token triggers a rebuild.
    UrlOrToken,
}

type Factory<C> = Box<dyn Fn(Configuration) -> C + Send + Sync>;

struct CacheEntry<C> {
    bound_url: String,
    bound_token: Option<String>,
    instance: Arc<C>,
}

impl<C> CacheEntry<C> {
    fn build(config: Configuration, factory: impl Fn(Configuration) -> C) -> Self {
        Self {
            bound_url: config.base_url().to_string(),
            bound_token: config.access_token().map(str::to_string),
            instance: Arc::new(factory(config)),
        }
    }

    fn url_changed(&self, url: &str) -> bool {
        self.bound_url != url
    }

    fn token_changed(&self, token: Option<&str>) -> bool {
        self.bound_token.as_deref() != token
    }
}

/// Lazily rebuilt client bound to the current backend URL.
pub struct ClientCache<C> {
    provider: Arc<dyn ConfigProvider>,
    factory: Factory<C>,
    policy: StalenessPolicy,
    entry: Mutex<CacheEntry<C>>,
}

impl<C> ClientCache<C> {
    /// Build the first instance from `factory` using the provider's current
    /// configuration.
    pub fn new<F>(provider: Arc<dyn ConfigProvider>, factory: F) -> Self
    where
        F: Fn(Configuration) -> C + Send + Sync + 'static,
    {
        let entry = CacheEntry::build(provider.configuration(), &factory);
        Self {
            provider,
            factory: Box::new(factory),
            policy: StalenessPolicy::default(),
            entry: Mutex::new(entry),
        }
    }

    /// Replace the staleness policy.
    #[must_use]
    pub fn with_policy(mut self, policy: StalenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return a client built against the backend URL current at this moment.
    ///
    /// The cached instance is returned as-is while its bound values are
    /// current; otherwise a new instance replaces it.
    pub fn get_client(&self) -> Arc<C> {
        let config = self.provider.configuration();
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);

        let url_changed = entry.url_changed(config.base_url());
        let token_changed = self.policy == StalenessPolicy::UrlOrToken
            && entry.token_changed(config.access_token());
        if !url_changed && !token_changed {
            return Arc::clone(&entry.instance);
        }

        if url_changed {
            debug!(
                client = type_name::<C>(),
                from = %entry.bound_url,
                to = %config.base_url(),
                "url changed"
            );
        } else {
            debug!(client = type_name::<C>(), "token changed");
        }

        *entry = CacheEntry::build(config, &self.factory);
        Arc::clone(&entry.instance)
    }
}

impl<C: ApiSurface> ClientCache<C> {
    /// Cache for one API surface, built with [`ApiSurface::from_config`].
    pub fn for_surface(provider: Arc<dyn ConfigProvider>) -> Self {
        Self::new(provider, C::from_config)
    }
}
