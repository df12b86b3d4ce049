#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Runtime configuration state shared by every API client.
//!
//! Layout: `model.rs` (the immutable per-client [`Configuration`]), `store.rs`
//! (the backend-URL and token cells plus the [`ConfigProvider`] and
//! [`SessionStore`] seams handed to client caches and services).

pub mod model;
pub mod store;

pub use model::Configuration;
pub use store::{BackendUrlStore, ConfigProvider, SessionState, SessionStore, TokenStore};
