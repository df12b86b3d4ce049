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
#![allow(clippy::redundant_pub_crate)]

//! Typed HTTP clients for the download-manager backend.
//!
//! Layout:
//! - `api/`: one client type per backend operation plus the shared HTTP core
//! - `cache.rs`: [`ClientCache`], which rebuilds a client when the backend URL changes
//! - `error.rs`: [`ApiError`] and the display-message normaliser
//! - `services.rs`: [`Services`], the per-operation caches behind typed service calls

pub mod api;
pub mod cache;
pub mod error;
pub mod services;

pub use api::{
    ApiSurface, DownloadBeginApi, DownloadPauseApi, DownloadRemoveApi, DownloadResumeApi, LoginApi,
    MgetDownloadStatusApi, RemoteListApi, RequestOptions,
};
pub use cache::{ClientCache, StalenessPolicy};
pub use error::{ApiError, ApiResult, NO_RESPONSE_MESSAGE, REQUEST_SETUP_MESSAGE, parse_api_error};
pub use services::{OperationTimeouts, Services};
