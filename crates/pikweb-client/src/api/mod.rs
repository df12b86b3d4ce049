//! Typed API clients, one per backend operation.
//!
//! Every client wraps an [`HttpCore`] built from a single [`Configuration`];
//! the core owns the `reqwest` client, endpoint resolution, and the mapping
//! of HTTP outcomes onto [`ApiError`].

mod auth;
mod downloads;
mod files;

use std::time::Duration;

use pikweb_api_models::{BaseResp, Envelope};
use pikweb_config::Configuration;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{ApiError, ApiResult};

pub use auth::LoginApi;
pub use downloads::{
    DownloadBeginApi, DownloadPauseApi, DownloadRemoveApi, DownloadResumeApi,
    MgetDownloadStatusApi,
};
pub use files::RemoteListApi;

/// A client type that can be built from a [`Configuration`].
pub trait ApiSurface: Send + Sync + 'static {
    /// Operation name used in logs and errors.
    const NAME: &'static str;

    /// Build a client bound to `config`. Never fails; problems with the
    /// configuration surface on the first call.
    fn from_config(config: Configuration) -> Self;

    /// Configuration the client was built with.
    fn configuration(&self) -> &Configuration;
}

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Timeout for this call, replacing the configured default.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options with a timeout budget.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpCore {
    config: Configuration,
    client: Result<Client, String>,
}

impl HttpCore {
    pub(crate) fn new(config: Configuration) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    pub(crate) const fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub(crate) async fn post_json<B, R>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + Envelope,
    {
        let url = self.endpoint(operation, path)?;
        let request = self.client(operation)?.post(url).json(body);
        self.execute(operation, request, options).await
    }

    pub(crate) async fn get_query<Q, R>(
        &self,
        operation: &'static str,
        path: &str,
        query: &Q,
        options: &RequestOptions,
    ) -> ApiResult<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned + Envelope,
    {
        let url = self.endpoint(operation, path)?;
        let request = self.client(operation)?.get(url).query(query);
        self.execute(operation, request, options).await
    }

    fn client(&self, operation: &'static str) -> ApiResult<&Client> {
        self.client
            .as_ref()
            .map_err(|detail| ApiError::setup(operation, detail.clone()))
    }

    fn endpoint(&self, operation: &'static str, path: &str) -> ApiResult<Url> {
        let base = self.config.base_url().trim_end_matches('/');
        let raw = format!("{base}/{}", path.trim_start_matches('/'));
        Url::parse(&raw)
            .map_err(|err| ApiError::setup(operation, format!("invalid endpoint '{raw}': {err}")))
    }

    async fn execute<R>(
        &self,
        operation: &'static str,
        mut request: RequestBuilder,
        options: &RequestOptions,
    ) -> ApiResult<R>
    where
        R: DeserializeOwned + Envelope,
    {
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::from_send(operation, err))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::from_send(operation, err))?;
        trace!(operation, %status, len = bytes.len(), "response received");

        if !status.is_success() {
            let server = serde_json::from_slice::<serde_json::Value>(&bytes)
                .ok()
                .and_then(|body| BaseResp::from_error_body(&body));
            debug!(operation, %status, structured = server.is_some(), "request failed");
            return Err(ApiError::Status {
                operation,
                status,
                server,
            });
        }

        let body = serde_json::from_slice::<R>(&bytes)
            .map_err(|source| ApiError::Decode { operation, source })?;
        let envelope = body.base_resp();
        if !envelope.is_success() {
            return Err(ApiError::Server {
                operation,
                code: envelope.code,
                message: envelope.message.clone(),
            });
        }
        Ok(body)
    }
}

fn build_client(config: &Configuration) -> Result<Client, String> {
    let mut headers = HeaderMap::new();
    if let Some(token) = config.access_token() {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| "access token contains invalid header characters".to_string())?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| format!("failed to build HTTP client: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NO_RESPONSE_MESSAGE, REQUEST_SETUP_MESSAGE};

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let core = HttpCore::new(Configuration::new("http://a.example/pikpak/", None, None));
        let url = core.endpoint("login", "/api/login").expect("valid");
        assert_eq!(url.as_str(), "http://a.example/pikpak/api/login");
    }

    #[test]
    fn endpoint_rejects_unparsable_base() {
        let core = HttpCore::new(Configuration::new("not a url", None, None));
        let err = core.endpoint("login", "/api/login").expect_err("invalid");
        assert_eq!(err.display_message(), REQUEST_SETUP_MESSAGE);
    }

    #[test]
    fn token_with_newline_is_a_setup_failure() {
        let core = HttpCore::new(Configuration::new(
            "http://a.example",
            Some("bad\ntoken".into()),
            None,
        ));
        let err = core.client("remote_list").expect_err("invalid header");
        assert!(matches!(err, ApiError::Setup { .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_reports_no_response() {
        let base = pikweb_test_support::net::unreachable_base_url();
        let core = HttpCore::new(Configuration::new(base, None, None));
        let err = core
            .post_json::<_, BaseResp>(
                "download_pause",
                "/api/download_pause",
                &serde_json::json!({ "file_id": "f1" }),
                &RequestOptions::with_timeout(Duration::from_secs(2)),
            )
            .await
            .expect_err("nothing is listening");
        assert!(matches!(err, ApiError::NoResponse { .. }));
        assert_eq!(err.display_message(), NO_RESPONSE_MESSAGE);
    }
}
