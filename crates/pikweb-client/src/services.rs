//! Typed service calls backed by one client cache per API surface.

use std::sync::Arc;
use std::time::Duration;

use pikweb_api_models::{
    DownloadBeginReq, DownloadBeginResp, DownloadPauseReq, DownloadPauseResp, DownloadRemoveReq,
    DownloadRemoveResp, DownloadResumeReq, DownloadResumeResp, Filter, LoginReq, LoginResp,
    MgetDownloadStatusReq, MgetDownloadStatusResp, RemoteListReq, RemoteListResp,
};
use pikweb_config::{ConfigProvider, SessionStore};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::api::{
    ApiSurface, DownloadBeginApi, DownloadPauseApi, DownloadRemoveApi, DownloadResumeApi, LoginApi,
    MgetDownloadStatusApi, RemoteListApi, RequestOptions,
};
use crate::cache::{ClientCache, StalenessPolicy};
use crate::error::ApiResult;

/// Timeout budget for each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTimeouts {
    /// Budget for `login`.
    pub login: Duration,
    /// Budget for `remote_list`.
    pub remote_list: Duration,
    /// Budget for `download_begin`.
    pub download_begin: Duration,
    /// Budget for `download_pause`.
    pub download_pause: Duration,
    /// Budget for `download_resume`.
    pub download_resume: Duration,
    /// Budget for `download_remove`.
    pub download_remove: Duration,
    /// Budget for `mget_download_status`.
    pub mget_download_status: Duration,
}

impl Default for OperationTimeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(10),
            remote_list: Duration::from_secs(4),
            download_begin: Duration::from_secs(8),
            download_pause: Duration::from_secs(4),
            download_resume: Duration::from_secs(4),
            download_remove: Duration::from_secs(8),
            mget_download_status: Duration::from_secs(2),
        }
    }
}

impl OperationTimeouts {
    /// The same budget for every operation.
    #[must_use]
    pub const fn uniform(timeout: Duration) -> Self {
        Self {
            login: timeout,
            remote_list: timeout,
            download_begin: timeout,
            download_pause: timeout,
            download_resume: timeout,
            download_remove: timeout,
            mget_download_status: timeout,
        }
    }
}

/// Entry point for every backend call.
///
/// Each operation owns a [`ClientCache`], so a backend URL change made through
/// [`Services::set_backend_url`] is honoured by the very next call.
pub struct Services {
    session: Arc<dyn SessionStore>,
    timeouts: OperationTimeouts,
    login: ClientCache<LoginApi>,
    remote_list: ClientCache<RemoteListApi>,
    download_begin: ClientCache<DownloadBeginApi>,
    download_pause: ClientCache<DownloadPauseApi>,
    download_resume: ClientCache<DownloadResumeApi>,
    download_remove: ClientCache<DownloadRemoveApi>,
    mget_download_status: ClientCache<MgetDownloadStatusApi>,
}

impl Services {
    /// Services with the default staleness policy and timeout budgets.
    #[must_use]
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self::with_options(
            session,
            StalenessPolicy::default(),
            OperationTimeouts::default(),
        )
    }

    /// Services with an explicit staleness policy and timeout budgets.
    #[must_use]
    pub fn with_options(
        session: Arc<dyn SessionStore>,
        policy: StalenessPolicy,
        timeouts: OperationTimeouts,
    ) -> Self {
        let provider: Arc<dyn ConfigProvider> = session.clone();
        Self {
            login: surface_cache(&provider, policy),
            remote_list: surface_cache(&provider, policy),
            download_begin: surface_cache(&provider, policy),
            download_pause: surface_cache(&provider, policy),
            download_resume: surface_cache(&provider, policy),
            download_remove: surface_cache(&provider, policy),
            mget_download_status: surface_cache(&provider, policy),
            session,
            timeouts,
        }
    }

    /// Shared session state.
    #[must_use]
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Active timeout budgets.
    #[must_use]
    pub const fn timeouts(&self) -> &OperationTimeouts {
        &self.timeouts
    }

    /// Point subsequent calls at `url`.
    pub fn set_backend_url(&self, url: impl Into<String>) {
        let url = url.into();
        info!(url = %url, "switching backend");
        self.session.set_backend_url(url);
    }

    /// Forget the bearer token.
    pub fn logout(&self) {
        self.session.clear_token();
    }

    /// Log in and store the returned token for later calls.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`](crate::ApiError); the stored token is
    /// left untouched on failure.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResp> {
        let req = LoginReq {
            email: email.to_string(),
            password: password.to_string(),
        };
        let options = RequestOptions::with_timeout(self.timeouts.login);
        let client = self.login.get_client();
        debug!(email = %mask_email(email), "logging in");
        let resp = client
            .login(&req, &options)
            .instrument(info_span!("login"))
            .await;
        let resp = observe(LoginApi::NAME, resp)?;
        self.session.set_token(resp.token.clone());
        Ok(resp)
    }

    /// List a remote folder.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`](crate::ApiError).
    pub async fn remote_list(&self, path: &str) -> ApiResult<RemoteListResp> {
        let req = RemoteListReq {
            path: path.to_string(),
        };
        let options = RequestOptions::with_timeout(self.timeouts.remote_list);
        let client = self.remote_list.get_client();
        let resp = client
            .remote_list(&req, &options)
            .instrument(info_span!("remote_list", path))
            .await;
        observe(RemoteListApi::NAME, resp)
    }

    /// Start downloading a remote file on the backend host.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`](crate::ApiError).
    pub async fn download_begin(
        &self,
        file_id: &str,
        output_dir: &str,
        rename: &str,
    ) -> ApiResult<DownloadBeginResp> {
        let req = DownloadBeginReq {
            file_id: file_id.to_string(),
            output_dir: output_dir.to_string(),
            rename: rename.to_string(),
        };
        let options = RequestOptions::with_timeout(self.timeouts.download_begin);
        let client = self.download_begin.get_client();
        let resp = client
            .download_begin(&req, &options)
            .instrument(info_span!("download_begin", file_id))
            .await;
        observe(DownloadBeginApi::NAME, resp)
    }

    /// Pause a download.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`](crate::ApiError).
    pub async fn download_pause(&self, file_id: &str) -> ApiResult<DownloadPauseResp> {
        let req = DownloadPauseReq {
            file_id: file_id.to_string(),
        };
        let options = RequestOptions::with_timeout(self.timeouts.download_pause);
        let client = self.download_pause.get_client();
        let resp = client
            .download_pause(&req, &options)
            .instrument(info_span!("download_pause", file_id))
            .await;
        observe(DownloadPauseApi::NAME, resp)
    }

    /// Resume a paused download.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`](crate::ApiError).
    pub async fn download_resume(&self, file_id: &str) -> ApiResult<DownloadResumeResp> {
        let req = DownloadResumeReq {
            file_id: file_id.to_string(),
        };
        let options = RequestOptions::with_timeout(self.timeouts.download_resume);
        let client = self.download_resume.get_client();
        let resp = client
            .download_resume(&req, &options)
            .instrument(info_span!("download_resume", file_id))
            .await;
        observe(DownloadResumeApi::NAME, resp)
    }

    /// Remove a download, optionally deleting its local file.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`](crate::ApiError).
    pub async fn download_remove(
        &self,
        file_id: &str,
        need_remove_file: bool,
    ) -> ApiResult<DownloadRemoveResp> {
        let req = DownloadRemoveReq {
            file_id: file_id.to_string(),
            need_remove_file,
        };
        let options = RequestOptions::with_timeout(self.timeouts.download_remove);
        let client = self.download_remove.get_client();
        let resp = client
            .download_remove(&req, &options)
            .instrument(info_span!("download_remove", file_id, need_remove_file))
            .await;
        observe(DownloadRemoveApi::NAME, resp)
    }

    /// Fetch download progress, optionally restricted to some states.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`](crate::ApiError).
    pub async fn mget_download_status(
        &self,
        filter: Option<Vec<Filter>>,
    ) -> ApiResult<MgetDownloadStatusResp> {
        let req = MgetDownloadStatusReq { filter };
        let options = RequestOptions::with_timeout(self.timeouts.mget_download_status);
        let client = self.mget_download_status.get_client();
        let resp = client
            .mget_download_status(&req, &options)
            .instrument(info_span!("mget_download_status"))
            .await;
        observe(MgetDownloadStatusApi::NAME, resp)
    }
}

fn surface_cache<C: ApiSurface>(
    provider: &Arc<dyn ConfigProvider>,
    policy: StalenessPolicy,
) -> ClientCache<C> {
    ClientCache::for_surface(Arc::clone(provider)).with_policy(policy)
}

/// Keep the first character of the local part and the whole domain.
fn mask_email(email: &str) -> String {
    let (local, domain) = email.split_once('@').unwrap_or((email, ""));
    let first = local.chars().next().map(String::from).unwrap_or_default();
    if domain.is_empty() {
        format!("{first}***")
    } else {
        format!("{first}***@{domain}")
    }
}

fn observe<T>(operation: &'static str, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(err) = &result {
        warn!(operation, error = %err, message = %err.display_message(), "api call failed");
    }
    result
}
