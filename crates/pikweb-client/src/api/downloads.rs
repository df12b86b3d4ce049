use pikweb_api_models::{
    DownloadBeginReq, DownloadBeginResp, DownloadPauseReq, DownloadPauseResp, DownloadRemoveReq,
    DownloadRemoveResp, DownloadResumeReq, DownloadResumeResp, MgetDownloadStatusReq,
    MgetDownloadStatusResp,
};
use pikweb_config::Configuration;

use super::{ApiSurface, HttpCore, RequestOptions};
use crate::error::ApiResult;

macro_rules! download_client {
    ($(#[$doc:meta])* $name:ident, $operation:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            core: HttpCore,
        }

        impl ApiSurface for $name {
            const NAME: &'static str = $operation;

            fn from_config(config: Configuration) -> Self {
                Self {
                    core: HttpCore::new(config),
                }
            }

            fn configuration(&self) -> &Configuration {
                self.core.configuration()
            }
        }
    };
}

download_client!(
    /// Client for `POST /api/download_begin`.
    DownloadBeginApi,
    "download_begin"
);
download_client!(
    /// Client for `POST /api/download_pause`.
    DownloadPauseApi,
    "download_pause"
);
download_client!(
    /// Client for `POST /api/download_resume`.
    DownloadResumeApi,
    "download_resume"
);
download_client!(
    /// Client for `POST /api/download_remove`.
    DownloadRemoveApi,
    "download_remove"
);
download_client!(
    /// Client for `POST /api/mget_download_status`.
    MgetDownloadStatusApi,
    "mget_download_status"
);

impl DownloadBeginApi {
    /// Queue a remote file for download on the backend host.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) when the call fails at any
    /// stage.
    pub async fn download_begin(
        &self,
        req: &DownloadBeginReq,
        options: &RequestOptions,
    ) -> ApiResult<DownloadBeginResp> {
        self.core
            .post_json(Self::NAME, "/api/download_begin", req, options)
            .await
    }
}

impl DownloadPauseApi {
    /// Pause a running download.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) when the call fails at any
    /// stage.
    pub async fn download_pause(
        &self,
        req: &DownloadPauseReq,
        options: &RequestOptions,
    ) -> ApiResult<DownloadPauseResp> {
        self.core
            .post_json(Self::NAME, "/api/download_pause", req, options)
            .await
    }
}

impl DownloadResumeApi {
    /// Resume a paused download.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) when the call fails at any
    /// stage.
    pub async fn download_resume(
        &self,
        req: &DownloadResumeReq,
        options: &RequestOptions,
    ) -> ApiResult<DownloadResumeResp> {
        self.core
            .post_json(Self::NAME, "/api/download_resume", req, options)
            .await
    }
}

impl DownloadRemoveApi {
    /// Drop a download, optionally deleting the local file.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) when the call fails at any
    /// stage.
    pub async fn download_remove(
        &self,
        req: &DownloadRemoveReq,
        options: &RequestOptions,
    ) -> ApiResult<DownloadRemoveResp> {
        self.core
            .post_json(Self::NAME, "/api/download_remove", req, options)
            .await
    }
}

impl MgetDownloadStatusApi {
    /// Fetch progress snapshots for every download matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) when the call fails at any
    /// stage.
    pub async fn mget_download_status(
        &self,
        req: &MgetDownloadStatusReq,
        options: &RequestOptions,
    ) -> ApiResult<MgetDownloadStatusResp> {
        self.core
            .post_json(Self::NAME, "/api/mget_download_status", req, options)
            .await
    }
}
