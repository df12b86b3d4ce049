use pikweb_api_models::{RemoteListReq, RemoteListResp};
use pikweb_config::Configuration;

use super::{ApiSurface, HttpCore, RequestOptions};
use crate::error::ApiResult;

/// Client for `GET /api/remote_list`.
#[derive(Debug, Clone)]
pub struct RemoteListApi {
    core: HttpCore,
}

impl RemoteListApi {
    /// List the entries of a remote folder.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) when the call fails at any
    /// stage.
    pub async fn remote_list(
        &self,
        req: &RemoteListReq,
        options: &RequestOptions,
    ) -> ApiResult<RemoteListResp> {
        self.core
            .get_query(Self::NAME, "/api/remote_list", req, options)
            .await
    }
}

impl ApiSurface for RemoteListApi {
    const NAME: &'static str = "remote_list";

    fn from_config(config: Configuration) -> Self {
        Self {
            core: HttpCore::new(config),
        }
    }

    fn configuration(&self) -> &Configuration {
        self.core.configuration()
    }
}
