use pikweb_api_models::{LoginReq, LoginResp};
use pikweb_config::Configuration;

use super::{ApiSurface, HttpCore, RequestOptions};
use crate::error::{ApiError, ApiResult};

/// Client for `POST /api/login`.
#[derive(Debug, Clone)]
pub struct LoginApi {
    core: HttpCore,
}

impl LoginApi {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::ApiError) when the request cannot be
    /// sent, the backend is unreachable, or the credentials are rejected. A
    /// successful envelope with a blank token is reported as
    /// [`ApiError::Decode`].
    pub async fn login(&self, req: &LoginReq, options: &RequestOptions) -> ApiResult<LoginResp> {
        let resp: LoginResp = self
            .core
            .post_json(Self::NAME, "/api/login", req, options)
            .await?;
        if resp.token.trim().is_empty() {
            return Err(ApiError::Decode {
                operation: Self::NAME,
                source: serde::de::Error::custom("login response carried an empty token"),
            });
        }
        Ok(resp)
    }
}

impl ApiSurface for LoginApi {
    const NAME: &'static str = "login";

    fn from_config(config: Configuration) -> Self {
        Self {
            core: HttpCore::new(config),
        }
    }

    fn configuration(&self) -> &Configuration {
        self.core.configuration()
    }
}
