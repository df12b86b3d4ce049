//! Application context and error types shared by the command handlers.

use std::sync::Arc;
use std::time::Duration;

use pikweb_client::{ApiError, OperationTimeouts, Services, StalenessPolicy};
use pikweb_config::SessionState;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Failure(anyhow::Error::msg(err.display_message()))
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) services: Services,
}

impl AppContext {
    /// Context bound to `api_url`.
    ///
    /// `timeout_secs` replaces every per-operation budget and becomes the
    /// clients' default timeout when set. Clients are rebuilt on token changes
    /// so a `login` inside the shell takes effect on the next command.
    pub(crate) fn new(api_url: &str, token: Option<String>, timeout_secs: Option<u64>) -> Self {
        let timeout = timeout_secs.map(Duration::from_secs);
        let session = Arc::new(SessionState::new(api_url, token).with_request_timeout(timeout));
        let timeouts = timeout.map_or_else(OperationTimeouts::default, OperationTimeouts::uniform);
        Self {
            services: Services::with_options(session, StalenessPolicy::UrlOrToken, timeouts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pikweb_client::REQUEST_SETUP_MESSAGE;

    #[test]
    fn exit_codes_split_validation_from_failure() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow::anyhow!("boom")).exit_code(), 3);
    }

    #[test]
    fn api_errors_display_their_normalized_message() {
        let err = CliError::from(ApiError::Server {
            operation: "login",
            code: 4001,
            message: "invalid credentials".to_string(),
        });
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.display_message(), "invalid credentials");

        let err = CliError::from(ApiError::Setup {
            operation: "remote_list",
            detail: "relative URL without a base".to_string(),
        });
        assert_eq!(err.display_message(), REQUEST_SETUP_MESSAGE);
    }

    #[test]
    fn explicit_timeout_replaces_every_budget() {
        let ctx = AppContext::new("http://127.0.0.1:1", None, Some(30));
        assert_eq!(
            *ctx.services.timeouts(),
            OperationTimeouts::uniform(Duration::from_secs(30))
        );
        assert_eq!(
            ctx.services.session().configuration().timeout(),
            Some(Duration::from_secs(30))
        );

        let ctx = AppContext::new("http://127.0.0.1:1", Some("jwt".into()), None);
        assert_eq!(*ctx.services.timeouts(), OperationTimeouts::default());
        assert_eq!(ctx.services.session().configuration().timeout(), None);
        assert_eq!(ctx.services.session().access_token().as_deref(), Some("jwt"));
    }
}
