//! Error types for API calls and the display-message normaliser.

use pikweb_api_models::BaseResp;
use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when a request went out but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str = "No response received from server";
/// Message shown when a request could not be built or sent at all.
pub const REQUEST_SETUP_MESSAGE: &str = "Error in request setup";

/// Convenience alias for API call results.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be constructed (bad base URL, unencodable body,
    /// unusable token header).
    #[error("request setup failed for {operation}: {detail}")]
    Setup {
        /// Operation that failed.
        operation: &'static str,
        /// What went wrong while building the request.
        detail: String,
    },
    /// The request was sent but no response arrived (connect failure,
    /// timeout, connection reset).
    #[error("no response received for {operation}")]
    NoResponse {
        /// Operation that failed.
        operation: &'static str,
        /// Transport error.
        source: reqwest::Error,
    },
    /// The backend answered with a success status but a failing envelope.
    #[error("{operation} rejected by server (code {code}): {message}")]
    Server {
        /// Operation that failed.
        operation: &'static str,
        /// Envelope code.
        code: i32,
        /// Envelope message.
        message: String,
    },
    /// The backend answered with a non-success HTTP status.
    #[error("request failed with status code {}", .status.as_u16())]
    Status {
        /// Operation that failed.
        operation: &'static str,
        /// HTTP status returned.
        status: StatusCode,
        /// Structured error body, when the response carried one.
        server: Option<BaseResp>,
    },
    /// The backend answered with a success status but an unreadable body.
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        /// Operation that failed.
        operation: &'static str,
        /// Decoder error.
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Operation the failure belongs to.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Setup { operation, .. }
            | Self::NoResponse { operation, .. }
            | Self::Server { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. } => operation,
        }
    }

    /// Single human-readable message for display.
    ///
    /// A structured server message wins; otherwise a received response falls
    /// back to the raw transport message, a missing response to
    /// [`NO_RESPONSE_MESSAGE`], and an unsent request to
    /// [`REQUEST_SETUP_MESSAGE`]. The result is never empty.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Server { code, message, .. } => non_empty(message)
                .unwrap_or_else(|| format!("server reported error code {code}")),
            Self::Status { status, server, .. } => server
                .as_ref()
                .and_then(|body| non_empty(&body.message))
                .unwrap_or_else(|| transport_message(*status)),
            Self::Decode { source, .. } => {
                non_empty(&source.to_string()).unwrap_or_else(|| "invalid response body".into())
            }
            Self::NoResponse { .. } => NO_RESPONSE_MESSAGE.to_string(),
            Self::Setup { .. } => REQUEST_SETUP_MESSAGE.to_string(),
        }
    }

    pub(crate) fn setup(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::Setup {
            operation,
            detail: detail.into(),
        }
    }

    /// Classify a `reqwest` send failure.
    pub(crate) fn from_send(operation: &'static str, err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::setup(operation, err.to_string())
        } else {
            Self::NoResponse {
                operation,
                source: err,
            }
        }
    }
}

/// Normalise `error` into the message shown to the user.
#[must_use]
pub fn parse_api_error(error: &ApiError) -> String {
    error.display_message()
}

fn transport_message(status: StatusCode) -> String {
    format!("request failed with status code {}", status.as_u16())
}

fn non_empty(message: &str) -> Option<String> {
    let trimmed = message.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
