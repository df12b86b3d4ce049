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
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the download-manager backend API.
//!
//! Every response body flattens a [`BaseResp`] envelope (`code` + `message`)
//! next to its payload. The backend answers `{ "code": 0, "message": "success" }`
//! on success and `code: -1` with the error text when a handler fails, so the
//! envelope doubles as the structured error shape recognised by the client.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope code reported by the backend on success.
pub const SUCCESS_CODE: i32 = 0;
/// Envelope code reported by the backend when a handler fails.
pub const ERROR_CODE: i32 = -1;

/// Status envelope carried by every backend response.
///
/// Both fields are required on the wire; a body missing either is not a
/// valid response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaseResp {
    /// Application status code; `0` means success.
    pub code: i32,
    /// Human-readable status message.
    pub message: String,
}

impl Default for BaseResp {
    fn default() -> Self {
        Self {
            code: SUCCESS_CODE,
            message: "success".to_string(),
        }
    }
}

impl BaseResp {
    /// Build a failure envelope carrying `message`.
    #[must_use]
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            code: ERROR_CODE,
            message: message.into(),
        }
    }

    /// Whether the envelope reports success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Recognise a structured server error inside an arbitrary JSON body.
    ///
    /// The body must be a JSON object with a string `message` field. A missing
    /// or non-integer `code` is reported as [`ERROR_CODE`].
    #[must_use]
    pub fn from_error_body(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let message = object.get("message")?.as_str()?;
        let code = object
            .get("code")
            .and_then(Value::as_i64)
            .and_then(|code| i32::try_from(code).ok())
            .unwrap_or(ERROR_CODE);
        Some(Self {
            code,
            message: message.to_string(),
        })
    }
}

/// Access to the status envelope embedded in a response body.
pub trait Envelope {
    /// Borrow the flattened [`BaseResp`].
    fn base_resp(&self) -> &BaseResp;
}

impl Envelope for BaseResp {
    fn base_resp(&self) -> &BaseResp {
        self
    }
}

/// Credentials submitted to `POST /api/login`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginReq {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginReq")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Response to a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResp {
    #[serde(flatten)]
    /// Status envelope.
    pub base_resp: BaseResp,
    /// Bearer token for subsequent authenticated calls.
    pub token: String,
}

impl Envelope for LoginResp {
    fn base_resp(&self) -> &BaseResp {
        &self.base_resp
    }
}

/// Query for `GET /api/remote_list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RemoteListReq {
    /// Remote folder path, `/` for the drive root.
    pub path: String,
}

/// Kind tag the remote drive uses for folders.
pub const FOLDER_KIND: &str = "drive#folder";

/// File or folder entry in the remote drive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RemoteFile {
    /// Entry kind (`drive#file` or `drive#folder`).
    pub kind: String,
    /// Remote identifier used by the download operations.
    pub id: String,
    /// Identifier of the containing folder.
    pub parent_id: String,
    /// Display name.
    pub name: String,
    /// Size in bytes, as reported by the drive (decimal string).
    pub size: String,
    /// File extension including the leading dot.
    pub file_extension: String,
    /// MIME type reported by the drive.
    pub mime_type: String,
    /// Creation timestamp (RFC 3339).
    pub created_time: String,
    /// Last modification timestamp (RFC 3339).
    pub modified_time: String,
    /// Drive-side processing phase.
    pub phase: String,
}

impl RemoteFile {
    /// Whether the entry is a folder.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == FOLDER_KIND
    }

    /// Parsed byte size; `None` when the drive reported no usable value.
    #[must_use]
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.trim().parse().ok()
    }
}

/// Listing of a remote folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RemoteListResp {
    #[serde(flatten)]
    /// Status envelope.
    pub base_resp: BaseResp,
    #[serde(default)]
    /// Entries of the requested folder.
    pub files: Vec<RemoteFile>,
}

impl Envelope for RemoteListResp {
    fn base_resp(&self) -> &BaseResp {
        &self.base_resp
    }
}

/// Body for `POST /api/download_begin`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadBeginReq {
    /// Remote file to download.
    pub file_id: String,
    /// Local directory the backend writes into.
    pub output_dir: String,
    /// Local file name; empty keeps the remote name.
    pub rename: String,
}

/// Body for `POST /api/download_pause`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadPauseReq {
    /// Download to pause.
    pub file_id: String,
}

/// Body for `POST /api/download_resume`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadResumeReq {
    /// Download to resume.
    pub file_id: String,
}

/// Body for `POST /api/download_remove`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadRemoveReq {
    /// Download to remove.
    pub file_id: String,
    /// Also delete the partially or fully downloaded local file.
    pub need_remove_file: bool,
}

/// Response to `download_begin`.
pub type DownloadBeginResp = BaseResp;
/// Response to `download_pause`.
pub type DownloadPauseResp = BaseResp;
/// Response to `download_resume`.
pub type DownloadResumeResp = BaseResp;
/// Response to `download_remove`.
pub type DownloadRemoveResp = BaseResp;

/// Status filter accepted by `mget_download_status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Transfers currently moving bytes.
    Downloading,
    /// Transfers paused by the user.
    Paused,
    /// Finished transfers.
    Completed,
    /// Transfers queued behind the concurrency limit.
    Waiting,
    /// Transfers that stopped with an error.
    HasError,
}

/// Body for `POST /api/mget_download_status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MgetDownloadStatusReq {
    /// Restrict the result to these states; `None` returns everything.
    pub filter: Option<Vec<Filter>>,
}

/// Lifecycle state of a download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadStatusKind {
    /// Transfer in progress.
    Downloading,
    /// Paused by the user.
    Paused,
    /// Finished.
    Completed,
    /// Queued.
    Waiting,
    /// Stopped with the contained error text.
    HasError(String),
}

impl DownloadStatusKind {
    /// Short lowercase label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Downloading => "downloading",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Waiting => "waiting",
            Self::HasError(_) => "error",
        }
    }
}

/// Progress snapshot for one download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadStatus {
    /// Total bytes of the remote file.
    pub total: u64,
    /// Bytes written so far.
    pub downloaded: u64,
    /// Current throughput in bytes per second.
    pub current_speed: f64,
    /// Seconds spent downloading.
    pub downloaded_time: u64,
    /// Remote file identifier.
    pub file_id: String,
    /// Remote file name.
    pub remote_file_name: String,
    /// Destination path on the backend host.
    pub download_to_local_path: String,
    /// Lifecycle state.
    pub status: DownloadStatusKind,
}

impl DownloadStatus {
    /// Completion percentage in `0.0..=100.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return if matches!(self.status, DownloadStatusKind::Completed) {
                100.0
            } else {
                0.0
            };
        }
        (self.downloaded as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Response to `mget_download_status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MgetDownloadStatusResp {
    #[serde(flatten)]
    /// Status envelope.
    pub base_resp: BaseResp,
    #[serde(default)]
    /// Snapshots for every matching download.
    pub download_status: Vec<DownloadStatus>,
}

impl Envelope for MgetDownloadStatusResp {
    fn base_resp(&self) -> &BaseResp {
        &self.base_resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_body_with_message_is_recognised() {
        let body = json!({ "code": 4001, "message": "invalid credentials" });
        let resp = BaseResp::from_error_body(&body).expect("recognised");
        assert_eq!(resp.code, 4001);
        assert_eq!(resp.message, "invalid credentials");
    }

    #[test]
    fn error_body_without_code_defaults_to_error_code() {
        let body = json!({ "message": "boom" });
        let resp = BaseResp::from_error_body(&body).expect("recognised");
        assert_eq!(resp.code, ERROR_CODE);
    }

    #[test]
    fn error_body_shapes_without_string_message_are_rejected() {
        assert!(BaseResp::from_error_body(&json!({ "code": 1 })).is_none());
        assert!(BaseResp::from_error_body(&json!({ "message": 12 })).is_none());
        assert!(BaseResp::from_error_body(&json!(["message"])).is_none());
        assert!(BaseResp::from_error_body(&json!("message")).is_none());
    }

    #[test]
    fn login_req_debug_masks_password() {
        let req = LoginReq {
            email: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{req:?}");
        assert!(rendered.contains("user@example.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn login_resp_reads_flattened_envelope() {
        let resp: LoginResp = serde_json::from_value(json!({
            "code": 0,
            "message": "success",
            "token": "jwt-token"
        }))
        .expect("decode");
        assert!(resp.base_resp().is_success());
        assert_eq!(resp.token, "jwt-token");
    }

    #[test]
    fn empty_object_is_not_an_envelope() {
        assert!(serde_json::from_value::<BaseResp>(json!({})).is_err());
        assert!(serde_json::from_value::<BaseResp>(json!({ "code": 0 })).is_err());
        assert!(serde_json::from_value::<BaseResp>(json!({ "message": "success" })).is_err());
    }

    #[test]
    fn login_resp_without_token_field_is_rejected() {
        let decoded = serde_json::from_value::<LoginResp>(json!({
            "code": 0,
            "message": "success",
            "jwt": "x"
        }));
        assert!(decoded.is_err());
    }

    #[test]
    fn download_status_decodes_tagged_error_state() {
        let resp: MgetDownloadStatusResp = serde_json::from_value(json!({
            "code": 0,
            "message": "success",
            "download_status": [
                {
                    "total": 200,
                    "downloaded": 50,
                    "current_speed": 12.5,
                    "downloaded_time": 4,
                    "file_id": "f1",
                    "remote_file_name": "movie.mkv",
                    "download_to_local_path": "/data/movie.mkv",
                    "status": "Downloading"
                },
                {
                    "total": 10,
                    "downloaded": 0,
                    "current_speed": 0.0,
                    "downloaded_time": 0,
                    "file_id": "f2",
                    "remote_file_name": "broken.bin",
                    "download_to_local_path": "/data/broken.bin",
                    "status": { "HasError": "disk full" }
                }
            ]
        }))
        .expect("decode");

        assert_eq!(resp.download_status.len(), 2);
        assert!((resp.download_status[0].percent_complete() - 25.0).abs() < f64::EPSILON);
        assert_eq!(
            resp.download_status[1].status,
            DownloadStatusKind::HasError("disk full".to_string())
        );
        assert_eq!(resp.download_status[1].status.label(), "error");
    }

    #[test]
    fn status_filter_serialises_as_variant_names() {
        let req = MgetDownloadStatusReq {
            filter: Some(vec![Filter::Paused, Filter::HasError]),
        };
        assert_eq!(
            serde_json::to_value(&req).expect("encode"),
            json!({ "filter": ["Paused", "HasError"] })
        );
        assert_eq!(
            serde_json::to_value(MgetDownloadStatusReq::default()).expect("encode"),
            json!({ "filter": null })
        );
    }

    #[test]
    fn remote_file_tolerates_sparse_entries() {
        let file: RemoteFile = serde_json::from_value(json!({
            "kind": "drive#folder",
            "id": "abc",
            "name": "Movies"
        }))
        .expect("decode");
        assert!(file.is_folder());
        assert_eq!(file.size_bytes(), None);
    }

    #[test]
    fn zero_total_reports_completion_by_state() {
        let mut status = DownloadStatus {
            total: 0,
            downloaded: 0,
            current_speed: 0.0,
            downloaded_time: 0,
            file_id: "f".into(),
            remote_file_name: "empty".into(),
            download_to_local_path: "/tmp/empty".into(),
            status: DownloadStatusKind::Waiting,
        };
        assert!(status.percent_complete().abs() < f64::EPSILON);
        status.status = DownloadStatusKind::Completed;
        assert!((status.percent_complete() - 100.0).abs() < f64::EPSILON);
    }
}
