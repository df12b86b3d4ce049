//! JSON payloads shaped like the backend's responses.

use serde_json::{Value, json};

/// Bare success envelope returned by the download actions.
#[must_use]
pub fn success_envelope() -> Value {
    json!({ "code": 0, "message": "success" })
}

/// Failure envelope as produced by a backend handler error.
#[must_use]
pub fn error_envelope(code: i64, message: &str) -> Value {
    json!({ "code": code, "message": message })
}

/// Successful login response carrying `token`.
#[must_use]
pub fn login_success(token: &str) -> Value {
    json!({ "code": 0, "message": "success", "token": token })
}

/// Listing with one folder and one file.
#[must_use]
pub fn remote_list_payload() -> Value {
    json!({
        "code": 0,
        "message": "success",
        "files": [
            {
                "kind": "drive#folder",
                "id": "VNfolder01",
                "parent_id": "",
                "name": "Movies",
                "size": "0",
                "file_extension": "",
                "mime_type": "",
                "created_time": "2024-03-01T10:00:00.000+08:00",
                "modified_time": "2024-03-01T10:00:00.000+08:00",
                "phase": "PHASE_TYPE_COMPLETE"
            },
            {
                "kind": "drive#file",
                "id": "VNfile0001",
                "parent_id": "",
                "name": "trailer.mp4",
                "size": "10485760",
                "file_extension": ".mp4",
                "mime_type": "video/mp4",
                "created_time": "2024-03-02T10:00:00.000+08:00",
                "modified_time": "2024-03-02T10:00:00.000+08:00",
                "phase": "PHASE_TYPE_COMPLETE"
            }
        ]
    })
}

/// Status listing with one running and one failed download.
#[must_use]
pub fn download_status_payload() -> Value {
    json!({
        "code": 0,
        "message": "success",
        "download_status": [
            {
                "total": 10_485_760,
                "downloaded": 5_242_880,
                "current_speed": 1_048_576.0,
                "downloaded_time": 5,
                "file_id": "VNfile0001",
                "remote_file_name": "trailer.mp4",
                "download_to_local_path": "/data/trailer.mp4",
                "status": "Downloading"
            },
            {
                "total": 2048,
                "downloaded": 0,
                "current_speed": 0.0,
                "downloaded_time": 0,
                "file_id": "VNfile0002",
                "remote_file_name": "notes.txt",
                "download_to_local_path": "/data/notes.txt",
                "status": { "HasError": "disk full" }
            }
        ]
    })
}
