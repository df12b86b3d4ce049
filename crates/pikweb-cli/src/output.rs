//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use pikweb_api_models::{
    BaseResp, DownloadStatusKind, LoginResp, MgetDownloadStatusResp, RemoteListResp,
};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Outcome of a single download action.
#[derive(Debug, Serialize)]
pub(crate) struct ActionReport<'a> {
    pub(crate) action: &'static str,
    pub(crate) file_id: &'a str,
    pub(crate) code: i32,
    pub(crate) message: &'a str,
}

impl<'a> ActionReport<'a> {
    pub(crate) fn new(action: &'static str, file_id: &'a str, resp: &'a BaseResp) -> Self {
        Self {
            action,
            file_id,
            code: resp.code,
            message: &resp.message,
        }
    }
}

pub(crate) fn render_login(resp: &LoginResp, format: OutputFormat) -> CliResult<()> {
    emit(format, resp, || format!("logged in\ntoken: {}\n", resp.token))
}

pub(crate) fn render_remote_list(resp: &RemoteListResp, format: OutputFormat) -> CliResult<()> {
    emit(format, &resp.files, || remote_list_table(resp))
}

pub(crate) fn render_download_status(
    resp: &MgetDownloadStatusResp,
    format: OutputFormat,
) -> CliResult<()> {
    emit(format, &resp.download_status, || download_status_table(resp))
}

pub(crate) fn render_action(report: &ActionReport<'_>, format: OutputFormat) -> CliResult<()> {
    emit(format, report, || {
        format!("{} {}\n", report.action, report.file_id)
    })
}

fn emit<T, F>(format: OutputFormat, value: &T, table: F) -> CliResult<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Json => println!("{}", to_json(value)?),
        OutputFormat::Table => print!("{}", table()),
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn remote_list_table(resp: &RemoteListResp) -> String {
    let mut out = format!("{:<24} {:<4} {:>11} NAME\n", "ID", "TYPE", "SIZE");
    for file in &resp.files {
        let (kind, size, name) = if file.is_folder() {
            ("dir", "-".to_string(), format!("{}/", file.name))
        } else {
            let size = file
                .size_bytes()
                .map_or_else(|| "?".to_string(), format_bytes);
            ("file", size, file.name.clone())
        };
        let _ = writeln!(out, "{:<24} {kind:<4} {size:>11} {name}", file.id);
    }
    if resp.files.is_empty() {
        out.push_str("(empty)\n");
    }
    out
}

fn download_status_table(resp: &MgetDownloadStatusResp) -> String {
    let mut out = format!(
        "{:<24} {:<11} {:>7} {:>11} {:>13} NAME\n",
        "ID", "STATE", "PROG", "SIZE", "SPEED"
    );
    for status in &resp.download_status {
        let progress = format!("{:.1}%", status.percent_complete());
        let _ = writeln!(
            out,
            "{:<24} {:<11} {:>7} {:>11} {:>13} {}",
            status.file_id,
            status.status.label(),
            progress,
            format_bytes(status.total),
            format_speed(status.current_speed),
            status.remote_file_name
        );
        if let DownloadStatusKind::HasError(reason) = &status.status {
            let _ = writeln!(out, "  reason: {reason}");
        }
    }
    out
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    scaled(bytes_to_f64(bytes), "")
}

fn format_speed(bytes_per_sec: f64) -> String {
    if !bytes_per_sec.is_finite() || bytes_per_sec < 1024.0 {
        let whole = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
            bytes_per_sec
        } else {
            0.0
        };
        return format!("{whole:.0} B/s");
    }
    scaled(bytes_per_sec, "/s")
}

fn scaled(value: f64, suffix: &str) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    let mut scaled = value / 1024.0;
    let mut unit = UNITS[0];
    for next in UNITS.into_iter().skip(1) {
        if scaled < 1024.0 {
            break;
        }
        scaled /= 1024.0;
        unit = next;
    }
    format!("{scaled:.2} {unit}{suffix}")
}

fn bytes_to_f64(value: u64) -> f64 {
    let high = u32::try_from(value >> 32).unwrap_or(u32::MAX);
    let low = u32::try_from(value & 0xFFFF_FFFF).unwrap_or(u32::MAX);
    f64::from(high) * 4_294_967_296.0 + f64::from(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pikweb_test_support::fixtures::{download_status_payload, remote_list_payload};

    fn listing() -> RemoteListResp {
        serde_json::from_value(remote_list_payload()).expect("listing decodes")
    }

    fn statuses() -> MgetDownloadStatusResp {
        serde_json::from_value(download_status_payload()).expect("status decodes")
    }

    #[test]
    fn format_bytes_scales_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(10_485_760), "10.00 MiB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GiB");
    }

    #[test]
    fn format_speed_handles_small_and_invalid_rates() {
        assert_eq!(format_speed(0.0), "0 B/s");
        assert_eq!(format_speed(f64::NAN), "0 B/s");
        assert_eq!(format_speed(-5.0), "0 B/s");
        assert_eq!(format_speed(1_048_576.0), "1.00 MiB/s");
    }

    #[test]
    fn remote_list_table_marks_folders() {
        let table = remote_list_table(&listing());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("dir"));
        assert!(lines[1].ends_with("Movies/"));
        assert!(lines[2].contains("10.00 MiB"));
        assert!(lines[2].ends_with("trailer.mp4"));
    }

    #[test]
    fn empty_listing_says_so() {
        let table = remote_list_table(&RemoteListResp::default());
        assert!(table.ends_with("(empty)\n"));
    }

    #[test]
    fn status_table_shows_progress_and_errors() {
        let table = download_status_table(&statuses());
        assert!(table.contains("downloading"));
        assert!(table.contains("50.0%"));
        assert!(table.contains("1.00 MiB/s"));
        assert!(table.contains("  reason: disk full"));
    }

    #[test]
    fn action_report_serialises_envelope() -> CliResult<()> {
        let resp = BaseResp::default();
        let report = ActionReport::new("paused", "f1", &resp);
        let value: serde_json::Value = serde_json::from_str(&to_json(&report)?)
            .map_err(|err| CliError::failure(anyhow!(err)))?;
        assert_eq!(value["action"], "paused");
        assert_eq!(value["file_id"], "f1");
        assert_eq!(value["code"], 0);
        Ok(())
    }

    #[test]
    fn json_rendering_lists_files() -> CliResult<()> {
        let text = to_json(&listing().files)?;
        assert!(text.contains("\"trailer.mp4\""));
        Ok(())
    }
}
