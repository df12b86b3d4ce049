use pikweb_api_models::Filter;

use crate::cli::{BeginArgs, FileArgs, OutputFormat, RemoveArgs, StatusArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{ActionReport, render_action, render_download_status};

pub(crate) async fn handle_download_begin(
    ctx: &AppContext,
    args: BeginArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let file_id = require_file_id(&args.file_id)?;
    let output_dir = args.output_dir.trim();
    if output_dir.is_empty() {
        return Err(CliError::validation("output directory must not be empty"));
    }
    let rename = args.rename.as_deref().map_or("", str::trim);

    let resp = ctx
        .services
        .download_begin(file_id, output_dir, rename)
        .await?;
    render_action(&ActionReport::new("started", file_id, &resp), format)
}

pub(crate) async fn handle_download_pause(
    ctx: &AppContext,
    args: FileArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let file_id = require_file_id(&args.file_id)?;
    let resp = ctx.services.download_pause(file_id).await?;
    render_action(&ActionReport::new("paused", file_id, &resp), format)
}

pub(crate) async fn handle_download_resume(
    ctx: &AppContext,
    args: FileArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let file_id = require_file_id(&args.file_id)?;
    let resp = ctx.services.download_resume(file_id).await?;
    render_action(&ActionReport::new("resumed", file_id, &resp), format)
}

pub(crate) async fn handle_download_remove(
    ctx: &AppContext,
    args: RemoveArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let file_id = require_file_id(&args.file_id)?;
    let resp = ctx
        .services
        .download_remove(file_id, args.delete_file)
        .await?;
    render_action(&ActionReport::new("removed", file_id, &resp), format)
}

pub(crate) async fn handle_download_status(
    ctx: &AppContext,
    args: StatusArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let filter = if args.filter.is_empty() {
        None
    } else {
        Some(args.filter.into_iter().map(Filter::from).collect())
    };
    let resp = ctx.services.mget_download_status(filter).await?;
    render_download_status(&resp, format)
}

fn require_file_id(value: &str) -> CliResult<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation("file id must not be empty"));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use crate::cli::FilterArg;
    use httpmock::prelude::*;
    use pikweb_test_support::fixtures::{download_status_payload, success_envelope};
    use serde_json::json;

    fn context_with(server: &MockServer) -> AppContext {
        AppContext::new(&server.base_url(), Some("jwt".into()), None)
    }

    #[tokio::test]
    async fn begin_sends_trimmed_fields_with_empty_rename() -> CliResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/download_begin")
                .header("authorization", "Bearer jwt")
                .json_body(json!({
                    "file_id": "VNfile0001",
                    "output_dir": "/data",
                    "rename": ""
                }));
            then.status(200).json_body(success_envelope());
        });

        let args = BeginArgs {
            file_id: " VNfile0001 ".to_string(),
            output_dir: "/data ".to_string(),
            rename: None,
        };
        handle_download_begin(&context_with(&server), args, OutputFormat::Table).await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn begin_rejects_blank_output_dir() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/download_begin");
            then.status(200).json_body(success_envelope());
        });

        let args = BeginArgs {
            file_id: "f1".to_string(),
            output_dir: "  ".to_string(),
            rename: Some("x".to_string()),
        };
        let err = handle_download_begin(&context_with(&server), args, OutputFormat::Table)
            .await
            .expect_err("blank output dir");
        assert_eq!(err.exit_code(), 2);
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn pause_and_resume_post_file_id() -> CliResult<()> {
        let server = MockServer::start_async().await;
        let pause = server.mock(|when, then| {
            when.method(POST)
                .path("/api/download_pause")
                .json_body(json!({ "file_id": "f1" }));
            then.status(200).json_body(success_envelope());
        });
        let resume = server.mock(|when, then| {
            when.method(POST)
                .path("/api/download_resume")
                .json_body(json!({ "file_id": "f1" }));
            then.status(200).json_body(success_envelope());
        });

        let ctx = context_with(&server);
        let args = || FileArgs {
            file_id: "f1".to_string(),
        };
        handle_download_pause(&ctx, args(), OutputFormat::Json).await?;
        handle_download_resume(&ctx, args(), OutputFormat::Json).await?;
        pause.assert();
        resume.assert();
        Ok(())
    }

    #[tokio::test]
    async fn remove_forwards_delete_flag() -> CliResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/download_remove")
                .json_body(json!({ "file_id": "f1", "need_remove_file": false }));
            then.status(200).json_body(success_envelope());
        });

        let args = RemoveArgs {
            file_id: "f1".to_string(),
            delete_file: false,
        };
        handle_download_remove(&context_with(&server), args, OutputFormat::Table).await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn status_without_filter_sends_null() -> CliResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/mget_download_status")
                .json_body(json!({ "filter": null }));
            then.status(200).json_body(download_status_payload());
        });

        let args = StatusArgs { filter: Vec::new() };
        handle_download_status(&context_with(&server), args, OutputFormat::Table).await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn status_filter_is_forwarded() -> CliResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/mget_download_status")
                .json_body(json!({ "filter": ["Paused", "Completed"] }));
            then.status(200).json_body(download_status_payload());
        });

        let args = StatusArgs {
            filter: vec![FilterArg::Paused, FilterArg::Completed],
        };
        handle_download_status(&context_with(&server), args, OutputFormat::Json).await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn unstructured_server_error_uses_status_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/download_pause");
            then.status(500).body("internal error");
        });

        let args = FileArgs {
            file_id: "f1".to_string(),
        };
        let err = handle_download_pause(&context_with(&server), args, OutputFormat::Table)
            .await
            .expect_err("server error");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.display_message(), "request failed with status code 500");
    }

    #[test]
    fn blank_file_id_is_rejected() {
        assert!(require_file_id("  ").is_err());
        assert_eq!(require_file_id(" f1 ").ok(), Some("f1"));
    }
}
