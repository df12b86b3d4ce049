use crate::cli::{ListArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_remote_list;

pub(crate) async fn handle_remote_list(
    ctx: &AppContext,
    args: ListArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let path = args.path.trim();
    if path.is_empty() {
        return Err(CliError::validation("path must not be empty"));
    }

    let resp = ctx.services.remote_list(path).await?;
    render_remote_list(&resp, format)
}
