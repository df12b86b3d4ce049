//! Argument parsing, command dispatch, and the interactive shell.

use std::io::{self, IsTerminal, Write};

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pikweb_api_models::Filter;
use pikweb_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{Instrument, info_span};
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::auth::handle_login;
use crate::commands::downloads::{
    handle_download_begin, handle_download_pause, handle_download_remove, handle_download_resume,
    handle_download_status,
};
use crate::commands::files::handle_remote_list;

const DEFAULT_API_URL: &str = "http://127.0.0.1:22523";
const SHELL_PROMPT: &str = "pikweb> ";

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    install_logging(&cli);

    let trace_id = Uuid::new_v4();
    let command = command_label(&cli.command);
    let ctx = AppContext::new(&cli.api_url, cli.token, cli.timeout);

    let result = dispatch(&ctx, cli.command, cli.output)
        .instrument(info_span!("pikweb", %trace_id, command))
        .await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn install_logging(cli: &Cli) {
    let config = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, LogFormat::from),
        build_sha: option_env!("PIKWEB_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: {err}");
    }
}

async fn dispatch(ctx: &AppContext, command: Command, output: OutputFormat) -> CliResult<()> {
    match command {
        Command::Api(api) => dispatch_api(ctx, api, output).await,
        Command::Shell => {
            let interactive = io::stdin().is_terminal();
            run_shell(ctx, BufReader::new(tokio::io::stdin()), output, interactive).await
        }
    }
}

async fn dispatch_api(ctx: &AppContext, command: ApiCommand, output: OutputFormat) -> CliResult<()> {
    match command {
        ApiCommand::Login(args) => handle_login(ctx, args, output).await,
        ApiCommand::Ls(args) => handle_remote_list(ctx, args, output).await,
        ApiCommand::Begin(args) => handle_download_begin(ctx, args, output).await,
        ApiCommand::Pause(args) => handle_download_pause(ctx, args, output).await,
        ApiCommand::Resume(args) => handle_download_resume(ctx, args, output).await,
        ApiCommand::Remove(args) => handle_download_remove(ctx, args, output).await,
        ApiCommand::Status(args) => handle_download_status(ctx, args, output).await,
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Shell => "shell",
        Command::Api(api) => match api {
            ApiCommand::Login(_) => "login",
            ApiCommand::Ls(_) => "ls",
            ApiCommand::Begin(_) => "begin",
            ApiCommand::Pause(_) => "pause",
            ApiCommand::Resume(_) => "resume",
            ApiCommand::Remove(_) => "remove",
            ApiCommand::Status(_) => "status",
        },
    }
}

#[derive(Debug, Parser)]
#[command(name = "pikweb", about = "Command-line client for a pikweb download backend")]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "PIKWEB_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: String,
    #[arg(long, global = true, env = "PIKWEB_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "PIKWEB_HTTP_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Request timeout in seconds for every command (defaults to per-command budgets)"
    )]
    timeout: Option<u64>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(long, global = true, env = "PIKWEB_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Api(ApiCommand),
    /// Read commands from stdin, one per line, until `exit`.
    Shell,
}

#[derive(Debug, Subcommand)]
pub(crate) enum ApiCommand {
    /// Log in and print the issued token.
    Login(LoginArgs),
    /// List a remote folder.
    Ls(ListArgs),
    /// Start downloading a remote file on the backend host.
    Begin(BeginArgs),
    /// Pause a download.
    Pause(FileArgs),
    /// Resume a paused download.
    Resume(FileArgs),
    /// Remove a download.
    Remove(RemoveArgs),
    /// Show download progress.
    Status(StatusArgs),
}

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, help = "Password; prompted for when omitted on a terminal")]
    pub(crate) password: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[arg(default_value = "/")]
    pub(crate) path: String,
}

#[derive(Debug, Args)]
pub(crate) struct BeginArgs {
    pub(crate) file_id: String,
    #[arg(long)]
    pub(crate) output_dir: String,
    #[arg(long)]
    pub(crate) rename: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct FileArgs {
    pub(crate) file_id: String,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    pub(crate) file_id: String,
    #[arg(long, help = "Also delete the downloaded file from disk")]
    pub(crate) delete_file: bool,
}

#[derive(Debug, Args)]
pub(crate) struct StatusArgs {
    #[arg(long, value_enum, value_delimiter = ',')]
    pub(crate) filter: Vec<FilterArg>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum FilterArg {
    Downloading,
    Paused,
    Completed,
    Waiting,
    HasError,
}

impl From<FilterArg> for Filter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::Downloading => Self::Downloading,
            FilterArg::Paused => Self::Paused,
            FilterArg::Completed => Self::Completed,
            FilterArg::Waiting => Self::Waiting,
            FilterArg::HasError => Self::HasError,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

fn parse_url(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    trimmed
        .parse::<Url>()
        .map(|_| trimmed.to_string())
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// One line of input inside `pikweb shell`.
#[derive(Debug, Parser)]
#[command(name = "pikweb", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Api(ApiCommand),
    /// Point later commands at another backend.
    SetUrl {
        #[arg(value_parser = parse_url)]
        url: String,
    },
    /// Forget the token obtained by `login`.
    Logout,
    /// Leave the shell.
    #[command(alias = "quit")]
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellOutcome {
    Continue,
    Exit,
}

async fn run_shell<R>(
    ctx: &AppContext,
    reader: R,
    output: OutputFormat,
    interactive: bool,
) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        if interactive {
            print!("{SHELL_PROMPT}");
            io::stdout()
                .flush()
                .context("failed to flush stdout")
                .map_err(CliError::failure)?;
        }
        let Some(line) = lines
            .next_line()
            .await
            .context("failed to read command from stdin")
            .map_err(CliError::failure)?
        else {
            break;
        };
        match handle_shell_line(ctx, &line, output).await {
            Ok(ShellOutcome::Continue) => {}
            Ok(ShellOutcome::Exit) => break,
            Err(err) => eprintln!("error: {}", err.display_message()),
        }
    }
    Ok(())
}

async fn handle_shell_line(
    ctx: &AppContext,
    line: &str,
    output: OutputFormat,
) -> CliResult<ShellOutcome> {
    let tokens = split_line(line)?;
    if tokens.is_empty() {
        return Ok(ShellOutcome::Continue);
    }

    let parsed = match ShellLine::try_parse_from(tokens) {
        Ok(parsed) => parsed,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            print!("{}", err.render());
            return Ok(ShellOutcome::Continue);
        }
        Err(err) => {
            let rendered = err.render().to_string();
            return Err(CliError::validation(rendered.trim_end()));
        }
    };

    match parsed.command {
        ShellCommand::Api(command) => dispatch_api(ctx, command, output).await?,
        ShellCommand::SetUrl { url } => {
            println!("backend: {url}");
            ctx.services.set_backend_url(url);
        }
        ShellCommand::Logout => {
            ctx.services.logout();
            println!("logged out");
        }
        ShellCommand::Exit => return Ok(ShellOutcome::Exit),
    }
    Ok(ShellOutcome::Continue)
}

/// Split a shell line on whitespace, keeping quoted runs together.
fn split_line(line: &str) -> CliResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::validation("unterminated quote"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
