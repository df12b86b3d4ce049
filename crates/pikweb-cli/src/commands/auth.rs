use std::io::{self, IsTerminal};

use anyhow::anyhow;

use crate::cli::{LoginArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_login;

pub(crate) async fn handle_login(
    ctx: &AppContext,
    args: LoginArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let email = args.email.trim();
    if email.is_empty() {
        return Err(CliError::validation("email must not be empty"));
    }
    let password = resolve_password(args.password)?;

    let resp = ctx.services.login(email, &password).await?;
    render_login(&resp, format)
}

fn resolve_password(flag: Option<String>) -> CliResult<String> {
    let password = match flag {
        Some(value) => value,
        None if io::stdin().is_terminal() => rpassword::prompt_password("Password: ")
            .map_err(|err| CliError::failure(anyhow!("failed to read password: {err}")))?,
        None => {
            return Err(CliError::validation(
                "password required; supply via --password when running non-interactively",
            ));
        }
    };
    if password.is_empty() {
        return Err(CliError::validation("password must not be empty"));
    }
    Ok(password)
}
