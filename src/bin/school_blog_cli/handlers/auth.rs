#![deny(clippy::all, clippy::pedantic)]

use school_blog::domain::session::Session;
use serde::Serialize;

use crate::args::{AuthCmd, CredentialArgs};
use crate::client::{CliError, Ctx};
use crate::io::read_secret;
use crate::print::print_json;

/// Session details safe to print; the token stays on disk.
#[derive(Debug, Serialize)]
struct SessionSummary<'a> {
    logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

impl<'a> SessionSummary<'a> {
    fn of(session: Option<&'a Session>) -> Self {
        Self {
            logged_in: session.is_some(),
            username: session.map(|s| s.username.as_str()),
            id: session.map(|s| s.id.as_str()).filter(|id| !id.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Message {
    message: String,
}

pub async fn handle(ctx: &Ctx, cmd: AuthCmd) -> Result<(), CliError> {
    match cmd {
        AuthCmd::Login(args) => login(ctx, args).await,
        AuthCmd::Signup(args) => signup(ctx, args).await,
        AuthCmd::ForgotPassword { email } => {
            let message = ctx.auth().forgot_password(&email).await?;
            print_json(&Message { message })
        }
        AuthCmd::Logout => {
            let previous = ctx.auth().logout()?;
            print_json(&serde_json::json!({ "logged_out": previous.is_some() }))
        }
        AuthCmd::Whoami => {
            let current = ctx.session.current();
            print_json(&SessionSummary::of(current.as_ref()))
        }
    }
}

async fn login(ctx: &Ctx, args: CredentialArgs) -> Result<(), CliError> {
    let password = read_secret(args.password_file, args.password_env)?;
    let session = ctx.auth().login(&args.username, &password).await?;
    print_json(&SessionSummary::of(Some(&session)))
}

async fn signup(ctx: &Ctx, args: CredentialArgs) -> Result<(), CliError> {
    let password = read_secret(args.password_file, args.password_env)?;
    let session = ctx.auth().signup(&args.username, &password).await?;
    print_json(&SessionSummary::of(Some(&session)))
}
