//! Account commands: sign-up, sign-in, sign-out.

use clap::Args;

use dishhub_auth::SignUpForm;
use dishhub_core::error::AppError;
use dishhub_entity::user::User;

use crate::context::CliContext;
use crate::output::{self, OutputFormat};

/// Arguments for sign-up
#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,
    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (prompted when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for sign-in
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (prompted when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

pub async fn signup(
    ctx: &CliContext,
    args: &SignupArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let name = prompt_text(args.name.as_ref(), "Name")?;
    let email = prompt_text(args.email.as_ref(), "Email")?;
    let (password, confirm) = match &args.password {
        Some(p) => (p.clone(), p.clone()),
        None => {
            let password = prompt_password("Password")?;
            let confirm = prompt_password("Confirm password")?;
            (password, confirm)
        }
    };

    let form = SignUpForm::new(name, email, password, confirm);
    let user = ctx.session.sign_up(&form).await?;
    ctx.persist_session().await?;

    output::print_success(&format!("Welcome, {}!", user.display_name()));
    print_user(&user, format);
    Ok(())
}

pub async fn login(
    ctx: &CliContext,
    args: &LoginArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let email = prompt_text(args.email.as_ref(), "Email")?;
    let password = match &args.password {
        Some(p) => p.clone(),
        None => prompt_password("Password")?,
    };

    let user = ctx.session.sign_in(&email, &password).await?;
    ctx.persist_session().await?;

    output::print_success(&format!("Signed in as {}", user.display_name()));
    print_user(&user, format);
    Ok(())
}

pub async fn logout(ctx: &CliContext) -> Result<(), AppError> {
    if !ctx.session.snapshot().is_authenticated {
        output::print_warning("Not signed in");
        return Ok(());
    }

    let result = ctx.session.sign_out().await;
    ctx.persist_session().await?;
    match result {
        Ok(()) => output::print_success("Signed out"),
        Err(e) => output::print_warning(&format!("Signed out locally: {}", e.message)),
    }
    Ok(())
}

pub fn whoami(ctx: &CliContext, format: OutputFormat) -> Result<(), AppError> {
    let user = ctx.require_user()?;
    print_user(&user, format);
    Ok(())
}

fn print_user(user: &User, format: OutputFormat) {
    output::print_item(user, format, |u| {
        output::print_kv("ID", u.id.as_str());
        output::print_kv("Name", u.display_name());
        output::print_kv("Email", &u.email);
        output::print_kv("Member since", &u.created_at.format("%Y-%m-%d").to_string());
    });
}

fn prompt_text(given: Option<&String>, prompt: &str) -> Result<String, AppError> {
    match given {
        Some(value) => Ok(value.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

fn prompt_password(prompt: &str) -> Result<String, AppError> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
