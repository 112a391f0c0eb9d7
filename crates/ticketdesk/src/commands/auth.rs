//! Account commands: login, logout, sign-up, password reset and profile.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tabled::Tabled;
use ticketdesk_core::auth;
use ticketdesk_core::nav::landing;
use ticketdesk_core::{Credentials, Principal, ProfileChanges, Screen, Session, SignUp, menu_for};

use crate::cli::{
    GlobalOpts, LoginArgs, ProfileArgs, ProfileCommand, RegisterArgs, ResetPasswordArgs,
};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

fn detail(p: &Principal) -> String {
    output::detail_lines(&[
        ("Name", p.display_name.clone()),
        ("Email", p.email.clone()),
        ("Role", p.role.to_string()),
        ("ID", p.id.map(|id| id.to_string()).unwrap_or_default()),
    ])
}

fn password_from(var: Option<&str>) -> Result<SecretString, CliError> {
    match var {
        Some(name) => std::env::var(name)
            .map(SecretString::from)
            .map_err(|_| CliError::Validation {
                field: "password-env".into(),
                reason: format!("environment variable {name} is not set"),
            }),
        None => util::prompt_password("Password"),
    }
}

/// Prompt twice and insist both answers agree.
fn new_password() -> Result<SecretString, CliError> {
    let (password, confirm) = util::prompt_new_password()?;
    if password.expose_secret() != confirm.expose_secret() {
        return Err(CliError::Validation {
            field: "confirmPassword".into(),
            reason: "Passwords do not match".into(),
        });
    }
    Ok(password)
}

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => util::prompt_text("Email")?,
    };
    let password = password_from(args.password_env.as_deref())?;

    let spinner = util::spinner("Signing in...", global);
    let result = ctx
        .session
        .login(&ctx.client, &Credentials { email, password })
        .await;
    spinner.finish_and_clear();
    let principal = result?;

    output::status(
        &format!(
            "Welcome, {}. Signed in as {}; start at {}.",
            principal.display_name,
            principal.role,
            landing(Some(principal.role)).title()
        ),
        global.quiet,
    );
    Ok(())
}

pub fn logout(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let was_signed_in = session.is_authenticated();
    session.logout()?;
    if was_signed_in {
        output::status("Signed out.", global.quiet);
    } else {
        output::status("No active session.", global.quiet);
    }
    Ok(())
}

pub fn whoami(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let principal = session.principal().ok_or(CliError::NotSignedIn)?;
    let out = output::render_single(&global.output, principal.as_ref(), detail, |p| {
        p.email.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[derive(Clone, Tabled, Serialize)]
struct MenuRow {
    #[tabled(rename = "Screen")]
    title: &'static str,
    #[tabled(rename = "Key")]
    key: String,
}

pub fn menu(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let rows: Vec<MenuRow> = menu_for(session.current_role())
        .iter()
        .map(|s| MenuRow {
            title: s.title(),
            key: s.to_string(),
        })
        .collect();
    if rows.is_empty() {
        return Err(CliError::NotSignedIn);
    }
    let out = output::render_list(&global.output, &rows, Clone::clone, |r| r.key.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn register(
    ctx: &Context,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (password, confirm_password) = util::prompt_new_password()?;
    let form = SignUp {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password,
        confirm_password,
    };
    let message = auth::register(&ctx.client, &form).await?;
    output::status(&message, global.quiet);
    output::status("You can now sign in with `ticketdesk login`.", global.quiet);
    Ok(())
}

pub async fn reset_password(
    ctx: &Context,
    args: ResetPasswordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = new_password()?;
    let message = auth::reset_password(&ctx.client, &args.email, &password).await?;
    output::status(&message, global.quiet);
    Ok(())
}

pub async fn profile(ctx: &Context, args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.gate(Screen::Profile)?;
    match args.command {
        ProfileCommand::Show => whoami(&ctx.session, global),
        ProfileCommand::Update {
            first_name,
            last_name,
            email,
            password,
        } => {
            let password = password.then(new_password).transpose()?;
            let changes = ProfileChanges {
                first_name,
                last_name,
                email,
                password,
            };
            let outcome = ctx.session.update_profile(&ctx.client, &changes).await?;
            output::status(outcome.message(), global.quiet);
            Ok(())
        }
    }
}
