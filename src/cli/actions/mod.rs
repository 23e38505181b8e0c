pub mod account;
pub mod users;

// Internal "interpreter" for `Action`.
mod run;

use crate::{
    app::AppContext,
    cli::globals::GlobalArgs,
    features::alerts::AlertKind,
    routes::{forms::field, table::LOGIN, LoginScreen, Location, NavMenu},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Debug)]
pub enum UsersCommand {
    List,
    Get(String),
    Delete(String),
}

#[derive(Debug)]
pub enum Action {
    WhoAmI(GlobalArgs),
    Register(GlobalArgs, account::RegisterArgs),
    VerifyEmail(GlobalArgs, SecretString),
    ForgotPassword(GlobalArgs),
    ResetPassword(GlobalArgs, SecretString),
    Users(GlobalArgs, UsersCommand),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

fn context(globals: &GlobalArgs) -> Result<AppContext> {
    AppContext::new(globals.config()).context("failed to build the application context")
}

fn email(globals: &GlobalArgs) -> Result<&str> {
    globals
        .email
        .as_deref()
        .context("missing required argument: --email")
}

fn password(globals: &GlobalArgs) -> Result<&SecretString> {
    globals
        .password
        .as_ref()
        .context("missing required argument: --password")
}

/// Signs in through the login screen and returns where it landed.
async fn sign_in(ctx: &AppContext, globals: &GlobalArgs) -> Result<Location> {
    ctx.router.navigate(LOGIN)?;

    let mut login = LoginScreen::new(ctx);
    login.form.change(field::EMAIL, email(globals)?);
    login.form.change(field::PASSWORD, password(globals)?.expose_secret());

    Ok(login.submit().await?)
}

/// Revokes the session if one is held; failures are logged by the store.
async fn sign_out(ctx: &AppContext) {
    if ctx.store.is_authenticated() {
        if let Err(err) = NavMenu::new(ctx).logout().await {
            debug!(error = %err, "post-logout navigation failed");
        }
    }
    ctx.teardown();
}

/// Prints the notifications a screen left behind.
fn print_alerts(ctx: &AppContext) {
    for alert in ctx.alerts.read_default() {
        let label = match alert.kind {
            AlertKind::Success => "success",
            AlertKind::Error => "error",
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
        };
        println!("[{label}] {}", alert.message);
    }
}
