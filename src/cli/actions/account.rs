//! Account actions: sign-in check and the anonymous identity flows, each
//! driven through the same screens the portal uses.

use crate::{
    cli::{
        actions::{context, email, password, print_alerts, sign_in, sign_out},
        globals::GlobalArgs,
    },
    routes::{
        forms::field, table::Screen, ForgotPasswordScreen, RegisterScreen, ResetPasswordScreen,
        TokenStatus, VerifyEmailScreen,
    },
};
use anyhow::{bail, Result};
use secrecy::{ExposeSecret, SecretString};
use url::form_urlencoded;

#[derive(Debug, Clone)]
pub struct RegisterArgs {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub accept_terms: bool,
}

fn with_token(path: &str, token: &SecretString) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("token", token.expose_secret())
        .finish();
    format!("{path}?{query}")
}

/// Signs in and prints the account as JSON.
///
/// # Errors
/// Returns an error if credentials are missing or rejected.
pub async fn whoami(globals: &GlobalArgs) -> Result<()> {
    let ctx = context(globals)?;
    let result = sign_in(&ctx, globals).await;
    print_alerts(&ctx);
    result?;

    if let Some(session) = ctx.store.session() {
        println!("{}", serde_json::to_string_pretty(&session.account)?);
    }

    sign_out(&ctx).await;
    Ok(())
}

/// # Errors
/// Returns validation or service errors.
pub async fn register(globals: &GlobalArgs, args: RegisterArgs) -> Result<()> {
    let ctx = context(globals)?;
    ctx.router.navigate("/account/register")?;

    let password = password(globals)?.expose_secret().to_string();
    let mut screen = RegisterScreen::new(&ctx);
    screen.form.change(field::TITLE, args.title);
    screen.form.change(field::FIRST_NAME, args.first_name);
    screen.form.change(field::LAST_NAME, args.last_name);
    screen.form.change(field::EMAIL, email(globals)?);
    screen.form.change(field::PASSWORD, password.clone());
    screen.form.change(field::CONFIRM_PASSWORD, password);
    screen.form.set_checked(field::ACCEPT_TERMS, args.accept_terms);

    let result = screen.submit().await;
    print_alerts(&ctx);
    result?;
    Ok(())
}

/// # Errors
/// Returns the service error when the token is rejected.
pub async fn verify_email(globals: &GlobalArgs, token: &SecretString) -> Result<()> {
    let ctx = context(globals)?;
    ctx.router.navigate(&with_token("/account/verify-email", token))?;

    let mut screen = VerifyEmailScreen::open(&ctx);
    let result = screen.verify().await;
    print_alerts(&ctx);
    result?;
    Ok(())
}

/// # Errors
/// Returns validation or service errors.
pub async fn forgot_password(globals: &GlobalArgs) -> Result<()> {
    let ctx = context(globals)?;
    ctx.router.navigate("/account/forgot-password")?;

    let mut screen = ForgotPasswordScreen::new(&ctx);
    screen.form.change(field::EMAIL, email(globals)?);
    let result = screen.submit().await;
    print_alerts(&ctx);
    result?;
    Ok(())
}

/// # Errors
/// Returns an error when the token is invalid, or validation and service errors.
pub async fn reset_password(globals: &GlobalArgs, token: &SecretString) -> Result<()> {
    let ctx = context(globals)?;
    let location = ctx
        .router
        .navigate(&with_token("/account/reset-password", token))?;
    if location.screen != Screen::ResetPassword {
        bail!("reset password screen is not reachable from {}", location.path);
    }

    let mut screen = ResetPasswordScreen::open(&ctx);
    if screen.validate_token().await == TokenStatus::Invalid {
        bail!("Token validation failed, if the token has expired you can get a new one with forgot-password");
    }

    let password = password(globals)?.expose_secret().to_string();
    screen.form.change(field::PASSWORD, password.clone());
    screen.form.change(field::CONFIRM_PASSWORD, password);

    let result = screen.submit().await;
    print_alerts(&ctx);
    result?;
    Ok(())
}
