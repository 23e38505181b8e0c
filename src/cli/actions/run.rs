use crate::cli::actions::{account, users, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::WhoAmI(globals) => account::whoami(&globals).await,
        Action::Register(globals, args) => account::register(&globals, args).await,
        Action::VerifyEmail(globals, token) => account::verify_email(&globals, &token).await,
        Action::ForgotPassword(globals) => account::forgot_password(&globals).await,
        Action::ResetPassword(globals, token) => account::reset_password(&globals, &token).await,
        Action::Users(globals, command) => users::execute(&globals, command).await,
    }
}
