//! Reset password screen. The token from the query string is validated once
//! when the screen opens; the form only submits while it is `Valid`.

use crate::{
    app::AppContext,
    app_lib::AppError,
    features::{
        alerts::{AlertOptions, DEFAULT_SCOPE},
        auth::types::ResetPasswordRequest,
    },
    routes::{
        forms::{field, FormState, ResetPasswordRules},
        report,
        router::Location,
    },
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

pub const PASSWORD_RESET: &str = "Password reset successful, you can now login";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
    Validating,
    Valid,
    Invalid,
}

pub struct ResetPasswordScreen {
    ctx: AppContext,
    token: Option<SecretString>,
    status: TokenStatus,
    pub form: FormState<ResetPasswordRules>,
}

impl ResetPasswordScreen {
    /// Takes the `token` query parameter and removes it from the location.
    #[must_use]
    pub fn open(ctx: &AppContext) -> Self {
        let token = ctx
            .router
            .location()
            .and_then(|location| location.query_param("token").map(str::to_string))
            .map(SecretString::from);
        ctx.router.strip_query();

        Self {
            ctx: ctx.clone(),
            token,
            status: TokenStatus::Validating,
            form: FormState::new(
                ResetPasswordRules,
                &[field::PASSWORD, field::CONFIRM_PASSWORD],
            ),
        }
    }

    #[must_use]
    pub fn status(&self) -> TokenStatus {
        self.status
    }

    /// Checks the token with the service and settles the status.
    #[instrument(skip(self))]
    pub async fn validate_token(&mut self) -> TokenStatus {
        self.status = match &self.token {
            None => TokenStatus::Invalid,
            Some(token) => match self.ctx.store.validate_reset_token(token.expose_secret()).await {
                Ok(()) => TokenStatus::Valid,
                Err(err) => {
                    debug!(error = %err, "reset token rejected");
                    TokenStatus::Invalid
                }
            },
        };

        self.status
    }

    /// # Errors
    /// Returns `AppError::Config` unless the token validated, validation
    /// errors without calling the service, or the service failure (also
    /// posted as an error alert).
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Location, AppError> {
        let token = match (&self.token, self.status) {
            (Some(token), TokenStatus::Valid) => token.expose_secret().to_string(),
            _ => return Err(AppError::Config("Reset token is not valid.".to_string())),
        };
        self.form.submit_check()?;
        self.ctx.alerts.clear(DEFAULT_SCOPE);

        let request = ResetPasswordRequest {
            token,
            password: self.form.value(field::PASSWORD).to_string(),
            confirm_password: self.form.value(field::CONFIRM_PASSWORD).to_string(),
        };
        self.ctx
            .store
            .reset_password(&request)
            .await
            .map_err(|err| report(&self.ctx, err))?;

        self.ctx
            .alerts
            .success(PASSWORD_RESET, AlertOptions::keep_after_route_change());
        self.ctx.router.navigate("login")
    }
}
