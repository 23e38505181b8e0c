use crate::{
    app::AppContext,
    app_lib::AppError,
    features::alerts::{AlertOptions, DEFAULT_SCOPE},
    routes::{
        forms::{field, EmailRules, FormState},
        report,
    },
};
use tracing::instrument;

pub const RESET_REQUESTED: &str = "Please check your email for password reset instructions";

pub struct ForgotPasswordScreen {
    ctx: AppContext,
    pub form: FormState<EmailRules>,
}

impl ForgotPasswordScreen {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            form: FormState::new(EmailRules, &[field::EMAIL]),
        }
    }

    /// Requests a reset email. The screen stays where it is.
    ///
    /// # Errors
    /// Returns validation errors without calling the service; service
    /// failures are also posted as an error alert.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<(), AppError> {
        self.form.submit_check()?;
        self.ctx.alerts.clear(DEFAULT_SCOPE);

        let email = self.form.value(field::EMAIL).to_string();
        self.ctx
            .store
            .forgot_password(&email)
            .await
            .map_err(|err| report(&self.ctx, err))?;

        self.ctx.alerts.success(RESET_REQUESTED, AlertOptions::default());
        Ok(())
    }
}
