use crate::{
    app::AppContext,
    app_lib::AppError,
    features::alerts::DEFAULT_SCOPE,
    routes::{
        forms::{field, FormState, LoginRules},
        report,
        router::Location,
        table::HOME,
    },
};
use secrecy::SecretString;
use tracing::instrument;

pub struct LoginScreen {
    ctx: AppContext,
    pub form: FormState<LoginRules>,
}

impl LoginScreen {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            form: FormState::new(LoginRules, &[field::EMAIL, field::PASSWORD]),
        }
    }

    /// Signs in and opens the page the visitor was bounced from, or home.
    ///
    /// # Errors
    /// Returns validation errors without calling the service; service
    /// failures are also posted as an error alert.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Location, AppError> {
        self.form.submit_check()?;
        self.ctx.alerts.clear(DEFAULT_SCOPE);

        let email = self.form.value(field::EMAIL).to_string();
        let password = SecretString::from(self.form.value(field::PASSWORD).to_string());
        self.ctx
            .store
            .login(&email, &password)
            .await
            .map_err(|err| report(&self.ctx, err))?;

        let target = self
            .ctx
            .router
            .location()
            .and_then(|location| location.return_to)
            .unwrap_or_else(|| HOME.to_string());
        self.ctx.router.navigate(&target)
    }
}
