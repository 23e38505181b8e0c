use crate::{
    app::AppContext,
    app_lib::AppError,
    features::{alerts::AlertOptions, auth::types::RegisterRequest},
    routes::{
        forms::{field, FormState, RegisterRules},
        report,
        router::Location,
    },
};
use tracing::instrument;

pub const REGISTERED: &str =
    "Registration successful, please check your email for verification instructions";

const FIELDS: &[&str] = &[
    field::TITLE,
    field::FIRST_NAME,
    field::LAST_NAME,
    field::EMAIL,
    field::PASSWORD,
    field::CONFIRM_PASSWORD,
    field::ACCEPT_TERMS,
];

pub struct RegisterScreen {
    ctx: AppContext,
    pub form: FormState<RegisterRules>,
}

impl RegisterScreen {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            form: FormState::new(RegisterRules, FIELDS),
        }
    }

    /// # Errors
    /// Returns validation errors without calling the service; service
    /// failures are also posted as an error alert.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Location, AppError> {
        self.form.submit_check()?;

        let values = self.form.values();
        let request = RegisterRequest {
            title: values.get(field::TITLE).to_string(),
            first_name: values.get(field::FIRST_NAME).to_string(),
            last_name: values.get(field::LAST_NAME).to_string(),
            email: values.get(field::EMAIL).to_string(),
            password: values.get(field::PASSWORD).to_string(),
            confirm_password: values.get(field::CONFIRM_PASSWORD).to_string(),
            accept_terms: values.is_checked(field::ACCEPT_TERMS),
        };

        self.ctx
            .store
            .register(&request)
            .await
            .map_err(|err| report(&self.ctx, err))?;

        self.ctx
            .alerts
            .success(REGISTERED, AlertOptions::keep_after_route_change());
        self.ctx.router.navigate("login")
    }
}
