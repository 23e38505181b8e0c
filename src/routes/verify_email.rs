use crate::{
    app::AppContext,
    app_lib::AppError,
    features::alerts::AlertOptions,
    routes::router::Location,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{instrument, warn};

pub const VERIFIED: &str = "Verification successful, you can now login";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyStatus {
    Verifying,
    Failed,
}

pub struct VerifyEmailScreen {
    ctx: AppContext,
    token: Option<SecretString>,
    status: VerifyStatus,
}

impl VerifyEmailScreen {
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
            status: VerifyStatus::Verifying,
        }
    }

    #[must_use]
    pub fn status(&self) -> VerifyStatus {
        self.status
    }

    /// Confirms the address and opens the login screen.
    ///
    /// # Errors
    /// Returns the service error, or `AppError::Config` without a token; the
    /// status moves to `Failed` either way.
    #[instrument(skip(self))]
    pub async fn verify(&mut self) -> Result<Location, AppError> {
        let Some(token) = self.token.take() else {
            self.status = VerifyStatus::Failed;
            return Err(AppError::Config("Verification token is missing.".to_string()));
        };

        if let Err(err) = self.ctx.store.verify_email(token.expose_secret()).await {
            warn!(error = %err, "email verification failed");
            self.status = VerifyStatus::Failed;
            return Err(err);
        }

        self.ctx
            .alerts
            .success(VERIFIED, AlertOptions::keep_after_route_change());
        self.ctx.router.navigate("login")
    }
}
