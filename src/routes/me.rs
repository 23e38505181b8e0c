//! Profile screens: details of the signed-in account, the update form and
//! account deletion.

use crate::{
    app::AppContext,
    app_lib::AppError,
    features::{
        alerts::AlertOptions,
        auth::types::Account,
        users::types::ProfileUpdate,
    },
    routes::{
        forms::{field, AccountRules, FormState},
        report,
        router::Location,
        table::PROFILE,
    },
};
use tracing::instrument;

pub const UPDATED: &str = "Update successful";
pub const DELETED: &str = "Account deleted successfully";

const FIELDS: &[&str] = &[
    field::TITLE,
    field::FIRST_NAME,
    field::LAST_NAME,
    field::EMAIL,
    field::PASSWORD,
    field::CONFIRM_PASSWORD,
];

pub struct ProfileScreen {
    ctx: AppContext,
    pub form: FormState<AccountRules>,
}

impl ProfileScreen {
    /// Opens the profile prefilled from the current session.
    ///
    /// # Errors
    /// Returns `AppError::Auth` when nobody is signed in.
    pub fn open(ctx: &AppContext) -> Result<Self, AppError> {
        let session = ctx.store.session().ok_or_else(|| AppError::Auth {
            status: 401,
            message: "You are not signed in.".to_string(),
        })?;
        let account = &session.account;

        let form = FormState::new(AccountRules::profile(), FIELDS)
            .with_value(field::TITLE, account.title.clone().unwrap_or_default())
            .with_value(field::FIRST_NAME, account.first_name.clone().unwrap_or_default())
            .with_value(field::LAST_NAME, account.last_name.clone().unwrap_or_default())
            .with_value(field::EMAIL, account.email.clone().unwrap_or_default());

        Ok(Self {
            ctx: ctx.clone(),
            form,
        })
    }

    /// Current account as the session holds it.
    #[must_use]
    pub fn details(&self) -> Option<Account> {
        self.ctx.store.session().map(|session| session.account)
    }

    /// Saves the form and returns to the profile page.
    ///
    /// # Errors
    /// Returns validation errors without calling the service; service
    /// failures are also posted as an error alert.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Location, AppError> {
        self.form.submit_check()?;

        let values = self.form.values();
        let password = non_empty(values.get(field::PASSWORD));
        let body = ProfileUpdate {
            title: values.get(field::TITLE).to_string(),
            first_name: values.get(field::FIRST_NAME).to_string(),
            last_name: values.get(field::LAST_NAME).to_string(),
            email: values.get(field::EMAIL).to_string(),
            confirm_password: password
                .as_ref()
                .map(|_| values.get(field::CONFIRM_PASSWORD).to_string()),
            password,
        };

        self.ctx
            .store
            .update_self(&body)
            .await
            .map_err(|err| report(&self.ctx, err))?;

        self.ctx
            .alerts
            .success(UPDATED, AlertOptions::keep_after_route_change());
        self.ctx.router.navigate(PROFILE)
    }

    /// Deletes the signed-in account; the guard then sends the visitor to
    /// the login screen.
    ///
    /// # Errors
    /// Returns the service failure, also posted as an error alert.
    #[instrument(skip(self))]
    pub async fn delete(&mut self) -> Result<Location, AppError> {
        self.ctx
            .store
            .delete_self()
            .await
            .map_err(|err| report(&self.ctx, err))?;

        let location = self.ctx.router.revalidate()?;
        self.ctx.alerts.success(DELETED, AlertOptions::default());
        Ok(location)
    }
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
