//! Add and edit forms for a single user. Edit mode prefills from the service;
//! a blank password on edit keeps the stored one.

use crate::{
    app::AppContext,
    app_lib::AppError,
    features::{
        alerts::AlertOptions,
        auth::types::{Account, Role},
        users::{types::UserUpsert, ResourceClient},
    },
    routes::{
        forms::{field, AccountRules, FormState},
        me::non_empty,
        report,
        router::Location,
        table::{Screen, ADMIN_USERS},
    },
};
use serde_json::Value;
use tracing::instrument;

pub const USER_ADDED: &str = "User added successfully";
pub const USER_UPDATED: &str = "Update successful";

const FIELDS: &[&str] = &[
    field::TITLE,
    field::FIRST_NAME,
    field::LAST_NAME,
    field::EMAIL,
    field::ROLE,
    field::PASSWORD,
    field::CONFIRM_PASSWORD,
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserFormMode {
    Add,
    Edit { id: String },
}

pub struct UserDetailScreen {
    ctx: AppContext,
    accounts: ResourceClient<Account>,
    mode: UserFormMode,
    loading: bool,
    pub form: FormState<AccountRules>,
}

impl UserDetailScreen {
    #[must_use]
    pub fn add(ctx: &AppContext) -> Self {
        Self::with_mode(ctx, UserFormMode::Add)
    }

    /// Opens the edit form and loads the record into it. A failed load
    /// leaves the form empty and posts the error.
    pub async fn edit(ctx: &AppContext, id: &str) -> Self {
        let mut screen = Self::with_mode(
            ctx,
            UserFormMode::Edit {
                id: id.to_string(),
            },
        );
        screen.load(id).await;
        screen
    }

    /// Opens whichever form the committed location points at.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the location is not a user form.
    pub async fn open(ctx: &AppContext) -> Result<Self, AppError> {
        match ctx.router.location().map(|location| location.screen) {
            Some(Screen::AdminUserAdd) => Ok(Self::add(ctx)),
            Some(Screen::AdminUserEdit { id }) => Ok(Self::edit(ctx, &id).await),
            other => Err(AppError::Config(format!("No user form at {other:?}"))),
        }
    }

    fn with_mode(ctx: &AppContext, mode: UserFormMode) -> Self {
        let add_mode = mode == UserFormMode::Add;
        Self {
            ctx: ctx.clone(),
            accounts: ctx.store.accounts(),
            loading: !add_mode,
            mode,
            form: FormState::new(AccountRules::admin(add_mode), FIELDS),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &UserFormMode {
        &self.mode
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    async fn load(&mut self, id: &str) {
        match self.accounts.get_by_id(id).await {
            Ok(user) => {
                self.form.change(field::TITLE, user.title.unwrap_or_default());
                self.form.change(field::FIRST_NAME, user.first_name.unwrap_or_default());
                self.form.change(field::LAST_NAME, user.last_name.unwrap_or_default());
                self.form.change(field::EMAIL, user.email.unwrap_or_default());
                self.form.change(field::ROLE, user.role.as_str());
            }
            Err(err) => {
                report(&self.ctx, err);
            }
        }
        self.loading = false;
    }

    /// Creates or updates the user and returns to the list.
    ///
    /// # Errors
    /// Returns validation errors without calling the service; service
    /// failures are also posted as an error alert.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Location, AppError> {
        self.form.submit_check()?;

        let values = self.form.values();
        let password = non_empty(values.get(field::PASSWORD));
        let body = UserUpsert {
            title: values.get(field::TITLE).to_string(),
            first_name: values.get(field::FIRST_NAME).to_string(),
            last_name: values.get(field::LAST_NAME).to_string(),
            email: values.get(field::EMAIL).to_string(),
            role: values.get(field::ROLE).parse::<Role>()?,
            confirm_password: password
                .as_ref()
                .map(|_| values.get(field::CONFIRM_PASSWORD).to_string()),
            password,
        };

        // Writes may echo back a partial record or nothing at all.
        let writer = self.ctx.store.accounts::<Value>();
        let message = match &self.mode {
            UserFormMode::Add => {
                writer
                    .create(&body)
                    .await
                    .map_err(|err| report(&self.ctx, err))?;
                USER_ADDED
            }
            UserFormMode::Edit { id } => {
                writer
                    .update(id, &body)
                    .await
                    .map_err(|err| report(&self.ctx, err))?;
                USER_UPDATED
            }
        };

        self.ctx
            .alerts
            .success(message, AlertOptions::keep_after_route_change());
        self.ctx.router.navigate(ADMIN_USERS)
    }
}
