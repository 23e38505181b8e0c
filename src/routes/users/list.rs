//! Users list for administrators. Deleting a row removes it locally once the
//! service confirms; deleting the signed-in account signs out.

use crate::{
    app::AppContext,
    app_lib::AppError,
    features::{auth::types::Account, users::ResourceClient},
    routes::report,
};
use std::collections::BTreeSet;
use tracing::instrument;

pub struct UsersListScreen {
    ctx: AppContext,
    accounts: ResourceClient<Account>,
    users: Vec<Account>,
    deleting: BTreeSet<String>,
}

impl UsersListScreen {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            accounts: ctx.store.accounts(),
            users: Vec::new(),
            deleting: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn users(&self) -> &[Account] {
        &self.users
    }

    #[must_use]
    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// # Errors
    /// Returns the service failure, also posted as an error alert.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&[Account], AppError> {
        self.users = self
            .accounts
            .list()
            .await
            .map_err(|err| report(&self.ctx, err))?;
        Ok(&self.users)
    }

    /// # Errors
    /// Returns the service failure, also posted as an error alert.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        self.deleting.insert(id.to_string());
        let result = self.accounts.delete(id).await;
        self.deleting.remove(id);

        result.map_err(|err| report(&self.ctx, err))?;
        self.users.retain(|user| user.id != id);

        if !self.ctx.store.is_authenticated() {
            self.ctx.router.revalidate()?;
        }
        Ok(())
    }
}
