use crate::{
    app::AppContext,
    app_lib::AppError,
    features::auth::types::Role,
    routes::{
        router::Location,
        table::{HOME, LOGIN, PROFILE},
    },
};

/// Top navigation. Shown only while signed in.
pub struct NavMenu {
    ctx: AppContext,
}

impl NavMenu {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    /// Label and target of each link, empty when signed out.
    #[must_use]
    pub fn links(&self) -> Vec<(&'static str, &'static str)> {
        let Some(session) = self.ctx.store.session() else {
            return Vec::new();
        };

        let mut links = vec![("Home", HOME), ("Profile", PROFILE)];
        if session.role() == Role::Admin {
            links.push(("Admin", "/admin"));
        }
        links
    }

    /// Signs out and opens the login screen.
    ///
    /// # Errors
    /// Returns routing errors only; logout itself cannot fail.
    pub async fn logout(&self) -> Result<Location, AppError> {
        self.ctx.store.logout().await;
        self.ctx.router.navigate(LOGIN)
    }
}
