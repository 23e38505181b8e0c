//! Application context: the session store, notification channel and router
//! wired together once and handed to every screen. Cloning is cheap; all
//! clones observe the same session and the same notifications.

use crate::{
    app_lib::{clock::system_clock, AppConfig, AppError, SharedClock},
    features::{alerts::AlertChannel, auth::state::SessionStore},
    routes::router::{Location, Router},
};
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub store: SessionStore,
    pub alerts: AlertChannel,
    pub router: Router,
}

impl AppContext {
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Self::with_clock(config, system_clock())
    }

    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn with_clock(config: AppConfig, clock: SharedClock) -> Result<Self, AppError> {
        let store = SessionStore::with_clock(&config, clock)?;
        let alerts = AlertChannel::new(&config);
        let router = Router::new(store.clone(), alerts.clone());

        Ok(Self {
            config,
            store,
            alerts,
            router,
        })
    }

    /// Resumes a session from the refresh cookie when possible, then opens
    /// `path`.
    ///
    /// # Errors
    /// Returns routing errors only; a failed restore leaves the visitor
    /// signed out.
    pub async fn start(&self, path: &str) -> Result<Location, AppError> {
        if let Some(session) = self.store.restore().await {
            info!(user_id = %session.id(), "session restored");
        }

        let location = self.router.navigate(path)?;
        debug!(path = %location.path, "application started");
        Ok(location)
    }

    /// Cancels the refresh timer and forgets the session.
    pub fn teardown(&self) {
        self.store.teardown();
    }
}
