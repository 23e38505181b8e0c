//! Generic authenticated CRUD over the accounts collection. Every call carries
//! the current bearer token, and a 401/403 answer signs the session out before
//! the error reaches the caller, so screens get stale-token handling for free.
//! The backend still enforces authorization; this is the client's half.

use crate::{app_lib::AppError, features::auth::state::SessionStore};
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt, future::Future, marker::PhantomData};
use tracing::{info, instrument, warn};

pub struct ResourceClient<T> {
    store: SessionStore,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ResourceClient<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResourceClient")
            .field("base_url", &self.store.api().base_url())
            .finish()
    }
}

impl<T> ResourceClient<T> {
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ResourceClient<T> {
    /// Fetches every record in the collection.
    ///
    /// # Errors
    /// Returns the service error; 401/403 also sign the session out.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<T>, AppError> {
        let token = self.store.access_token();
        self.guarded(self.store.api().get_json("", token.as_ref()))
            .await
    }

    /// Fetches one record.
    ///
    /// # Errors
    /// Returns `AppError::Config` for an empty id, otherwise the service error.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<T, AppError> {
        let path = record_path(id)?;
        let token = self.store.access_token();
        self.guarded(self.store.api().get_json(&path, token.as_ref()))
            .await
    }

    /// Creates a record; the service may or may not echo it back.
    ///
    /// # Errors
    /// Returns the service error; 401/403 also sign the session out.
    #[instrument(skip(self, body))]
    pub async fn create<B: Serialize>(&self, body: &B) -> Result<Option<T>, AppError> {
        let token = self.store.access_token();
        let created = self
            .guarded(self.store.api().post_json("", body, token.as_ref()))
            .await?;
        info!("record created");
        Ok(created)
    }

    /// Updates a record and returns the service's representation of it.
    ///
    /// # Errors
    /// Returns `AppError::Config` for an empty id, otherwise the service error.
    #[instrument(skip(self, body))]
    pub async fn update<B: Serialize>(&self, id: &str, body: &B) -> Result<T, AppError> {
        let path = record_path(id)?;
        let token = self.store.access_token();
        self.guarded(self.store.api().put_json(&path, body, token.as_ref()))
            .await
    }

    /// Deletes a record. Deleting the signed-in account signs out.
    ///
    /// # Errors
    /// Returns `AppError::Config` for an empty id, otherwise the service error.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let path = record_path(id)?;
        let token = self.store.access_token();
        self.guarded(self.store.api().delete(&path, token.as_ref()))
            .await?;

        let own_account = self
            .store
            .session()
            .is_some_and(|session| session.id() == id.trim());
        if own_account {
            info!("signed-in account deleted; signing out");
            self.store.logout().await;
        }

        Ok(())
    }

    async fn guarded<R>(
        &self,
        request: impl Future<Output = Result<R, AppError>>,
    ) -> Result<R, AppError> {
        let result = request.await;

        if let Err(err) = &result {
            if err.is_unauthorized() && self.store.is_authenticated() {
                warn!(status = ?err.status(), "access rejected; signing out");
                self.store.logout().await;
            }
        }

        result
    }
}

/// Validates an id and encodes it as a single path segment.
fn record_path(id: &str) -> Result<String, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::Config("User id is required.".to_string()));
    }

    Ok(url::form_urlencoded::byte_serialize(trimmed.as_bytes()).collect())
}
