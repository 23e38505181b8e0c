//! Session store: the single owner of the signed-in account and its access
//! token. It issues login, refresh and logout calls and keeps exactly one
//! refresh timer armed while a session with a readable expiry exists.
//!
//! Flow Overview:
//! 1. `login` exchanges credentials, installs the session and arms the timer.
//! 2. The timer fires `refresh_lead` before the token expires and calls
//!    `refresh`, which replaces the session and re-arms the timer.
//! 3. A failed refresh forces logout so a soon-to-expire token never lingers.
//! 4. `logout` clears local state first, then revokes server-side on a best
//!    effort basis.
//!
//! Readers only ever see cloned snapshots. Writers replace the whole `Session`
//! value behind a short-lived lock that is never held across an `.await`.

use crate::{
    app_lib::{clock::system_clock, ApiClient, AppConfig, AppError, SharedClock},
    features::{
        auth::{
            client,
            timer::RefreshTimer,
            token::{access_token_expiry, refresh_delay},
            types::{value_id, AuthenticateResponse, RegisterRequest, ResetPasswordRequest, Session},
        },
        users::client::ResourceClient,
    },
};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use std::{
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak,
    },
    time::Duration,
};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Where the store is in the sign-in lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Cloneable handle to the shared session context.
#[derive(Clone, Debug)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api: ApiClient,
    clock: SharedClock,
    refresh_lead: Duration,
    state: RwLock<SessionState>,
    timer: Mutex<Option<RefreshTimer>>,
    timer_seq: AtomicU64,
    logins_in_flight: AtomicUsize,
}

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    /// Bumped whenever the signed-in identity changes (login or teardown).
    /// Refresh results captured under an older epoch are discarded.
    epoch: u64,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SessionStore {
    /// Builds an anonymous store for the configured identity service.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Self::with_clock(config, system_clock())
    }

    /// Same as `new`, reading "now" from the given clock.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn with_clock(config: &AppConfig, clock: SharedClock) -> Result<Self, AppError> {
        let api = ApiClient::new(config)?;
        Ok(Self {
            inner: Arc::new(Inner {
                api,
                clock,
                refresh_lead: config.refresh_lead,
                state: RwLock::new(SessionState::default()),
                timer: Mutex::new(None),
                timer_seq: AtomicU64::new(0),
                logins_in_flight: AtomicUsize::new(0),
            }),
        })
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Read-only snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.read_state().session.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_state().session.is_some()
    }

    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else if self.inner.logins_in_flight.load(Ordering::SeqCst) > 0 {
            AuthState::Authenticating
        } else {
            AuthState::Anonymous
        }
    }

    /// Bearer token to attach to protected calls, if signed in.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read_state()
            .session
            .as_ref()
            .map(|session| session.access_token().clone())
    }

    /// Delay the armed refresh timer was scheduled with, if one is armed.
    #[must_use]
    pub fn pending_refresh(&self) -> Option<Duration> {
        self.lock_timer().as_ref().map(RefreshTimer::fires_in)
    }

    /// Resource client for the accounts collection bound to this session.
    #[must_use]
    pub fn accounts<T>(&self) -> ResourceClient<T> {
        ResourceClient::new(self.clone())
    }

    /// Exchanges credentials for a session and arms the refresh timer.
    ///
    /// On failure any existing session is left untouched.
    ///
    /// # Errors
    /// Returns `AppError::Auth` with the service message for rejected
    /// credentials, or a transport error.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, AppError> {
        let response = {
            let _in_flight = InFlight::enter(&self.inner.logins_in_flight);
            client::authenticate(&self.inner.api, email, password).await?
        };

        let session = self.install(response, None)?;
        info!(user_id = %session.id(), role = %session.role(), "signed in");
        Ok(session)
    }

    /// Silently exchanges the refresh cookie for a new access token.
    ///
    /// Any failure forces logout before the error is returned.
    ///
    /// # Errors
    /// Returns `AppError::SessionExpired` when the refresh failed, or
    /// `AppError::Superseded` when the session changed while the call was in flight.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Session, AppError> {
        let epoch = self.read_state().epoch;

        match client::refresh_token(&self.inner.api).await {
            Ok(response) => {
                let session = self.install(response, Some(epoch))?;
                debug!(user_id = %session.id(), "access token refreshed");
                Ok(session)
            }
            Err(err) => {
                warn!(error = %err, "silent refresh failed; signing out");
                if self.read_state().epoch == epoch {
                    self.logout().await;
                }
                Err(AppError::SessionExpired(err.user_message()))
            }
        }
    }

    /// Tries to resume a session from the refresh cookie at startup.
    /// A missing or rejected cookie simply leaves the store anonymous.
    pub async fn restore(&self) -> Option<Session> {
        match self.refresh().await {
            Ok(session) => Some(session),
            Err(err) => {
                debug!(error = %err, "no session to restore");
                None
            }
        }
    }

    /// Clears the session and cancels the timer, then revokes the token.
    ///
    /// Always succeeds locally; a failed revoke is logged and swallowed.
    /// Calling it without a session is a no-op.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let Some(previous) = self.clear() else {
            debug!("logout without a session");
            return;
        };

        if let Err(err) = client::revoke_token(&self.inner.api, previous.access_token()).await {
            warn!(error = %err, "token revoke failed; session cleared locally");
        }

        info!(user_id = %previous.id(), "signed out");
    }

    /// Cancels the refresh timer and forgets the session without calling the
    /// service. Used when the owning application shuts down.
    pub fn teardown(&self) {
        self.clear();
    }

    /// Updates the signed-in account and merges the result into the session.
    ///
    /// # Errors
    /// Returns `AppError::Auth` when not signed in, any resource client error,
    /// or `AppError::Superseded` if the session ended while the call was in flight.
    #[instrument(skip(self, fields))]
    pub async fn update_self<B: Serialize>(&self, fields: &B) -> Result<Session, AppError> {
        let current = self.require_session()?;
        let updated: Value = self.accounts::<Value>().update(current.id(), fields).await?;

        if value_id(&updated).as_deref() != Some(current.id()) {
            warn!("update response is for another account; session left unchanged");
            return self.session().ok_or_else(superseded);
        }

        let mut state = self.write_state();
        let Some(live) = state.session.as_ref().filter(|live| live.id() == current.id()) else {
            return Err(superseded());
        };
        let merged = live.with_account(live.account.merged_with(&updated)?);
        state.session = Some(merged.clone());
        drop(state);

        info!(user_id = %merged.id(), "profile updated");
        Ok(merged)
    }

    /// Deletes the signed-in account, then signs out.
    ///
    /// # Errors
    /// Returns `AppError::Auth` when not signed in, or any resource client error.
    #[instrument(skip(self))]
    pub async fn delete_self(&self) -> Result<(), AppError> {
        let current = self.require_session()?;
        self.accounts::<Value>().delete(current.id()).await?;
        self.logout().await;
        Ok(())
    }

    /// Registers a new account.
    ///
    /// # Errors
    /// Returns the service's rejection message or a transport error.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AppError> {
        client::register(&self.inner.api, request).await
    }

    /// Confirms an email address.
    ///
    /// # Errors
    /// Returns the service's rejection message or a transport error.
    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        client::verify_email(&self.inner.api, token).await
    }

    /// Requests a password reset email.
    ///
    /// # Errors
    /// Returns the service's rejection message or a transport error.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        client::forgot_password(&self.inner.api, email).await
    }

    /// Checks a password reset token.
    ///
    /// # Errors
    /// Returns the service's rejection message or a transport error.
    #[instrument(skip(self, token))]
    pub async fn validate_reset_token(&self, token: &str) -> Result<(), AppError> {
        client::validate_reset_token(&self.inner.api, token).await
    }

    /// Sets a new password with a reset token.
    ///
    /// # Errors
    /// Returns the service's rejection message or a transport error.
    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AppError> {
        client::reset_password(&self.inner.api, request).await
    }

    fn require_session(&self) -> Result<Session, AppError> {
        self.session().ok_or_else(|| AppError::Auth {
            status: 401,
            message: "You are not signed in.".to_string(),
        })
    }

    /// Stores a fresh session and re-arms the timer. With `expected_epoch`
    /// set, the result is dropped if the identity changed in the meantime.
    fn install(
        &self,
        response: AuthenticateResponse,
        expected_epoch: Option<u64>,
    ) -> Result<Session, AppError> {
        let expiry = access_token_expiry(&response.jwt_token);
        let session = Session::new(
            response.account,
            SecretString::from(response.jwt_token),
            expiry,
        );

        {
            let mut state = self.write_state();
            match expected_epoch {
                Some(epoch) if epoch != state.epoch => {
                    debug!("discarding refresh result for a session that already ended");
                    return Err(superseded());
                }
                Some(_) => {}
                None => state.epoch += 1,
            }
            state.session = Some(session.clone());
        }

        self.arm_refresh_timer(expiry);
        Ok(session)
    }

    /// Takes the session out, bumps the epoch and cancels the armed timer.
    fn clear(&self) -> Option<Session> {
        let previous = {
            let mut state = self.write_state();
            state.epoch += 1;
            state.session.take()
        };

        if let Some(timer) = self.lock_timer().take() {
            debug!(timer_id = timer.id(), "refresh timer cancelled");
        }

        previous
    }

    /// Replaces whatever timer is armed right now with a new one.
    fn arm_refresh_timer(&self, expiry: Option<std::time::SystemTime>) {
        let mut slot = self.lock_timer();

        if let Some(previous) = slot.take() {
            debug!(timer_id = previous.id(), "replacing refresh timer");
        }

        let Some(expiry) = expiry else {
            warn!("access token expiry unreadable; silent refresh disabled");
            return;
        };

        let delay = refresh_delay(expiry, self.inner.clock.now(), self.inner.refresh_lead);
        let id = self.inner.timer_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);

        let handle = tokio::spawn(async move {
            sleep(delay).await;

            // The store may have been dropped while we slept.
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let store = SessionStore { inner };
            if !store.claim_timer(id) {
                return;
            }

            if let Err(err) = store.refresh().await {
                debug!(error = %err, "scheduled refresh ended the session");
            }
        });

        debug!(timer_id = id, delay_ms = delay.as_millis(), "refresh timer armed");
        *slot = Some(RefreshTimer::new(id, delay, handle));
    }

    /// Detaches the firing timer from the slot so a re-arm cannot abort the
    /// refresh it is about to run. Returns false for stale timers.
    fn claim_timer(&self, id: u64) -> bool {
        let mut slot = self.lock_timer();
        match slot.take() {
            Some(timer) if timer.id() == id => {
                timer.detach();
                true
            }
            other => {
                *slot = other;
                false
            }
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<RefreshTimer>> {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn superseded() -> AppError {
    AppError::Superseded("the session changed while the request was in flight".to_string())
}
