//! Shared client utilities for API access, configuration, errors, clocks and
//! build metadata.
//!
//! ## Core Account Flows
//!
//! ### Sign-in & Silent Refresh
//!
//! 1. **Authenticate:** The client POSTs credentials to `accounts/authenticate`
//!    and receives the account plus a short-lived JWT access token. The service
//!    also sets an `HttpOnly` refresh cookie in the shared cookie jar.
//! 2. **Refresh:** One minute before the access token expires the session
//!    store POSTs to `accounts/refresh-token`; the cookie is the only
//!    credential. A failed refresh tears the session down.
//! 3. **Revoke:** Logout POSTs to `accounts/revoke-token` and forgets the
//!    session locally whether or not the call succeeds.
//!
//! ### Registration & Recovery
//!
//! `register`, `verify-email`, `forgot-password`, `validate-reset-token` and
//! `reset-password` are anonymous calls and never touch session state.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated logic in routes and features. Callers must avoid logging
//! passwords or token material.

pub mod api;
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub mod clock;
pub mod config;
pub mod errors;

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub use api::ApiClient;
pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use config::AppConfig;
pub use errors::{AppError, ErrorKind, FieldErrors};
