//! # accounts-portal
//!
//! Headless account-management client for a remote identity service: login
//! with silent token refresh, guarded navigation, transient notifications,
//! self-service profile screens and an admin user panel. Rendering is left to
//! the embedding application; the `accounts-portal` binary drives the same
//! screens from the command line.
//!
//! ## Session lifecycle
//!
//! `Anonymous -> Authenticating -> Authenticated`, with `Authenticated`
//! refreshed in place by the refresh timer and `Anonymous` reachable from any
//! state (logout, failed refresh, 401/403 from a protected call, deleting the
//! signed-in account).
//!
//! ## Wiring
//!
//! Build one [`AppContext`] and hand clones of it to the screens. The context
//! owns the [`SessionStore`], the [`AlertChannel`] and the [`Router`]; the
//! router asks the route guard on every navigation, so screens never check
//! roles themselves.

pub mod app;
pub mod app_lib;
pub mod cli;
pub mod features;
pub mod routes;

pub use app::AppContext;
pub use app_lib::{AppConfig, AppError, ErrorKind, GIT_COMMIT_HASH};
pub use features::{
    alerts::AlertChannel,
    auth::{AuthState, Role, Session, SessionStore},
    users::ResourceClient,
};
pub use routes::Router;
