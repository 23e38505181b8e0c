//! Auth feature module covering sign-in, silent token refresh, sign-out and
//! route authorization. It keeps session logic out of the screens and must stay
//! aligned with the identity service's endpoint contract. This module touches
//! security boundaries and must avoid logging passwords or token material.
//!
//! Flow Overview: Login exchanges credentials for an access token and arms a
//! refresh timer one minute ahead of expiry. The timer refreshes through the
//! cookie-held credential; a failed refresh signs out. The guard reads a fresh
//! session snapshot on every navigation.

pub(crate) mod client;
pub mod guards;
pub mod state;
mod timer;
pub mod token;
pub mod types;

pub use guards::{authorize, Decision};
pub use state::{AuthState, SessionStore};
pub use types::{Account, RegisterRequest, ResetPasswordRequest, Role, Session};
