//! Domain-level client features (auth, alerts, users) and their shared logic.
//! Screens import these modules to keep form code focused while keeping
//! security and API handling in dedicated feature areas.

pub mod alerts;
pub mod auth;
pub mod users;
