//! User records for the admin panel and self-service profile edits.

pub mod client;
pub mod types;

pub use client::ResourceClient;
pub use types::{ProfileUpdate, UserUpsert};
