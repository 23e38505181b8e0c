pub mod channel;
pub mod types;

pub use channel::AlertChannel;
pub use types::{Alert, AlertId, AlertKind, AlertOptions, DEFAULT_SCOPE};
