//! Notification payloads. Messages must be safe to render and should never
//! include secrets or tokens.

use std::fmt;
use uuid::Uuid;

/// Scope used when a caller does not name one.
pub const DEFAULT_SCOPE: &str = "default-alert";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlertId(Uuid);

impl AlertId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

/// Supported alert styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Info,
    Warning,
}

impl AlertKind {
    /// Bootstrap class the rendering layer applies.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            AlertKind::Success => "alert alert-success",
            AlertKind::Error => "alert alert-danger",
            AlertKind::Info => "alert alert-info",
            AlertKind::Warning => "alert alert-warning",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub id: AlertId,
    pub scope: String,
    pub kind: AlertKind,
    pub message: String,
    pub auto_close: bool,
    pub keep_after_route_change: bool,
    /// Set while a dismissed alert fades out.
    pub fading: bool,
}

#[derive(Clone, Debug)]
pub struct AlertOptions {
    pub scope: Option<String>,
    pub auto_close: bool,
    pub keep_after_route_change: bool,
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            scope: None,
            auto_close: true,
            keep_after_route_change: false,
        }
    }
}

impl AlertOptions {
    /// Survives the next navigation, then behaves like a normal alert.
    #[must_use]
    pub fn keep_after_route_change() -> Self {
        Self {
            keep_after_route_change: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn sticky(mut self) -> Self {
        self.auto_close = false;
        self
    }
}
