use std::{collections::BTreeMap, fmt};
use thiserror::Error;

/// Field name to message map produced by client-side form validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                formatter.write_str("; ")?;
            }
            write!(formatter, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Coarse classes callers branch on when deciding how to surface a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-side field validation; never sent to the server.
    Validation,
    /// 4xx from the identity service; the message is shown as-is.
    AuthFailure,
    /// Silent refresh failed and the session was torn down.
    SessionExpired,
    /// 5xx or transport failure; shown as a generic notification.
    NetworkOrServer,
    /// Local faults: bad configuration, undecodable payloads, discarded results.
    Local,
}

#[derive(Clone, Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error("{message}")]
    Auth { status: u16, message: String },
    #[error("Session expired: {0}")]
    SessionExpired(String),
    #[error("Request failed ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Result discarded: {0}")]
    Superseded(String),
}

impl AppError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Auth { .. } => ErrorKind::AuthFailure,
            AppError::SessionExpired(_) => ErrorKind::SessionExpired,
            AppError::Server { .. } | AppError::Network(_) | AppError::Timeout(_) => {
                ErrorKind::NetworkOrServer
            }
            AppError::Config(_)
            | AppError::Parse(_)
            | AppError::Serialization(_)
            | AppError::Superseded(_) => ErrorKind::Local,
        }
    }

    /// HTTP status carried by the error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Auth { status, .. } | AppError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 and 403 responses, which revoke the local session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Builds the variant matching an HTTP error status.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        if (400..500).contains(&status) {
            AppError::Auth { status, message }
        } else {
            AppError::Server { status, message }
        }
    }

    /// Text suitable for a notification banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }
}
