//! Request and response types for identity service calls. Request payloads
//! carry passwords and one-time tokens, so they deliberately do not derive
//! `Debug` and must never be logged.

use crate::app_lib::AppError;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, time::SystemTime};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Admin" => Ok(Role::Admin),
            "User" => Ok(Role::User),
            other => Err(AppError::Parse(format!("unknown role: {other}"))),
        }
    }
}

/// Account record as returned by the identity service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

impl Account {
    /// Name shown in greetings; falls back to the email, then the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.email.clone().unwrap_or_else(|| self.id.clone()),
        }
    }

    /// Overlays the fields of a service response on top of this account.
    ///
    /// # Errors
    /// Returns `AppError::Parse` if the merged record is not a valid account.
    pub fn merged_with(&self, update: &Value) -> Result<Account, AppError> {
        let mut merged = serde_json::to_value(self)
            .map_err(|err| AppError::Serialization(format!("Failed to encode account: {err}")))?;

        if let (Some(target), Some(source)) = (merged.as_object_mut(), update.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }

        serde_json::from_value(merged)
            .map_err(|err| AppError::Parse(format!("Failed to decode account: {err}")))
    }
}

/// Accepts both `"7"` and `7`; the service is not consistent about id types.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Extracts an id from a loosely typed record.
#[must_use]
pub fn value_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Response of `authenticate` and `refresh-token`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthenticateResponse {
    #[serde(flatten)]
    pub account: Account,
    pub jwt_token: String,
}

#[derive(Serialize)]
pub(crate) struct AuthenticateRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub token: &'a str,
}

#[derive(Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

/// The authenticated identity and token material currently held.
///
/// Replaced wholesale on refresh and self-update; never mutated in place.
#[derive(Clone, Debug)]
pub struct Session {
    pub account: Account,
    access_token: SecretString,
    access_token_expiry: Option<SystemTime>,
}

impl Session {
    #[must_use]
    pub fn new(
        account: Account,
        access_token: SecretString,
        access_token_expiry: Option<SystemTime>,
    ) -> Self {
        Self {
            account,
            access_token,
            access_token_expiry,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.account.id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.account.role
    }

    #[must_use]
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    #[must_use]
    pub fn access_token_expiry(&self) -> Option<SystemTime> {
        self.access_token_expiry
    }

    /// Same token material, different account fields.
    #[must_use]
    pub fn with_account(&self, account: Account) -> Self {
        Self {
            account,
            access_token: self.access_token.clone(),
            access_token_expiry: self.access_token_expiry,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{value_id, Account, AuthenticateResponse, Role};
    use serde_json::json;

    #[test]
    fn authenticate_response_accepts_numeric_ids() {
        let response: AuthenticateResponse = serde_json::from_value(json!({
            "id": 7,
            "title": "Ms",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.test",
            "role": "Admin",
            "jwtToken": "a.b.c"
        }))
        .unwrap();

        assert_eq!(response.account.id, "7");
        assert_eq!(response.account.role, Role::Admin);
        assert_eq!(response.account.display_name(), "Ada Lovelace");
        assert_eq!(response.jwt_token, "a.b.c");
    }

    #[test]
    fn unknown_roles_are_rejected() {
        let result: Result<Account, _> =
            serde_json::from_value(json!({"id": "1", "role": "Root"}));
        assert!(result.is_err());
        assert!("Root".parse::<Role>().is_err());
        assert_eq!("User".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn merged_with_overlays_returned_fields() {
        let account: Account = serde_json::from_value(json!({
            "id": "1",
            "role": "User",
            "firstName": "Ada",
            "email": "ada@example.test"
        }))
        .unwrap();

        let merged = account
            .merged_with(&json!({"id": "1", "firstName": "Augusta", "lastName": "King"}))
            .unwrap();

        assert_eq!(merged.first_name.as_deref(), Some("Augusta"));
        assert_eq!(merged.last_name.as_deref(), Some("King"));
        assert_eq!(merged.email.as_deref(), Some("ada@example.test"));
        assert_eq!(merged.role, Role::User);
    }

    #[test]
    fn value_id_reads_strings_and_numbers() {
        assert_eq!(value_id(&json!({"id": 3})), Some("3".to_string()));
        assert_eq!(value_id(&json!({"id": "abc"})), Some("abc".to_string()));
        assert_eq!(value_id(&json!({"name": "x"})), None);
    }
}
