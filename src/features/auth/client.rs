//! Client wrappers for the identity service's account endpoints. These helpers
//! centralize paths and payload shapes so the session store and screens never
//! build requests by hand. Passwords and one-time tokens pass through here and
//! must never be logged.

use crate::{
    app_lib::{ApiClient, AppError},
    features::auth::types::{
        AuthenticateRequest, AuthenticateResponse, EmailRequest, RegisterRequest,
        ResetPasswordRequest, TokenRequest,
    },
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

/// Exchanges credentials for an account and access token.
/// The service also sets the refresh cookie in the client's jar.
pub(crate) async fn authenticate(
    api: &ApiClient,
    email: &str,
    password: &SecretString,
) -> Result<AuthenticateResponse, AppError> {
    let request = AuthenticateRequest {
        email,
        password: password.expose_secret(),
    };
    api.post_json("authenticate", &request, None).await
}

/// Exchanges the refresh cookie for a new access token.
pub(crate) async fn refresh_token(api: &ApiClient) -> Result<AuthenticateResponse, AppError> {
    api.post_json("refresh-token", &json!({}), None).await
}

/// Revokes the refresh token server-side.
pub(crate) async fn revoke_token(api: &ApiClient, token: &SecretString) -> Result<(), AppError> {
    api.post_json_empty("revoke-token", &json!({}), Some(token))
        .await
}

/// Creates an account; the service emails a verification link.
pub(crate) async fn register(api: &ApiClient, request: &RegisterRequest) -> Result<(), AppError> {
    api.post_json_empty("register", request, None).await
}

/// Confirms an email address with the token from the verification link.
pub(crate) async fn verify_email(api: &ApiClient, token: &str) -> Result<(), AppError> {
    api.post_json_empty("verify-email", &TokenRequest { token }, None)
        .await
}

/// Requests a password reset email. The service answers the same way whether
/// or not the address exists.
pub(crate) async fn forgot_password(api: &ApiClient, email: &str) -> Result<(), AppError> {
    api.post_json_empty("forgot-password", &EmailRequest { email }, None)
        .await
}

/// Checks a reset token before showing the new-password form.
pub(crate) async fn validate_reset_token(api: &ApiClient, token: &str) -> Result<(), AppError> {
    api.post_json_empty("validate-reset-token", &TokenRequest { token }, None)
        .await
}

/// Sets a new password using a validated reset token.
pub(crate) async fn reset_password(
    api: &ApiClient,
    request: &ResetPasswordRequest,
) -> Result<(), AppError> {
    api.post_json_empty("reset-password", request, None).await
}

