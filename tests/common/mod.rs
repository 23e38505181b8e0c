#![allow(dead_code)]

use accounts_portal::{
    app_lib::FixedClock,
    routes::{table::LOGIN, LoginScreen},
    AppConfig, AppContext,
};
use anyhow::Result;
use base64ct::{Base64UrlUnpadded, Encoding};
use serde_json::{json, Value};
use std::{net::TcpListener, sync::Arc};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// "Now" as every test context sees it.
pub const NOW_SECS: u64 = 1_700_000_000;

/// Expiry far enough out that no refresh fires during a test.
pub const FAR_EXP: u64 = NOW_SECS + 3600;

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Unsigned token whose payload carries `exp`.
pub fn jwt_with_exp(exp: u64) -> String {
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = Base64UrlUnpadded::encode_string(format!(r#"{{"exp":{exp},"sub":"1"}}"#).as_bytes());
    format!("{header}.{payload}.signature")
}

pub fn account(id: u64, role: &str) -> Value {
    json!({
        "id": id,
        "title": "Ms",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.test",
        "role": role,
        "isVerified": true
    })
}

/// Body returned by `authenticate` and `refresh-token`.
pub fn auth_body(id: u64, role: &str, exp: u64) -> Value {
    let mut body = account(id, role);
    if let Some(fields) = body.as_object_mut() {
        fields.insert("jwtToken".to_string(), Value::String(jwt_with_exp(exp)));
    }
    body
}

pub fn context(server: &MockServer) -> Result<AppContext> {
    let config = AppConfig::default().with_api_base_url(server.uri());
    let clock = Arc::new(FixedClock::from_unix_millis(NOW_SECS * 1000));
    Ok(AppContext::with_clock(config, clock)?)
}

pub fn messages(ctx: &AppContext) -> Vec<String> {
    ctx.alerts
        .read_default()
        .into_iter()
        .map(|alert| alert.message)
        .collect()
}

pub async fn mount_authenticate(server: &MockServer, role: &str, exp: u64) {
    Mock::given(method("POST"))
        .and(path("/accounts/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(1, role, exp)))
        .mount(server)
        .await;
}

/// Signs in through the login screen.
pub async fn sign_in(ctx: &AppContext) -> Result<()> {
    ctx.router.navigate(LOGIN)?;
    let mut screen = LoginScreen::new(ctx);
    screen.form.change("email", "ada@example.test");
    screen.form.change("password", "secret-password");
    screen.submit().await?;
    Ok(())
}
