//! Screen flows end to end: self-service profile, the admin panel and the
//! anonymous account screens.

mod common;

use accounts_portal::{
    routes::{
        forgot_password::RESET_REQUESTED,
        me::{DELETED, UPDATED},
        reset_password::PASSWORD_RESET,
        signup::REGISTERED,
        users::{UserFormMode, USER_ADDED},
        ForgotPasswordScreen, NavMenu, ProfileScreen, RegisterScreen, ResetPasswordScreen,
        Screen, TokenStatus, UserDetailScreen, UsersListScreen, VerifyEmailScreen, VerifyStatus,
    },
    AuthState,
};
use anyhow::{bail, Result};
use common::{
    account, can_bind_localhost, context, messages, mount_authenticate, sign_in, FAR_EXP,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn mount_revoke(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/accounts/revoke-token"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn profile_update_merges_into_the_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "User", FAR_EXP).await;
    Mock::given(method("PUT"))
        .and(path("/accounts/1"))
        .and(header_exists("authorization"))
        .and(body_json(json!({
            "title": "Ms",
            "firstName": "Augusta",
            "lastName": "Lovelace",
            "email": "ada@example.test"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "firstName": "Augusta"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/profile/update")?;

    let mut screen = ProfileScreen::open(&ctx)?;
    assert_eq!(screen.form.value("first_name"), "Ada");
    screen.form.change("first_name", "Augusta");
    let location = screen.submit().await?;

    assert_eq!(location.screen, Screen::Profile);
    let details = screen.details();
    assert_eq!(
        details.as_ref().and_then(|account| account.first_name.as_deref()),
        Some("Augusta")
    );
    assert_eq!(
        details.as_ref().and_then(|account| account.email.as_deref()),
        Some("ada@example.test")
    );
    assert_eq!(messages(&ctx), vec![UPDATED.to_string()]);

    ctx.teardown();
    Ok(())
}

#[tokio::test]
async fn profile_password_mismatch_is_caught_locally() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "User", FAR_EXP).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/profile/update")?;

    let mut screen = ProfileScreen::open(&ctx)?;
    screen.form.change("password", "new-secret");
    screen.form.change("confirm_password", "other-secret");

    assert!(screen.submit().await.is_err());
    assert_eq!(screen.form.error("confirm_password"), Some("Passwords must match"));

    ctx.teardown();
    Ok(())
}

#[tokio::test]
async fn deleting_own_profile_lands_on_login() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "User", FAR_EXP).await;
    mount_revoke(&server, 1).await;
    Mock::given(method("DELETE"))
        .and(path("/accounts/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/profile")?;

    let mut screen = ProfileScreen::open(&ctx)?;
    let location = screen.delete().await?;

    assert_eq!(location.screen, Screen::Login);
    assert_eq!(ctx.store.auth_state(), AuthState::Anonymous);
    assert!(ctx.store.pending_refresh().is_none());
    assert_eq!(messages(&ctx), vec![DELETED.to_string()]);
    Ok(())
}

#[tokio::test]
async fn forbidden_load_signs_out_and_keeps_the_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "Admin", FAR_EXP).await;
    mount_revoke(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/accounts/5"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Unauthorized"})))
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/admin/users/edit/5")?;

    let screen = UserDetailScreen::open(&ctx).await?;

    assert!(!screen.is_loading());
    assert_eq!(ctx.store.auth_state(), AuthState::Anonymous);
    let location = ctx.router.location();
    assert_eq!(location.as_ref().map(|l| l.screen.clone()), Some(Screen::Login));
    assert_eq!(
        location.and_then(|l| l.return_to),
        Some("/admin/users/edit/5".to_string())
    );
    assert_eq!(messages(&ctx), vec!["Unauthorized".to_string()]);
    Ok(())
}

#[tokio::test]
async fn admin_edit_prefills_the_form() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "Admin", FAR_EXP).await;
    Mock::given(method("GET"))
        .and(path("/accounts/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account(2, "User")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/accounts/2"))
        .and(body_json(json!({
            "title": "Ms",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.test",
            "role": "Admin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/admin/users/edit/2")?;

    let mut screen = UserDetailScreen::open(&ctx).await?;
    assert_eq!(screen.mode(), &UserFormMode::Edit { id: "2".to_string() });
    assert_eq!(screen.form.value("role"), "User");

    screen.form.change("role", "Admin");
    let location = screen.submit().await?;
    assert_eq!(location.screen, Screen::AdminUsers);

    ctx.teardown();
    Ok(())
}

#[tokio::test]
async fn admin_adds_a_user() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "Admin", FAR_EXP).await;
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .and(header_exists("authorization"))
        .and(body_json(json!({
            "title": "Mr",
            "firstName": "Alan",
            "lastName": "Turing",
            "email": "alan@example.test",
            "role": "User",
            "password": "secret1",
            "confirmPassword": "secret1"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/admin/users/add")?;

    let mut screen = UserDetailScreen::open(&ctx).await?;
    assert_eq!(screen.mode(), &UserFormMode::Add);
    screen.form.change("title", "Mr");
    screen.form.change("first_name", "Alan");
    screen.form.change("last_name", "Turing");
    screen.form.change("email", "alan@example.test");
    screen.form.change("role", "User");
    screen.form.change("password", "secret1");
    screen.form.change("confirm_password", "secret1");

    let location = screen.submit().await?;

    assert_eq!(location.path, "/admin/users");
    assert_eq!(messages(&ctx), vec![USER_ADDED.to_string()]);

    ctx.teardown();
    Ok(())
}

#[tokio::test]
async fn admin_add_requires_a_password() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "Admin", FAR_EXP).await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/admin/users/add")?;

    let mut screen = UserDetailScreen::open(&ctx).await?;
    assert!(screen.submit().await.is_err());
    assert_eq!(screen.form.error("password"), Some("Password is required"));
    assert_eq!(screen.form.error("role"), Some("Role is required"));

    ctx.teardown();
    Ok(())
}

#[tokio::test]
async fn users_list_loads_and_deletes() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "Admin", FAR_EXP).await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([account(1, "Admin"), account(2, "User")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/accounts/2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/admin/users")?;

    let mut screen = UsersListScreen::new(&ctx);
    assert_eq!(screen.load().await?.len(), 2);

    screen.delete("2").await?;

    assert_eq!(screen.users().len(), 1);
    assert!(!screen.is_deleting("2"));
    assert!(ctx.store.is_authenticated());

    ctx.teardown();
    Ok(())
}

#[tokio::test]
async fn deleting_own_row_signs_out() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "Admin", FAR_EXP).await;
    mount_revoke(&server, 1).await;
    Mock::given(method("DELETE"))
        .and(path("/accounts/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;
    ctx.router.navigate("/admin/users")?;

    let mut screen = UsersListScreen::new(&ctx);
    screen.delete("1").await?;

    assert_eq!(ctx.store.auth_state(), AuthState::Anonymous);
    assert_eq!(
        ctx.router.location().map(|location| location.screen),
        Some(Screen::Login)
    );
    Ok(())
}

#[tokio::test]
async fn nav_menu_follows_the_role_and_logs_out() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_authenticate(&server, "Admin", FAR_EXP).await;
    mount_revoke(&server, 1).await;

    let ctx = context(&server)?;
    sign_in(&ctx).await?;

    let nav = NavMenu::new(&ctx);
    let labels: Vec<&str> = nav.links().into_iter().map(|(label, _)| label).collect();
    assert_eq!(labels, vec!["Home", "Profile", "Admin"]);

    let location = nav.logout().await?;
    assert_eq!(location.screen, Screen::Login);
    assert!(nav.links().is_empty());
    Ok(())
}

#[tokio::test]
async fn registration_opens_login_with_the_notice() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/register"))
        .and(body_json(json!({
            "title": "Mr",
            "firstName": "Alan",
            "lastName": "Turing",
            "email": "alan@example.test",
            "password": "secret1",
            "confirmPassword": "secret1",
            "acceptTerms": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    ctx.router.navigate("/account/register")?;

    let mut screen = RegisterScreen::new(&ctx);
    screen.form.change("title", "Mr");
    screen.form.change("first_name", "Alan");
    screen.form.change("last_name", "Turing");
    screen.form.change("email", "alan@example.test");
    screen.form.change("password", "secret1");
    screen.form.change("confirm_password", "secret1");
    screen.form.set_checked("accept_terms", true);

    let location = screen.submit().await?;

    assert_eq!(location.path, "/account/login");
    assert_eq!(messages(&ctx), vec![REGISTERED.to_string()]);
    assert_eq!(ctx.store.auth_state(), AuthState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn forgot_password_stays_put() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/forgot-password"))
        .and(body_json(json!({"email": "ada@example.test"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    ctx.router.navigate("/account/forgot-password")?;

    let mut screen = ForgotPasswordScreen::new(&ctx);
    screen.form.change("email", "ada@example.test");
    screen.submit().await?;

    assert_eq!(
        ctx.router.location().map(|location| location.screen),
        Some(Screen::ForgotPassword)
    );
    assert_eq!(messages(&ctx), vec![RESET_REQUESTED.to_string()]);
    Ok(())
}

#[tokio::test]
async fn reset_password_consumes_the_query_token() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/validate-reset-token"))
        .and(body_json(json!({"token": "reset-123"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/accounts/reset-password"))
        .and(body_json(json!({
            "token": "reset-123",
            "password": "secret1",
            "confirmPassword": "secret1"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    ctx.router.navigate("/account/reset-password?token=reset-123")?;

    let mut screen = ResetPasswordScreen::open(&ctx);
    assert_eq!(
        ctx.router.location().map(|location| location.href()),
        Some("/account/reset-password".to_string())
    );
    assert_eq!(screen.status(), TokenStatus::Validating);
    assert_eq!(screen.validate_token().await, TokenStatus::Valid);

    screen.form.change("password", "secret1");
    screen.form.change("confirm_password", "secret1");
    let location = screen.submit().await?;

    assert_eq!(location.path, "/account/login");
    assert_eq!(messages(&ctx), vec![PASSWORD_RESET.to_string()]);
    Ok(())
}

#[tokio::test]
async fn reset_password_without_token_is_invalid() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/reset-password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    ctx.router.navigate("/account/reset-password")?;

    let mut screen = ResetPasswordScreen::open(&ctx);
    assert_eq!(screen.validate_token().await, TokenStatus::Invalid);

    screen.form.change("password", "secret1");
    screen.form.change("confirm_password", "secret1");
    assert!(screen.submit().await.is_err());
    Ok(())
}

#[tokio::test]
async fn rejected_verification_token_fails() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/verify-email"))
        .and(body_json(json!({"token": "stale"})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Verification failed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server)?;
    ctx.router.navigate("/account/verify-email?token=stale")?;

    let mut screen = VerifyEmailScreen::open(&ctx);
    assert_eq!(screen.status(), VerifyStatus::Verifying);

    let Err(err) = screen.verify().await else {
        bail!("expected verification to fail");
    };
    assert_eq!(err.user_message(), "Verification failed");
    assert_eq!(screen.status(), VerifyStatus::Failed);
    assert_eq!(
        ctx.router.location().map(|location| location.screen),
        Some(Screen::VerifyEmail)
    );
    Ok(())
}
