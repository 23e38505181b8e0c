//! Screens as headless controllers. Each owns its form state, validates before
//! any network call, talks to the session store or resource client, and
//! reports outcomes through the notification channel and the router.

pub mod forgot_password;
pub mod forms;
pub mod login;
pub mod me;
pub mod nav;
pub mod reset_password;
pub mod router;
pub mod signup;
pub mod table;
pub mod users;
pub mod verify_email;

pub use forgot_password::ForgotPasswordScreen;
pub use login::LoginScreen;
pub use me::ProfileScreen;
pub use nav::NavMenu;
pub use reset_password::{ResetPasswordScreen, TokenStatus};
pub use router::{Location, Router};
pub use signup::RegisterScreen;
pub use table::Screen;
pub use users::{UserDetailScreen, UsersListScreen};
pub use verify_email::{VerifyEmailScreen, VerifyStatus};

use crate::{
    app::AppContext,
    app_lib::{AppError, ErrorKind},
    features::alerts::AlertOptions,
};
use tracing::warn;

/// Surfaces a failed action. A forced logout re-runs the guard first so the
/// error survives the redirect that follows.
pub(crate) fn report(ctx: &AppContext, err: AppError) -> AppError {
    if err.kind() == ErrorKind::Validation {
        return err;
    }

    if !ctx.store.is_authenticated() && ctx.router.location().is_some() {
        if let Err(route_err) = ctx.router.revalidate() {
            warn!(error = %route_err, "revalidation after failure did not settle");
        }
    }

    ctx.alerts.error(err.user_message(), AlertOptions::default());
    err
}
