//! Route table. Maps a normalized path to a screen and the access rule the
//! guard enforces for it.

use crate::features::auth::types::Role;

pub const HOME: &str = "/";
pub const LOGIN: &str = "/account/login";
pub const PROFILE: &str = "/profile";
pub const ADMIN_USERS: &str = "/admin/users";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    Profile,
    ProfileUpdate,
    Admin,
    AdminUsers,
    AdminUserAdd,
    AdminUserEdit { id: String },
    Login,
    Register,
    VerifyEmail,
    ForgotPassword,
    ResetPassword,
}

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Anonymous only; signed-in visitors go home.
    Public,
    /// Signed in, with one of the roles when the list is non-empty.
    Protected(&'static [Role]),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteMatch {
    Screen { screen: Screen, access: Access },
    /// Unknown path inside a section; `access` still applies before the hop.
    Redirect { to: &'static str, access: Access },
    /// Strip trailing slashes and try again.
    Normalize(String),
}

const ANY_ROLE: &[Role] = &[];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Matches an absolute path (no query) against the route table.
#[must_use]
pub fn match_path(path: &str) -> RouteMatch {
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        return RouteMatch::Normalize(if trimmed.is_empty() { HOME } else { trimmed }.to_string());
    }

    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    let protected = Access::Protected(ANY_ROLE);
    let admin = Access::Protected(ADMIN_ONLY);

    let render = |screen: Screen, access: Access| RouteMatch::Screen { screen, access };

    match segments.as_slice() {
        [] => render(Screen::Home, protected),
        ["profile"] => render(Screen::Profile, protected),
        ["profile", "update"] => render(Screen::ProfileUpdate, protected),
        ["profile", ..] => RouteMatch::Redirect {
            to: PROFILE,
            access: protected,
        },
        ["admin"] => render(Screen::Admin, admin),
        ["admin", "users"] => render(Screen::AdminUsers, admin),
        ["admin", "users", "add"] => render(Screen::AdminUserAdd, admin),
        ["admin", "users", "edit", id] => render(
            Screen::AdminUserEdit {
                id: (*id).to_string(),
            },
            admin,
        ),
        ["admin", ..] => RouteMatch::Redirect {
            to: "/admin",
            access: admin,
        },
        ["account", "login"] => render(Screen::Login, Access::Public),
        ["account", "register"] => render(Screen::Register, Access::Public),
        ["account", "verify-email"] => render(Screen::VerifyEmail, Access::Public),
        ["account", "forgot-password"] => render(Screen::ForgotPassword, Access::Public),
        ["account", "reset-password"] => render(Screen::ResetPassword, Access::Public),
        ["account", ..] => RouteMatch::Redirect {
            to: LOGIN,
            access: Access::Public,
        },
        _ => RouteMatch::Redirect {
            to: HOME,
            access: Access::Public,
        },
    }
}
