//! Route authorization. The guard is a pure function of the current session
//! snapshot and the screen's required roles, so it can be evaluated on every
//! navigation and tested without a router. It is a UX gate only; the API
//! remains the real access control.

use crate::features::auth::types::{Role, Session};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Not signed in; remember where the visitor was headed.
    RedirectToLogin { return_to: String },
    /// Signed in without a required role.
    RedirectHome,
}

/// Decides whether `session` may enter a screen requiring `required_roles`.
/// An empty role set means any signed-in account.
#[must_use]
pub fn authorize(session: Option<&Session>, required_roles: &[Role], requested_path: &str) -> Decision {
    let Some(session) = session else {
        return Decision::RedirectToLogin {
            return_to: requested_path.to_string(),
        };
    };

    if !required_roles.is_empty() && !required_roles.contains(&session.role()) {
        return Decision::RedirectHome;
    }

    Decision::Allow
}
