//! Headless router. Every navigation resolves the target against the current
//! location, walks the route table, asks the guard with a fresh session
//! snapshot, and follows redirects until a screen accepts the visit. Only the
//! final location is committed, and only a commit counts as a navigation for
//! the notification channel.

use crate::{
    app_lib::AppError,
    features::{
        alerts::AlertChannel,
        auth::{authorize, state::SessionStore, types::Session, Decision},
    },
    routes::table::{match_path, Access, RouteMatch, Screen, HOME, LOGIN},
};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};
use url::Url;

/// Redirect hops allowed before a navigation is abandoned.
const MAX_REDIRECTS: usize = 8;

/// Origin used only to resolve relative targets.
const RESOLVE_ORIGIN: &str = "http://portal.invalid/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub screen: Screen,
    /// Originally requested location when the guard bounced to login.
    pub return_to: Option<String>,
}

impl Location {
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Path plus query string.
    #[must_use]
    pub fn href(&self) -> String {
        href(&self.path, &self.query)
    }
}

#[derive(Clone, Debug)]
pub struct Router {
    store: SessionStore,
    alerts: AlertChannel,
    current: Arc<RwLock<Option<Location>>>,
}

impl Router {
    #[must_use]
    pub fn new(store: SessionStore, alerts: AlertChannel) -> Self {
        Self {
            store,
            alerts,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// The committed location, if any navigation happened yet.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Navigates to an absolute or relative target and returns where the
    /// visitor actually landed.
    ///
    /// # Errors
    /// Returns `AppError::Config` for unparsable targets or redirect loops.
    pub fn navigate(&self, target: &str) -> Result<Location, AppError> {
        let base = self
            .location()
            .map_or_else(|| HOME.to_string(), |location| location.path);
        let (mut path, mut query) = resolve_target(&base, target)?;

        let session = self.store.session();
        let mut return_to = None;

        for _ in 0..MAX_REDIRECTS {
            let next = match match_path(&path) {
                RouteMatch::Normalize(to) => Hop::Keep(to),
                RouteMatch::Redirect { to, access } => {
                    gate(session.as_ref(), access, &href(&path, &query))
                        .unwrap_or_else(|| Hop::Fresh(to.to_string(), None))
                }
                RouteMatch::Screen { screen, access } => {
                    match gate(session.as_ref(), access, &href(&path, &query)) {
                        Some(hop) => hop,
                        None => {
                            let location = Location {
                                path,
                                query,
                                screen,
                                return_to,
                            };
                            self.commit(location.clone());
                            return Ok(location);
                        }
                    }
                }
            };

            match next {
                Hop::Keep(to) => path = to,
                Hop::Fresh(to, bounced_from) => {
                    debug!(from = %path, to = %to, "redirect");
                    path = to;
                    query.clear();
                    if bounced_from.is_some() {
                        return_to = bounced_from;
                    }
                }
            }
        }

        warn!(requested = target, "navigation abandoned after too many redirects");
        Err(AppError::Config(format!("Too many redirects navigating to {target}")))
    }

    /// Re-runs the guard for the committed location, e.g. after a forced
    /// logout. A location the guard still accepts stays committed as is,
    /// `return_to` included, and does not count as a navigation.
    ///
    /// # Errors
    /// Same as `navigate`.
    pub fn revalidate(&self) -> Result<Location, AppError> {
        let Some(current) = self.location() else {
            return self.navigate(HOME);
        };

        if let RouteMatch::Screen { access, .. } = match_path(&current.path) {
            let session = self.store.session();
            if gate(session.as_ref(), access, &current.href()).is_none() {
                debug!(path = %current.path, "location still allowed");
                return Ok(current);
            }
        }

        self.navigate(&current.href())
    }

    /// Drops the query string from the committed location without counting
    /// as a navigation, so one-time tokens do not linger in it.
    pub fn strip_query(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(location) = current.as_mut() {
            location.query.clear();
        }
    }

    fn commit(&self, location: Location) {
        debug!(path = %location.path, screen = ?location.screen, "navigation committed");
        let path = location.path.clone();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(location);
        self.alerts.on_navigation(&path);
    }
}

enum Hop {
    /// Same request, normalized path.
    Keep(String),
    /// New request; carries the bounced location when sent to login.
    Fresh(String, Option<String>),
}

/// `None` lets the visit through; otherwise where to send the visitor.
fn gate(session: Option<&Session>, access: Access, requested: &str) -> Option<Hop> {
    match access {
        Access::Public => session.map(|_| Hop::Fresh(HOME.to_string(), None)),
        Access::Protected(roles) => match authorize(session, roles, requested) {
            Decision::Allow => None,
            Decision::RedirectToLogin { return_to } => {
                Some(Hop::Fresh(LOGIN.to_string(), Some(return_to)))
            }
            Decision::RedirectHome => Some(Hop::Fresh(HOME.to_string(), None)),
        },
    }
}

/// Resolves `target` the way a browser resolves a link on `base`.
fn resolve_target(base: &str, target: &str) -> Result<(String, Vec<(String, String)>), AppError> {
    let url = Url::parse(RESOLVE_ORIGIN)
        .and_then(|origin| origin.join(base))
        .and_then(|current| current.join(target))
        .map_err(|err| AppError::Config(format!("Invalid navigation target {target}: {err}")))?;

    let query = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    Ok((url.path().to_string(), query))
}

fn href(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }

    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    format!("{path}?{encoded}")
}

#[cfg(test)]
mod tests {
    use super::{href, resolve_target, Router};
    use crate::{
        app_lib::AppConfig,
        features::{
            alerts::{AlertChannel, AlertOptions},
            auth::state::SessionStore,
        },
        routes::table::Screen,
    };

    fn router() -> (Router, AlertChannel) {
        let config = AppConfig::default().with_api_base_url("http://127.0.0.1:9");
        let alerts = AlertChannel::new(&config);
        let store = SessionStore::new(&config).unwrap_or_else(|err| panic!("store: {err}"));
        (Router::new(store, alerts.clone()), alerts)
    }

    #[test]
    fn anonymous_visitors_land_on_login_with_return_path() {
        let (router, _) = router();
        let location = router.navigate("/profile/update").unwrap_or_else(|err| panic!("{err}"));

        assert_eq!(location.screen, Screen::Login);
        assert_eq!(location.path, "/account/login");
        assert_eq!(location.return_to.as_deref(), Some("/profile/update"));
        assert_eq!(router.location(), Some(location));
    }

    #[test]
    fn unknown_paths_fall_through_to_login_for_anonymous_visitors() {
        let (router, _) = router();
        let location = router.navigate("/nowhere/").unwrap_or_else(|err| panic!("{err}"));

        assert_eq!(location.screen, Screen::Login);
        assert_eq!(location.return_to.as_deref(), Some("/"));
    }

    #[test]
    fn relative_navigation_and_query_handling() {
        let (router, _) = router();
        router
            .navigate("/account/reset-password?token=abc")
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(
            router.location().and_then(|l| l.query_param("token").map(str::to_string)),
            Some("abc".to_string())
        );

        router.strip_query();
        assert!(router.location().is_some_and(|l| l.query.is_empty()));

        let location = router.navigate("login").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(location.path, "/account/login");
        assert!(location.return_to.is_none());
    }

    #[test]
    fn one_prune_per_committed_navigation() {
        let (router, alerts) = router();
        router.navigate("/account/register").unwrap_or_else(|err| panic!("{err}"));
        alerts.success(
            "Registration successful",
            AlertOptions::keep_after_route_change().sticky(),
        );

        router.navigate("login").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(alerts.read_default().len(), 1);

        router.navigate("/account/forgot-password").unwrap_or_else(|err| panic!("{err}"));
        assert!(alerts.read_default().is_empty());
    }

    #[test]
    fn revalidate_keeps_an_allowed_location() {
        let (router, alerts) = router();
        let bounced = router.navigate("/admin/users").unwrap_or_else(|err| panic!("{err}"));
        alerts.error("Email or password is incorrect", AlertOptions::default().sticky());

        let location = router.revalidate().unwrap_or_else(|err| panic!("{err}"));

        assert_eq!(location, bounced);
        assert_eq!(location.return_to.as_deref(), Some("/admin/users"));
        assert_eq!(alerts.read_default().len(), 1);
    }

    #[test]
    fn relative_targets_resolve_like_links() {
        let resolve = |base, target| resolve_target(base, target).map(|(path, _)| path).ok();

        assert_eq!(resolve("/account/register", "login").as_deref(), Some("/account/login"));
        assert_eq!(resolve("/profile/update", ".").as_deref(), Some("/profile/"));
        assert_eq!(resolve("/admin/users/edit/7", "..").as_deref(), Some("/admin/users/"));
        assert_eq!(resolve("/admin/users/add", ".").as_deref(), Some("/admin/users/"));
        assert_eq!(resolve("/profile", "/admin").as_deref(), Some("/admin"));
    }

    #[test]
    fn query_is_split_out_and_rebuilt() {
        let (path, query) = resolve_target("/", "/account/reset-password?token=abc%20def").unwrap_or_default();
        assert_eq!(path, "/account/reset-password");
        assert_eq!(query, vec![("token".to_string(), "abc def".to_string())]);
        assert_eq!(href(&path, &query), "/account/reset-password?token=abc+def");
    }
}
