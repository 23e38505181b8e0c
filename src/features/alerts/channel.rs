//! In-memory notification queue partitioned by scope. Auto-closing alerts
//! remove themselves after a fixed delay; alerts flagged to survive a route
//! change outlive exactly one navigation. Timers hold only a weak handle, so a
//! timer that fires after the channel is gone, or after its alert was already
//! removed, does nothing.

use crate::{
    app_lib::AppConfig,
    features::alerts::types::{Alert, AlertId, AlertKind, AlertOptions, DEFAULT_SCOPE},
};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::{runtime::Handle, time::sleep};
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct AlertChannel {
    inner: Arc<ChannelInner>,
}

#[derive(Debug)]
struct ChannelInner {
    alerts: Mutex<Vec<Alert>>,
    auto_close_after: Duration,
    fade_out: Duration,
    fade: bool,
}

impl AlertChannel {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                alerts: Mutex::new(Vec::new()),
                auto_close_after: config.alert_auto_close,
                fade_out: config.alert_fade_out,
                fade: config.alert_fade,
            }),
        }
    }

    /// Appends an alert and schedules its removal when it auto-closes.
    pub fn post(&self, kind: AlertKind, message: impl Into<String>, options: AlertOptions) -> AlertId {
        let alert = Alert {
            id: AlertId::new(),
            scope: options.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            kind,
            message: message.into(),
            auto_close: options.auto_close,
            keep_after_route_change: options.keep_after_route_change,
            fading: false,
        };
        let id = alert.id;
        let auto_close = alert.auto_close;

        debug!(alert_id = %id, scope = %alert.scope, kind = ?kind, "alert posted");
        self.lock().push(alert);

        if auto_close {
            self.remove_later(id, self.inner.auto_close_after);
        }

        id
    }

    pub fn success(&self, message: impl Into<String>, options: AlertOptions) -> AlertId {
        self.post(AlertKind::Success, message, options)
    }

    pub fn error(&self, message: impl Into<String>, options: AlertOptions) -> AlertId {
        self.post(AlertKind::Error, message, options)
    }

    pub fn info(&self, message: impl Into<String>, options: AlertOptions) -> AlertId {
        self.post(AlertKind::Info, message, options)
    }

    pub fn warn(&self, message: impl Into<String>, options: AlertOptions) -> AlertId {
        self.post(AlertKind::Warning, message, options)
    }

    /// Alerts of one scope in insertion order.
    #[must_use]
    pub fn read(&self, scope: &str) -> Vec<Alert> {
        self.lock()
            .iter()
            .filter(|alert| alert.scope == scope)
            .cloned()
            .collect()
    }

    /// Alerts of the default scope in insertion order.
    #[must_use]
    pub fn read_default(&self) -> Vec<Alert> {
        self.read(DEFAULT_SCOPE)
    }

    /// Removes an alert. With fading enabled it is marked and removed after
    /// the fade-out delay instead.
    pub fn dismiss(&self, id: AlertId) {
        if !self.inner.fade {
            self.remove(id);
            return;
        }

        let marked = {
            let mut alerts = self.lock();
            match alerts.iter_mut().find(|alert| alert.id == id) {
                Some(alert) => {
                    alert.fading = true;
                    true
                }
                None => false,
            }
        };

        if marked {
            self.remove_later(id, self.inner.fade_out);
        }
    }

    /// Drops every alert in a scope.
    pub fn clear(&self, scope: &str) {
        self.lock().retain(|alert| alert.scope != scope);
    }

    /// Applies route-change pruning for a committed navigation to `path`.
    ///
    /// Trailing-slash paths (other than the root) are about to be normalized
    /// by a redirect, so they leave the queue untouched.
    pub fn on_navigation(&self, path: &str) {
        if is_trailing_slash_path(path) {
            debug!(path, "skipping alert pruning for trailing-slash redirect");
            return;
        }

        let mut alerts = self.lock();
        alerts.retain(|alert| alert.keep_after_route_change);
        for alert in alerts.iter_mut() {
            alert.keep_after_route_change = false;
        }
    }

    fn remove(&self, id: AlertId) {
        remove_from(&self.inner, id);
    }

    fn remove_later(&self, id: AlertId, delay: Duration) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(alert_id = %id, "no async runtime; alert will not be removed automatically");
            return;
        };

        let weak: Weak<ChannelInner> = Arc::downgrade(&self.inner);
        runtime.spawn(async move {
            sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                remove_from(&inner, id);
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Alert>> {
        lock_alerts(&self.inner)
    }
}

fn lock_alerts(inner: &ChannelInner) -> MutexGuard<'_, Vec<Alert>> {
    inner.alerts.lock().unwrap_or_else(PoisonError::into_inner)
}

fn remove_from(inner: &ChannelInner, id: AlertId) {
    lock_alerts(inner).retain(|alert| alert.id != id);
}

pub(crate) fn is_trailing_slash_path(path: &str) -> bool {
    path.len() > 1 && path.ends_with('/')
}
