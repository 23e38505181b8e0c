use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to the scheduled silent refresh. Dropping it cancels the task.
#[derive(Debug)]
pub(crate) struct RefreshTimer {
    id: u64,
    fires_in: Duration,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    pub(crate) fn new(id: u64, fires_in: Duration, handle: JoinHandle<()>) -> Self {
        Self {
            id,
            fires_in,
            handle: Some(handle),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn fires_in(&self) -> Duration {
        self.fires_in
    }

    /// Releases the handle without aborting; used by the task that is firing.
    pub(crate) fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
