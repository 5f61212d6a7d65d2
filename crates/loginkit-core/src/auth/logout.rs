//! One-shot deferred logout for the session-expired failure class.
//!
//! When a protected call comes back with an authorization failure, the form
//! shows the session-expired message and schedules this teardown: after a
//! short grace delay the store is cleared and the caller's redirect signal
//! fires, sending the user back to the login entry point.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::SessionStore;

/// Grace delay before an expired session is torn down.
/// Long enough to read the message before the redirect.
pub const LOGOUT_DELAY: Duration = Duration::from_secs(2);

/// Guard over a scheduled logout.
///
/// Dropping the guard (or calling [`cancel`](Self::cancel)) before the delay
/// elapses aborts the teardown, so a view destroyed in the meantime cannot
/// fire a stale redirect.
#[derive(Debug)]
pub struct DeferredLogout {
    handle: JoinHandle<()>,
}

impl DeferredLogout {
    /// Schedule a one-shot logout: after [`LOGOUT_DELAY`] the store is
    /// cleared and `redirect` is invoked exactly once.
    pub fn schedule<F>(store: SessionStore, redirect: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(LOGOUT_DELAY).await;
            if let Err(err) = store.clear() {
                warn!(error = %err, "Failed to clear session on expiry");
            }
            debug!("Expired session cleared, redirecting to login");
            redirect();
        });
        Self { handle }
    }

    /// Abort the pending logout.
    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for DeferredLogout {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
