//! Session lifecycle: removal of sessions idle past the inactivity timeout.

use chrono::Duration;
use tracing::info;

use crate::store::SessionStore;

/// Remove sessions idle longer than `inactivity_timeout`.
///
/// Returns the number of sessions removed.
pub fn cleanup_stale_sessions(store: &SessionStore, inactivity_timeout: Duration) -> usize {
    let removed = store.remove_idle(inactivity_timeout);
    if removed > 0 {
        info!(removed, "stale sessions removed");
    }
    removed
}
