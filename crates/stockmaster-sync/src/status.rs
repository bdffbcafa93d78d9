//! # Sync Status Lamp
//!
//! A three-state indicator of the last known relationship with the backend:
//!
//! ```text
//!            ┌──────────────── begin_sync ────────────────┐
//!            │                                            │
//!      ┌─────▼─────┐   mark_connected   ┌───────────┐     │
//!      │  Syncing  │───────────────────►│ Connected │─────┤
//!      │ (initial) │                    └───────────┘     │
//!      └─────┬─────┘                                      │
//!            │         mark_error       ┌───────────┐     │
//!            └──────────────────────────►   Error   │─────┘
//!                                       └───────────┘
//! ```
//!
//! Every state is reachable from every other; the lamp reports the outcome
//! of the *most recent* remote interaction, nothing more. It deliberately
//! carries no queue of pending writes and no retry schedule.

use tokio::sync::watch;
use tracing::debug;

/// Connectivity of the remote store, as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbStatus {
    /// The last remote interaction succeeded.
    Connected,
    /// A remote interaction is in flight (also the initial state, since the
    /// first reconciliation starts immediately after sign-in).
    Syncing,
    /// The last remote interaction failed; local data is still served.
    Error,
}

impl std::fmt::Display for DbStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbStatus::Connected => write!(f, "connected"),
            DbStatus::Syncing => write!(f, "syncing"),
            DbStatus::Error => write!(f, "error"),
        }
    }
}

/// Shared, observable sync status.
///
/// Cloning the tracker clones a handle to the same lamp; background push
/// tasks hold one and flip it as their requests resolve.
#[derive(Debug, Clone)]
pub struct SyncStatusTracker {
    tx: watch::Sender<DbStatus>,
}

impl SyncStatusTracker {
    /// Creates a tracker in the [`DbStatus::Syncing`] state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DbStatus::Syncing);
        SyncStatusTracker { tx }
    }

    /// Marks a remote interaction as in flight.
    pub fn begin_sync(&self) {
        self.set(DbStatus::Syncing);
    }

    /// Marks the last remote interaction as successful.
    pub fn mark_connected(&self) {
        self.set(DbStatus::Connected);
    }

    /// Marks the last remote interaction as failed.
    pub fn mark_error(&self) {
        self.set(DbStatus::Error);
    }

    /// The current status.
    pub fn current(&self) -> DbStatus {
        *self.tx.borrow()
    }

    /// Subscribes to status changes (for a UI indicator).
    pub fn subscribe(&self) -> watch::Receiver<DbStatus> {
        self.tx.subscribe()
    }

    fn set(&self, status: DbStatus) {
        // send() only fails with no receivers; the lamp must update anyway.
        self.tx.send_replace(status);
        debug!(%status, "Sync status changed");
    }
}

impl Default for SyncStatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
