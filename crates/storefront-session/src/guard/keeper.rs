//! Background session upkeep
//!
//! Renews the access token on a fixed interval and follows changes other
//! handles (tabs, windows) make to the shared store.

use std::time::Duration;

use tokio::sync::{broadcast::error::RecvError, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{SessionState, SessionTokenGuard};
use crate::store::{Slot, StoreChange, StoreChanges, EXTERNAL_ORIGIN};

/// Handle to the background upkeep task; dropping it stops the task
pub struct SessionKeeper {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SessionKeeper {
    /// Start the upkeep task for `guard`, ticking every `interval`
    #[must_use]
    pub fn spawn(guard: SessionTokenGuard, interval: Duration) -> Self {
        let interval = interval.max(Duration::from_secs(1));
        let changes = guard.store_changes();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(Self::run(guard, interval, changes, shutdown_rx));

        Self {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Stop the task and wait for it to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    async fn run(
        guard: SessionTokenGuard,
        interval: Duration,
        mut changes: StoreChanges,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut changes_open = true;

        tracing::info!(interval_secs = interval.as_secs(), "Session keeper started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Session keeper shutting down");
                    break;
                }
                _ = ticker.tick() => Self::on_tick(&guard).await,
                change = changes.recv(), if changes_open => match change {
                    Ok(change) => Self::on_change(&guard, change).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Missed store changes, re-reading session");
                        guard.reconcile();
                    }
                    Err(RecvError::Closed) => {
                        tracing::warn!("Store change channel closed");
                        changes_open = false;
                    }
                },
            }
        }
    }

    async fn on_tick(guard: &SessionTokenGuard) {
        if let Err(e) = guard.refresh_now().await {
            tracing::warn!(error = %e, "Background session refresh failed");
        }
    }

    /// Access-slot changes are adopted as they are. Renewing in response
    /// would make two handles renew each other's tokens in a loop.
    ///
    /// Changes read back from the file of another process only reconcile:
    /// their access token never reaches this process, so renewing here would
    /// rotate the refresh token under the other process in turn.
    async fn on_change(guard: &SessionTokenGuard, change: StoreChange) {
        tracing::debug!(slot = ?change.slot, origin = change.origin, "Store changed elsewhere");

        let state = guard.reconcile();
        if matches!(change.slot, Slot::Refresh | Slot::UserInfo)
            && change.origin != EXTERNAL_ORIGIN
            && state == SessionState::AccessExpired
        {
            Self::on_tick(guard).await;
        }
    }
}

impl Drop for SessionKeeper {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
