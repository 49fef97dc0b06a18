//! Credential storage
//!
//! Three slots with distinct lifecycles:
//! - access token: short-lived, need not survive a restart
//! - refresh token: long-lived, must survive a restart
//! - user info: cached with the refresh token for display
//!
//! Stores are handed to the [`SessionTokenGuard`](crate::SessionTokenGuard),
//! which is the only component that writes them.

mod file;
mod memory;
mod slots;

use std::time::Duration;

use storefront_common::SessionConfig;
use storefront_core::UserInfo;
use tokio::sync::broadcast;

pub use file::{FileCredentialStore, EXTERNAL_ORIGIN};
pub use memory::MemoryCredentialStore;

/// Capacity of the change-notification channel
const CHANGE_BUFFER: usize = 64;

/// A credential slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Access,
    Refresh,
    UserInfo,
}

/// Notification that a slot was written or cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub slot: Slot,
    /// Handle that made the change
    pub origin: u64,
}

/// Receives changes made through *other* handles of the same storage.
///
/// Mirrors browser `storage` events: a tab is not notified of its own writes.
pub struct StoreChanges {
    rx: broadcast::Receiver<StoreChange>,
    origin: u64,
}

impl StoreChanges {
    pub(crate) fn new(rx: broadcast::Receiver<StoreChange>, origin: u64) -> Self {
        Self { rx, origin }
    }

    /// Wait for the next foreign change
    pub async fn recv(&mut self) -> Result<StoreChange, broadcast::error::RecvError> {
        loop {
            let change = self.rx.recv().await?;
            if change.origin != self.origin {
                return Ok(change);
            }
        }
    }
}

/// Slot lifetimes; an expired slot reads as empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTtl {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for StoreTtl {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for StoreTtl {
    fn from(config: &SessionConfig) -> Self {
        Self {
            access: config.access_token_ttl(),
            refresh: config.refresh_token_ttl(),
        }
    }
}

/// Credential storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for session credentials
pub trait CredentialStore: Send + Sync {
    fn access(&self) -> Option<String>;
    fn set_access(&self, token: &str) -> StoreResult<()>;
    fn clear_access(&self) -> StoreResult<()>;

    fn refresh(&self) -> Option<String>;
    fn set_refresh(&self, token: &str) -> StoreResult<()>;
    fn clear_refresh(&self) -> StoreResult<()>;

    fn user_info(&self) -> Option<UserInfo>;
    fn set_user_info(&self, info: &UserInfo) -> StoreResult<()>;
    fn clear_user_info(&self) -> StoreResult<()>;

    /// Changes made through other handles of the same storage
    fn subscribe(&self) -> StoreChanges;

    /// Clear every slot; all three are attempted even if one fails
    fn clear_all(&self) -> StoreResult<()> {
        let access = self.clear_access();
        let refresh = self.clear_refresh();
        let user = self.clear_user_info();
        access.and(refresh).and(user)
    }
}
