//! In-memory credential store
//!
//! Several handles can share one storage, the way browser tabs share cookies
//! and local storage. Each handle is its own change origin.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use storefront_core::UserInfo;
use tokio::sync::broadcast;

use super::slots::Slots;
use super::{
    CredentialStore, Slot, StoreChange, StoreChanges, StoreResult, StoreTtl, CHANGE_BUFFER,
};

struct Shared {
    slots: RwLock<Slots>,
    changes: broadcast::Sender<StoreChange>,
    next_origin: AtomicU64,
    ttl: StoreTtl,
}

/// Process-local credential store
pub struct MemoryCredentialStore {
    shared: Arc<Shared>,
    origin: u64,
}

impl MemoryCredentialStore {
    /// Create an empty store
    #[must_use]
    pub fn new(ttl: StoreTtl) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            shared: Arc::new(Shared {
                slots: RwLock::new(Slots::default()),
                changes,
                next_origin: AtomicU64::new(1),
                ttl,
            }),
            origin: 0,
        }
    }

    /// Another handle onto the same storage (a second tab or window)
    #[must_use]
    pub fn handle(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            origin: self.shared.next_origin.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Origin id stamped on changes made through this handle
    pub fn origin(&self) -> u64 {
        self.origin
    }

    fn write(&self, slot: Slot, f: impl FnOnce(&mut Slots) -> bool) {
        let changed = f(&mut self.shared.slots.write());
        if changed {
            tracing::trace!(?slot, origin = self.origin, "Credential slot changed");
            // no subscribers is fine
            let _ = self.shared.changes.send(StoreChange {
                slot,
                origin: self.origin,
            });
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new(StoreTtl::default())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn access(&self) -> Option<String> {
        self.shared.slots.read().access()
    }

    fn set_access(&self, token: &str) -> StoreResult<()> {
        let ttl = self.shared.ttl.access;
        self.write(Slot::Access, |slots| slots.set_access(token, ttl));
        Ok(())
    }

    fn clear_access(&self) -> StoreResult<()> {
        self.write(Slot::Access, Slots::clear_access);
        Ok(())
    }

    fn refresh(&self) -> Option<String> {
        self.shared.slots.read().refresh()
    }

    fn set_refresh(&self, token: &str) -> StoreResult<()> {
        let ttl = self.shared.ttl.refresh;
        self.write(Slot::Refresh, |slots| slots.set_refresh(token, ttl));
        Ok(())
    }

    fn clear_refresh(&self) -> StoreResult<()> {
        self.write(Slot::Refresh, Slots::clear_refresh);
        Ok(())
    }

    fn user_info(&self) -> Option<UserInfo> {
        self.shared.slots.read().user.clone()
    }

    fn set_user_info(&self, info: &UserInfo) -> StoreResult<()> {
        self.write(Slot::UserInfo, |slots| slots.set_user(info));
        Ok(())
    }

    fn clear_user_info(&self) -> StoreResult<()> {
        self.write(Slot::UserInfo, Slots::clear_user);
        Ok(())
    }

    fn subscribe(&self) -> StoreChanges {
        StoreChanges::new(self.shared.changes.subscribe(), self.origin)
    }
}
