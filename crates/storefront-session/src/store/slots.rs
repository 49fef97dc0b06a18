//! Slot values shared by the store implementations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storefront_core::UserInfo;

use super::Slot;

/// A token with an absolute expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Expiring {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Expiring {
    pub fn new(value: &str, ttl: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            value: value.to_string(),
            expires_at,
        }
    }

    pub fn live(&self) -> Option<&str> {
        (self.expires_at > Utc::now()).then_some(self.value.as_str())
    }
}

/// The three credential slots; mutators report whether anything changed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Slots {
    #[serde(skip)]
    pub access: Option<Expiring>,
    #[serde(default)]
    pub refresh: Option<Expiring>,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

impl Slots {
    pub fn access(&self) -> Option<String> {
        self.access.as_ref().and_then(Expiring::live).map(String::from)
    }

    pub fn refresh(&self) -> Option<String> {
        self.refresh.as_ref().and_then(Expiring::live).map(String::from)
    }

    pub fn set_access(&mut self, token: &str, ttl: Duration) -> bool {
        Self::set(&mut self.access, token, ttl)
    }

    pub fn set_refresh(&mut self, token: &str, ttl: Duration) -> bool {
        Self::set(&mut self.refresh, token, ttl)
    }

    pub fn set_user(&mut self, info: &UserInfo) -> bool {
        let changed = self.user.as_ref() != Some(info);
        self.user = Some(info.clone());
        changed
    }

    pub fn clear_access(&mut self) -> bool {
        self.access.take().is_some()
    }

    pub fn clear_refresh(&mut self) -> bool {
        self.refresh.take().is_some()
    }

    pub fn clear_user(&mut self) -> bool {
        self.user.take().is_some()
    }

    /// Take over the persisted slots written by someone else, keeping the
    /// in-memory access token only while the refresh token stays the same.
    /// Returns the slots whose value changed.
    pub fn adopt_persisted(&mut self, disk: Slots) -> Vec<Slot> {
        let mut changed = Vec::new();

        let same_refresh = self.refresh.as_ref().map(|r| &r.value)
            == disk.refresh.as_ref().map(|r| &r.value);
        self.refresh = disk.refresh;
        if !same_refresh {
            if self.clear_access() {
                changed.push(Slot::Access);
            }
            changed.push(Slot::Refresh);
        }

        if self.user != disk.user {
            self.user = disk.user;
            changed.push(Slot::UserInfo);
        }
        changed
    }

    fn set(slot: &mut Option<Expiring>, token: &str, ttl: Duration) -> bool {
        let changed = slot.as_ref().and_then(Expiring::live) != Some(token);
        // rewriting the same token still extends its lifetime
        *slot = Some(Expiring::new(token, ttl));
        changed
    }
}
