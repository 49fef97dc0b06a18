//! File-backed credential store
//!
//! The refresh token and user info are written to a JSON file so a session
//! survives a restart. The access token is kept in memory only.
//!
//! Several processes may share one file. Every read checks whether the file
//! changed on disk since it was last seen and, if so, takes over its
//! contents and announces the changed slots to local subscribers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use storefront_core::UserInfo;
use tokio::sync::broadcast;

use super::slots::Slots;
use super::{
    CredentialStore, Slot, StoreChange, StoreChanges, StoreError, StoreResult, StoreTtl,
    CHANGE_BUFFER,
};

/// Origin reported for changes made by another process
pub const EXTERNAL_ORIGIN: u64 = u64::MAX;

/// What the file looked like when it was last read or written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl Stamp {
    /// `None` when the file does not exist
    fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct Loaded {
    slots: Slots,
    stamp: Option<Stamp>,
}

struct Shared {
    path: PathBuf,
    loaded: RwLock<Loaded>,
    changes: broadcast::Sender<StoreChange>,
    next_origin: AtomicU64,
    ttl: StoreTtl,
}

/// Credential store persisted to a JSON file
pub struct FileCredentialStore {
    shared: Arc<Shared>,
    origin: u64,
}

impl FileCredentialStore {
    /// Open the store, loading any credentials already on disk
    ///
    /// A missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>, ttl: StoreTtl) -> StoreResult<Self> {
        let path = path.into();
        let stamp = Stamp::of(&path);
        let slots = read_slots(&path)?;

        tracing::debug!(
            path = %path.display(),
            has_refresh = slots.refresh().is_some(),
            "Opened credential file"
        );

        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Ok(Self {
            shared: Arc::new(Shared {
                path,
                loaded: RwLock::new(Loaded { slots, stamp }),
                changes,
                next_origin: AtomicU64::new(1),
                ttl,
            }),
            origin: 0,
        })
    }

    /// Another handle onto the same file
    #[must_use]
    pub fn handle(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            origin: self.shared.next_origin.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Pick up changes another process made to the file
    pub fn sync(&self) {
        let stamp = Stamp::of(&self.shared.path);
        if self.shared.loaded.read().stamp == stamp {
            return;
        }

        let mut loaded = self.shared.loaded.write();
        let changed = self.reload(&mut loaded);
        drop(loaded);
        self.announce(&changed, EXTERNAL_ORIGIN);
    }

    /// Re-read the file if it moved on since `loaded` was taken
    fn reload(&self, loaded: &mut Loaded) -> Vec<Slot> {
        let stamp = Stamp::of(&self.shared.path);
        if loaded.stamp == stamp {
            return Vec::new();
        }
        loaded.stamp = stamp;

        match read_slots(&self.shared.path) {
            Ok(disk) => {
                let changed = loaded.slots.adopt_persisted(disk);
                if !changed.is_empty() {
                    tracing::debug!(
                        path = %self.shared.path.display(),
                        slots = ?changed,
                        "Credential file changed elsewhere"
                    );
                }
                changed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable credential file");
                Vec::new()
            }
        }
    }

    fn announce(&self, slots: &[Slot], origin: u64) {
        for &slot in slots {
            let _ = self.shared.changes.send(StoreChange { slot, origin });
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Slots) -> T) -> T {
        self.sync();
        f(&self.shared.loaded.read().slots)
    }

    /// Apply `f` to a copy of the current slots, persist if needed, then commit
    fn write(&self, slot: Slot, f: impl FnOnce(&mut Slots) -> bool) -> StoreResult<()> {
        let mut loaded = self.shared.loaded.write();
        let external = self.reload(&mut loaded);

        let mut next = loaded.slots.clone();
        let changed = f(&mut next);
        if changed {
            if slot != Slot::Access {
                persist(&self.shared.path, &next)?;
                loaded.stamp = Stamp::of(&self.shared.path);
            }
            loaded.slots = next;
        }
        drop(loaded);

        self.announce(&external, EXTERNAL_ORIGIN);
        if changed {
            self.announce(&[slot], self.origin);
        }
        Ok(())
    }
}

/// Load the persisted slots; a missing or empty file holds none
fn read_slots(path: &Path) -> StoreResult<Slots> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(Slots::default()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Slots::default()),
        Err(e) => Err(io_error(path, &e)),
    }
}

/// Write via a temporary file and rename so a crash never leaves half a file
fn persist(path: &Path, slots: &Slots) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(slots)?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| io_error(dir, &e))?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|e| io_error(&tmp, &e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, &e))?;
    Ok(())
}

fn io_error(path: &Path, err: &std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

impl CredentialStore for FileCredentialStore {
    fn access(&self) -> Option<String> {
        self.read(Slots::access)
    }

    fn set_access(&self, token: &str) -> StoreResult<()> {
        let ttl = self.shared.ttl.access;
        self.write(Slot::Access, |slots| slots.set_access(token, ttl))
    }

    fn clear_access(&self) -> StoreResult<()> {
        self.write(Slot::Access, Slots::clear_access)
    }

    fn refresh(&self) -> Option<String> {
        self.read(Slots::refresh)
    }

    fn set_refresh(&self, token: &str) -> StoreResult<()> {
        let ttl = self.shared.ttl.refresh;
        self.write(Slot::Refresh, |slots| slots.set_refresh(token, ttl))
    }

    fn clear_refresh(&self) -> StoreResult<()> {
        self.write(Slot::Refresh, Slots::clear_refresh)
    }

    fn user_info(&self) -> Option<UserInfo> {
        self.read(|slots| slots.user.clone())
    }

    fn set_user_info(&self, info: &UserInfo) -> StoreResult<()> {
        self.write(Slot::UserInfo, |slots| slots.set_user(info))
    }

    fn clear_user_info(&self) -> StoreResult<()> {
        self.write(Slot::UserInfo, Slots::clear_user)
    }

    fn subscribe(&self) -> StoreChanges {
        StoreChanges::new(self.shared.changes.subscribe(), self.origin)
    }
}
