use std::sync::{Arc, Mutex};

use crate::domain::bookmarks::Snapshot;
use crate::ipc::{encode_error, ApiError};

/// Storage for the single persisted snapshot.
///
/// `load` never fails: missing or unreadable storage comes back as
/// `Snapshot::default()` (no categories, no links, selection "all").
/// `save` replaces the previous snapshot as a whole; a reader never sees a
/// mix of old and new entries.
pub trait SnapshotRepo {
    fn load(&self) -> Snapshot;
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), ApiError>;
}

impl<R: SnapshotRepo + ?Sized> SnapshotRepo for Box<R> {
    fn load(&self) -> Snapshot {
        (**self).load()
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), ApiError> {
        (**self).save(snapshot)
    }
}

#[derive(Default)]
struct MemorySlot {
    raw: Option<String>,
    writes: usize,
    fail_writes: bool,
}

/// In-process repo holding the serialized snapshot. Clones share storage so
/// a test can keep a handle while the store owns another.
#[derive(Clone, Default)]
pub struct MemorySnapshotRepo {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemorySnapshotRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from raw stored text, which may be corrupt.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let repo = Self::default();
        repo.lock().raw = Some(raw.into());
        repo
    }

    pub fn raw(&self) -> Option<String> {
        self.lock().raw.clone()
    }

    /// Number of successful saves so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Makes every following save fail, to exercise rollback paths.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotRepo for MemorySnapshotRepo {
    fn load(&self) -> Snapshot {
        let Some(raw) = self.raw() else {
            return Snapshot::default();
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("Discarding unreadable in-memory snapshot: {}", err);
                Snapshot::default()
            }
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), ApiError> {
        let data =
            serde_json::to_string(snapshot).map_err(|err| encode_error("Failed to encode snapshot", err))?;
        let mut slot = self.lock();
        if slot.fail_writes {
            return Err(ApiError {
                code: "WriteFailed".to_string(),
                message: "Storage rejected the write".to_string(),
                details: None,
            });
        }
        slot.raw = Some(data);
        slot.writes += 1;
        Ok(())
    }
}
