//! Session persistence.
//!
//! A session is persisted as two entries, the item list and the label map,
//! so that a later run can resume labeling without re-reading the source.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ITEMS_ENTRY, LABELS_ENTRY};
use crate::model::Item;
use crate::state::LabelStore;

/// Errors that can occur while saving or restoring a session.
#[derive(Debug, Error)]
pub enum PersistError {
    /// I/O error reading or writing the state directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A state entry could not be (de)serialized
    #[error("Invalid session state: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything needed to resume a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Loaded items in display order
    pub items: Vec<Item>,
    /// Labels assigned so far
    pub labels: LabelStore,
}

/// Storage backend for session state.
pub trait StatePersister {
    /// Restore the last saved state, or `None` if nothing was saved.
    fn load(&self) -> Result<Option<PersistedState>, PersistError>;

    /// Save the complete state. Either the whole state is written or the
    /// previous state is left untouched.
    fn save(&mut self, state: &PersistedState) -> Result<(), PersistError>;

    /// Forget any saved state.
    fn clear(&mut self) -> Result<(), PersistError>;
}

/// Keeps state in memory; used by tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryPersister {
    state: Option<PersistedState>,
    saves: usize,
}

impl MemoryPersister {
    /// Create an empty persister.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a persister that already holds a saved state.
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StatePersister for MemoryPersister {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), PersistError> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.state = None;
        Ok(())
    }
}

/// Stores each session in its own directory as `items.json` and
/// `labels.json`.
#[derive(Debug, Clone)]
pub struct FilePersister {
    dir: PathBuf,
}

impl FilePersister {
    /// Persist a session under `<state_dir>/<session_id>/`.
    ///
    /// Characters outside `[A-Za-z0-9_-]` in the session id are replaced
    /// with `_` so the id is always a single path component.
    pub fn new(state_dir: impl AsRef<Path>, session_id: &str) -> Self {
        let id: String = session_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let id = if id.is_empty() { "default".to_string() } else { id };

        Self {
            dir: state_dir.as_ref().join(id),
        }
    }

    /// Default state directory (`<data dir>/beelabel/sessions`).
    pub fn default_state_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("beelabel").join("sessions"))
    }

    /// Directory holding this session's entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, entry: &str) -> PathBuf {
        self.dir.join(format!("{}.json", entry))
    }

    fn write_entry(&self, entry: &str, json: &str) -> Result<(), PersistError> {
        let path = self.entry_path(entry);
        let tmp = self.dir.join(format!(".{}.json.tmp", entry));
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl StatePersister for FilePersister {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let items_path = self.entry_path(ITEMS_ENTRY);
        if !items_path.exists() {
            log::debug!("No saved session at {:?}", self.dir);
            return Ok(None);
        }

        let items: Vec<Item> = serde_json::from_str(&std::fs::read_to_string(&items_path)?)?;

        let labels_path = self.entry_path(LABELS_ENTRY);
        let labels = if labels_path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&labels_path)?)?
        } else {
            LabelStore::new()
        };

        log::info!(
            "Restored session from {:?}: {} items, {} labels",
            self.dir,
            items.len(),
            labels.count()
        );

        Ok(Some(PersistedState { items, labels }))
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;

        // Serialize both entries before touching disk
        let items = serde_json::to_string(&state.items)?;
        let labels = serde_json::to_string_pretty(&state.labels)?;

        self.write_entry(ITEMS_ENTRY, &items)?;
        self.write_entry(LABELS_ENTRY, &labels)?;
        log::trace!("Saved session state to {:?}", self.dir);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        for entry in [ITEMS_ENTRY, LABELS_ENTRY] {
            let path = self.entry_path(entry);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        if self.dir.exists() && std::fs::read_dir(&self.dir)?.next().is_none() {
            std::fs::remove_dir(&self.dir)?;
        }
        log::info!("Cleared session state at {:?}", self.dir);
        Ok(())
    }
}
