//! Labeling session: items, cursor, labels and their persistence.

use std::path::Path;

use thiserror::Error;

use super::cursor::{Cursor, Step, total_stops};
use super::labels::LabelStore;
use super::persist::{PersistError, PersistedState, StatePersister};
use super::view::View;
use crate::data::{ImageSource, LoadError};
use crate::format::formats::{LabelMapFormat, YoloZipFormat};
use crate::format::{ExportOptions, ExportResult, FormatError, LabelExporter, LabelSet};
use crate::model::{Item, LabelAction};

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The image set could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Session state could not be saved or restored
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// Export failed
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Nothing was saved, so there is nothing to resume
    #[error("No saved session to resume")]
    NothingToResume,

    /// The item list has nothing to label
    #[error("No labelable items found")]
    NoItems,
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved.
    Moved,
    /// The request had no effect.
    Stayed,
    /// Advanced past the last stop; the cursor did not move.
    Complete {
        /// Labeled stops at this moment
        labeled: usize,
        /// Total stops
        total: usize,
    },
}

/// An open labeling session.
///
/// Owns the item list, the cursor and the label store. Every label change
/// is saved through the persister before it becomes visible.
#[derive(Debug)]
pub struct Session<P: StatePersister> {
    state: PersistedState,
    cursor: Cursor,
    persister: P,
    resumed: bool,
}

impl<P: StatePersister> Session<P> {
    /// Load a fresh session from a source, replacing any saved state.
    pub fn load(source: &ImageSource, persister: P) -> Result<Self, SessionError> {
        let items = source.load()?;
        Self::from_items(items, persister)
    }

    /// Start a fresh session over already-loaded items.
    pub fn from_items(items: Vec<Item>, mut persister: P) -> Result<Self, SessionError> {
        let cursor = Cursor::first(&items).ok_or(SessionError::NoItems)?;
        let state = PersistedState {
            items,
            labels: LabelStore::new(),
        };
        persister.save(&state)?;

        Ok(Self {
            state,
            cursor,
            persister,
            resumed: false,
        })
    }

    /// Resume the saved session.
    pub fn restore(persister: P) -> Result<Self, SessionError> {
        let state = persister.load()?.ok_or(SessionError::NothingToResume)?;
        Self::resume(state, persister)
    }

    /// Resume the saved session if there is one, otherwise load `source`.
    ///
    /// The saved state is read once; [`Session::is_resumed`] tells which
    /// path was taken.
    pub fn open(source: &ImageSource, persister: P) -> Result<Self, SessionError> {
        match persister.load()? {
            Some(state) => Self::resume(state, persister),
            None => Self::load(source, persister),
        }
    }

    fn resume(state: PersistedState, persister: P) -> Result<Self, SessionError> {
        let cursor = Cursor::first(&state.items).ok_or(SessionError::NoItems)?;

        log::info!(
            "Resuming session: {} items, {} labels",
            state.items.len(),
            state.labels.count()
        );

        Ok(Self {
            state,
            cursor,
            persister,
            resumed: true,
        })
    }

    /// Whether this session continues a saved one.
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// The loaded items in display order.
    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    /// The labels assigned so far.
    pub fn labels(&self) -> &LabelStore {
        &self.state.labels
    }

    /// The current position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The persistence backend.
    pub fn persister(&self) -> &P {
        &self.persister
    }

    /// Close the session and hand back the persister.
    pub fn into_persister(self) -> P {
        self.persister
    }

    /// The item under the cursor.
    pub fn current_item(&self) -> &Item {
        &self.state.items[self.cursor.item_index]
    }

    /// Label key of the current stop.
    pub fn current_key(&self) -> String {
        self.current_item().label_key(self.cursor.box_index)
    }

    /// Total stops in the session.
    pub fn total(&self) -> usize {
        total_stops(&self.state.items)
    }

    /// Label (or discard) the current stop and save.
    ///
    /// If saving fails the label change is rolled back and the error is
    /// returned.
    pub fn apply(&mut self, action: LabelAction) -> Result<(), SessionError> {
        let key = self.current_key();
        let previous = self.state.labels.get(&key);

        if !self.state.labels.set(&key, action) {
            log::trace!("'{}' already {}", key, action.name());
            return Ok(());
        }

        if let Err(e) = self.persister.save(&self.state) {
            let undo = previous.map_or(LabelAction::Discard, LabelAction::Label);
            self.state.labels.set(&key, undo);
            return Err(e.into());
        }

        log::debug!("'{}' -> {}", key, action.name());
        Ok(())
    }

    /// Move to the next stop, or report completion at the end.
    pub fn advance(&mut self) -> Navigation {
        let step = self.cursor.advance(&self.state.items);
        self.navigation(step)
    }

    /// Move to the previous stop.
    pub fn retreat(&mut self) -> Navigation {
        let step = self.cursor.retreat(&self.state.items);
        self.navigation(step)
    }

    /// Jump to an item by index.
    pub fn jump_to(&mut self, index: usize) -> Navigation {
        let step = self.cursor.jump_to(&self.state.items, index);
        self.navigation(step)
    }

    fn navigation(&self, step: Step) -> Navigation {
        match step {
            Step::Moved => {
                log::trace!("At {:?}", self.cursor);
                Navigation::Moved
            }
            Step::Stayed => Navigation::Stayed,
            Step::Complete => {
                let labeled = self.state.labels.count();
                let total = self.total();
                log::info!("Sequence complete: {}/{} labeled", labeled, total);
                Navigation::Complete { labeled, total }
            }
        }
    }

    /// What to display for the current stop.
    pub fn view(&self) -> View<'_> {
        let item = self.current_item();
        let label_key = item.label_key(self.cursor.box_index);
        let highlighted = self.state.labels.get(&label_key);

        View {
            item,
            bbox: item.bbox(self.cursor.box_index).copied(),
            label_key,
            position: self.cursor.position(&self.state.items),
            total: self.total(),
            labeled: self.state.labels.count(),
            highlighted,
        }
    }

    /// Export the current labels.
    pub fn export(
        &self,
        exporter: &dyn LabelExporter,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        let data = LabelSet::new(&self.state.items, &self.state.labels);
        exporter.export(&data, path, options)
    }

    /// Exporter id matching how the items were loaded: the YOLO archive
    /// when boxes came with the images, the label map otherwise.
    pub fn default_export_format(&self) -> &'static str {
        if self.state.items.iter().any(Item::is_annotated) {
            YoloZipFormat.id()
        } else {
            LabelMapFormat.id()
        }
    }

    /// Forget the saved state and close the session.
    pub fn reset(mut self) -> Result<P, SessionError> {
        self.persister.clear()?;
        log::info!("Session reset");
        Ok(self.persister)
    }
}
