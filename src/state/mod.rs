//! Labeling state: cursor, labels, persistence and the session tying them
//! together.

mod cursor;
mod labels;
mod persist;
mod session;
mod view;

pub use cursor::{Cursor, Step, total_stops};
pub use labels::LabelStore;
pub use persist::{FilePersister, MemoryPersister, PersistError, PersistedState, StatePersister};
pub use session::{Navigation, Session, SessionError};
pub use view::View;
