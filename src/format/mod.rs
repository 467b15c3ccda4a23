//! Label export system.
//!
//! Exporters turn the label store (plus the original item list) into an
//! artifact on disk. New outputs are added by implementing
//! [`LabelExporter`] and registering it in [`ExporterRegistry::new`].
//!
//! ## Supported Formats
//!
//! - **Label map JSON** (`json`): flat `name → category` object
//! - **YOLO ZIP** (`yolo-zip`): `images/`, `labels/` and `classes.yaml`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use beelabel::format::{ExporterRegistry, ExportOptions, LabelSet};
//!
//! let registry = ExporterRegistry::new();
//! let exporter = registry.get("yolo-zip").unwrap();
//! let result = exporter.export(&LabelSet::new(&items, &labels), path, &ExportOptions::default())?;
//! ```

mod error;
pub mod formats;
mod registry;
mod traits;

pub use error::FormatError;
pub use registry::ExporterRegistry;
pub use traits::{ExportOptions, ExportResult, FormatWarning, LabelExporter, LabelSet};
