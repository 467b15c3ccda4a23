//! Trait definitions for label exporter implementations.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::format::error::FormatError;
use crate::model::Item;
use crate::state::LabelStore;

/// Read-only view of what an exporter serializes.
#[derive(Debug, Clone, Copy)]
pub struct LabelSet<'a> {
    /// The loaded items in display order
    pub items: &'a [Item],
    /// The labels assigned so far
    pub labels: &'a LabelStore,
}

impl<'a> LabelSet<'a> {
    /// Bundle items and labels for export.
    pub fn new(items: &'a [Item], labels: &'a LabelStore) -> Self {
        Self { items, labels }
    }
}

/// Trait for label export implementations.
///
/// Exporters only read the label set; calling `export` twice on an
/// unchanged session produces the same artifact.
pub trait LabelExporter: Send + Sync {
    /// Unique identifier for this exporter (e.g., "json", "yolo-zip").
    fn id(&self) -> &'static str;

    /// Human-readable name for display.
    fn display_name(&self) -> &'static str;

    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &'static str;

    /// File name used when the user does not pick one.
    fn default_filename(&self, date: NaiveDate) -> String;

    /// Export the label set to the given output file.
    fn export(
        &self,
        data: &LabelSet<'_>,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError>;
}

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Whether to copy the original image bytes into archive exports.
    pub include_images: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_images: true,
        }
    }
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether image bytes are copied into archive exports.
    pub fn include_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of items written.
    pub items_exported: usize,

    /// Number of labels written.
    pub labels_exported: usize,

    /// Warnings generated during export (e.g., skipped items).
    pub warnings: Vec<FormatWarning>,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the result.
    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Warning generated during export.
#[derive(Debug, Clone)]
pub struct FormatWarning {
    /// Name of the item this warning relates to (if applicable).
    pub item: Option<String>,

    /// Human-readable warning message.
    pub message: String,
}

impl FormatWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            item: None,
            message: message.into(),
        }
    }

    /// Set the item this warning relates to.
    pub fn with_item(mut self, name: impl Into<String>) -> Self {
        self.item = Some(name.into());
        self
    }
}

impl std::fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{}: {}", item, self.message),
            None => f.write_str(&self.message),
        }
    }
}
