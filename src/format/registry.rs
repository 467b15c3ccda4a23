//! Exporter registry for discovering and accessing output formats.

use std::collections::BTreeMap;

use crate::format::formats::{LabelMapFormat, YoloZipFormat};
use crate::format::traits::LabelExporter;

/// Registry of available exporters.
///
/// All built-in exporters are registered automatically on creation.
pub struct ExporterRegistry {
    exporters: BTreeMap<&'static str, Box<dyn LabelExporter>>,
}

impl ExporterRegistry {
    /// Create a new registry with all built-in exporters registered.
    pub fn new() -> Self {
        let mut registry = Self {
            exporters: BTreeMap::new(),
        };

        registry.register(Box::new(LabelMapFormat));
        registry.register(Box::new(YoloZipFormat));

        registry
    }

    /// Register an exporter implementation.
    pub fn register(&mut self, exporter: Box<dyn LabelExporter>) {
        self.exporters.insert(exporter.id(), exporter);
    }

    /// Get an exporter by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn LabelExporter> {
        self.exporters.get(id).map(|f| f.as_ref())
    }

    /// Get all exporter IDs, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        self.exporters.keys().copied().collect()
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
