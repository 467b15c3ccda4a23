//! Flat JSON label map exporter.
//!
//! Writes the label store verbatim as `{ "<key>": "<category>", ... }`.

use std::path::Path;

use chrono::NaiveDate;

use crate::format::error::FormatError;
use crate::format::traits::{ExportOptions, ExportResult, LabelExporter, LabelSet};

/// Pretty-printed name → category JSON document.
pub struct LabelMapFormat;

impl LabelExporter for LabelMapFormat {
    fn id(&self) -> &'static str {
        "json"
    }

    fn display_name(&self) -> &'static str {
        "Label map (JSON)"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn default_filename(&self, date: NaiveDate) -> String {
        format!("GE_BeesLab_Labels_{}.json", date.format("%Y-%m-%d"))
    }

    fn export(
        &self,
        data: &LabelSet<'_>,
        path: &Path,
        _options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        log::info!("Exporting label map to {:?}", path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data.labels)?;
        std::fs::write(path, json)?;

        let labels_exported = data.labels.count();
        let items_exported = data
            .items
            .iter()
            .filter(|item| (0..item.stops()).any(|i| data.labels.get(&item.label_key(i)).is_some()))
            .count();

        log::info!(
            "Exported {} labels across {} items",
            labels_exported,
            items_exported
        );

        Ok(ExportResult {
            items_exported,
            labels_exported,
            warnings: Vec::new(),
            files_created: vec![path.to_path_buf()],
        })
    }
}
