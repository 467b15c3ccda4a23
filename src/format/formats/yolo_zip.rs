//! YOLO re-export as a ZIP archive.
//!
//! Layout of the produced archive:
//!
//! ```text
//! images/<file name>     original image bytes, one per item with boxes
//! labels/<stem>.txt      one line per labeled box, omitted when none
//! classes.yaml           class index manifest
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::yolo::{classes_manifest, format_yolo_line};
use crate::data::read_source;
use crate::format::error::FormatError;
use crate::format::traits::{ExportOptions, ExportResult, FormatWarning, LabelExporter, LabelSet};
use crate::model::Item;

/// Name of the manifest entry at the archive root.
pub const CLASSES_MANIFEST: &str = "classes.yaml";

/// YOLO dataset packaged as a ZIP.
///
/// Only annotated items are exported. Box coordinates are written back
/// exactly as they were parsed; only the class index changes.
pub struct YoloZipFormat;

impl LabelExporter for YoloZipFormat {
    fn id(&self) -> &'static str {
        "yolo-zip"
    }

    fn display_name(&self) -> &'static str {
        "YOLO dataset (ZIP)"
    }

    fn extension(&self) -> &'static str {
        "zip"
    }

    fn default_filename(&self, date: NaiveDate) -> String {
        format!("GE_BeesLab_YOLO_{}.zip", date.format("%Y-%m-%d"))
    }

    fn export(
        &self,
        data: &LabelSet<'_>,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        if !data.items.iter().any(Item::is_annotated) {
            return Err(FormatError::UnsupportedOperation(
                "YOLO export needs items loaded from an annotated archive".into(),
            ));
        }

        log::info!("Exporting YOLO archive to {:?}", path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Write next to the target and rename, so a failed export never
        // leaves a truncated archive behind.
        let partial = path.with_extension("zip.part");
        let result = write_archive(data, &partial, options);
        match result {
            Ok(mut result) => {
                std::fs::rename(&partial, path)?;
                result.files_created.push(path.to_path_buf());

                log::info!(
                    "Exported {} images with {} labels ({} warnings)",
                    result.items_exported,
                    result.labels_exported,
                    result.warnings.len()
                );
                Ok(result)
            }
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_file(&partial) {
                    log::debug!("Could not remove {:?}: {}", partial, cleanup);
                }
                Err(e)
            }
        }
    }
}

fn write_archive(
    data: &LabelSet<'_>,
    path: &Path,
    options: &ExportOptions,
) -> Result<ExportResult, FormatError> {
    let mut zip = ZipWriter::new(File::create(path)?);
    let text_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    // Images are already compressed
    let image_options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.add_directory("images/", text_options)?;
    zip.add_directory("labels/", text_options)?;

    let mut result = ExportResult::new();
    let mut seen_files = HashSet::new();
    let mut seen_stems = HashSet::new();

    for item in data.items.iter().filter(|item| !item.boxes().is_empty()) {
        let file_name = item.file_name();
        let stem = item.stem();
        if !seen_files.insert(file_name) || !seen_stems.insert(stem) {
            result.add_warning(
                FormatWarning::new(format!(
                    "another image already exported as '{}', skipping",
                    file_name
                ))
                .with_item(&item.name),
            );
            continue;
        }

        if options.include_images {
            let bytes = read_source(&item.source)
                .map_err(|e| FormatError::source_unavailable(&item.name, e))?;
            zip.start_file(format!("images/{}", file_name), image_options)?;
            zip.write_all(&bytes)?;
        }
        result.items_exported += 1;

        let mut lines = String::new();
        for (box_index, bbox) in item.boxes().iter().enumerate() {
            if let Some(category) = data.labels.get(&item.label_key(box_index)) {
                lines.push_str(&format_yolo_line(category, bbox));
                lines.push('\n');
                result.labels_exported += 1;
            }
        }

        if !lines.is_empty() {
            zip.start_file(format!("labels/{}.txt", stem), text_options)?;
            zip.write_all(lines.as_bytes())?;
        } else {
            log::debug!("No labeled boxes for '{}', no label file", item.name);
        }
    }

    zip.start_file(CLASSES_MANIFEST, text_options)?;
    zip.write_all(classes_manifest().as_bytes())?;

    zip.finish()?.sync_all()?;
    Ok(result)
}
