//! YOLO TXT line codec.
//!
//! One box per line: `<class-index> <x_center> <y_center> <width> <height>`,
//! all coordinates normalized to `[0, 1]`.

use crate::model::{BoundingBox, Category};

/// Why a YOLO line was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum YoloLineError {
    /// Not exactly five whitespace-separated fields
    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),
    /// A coordinate failed to parse or is not finite
    #[error("invalid coordinate '{0}'")]
    Coordinate(String),
}

/// Parse a single YOLO annotation line into a box.
///
/// The class field must be present but its value is ignored; crops start
/// unlabeled regardless of what the detector predicted.
pub fn parse_yolo_line(line: &str) -> Result<BoundingBox, YoloLineError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 5 {
        return Err(YoloLineError::FieldCount(parts.len()));
    }

    let coord = |s: &str| -> Result<f64, YoloLineError> {
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(YoloLineError::Coordinate(s.to_string())),
        }
    };

    Ok(BoundingBox::new(
        coord(parts[1])?,
        coord(parts[2])?,
        coord(parts[3])?,
        coord(parts[4])?,
    ))
}

/// Parse a whole annotation file, skipping blank and malformed lines.
///
/// `source` is only used for log messages.
pub fn parse_yolo_annotations(content: &str, source: &str) -> Vec<BoundingBox> {
    let mut boxes = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_yolo_line(line) {
            Ok(bbox) => boxes.push(bbox),
            Err(e) => {
                skipped += 1;
                log::warn!("{}:{}: skipping YOLO line: {}", source, line_no + 1, e);
            }
        }
    }

    if skipped > 0 {
        log::info!(
            "Parsed {} boxes from '{}' ({} lines skipped)",
            boxes.len(),
            source,
            skipped
        );
    }

    boxes
}

/// Format a labeled box as a YOLO line.
///
/// Coordinates use the shortest representation that parses back to the
/// same value, so parsed input is written back unchanged.
pub fn format_yolo_line(category: Category, bbox: &BoundingBox) -> String {
    format!(
        "{} {} {} {} {}",
        category.class_index(),
        bbox.x_center,
        bbox.y_center,
        bbox.width,
        bbox.height
    )
}

/// The class manifest written next to re-exported labels.
pub fn classes_manifest() -> String {
    let mut manifest = String::from("names:\n");
    for category in Category::ALL {
        manifest.push_str(&format!("  {}: {}\n", category.class_index(), category.name()));
    }
    manifest
}
