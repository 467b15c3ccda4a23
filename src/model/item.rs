//! Labeling targets: images and their YOLO boxes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A YOLO bounding box in normalized image coordinates.
///
/// Values are kept exactly as parsed so that re-export writes the same
/// numbers back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Box center x, relative to image width
    pub x_center: f64,
    /// Box center y, relative to image height
    pub y_center: f64,
    /// Box width, relative to image width
    pub width: f64,
    /// Box height, relative to image height
    pub height: f64,
}

impl BoundingBox {
    /// Create a box from normalized center/size values.
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// Convert to a pixel rectangle inside an image of the given size.
    ///
    /// Edges are truncated towards zero and clamped to the image. Returns
    /// `None` when nothing of the box is left inside the image.
    pub fn to_pixel_rect(&self, image_width: u32, image_height: u32) -> Option<PixelRect> {
        let w = f64::from(image_width);
        let h = f64::from(image_height);

        let x1 = ((self.x_center - self.width / 2.0) * w).clamp(0.0, w) as u32;
        let y1 = ((self.y_center - self.height / 2.0) * h).clamp(0.0, h) as u32;
        let x2 = ((self.x_center + self.width / 2.0) * w).clamp(0.0, w) as u32;
        let y2 = ((self.y_center + self.height / 2.0) * h).clamp(0.0, h) as u32;

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(PixelRect {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        })
    }
}

/// A rectangle in pixel coordinates (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Where the bytes of an item live.
///
/// The navigation and labeling logic never looks inside a source; only the
/// preview renderer and the YOLO exporter read through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemSource {
    /// Remote file, fetched over HTTP(S)
    Url {
        /// Absolute URL of the image
        url: String,
    },
    /// Local file
    Path {
        /// Path of the image on disk
        path: PathBuf,
    },
    /// Entry inside a ZIP archive on disk
    ArchiveEntry {
        /// Path of the archive
        archive: PathBuf,
        /// Entry name within the archive
        entry: String,
    },
}

/// What inside an image gets labeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// The whole image is a single labeling target.
    Whole,
    /// Each YOLO box is a labeling target; may be empty.
    Annotated(Vec<BoundingBox>),
}

/// One image in the labeling set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, unique within the loaded set
    pub name: String,
    /// Reference to the image bytes
    pub source: ItemSource,
    /// Whole-image or per-box labeling
    pub kind: ItemKind,
}

impl Item {
    /// Create an item labeled as a whole.
    pub fn whole(name: impl Into<String>, source: ItemSource) -> Self {
        Self {
            name: name.into(),
            source,
            kind: ItemKind::Whole,
        }
    }

    /// Create an item labeled per bounding box.
    pub fn annotated(name: impl Into<String>, source: ItemSource, boxes: Vec<BoundingBox>) -> Self {
        Self {
            name: name.into(),
            source,
            kind: ItemKind::Annotated(boxes),
        }
    }

    /// Number of navigation stops this item contributes.
    pub fn stops(&self) -> usize {
        match &self.kind {
            ItemKind::Whole => 1,
            ItemKind::Annotated(boxes) => boxes.len(),
        }
    }

    /// The boxes of an annotated item (empty for whole items).
    pub fn boxes(&self) -> &[BoundingBox] {
        match &self.kind {
            ItemKind::Whole => &[],
            ItemKind::Annotated(boxes) => boxes,
        }
    }

    /// Whether this item is labeled per box.
    pub fn is_annotated(&self) -> bool {
        matches!(self.kind, ItemKind::Annotated(_))
    }

    /// The box shown at the given stop, if this is an annotated item.
    pub fn bbox(&self, box_index: usize) -> Option<&BoundingBox> {
        self.boxes().get(box_index)
    }

    /// Key under which the label of a stop is stored.
    ///
    /// Whole items use their name; boxes use `<name>#<box index>`.
    pub fn label_key(&self, box_index: usize) -> String {
        match self.kind {
            ItemKind::Whole => self.name.clone(),
            ItemKind::Annotated(_) => format!("{}#{}", self.name, box_index),
        }
    }

    /// Last path component of the name.
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        file_stem(self.file_name())
    }
}

/// Strip the last extension from a file name (`a.b.jpg` -> `a.b`).
pub fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}
