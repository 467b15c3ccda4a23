//! Global constants for beelabel

/// Image file extensions accepted by every loader (lowercase, no dot)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

/// Extension of YOLO annotation files inside archives
pub const ANNOTATION_EXTENSION: &str = "txt";

/// Persisted entry holding the item list
pub const ITEMS_ENTRY: &str = "items";

/// Persisted entry holding the label map
pub const LABELS_ENTRY: &str = "labels";

/// Session identifier used when none is configured
pub const DEFAULT_SESSION_ID: &str = "default";

/// File name of the crop preview written by the terminal front end
pub const PREVIEW_FILENAME: &str = "beelabel-preview.png";
