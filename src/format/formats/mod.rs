//! Label exporter implementations and the YOLO line codec.

mod label_map;
pub mod yolo;
mod yolo_zip;

#[cfg(test)]
mod tests;

pub use label_map::LabelMapFormat;
pub use yolo_zip::{CLASSES_MANIFEST, YoloZipFormat};
