//! beelabel - bee crop labeling tool
//!
//! Loads an image set (directory listing, local folder or a ZIP with YOLO
//! annotations), walks through every image or annotated box, records a
//! garbage/normal/atypical label for each and exports the result as a
//! JSON label map or a YOLO dataset archive.

pub mod config;
pub mod constants;
pub mod data;
pub mod format;
pub mod keybindings;
pub mod model;
pub mod render;
pub mod state;
