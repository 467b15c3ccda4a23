//! Image set loading.
//!
//! This module provides:
//! - `ImageSource`: the three places a labeling session can come from
//! - `read_source`: on-demand access to the bytes behind an item
//! - Built-in loaders for directory listings, local folders and annotated
//!   ZIP archives

mod loader;
pub mod loaders;

pub use loader::{ImageSource, LoadError, is_image_filename, read_source};
