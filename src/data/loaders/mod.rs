//! Built-in image set loaders.
//!
//! Each loader turns one kind of source into an ordered item list.

pub mod archive;
pub mod folder;
pub mod listing;
