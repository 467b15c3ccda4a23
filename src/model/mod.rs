//! Data models for beelabel.

mod category;
mod item;

pub use category::{Category, LabelAction, UnknownLabel};
pub use item::{BoundingBox, Item, ItemKind, ItemSource, PixelRect, file_stem};
