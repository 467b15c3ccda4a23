//! What the front end shows for the current stop.

use crate::model::{BoundingBox, Category, Item, LabelAction};

/// Projection of the cursor and label store for display.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    /// The current item
    pub item: &'a Item,
    /// Key the current stop is labeled under
    pub label_key: String,
    /// The current box, for annotated items
    pub bbox: Option<BoundingBox>,
    /// 1-based position among all stops
    pub position: usize,
    /// Total number of stops
    pub total: usize,
    /// Number of labeled stops
    pub labeled: usize,
    /// Label of the current stop, if any
    pub highlighted: Option<Category>,
}

impl View<'_> {
    /// Progress line, e.g. `Image 3/15 • Labeled: 2/15`.
    pub fn progress(&self) -> String {
        format!(
            "Image {}/{} • Labeled: {}/{}",
            self.position, self.total, self.labeled, self.total
        )
    }

    /// Whether the control for an action should be highlighted.
    pub fn is_highlighted(&self, action: LabelAction) -> bool {
        match action {
            LabelAction::Label(category) => self.highlighted == Some(category),
            LabelAction::Discard => false,
        }
    }
}
