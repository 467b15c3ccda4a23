//! Navigation cursor over items and their boxes.
//!
//! Every item contributes `Item::stops()` navigation stops: one for a
//! whole image, one per box for an annotated image. Items without stops
//! are skipped in both directions.

use serde::{Deserialize, Serialize};

use crate::model::Item;

/// Outcome of a cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor moved to another stop.
    Moved,
    /// Nothing to move to; the cursor is unchanged.
    Stayed,
    /// Advanced past the last stop; the cursor is unchanged.
    Complete,
}

/// Position within the item list and the current item's boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Index into the item list
    pub item_index: usize,
    /// Index into the current item's boxes (0 for whole items)
    pub box_index: usize,
}

impl Cursor {
    /// The first stop of the first item that has any.
    pub fn first(items: &[Item]) -> Option<Self> {
        items
            .iter()
            .position(|item| item.stops() > 0)
            .map(|item_index| Self {
                item_index,
                box_index: 0,
            })
    }

    /// Move to the next stop.
    pub fn advance(&mut self, items: &[Item]) -> Step {
        let stops = items.get(self.item_index).map_or(0, Item::stops);
        if self.box_index + 1 < stops {
            self.box_index += 1;
            return Step::Moved;
        }

        let next = items
            .iter()
            .enumerate()
            .skip(self.item_index + 1)
            .find(|(_, item)| item.stops() > 0);

        match next {
            Some((item_index, _)) => {
                self.item_index = item_index;
                self.box_index = 0;
                Step::Moved
            }
            None => Step::Complete,
        }
    }

    /// Move to the previous stop.
    pub fn retreat(&mut self, items: &[Item]) -> Step {
        if self.box_index > 0 {
            self.box_index -= 1;
            return Step::Moved;
        }

        let prev = items
            .iter()
            .enumerate()
            .take(self.item_index.min(items.len()))
            .rev()
            .find(|(_, item)| item.stops() > 0);

        match prev {
            Some((item_index, item)) => {
                self.item_index = item_index;
                self.box_index = item.stops() - 1;
                Step::Moved
            }
            None => Step::Stayed,
        }
    }

    /// Jump to the first stop of an item.
    ///
    /// The index is clamped to the list. If the target item has no stops
    /// the next item with stops is used, or failing that the previous one.
    pub fn jump_to(&mut self, items: &[Item], index: usize) -> Step {
        if items.is_empty() {
            return Step::Stayed;
        }
        let index = index.min(items.len() - 1);

        let forward = items
            .iter()
            .enumerate()
            .skip(index)
            .find(|(_, item)| item.stops() > 0)
            .map(|(i, _)| i);
        let target = forward.or_else(|| {
            items
                .iter()
                .enumerate()
                .take(index)
                .rev()
                .find(|(_, item)| item.stops() > 0)
                .map(|(i, _)| i)
        });

        let Some(item_index) = target else {
            return Step::Stayed;
        };

        let moved = Self {
            item_index,
            box_index: 0,
        };
        if moved == *self {
            return Step::Stayed;
        }
        *self = moved;
        Step::Moved
    }

    /// 1-based position of this stop among all stops.
    pub fn position(&self, items: &[Item]) -> usize {
        let before: usize = items.iter().take(self.item_index).map(Item::stops).sum();
        before + self.box_index + 1
    }
}

/// Total number of stops across all items.
pub fn total_stops(items: &[Item]) -> usize {
    items.iter().map(Item::stops).sum()
}
