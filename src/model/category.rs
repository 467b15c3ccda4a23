//! Classification categories and label actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three real classification outcomes for a crop.
///
/// The declaration order is the on-screen order and also fixes the YOLO
/// class index written on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Not a usable bee crop (blur, background, partial object)
    Garbage,
    /// A regular bee
    Normal,
    /// A bee that looks unusual and deserves a second look
    Atypical,
}

impl Category {
    /// All categories in class-index order.
    pub const ALL: [Category; 3] = [Category::Garbage, Category::Normal, Category::Atypical];

    /// The YOLO class index of this category.
    pub fn class_index(self) -> u32 {
        match self {
            Category::Garbage => 0,
            Category::Normal => 1,
            Category::Atypical => 2,
        }
    }

    /// Lowercase name as stored in label maps and manifests.
    pub fn name(self) -> &'static str {
        match self {
            Category::Garbage => "garbage",
            Category::Normal => "normal",
            Category::Atypical => "atypical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a category or action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label '{0}' (expected garbage, normal, atypical or discard)")]
pub struct UnknownLabel(pub String);

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// What the user asked to do with the current stop.
///
/// `Discard` removes any existing label and is never stored itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAction {
    /// Assign a real category
    Label(Category),
    /// Remove the label, if any
    Discard,
}

impl LabelAction {
    /// The four actions in their on-screen order.
    pub const ALL: [LabelAction; 4] = [
        LabelAction::Label(Category::Garbage),
        LabelAction::Label(Category::Normal),
        LabelAction::Label(Category::Atypical),
        LabelAction::Discard,
    ];

    /// Display name of the action.
    pub fn name(self) -> &'static str {
        match self {
            LabelAction::Label(category) => category.name(),
            LabelAction::Discard => "discard",
        }
    }
}

impl From<Category> for LabelAction {
    fn from(category: Category) -> Self {
        LabelAction::Label(category)
    }
}

impl FromStr for LabelAction {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("discard") {
            return Ok(LabelAction::Discard);
        }
        s.parse::<Category>().map(LabelAction::Label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_indices_are_fixed() {
        assert_eq!(Category::Garbage.class_index(), 0);
        assert_eq!(Category::Normal.class_index(), 1);
        assert_eq!(Category::Atypical.class_index(), 2);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Atypical).unwrap();
        assert_eq!(json, "\"atypical\"");
        let back: Category = serde_json::from_str("\"garbage\"").unwrap();
        assert_eq!(back, Category::Garbage);
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            "Normal".parse::<LabelAction>(),
            Ok(LabelAction::Label(Category::Normal))
        );
        assert_eq!("discard".parse::<LabelAction>(), Ok(LabelAction::Discard));
        assert!("bee".parse::<LabelAction>().is_err());
        assert!("discard".parse::<Category>().is_err());
    }

    #[test]
    fn test_action_order_matches_screen() {
        let names: Vec<_> = LabelAction::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, ["garbage", "normal", "atypical", "discard"]);
    }
}
