//! Tests for the JSON label map exporter.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::format::formats::LabelMapFormat;
use crate::format::traits::{ExportOptions, LabelExporter, LabelSet};
use crate::model::{BoundingBox, Category, Item, ItemSource, LabelAction};
use crate::state::LabelStore;

fn whole(name: &str) -> Item {
    Item::whole(
        name,
        ItemSource::Url {
            url: format!("http://localhost/images/{}", name),
        },
    )
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_label_map_metadata() {
    let format = LabelMapFormat;

    assert_eq!(format.id(), "json");
    assert_eq!(format.extension(), "json");
    assert_eq!(
        format.default_filename(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()),
        "GE_BeesLab_Labels_2024-03-07.json"
    );
}

#[test]
fn test_export_labels_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.json");

    let items = vec![whole("a.jpg"), whole("b.jpg"), whole("c.jpg")];
    let mut labels = LabelStore::new();
    labels.set("c.jpg", Category::Garbage.into());
    labels.set("a.jpg", Category::Normal.into());
    labels.set("b.jpg", Category::Atypical.into());
    labels.set("b.jpg", LabelAction::Discard);

    let result = LabelMapFormat
        .export(&LabelSet::new(&items, &labels), &path, &ExportOptions::default())
        .unwrap();

    assert_eq!(result.labels_exported, 2);
    assert_eq!(result.items_exported, 2);
    assert_eq!(result.files_created, vec![path.clone()]);
    assert!(!result.has_warnings());

    assert_eq!(
        read_json(&path),
        serde_json::json!({ "a.jpg": "normal", "c.jpg": "garbage" })
    );

    // Keys come out sorted and pretty-printed
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.find("a.jpg").unwrap() < text.find("c.jpg").unwrap());
    assert!(text.contains('\n'));
}

#[test]
fn test_export_without_labels_is_empty_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    let items = vec![whole("a.jpg")];

    let result = LabelMapFormat
        .export(
            &LabelSet::new(&items, &LabelStore::new()),
            &path,
            &ExportOptions::default(),
        )
        .unwrap();

    assert_eq!(result.labels_exported, 0);
    assert_eq!(read_json(&path), serde_json::json!({}));
}

#[test]
fn test_box_keys_count_per_item() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("boxes.json");

    let items = vec![Item::annotated(
        "hive.jpg",
        ItemSource::Path {
            path: PathBuf::from("hive.jpg"),
        },
        vec![BoundingBox::new(0.5, 0.5, 0.2, 0.2); 3],
    )];
    let mut labels = LabelStore::new();
    labels.set("hive.jpg#0", Category::Normal.into());
    labels.set("hive.jpg#2", Category::Garbage.into());

    let result = LabelMapFormat
        .export(&LabelSet::new(&items, &labels), &path, &ExportOptions::default())
        .unwrap();

    assert_eq!(result.items_exported, 1);
    assert_eq!(result.labels_exported, 2);
    assert_eq!(
        read_json(&path),
        serde_json::json!({ "hive.jpg#0": "normal", "hive.jpg#2": "garbage" })
    );
}

#[test]
fn test_export_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.json");
    let items = vec![whole("a.jpg")];
    let mut labels = LabelStore::new();
    labels.set("a.jpg", Category::Atypical.into());
    let data = LabelSet::new(&items, &labels);

    LabelMapFormat
        .export(&data, &path, &ExportOptions::default())
        .unwrap();
    let first = std::fs::read(&path).unwrap();
    LabelMapFormat
        .export(&data, &path, &ExportOptions::default())
        .unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), first);
}
