//! Tests for the YOLO ZIP exporter.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use zip::ZipArchive;

use crate::format::error::FormatError;
use crate::format::formats::{CLASSES_MANIFEST, YoloZipFormat};
use crate::format::traits::{ExportOptions, LabelExporter, LabelSet};
use crate::model::{BoundingBox, Category, Item, ItemSource, LabelAction};
use crate::state::LabelStore;

/// Write fake image files and return annotated items pointing at them.
fn create_items(dir: &Path) -> Vec<Item> {
    let mut items = Vec::new();
    for (name, boxes) in [
        ("bee_001.jpg", vec![BoundingBox::new(0.5, 0.5, 0.2, 0.2)]),
        (
            "bee_002.png",
            vec![
                BoundingBox::new(0.25, 0.75, 0.125, 0.1),
                BoundingBox::new(0.8, 0.2, 0.05, 0.3),
            ],
        ),
        ("empty.jpg", Vec::new()),
    ] {
        let path = dir.join(name);
        std::fs::write(&path, format!("bytes of {}", name)).unwrap();
        items.push(Item::annotated(name, ItemSource::Path { path }, boxes));
    }
    items
}

/// Read every file entry of an archive into memory.
fn read_entries(path: &Path) -> Vec<(String, String)> {
    let mut archive = ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        if file.is_dir() {
            continue;
        }
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        entries.push((file.name().to_string(), content));
    }
    entries
}

fn entry<'a>(entries: &'a [(String, String)], name: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, c)| c.as_str())
}

#[test]
fn test_yolo_zip_metadata() {
    let format = YoloZipFormat;

    assert_eq!(format.id(), "yolo-zip");
    assert_eq!(format.extension(), "zip");
    assert_eq!(
        format.default_filename(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()),
        "GE_BeesLab_YOLO_2025-12-01.zip"
    );
}

#[test]
fn test_export_labeled_boxes() {
    let dir = tempfile::tempdir().unwrap();
    let items = create_items(dir.path());
    let mut labels = LabelStore::new();
    labels.set("bee_001.jpg#0", Category::Normal.into());
    labels.set("bee_002.png#1", Category::Atypical.into());
    labels.set("bee_002.png#0", Category::Garbage.into());
    labels.set("bee_002.png#0", LabelAction::Discard);

    let out = dir.path().join("export.zip");
    let result = YoloZipFormat
        .export(&LabelSet::new(&items, &labels), &out, &ExportOptions::default())
        .unwrap();

    assert_eq!(result.items_exported, 2);
    assert_eq!(result.labels_exported, 2);
    assert_eq!(result.files_created, vec![out.clone()]);
    assert!(!dir.path().join("export.zip.part").exists());

    let entries = read_entries(&out);
    let names: BTreeSet<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        BTreeSet::from([
            "images/bee_001.jpg",
            "images/bee_002.png",
            "labels/bee_001.txt",
            "labels/bee_002.txt",
            CLASSES_MANIFEST,
        ])
    );

    assert_eq!(entry(&entries, "labels/bee_001.txt"), Some("1 0.5 0.5 0.2 0.2\n"));
    // Discarded box is omitted, the other keeps its parsed coordinates
    assert_eq!(entry(&entries, "labels/bee_002.txt"), Some("2 0.8 0.2 0.05 0.3\n"));
    assert_eq!(
        entry(&entries, "images/bee_001.jpg"),
        Some("bytes of bee_001.jpg")
    );
    assert_eq!(
        entry(&entries, CLASSES_MANIFEST),
        Some("names:\n  0: garbage\n  1: normal\n  2: atypical\n")
    );
}

#[test]
fn test_export_without_labels() {
    let dir = tempfile::tempdir().unwrap();
    let items = create_items(dir.path());
    let out = dir.path().join("nothing.zip");

    let result = YoloZipFormat
        .export(
            &LabelSet::new(&items, &LabelStore::new()),
            &out,
            &ExportOptions::default(),
        )
        .unwrap();

    assert_eq!(result.items_exported, 2);
    assert_eq!(result.labels_exported, 0);

    let entries = read_entries(&out);
    assert!(entries.iter().all(|(n, _)| !n.starts_with("labels/")));
    assert!(entry(&entries, "images/bee_002.png").is_some());
    assert!(entry(&entries, "images/empty.jpg").is_none());
}

#[test]
fn test_export_without_images() {
    let dir = tempfile::tempdir().unwrap();
    let items = create_items(dir.path());
    let mut labels = LabelStore::new();
    labels.set("bee_001.jpg#0", Category::Garbage.into());

    let out = dir.path().join("labels-only.zip");
    YoloZipFormat
        .export(
            &LabelSet::new(&items, &labels),
            &out,
            &ExportOptions::new().include_images(false),
        )
        .unwrap();

    let entries = read_entries(&out);
    assert!(entries.iter().all(|(n, _)| !n.starts_with("images/")));
    assert_eq!(entry(&entries, "labels/bee_001.txt"), Some("0 0.5 0.5 0.2 0.2\n"));
}

#[test]
fn test_duplicate_file_names_warn() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    std::fs::create_dir_all(&a).unwrap();
    std::fs::create_dir_all(&b).unwrap();
    std::fs::write(a.join("bee.jpg"), "first").unwrap();
    std::fs::write(b.join("bee.jpg"), "second").unwrap();

    let bbox = vec![BoundingBox::new(0.5, 0.5, 0.2, 0.2)];
    let items = vec![
        Item::annotated(
            "a/bee.jpg",
            ItemSource::Path {
                path: a.join("bee.jpg"),
            },
            bbox.clone(),
        ),
        Item::annotated(
            "b/bee.jpg",
            ItemSource::Path {
                path: b.join("bee.jpg"),
            },
            bbox,
        ),
    ];
    let mut labels = LabelStore::new();
    labels.set("a/bee.jpg#0", Category::Normal.into());
    labels.set("b/bee.jpg#0", Category::Atypical.into());

    let out = dir.path().join("dups.zip");
    let result = YoloZipFormat
        .export(&LabelSet::new(&items, &labels), &out, &ExportOptions::default())
        .unwrap();

    assert_eq!(result.items_exported, 1);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].item.as_deref(), Some("b/bee.jpg"));

    let entries = read_entries(&out);
    assert_eq!(entry(&entries, "images/bee.jpg"), Some("first"));
    assert_eq!(entry(&entries, "labels/bee.txt"), Some("1 0.5 0.5 0.2 0.2\n"));
}

#[test]
fn test_plain_items_are_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let items = vec![Item::whole(
        "a.jpg",
        ItemSource::Path {
            path: PathBuf::from("a.jpg"),
        },
    )];
    let out = dir.path().join("plain.zip");

    let result = YoloZipFormat.export(
        &LabelSet::new(&items, &LabelStore::new()),
        &out,
        &ExportOptions::default(),
    );
    assert!(matches!(result, Err(FormatError::UnsupportedOperation(_))));
    assert!(!out.exists());
}

#[test]
fn test_missing_image_leaves_no_partial_archive() {
    let dir = tempfile::tempdir().unwrap();
    let items = vec![Item::annotated(
        "gone.jpg",
        ItemSource::Path {
            path: dir.path().join("gone.jpg"),
        },
        vec![BoundingBox::new(0.5, 0.5, 0.2, 0.2)],
    )];
    let out = dir.path().join("broken.zip");

    let result = YoloZipFormat.export(
        &LabelSet::new(&items, &LabelStore::new()),
        &out,
        &ExportOptions::default(),
    );
    assert!(matches!(result, Err(FormatError::SourceUnavailable { .. })));
    assert!(!out.exists());
    assert!(!dir.path().join("broken.zip.part").exists());
}

#[test]
fn test_export_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let items = create_items(dir.path());
    let mut labels = LabelStore::new();
    labels.set("bee_002.png#0", Category::Normal.into());
    let data = LabelSet::new(&items, &labels);

    let first = dir.path().join("first.zip");
    let second = dir.path().join("second.zip");
    YoloZipFormat
        .export(&data, &first, &ExportOptions::default())
        .unwrap();
    YoloZipFormat
        .export(&data, &second, &ExportOptions::default())
        .unwrap();

    assert_eq!(read_entries(&first), read_entries(&second));
}
