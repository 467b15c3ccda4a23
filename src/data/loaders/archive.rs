//! Loader for ZIP archives with YOLO annotations.
//!
//! Each image entry is paired with the `.txt` entry of the same base name.
//! A companion in the same directory wins; otherwise the first matching
//! entry anywhere in the archive is used. Images without a companion get
//! zero boxes and are never shown.

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::constants::ANNOTATION_EXTENSION;
use crate::data::loader::{LoadError, is_image_filename};
use crate::format::formats::yolo::parse_yolo_annotations;
use crate::model::{Item, ItemSource, file_stem};

/// Skip hidden files and macOS metadata.
fn is_hidden_entry(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("__macosx") || lower.contains("/.") || lower.starts_with('.')
}

/// Check if an archive entry is an image we should label.
fn is_image_entry(name: &str) -> bool {
    !is_hidden_entry(name) && is_image_filename(name)
}

/// Check if an archive entry is a YOLO annotation file.
fn is_annotation_entry(name: &str) -> bool {
    !is_hidden_entry(name)
        && name
            .to_lowercase()
            .ends_with(&format!(".{}", ANNOTATION_EXTENSION))
}

/// Split an entry name into its directory prefix (with trailing `/`) and
/// base name without extension.
fn entry_key(name: &str) -> (&str, &str) {
    let (dir, file) = match name.rfind('/') {
        Some(i) => name.split_at(i + 1),
        None => ("", name),
    };
    (dir, file_stem(file))
}

/// Annotation entries indexed for exact base-name lookup.
struct AnnotationIndex<'a> {
    by_dir_and_stem: HashMap<(&'a str, &'a str), &'a str>,
    by_stem: HashMap<&'a str, &'a str>,
}

impl<'a> AnnotationIndex<'a> {
    fn new(names: &'a [String]) -> Self {
        let mut by_dir_and_stem = HashMap::new();
        let mut by_stem = HashMap::new();

        for name in names.iter().filter(|n| is_annotation_entry(n)) {
            let (dir, stem) = entry_key(name);
            by_dir_and_stem.entry((dir, stem)).or_insert(name.as_str());
            by_stem.entry(stem).or_insert(name.as_str());
        }

        Self {
            by_dir_and_stem,
            by_stem,
        }
    }

    fn companion(&self, image: &str) -> Option<&'a str> {
        let (dir, stem) = entry_key(image);
        self.by_dir_and_stem
            .get(&(dir, stem))
            .or_else(|| self.by_stem.get(stem))
            .copied()
    }
}

/// Read an archive entry as text, replacing invalid UTF-8.
fn read_text_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, LoadError> {
    let mut file = archive.by_name(name)?;
    let mut data = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut data)?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Build items from any readable archive.
///
/// `make_source` maps an entry name to the source stored on the item.
pub fn items_from_archive<R: Read + Seek>(
    reader: R,
    archive_name: &str,
    make_source: impl Fn(&str) -> ItemSource,
) -> Result<Vec<Item>, LoadError> {
    let mut archive = ZipArchive::new(reader)?;

    log::debug!("ZIP '{}' contains {} entries", archive_name, archive.len());

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        if file.is_dir() {
            log::trace!("Skipping directory: {}", file.name());
            continue;
        }
        names.push(file.name().to_string());
    }

    let index = AnnotationIndex::new(&names);

    let mut images: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|n| is_image_entry(n))
        .collect();
    // Sort images by name for consistent ordering
    images.sort_unstable();

    let mut items = Vec::with_capacity(images.len());
    for image in images {
        let boxes = match index.companion(image) {
            Some(txt) => {
                let content = read_text_entry(&mut archive, txt)?;
                let boxes = parse_yolo_annotations(&content, txt);
                log::debug!("'{}': {} boxes from '{}'", image, boxes.len(), txt);
                boxes
            }
            None => {
                log::debug!("'{}': no annotation file, skipped during labeling", image);
                Vec::new()
            }
        };
        items.push(Item::annotated(image, make_source(image), boxes));
    }

    log::info!(
        "Read {} images ({} with boxes) from ZIP '{}'",
        items.len(),
        items.iter().filter(|i| i.stops() > 0).count(),
        archive_name
    );

    Ok(items)
}

/// Load an annotated archive from disk.
pub fn load_archive(path: &Path) -> Result<Vec<Item>, LoadError> {
    let path = std::fs::canonicalize(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.zip")
        .to_string();

    log::info!("Opening ZIP file: {:?}", path);
    let file = std::fs::File::open(&path)?;

    items_from_archive(file, &filename, |entry| ItemSource::ArchiveEntry {
        archive: path.clone(),
        entry: entry.to_string(),
    })
}
