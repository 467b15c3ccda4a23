//! Loader for local image files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::data::loader::{LoadError, is_image_filename};
use crate::model::{Item, ItemSource};

/// Check if a path has a supported image extension.
fn is_image_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(is_image_filename)
        .unwrap_or(false)
}

/// Recursively collect image files below a folder.
fn scan_folder_recursive(folder: &Path, images: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    for entry in std::fs::read_dir(folder)?.filter_map(|e| e.ok()) {
        let path = entry.path();

        if path.is_file() && is_image_file(&path) {
            images.push(path);
        } else if path.is_dir() {
            if let Err(e) = scan_folder_recursive(&path, images) {
                log::warn!("Failed to scan subdirectory {:?}: {}", path, e);
                // Continue scanning other directories
            }
        }
    }
    Ok(())
}

/// Build items from image paths, keeping names unique.
///
/// Items are named by file name; a name that is already taken falls back to
/// the path relative to `root` (or the full path when there is no root).
fn items_from_paths(paths: Vec<PathBuf>, root: Option<&Path>) -> Vec<Item> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(paths.len());

    for path in paths {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .unwrap_or_else(|| path.display().to_string());

        let name = if seen.contains(&file_name) {
            let name = match root.and_then(|r| path.strip_prefix(r).ok()) {
                Some(relative) => relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
                None => path.display().to_string(),
            };
            log::debug!("Duplicate file name '{}', using '{}'", file_name, name);
            name
        } else {
            file_name
        };

        if !seen.insert(name.clone()) {
            log::warn!("Skipping {:?}: name '{}' already used", path, name);
            continue;
        }
        items.push(Item::whole(name, ItemSource::Path { path }));
    }

    items
}

/// Load the images in a folder, sorted by path.
pub fn load_folder(folder: &Path, recursive: bool) -> Result<Vec<Item>, LoadError> {
    let folder = std::fs::canonicalize(folder)?;
    if !folder.is_dir() {
        return Err(LoadError::InvalidSource(format!(
            "{:?} is not a folder",
            folder
        )));
    }

    let mut images = Vec::new();
    if recursive {
        scan_folder_recursive(&folder, &mut images)?;
    } else {
        images.extend(
            std::fs::read_dir(&folder)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && is_image_file(path)),
        );
    }

    // Sort by full path for consistent ordering
    images.sort();

    log::debug!("Found {} images in {:?}", images.len(), folder);
    Ok(items_from_paths(images, Some(&folder)))
}

/// Load an explicit selection of files, keeping the given order.
///
/// Files without an image extension are dropped.
pub fn load_files(paths: &[PathBuf]) -> Result<Vec<Item>, LoadError> {
    let mut images = Vec::new();
    for path in paths.iter().filter(|p| is_image_file(p)) {
        images.push(std::fs::canonicalize(path)?);
    }
    Ok(items_from_paths(images, None))
}
