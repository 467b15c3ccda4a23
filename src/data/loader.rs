//! Image set loading.
//!
//! A session is built from exactly one [`ImageSource`]. Loading produces
//! the ordered item list; image bytes are only read later, on demand,
//! through [`read_source`].

use std::io::Read;
use std::path::PathBuf;

use thiserror::Error;

use super::loaders::{archive, folder, listing};
use crate::constants::IMAGE_EXTENSIONS;
use crate::model::{Item, ItemSource};

/// Errors that can occur while loading an image set.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Loading succeeded but nothing is left to label
    #[error("No labelable items found in {0}")]
    NoItems(String),

    /// I/O error reading a file or folder
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The listing or image could not be fetched
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The archive could not be read
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The source description itself is unusable
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

/// Where to load the image set from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// HTML directory index, as an `http(s)://` URL or a saved file
    Listing {
        /// URL or path of the index page
        location: String,
    },
    /// Image files inside a local folder
    Folder {
        /// Folder to scan
        path: PathBuf,
        /// Whether to descend into subfolders
        recursive: bool,
    },
    /// An explicit selection of files, in the given order
    Files(Vec<PathBuf>),
    /// ZIP archive with images and optional YOLO `.txt` annotations
    Archive {
        /// Path of the archive
        path: PathBuf,
    },
}

impl ImageSource {
    /// Short description for messages.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Listing { location } => format!("listing '{}'", location),
            ImageSource::Folder { path, .. } => format!("folder {:?}", path),
            ImageSource::Files(paths) => format!("{} selected files", paths.len()),
            ImageSource::Archive { path } => format!("archive {:?}", path),
        }
    }

    /// Load the ordered item list.
    ///
    /// Fails with [`LoadError::NoItems`] when no item has anything to label.
    pub fn load(&self) -> Result<Vec<Item>, LoadError> {
        log::info!("Loading images from {}", self.describe());

        let items = match self {
            ImageSource::Listing { location } => listing::load_listing(location)?,
            ImageSource::Folder { path, recursive } => folder::load_folder(path, *recursive)?,
            ImageSource::Files(paths) => folder::load_files(paths)?,
            ImageSource::Archive { path } => archive::load_archive(path)?,
        };

        if items.iter().all(|item| item.stops() == 0) {
            return Err(LoadError::NoItems(self.describe()));
        }

        log::info!(
            "Loaded {} items ({} labeling targets)",
            items.len(),
            items.iter().map(Item::stops).sum::<usize>()
        );
        Ok(items)
    }
}

/// Check if a file name has a supported image extension (case-insensitive).
pub fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Read the bytes behind an item source.
pub fn read_source(source: &ItemSource) -> Result<Vec<u8>, LoadError> {
    match source {
        ItemSource::Url { url } => {
            log::debug!("Fetching {}", url);
            let response = reqwest::blocking::get(url)?.error_for_status()?;
            Ok(response.bytes()?.to_vec())
        }
        ItemSource::Path { path } => Ok(std::fs::read(path)?),
        ItemSource::ArchiveEntry { archive, entry } => {
            let file = std::fs::File::open(archive)?;
            let mut zip = zip::ZipArchive::new(file)?;
            let mut file = zip.by_name(entry)?;
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_filename() {
        assert!(is_image_filename("bee.jpg"));
        assert!(is_image_filename("crops/BEE.JPEG"));
        assert!(is_image_filename("a.png"));
        assert!(is_image_filename("a.bmp"));
        assert!(is_image_filename("a.webp"));
        assert!(!is_image_filename("a.tiff"));
        assert!(!is_image_filename("a.txt"));
        assert!(!is_image_filename("jpg"));
    }

    #[test]
    fn test_read_path_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let bytes = read_source(&ItemSource::Path { path }).unwrap();
        assert_eq!(bytes, b"not really a png");
    }

    #[test]
    fn test_missing_source_is_error() {
        let source = ItemSource::Path {
            path: PathBuf::from("/definitely/not/here.png"),
        };
        assert!(matches!(read_source(&source), Err(LoadError::Io(_))));
    }

    #[test]
    fn test_empty_folder_reports_no_items() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let source = ImageSource::Folder {
            path: dir.path().to_path_buf(),
            recursive: false,
        };
        assert!(matches!(source.load(), Err(LoadError::NoItems(_))));
    }
}
