//! Loader for HTML directory listings.
//!
//! Web servers with directory indexing return a page of `<a href="...">`
//! links; every link that names an image becomes a whole-image item.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::data::loader::{LoadError, is_image_filename};
use crate::model::{Item, ItemSource};

fn href_pattern() -> &'static Regex {
    static HREF: OnceLock<Regex> = OnceLock::new();
    HREF.get_or_init(|| {
        Regex::new(r#"(?is)<a\s[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
            .expect("href pattern is valid")
    })
}

/// Whether a listing location is fetched over HTTP.
fn is_url(location: &str) -> bool {
    let lower = location.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Base URL against which listing entries are resolved.
fn url_base(location: &str) -> String {
    if location.ends_with('/') {
        return location.to_string();
    }
    let last = location.rsplit('/').next().unwrap_or("");
    if last.contains('.') {
        // Points at an index file: use its directory
        location[..location.len() - last.len()].to_string()
    } else {
        format!("{}/", location)
    }
}

/// Extract the `href` targets of all anchors, in document order.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    href_pattern()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// Turn a listing page into items.
///
/// `make_source` maps an image file name to where its bytes live.
/// Duplicate names keep their first occurrence.
pub fn parse_listing(html: &str, make_source: impl Fn(&str) -> ItemSource) -> Vec<Item> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for href in extract_hrefs(html) {
        let name = href.rsplit('/').next().unwrap_or(&href);
        if !is_image_filename(name) {
            continue;
        }
        if !seen.insert(name.to_string()) {
            log::debug!("Skipping duplicate listing entry '{}'", name);
            continue;
        }
        items.push(Item::whole(name, make_source(name)));
    }

    items
}

/// Load a listing from a URL or a saved HTML file.
pub fn load_listing(location: &str) -> Result<Vec<Item>, LoadError> {
    if is_url(location) {
        let html = reqwest::blocking::get(location)?
            .error_for_status()?
            .text()?;
        let base = url_base(location);
        return Ok(parse_listing(&html, |name| ItemSource::Url {
            url: format!("{}{}", base, name),
        }));
    }

    let path = Path::new(location);
    let html = std::fs::read_to_string(path)?;
    let dir = std::fs::canonicalize(path)?
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| LoadError::InvalidSource(format!("listing {:?} has no parent", path)))?;

    Ok(parse_listing(&html, |name| ItemSource::Path {
        path: dir.join(name),
    }))
}
