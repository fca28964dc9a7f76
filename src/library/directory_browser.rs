// src/library/directory_browser.rs

//! One-level directory listings for the browser and player views.

use std::fs;

use log::{debug, warn};
use serde::Serialize;

use crate::error::{LibraryError, Result};
use crate::library::path_resolver::ValidatedPath;

const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

/// One visible child of a listed directory.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "isDir")]
    pub is_directory: bool,
    /// Whole megabytes, truncated. Always zero for directories.
    #[serde(rename = "size_mb", skip_serializing_if = "is_zero")]
    pub size_mb: u64,
    /// `/`-separated path from the media root.
    #[serde(rename = "path")]
    pub relative_path: String,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Directories first, then case-insensitive by name.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Listing {
    entries: Vec<Entry>,
}

impl Listing {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Non-directory entries, in listing order.
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| !entry.is_directory)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads the immediate children of `dir`.
///
/// Dot-prefixed names are left out of the listing but stay reachable by
/// direct path. An entry whose metadata cannot be read is still listed, with
/// a size of zero.
pub fn list(dir: &ValidatedPath) -> Result<Listing> {
    let target = dir.absolute();
    let metadata = fs::metadata(target)?;
    if !metadata.is_dir() {
        return Err(LibraryError::NotFound(format!(
            "{} is not a directory",
            dir.display_path()
        )));
    }

    let mut entries = Vec::new();
    for dir_entry in fs::read_dir(target)? {
        let dir_entry = dir_entry?;
        let file_name = dir_entry.file_name();
        let Some(name) = file_name.to_str() else {
            warn!(
                "Skipping non UTF-8 entry in {}: {:?}",
                dir.display_path(),
                file_name
            );
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        // Follows symlinks; falls back to the dirent type for dangling ones.
        let (is_directory, size_bytes) = match fs::metadata(dir_entry.path()) {
            Ok(meta) => (meta.is_dir(), if meta.is_dir() { 0 } else { meta.len() }),
            Err(e) => {
                debug!("No metadata for {}: {}", dir_entry.path().display(), e);
                let is_dir = dir_entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                (is_dir, 0)
            }
        };

        let relative_path = if dir.is_root() {
            name.to_string()
        } else {
            format!("{}/{}", dir.as_str(), name)
        };

        entries.push(Entry {
            name: name.to_string(),
            is_directory,
            size_mb: size_bytes / BYTES_PER_MEGABYTE,
            relative_path,
        });
    }

    // Stable: names equal ignoring case keep their read_dir order.
    entries.sort_by_cached_key(|entry| (!entry.is_directory, entry.name.to_lowercase()));

    Ok(Listing { entries })
}
