// src/library/playlist.rs

//! Sibling playlists for the player view.
//!
//! The playlist is the file subset of the parent folder's listing, in
//! listing order. That order drives auto-advance, so it must match what the
//! browser shows.

use log::debug;

use crate::error::{LibraryError, Result};
use crate::library::directory_browser::{self, Entry};
use crate::library::path_resolver::ValidatedPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    items: Vec<Entry>,
    playing: usize,
}

impl Playlist {
    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    pub fn playing(&self) -> &Entry {
        &self.items[self.playing]
    }

    pub fn playing_index(&self) -> usize {
        self.playing
    }

    /// The item auto-advance moves to once the current one ends.
    pub fn next(&self) -> Option<&Entry> {
        self.items.get(self.playing + 1)
    }

    pub fn previous(&self) -> Option<&Entry> {
        self.playing.checked_sub(1).and_then(|i| self.items.get(i))
    }
}

/// Builds the playlist containing `target`.
///
/// Fails with [`LibraryError::NotFound`] when the target is not a file in
/// its own folder listing (deleted meanwhile, a directory, hidden, or the
/// root itself). Listing errors on the parent are returned unchanged.
pub fn build(target: &ValidatedPath) -> Result<Playlist> {
    let parent = target.parent().ok_or_else(|| {
        LibraryError::NotFound("the media root is not a playable file".to_string())
    })?;

    let items: Vec<Entry> = directory_browser::list(&parent)?
        .into_entries()
        .into_iter()
        .filter(|entry| !entry.is_directory)
        .collect();

    let playing = items
        .iter()
        .position(|entry| entry.relative_path == target.as_str())
        .ok_or_else(|| {
            LibraryError::NotFound(format!(
                "{} is not a playable file in its folder",
                target.display_path()
            ))
        })?;

    debug!(
        "Playlist for {}: {} items, playing #{}",
        target.display_path(),
        items.len(),
        playing
    );

    Ok(Playlist { items, playing })
}
