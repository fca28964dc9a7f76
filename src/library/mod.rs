// src/library/mod.rs

//! The media library: path confinement, listings, breadcrumbs, playlists
//! and upload destinations over one media root.
//!
//! Nothing here is cached. Every call reads the filesystem again, so the
//! library is cheap to share between workers and always reflects the disk.

pub mod breadcrumbs;
pub mod directory_browser;
pub mod path_resolver;
pub mod playlist;
pub mod upload_guard;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use breadcrumbs::Breadcrumb;
use directory_browser::Listing;
use path_resolver::{PathResolver, ValidatedPath};
use playlist::Playlist;

#[derive(Debug, Clone)]
pub struct MediaLibrary {
    resolver: PathResolver,
}

impl MediaLibrary {
    /// Wraps an existing absolute media root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            resolver: PathResolver::new(root),
        }
    }

    /// Creates `root` when missing and anchors the library at its canonical
    /// absolute path.
    pub fn open(root: &Path) -> std::io::Result<Self> {
        if !root.exists() {
            info!("Creating media directory: {}", root.display());
            fs::create_dir_all(root)?;
        }
        let root = fs::canonicalize(root)?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn resolve(&self, raw: &str) -> Result<ValidatedPath> {
        self.resolver.resolve(raw)
    }

    pub fn list(&self, dir: &ValidatedPath) -> Result<Listing> {
        directory_browser::list(dir)
    }

    pub fn breadcrumbs(&self, path: &ValidatedPath) -> Vec<Breadcrumb> {
        breadcrumbs::build(path.as_str())
    }

    pub fn playlist_for(&self, target: &ValidatedPath) -> Result<Playlist> {
        playlist::build(target)
    }

    pub fn prepare_upload_destination(&self, raw_folder: &str) -> Result<ValidatedPath> {
        upload_guard::prepare(&self.resolver, raw_folder)
    }
}
