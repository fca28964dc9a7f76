// src/library/path_resolver.rs

//! Confinement of client-supplied paths to the media root.
//!
//! Every request path (browse, play, stream, upload) goes through
//! [`PathResolver::resolve`] before it touches the disk. Separators are
//! canonicalised to `/` first, then the path is normalised component by
//! component; climbing above the root is rejected rather than clamped.

use std::path::{Component, Path, PathBuf};

use crate::error::{LibraryError, Result};

/// A relative path that stayed inside the media root after normalisation.
///
/// Only [`PathResolver`] constructs these, so holding one means the
/// traversal check already ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    /// Normalised, `/`-separated, empty for the root.
    relative: String,
    absolute: PathBuf,
}

impl ValidatedPath {
    /// Normalised relative path, `""` for the media root itself.
    pub fn as_str(&self) -> &str {
        &self.relative
    }

    /// Relative path as shown to clients: the root is `/`.
    pub fn display_path(&self) -> &str {
        if self.is_root() {
            "/"
        } else {
            &self.relative
        }
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }

    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        Some(self.relative.rsplit('/').next().unwrap_or(&self.relative))
    }

    /// The containing folder, or `None` for the root.
    pub fn parent(&self) -> Option<ValidatedPath> {
        if self.is_root() {
            return None;
        }
        let relative = match self.relative.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };
        let absolute = self.absolute.parent()?.to_path_buf();
        Some(ValidatedPath { relative, absolute })
    }

    /// Appends one already-sanitised segment.
    pub(crate) fn child(&self, segment: &str) -> ValidatedPath {
        let relative = if self.is_root() {
            segment.to_string()
        } else {
            format!("{}/{}", self.relative, segment)
        };
        ValidatedPath {
            relative,
            absolute: self.absolute.join(segment),
        }
    }
}

/// Maps relative request paths onto the configured media root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates `raw` and joins it onto the media root.
    ///
    /// Empty, `/` and `.` inputs resolve to the root. Fails with
    /// [`LibraryError::InvalidPath`] when the normalised path would start with
    /// a `..` segment.
    pub fn resolve(&self, raw: &str) -> Result<ValidatedPath> {
        let segments = normalize(raw)?;
        let absolute = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        Ok(ValidatedPath {
            relative: segments.join("/"),
            absolute,
        })
    }
}

fn normalize(raw: &str) -> Result<Vec<String>> {
    if raw.contains('\0') {
        return Err(LibraryError::InvalidPath(format!("{:?} contains a NUL byte", raw)));
    }

    let canonical = raw.replace('\\', "/");
    let mut segments: Vec<String> = Vec::new();

    for component in Path::new(&canonical).components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::ParentDir => {
                if segments.pop().is_none() {
                    return Err(LibraryError::InvalidPath(format!(
                        "{} escapes the media root",
                        raw
                    )));
                }
            }
            // A leading slash means "from the media root", not the host root.
            Component::RootDir | Component::CurDir => {}
            Component::Prefix(_) => {
                return Err(LibraryError::InvalidPath(format!(
                    "{} carries a host path prefix",
                    raw
                )));
            }
        }
    }

    Ok(segments)
}
