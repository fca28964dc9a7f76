// src/library/upload_guard.rs

//! Destination checks for uploads.
//!
//! The folder goes through the same resolver as every other request path.
//! The client's filename is cut down to its last segment separately, so a
//! name like `../../x` cannot reopen the traversal the folder check closed.

use std::fs;

use log::info;

use crate::error::{LibraryError, Result};
use crate::library::path_resolver::{PathResolver, ValidatedPath};

/// Validates `raw_folder` and creates it, with any missing ancestors.
pub fn prepare(resolver: &PathResolver, raw_folder: &str) -> Result<ValidatedPath> {
    let folder = resolver.resolve(raw_folder)?;
    if !folder.absolute().is_dir() {
        info!("Creating upload directory {}", folder.display_path());
    }
    fs::create_dir_all(folder.absolute())?;
    Ok(folder)
}

/// Keeps only the final segment of a client supplied filename.
pub fn safe_file_name(raw: &str) -> Result<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return Err(LibraryError::InvalidPath(format!(
            "{:?} is not a usable file name",
            raw
        )));
    }
    Ok(name.to_string())
}

/// The stored file's path inside a prepared folder.
pub fn destination(folder: &ValidatedPath, raw_file_name: &str) -> Result<ValidatedPath> {
    let name = safe_file_name(raw_file_name)?;
    Ok(folder.child(&name))
}
