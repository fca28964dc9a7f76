// src/error.rs

//! Error taxonomy shared by every library operation.
//!
//! The variants say *what* went wrong, never which HTTP status to send; the
//! mapping to responses lives in `handlers::types`.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The path tried to climb out of the media root or was malformed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A directory or file is missing, or the playback target is absent
    /// from its own folder listing.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("filesystem error: {0}")]
    Filesystem(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;

impl From<io::Error> for LibraryError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                LibraryError::NotFound(err.to_string())
            }
            io::ErrorKind::PermissionDenied => LibraryError::PermissionDenied(err.to_string()),
            _ => LibraryError::Filesystem(err),
        }
    }
}
