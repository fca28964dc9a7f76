// src/handlers/types.rs

//! JSON view models and the HTTP mapping of library errors.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;

use crate::error::LibraryError;
use crate::library::breadcrumbs::Breadcrumb;
use crate::library::directory_browser::{Entry, Listing};
use crate::library::path_resolver::ValidatedPath;
use crate::library::playlist::Playlist;

/// Folder browser payload.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BrowseView {
    pub current_path: String,
    /// Absent at the media root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    pub entries: Listing,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl BrowseView {
    pub fn new(folder: &ValidatedPath, entries: Listing, breadcrumbs: Vec<Breadcrumb>) -> Self {
        Self {
            current_path: folder.display_path().to_string(),
            parent_path: folder.parent().map(|p| p.display_path().to_string()),
            entries,
            breadcrumbs,
        }
    }
}

/// Player payload. `current_path` is the folder holding the playing item.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub current_path: String,
    pub playing_item: Entry,
    pub playlist: Vec<Entry>,
    pub previous: Option<Entry>,
    pub next: Option<Entry>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl PlayerView {
    pub fn new(folder: &ValidatedPath, playlist: Playlist, breadcrumbs: Vec<Breadcrumb>) -> Self {
        Self {
            current_path: folder.display_path().to_string(),
            playing_item: playlist.playing().clone(),
            previous: playlist.previous().cloned(),
            next: playlist.next().cloned(),
            playlist: playlist.items().to_vec(),
            breadcrumbs,
        }
    }
}

impl ResponseError for LibraryError {
    fn status_code(&self) -> StatusCode {
        match self {
            LibraryError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
            LibraryError::PermissionDenied(_) | LibraryError::Filesystem(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Server-side failures are logged in full but not echoed to clients.
        let body = if status.is_server_error() {
            error!("Library failure: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .insert_header(("Cache-Control", "no-store"))
            .body(body)
    }
}
