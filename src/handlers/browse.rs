// src/handlers/browse.rs

//! Folder browsing endpoints.

use actix_web::{web, HttpResponse};
use log::info;

use crate::error::LibraryError;
use crate::handlers::types::BrowseView;
use crate::state::AppState;

/// Handles `GET /api/folder`
///
/// # Returns
/// * `Ok(HttpResponse)` - JSON view of the media root
/// * `Err(LibraryError)` - the root could not be listed
pub async fn browse_root(state: web::Data<AppState>) -> Result<HttpResponse, LibraryError> {
    browse(&state, "")
}

/// Handles `GET /api/folder/{path}`
///
/// # Arguments
/// * `state` - Shared application state
/// * `path` - Folder path relative to the media root
///
/// # Returns
/// * `Ok(HttpResponse)` - JSON view with entries, parent and breadcrumbs
/// * `Err(LibraryError)` - 400 for paths leaving the root, 404 for missing folders
pub async fn browse_folder(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, LibraryError> {
    browse(&state, &path.into_inner())
}

fn browse(state: &AppState, raw_path: &str) -> Result<HttpResponse, LibraryError> {
    let library = &state.library;
    let folder = library.resolve(raw_path)?;
    let entries = library.list(&folder)?;
    info!("Listing {} ({} entries)", folder.display_path(), entries.len());

    let view = BrowseView::new(&folder, entries, library.breadcrumbs(&folder));
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(view))
}
