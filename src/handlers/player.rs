// src/handlers/player.rs

use actix_web::{web, HttpResponse};
use log::info;

use crate::error::LibraryError;
use crate::handlers::types::PlayerView;
use crate::state::AppState;

/// Handles `GET /api/player/{path}`: the playing item plus its sibling playlist.
///
/// # Arguments
/// * `state` - Shared application state
/// * `path` - File path relative to the media root
///
/// # Returns
/// * `Ok(HttpResponse)` - JSON view with the playlist and previous/next items
/// * `Err(LibraryError)` - 400 for an empty or escaping path, 404 when the
///   target is not a listed file
pub async fn handle_player(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, LibraryError> {
    let raw_path = path.into_inner();
    if raw_path.trim_matches('/').is_empty() {
        return Err(LibraryError::InvalidPath("no file path specified".to_string()));
    }

    let library = &state.library;
    let target = library.resolve(&raw_path)?;
    let playlist = library.playlist_for(&target)?;
    info!(
        "Playing {} ({} of {})",
        target.display_path(),
        playlist.playing_index() + 1,
        playlist.items().len()
    );

    // playlist_for refuses the root, so the target has a parent here.
    let folder = target.parent().unwrap_or_else(|| target.clone());
    let view = PlayerView::new(&folder, playlist, library.breadcrumbs(&folder));
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(view))
}
