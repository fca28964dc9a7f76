// src/handlers/index.rs

//! Index page handler module
//!
//! The browser UI is a static page that talks to the JSON endpoints in
//! `browse` and `player`.

use actix_files::NamedFile;
use actix_web::{web, Result};
use log::info;

use crate::state::AppState;

/// Serves `index.html` from the configured static directory.
///
/// # Returns
/// * `Ok(NamedFile)` - the index page
/// * `Err(Error)` - the page is missing from the static directory
pub async fn handle_index(state: web::Data<AppState>) -> Result<NamedFile> {
    info!("Serving static index page");
    Ok(NamedFile::open_async(state.static_dir.join("index.html")).await?)
}
