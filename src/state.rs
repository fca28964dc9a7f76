// src/state.rs

use std::path::PathBuf;

use uuid::Uuid;

use crate::config::{Config, Credentials};
use crate::library::MediaLibrary;

/// Shared by every handler through `web::Data`. Immutable after startup.
pub struct AppState {
    pub library: MediaLibrary,
    pub static_dir: PathBuf,
    pub credentials: Credentials,
    /// Value the session cookie must carry. Fresh per process, so a restart
    /// logs everyone out.
    pub session_token: String,
    pub max_upload_bytes: u64,
}

impl AppState {
    pub fn new(library: MediaLibrary, config: &Config) -> Self {
        Self {
            library,
            static_dir: config.static_dir.clone(),
            credentials: config.credentials.clone(),
            session_token: Uuid::new_v4().to_string(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
