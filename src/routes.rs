// src/routes.rs

//! Route configuration for the media server.

use std::path::Path;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{http::header, middleware::from_fn, web};

use crate::handlers::{auth, browse, index, player, upload, video};

/// Configures all routes for the web server.
///
/// # Routes
/// - `/login` - login page (GET) and credential check (POST)
/// - `/logout` - clears the session cookie
/// - `/static/*` - static assets, served without a session
/// - everything below sits behind the session gate:
///   - `/` - index page
///   - `/api/folder/{path}` - folder listing with breadcrumbs
///   - `/api/player/{path}` - playing item and sibling playlist
///   - `/stream/{path}` - range-capable media delivery
///   - `/upload` - multipart upload into a folder
///
/// # Arguments
/// * `cfg` - Service configuration to add routes to
/// * `static_dir` - directory holding `index.html`, `login.html` and assets
pub fn setup_routes(cfg: &mut web::ServiceConfig, static_dir: &Path) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(auth::login_page))
            .route(web::post().to(auth::login)),
    )
    .route("/logout", web::post().to(auth::logout))
    .service(
        Files::new("/static", static_dir)
            .use_last_modified(true)
            .prefer_utf8(true),
    )
    // The empty scope matches everything, so it has to come last.
    .service(
        web::scope("")
            .wrap(from_fn(auth::require_session))
            .route("/", web::get().to(index::handle_index))
            .route("/api/folder", web::get().to(browse::browse_root))
            .route("/api/folder/{path:.*}", web::get().to(browse::browse_folder))
            .route("/api/player/{path:.*}", web::get().to(player::handle_player))
            .route("/stream/{path:.*}", web::get().to(video::handle_stream))
            .route("/upload", web::post().to(upload::handle_upload)),
    );
}

/// Lets the configured front-end origin call the API with cookies.
pub fn cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
}
