// src/handlers/video.rs

//! Video streaming handler module
//!
//! Serves media files from the library with byte-range support, so players
//! can seek without downloading the whole file. Range parsing, `206`
//! responses and conditional requests are handled by `actix_files::NamedFile`.

use actix_files::NamedFile;
use actix_web::{
    http::header::{self, ContentDisposition, DispositionType},
    web, Error, HttpRequest, HttpResponse,
};
use log::{error, info};

use crate::error::LibraryError;
use crate::library::path_resolver::ValidatedPath;
use crate::state::AppState;

/// Handles `GET /stream/{path}`
///
/// # Returns
/// * `Ok(HttpResponse)` - the file, streamed inline, honouring `Range`
/// * `Err(Error)` - 400 for paths leaving the media root, 404 for missing
///   files and directories
pub async fn handle_stream(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let target = state.library.resolve(&path.into_inner())?;
    info!("Serving video: {}", target.display_path());

    let named_file = open_video_file(&target).await?;
    Ok(create_video_response(named_file, &req))
}

/// Opens a regular file for streaming. Directories count as missing.
async fn open_video_file(target: &ValidatedPath) -> Result<NamedFile, LibraryError> {
    let metadata = tokio::fs::metadata(target.absolute()).await?;
    if !metadata.is_file() {
        return Err(LibraryError::NotFound(format!(
            "{} is not a file",
            target.display_path()
        )));
    }

    NamedFile::open_async(target.absolute()).await.map_err(|e| {
        error!("Failed to open file {}: {}", target.display_path(), e);
        LibraryError::from(e)
    })
}

/// Inline disposition so browsers play instead of download. Responses are
/// private and revalidated through the ETag / Last-Modified validators,
/// since uploads may replace a file under the same name.
fn create_video_response(file: NamedFile, req: &HttpRequest) -> HttpResponse {
    let mut response = file
        .use_last_modified(true)
        .use_etag(true)
        .prefer_utf8(true)
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![],
        })
        .into_response(req);

    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("private, no-cache"),
    );

    response
}
