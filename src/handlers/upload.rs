// src/handlers/upload.rs

//! Multipart uploads into library folders.
//!
//! The form carries a `path` field (target folder, relative to the media
//! root) and a `file` field, in either order. File bytes are staged in a
//! hidden `.upload-*.part` file inside the media root and renamed onto the
//! destination only once complete, so listings never show a half-written
//! upload. A destination on another filesystem gets a second staged copy
//! inside the folder itself. Dropping a staged file on any error deletes it.

use std::io;

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use futures::StreamExt;
use log::{error, info, warn};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::LibraryError;
use crate::library::path_resolver::ValidatedPath;
use crate::library::upload_guard;
use crate::state::AppState;

const MAX_FOLDER_FIELD_BYTES: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    #[error("could not get uploaded file")]
    MissingFile,

    #[error("malformed form field: {0}")]
    BadField(String),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Library(#[from] LibraryError),
}

impl From<io::Error> for UploadError {
    fn from(err: io::Error) -> Self {
        UploadError::Library(LibraryError::from(err))
    }
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::MissingFile | UploadError::BadField(_) => StatusCode::BAD_REQUEST,
            UploadError::Multipart(e) => e.status_code(),
            UploadError::Library(e) => e.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            UploadError::Library(e) => e.error_response(),
            _ => HttpResponse::build(self.status_code())
                .content_type("text/plain; charset=utf-8")
                .body(self.to_string()),
        }
    }
}

/// Bytes written so far, held until the destination folder is known.
struct StagedUpload {
    file: NamedTempFile,
    file_name: String,
    size: u64,
}

/// Handles `POST /upload`
///
/// # Arguments
/// * `state` - Shared application state
/// * `payload` - Multipart form with a `path` field and a `file` field
///
/// # Returns
/// * `Ok(HttpResponse)` - the file was stored in the target folder
/// * `Err(UploadError)` - 400 for bad fields or paths, 413 over the size limit
pub async fn handle_upload(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, UploadError> {
    let mut folder: Option<String> = None;
    let mut staged: Option<StagedUpload> = None;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("path") => folder = Some(read_text_field(&mut field).await?),
            Some("file") if staged.is_none() => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_owned)
                    .ok_or(UploadError::MissingFile)?;
                // Refuse unusable names before spending bandwidth on them.
                upload_guard::safe_file_name(&file_name)?;
                staged = Some(stage_upload(&state, &mut field, file_name).await?);
            }
            Some("file") => warn!("Ignoring additional file field in upload"),
            other => warn!("Ignoring unexpected upload field {:?}", other),
        }
    }

    let staged = staged.ok_or(UploadError::MissingFile)?;
    let folder = state
        .library
        .prepare_upload_destination(folder.as_deref().unwrap_or_default())?;
    let destination = upload_guard::destination(&folder, &staged.file_name)?;

    publish(staged.file, &folder, &destination).await?;

    info!(
        "Successfully uploaded {} ({} bytes) to {}",
        staged.file_name,
        staged.size,
        folder.display_path()
    );
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Upload successful"))
}

async fn read_text_field(field: &mut Field) -> Result<String, UploadError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > MAX_FOLDER_FIELD_BYTES {
            return Err(UploadError::BadField("folder path is too long".to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf).map_err(|_| UploadError::BadField("folder path is not UTF-8".to_string()))
}

async fn stage_upload(
    state: &AppState,
    field: &mut Field,
    file_name: String,
) -> Result<StagedUpload, UploadError> {
    let file = tempfile::Builder::new()
        .prefix(".upload-")
        .suffix(".part")
        .tempfile_in(state.library.root())?;
    let mut out = tokio::fs::File::from_std(file.reopen()?);

    let mut size: u64 = 0;
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        size += chunk.len() as u64;
        if size > state.max_upload_bytes {
            warn!("Rejecting upload of {}: over {} bytes", file_name, state.max_upload_bytes);
            return Err(UploadError::TooLarge {
                limit: state.max_upload_bytes,
            });
        }
        out.write_all(&chunk).await?;
    }
    out.flush().await?;

    Ok(StagedUpload {
        file,
        file_name,
        size,
    })
}

/// Moves the staged bytes onto `destination`.
///
/// # Arguments
/// * `staged` - the complete upload, staged in the media root
/// * `folder` - the prepared destination folder
/// * `destination` - the final file path inside `folder`
///
/// # Returns
/// * `Ok(())` - the file is in place
/// * `Err(UploadError)` - neither the rename nor the copy succeeded
async fn publish(
    staged: NamedTempFile,
    folder: &ValidatedPath,
    destination: &ValidatedPath,
) -> Result<(), UploadError> {
    let staged = match staged.persist(destination.absolute()) {
        Ok(_) => return Ok(()),
        Err(e) => {
            // Typically EXDEV: the folder is a mount point or a symlink to one.
            warn!(
                "Cannot rename upload into {} ({}), copying instead",
                folder.display_path(),
                e.error
            );
            e.file
        }
    };

    let local = tempfile::Builder::new()
        .prefix(".upload-")
        .suffix(".part")
        .tempfile_in(folder.absolute())
        .map_err(|e| {
            error!("Error staging upload in {}: {}", folder.display_path(), e);
            UploadError::from(e)
        })?;
    tokio::fs::copy(staged.path(), local.path()).await.map_err(|e| {
        error!("Error copying upload into {}: {}", folder.display_path(), e);
        UploadError::from(e)
    })?;

    local.persist(destination.absolute()).map_err(|e| {
        error!("Error storing upload {}: {}", destination.display_path(), e.error);
        UploadError::from(e.error)
    })?;
    Ok(())
}
