//! HTTP handlers for the `/images` routes.
//! Parses requests, delegates to `StorageService`, and renders JSON bodies.

use crate::{
    errors::AppError,
    models::{
        image::{DeleteResponse, ListResponse, UploadResponse},
        object::UploadFile,
    },
    services::storage_service::{GatewayError, StorageService},
};
use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "image";

/// Query params accepted by `DELETE /images`.
#[derive(Debug, Deserialize)]
pub struct DeleteImageQuery {
    pub key: Option<String>,
}

/// `POST /images`: store the multipart `image` field under a fresh key.
pub async fn upload_image(
    State(service): State<StorageService>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    // Not a multipart body at all: same outcome as a form without the file.
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("upload without multipart body: {}", rejection);
        AppError::from(GatewayError::MissingFile)
    })?;

    let file = read_upload_field(&mut multipart)
        .await
        .map_err(multipart_error)?
        .ok_or(GatewayError::MissingFile)?;

    let stored = service.create(file).await?;
    Ok(Json(UploadResponse::success(&stored)))
}

/// `GET /images`: list every image in the bucket.
pub async fn list_images(
    State(service): State<StorageService>,
) -> Result<Json<ListResponse>, AppError> {
    let images = service.list().await?;
    Ok(Json(ListResponse::success(images)))
}

/// `DELETE /images?key=`: delete one object by storage key.
pub async fn delete_image(
    State(service): State<StorageService>,
    Query(q): Query<DeleteImageQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let key = service.delete(q.key.as_deref()).await?;
    Ok(Json(DeleteResponse::success(&key)))
}

/// `GET /objects/{*key}`: serve stored bytes with their content type.
pub async fn get_object(
    State(service): State<StorageService>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let object = service.fetch(&key).await?;
    Ok(([(header::CONTENT_TYPE, object.content_type)], object.body))
}

/// Pull the first `image` field out of the form, skipping anything else.
///
/// An `image` field without a file name is a plain form value (or an empty
/// file input), not a file.
async fn read_upload_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            tracing::debug!("`{}` field carries no file", UPLOAD_FIELD);
            return Ok(None);
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(Some(UploadFile::new(file_name, content_type, bytes)));
    }
    Ok(None)
}

fn multipart_error(err: MultipartError) -> AppError {
    let status = err.status();
    tracing::warn!("failed to read upload body: {}", err.body_text());
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(status, "File too large")
    } else {
        AppError::bad_request("Malformed upload")
    }
}
