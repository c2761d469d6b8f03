use crate::services::storage_service::GatewayError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::{error::Error as _, fmt};

/// A lightweight wrapper for general errors that keeps the message local.
///
/// Only `message` ever reaches the client; provider details stay in the logs.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        if err.is_client_error() {
            tracing::debug!("rejected request: {}", err);
        } else {
            match err.source() {
                Some(source) => tracing::error!("{}: {}", err, source),
                None => tracing::error!("{}", err),
            }
        }

        match err {
            GatewayError::MissingFile => AppError::bad_request("No file provided"),
            GatewayError::MissingKey => AppError::bad_request("Image key is required"),
            GatewayError::Upload { .. } => AppError::internal("File upload failed"),
            GatewayError::NotFound(_) => AppError::new(StatusCode::NOT_FOUND, "Image not found"),
            GatewayError::List(_) => AppError::internal("Failed to fetch images"),
            GatewayError::Fetch { .. } => AppError::internal("Failed to read image"),
            GatewayError::Delete { .. } => AppError::internal("Failed to delete image"),
        }
    }
}
