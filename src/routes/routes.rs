//! Defines routes for the image gateway.
//!
//! ## Structure
//! - **Image endpoints**
//!   - `GET    /images`            list images in the bucket
//!   - `POST   /images`            upload one image (multipart field `image`)
//!   - `DELETE /images?key=<key>`  delete one image by storage key
//!
//! - **Object bodies**
//!   - `GET    /objects/{*key}`    raw bytes of one stored object
//!
//! - **Probes**
//!   - `GET /healthz`  liveness
//!   - `GET /readyz`   readiness (storage backend reachable)

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        image_handlers::{delete_image, get_object, list_images, upload_image},
    },
    services::storage_service::StorageService,
};
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::trace::TraceLayer;

/// Build and return the router for the gateway.
///
/// `max_upload_bytes` caps request bodies; multipart uploads above it are
/// rejected with 413.
pub fn routes(max_upload_bytes: usize) -> Router<StorageService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(
            "/images",
            get(list_images).post(upload_image).delete(delete_image),
        )
        .route("/objects/{*key}", get(get_object))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Router with state attached, ready to serve.
pub fn app(service: StorageService, max_upload_bytes: usize) -> Router {
    routes(max_upload_bytes).with_state(service)
}
