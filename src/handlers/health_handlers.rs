//! Liveness and readiness probes.
//!
//! - GET /healthz  -> process is up, no I/O
//! - GET /readyz   -> object store answers a probe request

use crate::services::storage_service::StorageService;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;

/// `GET /healthz`
pub async fn healthz() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// `GET /readyz`
///
/// Probes the object store (a `HeadBucket` for S3). 200 when the backend
/// answers, 503 otherwise. Provider error text is logged, not returned.
pub async fn readyz(State(service): State<StorageService>) -> impl IntoResponse {
    let backend = service.store.name();
    let storage = match service.probe().await {
        Ok(()) => CheckStatus {
            ok: true,
            backend,
            error: None,
        },
        Err(e) => {
            tracing::warn!(backend, "readiness probe failed: {}", e);
            CheckStatus {
                ok: false,
                backend,
                error: Some("storage backend unreachable"),
            }
        }
    };

    let (status, label) = if storage.ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "error")
    };

    let body = ReadyResponse {
        status: label,
        checks: HashMap::from([("storage", storage)]),
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    backend: &'static str,
    error: Option<&'static str>,
}
