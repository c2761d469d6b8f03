// Not every helper is used by every test binary.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, response::Response};
use bytes::Bytes;
use image_dashboard::{
    models::object::{ObjectBody, ObjectSummary, PublicUrl},
    routes::routes::app,
    services::{
        memory_store::MemoryObjectStore,
        object_store::{ObjectStore, StorageError, StorageResult},
        storage_service::StorageService,
    },
};
use std::sync::Arc;
use tower::ServiceExt;

pub const BASE_URL: &str = "https://test-bucket.s3.us-east-1.amazonaws.com";
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;
const BOUNDARY: &str = "----image-dashboard-test-boundary";

pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Router over an in-memory bucket the test can inspect directly.
pub struct TestContext {
    pub router: Router,
    pub store: MemoryObjectStore,
}

impl TestContext {
    pub fn new() -> Self {
        setup_test_env();
        let store = MemoryObjectStore::new();
        let service = StorageService::new(
            Arc::new(store.clone()),
            PublicUrl::Base(BASE_URL.to_string()),
        );
        Self {
            router: app(service, MAX_UPLOAD_BYTES),
            store,
        }
    }

    /// Put objects straight into the bucket, bypassing the gateway.
    pub async fn seed(&self, keys: &[&str]) {
        for key in keys {
            self.store
                .put(key, "image/png", Bytes::from_static(b"seed"))
                .await
                .expect("seed object");
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .method("GET")
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .method("DELETE")
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    pub async fn upload(&self, field: &str, file_name: &str, bytes: &[u8]) -> Response {
        self.send(multipart_request(field, file_name, "image/png", bytes))
            .await
    }
}

/// Router over a store whose every call fails.
pub fn failing_router() -> Router {
    setup_test_env();
    let service = StorageService::new(
        Arc::new(FailingStore),
        PublicUrl::Base(BASE_URL.to_string()),
    );
    app(service, MAX_UPLOAD_BYTES)
}

/// Router over a fresh memory store with links built from `urls`.
pub fn router_with_urls(urls: PublicUrl) -> Router {
    setup_test_env();
    let service = StorageService::new(Arc::new(MemoryObjectStore::new()), urls);
    app(service, MAX_UPLOAD_BYTES)
}

pub struct FailingStore;

impl FailingStore {
    fn err() -> StorageError {
        StorageError::Backend("AccessDenied: bucket policy rejected request".into())
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put(&self, _key: &str, _content_type: &str, _body: Bytes) -> StorageResult<()> {
        Err(Self::err())
    }

    async fn list(&self) -> StorageResult<Vec<ObjectSummary>> {
        Err(Self::err())
    }

    async fn get(&self, _key: &str) -> StorageResult<Option<ObjectBody>> {
        Err(Self::err())
    }

    async fn delete(&self, _key: &str) -> StorageResult<()> {
        Err(Self::err())
    }

    async fn probe(&self) -> StorageResult<()> {
        Err(Self::err())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// `POST /images` with a single file part named `field`.
pub fn multipart_request(
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .uri("/images")
        .method("POST")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request")
}

/// `POST /images` with a single part that has no `filename`, i.e. a plain
/// form value.
pub fn multipart_text_request(field: &str, value: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{b}--\r\n",
        b = BOUNDARY,
    );

    Request::builder()
        .uri("/images")
        .method("POST")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request")
}

pub async fn read_body_bytes(response: Response) -> Bytes {
    use http_body_util::BodyExt;

    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
}

pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = read_body_bytes(response).await;
    serde_json::from_slice(&body).expect("json body")
}
