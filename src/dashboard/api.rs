//! Client side of the gateway's HTTP surface.

use crate::{
    handlers::image_handlers::UPLOAD_FIELD,
    models::{
        image::{DeleteResponse, ErrorResponse, ImageEntry, ListResponse, UploadResponse},
        object::UploadFile,
    },
};
use async_trait::async_trait;
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use std::time::Duration;
use thiserror::Error;

/// Per-request deadline for gateway calls, including upload bodies.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connectivity, timeout, body).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// The three gateway operations the dashboard drives.
#[async_trait]
pub trait GatewayApi: Send + Sync + 'static {
    async fn list_images(&self) -> ClientResult<Vec<ImageEntry>>;
    async fn upload_image(&self, file: &UploadFile) -> ClientResult<UploadResponse>;
    async fn delete_image(&self, key: &str) -> ClientResult<DeleteResponse>;
}

/// `GatewayApi` over HTTP with `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// `base_url` is the gateway origin, e.g. `http://localhost:3000`.
    /// Requests give up after [`REQUEST_TIMEOUT`].
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn images_url(&self) -> String {
        format!("{}/images", self.base_url)
    }
}

/// Turn a non-2xx response into `ClientError::Status`, keeping the gateway's
/// `error` message when the body has one.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl GatewayApi for HttpGateway {
    async fn list_images(&self) -> ClientResult<Vec<ImageEntry>> {
        let response = self.client.get(self.images_url()).send().await?;
        let body: ListResponse = check(response).await?.json().await?;
        Ok(body.data)
    }

    async fn upload_image(&self, file: &UploadFile) -> ClientResult<UploadResponse> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(file.content_type_or_default())
            .map_err(|e| ClientError::InvalidUpload(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.images_url())
            .multipart(form)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete_image(&self, key: &str) -> ClientResult<DeleteResponse> {
        let response = self
            .client
            .delete(self.images_url())
            .query(&[("key", key)])
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}
