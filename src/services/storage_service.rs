//! src/services/storage_service.rs
//!
//! StorageService: the gateway operations (create, list, delete, fetch) on
//! top of an injected `ObjectStore`. Stateless apart from the shared store
//! handle and the public URL scheme; nothing about the bucket is cached here.

use super::object_store::{ObjectStore, StorageError};
use crate::models::{
    image::ImageEntry,
    object::{ObjectBody, PublicUrl, StoredObject, UploadFile, generate_key, is_image_key},
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Failure of one gateway operation.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no file provided")]
    MissingFile,
    #[error("image key is required")]
    MissingKey,
    #[error("upload of `{key}` failed")]
    Upload {
        key: String,
        #[source]
        source: StorageError,
    },
    #[error("no object stored under `{0}`")]
    NotFound(String),
    #[error("listing the bucket failed")]
    List(#[source] StorageError),
    #[error("reading `{key}` failed")]
    Fetch {
        key: String,
        #[source]
        source: StorageError,
    },
    #[error("delete of `{key}` failed")]
    Delete {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl GatewayError {
    /// True for errors caused by the request itself rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingFile | GatewayError::MissingKey | GatewayError::NotFound(_)
        )
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// StorageService provides the image operations:
/// - Create: store an uploaded file under a fresh `<uuid>.<ext>` key
/// - List: enumerate the bucket, keeping image files only
/// - Delete: remove a key (absent keys are not an error)
#[derive(Clone)]
pub struct StorageService {
    /// Shared object store handle, constructed once at startup.
    pub store: Arc<dyn ObjectStore>,

    /// How public URLs are derived from keys.
    pub urls: PublicUrl,
}

impl StorageService {
    pub fn new(store: Arc<dyn ObjectStore>, urls: PublicUrl) -> Self {
        Self { store, urls }
    }

    /// Store `file` under a newly generated key.
    ///
    /// Every call produces a distinct key, so uploading the same file twice
    /// yields two objects.
    pub async fn create(&self, file: UploadFile) -> GatewayResult<StoredObject> {
        let key = generate_key(&file.file_name);
        let content_type = file.content_type_or_default().to_string();
        let size = file.len() as i64;

        debug!(
            key = %key,
            original = %file.file_name,
            content_type = %content_type,
            size,
            "storing upload"
        );

        self.store
            .put(&key, &content_type, file.bytes)
            .await
            .map_err(|source| GatewayError::Upload {
                key: key.clone(),
                source,
            })?;

        info!(key = %key, size, "image uploaded");

        Ok(StoredObject {
            url: self.urls.for_key(&key),
            key,
            size,
            last_modified: Utc::now(),
        })
    }

    /// List every image in the bucket. An empty bucket yields an empty list.
    pub async fn list(&self) -> GatewayResult<Vec<ImageEntry>> {
        let objects = self.store.list().await.map_err(GatewayError::List)?;
        let total = objects.len();

        let images: Vec<ImageEntry> = objects
            .into_iter()
            .filter(|obj| is_image_key(&obj.key))
            .map(|obj| {
                ImageEntry::from(StoredObject {
                    url: self.urls.for_key(&obj.key),
                    key: obj.key,
                    size: obj.size,
                    last_modified: obj.last_modified,
                })
            })
            .collect();

        debug!(total, images = images.len(), "listed bucket");
        Ok(images)
    }

    /// Delete `key`. Missing or blank keys are rejected before any backend
    /// call; keys that do not exist in the bucket still succeed.
    pub async fn delete(&self, key: Option<&str>) -> GatewayResult<String> {
        let key = key
            .filter(|k| !k.trim().is_empty())
            .ok_or(GatewayError::MissingKey)?;

        self.store
            .delete(key)
            .await
            .map_err(|source| GatewayError::Delete {
                key: key.to_string(),
                source,
            })?;

        info!(key, "image deleted");
        Ok(key.to_string())
    }

    /// Read one object back for serving. Backs the `/objects` URLs handed out
    /// when no external public base URL is configured.
    pub async fn fetch(&self, key: &str) -> GatewayResult<ObjectBody> {
        if key.trim().is_empty() {
            return Err(GatewayError::MissingKey);
        }

        self.store
            .get(key)
            .await
            .map_err(|source| GatewayError::Fetch {
                key: key.to_string(),
                source,
            })?
            .ok_or_else(|| GatewayError::NotFound(key.to_string()))
    }

    /// Readiness check against the backend.
    pub async fn probe(&self) -> Result<(), StorageError> {
        self.store.probe().await
    }
}
