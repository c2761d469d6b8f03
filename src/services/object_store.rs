//! Backend trait for the bucket that holds the images.
//!
//! The gateway only ever talks to an `ObjectStore`; which provider sits behind
//! it (S3, in-memory) is decided once at startup and injected.

use crate::models::object::{ObjectBody, ObjectSummary};
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Any failure reported by the storage provider or its transport.
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("invalid object key `{0}`")]
    InvalidKey(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage operations the gateway needs.
///
/// Implementations must be thread-safe; one instance is shared by every
/// request handler.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store `body` under `key` with the given content type and exact length.
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> StorageResult<()>;

    /// Enumerate every object in the bucket.
    async fn list(&self) -> StorageResult<Vec<ObjectSummary>>;

    /// Read `key` back. `Ok(None)` when no such object exists.
    async fn get(&self, key: &str) -> StorageResult<Option<ObjectBody>>;

    /// Remove `key`. Removing a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Cheap reachability check used by the readiness probe.
    async fn probe(&self) -> StorageResult<()>;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;
}
