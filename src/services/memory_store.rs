//! In-memory object store.
//!
//! Non-persistent; keys are kept ordered so listings come back sorted the way
//! S3 returns them. Used for local development (`--backend memory`) and tests.

use super::object_store::{ObjectStore, StorageError, StorageResult};
use crate::models::object::{ObjectBody, ObjectSummary};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
struct MemoryObject {
    body: Bytes,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Process-local bucket. Cloning shares the same contents.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<String, MemoryObject>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently held.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let obj = MemoryObject {
            body,
            content_type: content_type.to_string(),
            last_modified: Utc::now(),
        };
        self.objects.write().await.insert(key.to_string(), obj);
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<ObjectSummary>> {
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .map(|(key, obj)| ObjectSummary {
                key: key.clone(),
                size: obj.body.len() as i64,
                last_modified: obj.last_modified,
            })
            .collect())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<ObjectBody>> {
        Ok(self.objects.read().await.get(key).map(|obj| ObjectBody {
            body: obj.body.clone(),
            content_type: obj.content_type.clone(),
        }))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn probe(&self) -> StorageResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
