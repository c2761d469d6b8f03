//! JSON bodies exchanged between the gateway and the dashboard client.

use super::object::StoredObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One image as reported by `GET /images`.
///
/// `id` is the storage key, so it stays stable across listings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub id: String,
    pub name: String,
    pub size: i64,
    pub url: String,
    pub last_modified: DateTime<Utc>,
}

impl From<StoredObject> for ImageEntry {
    fn from(obj: StoredObject) -> Self {
        Self {
            id: obj.key.clone(),
            name: obj.key,
            size: obj.size,
            url: obj.url,
            last_modified: obj.last_modified,
        }
    }
}

/// Response of `POST /images`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: String,
    pub name: String,
    pub url: String,
}

/// Response of `GET /images`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ListResponse {
    pub status: String,
    pub data: Vec<ImageEntry>,
    pub results: usize,
}

/// Response of `DELETE /images?key=`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeleteResponse {
    pub status: String,
    pub message: String,
}

/// Error body shared by every failing route.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

const SUCCESS: &str = "success";

impl UploadResponse {
    pub fn success(obj: &StoredObject) -> Self {
        Self {
            status: SUCCESS.into(),
            name: obj.key.clone(),
            url: obj.url.clone(),
        }
    }
}

impl ListResponse {
    pub fn success(data: Vec<ImageEntry>) -> Self {
        Self {
            status: SUCCESS.into(),
            results: data.len(),
            data,
        }
    }
}

impl DeleteResponse {
    pub fn success(key: &str) -> Self {
        Self {
            status: SUCCESS.into(),
            message: format!("Image {} deleted", key),
        }
    }
}
