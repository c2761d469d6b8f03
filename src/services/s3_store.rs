//! S3-backed object store.
//!
//! Holds one explicitly constructed `aws_sdk_s3::Client`, built at startup and
//! shared by every request.

use super::object_store::{ObjectStore, StorageError, StorageResult};
use crate::models::object::{ObjectBody, ObjectSummary};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, retry::RetryConfig, timeout::TimeoutConfig};
use aws_sdk_s3::{
    Client,
    error::{DisplayErrorContext, SdkError},
    operation::{
        delete_object::DeleteObjectError, get_object::GetObjectError,
        head_bucket::HeadBucketError, list_objects_v2::ListObjectsV2Error,
        put_object::PutObjectError,
    },
    primitives::{ByteStream, DateTime as SmithyDateTime},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info};

const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`S3ObjectStore::connect`].
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Address the bucket as `<endpoint>/<bucket>` instead of
    /// `<bucket>.<endpoint>`; needed by most S3-compatible providers.
    pub force_path_style: bool,
}

/// Object store backed by a single S3 bucket.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Wrap an already configured client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the standard AWS credential/endpoint chain.
    ///
    /// SDK retries are disabled: a failed call is reported to the caller,
    /// who decides whether to try again.
    pub async fn connect(settings: &S3Settings) -> Self {
        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(OPERATION_TIMEOUT)
            .build();

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeout_config)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(settings.force_path_style)
            .build();

        info!(
            bucket = %settings.bucket,
            region = %settings.region,
            path_style = settings.force_path_style,
            "Initialized S3 client"
        );

        Self::new(Client::from_conf(s3_config), settings.bucket.clone())
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> StorageResult<()> {
        let length = body.len() as i64;
        debug!(key, content_type, length, "PutObject");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .content_length(length)
            .body(ByteStream::from(body))
            .send()
            .await?;
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<ObjectSummary>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page?;
            for obj in page.contents() {
                let Some(key) = obj.key() else { continue };
                objects.push(ObjectSummary {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0),
                    last_modified: obj.last_modified().map(to_chrono).unwrap_or_default(),
                });
            }
        }

        debug!(count = objects.len(), "ListObjectsV2");
        Ok(objects)
    }

    async fn get(&self, key: &str) -> StorageResult<Option<ObjectBody>> {
        debug!(key, "GetObject");
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let content_type = output
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("GetObject body: {}", e)))?
            .into_bytes();

        Ok(Some(ObjectBody { body, content_type }))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        debug!(key, "DeleteObject");
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    async fn probe(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}

fn to_chrono(ts: &SmithyDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()).unwrap_or_default()
}

fn sdk_error<E, R>(op: &str, err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    StorageError::Backend(format!("{}: {}", op, DisplayErrorContext(&err)))
}

impl From<SdkError<PutObjectError>> for StorageError {
    fn from(err: SdkError<PutObjectError>) -> Self {
        sdk_error("PutObject", err)
    }
}

impl From<SdkError<ListObjectsV2Error>> for StorageError {
    fn from(err: SdkError<ListObjectsV2Error>) -> Self {
        sdk_error("ListObjectsV2", err)
    }
}

impl From<SdkError<GetObjectError>> for StorageError {
    fn from(err: SdkError<GetObjectError>) -> Self {
        sdk_error("GetObject", err)
    }
}

impl From<SdkError<DeleteObjectError>> for StorageError {
    fn from(err: SdkError<DeleteObjectError>) -> Self {
        sdk_error("DeleteObject", err)
    }
}

impl From<SdkError<HeadBucketError>> for StorageError {
    fn from(err: SdkError<HeadBucketError>) -> Self {
        sdk_error("HeadBucket", err)
    }
}
