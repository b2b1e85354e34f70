//! Blob Store: immutable binary payloads keyed by a store-assigned id.
//!
//! There is no update-in-place. A changed file is a new blob plus deletion
//! of the old one.

use std::fmt;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Identifier assigned by the blob store when a payload is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct BlobId(Uuid);

impl BlobId {
    pub fn generate() -> Self {
        BlobId(Uuid::new_v4())
    }
}

impl From<Uuid> for BlobId {
    fn from(id: Uuid) -> Self {
        BlobId(id)
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob {0} not found")]
    NotFound(BlobId),

    #[error("blob backend failure: {0}")]
    Backend(String),
}

/// Payload handed to [`BlobStore::put`].
#[derive(Debug, Clone)]
pub struct NewBlob {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

/// A stored blob as returned by [`BlobStore::get`].
#[derive(Debug, Clone)]
pub struct Blob {
    pub id: BlobId,
    pub data: Bytes,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the payload under a fresh id. Either the whole blob is
    /// visible afterwards or nothing is.
    async fn put(&self, blob: NewBlob) -> Result<BlobId, BlobError>;

    async fn get(&self, id: BlobId) -> Result<Blob, BlobError>;

    /// Fails with [`BlobError::NotFound`] if the id is unknown.
    async fn delete(&self, id: BlobId) -> Result<(), BlobError>;
}

/// S3-compatible blob store (MinIO locally, S3 in production).
#[derive(Clone)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    const KEY_PREFIX: &'static str = "cv";
    const DEFAULT_CONTENT_TYPE: &'static str = "application/octet-stream";

    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Creates the bucket if it does not exist yet (fresh MinIO volumes).
    pub async fn ensure_bucket(&self) -> Result<(), BlobError> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
        {
            return Ok(());
        }

        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| BlobError::Backend(format!("S3 create bucket failed: {e}")))?;

        info!("Created bucket {}", self.bucket);
        Ok(())
    }

    fn key(&self, id: BlobId) -> String {
        format!("{}/{}", Self::KEY_PREFIX, id)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, blob: NewBlob) -> Result<BlobId, BlobError> {
        let id = BlobId::generate();
        let key = self.key(id);
        let size = blob.data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(blob.data))
            .content_type(&blob.content_type)
            .metadata("filename", header_safe(&blob.filename))
            .send()
            .await
            .map_err(|e| BlobError::Backend(format!("S3 upload failed: {e}")))?;

        debug!("Stored {size} bytes at s3://{}/{}", self.bucket, key);
        Ok(id)
    }

    async fn get(&self, id: BlobId) -> Result<Blob, BlobError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.key(id))
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_no_such_key() {
                    BlobError::NotFound(id)
                } else {
                    BlobError::Backend(format!("S3 download failed: {err}"))
                }
            })?;

        let content_type = output
            .content_type()
            .unwrap_or(Self::DEFAULT_CONTENT_TYPE)
            .to_string();
        let created_at = output
            .last_modified()
            .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
            .unwrap_or_else(Utc::now);
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| BlobError::Backend(format!("S3 body read failed: {e}")))?
            .into_bytes();

        Ok(Blob {
            id,
            data,
            content_type,
            created_at,
        })
    }

    async fn delete(&self, id: BlobId) -> Result<(), BlobError> {
        let key = self.key(id);

        // DeleteObject succeeds on missing keys, so probe first.
        self.client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_not_found() {
                    BlobError::NotFound(id)
                } else {
                    BlobError::Backend(format!("S3 head failed: {err}"))
                }
            })?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| BlobError::Backend(format!("S3 delete failed: {e}")))?;

        debug!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// S3 user metadata travels as HTTP headers, so keep it to printable ASCII.
fn header_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect()
}
