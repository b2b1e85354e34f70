//! In-memory blob store and registry used by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::cv::blob_store::{Blob, BlobError, BlobId, BlobStore, NewBlob};
use crate::cv::registry::{FileRecord, FileRegistry};

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<BlobId, Blob>>,
}

impl MemoryBlobStore {
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn contains(&self, id: BlobId) -> bool {
        self.blobs.read().await.contains_key(&id)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, blob: NewBlob) -> Result<BlobId, BlobError> {
        let id = BlobId::generate();
        self.blobs.write().await.insert(
            id,
            Blob {
                id,
                data: blob.data,
                content_type: blob.content_type,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: BlobId) -> Result<Blob, BlobError> {
        self.blobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BlobError::NotFound(id))
    }

    async fn delete(&self, id: BlobId) -> Result<(), BlobError> {
        self.blobs
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(BlobError::NotFound(id))
    }
}

/// Wraps a [`MemoryBlobStore`]; each operation can be switched to fail
/// with a backend error.
#[derive(Default)]
pub struct FaultyBlobStore {
    pub inner: MemoryBlobStore,
    pub fail_put: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl FaultyBlobStore {
    pub fn undeletable() -> Self {
        let store = Self::default();
        store.fail_delete.store(true, Ordering::SeqCst);
        store
    }
}

fn backend_failure(flag: &AtomicBool, op: &str) -> Result<(), BlobError> {
    if flag.load(Ordering::SeqCst) {
        return Err(BlobError::Backend(format!("{op} rejected")));
    }
    Ok(())
}

#[async_trait]
impl BlobStore for FaultyBlobStore {
    async fn put(&self, blob: NewBlob) -> Result<BlobId, BlobError> {
        backend_failure(&self.fail_put, "put")?;
        self.inner.put(blob).await
    }

    async fn get(&self, id: BlobId) -> Result<Blob, BlobError> {
        backend_failure(&self.fail_get, "get")?;
        self.inner.get(id).await
    }

    async fn delete(&self, id: BlobId) -> Result<(), BlobError> {
        backend_failure(&self.fail_delete, "delete")?;
        self.inner.delete(id).await
    }
}

#[derive(Default)]
pub struct MemoryFileRegistry {
    records: RwLock<HashMap<String, FileRecord>>,
}

impl MemoryFileRegistry {
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl FileRegistry for MemoryFileRegistry {
    async fn find(&self, slot: &str) -> Result<Option<FileRecord>, sqlx::Error> {
        Ok(self.records.read().await.get(slot).cloned())
    }

    async fn upsert(&self, record: &FileRecord) -> Result<(), sqlx::Error> {
        self.records
            .write()
            .await
            .insert(record.slot.clone(), record.clone());
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<bool, sqlx::Error> {
        Ok(self.records.write().await.remove(slot).is_some())
    }
}

/// Registry whose upserts always fail; reads and removes pass through.
#[derive(Default)]
pub struct UnwritableFileRegistry {
    pub inner: MemoryFileRegistry,
}

#[async_trait]
impl FileRegistry for UnwritableFileRegistry {
    async fn find(&self, slot: &str) -> Result<Option<FileRecord>, sqlx::Error> {
        self.inner.find(slot).await
    }

    async fn upsert(&self, _record: &FileRecord) -> Result<(), sqlx::Error> {
        Err(sqlx::Error::Protocol("upsert rejected".to_string()))
    }

    async fn remove(&self, slot: &str) -> Result<bool, sqlx::Error> {
        self.inner.remove(slot).await
    }
}
