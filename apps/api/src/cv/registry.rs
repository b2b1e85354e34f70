//! Single-slot file registry: one metadata row per logical slot, pointing
//! at the blob that currently backs it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::cv::blob_store::BlobId;

/// The slot holding the downloadable CV.
pub const CV_SLOT: &str = "cv";

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FileRecord {
    pub slot: String,
    pub blob_id: BlobId,
    pub filename: String,
    pub size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

#[async_trait]
pub trait FileRegistry: Send + Sync {
    async fn find(&self, slot: &str) -> Result<Option<FileRecord>, sqlx::Error>;

    /// Creates or overwrites the record for `record.slot`. Last writer wins.
    async fn upsert(&self, record: &FileRecord) -> Result<(), sqlx::Error>;

    /// Returns whether a record was removed.
    async fn remove(&self, slot: &str) -> Result<bool, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgFileRegistry {
    pool: PgPool,
}

impl PgFileRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRegistry for PgFileRegistry {
    async fn find(&self, slot: &str) -> Result<Option<FileRecord>, sqlx::Error> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM file_records WHERE slot = $1")
            .bind(slot)
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert(&self, record: &FileRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO file_records (slot, blob_id, filename, size_bytes, uploaded_at, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (slot) DO UPDATE SET
                blob_id = EXCLUDED.blob_id,
                filename = EXCLUDED.filename,
                size_bytes = EXCLUDED.size_bytes,
                uploaded_at = EXCLUDED.uploaded_at,
                uploaded_by = EXCLUDED.uploaded_by
            "#,
        )
        .bind(&record.slot)
        .bind(record.blob_id)
        .bind(&record.filename)
        .bind(record.size_bytes)
        .bind(record.uploaded_at)
        .bind(&record.uploaded_by)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM file_records WHERE slot = $1")
            .bind(slot)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::memory::MemoryFileRegistry;

    fn record(filename: &str) -> FileRecord {
        FileRecord {
            slot: CV_SLOT.to_string(),
            blob_id: BlobId::generate(),
            filename: filename.to_string(),
            size_bytes: 42,
            uploaded_at: Utc::now(),
            uploaded_by: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_record_per_slot() {
        let registry = MemoryFileRegistry::default();
        registry.upsert(&record("first.pdf")).await.unwrap();
        let second = record("second.pdf");
        registry.upsert(&second).await.unwrap();

        assert_eq!(registry.find(CV_SLOT).await.unwrap(), Some(second));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_reports_whether_anything_was_there() {
        let registry = MemoryFileRegistry::default();
        assert!(!registry.remove(CV_SLOT).await.unwrap());

        registry.upsert(&record("cv.pdf")).await.unwrap();
        assert!(registry.remove(CV_SLOT).await.unwrap());
        assert!(registry.find(CV_SLOT).await.unwrap().is_none());
    }
}
