//! CV lifecycle: replace-on-upload, delete, status and download over the
//! registry and blob store.
//!
//! The registry and the blob store share no transaction. Cleanup of old
//! blobs is best-effort: failures are logged and may leave orphan blobs,
//! but never surface to the caller.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::AdminIdentity;
use crate::cv::blob_store::{BlobError, BlobId, BlobStore, NewBlob};
use crate::cv::registry::{FileRecord, FileRegistry, CV_SLOT};
use crate::errors::AppError;

/// The only content type accepted for upload.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const DEFAULT_FILENAME: &str = "CV.pdf";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvMetadata {
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub size: i64,
    pub file_id: BlobId,
}

impl From<FileRecord> for CvMetadata {
    fn from(record: FileRecord) -> Self {
        CvMetadata {
            filename: record.filename,
            uploaded_at: record.uploaded_at,
            size: record.size_bytes,
            file_id: record.blob_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvStatus {
    pub exists: bool,
    pub cv: Option<CvMetadata>,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

/// Result of a successful upload. `cleanup` is the task removing the
/// replaced blob, if there was one; dropping it detaches the task.
#[derive(Debug)]
pub struct Uploaded {
    pub metadata: CvMetadata,
    pub cleanup: Option<JoinHandle<()>>,
}

#[derive(Debug, Clone)]
pub struct CvDownload {
    pub filename: String,
    pub data: Bytes,
}

#[derive(Clone)]
pub struct CvService {
    blobs: Arc<dyn BlobStore>,
    registry: Arc<dyn FileRegistry>,
    max_upload_bytes: usize,
}

impl CvService {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        registry: Arc<dyn FileRegistry>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            blobs,
            registry,
            max_upload_bytes,
        }
    }

    pub async fn status(&self) -> Result<CvStatus, AppError> {
        let cv = self.registry.find(CV_SLOT).await?.map(CvMetadata::from);
        Ok(CvStatus {
            exists: cv.is_some(),
            cv,
        })
    }

    pub async fn upload(
        &self,
        admin: &AdminIdentity,
        request: UploadRequest,
    ) -> Result<Uploaded, AppError> {
        validate_upload(&request, self.max_upload_bytes)?;

        let filename = match request.filename.trim() {
            "" => DEFAULT_FILENAME.to_string(),
            name => name.to_string(),
        };
        let size = request.data.len() as i64;

        let previous = self.registry.find(CV_SLOT).await?;

        let blob_id = self
            .blobs
            .put(NewBlob {
                data: request.data,
                filename: filename.clone(),
                content_type: PDF_CONTENT_TYPE.to_string(),
            })
            .await?;

        let record = FileRecord {
            slot: CV_SLOT.to_string(),
            blob_id,
            filename,
            size_bytes: size,
            uploaded_at: Utc::now(),
            uploaded_by: admin.username.clone(),
        };

        if let Err(e) = self.registry.upsert(&record).await {
            // Nothing references the new blob yet.
            if let Err(cleanup_err) = self.blobs.delete(blob_id).await {
                warn!("Failed to remove unregistered blob {blob_id}: {cleanup_err}");
            }
            return Err(e.into());
        }

        info!(
            "CV '{}' ({} bytes) uploaded by {} as blob {}",
            record.filename, size, admin.username, blob_id
        );

        let cleanup = previous
            .filter(|old| old.blob_id != blob_id)
            .map(|old| self.spawn_cleanup(old.blob_id));

        Ok(Uploaded {
            metadata: record.into(),
            cleanup,
        })
    }

    pub async fn delete(&self, admin: &AdminIdentity) -> Result<(), AppError> {
        let record = self
            .registry
            .find(CV_SLOT)
            .await?
            .ok_or_else(|| AppError::NotFound("No CV found to delete".to_string()))?;

        if let Err(e) = self.blobs.delete(record.blob_id).await {
            warn!("Failed to delete CV blob {}: {e}", record.blob_id);
        }

        if !self.registry.remove(CV_SLOT).await? {
            warn!("CV record vanished before removal; a concurrent delete won");
        }

        info!("CV '{}' deleted by {}", record.filename, admin.username);
        Ok(())
    }

    pub async fn download(&self) -> Result<CvDownload, AppError> {
        let record = self
            .registry
            .find(CV_SLOT)
            .await?
            .ok_or_else(|| AppError::NotFound("CV not found".to_string()))?;

        let blob = self.blobs.get(record.blob_id).await.map_err(|e| match e {
            BlobError::NotFound(id) => {
                warn!("CV record points at missing blob {id}");
                AppError::NotFound("CV file is missing from storage".to_string())
            }
            other => other.into(),
        })?;

        debug!(
            "Serving CV blob {} ({} bytes, stored {})",
            blob.id,
            blob.data.len(),
            blob.created_at
        );

        Ok(CvDownload {
            filename: record.filename,
            data: blob.data,
        })
    }

    fn spawn_cleanup(&self, old: BlobId) -> JoinHandle<()> {
        let blobs = Arc::clone(&self.blobs);
        tokio::spawn(async move {
            match blobs.delete(old).await {
                Ok(()) => info!("Removed replaced CV blob {old}"),
                Err(e) => warn!("Failed to remove replaced CV blob {old}, leaving orphan: {e}"),
            }
        })
    }
}

fn validate_upload(request: &UploadRequest, max_bytes: usize) -> Result<(), AppError> {
    if !is_pdf(&request.content_type) {
        return Err(AppError::Validation(
            "Only PDF files are allowed".to_string(),
        ));
    }
    if request.data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if request.data.len() > max_bytes {
        return Err(too_large(max_bytes));
    }
    Ok(())
}

pub fn too_large(max_bytes: usize) -> AppError {
    AppError::PayloadTooLarge(format!("CV files are limited to {max_bytes} bytes"))
}

/// Matches `application/pdf`, ignoring case and any parameters.
fn is_pdf(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}
