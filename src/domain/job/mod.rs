pub mod error;
pub mod model;
pub mod service;

pub use error::JobServiceError;
pub use model::{ConversionSettings, Job, JobStatus};
pub use service::ConversionService;

use crate::domain::audio::ChapterMarker;
use crate::domain::document::DocumentMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response for POST /api/upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub job_id: Uuid,
    pub filename: String,
    pub metadata: DocumentMetadata,
}

/// Request for POST /api/convert
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub job_id: Uuid,
    #[serde(default)]
    pub settings: ConversionSettings,
}

/// Response for POST /api/convert
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub message: String,
    pub job_id: Uuid,
}

/// Response for GET /api/status/{jobId}
#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: f32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub output_available: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub chapters: Vec<ChapterMarker>,
}

/// Entry for GET /api/jobs
#[derive(Debug, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: Uuid,
    pub filename: String,
    pub status: JobStatus,
    pub progress: f32,
    pub created_at: DateTime<Utc>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            progress: job.progress,
            message: job.message,
            error: job.error,
            output_available: job.output_path.is_some(),
            chapters: job.chapters,
        }
    }
}

impl From<Job> for JobSummary {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            filename: job.filename,
            status: job.status,
            progress: job.progress,
            created_at: job.created_at,
        }
    }
}
