use crate::domain::audio::ChapterMarker;
use crate::domain::document::DocumentMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Uploaded,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// User-selected conversion parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            provider: None,
            voice: None,
            speed: 1.0,
        }
    }
}

/// A single PDF-to-audiobook conversion, from upload to download
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub filename: String,
    pub upload_path: PathBuf,
    pub metadata: DocumentMetadata,
    pub settings: Option<ConversionSettings>,
    pub status: JobStatus,
    pub progress: f32,
    pub message: String,
    pub error: Option<String>,
    pub output_path: Option<PathBuf>,
    pub chapters: Vec<ChapterMarker>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(filename: String, upload_path: PathBuf, metadata: DocumentMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            upload_path,
            metadata,
            settings: None,
            status: JobStatus::Uploaded,
            progress: 0.0,
            message: "Uploaded".to_string(),
            error: None,
            output_path: None,
            chapters: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Name offered to the browser for the finished audiobook
    pub fn download_name(&self) -> String {
        let stem = self
            .filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.filename);
        format!("{}.mp3", stem)
    }
}
