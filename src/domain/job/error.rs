use crate::domain::document::DocumentServiceError;
use crate::domain::tts::TtsServiceError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("job not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("job cancelled")]
    Cancelled,
    #[error("document error: {0}")]
    Document(#[from] DocumentServiceError),
    #[error("tts error: {0}")]
    Tts(#[from] TtsServiceError),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for JobServiceError {
    fn from(err: std::io::Error) -> Self {
        JobServiceError::Dependency(err.to_string())
    }
}

impl From<JobServiceError> for AppError {
    fn from(err: JobServiceError) -> Self {
        match err {
            JobServiceError::NotFound => AppError::NotFound("Job not found".to_string()),
            JobServiceError::Conflict(msg) => AppError::Conflict(msg),
            JobServiceError::Invalid(msg) => AppError::BadRequest(msg),
            JobServiceError::Cancelled => AppError::Conflict("Job was cancelled".to_string()),
            JobServiceError::Document(e) => AppError::from(e),
            JobServiceError::Tts(e) => AppError::from(e),
            JobServiceError::Dependency(msg) => AppError::Internal(msg),
            JobServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
