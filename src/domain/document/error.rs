use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum DocumentServiceError {
    #[error("invalid document: {0}")]
    Invalid(String),
    #[error("document has no extractable text")]
    Empty,
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<lopdf::Error> for DocumentServiceError {
    fn from(err: lopdf::Error) -> Self {
        DocumentServiceError::Invalid(err.to_string())
    }
}

impl From<DocumentServiceError> for AppError {
    fn from(err: DocumentServiceError) -> Self {
        match err {
            DocumentServiceError::Invalid(msg) => AppError::BadRequest(msg),
            DocumentServiceError::Empty => {
                AppError::BadRequest("Document has no extractable text".to_string())
            }
            DocumentServiceError::Dependency(msg) => AppError::Internal(msg),
            DocumentServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
