use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    domain::{
        document::DocumentService,
        job::{Job, UploadResponse},
    },
    error::{AppError, AppResult},
    infrastructure::{config::Config, store::JobStore},
};

pub struct DocumentController {
    document_service: Arc<DocumentService>,
    store: Arc<JobStore>,
    config: Arc<Config>,
}

impl DocumentController {
    pub fn new(
        document_service: Arc<DocumentService>,
        store: Arc<JobStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            document_service,
            store,
            config,
        }
    }

    /// POST /api/upload - Accept a PDF and register a job for it
    pub async fn upload(
        State(controller): State<Arc<DocumentController>>,
        mut multipart: Multipart,
    ) -> AppResult<(StatusCode, Json<UploadResponse>)> {
        let mut file: Option<(String, axum::body::Bytes)> = None;

        while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
            if field.name() != Some("file") {
                continue;
            }

            let filename = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::BadRequest("File field has no filename".to_string()))?;

            let bytes = field.bytes().await.map_err(map_multipart_error)?;

            file = Some((filename, bytes));
            break;
        }

        let (filename, bytes) =
            file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".to_string()))?;

        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::UnsupportedMediaType(
                "Only PDF files are supported".to_string(),
            ));
        }

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        if bytes.len() > controller.config.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} byte upload limit",
                controller.config.max_upload_bytes
            )));
        }

        // Parsing doubles as validation: garbage never reaches the pipeline
        let service = controller.document_service.clone();
        let parse_bytes = bytes.clone();
        let metadata =
            tokio::task::spawn_blocking(move || service.read_metadata(&parse_bytes))
                .await
                .map_err(|e| AppError::Internal(format!("Validation task failed: {}", e)))?
                .map_err(|e| AppError::BadRequest(format!("Not a readable PDF: {}", e)))?;

        let mut job = Job::new(filename.clone(), Default::default(), metadata.clone());
        let stored_name = format!("{}_{}", job.id, sanitize_filename(&filename));
        let upload_path = std::path::Path::new(&controller.config.upload_dir).join(stored_name);

        tokio::fs::write(&upload_path, &bytes).await?;
        job.upload_path = upload_path;

        tracing::info!(
            job_id = %job.id,
            filename = %filename,
            size = bytes.len(),
            title = %metadata.title,
            "PDF uploaded"
        );

        let response = UploadResponse {
            job_id: job.id,
            filename,
            metadata,
        };
        controller.store.insert(job).await;

        Ok((StatusCode::CREATED, Json(response)))
    }
}

/// Body-limit overruns surface as multipart read errors; keep their 413
fn map_multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File exceeds the upload size limit".to_string())
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", err))
    }
}

/// Strip path separators and shell-hostile characters from client filenames
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
