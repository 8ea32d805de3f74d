use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::job::{
        ConversionService, ConvertRequest, ConvertResponse, JobStatusResponse, JobSummary,
    },
    error::AppResult,
};

pub struct JobController {
    conversion_service: Arc<ConversionService>,
}

impl JobController {
    pub fn new(conversion_service: Arc<ConversionService>) -> Self {
        Self { conversion_service }
    }

    /// POST /api/convert - Start converting an uploaded document
    pub async fn convert(
        State(controller): State<Arc<JobController>>,
        Json(request): Json<ConvertRequest>,
    ) -> AppResult<(StatusCode, Json<ConvertResponse>)> {
        controller
            .conversion_service
            .start(request.job_id, request.settings)
            .await?;

        Ok((
            StatusCode::ACCEPTED,
            Json(ConvertResponse {
                message: "Conversion started".to_string(),
                job_id: request.job_id,
            }),
        ))
    }

    /// GET /api/status/{jobId} - Progress of a single job
    pub async fn status(
        State(controller): State<Arc<JobController>>,
        Path(job_id): Path<Uuid>,
    ) -> AppResult<Json<JobStatusResponse>> {
        let job = controller.conversion_service.status(job_id).await?;
        Ok(Json(job.into()))
    }

    /// GET /api/jobs - All known jobs, newest first
    pub async fn list(
        State(controller): State<Arc<JobController>>,
    ) -> AppResult<Json<Vec<JobSummary>>> {
        let jobs = controller.conversion_service.list().await;
        Ok(Json(jobs.into_iter().map(Into::into).collect()))
    }

    /// DELETE /api/jobs/{jobId} - Cancel a pending or running job
    pub async fn cancel(
        State(controller): State<Arc<JobController>>,
        Path(job_id): Path<Uuid>,
    ) -> AppResult<Json<serde_json::Value>> {
        controller.conversion_service.cancel(job_id).await?;
        Ok(Json(serde_json::json!({ "message": "Job cancelled" })))
    }

    /// GET /api/download/{jobId} - Stream the finished MP3
    pub async fn download(
        State(controller): State<Arc<JobController>>,
        Path(job_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let (path, name) = controller.conversion_service.download(job_id).await?;
        let audio = tokio::fs::read(&path).await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "audio/mpeg".parse().unwrap());
        let disposition = format!("attachment; filename=\"{}\"", name.replace('"', "_"));
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"audiobook.mp3\"")),
        );

        tracing::info!(job_id = %job_id, bytes = audio.len(), "Audiobook downloaded");

        Ok((StatusCode::OK, headers, Body::from(audio)))
    }
}
