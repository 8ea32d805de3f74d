pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{
    controllers::{
        document::DocumentController, health, job::JobController, tts::TtsController,
    },
    domain::tts::TtsManager,
    infrastructure::config::Config,
};

/// Headroom over the upload limit for multipart boundaries and part
/// headers, so a file of exactly `max_upload_bytes` still gets through
/// the body limit and the handler's own size check decides.
const UPLOAD_FRAMING_SLACK: usize = 64 * 1024;

/// Assemble the full application router.
///
/// Shared with the end-to-end tests, which mount it on an ephemeral port.
pub fn build_router(
    config: Arc<Config>,
    tts_manager: Arc<TtsManager>,
    document_controller: Arc<DocumentController>,
    job_controller: Arc<JobController>,
    tts_controller: Arc<TtsController>,
) -> Router {
    // Upload route carries its own body limit; everything else keeps the default
    let upload_routes = Router::new()
        .route("/api/upload", post(DocumentController::upload))
        .with_state(document_controller)
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes + UPLOAD_FRAMING_SLACK,
        ));

    let job_routes = Router::new()
        .route("/api/convert", post(JobController::convert))
        .route("/api/status/:jobId", get(JobController::status))
        .route("/api/jobs", get(JobController::list))
        .route("/api/jobs/:jobId", delete(JobController::cancel))
        .route("/api/download/:jobId", get(JobController::download))
        .with_state(job_controller);

    let service_routes = Router::new()
        .route("/api/services", get(TtsController::services))
        .with_state(tts_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state((tts_manager, config))
        .merge(upload_routes)
        .merge(job_routes)
        .merge(service_routes)
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_manager: Arc<TtsManager>,
    document_controller: Arc<DocumentController>,
    job_controller: Arc<JobController>,
    tts_controller: Arc<TtsController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    let app = build_router(
        config,
        tts_manager,
        document_controller,
        job_controller,
        tts_controller,
    );

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
