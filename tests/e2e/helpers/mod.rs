use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod fixtures;
pub mod mock_tts;

use api_client::TestClient;
use bookcast_backend::controllers::{
    document::DocumentController, job::JobController, tts::TtsController,
};
use bookcast_backend::domain::audio::AudioAssembler;
use bookcast_backend::domain::document::DocumentService;
use bookcast_backend::domain::filter::ContentFilter;
use bookcast_backend::domain::job::ConversionService;
use bookcast_backend::domain::tts::TtsManager;
use bookcast_backend::infrastructure::config::{Config, Environment, FilterConfig, LogFormat};
use bookcast_backend::infrastructure::http::build_router;
use bookcast_backend::infrastructure::store::JobStore;
use mock_tts::MockTtsRepository;

pub struct TestContext {
    pub client: TestClient,
    pub config: Arc<Config>,
    // Removed on drop, taking uploads and output with it
    _work_dir: tempfile::TempDir,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let work_dir = tempfile::tempdir()?;
        let upload_dir = work_dir.path().join("uploads");
        let output_dir = work_dir.path().join("output");
        std::fs::create_dir_all(&upload_dir)?;
        std::fs::create_dir_all(&output_dir)?;

        let config = Arc::new(Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Assigned by the OS
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            output_dir: output_dir.to_string_lossy().into_owned(),
            max_upload_bytes: 10 * 1024 * 1024,
            default_tts_provider: "mock".to_string(),
            openai_api_key: None,
            openai_model: "tts-1".to_string(),
            openai_voice: "alloy".to_string(),
            aws_region: "us-east-1".to_string(),
            polly_voice: "Joanna".to_string(),
            tts_cache_enabled: false, // Disable cache in tests to avoid test pollution
            max_chunk_size: 4000,
            chapter_pause_seconds: 0.1,
            filter: FilterConfig::default(),
        });

        let mut tts_manager = TtsManager::new(false);
        tts_manager.add_provider(Arc::new(MockTtsRepository::new()));
        let tts_manager = Arc::new(tts_manager);

        let store = Arc::new(JobStore::new());
        let document_service = Arc::new(DocumentService::new());
        let content_filter = Arc::new(ContentFilter::new(config.filter.clone()));
        let audio_assembler = Arc::new(AudioAssembler::new());

        let conversion_service = Arc::new(ConversionService::new(
            store.clone(),
            document_service.clone(),
            content_filter,
            tts_manager.clone(),
            audio_assembler,
            PathBuf::from(&config.output_dir),
            config.max_chunk_size,
            config.chapter_pause_seconds,
        ));

        let document_controller = Arc::new(DocumentController::new(
            document_service,
            store.clone(),
            config.clone(),
        ));
        let job_controller = Arc::new(JobController::new(conversion_service));
        let tts_controller = Arc::new(TtsController::new(tts_manager.clone()));

        let app = build_router(
            config.clone(),
            tts_manager,
            document_controller,
            job_controller,
            tts_controller,
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            client: TestClient::new(&format!("http://{}", addr)),
            config,
            _work_dir: work_dir,
        })
    }

    /// Upload a PDF and return the assigned job id
    pub async fn upload_pdf(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let response = self.client.post_pdf("/api/upload", filename, bytes).await?;
        response.assert_status(hyper::StatusCode::CREATED);
        let job_id = response
            .body
            .as_ref()
            .and_then(|b| b.get("job_id"))
            .and_then(|v| v.as_str())
            .expect("upload response missing job_id")
            .to_string();
        Ok(job_id)
    }

    /// Poll the status endpoint until the job reaches a terminal state
    pub async fn wait_for_terminal(&self, job_id: &str) -> Result<serde_json::Value> {
        for _ in 0..600 {
            let response = self.client.get(&format!("/api/status/{}", job_id)).await?;
            response.assert_status(hyper::StatusCode::OK);
            let body = response.body.clone().expect("status body");
            let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("");
            if matches!(status, "completed" | "failed" | "cancelled") {
                return Ok(body);
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }
        anyhow::bail!("job {} never reached a terminal state", job_id)
    }
}
