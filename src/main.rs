use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookcast_backend::controllers::{
    document::DocumentController, job::JobController, tts::TtsController,
};
use bookcast_backend::domain::audio::AudioAssembler;
use bookcast_backend::domain::document::DocumentService;
use bookcast_backend::domain::filter::ContentFilter;
use bookcast_backend::domain::job::ConversionService;
use bookcast_backend::domain::tts::TtsManager;
use bookcast_backend::infrastructure::config::{Config, LogFormat};
use bookcast_backend::infrastructure::http::start_http_server;
use bookcast_backend::infrastructure::repositories::{OpenAiTtsRepository, PollyTtsRepository};
use bookcast_backend::infrastructure::store::JobStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Bookcast Backend on {}:{}",
        config.host,
        config.port
    );

    // Working directories for uploads and finished audiobooks
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tokio::fs::create_dir_all(&config.output_dir).await?;

    // === TTS PROVIDERS ===
    let mut tts_manager = TtsManager::new(config.tts_cache_enabled);

    if let Some(api_key) = &config.openai_api_key {
        let openai_config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        let client = Arc::new(async_openai::Client::with_config(openai_config));
        tts_manager.add_provider(Arc::new(OpenAiTtsRepository::new(
            client,
            config.openai_model.clone(),
            config.openai_voice.clone(),
        )));
        tracing::info!(model = %config.openai_model, "OpenAI TTS provider registered");
    } else {
        tracing::warn!("OPENAI_API_KEY not set, OpenAI TTS provider disabled");
    }

    tracing::info!(region = %config.aws_region, "Initializing AWS Polly client");
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
    tts_manager.add_provider(Arc::new(PollyTtsRepository::new(
        polly_client,
        config.polly_voice.clone(),
    )));
    tracing::info!("AWS Polly TTS provider registered");

    if let Err(e) = tts_manager.set_default_provider(&config.default_tts_provider) {
        tracing::warn!(
            requested = %config.default_tts_provider,
            error = %e,
            "Configured default TTS provider unavailable, keeping first registered"
        );
    }

    let config = Arc::new(config);
    let tts_manager = Arc::new(tts_manager);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Shared job store and domain services
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

    // 2. Controllers
    let document_controller = Arc::new(DocumentController::new(
        document_service,
        store.clone(),
        config.clone(),
    ));
    let job_controller = Arc::new(JobController::new(conversion_service));
    let tts_controller = Arc::new(TtsController::new(tts_manager.clone()));

    // Start HTTP server with all routes
    start_http_server(
        config,
        tts_manager,
        document_controller,
        job_controller,
        tts_controller,
    )
    .await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "bookcast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "bookcast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
