use super::error::JobServiceError;
use super::model::{ConversionSettings, Job, JobStatus};
use crate::domain::audio::{AudioAssembler, AudioChunk, AudioMetadata};
use crate::domain::document::DocumentService;
use crate::domain::filter::ContentFilter;
use crate::domain::tts::{TtsManager, TtsServiceError};
use crate::infrastructure::store::JobStore;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const MAX_RUN_ATTEMPTS: u32 = 3;
const MAX_CHUNK_ATTEMPTS: u32 = 3;

const MIN_SPEED: f32 = 0.5;
const MAX_SPEED: f32 = 2.0;

/// Drives uploaded documents through the conversion pipeline:
/// extract, filter, chapterize, synthesize, assemble, export.
///
/// Conversions run in spawned tasks and report progress through the
/// shared [`JobStore`]; handlers never block on a running pipeline.
pub struct ConversionService {
    store: Arc<JobStore>,
    documents: Arc<DocumentService>,
    filter: Arc<ContentFilter>,
    tts: Arc<TtsManager>,
    assembler: Arc<AudioAssembler>,
    output_dir: PathBuf,
    max_chunk_size: usize,
    chapter_pause_seconds: f32,
}

impl ConversionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<JobStore>,
        documents: Arc<DocumentService>,
        filter: Arc<ContentFilter>,
        tts: Arc<TtsManager>,
        assembler: Arc<AudioAssembler>,
        output_dir: PathBuf,
        max_chunk_size: usize,
        chapter_pause_seconds: f32,
    ) -> Self {
        Self {
            store,
            documents,
            filter,
            tts,
            assembler,
            output_dir,
            max_chunk_size,
            chapter_pause_seconds,
        }
    }

    /// Validate the request, mark the job as processing and spawn the
    /// pipeline. Returns as soon as the job is queued.
    pub async fn start(
        self: &Arc<Self>,
        job_id: Uuid,
        settings: ConversionSettings,
    ) -> Result<(), JobServiceError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&settings.speed) {
            return Err(JobServiceError::Invalid(format!(
                "Speed must be between {} and {}",
                MIN_SPEED, MAX_SPEED
            )));
        }

        if let Some(provider) = settings.provider.as_deref() {
            let known = self.tts.catalog().iter().any(|s| s.name == provider);
            if !known {
                return Err(JobServiceError::Invalid(format!(
                    "Unknown TTS provider: {}",
                    provider
                )));
            }
        }

        // Status check and transition happen under one lock so two
        // concurrent starts cannot both observe an idle job
        self.store
            .try_update(job_id, |job| {
                match job.status {
                    JobStatus::Uploaded | JobStatus::Failed => {}
                    JobStatus::Processing => {
                        return Err(JobServiceError::Conflict(
                            "Job is already being processed".to_string(),
                        ))
                    }
                    JobStatus::Completed => {
                        return Err(JobServiceError::Conflict(
                            "Job has already completed".to_string(),
                        ))
                    }
                    JobStatus::Cancelled => {
                        return Err(JobServiceError::Conflict("Job was cancelled".to_string()))
                    }
                }

                job.settings = Some(settings);
                job.status = JobStatus::Processing;
                job.progress = 0.0;
                job.message = "Queued".to_string();
                job.error = None;
                Ok(())
            })
            .await
            .ok_or(JobServiceError::NotFound)??;

        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.run(job_id).await;
        });

        Ok(())
    }

    pub async fn status(&self, job_id: Uuid) -> Result<Job, JobServiceError> {
        self.store.get(job_id).await.ok_or(JobServiceError::NotFound)
    }

    pub async fn list(&self) -> Vec<Job> {
        self.store.list().await
    }

    /// Cancelling is idempotent; finished jobs cannot be cancelled
    pub async fn cancel(&self, job_id: Uuid) -> Result<(), JobServiceError> {
        let job = self.store.get(job_id).await.ok_or(JobServiceError::NotFound)?;

        match job.status {
            JobStatus::Cancelled => Ok(()),
            JobStatus::Completed | JobStatus::Failed => Err(JobServiceError::Conflict(
                "Job has already finished".to_string(),
            )),
            _ => {
                self.store
                    .update(job_id, |job| {
                        job.status = JobStatus::Cancelled;
                        job.message = "Cancelled by user".to_string();
                        job.completed_at = Some(Utc::now());
                    })
                    .await;
                tracing::info!(job_id = %job_id, "Job cancelled");
                Ok(())
            }
        }
    }

    /// Path and download filename of the finished audiobook
    pub async fn download(&self, job_id: Uuid) -> Result<(PathBuf, String), JobServiceError> {
        let job = self.store.get(job_id).await.ok_or(JobServiceError::NotFound)?;

        if job.status != JobStatus::Completed {
            return Err(JobServiceError::Invalid(
                "Conversion has not finished yet".to_string(),
            ));
        }

        let path = job
            .output_path
            .clone()
            .ok_or_else(|| JobServiceError::Dependency("Output file is missing".to_string()))?;
        if !path.exists() {
            return Err(JobServiceError::NotFound);
        }

        Ok((path, job.download_name()))
    }

    /// Run the pipeline, retrying transient failures with a linear backoff
    async fn run(self: Arc<Self>, job_id: Uuid) {
        for attempt in 1..=MAX_RUN_ATTEMPTS {
            match self.run_pipeline(job_id).await {
                Ok(()) => return,
                Err(JobServiceError::Cancelled) => {
                    tracing::info!(job_id = %job_id, "Pipeline stopped: job cancelled");
                    return;
                }
                Err(err) if attempt < MAX_RUN_ATTEMPTS && is_retryable(&err) => {
                    tracing::warn!(
                        job_id = %job_id,
                        attempt = attempt,
                        error = %err,
                        "Conversion attempt failed, retrying"
                    );
                    self.note_retry(job_id, attempt).await;
                    tokio::time::sleep(Duration::from_secs(5 * attempt as u64)).await;
                }
                Err(err) => {
                    tracing::error!(job_id = %job_id, error = %err, "Conversion failed");
                    self.store
                        .update(job_id, |job| {
                            job.status = JobStatus::Failed;
                            job.message = "Conversion failed".to_string();
                            job.error = Some(err.to_string());
                            job.completed_at = Some(Utc::now());
                        })
                        .await;
                    return;
                }
            }
        }
    }

    /// The pipeline restarts from extraction, so progress goes back to zero
    async fn note_retry(&self, job_id: Uuid, attempt: u32) {
        self.store
            .update(job_id, |job| {
                job.progress = 0.0;
                job.message = format!("Retrying after error (attempt {})", attempt + 1);
            })
            .await;
    }

    async fn run_pipeline(&self, job_id: Uuid) -> Result<(), JobServiceError> {
        let job = self.store.get(job_id).await.ok_or(JobServiceError::NotFound)?;
        let settings = job.settings.clone().unwrap_or_default();

        self.report(job_id, 5.0, "Extracting text from PDF").await?;
        let documents = Arc::clone(&self.documents);
        let upload_path = job.upload_path.clone();
        let pages = tokio::task::spawn_blocking(move || documents.extract_pages(&upload_path))
            .await
            .map_err(|e| JobServiceError::Dependency(format!("Extraction task failed: {}", e)))??;
        tracing::info!(job_id = %job_id, pages = pages.len(), "Text extracted");

        self.report(job_id, 20.0, "Filtering non-narratable content").await?;
        let pages = self.filter.filter_pages(pages);
        if pages.is_empty() {
            return Err(JobServiceError::Invalid(
                "No narratable content found in document".to_string(),
            ));
        }

        self.report(job_id, 30.0, "Detecting chapters").await?;
        let sections = self.documents.detect_chapters(&pages);
        let sections = self.filter.filter_sections(sections);
        if sections.is_empty() {
            return Err(JobServiceError::Invalid(
                "All sections were filtered out".to_string(),
            ));
        }

        let mut plan: Vec<(String, String)> = Vec::new();
        for section in &sections {
            for chunk in self.documents.chunk_text(&section.content, self.max_chunk_size) {
                plan.push((chunk, section.title.clone()));
            }
        }
        if plan.is_empty() {
            return Err(JobServiceError::Invalid(
                "Document contains no synthesizable text".to_string(),
            ));
        }
        tracing::info!(
            job_id = %job_id,
            sections = sections.len(),
            chunks = plan.len(),
            "Conversion plan ready"
        );

        let total = plan.len();
        let mut audio_chunks = Vec::with_capacity(total);
        for (i, (text, chapter)) in plan.into_iter().enumerate() {
            let pct = 40.0 + 45.0 * i as f32 / total as f32;
            self.report(
                job_id,
                pct,
                &format!("Synthesizing speech ({}/{})", i + 1, total),
            )
            .await?;

            let audio = self.synthesize_with_retry(&settings, &text).await?;
            audio_chunks.push(AudioChunk {
                audio,
                text,
                chapter: Some(chapter),
            });
        }

        self.report(job_id, 90.0, "Assembling audio").await?;
        let combined = self.assembler.combine(&audio_chunks, self.chapter_pause_seconds);
        let chapters = self.assembler.chapter_markers(&audio_chunks);

        self.report(job_id, 95.0, "Writing MP3").await?;
        let output_path = self.output_dir.join(format!("{}.mp3", job_id));
        let mut metadata = AudioMetadata::audiobook(&job.metadata.title, &job.metadata.author);
        if metadata.title == "Unknown Title" {
            metadata.title = job.download_name().trim_end_matches(".mp3").to_string();
        }

        let assembler = Arc::clone(&self.assembler);
        let export_path = output_path.clone();
        tokio::task::spawn_blocking(move || assembler.export(&combined, &export_path, &metadata))
            .await
            .map_err(|e| JobServiceError::Dependency(format!("Export task failed: {}", e)))??;

        self.store
            .update(job_id, |job| {
                job.status = JobStatus::Completed;
                job.progress = 100.0;
                job.message = "Conversion complete".to_string();
                job.output_path = Some(output_path.clone());
                job.chapters = chapters.clone();
                job.completed_at = Some(Utc::now());
            })
            .await;
        tracing::info!(job_id = %job_id, "Conversion complete");

        Ok(())
    }

    /// Per-chunk synthesis with exponential backoff on transient errors
    async fn synthesize_with_retry(
        &self,
        settings: &ConversionSettings,
        text: &str,
    ) -> Result<Vec<u8>, JobServiceError> {
        let mut attempt = 1;
        loop {
            let result = self
                .tts
                .synthesize(
                    settings.provider.as_deref(),
                    settings.voice.as_deref(),
                    settings.speed,
                    text,
                )
                .await;

            match result {
                Ok(audio) => return Ok(audio),
                Err(err @ (TtsServiceError::Invalid(_) | TtsServiceError::UnknownProvider(_))) => {
                    return Err(err.into());
                }
                Err(err) if attempt < MAX_CHUNK_ATTEMPTS => {
                    let backoff = Duration::from_secs(1 << attempt);
                    tracing::warn!(
                        attempt = attempt,
                        backoff_secs = backoff.as_secs(),
                        error = %err,
                        "Chunk synthesis failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Record progress; errors out if the job was cancelled meanwhile
    async fn report(&self, job_id: Uuid, progress: f32, message: &str) -> Result<(), JobServiceError> {
        if self.store.is_cancelled(job_id).await {
            return Err(JobServiceError::Cancelled);
        }

        self.store
            .update(job_id, |job| {
                job.progress = progress;
                job.message = message.to_string();
            })
            .await
            .ok_or(JobServiceError::NotFound)?;

        tracing::debug!(job_id = %job_id, progress = progress, message = message, "Progress");
        Ok(())
    }
}

/// Validation failures will not pass on a re-run; everything else might
fn is_retryable(err: &JobServiceError) -> bool {
    !matches!(
        err,
        JobServiceError::Invalid(_)
            | JobServiceError::NotFound
            | JobServiceError::Conflict(_)
            | JobServiceError::Tts(TtsServiceError::Invalid(_))
            | JobServiceError::Tts(TtsServiceError::UnknownProvider(_))
            | JobServiceError::Document(_)
    )
}
