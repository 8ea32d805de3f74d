use super::rate_limiter::RateLimiter;
use super::tts_repository::{split_into_batches, TtsRepository, VoiceInfo};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;
/// Polly SynthesizeSpeech default quota
const REQUESTS_PER_MINUTE: usize = 100;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    default_voice: String,
    limiter: RateLimiter,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, default_voice: String) -> Self {
        Self {
            polly_client,
            default_voice,
            limiter: RateLimiter::per_minute(REQUESTS_PER_MINUTE),
        }
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<u8>, String> {
        self.limiter.acquire().await;

        let voice_id = VoiceId::from(voice);
        let engine = Engine::Neural;

        tracing::info!(
            voice = voice,
            engine = ?engine,
            speed = speed,
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        // Polly only expresses speaking rate through SSML prosody
        let mut request = self
            .polly_client
            .synthesize_speech()
            .voice_id(voice_id.clone())
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone());

        if (speed - 1.0).abs() > f32::EPSILON {
            let rate_percent = (speed * 100.0).round() as u32;
            request = request
                .text(format!(
                    "<speak><prosody rate=\"{}%\">{}</prosody></speak>",
                    rate_percent,
                    escape_ssml(text)
                ))
                .text_type(TextType::Ssml);
        } else {
            request = request.text(text).text_type(TextType::Text);
        }

        let result = request.send().await.map_err(|e| {
            tracing::error!(
                error = ?e,
                voice_id = ?voice_id,
                engine = ?engine,
                text_length = text.len(),
                "AWS Polly synthesize_speech failed"
            );
            format!("AWS Polly error: {:?}", e)
        })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

fn escape_ssml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    fn provider_name(&self) -> &'static str {
        "polly"
    }

    fn available_voices(&self) -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("Joanna", "US English, female, neural"),
            VoiceInfo::new("Matthew", "US English, male, neural"),
            VoiceInfo::new("Ivy", "US English, child, neural"),
            VoiceInfo::new("Amy", "British English, female, neural"),
            VoiceInfo::new("Brian", "British English, male, neural"),
            VoiceInfo::new("Emma", "British English, female, neural"),
        ]
    }

    fn default_voice(&self) -> String {
        self.default_voice.clone()
    }

    async fn synthesize(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = text.len(),
            "Text split into batches"
        );

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            tracing::debug!(batch_index = index, batch_size = batch.len(), "Synthesizing batch");
            let audio_data = self.call_polly(batch, voice, speed).await?;
            merged_audio.extend(audio_data);
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            voice = voice,
            latency_ms = duration.as_millis() as u64,
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }
}
