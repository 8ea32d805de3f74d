use async_trait::async_trait;
use bookcast_backend::infrastructure::repositories::{TtsRepository, VoiceInfo};
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-process TTS provider: emits a valid MPEG frame header followed by
/// a marker so tests can verify real bytes flowed through the pipeline.
pub struct MockTtsRepository {
    calls: AtomicUsize,
}

impl MockTtsRepository {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsRepository for MockTtsRepository {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn available_voices(&self) -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("narrator", "Neutral test narrator"),
            VoiceInfo::new("dramatic", "Dramatic test narrator"),
        ]
    }

    fn default_voice(&self) -> String {
        "narrator".to_string()
    }

    async fn synthesize(&self, text: &str, voice: &str, _speed: f32) -> Result<Vec<u8>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut audio = vec![0xFF, 0xFB, 0x90, 0xC0];
        audio.extend_from_slice(voice.as_bytes());
        audio.extend_from_slice(&(text.len() as u32).to_be_bytes());
        Ok(audio)
    }
}
