use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A voice offered by a TTS provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub description: String,
}

impl VoiceInfo {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly, OpenAI, ...).
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Throttling against provider rate limits
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Stable provider name used in job settings and the service catalog
    fn provider_name(&self) -> &'static str;

    /// Voices this provider offers
    fn available_voices(&self) -> Vec<VoiceInfo>;

    /// Voice used when the request does not name one
    fn default_voice(&self) -> String;

    /// Synthesize text to speech with the given voice and speed
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<u8>, String>;
}

/// Split text into provider-sized batches, preferring sentence boundaries.
/// A sentence longer than `max_batch` is split by characters.
pub(crate) fn split_into_batches(text: &str, max_batch: usize) -> Vec<String> {
    if text.len() <= max_batch {
        return vec![text.to_string()];
    }

    let boundary = regex::Regex::new(r"[.!?]+\s+").unwrap();

    // Sentence spans, each keeping its trailing boundary
    let mut pieces: Vec<&str> = Vec::new();
    let mut last = 0;
    for m in boundary.find_iter(text) {
        pieces.push(&text[last..m.end()]);
        last = m.end();
    }
    if last < text.len() {
        pieces.push(&text[last..]);
    }

    let mut batches: Vec<String> = Vec::new();
    let mut current = String::new();

    for piece in pieces {
        if piece.len() > max_batch {
            if !current.is_empty() {
                batches.push(std::mem::take(&mut current).trim().to_string());
            }
            let chars: Vec<char> = piece.chars().collect();
            for chunk in chars.chunks(max_batch) {
                batches.push(chunk.iter().collect::<String>().trim().to_string());
            }
            continue;
        }

        if !current.is_empty() && current.len() + piece.len() > max_batch {
            batches.push(std::mem::take(&mut current).trim().to_string());
        }
        current.push_str(piece);
    }

    if !current.is_empty() {
        batches.push(current.trim().to_string());
    }

    batches.retain(|b| !b.is_empty());
    batches
}
