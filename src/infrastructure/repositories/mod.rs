pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod rate_limiter;
pub mod tts_repository;

pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use rate_limiter::RateLimiter;
pub use tts_repository::{TtsRepository, VoiceInfo};
