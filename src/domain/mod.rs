pub mod audio;
pub mod document;
pub mod filter;
pub mod job;
pub mod tts;
