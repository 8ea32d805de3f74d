pub mod model;
pub mod service;

pub use model::{AudioChunk, AudioMetadata, ChapterMarker};
pub use service::AudioAssembler;
