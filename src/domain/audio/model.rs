use serde::{Deserialize, Serialize};

/// A synthesized piece of audio together with the text it came from
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub audio: Vec<u8>,
    pub text: String,
    pub chapter: Option<String>,
}

/// Tags embedded into the exported MP3
#[derive(Debug, Clone)]
pub struct AudioMetadata {
    pub title: String,
    pub author: String,
    pub album: Option<String>,
    pub year: Option<i32>,
    pub genre: String,
    pub track: Option<(u32, u32)>,
}

impl AudioMetadata {
    pub fn audiobook(title: &str, author: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            album: Some(title.to_string()),
            year: None,
            genre: "Audiobook".to_string(),
            track: None,
        }
    }
}

/// Chapter position within the final audio, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterMarker {
    pub title: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}
