use super::model::{AudioChunk, AudioMetadata, ChapterMarker};
use id3::{Tag, TagLike, Version};
use std::path::Path;

/// Narration speed assumed when estimating chapter durations
const WORDS_PER_MINUTE: f64 = 150.0;

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, mono. A zeroed payload decodes
/// as silence, which lets us splice pauses into the stream without
/// re-encoding anything.
const SILENT_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC0];
const SILENT_FRAME_LEN: usize = 417;
const SAMPLES_PER_FRAME: f64 = 1152.0;
const SAMPLE_RATE: f64 = 44100.0;

/// Combines synthesized MP3 chunks into one stream and exports the result
/// with ID3 tags.
///
/// All providers emit MP3, and MP3 frame streams concatenate cleanly, so
/// assembly is byte-level; the only generated audio is the inter-chapter
/// silence.
pub struct AudioAssembler;

impl AudioAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate chunks in order, inserting `chapter_pause_seconds` of
    /// silence at every chapter boundary
    pub fn combine(&self, chunks: &[AudioChunk], chapter_pause_seconds: f32) -> Vec<u8> {
        let mut combined = Vec::new();
        let pause = silence(chapter_pause_seconds);

        for (i, chunk) in chunks.iter().enumerate() {
            combined.extend_from_slice(&chunk.audio);

            let next = chunks.get(i + 1);
            let boundary = matches!(
                (&chunk.chapter, next.map(|n| &n.chapter)),
                (Some(a), Some(Some(b))) if a != b
            );

            if boundary && !pause.is_empty() {
                combined.extend_from_slice(&pause);
                tracing::debug!(
                    chapter = chunk.chapter.as_deref().unwrap_or(""),
                    pause_bytes = pause.len(),
                    "Inserted chapter pause"
                );
            }
        }

        combined
    }

    /// Write the MP3 to disk and embed ID3v2.4 tags
    pub fn export(
        &self,
        audio: &[u8],
        path: &Path,
        metadata: &AudioMetadata,
    ) -> std::io::Result<()> {
        std::fs::write(path, audio)?;

        let mut tag = Tag::new();
        tag.set_title(&metadata.title);
        tag.set_artist(&metadata.author);
        if let Some(album) = &metadata.album {
            tag.set_album(album);
        }
        if let Some(year) = metadata.year {
            tag.set_year(year);
        }
        tag.set_genre(&metadata.genre);
        if let Some((track, total)) = metadata.track {
            tag.set_track(track);
            tag.set_total_tracks(total);
        }

        tag.write_to_path(path, Version::Id3v24)
            .map_err(|e| std::io::Error::other(format!("Failed to write ID3 tags: {}", e)))?;

        tracing::info!(path = %path.display(), size = audio.len(), "MP3 exported");
        Ok(())
    }

    /// Chapter markers with durations estimated from word counts
    pub fn chapter_markers(&self, chunks: &[AudioChunk]) -> Vec<ChapterMarker> {
        let mut markers = Vec::new();
        let mut current: Option<(String, f64)> = None;
        let mut elapsed = 0.0;

        for chunk in chunks {
            if let Some(chapter) = &chunk.chapter {
                match &current {
                    Some((title, start)) if title != chapter => {
                        markers.push(ChapterMarker {
                            title: title.clone(),
                            start_seconds: *start,
                            end_seconds: elapsed,
                        });
                        current = Some((chapter.clone(), elapsed));
                    }
                    None => {
                        current = Some((chapter.clone(), elapsed));
                    }
                    _ => {}
                }
            }

            let words = chunk.text.split_whitespace().count() as f64;
            elapsed += words / WORDS_PER_MINUTE * 60.0;
        }

        if let Some((title, start)) = current {
            markers.push(ChapterMarker {
                title,
                start_seconds: start,
                end_seconds: elapsed,
            });
        }

        markers
    }
}

impl Default for AudioAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate `seconds` of silent MP3 frames
fn silence(seconds: f32) -> Vec<u8> {
    if seconds <= 0.0 {
        return Vec::new();
    }

    let frame_seconds = SAMPLES_PER_FRAME / SAMPLE_RATE;
    let frame_count = (seconds as f64 / frame_seconds).ceil() as usize;

    let mut frame = vec![0u8; SILENT_FRAME_LEN];
    frame[..4].copy_from_slice(&SILENT_FRAME_HEADER);

    let mut out = Vec::with_capacity(frame_count * SILENT_FRAME_LEN);
    for _ in 0..frame_count {
        out.extend_from_slice(&frame);
    }
    out
}
