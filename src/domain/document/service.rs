use super::error::DocumentServiceError;
use super::model::{BookSection, DocumentMetadata, PageContent, SectionType};
use lopdf::{Document, Object};
use std::path::Path;

/// Extracts text, metadata and structure from uploaded PDFs.
///
/// All operations are synchronous and CPU-bound; callers on the async runtime
/// are expected to wrap them in `spawn_blocking`.
pub struct DocumentService;

impl DocumentService {
    pub fn new() -> Self {
        Self
    }

    /// Extract per-page text content from a PDF file on disk
    pub fn extract_pages(&self, path: &Path) -> Result<Vec<PageContent>, DocumentServiceError> {
        let doc = Document::load(path)?;
        self.pages_from_document(&doc)
    }

    /// Parse a PDF held in memory and read its info-dictionary metadata.
    /// Also serves as upload validation: fails on anything that is not a
    /// loadable PDF.
    pub fn read_metadata(&self, bytes: &[u8]) -> Result<DocumentMetadata, DocumentServiceError> {
        let doc = Document::load_mem(bytes)?;
        Ok(self.metadata_from_document(&doc))
    }

    fn pages_from_document(&self, doc: &Document) -> Result<Vec<PageContent>, DocumentServiceError> {
        let mut pages = Vec::new();

        for (page_number, _) in doc.get_pages() {
            let text = doc.extract_text(&[page_number]).unwrap_or_default();
            pages.push(PageContent::new(page_number, text.trim().to_string()));
        }

        if pages.is_empty() {
            return Err(DocumentServiceError::Empty);
        }

        Ok(pages)
    }

    fn metadata_from_document(&self, doc: &Document) -> DocumentMetadata {
        let defaults = DocumentMetadata::default();

        let info = doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| match obj {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_dict().ok());

        let Some(info) = info else {
            return defaults;
        };

        let field = |key: &[u8]| -> Option<String> {
            info.get(key)
                .ok()
                .and_then(|obj| obj.as_str().ok())
                .map(decode_pdf_string)
                .filter(|s| !s.is_empty())
        };

        DocumentMetadata {
            title: field(b"Title").unwrap_or(defaults.title),
            author: field(b"Author").unwrap_or(defaults.author),
            subject: field(b"Subject").unwrap_or_default(),
            creator: field(b"Creator").unwrap_or_default(),
            producer: field(b"Producer").unwrap_or_default(),
            creation_date: field(b"CreationDate").unwrap_or_default(),
            modification_date: field(b"ModDate").unwrap_or_default(),
        }
    }

    /// Detect chapter boundaries using heading heuristics.
    ///
    /// Pages before the first detected heading are grouped into a
    /// front-matter section so no text is silently dropped.
    pub fn detect_chapters(&self, pages: &[PageContent]) -> Vec<BookSection> {
        let chapter_patterns = [
            regex::Regex::new(r"(?mi)^\s*chapter\s+\d+").unwrap(),
            regex::Regex::new(r"(?mi)^\s*part\s+[ivx]+\b").unwrap(),
            regex::Regex::new(r"(?m)^\s*\d+\.\s+[A-Z]").unwrap(),
        ];

        let mut sections: Vec<BookSection> = Vec::new();
        let mut current: Option<BookSection> = None;

        for page in pages {
            let heading = chapter_patterns
                .iter()
                .filter_map(|p| p.find(&page.text))
                .min_by_key(|m| m.start());

            if let Some(m) = heading {
                if let Some(mut section) = current.take() {
                    section.end_page = page.page_number.saturating_sub(1).max(section.start_page);
                    sections.push(section);
                }

                current = Some(BookSection {
                    title: extract_heading_title(&page.text, m.start()),
                    start_page: page.page_number,
                    end_page: page.page_number,
                    content: String::new(),
                    section_type: SectionType::Chapter,
                });
            } else if current.is_none() && !page.text.is_empty() {
                current = Some(BookSection {
                    title: "Front Matter".to_string(),
                    start_page: page.page_number,
                    end_page: page.page_number,
                    content: String::new(),
                    section_type: SectionType::FrontMatter,
                });
            }

            if let Some(section) = current.as_mut() {
                section.content.push_str(&page.text);
                section.content.push('\n');
                section.end_page = page.page_number;
            }
        }

        if let Some(section) = current.take() {
            sections.push(section);
        }

        sections
    }

    /// Normalize extracted text: drop page-number lines and tiny artifacts
    pub fn clean_text(&self, text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|line| line.len() > 3 && !line.chars().all(|c| c.is_ascii_digit()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Split text into chunks suitable for a single TTS request.
    ///
    /// Packs whole sentences up to `max_chunk_size`; sentences that are
    /// themselves too long fall back to word packing, and a single word
    /// longer than the limit becomes its own chunk.
    pub fn chunk_text(&self, text: &str, max_chunk_size: usize) -> Vec<String> {
        let sentence_split = regex::Regex::new(r"[.!?]+").unwrap();
        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in sentence_split.split(text) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            if sentence.len() > max_chunk_size {
                flush(&mut current, &mut chunks);
                pack_words(sentence, max_chunk_size, &mut current, &mut chunks);
                continue;
            }

            // +2 accounts for the ". " joiner
            if !current.is_empty() && current.len() + sentence.len() + 2 > max_chunk_size {
                flush(&mut current, &mut chunks);
            }

            if current.is_empty() {
                current.push_str(sentence);
            } else {
                current.push_str(". ");
                current.push_str(sentence);
            }
        }

        flush(&mut current, &mut chunks);
        chunks
    }
}

impl Default for DocumentService {
    fn default() -> Self {
        Self::new()
    }
}

fn flush(current: &mut String, chunks: &mut Vec<String>) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current).trim().to_string());
    }
}

fn pack_words(sentence: &str, max_chunk_size: usize, current: &mut String, chunks: &mut Vec<String>) {
    for word in sentence.split_whitespace() {
        if word.len() > max_chunk_size {
            flush(current, chunks);
            chunks.push(word.to_string());
            continue;
        }

        if !current.is_empty() && current.len() + word.len() + 1 > max_chunk_size {
            flush(current, chunks);
        }

        if current.is_empty() {
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    flush(current, chunks);
}

/// Heading title: the first couple of non-numeric lines at the match site
fn extract_heading_title(text: &str, start: usize) -> String {
    let mut title_lines = Vec::new();

    for line in text[start..].lines().take(3) {
        let line = line.trim();
        if !line.is_empty() && !line.chars().all(|c| c.is_ascii_digit()) {
            title_lines.push(line);
        }
        if title_lines.len() >= 2 {
            break;
        }
    }

    if title_lines.is_empty() {
        "Untitled Chapter".to_string()
    } else {
        title_lines.join(" ")
    }
}

/// PDF text strings are either UTF-16BE with a BOM or PDFDocEncoding;
/// treat the latter as latin-1-ish via lossy UTF-8.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
    .trim()
    .to_string()
}
