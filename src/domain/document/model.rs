use serde::{Deserialize, Serialize};

/// Text content of a single PDF page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub page_number: u32,
    pub text: String,
    pub word_count: usize,
}

impl PageContent {
    pub fn new(page_number: u32, text: String) -> Self {
        let word_count = text.split_whitespace().count();
        Self {
            page_number,
            text,
            word_count,
        }
    }
}

/// A contiguous section of the book, usually a chapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSection {
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
    pub content: String,
    pub section_type: SectionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Chapter,
    FrontMatter,
}

/// Metadata read from the PDF info dictionary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Title".to_string(),
            author: "Unknown Author".to_string(),
            subject: String::new(),
            creator: String::new(),
            producer: String::new(),
            creation_date: String::new(),
            modification_date: String::new(),
        }
    }
}
