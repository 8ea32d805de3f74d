use crate::domain::document::{BookSection, PageContent};
use crate::infrastructure::config::FilterConfig;

/// Minimum words for a page to count as main content
const MIN_PAGE_WORDS: usize = 50;
/// Minimum words for a section to be kept
const MIN_SECTION_WORDS: usize = 100;

/// Verdict for a single page or section
#[derive(Debug, Clone)]
pub struct FilterResult {
    pub skip: bool,
    pub reason: &'static str,
    pub confidence: f32,
}

impl FilterResult {
    fn skip(reason: &'static str, confidence: f32) -> Self {
        Self {
            skip: true,
            reason,
            confidence,
        }
    }

    fn keep() -> Self {
        Self {
            skip: false,
            reason: "main content",
            confidence: 0.0,
        }
    }
}

/// Identifies non-essential book pages (copyright, TOC, index, promotional
/// matter) so they are not narrated.
pub struct ContentFilter {
    config: FilterConfig,
}

const COPYRIGHT_KEYWORDS: &[&str] = &[
    "copyright",
    "published",
    "isbn",
    "edition",
    "printing",
    "publisher",
    "all rights reserved",
    "no part of this publication",
    "library of congress",
    "cataloging-in-publication",
    "printed in",
    "first published",
];

const ACKNOWLEDGMENT_KEYWORDS: &[&str] = &[
    "acknowledgment",
    "acknowledgement",
    "thanks to",
    "grateful to",
    "dedication",
    "dedicated to",
    "in memory of",
    "special thanks",
    "would like to thank",
    "gratitude",
    "appreciation",
];

const INDEX_KEYWORDS: &[&str] = &[
    "index",
    "bibliography",
    "references",
    "works cited",
    "further reading",
    "suggested reading",
    "endnotes",
    "footnotes",
];

const PROMOTIONAL_KEYWORDS: &[&str] = &[
    "praise for",
    "reviews",
    "also by",
    "about the author",
    "other books",
    "from the reviews",
    "acclaim for",
    "what readers are saying",
    "testimonials",
    "endorsements",
];

const FRONT_MATTER_KEYWORDS: &[&str] = &["copyright", "published", "isbn", "edition"];

impl ContentFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Keep only pages classified as main content
    pub fn filter_pages(&self, pages: Vec<PageContent>) -> Vec<PageContent> {
        pages
            .into_iter()
            .filter(|page| {
                let verdict = self.analyze_page(page);
                if verdict.skip {
                    tracing::info!(
                        page = page.page_number,
                        reason = verdict.reason,
                        confidence = format!("{:.2}", verdict.confidence),
                        "Skipping page"
                    );
                }
                !verdict.skip
            })
            .collect()
    }

    pub fn analyze_page(&self, page: &PageContent) -> FilterResult {
        let text = page.text.to_lowercase();

        if page.word_count < MIN_PAGE_WORDS {
            return FilterResult::skip("too few words", 0.9);
        }

        if self.config.skip_copyright {
            let score = keyword_score(&text, COPYRIGHT_KEYWORDS);
            if score > 0.3 {
                return FilterResult::skip("copyright/publication page", score);
            }
        }

        if self.config.skip_acknowledgments {
            let score = keyword_score(&text, ACKNOWLEDGMENT_KEYWORDS);
            if score > 0.2 {
                return FilterResult::skip("acknowledgments/dedication", score);
            }
        }

        if self.config.skip_toc {
            let score = toc_score(&text);
            if score > 0.4 {
                return FilterResult::skip("table of contents", score);
            }
        }

        if self.config.skip_index {
            let score = keyword_score(&text, INDEX_KEYWORDS);
            if score > 0.3 {
                return FilterResult::skip("index/bibliography", score);
            }
        }

        if self.config.skip_promotional {
            let score = keyword_score(&text, PROMOTIONAL_KEYWORDS);
            if score > 0.3 {
                return FilterResult::skip("promotional content", score);
            }
        }

        // First few pages weighted towards front-matter indicators
        if page.page_number <= 5 {
            let score = (keyword_score(&text, FRONT_MATTER_KEYWORDS) * 2.0).min(1.0);
            if score > 0.7 {
                return FilterResult::skip("likely metadata page", score);
            }
        }

        FilterResult::keep()
    }

    /// Drop sections with skip-category titles or too little content,
    /// and clean the text of the ones that survive.
    pub fn filter_sections(&self, sections: Vec<BookSection>) -> Vec<BookSection> {
        sections
            .into_iter()
            .filter(|section| {
                let keep = self.should_keep_section(section);
                if !keep {
                    tracing::info!(title = %section.title, "Skipping section");
                }
                keep
            })
            .map(|mut section| {
                section.content = clean_section_content(&section.content);
                section
            })
            .collect()
    }

    fn should_keep_section(&self, section: &BookSection) -> bool {
        let title = section.title.to_lowercase();

        let mut skip_titles: Vec<&str> = Vec::new();
        if self.config.skip_acknowledgments {
            skip_titles.extend(["acknowledgment", "dedication", "thanks"]);
        }
        if self.config.skip_toc {
            skip_titles.extend(["contents", "table of contents"]);
        }
        if self.config.skip_index {
            skip_titles.extend(["index", "bibliography", "references"]);
        }

        if skip_titles.iter().any(|t| title.contains(t)) {
            return false;
        }

        section.content.split_whitespace().count() >= MIN_SECTION_WORDS
    }
}

/// Keyword density normalized per 100 words, capped at 1.0
fn keyword_score(text: &str, keywords: &[&str]) -> f32 {
    let word_count = text.split_whitespace().count();
    if word_count == 0 {
        return 0.0;
    }

    let matches: usize = keywords.iter().map(|k| text.matches(k).count()).sum();

    (matches as f32 / (word_count as f32 / 100.0)).min(1.0)
}

/// TOC detection: fraction of lines shaped like "Chapter N ... 17"
/// or dotted leaders
fn toc_score(text: &str) -> f32 {
    let patterns = [
        regex::Regex::new(r"(?i)chapter\s+\d+.*\d+$").unwrap(),
        regex::Regex::new(r"(?i)part\s+[ivx]+.*\d+$").unwrap(),
        regex::Regex::new(r"^\d+\s+[A-Z].*\d+$").unwrap(),
        regex::Regex::new(r"\.{3,}").unwrap(),
    ];

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    if lines.is_empty() {
        return 0.0;
    }

    let matching = lines
        .iter()
        .filter(|line| patterns.iter().any(|p| p.is_match(line)))
        .count();

    (matching as f32 / lines.len() as f32 * 2.0).min(1.0)
}

/// Clean section content for narration: collapse whitespace, strip
/// bracketed artifacts, page references and stuttered punctuation
fn clean_section_content(content: &str) -> String {
    let no_brackets = regex::Regex::new(r"\[.*?\]")
        .unwrap()
        .replace_all(content, "");
    let no_page_refs = regex::Regex::new(r"\(page \d+\)")
        .unwrap()
        .replace_all(&no_brackets, "");
    let depunctuated = regex::Regex::new(r"([.!?])\s*[.!?]+")
        .unwrap()
        .replace_all(&no_page_refs, "$1");
    let collapsed = regex::Regex::new(r"\s+")
        .unwrap()
        .replace_all(&depunctuated, " ");

    collapsed.trim().to_string()
}
