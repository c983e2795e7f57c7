//! Text-style chapter detection
//!
//! Headings are recognized by content and appearance: the span text starts
//! with `<keyword> <number>`, the span is at least `MIN_FONT_SIZE` points,
//! and, when `MUST_BE_BOLD` is set, the font name says bold.

use super::{ChapterDetector, Detection};
use crate::chapter::{Chapter, StyledPage};
use crate::config::StyleConfig;
use crate::document::DocumentSource;
use crate::error::DetectError;
use regex::{Regex, RegexBuilder};

/// Build the anchored, case-insensitive heading pattern for a keyword
pub fn heading_pattern(keyword: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"^{}\s+\d+", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
}

/// Scan styled pages for chapter headings.
///
/// The first qualifying span of a page wins. Callers are expected to have
/// ruled out text-less (scanned) documents beforehand.
pub fn detect_from_styled_text(
    pages: &[StyledPage],
    config: &StyleConfig,
) -> Result<Vec<Chapter>, DetectError> {
    let pattern = heading_pattern(config.keyword())?;
    Ok(scan(pages, &pattern, config.min_font_size(), config.must_be_bold()))
}

fn scan(pages: &[StyledPage], pattern: &Regex, min_size: f32, must_be_bold: bool) -> Vec<Chapter> {
    let mut found: Vec<Chapter> = Vec::new();

    for page in pages {
        let heading = page.spans.iter().find_map(|span| {
            let text = span.text.trim();
            let qualifies = span.size >= min_size
                && (!must_be_bold || span.is_bold())
                && pattern.is_match(text);
            qualifies.then_some(text)
        });

        if let Some(text) = heading {
            let number = i64::from(page.number);
            if found.iter().any(|c| c.page == number) {
                continue;
            }
            log::debug!("Heading '{}' on page {}", text, page.number);
            found.push(Chapter::new(text, number));
        }
    }

    found
}

/// Detector scanning page text for styled headings
#[derive(Debug, Clone)]
pub struct StyleDetector {
    pattern: Regex,
    min_size: f32,
    must_be_bold: bool,
}

impl StyleDetector {
    /// Create a detector from the style configuration
    pub fn new(config: &StyleConfig) -> Result<Self, DetectError> {
        Ok(Self {
            pattern: heading_pattern(config.keyword())?,
            min_size: config.min_font_size(),
            must_be_bold: config.must_be_bold(),
        })
    }
}

impl ChapterDetector for StyleDetector {
    fn detect(&self, source: &dyn DocumentSource) -> Result<Detection, DetectError> {
        let pages = source.styled_pages()?;
        if !pages.iter().any(StyledPage::has_text) {
            log::warn!("No extractable text on any of {} page(s)", pages.len());
            return Err(DetectError::ScannedDocument);
        }

        log::info!("Analyzing text styles on {} page(s)", pages.len());
        Ok(Detection::Chapters(scan(
            &pages,
            &self.pattern,
            self.min_size,
            self.must_be_bold,
        )))
    }

    fn name(&self) -> &'static str {
        "text-style"
    }
}
