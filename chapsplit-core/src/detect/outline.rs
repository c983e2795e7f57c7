//! Bookmark-based chapter detection

use super::{ChapterDetector, Detection};
use crate::chapter::{Chapter, OutlineEntry};
use crate::document::DocumentSource;
use crate::error::DetectError;

/// Title words that mark a top-level section besides the chapter keyword
pub const SECTION_KEYWORDS: [&str; 3] = ["appendix", "index", "part"];

/// Keep top-level outline entries whose title names a section.
///
/// A title qualifies when its lowercase form contains the keyword or one of
/// [`SECTION_KEYWORDS`]. Outline order is preserved.
pub fn detect_from_outline(outline: &[OutlineEntry], keyword: &str) -> Vec<Chapter> {
    let keyword = keyword.to_lowercase();

    outline
        .iter()
        .filter(|entry| entry.level == 1)
        .filter(|entry| {
            let title = entry.title.to_lowercase();
            title.contains(&keyword) || SECTION_KEYWORDS.iter().any(|k| title.contains(k))
        })
        .map(|entry| Chapter::new(entry.title.clone(), i64::from(entry.page)))
        .collect()
}

/// Detector reading the document outline
#[derive(Debug, Clone)]
pub struct OutlineDetector {
    keyword: String,
}

impl OutlineDetector {
    /// Create a detector matching the given chapter keyword
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }
}

impl ChapterDetector for OutlineDetector {
    fn detect(&self, source: &dyn DocumentSource) -> Result<Detection, DetectError> {
        let outline = source.outline()?;
        if outline.is_empty() {
            log::info!("No bookmarks found");
            return Ok(Detection::NotApplicable);
        }

        log::info!(
            "Found {} bookmark(s), filtering for main sections",
            outline.len()
        );
        Ok(Detection::Chapters(detect_from_outline(&outline, &self.keyword)))
    }

    fn name(&self) -> &'static str {
        "bookmarks"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tests::FakeDocument;

    fn sample_outline() -> Vec<OutlineEntry> {
        vec![
            OutlineEntry::new(1, "Preface", 1),
            OutlineEntry::new(1, "Chapter 1: Beginnings", 3),
            OutlineEntry::new(2, "Chapter 1.1 Details", 4),
            OutlineEntry::new(1, "CHAPTER 2", 10),
            OutlineEntry::new(1, "Part II", 20),
            OutlineEntry::new(1, "Appendix A", 30),
            OutlineEntry::new(1, "Index", 40),
        ]
    }

    #[test]
    fn test_filters_top_level_sections() {
        let chapters = detect_from_outline(&sample_outline(), "Chapter");
        let titles: Vec<_> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Chapter 1: Beginnings", "CHAPTER 2", "Part II", "Appendix A", "Index"]
        );
        assert_eq!(chapters[0].page, 3);
    }

    #[test]
    fn test_nested_entries_never_selected() {
        let outline = vec![
            OutlineEntry::new(2, "Chapter 7", 5),
            OutlineEntry::new(3, "Appendix", 6),
        ];
        assert!(detect_from_outline(&outline, "Chapter").is_empty());
    }

    #[test]
    fn test_custom_keyword() {
        let outline = vec![
            OutlineEntry::new(1, "Kapitel 1", 2),
            OutlineEntry::new(1, "Chapter 1", 3),
        ];
        let chapters = detect_from_outline(&outline, "KAPITEL");
        assert_eq!(chapters, vec![Chapter::new("Kapitel 1", 2)]);
    }

    #[test]
    fn test_substring_match() {
        // "Departure" contains "part"
        let outline = vec![OutlineEntry::new(1, "Departure", 2)];
        assert_eq!(detect_from_outline(&outline, "Chapter").len(), 1);
    }

    #[test]
    fn test_detector_not_applicable_without_outline() {
        let detector = OutlineDetector::new("Chapter");
        let doc = FakeDocument::new(10);
        assert_eq!(detector.detect(&doc).unwrap(), Detection::NotApplicable);
    }

    #[test]
    fn test_detector_applies_even_when_nothing_matches() {
        let detector = OutlineDetector::new("Chapter");
        let doc = FakeDocument::new(10).with_outline(vec![OutlineEntry::new(1, "Preface", 1)]);
        assert_eq!(
            detector.detect(&doc).unwrap(),
            Detection::Chapters(Vec::new())
        );
    }
}
