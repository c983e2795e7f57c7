//! Chapter detection strategies
//!
//! Automatic mode runs an ordered chain of detectors. Each detector either
//! finds chapters, declares itself not applicable to the document, or fails.
//! The chain stops at the first detector that finds chapters or fails.

use crate::chapter::Chapter;
use crate::config::StyleConfig;
use crate::document::DocumentSource;
use crate::error::DetectError;

pub mod outline;
pub mod style;

pub use outline::{detect_from_outline, OutlineDetector, SECTION_KEYWORDS};
pub use style::{detect_from_styled_text, heading_pattern, StyleDetector};

/// Result of a single detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// The detector applies; the list may still be empty
    Chapters(Vec<Chapter>),
    /// The detector has nothing to work with on this document
    NotApplicable,
}

/// A strategy that finds chapter starts in a document
pub trait ChapterDetector {
    /// Detect chapters in the document
    fn detect(&self, source: &dyn DocumentSource) -> Result<Detection, DetectError>;

    /// Detector name for logs and reports
    fn name(&self) -> &'static str;
}

/// Chapters found by a chain, with the detector that found them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainResult {
    /// Name of the detector that applied
    pub detector: &'static str,
    /// Chapters in detection order
    pub chapters: Vec<Chapter>,
}

/// Ordered list of detectors tried one after another
pub struct DetectorChain {
    detectors: Vec<Box<dyn ChapterDetector>>,
}

impl DetectorChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Bookmarks first, then text styles
    pub fn automatic(config: &StyleConfig) -> Result<Self, DetectError> {
        Ok(Self::new()
            .with(OutlineDetector::new(config.keyword()))
            .with(StyleDetector::new(config)?))
    }

    /// Append a detector to the chain
    pub fn with(mut self, detector: impl ChapterDetector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Names of the detectors in order
    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run detectors in order until one applies.
    ///
    /// Returns `Ok(None)` when every detector is not applicable.
    pub fn run(&self, source: &dyn DocumentSource) -> Result<Option<ChainResult>, DetectError> {
        for detector in &self.detectors {
            match detector.detect(source)? {
                Detection::Chapters(chapters) => {
                    log::info!(
                        "Detector '{}' found {} chapter(s)",
                        detector.name(),
                        chapters.len()
                    );
                    return Ok(Some(ChainResult {
                        detector: detector.name(),
                        chapters,
                    }));
                }
                Detection::NotApplicable => {
                    log::debug!("Detector '{}' not applicable, trying next", detector.name());
                }
            }
        }
        Ok(None)
    }
}

impl Default for DetectorChain {
    fn default() -> Self {
        Self::new()
    }
}
