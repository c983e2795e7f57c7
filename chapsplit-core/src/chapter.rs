//! Domain types shared by detectors, the partitioner and the document adapter

use serde::Serialize;

/// A detected or user-specified chapter start
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// Chapter title as found in the document or synthesized
    pub title: String,
    /// 1-based starting page; may lie outside the document when user-supplied
    pub page: i64,
}

impl Chapter {
    /// Create a new chapter
    pub fn new(title: impl Into<String>, page: i64) -> Self {
        Self {
            title: title.into(),
            page,
        }
    }
}

/// One entry of a document outline, flattened in reading order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Nesting depth, 1 for top-level entries
    pub level: u32,
    /// Bookmark title
    pub title: String,
    /// 1-based target page
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// A run of text sharing one font and size
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Text content, untrimmed
    pub text: String,
    /// Rendered font size in points
    pub size: f32,
    /// Font name (e.g. `Helvetica-Bold`)
    pub font: String,
    /// Horizontal origin in user space
    pub x: f32,
    /// Vertical origin in user space
    pub y: f32,
}

impl TextSpan {
    /// Create a span at the page origin
    pub fn new(text: impl Into<String>, size: f32, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size,
            font: font.into(),
            x: 0.0,
            y: 0.0,
        }
    }

    /// Whether the font name marks a bold weight
    pub fn is_bold(&self) -> bool {
        self.font.to_lowercase().contains("bold")
    }
}

/// Styled text of a single page in content-stream order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledPage {
    /// 1-based page number
    pub number: u32,
    /// Spans in the order they are drawn
    pub spans: Vec<TextSpan>,
}

impl StyledPage {
    /// Create an empty page
    pub fn new(number: u32) -> Self {
        Self {
            number,
            spans: Vec::new(),
        }
    }

    /// Whether any span carries non-whitespace text
    pub fn has_text(&self) -> bool {
        self.spans.iter().any(|span| !span.text.trim().is_empty())
    }
}
