//! Layered error types
//!
//! Each stage of a run owns its error enum; [`Error`] gathers them for the
//! orchestrator and callers that only need a single type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the style configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("configuration file not found at '{}'", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The configuration file exists but could not be read
    #[error("failed to read configuration '{}': {source}", path.display())]
    Io {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A numeric option carries a value that is not a number
    #[error("invalid value '{value}' for {key} on line {line}: expected a number")]
    InvalidNumber {
        /// Option name
        key: String,
        /// Raw value as written in the file
        value: String,
        /// 1-based line number
        line: usize,
    },
}

/// Errors raised while parsing a manual page list
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ManualError {
    /// A token in the list is not a page number
    #[error("invalid page number '{token}': use comma-separated integers")]
    InvalidPage {
        /// The offending token, trimmed
        token: String,
    },
}

/// Errors raised by the PDF document adapter
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The source document could not be opened or parsed
    #[error("could not read '{}': {reason}", path.display())]
    Open {
        /// Source path
        path: PathBuf,
        /// Reason reported by the PDF library
        reason: String,
    },

    /// The document structure is missing something required
    #[error("malformed document: {0}")]
    Malformed(String),

    /// An extracted page range could not be written
    #[error("failed to write '{}': {reason}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Reason reported by the PDF library
        reason: String,
    },
}

/// Errors raised by chapter detectors
#[derive(Error, Debug)]
pub enum DetectError {
    /// No page carries extractable text; the document is likely scanned
    #[error("document appears to be image-based (scanned); automatic mode cannot process it")]
    ScannedDocument,

    /// The heading pattern could not be compiled
    #[error("invalid heading pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Reading the document failed
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Errors raised while writing split output
#[derive(Error, Debug)]
pub enum SplitError {
    /// The output directory could not be created
    #[error("failed to create output directory '{}': {source}", path.display())]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing a chapter document failed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The worker pool could not be built
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// Top-level error for a complete run
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Manual page list error
    #[error(transparent)]
    Manual(#[from] ManualError),

    /// Document error
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Detection error other than the scanned-document signal
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// Output error
    #[error(transparent)]
    Split(#[from] SplitError),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
