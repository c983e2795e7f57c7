//! Error handling for the CLI application

use chapsplit_core::DetectError;
use std::fmt;

/// Exit code for I/O and PDF read/write failures
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for invalid user input
pub const EXIT_INVALID_INPUT: u8 = 2;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Source path missing, not a file, or not a PDF
    InvalidSource(String),
    /// Manual page list could not be parsed
    InvalidPageList(String),
    /// Style configuration missing or malformed
    ConfigError(String),
    /// Document has no extractable text
    UnsupportedDocument(String),
    /// Reading or writing documents failed
    ProcessingError(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ProcessingError(_) => EXIT_FAILURE,
            CliError::InvalidSource(_)
            | CliError::InvalidPageList(_)
            | CliError::ConfigError(_)
            | CliError::UnsupportedDocument(_) => EXIT_INVALID_INPUT,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidSource(msg) => write!(f, "Invalid input file: {msg}"),
            CliError::InvalidPageList(msg) => write!(f, "Invalid page list: {msg}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::UnsupportedDocument(msg) => write!(f, "Unsupported document: {msg}"),
            CliError::ProcessingError(msg) => write!(f, "Processing error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<chapsplit_core::Error> for CliError {
    fn from(err: chapsplit_core::Error) -> Self {
        use chapsplit_core::Error;

        match err {
            Error::Manual(e) => CliError::InvalidPageList(e.to_string()),
            Error::Config(e) => CliError::ConfigError(e.to_string()),
            Error::Detect(DetectError::ScannedDocument) => {
                CliError::UnsupportedDocument(DetectError::ScannedDocument.to_string())
            }
            Error::Detect(DetectError::Pattern(e)) => CliError::ConfigError(e.to_string()),
            Error::Detect(DetectError::Document(e)) => CliError::ProcessingError(e.to_string()),
            Error::Document(e) => CliError::ProcessingError(e.to_string()),
            Error::Split(e) => CliError::ProcessingError(e.to_string()),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

/// Exit code for an error returned from a command
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>()
        .map(CliError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}
