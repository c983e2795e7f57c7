//! Output formatting module

use anyhow::Result;
use chapsplit_core::RunReport;

/// Trait for run summary formatters
pub trait OutputFormatter {
    /// Write the summary of a finished run
    fn write_report(&mut self, report: &RunReport) -> Result<()>;

    /// Flush buffered output
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;
