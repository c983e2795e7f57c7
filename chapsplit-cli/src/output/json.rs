//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use chapsplit_core::RunReport;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// JSON formatter - writes the run summary as one JSON document
pub struct JsonFormatter<W: Write> {
    writer: W,
    source: PathBuf,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    /// Source document
    pub source: &'a Path,
    /// The run report
    #[serde(flatten)]
    pub report: &'a RunReport,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter for a run over `source`
    pub fn new(writer: W, source: &Path) -> Self {
        Self {
            writer,
            source: source.to_path_buf(),
        }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn write_report(&mut self, report: &RunReport) -> Result<()> {
        let summary = RunSummary {
            source: &self.source,
            report,
        };
        serde_json::to_writer_pretty(&mut self.writer, &summary)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
