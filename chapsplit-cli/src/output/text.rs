//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use chapsplit_core::{Outcome, RunReport, SplitReport};
use std::io::{self, Write};

/// Plain text formatter - one line per chapter
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_split(&mut self, split: &SplitReport) -> Result<()> {
        let verb = if split.dry_run { "Would write" } else { "Wrote" };
        for chapter in &split.written {
            let name = chapter
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            writeln!(
                self.writer,
                "  {verb} {name} (pages {}) '{}'",
                chapter.pages, chapter.title
            )?;
        }
        for skipped in &split.skipped {
            writeln!(
                self.writer,
                "  Skipped '{}' (page {}): {}",
                skipped.title, skipped.page, skipped.reason
            )?;
        }

        if split.dry_run {
            writeln!(
                self.writer,
                "Dry run: {} chapter(s) planned for {}",
                split.written.len(),
                split.output_dir.display()
            )?;
        } else {
            writeln!(
                self.writer,
                "Done: {} chapter(s) written to {}",
                split.written.len(),
                split.output_dir.display()
            )?;
        }
        Ok(())
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn write_report(&mut self, report: &RunReport) -> Result<()> {
        match report.detector {
            Some(detector) => writeln!(self.writer, "Mode: {} ({detector})", report.mode)?,
            None => writeln!(self.writer, "Mode: {}", report.mode)?,
        }

        match &report.outcome {
            Outcome::Split(split) => {
                writeln!(self.writer, "Found {} chapter(s)", report.chapters.len())?;
                self.write_split(split)?;
            }
            Outcome::NoChapters => {
                writeln!(self.writer, "No chapters found; nothing to split")?;
            }
            Outcome::UnsupportedScanned => {
                writeln!(
                    self.writer,
                    "No extractable text: the document appears to be scanned; \
                     automatic detection is not supported"
                )?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
