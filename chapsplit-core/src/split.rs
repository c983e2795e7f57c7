//! Writing chapter ranges to separate documents

use crate::chapter::Chapter;
use crate::document::DocumentSource;
use crate::error::{DocumentError, SplitError};
use crate::partition::{partition, PageRange, SkippedChapter};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How output is written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOptions {
    /// Plan ranges without creating any file or directory
    pub dry_run: bool,
    /// Write output documents concurrently
    pub parallel: bool,
    /// Worker count for parallel writing (defaults to one per core)
    pub threads: Option<usize>,
}

/// Receives progress while chapters are written.
///
/// Calls may arrive from several threads when writing in parallel.
pub trait ProgressSink: Sync {
    /// Writing is about to start for `total` chapters
    fn started(&self, _total: usize) {}

    /// A chapter document has been written (or planned, on a dry run)
    fn chapter_written(&self, _chapter: &WrittenChapter) {}

    /// All chapters have been handled
    fn finished(&self) {}
}

/// Progress sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// A chapter document that was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenChapter {
    /// 1-based position in the sorted chapter list
    pub sequence: usize,
    /// Chapter title
    pub title: String,
    /// Output document path
    pub path: PathBuf,
    /// First page, 0-based inclusive
    pub start_page: u32,
    /// Last page, 0-based inclusive
    pub end_page: u32,
    /// 1-based page range for display, e.g. `5-9`
    pub pages: String,
}

impl WrittenChapter {
    fn new(range: &PageRange, output_dir: &Path) -> Self {
        Self {
            sequence: range.sequence,
            title: range.title.clone(),
            path: output_dir.join(&range.file_name),
            start_page: range.start_page,
            end_page: range.end_page,
            pages: range.display_pages(),
        }
    }
}

/// Summary of a split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    /// Directory the chapters were written to
    pub output_dir: PathBuf,
    /// Chapters written, in sorted order
    pub written: Vec<WrittenChapter>,
    /// Chapters whose range was invalid
    pub skipped: Vec<SkippedChapter>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl SplitReport {
    fn empty(output_dir: &Path, dry_run: bool) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            written: Vec::new(),
            skipped: Vec::new(),
            dry_run,
        }
    }
}

/// Writes each chapter range of a source document to its own file
pub struct Splitter<'a> {
    source: &'a dyn DocumentSource,
    options: SplitOptions,
}

impl<'a> Splitter<'a> {
    /// Create a splitter over a source document
    pub fn new(source: &'a dyn DocumentSource, options: SplitOptions) -> Self {
        Self { source, options }
    }

    /// Partition `chapters` and write one document per valid range into
    /// `output_dir`.
    pub fn split(
        &self,
        chapters: &[Chapter],
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<SplitReport, SplitError> {
        if chapters.is_empty() {
            log::warn!("No chapters to split; nothing written");
            return Ok(SplitReport::empty(output_dir, self.options.dry_run));
        }

        if !self.options.dry_run {
            fs::create_dir_all(output_dir).map_err(|source| SplitError::CreateDir {
                path: output_dir.to_path_buf(),
                source,
            })?;
        }

        let plan = partition(chapters, self.source.page_count());
        log::info!(
            "Splitting into {} chapter(s), {} skipped",
            plan.ranges.len(),
            plan.skipped.len()
        );

        progress.started(plan.ranges.len());
        let written = if self.options.parallel && plan.ranges.len() > 1 {
            self.write_parallel(&plan.ranges, output_dir, progress)?
        } else {
            self.write_sequential(&plan.ranges, output_dir, progress)?
        };
        progress.finished();

        Ok(SplitReport {
            output_dir: output_dir.to_path_buf(),
            written,
            skipped: plan.skipped,
            dry_run: self.options.dry_run,
        })
    }

    fn write_sequential(
        &self,
        ranges: &[PageRange],
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<WrittenChapter>, SplitError> {
        ranges
            .iter()
            .map(|range| self.write_one(range, output_dir, progress))
            .collect::<Result<Vec<_>, _>>()
            .map_err(SplitError::from)
    }

    #[cfg(feature = "parallel")]
    fn write_parallel(
        &self,
        ranges: &[PageRange],
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<WrittenChapter>, SplitError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads.unwrap_or(0))
            .build()
            .map_err(|e| SplitError::WorkerPool(e.to_string()))?;
        log::debug!("Writing chapters on {} thread(s)", pool.current_num_threads());

        // Collecting keeps the sorted order regardless of completion order
        pool.install(|| {
            ranges
                .par_iter()
                .map(|range| self.write_one(range, output_dir, progress))
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(SplitError::from)
    }

    #[cfg(not(feature = "parallel"))]
    fn write_parallel(
        &self,
        ranges: &[PageRange],
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<WrittenChapter>, SplitError> {
        log::debug!("Built without the parallel feature; writing sequentially");
        self.write_sequential(ranges, output_dir, progress)
    }

    fn write_one(
        &self,
        range: &PageRange,
        output_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<WrittenChapter, DocumentError> {
        let chapter = WrittenChapter::new(range, output_dir);
        if !self.options.dry_run {
            self.source
                .write_range(range.start_page, range.end_page, &chapter.path)?;
        }
        log::info!(
            "Chapter '{}' (pages {}) -> {}",
            chapter.title,
            chapter.pages,
            chapter.path.display()
        );
        progress.chapter_written(&chapter);
        Ok(chapter)
    }
}

/// Split with a one-off [`Splitter`]
pub fn split(
    source: &dyn DocumentSource,
    chapters: &[Chapter],
    output_dir: &Path,
    options: &SplitOptions,
    progress: &dyn ProgressSink,
) -> Result<SplitReport, SplitError> {
    Splitter::new(source, options.clone()).split(chapters, output_dir, progress)
}
