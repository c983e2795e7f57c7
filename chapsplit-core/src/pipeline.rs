//! End-to-end run: pick chapters, then split
//!
//! [`run`] loads everything that can fail on user input before the document
//! is opened, so a bad page list or configuration never leaves partial
//! output behind.

use crate::chapter::Chapter;
use crate::config::{StyleConfig, CONFIG_FILE_NAME};
use crate::detect::DetectorChain;
use crate::document::{DocumentSource, PdfDocument};
use crate::error::{DetectError, Result};
use crate::manual::build_from_page_list;
use crate::split::{ProgressSink, SplitOptions, SplitReport, Splitter};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How chapter starts are found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Comma-separated 1-based page numbers supplied by the user
    Manual(String),
    /// Bookmarks, then text styles, using the given style configuration
    Automatic {
        /// Path of the style configuration file
        config: PathBuf,
    },
}

impl Mode {
    /// Short name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Manual(_) => "manual",
            Mode::Automatic { .. } => "automatic",
        }
    }
}

/// Everything needed for one run
#[derive(Debug, Clone)]
pub struct Job {
    /// Source document
    pub source: PathBuf,
    /// Chapter selection mode
    pub mode: Mode,
    /// Output directory; `<stem>_chapters` beside the source when `None`
    pub output_dir: Option<PathBuf>,
    /// Output options
    pub options: SplitOptions,
}

impl Job {
    /// Create a job with default output location and options
    pub fn new(source: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            source: source.into(),
            mode,
            output_dir: None,
            options: SplitOptions::default(),
        }
    }

    /// Output directory this job writes to
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&self.source))
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Chapters were split (or planned, on a dry run)
    Split(SplitReport),
    /// No chapters were found
    NoChapters,
    /// The document has no extractable text
    UnsupportedScanned,
}

/// Summary of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// `manual` or `automatic`
    pub mode: &'static str,
    /// Detector that produced the chapters, in automatic mode
    pub detector: Option<&'static str>,
    /// Chapters that were found, before range validation
    pub chapters: Vec<Chapter>,
    /// What happened
    pub outcome: Outcome,
}

/// `<parent>/<stem>_chapters`
pub fn default_output_dir(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{stem}_chapters"))
}

/// `chapters_config.md` next to the running executable
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(CONFIG_FILE_NAME)
}

/// Chapter source prepared before the document is opened
enum Selection {
    Manual(Vec<Chapter>),
    Automatic(StyleConfig),
}

/// Run a job from start to finish
pub fn run(job: &Job, progress: &dyn ProgressSink) -> Result<RunReport> {
    let selection = match &job.mode {
        Mode::Manual(pages) => Selection::Manual(build_from_page_list(pages)?),
        Mode::Automatic { config } => {
            log::debug!("Loading style configuration from {}", config.display());
            Selection::Automatic(StyleConfig::load(config)?)
        }
    };

    let document = PdfDocument::open(&job.source)?;
    log::info!(
        "Processing {} ({} pages)",
        job.source.display(),
        document.page_count()
    );

    run_with_source(job, selection, &document, progress)
}

fn run_with_source(
    job: &Job,
    selection: Selection,
    source: &dyn DocumentSource,
    progress: &dyn ProgressSink,
) -> Result<RunReport> {
    let (detector, chapters) = match selection {
        Selection::Manual(chapters) => (None, chapters),
        Selection::Automatic(config) => {
            let chain = DetectorChain::automatic(&config)?;
            match chain.run(source) {
                Ok(Some(found)) => (Some(found.detector), found.chapters),
                Ok(None) => (None, Vec::new()),
                Err(DetectError::ScannedDocument) => {
                    log::warn!("No extractable text; the document looks scanned");
                    return Ok(RunReport {
                        mode: job.mode.name(),
                        detector: None,
                        chapters: Vec::new(),
                        outcome: Outcome::UnsupportedScanned,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    if chapters.is_empty() {
        log::warn!("No chapters found; nothing to split");
        return Ok(RunReport {
            mode: job.mode.name(),
            detector,
            chapters,
            outcome: Outcome::NoChapters,
        });
    }

    let output_dir = job.resolved_output_dir();
    let report = Splitter::new(source, job.options.clone()).split(&chapters, &output_dir, progress)?;

    Ok(RunReport {
        mode: job.mode.name(),
        detector,
        chapters,
        outcome: Outcome::Split(report),
    })
}
