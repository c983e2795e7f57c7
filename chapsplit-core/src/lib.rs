//! Chapter detection and splitting for PDF documents
//!
//! Chapter starts come either from a manual page list or from automatic
//! detection (document bookmarks first, then styled headings). The starts are
//! turned into contiguous page ranges and each range is written to its own
//! document.
//!
//! ```no_run
//! use chapsplit_core::{run, Job, Mode, NoProgress};
//!
//! let job = Job::new("book.pdf", Mode::Manual("5,10,56".to_string()));
//! let report = run(&job, &NoProgress)?;
//! println!("{:?}", report.outcome);
//! # Ok::<(), chapsplit_core::Error>(())
//! ```

#![warn(missing_docs)]

pub mod chapter;
pub mod config;
pub mod detect;
pub mod document;
pub mod error;
pub mod manual;
pub mod partition;
pub mod pipeline;
pub mod split;

// Re-export key types
pub use chapter::{Chapter, OutlineEntry, StyledPage, TextSpan};
pub use config::StyleConfig;
pub use detect::{ChapterDetector, Detection, DetectorChain};
pub use document::{DocumentSource, PdfDocument};
pub use error::{ConfigError, DetectError, DocumentError, Error, ManualError, Result, SplitError};
pub use manual::build_from_page_list;
pub use partition::{partition, PageRange, Partition, SkippedChapter};
pub use pipeline::{default_config_path, default_output_dir, run, Job, Mode, Outcome, RunReport};
pub use split::{NoProgress, ProgressSink, SplitOptions, SplitReport, Splitter, WrittenChapter};
