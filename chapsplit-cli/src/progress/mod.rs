//! Progress reporting module

use chapsplit_core::{ProgressSink, WrittenChapter};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for chapter writing
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a new progress reporter; a quiet reporter draws nothing
    pub fn new(quiet: bool) -> Self {
        if quiet {
            return Self { progress_bar: None };
        }

        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} chapters {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        let pb = ProgressBar::new(0);
        pb.set_style(style);

        Self {
            progress_bar: Some(pb),
        }
    }

    /// Whether a bar will be drawn
    pub fn is_visible(&self) -> bool {
        self.progress_bar.is_some()
    }
}

impl ProgressSink for ProgressReporter {
    fn started(&self, total: usize) {
        if let Some(pb) = &self.progress_bar {
            pb.set_length(total as u64);
            pb.enable_steady_tick(Duration::from_millis(100));
        }
    }

    fn chapter_written(&self, chapter: &WrittenChapter) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("Wrote: {}", chapter.title));
            pb.inc(1);
        }
    }

    fn finished(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }
}
