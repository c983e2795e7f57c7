//! Split command implementation

use crate::error::CliError;
use crate::input::validate_source;
use crate::output::{JsonFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::Result;
use chapsplit_core::{default_config_path, run, Job, Mode, Outcome, RunReport, SplitOptions};
use clap::Args;
use std::io;
use std::path::PathBuf;

/// Arguments for splitting a document
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// PDF document to split
    #[arg(value_name = "PDF")]
    pub input: PathBuf,

    /// Comma-separated 1-based chapter start pages, e.g. "5,10,56"
    #[arg(short, long, value_name = "PAGES", conflicts_with = "config")]
    pub manual: Option<String>,

    /// Style configuration for automatic detection
    /// [default: chapters_config.md next to the executable]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory [default: <PDF stem>_chapters beside the PDF]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Show the planned chapters without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write chapter documents in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of worker threads (implies --parallel; 0 = one per core)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress progress and log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported summary formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON run report
    Json,
}

impl SplitArgs {
    /// Execute the split command
    pub fn execute(&self) -> Result<()> {
        // Initialize logging based on verbosity
        self.init_logging()?;

        log::info!("Starting chapter split");
        log::debug!("Arguments: {:?}", self);

        let job = self.job()?;
        let progress = ProgressReporter::new(self.quiet || self.dry_run);
        let report = run(&job, &progress).map_err(CliError::from)?;

        let mut formatter: Box<dyn OutputFormatter> = match self.format {
            OutputFormat::Text => Box::new(TextFormatter::stdout()),
            OutputFormat::Json => Box::new(JsonFormatter::new(io::stdout(), &job.source)),
        };
        formatter.write_report(&report)?;
        formatter.finish()?;

        check_outcome(&report)?;
        Ok(())
    }

    /// Build the job described by the arguments
    pub fn job(&self) -> Result<Job, CliError> {
        let source = validate_source(&self.input)?;

        let mode = match &self.manual {
            Some(pages) => Mode::Manual(pages.clone()),
            None => Mode::Automatic {
                config: self.config.clone().unwrap_or_else(default_config_path),
            },
        };

        Ok(Job {
            source,
            mode,
            output_dir: self.output_dir.clone(),
            options: SplitOptions {
                dry_run: self.dry_run,
                parallel: self.parallel || self.threads.is_some(),
                threads: self.threads,
            },
        })
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .init();
        }

        Ok(())
    }
}

/// Scanned documents end the run with an error after the summary is shown
fn check_outcome(report: &RunReport) -> Result<(), CliError> {
    match report.outcome {
        Outcome::UnsupportedScanned => Err(CliError::UnsupportedDocument(
            "no extractable text found; the document appears to be scanned".to_string(),
        )),
        Outcome::Split(_) | Outcome::NoChapters => Ok(()),
    }
}
