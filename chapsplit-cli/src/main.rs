//! chapsplit - split PDF documents into chapters

use std::process::ExitCode;

use clap::Parser;

use chapsplit_cli::commands::SplitArgs;
use chapsplit_cli::error::exit_code;

#[derive(Parser)]
#[command(name = "chapsplit")]
#[command(version, about = "Split a PDF document into one file per chapter", long_about = None)]
#[command(after_help = "EXAMPLES:
    chapsplit book.pdf                      Detect chapters from bookmarks or headings
    chapsplit book.pdf --manual 5,10,56     Start chapters on pages 5, 10 and 56
    chapsplit book.pdf -c styles.md --dry-run -f json")]
struct Cli {
    #[command(flatten)]
    args: SplitArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.args.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}
