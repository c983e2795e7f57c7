//! Source document validation

use crate::error::CliError;
use std::path::{Path, PathBuf};

/// Check that `path` names an existing `.pdf` file
pub fn validate_source(path: &Path) -> Result<PathBuf, CliError> {
    if !path.exists() {
        return Err(CliError::InvalidSource(format!(
            "'{}' does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(CliError::InvalidSource(format!(
            "'{}' is not a file",
            path.display()
        )));
    }
    if !has_pdf_extension(path) {
        return Err(CliError::InvalidSource(format!(
            "'{}' is not a PDF file",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
