//! Chapters from a user-supplied page list

use crate::chapter::Chapter;
use crate::error::ManualError;

/// Build chapters from a comma-separated list of 1-based start pages.
///
/// Pages are sorted ascending and titled `Section_Page_<n>`. Any integer is
/// accepted here: zero, negative and too-large pages, like duplicates, are
/// left for the partitioner to skip.
pub fn build_from_page_list(csv: &str) -> Result<Vec<Chapter>, ManualError> {
    if csv.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut pages = csv
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<i64>().map_err(|_| ManualError::InvalidPage {
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    pages.sort_unstable();

    Ok(pages
        .into_iter()
        .map(|page| Chapter::new(format!("Section_Page_{page}"), page))
        .collect())
}
