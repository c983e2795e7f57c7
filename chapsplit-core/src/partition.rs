//! Conversion of chapter starts into validated page ranges

use crate::chapter::Chapter;
use serde::Serialize;

/// Characters removed from titles before they become file names
const UNSAFE_FILENAME_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// A chapter's inclusive, 0-based page range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRange {
    /// 1-based position in the sorted chapter list
    pub sequence: usize,
    /// Chapter title
    pub title: String,
    /// First page, 0-based inclusive
    pub start_page: u32,
    /// Last page, 0-based inclusive
    pub end_page: u32,
    /// Output file name, `NN_<title>.pdf`
    pub file_name: String,
}

impl PageRange {
    /// Number of pages in the range
    pub fn len(&self) -> u32 {
        self.end_page - self.start_page + 1
    }

    /// Ranges are never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Human-readable 1-based range, e.g. `5-9`
    pub fn display_pages(&self) -> String {
        format!("{}-{}", self.start_page + 1, self.end_page + 1)
    }
}

/// A chapter whose computed range was invalid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedChapter {
    /// 1-based position in the sorted chapter list
    pub sequence: usize,
    /// Chapter title
    pub title: String,
    /// 1-based start page as given
    pub page: i64,
    /// Why the range was rejected
    pub reason: String,
}

/// Ranges to extract plus chapters that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Valid ranges in sorted order
    pub ranges: Vec<PageRange>,
    /// Chapters with invalid ranges
    pub skipped: Vec<SkippedChapter>,
}

/// Make a chapter title safe to use as a file stem
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Output file name for the chapter at a 1-based sorted position
pub fn chapter_file_name(sequence: usize, title: &str) -> String {
    format!("{:02}_{}.pdf", sequence, sanitize_title(title))
}

/// Partition a document into chapter ranges.
///
/// Chapters are stably sorted by start page. Each range runs up to the page
/// before the next chapter starts, the last one to the end of the document.
/// Range ends never go past the last page.
/// Ranges that end before they start or start outside the document are
/// reported as skipped; the sequence numbers of later chapters are unaffected.
pub fn partition(chapters: &[Chapter], page_count: u32) -> Partition {
    let mut sorted: Vec<&Chapter> = chapters.iter().collect();
    sorted.sort_by_key(|chapter| chapter.page);

    let last_page = i64::from(page_count) - 1;
    let mut result = Partition::default();

    for (index, chapter) in sorted.iter().enumerate() {
        let sequence = index + 1;
        let start = chapter.page.saturating_sub(1);
        let end = match sorted.get(index + 1) {
            Some(next) => next.page.saturating_sub(2).min(last_page),
            None => last_page,
        };

        let reason = if start < 0 {
            Some(format!("page {} is before the first page", chapter.page))
        } else if start > last_page {
            Some(format!(
                "page {} is beyond the last page ({page_count})",
                chapter.page
            ))
        } else if start > end {
            Some(format!(
                "range ends at page {} before it starts at page {}",
                end + 1,
                start + 1
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => {
                log::warn!("Invalid page range for '{}': {}. Skipping.", chapter.title, reason);
                result.skipped.push(SkippedChapter {
                    sequence,
                    title: chapter.title.clone(),
                    page: chapter.page,
                    reason,
                });
            }
            None => result.ranges.push(PageRange {
                sequence,
                title: chapter.title.clone(),
                // 0 <= start <= end <= last_page, so both fit in u32
                start_page: start as u32,
                end_page: end as u32,
                file_name: chapter_file_name(sequence, &chapter.title),
            }),
        }
    }

    result
}
