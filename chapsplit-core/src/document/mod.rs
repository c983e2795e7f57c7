//! PDF document access
//!
//! Detectors and the splitter only see the [`DocumentSource`] trait. The
//! production implementation, [`PdfDocument`], is backed by `lopdf`.

use crate::chapter::{OutlineEntry, StyledPage};
use crate::error::DocumentError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod cmap;
pub mod encoding;
mod outline;
mod text;

/// The document capabilities chapter splitting relies on
pub trait DocumentSource: Sync {
    /// Number of pages
    fn page_count(&self) -> u32;

    /// Outline entries flattened in reading order; empty when there is none
    fn outline(&self) -> Result<Vec<OutlineEntry>, DocumentError>;

    /// Styled text of every page, in page order
    fn styled_pages(&self) -> Result<Vec<StyledPage>, DocumentError>;

    /// Write pages `start..=end` (0-based) to a new document at `path`
    fn write_range(&self, start: u32, end: u32, path: &Path) -> Result<(), DocumentError>;
}

/// A PDF loaded into memory.
///
/// The file is read once on [`PdfDocument::open`]; dropping the value
/// releases it.
pub struct PdfDocument {
    path: PathBuf,
    inner: Document,
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    /// Open and parse a PDF file
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let inner = Document::load(path).map_err(|e| DocumentError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_document(path, inner)
    }

    /// Wrap an already loaded `lopdf` document.
    ///
    /// Encrypted documents are opened with the empty user password; any
    /// other password protection is rejected.
    pub fn from_document(path: &Path, mut inner: Document) -> Result<Self, DocumentError> {
        if inner.is_encrypted() {
            if let Err(e) = inner.decrypt("") {
                return Err(DocumentError::Open {
                    path: path.to_path_buf(),
                    reason: format!("encrypted document needs a password ({e})"),
                });
            }
            log::debug!("Decrypted {} with the empty password", path.display());
        }

        let pages: Vec<ObjectId> = inner.get_pages().into_values().collect();
        log::debug!("Opened {} ({} pages)", path.display(), pages.len());

        Ok(Self {
            path: path.to_path_buf(),
            inner,
            pages,
        })
    }

    /// Path the document was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based page numbers keyed by page object id
    fn page_numbers(&self) -> HashMap<ObjectId, u32> {
        self.pages
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index as u32 + 1))
            .collect()
    }
}

impl DocumentSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>, DocumentError> {
        Ok(outline::read_outline(&self.inner, &self.page_numbers()))
    }

    fn styled_pages(&self) -> Result<Vec<StyledPage>, DocumentError> {
        text::extract_styled_pages(&self.inner, &self.pages)
    }

    fn write_range(&self, start: u32, end: u32, path: &Path) -> Result<(), DocumentError> {
        let total = self.page_count();
        if start > end || end >= total {
            return Err(DocumentError::Malformed(format!(
                "page range {}-{} outside document of {} pages",
                start + 1,
                end + 1,
                total
            )));
        }

        let mut part = self.inner.clone();
        let outside: Vec<u32> = (1..=total)
            .filter(|&number| number - 1 < start || number - 1 > end)
            .collect();
        part.delete_pages(&outside);

        // Bookmarks would point at deleted pages
        if let Some(root) = root_id(&part) {
            if let Ok(Object::Dictionary(catalog)) = part.get_object_mut(root) {
                catalog.remove(b"Outlines");
            }
        }

        part.prune_objects();
        part.renumber_objects();
        part.compress();
        part.save(path).map_err(|e| DocumentError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        log::debug!(
            "Wrote pages {}-{} to {}",
            start + 1,
            end + 1,
            path.display()
        );
        Ok(())
    }
}

fn root_id(doc: &Document) -> Option<ObjectId> {
    doc.trailer.get(b"Root").and_then(Object::as_reference).ok()
}

/// The document catalog
fn catalog(doc: &Document) -> Option<&Dictionary> {
    root_id(doc).and_then(|id| doc.get_dictionary(id).ok())
}

/// Follow indirect references to the object they point at
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    let mut current = object;
    // Reference chains longer than this are treated as broken
    for _ in 0..16 {
        match current {
            Object::Reference(id) => current = doc.get_object(*id).ok()?,
            other => return Some(other),
        }
    }
    None
}

/// Look up a dictionary key and resolve the value
fn lookup<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|object| resolve(doc, object))
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}
