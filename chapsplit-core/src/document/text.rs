//! Styled text extraction from page content streams
//!
//! A span is a run of shown text that keeps one font and one position
//! state: any font change or text positioning operator closes it. This is
//! coarser than a full layout engine but matches how headings are usually
//! drawn (one `Tf`, one `Td`, one or more `Tj`).
//!
//! Sizes and positions are in page space: the text matrix is combined with
//! the current transformation matrix, which `cm` concatenates and `q`/`Q`
//! save and restore. Form XObjects drawn with `Do` are walked with their own
//! resources and matrix.

use super::cmap::{parse_to_unicode, CMap};
use super::encoding::FontDecoder;
use super::{lookup, number, resolve};
use crate::chapter::{StyledPage, TextSpan};
use crate::error::DocumentError;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::sync::Arc;

/// `TJ` adjustments at or below this (thousandths of an em) read as a space
const TJ_SPACE_THRESHOLD: f32 = -200.0;

/// Form XObjects nested deeper than this are not walked
const MAX_FORM_DEPTH: usize = 8;

/// `/Parent` chains longer than this are treated as broken
const MAX_PAGE_TREE_DEPTH: usize = 32;

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `lhs × rhs` in the PDF row-vector convention
fn multiply(lhs: &Matrix, rhs: &Matrix) -> Matrix {
    let [a1, b1, c1, d1, e1, f1] = *lhs;
    let [a2, b2, c2, d2, e2, f2] = *rhs;
    [
        a1 * a2 + b1 * c2,
        a1 * b2 + b1 * d2,
        c1 * a2 + d1 * c2,
        c1 * b2 + d1 * d2,
        e1 * a2 + f1 * c2 + e2,
        e1 * b2 + f1 * d2 + f2,
    ]
}

fn matrix_from(operands: &[Object]) -> Option<Matrix> {
    let values: Vec<f32> = operands.iter().filter_map(number).collect();
    if values.len() != operands.len() {
        return None;
    }
    <Matrix>::try_from(values.as_slice()).ok()
}

/// Font resource resolved to a name and a decoder
#[derive(Debug)]
struct FontInfo {
    name: String,
    decoder: FontDecoder,
}

/// ToUnicode maps already parsed, by stream id
type CMapCache = HashMap<ObjectId, Arc<CMap>>;

/// The part of a resource dictionary text extraction uses
#[derive(Debug, Default)]
struct Resources<'a> {
    fonts: HashMap<Vec<u8>, Arc<FontInfo>>,
    xobjects: Option<&'a Dictionary>,
}

impl<'a> Resources<'a> {
    fn load(doc: &'a Document, resources: &'a Dictionary, cmaps: &mut CMapCache) -> Self {
        let fonts = lookup(doc, resources, b"Font")
            .and_then(|fonts| fonts.as_dict().ok())
            .map(|fonts| {
                fonts
                    .iter()
                    .filter_map(|(key, value)| {
                        let font = resolve(doc, value)?.as_dict().ok()?;
                        let info = FontInfo {
                            name: font_name(doc, font, key),
                            decoder: font_decoder(doc, font, cmaps),
                        };
                        Some((key.clone(), Arc::new(info)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let xobjects = lookup(doc, resources, b"XObject").and_then(|x| x.as_dict().ok());

        Self { fonts, xobjects }
    }

    /// The form XObject registered under `key`, if that is what it is
    fn form(&self, doc: &'a Document, key: &[u8]) -> Option<&'a Stream> {
        let stream = lookup(doc, self.xobjects?, key)?.as_stream().ok()?;
        let is_form = lookup(doc, &stream.dict, b"Subtype")
            .and_then(|s| s.as_name().ok())
            .is_some_and(|s| s == b"Form");
        is_form.then_some(stream)
    }
}

/// A page's resource dictionary, inherited through `/Parent` when absent
fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Some(resources) = lookup(doc, node, b"Resources").and_then(|r| r.as_dict().ok()) {
            return Some(resources);
        }
        node = lookup(doc, node, b"Parent")?.as_dict().ok()?;
    }
    None
}

/// Extract styled spans from every page.
///
/// Pages whose content cannot be decoded are logged and come back empty.
/// When no page of a non-empty document can be decoded the file is treated
/// as malformed rather than as having no text.
pub(super) fn extract_styled_pages(
    doc: &Document,
    pages: &[ObjectId],
) -> Result<Vec<StyledPage>, DocumentError> {
    let mut cmaps = CMapCache::new();
    let mut failed = 0;
    let mut last_failure = String::new();

    let styled: Vec<StyledPage> = pages
        .iter()
        .enumerate()
        .map(|(index, &page_id)| {
            let number = index as u32 + 1;
            let mut page = StyledPage::new(number);

            let content = doc
                .get_page_content(page_id)
                .map_err(|e| e.to_string())
                .and_then(|bytes| decode_content(&bytes));
            match content {
                Ok(content) => {
                    let resources = page_resources(doc, page_id)
                        .map(|dict| Resources::load(doc, dict, &mut cmaps))
                        .unwrap_or_default();
                    let mut collector = SpanCollector::new(doc, &mut cmaps);
                    collector.run(&content.operations, &resources);
                    page.spans = collector.finish();
                }
                Err(reason) => {
                    log::warn!("Skipping text of page {}: {}", number, reason);
                    failed += 1;
                    last_failure = reason;
                }
            }

            log::trace!("Page {}: {} span(s)", number, page.spans.len());
            page
        })
        .collect();

    if !pages.is_empty() && failed == pages.len() {
        return Err(DocumentError::Malformed(format!(
            "no page content could be decoded ({last_failure})"
        )));
    }
    Ok(styled)
}

/// Decode a content stream; bytes that yield no operation at all are unreadable
fn decode_content(bytes: &[u8]) -> Result<Content, String> {
    let content = Content::decode(bytes).map_err(|e| e.to_string())?;
    if content.operations.is_empty() && bytes.iter().any(|b| !b.is_ascii_whitespace()) {
        return Err("no operators could be read".to_string());
    }
    Ok(content)
}

fn font_name(doc: &Document, font: &Dictionary, key: &[u8]) -> String {
    let raw = lookup(doc, font, b"BaseFont")
        .and_then(|name| name.as_name().ok())
        .unwrap_or(key);
    let name = String::from_utf8_lossy(raw);
    strip_subset_prefix(&name).to_string()
}

/// `ABCDEF+Times-Bold` -> `Times-Bold`
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

fn font_decoder(doc: &Document, font: &Dictionary, cmaps: &mut CMapCache) -> FontDecoder {
    let composite = lookup(doc, font, b"Subtype")
        .and_then(|s| s.as_name().ok())
        .is_some_and(|s| s == b"Type0");

    let to_unicode = font
        .get(b"ToUnicode")
        .and_then(Object::as_reference)
        .ok()
        .and_then(|id| {
            if let Some(cached) = cmaps.get(&id) {
                return Some(Arc::clone(cached));
            }
            let stream = doc.get_object(id).and_then(Object::as_stream).ok()?;
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let cmap = Arc::new(parse_to_unicode(&data));
            cmaps.insert(id, Arc::clone(&cmap));
            Some(cmap)
        });

    match (composite, to_unicode) {
        (true, cmap) => FontDecoder::Composite(cmap.map(|c| (*c).clone())),
        (false, Some(cmap)) if !cmap.is_empty() => FontDecoder::SimpleMapped((*cmap).clone()),
        (false, _) => FontDecoder::Simple,
    }
}

/// Graphics-state part of the text state saved by `q`/`Q`
#[derive(Debug, Clone)]
struct TextState {
    font: Option<Arc<FontInfo>>,
    font_size: f32,
    leading: f32,
    ctm: Matrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 0.0,
            leading: 0.0,
            ctm: IDENTITY,
        }
    }
}

/// A span being accumulated
struct OpenSpan {
    text: String,
    size: f32,
    font: String,
    x: f32,
    y: f32,
}

struct SpanCollector<'a, 'c> {
    doc: &'a Document,
    cmaps: &'c mut CMapCache,
    state: TextState,
    saved: Vec<TextState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    depth: usize,
    open: Option<OpenSpan>,
    spans: Vec<TextSpan>,
}

impl<'a, 'c> SpanCollector<'a, 'c> {
    fn new(doc: &'a Document, cmaps: &'c mut CMapCache) -> Self {
        Self {
            doc,
            cmaps,
            state: TextState::default(),
            saved: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            depth: 0,
            open: None,
            spans: Vec::new(),
        }
    }

    fn run(&mut self, operations: &[Operation], resources: &Resources<'a>) {
        for operation in operations {
            self.apply(operation, resources);
        }
        self.close();
    }

    fn finish(mut self) -> Vec<TextSpan> {
        self.close();
        self.spans
    }

    fn apply(&mut self, operation: &Operation, resources: &Resources<'a>) {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "q" => self.saved.push(self.state.clone()),
            "Q" => {
                self.close();
                if let Some(state) = self.saved.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(matrix) = matrix_from(operands) {
                    self.close();
                    self.state.ctm = multiply(&matrix, &self.state.ctm);
                }
            }
            "Do" => {
                if let Some(Object::Name(key)) = operands.first() {
                    self.draw_form(key, resources);
                }
            }
            "BT" => {
                self.close();
                self.text_matrix = IDENTITY;
                self.line_matrix = IDENTITY;
            }
            "ET" => self.close(),
            "Tf" => {
                self.close();
                if let [Object::Name(key), size] = operands.as_slice() {
                    self.state.font = resources.fonts.get(key).cloned();
                    self.state.font_size = number(size).unwrap_or(0.0);
                    if self.state.font.is_none() {
                        log::debug!("Unknown font resource /{}", String::from_utf8_lossy(key));
                    }
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    self.state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty] = operands.as_slice() {
                    let (tx, ty) = (number(tx).unwrap_or(0.0), number(ty).unwrap_or(0.0));
                    if operation.operator == "TD" {
                        self.state.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(matrix) = matrix_from(operands) {
                    self.close();
                    self.text_matrix = matrix;
                    self.line_matrix = matrix;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items);
                }
            }
            _ => {}
        }
    }

    /// Run a form XObject as if its content were inlined inside `q`/`Q`
    fn draw_form(&mut self, key: &[u8], resources: &Resources<'a>) {
        let doc = self.doc;
        let Some(form) = resources.form(doc, key) else {
            return;
        };
        if self.depth >= MAX_FORM_DEPTH {
            log::debug!("Form /{} nested too deep", String::from_utf8_lossy(key));
            return;
        }

        let data = form
            .decompressed_content()
            .unwrap_or_else(|_| form.content.clone());
        let content = match decode_content(&data) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("Skipping form /{}: {}", String::from_utf8_lossy(key), e);
                return;
            }
        };

        let own_resources = lookup(doc, &form.dict, b"Resources")
            .and_then(|r| r.as_dict().ok())
            .map(|dict| Resources::load(doc, dict, self.cmaps));
        let form_resources = own_resources.as_ref().unwrap_or(resources);
        let form_matrix = lookup(doc, &form.dict, b"Matrix")
            .and_then(|m| m.as_array().ok())
            .and_then(|m| matrix_from(m))
            .unwrap_or(IDENTITY);

        self.close();
        let state = self.state.clone();
        let matrices = (self.text_matrix, self.line_matrix);
        let saved_len = self.saved.len();

        self.state.ctm = multiply(&form_matrix, &self.state.ctm);
        self.depth += 1;
        self.run(&content.operations, form_resources);
        self.depth -= 1;

        self.saved.truncate(saved_len);
        self.state = state;
        (self.text_matrix, self.line_matrix) = matrices;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.close();
        let [a, b, c, d, e, f] = self.line_matrix;
        self.line_matrix = [a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d];
        self.text_matrix = self.line_matrix;
    }

    fn show(&mut self, bytes: &[u8]) {
        let text = self.decode(bytes);
        self.open_span().text.push_str(&text);
    }

    fn show_array(&mut self, items: &[Object]) {
        for item in items {
            match item {
                Object::String(bytes, _) => self.show(bytes),
                other => {
                    let spaced = number(other).is_some_and(|adjust| adjust <= TJ_SPACE_THRESHOLD);
                    if spaced {
                        let span = self.open_span();
                        if !span.text.ends_with(' ') {
                            span.text.push(' ');
                        }
                    }
                }
            }
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match &self.state.font {
            Some(font) => font.decoder.decode(bytes),
            None => FontDecoder::Simple.decode(bytes),
        }
    }

    fn open_span(&mut self) -> &mut OpenSpan {
        let [_, _, c, d, e, f] = multiply(&self.text_matrix, &self.state.ctm);
        let scale = (c * c + d * d).sqrt();
        let size = if scale > 0.0 {
            self.state.font_size * scale
        } else {
            self.state.font_size
        };
        let font = self
            .state
            .font
            .as_ref()
            .map(|font| font.name.clone())
            .unwrap_or_default();

        self.open.get_or_insert_with(|| OpenSpan {
            text: String::new(),
            size,
            font,
            x: e,
            y: f,
        })
    }

    fn close(&mut self) {
        if let Some(span) = self.open.take() {
            if !span.text.is_empty() {
                self.spans.push(TextSpan {
                    text: span.text,
                    size: span.size,
                    font: span.font,
                    x: span.x,
                    y: span.y,
                });
            }
        }
    }
}
