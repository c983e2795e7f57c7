//! Outline (bookmark) reading

use super::encoding::decode_text_string;
use super::{catalog, lookup, resolve};
use crate::chapter::OutlineEntry;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};

/// Outlines nested deeper than this are cut off
const MAX_DEPTH: u32 = 64;

/// Name trees nested deeper than this are treated as broken
const MAX_NAME_TREE_DEPTH: u32 = 32;

/// Flatten the document outline into `(level, title, page)` entries.
///
/// Entries whose destination does not resolve to a page of this document are
/// dropped.
pub(super) fn read_outline(doc: &Document, pages: &HashMap<ObjectId, u32>) -> Vec<OutlineEntry> {
    let Some(first) = catalog(doc)
        .and_then(|catalog| lookup(doc, catalog, b"Outlines"))
        .and_then(|outlines| outlines.as_dict().ok())
        .and_then(|outlines| outlines.get(b"First").and_then(Object::as_reference).ok())
    else {
        return Vec::new();
    };

    let reader = OutlineReader { doc, pages };
    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    reader.walk(first, 1, &mut entries, &mut visited);
    entries
}

struct OutlineReader<'a> {
    doc: &'a Document,
    pages: &'a HashMap<ObjectId, u32>,
}

impl<'a> OutlineReader<'a> {
    fn walk(
        &self,
        first: ObjectId,
        level: u32,
        entries: &mut Vec<OutlineEntry>,
        visited: &mut HashSet<ObjectId>,
    ) {
        if level > MAX_DEPTH {
            log::warn!("Outline nested deeper than {MAX_DEPTH} levels; ignoring the rest");
            return;
        }

        let mut current = Some(first);
        while let Some(id) = current {
            if !visited.insert(id) {
                log::warn!("Outline item {:?} visited twice; stopping", id);
                return;
            }
            let Ok(item) = self.doc.get_dictionary(id) else {
                log::debug!("Outline item {:?} is not a dictionary", id);
                return;
            };

            let title = lookup(self.doc, item, b"Title")
                .and_then(|title| title.as_str().ok())
                .map(decode_text_string)
                .unwrap_or_default();

            match self.item_page(item) {
                Some(page) => entries.push(OutlineEntry::new(level, title, page)),
                None => log::debug!("Bookmark '{}' has no resolvable page", title),
            }

            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                self.walk(child, level + 1, entries, visited);
            }
            current = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    /// 1-based page of an outline item, from `/Dest` or a GoTo action
    fn item_page(&self, item: &Dictionary) -> Option<u32> {
        if let Some(dest) = lookup(self.doc, item, b"Dest") {
            return self.destination_page(dest, true);
        }

        let action = lookup(self.doc, item, b"A")?.as_dict().ok()?;
        let kind = lookup(self.doc, action, b"S").and_then(|s| s.as_name().ok());
        if kind != Some(b"GoTo".as_slice()) {
            return None;
        }
        self.destination_page(lookup(self.doc, action, b"D")?, true)
    }

    fn destination_page(&self, dest: &Object, follow_names: bool) -> Option<u32> {
        match dest {
            Object::Array(items) => match items.first()? {
                Object::Reference(page) => self.pages.get(page).copied(),
                Object::Integer(index) => u32::try_from(*index).ok().map(|i| i + 1),
                _ => None,
            },
            // Named destination entries may wrap the array in a dictionary
            Object::Dictionary(dict) => self.destination_page(lookup(self.doc, dict, b"D")?, false),
            Object::Name(name) | Object::String(name, _) if follow_names => {
                let target = self.named_destination(name)?;
                self.destination_page(target, false)
            }
            _ => None,
        }
    }

    /// Look a name up in the catalog `/Dests` dictionary or `/Names /Dests` tree
    fn named_destination(&self, name: &[u8]) -> Option<&'a Object> {
        let catalog = catalog(self.doc)?;

        if let Some(dests) = lookup(self.doc, catalog, b"Dests").and_then(|d| d.as_dict().ok()) {
            if let Some(found) = lookup(self.doc, dests, name) {
                return Some(found);
            }
        }

        let tree = lookup(self.doc, catalog, b"Names")
            .and_then(|names| names.as_dict().ok())
            .and_then(|names| lookup(self.doc, names, b"Dests"))
            .and_then(|tree| tree.as_dict().ok())?;
        self.search_name_tree(tree, name, 0)
    }

    fn search_name_tree(
        &self,
        node: &'a Dictionary,
        name: &[u8],
        depth: u32,
    ) -> Option<&'a Object> {
        if depth > MAX_NAME_TREE_DEPTH {
            return None;
        }

        if let Some(names) = lookup(self.doc, node, b"Names").and_then(|n| n.as_array().ok()) {
            for pair in names.chunks_exact(2) {
                let key = resolve(self.doc, &pair[0]).and_then(|k| k.as_str().ok());
                if key == Some(name) {
                    return resolve(self.doc, &pair[1]);
                }
            }
        }

        let kids = lookup(self.doc, node, b"Kids").and_then(|k| k.as_array().ok())?;
        kids.iter()
            .filter_map(|kid| resolve(self.doc, kid).and_then(|k| k.as_dict().ok()))
            .find_map(|kid| self.search_name_tree(kid, name, depth + 1))
    }
}
