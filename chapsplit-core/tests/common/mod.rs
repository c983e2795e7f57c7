//! Shared helpers for building small PDF documents in tests

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// Heading font size used by [`TestPdf::heading`]
pub const HEADING_SIZE: i64 = 24;

/// How a heading is drawn on its page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadingStyle {
    /// Bold font, shown directly in the page content
    Direct,
    /// Shown at `size` under a `cm` that scales by `scale`
    Scaled { size: i64, scale: f32 },
    /// Shown inside a form XObject with its own resources
    Form,
    /// Two-byte codes of a Type0 font decoded through its ToUnicode map
    Composite,
}

/// Builder for an in-memory test document
#[derive(Debug, Clone, Default)]
pub struct TestPdf {
    page_count: u32,
    headings: Vec<(u32, String, HeadingStyle)>,
    bookmarks: Vec<(u32, String, u32)>,
    scanned: bool,
    unreadable: bool,
    named_destinations: bool,
}

impl TestPdf {
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count,
            ..Self::default()
        }
    }

    /// Draw `title` in bold 24pt at the top of the 1-based `page`
    pub fn heading(self, page: u32, title: &str) -> Self {
        self.styled_heading(page, title, HeadingStyle::Direct)
    }

    /// Draw `title` at the top of the 1-based `page` the way `style` says
    pub fn styled_heading(mut self, page: u32, title: &str, style: HeadingStyle) -> Self {
        self.headings.push((page, title.to_string(), style));
        self
    }

    /// Add a bookmark; only levels 1 and 2 are supported
    pub fn bookmark(mut self, level: u32, title: &str, page: u32) -> Self {
        assert!(level == 1 || level == 2, "unsupported bookmark level");
        self.bookmarks.push((level, title.to_string(), page));
        self
    }

    /// Pages carry no text at all
    pub fn scanned(mut self) -> Self {
        self.scanned = true;
        self
    }

    /// Page content streams hold bytes that are not operators
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    /// Bookmarks point at named destinations in a `/Names /Dests` tree
    pub fn named_destinations(mut self) -> Self {
        self.named_destinations = true;
        self
    }

    pub fn build(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let composite = add_composite_font(&mut doc);

        let mut xobjects = Dictionary::new();
        for (page, title, style) in &self.headings {
            if *style == HeadingStyle::Form {
                xobjects.set(form_name(*page), add_heading_form(&mut doc, title));
            }
        }
        let resources = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => bold,
                "F2" => regular,
                "F3" => composite,
            },
            "XObject" => xobjects,
        });

        let mut page_ids = Vec::new();
        for number in 1..=self.page_count {
            let bytes = if self.unreadable {
                b"]]]] >> ))".to_vec()
            } else {
                let content = Content {
                    operations: self.page_operations(number),
                };
                content.encode().expect("encode content")
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_count as i64,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if !self.bookmarks.is_empty() {
            let outlines = self.add_outline(&mut doc, &page_ids);
            catalog.set("Outlines", outlines);
            if self.named_destinations {
                let names = self.add_name_tree(&mut doc, &page_ids);
                catalog.set("Names", dictionary! { "Dests" => names });
            }
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);
        doc
    }

    /// Build and save to `path`
    pub fn save(&self, path: &Path) -> PathBuf {
        let mut doc = self.build();
        doc.compress();
        doc.save(path).expect("save test document");
        path.to_path_buf()
    }

    fn page_operations(&self, number: u32) -> Vec<Operation> {
        if self.scanned {
            return Vec::new();
        }

        let heading = self.headings.iter().find(|(page, _, _)| *page == number);
        let mut operations = match heading {
            Some((_, title, style)) => heading_operations(number, title, *style),
            None => Vec::new(),
        };
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tf", vec!["F2".into(), 11.into()]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(format!("Body text of page {number}"))],
            ),
            Operation::new("ET", vec![]),
        ]);
        operations
    }

    fn destination(&self, index: usize, page: u32, page_ids: &[ObjectId]) -> Object {
        if self.named_destinations {
            Object::string_literal(format!("dest-{index}"))
        } else {
            let page_id = page_ids[(page - 1) as usize];
            Object::Array(vec![Object::Reference(page_id), "Fit".into()])
        }
    }

    fn add_name_tree(&self, doc: &mut Document, page_ids: &[ObjectId]) -> ObjectId {
        let mut names = Vec::new();
        for (index, (_, _, page)) in self.bookmarks.iter().enumerate() {
            let page_id = page_ids[(*page - 1) as usize];
            names.push(Object::string_literal(format!("dest-{index}")));
            names.push(Object::Array(vec![Object::Reference(page_id), "Fit".into()]));
        }
        // One leaf under a root with /Kids exercises the tree walk
        let leaf = doc.add_object(dictionary! { "Names" => names });
        doc.add_object(dictionary! { "Kids" => vec![Object::Reference(leaf)] })
    }

    fn add_outline(&self, doc: &mut Document, page_ids: &[ObjectId]) -> ObjectId {
        let outlines_id = doc.new_object_id();
        let item_ids: Vec<ObjectId> = self.bookmarks.iter().map(|_| doc.new_object_id()).collect();

        // (top-level index, children indexes)
        let mut tree: Vec<(usize, Vec<usize>)> = Vec::new();
        for (index, (level, _, _)) in self.bookmarks.iter().enumerate() {
            match tree.last_mut() {
                Some((_, children)) if *level == 2 => children.push(index),
                _ => tree.push((index, Vec::new())),
            }
        }

        let top: Vec<usize> = tree.iter().map(|(index, _)| *index).collect();
        for (index, children) in &tree {
            self.add_items(doc, &[*index], outlines_id, &item_ids, page_ids, Some(children));
        }
        self.link_siblings(doc, &top, &item_ids);
        for (parent, children) in &tree {
            if !children.is_empty() {
                self.add_items(doc, children, item_ids[*parent], &item_ids, page_ids, None);
                self.link_siblings(doc, children, &item_ids);
            }
        }

        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => item_ids[top[0]],
                "Last" => item_ids[top[top.len() - 1]],
                "Count" => top.len() as i64,
            }),
        );
        outlines_id
    }

    fn add_items(
        &self,
        doc: &mut Document,
        indexes: &[usize],
        parent: ObjectId,
        item_ids: &[ObjectId],
        page_ids: &[ObjectId],
        children: Option<&Vec<usize>>,
    ) {
        for &index in indexes {
            let (_, title, page) = &self.bookmarks[index];
            let mut item = dictionary! {
                "Title" => Object::string_literal(title.as_str()),
                "Parent" => parent,
                "Dest" => self.destination(index, *page, page_ids),
            };
            if let Some(children) = children.filter(|c| !c.is_empty()) {
                item.set("First", item_ids[children[0]]);
                item.set("Last", item_ids[children[children.len() - 1]]);
                item.set("Count", children.len() as i64);
            }
            doc.objects.insert(item_ids[index], Object::Dictionary(item));
        }
    }

    fn link_siblings(&self, doc: &mut Document, indexes: &[usize], item_ids: &[ObjectId]) {
        for pair in indexes.windows(2) {
            let (current, next) = (item_ids[pair[0]], item_ids[pair[1]]);
            if let Ok(Object::Dictionary(item)) = doc.get_object_mut(current) {
                item.set("Next", next);
            }
            if let Ok(Object::Dictionary(item)) = doc.get_object_mut(next) {
                item.set("Prev", current);
            }
        }
    }
}

fn form_name(page: u32) -> String {
    format!("H{page}")
}

fn show(title: &str) -> Operation {
    Operation::new("Tj", vec![Object::string_literal(title)])
}

fn heading_operations(page: u32, title: &str, style: HeadingStyle) -> Vec<Operation> {
    match style {
        HeadingStyle::Direct => vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), HEADING_SIZE.into()]),
            Operation::new("Td", vec![72.into(), 760.into()]),
            show(title),
            Operation::new("ET", vec![]),
        ],
        HeadingStyle::Scaled { size, scale } => {
            let scale = Object::Real(scale.into());
            vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![scale.clone(), 0.into(), 0.into(), scale, 0.into(), 0.into()],
                ),
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), size.into()]),
                Operation::new("Td", vec![72.into(), 760.into()]),
                show(title),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ]
        }
        HeadingStyle::Form => vec![
            Operation::new("q", vec![]),
            Operation::new("Do", vec![Object::Name(form_name(page).into_bytes())]),
            Operation::new("Q", vec![]),
        ],
        HeadingStyle::Composite => {
            let codes: Vec<u8> = title
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect();
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F3".into(), HEADING_SIZE.into()]),
                Operation::new("Td", vec![72.into(), 760.into()]),
                Operation::new("Tj", vec![Object::String(codes, StringFormat::Hexadecimal)]),
                Operation::new("ET", vec![]),
            ]
        }
    }
}

/// A form drawing `title` in its own bold font, placed by its `/Matrix`
fn add_heading_form(doc: &mut Document, title: &str) -> ObjectId {
    let font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Bold",
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["FH".into(), HEADING_SIZE.into()]),
            show(title),
            Operation::new("ET", vec![]),
        ],
    };
    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), 500.into(), 60.into()],
            "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), 760.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "FH" => font } },
        },
        content.encode().expect("encode form"),
    ))
}

/// Type0 font whose two-byte codes are UTF-16 code units of printable ASCII
fn add_composite_font(doc: &mut Document) -> ObjectId {
    let cmap = b"/CIDInit /ProcSet findresource begin\n\
12 dict begin\n\
begincmap\n\
1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
1 beginbfrange\n<0020> <007E> <0020>\nendbfrange\n\
endcmap\nend\nend\n";
    let to_unicode = doc.add_object(Stream::new(dictionary! {}, cmap.to_vec()));
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "QRSTUV+NotoSans-Bold",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
    });
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "QRSTUV+NotoSans-Bold",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(descendant)],
        "ToUnicode" => to_unicode,
    })
}

/// Number of pages in a saved document
pub fn page_count(path: &Path) -> usize {
    Document::load(path).expect("reopen output").get_pages().len()
}

/// Write a style configuration file into `dir`
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("chapters_config.md");
    fs::write(&path, content).expect("write config");
    path
}

/// Sorted file names in a directory
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read output dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
