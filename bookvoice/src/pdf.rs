//! PDF document access via lopdf: loading, outline reading, page lookup,
//! and per-page text extraction.

use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::outline::{Dest, OutlineNode, PageLookup, ResolutionError};

/// Outline trees deeper than this are truncated. Real books stay in the
/// single digits; malformed files can chain indefinitely.
const MAX_OUTLINE_DEPTH: usize = 64;

/// A loaded PDF book.
pub struct PdfBook {
    doc: Document,
    /// Page object id -> 1-based page number
    page_numbers: HashMap<ObjectId, u32>,
}

impl PdfBook {
    /// Load a PDF from disk and index its page tree.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path)
            .with_context(|| format!("Failed to load PDF: {}", path.display()))?;

        let page_numbers = doc
            .get_pages()
            .iter()
            .map(|(number, id)| (*id, *number))
            .collect();

        Ok(Self { doc, page_numbers })
    }

    /// Total page count.
    pub fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    /// Extract the text content of a single page (1-based).
    pub fn page_text(&self, page: u32) -> Result<String> {
        self.doc
            .extract_text(&[page])
            .with_context(|| format!("Failed to extract text from page {}", page))
    }

    /// Read the document outline (table of contents), or an empty vec if
    /// the document has none.
    pub fn outline(&self) -> Vec<OutlineNode> {
        let Ok(catalog) = self.doc.catalog() else {
            return Vec::new();
        };
        let Ok(outlines_obj) = catalog.get(b"Outlines") else {
            return Vec::new();
        };
        let Some(outlines) = self.resolve_dict(outlines_obj) else {
            return Vec::new();
        };

        let mut visited = HashSet::new();
        self.read_siblings(outlines.get(b"First").ok(), 0, &mut visited)
    }

    /// Walk a First/Next sibling chain, reading each item and its subtree.
    fn read_siblings(
        &self,
        first: Option<&Object>,
        depth: usize,
        visited: &mut HashSet<ObjectId>,
    ) -> Vec<OutlineNode> {
        if depth > MAX_OUTLINE_DEPTH {
            log::warn!("outline nesting exceeds {} levels, truncating", MAX_OUTLINE_DEPTH);
            return Vec::new();
        }

        let mut nodes = Vec::new();
        let mut current = first.cloned();

        while let Some(obj) = current {
            // Guard against reference cycles in malformed outlines
            if let Object::Reference(id) = obj {
                if !visited.insert(id) {
                    log::warn!("cycle detected in outline at object {:?}", id);
                    break;
                }
            }

            let Some(item) = self.resolve_dict(&obj) else {
                break;
            };

            let title = item
                .get(b"Title")
                .ok()
                .and_then(|t| self.resolve_object(t))
                .and_then(|t| t.as_str().ok().map(decode_text_string));

            let children = self.read_siblings(item.get(b"First").ok(), depth + 1, visited);

            nodes.push(OutlineNode {
                title,
                dest: self.read_dest(item),
                children,
            });

            current = item.get(b"Next").ok().cloned();
        }

        nodes
    }

    /// Read an outline item's destination, from either a direct `/Dest`
    /// or a GoTo action's `/D`.
    fn read_dest(&self, item: &Dictionary) -> Option<Dest> {
        let target = item.get(b"Dest").ok().or_else(|| {
            let action = self.resolve_dict(item.get(b"A").ok()?)?;
            action.get(b"D").ok()
        })?;

        self.dest_from_object(target)
    }

    fn dest_from_object(&self, obj: &Object) -> Option<Dest> {
        match obj {
            // Explicit destination: [pageRef /XYZ left top zoom]
            Object::Array(items) => match items.first()? {
                Object::Reference(id) => Some(Dest::Page(*id)),
                _ => None,
            },
            Object::Name(name) => Some(Dest::Named(String::from_utf8_lossy(name).into_owned())),
            Object::String(bytes, _) => Some(Dest::Named(decode_text_string(bytes))),
            Object::Reference(id) => {
                self.dest_from_object(self.doc.get_object(*id).ok()?)
            }
            _ => None,
        }
    }

    /// Follow a reference (if any) and return the object itself.
    fn resolve_object<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    /// Follow a reference (if any) down to a dictionary.
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        self.resolve_object(obj)?.as_dict().ok()
    }
}

impl PageLookup for PdfBook {
    fn page_index(&self, dest: &Dest) -> Result<u32, ResolutionError> {
        match dest {
            Dest::Page(id) => self
                .page_numbers
                .get(id)
                .map(|number| number - 1)
                .ok_or(ResolutionError::UnknownPage(*id)),
            Dest::Named(name) => Err(ResolutionError::NamedDestination(name.clone())),
        }
    }

    fn page_count(&self) -> u32 {
        self.page_count()
    }
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, otherwise
/// treated as a byte string.
fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
