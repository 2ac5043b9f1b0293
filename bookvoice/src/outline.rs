//! Outline flattening and chapter-boundary resolution.
//!
//! A PDF outline is a tree of possibly-titled, possibly-linked nodes.
//! This module turns that tree into an ordered list of chapter markers
//! (title + 1-based start page) and derives half-open page ranges from
//! consecutive markers. Unusable entries are logged and dropped; nothing
//! here aborts processing of the remaining entries.

use lopdf::ObjectId;
use thiserror::Error;

/// Marker title appended after the last real chapter to bound its range.
pub const END_SENTINEL: &str = "__END__";

/// Destination reference carried by an outline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dest {
    /// Direct reference to a page object.
    Page(ObjectId),
    /// Named destination. Resolving these requires a name-tree lookup
    /// this resolver does not perform; they are filtered out before
    /// resolution is attempted.
    Named(String),
}

/// A node in the document outline tree, as read from the PDF.
#[derive(Debug, Clone, Default)]
pub struct OutlineNode {
    pub title: Option<String>,
    pub dest: Option<Dest>,
    pub children: Vec<OutlineNode>,
}

/// A usable outline entry produced by pre-order flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    /// Trimmed title
    pub title: String,
    pub dest: Dest,
    /// Depth in the original tree (root = 0)
    pub level: usize,
}

/// A chapter boundary: title and 1-based start page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMarker {
    pub title: String,
    pub start_page: u32,
}

/// A chapter's page range, half-open: pages `start_page..end_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRange {
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
}

/// Errors from resolving a destination reference to a page index.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("destination points outside the page tree: object {0:?}")]
    UnknownPage(ObjectId),

    #[error("named destination \"{0}\" is not supported")]
    NamedDestination(String),
}

/// Document-wide destination lookup capability.
///
/// Passed explicitly into [`resolve_chapters`] so resolution is testable
/// against a fake lookup table.
pub trait PageLookup {
    /// Resolve a destination to a zero-based page index.
    fn page_index(&self, dest: &Dest) -> Result<u32, ResolutionError>;

    /// Total number of pages in the document.
    fn page_count(&self) -> u32;
}

/// Flatten an outline tree into pre-order entries.
///
/// Nodes with an absent/empty title or no destination emit nothing, but
/// their children are still visited (skipping never prunes a subtree).
/// Uses an explicit work stack; outlines can nest arbitrarily deep.
pub fn flatten(nodes: &[OutlineNode]) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    let mut stack: Vec<(&OutlineNode, usize)> =
        nodes.iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, level)) = stack.pop() {
        if let (Some(title), Some(dest)) = (&node.title, &node.dest) {
            let title = title.trim();
            if !title.is_empty() {
                entries.push(FlatEntry {
                    title: title.to_string(),
                    dest: dest.clone(),
                    level,
                });
            }
        }

        // Reverse push keeps siblings in source order on the pop side
        for child in node.children.iter().rev() {
            stack.push((child, level + 1));
        }
    }

    entries
}

/// Resolve flattened entries to chapter markers.
///
/// Entries with named (string) destinations are silently discarded; the
/// rest are resolved one at a time, with failures logged and omitted.
/// Markers keep traversal order and are not re-sorted by page number.
/// If anything resolved, a `__END__` sentinel at `page_count + 1` is
/// appended to bound the last chapter.
pub fn resolve_chapters<L: PageLookup>(doc: &L, entries: &[FlatEntry]) -> Vec<ChapterMarker> {
    let mut markers = Vec::new();

    for entry in entries
        .iter()
        .filter(|e| matches!(e.dest, Dest::Page(_)))
    {
        match doc.page_index(&entry.dest) {
            Ok(index) => markers.push(ChapterMarker {
                title: entry.title.clone(),
                start_page: index + 1,
            }),
            Err(err) => {
                log::warn!("skipping unresolved outline entry \"{}\": {}", entry.title, err);
            }
        }
    }

    if !markers.is_empty() {
        markers.push(ChapterMarker {
            title: END_SENTINEL.to_string(),
            start_page: doc.page_count() + 1,
        });
    }

    markers
}

/// Derive half-open chapter ranges from consecutive markers.
///
/// The sentinel terminates the last real range and is never emitted as a
/// range of its own. Fewer than two markers means no usable chapters.
/// Start pages are taken as-is; a non-monotonic outline can produce an
/// empty range, which simply yields no pages downstream.
pub fn derive_ranges(markers: &[ChapterMarker]) -> Vec<ChapterRange> {
    if markers.len() < 2 {
        return Vec::new();
    }

    markers
        .windows(2)
        .map(|pair| ChapterRange {
            title: pair[0].title.clone(),
            start_page: pair[0].start_page,
            end_page: pair[1].start_page,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Fake lookup backed by a table of page object -> zero-based index.
    struct FakeLookup {
        pages: HashMap<ObjectId, u32>,
        page_count: u32,
    }

    impl FakeLookup {
        fn new(pages: &[(ObjectId, u32)], page_count: u32) -> Self {
            Self {
                pages: pages.iter().copied().collect(),
                page_count,
            }
        }
    }

    impl PageLookup for FakeLookup {
        fn page_index(&self, dest: &Dest) -> Result<u32, ResolutionError> {
            match dest {
                Dest::Page(id) => self
                    .pages
                    .get(id)
                    .copied()
                    .ok_or(ResolutionError::UnknownPage(*id)),
                Dest::Named(name) => Err(ResolutionError::NamedDestination(name.clone())),
            }
        }

        fn page_count(&self) -> u32 {
            self.page_count
        }
    }

    fn node(title: &str, dest: Option<Dest>, children: Vec<OutlineNode>) -> OutlineNode {
        OutlineNode {
            title: Some(title.to_string()),
            dest,
            children,
        }
    }

    fn page(id: u32) -> Dest {
        Dest::Page((id, 0))
    }

    #[test]
    fn test_flatten_preserves_preorder() {
        // A(B, C(D)) -> [A, B, C, D] at levels [0, 1, 0, 1]
        let tree = vec![
            node("A", Some(page(1)), vec![node("B", Some(page(2)), vec![])]),
            node("C", Some(page(3)), vec![node("D", Some(page(4)), vec![])]),
        ];

        let entries = flatten(&tree);
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        let levels: Vec<usize> = entries.iter().map(|e| e.level).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
        assert_eq!(levels, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_flatten_parent_before_descendants_before_next_sibling() {
        let tree = vec![
            node(
                "Part I",
                Some(page(1)),
                vec![
                    node("Ch 1", Some(page(2)), vec![]),
                    node("Ch 2", Some(page(3)), vec![]),
                ],
            ),
            node("Part II", Some(page(4)), vec![]),
        ];

        let titles: Vec<String> = flatten(&tree).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Part I", "Ch 1", "Ch 2", "Part II"]);
    }

    #[test]
    fn test_flatten_skips_titleless_but_keeps_children() {
        // A(X(B)) where X has no title: yields [A, B], B at level 2
        let untitled = OutlineNode {
            title: None,
            dest: Some(page(5)),
            children: vec![node("B", Some(page(6)), vec![])],
        };
        let tree = vec![node("A", Some(page(1)), vec![untitled])];

        let entries = flatten(&tree);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "A");
        assert_eq!(entries[0].level, 0);
        assert_eq!(entries[1].title, "B");
        assert_eq!(entries[1].level, 2);
    }

    #[test]
    fn test_flatten_skips_empty_title_and_missing_dest() {
        let tree = vec![
            node("   ", Some(page(1)), vec![]),
            node("No dest", None, vec![node("Kept", Some(page(2)), vec![])]),
        ];

        let entries = flatten(&tree);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Kept");
        assert_eq!(entries[0].level, 1);
    }

    #[test]
    fn test_flatten_trims_titles() {
        let tree = vec![node("  Chapter 1  ", Some(page(1)), vec![])];
        assert_eq!(flatten(&tree)[0].title, "Chapter 1");
    }

    #[test]
    fn test_flatten_empty_input() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_flatten_deep_nesting() {
        // 2_000 levels; the explicit work stack keeps call depth flat
        let mut tree = node("Leaf", Some(page(1)), vec![]);
        for i in 0..2_000 {
            tree = node(&format!("N{}", i), Some(page(2)), vec![tree]);
        }

        let entries = flatten(std::slice::from_ref(&tree));
        assert_eq!(entries.len(), 2_001);
        assert_eq!(entries.last().unwrap().title, "Leaf");
        assert_eq!(entries.last().unwrap().level, 2_000);
    }

    #[test]
    fn test_resolve_omits_failures_without_aborting() {
        // E1 -> page index 3, E2 fails, E3 -> page index 10
        let lookup = FakeLookup::new(&[((1, 0), 3), ((3, 0), 10)], 50);
        let entries = vec![
            FlatEntry { title: "E1".into(), dest: page(1), level: 0 },
            FlatEntry { title: "E2".into(), dest: page(2), level: 0 },
            FlatEntry { title: "E3".into(), dest: page(3), level: 0 },
        ];

        let markers = resolve_chapters(&lookup, &entries);
        assert_eq!(
            markers,
            vec![
                ChapterMarker { title: "E1".into(), start_page: 4 },
                ChapterMarker { title: "E3".into(), start_page: 11 },
                ChapterMarker { title: END_SENTINEL.into(), start_page: 51 },
            ]
        );
    }

    #[test]
    fn test_resolve_filters_named_destinations() {
        let lookup = FakeLookup::new(&[((1, 0), 0)], 20);
        let entries = vec![
            FlatEntry {
                title: "Named".into(),
                dest: Dest::Named("chapter.1".into()),
                level: 0,
            },
            FlatEntry { title: "Real".into(), dest: page(1), level: 0 },
        ];

        let markers = resolve_chapters(&lookup, &entries);
        assert_eq!(markers.len(), 2); // Real + sentinel
        assert_eq!(markers[0].title, "Real");
    }

    #[test]
    fn test_sentinel_start_page() {
        let lookup = FakeLookup::new(&[((1, 0), 0), ((2, 0), 24)], 50);
        let entries = vec![
            FlatEntry { title: "A".into(), dest: page(1), level: 0 },
            FlatEntry { title: "B".into(), dest: page(2), level: 0 },
        ];

        let markers = resolve_chapters(&lookup, &entries);
        let sentinel = markers.last().unwrap();
        assert_eq!(sentinel.title, END_SENTINEL);
        assert_eq!(sentinel.start_page, 51);
    }

    #[test]
    fn test_resolve_keeps_traversal_order_not_page_order() {
        let lookup = FakeLookup::new(&[((1, 0), 30), ((2, 0), 5)], 40);
        let entries = vec![
            FlatEntry { title: "Late".into(), dest: page(1), level: 0 },
            FlatEntry { title: "Early".into(), dest: page(2), level: 1 },
        ];

        let markers = resolve_chapters(&lookup, &entries);
        assert_eq!(markers[0].title, "Late");
        assert_eq!(markers[0].start_page, 31);
        assert_eq!(markers[1].title, "Early");
        assert_eq!(markers[1].start_page, 6);
    }

    #[test]
    fn test_resolve_empty_entries_no_sentinel() {
        let lookup = FakeLookup::new(&[], 50);
        assert!(resolve_chapters(&lookup, &[]).is_empty());
    }

    #[test]
    fn test_resolve_all_failures_no_sentinel() {
        let lookup = FakeLookup::new(&[], 50);
        let entries = vec![FlatEntry { title: "Gone".into(), dest: page(9), level: 0 }];
        assert!(resolve_chapters(&lookup, &entries).is_empty());
    }

    #[test]
    fn test_derive_ranges_boundary() {
        let markers = vec![
            ChapterMarker { title: "T1".into(), start_page: 1 },
            ChapterMarker { title: "T2".into(), start_page: 5 },
            ChapterMarker { title: END_SENTINEL.into(), start_page: 9 },
        ];

        let ranges = derive_ranges(&markers);
        assert_eq!(ranges.len(), markers.len() - 1);
        assert_eq!(
            ranges,
            vec![
                ChapterRange { title: "T1".into(), start_page: 1, end_page: 5 },
                ChapterRange { title: "T2".into(), start_page: 5, end_page: 9 },
            ]
        );
    }

    #[test]
    fn test_derive_ranges_single_chapter_covers_document() {
        let lookup = FakeLookup::new(&[((1, 0), 0)], 20);
        let entries = vec![FlatEntry { title: "Only".into(), dest: page(1), level: 0 }];

        let markers = resolve_chapters(&lookup, &entries);
        let ranges = derive_ranges(&markers);
        assert_eq!(
            ranges,
            vec![ChapterRange { title: "Only".into(), start_page: 1, end_page: 21 }]
        );
    }

    #[test]
    fn test_derive_ranges_fewer_than_two_markers() {
        assert!(derive_ranges(&[]).is_empty());
        assert!(
            derive_ranges(&[ChapterMarker { title: "X".into(), start_page: 3 }]).is_empty()
        );
    }
}
