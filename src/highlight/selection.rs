//! Selection mapping
//!
//! Converts a host selection (node + local offset pairs) into a flat-offset
//! highlight and the exact substring it covers.

use tracing::{debug, warn};

use super::char_slice;
use super::index::{IndexNode, Leaf};
use super::store::Highlight;
use crate::dom::NodeId;

/// One selected range, as node + local char offset pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start_node: NodeId,
    pub start_offset: usize,
    pub end_node: NodeId,
    pub end_offset: usize,
}

/// A host selection snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub collapsed: bool,
    pub anchor_node: NodeId,
    pub anchor_offset: usize,
    pub ranges: Vec<SelectionRange>,
}

impl Selection {
    /// A non-collapsed selection with at least one range
    pub fn is_range(&self) -> bool {
        !self.collapsed && !self.ranges.is_empty()
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }
}

/// Host events that may end a selection gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    MouseUp,
    KeyUp,
    Other,
}

impl SelectionEvent {
    /// Whether this event should trigger a capture
    pub fn is_qualifying(self) -> bool {
        matches!(self, SelectionEvent::MouseUp | SelectionEvent::KeyUp)
    }
}

/// Concatenate the selected text over a leaf range
fn selected_text(leaves: &[&Leaf], range: &SelectionRange) -> String {
    match leaves {
        [] => String::new(),
        [only] => {
            let mut from = range.start_offset.min(only.len);
            let mut to = range.end_offset.min(only.len);
            if from > to {
                std::mem::swap(&mut from, &mut to);
            }
            char_slice(&only.text, from, to).to_string()
        }
        [first, interior @ .., last] => {
            let mut text = String::new();
            text.push_str(char_slice(&first.text, range.start_offset.min(first.len), first.len));
            for leaf in interior {
                text.push_str(&leaf.text);
            }
            text.push_str(char_slice(&last.text, 0, range.end_offset.min(last.len)));
            text
        }
    }
}

/// Capture the first range of `selection` as a highlight.
///
/// Returns None for collapsed selections and for ranges that cover no text.
/// An anchor missing from `tree` is logged and the start falls back to the
/// range walk.
pub fn capture_highlight(tree: &IndexNode, selection: &Selection) -> Option<Highlight> {
    if !selection.is_range() {
        return None;
    }
    if selection.range_count() > 1 {
        warn!(
            ranges = selection.range_count(),
            "multi-range selection, only the first range is captured"
        );
    }
    let range = selection.ranges.first()?;

    let leaves = tree.leaf_range(range.start_node, range.end_node);
    let text = selected_text(&leaves, range);
    if text.is_empty() {
        debug!(start_node = range.start_node, end_node = range.end_node, "selection covers no text");
        return None;
    }

    let start = match tree.find_by_node(selection.anchor_node) {
        Some(anchor) => anchor.start() + selection.anchor_offset.min(anchor.len()),
        None => {
            warn!(anchor = selection.anchor_node, "selection anchor not found in index");
            let first = leaves.first()?;
            first.start + range.start_offset.min(first.len)
        }
    };
    let end = start + text.chars().count();

    debug!(start, end, "captured selection");
    Some(Highlight::new(start, end, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Container, TextContainer};
    use crate::highlight::index::build_index;

    fn setup(markup: &str) -> (IndexNode, Vec<NodeId>) {
        let doc = Container::parse_str(markup);
        let tree = build_index(&doc, doc.root_id(), 0);
        let nodes = tree.leaves().map(|l| l.node).collect();
        (tree, nodes)
    }

    fn selection(anchor: (NodeId, usize), range: SelectionRange) -> Selection {
        Selection {
            collapsed: false,
            anchor_node: anchor.0,
            anchor_offset: anchor.1,
            ranges: vec![range],
        }
    }

    #[test]
    fn test_single_leaf_capture() {
        let (tree, nodes) = setup("<p>The quick fox</p>");
        let sel = selection(
            (nodes[0], 4),
            SelectionRange { start_node: nodes[0], start_offset: 4, end_node: nodes[0], end_offset: 9 },
        );
        let h = capture_highlight(&tree, &sel).unwrap();
        assert_eq!((h.start, h.end, h.text.as_str()), (4, 9, "quick"));
    }

    #[test]
    fn test_capture_uses_leaf_start() {
        let (tree, nodes) = setup("<h1>Title</h1><p>The quick fox</p>");
        let sel = selection(
            (nodes[1], 4),
            SelectionRange { start_node: nodes[1], start_offset: 4, end_node: nodes[1], end_offset: 9 },
        );
        let h = capture_highlight(&tree, &sel).unwrap();
        assert_eq!((h.start, h.end, h.text.as_str()), (9, 14, "quick"));
    }

    #[test]
    fn test_multi_leaf_capture() {
        let (tree, nodes) = setup("<p>one <b>two</b> three</p>");
        let sel = selection(
            (nodes[0], 2),
            SelectionRange { start_node: nodes[0], start_offset: 2, end_node: nodes[2], end_offset: 3 },
        );
        let h = capture_highlight(&tree, &sel).unwrap();
        assert_eq!(h.text, "e two th");
        assert_eq!((h.start, h.end), (2, 10));
    }

    #[test]
    fn test_collapsed_and_empty_yield_none() {
        let (tree, nodes) = setup("<p>abc</p>");
        let range = SelectionRange { start_node: nodes[0], start_offset: 1, end_node: nodes[0], end_offset: 1 };

        let mut sel = selection((nodes[0], 1), range);
        assert!(capture_highlight(&tree, &sel).is_none());

        sel.collapsed = true;
        assert!(capture_highlight(&tree, &sel).is_none());

        sel.collapsed = false;
        sel.ranges.clear();
        assert!(capture_highlight(&tree, &sel).is_none());
    }

    #[test]
    fn test_unresolved_anchor_falls_back_to_range() {
        let (tree, nodes) = setup("<p>ab</p><p>cdef</p>");
        let sel = selection(
            (9999, 0),
            SelectionRange { start_node: nodes[1], start_offset: 1, end_node: nodes[1], end_offset: 3 },
        );
        let h = capture_highlight(&tree, &sel).unwrap();
        assert_eq!((h.start, h.end, h.text.as_str()), (3, 5, "de"));
    }

    #[test]
    fn test_only_first_range_used() {
        let (tree, nodes) = setup("<p>abcdef</p>");
        let mut sel = selection(
            (nodes[0], 0),
            SelectionRange { start_node: nodes[0], start_offset: 0, end_node: nodes[0], end_offset: 2 },
        );
        sel.ranges.push(SelectionRange { start_node: nodes[0], start_offset: 3, end_node: nodes[0], end_offset: 6 });
        let h = capture_highlight(&tree, &sel).unwrap();
        assert_eq!(h.text, "ab");
    }

    #[test]
    fn test_offsets_clamped_and_reversed() {
        let (tree, nodes) = setup("<p>abc</p>");
        let sel = selection(
            (nodes[0], 1),
            SelectionRange { start_node: nodes[0], start_offset: 40, end_node: nodes[0], end_offset: 1 },
        );
        let h = capture_highlight(&tree, &sel).unwrap();
        assert_eq!((h.start, h.end, h.text.as_str()), (1, 3, "bc"));
    }

    #[test]
    fn test_qualifying_events() {
        assert!(SelectionEvent::MouseUp.is_qualifying());
        assert!(SelectionEvent::KeyUp.is_qualifying());
        assert!(!SelectionEvent::Other.is_qualifying());
    }

    #[test]
    fn test_selection_matches_container_text() {
        let doc = Container::parse_str("<div><p>alpha</p><p>beta</p></div>");
        let tree = build_index(&doc, doc.root_id(), 0);
        let nodes: Vec<_> = tree.leaves().map(|l| l.node).collect();
        let sel = selection(
            (nodes[0], 3),
            SelectionRange { start_node: nodes[0], start_offset: 3, end_node: nodes[1], end_offset: 2 },
        );
        let h = capture_highlight(&tree, &sel).unwrap();
        let text: String = doc.text_content().chars().skip(h.start).take(h.len()).collect();
        assert_eq!(text, h.text);
    }
}
