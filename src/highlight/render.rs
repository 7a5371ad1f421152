//! Overlap renderer
//!
//! For each leaf, highlights touching the leaf are clipped to its bounds and
//! turned into a flat token stream of marker opens, closes and text runs.
//! Markers are anonymous, so a close always ends the innermost open marker;
//! the per-character nesting depth is what the markup encodes.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::index::{IndexNode, Leaf};
use super::store::Highlight;
use crate::config::HighlightOptions;
use crate::dom::{NodeId, TextContainer};

/// One piece of a rendered leaf fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken {
    /// Open a highlight marker
    Open,
    /// Close the innermost open marker
    Close,
    /// A run of literal text
    Text(String),
}

/// A highlight restricted to one leaf, in flat offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedRange {
    pub start: usize,
    pub end: usize,
}

impl ClippedRange {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Marker counts at a single offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boundary {
    pub starts: usize,
    pub ends: usize,
}

/// Clip every highlight touching `[leaf_start, leaf_end]`, widest first.
///
/// Both bounds are inclusive, so a highlight that ends exactly where the
/// leaf starts (or starts where it ends) yields a zero-width range.
pub fn relevant_ranges(leaf_start: usize, leaf_end: usize, highlights: &[Highlight]) -> Vec<ClippedRange> {
    let mut ranges: Vec<ClippedRange> = highlights
        .iter()
        .filter(|h| {
            let starts_inside = (leaf_start..=leaf_end).contains(&h.start);
            let ends_inside = (leaf_start..=leaf_end).contains(&h.end);
            let spans = h.start < leaf_start && h.end > leaf_end;
            starts_inside || ends_inside || spans
        })
        .filter_map(|h| {
            let start = leaf_start.max(h.start);
            let end = leaf_end.min(h.end);
            (start <= end).then_some(ClippedRange { start, end })
        })
        .collect();

    ranges.sort_by(|a, b| b.len().cmp(&a.len()));
    ranges
}

/// Per-offset start and end counts for a leaf's clipped ranges
pub fn boundary_map(ranges: &[ClippedRange]) -> BTreeMap<usize, Boundary> {
    let mut map: BTreeMap<usize, Boundary> = BTreeMap::new();
    for range in ranges {
        map.entry(range.start).or_default().starts += 1;
        map.entry(range.end).or_default().ends += 1;
    }
    map
}

/// Build the token stream for one leaf.
///
/// Returns None when the leaf is left as-is: whitespace-only text, or no
/// relevant highlight.
pub fn leaf_markup(leaf: &Leaf, highlights: &[Highlight]) -> Option<Vec<MarkupToken>> {
    if leaf.text.trim().is_empty() {
        return None;
    }

    let leaf_end = leaf.start + leaf.len;
    let ranges = relevant_ranges(leaf.start, leaf_end, highlights);
    if ranges.is_empty() {
        return None;
    }
    let boundaries = boundary_map(&ranges);

    let mut tokens = Vec::with_capacity(boundaries.len() * 2 + 1);
    let mut run = String::new();
    let mut chars = leaf.text.chars();

    for offset in leaf.start..=leaf_end {
        if let Some(boundary) = boundaries.get(&offset) {
            if !run.is_empty() {
                tokens.push(MarkupToken::Text(std::mem::take(&mut run)));
            }
            tokens.extend(std::iter::repeat_n(MarkupToken::Open, boundary.starts));
            tokens.extend(std::iter::repeat_n(MarkupToken::Close, boundary.ends));
        }
        if let Some(c) = chars.next() {
            run.push(c);
        }
    }
    if !run.is_empty() {
        tokens.push(MarkupToken::Text(run));
    }

    trace!(node = leaf.node, ranges = ranges.len(), "leaf markup");
    Some(tokens)
}

/// Render `highlights` onto `container`, swapping each affected leaf for its
/// marker markup.
///
/// Every fragment is computed from the `tree` snapshot before the container
/// is touched. Returns the number of leaves replaced.
pub fn render<C: TextContainer + ?Sized>(
    container: &mut C,
    tree: &IndexNode,
    highlights: &[Highlight],
    options: &HighlightOptions,
) -> usize {
    if highlights.is_empty() {
        return 0;
    }

    let fragments: Vec<(NodeId, Vec<MarkupToken>)> = tree
        .leaves()
        .filter_map(|leaf| leaf_markup(leaf, highlights).map(|tokens| (leaf.node, tokens)))
        .collect();

    let mut replaced = 0;
    for (node, tokens) in &fragments {
        if container.replace_with_fragment(*node, tokens, options).is_some() {
            replaced += 1;
        }
    }

    debug!(highlights = highlights.len(), leaves = replaced, "rendered highlights");
    replaced
}
