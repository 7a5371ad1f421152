//! Highlight engine
//!
//! - index: flat-offset index tree over a text container
//! - store: highlight records and the persistent highlight set
//! - selection: host selection to highlight mapping
//! - render: overlap clipping, boundary maps and marker markup
//! - shift: offset re-alignment after the container text changes
//!
//! All offsets count `char`s of the container's flattened text.

pub mod index;
pub mod render;
pub mod selection;
pub mod shift;
pub mod store;

pub use index::{build_index, IndexNode, Internal, Leaf};
pub use render::{render, MarkupToken};
pub use selection::{capture_highlight, Selection, SelectionEvent, SelectionRange};
pub use shift::{shift, shift_highlights};
pub use store::{sort_highlights, Highlight, HighlightSet};

/// Substring of `text` between char offsets `start` and `end`.
///
/// Offsets past the end are clamped.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |offset: usize| text.char_indices().nth(offset).map_or(text.len(), |(i, _)| i);
    let from = byte_at(start);
    let to = byte_at(end.max(start));
    &text[from..to]
}
