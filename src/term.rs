//! Elixir Term Conversion Utilities
//!
//! Converts highlights, selections and options between Elixir maps and
//! their Rust counterparts.

use chrono::DateTime;
use rustler::{Atom, NewBinary, NifMap, Term};

use crate::config::HighlightOptions;
use crate::dom::NodeId;
use crate::error::{HighlightError, Result};
use crate::highlight::{Highlight, Selection, SelectionEvent, SelectionRange};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    none,
    mouse_up,
    key_up,
    highlight_captured,
}

/// `%{start, end, text, timestamp}` with the timestamp in unix millis
#[derive(Debug, Clone, PartialEq, Eq, NifMap)]
pub struct HighlightTerm {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub timestamp: i64,
}

impl From<&Highlight> for HighlightTerm {
    fn from(h: &Highlight) -> Self {
        HighlightTerm {
            start: h.start,
            end: h.end,
            text: h.text.clone(),
            timestamp: h.timestamp.timestamp_millis(),
        }
    }
}

impl TryFrom<HighlightTerm> for Highlight {
    type Error = HighlightError;

    fn try_from(term: HighlightTerm) -> Result<Self> {
        let timestamp =
            DateTime::from_timestamp_millis(term.timestamp).ok_or(HighlightError::InvalidTimestamp(term.timestamp))?;
        Ok(Highlight::with_timestamp(term.start, term.end, term.text, timestamp))
    }
}

#[derive(Debug, Clone, NifMap)]
pub struct RangeTerm {
    pub start_node: NodeId,
    pub start_offset: usize,
    pub end_node: NodeId,
    pub end_offset: usize,
}

#[derive(Debug, Clone, NifMap)]
pub struct SelectionTerm {
    pub collapsed: bool,
    pub anchor_node: NodeId,
    pub anchor_offset: usize,
    pub ranges: Vec<RangeTerm>,
}

impl From<SelectionTerm> for Selection {
    fn from(term: SelectionTerm) -> Self {
        Selection {
            collapsed: term.collapsed,
            anchor_node: term.anchor_node,
            anchor_offset: term.anchor_offset,
            ranges: term
                .ranges
                .into_iter()
                .map(|r| SelectionRange {
                    start_node: r.start_node,
                    start_offset: r.start_offset,
                    end_node: r.end_node,
                    end_offset: r.end_offset,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, NifMap)]
pub struct OptionsTerm {
    pub class_name: String,
    pub tag_name: String,
}

impl From<OptionsTerm> for HighlightOptions {
    fn from(term: OptionsTerm) -> Self {
        HighlightOptions::new(term.class_name, term.tag_name).normalized()
    }
}

/// Map an event atom; anything other than `:mouse_up` / `:key_up` is ignored
pub fn event_from_atom(event: Atom) -> SelectionEvent {
    if event == mouse_up() {
        SelectionEvent::MouseUp
    } else if event == key_up() {
        SelectionEvent::KeyUp
    } else {
        SelectionEvent::Other
    }
}

pub fn highlights_to_terms(highlights: &[Highlight]) -> Vec<HighlightTerm> {
    highlights.iter().map(HighlightTerm::from).collect()
}

/// Decode a batch, failing on the first unrepresentable timestamp
pub fn highlights_from_terms(terms: Vec<HighlightTerm>) -> Result<Vec<Highlight>> {
    terms.into_iter().map(Highlight::try_from).collect()
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: rustler::Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
