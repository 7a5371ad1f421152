//! Highlight records and the persistent highlight set

use chrono::{DateTime, Utc};

use crate::error::{HighlightError, Result};

/// A `[start, end)` range over the flattened container text.
///
/// `text` is the substring captured at creation time. It is not re-derived
/// after a shift, so it can drift from the live text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Highlight {
    /// Create a highlight stamped with the current time
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Highlight::with_timestamp(start, end, text, Utc::now())
    }

    pub fn with_timestamp(start: usize, end: usize, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Highlight {
            start,
            end,
            text: text.into(),
            timestamp,
        }
    }

    /// Number of offsets covered; 0 for inverted ranges
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the range against a container text of `text_len` chars
    pub fn validate(&self, text_len: usize) -> Result<()> {
        if self.start > self.end {
            return Err(HighlightError::InvertedRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > text_len {
            return Err(HighlightError::OutOfBounds {
                end: self.end,
                len: text_len,
            });
        }
        Ok(())
    }
}

/// Order by ascending start, shorter ranges first on ties
pub fn sort_highlights(highlights: &mut [Highlight]) {
    highlights.sort_by(|a, b| a.start.cmp(&b.start).then(a.len().cmp(&b.len())));
}

/// Insertion-ordered highlights owned by one highlighter.
///
/// Highlights are distinct by identity, not range: duplicates are kept.
/// There is no removal by range; [`HighlightSet::clear`] is the only reset.
#[derive(Debug, Clone, Default)]
pub struct HighlightSet {
    items: Vec<Highlight>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, highlight: Highlight) {
        self.items.push(highlight);
    }

    pub fn extend<I: IntoIterator<Item = Highlight>>(&mut self, highlights: I) {
        self.items.extend(highlights);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Highlight> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Highlight] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [Highlight] {
        &mut self.items
    }

    /// Copy of the set in render order
    pub fn sorted(&self) -> Vec<Highlight> {
        let mut sorted = self.items.clone();
        sort_highlights(&mut sorted);
        sorted
    }
}

impl<'a> IntoIterator for &'a HighlightSet {
    type Item = &'a Highlight;
    type IntoIter = std::slice::Iter<'a, Highlight>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(start: usize, end: usize) -> Highlight {
        Highlight::new(start, end, "")
    }

    #[test]
    fn test_sort_by_start_then_length() {
        let mut items = vec![h(5, 9), h(2, 8), h(2, 4), h(0, 1)];
        sort_highlights(&mut items);
        let ranges: Vec<_> = items.iter().map(|h| (h.start, h.end)).collect();
        assert_eq!(ranges, vec![(0, 1), (2, 4), (2, 8), (5, 9)]);
    }

    #[test]
    fn test_set_keeps_insertion_order_and_duplicates() {
        let mut set = HighlightSet::new();
        set.push(h(4, 6));
        set.extend(vec![h(0, 2), h(4, 6)]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.as_slice()[0].start, 4);
        assert_eq!(set.sorted()[0].start, 0);
        assert_eq!(set.iter().filter(|h| h.start == 4).count(), 2);
        let ends: Vec<_> = (&set).into_iter().map(|h| h.end).collect();
        assert_eq!(ends, vec![6, 2, 6]);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(h(0, 5).validate(5).is_ok());
        assert!(h(3, 3).validate(3).is_ok());
        assert_eq!(
            h(4, 2).validate(10),
            Err(HighlightError::InvertedRange { start: 4, end: 2 })
        );
        assert_eq!(h(0, 11).validate(10), Err(HighlightError::OutOfBounds { end: 11, len: 10 }));
    }

    #[test]
    fn test_len_saturates() {
        assert_eq!(h(2, 8).len(), 6);
        assert_eq!(h(8, 2).len(), 0);
    }
}
