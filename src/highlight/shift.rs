//! Shift engine
//!
//! Re-aligns stored highlight offsets after the container text changes. Both
//! texts are walked in lockstep; on a mismatch a short lookahead decides
//! whether chars were deleted, inserted or substituted. This tracks small
//! local edits and is not a minimal edit-distance alignment.

use tracing::debug;

use super::store::Highlight;

/// How far ahead a mismatch looks for the texts to line up again
const RESYNC_WINDOW: usize = 8;

/// Chars that must agree after a candidate run for it to count
const RESYNC_CONFIRM: usize = 3;

/// An edit in old-text coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    /// Old chars `[at, at + len)` were removed
    Delete { at: usize, len: usize },
    /// `len` chars were inserted before old position `at`
    Insert { at: usize, len: usize },
}

/// Do `old[i..]` and `new[j..]` agree for the next few chars?
///
/// Near the end of either text, every remaining char must agree and both
/// tails must have the same length.
fn realigned(old: &[char], i: usize, new: &[char], j: usize) -> bool {
    if i > old.len() || j > new.len() {
        return false;
    }
    let (old_rest, new_rest) = (&old[i..], &new[j..]);
    let n = RESYNC_CONFIRM.min(old_rest.len()).min(new_rest.len());
    if n < RESYNC_CONFIRM && old_rest.len() != new_rest.len() {
        return false;
    }
    old_rest[..n] == new_rest[..n]
}

/// Walk both texts and collect the edits that turn `old` into `new`
fn align(old: &[char], new: &[char]) -> Vec<Edit> {
    let mut edits = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            i += 1;
            j += 1;
            continue;
        }

        if let Some(len) = (1..=RESYNC_WINDOW).find(|&k| realigned(old, i + k, new, j)) {
            edits.push(Edit::Delete { at: i, len });
            i += len;
        } else if let Some(len) = (1..=RESYNC_WINDOW).find(|&k| realigned(old, i, new, j + k)) {
            edits.push(Edit::Insert { at: i, len });
            j += len;
        } else {
            // Substitution: offsets are unaffected
            i += 1;
            j += 1;
        }
    }

    if i < old.len() {
        edits.push(Edit::Delete { at: i, len: old.len() - i });
    }
    if j < new.len() {
        edits.push(Edit::Insert { at: old.len(), len: new.len() - j });
    }
    edits
}

/// Adjusted `(start, end)` for a highlight at old offsets `(start, end)`
fn adjust(start: usize, end: usize, edits: &[Edit]) -> (usize, usize) {
    let (mut start_add, mut start_sub) = (0, 0);
    let (mut end_add, mut end_sub) = (0, 0);

    for edit in edits {
        match *edit {
            Edit::Delete { at, len } => {
                let to = at + len;
                start_sub += to.min(start).saturating_sub(at);
                end_sub += to.min(end).saturating_sub(at);
            }
            Edit::Insert { at, len } => {
                if at <= start {
                    start_add += len;
                    end_add += len;
                } else if at < end {
                    end_add += len;
                }
            }
        }
    }

    (
        start.saturating_add(start_add).saturating_sub(start_sub),
        end.saturating_add(end_add).saturating_sub(end_sub),
    )
}

/// Shift `highlights` in place from `old_text` offsets to `new_text` offsets.
///
/// No highlight is dropped and offsets never go below zero. Captured `text`
/// is left as it was.
pub fn shift_highlights(old_text: &str, new_text: &str, highlights: &mut [Highlight]) {
    if old_text == new_text || highlights.is_empty() {
        return;
    }

    let old: Vec<char> = old_text.chars().collect();
    let new: Vec<char> = new_text.chars().collect();
    let edits = align(&old, &new);

    for highlight in highlights.iter_mut() {
        let (start, end) = adjust(highlight.start, highlight.end, &edits);
        highlight.start = start;
        highlight.end = end;
    }

    debug!(edits = edits.len(), highlights = highlights.len(), "shifted highlights");
}

/// Shifted copies of `highlights`
pub fn shift(old_text: &str, new_text: &str, highlights: &[Highlight]) -> Vec<Highlight> {
    let mut shifted = highlights.to_vec();
    shift_highlights(old_text, new_text, &mut shifted);
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(start: usize, end: usize) -> Highlight {
        Highlight::new(start, end, "")
    }

    fn ranges(highlights: &[Highlight]) -> Vec<(usize, usize)> {
        highlights.iter().map(|h| (h.start, h.end)).collect()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_noop_edit() {
        let items = vec![h(0, 3), h(2, 9), h(7, 7), h(40, 50)];
        let shifted = shift("some text here", "some text here", &items);
        assert_eq!(shifted, items);
    }

    #[test]
    fn test_single_char_deletion() {
        let shifted = shift("abcdef", "abdef", &[h(4, 6)]);
        assert_eq!(ranges(&shifted), vec![(3, 5)]);
    }

    #[test]
    fn test_deletion_inside_and_before() {
        // "c" removed: before {4,6}, inside {1,4}, after {0,2}
        let shifted = shift("abcdef", "abdef", &[h(4, 6), h(1, 4), h(0, 2)]);
        assert_eq!(ranges(&shifted), vec![(3, 5), (1, 3), (0, 2)]);
    }

    #[test]
    fn test_insertion() {
        let shifted = shift("hello world", "hello big world", &[h(6, 11), h(0, 5), h(4, 8)]);
        assert_eq!(ranges(&shifted), vec![(10, 15), (0, 5), (4, 12)]);
    }

    #[test]
    fn test_multi_char_deletion() {
        let shifted = shift("the quick brown fox", "the brown fox", &[h(10, 15), h(4, 9)]);
        assert_eq!(ranges(&shifted), vec![(4, 9), (4, 4)]);
    }

    #[test]
    fn test_substitution_keeps_offsets() {
        let shifted = shift("abcdef", "abXdef", &[h(1, 5)]);
        assert_eq!(ranges(&shifted), vec![(1, 5)]);
    }

    #[test]
    fn test_tail_edits() {
        let shifted = shift("abcdef", "abc", &[h(1, 2), h(2, 6), h(4, 6)]);
        assert_eq!(ranges(&shifted), vec![(1, 2), (2, 3), (3, 3)]);

        let shifted = shift("abc", "abcdef", &[h(0, 3)]);
        assert_eq!(ranges(&shifted), vec![(0, 3)]);
    }

    #[test]
    fn test_never_negative_or_dropped() {
        let shifted = shift("abcdefghij", "", &[h(2, 8), h(9, 10)]);
        assert_eq!(ranges(&shifted), vec![(0, 0), (0, 0)]);
    }

    #[test]
    fn test_huge_offsets_saturate() {
        let shifted = shift("abc", "Xabc", &[h(usize::MAX - 1, usize::MAX)]);
        assert_eq!(ranges(&shifted), vec![(usize::MAX, usize::MAX)]);
    }

    #[test]
    fn test_align_edits() {
        assert_eq!(align(&chars("abcdef"), &chars("abdef")), vec![Edit::Delete { at: 2, len: 1 }]);
        assert_eq!(align(&chars("abcdef"), &chars("abXYcdef")), vec![Edit::Insert { at: 2, len: 2 }]);
        assert!(align(&chars("same"), &chars("same")).is_empty());
    }

    #[test]
    fn test_text_left_as_captured() {
        let item = Highlight::new(4, 6, "ef");
        let shifted = shift("abcdef", "abdef", &[item]);
        assert_eq!(shifted[0].text, "ef");
    }
}
