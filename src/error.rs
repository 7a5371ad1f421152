//! Error types shared by the container, the highlight engine and the NIF layer.

use thiserror::Error;

/// Errors raised at the highlighter's API boundary.
///
/// Everything past the boundary is best-effort: lookups that fail during
/// capture or rendering are logged and skipped rather than surfaced here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// Container markup could not be decoded
    #[error("markup is not valid UTF-8 (at byte {0})")]
    InvalidUtf8(usize),

    /// A highlight whose start lies after its end
    #[error("highlight start {start} is after its end {end}")]
    InvertedRange { start: usize, end: usize },

    /// A highlight reaching past the end of the container text
    #[error("highlight end {end} exceeds text length {len}")]
    OutOfBounds { end: usize, len: usize },

    /// A timestamp the host sent that cannot be represented
    #[error("invalid highlight timestamp: {0}")]
    InvalidTimestamp(i64),

    /// The resource mutex was poisoned by a panicking caller
    #[error("mutex_poisoned")]
    Poisoned,
}

pub type Result<T, E = HighlightError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = HighlightError::InvertedRange { start: 5, end: 2 };
        assert_eq!(err.to_string(), "highlight start 5 is after its end 2");

        let err = HighlightError::OutOfBounds { end: 12, len: 11 };
        assert_eq!(err.to_string(), "highlight end 12 exceeds text length 11");

        assert_eq!(HighlightError::Poisoned.to_string(), "mutex_poisoned");
    }
}
