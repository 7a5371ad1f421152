//! Highlighter configuration

/// Default class applied to highlight markers
pub const DEFAULT_CLASS_NAME: &str = "is-highlighted";

/// Default element name for markers and leaf wrappers
pub const DEFAULT_TAG_NAME: &str = "span";

/// Controls the markup the renderer emits.
///
/// Each rendered leaf is swapped for a `<tag_name>` wrapper; every highlight
/// marker inside it is a `<tag_name class="class_name">` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
    pub class_name: String,
    pub tag_name: String,
}

impl HighlightOptions {
    pub fn new(class_name: impl Into<String>, tag_name: impl Into<String>) -> Self {
        HighlightOptions {
            class_name: class_name.into(),
            tag_name: tag_name.into(),
        }
    }

    /// Fill blank fields from the defaults
    pub fn normalized(mut self) -> Self {
        if self.class_name.trim().is_empty() {
            self.class_name = DEFAULT_CLASS_NAME.to_string();
        }
        if self.tag_name.trim().is_empty() {
            self.tag_name = DEFAULT_TAG_NAME.to_string();
        }
        self
    }
}

impl Default for HighlightOptions {
    fn default() -> Self {
        HighlightOptions::new(DEFAULT_CLASS_NAME, DEFAULT_TAG_NAME)
    }
}
