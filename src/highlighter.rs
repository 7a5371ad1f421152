//! Highlighter context
//!
//! Owns one container and its highlight set. The pristine `base` container is
//! never touched by rendering; `rendered` is rebuilt from it on every change,
//! so re-rendering never has to undo earlier markup.

use tracing::debug;

use crate::config::HighlightOptions;
use crate::dom::{Container, TextContainer};
use crate::error::Result;
use crate::highlight::{
    build_index, capture_highlight, render, shift_highlights, Highlight, HighlightSet, IndexNode, Selection,
    SelectionEvent,
};

/// Callback invoked with every highlight captured from a selection event
pub type SelectionCallback = Box<dyn FnMut(&Highlight) + Send>;

pub struct Highlighter {
    base: Container,
    rendered: Container,
    highlights: HighlightSet,
    options: HighlightOptions,
    subscribers: Vec<SelectionCallback>,
}

impl Highlighter {
    /// Parse `markup` into a new highlighter with an empty highlight set
    pub fn new(markup: &[u8], options: HighlightOptions) -> Result<Self> {
        let base = Container::parse(markup)?;
        Ok(Highlighter {
            rendered: base.clone(),
            base,
            highlights: HighlightSet::new(),
            options: options.normalized(),
            subscribers: Vec::new(),
        })
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Append highlights to the set and re-render.
    ///
    /// The whole batch is rejected, and nothing is appended, if any highlight
    /// is inverted or reaches past the end of the text.
    pub fn render_highlights<I>(&mut self, highlights: I) -> Result<usize>
    where
        I: IntoIterator<Item = Highlight>,
    {
        let batch: Vec<Highlight> = highlights.into_iter().collect();
        let text_len = self.base.text_content().chars().count();
        for highlight in &batch {
            highlight.validate(text_len)?;
        }

        self.highlights.extend(batch);
        Ok(self.rerender())
    }

    /// Clear the set and strip all highlight markup
    pub fn remove_highlights(&mut self) {
        self.highlights.clear();
        self.rendered = self.base.clone();
        debug!("removed all highlights");
    }

    /// Stored highlights in insertion order
    pub fn get_highlights(&self) -> &[Highlight] {
        self.highlights.as_slice()
    }

    /// Register a callback for captured selections.
    ///
    /// Callbacks run synchronously, in registration order, from
    /// [`Highlighter::handle_selection_event`]. A callback must not call back
    /// into this highlighter.
    pub fn on_selection_capture<F>(&mut self, callback: F)
    where
        F: FnMut(&Highlight) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Handle a host event that may end a selection gesture.
    ///
    /// On a mouse-up or key-up with a non-empty selection, the captured
    /// highlight is passed to every subscriber and returned. The highlight is
    /// not added to the set; that is up to the host.
    pub fn handle_selection_event(&mut self, event: SelectionEvent, selection: &Selection) -> Option<Highlight> {
        if !event.is_qualifying() {
            return None;
        }
        let highlight = self.capture(selection)?;
        for callback in self.subscribers.iter_mut() {
            callback(&highlight);
        }
        Some(highlight)
    }

    /// Capture a selection over the rendered container without notifying
    pub fn capture(&self, selection: &Selection) -> Option<Highlight> {
        capture_highlight(&self.index(), selection)
    }

    /// Replace the container content, shift stored highlights to the new
    /// text and re-render.
    pub fn update_content(&mut self, markup: &[u8]) -> Result<usize> {
        let base = Container::parse(markup)?;
        let old_text = self.base.text_content();
        let new_text = base.text_content();

        shift_highlights(&old_text, &new_text, self.highlights.as_mut_slice());
        self.base = base;
        Ok(self.rerender())
    }

    /// Rendered container as markup
    pub fn markup(&self) -> String {
        self.rendered.to_markup()
    }

    /// Flattened text of the container
    pub fn text_content(&self) -> String {
        self.rendered.text_content()
    }

    /// Fresh index over the rendered container; node ids match selections
    pub fn index(&self) -> IndexNode {
        build_index(&self.rendered, self.rendered.root_id(), 0)
    }

    pub fn rendered(&self) -> &Container {
        &self.rendered
    }

    /// Rebuild `rendered` from `base` with every stored highlight
    fn rerender(&mut self) -> usize {
        let mut rendered = self.base.clone();
        let tree = build_index(&rendered, rendered.root_id(), 0);
        let highlights = self.highlights.sorted();
        let replaced = render(&mut rendered, &tree, &highlights, &self.options);
        self.rendered = rendered;
        replaced
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("highlights", &self.highlights.len())
            .field("options", &self.options)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HighlightError;
    use crate::highlight::SelectionRange;
    use std::sync::{Arc, Mutex};

    fn highlighter(markup: &str) -> Highlighter {
        crate::log::test();
        Highlighter::new(markup.as_bytes(), HighlightOptions::default()).unwrap()
    }

    fn select(hl: &Highlighter, leaf: usize, from: usize, to: usize) -> Selection {
        let node = hl.index().leaves().nth(leaf).unwrap().node;
        Selection {
            collapsed: false,
            anchor_node: node,
            anchor_offset: from,
            ranges: vec![SelectionRange { start_node: node, start_offset: from, end_node: node, end_offset: to }],
        }
    }

    #[test]
    fn test_render_and_get() {
        let mut hl = highlighter("<p>hello world</p>");
        let replaced = hl.render_highlights([Highlight::new(2, 8, "llo wo")]).unwrap();
        assert_eq!(replaced, 1);
        assert_eq!(hl.get_highlights().len(), 1);
        assert_eq!(hl.text_content(), "hello world");
        assert_eq!(
            hl.markup(),
            "<p><span>he<span class=\"is-highlighted\">llo wo</span>rld</span></p>"
        );
    }

    #[test]
    fn test_rerender_does_not_stack_markup() {
        let mut hl = highlighter("<p>abcdefgh</p>");
        hl.render_highlights([Highlight::new(1, 6, "")]).unwrap();
        hl.render_highlights([Highlight::new(3, 8, "")]).unwrap();
        let markup = hl.markup();
        assert_eq!(markup.matches("class=\"is-highlighted\"").count(), 2);
        assert_eq!(hl.rendered().find_by_class("is-highlighted").len(), 2);
        assert_eq!(hl.text_content(), "abcdefgh");
    }

    #[test]
    fn test_remove_clears_state() {
        let markup = "<p>hello <b>world</b></p>";
        let mut hl = highlighter(markup);
        hl.render_highlights([Highlight::new(0, 11, "hello world")]).unwrap();
        hl.remove_highlights();
        assert!(hl.get_highlights().is_empty());
        assert!(hl.rendered().find_by_class("is-highlighted").is_empty());
        assert_eq!(hl.markup(), markup);
    }

    #[test]
    fn test_malformed_batch_rejected() {
        let mut hl = highlighter("<p>abc</p>");
        let err = hl
            .render_highlights([Highlight::new(0, 1, ""), Highlight::new(2, 1, "")])
            .unwrap_err();
        assert_eq!(err, HighlightError::InvertedRange { start: 2, end: 1 });
        assert!(hl.get_highlights().is_empty());

        let err = hl.render_highlights([Highlight::new(0, 4, "")]).unwrap_err();
        assert_eq!(err, HighlightError::OutOfBounds { end: 4, len: 3 });
    }

    #[test]
    fn test_selection_event_notifies_in_order() {
        let mut hl = highlighter("<p>The quick fox</p>");
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            hl.on_selection_capture(move |h| seen.lock().unwrap().push((tag, h.text.clone())));
        }

        let sel = select(&hl, 0, 4, 9);
        assert_eq!(hl.subscriber_count(), 2);
        assert!(hl.handle_selection_event(SelectionEvent::Other, &sel).is_none());

        let captured = hl.handle_selection_event(SelectionEvent::MouseUp, &sel).unwrap();
        assert_eq!((captured.start, captured.end), (4, 9));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", "quick".to_string()), ("second", "quick".to_string())]
        );
        // Capture does not store
        assert!(hl.get_highlights().is_empty());
    }

    #[test]
    fn test_capture_over_rendered_markup() {
        let mut hl = highlighter("<p>abcdef</p>");
        hl.render_highlights([Highlight::new(1, 3, "bc")]).unwrap();
        // Leaves now: "a", "bc", "def"
        let sel = select(&hl, 2, 1, 3);
        let h = hl.capture(&sel).unwrap();
        assert_eq!((h.start, h.end, h.text.as_str()), (4, 6, "ef"));
    }

    #[test]
    fn test_update_content_shifts() {
        let mut hl = highlighter("<p>abcdef</p>");
        hl.render_highlights([Highlight::new(4, 6, "ef")]).unwrap();
        hl.update_content(b"<p>abdef</p>").unwrap();

        let h = &hl.get_highlights()[0];
        assert_eq!((h.start, h.end), (3, 5));
        assert_eq!(
            hl.markup(),
            "<p><span>abd<span class=\"is-highlighted\">ef</span></span></p>"
        );
    }

    #[test]
    fn test_custom_options() {
        let options = HighlightOptions::new("hl", "mark");
        let mut hl = Highlighter::new(b"<p>abc</p>", options).unwrap();
        assert_eq!(hl.options().tag_name, "mark");
        hl.render_highlights([Highlight::new(0, 1, "a")]).unwrap();
        assert_eq!(hl.markup(), "<p><mark><mark class=\"hl\">a</mark>bc</mark></p>");
    }

    #[test]
    fn test_invalid_markup_rejected() {
        assert!(matches!(
            Highlighter::new(b"\xc3\x28", HighlightOptions::default()),
            Err(HighlightError::InvalidUtf8(0))
        ));
    }
}
