//! Slice Reader
//!
//! Turns tokens from a markup string into events. Names and raw bodies borrow
//! from the input; only text and attribute values with entities are copied.

use super::events::{MarkupEvent, StartElement};
use crate::core::attributes::parse_attributes;
use crate::core::entities::decode_text;
use crate::core::tokenizer::{TokenKind, Tokenizer};

/// Event reader over a markup string
pub struct SliceReader<'a> {
    tokenizer: Tokenizer<'a>,
}

impl<'a> SliceReader<'a> {
    pub fn new(input: &'a str) -> Self {
        SliceReader {
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Get the next markup event
    pub fn next_event(&mut self) -> Option<MarkupEvent<'a>> {
        let token = self.tokenizer.next_token()?;
        let name = token.name.unwrap_or("");
        let content = token.content.unwrap_or("");

        let event = match token.kind {
            TokenKind::StartTag => MarkupEvent::StartElement(StartElement::new(name, parse_attributes(content))),
            TokenKind::EmptyTag => MarkupEvent::EmptyElement(StartElement::new(name, parse_attributes(content))),
            TokenKind::EndTag => MarkupEvent::EndElement(name),
            TokenKind::Text => MarkupEvent::Text(decode_text(content)),
            TokenKind::CData => MarkupEvent::CData(content),
            TokenKind::Comment => MarkupEvent::Comment(content),
            TokenKind::ProcessingInstruction => MarkupEvent::ProcessingInstruction { target: name, data: content },
            TokenKind::DocType => MarkupEvent::DocType(content),
        };
        Some(event)
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = MarkupEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

/// Parse markup and return all events
pub fn parse_events(input: &str) -> Vec<MarkupEvent<'_>> {
    SliceReader::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let events = parse_events("<root>hello</root>");
        assert_eq!(events.len(), 3);

        assert!(matches!(&events[0], MarkupEvent::StartElement(e) if e.name == "root"));
        assert!(matches!(&events[1], MarkupEvent::Text(t) if t == "hello"));
        assert!(matches!(&events[2], MarkupEvent::EndElement(name) if *name == "root"));
    }

    #[test]
    fn test_empty_element_attributes() {
        let events = parse_events("<div id=\"main\" class=\"container\"/>");
        assert_eq!(events.len(), 1);

        if let MarkupEvent::EmptyElement(e) = &events[0] {
            assert_eq!(e.get_attribute_value("id"), Some("main"));
            assert_eq!(e.get_attribute_value("class"), Some("container"));
        } else {
            panic!("Expected EmptyElement");
        }
    }

    #[test]
    fn test_text_entities_decoded() {
        let events = parse_events("<p>a &lt; b</p>");
        assert_eq!(events[1].as_text(), Some("a < b"));
    }

    #[test]
    fn test_nested() {
        let events = parse_events("<a><b>text</b></a>");
        assert_eq!(events.len(), 5);
        assert!(events[1].is_start_element());
    }
}
