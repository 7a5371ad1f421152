//! Markup Event Types
//!
//! Event types for pull-parser style markup processing.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

/// Markup parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    /// Start of an element: <name attrs...>
    StartElement(StartElement<'a>),
    /// End of an element: </name>
    EndElement(&'a str),
    /// Empty element: <name attrs.../>
    EmptyElement(StartElement<'a>),
    /// Text content between tags (entities decoded)
    Text(Cow<'a, str>),
    /// CDATA section content
    CData(&'a str),
    /// Comment content
    Comment(&'a str),
    /// Processing instruction: <?target data?>
    ProcessingInstruction { target: &'a str, data: &'a str },
    /// DOCTYPE declaration body
    DocType(&'a str),
}

/// Start element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement<'a> {
    /// Full element name (may include prefix)
    pub name: &'a str,
    /// Element attributes
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    pub fn new(name: &'a str, attributes: Vec<Attribute<'a>>) -> Self {
        StartElement { name, attributes }
    }

    /// Get an attribute value by name
    pub fn get_attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_ref())
    }
}

impl<'a> MarkupEvent<'a> {
    /// Check if this is a start element event
    pub fn is_start_element(&self) -> bool {
        matches!(self, MarkupEvent::StartElement(_) | MarkupEvent::EmptyElement(_))
    }

    /// Get text content if applicable
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MarkupEvent::Text(t) => Some(t.as_ref()),
            MarkupEvent::CData(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_element_attribute_lookup() {
        let elem = StartElement::new("p", vec![Attribute::new("id", Cow::Borrowed("intro"))]);
        assert_eq!(elem.get_attribute_value("id"), Some("intro"));
        assert_eq!(elem.get_attribute_value("class"), None);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(MarkupEvent::Text(Cow::Borrowed("hi")).as_text(), Some("hi"));
        assert_eq!(MarkupEvent::CData("raw").as_text(), Some("raw"));
        assert_eq!(MarkupEvent::Comment("c").as_text(), None);
    }
}
