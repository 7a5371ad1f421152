//! Attribute Parsing
//!
//! Parses attributes from the raw attribute region of a start tag.

use super::entities::decode_text;
use super::tokenizer::{is_name_char, is_name_start_char};
use memchr::memchr;
use std::borrow::Cow;

/// A parsed attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: &'a str,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, str>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a str, value: Cow<'a, str>) -> Self {
        Attribute { name, value }
    }
}

/// Parse attributes from raw tag content (after the element name).
///
/// Lenient: boolean attributes get an empty value, unquoted values run to the
/// next whitespace, and bytes that cannot start a name are skipped.
pub fn parse_attributes(input: &str) -> Vec<Attribute<'_>> {
    let bytes = input.as_bytes();
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        if !is_name_start_char(bytes[pos]) {
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'=' {
            attrs.push(Attribute::new(name, Cow::Borrowed("")));
            continue;
        }
        pos += 1; // Skip '='

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            attrs.push(Attribute::new(name, Cow::Borrowed("")));
            break;
        }

        let quote = bytes[pos];
        if quote == b'"' || quote == b'\'' {
            let value_start = pos + 1;
            let value_end = memchr(quote, &bytes[value_start..])
                .map(|offset| value_start + offset)
                .unwrap_or(bytes.len());
            attrs.push(Attribute::new(name, decode_text(&input[value_start..value_end])));
            pos = value_end + 1;
        } else {
            let value_start = pos;
            while pos < bytes.len() && !is_whitespace(bytes[pos]) {
                pos += 1;
            }
            attrs.push(Attribute::new(name, decode_text(&input[value_start..pos])));
        }
    }

    attrs
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_values() {
        let attrs = parse_attributes(" id=\"main\" class='a b'");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "id");
        assert_eq!(attrs[0].value, "main");
        assert_eq!(attrs[1].value, "a b");
    }

    #[test]
    fn test_entities_in_value() {
        let attrs = parse_attributes(" title=\"a &amp; b\"");
        assert_eq!(attrs[0].value, "a & b");
    }

    #[test]
    fn test_boolean_and_unquoted() {
        let attrs = parse_attributes(" hidden data-x=1");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0], Attribute::new("hidden", Cow::Borrowed("")));
        assert_eq!(attrs[1].name, "data-x");
        assert_eq!(attrs[1].value, "1");
    }
}
