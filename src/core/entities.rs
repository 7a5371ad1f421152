//! Entity decoding and escaping for container markup
//!
//! Handles the markup entities found in leaf text and attribute values:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - A handful of common HTML named entities (&nbsp;, &mdash;, ...)
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow so text without entities is never copied.

use memchr::memchr;
use std::borrow::Cow;

/// Decode entity references in text content
///
/// Returns Borrowed if no entities are present, Owned otherwise.
/// Unknown or unterminated references are kept verbatim.
#[inline]
pub fn decode_text(input: &str) -> Cow<'_, str> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

fn decode_entities(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(amp_offset) = memchr(b'&', &bytes[pos..]) {
        let amp = pos + amp_offset;
        result.push_str(&input[pos..amp]);

        let decoded = memchr(b';', &bytes[amp..])
            .and_then(|semi| decode_entity(&input[amp + 1..amp + semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                result.push(c);
                pos = amp + semi + 1;
            }
            None => {
                result.push('&');
                pos = amp + 1;
            }
        }
    }

    result.push_str(&input[pos..]);
    result
}

/// Decode a single entity body (without & and ;)
fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        return decode_numeric_entity(numeric);
    }

    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        "copy" => Some('\u{00A9}'),
        "reg" => Some('\u{00AE}'),
        "trade" => Some('\u{2122}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        "hellip" => Some('\u{2026}'),
        _ => None,
    }
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let codepoint = match entity.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => entity.parse::<u32>().ok()?,
    };
    char::from_u32(codepoint)
}

/// Escape text content for markup output
pub fn encode_text(input: &str) -> Cow<'_, str> {
    encode_with(input, false)
}

/// Escape an attribute value for double-quoted markup output
pub fn encode_attribute(input: &str) -> Cow<'_, str> {
    encode_with(input, true)
}

fn encode_with(input: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = input
        .bytes()
        .any(|b| matches!(b, b'<' | b'>' | b'&') || (quotes && b == b'"'));
    if !needs_escape {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' if quotes => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let result = decode_text("Hello, World!");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_basic_entities() {
        let result = decode_text("&lt;hello&gt; &amp; &quot;world&quot;");
        assert_eq!(result, "<hello> & \"world\"");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_text("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_text("&#x1F600;"), "😀");
    }

    #[test]
    fn test_unknown_and_unterminated() {
        assert_eq!(decode_text("&unknown;"), "&unknown;");
        assert_eq!(decode_text("fish & chips"), "fish & chips");
    }

    #[test]
    fn test_encode_text_keeps_quotes() {
        assert_eq!(encode_text("<a> & \"b\""), "&lt;a&gt; &amp; \"b\"");
        assert!(matches!(encode_text("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_encode_attribute() {
        assert_eq!(encode_attribute("say \"hi\" & go"), "say &quot;hi&quot; &amp; go");
    }
}
