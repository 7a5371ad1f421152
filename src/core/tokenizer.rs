//! Markup Tokenizer - pull tokenizer over container markup
//!
//! Extracts the tokens a highlight container can contain:
//! - Element start/end/empty tags
//! - Text content (raw, entities still encoded)
//! - CDATA sections
//! - Comments
//! - Processing instructions
//! - DOCTYPE declarations
//!
//! The tokenizer is lenient: a `<` that does not open a well-formed construct
//! is reported as text, so every byte of input lands in exactly one token.
//! Unlike document parsing, whitespace is never skipped; it is leaf text.

use memchr::{memchr, memchr3};

/// Type of markup token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Empty element: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
    /// Processing instruction: <?target ...?>
    ProcessingInstruction,
    /// DOCTYPE declaration
    DocType,
}

/// A markup token borrowing from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags and PIs: the name or target
    pub name: Option<&'a str>,
    /// Raw body: text, comment/CDATA/PI content, or the attribute region of a tag
    pub content: Option<&'a str>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: &'a str) -> Self {
        self.content = Some(content);
        self
    }
}

/// Pull tokenizer over a UTF-8 markup string
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer { input, pos: 0 }
    }

    /// Current byte position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the next token, or None at end of input
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let bytes = self.input.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }

        if bytes[self.pos] == b'<' {
            if let Some(token) = self.parse_markup(self.pos) {
                self.pos = token.span.1;
                return Some(token);
            }
            // Not markup: a literal '<' that joins the following text
            let start = self.pos;
            let end = self.text_end(start + 1);
            self.pos = end;
            return Some(self.text_token(start, end));
        }

        let start = self.pos;
        let end = self.text_end(start);
        self.pos = end;
        Some(self.text_token(start, end))
    }

    fn text_token(&self, start: usize, end: usize) -> Token<'a> {
        Token::new(TokenKind::Text, (start, end)).with_content(&self.input[start..end])
    }

    /// End of a text run beginning at `from`: the next '<' or end of input
    fn text_end(&self, from: usize) -> usize {
        let bytes = self.input.as_bytes();
        memchr(b'<', &bytes[from..])
            .map(|offset| from + offset)
            .unwrap_or(bytes.len())
    }

    /// Try to parse a markup construct starting at '<'
    fn parse_markup(&self, start: usize) -> Option<Token<'a>> {
        let rest = &self.input[start + 1..];
        match rest.as_bytes().first()? {
            b'/' => self.parse_end_tag(start),
            b'!' => self.parse_bang_markup(start),
            b'?' => self.parse_pi(start),
            _ => self.parse_start_tag(start),
        }
    }

    fn parse_start_tag(&self, start: usize) -> Option<Token<'a>> {
        let name_start = start + 1;
        let name_end = self.read_name(name_start)?;
        let close = self.find_tag_end_quoted(name_end)?;

        let is_empty = close > name_end && self.input.as_bytes()[close - 1] == b'/';
        let attr_end = if is_empty { close - 1 } else { close };
        let kind = if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag };

        Some(
            Token::new(kind, (start, close + 1))
                .with_name(&self.input[name_start..name_end])
                .with_content(&self.input[name_end..attr_end]),
        )
    }

    fn parse_end_tag(&self, start: usize) -> Option<Token<'a>> {
        let name_start = start + 2;
        let name_end = self.read_name(name_start)?;
        let close = name_end + memchr(b'>', &self.input.as_bytes()[name_end..])?;

        Some(Token::new(TokenKind::EndTag, (start, close + 1)).with_name(&self.input[name_start..name_end]))
    }

    fn parse_bang_markup(&self, start: usize) -> Option<Token<'a>> {
        let rest = &self.input[start + 2..];

        if let Some(body) = rest.strip_prefix("--") {
            let content_start = start + 4;
            let len = body.find("-->")?;
            let end = content_start + len;
            return Some(
                Token::new(TokenKind::Comment, (start, end + 3)).with_content(&self.input[content_start..end]),
            );
        }

        if let Some(body) = rest.strip_prefix("[CDATA[") {
            let content_start = start + 9;
            let len = body.find("]]>")?;
            let end = content_start + len;
            return Some(
                Token::new(TokenKind::CData, (start, end + 3)).with_content(&self.input[content_start..end]),
            );
        }

        if rest.len() >= 7 && rest.as_bytes()[..7].eq_ignore_ascii_case(b"DOCTYPE") {
            let end = self.find_doctype_end(start + 9)?;
            return Some(
                Token::new(TokenKind::DocType, (start, end + 1)).with_content(&self.input[start + 9..end]),
            );
        }

        None
    }

    fn parse_pi(&self, start: usize) -> Option<Token<'a>> {
        let name_start = start + 2;
        let name_end = self.read_name(name_start)?;
        let len = self.input[name_end..].find("?>")?;
        let end = name_end + len;

        Some(
            Token::new(TokenKind::ProcessingInstruction, (start, end + 2))
                .with_name(&self.input[name_start..name_end])
                .with_content(self.input[name_end..end].trim_start()),
        )
    }

    /// Read a name starting at `from`, returning its end position
    fn read_name(&self, from: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        if !bytes.get(from).copied().is_some_and(is_name_start_char) {
            return None;
        }
        let mut pos = from + 1;
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        Some(pos)
    }

    /// Find the closing '>' of a tag, skipping over quoted attribute values
    fn find_tag_end_quoted(&self, from: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut pos = from;
        loop {
            let offset = memchr3(b'>', b'"', b'\'', &bytes[pos..])?;
            pos += offset;
            match bytes[pos] {
                b'>' => return Some(pos),
                quote => {
                    let closing = memchr(quote, &bytes[pos + 1..])?;
                    pos += closing + 2;
                }
            }
        }
    }

    /// Find the end of a DOCTYPE, honouring an internal subset in brackets
    fn find_doctype_end(&self, from: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut depth = 0usize;
        for (offset, &b) in bytes[from..].iter().enumerate() {
            match b {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Some(from + offset),
                _ => {}
            }
        }
        None
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Check if a byte can start a name.
/// Non-ASCII bytes are allowed as they may be UTF-8 encoded letters.
#[inline]
pub fn is_name_start_char(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b':' || c >= 0x80
}

#[inline]
pub fn is_name_char(c: u8) -> bool {
    is_name_start_char(c) || c.is_ascii_digit() || c == b'-' || c == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_element() {
        let tokens: Vec<_> = Tokenizer::new("<p>hello</p>").collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::StartTag);
        assert_eq!(tokens[0].name, Some("p"));
        assert_eq!(tokens[1].content, Some("hello"));
        assert_eq!(tokens[2].kind, TokenKind::EndTag);
        assert_eq!(tokens[2].span, (8, 12));
    }

    #[test]
    fn test_position_tracks_consumed_input() {
        let mut tokenizer = Tokenizer::new("<p>hi</p>");
        assert_eq!(tokenizer.position(), 0);
        tokenizer.next_token();
        assert_eq!(tokenizer.position(), 3);
        tokenizer.next_token();
        assert_eq!(tokenizer.position(), 5);
    }

    #[test]
    fn test_whitespace_is_text() {
        assert_eq!(
            kinds("  <a> </a>\n"),
            vec![TokenKind::Text, TokenKind::StartTag, TokenKind::Text, TokenKind::EndTag, TokenKind::Text]
        );
    }

    #[test]
    fn test_empty_tag_with_quoted_gt() {
        let tokens: Vec<_> = Tokenizer::new("<img alt=\"a > b\"/>").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::EmptyTag);
        assert_eq!(tokens[0].content, Some(" alt=\"a > b\""));
    }

    #[test]
    fn test_comment_cdata_pi_doctype() {
        assert_eq!(
            kinds("<!DOCTYPE html><?pi data?><!-- c --><![CDATA[x<y]]>"),
            vec![
                TokenKind::DocType,
                TokenKind::ProcessingInstruction,
                TokenKind::Comment,
                TokenKind::CData,
            ]
        );
        let cdata = Tokenizer::new("<![CDATA[x<y]]>").next().unwrap();
        assert_eq!(cdata.content, Some("x<y"));
    }

    #[test]
    fn test_stray_lt_is_text() {
        let tokens: Vec<_> = Tokenizer::new("a < b").collect();
        let text: String = tokens.iter().filter_map(|t| t.content).collect();
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
        assert_eq!(text, "a < b");
    }

    #[test]
    fn test_unterminated_comment_is_text() {
        let tokens: Vec<_> = Tokenizer::new("<!-- open").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Text);
    }
}
