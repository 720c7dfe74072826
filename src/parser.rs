//! Line-oriented tokenizer for INI documents.
//!
//! The scanner never fails: every byte of the input ends up in exactly one
//! token, and anything that is not a comment, section header or entry is
//! kept as an [`TokenKind::Undefined`] fragment.

use crate::Span;

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

/// Classification of a [`Token`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum TokenKind {
    /// `# text` or `; text`.
    Comment,
    /// `[name]`.
    Section,
    /// `key = value` or `key: value`.
    Entry,
    /// A run of horizontal whitespace.
    Whitespace,
    /// `\n`, `\r` or `\r\n`.
    LineBreak,
    /// A non-blank fragment matching none of the other productions.
    Undefined,
}

/// A classified region of a document.
///
/// The meaning of the sub-spans depends on [`Token::kind`]:
///
/// | kind      | `name`            | `delimiter`    | `value`            |
/// |-----------|-------------------|----------------|--------------------|
/// | Comment   | marker run        | empty          | comment text       |
/// | Section   | trimmed interior  | empty          | trimmed interior   |
/// | Entry     | key               | `=` or `:`     | value              |
///
/// For every other kind the sub-spans are empty and positioned at
/// `span.start`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Token {
    /// What this token is.
    pub kind: TokenKind,
    /// The whole token. Structural tokens start and end on non-whitespace.
    pub span: Span,
    /// Comment markers, section name or entry key.
    pub name: Span,
    /// The entry delimiter.
    pub delimiter: Span,
    /// Comment text, section name or entry value.
    pub value: Span,
}

impl Token {
    fn filler(kind: TokenKind, start: usize, end: usize) -> Self {
        let at = Span::empty_at(start as u32);
        Token {
            kind,
            span: Span::new(start as u32, end as u32),
            name: at,
            delimiter: at,
            value: at,
        }
    }

    /// Returns `true` for the tokens kept in a document's match cache.
    #[inline]
    pub fn is_structural(&self) -> bool {
        matches!(self.kind, TokenKind::Section | TokenKind::Entry)
    }
}

/// Splits `text` into tokens covering it contiguously, in document order.
///
/// # Panics
///
/// Offsets are stored as `u32`; callers must reject input longer than
/// [`u32::MAX`] bytes beforehand.
pub fn tokenize(text: &str) -> Vec<Token> {
    debug_assert!(text.len() <= u32::MAX as usize);
    let mut scanner = Scanner {
        bytes: text.as_bytes(),
        cursor: 0,
        tokens: Vec::new(),
    };
    while scanner.cursor < scanner.bytes.len() {
        scanner.line();
    }
    scanner.tokens
}

/// Only the section and entry tokens of `text`, as held by the match cache.
pub fn structural_tokens(text: &str) -> Vec<Token> {
    let mut tokens = tokenize(text);
    tokens.retain(Token::is_structural);
    tokens
}

#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0B | 0x0C)
}

/// Trims the same horizontal whitespace the tokenizer trims from names.
pub(crate) fn trim_space(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii() && is_space(c as u8))
}

#[inline]
pub(crate) fn is_line_end(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

#[inline]
pub(crate) fn is_comment_marker(b: u8) -> bool {
    b == b'#' || b == b';'
}

#[inline]
fn is_delimiter(b: u8) -> bool {
    b == b'=' || b == b':'
}

struct Scanner<'a> {
    bytes: &'a [u8],
    cursor: usize,
    tokens: Vec<Token>,
}

impl Scanner<'_> {
    // -- cursor operations --------------------------------------------------

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn at_line_end(&self) -> bool {
        match self.peek_byte() {
            None => true,
            Some(b) => is_line_end(b),
        }
    }

    /// Offset of the next line break (or end of input) at or after `from`.
    fn line_end_from(&self, from: usize) -> usize {
        let mut end = from;
        while end < self.bytes.len() && !is_line_end(self.bytes[end]) {
            end += 1;
        }
        end
    }

    /// Moves `end` back over trailing whitespace, never below `start`.
    fn trim_end(&self, start: usize, mut end: usize) -> usize {
        while end > start && is_space(self.bytes[end - 1]) {
            end -= 1;
        }
        end
    }

    fn push_filler(&mut self, kind: TokenKind, start: usize, end: usize) {
        if end > start {
            self.tokens.push(Token::filler(kind, start, end));
        }
    }

    fn eat_whitespace(&mut self) {
        let start = self.cursor;
        while let Some(b) = self.peek_byte() {
            if !is_space(b) {
                break;
            }
            self.cursor += 1;
        }
        self.push_filler(TokenKind::Whitespace, start, self.cursor);
    }

    fn eat_line_break(&mut self) {
        let start = self.cursor;
        match self.peek_byte() {
            Some(b'\r') => {
                self.cursor += 1;
                if self.peek_byte() == Some(b'\n') {
                    self.cursor += 1;
                }
            }
            Some(b'\n') => self.cursor += 1,
            _ => {}
        }
        self.push_filler(TokenKind::LineBreak, start, self.cursor);
    }

    // -- productions ----------------------------------------------------------

    fn line(&mut self) {
        self.eat_whitespace();
        match self.peek_byte() {
            None => return,
            Some(b) if is_line_end(b) => {}
            Some(b) if is_comment_marker(b) => self.comment(),
            Some(b'[') => {
                if !self.section() {
                    self.undefined();
                }
            }
            Some(_) => {
                if !self.entry() {
                    self.undefined();
                }
            }
        }
        self.eat_line_break();
    }

    /// Consumes a comment through the end of the line.
    fn comment(&mut self) {
        let start = self.cursor;
        while let Some(b) = self.peek_byte() {
            if !is_comment_marker(b) {
                break;
            }
            self.cursor += 1;
        }
        let markers_end = self.cursor;

        let line_end = self.line_end_from(self.cursor);
        let mut text_start = markers_end;
        while text_start < line_end && is_space(self.bytes[text_start]) {
            text_start += 1;
        }
        let text_end = self.trim_end(text_start, line_end);
        let end = if text_end > text_start {
            text_end
        } else {
            markers_end
        };

        self.tokens.push(Token {
            kind: TokenKind::Comment,
            span: Span::new(start as u32, end as u32),
            name: Span::new(start as u32, markers_end as u32),
            delimiter: Span::empty_at(markers_end as u32),
            value: Span::new(text_start as u32, text_end as u32),
        });
        self.cursor = line_end;
        self.push_filler(TokenKind::Whitespace, end, line_end);
    }

    /// Consumes a `[name]` header. Returns `false`, consuming nothing, if the
    /// bracket is not closed on this line.
    fn section(&mut self) -> bool {
        let start = self.cursor;
        let mut close = start + 1;
        loop {
            match self.bytes.get(close) {
                Some(b']') => break,
                Some(&b) if b == b'[' || is_line_end(b) => return false,
                Some(_) => close += 1,
                None => return false,
            }
        }

        let mut name_start = start + 1;
        while name_start < close && is_space(self.bytes[name_start]) {
            name_start += 1;
        }
        let name_end = self.trim_end(name_start, close);
        let name = Span::new(name_start as u32, name_end as u32);

        self.tokens.push(Token {
            kind: TokenKind::Section,
            span: Span::new(start as u32, (close + 1) as u32),
            name,
            delimiter: Span::empty_at(close as u32),
            value: name,
        });
        self.cursor = close + 1;
        self.tail();
        true
    }

    /// Consumes a `key<delim>value` entry. Returns `false`, consuming
    /// nothing, if the line has no delimiter before a bracket or line end.
    fn entry(&mut self) -> bool {
        let start = self.cursor;
        let mut delim = start;
        loop {
            match self.bytes.get(delim) {
                Some(&b) if is_delimiter(b) => break,
                Some(&b) if b == b'[' || b == b']' || is_line_end(b) => return false,
                Some(_) => delim += 1,
                None => return false,
            }
        }
        let key_end = self.trim_end(start, delim);
        if key_end == start {
            return false;
        }

        let mut value_start = delim + 1;
        while value_start < self.bytes.len() && is_space(self.bytes[value_start]) {
            value_start += 1;
        }

        // The value ends at the line end or an unescaped comment marker.
        // `value_end` trails the last non-whitespace byte.
        let mut pos = value_start;
        let mut value_end = value_start;
        while let Some(&b) = self.bytes.get(pos) {
            if is_line_end(b) || is_comment_marker(b) {
                break;
            }
            if b == b'\\' {
                pos += 1;
                if let Some(&next) = self.bytes.get(pos) {
                    if next == b'\\' || is_comment_marker(next) {
                        pos += 1;
                    }
                }
                value_end = pos;
                continue;
            }
            pos += 1;
            if !is_space(b) {
                value_end = pos;
            }
        }

        let (value, end) = if value_end > value_start {
            (Span::new(value_start as u32, value_end as u32), value_end)
        } else {
            (Span::empty_at((delim + 1) as u32), delim + 1)
        };

        self.tokens.push(Token {
            kind: TokenKind::Entry,
            span: Span::new(start as u32, end as u32),
            name: Span::new(start as u32, key_end as u32),
            delimiter: Span::new(delim as u32, (delim + 1) as u32),
            value,
        });
        self.cursor = end;
        self.tail();
        true
    }

    /// Consumes a line that matched no production.
    fn undefined(&mut self) {
        let start = self.cursor;
        let line_end = self.line_end_from(start);
        let end = self.trim_end(start, line_end);
        self.push_filler(TokenKind::Undefined, start, end);
        self.cursor = line_end;
        self.push_filler(TokenKind::Whitespace, end, line_end);
    }

    /// Whatever follows a section header or entry on the same line.
    fn tail(&mut self) {
        self.eat_whitespace();
        if self.at_line_end() {
            return;
        }
        match self.peek_byte() {
            Some(b) if is_comment_marker(b) => self.comment(),
            _ => self.undefined(),
        }
    }
}
