//! The write path: locating entries and splicing the document text.
//!
//! Every write builds the new text in a [`Splice`] over a copy of the
//! buffer, reading positions from the match cache as it was before the call.
//! Only once all splices for a call are done is the text committed and the
//! cache rebuilt, so a failed write leaves the document untouched.

use crate::{
    Document, Span,
    error::{Error, ErrorKind},
    escape,
    parser::{self, Token, is_comment_marker, is_line_end, is_space, trim_space},
};
use std::borrow::Cow;
use std::ops::Range;

#[cfg(test)]
#[path = "./edit_tests.rs"]
mod tests;

/// A text buffer edited with spans taken from a token cache that predates
/// the edits.
///
/// `delta` is the net change in length from every splice applied so far.
/// Splices must be applied in document order, each at or after the previous
/// one.
#[derive(Debug)]
pub(crate) struct Splice {
    text: String,
    delta: i64,
}

impl Splice {
    pub(crate) fn new(text: String) -> Self {
        Splice { text, delta: 0 }
    }

    /// Maps a position from the stale cache into the current text.
    #[inline]
    pub(crate) fn position(&self, stale: u32) -> usize {
        (stale as i64 + self.delta) as usize
    }

    #[inline]
    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    /// Replaces the stale `span` with `with`.
    pub(crate) fn replace(&mut self, span: Span, with: &str) {
        let range: Range<usize> = span.shifted(self.delta).into();
        tracing::trace!(?range, with, "replacing");
        self.text.replace_range(range, with);
        self.delta += with.len() as i64 - span.len() as i64;
    }

    /// Removes `range`, given in stale coordinates.
    pub(crate) fn remove(&mut self, range: Range<usize>) {
        self.replace(Span::new(range.start as u32, range.end as u32), "");
    }

    /// Inserts `with` at `at`, a position in the current text.
    ///
    /// Insertions are not tracked in `delta`; they must come after every
    /// position still to be read from the stale cache.
    pub(crate) fn insert(&mut self, at: usize, with: &str) {
        tracing::trace!(at, with, "inserting");
        self.text.insert_str(at, with);
    }

    pub(crate) fn push_str(&mut self, with: &str) {
        let at = self.text.len();
        self.insert(at, with);
    }

    pub(crate) fn into_string(self) -> String {
        self.text
    }
}

/// The insertion point after the line containing `from`.
///
/// Skips to the end of the line, then past every consecutive line-break
/// byte, so any blank lines following the anchor stay above the new line.
fn after_line(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = from;
    while pos < bytes.len() && !is_line_end(bytes[pos]) {
        pos += 1;
    }
    while pos < bytes.len() && is_line_end(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// The byte range to delete when removing the entry at `span`.
///
/// An entry alone on its line takes the whole line with it, indentation and
/// line break included. Otherwise only the token itself is removed and a
/// trailing comment survives.
fn removal_range(text: &str, span: Span) -> Range<usize> {
    let bytes = text.as_bytes();
    let (start, end) = (span.start as usize, span.end as usize);

    let mut line_start = start;
    while line_start > 0 && is_space(bytes[line_start - 1]) {
        line_start -= 1;
    }
    let mut line_end = end;
    while line_end < bytes.len() && is_space(bytes[line_end]) {
        line_end += 1;
    }
    let alone = (line_start == 0 || is_line_end(bytes[line_start - 1]))
        && (line_end == bytes.len() || is_line_end(bytes[line_end]));
    if !alone {
        return start..end;
    }

    let (mut from, mut to) = (line_start, line_end);
    if to < bytes.len() {
        to += if bytes[to] == b'\r' && bytes.get(to + 1) == Some(&b'\n') {
            2
        } else {
            1
        };
    } else if from > 0 {
        // Last line without a trailing break: take the break before it.
        from -= if from >= 2 && bytes[from - 1] == b'\n' && bytes[from - 2] == b'\r' {
            2
        } else {
            1
        };
    }
    from..to
}

/// Returns `true` if `value` ends in an odd run of backslashes, which would
/// escape a comment marker written right after it.
fn escapes_next(value: &str) -> bool {
    value.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn validate_key(key: &str) -> Result<&str, Error> {
    let key = trim_space(key);
    if key.is_empty() {
        return Err(ErrorKind::EmptyKey.into());
    }
    if let Some(c) = key
        .chars()
        .find(|&c| matches!(c, '=' | ':' | '[' | ']' | '\r' | '\n'))
    {
        return Err(ErrorKind::InvalidKey(c).into());
    }
    if is_comment_marker(key.as_bytes()[0]) {
        return Err(ErrorKind::InvalidKey(key.as_bytes()[0] as char).into());
    }
    Ok(key)
}

fn validate_section(section: &str) -> Result<&str, Error> {
    let section = trim_space(section);
    match section.chars().find(|&c| matches!(c, '[' | ']' | '\r' | '\n')) {
        Some(c) => Err(ErrorKind::InvalidSection(c).into()),
        None => Ok(section),
    }
}

impl Document {
    /// The stored form of `value`: escaped, or checked for line breaks when
    /// escaping is off.
    fn encode_value<'v>(&self, value: &'v str) -> Result<Cow<'v, str>, Error> {
        if self.options.escape {
            return Ok(escape::escape(value));
        }
        match value.chars().find(|&c| c == '\r' || c == '\n') {
            Some(c) => Err(ErrorKind::InvalidValue(c).into()),
            None => Ok(Cow::Borrowed(value)),
        }
    }

    /// The text to put in place of `token`'s value: `value`, plus a space if
    /// it would otherwise escape a comment marker directly after the value.
    fn fitted<'v>(&self, token: &Token, value: &'v str) -> Cow<'v, str> {
        match self.text.as_bytes().get(token.value.end as usize) {
            Some(&next) if is_comment_marker(next) && escapes_next(value) => {
                Cow::Owned(format!("{value} "))
            }
            _ => Cow::Borrowed(value),
        }
    }

    /// Replaces the text and rebuilds the match cache.
    pub(crate) fn commit(&mut self, text: String) -> Result<(), Error> {
        if text.len() > u32::MAX as usize {
            return Err(ErrorKind::FileTooLarge.into());
        }
        self.cache = parser::structural_tokens(&text);
        self.text = text;
        Ok(())
    }

    /// Appends `key=value` lines for each of `values` to `section`.
    ///
    /// `anchor` is the last entry of the scope, if any: the lines go after
    /// it. Otherwise a named section gets a fresh header at the end of the
    /// text, and the global scope gets the lines at the very start.
    fn append_entries(
        &self,
        splice: &mut Splice,
        section: &str,
        key: &str,
        values: &[Cow<'_, str>],
        anchor: Option<Token>,
    ) {
        let newline = self.newline.as_str();
        let mut lines = String::new();
        for value in values {
            lines.push_str(key);
            lines.push('=');
            lines.push_str(value);
            lines.push_str(newline);
        }

        match anchor {
            Some(anchor) => {
                let at = after_line(splice.as_str(), splice.position(anchor.span.end));
                let text = splice.as_str();
                if at == text.len() && !text.is_empty() && !text.ends_with(['\n', '\r']) {
                    lines.insert_str(0, newline);
                }
                splice.insert(at, &lines);
            }
            None if !section.is_empty() => {
                let text = splice.as_str();
                let mut block = String::new();
                if !text.is_empty() {
                    if !text.ends_with(['\n', '\r']) {
                        block.push_str(newline);
                    }
                    block.push_str(newline);
                }
                block.push('[');
                block.push_str(section);
                block.push(']');
                block.push_str(newline);
                block.push_str(&lines);
                splice.push_str(&block);
            }
            None => splice.insert(0, &lines),
        }
    }

    /// Sets the first entry for `key` in `section` to `value`.
    ///
    /// - An existing entry has only its value replaced; whitespace, the
    ///   delimiter and any trailing comment stay as written. Later entries
    ///   with the same key are left alone.
    /// - An empty `value` removes the entry.
    /// - A missing entry is added as `key=value` after the last entry of the
    ///   scope, below any blank lines that follow it. A section without
    ///   entries gets a new header appended at the end of the document; the
    ///   global scope inserts at the start.
    ///
    /// # Errors
    ///
    /// Fails without changing the document if the key is empty, the key or
    /// section name contains structural characters, or the value contains a
    /// line break while escaping is disabled.
    pub fn write_string(&mut self, section: &str, key: &str, value: &str) -> Result<(), Error> {
        let section = validate_section(section)?;
        let key = validate_key(key)?;
        let stored = self.encode_value(value)?;

        let mut anchor = None;
        let mut target = None;
        for token in self.scope(section) {
            anchor = Some(*token);
            if self.options.comparison.equals(self.slice(token.name), key) {
                target = Some(*token);
                break;
            }
        }

        let mut splice = Splice::new(self.text.clone());
        match target {
            Some(token) if stored.is_empty() => {
                tracing::trace!(section, key, "removing entry");
                splice.remove(removal_range(&self.text, token.span));
            }
            Some(token) => splice.replace(token.value, &self.fitted(&token, &stored)),
            None if stored.is_empty() => return Ok(()),
            None => self.append_entries(&mut splice, section, key, &[stored], anchor),
        }
        self.commit(splice.into_string())
    }

    /// Sets the entries for `key` in `section` to `values`, in order.
    ///
    /// Existing entries are overwritten in place one value at a time. Surplus
    /// existing entries are left untouched; surplus values are appended as new
    /// lines following the same placement rules as [`Self::write_string`].
    /// Empty strings are written as empty values, not removals.
    pub fn write_strings(&mut self, section: &str, key: &str, values: &[&str]) -> Result<(), Error> {
        let section = validate_section(section)?;
        let key = validate_key(key)?;
        let stored = values
            .iter()
            .map(|value| self.encode_value(value))
            .collect::<Result<Vec<_>, _>>()?;
        if stored.is_empty() {
            return Ok(());
        }

        let mut splice = Splice::new(self.text.clone());
        let mut pending = stored.iter();
        let mut anchor = None;
        let mut remaining = stored.len();
        for token in self.scope(section) {
            anchor = Some(*token);
            if !self.options.comparison.equals(self.slice(token.name), key) {
                continue;
            }
            let Some(value) = pending.next() else {
                break;
            };
            splice.replace(token.value, &self.fitted(token, value));
            remaining -= 1;
        }

        if remaining > 0 {
            let rest = &stored[stored.len() - remaining..];
            self.append_entries(&mut splice, section, key, rest, anchor);
        }
        self.commit(splice.into_string())
    }

    /// Removes the first entry for `key` in `section`. Returns `false` if
    /// there was none.
    pub fn remove_key(&mut self, section: &str, key: &str) -> Result<bool, Error> {
        if !self.contains_key(section, key) {
            return Ok(false);
        }
        self.write_string(section, key, "")?;
        Ok(true)
    }

    /// Indexer-style write: sets `key` in `section`, creating it if absent.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), Error> {
        self.write_string(section, key, value)
    }
}
