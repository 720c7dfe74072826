//! The [`Document`] type: raw text, its match cache, and the read path.

use crate::{
    Comparison, Encoding, Span,
    encoding,
    error::{Error, ErrorKind},
    escape,
    parser::{self, Token, TokenKind, trim_space},
};
use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

#[cfg(test)]
#[path = "./document_tests.rs"]
mod tests;

/// Policies fixed when a [`Document`] is created.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Options {
    /// How section names and keys are matched.
    pub comparison: Comparison,
    /// Whether values are passed through [`escape`](crate::escape) on write
    /// and [`unescape`](crate::unescape) on read.
    pub escape: bool,
    /// Line break for inserted lines. `None` detects it from the text.
    pub newline: Option<String>,
    /// Encoding assumed when loaded bytes carry no byte-order mark.
    /// `None` means UTF-8.
    pub encoding: Option<Encoding>,
}

impl Options {
    /// Sets the [`Comparison`] policy.
    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Enables or disables escape processing of values.
    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    /// Uses `newline` for inserted lines instead of detecting it.
    ///
    /// Only `"\n"`, `"\r"` and `"\r\n"` are used; anything else falls back
    /// to detection.
    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = Some(newline.into());
        self
    }

    /// Sets the fallback encoding for bytes without a byte-order mark.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }
}

/// An INI document that is edited in place.
///
/// The document keeps the exact text it was created from. Reads go through a
/// cache of the section and entry tokens; writes splice the text and rebuild
/// the cache, leaving every other byte untouched.
///
/// Section arguments name the scope to work in. The empty string selects the
/// global scope: the entries before the first section header.
///
/// # Examples
///
/// ```
/// use iniedit::Document;
///
/// let mut doc: Document = "; settings\n[server]\nport = 80 # default\n".parse()?;
/// assert_eq!(doc.read_string("server", "port", ""), "80");
///
/// doc.write_string("server", "port", "8080")?;
/// doc.write_string("server", "host", "localhost")?;
/// assert_eq!(
///     doc.as_str(),
///     "; settings\n[server]\nport = 8080 # default\nhost=localhost\n"
/// );
/// # Ok::<(), iniedit::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Document {
    pub(crate) text: String,
    pub(crate) cache: Vec<Token>,
    pub(crate) options: Options,
    pub(crate) newline: String,
    pub(crate) encoding: Encoding,
    pub(crate) bom: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with default [`Options`].
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates an empty document.
    pub fn with_options(options: Options) -> Self {
        Document {
            text: String::new(),
            cache: Vec::new(),
            newline: pick_newline(&options, ""),
            encoding: options.encoding.unwrap_or_default(),
            bom: true,
            options,
        }
    }

    /// Parses `text` with default [`Options`].
    pub fn parse(text: &str) -> Result<Self, Error> {
        Self::parse_with(text, Options::default())
    }

    /// Parses `text`.
    ///
    /// Parsing itself cannot fail; only input over 4GiB is rejected.
    pub fn parse_with(text: impl Into<String>, options: Options) -> Result<Self, Error> {
        let text = text.into();
        let encoding = options.encoding.unwrap_or_default();
        Self::build(text, options, encoding, true)
    }

    /// Decodes `bytes` and parses the result.
    ///
    /// A byte-order mark selects the encoding; otherwise
    /// [`Options::encoding`] (UTF-8 by default) is used. [`Self::save`]
    /// writes a mark only if the bytes had one.
    pub fn from_bytes(bytes: &[u8], options: Options) -> Result<Self, Error> {
        let detected = Encoding::detect(bytes);
        let encoding = detected.or(options.encoding).unwrap_or_default();
        let text = encoding.decode(bytes)?;
        Self::build(text, options, encoding, detected.is_some())
    }

    /// Reads `reader` to the end and parses it as with [`Self::from_bytes`].
    pub fn from_reader(mut reader: impl Read, options: Options) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, options)
    }

    /// Loads the file at `path`.
    ///
    /// # Errors
    ///
    /// A missing file yields [`ErrorKind::Io`] with
    /// [`std::io::ErrorKind::NotFound`].
    pub fn load(path: impl AsRef<Path>, options: Options) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "loading document");
        Self::from_bytes(&bytes, options)
    }

    /// Loads the file at `path`, or returns an empty document if it does not
    /// exist.
    pub fn load_or_create(path: impl AsRef<Path>, options: Options) -> Result<Self, Error> {
        match Self::load(path.as_ref(), options.clone()) {
            Err(err) if err.kind.is_not_found() => {
                tracing::debug!(path = %path.as_ref().display(), "file missing, starting empty");
                Ok(Self::with_options(options))
            }
            other => other,
        }
    }

    fn build(text: String, options: Options, encoding: Encoding, bom: bool) -> Result<Self, Error> {
        if text.len() > u32::MAX as usize {
            return Err(ErrorKind::FileTooLarge.into());
        }
        let newline = pick_newline(&options, &text);
        let cache = parser::structural_tokens(&text);
        tracing::debug!(
            %encoding,
            bom,
            newline = ?newline,
            len = text.len(),
            tokens = cache.len(),
            "parsed document"
        );
        Ok(Document {
            text,
            cache,
            options,
            newline,
            encoding,
            bom,
        })
    }

    // -- accessors ------------------------------------------------------------

    /// The current text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the document, returning its text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// The options the document was created with.
    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The line break used for inserted lines.
    #[inline]
    pub fn newline(&self) -> &str {
        &self.newline
    }

    /// The encoding the document was loaded with, used by [`Self::save`].
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The section and entry tokens, in document order.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.cache
    }

    /// Returns `true` if [`Self::save`] writes a byte-order mark.
    ///
    /// This is the case for documents loaded from bytes that carried one, and
    /// for documents not loaded from bytes at all.
    #[inline]
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Returns `true` if the document has no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub(crate) fn slice(&self, span: Span) -> &str {
        span.slice(&self.text)
    }

    /// The entry tokens in `section`'s scope, in document order.
    pub(crate) fn scope<'a>(&'a self, section: &'a str) -> Scope<'a> {
        let section = trim_space(section);
        Scope {
            doc: self,
            tokens: self.cache.iter(),
            section,
            in_scope: section.is_empty(),
        }
    }

    /// Decodes a stored value according to the escape policy.
    pub(crate) fn decode<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if self.options.escape {
            escape::unescape(raw)
        } else {
            Cow::Borrowed(raw)
        }
    }

    fn key_matches(&self, token: &Token, key: &str) -> bool {
        self.options.comparison.equals(self.slice(token.name), key)
    }

    /// The decoded value of the first entry for `key` in `section`.
    pub(crate) fn lookup(&self, section: &str, key: &str) -> Option<Cow<'_, str>> {
        let key = trim_space(key);
        self.scope(section)
            .find(|token| self.key_matches(token, key))
            .map(|token| self.decode(self.slice(token.value)))
    }

    /// Collects names, dropping later duplicates under the comparison policy.
    fn distinct<'a>(&self, names: impl Iterator<Item = &'a str>) -> Vec<String> {
        let comparison = self.options.comparison;
        let mut seen = foldhash::HashSet::default();
        let mut out = Vec::new();
        for name in names {
            if seen.insert(comparison.fold(name).into_owned()) {
                out.push(name.to_owned());
            }
        }
        out
    }

    // -- read API ---------------------------------------------------------------

    /// The distinct section names.
    ///
    /// Names equal under the comparison policy are reported once, using the
    /// first spelling. The result is in document order, but should be treated
    /// as a set.
    pub fn sections(&self) -> Vec<String> {
        self.distinct(
            self.cache
                .iter()
                .filter(|token| token.kind == TokenKind::Section)
                .map(|token| self.slice(token.name)),
        )
    }

    /// The distinct keys in `section`'s scope.
    pub fn keys(&self, section: &str) -> Vec<String> {
        self.distinct(self.scope(section).map(|token| self.slice(token.name)))
    }

    /// Returns `true` if a header for `section` exists.
    pub fn contains_section(&self, section: &str) -> bool {
        let section = trim_space(section);
        self.cache.iter().any(|token| {
            token.kind == TokenKind::Section
                && self.options.comparison.equals(self.slice(token.name), section)
        })
    }

    /// Returns `true` if `key` has at least one entry in `section`'s scope.
    pub fn contains_key(&self, section: &str, key: &str) -> bool {
        let key = trim_space(key);
        self.scope(section).any(|token| self.key_matches(token, key))
    }

    /// The value of the first entry for `key` in `section`, or `default`.
    pub fn read_string(&self, section: &str, key: &str, default: &str) -> String {
        match self.lookup(section, key) {
            Some(value) => value.into_owned(),
            None => default.to_owned(),
        }
    }

    /// The values of every entry for `key` in `section`, in document order.
    pub fn read_strings(&self, section: &str, key: &str) -> Vec<String> {
        let key = trim_space(key);
        self.scope(section)
            .filter(|token| self.key_matches(token, key))
            .map(|token| self.decode(self.slice(token.value)).into_owned())
            .collect()
    }

    /// As [`Self::read_strings`], returning `defaults` when there is no entry.
    pub fn read_strings_or(&self, section: &str, key: &str, defaults: &[&str]) -> Vec<String> {
        let values = self.read_strings(section, key);
        if values.is_empty() {
            defaults.iter().map(|value| (*value).to_owned()).collect()
        } else {
            values
        }
    }

    /// The values of every entry in `section`'s scope, regardless of key.
    pub fn values(&self, section: &str) -> Vec<String> {
        self.scope(section)
            .map(|token| self.decode(self.slice(token.value)).into_owned())
            .collect()
    }

    /// The `(key, value)` pairs in `section`'s scope, in document order.
    pub fn entries<'a>(&'a self, section: &'a str) -> impl Iterator<Item = (&'a str, Cow<'a, str>)> {
        self.scope(section)
            .map(move |token| (self.slice(token.name), self.decode(self.slice(token.value))))
    }

    /// Indexer-style read: the value for `key`, or `""`.
    pub fn get(&self, section: &str, key: &str) -> String {
        self.read_string(section, key, "")
    }

    // -- output -----------------------------------------------------------------

    /// The text encoded with `encoding`, byte-order mark included.
    pub fn to_bytes(&self, encoding: Encoding) -> Vec<u8> {
        encoding.encode(&self.text)
    }

    /// Writes the text encoded with `encoding` to `writer`.
    pub fn write_to(&self, mut writer: impl Write, encoding: Encoding) -> Result<(), Error> {
        writer.write_all(&self.to_bytes(encoding))?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the document to `path` using [`Self::encoding`], with a
    /// byte-order mark if [`Self::has_bom`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let bytes = if self.bom {
            self.encoding.encode(&self.text)
        } else {
            self.encoding.encode_without_bom(&self.text)
        };
        tracing::debug!(path = %path.display(), encoding = %self.encoding, bom = self.bom, bytes = bytes.len(), "saving document");
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Writes the document to `path` using `encoding`.
    pub fn save_as(&self, path: impl AsRef<Path>, encoding: Encoding) -> Result<(), Error> {
        let path = path.as_ref();
        let bytes = self.to_bytes(encoding);
        tracing::debug!(path = %path.display(), %encoding, bytes = bytes.len(), "saving document");
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// The line break for inserted lines: the configured one if it is a real
/// line break, otherwise the one detected in `text`.
fn pick_newline(options: &Options, text: &str) -> String {
    match options.newline.as_deref() {
        Some(newline @ ("\n" | "\r" | "\r\n")) => newline.to_owned(),
        Some(other) => {
            tracing::debug!(newline = ?other, "not a line break, detecting instead");
            encoding::detect_newline(text).to_owned()
        }
        None => encoding::detect_newline(text).to_owned(),
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Iterator over the entry tokens of one scope.
///
/// The global scope ends at the first section header. A named scope covers
/// every header matching the name, so entries of repeated sections are
/// visited in document order.
pub(crate) struct Scope<'a> {
    doc: &'a Document,
    tokens: std::slice::Iter<'a, Token>,
    section: &'a str,
    in_scope: bool,
}

impl<'a> Iterator for Scope<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<&'a Token> {
        let global = self.section.is_empty();
        while let Some(token) = self.tokens.next() {
            match token.kind {
                TokenKind::Section if global => {
                    self.tokens = Default::default();
                    return None;
                }
                TokenKind::Section => {
                    self.in_scope = self
                        .doc
                        .options
                        .comparison
                        .equals(self.doc.slice(token.name), self.section);
                }
                TokenKind::Entry if self.in_scope => return Some(token),
                _ => {}
            }
        }
        None
    }
}
