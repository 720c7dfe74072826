#![allow(clippy::question_mark)]
use crate::{Encoding, Span};
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// Error that can occur when loading, saving or editing a document.
///
/// Reads never fail; only I/O, decoding and write validation produce errors.
#[derive(Debug)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// The byte range of the offending input, for
    /// [`ErrorKind::InvalidEncoding`]. Validation and I/O errors carry none.
    pub span: Option<Span>,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, span: None }
    }
}

impl From<(ErrorKind, Span)> for Error {
    fn from((kind, span): (ErrorKind, Span)) -> Self {
        Self {
            kind,
            span: Some(span),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        ErrorKind::Io(err).into()
    }
}

/// The kinds of errors a document operation can produce.
pub enum ErrorKind {
    /// Reading or writing the underlying stream or file failed.
    ///
    /// Loading a missing file with [`Document::load`](crate::Document::load)
    /// yields this with [`std::io::ErrorKind::NotFound`].
    Io(std::io::Error),

    /// The bytes are not valid in the detected or requested encoding.
    InvalidEncoding(Encoding),

    /// The input is larger than the maximum supported size of 4GiB.
    FileTooLarge,

    /// A write was attempted with an empty key.
    EmptyKey,

    /// A key contains a character that would change the line's structure.
    InvalidKey(char),

    /// A section name contains a character that would break its header.
    InvalidSection(char),

    /// A value contains a line break and escaping is disabled.
    InvalidValue(char),
}

impl ErrorKind {
    /// Returns `true` for [`ErrorKind::Io`] with [`std::io::ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == std::io::ErrorKind::NotFound)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Io(..) => "io",
            Self::InvalidEncoding(..) => "invalid-encoding",
            Self::FileTooLarge => "file-too-large",
            Self::EmptyKey => "empty-key",
            Self::InvalidKey(..) => "invalid-key",
            Self::InvalidSection(..) => "invalid-section",
            Self::InvalidValue(..) => "invalid-value",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

macro_rules! rtry {
    ($($tt:tt)*) => {
        if let Err(err) = $($tt)* {
            return Err(err);
        }
    };
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Io(err) => {
                rtry!(f.write_str("i/o error: "));
                Display::fmt(err, f)
            }
            ErrorKind::InvalidEncoding(encoding) => {
                rtry!(f.write_str("input is not valid "));
                f.write_str(encoding.name())
            }
            ErrorKind::FileTooLarge => f.write_str("file is too large (maximum 4GiB)"),
            ErrorKind::EmptyKey => f.write_str("key must not be empty"),
            ErrorKind::InvalidKey(c) => {
                rtry!(f.write_str("invalid character in key: `"));
                rtry!(Escape(*c).fmt(f));
                f.write_str("`")
            }
            ErrorKind::InvalidSection(c) => {
                rtry!(f.write_str("invalid character in section name: `"));
                rtry!(Escape(*c).fmt(f));
                f.write_str("`")
            }
            ErrorKind::InvalidValue(c) => {
                rtry!(f.write_str("invalid character in unescaped value: `"));
                rtry!(Escape(*c).fmt(f));
                f.write_str("`")
            }
        }
    }
}
