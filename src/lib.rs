//! A format-preserving editor for INI-style configuration documents.
//!
//! A [`Document`] keeps the exact text it was loaded from. Reads look up
//! sections and entries through a cache of byte-offset tokens; writes splice
//! only the affected bytes, so comments, blank lines, indentation and the
//! order of everything else survive an edit untouched.
//!
//! Values can be read and written as strings, or typed through [`FromIni`]
//! and [`ToIni`] or a custom [`Converter`]. A [`Binding`] maps the fields of
//! a struct to entries with an explicit table of getters and setters.
//!
//! # Examples
//!
//! ```
//! use iniedit::{Document, Error};
//!
//! let text = "\
//! ; editor settings
//! [view]
//! font size = 12   ; points
//! wrap: yes
//!
//! [files]
//! recent = a.txt
//! recent = b.txt
//! ";
//!
//! let mut doc: Document = text.parse()?;
//!
//! assert_eq!(doc.read("view", "font size", 10u32), 12);
//! assert!(doc.read("VIEW", "Wrap", false));
//! assert_eq!(doc.read_strings("files", "recent"), ["a.txt", "b.txt"]);
//!
//! doc.write("view", "font size", &14u32)?;
//! doc.write_string("view", "theme", "dark")?;
//! doc.write_string("files", "recent", "")?;
//!
//! assert_eq!(
//!     doc.as_str(),
//!     "\
//! ; editor settings
//! [view]
//! font size = 14   ; points
//! wrap: yes
//!
//! theme=dark
//! [files]
//! recent = b.txt
//! "
//! );
//! # Ok::<(), Error>(())
//! ```
//!
//! New entries go after the last entry of their section, below any blank
//! lines that follow it, as `theme` shows above.

mod binding;
mod compare;
mod convert;
mod document;
mod edit;
mod encoding;
mod error;
mod escape;
mod parser;
mod span;

pub use binding::Binding;
pub use compare::Comparison;
pub use convert::{Converter, Custom, FromIni, Native, ToIni, Variants};
pub use document::{Document, Options};
pub use encoding::{DEFAULT_NEWLINE, Encoding, detect_newline};
pub use error::{Error, ErrorKind};
pub use escape::{escape, unescape};
pub use parser::{Token, TokenKind, structural_tokens, tokenize};
pub use span::Span;

#[cfg(feature = "serde")]
pub mod impl_serde;
