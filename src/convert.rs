//! Typed reads and writes layered over the string accessors.
//!
//! A value goes through a [`Converter`] on its way in and out of the text.
//! Conversion never fails loudly: a value that does not parse reads as the
//! caller's default, and a value with no text form is not written.

use crate::{Comparison, Document, Error};
use std::path::PathBuf;

#[cfg(test)]
#[path = "./convert_tests.rs"]
mod tests;

/// Parses a type from the text of an entry value.
pub trait FromIni: Sized {
    /// Returns `None` if `text` is not a valid representation.
    ///
    /// `comparison` applies to keyword matching, such as boolean words.
    fn from_ini(text: &str, comparison: Comparison) -> Option<Self>;
}

/// Formats a type as the text of an entry value.
pub trait ToIni {
    /// Returns `None` if the value has nothing to write.
    fn to_ini(&self) -> Option<String>;
}

macro_rules! number {
    ($($num:ty),+) => {$(
        impl FromIni for $num {
            fn from_ini(text: &str, _: Comparison) -> Option<Self> {
                text.trim().parse().ok()
            }
        }

        impl ToIni for $num {
            fn to_ini(&self) -> Option<String> {
                Some(self.to_string())
            }
        }
    )+};
}

number!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

const TRUTHY: &[&str] = &["true", "yes", "on", "enable", "1"];
const FALSY: &[&str] = &["false", "no", "off", "disable", "0"];

impl FromIni for bool {
    /// Any finite nonzero number is `true`, zero is `false`. Otherwise the
    /// text must be one of `true yes on enable` or `false no off disable`.
    fn from_ini(text: &str, comparison: Comparison) -> Option<Self> {
        let text = text.trim();
        if let Ok(number) = text.parse::<f64>()
            && number.is_finite()
        {
            return Some(number != 0.0);
        }
        if TRUTHY.iter().any(|word| comparison.equals(word, text)) {
            Some(true)
        } else if FALSY.iter().any(|word| comparison.equals(word, text)) {
            Some(false)
        } else {
            None
        }
    }
}

impl ToIni for bool {
    fn to_ini(&self) -> Option<String> {
        Some(if *self { "true" } else { "false" }.to_owned())
    }
}

impl FromIni for char {
    fn from_ini(text: &str, _: Comparison) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl ToIni for char {
    fn to_ini(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl FromIni for String {
    fn from_ini(text: &str, _: Comparison) -> Option<Self> {
        Some(text.to_owned())
    }
}

impl ToIni for String {
    fn to_ini(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ToIni for str {
    fn to_ini(&self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl FromIni for PathBuf {
    fn from_ini(text: &str, _: Comparison) -> Option<Self> {
        Some(PathBuf::from(text))
    }
}

impl ToIni for PathBuf {
    /// Paths that are not valid Unicode are not written.
    fn to_ini(&self) -> Option<String> {
        self.to_str().map(str::to_owned)
    }
}

impl<T: FromIni> FromIni for Option<T> {
    /// An empty value reads as `Some(None)`.
    fn from_ini(text: &str, comparison: Comparison) -> Option<Self> {
        if text.is_empty() {
            return Some(None);
        }
        T::from_ini(text, comparison).map(Some)
    }
}

impl<T: ToIni> ToIni for Option<T> {
    fn to_ini(&self) -> Option<String> {
        self.as_ref().and_then(ToIni::to_ini)
    }
}

impl<T: ToIni + ?Sized> ToIni for &T {
    fn to_ini(&self) -> Option<String> {
        (**self).to_ini()
    }
}

/// A pluggable strategy for converting values of `T` to and from text.
pub trait Converter<T> {
    /// Parses `text`, returning `None` if it is not valid.
    fn parse(&self, text: &str, comparison: Comparison) -> Option<T>;
    /// Formats `value`, returning `None` if it should not be written.
    fn format(&self, value: &T) -> Option<String>;
}

/// Converts through [`FromIni`] and [`ToIni`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Native;

impl<T: FromIni + ToIni> Converter<T> for Native {
    fn parse(&self, text: &str, comparison: Comparison) -> Option<T> {
        T::from_ini(text, comparison)
    }

    fn format(&self, value: &T) -> Option<String> {
        value.to_ini()
    }
}

/// Converts between values and a fixed table of names, typically the
/// variants of a fieldless enum.
///
/// Names are matched under the document's comparison policy. Values missing
/// from the table are not written.
///
/// ```
/// use iniedit::{Document, Variants};
///
/// #[derive(Copy, Clone, Debug, PartialEq)]
/// enum Level { Low, High }
///
/// const LEVEL: Variants<Level> = Variants::new(&[("low", Level::Low), ("high", Level::High)]);
///
/// let doc: Document = "level = HIGH".parse()?;
/// assert_eq!(doc.read_with(&LEVEL, "", "level", Level::Low), Level::High);
/// # Ok::<(), iniedit::Error>(())
/// ```
#[derive(Debug)]
pub struct Variants<T: 'static> {
    names: &'static [(&'static str, T)],
}

impl<T: 'static> Clone for Variants<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Variants<T> {}

impl<T: 'static> Variants<T> {
    pub const fn new(names: &'static [(&'static str, T)]) -> Self {
        Self { names }
    }
}

impl<T: Clone + PartialEq + 'static> Converter<T> for Variants<T> {
    fn parse(&self, text: &str, comparison: Comparison) -> Option<T> {
        let text = text.trim();
        self.names
            .iter()
            .find(|(name, _)| comparison.equals(name, text))
            .map(|(_, value)| value.clone())
    }

    fn format(&self, value: &T) -> Option<String> {
        self.names
            .iter()
            .find(|(_, candidate)| candidate == value)
            .map(|(name, _)| (*name).to_owned())
    }
}

/// A converter built from a pair of functions.
#[derive(Copy, Clone, Debug)]
pub struct Custom<P, F> {
    parse: P,
    format: F,
}

impl<P, F> Custom<P, F> {
    pub fn new(parse: P, format: F) -> Self {
        Self { parse, format }
    }
}

impl<T, P, F> Converter<T> for Custom<P, F>
where
    P: Fn(&str) -> Option<T>,
    F: Fn(&T) -> Option<String>,
{
    fn parse(&self, text: &str, _: Comparison) -> Option<T> {
        (self.parse)(text)
    }

    fn format(&self, value: &T) -> Option<String> {
        (self.format)(value)
    }
}

impl Document {
    fn read_parsed<T>(
        &self,
        section: &str,
        key: &str,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> T {
        let Some(text) = self.lookup(section, key) else {
            return default;
        };
        match parse(&text) {
            Some(value) => value,
            None => {
                tracing::debug!(section, key, value = %text, "conversion failed, using default");
                default
            }
        }
    }

    fn read_all_parsed<T>(&self, section: &str, key: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
        let mut out = Vec::new();
        for text in self.read_strings(section, key) {
            match parse(&text) {
                Some(value) => out.push(value),
                None => {
                    tracing::debug!(section, key, value = %text, "conversion failed, dropping array");
                    return Vec::new();
                }
            }
        }
        out
    }

    /// The first value for `key` in `section` converted to `T`, or
    /// `default` if it is missing or does not convert.
    ///
    /// ```
    /// let doc: iniedit::Document = "[net]\nport = 8080\nipv6 = off\n".parse()?;
    /// assert_eq!(doc.read("net", "port", 80u16), 8080);
    /// assert!(!doc.read("net", "ipv6", true));
    /// assert_eq!(doc.read("net", "timeout", 30u32), 30);
    /// # Ok::<(), iniedit::Error>(())
    /// ```
    pub fn read<T: FromIni>(&self, section: &str, key: &str, default: T) -> T {
        let comparison = self.options.comparison;
        self.read_parsed(section, key, default, |text| T::from_ini(text, comparison))
    }

    /// As [`Self::read`], converting with `converter`.
    pub fn read_with<T, C>(&self, converter: &C, section: &str, key: &str, default: T) -> T
    where
        C: Converter<T> + ?Sized,
    {
        let comparison = self.options.comparison;
        self.read_parsed(section, key, default, |text| converter.parse(text, comparison))
    }

    /// Every value for `key` in `section` converted to `T`.
    ///
    /// Returns an empty vector if any of the values fails to convert.
    pub fn read_array<T: FromIni>(&self, section: &str, key: &str) -> Vec<T> {
        let comparison = self.options.comparison;
        self.read_all_parsed(section, key, |text| T::from_ini(text, comparison))
    }

    /// As [`Self::read_array`], converting with `converter`.
    pub fn read_array_with<T, C>(&self, converter: &C, section: &str, key: &str) -> Vec<T>
    where
        C: Converter<T> + ?Sized,
    {
        let comparison = self.options.comparison;
        self.read_all_parsed(section, key, |text| converter.parse(text, comparison))
    }

    fn write_formatted(&mut self, section: &str, key: &str, text: Option<String>) -> Result<(), Error> {
        match text {
            Some(text) => self.write_string(section, key, &text),
            None => {
                tracing::debug!(section, key, "value has no text form, skipping write");
                Ok(())
            }
        }
    }

    /// Writes `value` as with [`Self::write_string`].
    ///
    /// A value without a text form, such as `None`, is not written and the
    /// document is left unchanged.
    pub fn write<T: ToIni + ?Sized>(&mut self, section: &str, key: &str, value: &T) -> Result<(), Error> {
        self.write_formatted(section, key, value.to_ini())
    }

    /// As [`Self::write`], converting with `converter`.
    pub fn write_with<T, C>(&mut self, converter: &C, section: &str, key: &str, value: &T) -> Result<(), Error>
    where
        C: Converter<T> + ?Sized,
    {
        self.write_formatted(section, key, converter.format(value))
    }

    fn write_all_formatted(
        &mut self,
        section: &str,
        key: &str,
        texts: Option<Vec<String>>,
    ) -> Result<(), Error> {
        let Some(texts) = texts else {
            tracing::debug!(section, key, "array element has no text form, skipping write");
            return Ok(());
        };
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.write_strings(section, key, &texts)
    }

    /// Writes `values` as with [`Self::write_strings`].
    ///
    /// Nothing is written if any element lacks a text form.
    pub fn write_array<T: ToIni>(&mut self, section: &str, key: &str, values: &[T]) -> Result<(), Error> {
        let texts = values.iter().map(ToIni::to_ini).collect();
        self.write_all_formatted(section, key, texts)
    }

    /// As [`Self::write_array`], converting with `converter`.
    pub fn write_array_with<T, C>(
        &mut self,
        converter: &C,
        section: &str,
        key: &str,
        values: &[T],
    ) -> Result<(), Error>
    where
        C: Converter<T> + ?Sized,
    {
        let texts = values.iter().map(|value| converter.format(value)).collect();
        self.write_all_formatted(section, key, texts)
    }
}
