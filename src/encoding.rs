//! Text encoding and line-break detection, run once when a document is
//! loaded.

use crate::{
    Span,
    error::{Error, ErrorKind},
};
use std::fmt;

#[cfg(test)]
#[path = "./encoding_tests.rs"]
mod tests;

/// The text encodings a document can be loaded from and saved to.
///
/// Every variant except [`Encoding::Utf8`] writes a byte-order mark with
/// [`Encoding::encode`], so bytes encoded with a given encoding are detected
/// as that encoding when loaded again.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub enum Encoding {
    /// UTF-8 without a byte-order mark.
    #[default]
    Utf8,
    /// UTF-8 preceded by `EF BB BF`.
    Utf8Bom,
    /// UTF-16, little endian.
    Utf16Le,
    /// UTF-16, big endian.
    Utf16Be,
    /// UTF-32, little endian.
    Utf32Le,
    /// UTF-32, big endian.
    Utf32Be,
    /// UTF-7 (RFC 2152).
    Utf7,
}

const BOM_UTF32_LE: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const BOM_UTF32_BE: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];
/// `U+FEFF` on its own as a UTF-7 shift sequence.
const BOM_UTF7: &[u8] = b"+/v8-";

impl Encoding {
    /// Human readable name of the encoding.
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 (BOM)",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf32Le => "UTF-32LE",
            Self::Utf32Be => "UTF-32BE",
            Self::Utf7 => "UTF-7",
        }
    }

    /// The byte-order mark written before the text on save.
    ///
    /// For UTF-7 this is the mark followed by text written directly; see
    /// [`Encoding::encode`].
    pub fn bom(self) -> &'static [u8] {
        match self {
            Self::Utf8 => &[],
            Self::Utf8Bom => BOM_UTF8,
            Self::Utf16Le => BOM_UTF16_LE,
            Self::Utf16Be => BOM_UTF16_BE,
            Self::Utf32Le => BOM_UTF32_LE,
            Self::Utf32Be => BOM_UTF32_BE,
            Self::Utf7 => BOM_UTF7,
        }
    }

    /// Inspects up to four leading bytes for a byte-order mark.
    ///
    /// Longer signatures are tried first so that a UTF-32LE mark is not
    /// mistaken for UTF-16LE.
    pub fn detect(bytes: &[u8]) -> Option<Encoding> {
        let head = &bytes[..bytes.len().min(4)];
        if head.len() >= 4 {
            if head == BOM_UTF32_LE {
                return Some(Self::Utf32Le);
            }
            if head == BOM_UTF32_BE {
                return Some(Self::Utf32Be);
            }
            if head.starts_with(b"+/v") && matches!(head[3], b'8' | b'9' | b'+' | b'/') {
                return Some(Self::Utf7);
            }
        }
        if head.len() >= 3 && head.starts_with(BOM_UTF8) {
            return Some(Self::Utf8Bom);
        }
        if head.len() >= 2 {
            if head.starts_with(BOM_UTF16_LE) {
                return Some(Self::Utf16Le);
            }
            if head.starts_with(BOM_UTF16_BE) {
                return Some(Self::Utf16Be);
            }
        }
        None
    }

    /// Decodes `bytes`, dropping a leading byte-order mark if present.
    ///
    /// On failure the error's span is the byte range of the first invalid
    /// sequence in `bytes`.
    pub fn decode(self, bytes: &[u8]) -> Result<String, Error> {
        let invalid = |start: usize, len: usize| {
            Error::from((ErrorKind::InvalidEncoding(self), byte_span(start, len)))
        };
        let bom = self.bom();
        let body = match self {
            Self::Utf7 => bytes,
            _ if !bom.is_empty() && bytes.starts_with(bom) => &bytes[bom.len()..],
            // A BOM-less UTF-8 read still drops a stray mark.
            Self::Utf8 if bytes.starts_with(BOM_UTF8) => &bytes[BOM_UTF8.len()..],
            _ => bytes,
        };
        let offset = bytes.len() - body.len();

        let text = match self {
            Self::Utf8 | Self::Utf8Bom => match std::str::from_utf8(body) {
                Ok(text) => text.to_owned(),
                Err(err) => {
                    let valid = err.valid_up_to();
                    let len = err.error_len().unwrap_or(body.len() - valid);
                    return Err(invalid(offset + valid, len));
                }
            },
            Self::Utf16Le | Self::Utf16Be => {
                if body.len() % 2 != 0 {
                    return Err(invalid(bytes.len() - 1, 1));
                }
                let units = body.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if self == Self::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                });
                let mut text = String::with_capacity(body.len() / 2);
                let mut at = 0;
                for c in char::decode_utf16(units) {
                    match c {
                        Ok(c) => {
                            text.push(c);
                            at += c.len_utf16();
                        }
                        Err(_) => return Err(invalid(offset + at * 2, 2)),
                    }
                }
                text
            }
            Self::Utf32Le | Self::Utf32Be => {
                if body.len() % 4 != 0 {
                    let whole = body.len() / 4 * 4;
                    return Err(invalid(offset + whole, body.len() - whole));
                }
                let mut text = String::with_capacity(body.len() / 4);
                for (i, quad) in body.chunks_exact(4).enumerate() {
                    let quad = [quad[0], quad[1], quad[2], quad[3]];
                    let code = if self == Self::Utf32Le {
                        u32::from_le_bytes(quad)
                    } else {
                        u32::from_be_bytes(quad)
                    };
                    match char::from_u32(code) {
                        Some(c) => text.push(c),
                        None => return Err(invalid(offset + i * 4, 4)),
                    }
                }
                text
            }
            Self::Utf7 => {
                let mut text = utf7::decode(body).map_err(|at| invalid(at, 1))?;
                if text.starts_with('\u{feff}') {
                    text.drain(..'\u{feff}'.len_utf8());
                }
                text
            }
        };
        Ok(text)
    }

    /// Encodes `text`, preceded by this encoding's byte-order mark.
    ///
    /// For UTF-7 the mark shares a shifted run with any leading characters
    /// that are not written directly, so it appears as `+/v8`, `+/v9`,
    /// `+/v+` or `+/v/` depending on what follows.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() + 4);
        if self == Self::Utf7 {
            let mut marked = String::with_capacity(text.len() + 3);
            marked.push('\u{feff}');
            marked.push_str(text);
            utf7::encode(&marked, &mut out);
        } else {
            out.extend_from_slice(self.bom());
            self.encode_into(text, &mut out);
        }
        out
    }

    /// Encodes `text` with no byte-order mark.
    pub fn encode_without_bom(self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        self.encode_into(text, &mut out);
        out
    }

    fn encode_into(self, text: &str, out: &mut Vec<u8>) {
        match self {
            Self::Utf8 | Self::Utf8Bom => out.extend_from_slice(text.as_bytes()),
            Self::Utf16Le => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_le_bytes())),
            Self::Utf16Be => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_be_bytes())),
            Self::Utf32Le => text
                .chars()
                .for_each(|c| out.extend_from_slice(&(c as u32).to_le_bytes())),
            Self::Utf32Be => text
                .chars()
                .for_each(|c| out.extend_from_slice(&(c as u32).to_be_bytes())),
            Self::Utf7 => utf7::encode(text, out),
        }
    }
}

fn byte_span(start: usize, len: usize) -> Span {
    let clamp = |at: usize| u32::try_from(at).unwrap_or(u32::MAX);
    Span::new(clamp(start), clamp(start + len))
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Line break used when a document contains none.
#[cfg(windows)]
pub const DEFAULT_NEWLINE: &str = "\r\n";
/// Line break used when a document contains none.
#[cfg(not(windows))]
pub const DEFAULT_NEWLINE: &str = "\n";

/// Picks the line-break string for a document.
///
/// The first CR and the first LF anywhere in the text are considered, not
/// necessarily adjacent: both present yields `"\r\n"`, otherwise whichever
/// was seen, otherwise [`DEFAULT_NEWLINE`].
pub fn detect_newline(text: &str) -> &'static str {
    let bytes = text.as_bytes();
    let cr = bytes.contains(&b'\r');
    let lf = bytes.contains(&b'\n');
    match (cr, lf) {
        (true, true) => "\r\n",
        (false, true) => "\n",
        (true, false) => "\r",
        (false, false) => DEFAULT_NEWLINE,
    }
}

mod utf7 {
    //! RFC 2152 codec. Shifted runs are modified base64 over UTF-16 units.

    const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn base64_value(b: u8) -> Option<u32> {
        Some(match b {
            b'A'..=b'Z' => b - b'A',
            b'a'..=b'z' => b - b'a' + 26,
            b'0'..=b'9' => b - b'0' + 52,
            b'+' => 62,
            b'/' => 63,
            _ => return None,
        } as u32)
    }

    /// Characters written as themselves.
    fn is_direct(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r' | ' '..='}') && c != '+' && c != '\\'
    }

    /// Decodes `bytes`, or returns the offset of the first byte that cannot
    /// be decoded.
    pub(super) fn decode(bytes: &[u8]) -> Result<String, usize> {
        // Each unit with the offset of the byte that completed it.
        let mut units: Vec<(u16, usize)> = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b >= 0x80 {
                return Err(i);
            }
            if b != b'+' {
                units.push((b as u16, i));
                i += 1;
                continue;
            }
            i += 1;
            if bytes.get(i) == Some(&b'-') {
                units.push((b'+' as u16, i - 1));
                i += 1;
                continue;
            }
            let mut bits: u32 = 0;
            let mut nbits = 0;
            while let Some(value) = bytes.get(i).and_then(|&b| base64_value(b)) {
                bits = (bits << 6) | value;
                nbits += 6;
                if nbits >= 16 {
                    nbits -= 16;
                    units.push(((bits >> nbits) as u16, i));
                    bits &= (1 << nbits) - 1;
                }
                i += 1;
            }
            if bytes.get(i) == Some(&b'-') {
                i += 1;
            }
        }

        let mut text = String::with_capacity(units.len());
        let mut at = 0;
        for c in char::decode_utf16(units.iter().map(|&(unit, _)| unit)) {
            match c {
                Ok(c) => {
                    text.push(c);
                    at += c.len_utf16();
                }
                Err(_) => return Err(units[at].1),
            }
        }
        Ok(text)
    }

    pub(super) fn encode(text: &str, out: &mut Vec<u8>) {
        let mut shifted: Vec<u16> = Vec::new();
        for c in text.chars() {
            if is_direct(c) {
                flush(&mut shifted, out);
                out.push(c as u8);
            } else if c == '+' {
                flush(&mut shifted, out);
                out.extend_from_slice(b"+-");
            } else {
                let mut buf = [0u16; 2];
                shifted.extend_from_slice(c.encode_utf16(&mut buf));
            }
        }
        flush(&mut shifted, out);
    }

    fn flush(units: &mut Vec<u16>, out: &mut Vec<u8>) {
        if units.is_empty() {
            return;
        }
        out.push(b'+');
        let mut bits: u32 = 0;
        let mut nbits = 0;
        for &unit in units.iter() {
            bits = (bits << 16) | unit as u32;
            nbits += 16;
            while nbits >= 6 {
                nbits -= 6;
                out.push(BASE64[((bits >> nbits) & 0x3F) as usize]);
            }
            bits &= (1 << nbits) - 1;
        }
        if nbits > 0 {
            out.push(BASE64[((bits << (6 - nbits)) & 0x3F) as usize]);
        }
        out.push(b'-');
        units.clear();
    }
}
