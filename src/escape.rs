//! Backslash escaping of control characters inside entry values.
//!
//! [`escape`] only produces the two-character forms (`\t`, `\n`, ...), while
//! [`unescape`] also understands `\xHH`, `\uHHHH` and `\cX`. Neither function
//! ever fails: malformed escapes resolve to `?` or are kept literally.

use std::borrow::Cow;

#[cfg(test)]
#[path = "./escape_tests.rs"]
mod tests;

/// Replacement for escapes whose payload is not a valid character.
const INVALID: char = '?';

#[inline]
fn escape_letter(c: char) -> Option<char> {
    Some(match c {
        '\\' => '\\',
        '\0' => '0',
        '\u{7}' => 'a',
        '\u{8}' => 'b',
        '\n' => 'n',
        '\r' => 'r',
        '\u{c}' => 'f',
        '\t' => 't',
        '\u{b}' => 'v',
        _ => return None,
    })
}

#[inline]
fn unescape_letter(c: char) -> Option<char> {
    Some(match c {
        '\\' => '\\',
        '0' => '\0',
        'a' => '\u{7}',
        'b' => '\u{8}',
        'n' => '\n',
        'r' => '\r',
        'f' => '\u{c}',
        't' => '\t',
        'v' => '\u{b}',
        _ => return None,
    })
}

/// Escapes backslashes and control characters in `value`.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// ```
/// assert_eq!(iniedit::escape("a\tb\\c"), "a\\tb\\\\c");
/// ```
pub fn escape(value: &str) -> Cow<'_, str> {
    let Some(first) = value.find(|c| escape_letter(c).is_some()) else {
        return Cow::Borrowed(value);
    };

    let mut out = String::with_capacity(value.len() + 4);
    out.push_str(&value[..first]);
    for c in value[first..].chars() {
        match escape_letter(c) {
            Some(letter) => {
                out.push('\\');
                out.push(letter);
            }
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Expands backslash escapes in `text`.
///
/// Returns the input unchanged (borrowed) when it contains no backslash.
///
/// ```
/// assert_eq!(iniedit::unescape("a\\tb"), "a\tb");
/// assert_eq!(iniedit::unescape("\\x41\\u00e9\\cJ"), "A\u{e9}\n");
/// assert_eq!(iniedit::unescape("C:\\q"), "C:\\q");
/// ```
pub fn unescape(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find('\\') else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut rest = &text[first..];
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let consumed = unescape_one(rest, &mut out);
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes the escape at the start of `text` (which begins with `\`) into
/// `out`, returning the number of bytes consumed.
fn unescape_one(text: &str, out: &mut String) -> usize {
    let mut chars = text[1..].chars();
    let Some(letter) = chars.next() else {
        out.push('\\');
        return 1;
    };
    let after_letter = 1 + letter.len_utf8();

    if let Some(c) = unescape_letter(letter) {
        out.push(c);
        return after_letter;
    }

    match letter {
        'x' | 'u' => {
            let digits = if letter == 'x' { 2 } else { 4 };
            let payload = &text[after_letter..];
            let Some(len) = prefix_len(payload, digits) else {
                // Not enough characters left: keep the backslash literally.
                out.push('\\');
                return 1;
            };
            let ch = u32::from_str_radix(&payload[..len], 16)
                .ok()
                .filter(|_| payload[..len].bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(char::from_u32)
                .unwrap_or(INVALID);
            out.push(ch);
            after_letter + len
        }
        'c' => {
            let Some(target) = chars.next() else {
                out.push('\\');
                return 1;
            };
            out.push(control_char(target));
            after_letter + target.len_utf8()
        }
        other => {
            out.push('\\');
            out.push(other);
            after_letter
        }
    }
}

/// Byte length of the first `count` characters of `text`, if it has that many.
fn prefix_len(text: &str, count: usize) -> Option<usize> {
    match text.char_indices().nth(count) {
        Some((idx, _)) => Some(idx),
        None if text.chars().count() == count => Some(text.len()),
        None => None,
    }
}

/// Resolves the `X` of a `\cX` escape.
fn control_char(target: char) -> char {
    let upper = target.to_ascii_uppercase() as u32;
    match upper.checked_sub(0x40) {
        Some(code @ 0x00..=0x1F) => char::from_u32(code).unwrap_or(INVALID),
        _ => INVALID,
    }
}
