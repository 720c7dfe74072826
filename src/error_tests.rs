use super::*;
use std::error::Error as _;

#[test]
fn display_messages() {
    let cases: Vec<(ErrorKind, &str)> = vec![
        (ErrorKind::FileTooLarge, "file is too large (maximum 4GiB)"),
        (ErrorKind::EmptyKey, "key must not be empty"),
        (ErrorKind::InvalidKey('='), "invalid character in key: `=`"),
        (ErrorKind::InvalidKey('\n'), "invalid character in key: `\\n`"),
        (
            ErrorKind::InvalidSection(']'),
            "invalid character in section name: `]`",
        ),
        (
            ErrorKind::InvalidValue('\r'),
            "invalid character in unescaped value: `\\r`",
        ),
        (
            ErrorKind::InvalidEncoding(Encoding::Utf16Le),
            "input is not valid UTF-16LE",
        ),
    ];

    for (kind, expected) in cases {
        let err = Error::from(kind);
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn kind_codes() {
    assert_eq!(ErrorKind::EmptyKey.to_string(), "empty-key");
    assert_eq!(format!("{:?}", ErrorKind::InvalidKey('[')), "invalid-key");
    assert_eq!(ErrorKind::FileTooLarge.to_string(), "file-too-large");
}

#[test]
fn io_errors_keep_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = Error::from(io);
    assert!(err.kind.is_not_found());
    assert!(err.source().is_some());
    assert_eq!(err.to_string(), "i/o error: gone");

    let err = Error::from(ErrorKind::EmptyKey);
    assert!(!err.kind.is_not_found());
    assert!(err.source().is_none());
}

#[test]
fn decode_errors_point_at_bytes() {
    let err = Encoding::Utf8.decode(b"k=\xFFv").unwrap_err();
    assert_eq!(err.span, Some(Span::new(2, 3)));

    // Unpaired high surrogate after the mark and one unit.
    let err = Encoding::Utf16Le.decode(&[0xFF, 0xFE, b'k', 0, 0x00, 0xD8, b'x', 0]).unwrap_err();
    assert_eq!(err.span, Some(Span::new(4, 6)));

    let err = Encoding::Utf32Be.decode(&[0, 0, 0, b'k', 0, 0x11, 0, 0]).unwrap_err();
    assert_eq!(err.span, Some(Span::new(4, 8)));

    let err = Encoding::Utf7.decode(b"ab\xC3").unwrap_err();
    assert_eq!(err.span, Some(Span::new(2, 3)));

    assert!(Error::from(ErrorKind::EmptyKey).span.is_none());
}
