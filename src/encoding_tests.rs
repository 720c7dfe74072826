use super::*;

#[test]
fn detect_byte_order_marks() {
    let cases: &[(&[u8], Option<Encoding>)] = &[
        (&[0xFF, 0xFE, 0x00, 0x00, b'a', 0, 0, 0], Some(Encoding::Utf32Le)),
        (&[0x00, 0x00, 0xFE, 0xFF], Some(Encoding::Utf32Be)),
        (b"+/v8-abc", Some(Encoding::Utf7)),
        (b"+/v9", Some(Encoding::Utf7)),
        (&[0xEF, 0xBB, 0xBF, b'k'], Some(Encoding::Utf8Bom)),
        (&[0xEF, 0xBB, 0xBF], Some(Encoding::Utf8Bom)),
        (&[0xFF, 0xFE, b'k', 0x00], Some(Encoding::Utf16Le)),
        (&[0xFE, 0xFF], Some(Encoding::Utf16Be)),
        (b"+/v", None),
        (b"k=v", None),
        (&[0xEF, 0xBB], None),
        (&[], None),
    ];

    for (bytes, expected) in cases {
        assert_eq!(Encoding::detect(bytes), *expected, "bytes: {bytes:x?}");
    }
}

#[test]
fn encode_then_detect_and_decode() {
    let text = "[s\u{e9}ction]\r\nkey=v\u{e4}lue \u{1f600} + \\ ~\r\n";
    for encoding in [
        Encoding::Utf8,
        Encoding::Utf8Bom,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Utf32Le,
        Encoding::Utf32Be,
        Encoding::Utf7,
    ] {
        let bytes = encoding.encode(text);
        assert!(bytes.starts_with(encoding.bom()));
        let detected = Encoding::detect(&bytes).unwrap_or_default();
        assert_eq!(detected, encoding, "{encoding}");
        assert_eq!(detected.decode(&bytes).unwrap(), text, "{encoding}");
    }
}

#[test]
fn utf8_decoding_drops_stray_bom() {
    let bytes = [0xEF, 0xBB, 0xBF, b'a', b'=', b'1'];
    assert_eq!(Encoding::Utf8.decode(&bytes).unwrap(), "a=1");
    assert_eq!(Encoding::Utf8Bom.decode(&bytes).unwrap(), "a=1");
    assert_eq!(Encoding::Utf8Bom.decode(b"a=1").unwrap(), "a=1");
}

#[test]
fn invalid_input_is_reported() {
    let err = Encoding::Utf8.decode(&[b'a', 0xFF]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidEncoding(Encoding::Utf8)));

    let err = Encoding::Utf16Le.decode(&[0xFF, 0xFE, b'a']).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidEncoding(Encoding::Utf16Le)));

    // Unpaired high surrogate.
    let err = Encoding::Utf16Be.decode(&[0xD8, 0x00]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidEncoding(Encoding::Utf16Be)));

    let err = Encoding::Utf32Le.decode(&[0x00, 0x00, 0x11, 0x00]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidEncoding(Encoding::Utf32Le)));

    let err = Encoding::Utf7.decode(&[b'a', 0xC3]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidEncoding(Encoding::Utf7)));
}

#[test]
fn utf7_known_forms() {
    assert_eq!(Encoding::Utf7.decode(b"Hi Mom -+Jjo--!").unwrap(), "Hi Mom -\u{263a}-!");
    assert_eq!(Encoding::Utf7.decode(b"1 +- 1").unwrap(), "1 + 1");
    assert_eq!(Encoding::Utf7.decode(b"+/v8-x=1").unwrap(), "x=1");

    let mut out = Vec::new();
    super::utf7::encode("A\u{2262}\u{391}.", &mut out);
    assert_eq!(out, b"A+ImIDkQ-.");
}

#[test]
fn newline_detection() {
    assert_eq!(detect_newline("a\r\nb"), "\r\n");
    assert_eq!(detect_newline("a\nb\rc"), "\r\n");
    assert_eq!(detect_newline("a\nb"), "\n");
    assert_eq!(detect_newline("a\rb"), "\r");
    assert_eq!(detect_newline("abc"), DEFAULT_NEWLINE);
    assert_eq!(detect_newline(""), DEFAULT_NEWLINE);
}

#[test]
fn utf7_signature_shares_first_run() {
    let bytes = Encoding::Utf7.encode("\u{4e2d}=1");
    assert_eq!(bytes, b"+/v9OLQ-=1");
    assert_eq!(Encoding::detect(&bytes), Some(Encoding::Utf7));
    assert_eq!(Encoding::Utf7.decode(&bytes).unwrap(), "\u{4e2d}=1");

    assert!(Encoding::Utf7.encode("k=1").starts_with(b"+/v8-k"));
    assert_eq!(Encoding::Utf7.encode_without_bom("k=1"), b"k=1");
}

#[test]
fn encode_without_bom_has_no_mark() {
    assert_eq!(Encoding::Utf16Be.encode_without_bom("k"), [0, b'k']);
    assert_eq!(Encoding::Utf8Bom.encode_without_bom("k"), b"k");
    assert_eq!(Encoding::Utf32Le.encode_without_bom("k"), [b'k', 0, 0, 0]);
}
