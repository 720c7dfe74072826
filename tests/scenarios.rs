//! End-to-end behaviour of loading, editing and saving documents.

use iniedit::{Comparison, Document, Encoding, Options, escape, unescape};
use pretty_assertions::assert_eq;

fn lf() -> Options {
    Options::default().with_newline("\n")
}

#[test]
fn first_write_to_empty_document() {
    let mut doc = Document::new();
    doc.write_string("", "x", "1").unwrap();
    assert_eq!(doc.as_str(), format!("x=1{}", iniedit::DEFAULT_NEWLINE));
}

#[test]
fn reads_from_section_and_global_scope() {
    let doc = Document::parse("[a]\nk=1\n").unwrap();
    assert_eq!(doc.read_string("a", "k", ""), "1");

    let doc = Document::parse("k=1\nk=2\n").unwrap();
    assert_eq!(doc.read_strings("", "k"), ["1", "2"]);
}

#[test]
fn insertion_skips_blank_lines_before_next_section() {
    let mut doc = Document::parse("[a]\nx=1\n\n[b]\ny=2\n").unwrap();
    doc.write_string("a", "z", "9").unwrap();
    assert_eq!(doc.as_str(), "[a]\nx=1\n\nz=9\n[b]\ny=2\n");
}

#[test]
fn escaped_values_are_stored_encoded() {
    let mut doc = Document::with_options(lf().with_escape(true));
    doc.write_string("", "p", "a\tb").unwrap();
    assert_eq!(doc.as_str(), "p=a\\tb\n");
    assert_eq!(doc.read_string("", "p", ""), "a\tb");

    assert_eq!(escape("a\tb\\c"), "a\\tb\\\\c");
    assert_eq!(unescape(&escape("a\tb\\c")), "a\tb\\c");
}

#[test]
fn set_then_get() {
    let mut doc = Document::parse_with("; header\n\n[s]\nother = 1\n", lf()).unwrap();
    for (section, key, value) in [
        ("s", "k", "v"),
        ("s", "k", "replaced"),
        ("", "global", "g"),
        ("new section", "spaced key", "with spaces inside"),
        ("s", "unicode", "\u{e9}t\u{e9}"),
    ] {
        doc.write_string(section, key, value).unwrap();
        assert_eq!(doc.read_string(section, key, "?"), value);
    }
    assert_eq!(doc.read_string("s", "other", ""), "1");
    assert!(doc.as_str().starts_with("global=g\n; header\n"));
}

#[test]
fn deletion_removes_the_line() {
    let mut doc = Document::parse("[s]\na=1\nk=2\nb=3\n").unwrap();
    doc.write_string("s", "k", "").unwrap();
    assert_eq!(doc.keys("s"), ["a", "b"]);
    assert_eq!(doc.as_str(), "[s]\na=1\nb=3\n");
}

#[test]
fn multi_value_order_is_kept() {
    let mut doc = Document::new();
    doc.write_strings("", "k", &["1", "2", "3"]).unwrap();
    assert_eq!(doc.read_strings("", "k"), ["1", "2", "3"]);
}

#[test]
fn case_policy_governs_matching() {
    let mut doc = Document::new();
    doc.write_string("A", "K", "v").unwrap();
    assert_eq!(doc.read_string("a", "k", ""), "v");

    let mut strict = Document::with_options(lf().with_comparison(Comparison::Ordinal));
    strict.write_string("A", "K", "v").unwrap();
    assert_eq!(strict.read_string("a", "k", "none"), "none");
    assert_eq!(strict.read_string("A", "K", "none"), "v");
}

#[test]
fn comments_and_layout_survive_edits() {
    let text = "\
# Main configuration
[server]
    host   =  example.org     ; primary
    port   :  80

# Limits
[limits]
max = 10
";
    let mut doc = Document::parse(text).unwrap();
    doc.write_string("server", "host", "example.net").unwrap();
    doc.write("server", "port", &443u16).unwrap();
    doc.write("limits", "min", &1u8).unwrap();
    assert_eq!(
        doc.as_str(),
        "\
# Main configuration
[server]
    host   =  example.net     ; primary
    port   :  443

# Limits
[limits]
max = 10
min=1
"
    );
}

#[test]
fn file_roundtrip_preserves_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.ini");
    let text = "; crlf file\r\n[s]\r\nk = v\r\n";
    std::fs::write(&path, Encoding::Utf16Le.encode(text)).unwrap();

    let mut doc = Document::load(&path, Options::default()).unwrap();
    assert_eq!(doc.encoding(), Encoding::Utf16Le);
    assert_eq!(doc.newline(), "\r\n");
    doc.save(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), Encoding::Utf16Le.encode(text));

    doc.write_string("s", "added", "1").unwrap();
    doc.save(&path).unwrap();
    let reloaded = Document::load(&path, Options::default()).unwrap();
    assert_eq!(reloaded.as_str(), "; crlf file\r\n[s]\r\nk = v\r\nadded=1\r\n");
}

#[test]
fn missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.ini");
    let err = Document::load(&path, Options::default()).unwrap_err();
    assert!(err.kind.is_not_found());
    assert!(err.to_string().contains("i/o error"));

    let doc = Document::load_or_create(&path, Options::default()).unwrap();
    assert!(doc.is_empty());
    assert!(!path.exists());
}
