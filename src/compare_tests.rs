use super::*;

#[test]
fn ordinal_is_exact() {
    let cmp = Comparison::Ordinal;
    assert!(cmp.equals("Key", "Key"));
    assert!(!cmp.equals("Key", "key"));
    assert!(matches!(cmp.fold("MiXeD"), Cow::Borrowed("MiXeD")));
    assert!(!cmp.is_case_insensitive());
}

#[test]
fn ascii_case() {
    let cmp = Comparison::IgnoreAsciiCase;
    assert!(cmp.equals("Key", "kEY"));
    assert!(!cmp.equals("\u{c9}t\u{e9}", "\u{e9}t\u{e9}"));
    assert_eq!(cmp.fold("MiXeD"), "mixed");
    assert!(matches!(cmp.fold("lower"), Cow::Borrowed("lower")));
}

#[test]
fn unicode_case() {
    let cmp = Comparison::IgnoreCase;
    assert!(cmp.equals("Key", "kEY"));
    assert!(cmp.equals("\u{c9}t\u{e9}", "\u{e9}t\u{e9}"));
    assert!(!cmp.equals("key", "keys"));
    assert_eq!(cmp.fold("\u{c9}T\u{c9}"), "\u{e9}t\u{e9}");
    assert!(matches!(cmp.fold("plain"), Cow::Borrowed("plain")));
    assert_eq!(Comparison::default(), Comparison::IgnoreCase);
}
