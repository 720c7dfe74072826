use super::*;
use crate::Options;
use pretty_assertions::assert_eq;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Mode {
    Fast,
    Safe,
    Legacy,
}

const MODES: Variants<Mode> = Variants::new(&[("fast", Mode::Fast), ("safe", Mode::Safe)]);

fn lf(text: &str) -> Document {
    Document::parse_with(text, Options::default().with_newline("\n")).unwrap()
}

#[test]
fn booleans() {
    let cmp = Comparison::IgnoreCase;
    for text in ["true", "YES", "On", "enable", "1", "2", "-0.5", " 10 "] {
        assert_eq!(bool::from_ini(text, cmp), Some(true), "{text:?}");
    }
    for text in ["false", "No", "OFF", "Disable", "0", "0.0", "-0"] {
        assert_eq!(bool::from_ini(text, cmp), Some(false), "{text:?}");
    }
    for text in ["", "maybe", "y", "nan", "inf", "truthy"] {
        assert_eq!(bool::from_ini(text, cmp), None, "{text:?}");
    }

    assert_eq!(bool::from_ini("YES", Comparison::Ordinal), None);
    assert_eq!(bool::from_ini("yes", Comparison::Ordinal), Some(true));
    assert_eq!(true.to_ini().as_deref(), Some("true"));
}

#[test]
fn numbers_and_text() {
    let cmp = Comparison::default();
    assert_eq!(i32::from_ini("-42", cmp), Some(-42));
    assert_eq!(u8::from_ini("256", cmp), None);
    assert_eq!(u64::from_ini("0x10", cmp), None);
    assert_eq!(f64::from_ini("2.5", cmp), Some(2.5));
    assert_eq!(char::from_ini("x", cmp), Some('x'));
    assert_eq!(char::from_ini("xy", cmp), None);
    assert_eq!(char::from_ini("", cmp), None);
    assert_eq!(String::from_ini("as is", cmp).as_deref(), Some("as is"));
    assert_eq!(
        PathBuf::from_ini("/tmp/a b", cmp),
        Some(PathBuf::from("/tmp/a b"))
    );

    assert_eq!(Option::<u32>::from_ini("", cmp), Some(None));
    assert_eq!(Option::<u32>::from_ini("7", cmp), Some(Some(7)));
    assert_eq!(Option::<u32>::from_ini("x", cmp), None);
    assert_eq!(None::<u32>.to_ini(), None);
    assert_eq!(1.5f32.to_ini().as_deref(), Some("1.5"));
}

#[test]
fn typed_reads_fall_back_to_default() {
    let doc = lf("[net]\nport = 8080\nretries = many\nverbose = on\nratio = 0.25\n");
    assert_eq!(doc.read("net", "port", 80u16), 8080);
    assert_eq!(doc.read("net", "retries", 3u32), 3);
    assert_eq!(doc.read("net", "missing", 5i64), 5);
    assert!(doc.read("net", "verbose", false));
    assert_eq!(doc.read("net", "ratio", 1.0f64), 0.25);
    assert_eq!(doc.read("net", "port", None::<u16>), Some(8080));
    assert_eq!(doc.read("net", "retries", Some(1u32)), Some(1));
}

#[test]
fn typed_arrays_are_all_or_nothing() {
    let doc = lf("[a]\nn = 1\nn = 2\nn = 3\nm = 1\nm = x\n");
    assert_eq!(doc.read_array::<u8>("a", "n"), [1, 2, 3]);
    assert!(doc.read_array::<u8>("a", "m").is_empty());
    assert!(doc.read_array::<u8>("a", "none").is_empty());
    assert_eq!(doc.read_array::<String>("a", "m"), ["1", "x"]);
}

#[test]
fn variants_converter() {
    let mut doc = lf("[run]\nmode = SAFE\nother = turbo\n");
    assert_eq!(doc.read_with(&MODES, "run", "mode", Mode::Fast), Mode::Safe);
    assert_eq!(doc.read_with(&MODES, "run", "other", Mode::Fast), Mode::Fast);

    doc.write_with(&MODES, "run", "mode", &Mode::Fast).unwrap();
    assert_eq!(doc.as_str(), "[run]\nmode = fast\nother = turbo\n");

    // Unnamed values are not written.
    doc.write_with(&MODES, "run", "mode", &Mode::Legacy).unwrap();
    assert_eq!(doc.read_string("run", "mode", ""), "fast");

    let ordinal = Document::parse_with(
        "mode = SAFE",
        Options::default().with_comparison(Comparison::Ordinal),
    )
    .unwrap();
    assert_eq!(ordinal.read_with(&MODES, "", "mode", Mode::Fast), Mode::Fast);
}

#[test]
fn custom_converter() {
    let hex = Custom::new(
        |text: &str| u32::from_str_radix(text.trim_start_matches("0x"), 16).ok(),
        |value: &u32| Some(format!("0x{value:x}")),
    );
    let mut doc = lf("color = 0xff00\n");
    assert_eq!(doc.read_with(&hex, "", "color", 0), 0xff00);

    doc.write_with(&hex, "", "color", &0xabc).unwrap();
    assert_eq!(doc.as_str(), "color = 0xabc\n");

    doc.write_array_with(&hex, "", "mask", &[1, 255]).unwrap();
    assert_eq!(doc.read_array_with(&hex, "", "mask"), [1, 255]);
}

#[test]
fn typed_writes() {
    let mut doc = lf("[w]\nwidth = 640\n");
    doc.write("w", "width", &800u32).unwrap();
    doc.write("w", "maximized", &true).unwrap();
    doc.write("w", "title", "main").unwrap();
    doc.write("w", "icon", &PathBuf::from("a/b.png")).unwrap();
    assert_eq!(
        doc.as_str(),
        "[w]\nwidth = 800\nmaximized=true\ntitle=main\nicon=a/b.png\n"
    );
}

#[test]
fn none_is_not_written() {
    let mut doc = lf("[w]\nwidth = 640\n");
    doc.write("w", "width", &None::<u32>).unwrap();
    doc.write("w", "height", &None::<u32>).unwrap();
    assert_eq!(doc.as_str(), "[w]\nwidth = 640\n");

    doc.write("w", "height", &Some(480u32)).unwrap();
    assert_eq!(doc.read("w", "height", 0u32), 480);
}

#[test]
fn typed_array_writes() {
    let mut doc = lf("[list]\nitem = a\n");
    doc.write_array("list", "item", &[1, 2, 3]).unwrap();
    assert_eq!(doc.as_str(), "[list]\nitem = 1\nitem=2\nitem=3\n");

    // One missing element cancels the whole write.
    doc.write_array("list", "item", &[Some(9), None]).unwrap();
    assert_eq!(doc.read_array::<u8>("list", "item"), [1, 2, 3]);

    assert!(doc.write_array("list", "bad=key", &[1]).is_err());
}
