use std::fs;
use std::path::Path;

use goaster::{AsterError, LoadConfig, Module, ModuleBuilder};
use proptest::prelude::*;
use tempfile::tempdir;

fn build(files: &[(&str, &str)]) -> Module {
    let mut b = ModuleBuilder::new();
    for (name, src) in files {
        if let Err(e) = b.add_source(*name, src) {
            panic!("{name} failed to load: {e}");
        }
    }
    b.build()
}

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, text).expect("write fixture");
}

const DECLS: &str = r#"package p

// Point is a location.
type Point struct {
	X, Y int `json:"x"`
}

// Handler reacts to events.
type Handler func(ev string, args ...int) error

type (
	// Celsius is a temperature.
	Celsius float64

	Names []string
)

// Shape has an area.
type Shape interface {
	// Area of the shape.
	Area() float64
}

// Dist measures.
func Dist(a, b Point) float64 { return 0 }

// Move shifts the point.
func (p *Point) Move(dx, dy int) {
	p.X += dx
	p.Y += dy
}
"#;

#[test]
fn rendered_declarations_reclassify_identically() {
    let m = build(&[("a.go", DECLS)]);
    let mut checked = 0;
    // Top-level declarations only; interface methods render without a
    // declaration keyword.
    for node in m.package("p").expect("p").nodes() {
        let text = format!("package p\n\n{}", node.format());
        let again = build(&[("a.go", text.as_str())]);
        let twin = again
            .package("p")
            .and_then(|p| p.file("a.go"))
            .and_then(|f| f.nodes().next())
            .unwrap_or_else(|| panic!("{} vanished in:\n{text}", node.name()));
        assert_eq!(twin.name(), node.name(), "{text}");
        assert_eq!(twin.kind(), node.kind(), "{text}");
        assert_eq!(twin.doc(), node.doc(), "{text}");
        checked += 1;
    }
    assert!(checked >= 7);
}

#[test]
fn module_format_groups_by_package_and_file() {
    let m = build(&[
        ("b.go", "package p\n\ntype B int\n"),
        ("a.go", "package p\n\ntype A int\n"),
        ("q.go", "package q\n\nfunc F() {}\n"),
    ]);
    let out = m.format();
    let pkgs: Vec<_> = out.keys().map(String::as_str).collect();
    assert_eq!(pkgs, ["p", "q"]);
    let files: Vec<_> = out["p"].keys().map(String::as_str).collect();
    assert_eq!(files, ["a.go", "b.go"]);
    assert_eq!(out["p"]["a.go"], "package p\n\ntype A int\n");
    assert_eq!(out["q"]["q.go"], "package q\n\nfunc F() {}\n");
}

#[test]
fn failed_write_stops_the_batch() {
    let m = build(&[
        ("a.go", "package p\n\ntype A int\n"),
        ("b.go", "package p\n\ntype B int\n"),
        ("c.go", "package p\n\ntype C int\n"),
    ]);
    let root = tempdir().expect("tempdir");
    let pkg_dir = root.path().join("p");
    // A directory where b.go should go makes its write fail.
    fs::create_dir_all(pkg_dir.join("b.go")).expect("mkdir");
    write(&pkg_dir, "c.go", "sentinel");

    let err = m.store(root.path()).expect_err("b.go cannot be written");
    match err {
        AsterError::Io { path, .. } => assert_eq!(path, pkg_dir.join("b.go")),
        other => panic!("expected io error, got {other}"),
    }
    assert_eq!(
        fs::read_to_string(pkg_dir.join("a.go")).expect("a.go written"),
        "package p\n\ntype A int\n"
    );
    assert_eq!(fs::read_to_string(pkg_dir.join("c.go")).expect("c.go"), "sentinel");
}

#[test]
fn stored_package_loads_back() {
    let m = build(&[("a.go", DECLS), ("b.go", "package p\n\nfunc (p Point) String() string { return \"\" }\n")]);
    let out = tempdir().expect("tempdir");
    let dir = out.path().join("nested").join("p");
    m.package("p").expect("p").store(&dir).expect("store");

    let loaded = Module::load(&dir, &LoadConfig::default()).expect("reload");
    assert_eq!(loaded.dir(), Some(dir.as_path()));
    let pkg = loaded.package("p").expect("p");
    assert_eq!(pkg.dir(), Some(dir.as_path()));
    let point = pkg.lookup("Point").expect("Point");
    assert_eq!(point.num_method(), 2);
    assert_eq!(point.doc(), "Point is a location.\n");
    assert_eq!(loaded.format(), m.format());

    let single = tempdir().expect("tempdir");
    pkg.file("b.go").expect("b.go").store(single.path()).expect("store file");
    assert!(single.path().join("b.go").is_file());
}

#[test]
fn loader_selects_files() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "a.go", "package p\n\ntype A int\n");
    write(dir.path(), "a_test.go", "package p\n\ntype ATest int\n");
    write(dir.path(), "notes.txt", "not go");
    write(dir.path(), "sub/x.go", "package sub\n");

    let m = Module::load(dir.path(), &LoadConfig::default()).expect("load");
    assert_eq!(m.packages().count(), 1);
    let files: Vec<_> = m
        .package("p")
        .expect("p")
        .files()
        .map(|f| f.filename().to_owned())
        .collect();
    assert_eq!(files, ["a.go"]);
    assert!(m.lookup("p", "ATest").is_none());

    let m = Module::load(dir.path(), &LoadConfig::new().include_tests(true)).expect("load");
    assert!(m.lookup("p", "ATest").is_some());
    let path = m.lookup("p", "A").map(|n| n.filename());
    assert_eq!(path, Some("a.go"));
}

#[test]
fn syntax_errors_abort_loading() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "a.go", "package p\n\ntype A int\n");
    write(dir.path(), "bad.go", "package p\n\ntype T struct {\n\tX int\n\t+\n}\n");

    match Module::load(dir.path(), &LoadConfig::default()) {
        Err(AsterError::Parse { path, diags }) => {
            assert_eq!(path, dir.path().join("bad.go"));
            assert!(!diags.is_empty());
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    let err = Module::load(&missing, &LoadConfig::default()).expect_err("missing dir");
    assert!(matches!(err, AsterError::Io { .. }), "{err}");
}

fn field_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["int", "*T", "[]string", "map[string]int", "func(int) error", "chan int"])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn struct_round_trip_keeps_fields(
        doc in "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,3}",
        fields in prop::collection::vec(("[A-Z][a-z]{0,6}", field_type()), 0..6),
    ) {
        let mut src = format!("package p\n\n// {doc}\ntype S struct {{\n");
        for (name, typ) in &fields {
            src.push_str(&format!("\t{name} {typ}\n"));
        }
        src.push_str("}\n");

        let m = build(&[("a.go", src.as_str())]);
        let s = m.lookup("p", "S").expect("S");
        let text = format!("package p\n\n{}", s.format());
        let again = build(&[("a.go", text.as_str())]);
        let t = again.lookup("p", "S").expect("S");

        prop_assert_eq!(s.doc(), format!("{doc}\n"));
        prop_assert_eq!(t.doc(), s.doc());
        prop_assert_eq!(t.kind(), s.kind());
        prop_assert_eq!(t.num_field(), fields.len());
        for i in 0..fields.len() {
            prop_assert_eq!(t.field(i), s.field(i));
        }
    }
}
