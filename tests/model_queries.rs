use goaster::{Kind, Module, ModuleBuilder};

fn build(files: &[(&str, &str)]) -> Module {
    let mut b = ModuleBuilder::new();
    for (name, src) in files {
        if let Err(e) = b.add_source(*name, src) {
            panic!("{name} failed to load: {e}");
        }
    }
    b.build()
}

fn single(src: &str) -> Module {
    build(&[("a.go", src)])
}

#[test]
fn classifies_every_shape() {
    let m = single(
        r#"package p

import "io"

type (
	B    bool
	I    int
	U8   uint8
	F64  float64
	C128 complex128
	S    string
	P    *int
	A    [4]int
	Sl   []int
	M    map[string]int
	Ch   chan int
	St   struct{}
	If   interface{}
	Fn   func()
	Par  (int)
	R    io.Reader
	By   byte
	Fwd  Later
)

type Later struct {
	X int
}
"#,
    );

    let want = [
        ("B", Kind::Bool),
        ("I", Kind::Int),
        ("U8", Kind::Uint8),
        ("F64", Kind::Float64),
        ("C128", Kind::Complex128),
        ("S", Kind::String),
        ("P", Kind::Ptr),
        ("A", Kind::Array),
        ("Sl", Kind::Slice),
        ("M", Kind::Map),
        ("Ch", Kind::Chan),
        ("St", Kind::Struct),
        ("If", Kind::Interface),
        ("Fn", Kind::Func),
        ("Par", Kind::Int),
        ("R", Kind::Suspense),
        ("By", Kind::Suspense),
        ("Fwd", Kind::Struct),
        ("Later", Kind::Struct),
    ];
    for (name, kind) in want {
        let node = m.lookup("p", name).unwrap_or_else(|| panic!("{name} missing"));
        assert_eq!(node.kind(), kind, "{name}");
        assert_eq!(node.pkg_name(), "p");
        assert_eq!(node.filename(), "a.go");
    }

    let fwd = m.lookup("p", "Fwd").expect("Fwd");
    assert_eq!(fwd.num_field(), 1);
    assert_eq!(fwd.field(0).map(|f| f.name.as_str()), Some("X"));
}

#[test]
fn building_twice_gives_the_same_kinds() {
    let src = "package p\ntype A B\ntype B C\ntype C map[string]A\ntype D E\ntype E D\n";
    let kinds = |m: &Module| {
        let mut v: Vec<_> = m.nodes().map(|n| (n.name().to_owned(), n.kind())).collect();
        v.sort();
        v
    };
    let first = kinds(&single(src));
    assert_eq!(first, kinds(&single(src)));
    assert!(first.contains(&("A".to_owned(), Kind::Map)));
    assert!(first.contains(&("D".to_owned(), Kind::Suspense)));
}

#[test]
fn forward_references_resolve_across_files() {
    let m = build(&[
        ("a.go", "package p\ntype Alias = Target\n"),
        ("b.go", "package p\ntype Target []string\n"),
    ]);
    let alias = m.lookup("p", "Alias").expect("Alias");
    assert_eq!(alias.kind(), Kind::Slice);
    assert!(alias.is_assign());
    assert!(!m.lookup("p", "Target").expect("Target").is_assign());
    assert_eq!(m.unresolved().count(), 0);
}

#[test]
fn struct_fields_in_declaration_order() {
    let m = single(
        r#"package p

import "io"

type Person struct {
	Name, Nick string `json:"name"`
	Age        int
	*Base
	io.Writer
}

type Base struct {
	ID int
}
"#,
    );
    let p = m.lookup("p", "Person").expect("Person");
    assert_eq!(p.num_field(), 5);
    let names: Vec<_> = (0..p.num_field())
        .filter_map(|i| p.field(i))
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, ["Name", "Nick", "Age", "Base", "Writer"]);

    let nick = p.field_by_name("Nick").expect("Nick");
    assert_eq!(nick.type_name, "string");
    assert_eq!(nick.tag.as_deref(), Some("`json:\"name\"`"));
    assert!(!nick.embedded);

    let base = p.field_by_name("Base").expect("Base");
    assert!(base.embedded);
    assert_eq!(base.type_name, "*Base");

    // Fields of embedded structs are not promoted.
    assert!(p.field_by_name("ID").is_none());
    assert!(p.field(5).is_none());
}

#[test]
fn function_signatures() {
    let m = single(
        r#"package p

func Sum(base int, xs ...float64) (total float64, err error) {
	return 0, nil
}

func H(int, string) error { return nil }

func (p *Person) Rename(a, b string, _ int, opts *Options) {}

type Person struct{}
"#,
    );

    let sum = m.lookup("p", "Sum").expect("Sum");
    assert_eq!(sum.kind(), Kind::Func);
    assert!(sum.is_func_node());
    assert_eq!(sum.num_param(), 2);
    assert!(sum.is_variadic());
    assert_eq!(sum.param(1).map(|f| f.type_name.as_str()), Some("[]float64"));
    assert_eq!(sum.num_result(), 2);
    assert_eq!(sum.result(0).map(|f| f.name.as_str()), Some("total"));
    assert!(sum.result(2).is_none());
    assert!(sum.recv().is_none());

    let h = m.lookup("p", "H").expect("H");
    assert_eq!(h.num_param(), 2);
    assert!(h.param(0).is_some_and(|f| f.name.is_empty() && f.type_name == "int"));
    assert!(!h.is_variadic());

    // Methods are not in package scope.
    assert!(m.lookup("p", "Rename").is_none());
    let rename = m
        .lookup("p", "Person")
        .and_then(|p| p.method_by_name("Rename"))
        .expect("Rename attached");
    let params: Vec<_> = (0..rename.num_param())
        .filter_map(|i| rename.param(i))
        .map(|f| (f.name.as_str(), f.type_name.as_str(), f.pointer))
        .collect();
    assert_eq!(
        params,
        [
            ("a", "string", false),
            ("b", "string", false),
            ("_", "int", false),
            ("opts", "Options", true),
        ]
    );
    let recv = rename.recv().expect("receiver");
    assert_eq!((recv.name.as_str(), recv.type_name.as_str(), recv.pointer), ("p", "Person", true));
}

#[test]
fn doc_comments_follow_declarations() {
    let m = single(
        r#"// Package p is documented.
package p

// Circle is round.
//
// It has a radius.
type Circle struct {
	R float64
}

type (
	// A is grouped.
	A int

	B int
)

// New makes a circle.
//go:noinline
func New() Circle { return Circle{} }

// Orphan comment.

func Bare() {}
"#,
    );
    let doc = |name: &str| m.lookup("p", name).expect(name).doc().to_owned();
    assert_eq!(doc("Circle"), "Circle is round.\n\nIt has a radius.\n");
    assert_eq!(doc("A"), "A is grouped.\n");
    assert_eq!(doc("B"), "");
    assert_eq!(doc("New"), "New makes a circle.\n");
    assert_eq!(doc("Bare"), "");
}

#[test]
fn nodes_are_registered_by_position() {
    let src = "package p\n\ntype T int\n\nfunc (t T) M() {}\n\nfunc F() {}\n";
    let m = single(src);
    let file = m.package("p").and_then(|p| p.file("a.go")).expect("file");
    let names: Vec<_> = file.nodes().map(|n| n.name()).collect();
    assert_eq!(names, ["T", "M", "F"]);

    let pos = src.find("T int").expect("T") as u32;
    assert_eq!(file.node_at(pos).map(|n| n.name()), Some("T"));
    assert_eq!(m.lookup("p", "F").expect("F").line_col(), (7, 1));
}

#[test]
fn interface_methods_are_func_nodes() {
    let m = single("package p\ntype Shape interface {\n\t// Area in square units.\n\tArea() float64\n\tScale(f float64)\n}\n");
    let shape = m.lookup("p", "Shape").expect("Shape");
    assert_eq!(shape.num_method(), 2);
    let area = shape.method(0).expect("Area");
    assert_eq!(area.name(), "Area");
    assert_eq!(area.kind(), Kind::Func);
    assert_eq!(area.doc(), "Area in square units.\n");
    assert_eq!(area.num_result(), 1);
    assert_eq!(area.format(), "// Area in square units.\nArea() float64\n");
    assert!(shape.method(2).is_none());
    assert!(shape.method_by_name("Perimeter").is_none());
}

#[test]
fn typed_views_match_node_kind() {
    let m = single("package p\ntype T struct{ X int }\nfunc F() {}\n");
    let t = m.lookup("p", "T").expect("T");
    let f = m.lookup("p", "F").expect("F");
    assert!(t.as_type().is_some() && t.as_func().is_none());
    assert!(f.as_func().is_some() && f.as_type().is_none());
    assert_eq!(t.as_type().map(|t| t.fields().len()), Some(1));
    assert_eq!(f.as_func().map(|f| f.params().len()), Some(0));
}

#[test]
#[should_panic(expected = "aster: Kind must be Struct")]
fn field_on_non_struct_panics() {
    let m = single("package p\ntype T int\n");
    let _ = m.lookup("p", "T").map(|t| t.num_field());
}

#[test]
#[should_panic(expected = "aster: Kind must be Func")]
fn param_on_type_panics() {
    let m = single("package p\ntype T int\n");
    let _ = m.lookup("p", "T").map(|t| t.param(0));
}

#[test]
#[should_panic(expected = "aster: Kind can not be Func")]
fn method_on_func_panics() {
    let m = single("package p\nfunc F() {}\n");
    let _ = m.lookup("p", "F").map(|f| f.num_method());
}
