use goaster_syntax::ast::*;
use goaster_syntax::printer::print_file;
use goaster_syntax::walk::{Visitor, Walk};
use goaster_syntax::{parse_source, ParsedFile};
use proptest::prelude::*;

fn parse(src: &str) -> ParsedFile {
    match parse_source(src) {
        Ok(pf) => pf,
        Err(e) => panic!("parse failed for {src:?}: {e}"),
    }
}

/// Collects declared names through the visitor hooks.
#[derive(Default)]
struct Names {
    types: Vec<String>,
    funcs: Vec<String>,
    imports: Vec<String>,
    values: Vec<String>,
}

struct Collector<'a> {
    pf: &'a ParsedFile,
    out: Names,
}

impl<'ast> Visitor<'ast> for Collector<'ast> {
    fn visit_type_spec(&mut self, a: &'ast AstArena, spec: &'ast TypeSpec) {
        self.out.types.push(self.pf.resolve(spec.name).to_owned());
        spec.walk(a, self);
    }

    fn visit_import_spec(&mut self, _: &'ast AstArena, spec: &'ast ImportSpec) {
        self.out.imports.push(self.pf.text(spec.path.raw).to_owned());
    }

    fn visit_value_spec(&mut self, a: &'ast AstArena, spec: &'ast ValueSpec) {
        for n in a.ident_names(spec.names) {
            self.out.values.push(self.pf.resolve(n.sym).to_owned());
        }
    }

    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        self.out.funcs.push(self.pf.resolve(a.funcs[id].name).to_owned());
        a.funcs[id].walk(a, self);
    }
}

fn collect(pf: &ParsedFile) -> Names {
    let mut c = Collector {
        pf,
        out: Names::default(),
    };
    c.visit_source_file(&pf.arena, &pf.file);
    c.out
}

#[test]
fn visitor_sees_every_declaration() {
    let src = r#"package shapes

import (
	"fmt"
	"math"
)

const Pi = math.Pi

var (
	a, b = 1, 2
)

type Shape interface {
	Area() float64
}

type (
	Circle struct{ R float64 }
	Square struct{ S float64 }
)

func (c Circle) Area() float64 { return Pi * c.R * c.R }

func Describe(s Shape) string {
	return fmt.Sprintf("%v", s.Area())
}
"#;
    let names = collect(&parse(src));
    assert_eq!(names.types, ["Shape", "Circle", "Square"]);
    assert_eq!(names.funcs, ["Area", "Describe"]);
    assert_eq!(names.imports, ["\"fmt\"", "\"math\""]);
    assert_eq!(names.values, ["Pi", "a", "b"]);
}

#[test]
fn generic_receivers_and_type_params() {
    let src = "package p\n\ntype List[T any] struct {\n\thead *node[T]\n}\n\nfunc (l *List[T]) Push(v T) {}\n\nfunc Map[T, U any](xs []T, f func(T) U) []U { return nil }\n";
    let pf = parse(src);
    let names = collect(&pf);
    assert_eq!(names.funcs, ["Push", "Map"]);

    let TopLevelDecl::Func(id) = pf.decls()[1] else {
        panic!("expected method");
    };
    let recv = pf.arena.funcs[id].recv.expect("receiver");
    let Type::Pointer { elem, .. } = pf.arena.types[recv.typ] else {
        panic!("expected pointer receiver");
    };
    let Type::Named { name, args, .. } = pf.arena.types[elem] else {
        panic!("expected named receiver base");
    };
    assert_eq!(pf.resolve(name), "List");
    assert_eq!(args.len(), 1);

    let TopLevelDecl::Func(map_id) = pf.decls()[2] else {
        panic!("expected func");
    };
    let tp = pf.arena.funcs[map_id].type_params.map(|s| pf.text(s));
    assert_eq!(tp, Some("[T, U any]"));
}

#[test]
fn unnamed_generic_receivers_and_params_are_types() {
    let src = "package p\n\nfunc (Set[T]) Len() int { return 0 }\n\nfunc (Pair[K, V]) Swap(Pair[V, K], n [2]int) {}\n";
    let pf = parse(src);
    assert_eq!(collect(&pf).funcs, ["Len", "Swap"]);

    let TopLevelDecl::Func(len) = pf.decls()[0] else {
        panic!("expected method");
    };
    let recv = pf.arena.funcs[len].recv.expect("receiver");
    assert!(recv.name.is_none());
    let Type::Named { name, args, .. } = pf.arena.types[recv.typ] else {
        panic!("expected named receiver");
    };
    assert_eq!(pf.resolve(name), "Set");
    assert_eq!(args.len(), 1);

    let TopLevelDecl::Func(swap) = pf.decls()[1] else {
        panic!("expected method");
    };
    let recv = pf.arena.funcs[swap].recv.expect("receiver");
    let Type::Named { args, .. } = pf.arena.types[recv.typ] else {
        panic!("expected named receiver");
    };
    assert_eq!(args.len(), 2);

    let sig = pf.arena.signatures[pf.arena.funcs[swap].signature];
    let params = pf.arena.fields_list(sig.params.fields);
    assert_eq!(params.len(), 2);
    let first = pf.arena.fields[params[0]];
    assert!(pf.arena.ident_names(first.names).is_empty());
    assert!(matches!(pf.arena.types[first.typ], Type::Named { .. }));
    let second = pf.arena.fields[params[1]];
    assert_eq!(pf.arena.ident_names(second.names).len(), 1);
    assert!(matches!(pf.arena.types[second.typ], Type::Array { .. }));
}

#[test]
fn errors_carry_positions() {
    let src = "package p\n\ntype T struct {\n\tX int\n\t+\n}\n";
    let err = match parse_source(src) {
        Ok(_) => panic!("expected failure"),
        Err(e) => e,
    };
    let plus = src.find('+').expect("plus in source") as u32;
    assert!(err.diags.iter().any(|d| d.span.start == plus));
    assert!(err.to_string().contains("syntax error"));
}

#[test]
fn line_index_reports_declaration_lines() {
    let pf = parse("package p\n\n\nfunc F() {}\n");
    let TopLevelDecl::Func(id) = pf.decls()[0] else {
        panic!("expected func");
    };
    let pos = pf.arena.funcs[id].name_pos.start as usize;
    assert_eq!(pf.lines.line_col(pos), (4, 6));
}

fn field_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "int",
        "*T",
        "[]string",
        "map[string]int",
        "func(int) error",
        "chan<- int",
        "[4]byte",
        "struct{}",
        "io.Reader",
    ])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn parser_never_panics(s in ".{0,200}") {
        let _ = parse_source(&s);
    }

    #[test]
    fn printed_structs_reparse_to_the_same_text(
        fields in prop::collection::vec(("[A-Z][a-z]{0,6}", field_type()), 0..6)
    ) {
        let mut src = String::from("package p\n\ntype S struct {\n");
        for (name, typ) in &fields {
            src.push_str(&format!("\t{name} {typ}\n"));
        }
        src.push_str("}\n");

        let pf = parse_source(&src).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let printed = print_file(&pf);
        let again = parse_source(&printed).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(print_file(&again), printed);
    }
}
