//! Struct field and function signature extraction.
//!
//! Both walk their field lists exactly once, in declaration order. Type names
//! are the printed source text of the type expression, so two fields compare
//! equal exactly when they spell their types the same way.

use goaster_syntax::ast::{FieldList, Receiver, Results, SignatureId, Type, TypeId};
use goaster_syntax::printer::print_type;
use goaster_syntax::ParsedFile;

/// One direct field of a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Declared name, or the base type name for an embedded field
    /// (`*pkg.Base[T]` is indexed as `Base`).
    pub name: String,
    pub type_name: String,
    /// Raw tag literal, quotes included.
    pub tag: Option<String>,
    pub embedded: bool,
}

/// One parameter, result or receiver of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncField {
    /// Empty for unnamed parameters and results.
    pub name: String,
    /// Type name with one leading `*` removed. A variadic `...T` parameter
    /// is named `[]T`.
    pub type_name: String,
    /// Set when a leading `*` was removed from `type_name`.
    pub pointer: bool,
}

/// Reflected signature of a function, method or func-typed declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncData {
    pub params: Vec<FuncField>,
    pub results: Vec<FuncField>,
    pub variadic: bool,
    pub recv: Option<FuncField>,
}

impl FuncData {
    /// Parameter, result and variadic equality. Names and receivers are not
    /// part of a signature's identity.
    pub fn same_signature(&self, other: &FuncData) -> bool {
        fn types_eq(a: &[FuncField], b: &[FuncField]) -> bool {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| x.type_name == y.type_name && x.pointer == y.pointer)
        }
        self.variadic == other.variadic
            && types_eq(&self.params, &other.params)
            && types_eq(&self.results, &other.results)
    }

    /// True when the method is visible through a value of its receiver type,
    /// i.e. it has no receiver or a value receiver.
    pub fn in_value_set(&self) -> bool {
        !self.recv.as_ref().is_some_and(|r| r.pointer)
    }
}

pub(crate) fn struct_fields(pf: &ParsedFile, list: FieldList) -> Vec<StructField> {
    let a = &pf.arena;
    let mut out = Vec::with_capacity(list.fields.len() as usize);
    for &fid in a.fields_list(list.fields) {
        let field = a.fields[fid];
        let type_name = print_type(pf, field.typ);
        let tag = field.tag.map(|t| pf.text(t.raw).to_owned());

        if field.is_embed || field.names.is_empty() {
            out.push(StructField {
                name: embedded_name(pf, field.typ),
                type_name,
                tag,
                embedded: true,
            });
            continue;
        }

        for n in a.ident_names(field.names) {
            out.push(StructField {
                name: pf.resolve(n.sym).to_owned(),
                type_name: type_name.clone(),
                tag: tag.clone(),
                embedded: false,
            });
        }
    }
    out
}

/// Base type name of an embedded field: pointer, package qualifier and type
/// arguments stripped.
fn embedded_name(pf: &ParsedFile, mut id: TypeId) -> String {
    loop {
        match pf.arena.types[id] {
            Type::Pointer { elem, .. } | Type::Paren { typ: elem, .. } => id = elem,
            Type::Named { name, .. } => return pf.resolve(name).to_owned(),
            _ => return print_type(pf, id),
        }
    }
}

pub(crate) fn func_data(pf: &ParsedFile, sig: SignatureId, recv: Option<&Receiver>) -> FuncData {
    let sig = pf.arena.signatures[sig];
    let (params, variadic) = func_fields(pf, sig.params);
    let results = match sig.results {
        None => Vec::new(),
        Some(Results::Type(typ)) => vec![func_field(pf, String::new(), typ)],
        Some(Results::Params(list)) => func_fields(pf, list).0,
    };
    let recv = recv.map(|r| {
        let name = r.name.map(|n| pf.resolve(n.sym).to_owned()).unwrap_or_default();
        func_field(pf, name, r.typ)
    });

    FuncData {
        params,
        results,
        variadic,
        recv,
    }
}

fn func_fields(pf: &ParsedFile, list: FieldList) -> (Vec<FuncField>, bool) {
    let a = &pf.arena;
    let ids = a.fields_list(list.fields);
    let mut out = Vec::with_capacity(ids.len());
    let mut variadic = false;

    for (i, &fid) in ids.iter().enumerate() {
        let field = a.fields[fid];
        if field.ellipsis_pos.is_some() {
            // Only the final parameter may be variadic.
            variadic = i + 1 == ids.len();
            let type_name = format!("[]{}", print_type(pf, field.typ));
            let name = a
                .ident_names(field.names)
                .first()
                .map(|n| pf.resolve(n.sym).to_owned())
                .unwrap_or_default();
            out.push(FuncField {
                name,
                type_name,
                pointer: false,
            });
            continue;
        }

        if field.names.is_empty() {
            out.push(func_field(pf, String::new(), field.typ));
            continue;
        }
        for n in a.ident_names(field.names) {
            out.push(func_field(pf, pf.resolve(n.sym).to_owned(), field.typ));
        }
    }
    (out, variadic)
}

fn func_field(pf: &ParsedFile, name: String, typ: TypeId) -> FuncField {
    match pf.arena.types[typ] {
        Type::Pointer { elem, .. } => FuncField {
            name,
            type_name: print_type(pf, elem),
            pointer: true,
        },
        _ => FuncField {
            name,
            type_name: print_type(pf, typ),
            pointer: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goaster_syntax::ast::{Decl, Spec, TopLevelDecl};
    use goaster_syntax::parse_source;

    fn first_func(src: &str) -> FuncData {
        let pf = parse_source(src).expect("parse");
        for d in pf.decls() {
            if let TopLevelDecl::Func(id) = *d {
                let f = pf.arena.funcs[id];
                return func_data(&pf, f.signature, f.recv.as_ref());
            }
        }
        panic!("no func in {src:?}");
    }

    #[test]
    fn grouped_names_expand_and_pointers_strip_once() {
        let f = first_func("package p\nfunc (s *S) F(a, b int, c **T) (n int, err error) {}\n");
        let names: Vec<_> = f.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(f.params[2].type_name, "*T");
        assert!(f.params[2].pointer);
        assert_eq!(f.results.len(), 2);
        let recv = f.recv.expect("receiver");
        assert_eq!((recv.name.as_str(), recv.type_name.as_str(), recv.pointer), ("s", "S", true));
        assert!(!f.variadic);
    }

    #[test]
    fn variadic_counts_once() {
        let f = first_func("package p\nfunc Sum(xs ...float64) float64 { return 0 }\n");
        assert_eq!(f.params.len(), 1);
        assert_eq!(f.params[0].type_name, "[]float64");
        assert!(f.variadic);
        assert_eq!(f.results[0].name, "");
    }

    #[test]
    fn embedded_fields_use_base_name() {
        let pf = parse_source(
            "package p\ntype S struct {\n\t*io.Reader\n\tList[int]\n\tx, y int `json:\"x\"`\n}\n",
        )
        .expect("parse");
        let TopLevelDecl::Decl(id) = pf.decls()[0] else {
            panic!("expected type decl");
        };
        let Decl::Gen(g) = pf.arena.decls[id] else {
            panic!("expected gen decl");
        };
        let Spec::Type(spec) = pf.arena.specs_list(g.specs)[0] else {
            panic!("expected type spec");
        };
        let Type::Struct { fields, .. } = pf.arena.types[spec.typ] else {
            panic!("expected struct");
        };
        let fields = struct_fields(&pf, fields);
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Reader", "List", "x", "y"]);
        assert!(fields[0].embedded && fields[1].embedded && !fields[2].embedded);
        assert_eq!(fields[0].type_name, "*io.Reader");
        assert_eq!(fields[3].tag.as_deref(), Some("`json:\"x\"`"));
    }
}
