//! Building the semantic model from parsed files.
//!
//! Files are added one at a time. Each file is walked once with a
//! [`Visitor`] that creates a node per type spec, function and method, and
//! classifies its kind from the syntax alone. Declarations whose type is
//! another declaration of the same package start out as `Suspense` and are
//! queued. [`ModuleBuilder::build`] then runs the queue to a fixpoint,
//! flattens embedded interfaces and attaches methods to their receivers.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use goaster_syntax::ast::{
    AstArena, CommentGroupId, Decl, DeclId, FuncDeclId, ImportName, ImportSpec, InterfaceElem,
    ListRef, Span, Type, TypeId, TypeSpec, ValueSpec,
};
use goaster_syntax::walk::{Visitor, Walk};
use goaster_syntax::{parse_source, ParsedFile};
use la_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::error::{AsterError, Result};
use crate::kind::Kind;
use crate::methods::{self, EmbedEdges};
use crate::model::{File, FileId, Import, Module, Package, PackageId};
use crate::node::{Node, NodeBody, NodeHeader, NodeId, Origin, TypeData};
use crate::reflect::{self, FuncData};

/// A node waiting on a same-package name.
#[derive(Debug, Clone)]
struct Pending {
    node: NodeId,
    package: PackageId,
    target: String,
}

/// Incrementally collects files into a [`Module`].
#[derive(Debug, Default)]
pub struct ModuleBuilder {
    module: Module,
    /// Declarations whose type names another declaration.
    pending: Vec<Pending>,
    /// Interface elements embedding another declaration.
    embeds: Vec<Pending>,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_dir(&mut self, dir: &Path) {
        self.module.dir = Some(dir.to_path_buf());
    }

    /// Reads and adds one file from disk. The package directory is the
    /// file's parent.
    pub fn add_file(&mut self, path: &Path) -> Result<FileId> {
        let source = fs::read_to_string(path).map_err(|e| AsterError::io(path, e))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.insert(filename, Some(path.to_path_buf()), &source)
    }

    /// Adds an in-memory source file under `filename`.
    pub fn add_source(&mut self, filename: impl Into<String>, source: &str) -> Result<FileId> {
        self.insert(filename.into(), None, source)
    }

    #[instrument(level = "debug", skip(self, source), fields(len = source.len()))]
    fn insert(&mut self, filename: String, path: Option<PathBuf>, source: &str) -> Result<FileId> {
        let parsed = parse_source(source).map_err(|e| AsterError::Parse {
            path: path.clone().unwrap_or_else(|| PathBuf::from(&filename)),
            diags: e.diags,
        })?;

        let package = self.package_for(parsed.package_name(), path.as_deref());
        if self.module.package_arena[package].files.contains_key(&filename) {
            return Err(AsterError::DuplicateFile {
                package: parsed.package_name().to_owned(),
                filename,
            });
        }

        let file = self.module.files.alloc(File {
            package,
            filename: filename.clone(),
            path,
            parsed,
            imports: Vec::new(),
            nodes: Default::default(),
        });

        let Module {
            files,
            nodes,
            package_arena,
            diagnostics,
            ..
        } = &mut self.module;

        let pf = &files[file].parsed;
        let mut collector = DeclCollector {
            pf,
            file,
            package,
            nodes,
            diagnostics,
            pending: &mut self.pending,
            embeds: &mut self.embeds,
            decl_doc: None,
            placed: Vec::new(),
            declared: Vec::new(),
            imports: Vec::new(),
        };
        collector.visit_source_file(&pf.arena, &pf.file);
        let DeclCollector {
            placed,
            declared,
            imports,
            ..
        } = collector;

        let pkg = &mut package_arena[package];
        pkg.files.insert(filename, file);
        for import in &imports {
            pkg.imports
                .entry(import.name.clone())
                .or_insert_with(|| import.clone());
        }
        for (name, id) in declared {
            if name == "_" {
                continue;
            }
            if pkg.scope.contains_key(&name) {
                debug!(%name, "redeclared in package; keeping the first declaration");
                continue;
            }
            pkg.scope.insert(name, id);
        }

        let f = &mut files[file];
        f.imports = imports;
        f.nodes.extend(placed);
        debug!(nodes = f.nodes.len(), "file added");
        Ok(file)
    }

    fn package_for(&mut self, name: &str, path: Option<&Path>) -> PackageId {
        if let Some(&id) = self.module.packages.get(name) {
            return id;
        }
        let id = self.module.package_arena.alloc(Package {
            name: name.to_owned(),
            dir: path.and_then(Path::parent).map(Path::to_path_buf),
            files: Default::default(),
            imports: Default::default(),
            scope: HashMap::new(),
        });
        self.module.packages.insert(name.to_owned(), id);
        id
    }

    /// Resolves references, method sets and interface embeddings and
    /// returns the finished module.
    #[instrument(level = "debug", skip(self), fields(files = self.module.files.len()))]
    pub fn build(mut self) -> Module {
        let mut edges = EmbedEdges::new();
        self.resolve_refs(&mut edges);
        for e in std::mem::take(&mut self.embeds) {
            if let Some(&target) = self.module.package_arena[e.package].scope.get(&e.target) {
                edges.entry(e.node).or_default().push(target);
            }
        }
        methods::flatten_interfaces(&mut self.module, &edges);
        methods::resolve_receivers(&mut self.module);
        self.module
    }

    /// Runs passes over the pending queue until one makes no progress.
    fn resolve_refs(&mut self, edges: &mut EmbedEdges) {
        let mut pending = std::mem::take(&mut self.pending);
        let module = &mut self.module;
        let mut pass = 0usize;
        while !pending.is_empty() {
            pass += 1;
            let before = pending.len();
            pending.retain(|p| !resolve_one(module, p, edges));
            debug!(
                pass,
                resolved = before - pending.len(),
                remaining = pending.len(),
                "resolution pass"
            );
            if pending.len() == before {
                break;
            }
        }
        if !pending.is_empty() {
            debug!(count = pending.len(), "declarations left in suspense");
        }
    }
}

/// Copies the referent's classification onto a pending node once the
/// referent is no longer in suspense.
fn resolve_one(module: &mut Module, p: &Pending, edges: &mut EmbedEdges) -> bool {
    let Some(&target) = module.package_arena[p.package].scope.get(&p.target) else {
        return false;
    };
    if target == p.node {
        return false;
    }

    let referent = &module.nodes[target];
    // Functions are in scope too, but only types can be referred to.
    if !matches!(referent.origin, Origin::Type { .. }) {
        return false;
    }
    let kind = referent.header.kind;
    if kind == Kind::Suspense {
        return false;
    }

    let copied = match &referent.body {
        NodeBody::Func(f) => Some(NodeBody::Func(FuncData {
            recv: None,
            ..f.clone()
        })),
        NodeBody::Type(t) if kind == Kind::Struct => Some(NodeBody::Type(TypeData {
            fields: t.fields.clone(),
            ..TypeData::default()
        })),
        NodeBody::Type(_) => None,
    };

    let node = &mut module.nodes[p.node];
    node.header.kind = kind;
    match copied {
        Some(NodeBody::Type(src)) => {
            if let Some(dst) = node.type_data_mut() {
                dst.fields = src.fields;
            }
        }
        Some(body) => node.body = body,
        None => {}
    }
    if kind == Kind::Interface {
        edges.entry(p.node).or_default().push(target);
    }
    trace!(node = %node.header.name, target = %p.target, %kind, "resolved");
    true
}

/// Syntactic classification of a type expression.
enum Shape {
    Known(Kind),
    /// Unqualified name of some other declaration.
    Ref(String),
}

impl Shape {
    fn kind(&self) -> Kind {
        match self {
            Shape::Known(k) => *k,
            Shape::Ref(_) => Kind::Suspense,
        }
    }
}

/// Strips redundant parentheses.
fn underlying(a: &AstArena, mut id: TypeId) -> TypeId {
    while let Type::Paren { typ, .. } = a.types[id] {
        id = typ;
    }
    id
}

fn classify(pf: &ParsedFile, id: TypeId) -> Shape {
    match pf.arena.types[underlying(&pf.arena, id)] {
        // Imported declarations are never classified.
        Type::Named { pkg: Some(_), .. } => Shape::Known(Kind::Suspense),
        Type::Named { name, .. } => {
            let name = pf.resolve(name);
            match Kind::from_basic_name(name) {
                Some(k) => Shape::Known(k),
                None => Shape::Ref(name.to_owned()),
            }
        }
        Type::Pointer { .. } => Shape::Known(Kind::Ptr),
        Type::Array { .. } => Shape::Known(Kind::Array),
        Type::Slice { .. } => Shape::Known(Kind::Slice),
        Type::Map { .. } => Shape::Known(Kind::Map),
        Type::Chan { .. } => Shape::Known(Kind::Chan),
        Type::Struct { .. } => Shape::Known(Kind::Struct),
        Type::Interface { .. } => Shape::Known(Kind::Interface),
        Type::Func { .. } => Shape::Known(Kind::Func),
        Type::Paren { .. } | Type::Bad(_) => Shape::Known(Kind::Invalid),
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim_matches(|c| c == '"' || c == '`')
}

/// Walks one file and creates its nodes.
struct DeclCollector<'a> {
    pf: &'a ParsedFile,
    file: FileId,
    package: PackageId,
    nodes: &'a mut Arena<Node>,
    diagnostics: &'a mut Vec<AsterError>,
    pending: &'a mut Vec<Pending>,
    embeds: &'a mut Vec<Pending>,
    /// Doc of the enclosing ungrouped declaration.
    decl_doc: Option<CommentGroupId>,
    placed: Vec<(u32, NodeId)>,
    declared: Vec<(String, NodeId)>,
    imports: Vec<Import>,
}

impl<'a> Visitor<'a> for DeclCollector<'a> {
    fn visit_decl(&mut self, a: &'a AstArena, id: DeclId) {
        let Decl::Gen(g) = &a.decls[id] else {
            return;
        };
        self.decl_doc = if g.l_paren.is_none() { g.doc } else { None };
        g.specs.walk(a, self);
        self.decl_doc = None;
    }

    fn visit_import_spec(&mut self, _: &'a AstArena, spec: &'a ImportSpec) {
        let pf = self.pf;
        let path = unquote(pf.text(spec.path.raw)).to_owned();
        let name = match spec.name {
            Some(ImportName::Dot(_)) => ".".to_owned(),
            Some(ImportName::Blank(_)) => "_".to_owned(),
            Some(ImportName::Name(sym, _)) => pf.resolve(sym).to_owned(),
            None => path.rsplit('/').next().unwrap_or(&path).to_owned(),
        };
        self.imports.push(Import {
            name,
            path,
            doc: pf.doc_text(spec.doc.or(self.decl_doc)),
        });
    }

    fn visit_value_spec(&mut self, _: &'a AstArena, _: &'a ValueSpec) {}

    fn visit_type_spec(&mut self, _: &'a AstArena, spec: &'a TypeSpec) {
        self.add_type_spec(spec);
    }

    fn visit_func_decl(&mut self, _: &'a AstArena, id: FuncDeclId) {
        self.add_func_decl(id);
    }
}

impl<'a> DeclCollector<'a> {
    fn alloc(
        &mut self,
        name: String,
        kind: Kind,
        doc: String,
        span: Span,
        body: NodeBody,
        origin: Origin,
    ) -> NodeId {
        self.nodes.alloc(Node {
            header: NodeHeader {
                name,
                kind,
                file: self.file,
                doc,
                span,
            },
            body,
            origin,
        })
    }

    fn add_type_spec(&mut self, spec: &TypeSpec) {
        let pf = self.pf;
        let a = &pf.arena;
        let name = pf.resolve(spec.name).to_owned();
        let typ = underlying(a, spec.typ);
        let shape = classify(pf, typ);
        let doc_group = spec.doc.or(self.decl_doc);

        let body = match a.types[typ] {
            Type::Func { sig, .. } => NodeBody::Func(reflect::func_data(pf, sig, None)),
            Type::Struct { fields, .. } => NodeBody::Type(TypeData {
                is_assign: spec.is_alias(),
                fields: reflect::struct_fields(pf, fields),
                ..TypeData::default()
            }),
            _ => NodeBody::Type(TypeData {
                is_assign: spec.is_alias(),
                ..TypeData::default()
            }),
        };

        let id = self.alloc(
            name.clone(),
            shape.kind(),
            pf.doc_text(doc_group),
            spec.name_pos.to(a.types.span(spec.typ)),
            body,
            Origin::Type {
                spec: *spec,
                decl_doc: self.decl_doc,
            },
        );
        trace!(%name, kind = %shape.kind(), "type declared");

        self.placed.push((spec.name_pos.start, id));
        self.declared.push((name, id));
        if let Shape::Ref(target) = shape {
            self.pending.push(Pending {
                node: id,
                package: self.package,
                target,
            });
        }
        if let Type::Interface { elems, .. } = a.types[typ] {
            self.add_interface_elems(id, elems);
        }
    }

    fn add_interface_elems(&mut self, iface: NodeId, elems: ListRef<InterfaceElem>) {
        let pf = self.pf;
        let a = &pf.arena;
        for elem in a.interface_elems(elems) {
            match *elem {
                InterfaceElem::Method {
                    doc,
                    name,
                    name_pos,
                    sig,
                } => {
                    let name = pf.resolve(name).to_owned();
                    let id = self.alloc(
                        name.clone(),
                        Kind::Func,
                        pf.doc_text(doc),
                        name_pos.to(a.signatures.span(sig)),
                        NodeBody::Func(reflect::func_data(pf, sig, None)),
                        Origin::InterfaceMethod(sig),
                    );
                    let owner = &mut self.nodes[iface];
                    let type_name = owner.header.name.clone();
                    let Some(data) = owner.type_data_mut() else {
                        continue;
                    };
                    if data.methods.contains_key(&name) {
                        self.diagnostics.push(AsterError::DuplicateMethod {
                            type_name,
                            method: name,
                        });
                    } else {
                        data.methods.insert(name, id);
                    }
                }
                InterfaceElem::Embed { typ, .. } => {
                    if let Shape::Ref(target) = classify(pf, typ) {
                        self.embeds.push(Pending {
                            node: iface,
                            package: self.package,
                            target,
                        });
                    }
                }
                InterfaceElem::Union(_) => {}
            }
        }
    }

    fn add_func_decl(&mut self, id: FuncDeclId) {
        let pf = self.pf;
        let a = &pf.arena;
        let f = a.funcs[id];
        let name = pf.resolve(f.name).to_owned();
        let span = a.funcs.span(id);

        let node = self.alloc(
            name.clone(),
            Kind::Func,
            pf.doc_text(f.doc),
            span,
            NodeBody::Func(reflect::func_data(pf, f.signature, f.recv.as_ref())),
            Origin::Func(id),
        );

        self.placed.push((f.func_pos.start, node));
        if f.recv.is_none() {
            self.declared.push((name, node));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(files: &[(&str, &str)]) -> Module {
        let mut b = ModuleBuilder::new();
        for (name, src) in files {
            b.add_source(*name, src).expect("add source");
        }
        b.build()
    }

    #[test]
    fn chains_resolve_across_passes() {
        // C -> B -> A, declared back to front so each pass resolves one link.
        let m = build(&[(
            "a.go",
            "package p\ntype C B\ntype B A\ntype A struct{ X int }\n",
        )]);
        for name in ["A", "B", "C"] {
            let n = m.lookup("p", name).expect(name);
            assert_eq!(n.kind(), Kind::Struct, "{name}");
            assert_eq!(n.field(0).map(|f| f.name.as_str()), Some("X"));
        }
    }

    #[test]
    fn cycles_and_imports_stay_suspended() {
        let m = build(&[(
            "a.go",
            "package p\nimport \"io\"\ntype A B\ntype B A\ntype R io.Reader\ntype U undeclared\n",
        )]);
        let mut names: Vec<_> = m.unresolved().map(|n| n.name()).collect();
        names.sort_unstable();
        assert_eq!(names, ["A", "B", "R", "U"]);
    }

    #[test]
    fn func_typed_referents_become_func_nodes() {
        let m = build(&[(
            "a.go",
            "package p\ntype Handler func(w int, r *Req) error\ntype Mine Handler\n",
        )]);
        let mine = m.lookup("p", "Mine").expect("Mine");
        assert_eq!(mine.kind(), Kind::Func);
        assert!(mine.is_func_node());
        assert_eq!(mine.num_param(), 2);
        assert!(mine.recv().is_none());
    }

    #[test]
    fn package_table_merges_files() {
        let m = build(&[
            ("b.go", "package p\nimport f \"fmt\"\ntype B int\n"),
            ("a.go", "package p\nimport (\n\t\"fmt\"\n\t\"net/http\"\n)\ntype A int\n"),
        ]);
        let pkg = m.package("p").expect("package");
        let files: Vec<_> = pkg.files().map(|f| f.filename()).collect();
        assert_eq!(files, ["a.go", "b.go"]);
        let imports: Vec<_> = pkg.imports().keys().map(String::as_str).collect();
        assert_eq!(imports, ["f", "fmt", "http"]);
        assert_eq!(pkg.imports()["http"].path, "net/http");
    }

    #[test]
    fn duplicate_filenames_are_rejected() {
        let mut b = ModuleBuilder::new();
        b.add_source("a.go", "package p\n").expect("first");
        let err = b.add_source("a.go", "package p\n").expect_err("second");
        assert!(matches!(err, AsterError::DuplicateFile { .. }));
    }
}
