//! Go source printer for the declaration AST.
//!
//! Output is gofmt-shaped: tab indentation, one blank line between top-level
//! declarations, doc comments reproduced verbatim above what they document.
//! Verbatim regions (bodies, value specs, type parameters) are copied from
//! the original source unchanged.

use crate::ast::*;
use crate::parser::ParsedFile;

/// Renders a whole file.
pub fn print_file(pf: &ParsedFile) -> String {
    let mut p = Printer::new(pf);
    p.write_file();
    p.finish()
}

/// Renders one `type` spec as a standalone declaration, doc included.
///
/// `doc` overrides the spec's own doc, for single-spec declarations whose
/// comment is attached to the enclosing `type` keyword.
pub fn print_type_decl(pf: &ParsedFile, spec: &TypeSpec, doc: Option<CommentGroupId>) -> String {
    let mut p = Printer::new(pf);
    p.write_doc(doc.or(spec.doc));
    p.out.push_str("type ");
    p.write_type_spec(spec);
    p.out.push('\n');
    p.finish()
}

/// Renders one function or method declaration, body included.
pub fn print_func_decl(pf: &ParsedFile, id: FuncDeclId) -> String {
    let mut p = Printer::new(pf);
    p.write_func_decl(id);
    p.finish()
}

/// Renders a type expression on one logical line (struct and interface
/// bodies still span several lines).
pub fn print_type(pf: &ParsedFile, id: TypeId) -> String {
    let mut p = Printer::new(pf);
    p.write_type(id);
    p.finish()
}

/// Renders a parameter list without surrounding parentheses handling of
/// results; used for signature display.
pub fn print_signature(pf: &ParsedFile, id: SignatureId) -> String {
    let mut p = Printer::new(pf);
    p.write_signature(id);
    p.finish()
}

struct Printer<'a> {
    pf: &'a ParsedFile,
    out: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    fn new(pf: &'a ParsedFile) -> Self {
        Self {
            pf,
            out: String::new(),
            indent: 0,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    #[inline]
    fn arena(&self) -> &'a AstArena {
        &self.pf.arena
    }

    #[inline]
    fn sym(&self, sym: Symbol) -> &'a str {
        self.pf.resolve(sym)
    }

    #[inline]
    fn text(&self, span: Span) -> &'a str {
        self.pf.text(span)
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn write_doc(&mut self, doc: Option<CommentGroupId>) {
        let Some(group) = doc else {
            return;
        };
        let a = self.arena();
        for &cid in a.comment_ids(a.comment_groups[group].comments) {
            let raw = self.text(a.comments.span(cid));
            self.out.push_str(raw.trim_end());
            self.out.push('\n');
            self.write_indent();
        }
    }

    // =========================================================================
    // File and declarations
    // =========================================================================

    fn write_file(&mut self) {
        let file = self.pf.file;
        self.write_doc(file.doc);
        self.out.push_str("package ");
        self.out.push_str(self.sym(file.name));
        self.out.push('\n');

        for decl in self.arena().top_decls(file.decls) {
            self.out.push('\n');
            match *decl {
                TopLevelDecl::Decl(id) => self.write_decl(id),
                TopLevelDecl::Func(id) => self.write_func_decl(id),
            }
        }
    }

    fn write_decl(&mut self, id: DeclId) {
        let decl = match self.arena().decls[id] {
            Decl::Gen(g) => g,
            Decl::Bad(span) => {
                self.out.push_str(self.text(span));
                self.out.push('\n');
                return;
            }
        };

        self.write_doc(decl.doc);
        self.out.push_str(decl.kind.keyword());
        let specs = self.arena().specs_list(decl.specs);

        if decl.l_paren.is_none() {
            self.out.push(' ');
            if let Some(spec) = specs.first() {
                self.write_spec(spec);
            }
            self.out.push('\n');
            return;
        }

        self.out.push_str(" (\n");
        self.indent += 1;
        for spec in specs {
            self.write_indent();
            self.write_doc(spec_doc(spec));
            self.write_spec(spec);
            self.out.push('\n');
        }
        self.indent -= 1;
        self.out.push_str(")\n");
    }

    fn write_spec(&mut self, spec: &Spec) {
        match spec {
            Spec::Import(s) => {
                match s.name {
                    Some(ImportName::Dot(_)) => self.out.push_str(". "),
                    Some(ImportName::Blank(_)) => self.out.push_str("_ "),
                    Some(ImportName::Name(sym, _)) => {
                        self.out.push_str(self.sym(sym));
                        self.out.push(' ');
                    }
                    None => {}
                }
                self.out.push_str(self.text(s.path.raw));
            }
            Spec::Value(s) => self.out.push_str(self.text(s.raw)),
            Spec::Type(s) => self.write_type_spec(s),
        }
    }

    fn write_type_spec(&mut self, spec: &TypeSpec) {
        self.out.push_str(self.sym(spec.name));
        if let Some(tp) = spec.type_params {
            self.out.push_str(self.text(tp));
        }
        self.out.push(' ');
        if spec.is_alias() {
            self.out.push_str("= ");
        }
        self.write_type(spec.typ);
    }

    fn write_func_decl(&mut self, id: FuncDeclId) {
        let f = self.arena().funcs[id];
        self.write_doc(f.doc);
        self.out.push_str("func ");
        if let Some(recv) = f.recv {
            self.out.push('(');
            if let Some(name) = recv.name {
                self.out.push_str(self.sym(name.sym));
                self.out.push(' ');
            }
            self.write_type(recv.typ);
            self.out.push_str(") ");
        }
        self.out.push_str(self.sym(f.name));
        if let Some(tp) = f.type_params {
            self.out.push_str(self.text(tp));
        }
        self.write_signature(f.signature);
        if let Some(body) = f.body {
            self.out.push(' ');
            self.out.push_str(self.text(body));
        }
        self.out.push('\n');
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    fn write_signature(&mut self, id: SignatureId) {
        let sig = self.arena().signatures[id];
        self.write_params(sig.params);
        match sig.results {
            Some(Results::Params(list)) => {
                self.out.push(' ');
                self.write_params(list);
            }
            Some(Results::Type(typ)) => {
                self.out.push(' ');
                self.write_type(typ);
            }
            None => {}
        }
    }

    fn write_params(&mut self, list: FieldList) {
        self.out.push('(');
        for (i, &fid) in self.arena().fields_list(list.fields).iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            let field = self.arena().fields[fid];
            self.write_names(field.names);
            if !field.names.is_empty() {
                self.out.push(' ');
            }
            if field.ellipsis_pos.is_some() {
                self.out.push_str("...");
            }
            self.write_type(field.typ);
        }
        self.out.push(')');
    }

    fn write_names(&mut self, names: ListRef<IdentName>) {
        for (i, name) in self.arena().ident_names(names).iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(self.sym(name.sym));
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn write_type(&mut self, id: TypeId) {
        match self.arena().types[id] {
            Type::Named { pkg, name, args, .. } => {
                if let Some(pkg) = pkg {
                    self.out.push_str(self.sym(pkg.sym));
                    self.out.push('.');
                }
                self.out.push_str(self.sym(name));
                if !args.is_empty() {
                    self.out.push('[');
                    for (i, &arg) in self.arena().types_list(args).iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.write_type(arg);
                    }
                    self.out.push(']');
                }
            }
            Type::Pointer { elem, .. } => {
                self.out.push('*');
                self.write_type(elem);
            }
            Type::Array { len, elem } => {
                self.out.push('[');
                match len {
                    ArrayLen::Expr(span) => self.out.push_str(self.text(span)),
                    ArrayLen::Ellipsis(_) => self.out.push_str("..."),
                }
                self.out.push(']');
                self.write_type(elem);
            }
            Type::Slice { elem, .. } => {
                self.out.push_str("[]");
                self.write_type(elem);
            }
            Type::Map { key, val, .. } => {
                self.out.push_str("map[");
                self.write_type(key);
                self.out.push(']');
                self.write_type(val);
            }
            Type::Chan { dir, elem, .. } => {
                self.out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(elem);
            }
            Type::Struct { fields, .. } => self.write_struct(fields),
            Type::Interface { elems, .. } => self.write_interface(elems),
            Type::Func { sig, .. } => {
                self.out.push_str("func");
                self.write_signature(sig);
            }
            Type::Paren { typ, .. } => {
                self.out.push('(');
                self.write_type(typ);
                self.out.push(')');
            }
            Type::Bad(span) => self.out.push_str(self.text(span)),
        }
    }

    fn write_struct(&mut self, fields: FieldList) {
        let fields = self.arena().fields_list(fields.fields);
        if fields.is_empty() {
            self.out.push_str("struct{}");
            return;
        }
        self.out.push_str("struct {\n");
        self.indent += 1;
        for &fid in fields {
            let field = self.arena().fields[fid];
            self.write_indent();
            self.write_doc(field.doc);
            self.write_names(field.names);
            if !field.names.is_empty() {
                self.out.push(' ');
            }
            self.write_type(field.typ);
            if let Some(tag) = field.tag {
                self.out.push(' ');
                self.out.push_str(self.text(tag.raw));
            }
            self.out.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
    }

    fn write_interface(&mut self, elems: ListRef<InterfaceElem>) {
        let elems = self.arena().interface_elems(elems);
        if elems.is_empty() {
            self.out.push_str("interface{}");
            return;
        }
        self.out.push_str("interface {\n");
        self.indent += 1;
        for elem in elems {
            self.write_indent();
            match *elem {
                InterfaceElem::Method { doc, name, sig, .. } => {
                    self.write_doc(doc);
                    self.out.push_str(self.sym(name));
                    self.write_signature(sig);
                }
                InterfaceElem::Embed { doc, typ } => {
                    self.write_doc(doc);
                    self.write_type(typ);
                }
                InterfaceElem::Union(span) => self.out.push_str(self.text(span)),
            }
            self.out.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
    }
}

fn spec_doc(spec: &Spec) -> Option<CommentGroupId> {
    match spec {
        Spec::Import(s) => s.doc,
        Spec::Value(s) => s.doc,
        Spec::Type(s) => s.doc,
    }
}
