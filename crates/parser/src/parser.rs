//! Recursive-descent parser for Go declarations.
//!
//! The parser reads everything the semantic model needs (package clause,
//! imports, type declarations, function and method signatures) and skips
//! over the rest by bracket matching: function bodies, `var`/`const` specs,
//! type parameter lists and array lengths are kept as verbatim spans.

use crate::ast::*;
use crate::error::{unexpected, Diag, ParseFailure};
use crate::lexer::{Lexer, RawComment, Tok};
use crate::line_index::LineIndex;
use crate::parser_support::{resolve_param_list, ParamDecl};

type Spanned<'src> = (usize, Tok<'src>, usize);
type PResult<T> = Result<T, Diag>;

/// A successfully parsed Go source file together with everything needed to
/// interpret its arena: the source text, the interner and a line table.
#[derive(Debug)]
pub struct ParsedFile {
    pub source: String,
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
    pub lines: LineIndex,
}

impl ParsedFile {
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    #[inline]
    pub fn text(&self, span: Span) -> &str {
        span.text(&self.source)
    }

    pub fn package_name(&self) -> &str {
        self.resolve(self.file.name)
    }

    pub fn decls(&self) -> &[TopLevelDecl] {
        self.arena.top_decls(self.file.decls)
    }

    /// Doc text of an optional comment group; empty when absent.
    pub fn doc_text(&self, group: Option<CommentGroupId>) -> String {
        group
            .map(|g| self.arena.comment_text(g, &self.source))
            .unwrap_or_default()
    }
}

/// Parses one Go source file.
///
/// Lexer and parser problems are collected together; any problem fails the
/// whole file.
pub fn parse_source(src: &str) -> Result<ParsedFile, ParseFailure> {
    let mut lexer = Lexer::new(src);
    let toks: Vec<Spanned<'_>> = lexer.by_ref().collect();
    let mut diags = lexer.take_diags();
    let comments = lexer.take_comments();

    let mut parser = Parser::new(src, toks, &comments);
    let file = parser.parse_file();
    diags.append(&mut parser.diags);

    if !diags.is_empty() {
        diags.sort_by_key(|d| d.span.start);
        return Err(ParseFailure { diags });
    }

    Ok(ParsedFile {
        source: src.to_owned(),
        arena: parser.arena,
        interner: parser.interner,
        file,
        lines: parser.lines,
    })
}

#[derive(Debug, Clone, Copy)]
struct GroupInfo {
    id: CommentGroupId,
    span: Span,
    /// Starts on the same line as a preceding token.
    trailing: bool,
}

struct Parser<'src> {
    src: &'src str,
    toks: Vec<Spanned<'src>>,
    pos: usize,
    prev_end: usize,
    arena: AstArena,
    interner: Interner,
    diags: Vec<Diag>,
    lines: LineIndex,
    groups: Vec<GroupInfo>,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str, toks: Vec<Spanned<'src>>, comments: &[RawComment]) -> Self {
        let mut p = Self {
            src,
            toks,
            pos: 0,
            prev_end: 0,
            arena: AstArena::new(),
            interner: Interner::new(),
            diags: Vec::new(),
            lines: LineIndex::new(src),
            groups: Vec::new(),
        };
        p.group_comments(comments);
        p
    }

    // =========================================================================
    // Comment groups
    // =========================================================================

    fn is_trailing(&self, c: &RawComment) -> bool {
        let start = c.span.start as usize;
        let idx = self.toks.partition_point(|t| t.2 <= start);
        idx > 0 && self.lines.line(self.toks[idx - 1].0) == self.lines.line(start)
    }

    fn group_comments(&mut self, comments: &[RawComment]) {
        let mut runs: Vec<(Vec<RawComment>, bool)> = Vec::new();

        for c in comments {
            let trailing = self.is_trailing(c);
            let joins = match runs.last() {
                Some((run, run_trailing)) => {
                    let last = run[run.len() - 1];
                    let gap = self
                        .src
                        .get(last.span.end as usize..c.span.start as usize)
                        .unwrap_or("x");
                    let adjacent = gap.chars().all(char::is_whitespace)
                        && gap.bytes().filter(|&b| b == b'\n').count() <= 1;
                    let same_line = self.lines.line(last.span.end as usize)
                        == self.lines.line(c.span.start as usize);
                    adjacent && (!run_trailing || same_line)
                }
                None => false,
            };
            match runs.last_mut() {
                Some((run, _)) if joins => run.push(*c),
                _ => runs.push((vec![*c], trailing)),
            }
        }

        for (run, trailing) in runs {
            let ids: Vec<CommentId> = run
                .iter()
                .map(|c| self.arena.comments.alloc(Comment { kind: c.kind }, c.span))
                .collect();
            let span = run[0].span.to(run[run.len() - 1].span);
            let comments = self.arena.list_comment_ids(ids);
            let id = self.arena.comment_groups.alloc(CommentGroup { comments }, span);
            self.groups.push(GroupInfo { id, span, trailing });
        }
    }

    /// Comment group ending on the line right before the current token with
    /// nothing but whitespace in between.
    fn lead_doc(&self) -> Option<CommentGroupId> {
        let start = self.toks.get(self.pos).map_or(self.src.len(), |t| t.0);
        let idx = self
            .groups
            .partition_point(|g| g.span.end as usize <= start);
        let g = self.groups[..idx].last()?;
        if g.trailing {
            return None;
        }
        if self.lines.line(g.span.end as usize) + 1 != self.lines.line(start) {
            return None;
        }
        let prev_end = self.pos.checked_sub(1).map_or(0, |i| self.toks[i].2);
        (g.span.start as usize >= prev_end).then_some(g.id)
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    #[inline]
    fn peek(&self) -> Option<Tok<'src>> {
        self.toks.get(self.pos).map(|t| t.1)
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<Tok<'src>> {
        self.toks.get(self.pos + n).map(|t| t.1)
    }

    #[inline]
    fn at(&self, tok: Tok<'_>) -> bool {
        self.peek() == Some(tok)
    }

    #[inline]
    fn at_eof(&self) -> bool {
        self.pos >= self.toks.len()
    }

    fn cur_span(&self) -> Span {
        match self.toks.get(self.pos) {
            Some(&(l, _, r)) => Span::new(l, r),
            None => Span::empty_at(self.src.len()),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    fn span_from(&self, start: Span) -> Span {
        Span::new(start.start as usize, self.prev_end.max(start.start as usize))
    }

    fn bump(&mut self) -> Span {
        let span = self.cur_span();
        if let Some(&(_, _, r)) = self.toks.get(self.pos) {
            self.prev_end = r;
            self.pos += 1;
        }
        span
    }

    fn eat(&mut self, tok: Tok<'_>) -> Option<Span> {
        self.at(tok).then(|| self.bump())
    }

    fn error(&self, expected: &str) -> Diag {
        unexpected(self.toks.get(self.pos), self.src.len(), expected)
    }

    fn expect(&mut self, tok: Tok<'_>, expected: &str) -> PResult<Span> {
        self.eat(tok).ok_or_else(|| self.error(expected))
    }

    fn expect_semi(&mut self) -> PResult<()> {
        match self.peek() {
            Some(Tok::Semi) => {
                self.bump();
                Ok(())
            }
            None | Some(Tok::RParen | Tok::RBrace) => Ok(()),
            _ => Err(self.error("`;` or newline")),
        }
    }

    fn ident(&mut self, expected: &str) -> PResult<IdentName> {
        match self.peek() {
            Some(Tok::Ident(name)) => {
                let pos = self.bump();
                Ok(IdentName {
                    sym: self.interner.intern(name),
                    pos,
                })
            }
            _ => Err(self.error(expected)),
        }
    }

    fn string_lit(&mut self) -> Option<StringLit> {
        match self.peek() {
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => Some(StringLit { raw: self.bump() }),
            _ => None,
        }
    }

    /// Skips a bracketed group starting at the current `open` token and
    /// returns its span, delimiters included.
    fn skip_group(&mut self, open: Tok<'_>, close: Tok<'_>) -> PResult<Span> {
        let start = self.expect(open, "opening bracket")?;
        let mut depth = 1usize;
        while let Some(tok) = self.peek() {
            self.bump();
            if tok == open {
                depth += 1;
            } else if tok == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(self.span_from(start));
                }
            }
        }
        Err(self.error("closing bracket"))
    }

    /// Advances to the `;` or unbalanced closer ending the current spec or
    /// element. Returns the span of what was skipped.
    fn skip_to_spec_end(&mut self, start: Span) -> Span {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok {
                Tok::LParen | Tok::LBrack | Tok::LBrace => depth += 1,
                Tok::RParen | Tok::RBrack | Tok::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Tok::Semi if depth == 0 => break,
                _ => {}
            }
            self.bump();
        }
        self.span_from(start)
    }

    /// Index of the `]` matching the `[` at `self.pos + offset`.
    fn matching_rbrack(&self, offset: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, t) in self.toks.iter().enumerate().skip(self.pos + offset) {
            match t.1 {
                Tok::LBrack => depth += 1,
                Tok::RBrack => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn sync_top(&mut self) {
        let start = self.pos;
        while let Some(tok) = self.peek() {
            let at_decl = matches!(
                tok,
                Tok::KwFunc | Tok::KwType | Tok::KwVar | Tok::KwConst | Tok::KwImport
            );
            let after_semi = self.pos > start
                && matches!(self.toks.get(self.pos - 1), Some((_, Tok::Semi, _)));
            if at_decl && after_semi {
                break;
            }
            self.bump();
        }
    }

    // =========================================================================
    // Source file
    // =========================================================================

    fn parse_file(&mut self) -> SourceFile {
        while self.eat(Tok::Semi).is_some() {}

        let doc = self.lead_doc();
        let package_pos = self.cur_span();
        let name = match self.package_clause() {
            Ok(name) => name,
            Err(d) => {
                self.diags.push(d);
                self.sync_top();
                IdentName {
                    sym: self.interner.intern("_"),
                    pos: Span::empty_at(0),
                }
            }
        };

        let mut decls = Vec::new();
        while !self.at_eof() {
            if self.eat(Tok::Semi).is_some() {
                continue;
            }
            let start = self.cur_span();
            match self.top_decl().and_then(|d| self.expect_semi().map(|()| d)) {
                Ok(decl) => decls.push(decl),
                Err(d) => {
                    self.diags.push(d);
                    self.sync_top();
                    let span = self.span_from(start);
                    decls.push(TopLevelDecl::Decl(self.arena.decls.alloc(Decl::Bad(span), span)));
                }
            }
        }

        let comments = self.groups.iter().map(|g| g.id).collect::<Vec<_>>();
        SourceFile {
            package_pos,
            name: name.sym,
            name_pos: name.pos,
            decls: self.arena.list_top_decls(decls),
            comments: self.arena.list_comment_group_ids(comments),
            doc,
        }
    }

    fn package_clause(&mut self) -> PResult<IdentName> {
        self.expect(Tok::KwPackage, "`package`")?;
        let name = self.ident("package name")?;
        self.expect_semi()?;
        Ok(name)
    }

    fn top_decl(&mut self) -> PResult<TopLevelDecl> {
        let kind = match self.peek() {
            Some(Tok::KwImport) => GenDeclKind::Import,
            Some(Tok::KwConst) => GenDeclKind::Const,
            Some(Tok::KwType) => GenDeclKind::Type,
            Some(Tok::KwVar) => GenDeclKind::Var,
            Some(Tok::KwFunc) => return self.func_decl().map(TopLevelDecl::Func),
            _ => return Err(self.error("declaration")),
        };
        self.gen_decl(kind).map(TopLevelDecl::Decl)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn gen_decl(&mut self, kind: GenDeclKind) -> PResult<DeclId> {
        let doc = self.lead_doc();
        let kw_pos = self.bump();

        let (l_paren, specs, r_paren) = if self.at(Tok::LParen) {
            let l_paren = self.bump();
            let mut specs = Vec::new();
            loop {
                while self.eat(Tok::Semi).is_some() {}
                if self.at(Tok::RParen) || self.at_eof() {
                    break;
                }
                let spec_doc = self.lead_doc();
                specs.push(self.spec(kind, spec_doc)?);
                if !self.at(Tok::RParen) {
                    self.expect_semi()?;
                }
            }
            let r_paren = self.expect(Tok::RParen, "`)`")?;
            (Some(l_paren), specs, Some(r_paren))
        } else {
            (None, vec![self.spec(kind, None)?], None)
        };

        let decl = GenDecl {
            doc,
            kw_pos,
            kind,
            l_paren,
            specs: self.arena.list_specs(specs),
            r_paren,
        };
        let span = self.span_from(kw_pos);
        Ok(self.arena.decls.alloc(Decl::Gen(decl), span))
    }

    fn spec(&mut self, kind: GenDeclKind, doc: Option<CommentGroupId>) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => self.import_spec(doc).map(Spec::Import),
            GenDeclKind::Type => self.type_spec(doc).map(Spec::Type),
            GenDeclKind::Const | GenDeclKind::Var => self.value_spec(doc).map(Spec::Value),
        }
    }

    fn import_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<ImportSpec> {
        let name = match self.peek() {
            Some(Tok::Dot) => Some(ImportName::Dot(self.bump())),
            Some(Tok::Ident("_")) => Some(ImportName::Blank(self.bump())),
            Some(Tok::Ident(_)) => {
                let n = self.ident("package name")?;
                Some(ImportName::Name(n.sym, n.pos))
            }
            _ => None,
        };
        let path = self.string_lit().ok_or_else(|| self.error("import path"))?;
        Ok(ImportSpec { doc, name, path })
    }

    fn value_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<ValueSpec> {
        let start = self.cur_span();
        let mut names = vec![self.ident("name")?];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.ident("name")?);
        }
        let raw = self.skip_to_spec_end(start);
        Ok(ValueSpec {
            doc,
            names: self.arena.list_ident_names(names),
            raw,
        })
    }

    /// `[` starts type parameters when an identifier follows that is not
    /// itself a complete array length.
    fn at_type_params(&self) -> bool {
        self.at(Tok::LBrack)
            && matches!(self.peek_nth(1), Some(Tok::Ident(_)))
            && !matches!(
                self.peek_nth(2),
                None | Some(
                    Tok::RBrack
                        | Tok::Plus
                        | Tok::Minus
                        | Tok::Slash
                        | Tok::Percent
                        | Tok::Shl
                        | Tok::Shr
                        | Tok::Amp
                        | Tok::Pipe
                        | Tok::Caret
                        | Tok::Dot
                        | Tok::RParen
                )
            )
    }

    fn type_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<TypeSpec> {
        let name = self.ident("type name")?;
        let type_params = if self.at_type_params() {
            Some(self.skip_group(Tok::LBrack, Tok::RBrack)?)
        } else {
            None
        };
        let assign_pos = self.eat(Tok::Assign);
        let typ = self.parse_type()?;
        Ok(TypeSpec {
            doc,
            name: name.sym,
            name_pos: name.pos,
            type_params,
            assign_pos,
            typ,
        })
    }

    fn func_decl(&mut self) -> PResult<FuncDeclId> {
        let doc = self.lead_doc();
        let func_pos = self.expect(Tok::KwFunc, "`func`")?;
        let recv = if self.at(Tok::LParen) {
            Some(self.receiver()?)
        } else {
            None
        };
        let name = self.ident("function name")?;
        let type_params = if self.at(Tok::LBrack) {
            Some(self.skip_group(Tok::LBrack, Tok::RBrack)?)
        } else {
            None
        };
        let signature = self.signature()?;
        let body = if self.at(Tok::LBrace) {
            Some(self.skip_group(Tok::LBrace, Tok::RBrace)?)
        } else {
            None
        };

        let decl = FuncDecl {
            doc,
            func_pos,
            recv,
            name: name.sym,
            name_pos: name.pos,
            type_params,
            signature,
            body,
        };
        let span = self.span_from(func_pos);
        Ok(self.arena.funcs.alloc(decl, span))
    }

    fn receiver(&mut self) -> PResult<Receiver> {
        let list = self.param_list()?;
        let fields = self.arena.fields_list(list.fields);
        let [field] = fields else {
            return Err(Diag::parse(
                list.l_paren.to(list.r_paren),
                "method must have exactly one receiver",
            ));
        };
        let field = self.arena.fields[*field];
        let names = self.arena.ident_names(field.names);
        if names.len() > 1 {
            return Err(Diag::parse(
                list.l_paren.to(list.r_paren),
                "method must have exactly one receiver",
            ));
        }
        Ok(Receiver {
            l_paren: list.l_paren,
            name: names.first().copied(),
            typ: field.typ,
            r_paren: list.r_paren,
        })
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    fn at_type_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Tok::Ident(_)
                    | Tok::Star
                    | Tok::LBrack
                    | Tok::LParen
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwFunc
                    | Tok::KwStruct
                    | Tok::KwInterface
                    | Tok::Arrow
            )
        )
    }

    fn signature(&mut self) -> PResult<SignatureId> {
        let start = self.cur_span();
        let params = self.param_list()?;
        let results = if self.at(Tok::LParen) {
            Some(Results::Params(self.param_list()?))
        } else if self.at_type_start() {
            Some(Results::Type(self.parse_type()?))
        } else {
            None
        };
        let span = self.span_from(start);
        Ok(self.arena.signatures.alloc(Signature { params, results }, span))
    }

    fn param_list(&mut self) -> PResult<FieldList> {
        let l_paren = self.expect(Tok::LParen, "`(`")?;
        let mut params = Vec::new();
        while !self.at(Tok::RParen) {
            params.push(self.param_decl()?);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        let r_paren = self.expect(Tok::RParen, "`)`")?;
        let fields = resolve_param_list(&mut self.arena, params);
        Ok(FieldList {
            l_paren,
            fields: self.arena.list_fields(fields),
            r_paren,
        })
    }

    /// At `Ident [`: whether the bracket group is closed by a `,` or `)`.
    fn type_args_end_param(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 1;
        while let Some(tok) = self.peek_nth(n) {
            match tok {
                Tok::LBrack | Tok::LParen | Tok::LBrace => depth += 1,
                Tok::RBrack | Tok::RParen | Tok::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return tok == Tok::RBrack
                            && matches!(self.peek_nth(n + 1), Some(Tok::Comma | Tok::RParen));
                    }
                }
                _ => {}
            }
            n += 1;
        }
        false
    }

    fn param_decl(&mut self) -> PResult<ParamDecl> {
        let start = self.cur_span();
        let mut names = Vec::new();
        let mut ellipsis_pos = None;

        match (self.peek(), self.peek_nth(1)) {
            (Some(Tok::Ident(_)), Some(Tok::Dot)) => {}
            (Some(Tok::Ident(_)), None | Some(Tok::Comma | Tok::RParen)) => {
                names.push(self.ident("parameter")?);
                return Ok(ParamDecl {
                    names,
                    ellipsis_pos,
                    typ: None,
                    span: self.span_from(start),
                });
            }
            // `Set[T]` with nothing after the brackets is an instantiated
            // type, not a name followed by an array type.
            (Some(Tok::Ident(_)), Some(Tok::LBrack)) if self.type_args_end_param() => {}
            (Some(Tok::Ident(_)), _) => names.push(self.ident("parameter")?),
            _ => {}
        }

        if self.at(Tok::Ellipsis) {
            ellipsis_pos = Some(self.bump());
        }
        let typ = self.parse_type()?;
        Ok(ParamDecl {
            names,
            ellipsis_pos,
            typ: Some(typ),
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> PResult<TypeId> {
        let start = self.cur_span();
        let typ = match self.peek() {
            Some(Tok::Ident(_)) => {
                let first = self.ident("type name")?;
                let (pkg, name) = if self.eat(Tok::Dot).is_some() {
                    (Some(first), self.ident("type name")?)
                } else {
                    (None, first)
                };
                let args = if self.at(Tok::LBrack) {
                    self.type_args()?
                } else {
                    ListRef::EMPTY
                };
                Type::Named {
                    pkg,
                    name: name.sym,
                    name_pos: name.pos,
                    args,
                }
            }
            Some(Tok::Star) => {
                let star_pos = self.bump();
                let elem = self.parse_type()?;
                Type::Pointer { star_pos, elem }
            }
            Some(Tok::LBrack) => self.array_or_slice()?,
            Some(Tok::KwMap) => {
                let map_pos = self.bump();
                self.expect(Tok::LBrack, "`[`")?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack, "`]`")?;
                let val = self.parse_type()?;
                Type::Map { map_pos, key, val }
            }
            Some(Tok::KwChan) => {
                let chan_pos = self.bump();
                let dir = if self.eat(Tok::Arrow).is_some() {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.parse_type()?;
                Type::Chan {
                    dir,
                    chan_pos,
                    elem,
                }
            }
            Some(Tok::Arrow) => {
                self.bump();
                let chan_pos = self.expect(Tok::KwChan, "`chan`")?;
                let elem = self.parse_type()?;
                Type::Chan {
                    dir: ChanDir::Recv,
                    chan_pos,
                    elem,
                }
            }
            Some(Tok::KwFunc) => {
                let func_pos = self.bump();
                let sig = self.signature()?;
                Type::Func { func_pos, sig }
            }
            Some(Tok::KwStruct) => self.struct_type()?,
            Some(Tok::KwInterface) => self.interface_type()?,
            Some(Tok::LParen) => {
                let l_paren = self.bump();
                let typ = self.parse_type()?;
                self.expect(Tok::RParen, "`)`")?;
                Type::Paren { l_paren, typ }
            }
            _ => return Err(self.error("type")),
        };
        let span = self.span_from(start);
        Ok(self.arena.types.alloc(typ, span))
    }

    fn type_args(&mut self) -> PResult<ListRef<TypeId>> {
        self.expect(Tok::LBrack, "`[`")?;
        let mut args = Vec::new();
        while !self.at(Tok::RBrack) {
            args.push(self.parse_type()?);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        self.expect(Tok::RBrack, "`]`")?;
        Ok(self.arena.list_types(args))
    }

    fn array_or_slice(&mut self) -> PResult<Type> {
        let l_brack = self.bump();
        if self.eat(Tok::RBrack).is_some() {
            let elem = self.parse_type()?;
            return Ok(Type::Slice { l_brack, elem });
        }

        let len = if self.at(Tok::Ellipsis) && self.peek_nth(1) == Some(Tok::RBrack) {
            ArrayLen::Ellipsis(self.bump())
        } else {
            let start = self.cur_span();
            let mut depth = 0usize;
            while let Some(tok) = self.peek() {
                match tok {
                    Tok::LBrack | Tok::LParen => depth += 1,
                    Tok::RParen => depth = depth.saturating_sub(1),
                    Tok::RBrack if depth == 0 => break,
                    Tok::RBrack => depth -= 1,
                    _ => {}
                }
                self.bump();
            }
            let span = self.span_from(start);
            if span.is_empty() {
                return Err(self.error("array length"));
            }
            ArrayLen::Expr(span)
        };
        self.expect(Tok::RBrack, "`]`")?;
        let elem = self.parse_type()?;
        Ok(Type::Array { len, elem })
    }

    fn struct_type(&mut self) -> PResult<Type> {
        let struct_pos = self.bump();
        let l_brace = self.expect(Tok::LBrace, "`{`")?;
        let mut fields = Vec::new();
        loop {
            while self.eat(Tok::Semi).is_some() {}
            if self.at(Tok::RBrace) || self.at_eof() {
                break;
            }
            fields.push(self.struct_field()?);
            if !self.at(Tok::RBrace) {
                self.expect_semi()?;
            }
        }
        let r_brace = self.expect(Tok::RBrace, "`}`")?;
        Ok(Type::Struct {
            struct_pos,
            fields: FieldList {
                l_paren: l_brace,
                fields: self.arena.list_fields(fields),
                r_paren: r_brace,
            },
        })
    }

    /// `Name[...]` followed by the end of the field is an embedded generic
    /// type; anything else after the brackets makes `Name` a field name.
    fn at_embedded_generic(&self) -> bool {
        if self.peek_nth(2) == Some(Tok::RBrack) {
            return false;
        }
        let Some(close) = self.matching_rbrack(1) else {
            return false;
        };
        matches!(
            self.toks.get(close + 1).map(|t| t.1),
            None | Some(Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_))
        )
    }

    fn struct_field(&mut self) -> PResult<FieldId> {
        let doc = self.lead_doc();
        let start = self.cur_span();

        let embedded = match (self.peek(), self.peek_nth(1)) {
            (Some(Tok::Star), _) => true,
            (
                Some(Tok::Ident(_)),
                None
                | Some(
                    Tok::Dot | Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_),
                ),
            ) => true,
            (Some(Tok::Ident(_)), Some(Tok::LBrack)) => self.at_embedded_generic(),
            (Some(Tok::Ident(_)), _) => false,
            _ => return Err(self.error("field name or embedded type")),
        };

        let mut names = Vec::new();
        if !embedded {
            names.push(self.ident("field name")?);
            while self.eat(Tok::Comma).is_some() {
                names.push(self.ident("field name")?);
            }
        }
        let typ = self.parse_type()?;
        let tag = self.string_lit();

        let field = Field {
            names: if names.is_empty() {
                ListRef::EMPTY
            } else {
                self.arena.list_ident_names(names)
            },
            ellipsis_pos: None,
            typ,
            tag,
            is_embed: embedded,
            doc,
        };
        let span = self.span_from(start);
        Ok(self.arena.fields.alloc(field, span))
    }

    fn interface_type(&mut self) -> PResult<Type> {
        let interface_pos = self.bump();
        self.expect(Tok::LBrace, "`{`")?;
        let mut elems = Vec::new();
        loop {
            while self.eat(Tok::Semi).is_some() {}
            if self.at(Tok::RBrace) || self.at_eof() {
                break;
            }
            elems.push(self.interface_elem()?);
            if !self.at(Tok::RBrace) {
                self.expect_semi()?;
            }
        }
        self.expect(Tok::RBrace, "`}`")?;
        Ok(Type::Interface {
            interface_pos,
            elems: self.arena.list_interface_elems(elems),
        })
    }

    fn interface_elem(&mut self) -> PResult<InterfaceElem> {
        let doc = self.lead_doc();
        let start = self.cur_span();
        match (self.peek(), self.peek_nth(1)) {
            (Some(Tok::Tilde), _) => Ok(InterfaceElem::Union(self.skip_to_spec_end(start))),
            (Some(Tok::Ident(_)), Some(Tok::LParen)) => {
                let name = self.ident("method name")?;
                let sig = self.signature()?;
                Ok(InterfaceElem::Method {
                    doc,
                    name: name.sym,
                    name_pos: name.pos,
                    sig,
                })
            }
            _ => {
                let typ = self.parse_type()?;
                if self.at(Tok::Pipe) {
                    Ok(InterfaceElem::Union(self.skip_to_spec_end(start)))
                } else {
                    Ok(InterfaceElem::Embed { doc, typ })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> ParsedFile {
        match parse_source(src) {
            Ok(f) => f,
            Err(e) => panic!("parse failed: {e}"),
        }
    }

    fn type_specs(pf: &ParsedFile) -> Vec<TypeSpec> {
        let mut out = Vec::new();
        for d in pf.decls() {
            if let TopLevelDecl::Decl(id) = d {
                if let Decl::Gen(g) = pf.arena.decls[*id] {
                    for s in pf.arena.specs_list(g.specs) {
                        if let Spec::Type(ts) = s {
                            out.push(*ts);
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn package_and_imports() {
        let pf = parse("package demo\n\nimport (\n\t\"fmt\"\n\tio2 \"io\"\n\t_ \"embed\"\n)\n");
        assert_eq!(pf.package_name(), "demo");
        let TopLevelDecl::Decl(id) = pf.decls()[0] else {
            panic!("expected gen decl");
        };
        let Decl::Gen(g) = pf.arena.decls[id] else {
            panic!("expected gen decl");
        };
        assert_eq!(g.kind, GenDeclKind::Import);
        let specs = pf.arena.specs_list(g.specs);
        assert_eq!(specs.len(), 3);
        let Spec::Import(second) = specs[1] else {
            panic!("expected import");
        };
        assert_eq!(pf.text(second.path.raw), "\"io\"");
        assert!(matches!(second.name, Some(ImportName::Name(..))));
        assert!(matches!(specs[2], Spec::Import(ImportSpec { name: Some(ImportName::Blank(_)), .. })));
    }

    #[test]
    fn type_params_versus_array_length() {
        let pf = parse("package p\ntype A [N]int\ntype L[T any] struct{ next *L[T] }\n");
        let specs = type_specs(&pf);
        assert!(specs[0].type_params.is_none());
        assert!(matches!(pf.arena.types[specs[0].typ], Type::Array { .. }));
        let tp = specs[1].type_params.map(|s| pf.text(s));
        assert_eq!(tp, Some("[T any]"));
    }

    #[test]
    fn grouped_params_and_variadic() {
        let pf = parse("package p\nfunc f(a, b int, rest ...string) (n int, err error)\n");
        let TopLevelDecl::Func(id) = pf.decls()[0] else {
            panic!("expected func");
        };
        let f = pf.arena.funcs[id];
        assert!(f.body.is_none());
        let sig = pf.arena.signatures[f.signature];
        let params = pf.arena.fields_list(sig.params.fields);
        assert_eq!(params.len(), 2);
        assert_eq!(pf.arena.ident_names(pf.arena.fields[params[0]].names).len(), 2);
        assert!(pf.arena.fields[params[1]].ellipsis_pos.is_some());
        assert!(matches!(sig.results, Some(Results::Params(_))));
    }

    #[test]
    fn anonymous_params_are_types() {
        let pf = parse("package p\ntype H func(int, string) error\n");
        let spec = type_specs(&pf)[0];
        let Type::Func { sig, .. } = pf.arena.types[spec.typ] else {
            panic!("expected func type");
        };
        let params = pf.arena.fields_list(pf.arena.signatures[sig].params.fields);
        assert_eq!(params.len(), 2);
        assert!(params
            .iter()
            .all(|f| pf.arena.fields[*f].names.is_empty()));
    }

    #[test]
    fn doc_comments_attach_to_next_declaration() {
        let src = "// Package p does things.\npackage p\n\n// T is a thing.\n// Second line.\ntype T struct {\n\t// X is the x.\n\tX int // trailing\n\tY int\n}\n\n// detached\n\nfunc F() {}\n";
        let pf = parse(src);
        assert_eq!(pf.doc_text(pf.file.doc), "Package p does things.\n");

        let TopLevelDecl::Decl(id) = pf.decls()[0] else {
            panic!("expected type decl");
        };
        let Decl::Gen(g) = pf.arena.decls[id] else {
            panic!("expected gen decl");
        };
        assert_eq!(pf.doc_text(g.doc), "T is a thing.\nSecond line.\n");

        let spec = type_specs(&pf)[0];
        let Type::Struct { fields, .. } = pf.arena.types[spec.typ] else {
            panic!("expected struct");
        };
        let fields = pf.arena.fields_list(fields.fields);
        assert_eq!(pf.doc_text(pf.arena.fields[fields[0]].doc), "X is the x.\n");
        assert_eq!(pf.arena.fields[fields[1]].doc, None);

        let TopLevelDecl::Func(fid) = pf.decls()[1] else {
            panic!("expected func");
        };
        assert_eq!(pf.arena.funcs[fid].doc, None);
    }

    #[test]
    fn bodies_and_values_are_skipped() {
        let src = "package p\nvar x = map[string]func(){\"a\": func() { if true { return } }}\nconst (\n\tA = iota\n\tB\n)\nfunc (s *S) M() int { return len(\"}\") }\n";
        let pf = parse(src);
        assert_eq!(pf.decls().len(), 3);
        let TopLevelDecl::Func(fid) = pf.decls()[2] else {
            panic!("expected method");
        };
        let f = pf.arena.funcs[fid];
        assert!(f.recv.is_some());
        assert_eq!(f.body.map(|b| pf.text(b)), Some("{ return len(\"}\") }"));
    }

    #[test]
    fn embedded_fields_and_unions() {
        let src = "package p\ntype S struct {\n\tio.Reader\n\t*Base\n\tList[int]\n\tItems []int `json:\"items\"`\n}\ntype N interface {\n\t~int | ~float64\n\tString() string\n}\n";
        let pf = parse(src);
        let specs = type_specs(&pf);
        let Type::Struct { fields, .. } = pf.arena.types[specs[0].typ] else {
            panic!("expected struct");
        };
        let fields = pf.arena.fields_list(fields.fields);
        let embeds: Vec<bool> = fields.iter().map(|f| pf.arena.fields[*f].is_embed).collect();
        assert_eq!(embeds, vec![true, true, true, false]);
        let tag = pf.arena.fields[fields[3]].tag.map(|t| pf.text(t.raw));
        assert_eq!(tag, Some("`json:\"items\"`"));

        let Type::Interface { elems, .. } = pf.arena.types[specs[1].typ] else {
            panic!("expected interface");
        };
        let elems = pf.arena.interface_elems(elems);
        assert!(matches!(elems[0], InterfaceElem::Union(_)));
        assert!(matches!(elems[1], InterfaceElem::Method { .. }));
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = match parse_source("package p\ntype = int\nfunc g() {}\n") {
            Ok(_) => panic!("expected failure"),
            Err(e) => e,
        };
        assert!(!err.diags.is_empty());
        assert!(parse_source("func main() {}").is_err());
        assert!(parse_source("package p\nfunc f() {\n").is_err());
    }
}
