//! # Declaration-level Go AST
//!
//! Arena-allocated syntax tree for the top level of a Go source file:
//! package clause, imports, type declarations and function signatures.
//!
//! ## Architecture
//!
//! - **Nodes**: allocated in typed arenas (`SpannedArena<T>`) and referenced by `Id<T>`
//! - **Lists**: centralized buffers in `ExtraData`, referenced by `ListRef<T>`
//! - **Spans**: stored in side tables next to each arena
//! - **Symbols**: identifiers are interned once per file
//!
//! ## Verbatim regions
//!
//! Parts of a file that the semantic model never inspects are not modelled
//! as trees. They are kept as byte spans into the original source and
//! reprinted verbatim:
//!
//! - function bodies (`FuncDecl::body`)
//! - type parameter lists (`TypeSpec::type_params`, `FuncDecl::type_params`)
//! - array length expressions (`ArrayLen::Expr`)
//! - `var` / `const` specs (`ValueSpec::raw`)
//! - union elements of constraint interfaces (`InterfaceElem::Union`)

use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};
use syntax_derive::WalkAst;

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Byte range in a source file. `end` is exclusive.
///
/// Positions are `u32`, limiting files to 4GiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Creates a span from usize offsets, clamping at `u32::MAX`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: clamp_u32(start),
            end: clamp_u32(end),
        }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// One-byte span at `pos`, used for single-character diagnostics.
    #[inline]
    pub const fn single_at(pos: usize) -> Self {
        let p = clamp_u32(pos);
        Self {
            start: p,
            end: p.saturating_add(1),
        }
    }

    #[inline]
    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub const fn to(self, other: Span) -> Span {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Source text covered by this span. Out-of-bounds spans yield "".
    #[inline]
    pub fn text<'src>(&self, src: &'src str) -> &'src str {
        src.get(self.range()).unwrap_or("")
    }
}

#[inline]
const fn clamp_u32(v: usize) -> u32 {
    if v > u32::MAX as usize {
        u32::MAX
    } else {
        v as u32
    }
}

/// Type-safe identifier for arena-allocated nodes.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

/// Typed reference into a centralized list buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

// =============================================================================
// Symbol Interning
// =============================================================================

/// Interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

pub type Ident = Symbol;

impl Symbol {
    #[inline]
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier occurrence: interned symbol plus its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct IdentName {
    #[walk(skip)]
    pub sym: Ident,
    #[walk(skip)]
    pub pos: Span,
}

/// Identity hasher; the interner feeds it precomputed string hashes.
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner keyed by seeded hash buckets.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let entry = self.buckets.entry(h).or_default();

        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Looks up an already-interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let h = self.state.hash_one(s);
        self.buckets
            .get(&h)?
            .iter()
            .copied()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
    }

    /// Resolves a symbol back to its string.
    ///
    /// # Panics
    /// Panics if the symbol was produced by a different interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.strings
            .get(sym.0 as usize)
            .expect("invalid symbol")
            .as_ref()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Arena for nodes with associated spans, stored in parallel vectors.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

// =============================================================================
// Node IDs
// =============================================================================

pub type DeclId = Id<Decl>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type FuncDeclId = Id<FuncDecl>;
pub type CommentId = Id<Comment>;
pub type CommentGroupId = Id<CommentGroup>;

// =============================================================================
// Centralized List Storage
// =============================================================================

#[derive(Debug, Default)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub types: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub specs: Vec<Spec>,
    pub top_decls: Vec<TopLevelDecl>,
    pub interface_elems: Vec<InterfaceElem>,
    pub comment_ids: Vec<CommentId>,
    pub comment_group_ids: Vec<CommentGroupId>,
}

/// Central arena holding all nodes and list buffers of one file.
#[derive(Debug, Default)]
pub struct AstArena {
    pub decls: SpannedArena<Decl>,
    pub types: SpannedArena<Type>,
    pub signatures: SpannedArena<Signature>,
    pub funcs: SpannedArena<FuncDecl>,
    pub fields: SpannedArena<Field>,
    pub comments: SpannedArena<Comment>,
    pub comment_groups: SpannedArena<CommentGroup>,
    pub extras: ExtraData,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        let len = buf.len() - start;
        ListRef::new(start as u32, len as u32)
    }

    #[inline]
    fn slice<T>(buf: &[T], r: ListRef<T>) -> &[T] {
        &buf[r.start() as usize..r.end() as usize]
    }

    // List builders

    pub fn list_ident_names(
        &mut self,
        i: impl IntoIterator<Item = IdentName>,
    ) -> ListRef<IdentName> {
        Self::push_list(&mut self.extras.ident_names, i)
    }

    pub fn list_types(&mut self, i: impl IntoIterator<Item = TypeId>) -> ListRef<TypeId> {
        Self::push_list(&mut self.extras.types, i)
    }

    pub fn list_fields(&mut self, i: impl IntoIterator<Item = FieldId>) -> ListRef<FieldId> {
        Self::push_list(&mut self.extras.fields, i)
    }

    pub fn list_specs(&mut self, i: impl IntoIterator<Item = Spec>) -> ListRef<Spec> {
        Self::push_list(&mut self.extras.specs, i)
    }

    pub fn list_top_decls(
        &mut self,
        i: impl IntoIterator<Item = TopLevelDecl>,
    ) -> ListRef<TopLevelDecl> {
        Self::push_list(&mut self.extras.top_decls, i)
    }

    pub fn list_interface_elems(
        &mut self,
        i: impl IntoIterator<Item = InterfaceElem>,
    ) -> ListRef<InterfaceElem> {
        Self::push_list(&mut self.extras.interface_elems, i)
    }

    pub fn list_comment_ids(
        &mut self,
        i: impl IntoIterator<Item = CommentId>,
    ) -> ListRef<CommentId> {
        Self::push_list(&mut self.extras.comment_ids, i)
    }

    pub fn list_comment_group_ids(
        &mut self,
        i: impl IntoIterator<Item = CommentGroupId>,
    ) -> ListRef<CommentGroupId> {
        Self::push_list(&mut self.extras.comment_group_ids, i)
    }

    // List accessors

    pub fn ident_names(&self, r: ListRef<IdentName>) -> &[IdentName] {
        Self::slice(&self.extras.ident_names, r)
    }

    pub fn types_list(&self, r: ListRef<TypeId>) -> &[TypeId] {
        Self::slice(&self.extras.types, r)
    }

    pub fn fields_list(&self, r: ListRef<FieldId>) -> &[FieldId] {
        Self::slice(&self.extras.fields, r)
    }

    pub fn specs_list(&self, r: ListRef<Spec>) -> &[Spec] {
        Self::slice(&self.extras.specs, r)
    }

    pub fn top_decls(&self, r: ListRef<TopLevelDecl>) -> &[TopLevelDecl] {
        Self::slice(&self.extras.top_decls, r)
    }

    pub fn interface_elems(&self, r: ListRef<InterfaceElem>) -> &[InterfaceElem] {
        Self::slice(&self.extras.interface_elems, r)
    }

    pub fn comment_ids(&self, r: ListRef<CommentId>) -> &[CommentId] {
        Self::slice(&self.extras.comment_ids, r)
    }

    pub fn comment_group_ids(&self, r: ListRef<CommentGroupId>) -> &[CommentGroupId] {
        Self::slice(&self.extras.comment_group_ids, r)
    }

    /// Comment group text with comment markers removed, the way Go doc
    /// tooling presents it.
    ///
    /// Line comments lose `//` and one following space; block comments lose
    /// their delimiters. Compiler directives (`//go:...`, `//line ...`) are
    /// dropped, as are leading and trailing blank lines. Non-empty results
    /// end in a single newline.
    pub fn comment_text(&self, group: CommentGroupId, src: &str) -> String {
        let mut lines: Vec<&str> = Vec::new();
        for &cid in self.comment_ids(self.comment_groups[group].comments) {
            let raw = self.comments.span(cid).text(src);
            match self.comments[cid].kind {
                CommentKind::Line => {
                    let body = raw.strip_prefix("//").unwrap_or(raw);
                    if is_directive(body) {
                        continue;
                    }
                    lines.push(body.strip_prefix(' ').unwrap_or(body));
                }
                CommentKind::Block => {
                    let body = raw.strip_prefix("/*").unwrap_or(raw);
                    let body = body.strip_suffix("*/").unwrap_or(body);
                    lines.extend(body.lines());
                }
            }
        }

        let lines: Vec<&str> = lines.iter().map(|l| l.trim_end()).collect();
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            return String::new();
        };

        let mut out = String::new();
        let mut prev_blank = false;
        for line in &lines[first..=last] {
            // Runs of blank lines collapse to one.
            if line.is_empty() {
                if prev_blank {
                    continue;
                }
                prev_blank = true;
            } else {
                prev_blank = false;
            }
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

fn is_directive(body: &str) -> bool {
    if body.starts_with("line ") {
        return true;
    }
    // `//go:generate`, `//export:`-style: lower-case word immediately followed by ':'.
    match body.find(':') {
        Some(i) if i > 0 => body[..i].bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()),
        _ => false,
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// Comment token; its text is recovered from the source via its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Comment {
    #[walk(skip)]
    pub kind: CommentKind,
}

/// Run of comments with no blank line or token between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CommentGroup {
    pub comments: ListRef<CommentId>,
}

// =============================================================================
// Source File
// =============================================================================

/// ```text
/// SourceFile = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct SourceFile {
    #[walk(skip)]
    pub package_pos: Span,
    #[walk(skip)]
    pub name: Ident,
    #[walk(skip)]
    pub name_pos: Span,
    /// Top-level declarations (imports included) in source order.
    pub decls: ListRef<TopLevelDecl>,
    /// Every comment group in the file.
    pub comments: ListRef<CommentGroupId>,
    /// Package doc comment.
    pub doc: Option<CommentGroupId>,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum TopLevelDecl {
    Decl(DeclId),
    Func(FuncDeclId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Decl {
    Gen(GenDecl),
    Bad(#[walk(skip)] Span),
}

/// `import`, `const`, `type` or `var` declaration, grouped or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct GenDecl {
    pub doc: Option<CommentGroupId>,
    #[walk(skip)]
    pub kw_pos: Span,
    #[walk(skip)]
    pub kind: GenDeclKind,
    #[walk(skip)]
    pub l_paren: Option<Span>,
    pub specs: ListRef<Spec>,
    #[walk(skip)]
    pub r_paren: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

impl GenDeclKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            GenDeclKind::Import => "import",
            GenDeclKind::Const => "const",
            GenDeclKind::Type => "type",
            GenDeclKind::Var => "var",
        }
    }
}

/// Spec inside a `GenDecl`. Walked by hand so visitors get per-spec hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `ImportSpec = [ "." | PackageName ] ImportPath`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ImportSpec {
    pub doc: Option<CommentGroupId>,
    #[walk(skip)]
    pub name: Option<ImportName>,
    #[walk(skip)]
    pub path: StringLit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportName {
    /// `import . "pkg"`
    Dot(Span),
    /// `import _ "pkg"`
    Blank(Span),
    /// `import name "pkg"`
    Name(Ident, Span),
}

/// `const` / `var` spec. Only the declared names are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ValueSpec {
    pub doc: Option<CommentGroupId>,
    pub names: ListRef<IdentName>,
    /// Verbatim text of the whole spec.
    #[walk(skip)]
    pub raw: Span,
}

/// `TypeSpec = AliasDecl | TypeDef`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeSpec {
    pub doc: Option<CommentGroupId>,
    #[walk(skip)]
    pub name: Ident,
    #[walk(skip)]
    pub name_pos: Span,
    /// Verbatim `[...]` type parameter list.
    #[walk(skip)]
    pub type_params: Option<Span>,
    #[walk(skip)]
    pub assign_pos: Option<Span>,
    pub typ: TypeId,
}

impl TypeSpec {
    /// True for `type A = B`.
    #[inline]
    pub const fn is_alias(&self) -> bool {
        self.assign_pos.is_some()
    }
}

/// ```text
/// FunctionDecl = "func" FunctionName [ TypeParameters ] Signature [ FunctionBody ]
/// MethodDecl   = "func" Receiver MethodName Signature [ FunctionBody ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncDecl {
    pub doc: Option<CommentGroupId>,
    #[walk(skip)]
    pub func_pos: Span,
    pub recv: Option<Receiver>,
    #[walk(skip)]
    pub name: Ident,
    #[walk(skip)]
    pub name_pos: Span,
    #[walk(skip)]
    pub type_params: Option<Span>,
    pub signature: SignatureId,
    /// Verbatim `{ ... }` body; `None` for external declarations.
    #[walk(skip)]
    pub body: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Receiver {
    #[walk(skip)]
    pub l_paren: Span,
    pub name: Option<IdentName>,
    pub typ: TypeId,
    #[walk(skip)]
    pub r_paren: Span,
}

// =============================================================================
// Signatures and Fields
// =============================================================================

/// `Signature = Parameters [ Result ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Signature {
    pub params: FieldList,
    pub results: Option<Results>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Results {
    /// `(x int, y string)` or `(int, error)`
    Params(FieldList),
    /// Single unparenthesized type: `int`
    Type(TypeId),
}

/// Parenthesized parameter list, or the braces of a struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FieldList {
    #[walk(skip)]
    pub l_paren: Span,
    pub fields: ListRef<FieldId>,
    #[walk(skip)]
    pub r_paren: Span,
}

/// Field in a parameter list or struct.
///
/// `ParameterDecl = [ IdentifierList ] [ "..." ] Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Field {
    /// Empty for anonymous parameters and embedded fields.
    pub names: ListRef<IdentName>,
    #[walk(skip)]
    pub ellipsis_pos: Option<Span>,
    pub typ: TypeId,
    #[walk(skip)]
    pub tag: Option<StringLit>,
    #[walk(skip)]
    pub is_embed: bool,
    pub doc: Option<CommentGroupId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLit {
    pub raw: Span,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Type {
    /// `Name`, `pkg.Name` or `Name[T1, T2]`
    Named {
        #[walk(skip)]
        pkg: Option<IdentName>,
        #[walk(skip)]
        name: Ident,
        #[walk(skip)]
        name_pos: Span,
        args: ListRef<TypeId>,
    },

    /// `*T`
    Pointer {
        #[walk(skip)]
        star_pos: Span,
        elem: TypeId,
    },

    /// `[N]T` or `[...]T`
    Array {
        #[walk(skip)]
        len: ArrayLen,
        elem: TypeId,
    },

    /// `[]T`
    Slice {
        #[walk(skip)]
        l_brack: Span,
        elem: TypeId,
    },

    /// `map[K]V`
    Map {
        #[walk(skip)]
        map_pos: Span,
        key: TypeId,
        val: TypeId,
    },

    /// `chan T`, `<-chan T` or `chan<- T`
    Chan {
        #[walk(skip)]
        dir: ChanDir,
        #[walk(skip)]
        chan_pos: Span,
        elem: TypeId,
    },

    /// `struct { ... }`
    Struct {
        #[walk(skip)]
        struct_pos: Span,
        fields: FieldList,
    },

    /// `interface { ... }`
    Interface {
        #[walk(skip)]
        interface_pos: Span,
        elems: ListRef<InterfaceElem>,
    },

    /// `func(...) ...`
    Func {
        #[walk(skip)]
        func_pos: Span,
        sig: SignatureId,
    },

    /// `(T)`
    Paren {
        #[walk(skip)]
        l_paren: Span,
        typ: TypeId,
    },

    /// Error recovery.
    Bad(#[walk(skip)] Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayLen {
    /// Verbatim length expression: `[10]int`, `[N*2]int`
    Expr(Span),
    /// `[...]int`
    Ellipsis(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum InterfaceElem {
    /// `Method(...) ...`
    Method {
        doc: Option<CommentGroupId>,
        #[walk(skip)]
        name: Ident,
        #[walk(skip)]
        name_pos: Span,
        sig: SignatureId,
    },

    /// Embedded interface or type: `io.Reader`, `fmt.Stringer`
    Embed {
        doc: Option<CommentGroupId>,
        typ: TypeId,
    },

    /// Verbatim union / approximation element: `~int | ~string`
    Union(#[walk(skip)] Span),
}
