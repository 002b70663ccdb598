//! Semantic nodes and the handles used to query them.
//!
//! A [`Node`] is either a *type node* (any kind but `Func`) or a *func node*
//! (kind `Func`). Both share a [`NodeHeader`]. Queries go through
//! [`NodeRef`], a copyable borrow of the owning [`Module`]; the typed views
//! [`TypeRef`] and [`FuncRef`] expose the variant-specific data without
//! precondition checks.
//!
//! Calling a struct, type or func query on a node of the wrong kind is a
//! programming error and panics with an `aster:` message. Index and name
//! misses return `None`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use goaster_syntax::ast::{CommentGroupId, FuncDeclId, SignatureId, Span, TypeSpec};
use la_arena::Idx;

use crate::kind::Kind;
use crate::model::{FileId, Module};
use crate::reflect::{FuncData, FuncField, StructField};

pub type NodeId = Idx<Node>;

/// Data shared by every node.
#[derive(Debug, Clone)]
pub struct NodeHeader {
    pub name: String,
    pub kind: Kind,
    /// File the declaration lives in.
    pub file: FileId,
    /// Doc comment text, markers removed.
    pub doc: String,
    /// Byte span of the declaration in its file.
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub header: NodeHeader,
    pub body: NodeBody,
    pub(crate) origin: Origin,
}

#[derive(Debug, Clone)]
pub enum NodeBody {
    Type(TypeData),
    Func(FuncData),
}

#[derive(Debug, Clone, Default)]
pub struct TypeData {
    /// `type A = B`.
    pub is_assign: bool,
    /// Method name to func node.
    pub methods: BTreeMap<String, NodeId>,
    /// Direct fields, populated for `Struct` kind only.
    pub fields: Vec<StructField>,
}

/// Syntax a node was built from; used to render it back to source.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Origin {
    Type {
        spec: TypeSpec,
        /// Doc of a single-spec `type` declaration, which sits on the
        /// keyword rather than the spec.
        decl_doc: Option<CommentGroupId>,
    },
    Func(FuncDeclId),
    InterfaceMethod(SignatureId),
}

impl Node {
    #[inline]
    pub fn kind(&self) -> Kind {
        self.header.kind
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn as_type(&self) -> Option<&TypeData> {
        match &self.body {
            NodeBody::Type(t) => Some(t),
            NodeBody::Func(_) => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncData> {
        match &self.body {
            NodeBody::Func(f) => Some(f),
            NodeBody::Type(_) => None,
        }
    }

    pub(crate) fn type_data_mut(&mut self) -> Option<&mut TypeData> {
        match &mut self.body {
            NodeBody::Type(t) => Some(t),
            NodeBody::Func(_) => None,
        }
    }
}

/// Borrowed handle to one node of a module.
#[derive(Clone, Copy)]
pub struct NodeRef<'m> {
    module: &'m Module,
    id: NodeId,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("pkg", &self.pkg_name())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.module, other.module) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl<'m> NodeRef<'m> {
    pub(crate) fn new(module: &'m Module, id: NodeId) -> Self {
        Self { module, id }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn module(&self) -> &'m Module {
        self.module
    }

    #[inline]
    pub fn node(&self) -> &'m Node {
        &self.module.nodes[self.id]
    }

    #[inline]
    fn header(&self) -> &'m NodeHeader {
        &self.node().header
    }

    pub fn kind(&self) -> Kind {
        self.header().kind
    }

    pub fn name(&self) -> &'m str {
        &self.header().name
    }

    pub fn doc(&self) -> &'m str {
        &self.header().doc
    }

    pub fn span(&self) -> Span {
        self.header().span
    }

    /// 1-based line and column of the declaration start.
    pub fn line_col(&self) -> (usize, usize) {
        let file = &self.module.files[self.header().file];
        file.parsed.lines.line_col(self.span().start as usize)
    }

    pub fn pkg_name(&self) -> &'m str {
        let file = &self.module.files[self.header().file];
        &self.module.package_arena[file.package].name
    }

    pub fn filename(&self) -> &'m str {
        &self.module.files[self.header().file].filename
    }

    #[inline]
    pub fn is_func_node(&self) -> bool {
        matches!(self.node().body, NodeBody::Func(_))
    }

    #[inline]
    pub fn is_type_node(&self) -> bool {
        !self.is_func_node()
    }

    pub fn as_type(&self) -> Option<TypeRef<'m>> {
        let data = self.node().as_type()?;
        Some(TypeRef { node: *self, data })
    }

    pub fn as_func(&self) -> Option<FuncRef<'m>> {
        let data = self.node().as_func()?;
        Some(FuncRef { node: *self, data })
    }

    // =========================================================================
    // Struct queries
    // =========================================================================

    fn struct_data(&self) -> &'m TypeData {
        match self.node().as_type() {
            Some(t) if self.kind() == Kind::Struct => t,
            _ => panic!("aster: Kind must be Struct, got {} ({})", self.kind(), self.name()),
        }
    }

    /// # Panics
    /// Panics unless the kind is `Struct`.
    pub fn num_field(&self) -> usize {
        self.struct_data().fields.len()
    }

    /// # Panics
    /// Panics unless the kind is `Struct`.
    pub fn field(&self, i: usize) -> Option<&'m StructField> {
        self.struct_data().fields.get(i)
    }

    /// Direct fields only; fields of embedded structs are not promoted.
    ///
    /// # Panics
    /// Panics unless the kind is `Struct`.
    pub fn field_by_name(&self, name: &str) -> Option<&'m StructField> {
        self.struct_data().fields.iter().find(|f| f.name == name)
    }

    // =========================================================================
    // Type queries
    // =========================================================================

    fn type_data(&self) -> &'m TypeData {
        match self.node().as_type() {
            Some(t) => t,
            None => panic!("aster: Kind can not be Func ({})", self.name()),
        }
    }

    /// Size of the full method set, value and pointer receivers alike.
    ///
    /// # Panics
    /// Panics if the kind is `Func`.
    pub fn num_method(&self) -> usize {
        self.type_data().methods.len()
    }

    /// The `i`-th method in name order.
    ///
    /// # Panics
    /// Panics if the kind is `Func`.
    pub fn method(&self, i: usize) -> Option<NodeRef<'m>> {
        let id = *self.type_data().methods.values().nth(i)?;
        Some(NodeRef::new(self.module, id))
    }

    /// # Panics
    /// Panics if the kind is `Func`.
    pub fn method_by_name(&self, name: &str) -> Option<NodeRef<'m>> {
        let id = *self.type_data().methods.get(name)?;
        Some(NodeRef::new(self.module, id))
    }

    /// # Panics
    /// Panics if the kind is `Func`.
    pub fn is_assign(&self) -> bool {
        self.type_data().is_assign
    }

    // =========================================================================
    // Func queries
    // =========================================================================

    fn func_data(&self) -> &'m FuncData {
        match self.node().as_func() {
            Some(f) => f,
            None => panic!("aster: Kind must be Func, got {} ({})", self.kind(), self.name()),
        }
    }

    /// # Panics
    /// Panics unless the kind is `Func`.
    pub fn num_param(&self) -> usize {
        self.func_data().params.len()
    }

    /// # Panics
    /// Panics unless the kind is `Func`.
    pub fn param(&self, i: usize) -> Option<&'m FuncField> {
        self.func_data().params.get(i)
    }

    /// # Panics
    /// Panics unless the kind is `Func`.
    pub fn num_result(&self) -> usize {
        self.func_data().results.len()
    }

    /// # Panics
    /// Panics unless the kind is `Func`.
    pub fn result(&self, i: usize) -> Option<&'m FuncField> {
        self.func_data().results.get(i)
    }

    /// # Panics
    /// Panics unless the kind is `Func`.
    pub fn is_variadic(&self) -> bool {
        self.func_data().variadic
    }

    /// # Panics
    /// Panics unless the kind is `Func`.
    pub fn recv(&self) -> Option<&'m FuncField> {
        self.func_data().recv.as_ref()
    }
}

/// Checked view of a type node.
#[derive(Clone, Copy)]
pub struct TypeRef<'m> {
    node: NodeRef<'m>,
    data: &'m TypeData,
}

impl<'m> TypeRef<'m> {
    pub fn fields(&self) -> &'m [StructField] {
        &self.data.fields
    }

    /// Methods in name order.
    pub fn methods(&self) -> impl Iterator<Item = NodeRef<'m>> + 'm {
        let module = self.node.module;
        self.data
            .methods
            .values()
            .map(move |&id| NodeRef::new(module, id))
    }

    /// Methods callable on a value of the type: value receivers and
    /// interface methods.
    pub fn value_methods(&self) -> impl Iterator<Item = NodeRef<'m>> + 'm {
        self.methods()
            .filter(|m| m.node().as_func().is_some_and(FuncData::in_value_set))
    }

    pub fn data(&self) -> &'m TypeData {
        self.data
    }
}

impl<'m> Deref for TypeRef<'m> {
    type Target = NodeRef<'m>;

    fn deref(&self) -> &NodeRef<'m> {
        &self.node
    }
}

impl fmt::Debug for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node, f)
    }
}

/// Checked view of a func node.
#[derive(Clone, Copy)]
pub struct FuncRef<'m> {
    node: NodeRef<'m>,
    data: &'m FuncData,
}

impl<'m> FuncRef<'m> {
    pub fn params(&self) -> &'m [FuncField] {
        &self.data.params
    }

    pub fn results(&self) -> &'m [FuncField] {
        &self.data.results
    }

    pub fn data(&self) -> &'m FuncData {
        self.data
    }
}

impl<'m> Deref for FuncRef<'m> {
    type Target = NodeRef<'m>;

    fn deref(&self) -> &NodeRef<'m> {
        &self.node
    }
}

impl fmt::Debug for FuncRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node, f)
    }
}
