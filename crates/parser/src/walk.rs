use crate::ast::*;

// Core traits
pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, a: &'ast AstArena, v: &mut V);
}

/// Read-only traversal hooks. Every default delegates to `walk`, so an
/// override that still wants children must call `walk` itself.
pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_source_file(&mut self, a: &'ast AstArena, f: &'ast SourceFile) {
        f.walk(a, self);
    }

    #[inline(always)]
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        a.decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_import_spec(&mut self, a: &'ast AstArena, spec: &'ast ImportSpec) {
        spec.walk(a, self);
    }

    #[inline(always)]
    fn visit_value_spec(&mut self, a: &'ast AstArena, spec: &'ast ValueSpec) {
        spec.walk(a, self);
    }

    #[inline(always)]
    fn visit_type_spec(&mut self, a: &'ast AstArena, spec: &'ast TypeSpec) {
        spec.walk(a, self);
    }

    #[inline(always)]
    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        a.funcs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        a.types[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) {
        a.signatures[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_comment(&mut self, a: &'ast AstArena, id: CommentId) {
        a.comments[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_comment_group(&mut self, a: &'ast AstArena, id: CommentGroupId) {
        a.comment_groups[id].walk(a, self);
    }
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    FuncDeclId => visit_func_decl,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
    CommentId => visit_comment,
    CommentGroupId => visit_comment_group,
}

pub trait ListSlice<T> {
    fn list(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast> + 'ast,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, a: &'ast AstArena, v: &mut V) {
        for item in ListSlice::list(a, *self) {
            item.walk(a, v);
        }
    }
}

macro_rules! impl_list_slice {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline(always)]
                fn list(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

impl_list_slice! {
    IdentName => ident_names,
    TypeId => types_list,
    FieldId => fields_list,
    Spec => specs_list,
    TopLevelDecl => top_decls,
    InterfaceElem => interface_elems,
    CommentId => comment_ids,
    CommentGroupId => comment_group_ids,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

// Specs are stored inline in the list buffer, so their hooks take references
// into the arena rather than ids.
impl<'ast> Walk<'ast> for Spec {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, a: &'ast AstArena, v: &mut V) {
        match self {
            Spec::Import(s) => v.visit_import_spec(a, s),
            Spec::Value(s) => v.visit_value_spec(a, s),
            Spec::Type(s) => v.visit_type_spec(a, s),
        }
    }
}
