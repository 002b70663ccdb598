use crate::ast::{self, Span};

/// One comma-separated entry of a parameter list before grouping.
///
/// `a, b int` arrives as two entries: `a` with no type, then `b int`.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub names: Vec<ast::IdentName>,
    pub ellipsis_pos: Option<Span>,
    pub typ: Option<ast::TypeId>,
    pub span: Span,
}

/// Groups raw parameter entries into fields.
///
/// If any entry has both a name and a type, bare identifiers are names
/// waiting for the next type (`a, b int`). Otherwise every bare identifier
/// is itself a type (`func(int, string)`).
pub fn resolve_param_list(
    arena: &mut ast::AstArena,
    params: Vec<ParamDecl>,
) -> Vec<ast::FieldId> {
    let named = params
        .iter()
        .any(|p| !p.names.is_empty() && p.typ.is_some());

    let mut out = Vec::with_capacity(params.len());
    let mut pending_names: Vec<ast::IdentName> = Vec::new();
    let mut pending_start: Option<u32> = None;

    for param in params {
        match param.typ {
            Some(typ) => {
                let mut names = std::mem::take(&mut pending_names);
                names.extend(param.names);
                let names_ref = if names.is_empty() {
                    ast::ListRef::EMPTY
                } else {
                    arena.list_ident_names(names)
                };
                let span = Span {
                    start: pending_start.take().unwrap_or(param.span.start),
                    end: param.span.end,
                };
                out.push(alloc_param(arena, names_ref, param.ellipsis_pos, typ, span));
            }
            None if named => {
                pending_start.get_or_insert(param.span.start);
                pending_names.extend(param.names);
            }
            None => {
                for name in param.names {
                    let typ = named_type_from_ident(arena, name);
                    out.push(alloc_param(arena, ast::ListRef::EMPTY, None, typ, name.pos));
                }
            }
        }
    }

    // `(a, b)` followed by nothing in a named list is malformed Go; keep the
    // identifiers as types so nothing is lost.
    for name in pending_names {
        let typ = named_type_from_ident(arena, name);
        out.push(alloc_param(arena, ast::ListRef::EMPTY, None, typ, name.pos));
    }

    out
}

fn alloc_param(
    arena: &mut ast::AstArena,
    names: ast::ListRef<ast::IdentName>,
    ellipsis_pos: Option<Span>,
    typ: ast::TypeId,
    span: Span,
) -> ast::FieldId {
    let field = ast::Field {
        names,
        ellipsis_pos,
        typ,
        tag: None,
        is_embed: false,
        doc: None,
    };
    arena.fields.alloc(field, span)
}

fn named_type_from_ident(arena: &mut ast::AstArena, name: ast::IdentName) -> ast::TypeId {
    arena.types.alloc(
        ast::Type::Named {
            pkg: None,
            name: name.sym,
            name_pos: name.pos,
            args: ast::ListRef::EMPTY,
        },
        name.pos,
    )
}
