use goaster_syntax::ast::CommentKind;
use goaster_syntax::lexer::Lexer;

fn comment_texts(src: &str) -> Vec<(CommentKind, &str)> {
    let mut lx = Lexer::new(src);
    lx.by_ref().for_each(drop);
    lx.take_comments()
        .into_iter()
        .map(|c| (c.kind, c.span.text(src)))
        .collect()
}

#[test]
fn line_and_block_comments_are_recorded() {
    let src = "// doc\npackage p /* inline */\n/*\nblock\n*/\n";
    assert_eq!(
        comment_texts(src),
        vec![
            (CommentKind::Line, "// doc"),
            (CommentKind::Block, "/* inline */"),
            (CommentKind::Block, "/*\nblock\n*/"),
        ]
    );
}

#[test]
fn line_comment_excludes_cr() {
    assert_eq!(comment_texts("// a\r\nx"), vec![(CommentKind::Line, "// a")]);
}

#[test]
fn comment_markers_inside_strings_are_not_comments() {
    assert!(comment_texts("x := \"// not\" + `/* not */`").is_empty());
}

#[test]
fn unterminated_block_comment_is_diagnosed() {
    let mut lx = Lexer::new("x /* never closed");
    lx.by_ref().for_each(drop);
    let diags = lx.take_diags();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "unterminated comment");
}
