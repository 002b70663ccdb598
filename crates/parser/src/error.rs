use thiserror::Error;

use crate::ast::Span;
use crate::lexer::Tok;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            DiagKind::Lex => "lex",
            DiagKind::Parse => "parse",
        };
        write!(
            f,
            "{kind} error at {}..{}: {}",
            self.span.start, self.span.end, self.message
        )
    }
}

/// A file that could not be parsed cleanly.
///
/// `diags` is never empty; it lists every lexer and parser problem found
/// before the parser gave up.
#[derive(Debug, Error)]
#[error("{} syntax error(s); first: {}", .diags.len(), first(.diags))]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
}

fn first(diags: &[Diag]) -> String {
    diags.first().map(Diag::to_string).unwrap_or_default()
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}

/// Diagnostic for a token the parser did not expect.
pub(crate) fn unexpected(tok: Option<&(usize, Tok<'_>, usize)>, src_len: usize, expected: &str) -> Diag {
    match tok {
        Some((l, t, r)) => Diag::parse(
            Span::new(*l, *r),
            format!("unexpected `{t}`; expected {expected}"),
        ),
        None => Diag::parse(
            Span::empty_at(src_len),
            format!("unexpected EOF; expected {expected}"),
        ),
    }
}
