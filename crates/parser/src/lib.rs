//! Go declaration syntax: lexer, parser and printer.
//!
//! - The lexer uses Logos and implements Go semicolon insertion. Comments are
//!   collected on a side channel so doc comments survive.
//! - The parser is recursive descent over the token stream and builds an
//!   arena AST of the file's declarations.
//! - The printer renders that AST back to gofmt-shaped Go source.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod line_index;
pub mod parser;
pub mod printer;
pub mod walk;

mod parser_support;

// Re-exports for convenience
pub use error::{Diag, DiagKind, ParseFailure};
pub use lexer::Lexer;
pub use line_index::LineIndex;
pub use parser::{parse_source, ParsedFile};
