use crate::ast::{CommentKind, Span};
use crate::error::{Diag, LexError, LexErrorKind};
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;

// =============================================================================
// 0. Shared helpers
// =============================================================================

#[inline(always)]
const fn first_newline_offset(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'\n' | b'\r') {
            return Some(i);
        }
        i += 1;
    }

    None
}

#[inline(always)]
const fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline(always)]
const fn is_oct_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

// =============================================================================
// 1. Block comment scanner
// =============================================================================

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    use memchr::memchr;

    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

// =============================================================================
// 2. Escape validation for interpreted strings and runes
// =============================================================================

/// Validates one escape sequence starting right after the backslash.
/// Returns the number of bytes consumed (the backslash excluded).
fn escape_len(body: &[u8], at: usize, quote: u8) -> Result<usize, LexErrorKind> {
    let c = *body.get(at).ok_or(LexErrorKind::InvalidEscape)?;
    let (digits, pred): (usize, fn(u8) -> bool) = match c {
        b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => return Ok(1),
        _ if c == quote => return Ok(1),
        b'x' => (2, |b| is_hex_digit(b)),
        b'u' => (4, |b| is_hex_digit(b)),
        b'U' => (8, |b| is_hex_digit(b)),
        b'0'..=b'7' => (3, |b| is_oct_digit(b)),
        _ => return Err(LexErrorKind::InvalidEscape),
    };

    // Octal escapes include their first digit; the others skip the prefix letter.
    let first = if is_oct_digit(c) { at } else { at + 1 };
    let end = first + digits;
    let Some(run) = body.get(first..end) else {
        return Err(LexErrorKind::InvalidEscape);
    };
    if !run.iter().all(|&b| pred(b)) {
        return Err(LexErrorKind::InvalidEscape);
    }

    let text = std::str::from_utf8(run).map_err(|_| LexErrorKind::InvalidEscape)?;
    let radix = if is_oct_digit(c) { 8 } else { 16 };
    let value = u32::from_str_radix(text, radix).map_err(|_| LexErrorKind::InvalidEscape)?;
    let valid = match c {
        b'u' | b'U' => char::from_u32(value).is_some(),
        b'x' => true,
        _ => value <= 255,
    };
    if !valid {
        return Err(LexErrorKind::InvalidEscape);
    }
    Ok(end - at)
}

fn validate_escapes(body: &[u8], quote: u8) -> Result<usize, LexErrorKind> {
    let mut i = 0;
    let mut units = 0;
    while i < body.len() {
        if body[i] == b'\\' {
            i += 1 + escape_len(body, i + 1, quote)?;
        } else {
            // Advance over one UTF-8 scalar.
            let width = match body[i] {
                0x00..=0x7F => 1,
                0xC0..=0xDF => 2,
                0xE0..=0xEF => 3,
                _ => 4,
            };
            i += width;
        }
        units += 1;
    }
    Ok(units)
}

fn validate_interpreted_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice().as_bytes();
    if s.len() < 2 || s[0] != b'"' || s[s.len() - 1] != b'"' {
        return Err(LexErrorKind::UnterminatedString);
    }
    validate_escapes(&s[1..s.len() - 1], b'"').map(|_| ())
}

fn validate_rune(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice().as_bytes();
    if s.len() < 3 || s[0] != b'\'' || s[s.len() - 1] != b'\'' {
        return Err(LexErrorKind::InvalidToken);
    }
    match validate_escapes(&s[1..s.len() - 1], b'\'')? {
        1 => Ok(()),
        _ => Err(LexErrorKind::InvalidToken),
    }
}

// =============================================================================
// 3. Number classification
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumClass {
    Int,
    Float,
    Imag,
}

/// Classifies a number literal already delimited by the token regex.
/// Only the shape that decides int/float/imag is checked; digit validity
/// is left to the Go toolchain.
fn classify_number(lit: &str) -> Result<NumClass, LexErrorKind> {
    let bytes = lit.as_bytes();
    if bytes.last() == Some(&b'_') {
        return Err(LexErrorKind::InvalidNumber);
    }
    if bytes.last() == Some(&b'i') {
        return Ok(NumClass::Imag);
    }
    let lower = lit.to_ascii_lowercase();
    let is_hex = lower.starts_with("0x");
    if is_hex {
        // Hex floats need a `p` exponent.
        if lower.contains('.') && !lower.contains('p') {
            return Err(LexErrorKind::InvalidNumber);
        }
        return Ok(if lower.contains('p') {
            NumClass::Float
        } else {
            NumClass::Int
        });
    }
    if lower.starts_with("0b") || lower.starts_with("0o") {
        return Ok(NumClass::Int);
    }
    if lower.contains('.') || lower.contains('e') {
        return Ok(NumClass::Float);
    }
    Ok(NumClass::Int)
}

// =============================================================================
// 4. Token Definition
// =============================================================================

#[repr(u8)]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?([eEpP][+-][0-9_]+)?i?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i?")]
    Number,

    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*""#, validate_interpreted_string)] String,
    #[regex(r"'([^'\\\n\r]|\\[^\n\r])+'", validate_rune)] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

// =============================================================================
// 5. Lookup tables
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokKind {
    Literal,
    Simple,
    Trivia,
}

macro_rules! gen_lookup_table {
    (bool, $size:expr, $($variant:ident),* $(,)?) => {{
        let mut table = [false; $size];
        $(table[RawTok::$variant as usize] = true;)*
        table
    }};
    ($enum:ty, $size:expr, $default:expr, $($variant:ident => $value:expr),* $(,)?) => {{
        let mut table = [$default; $size];
        $(table[RawTok::$variant as usize] = $value;)*
        table
    }};
}

/// Tokens after which a newline turns into `;` (Go spec, "Semicolons").
const SEMI_INSERT_TABLE: [bool; 256] = gen_lookup_table!(
    bool,
    256,
    Ident,
    Number,
    Rune,
    String,
    RawString,
    KwBreak,
    KwContinue,
    KwFallthrough,
    KwReturn,
    Inc,
    Dec,
    RParen,
    RBrack,
    RBrace,
);

const TOKEN_KIND_TABLE: [TokKind; 256] = gen_lookup_table!(
    TokKind, 256, TokKind::Simple,
    Newline => TokKind::Trivia,
    LineComment => TokKind::Trivia,
    BlockComment => TokKind::Trivia,
    Ident => TokKind::Literal,
    Number => TokKind::Literal,
    Rune => TokKind::Literal,
    String => TokKind::Literal,
    RawString => TokKind::Literal,
);

impl RawTok {
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        SEMI_INSERT_TABLE[self as usize]
    }

    #[inline(always)]
    const fn kind(self) -> TokKind {
        TOKEN_KIND_TABLE[self as usize]
    }

    #[inline]
    fn to_token<'src>(self, slice: &'src str) -> Tok<'src> {
        // Number is handled by the wrapper (needs classification).
        if matches!(self.kind(), TokKind::Literal) {
            return match self {
                Self::Ident => Tok::Ident(slice),
                Self::Rune => Tok::RuneLit(slice),
                Self::String => Tok::StringLit(slice),
                Self::RawString => Tok::RawStringLit(slice),
                _ => Tok::Error,
            };
        }

        macro_rules! simple_tok {
            ($($raw:ident => $tok:ident),* $(,)?) => {
                match self {
                    $(Self::$raw => Tok::$tok,)*
                    _ => Tok::Error,
                }
            };
        }

        simple_tok! {
            KwBreak => KwBreak, KwCase => KwCase, KwChan => KwChan, KwConst => KwConst,
            KwContinue => KwContinue, KwDefault => KwDefault, KwDefer => KwDefer, KwElse => KwElse,
            KwFallthrough => KwFallthrough, KwFor => KwFor, KwFunc => KwFunc, KwGo => KwGo,
            KwGoto => KwGoto, KwIf => KwIf, KwImport => KwImport, KwInterface => KwInterface,
            KwMap => KwMap, KwPackage => KwPackage, KwRange => KwRange, KwReturn => KwReturn,
            KwSelect => KwSelect, KwStruct => KwStruct, KwSwitch => KwSwitch, KwType => KwType, KwVar => KwVar,

            Ellipsis => Ellipsis, ShlAssign => ShlAssign, ShrAssign => ShrAssign, AndNotAssign => AndNotAssign,
            AddAssign => AddAssign, SubAssign => SubAssign, MulAssign => MulAssign, DivAssign => DivAssign,
            ModAssign => ModAssign, AndAssign => AndAssign, OrAssign => OrAssign, XorAssign => XorAssign,
            Shl => Shl, Shr => Shr, AndNot => AndNot, LAnd => LAnd, LOr => LOr, EqEq => EqEq, NotEq => NotEq,
            Le => Le, Ge => Ge, Inc => Inc, Dec => Dec, Define => Define, Arrow => Arrow,
            Assign => Assign, Plus => Plus, Minus => Minus, Star => Star, Slash => Slash, Percent => Percent,
            Amp => Amp, Pipe => Pipe, Caret => Caret, Tilde => Tilde, Bang => Bang, Lt => Lt, Gt => Gt,

            LParen => LParen, RParen => RParen, LBrack => LBrack, RBrack => RBrack, LBrace => LBrace,
            RBrace => RBrace, Comma => Comma, Semi => Semi, Colon => Colon, Dot => Dot,
        }
    }
}

// =============================================================================
// 6. Public Token Definition (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
}

impl<'input> std::fmt::Display for Tok<'input> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => f.write_str(s),
            other => write!(f, "{other:?}"),
        }
    }
}

// =============================================================================
// 7. Lexer wrapper: semicolon insertion + comment side channel + diags
// =============================================================================

/// Comment seen by the lexer. Comments never reach the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawComment {
    pub kind: CommentKind,
    pub span: Span,
}

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    comments: Vec<RawComment>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::with_capacity(16),
            comments: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    /// Comments seen so far, in source order.
    pub fn take_comments(&mut self) -> Vec<RawComment> {
        std::mem::take(&mut self.comments)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = Span::from_range(span);
        self.diags.push(LexError { kind, span }.diag());
    }

    #[inline]
    fn emit_semi_at(&mut self, pos: usize) {
        self.pending = Some((pos, Tok::Semi, pos));
    }

    #[inline]
    fn handle_trivia(&mut self, raw: RawTok, span: &Range<usize>, slice: &str) -> bool {
        match raw {
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    self.emit_semi_at(span.start);
                }
                true
            }
            RawTok::LineComment => {
                self.comments.push(RawComment {
                    kind: CommentKind::Line,
                    span: Span::from_range(span.clone()),
                });
                true
            }
            RawTok::BlockComment => {
                self.comments.push(RawComment {
                    kind: CommentKind::Block,
                    span: Span::from_range(span.clone()),
                });
                if self.last_can_insert_semi {
                    if let Some(off) = first_newline_offset(slice) {
                        self.last_can_insert_semi = false;
                        self.emit_semi_at(span.start + off);
                    }
                }
                true
            }
            _ => false,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }

            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                // Don't return yet: a pending ';' may still need emitting.
                None => {
                    self.handle_eof();
                    continue;
                }
                Some(Err(kind)) => return self.handle_lex_error(kind),
                Some(Ok(raw)) => {
                    if let Some(item) = self.handle_raw_token(raw) {
                        return Some(item);
                    }
                }
            }
        }
    }
}

impl<'src> Lexer<'src> {
    #[inline]
    fn handle_eof(&mut self) {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.emit_semi_at(self.src_len);
        }
    }

    #[inline]
    fn handle_lex_error(&mut self, kind: LexErrorKind) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        Some((span.start, Tok::Error, span.end))
    }

    /// Returns `None` for trivia (nothing to emit).
    #[inline]
    fn handle_raw_token(&mut self, raw: RawTok) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        // A BOM is only valid as the very first character.
        if raw == RawTok::Bom {
            if span.start == 0 {
                return None;
            }
            self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
            self.last_can_insert_semi = false;
            return Some((span.start, Tok::Error, span.end));
        }

        if self.handle_trivia(raw, &span, slice) {
            return None;
        }

        if raw == RawTok::Error {
            self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
            self.last_can_insert_semi = false;
            return Some((span.start, Tok::Error, span.end));
        }

        if raw == RawTok::Number {
            return Some(self.handle_number_token(span, slice));
        }

        self.last_can_insert_semi = raw.can_insert_semicolon();
        Some((span.start, raw.to_token(slice), span.end))
    }

    #[inline]
    fn handle_number_token(
        &mut self,
        span: Range<usize>,
        slice: &'src str,
    ) -> (usize, Tok<'src>, usize) {
        match classify_number(slice) {
            Ok(class) => {
                self.last_can_insert_semi = true;
                let tok = match class {
                    NumClass::Int => Tok::IntLit(slice),
                    NumClass::Float => Tok::FloatLit(slice),
                    NumClass::Imag => Tok::ImagLit(slice),
                };
                (span.start, tok, span.end)
            }
            Err(kind) => {
                self.push_lex_diag(kind, span.clone());
                self.last_can_insert_semi = false;
                (span.start, Tok::Error, span.end)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_classes() {
        assert_eq!(classify_number("42"), Ok(NumClass::Int));
        assert_eq!(classify_number("0x1F"), Ok(NumClass::Int));
        assert_eq!(classify_number("1.5e3"), Ok(NumClass::Float));
        assert_eq!(classify_number("0x1p-2"), Ok(NumClass::Float));
        assert_eq!(classify_number("2i"), Ok(NumClass::Imag));
        assert_eq!(classify_number("1_"), Err(LexErrorKind::InvalidNumber));
        assert_eq!(classify_number("0x1.8"), Err(LexErrorKind::InvalidNumber));
    }

    #[test]
    fn escapes() {
        assert!(validate_escapes(br"a\nb", b'"').is_ok());
        assert!(validate_escapes("\\x41é\\101".as_bytes(), b'"').is_ok());
        assert!(validate_escapes(br"\q", b'"').is_err());
        assert!(validate_escapes(br"\400", b'"').is_err());
        assert!(validate_escapes(br"\uD800", b'"').is_err());
        assert_eq!(validate_escapes("é".as_bytes(), b'\''), Ok(1));
    }
}
