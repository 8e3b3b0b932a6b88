//! ave-lex — the indentation-aware lexer.
//!
//! Converts source text into a token stream carrying synthetic
//! `INDENT`/`DEDENT`/`NEWLINE` tokens. Bracket nesting suspends layout:
//! inside `(...)`/`[...]`/`{...}` the lexer behaves like any ordinary
//! free-form scanner. The lexer never fails hard — bad input produces
//! best-effort tokens plus diagnostics on the shared [`Handler`].

mod cursor;
mod indent;
mod lexer;

pub use lexer::Lexer;

use ave_util::{FileId, Handler, Span, Symbol};
use std::path::PathBuf;

/// Closed set of token kinds. Punctuation, operators (with their
/// compound-assignment forms), comparisons, keywords, primitive type names,
/// literals, identifiers, and layout tokens.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    // identifiers & literals
    Name,
    LiteralNum,
    LiteralStr,
    LiteralHex,
    LiteralBinary,

    // keywords
    Var,
    Let,
    Const,
    Func,
    Record,
    If,
    Elif,
    Else,
    While,
    For,
    Return,
    True,
    False,
    And,
    Or,
    Is,

    // primitive type names
    NumType,
    StrType,
    BoolType,
    AnyType,
    ObjectType,
    VoidType,

    // punctuation
    Colon,
    Semicolon,
    Dot,
    Comma,
    Pipe,
    Amp,
    Caret,
    Eq,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // arithmetic and compound assignment
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    SlashSlash,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    SlashSlashEq,

    // comparison and equality
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    BangEq,

    // unary
    Bang,
    PlusPlus,
    MinusMinus,

    // arrow
    Arrow,

    // layout
    Indent,
    Dedent,
    Newline,
    Eof,
}

impl TokenKind {
    /// `true` for tokens the off-side rule never emits around
    /// (`INDENT`/`DEDENT`/`NEWLINE` themselves, used to coalesce adjacent
    /// newlines and to decide whether a close-bracket dedent is meaningful).
    pub fn is_layout(self) -> bool {
        matches!(self, TokenKind::Indent | TokenKind::Dedent | TokenKind::Newline)
    }
}

/// The literal payload carried by number/string tokens. Numeric literals are
/// parsed eagerly into `f64`; hex/binary literals keep their raw text
/// (`0x..`/`0b..`) since the emitter needs the original radix notation.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Num(f64),
    Str(Symbol),
    Hex(Symbol),
    Binary(Symbol),
}

/// One emitted token. Immutable once produced; the parser never rewrites a
/// token, only the byte span it came from is referenced in diagnostics.
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Symbol,
    pub span: Span,
    pub literal: Option<Literal>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: Symbol, span: Span) -> Self {
        Self { kind, lexeme, span, literal: None }
    }

    pub fn with_literal(kind: TokenKind, lexeme: Symbol, span: Span, literal: Literal) -> Self {
        Self { kind, lexeme, span, literal: Some(literal) }
    }
}

/// Everything `lex()` hands downstream: the full token stream plus the
/// source it came from (the parser and checker both need it for spans and
/// diagnostics rendering).
pub struct ScannedData {
    pub filename: PathBuf,
    pub file_id: FileId,
    pub source: String,
    pub tokens: Vec<Token>,
    pub has_error: bool,
}

/// Lexes one source file. Never panics on malformed input — it records a
/// `SyntaxError` on `handler` and keeps scanning.
pub fn lex(filename: PathBuf, file_id: FileId, source: String, handler: &Handler) -> ScannedData {
    let had_errors_before = handler.len();
    let mut lexer = Lexer::new(&source, file_id, handler);
    let tokens = lexer.run();
    let has_error = handler.len() > had_errors_before;
    ScannedData { filename, file_id, source, tokens, has_error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ave_util::FileId;

    fn lex_str(src: &str) -> ScannedData {
        let handler = Handler::new();
        lex(PathBuf::from("<test>"), FileId(0), src.to_string(), &handler)
    }

    #[test]
    fn indent_dedent_counts_balance() {
        let data = lex_str("if x\n  y\nz");
        let indents = data.tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = data.tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        assert_eq!(indents, dedents);
    }

    #[test]
    fn ends_with_eof() {
        let data = lex_str("x");
        assert_eq!(data.tokens.last().unwrap().kind, TokenKind::Eof);
    }
}
