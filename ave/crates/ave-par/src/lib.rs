//! ave-par — the Pratt expression parser and recursive-descent statement
//! grammar for Ave.
//!
//! Consumes the token stream `ave-lex` produces and builds the AST defined
//! in [`ast`]. Like the lexer below it, the parser never aborts on a
//! malformed construct: every failure is recorded on the shared
//! [`Handler`] and recovery substitutes an `Error` node (or skips forward
//! to the next statement boundary) so the rest of the file still parses.
//!
//! # Pratt parsing
//!
//! `parse_expression(min_bp)` is the textbook top-down-operator-precedence
//! loop: a prefix parselet produces the left-hand side, then an unbounded
//! loop consumes infix/postfix operators whose binding power clears
//! `min_bp`, folding `left` into a new node each time. See [`precedence`]
//! for the binding-power ladder and [`expr`] for the parselet dispatch.

pub mod ast;
mod expr;
mod precedence;
mod stmt;
mod types;

use ast::{Body, HoistedDecl, Program, Stmt, StmtKind};
use ave_lex::{ScannedData, Token, TokenKind};
use ave_util::{Diagnostic, FileId, Handler, Span};
use std::path::PathBuf;

/// Everything `parse()` hands downstream: the AST plus the source it came
/// from, preserved so the checker (and any diagnostic renderer) never has
/// to thread it through separately.
pub struct ParsedData {
    pub filename: PathBuf,
    pub file_id: FileId,
    pub source: String,
    pub ast: Program,
    pub has_error: bool,
}

/// Parses one file's token stream. Never panics on malformed input.
pub fn parse(scanned: ScannedData, handler: &Handler) -> ParsedData {
    let had_errors_before = handler.len();
    let mut parser = Parser::new(scanned.tokens, handler);
    let ast = parser.parse_program();
    let has_error = scanned.has_error || handler.len() > had_errors_before;
    ParsedData {
        filename: scanned.filename,
        file_id: scanned.file_id,
        source: scanned.source,
        ast,
        has_error,
    }
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    handler: &'a Handler,
    node_ids: ast::NodeIdGen,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self { tokens, pos: 0, handler, node_ids: ast::NodeIdGen::new() }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut stmts = Vec::new();
        self.skip_blank_lines();
        while !self.is_at_end() {
            if self.check(TokenKind::Newline) {
                self.advance();
                continue;
            }
            stmts.push(self.parse_stmt());
            self.skip_blank_lines();
        }
        let declarations = Self::hoist(&stmts);
        Program { body: Body::new(stmts, declarations), has_error: self.handler.has_errors() }
    }

    /// Collects the hoisted declarations for one flat statement list: a
    /// `FuncDeclaration` entry for every `func` in the block, and a
    /// `HoistedVarDeclaration` for every function-scoped (`var`)
    /// declarator. `let`/`const` are deliberately excluded.
    pub(crate) fn hoist(stmts: &[Stmt]) -> Vec<HoistedDecl> {
        let mut out = Vec::new();
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::FunctionDeclaration { name, name_span, .. } => {
                    out.push(HoistedDecl::Func(*name, *name_span));
                }
                StmtKind::VarDeclaration { kind: ast::DeclKind::Function, declarators } => {
                    for decl in declarators {
                        out.push(HoistedDecl::Var(decl.name, decl.name_span));
                    }
                }
                _ => {}
            }
        }
        out
    }

    // -- token stream primitives -------------------------------------------------

    pub(crate) fn fresh_id(&mut self) -> ast::NodeId {
        self.node_ids.fresh()
    }

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn previous_span(&self) -> Span {
        if self.pos == 0 {
            self.current_span()
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens.get(self.pos + offset).map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token if it matches `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it matches `kind`, else emits a
    /// `SyntaxError` naming `what` and leaves the cursor in place.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            let span = self.current_span();
            self.handler.emit(Diagnostic::syntax(format!("expected {what}"), span));
            None
        }
    }

    /// A block is introduced by an optional `:` (already consumed by the
    /// caller in most productions) followed by `NEWLINE INDENT`.
    pub(crate) fn expect_block_open(&mut self) {
        self.eat(TokenKind::Colon);
        self.eat(TokenKind::Newline);
        self.expect(TokenKind::Indent, "indented block");
    }

    /// Skips stray blank-line `NEWLINE` tokens between statements. The
    /// lexer already collapses genuinely blank source lines, so this only
    /// ever fires on an explicit trailing `;` followed by a newline or
    /// similar degenerate separator runs.
    pub(crate) fn skip_blank_lines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Error-recovery synchronisation point: skip forward to the next
    /// `NEWLINE`, `DEDENT`, `;`, or EOF, per the spec's recovery rule.
    pub(crate) fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Newline | TokenKind::Dedent | TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}
