//! Core driver: the `Lexer` struct, its line-start/off-side-rule handling,
//! and the dispatch that hands each token category off to the sibling
//! `identifier`/`number`/`string`/`operator`/`comment` modules.

use ave_util::{FileId, Handler, Span, Symbol};

use crate::cursor::Cursor;
use crate::indent::{IndentEvent, IndentState};
use crate::{Token, TokenKind};

pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) handler: &'a Handler,
    pub(crate) file_id: FileId,
    pub(crate) indent: IndentState,
    pub(crate) bracket_stack: Vec<char>,
    pub(crate) tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file_id: FileId, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            file_id,
            indent: IndentState::new(),
            bracket_stack: Vec::new(),
            tokens: Vec::new(),
        }
    }

    pub fn run(&mut self) -> Vec<Token> {
        self.handle_line_start();
        loop {
            self.skip_inline_whitespace();
            match self.cursor.peek() {
                None => break,
                Some('\n') => self.handle_newline(),
                Some('#') => self.skip_line_comment(),
                Some(c) if c.is_ascii_digit() => self.scan_number(),
                Some(c) if is_ident_start(c) => self.scan_identifier(),
                Some('\'') | Some('"') => self.scan_string(),
                Some(_) => self.scan_operator(),
            }
        }
        self.finish();
        std::mem::take(&mut self.tokens)
    }

    /// Position the cursor is currently at, as a zero-width span.
    pub(crate) fn here(&self) -> Span {
        Span::new(self.file_id, self.cursor.pos as u32, self.cursor.pos as u32, self.cursor.line, self.cursor.column)
    }

    pub(crate) fn span_from(&self, start: (usize, u32, u32)) -> Span {
        Span::new(self.file_id, start.0 as u32, self.cursor.pos as u32, start.1, start.2)
    }

    pub(crate) fn mark(&self) -> (usize, u32, u32) {
        (self.cursor.pos, self.cursor.line, self.cursor.column)
    }

    pub(crate) fn push(&mut self, kind: TokenKind, lexeme: &str, span: Span) {
        self.tokens.push(Token::new(kind, Symbol::intern(lexeme), span));
    }

    /// Skips spaces and tabs that aren't at the start of a line (those are
    /// measured separately by `handle_line_start`). Tabs count as one
    /// column here too, matching the leading-whitespace policy.
    fn skip_inline_whitespace(&mut self) {
        while matches!(self.cursor.peek(), Some(' ') | Some('\t') | Some('\r')) {
            self.cursor.advance();
        }
    }

    fn handle_newline(&mut self) {
        let start = self.mark();
        self.cursor.advance();
        if self.indent.in_brackets() {
            return;
        }
        let span = self.span_from(start);
        self.push(TokenKind::Newline, "\n", span);
        self.handle_line_start();
    }

    /// Consumes any run of blank/comment-only lines, then measures the
    /// indentation of the next line with real content (if any) and emits
    /// the resulting `INDENT`/`DEDENT` tokens. A no-op while bracket depth
    /// is nonzero.
    fn handle_line_start(&mut self) {
        if self.indent.in_brackets() {
            return;
        }
        loop {
            let width = self.consume_leading_whitespace();
            match self.cursor.peek() {
                None => return,
                Some('\n') => {
                    self.cursor.advance();
                    continue;
                }
                Some('#') => {
                    self.skip_line_comment_body();
                    if self.cursor.peek() == Some('\n') {
                        self.cursor.advance();
                    }
                    continue;
                }
                Some(_) => {
                    self.apply_indent(width);
                    return;
                }
            }
        }
    }

    fn consume_leading_whitespace(&mut self) -> usize {
        let mut width = 0;
        while matches!(self.cursor.peek(), Some(' ') | Some('\t')) {
            self.cursor.advance();
            width += 1;
        }
        width
    }

    fn apply_indent(&mut self, width: usize) {
        let span = self.here();
        match self.indent.measure(width) {
            IndentEvent::Same => {}
            IndentEvent::Indent => self.push(TokenKind::Indent, "", span),
            IndentEvent::Dedent(n) => {
                for _ in 0..n {
                    self.push(TokenKind::Dedent, "", span);
                }
            }
            IndentEvent::InconsistentDedent(n) => {
                for _ in 0..n {
                    self.push(TokenKind::Dedent, "", span);
                }
                self.handler.emit(ave_util::Diagnostic::syntax(
                    "inconsistent dedent: indentation does not match any enclosing level",
                    span,
                ));
            }
        }
    }

    fn finish(&mut self) {
        let span = self.here();
        let pops = self.indent.unwind_at_eof();
        for _ in 0..pops {
            self.push(TokenKind::Dedent, "", span);
        }
        self.push(TokenKind::Newline, "", span);
        self.push(TokenKind::Eof, "", span);
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use ave_util::Handler;

    fn run(src: &str) -> Vec<Token> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(src, FileId(0), &handler);
        lexer.run()
    }

    #[test]
    fn blank_lines_do_not_affect_indentation() {
        let tokens = run("if x\n  y\n\n  z\nw");
        let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
    }

    #[test]
    fn inconsistent_dedent_reports_syntax_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("if x\n    y\n  z\n", FileId(0), &handler);
        lexer.run();
        assert!(handler.has_errors());
    }
}
