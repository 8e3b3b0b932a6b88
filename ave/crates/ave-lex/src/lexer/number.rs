//! Numeric literal scanning: decimal (with fraction/exponent), `0x` hex and
//! `0b` binary forms.

use ave_util::{Diagnostic, Symbol};

use super::core::{is_ident_start, Lexer};
use crate::{Literal, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn scan_number(&mut self) {
        let start = self.mark();
        if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_at(1), Some('x') | Some('X')) {
            self.cursor.advance();
            self.cursor.advance();
            self.scan_radix_literal(start, TokenKind::LiteralHex, is_hex_digit, "hexadecimal");
            return;
        }
        if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_at(1), Some('b') | Some('B')) {
            self.cursor.advance();
            self.cursor.advance();
            self.scan_radix_literal(start, TokenKind::LiteralBinary, is_binary_digit, "binary");
            return;
        }
        self.scan_decimal(start);
    }

    fn scan_radix_literal(
        &mut self,
        start: (usize, u32, u32),
        kind: TokenKind,
        is_digit: fn(char) -> bool,
        radix_name: &str,
    ) {
        let digits_start = self.cursor.pos;
        while matches!(self.cursor.peek(), Some(c) if is_digit(c)) {
            self.cursor.advance();
        }
        let span = self.span_from(start);
        if self.cursor.pos == digits_start {
            self.handler.emit(Diagnostic::syntax(
                format!("invalid {radix_name} literal: expected at least one digit"),
                span,
            ));
        }
        self.reject_trailing_identifier(span);
        let text = self.cursor.slice(start.0, self.cursor.pos);
        let literal = if kind == TokenKind::LiteralHex {
            Literal::Hex(Symbol::intern(text))
        } else {
            Literal::Binary(Symbol::intern(text))
        };
        self.tokens.push(crate::Token::with_literal(kind, Symbol::intern(text), span, literal));
    }

    fn scan_decimal(&mut self, start: (usize, u32, u32)) {
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
            self.cursor.advance();
        }
        if self.cursor.peek() == Some('.') && matches!(self.cursor.peek_at(1), Some(c) if c.is_ascii_digit()) {
            self.cursor.advance();
            while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
                self.cursor.advance();
            }
        }
        if matches!(self.cursor.peek(), Some('e') | Some('E')) {
            let mark = (self.cursor.pos, self.cursor.line, self.cursor.column);
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                self.cursor.advance();
            }
            if matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
                while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
                    self.cursor.advance();
                }
            } else {
                // not actually an exponent (e.g. `1e` followed by a name) — back out.
                self.cursor.pos = mark.0;
                self.cursor.line = mark.1;
                self.cursor.column = mark.2;
            }
        }
        let span = self.span_from(start);
        self.reject_trailing_identifier(span);
        let text = self.cursor.slice(start.0, self.cursor.pos);
        let value: f64 = text.parse().unwrap_or(f64::NAN);
        self.tokens.push(crate::Token::with_literal(
            TokenKind::LiteralNum,
            Symbol::intern(text),
            span,
            Literal::Num(value),
        ));
    }

    fn reject_trailing_identifier(&mut self, span: ave_util::Span) {
        if matches!(self.cursor.peek(), Some(c) if is_ident_start(c)) {
            self.handler.emit(Diagnostic::syntax(
                "identifier starts immediately after number literal",
                span,
            ));
        }
    }
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn is_binary_digit(c: char) -> bool {
    c == '0' || c == '1'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use ave_util::{FileId, Handler};

    fn first(src: &str) -> crate::Token {
        let handler = Handler::new();
        let mut lexer = Lexer::new(src, FileId(0), &handler);
        lexer.run().remove(0)
    }

    #[test]
    fn decimal_with_fraction_and_exponent() {
        let tok = first("3.14e2");
        assert_eq!(tok.kind, TokenKind::LiteralNum);
        match tok.literal {
            Some(Literal::Num(v)) => assert!((v - 314.0).abs() < 1e-9),
            _ => panic!("expected numeric literal"),
        }
    }

    #[test]
    fn hex_literal_preserves_text() {
        let tok = first("0x1F");
        assert_eq!(tok.kind, TokenKind::LiteralHex);
        match tok.literal {
            Some(Literal::Hex(s)) => assert_eq!(s.as_str(), "0x1F"),
            _ => panic!("expected hex literal"),
        }
    }

    #[test]
    fn empty_hex_literal_is_syntax_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("0x", FileId(0), &handler);
        lexer.run();
        assert!(handler.has_errors());
    }

    #[test]
    fn identifier_glued_to_number_is_syntax_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("123abc", FileId(0), &handler);
        lexer.run();
        assert!(handler.has_errors());
    }
}
