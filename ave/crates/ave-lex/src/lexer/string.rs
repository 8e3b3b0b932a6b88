//! String literal scanning. No escape processing is specified by the
//! core — the payload is the raw inner text between matching quotes.

use ave_util::{Diagnostic, Symbol};

use super::core::Lexer;
use crate::{Literal, Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn scan_string(&mut self) {
        let start = self.mark();
        let quote = self.cursor.advance().expect("caller checked for a quote");
        let inner_start = self.cursor.pos;
        loop {
            match self.cursor.peek() {
                None => {
                    let span = self.span_from(start);
                    self.handler.emit(Diagnostic::syntax("unterminated string literal", span));
                    let text = self.cursor.slice(inner_start, self.cursor.pos);
                    self.tokens.push(Token::with_literal(
                        TokenKind::LiteralStr,
                        Symbol::intern(text),
                        span,
                        Literal::Str(Symbol::intern(text)),
                    ));
                    return;
                }
                Some(c) if c == quote => {
                    let inner = self.cursor.slice(inner_start, self.cursor.pos);
                    self.cursor.advance();
                    let span = self.span_from(start);
                    self.tokens.push(Token::with_literal(
                        TokenKind::LiteralStr,
                        Symbol::intern(inner),
                        span,
                        Literal::Str(Symbol::intern(inner)),
                    ));
                    return;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ave_util::{FileId, Handler};

    #[test]
    fn matching_quotes_produce_raw_inner_text() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("'hello world'", FileId(0), &handler);
        let tokens = lexer.run();
        match &tokens[0].literal {
            Some(Literal::Str(s)) => assert_eq!(s.as_str(), "hello world"),
            _ => panic!("expected string literal"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn unterminated_string_is_syntax_error_but_still_continues() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("\"hello", FileId(0), &handler);
        let tokens = lexer.run();
        assert!(handler.has_errors());
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn newline_inside_string_is_tracked() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("'a\nb'\nx", FileId(0), &handler);
        let tokens = lexer.run();
        let name = tokens.iter().find(|t| t.kind == TokenKind::Name).unwrap();
        assert_eq!(name.span.line, 3);
    }
}
