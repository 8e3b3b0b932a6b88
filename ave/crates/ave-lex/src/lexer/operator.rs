//! Punctuation, operators (with their compound-assignment forms) and
//! bracket tracking. Multi-character operators are matched greedily —
//! longest match wins.

use ave_util::Diagnostic;

use super::core::Lexer;
use crate::TokenKind;

impl<'a> Lexer<'a> {
    pub(crate) fn scan_operator(&mut self) {
        let start = self.mark();
        let c = self.cursor.advance().expect("caller checked for a char");
        let kind = match c {
            '(' => self.open_bracket('('),
            ')' => self.close_bracket('(', ')'),
            '[' => self.open_bracket('['),
            ']' => self.close_bracket('[', ']'),
            '{' => self.open_bracket('{'),
            '}' => self.close_bracket('{', '}'),
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            '|' => TokenKind::Pipe,
            '&' => TokenKind::Amp,
            '^' => TokenKind::Caret,
            '=' => self.two_char('=', TokenKind::EqEq, TokenKind::Eq),
            '+' => {
                if self.cursor.eat('+') {
                    TokenKind::PlusPlus
                } else if self.cursor.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.cursor.eat('-') {
                    TokenKind::MinusMinus
                } else if self.cursor.eat('=') {
                    TokenKind::MinusEq
                } else if self.cursor.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.cursor.eat('*') {
                    if self.cursor.eat('=') {
                        TokenKind::StarStarEq
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.cursor.eat('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.cursor.eat('/') {
                    if self.cursor.eat('=') {
                        TokenKind::SlashSlashEq
                    } else {
                        TokenKind::SlashSlash
                    }
                } else if self.cursor.eat('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => self.two_char('=', TokenKind::PercentEq, TokenKind::Percent),
            '<' => self.two_char('=', TokenKind::LtEq, TokenKind::Lt),
            '>' => self.two_char('=', TokenKind::GtEq, TokenKind::Gt),
            '!' => self.two_char('=', TokenKind::BangEq, TokenKind::Bang),
            other => {
                let span = self.span_from(start);
                self.handler.emit(Diagnostic::syntax(format!("unexpected character '{other}'"), span));
                let text = self.cursor.slice(start.0, self.cursor.pos);
                self.push(TokenKind::Name, text, span);
                return;
            }
        };
        let span = self.span_from(start);
        let text = self.cursor.slice(start.0, self.cursor.pos);
        self.push(kind, text, span);
    }

    fn two_char(&mut self, second: char, with: TokenKind, without: TokenKind) -> TokenKind {
        if self.cursor.eat(second) {
            with
        } else {
            without
        }
    }

    fn open_bracket(&mut self, c: char) -> TokenKind {
        self.bracket_stack.push(c);
        self.indent.open_bracket();
        match c {
            '(' => TokenKind::LParen,
            '[' => TokenKind::LBracket,
            _ => TokenKind::LBrace,
        }
    }

    fn close_bracket(&mut self, expected_open: char, c: char) -> TokenKind {
        match self.bracket_stack.pop() {
            Some(open) if open == expected_open => {}
            Some(_) | None => {
                let span = self.here();
                self.handler.emit(Diagnostic::syntax(format!("mismatched closing bracket '{c}'"), span));
            }
        }
        self.indent.close_bracket();
        match c {
            ')' => TokenKind::RParen,
            ']' => TokenKind::RBracket,
            _ => TokenKind::RBrace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ave_util::{FileId, Handler};

    fn kinds(src: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(src, FileId(0), &handler);
        lexer.run().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn greedy_longest_match() {
        assert_eq!(kinds("**=")[0], TokenKind::StarStarEq);
        assert_eq!(kinds("//=")[0], TokenKind::SlashSlashEq);
        assert_eq!(kinds("->")[0], TokenKind::Arrow);
    }

    #[test]
    fn mismatched_close_bracket_is_syntax_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("(]", FileId(0), &handler);
        lexer.run();
        assert!(handler.has_errors());
    }

    #[test]
    fn brackets_suppress_layout_tokens() {
        let ks = kinds("(a\nb)");
        let newline_count = ks.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newline_count, 1, "only the final EOF newline should survive");
        assert!(!ks.contains(&TokenKind::Indent));
        assert!(!ks.contains(&TokenKind::Dedent));
    }
}
