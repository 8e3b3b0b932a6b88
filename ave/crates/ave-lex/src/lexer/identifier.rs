//! Identifier and keyword scanning.

use ave_util::lookup_keyword;

use super::core::{is_ident_continue, is_ident_start, Lexer};
use crate::TokenKind;

impl<'a> Lexer<'a> {
    /// Scans `[A-Za-z_][A-Za-z0-9_]*`; reserved keywords take precedence
    /// over treating the lexeme as a plain `Name`.
    pub(crate) fn scan_identifier(&mut self) {
        let start = self.mark();
        debug_assert!(is_ident_start(self.cursor.peek().expect("caller checked")));
        self.cursor.advance();
        while matches!(self.cursor.peek(), Some(c) if is_ident_continue(c)) {
            self.cursor.advance();
        }
        let span = self.span_from(start);
        let text = self.cursor.slice(start.0, self.cursor.pos);
        let kind = keyword_kind(text).unwrap_or(TokenKind::Name);
        self.push(kind, text, span);
    }
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    lookup_keyword(text)?;
    Some(match text {
        "var" => TokenKind::Var,
        "let" => TokenKind::Let,
        "const" => TokenKind::Const,
        "func" => TokenKind::Func,
        "record" => TokenKind::Record,
        "if" => TokenKind::If,
        "elif" => TokenKind::Elif,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "return" => TokenKind::Return,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "is" => TokenKind::Is,
        "num" => TokenKind::NumType,
        "str" => TokenKind::StrType,
        "bool" => TokenKind::BoolType,
        "any" => TokenKind::AnyType,
        "object" => TokenKind::ObjectType,
        "void" => TokenKind::VoidType,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use ave_util::{FileId, Handler};

    fn first_kind(src: &str) -> TokenKind {
        let handler = Handler::new();
        let mut lexer = Lexer::new(src, FileId(0), &handler);
        lexer.run()[0].kind
    }

    #[test]
    fn keyword_beats_name() {
        assert_eq!(first_kind("record"), TokenKind::Record);
        assert_eq!(first_kind("recorder"), TokenKind::Name);
    }

    #[test]
    fn primitive_type_names_are_keywords() {
        assert_eq!(first_kind("num"), TokenKind::NumType);
    }
}
