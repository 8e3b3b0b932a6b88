//! Line comments: `#` through end of line, discarded entirely (they never
//! produce a token and never affect indentation).

use super::core::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn skip_line_comment(&mut self) {
        self.skip_line_comment_body();
    }

    pub(crate) fn skip_line_comment_body(&mut self) {
        debug_assert_eq!(self.cursor.peek(), Some('#'));
        while !matches!(self.cursor.peek(), None | Some('\n')) {
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ave_util::{FileId, Handler};
    use crate::TokenKind;

    #[test]
    fn comment_produces_no_token() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("x # trailing comment\ny", FileId(0), &handler);
        let tokens = lexer.run();
        let names: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Name).collect();
        assert_eq!(names.len(), 2);
    }
}
