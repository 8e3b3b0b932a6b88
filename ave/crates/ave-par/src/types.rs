//! Type-annotation grammar: the surface syntax following a `:` in a
//! parameter, declarator, record property, or return position. Builds
//! [`crate::ast::TypeAnnotationSyntax`] — nothing here resolves a name to
//! an actual `TypeId`, that is `ave-sem`'s job.

use crate::ast::TypeAnnotationSyntax;
use crate::Parser;
use ave_lex::TokenKind;
use ave_util::Span;

impl<'a> Parser<'a> {
    /// `type := union`, entry point used wherever a `:` or `->` is
    /// followed by a type.
    pub fn parse_type(&mut self) -> TypeAnnotationSyntax {
        self.parse_union_type()
    }

    /// `union := atom ('|' atom)*`
    fn parse_union_type(&mut self) -> TypeAnnotationSyntax {
        let first = self.parse_atom_type();
        if !self.check(TokenKind::Pipe) {
            return first;
        }
        let start = first.span();
        let mut members = vec![first];
        while self.eat(TokenKind::Pipe) {
            members.push(self.parse_atom_type());
        }
        let end = members.last().unwrap().span();
        TypeAnnotationSyntax::Union(members, start.to(end))
    }

    /// `atom := primitive | NAME '[' ']' | NAME '<' type (',' type)* '>'
    ///        | '(' paramList ')' ('->' type)? | '{' (NAME ':' type (',' | ';'))* '}'
    ///        | NAME`
    fn parse_atom_type(&mut self) -> TypeAnnotationSyntax {
        match self.current_kind() {
            TokenKind::NumType
            | TokenKind::StrType
            | TokenKind::BoolType
            | TokenKind::AnyType
            | TokenKind::ObjectType
            | TokenKind::VoidType => {
                let tok = self.advance();
                self.parse_array_suffix(TypeAnnotationSyntax::Named(tok.lexeme, tok.span))
            }
            TokenKind::Name => {
                let tok = self.advance();
                if self.check(TokenKind::Lt) {
                    self.parse_generic_type(tok.lexeme, tok.span)
                } else {
                    self.parse_array_suffix(TypeAnnotationSyntax::Named(tok.lexeme, tok.span))
                }
            }
            TokenKind::LParen => self.parse_function_type(),
            TokenKind::LBrace => self.parse_object_type(),
            _ => {
                let span = self.current_span();
                self.handler.emit(ave_util::Diagnostic::syntax("expected a type", span));
                TypeAnnotationSyntax::Named(ave_util::Symbol::intern("?"), span)
            }
        }
    }

    /// `NAME '[' ']'` — zero or more trailing array suffixes.
    fn parse_array_suffix(&mut self, mut ty: TypeAnnotationSyntax) -> TypeAnnotationSyntax {
        while self.check(TokenKind::LBracket) {
            let start = ty.span();
            self.advance();
            let end_tok = self.expect(TokenKind::RBracket, "']' to close array type");
            let end = end_tok.map(|t| t.span).unwrap_or(start);
            ty = TypeAnnotationSyntax::Array(Box::new(ty), start.to(end));
        }
        ty
    }

    fn parse_generic_type(&mut self, name: ave_util::Symbol, start: Span) -> TypeAnnotationSyntax {
        self.expect(TokenKind::Lt, "'<'");
        let mut args = vec![self.parse_type()];
        while self.eat(TokenKind::Comma) {
            args.push(self.parse_type());
        }
        let end_tok = self.expect(TokenKind::Gt, "'>' to close generic argument list");
        let end = end_tok.map(|t| t.span).unwrap_or(start);
        self.parse_array_suffix(TypeAnnotationSyntax::Generic(name, args, start.to(end)))
    }

    fn parse_function_type(&mut self) -> TypeAnnotationSyntax {
        let start = self.current_span();
        self.advance(); // '('
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            params.push(self.parse_type());
            while self.eat(TokenKind::Comma) {
                params.push(self.parse_type());
            }
        }
        self.expect(TokenKind::RParen, "')' to close function type parameter list");
        let ret = if self.eat(TokenKind::Arrow) { self.parse_type() } else { TypeAnnotationSyntax::Named(ave_util::Symbol::intern("void"), start) };
        let end = ret.span();
        self.parse_array_suffix(TypeAnnotationSyntax::Function { params, ret: Box::new(ret), span: start.to(end) })
    }

    fn parse_object_type(&mut self) -> TypeAnnotationSyntax {
        let start = self.current_span();
        self.advance(); // '{'
        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let name_tok = self.expect(TokenKind::Name, "property name");
            let name = match name_tok {
                Some(t) => t.lexeme,
                None => break,
            };
            self.expect(TokenKind::Colon, "':' after property name");
            let ty = self.parse_type();
            fields.push((name, ty));
            if !self.eat(TokenKind::Comma) {
                self.eat(TokenKind::Semicolon);
            }
        }
        let end_tok = self.expect(TokenKind::RBrace, "'}' to close object type");
        let end = end_tok.map(|t| t.span).unwrap_or(start);
        self.parse_array_suffix(TypeAnnotationSyntax::Object(fields, start.to(end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use ave_lex::lex;
    use ave_util::{FileId, Handler};
    use std::path::PathBuf;

    fn parse_type_str(src: &str) -> TypeAnnotationSyntax {
        let handler = Handler::new();
        let data = lex(PathBuf::from("<t>"), FileId(0), src.to_string(), &handler);
        let mut parser = Parser::new(data.tokens, &handler);
        parser.parse_type()
    }

    #[test]
    fn named_primitive() {
        assert!(matches!(parse_type_str("num"), TypeAnnotationSyntax::Named(_, _)));
    }

    #[test]
    fn array_of_named() {
        assert!(matches!(parse_type_str("num[]"), TypeAnnotationSyntax::Array(_, _)));
    }

    #[test]
    fn generic_instance() {
        match parse_type_str("Array<num>") {
            TypeAnnotationSyntax::Generic(_, args, _) => assert_eq!(args.len(), 1),
            other => panic!("expected generic, got {other:?}"),
        }
    }

    #[test]
    fn union_of_two() {
        match parse_type_str("num | str") {
            TypeAnnotationSyntax::Union(members, _) => assert_eq!(members.len(), 2),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn function_type() {
        match parse_type_str("(num, str) -> bool") {
            TypeAnnotationSyntax::Function { params, .. } => assert_eq!(params.len(), 2),
            other => panic!("expected function type, got {other:?}"),
        }
    }

    #[test]
    fn object_type() {
        match parse_type_str("{ x: num, y: num }") {
            TypeAnnotationSyntax::Object(fields, _) => assert_eq!(fields.len(), 2),
            other => panic!("expected object type, got {other:?}"),
        }
    }
}
