//! Pratt expression parsing: prefix/infix/postfix dispatch and the binding
//! power loop. Token kinds that can start an expression are matched to a
//! *prefix* production; token kinds that can continue one are matched to an
//! *infix* (binary, assignment, call, member access) or *postfix*
//! (`++`/`--`) production, each tagged with its precedence from
//! [`crate::precedence`].

use crate::ast::{AssignOp, BinaryOp, Expr, ExprKind, LiteralValue, UnaryOp};
use crate::precedence::{self, BindingPower};
use crate::Parser;
use ave_lex::{Literal, TokenKind};
use ave_util::{Diagnostic, Span, Symbol};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

impl<'a> Parser<'a> {
    /// Parses a complete expression starting at the lowest precedence.
    pub fn parse_expression_top(&mut self) -> Expr {
        self.parse_expression(precedence::NONE)
    }

    /// The Pratt core: `left = prefix(); while infix/postfix bp > min_bp {
    /// left = continuation(left) }`.
    pub(crate) fn parse_expression(&mut self, min_bp: BindingPower) -> Expr {
        let mut left = self.parse_prefix();
        loop {
            if let Some((bp, assoc)) = self.infix_binding_power() {
                if bp <= min_bp {
                    break;
                }
                left = self.parse_infix(left, bp, assoc);
                continue;
            }
            if let Some(bp) = self.postfix_binding_power() {
                if bp <= min_bp {
                    break;
                }
                left = self.parse_postfix(left);
                continue;
            }
            break;
        }
        left
    }

    // -- prefix ------------------------------------------------------------------

    fn parse_prefix(&mut self) -> Expr {
        // An indented object literal following `=` or `:` sits on the next
        // line: `d: object =\n  age: 3`. Swallow that one separating
        // newline so the `Indent` prefix parselet below still fires.
        if self.check(TokenKind::Newline) && self.peek_kind(1) == TokenKind::Indent {
            self.advance();
        }
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::LiteralNum => self.literal_expr(start, |lit| match lit {
                Some(Literal::Num(n)) => LiteralValue::Num(*n),
                _ => LiteralValue::Num(0.0),
            }),
            TokenKind::LiteralStr => self.literal_expr(start, |lit| match lit {
                Some(Literal::Str(s)) => LiteralValue::Str(*s),
                _ => LiteralValue::Str(Symbol::intern("")),
            }),
            TokenKind::LiteralHex => self.literal_expr(start, |lit| match lit {
                Some(Literal::Hex(s)) => LiteralValue::Hex(*s),
                _ => LiteralValue::Hex(Symbol::intern("0x0")),
            }),
            TokenKind::LiteralBinary => self.literal_expr(start, |lit| match lit {
                Some(Literal::Binary(s)) => LiteralValue::Binary(*s),
                _ => LiteralValue::Binary(Symbol::intern("0b0")),
            }),
            TokenKind::True => {
                self.advance();
                self.node(start, ExprKind::Literal(LiteralValue::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                self.node(start, ExprKind::Literal(LiteralValue::Bool(false)))
            }
            TokenKind::Name => {
                let tok = self.advance();
                self.node(start, ExprKind::Identifier(tok.lexeme))
            }
            TokenKind::LParen => self.parse_group(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::Indent => self.parse_object_indented(),
            TokenKind::LBrace => self.parse_object_braced(),
            TokenKind::Func => self.parse_function_expr(),
            TokenKind::Minus => self.parse_prefix_unary(UnaryOp::Neg),
            TokenKind::Plus => self.parse_prefix_unary(UnaryOp::Pos),
            TokenKind::Bang => self.parse_prefix_unary(UnaryOp::Not),
            TokenKind::PlusPlus => self.parse_prefix_unary(UnaryOp::PreIncrement),
            TokenKind::MinusMinus => self.parse_prefix_unary(UnaryOp::PreDecrement),
            _ => {
                let tok = self.advance();
                self.handler.emit(Diagnostic::syntax(format!("unexpected '{}'", tok.lexeme), start));
                self.node(start, ExprKind::Error)
            }
        }
    }

    fn literal_expr(&mut self, start: Span, extract: impl Fn(&Option<Literal>) -> LiteralValue) -> Expr {
        let tok = self.advance();
        let value = extract(&tok.literal);
        self.node(start, ExprKind::Literal(value))
    }

    fn parse_prefix_unary(&mut self, op: UnaryOp) -> Expr {
        let start = self.current_span();
        self.advance();
        let operand = self.parse_expression(precedence::PREFIX_UNARY);
        self.node(start, ExprKind::Prefix { op, operand: Box::new(operand) })
    }

    fn parse_group(&mut self) -> Expr {
        let start = self.current_span();
        self.advance(); // '('
        let inner = self.parse_expression(precedence::NONE);
        self.expect(TokenKind::RParen, "')' to close grouped expression");
        self.node(start, ExprKind::Group(Box::new(inner)))
    }

    fn parse_array(&mut self) -> Expr {
        let start = self.current_span();
        self.advance(); // '['
        let mut elements = Vec::new();
        self.skip_blank_lines();
        while !self.check(TokenKind::RBracket) && !self.is_at_end() {
            elements.push(self.parse_expression(precedence::ASSIGNMENT));
            self.skip_blank_lines();
            if !self.eat(TokenKind::Comma) {
                break;
            }
            self.skip_blank_lines();
        }
        self.expect(TokenKind::RBracket, "']' to close array literal");
        self.node(start, ExprKind::Array(elements))
    }

    /// Bare `INDENT ... DEDENT` object literal, reachable only where a
    /// colon has already been consumed by the caller and a fresh indented
    /// block immediately follows (layout tokens never surface inside any
    /// bracket nesting, so this is the only place a prefix parselet ever
    /// sees a raw `INDENT`).
    fn parse_object_indented(&mut self) -> Expr {
        let start = self.current_span();
        self.advance(); // Indent
        let pairs = self.parse_object_pairs(TokenKind::Dedent);
        self.expect(TokenKind::Dedent, "dedent to close object literal");
        self.node(start, ExprKind::Object(pairs))
    }

    fn parse_object_braced(&mut self) -> Expr {
        let start = self.current_span();
        self.advance(); // '{'
        let pairs = if self.eat(TokenKind::Indent) {
            let pairs = self.parse_object_pairs(TokenKind::Dedent);
            self.expect(TokenKind::Dedent, "dedent to close object literal");
            pairs
        } else {
            self.parse_object_pairs(TokenKind::RBrace)
        };
        self.expect(TokenKind::RBrace, "'}' to close object literal");
        self.node(start, ExprKind::Object(pairs))
    }

    fn parse_object_pairs(&mut self, end: TokenKind) -> Vec<(Symbol, Expr)> {
        let mut pairs = Vec::new();
        self.skip_blank_lines();
        while !self.check(end) && !self.is_at_end() {
            let name = match self.expect(TokenKind::Name, "property name") {
                Some(tok) => tok.lexeme,
                None => {
                    self.synchronize();
                    break;
                }
            };
            self.expect(TokenKind::Colon, "':' after property name");
            let value = self.parse_expression(precedence::ASSIGNMENT);
            pairs.push((name, value));
            self.skip_blank_lines();
            if !self.eat(TokenKind::Comma) && !self.check(end) {
                break;
            }
            self.skip_blank_lines();
        }
        pairs
    }

    fn parse_function_expr(&mut self) -> Expr {
        let start = self.current_span();
        self.advance(); // func
        let params = self.parse_params();
        let return_type = self.eat(TokenKind::Arrow).then(|| crate::ast::TypeInfo::annotated(self.parse_type()));
        self.expect_block_open();
        let body = self.parse_body_until_dedent();
        self.node(start, ExprKind::Function { params, return_type, body, is_arrow: false })
    }

    // -- infix ---------------------------------------------------------------

    fn infix_binding_power(&self) -> Option<(BindingPower, Assoc)> {
        use precedence::*;
        Some(match self.current_kind() {
            TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
            | TokenKind::SlashSlashEq
            | TokenKind::StarStarEq => (ASSIGNMENT, Assoc::Right),
            TokenKind::Or => (LOGIC_OR, Assoc::Left),
            TokenKind::And => (LOGIC_AND, Assoc::Left),
            TokenKind::Pipe => (BIT_OR, Assoc::Left),
            TokenKind::Caret => (BIT_XOR, Assoc::Left),
            TokenKind::Amp => (BIT_AND, Assoc::Left),
            TokenKind::EqEq | TokenKind::BangEq => (EQUALITY, Assoc::Left),
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq | TokenKind::Is => {
                (COMPARISON, Assoc::Left)
            }
            TokenKind::Plus | TokenKind::Minus => (ADDITIVE, Assoc::Left),
            TokenKind::Star | TokenKind::Slash | TokenKind::SlashSlash | TokenKind::Percent => {
                (MULTIPLICATIVE, Assoc::Left)
            }
            TokenKind::StarStar => (POWER, Assoc::Right),
            TokenKind::LParen => (CALL, Assoc::Left),
            TokenKind::LBracket => (COMPUTED_MEMBER_ACCESS, Assoc::Left),
            TokenKind::Dot => (MEMBER_ACCESS, Assoc::Left),
            // A colon immediately followed by `NEWLINE`/`INDENT` is the
            // optional block-opening `:' of an `if`/`while`/`for` header
            // (§4.E/F's `':'?`), not the mid-expression `name: value`
            // shorthand — leave it for the statement parser's
            // `expect_block_open` rather than swallowing the block as an
            // object literal.
            TokenKind::Colon if !matches!(self.peek_kind(1), TokenKind::Newline | TokenKind::Indent) => {
                (MAX, Assoc::Left)
            }
            _ => return None,
        })
    }

    fn postfix_binding_power(&self) -> Option<BindingPower> {
        match self.current_kind() {
            TokenKind::PlusPlus | TokenKind::MinusMinus => Some(precedence::POSTFIX_UNARY),
            _ => None,
        }
    }

    fn parse_infix(&mut self, left: Expr, bp: BindingPower, assoc: Assoc) -> Expr {
        let start = left.span;
        match self.current_kind() {
            TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
            | TokenKind::SlashSlashEq
            | TokenKind::StarStarEq => self.parse_assignment(left, bp),
            TokenKind::LParen => self.parse_call(left),
            TokenKind::LBracket => self.parse_indexed_access(left),
            TokenKind::Dot => self.parse_member_access(left),
            TokenKind::Colon => self.parse_colon_object(left),
            _ => {
                let op_tok = self.advance();
                let op = Self::token_to_binary_op(op_tok.kind);
                let rhs_min = match assoc {
                    Assoc::Right => bp,
                    Assoc::Left => bp + 1,
                };
                let right = self.parse_expression(rhs_min);
                let span = start.to(right.span);
                self.node(span, ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) })
            }
        }
    }

    fn token_to_binary_op(kind: TokenKind) -> BinaryOp {
        match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::SlashSlash => BinaryOp::FloorDiv,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::StarStar => BinaryOp::Pow,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::EqEq => BinaryOp::EqEq,
            TokenKind::BangEq => BinaryOp::NotEq,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Is => BinaryOp::Is,
            other => unreachable!("{other:?} is not a binary operator token"),
        }
    }

    fn parse_assignment(&mut self, target: Expr, bp: BindingPower) -> Expr {
        if !Self::is_assignment_target(&target) {
            self.handler.emit(Diagnostic::syntax("Invalid assignment target", target.span));
        }
        let op_tok = self.advance();
        let op = match op_tok.kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::AddAssign,
            TokenKind::MinusEq => AssignOp::SubAssign,
            TokenKind::StarEq => AssignOp::MulAssign,
            TokenKind::SlashEq => AssignOp::DivAssign,
            TokenKind::SlashSlashEq => AssignOp::FloorDivAssign,
            TokenKind::PercentEq => AssignOp::ModAssign,
            TokenKind::StarStarEq => AssignOp::PowAssign,
            other => unreachable!("{other:?} is not an assignment operator token"),
        };
        let value = self.parse_expression(bp);
        let span = target.span.to(value.span);
        self.node(span, ExprKind::Assignment { op, target: Box::new(target), value: Box::new(value) })
    }

    /// An assignment target is an identifier or any member-access chain
    /// rooted at one; everything else is rejected.
    fn is_assignment_target(expr: &Expr) -> bool {
        matches!(expr.kind, ExprKind::Identifier(_) | ExprKind::MemberAccess { .. })
    }

    fn parse_call(&mut self, callee: Expr) -> Expr {
        let start = callee.span;
        self.advance(); // '('
        let mut args = Vec::new();
        self.skip_blank_lines();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            args.push(self.parse_expression(precedence::ASSIGNMENT));
            self.skip_blank_lines();
            if !self.eat(TokenKind::Comma) {
                break;
            }
            self.skip_blank_lines();
        }
        let end_tok = self.expect(TokenKind::RParen, "')' to close call argument list");
        let end = end_tok.map(|t| t.span).unwrap_or(start);
        self.node(start.to(end), ExprKind::Call { callee: Box::new(callee), args })
    }

    fn parse_indexed_access(&mut self, object: Expr) -> Expr {
        let start = object.span;
        self.advance(); // '['
        let property = self.parse_expression(precedence::NONE);
        let end_tok = self.expect(TokenKind::RBracket, "']' to close indexed access");
        let end = end_tok.map(|t| t.span).unwrap_or(start);
        self.node(
            start.to(end),
            ExprKind::MemberAccess { object: Box::new(object), property: Box::new(property), is_indexed: true },
        )
    }

    fn parse_member_access(&mut self, object: Expr) -> Expr {
        let start = object.span;
        self.advance(); // '.'
        let name_tok = self.expect(TokenKind::Name, "property name after '.'");
        let property = match name_tok {
            Some(tok) => self.node(tok.span, ExprKind::Identifier(tok.lexeme)),
            None => self.node(start, ExprKind::Error),
        };
        let end = property.span;
        self.node(
            start.to(end),
            ExprKind::MemberAccess { object: Box::new(object), property: Box::new(property), is_indexed: false },
        )
    }

    /// `name: value` mid-expression — e.g. a named call argument — builds a
    /// single-property object literal from an identifier `left`.
    fn parse_colon_object(&mut self, left: Expr) -> Expr {
        let start = left.span;
        let name = match left.kind {
            ExprKind::Identifier(sym) => sym,
            _ => {
                self.handler.emit(Diagnostic::syntax("expected a name before ':'", left.span));
                Symbol::intern("?")
            }
        };
        self.advance(); // ':'
        let value = self.parse_expression(precedence::ASSIGNMENT);
        let span = start.to(value.span);
        self.node(span, ExprKind::Object(vec![(name, value)]))
    }

    fn parse_postfix(&mut self, operand: Expr) -> Expr {
        let op_tok = self.advance();
        let op = match op_tok.kind {
            TokenKind::PlusPlus => UnaryOp::PostIncrement,
            TokenKind::MinusMinus => UnaryOp::PostDecrement,
            other => unreachable!("{other:?} is not a postfix operator token"),
        };
        let span = operand.span.to(op_tok.span);
        self.node(span, ExprKind::Postfix { op, operand: Box::new(operand) })
    }

    pub(crate) fn node(&mut self, span: Span, kind: ExprKind) -> Expr {
        let id = self.fresh_id();
        Expr::new(id, span, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ave_lex::lex;
    use ave_util::{FileId, Handler};
    use std::path::PathBuf;

    fn parse_expr_str(src: &str) -> (Expr, Handler) {
        let handler = Handler::new();
        let data = lex(PathBuf::from("<t>"), FileId(0), src.to_string(), &handler);
        let mut parser = Parser::new(data.tokens, &handler);
        let expr = parser.parse_expression_top();
        (expr, handler)
    }

    #[test]
    fn additive_binds_looser_than_multiplicative() {
        let (expr, handler) = parse_expr_str("1 + 2 * 3");
        assert!(!handler.has_errors());
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Add, right, .. } => {
                assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("expected top-level Add, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let (expr, _) = parse_expr_str("a = b = 1");
        match expr.kind {
            ExprKind::Assignment { value, .. } => {
                assert!(matches!(value.kind, ExprKind::Assignment { .. }));
            }
            other => panic!("expected top-level Assignment, got {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        let (expr, _) = parse_expr_str("a ** b ** c");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Pow, right, .. } => {
                assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Pow, .. }));
            }
            other => panic!("expected top-level Pow, got {other:?}"),
        }
    }

    #[test]
    fn unary_minus_binds_inside_binary() {
        let (expr, _) = parse_expr_str("1 + 2 * -3");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Add, right, .. } => match right.kind {
                ExprKind::Binary { op: BinaryOp::Mul, right, .. } => {
                    assert!(matches!(right.kind, ExprKind::Prefix { op: UnaryOp::Neg, .. }));
                }
                other => panic!("expected inner Mul, got {other:?}"),
            },
            other => panic!("expected outer Add, got {other:?}"),
        }
    }

    #[test]
    fn indexed_member_access() {
        let (expr, handler) = parse_expr_str("array[index]");
        assert!(!handler.has_errors());
        match expr.kind {
            ExprKind::MemberAccess { is_indexed, property, .. } => {
                assert!(is_indexed);
                assert!(matches!(property.kind, ExprKind::Identifier(_)));
            }
            other => panic!("expected MemberAccess, got {other:?}"),
        }
    }

    #[test]
    fn invalid_assignment_target_is_syntax_error() {
        let (_, handler) = parse_expr_str("1 = 2");
        assert!(handler.has_errors());
    }

    #[test]
    fn named_call_argument_builds_object() {
        let (expr, handler) = parse_expr_str("f(x: 1)");
        assert!(!handler.has_errors());
        match expr.kind {
            ExprKind::Call { args, .. } => {
                assert_eq!(args.len(), 1);
                assert!(matches!(args[0].kind, ExprKind::Object(_)));
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }
}
