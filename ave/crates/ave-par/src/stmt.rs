//! Statement grammar: `if`/`elif`/`else`, `while`, `for`, `return`, `func`
//! and `record` declarations, `var`/`let`/`const` (and the colon-sugar
//! declaration form), and plain expression statements. Also owns parameter
//! lists and indented-block parsing, since both the statement grammar and
//! `func` expressions in [`crate::expr`] need them.

use crate::ast::{
    Body, DeclKind, ElseBranch, Param, Stmt, StmtKind, TypeInfo, VarDeclarator,
};
use crate::Parser;
use ave_lex::TokenKind;
use ave_util::{Diagnostic, Symbol};

impl<'a> Parser<'a> {
    pub(crate) fn parse_stmt(&mut self) -> Stmt {
        let start = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Func => self.parse_func_decl(),
            TokenKind::Record => self.parse_record_decl(),
            // `var` is function-scoped and hoisted (`DeclKind::Function`);
            // `let` is block-scoped (`DeclKind::Block`).
            TokenKind::Var => self.parse_var_decl(DeclKind::Function, TokenKind::Var),
            TokenKind::Let => self.parse_var_decl(DeclKind::Block, TokenKind::Let),
            TokenKind::Const => self.parse_var_decl(DeclKind::Constant, TokenKind::Const),
            TokenKind::Name if self.looks_like_sugar_decl() => self.parse_sugar_decl(),
            _ => self.parse_expr_stmt(),
        };
        let span = start.to(self.previous_span());
        let id = self.fresh_id();
        Stmt::new(id, span, kind)
    }

    /// `NAME ':'` at statement head (not immediately followed by a second
    /// `:` that would make it a bare colon-object expression, and not
    /// inside a call/array/object already — those never reach `parse_stmt`
    /// directly) is the sugar declarator form `NAME ':' type? ('=' expr)?`.
    fn looks_like_sugar_decl(&self) -> bool {
        self.peek_kind(1) == TokenKind::Colon
    }

    // -- declarations --------------------------------------------------------

    fn parse_var_decl(&mut self, kind: DeclKind, leading: TokenKind) -> StmtKind {
        self.expect(leading, "declaration keyword");
        let mut declarators = vec![self.parse_declarator()];
        while self.eat(TokenKind::Comma) {
            declarators.push(self.parse_declarator());
        }
        self.terminate_simple_stmt();
        StmtKind::VarDeclaration { kind, declarators }
    }

    /// `NAME ':' type? ('=' expr)?` with no leading keyword — sugar for a
    /// block-scoped declaration.
    fn parse_sugar_decl(&mut self) -> StmtKind {
        let declarator = self.parse_declarator();
        self.terminate_simple_stmt();
        StmtKind::VarDeclaration { kind: DeclKind::Sugar, declarators: vec![declarator] }
    }

    fn parse_declarator(&mut self) -> VarDeclarator {
        let name_tok = self.expect(TokenKind::Name, "declaration name");
        let (name, name_span) = match name_tok {
            Some(tok) => (tok.lexeme, tok.span),
            None => (Symbol::intern("?"), self.current_span()),
        };
        let type_info = if self.eat(TokenKind::Colon) { TypeInfo::annotated(self.parse_type()) } else { TypeInfo::inferred() };
        let init = self.eat(TokenKind::Eq).then(|| self.parse_expression_top());
        VarDeclarator { name, name_span, type_info, init }
    }

    fn parse_func_decl(&mut self) -> StmtKind {
        self.advance(); // func
        let name_tok = self.expect(TokenKind::Name, "function name");
        let (name, name_span) = match name_tok {
            Some(tok) => (tok.lexeme, tok.span),
            None => (Symbol::intern("?"), self.current_span()),
        };
        let params = self.parse_params();
        let return_type = self.eat(TokenKind::Arrow).then(|| TypeInfo::annotated(self.parse_type()));
        self.expect_block_open();
        let body = self.parse_body_until_dedent();
        StmtKind::FunctionDeclaration { name, name_span, params, return_type, body }
    }

    pub(crate) fn parse_params(&mut self) -> Vec<Param> {
        self.expect(TokenKind::LParen, "'(' to start parameter list");
        let mut params = Vec::new();
        let mut seen_default_or_rest = false;
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            let start = self.current_span();
            let rest = self.eat(TokenKind::Star);
            let name_tok = self.expect(TokenKind::Name, "parameter name");
            let name = match name_tok {
                Some(tok) => tok.lexeme,
                None => {
                    self.synchronize();
                    break;
                }
            };
            let type_info = if self.eat(TokenKind::Colon) { TypeInfo::annotated(self.parse_type()) } else { TypeInfo::inferred() };
            let default = self.eat(TokenKind::Eq).then(|| Box::new(self.parse_expression_top()));
            if rest && default.is_some() {
                self.handler.emit(Diagnostic::syntax(
                    "a rest parameter cannot also have a default value",
                    start,
                ));
            }
            let required = default.is_none() && !rest;
            if rest || default.is_some() {
                seen_default_or_rest = true;
            } else if seen_default_or_rest {
                self.handler.emit(Diagnostic::syntax(
                    "a required parameter cannot follow a default or rest parameter",
                    start,
                ));
            }
            params.push(Param { name, span: start.to(self.previous_span()), type_info, required, rest, default });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')' to close parameter list");
        params
    }

    fn parse_record_decl(&mut self) -> StmtKind {
        self.advance(); // record
        let name_tok = self.expect(TokenKind::Name, "record name");
        let (name, name_span) = match name_tok {
            Some(tok) => (tok.lexeme, tok.span),
            None => (Symbol::intern("?"), self.current_span()),
        };
        let mut generics = Vec::new();
        if self.eat(TokenKind::Lt) {
            loop {
                if let Some(tok) = self.expect(TokenKind::Name, "generic parameter name") {
                    generics.push(tok.lexeme);
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Gt, "'>' to close generic parameter list");
        }
        self.expect_block_open();
        let mut properties = Vec::new();
        self.skip_blank_lines();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            if let Some(tok) = self.expect(TokenKind::Name, "property name") {
                self.expect(TokenKind::Colon, "':' after property name");
                let ty = self.parse_type();
                properties.push((tok.lexeme, TypeInfo::annotated(ty)));
            } else {
                self.synchronize();
                continue;
            }
            self.skip_blank_lines();
        }
        self.expect(TokenKind::Dedent, "dedent to close record body");
        StmtKind::RecordDeclaration { name, name_span, generics, properties }
    }

    // -- control flow ---------------------------------------------------------

    fn parse_if(&mut self) -> StmtKind {
        self.advance(); // if
        let cond = self.parse_expression_top();
        self.expect_block_open();
        let then_body = self.parse_body_until_dedent();
        let else_branch = if self.check(TokenKind::Elif) {
            Some(ElseBranch::Elif(Box::new(self.parse_elif())))
        } else if self.eat(TokenKind::Else) {
            self.expect_block_open();
            Some(ElseBranch::Else(self.parse_body_until_dedent()))
        } else {
            None
        };
        StmtKind::If { cond, then_body, else_branch }
    }

    /// `elif` parses as a full nested `if` statement so the chain folds
    /// into `ElseBranch::Elif` uniformly.
    fn parse_elif(&mut self) -> Stmt {
        let start = self.current_span();
        self.advance(); // elif
        let cond = self.parse_expression_top();
        self.expect_block_open();
        let then_body = self.parse_body_until_dedent();
        let else_branch = if self.check(TokenKind::Elif) {
            Some(ElseBranch::Elif(Box::new(self.parse_elif())))
        } else if self.eat(TokenKind::Else) {
            self.expect_block_open();
            Some(ElseBranch::Else(self.parse_body_until_dedent()))
        } else {
            None
        };
        let span = start.to(self.previous_span());
        let id = self.fresh_id();
        Stmt::new(id, span, StmtKind::If { cond, then_body, else_branch })
    }

    fn parse_while(&mut self) -> StmtKind {
        self.advance(); // while
        let cond = self.parse_expression_top();
        self.expect_block_open();
        let body = self.parse_body_until_dedent();
        StmtKind::While { cond, body }
    }

    fn parse_for(&mut self) -> StmtKind {
        self.advance(); // for
        let name_tok = self.expect(TokenKind::Name, "loop variable name");
        let (var_name, var_span) = match name_tok {
            Some(tok) => (tok.lexeme, tok.span),
            None => (Symbol::intern("?"), self.current_span()),
        };
        self.expect(TokenKind::Eq, "'=' after loop variable");
        let start_expr = self.parse_expression_top();
        self.expect(TokenKind::Comma, "',' between for-loop bounds");
        let stop_expr = self.parse_expression_top();
        let step = self.eat(TokenKind::Comma).then(|| self.parse_expression_top());
        self.expect_block_open();
        let body = self.parse_body_until_dedent();
        StmtKind::For { var_name, var_span, start: start_expr, stop: stop_expr, step, body }
    }

    fn parse_return(&mut self) -> StmtKind {
        self.advance(); // return
        let value = if matches!(
            self.current_kind(),
            TokenKind::Semicolon | TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof
        ) {
            None
        } else {
            Some(self.parse_expression_top())
        };
        self.terminate_simple_stmt();
        StmtKind::Return(value)
    }

    fn parse_expr_stmt(&mut self) -> StmtKind {
        let expr = self.parse_expression_top();
        self.terminate_simple_stmt();
        StmtKind::Expr(expr)
    }

    /// A non-block statement ends at `;`, `NEWLINE`, `DEDENT`, or EOF;
    /// only `;` and `NEWLINE` are actually consumed here.
    fn terminate_simple_stmt(&mut self) {
        if self.eat(TokenKind::Semicolon) {
            self.eat(TokenKind::Newline);
            return;
        }
        if matches!(self.current_kind(), TokenKind::Newline) {
            self.advance();
            return;
        }
        if matches!(self.current_kind(), TokenKind::Dedent | TokenKind::Eof) {
            return;
        }
        let span = self.current_span();
        self.handler.emit(Diagnostic::syntax("expected end of statement", span));
        self.synchronize();
    }

    // -- bodies ---------------------------------------------------------------

    /// Parses statements until a `DEDENT` (consumed here), populating the
    /// body's hoisted declarations before returning it.
    pub(crate) fn parse_body_until_dedent(&mut self) -> Body {
        let mut stmts = Vec::new();
        self.skip_blank_lines();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            stmts.push(self.parse_stmt());
            self.skip_blank_lines();
        }
        self.expect(TokenKind::Dedent, "dedent to close block");
        let declarations = crate::Parser::hoist(&stmts);
        Body::new(stmts, declarations)
    }
}
