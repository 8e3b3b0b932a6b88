//! End-to-end lex+parse checks for the statement grammar, including the
//! indentation-driven block forms.

use ave_lex::lex;
use ave_par::ast::{DeclKind, ElseBranch, ExprKind, StmtKind};
use ave_par::parse;
use ave_util::{FileId, Handler};
use std::path::PathBuf;

fn parse_src(src: &str) -> (ave_par::ParsedData, Handler) {
    let handler = Handler::new();
    let scanned = lex(PathBuf::from("<test>"), FileId(0), src.to_string(), &handler);
    let parsed = parse(scanned, &handler);
    (parsed, handler)
}

#[test]
fn variable_declaration() {
    let (parsed, handler) = parse_src("let a = 1\n");
    assert!(!handler.has_errors());
    assert_eq!(parsed.ast.body.stmts.len(), 1);
    match &parsed.ast.body.stmts[0].kind {
        StmtKind::VarDeclaration { kind: DeclKind::Block, declarators } => {
            assert_eq!(declarators.len(), 1);
            assert_eq!(declarators[0].name.as_str(), "a");
        }
        other => panic!("expected a block var declaration, got {other:?}"),
    }
}

#[test]
fn while_loop_with_layout() {
    let (parsed, handler) = parse_src("var k = 4\nwhile k\n  k -= 1\n");
    assert!(!handler.has_errors());
    assert_eq!(parsed.ast.body.stmts.len(), 2);
    match &parsed.ast.body.stmts[1].kind {
        StmtKind::While { body, .. } => {
            assert_eq!(body.stmts.len(), 1);
            assert!(matches!(body.stmts[0].kind, StmtKind::Expr(_)));
        }
        other => panic!("expected a while loop, got {other:?}"),
    }
}

#[test]
fn if_elif_else_chain() {
    let (parsed, handler) = parse_src("if a\n  b\nelif c\n  d\nelse\n  e\n");
    assert!(!handler.has_errors());
    match &parsed.ast.body.stmts[0].kind {
        StmtKind::If { else_branch: Some(ElseBranch::Elif(elif)), .. } => match &elif.kind {
            StmtKind::If { else_branch: Some(ElseBranch::Else(_)), .. } => {}
            other => panic!("expected a terminal else, got {other:?}"),
        },
        other => panic!("expected an elif chain, got {other:?}"),
    }
}

#[test]
fn while_loop_with_optional_trailing_colon() {
    let (parsed, handler) = parse_src("var k = 4\nwhile k:\n  k -= 1\n");
    assert!(!handler.has_errors());
    match &parsed.ast.body.stmts[1].kind {
        StmtKind::While { body, .. } => assert_eq!(body.stmts.len(), 1),
        other => panic!("expected a while loop, got {other:?}"),
    }
}

#[test]
fn if_with_optional_trailing_colon() {
    let (parsed, handler) = parse_src("if a:\n  b\n");
    assert!(!handler.has_errors());
    assert!(matches!(parsed.ast.body.stmts[0].kind, StmtKind::If { .. }));
}

#[test]
fn for_loop_with_step() {
    let (parsed, handler) = parse_src("for i = 0, 10, 2\n  x = i\n");
    assert!(!handler.has_errors());
    match &parsed.ast.body.stmts[0].kind {
        StmtKind::For { var_name, step, body, .. } => {
            assert_eq!(var_name.as_str(), "i");
            assert!(step.is_some());
            assert_eq!(body.stmts.len(), 1);
        }
        other => panic!("expected a for loop, got {other:?}"),
    }
}

#[test]
fn function_declaration_hoisted() {
    let (parsed, handler) = parse_src("func add(a: num, b: num) -> num:\n  return a + b\n\nvar total = add(1, 2)\n");
    assert!(!handler.has_errors());
    assert_eq!(parsed.ast.body.declarations.len(), 1);
    match &parsed.ast.body.declarations[0] {
        ave_par::ast::HoistedDecl::Func(name, _) => assert_eq!(name.as_str(), "add"),
        other => panic!("expected a hoisted function, got {other:?}"),
    }
}

#[test]
fn var_is_hoisted_but_let_is_not() {
    let (parsed, handler) = parse_src("var a = 1\nlet b = 2\n");
    assert!(!handler.has_errors());
    assert_eq!(parsed.ast.body.declarations.len(), 1);
    match &parsed.ast.body.declarations[0] {
        ave_par::ast::HoistedDecl::Var(name, _) => assert_eq!(name.as_str(), "a"),
        other => panic!("expected only 'a' hoisted, got {other:?}"),
    }
}

#[test]
fn record_declaration_with_generic() {
    let (parsed, handler) = parse_src("record Box<T>:\n  value: T\n");
    assert!(!handler.has_errors());
    match &parsed.ast.body.stmts[0].kind {
        StmtKind::RecordDeclaration { name, generics, properties, .. } => {
            assert_eq!(name.as_str(), "Box");
            assert_eq!(generics.len(), 1);
            assert_eq!(properties.len(), 1);
        }
        other => panic!("expected a record declaration, got {other:?}"),
    }
}

#[test]
fn sugar_declaration_form() {
    let (parsed, handler) = parse_src("mynum: num = 10\n");
    assert!(!handler.has_errors());
    match &parsed.ast.body.stmts[0].kind {
        StmtKind::VarDeclaration { kind: DeclKind::Sugar, declarators } => {
            assert_eq!(declarators[0].name.as_str(), "mynum");
            assert!(declarators[0].init.is_some());
        }
        other => panic!("expected a sugar declaration, got {other:?}"),
    }
}

#[test]
fn indexed_member_access_statement() {
    let (parsed, handler) = parse_src("array[index]\n");
    assert!(!handler.has_errors());
    match &parsed.ast.body.stmts[0].kind {
        StmtKind::Expr(expr) => match &expr.kind {
            ExprKind::MemberAccess { is_indexed, .. } => assert!(*is_indexed),
            other => panic!("expected member access, got {other:?}"),
        },
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn unterminated_string_is_recovered() {
    let (parsed, handler) = parse_src("x = \"hello\n");
    assert!(handler.has_errors());
    assert!(parsed.has_error);
}

#[test]
fn object_literal_indented_block() {
    let (parsed, handler) =
        parse_src("d: object =\n  age: 3\n  name: \"Rex\"\n");
    assert!(!handler.has_errors());
    match &parsed.ast.body.stmts[0].kind {
        StmtKind::VarDeclaration { declarators, .. } => {
            let init = declarators[0].init.as_ref().expect("initializer");
            match &init.kind {
                ExprKind::Object(pairs) => assert_eq!(pairs.len(), 2),
                other => panic!("expected an object literal, got {other:?}"),
            }
        }
        other => panic!("expected a declaration, got {other:?}"),
    }
}

#[test]
fn determinism_across_two_parses() {
    let src = "let a = 1\nfunc f(x: num) -> num:\n  return x + 1\n";
    let (first, _) = parse_src(src);
    let (second, _) = parse_src(src);
    assert_eq!(format!("{:?}", first.ast.body.stmts.len()), format!("{:?}", second.ast.body.stmts.len()));
}
