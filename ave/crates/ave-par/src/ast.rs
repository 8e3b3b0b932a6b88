//! The Ave abstract syntax tree. Every `Expr`/`Stmt` is a thin
//! `{id, span, kind}` wrapper around a closed `*Kind` enum, mirroring the
//! tagged-union shape the teacher's own `ast.rs` uses for its surface tree —
//! exhaustive `match` at every consumer, no trait objects for node shapes.

use ave_util::{Idx, Span, Symbol, TypeId};
use std::cell::Cell;

/// Identifies one AST node for the lifetime of a compilation. Used as the
/// key into `ave_sem`'s `expr_types: FxHashMap<NodeId, TypeId>` side table,
/// so the checker never has to mutate the tree itself to record a result.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub u32);

impl Idx for NodeId {
    fn from_usize(idx: usize) -> Self {
        assert!(idx <= u32::MAX as usize, "node id overflow");
        NodeId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

/// Hands out fresh, monotonically increasing `NodeId`s as the parser builds
/// the tree. One lives on the `Parser` for the duration of a single file.
#[derive(Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// A resolved-or-not type annotation attached to a parameter, declarator,
/// record property or function return position. `syntax` is `None` when the
/// source omitted the annotation (inference is requested); `resolved` starts
/// at `TypeId::INFER` and is overwritten in place once `ave-sem` resolves it,
/// the same "resolve into a `Cell` instead of rebuilding the node" move the
/// teacher's checker uses for its own annotation slots.
#[derive(Clone, Debug)]
pub struct TypeInfo {
    pub syntax: Option<TypeAnnotationSyntax>,
    pub resolved: Cell<TypeId>,
}

impl TypeInfo {
    pub fn inferred() -> Self {
        Self { syntax: None, resolved: Cell::new(TypeId::INFER) }
    }

    pub fn annotated(syntax: TypeAnnotationSyntax) -> Self {
        Self { syntax: Some(syntax), resolved: Cell::new(TypeId::INFER) }
    }
}

/// The unresolved surface syntax of a type annotation, exactly as written.
/// `ave-sem` walks this to populate `TypeInfo::resolved`; nothing in
/// `ave-par` ever inspects whether a name actually denotes a known type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotationSyntax {
    /// `num`, `str`, `bool`, `any`, `object`, `void`, or a bare record name.
    Named(Symbol, Span),
    /// `Name[]` — a homogeneous array of the element type.
    Array(Box<TypeAnnotationSyntax>, Span),
    /// `Name<T, U, ...>` — a generic instantiation.
    Generic(Symbol, Vec<TypeAnnotationSyntax>, Span),
    /// `(p1: T1, p2: T2) -> R` — a function type.
    Function { params: Vec<TypeAnnotationSyntax>, ret: Box<TypeAnnotationSyntax>, span: Span },
    /// `{ name: T, age: T }` — a structural object type literal.
    Object(Vec<(Symbol, TypeAnnotationSyntax)>, Span),
    /// `A | B | C` — a union, left-associative and already flattened.
    Union(Vec<TypeAnnotationSyntax>, Span),
}

impl TypeAnnotationSyntax {
    pub fn span(&self) -> Span {
        match self {
            TypeAnnotationSyntax::Named(_, s) => *s,
            TypeAnnotationSyntax::Array(_, s) => *s,
            TypeAnnotationSyntax::Generic(_, _, s) => *s,
            TypeAnnotationSyntax::Function { span, .. } => *span,
            TypeAnnotationSyntax::Object(_, s) => *s,
            TypeAnnotationSyntax::Union(_, s) => *s,
        }
    }
}

/// One formal parameter. `rest` and `default` are mutually exclusive (the
/// parser rejects both on one parameter); `required` is `false` exactly when
/// `default.is_some()`.
#[derive(Clone, Debug)]
pub struct Param {
    pub name: Symbol,
    pub span: Span,
    pub type_info: TypeInfo,
    pub required: bool,
    pub rest: bool,
    pub default: Option<Box<Expr>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    NotEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Is,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    FloorDivAssign,
    ModAssign,
    PowAssign,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Num(f64),
    Str(Symbol),
    Hex(Symbol),
    Binary(Symbol),
    Bool(bool),
}

/// The closed set of expression shapes. Every variant that can fail to
/// parse cleanly still produces a node — recovery substitutes `Error` rather
/// than unwinding the whole statement.
#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(LiteralValue),
    Identifier(Symbol),
    Group(Box<Expr>),
    Prefix { op: UnaryOp, operand: Box<Expr> },
    Postfix { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Assignment { op: AssignOp, target: Box<Expr>, value: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// `object.property` or `object[property]`; `is_indexed` tells the
    /// checker whether `property` is an evaluated index expression or a bare
    /// member name written as an identifier node.
    MemberAccess { object: Box<Expr>, property: Box<Expr>, is_indexed: bool },
    Array(Vec<Expr>),
    /// An object literal, in source order; duplicate keys are a checker
    /// diagnostic, not a parse error.
    Object(Vec<(Symbol, Expr)>),
    Function {
        params: Vec<Param>,
        return_type: Option<TypeInfo>,
        body: Body,
        is_arrow: bool,
    },
    /// Produced on unrecoverable expression-grammar failure so the
    /// surrounding statement still has something to hold; always paired
    /// with a diagnostic already on the handler.
    Error,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(id: NodeId, span: Span, kind: ExprKind) -> Self {
        Self { id, span, kind }
    }
}

/// `var`/`let`/`const` all desugar to the same declarator shape; `kind`
/// records which keyword (or the colon-sugar form) introduced it, since the
/// checker enforces reassignment rules per-kind rather than per-declarator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Block,
    Function,
    Constant,
    /// `name: value` at statement level with no leading keyword.
    Sugar,
}

#[derive(Clone, Debug)]
pub struct VarDeclarator {
    pub name: Symbol,
    pub name_span: Span,
    pub type_info: TypeInfo,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug)]
pub enum ElseBranch {
    /// `elif cond: ...` parses as a nested `IfStmt`, chaining exactly like
    /// an `else { if ... }` would.
    Elif(Box<Stmt>),
    Else(Body),
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Expr(Expr),
    VarDeclaration { kind: DeclKind, declarators: Vec<VarDeclarator> },
    If { cond: Expr, then_body: Body, else_branch: Option<ElseBranch> },
    While { cond: Expr, body: Body },
    For { var_name: Symbol, var_span: Span, start: Expr, stop: Expr, step: Option<Expr>, body: Body },
    Return(Option<Expr>),
    FunctionDeclaration {
        name: Symbol,
        name_span: Span,
        params: Vec<Param>,
        return_type: Option<TypeInfo>,
        body: Body,
    },
    RecordDeclaration {
        name: Symbol,
        name_span: Span,
        generics: Vec<Symbol>,
        properties: Vec<(Symbol, TypeInfo)>,
    },
    /// Parse failure at statement granularity; recovery has already
    /// synchronized past it.
    Error,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(id: NodeId, span: Span, kind: StmtKind) -> Self {
        Self { id, span, kind }
    }
}

/// A declaration hoisted to the top of its enclosing `Body` before the
/// checker ever walks the statement list, so forward references to a
/// function or a `var` declared later in the same block resolve.
#[derive(Clone, Debug)]
pub enum HoistedDecl {
    Func(Symbol, Span),
    Var(Symbol, Span),
}

/// One indented block: a flat statement list plus whatever `FunctionDeclaration`
/// and block-scoped `var` names were hoisted out of it by the parser.
#[derive(Clone, Debug, Default)]
pub struct Body {
    pub stmts: Vec<Stmt>,
    pub declarations: Vec<HoistedDecl>,
}

impl Body {
    pub fn new(stmts: Vec<Stmt>, declarations: Vec<HoistedDecl>) -> Self {
        Self { stmts, declarations }
    }
}

/// The root of one parsed file.
#[derive(Clone, Debug)]
pub struct Program {
    pub body: Body,
    pub has_error: bool,
}
