//! The type checker: a single post-order (expressions) / pre-order
//! (statements) walk over the AST `ave-par` hands it. Grounded on the
//! teacher's `faxc_sem::analysis::SemanticAnalyzer` — same two-pass shape
//! per scope (collect declarations, then analyze) — but Ave's hoisting is
//! already done by the parser (`Body::declarations`), so the checker's job
//! is narrower: seed the symbol table from what's already hoisted, resolve
//! record declarations forward-reference-first, then walk statements in
//! order.

use crate::scope::{Binding, RibKind, ScopeTree};
use crate::suggest::closest_match;
use crate::types::{FunctionParam, GenericType, ObjectType, ParamPlaceholder, RecordType, TypeData, TypeRegistry, UnionType};
use ave_par::ast::{
    AssignOp, Body, DeclKind, ElseBranch, Expr, ExprKind, HoistedDecl, LiteralValue, NodeId, Param, Program, Stmt, StmtKind,
    TypeAnnotationSyntax, TypeInfo, VarDeclarator,
};
use ave_util::{Diagnostic, Handler, Span, Symbol, TypeId};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// One `return`'s worth of bookkeeping for the function currently being
/// checked: the declared return type, if any, and the running union of
/// every `return` expression's type seen so far (used to infer the return
/// type when no annotation was written).
struct ReturnFrame {
    declared: Option<TypeId>,
    inferred: TypeId,
}

pub struct Checker<'a> {
    registry: TypeRegistry,
    scopes: ScopeTree,
    expr_types: FxHashMap<NodeId, TypeId>,
    handler: &'a Handler,
    return_stack: Vec<ReturnFrame>,
}

impl<'a> Checker<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            registry: TypeRegistry::new(),
            scopes: ScopeTree::new(),
            expr_types: FxHashMap::default(),
            handler,
            return_stack: Vec::new(),
        }
    }

    pub fn check_program(&mut self, program: &Program) {
        self.check_block_contents(&program.body);
    }

    pub fn into_parts(self) -> (TypeRegistry, FxHashMap<NodeId, TypeId>) {
        (self.registry, self.expr_types)
    }

    // -- scope/body plumbing -----------------------------------------------

    /// Runs the record-registration and hoisting prepasses for `body`, then
    /// walks its statements, all within whatever rib the caller already
    /// entered (or the root rib, for the program body).
    fn check_block_contents(&mut self, body: &Body) {
        self.register_records(body);
        self.seed_hoisted(body);
        for stmt in &body.stmts {
            self.check_stmt(stmt);
        }
    }

    fn check_nested_block(&mut self, kind: RibKind, body: &Body) {
        self.scopes.enter_scope(kind);
        self.check_block_contents(body);
        self.scopes.exit_scope();
    }

    // -- record declarations -------------------------------------------------

    /// Two passes over the direct `RecordDeclaration` statements of `body`:
    /// first register a tag (and, for generics, its formal-parameter
    /// placeholders) for every record so later records — and records
    /// declared earlier in the same block — can reference each other,
    /// then resolve every record's property types now that all tags exist.
    fn register_records(&mut self, body: &Body) {
        let mut pending: Vec<(Symbol, TypeId, Vec<Symbol>, Vec<TypeId>)> = Vec::new();

        for stmt in &body.stmts {
            if let StmtKind::RecordDeclaration { name, name_span, generics, .. } = &stmt.kind {
                if self.registry.lookup_tag(*name).is_some() {
                    self.handler.emit(Diagnostic::reference_error(
                        format!("'{}' is already declared in this scope", name.as_str()),
                        *name_span,
                    ));
                    continue;
                }
                if generics.is_empty() {
                    let id = self.registry.push(TypeData::Record(RecordType { tag: *name, properties: IndexMap::new() }));
                    self.registry.declare_tag(*name, id);
                    pending.push((*name, id, Vec::new(), Vec::new()));
                } else {
                    let owner_id =
                        self.registry.push(TypeData::Generic(GenericType { tag: *name, params: Vec::new(), properties: IndexMap::new() }));
                    self.registry.declare_tag(*name, owner_id);
                    let mut param_ids = Vec::new();
                    for (index, formal) in generics.iter().enumerate() {
                        let pid = self.registry.push(TypeData::Param(ParamPlaceholder { owner: owner_id, name: *formal, index }));
                        param_ids.push(pid);
                    }
                    if let TypeData::Generic(g) = self.registry.get_mut(owner_id) {
                        g.params = param_ids.clone();
                    }
                    pending.push((*name, owner_id, generics.clone(), param_ids));
                }
            }
        }

        for stmt in &body.stmts {
            if let StmtKind::RecordDeclaration { name, properties, generics, .. } = &stmt.kind {
                let Some((_, id, _, param_ids)) = pending.iter().find(|(n, _, _, _)| n == name) else {
                    continue;
                };
                let id = *id;
                let locals: FxHashMap<Symbol, TypeId> = generics.iter().copied().zip(param_ids.iter().copied()).collect();
                let mut props = IndexMap::new();
                for (prop_name, type_info) in properties {
                    let ty = self.resolve_type_info(type_info, &locals);
                    props.insert(*prop_name, ty);
                }
                match self.registry.get_mut(id) {
                    TypeData::Record(r) => r.properties = props,
                    TypeData::Generic(g) => g.properties = props,
                    _ => {}
                }
            }
        }
    }

    // -- hoisting -------------------------------------------------------------

    /// Seeds the current rib from `body.declarations`: a full `FunctionType`
    /// signature for every hoisted `func`, and an un-typed placeholder for
    /// every hoisted `var`, so forward references inside the same block
    /// resolve before the checker reaches the real declaration.
    fn seed_hoisted(&mut self, body: &Body) {
        for decl in &body.declarations {
            match decl {
                HoistedDecl::Func(name, span) => {
                    let Some(stmt) = body.stmts.iter().find(|s| matches!(&s.kind, StmtKind::FunctionDeclaration { name_span, .. } if name_span == span))
                    else {
                        continue;
                    };
                    let StmtKind::FunctionDeclaration { params, return_type, .. } = &stmt.kind else { unreachable!() };
                    let func_ty = self.build_function_type(params, return_type.as_ref());
                    self.scopes.declare(Binding {
                        name: *name,
                        kind: DeclKind::Function,
                        ty: func_ty,
                        mutable: false,
                        initialized: true,
                        span: *span,
                    });
                }
                HoistedDecl::Var(name, span) => {
                    self.scopes.declare(Binding {
                        name: *name,
                        kind: DeclKind::Function,
                        ty: TypeId::INFER,
                        mutable: true,
                        initialized: false,
                        span: *span,
                    });
                }
            }
        }
    }

    fn build_function_type(&mut self, params: &[Param], return_type: Option<&TypeInfo>) -> TypeId {
        let fparams: Vec<FunctionParam> = params
            .iter()
            .map(|p| {
                let ty = match &p.type_info.syntax {
                    Some(syntax) => self.resolve_type_syntax(syntax, &FxHashMap::default()),
                    None => TypeId::ANY,
                };
                p.type_info.resolved.set(ty);
                FunctionParam { name: p.name, ty, required: p.required, rest: p.rest }
            })
            .collect();
        let ret = match return_type {
            Some(ti) => self.resolve_type_info(ti, &FxHashMap::default()),
            None => TypeId::INFER,
        };
        self.registry.push_function(fparams, ret)
    }

    // -- type-annotation resolution ------------------------------------------

    fn resolve_type_info(&mut self, info: &TypeInfo, locals: &FxHashMap<Symbol, TypeId>) -> TypeId {
        let ty = match &info.syntax {
            Some(syntax) => self.resolve_type_syntax(syntax, locals),
            None => TypeId::ANY,
        };
        info.resolved.set(ty);
        ty
    }

    fn resolve_type_syntax(&mut self, syntax: &TypeAnnotationSyntax, locals: &FxHashMap<Symbol, TypeId>) -> TypeId {
        match syntax {
            TypeAnnotationSyntax::Named(name, span) => {
                if let Some(ty) = locals.get(name) {
                    return *ty;
                }
                match self.registry.lookup_tag(*name) {
                    Some(ty) => ty,
                    None => {
                        self.emit_unknown_type(*name, *span);
                        TypeId::ERROR
                    }
                }
            }
            TypeAnnotationSyntax::Array(inner, _) => {
                let elem = self.resolve_type_syntax(inner, locals);
                let array_generic = self.registry.array_generic();
                self.registry.instantiate(array_generic, vec![elem])
            }
            TypeAnnotationSyntax::Generic(name, args, span) => {
                let generic_id = match self.registry.lookup_tag(*name) {
                    Some(id) if matches!(self.registry.get(id), TypeData::Generic(_)) => id,
                    Some(_) => {
                        self.handler.emit(Diagnostic::type_error(format!("'{}' is not a generic type", name.as_str()), *span));
                        return TypeId::ERROR;
                    }
                    None => {
                        self.emit_unknown_type(*name, *span);
                        return TypeId::ERROR;
                    }
                };
                let resolved_args: Vec<TypeId> = args.iter().map(|a| self.resolve_type_syntax(a, locals)).collect();
                self.registry.instantiate(generic_id, resolved_args)
            }
            TypeAnnotationSyntax::Function { params, ret, .. } => {
                let fparams: Vec<FunctionParam> = params
                    .iter()
                    .map(|p| FunctionParam {
                        name: Symbol::intern(""),
                        ty: self.resolve_type_syntax(p, locals),
                        required: true,
                        rest: false,
                    })
                    .collect();
                let ret_ty = self.resolve_type_syntax(ret, locals);
                self.registry.push_function(fparams, ret_ty)
            }
            TypeAnnotationSyntax::Object(fields, _) => {
                let mut properties = IndexMap::new();
                for (name, field_syntax) in fields {
                    properties.insert(*name, self.resolve_type_syntax(field_syntax, locals));
                }
                self.registry.push(TypeData::Object(ObjectType { properties }))
            }
            TypeAnnotationSyntax::Union(members, _) => {
                let mut resolved: Vec<TypeId> = Vec::new();
                for member in members {
                    let ty = self.resolve_type_syntax(member, locals);
                    if !resolved.iter().any(|r| self.registry.type_eq(*r, ty)) {
                        resolved.push(ty);
                    }
                }
                if resolved.len() == 1 {
                    resolved[0]
                } else {
                    self.registry.push(TypeData::Union(UnionType { members: resolved }))
                }
            }
        }
    }

    fn emit_unknown_type(&self, name: Symbol, span: Span) {
        let known = self.registry.known_tags().collect::<Vec<_>>();
        let mut diag = Diagnostic::reference_error(format!("undefined type '{}'", name.as_str()), span);
        if let Some(suggestion) = closest_match(name.as_str(), known.iter()) {
            diag = diag.with_note(format!("did you mean '{}'?", suggestion.as_str()));
        }
        self.handler.emit(diag);
    }

    // -- statements -----------------------------------------------------------

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(e) => {
                self.check_expr(e);
            }
            StmtKind::VarDeclaration { kind, declarators } => {
                for decl in declarators {
                    self.check_declarator(decl, *kind);
                }
            }
            StmtKind::If { cond, then_body, else_branch } => {
                self.check_expr(cond);
                self.check_nested_block(RibKind::Block, then_body);
                match else_branch {
                    Some(ElseBranch::Elif(inner)) => self.check_stmt(inner),
                    Some(ElseBranch::Else(body)) => self.check_nested_block(RibKind::Block, body),
                    None => {}
                }
            }
            StmtKind::While { cond, body } => {
                self.check_expr(cond);
                self.check_nested_block(RibKind::Block, body);
            }
            StmtKind::For { var_name, var_span, start, stop, step, body } => {
                self.check_expr(start);
                self.check_expr(stop);
                if let Some(step) = step {
                    self.check_expr(step);
                }
                self.scopes.enter_scope(RibKind::Block);
                self.scopes.declare(Binding {
                    name: *var_name,
                    kind: DeclKind::Block,
                    ty: TypeId::NUMBER,
                    mutable: true,
                    initialized: true,
                    span: *var_span,
                });
                self.check_block_contents(body);
                self.scopes.exit_scope();
            }
            StmtKind::Return(value) => self.check_return(value.as_ref(), stmt.span),
            StmtKind::FunctionDeclaration { name, params, body, .. } => {
                let func_ty = self
                    .scopes
                    .resolve(*name)
                    .map(|b| b.ty)
                    .unwrap_or(TypeId::ERROR);
                self.check_function_decl(func_ty, params, body);
            }
            StmtKind::RecordDeclaration { .. } => {}
            StmtKind::Error => {}
        }
    }

    fn check_declarator(&mut self, decl: &ave_par::ast::VarDeclarator, kind: DeclKind) {
        let init_ty = decl.init.as_ref().map(|e| self.check_expr(e));
        let has_annotation = decl.type_info.syntax.is_some();
        let declared_ty = self.resolve_type_info(&decl.type_info, &FxHashMap::default());

        let final_ty = if has_annotation {
            if let Some(init_ty) = init_ty {
                if !self.registry.can_assign(declared_ty, init_ty) {
                    self.handler.emit(Diagnostic::type_error(
                        format!("cannot assign '{}' to '{}'", self.registry.display_name(init_ty), self.registry.display_name(declared_ty)),
                        decl.init.as_ref().map(|e| e.span).unwrap_or(decl.name_span),
                    ));
                }
            }
            declared_ty
        } else {
            init_ty.unwrap_or(TypeId::ANY)
        };
        decl.type_info.resolved.set(final_ty);

        self.scopes.declare(Binding {
            name: decl.name,
            kind,
            ty: final_ty,
            mutable: Binding::mutable_for(kind),
            initialized: decl.init.is_some(),
            span: decl.name_span,
        });
    }

    fn check_function_decl(&mut self, func_ty: TypeId, params: &[Param], body: &Body) {
        let (param_types, declared_ret): (Vec<TypeId>, Option<TypeId>) = match self.registry.get(func_ty) {
            TypeData::Function(f) => {
                let ret = if f.ret == TypeId::INFER { None } else { Some(f.ret) };
                (f.params.iter().map(|p| p.ty).collect(), ret)
            }
            _ => (params.iter().map(|_| TypeId::ANY).collect(), None),
        };

        self.scopes.enter_scope(RibKind::Function);
        for (param, ty) in params.iter().zip(param_types.iter().copied()) {
            if let Some(default) = &param.default {
                let default_ty = self.check_expr(default);
                if !self.registry.can_assign(ty, default_ty) {
                    self.handler.emit(Diagnostic::type_error(
                        format!(
                            "cannot assign '{}' to '{}'",
                            self.registry.display_name(default_ty),
                            self.registry.display_name(ty)
                        ),
                        default.span,
                    ));
                }
            }
            self.scopes.declare(Binding {
                name: param.name,
                kind: DeclKind::Block,
                ty,
                mutable: true,
                initialized: true,
                span: param.span,
            });
        }

        self.return_stack.push(ReturnFrame { declared: declared_ret, inferred: TypeId::VOID });
        self.check_block_contents(body);
        let frame = self.return_stack.pop().expect("pushed just above");
        self.scopes.exit_scope();

        if declared_ret.is_none() {
            let inferred = frame.inferred;
            if let TypeData::Function(f) = self.registry.get_mut(func_ty) {
                f.ret = if inferred == TypeId::VOID { TypeId::VOID } else { inferred };
            }
        }
    }

    fn check_return(&mut self, value: Option<&Expr>, span: Span) {
        let ty = match value {
            Some(e) => self.check_expr(e),
            None => TypeId::VOID,
        };
        let Some(frame) = self.return_stack.last_mut() else {
            self.handler.emit(Diagnostic::syntax("'return' outside of a function", span));
            return;
        };
        if let Some(declared) = frame.declared {
            if !self.registry.can_assign(declared, ty) {
                self.handler.emit(Diagnostic::type_error(
                    format!("cannot return '{}' from a function declared to return '{}'", self.registry.display_name(ty), self.registry.display_name(declared)),
                    span,
                ));
            }
        } else {
            frame.inferred = self.registry.union_with(frame.inferred, ty);
        }
    }

    // -- expressions ------------------------------------------------------------

    fn check_expr(&mut self, expr: &Expr) -> TypeId {
        let ty = self.compute_expr_type(expr);
        self.expr_types.insert(expr.id, ty);
        ty
    }

    fn compute_expr_type(&mut self, expr: &Expr) -> TypeId {
        match &expr.kind {
            ExprKind::Literal(lit) => match lit {
                LiteralValue::Num(_) | LiteralValue::Hex(_) | LiteralValue::Binary(_) => TypeId::NUMBER,
                LiteralValue::Str(_) => TypeId::STRING,
                LiteralValue::Bool(_) => TypeId::BOOL,
            },
            ExprKind::Identifier(name) => match self.scopes.resolve(*name) {
                Some(binding) => binding.ty,
                None => {
                    self.emit_undefined_name(*name, expr.span);
                    TypeId::ERROR
                }
            },
            ExprKind::Group(inner) => self.check_expr(inner),
            ExprKind::Prefix { op, operand } | ExprKind::Postfix { op, operand } => {
                let operand_ty = self.check_expr(operand);
                let result = self.registry.unary_result(*op, operand_ty);
                if result == TypeId::ERROR && operand_ty != TypeId::ERROR {
                    self.handler.emit(Diagnostic::type_error(
                        format!("operator cannot be applied to '{}'", self.registry.display_name(operand_ty)),
                        expr.span,
                    ));
                }
                result
            }
            ExprKind::Binary { op, left, right } => {
                let lt = self.check_expr(left);
                let rt = self.check_expr(right);
                let result = self.registry.binary_result(*op, lt, rt);
                if result == TypeId::ERROR && lt != TypeId::ERROR && rt != TypeId::ERROR {
                    self.handler.emit(Diagnostic::type_error(
                        format!("operator cannot be applied to '{}' and '{}'", self.registry.display_name(lt), self.registry.display_name(rt)),
                        expr.span,
                    ));
                }
                result
            }
            ExprKind::Assignment { op, target, value } => self.check_assignment(*op, target, value, expr.span),
            ExprKind::Call { callee, args } => self.check_call(callee, args),
            ExprKind::MemberAccess { object, property, is_indexed } => self.check_member_access(object, property, *is_indexed, expr.span),
            ExprKind::Array(elements) => {
                let mut acc = TypeId::VOID;
                for el in elements {
                    let ty = self.check_expr(el);
                    acc = self.registry.union_with(acc, ty);
                }
                let elem = if acc == TypeId::VOID { TypeId::ANY } else { acc };
                let array_generic = self.registry.array_generic();
                self.registry.instantiate(array_generic, vec![elem])
            }
            ExprKind::Object(pairs) => {
                let mut properties = IndexMap::new();
                for (name, value) in pairs {
                    let ty = self.check_expr(value);
                    if properties.insert(*name, ty).is_some() {
                        self.handler.emit(Diagnostic::type_error(format!("duplicate property '{}' in object literal", name.as_str()), expr.span));
                    }
                }
                self.registry.push(TypeData::Object(ObjectType { properties }))
            }
            ExprKind::Function { params, return_type, body, .. } => {
                let func_ty = self.build_function_type(params, return_type.as_ref());
                self.check_function_decl(func_ty, params, body);
                func_ty
            }
            ExprKind::Error => TypeId::ERROR,
        }
    }

    fn check_assignment(&mut self, op: AssignOp, target: &Expr, value: &Expr, span: Span) -> TypeId {
        let value_ty = self.check_expr(value);
        let target_ty = self.check_expr(target);

        if let ExprKind::Identifier(name) = &target.kind {
            if let Some(binding) = self.scopes.resolve(*name) {
                if !binding.mutable {
                    self.handler.emit(Diagnostic::reference_error(format!("cannot assign to '{}' — it is declared const", name.as_str()), target.span));
                }
            }
        }

        let result = self.registry.compound_assign_result(op, target_ty, value_ty);
        if result == TypeId::ERROR && target_ty != TypeId::ERROR && value_ty != TypeId::ERROR {
            self.handler.emit(Diagnostic::type_error(
                format!("cannot assign '{}' to '{}'", self.registry.display_name(value_ty), self.registry.display_name(target_ty)),
                span,
            ));
        }
        target_ty
    }

    fn check_call(&mut self, callee: &Expr, args: &[Expr]) -> TypeId {
        let callee_ty = self.check_expr(callee);
        if callee_ty == TypeId::ANY || callee_ty == TypeId::ERROR {
            for arg in args {
                self.check_expr(arg);
            }
            return callee_ty;
        }
        let func = match self.registry.get(callee_ty) {
            TypeData::Function(f) => f.clone(),
            _ => {
                self.handler.emit(Diagnostic::type_error(format!("'{}' is not callable", self.registry.display_name(callee_ty)), callee.span));
                for arg in args {
                    self.check_expr(arg);
                }
                return TypeId::ERROR;
            }
        };

        let required = func.params.iter().filter(|p| p.required).count();
        let has_rest = func.params.iter().any(|p| p.rest);
        if args.len() < required || (!has_rest && args.len() > func.params.len()) {
            self.handler.emit(Diagnostic::type_error(
                format!("expected {} argument(s), found {}", required, args.len()),
                callee.span,
            ));
        }

        for (i, arg) in args.iter().enumerate() {
            let arg_ty = self.check_expr(arg);
            let param_ty = if i < func.params.len() {
                Some(func.params[i].ty)
            } else if has_rest {
                func.params.last().map(|p| p.ty)
            } else {
                None
            };
            if let Some(param_ty) = param_ty {
                if !self.registry.can_assign(param_ty, arg_ty) {
                    self.handler.emit(Diagnostic::type_error(
                        format!("cannot assign '{}' to parameter of type '{}'", self.registry.display_name(arg_ty), self.registry.display_name(param_ty)),
                        arg.span,
                    ));
                }
            }
        }

        func.ret
    }

    fn check_member_access(&mut self, object: &Expr, property: &Expr, is_indexed: bool, span: Span) -> TypeId {
        let object_ty = self.check_expr(object);

        if is_indexed {
            let index_ty = self.check_expr(property);
            if object_ty == TypeId::ANY {
                return TypeId::ANY;
            }
            if let Some(elem) = self.registry.array_element(object_ty) {
                if index_ty != TypeId::NUMBER && index_ty != TypeId::ANY && index_ty != TypeId::ERROR {
                    self.handler.emit(Diagnostic::type_error("array index must be 'num'".to_string(), property.span));
                }
                return elem;
            }
            return TypeId::ANY;
        }

        let ExprKind::Identifier(prop_name) = &property.kind else {
            return TypeId::ERROR;
        };
        if object_ty == TypeId::ANY || object_ty == TypeId::ERROR {
            return object_ty;
        }
        match self.registry.properties_of(object_ty).and_then(|props| props.get(prop_name).copied()) {
            Some(ty) => ty,
            None => {
                let known = match self.registry.properties_of(object_ty) {
                    Some(props) => props.keys().collect::<Vec<_>>(),
                    None => Vec::new(),
                };
                let mut diag = Diagnostic::type_error(
                    format!("field '{}' does not exist on type '{}'", prop_name.as_str(), self.registry.display_name(object_ty)),
                    span,
                );
                if let Some(suggestion) = closest_match(prop_name.as_str(), known) {
                    diag = diag.with_note(format!("did you mean '{}'?", suggestion.as_str()));
                }
                self.handler.emit(diag);
                TypeId::ERROR
            }
        }
    }

    fn emit_undefined_name(&self, name: Symbol, span: Span) {
        let visible = self.scopes.names_visible();
        let mut diag = Diagnostic::reference_error(format!("undefined name '{}'", name.as_str()), span);
        if let Some(suggestion) = closest_match(name.as_str(), visible.iter()) {
            diag = diag.with_note(format!("did you mean '{}'?", suggestion.as_str()));
        }
        self.handler.emit(diag);
    }
}
