//! The type registry: every `TypeId` a compilation ever mints resolves to a
//! `TypeData` entry here. Mirrors the teacher's `IndexVec`-backed type table
//! in `faxc_sem::types` (a `TypeContext` keyed by id-indirection), but the
//! `TypeData` shapes themselves are Ave's own — unions, structural object
//! types and generic records have no counterpart in the teacher's scalar
//! `Type` enum.

use ave_par::ast::{AssignOp, BinaryOp, UnaryOp};
use ave_util::{symbol, IndexVec, Symbol, TypeId};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// One formal or actual parameter of a function type.
#[derive(Clone, Debug)]
pub struct FunctionParam {
    pub name: Symbol,
    pub ty: TypeId,
    pub required: bool,
    pub rest: bool,
}

#[derive(Clone, Debug)]
pub struct FunctionType {
    pub params: Vec<FunctionParam>,
    pub ret: TypeId,
}

/// A placeholder standing in for an unsubstituted formal type parameter of
/// `owner` (a `Generic`). Never appears in a fully-instantiated type.
#[derive(Clone, Debug)]
pub struct ParamPlaceholder {
    pub owner: TypeId,
    pub name: Symbol,
    pub index: usize,
}

/// A generic template: `record Box<T>: value: T` or the built-in `Array<T>`.
/// `properties` may reference `params` entries; instantiating substitutes
/// them away.
#[derive(Clone, Debug)]
pub struct GenericType {
    pub tag: Symbol,
    pub params: Vec<TypeId>,
    pub properties: IndexMap<Symbol, TypeId>,
}

/// One concrete instantiation of a `Generic`, e.g. `Array<num>` or
/// `Box<str>`. Identity is structural: same `parent` and pairwise-equal
/// `args`, not the same `TypeId` — two call sites that write `num[]` mint
/// two ids that still compare equal via `TypeRegistry::type_eq`.
#[derive(Clone, Debug)]
pub struct GenericInstanceType {
    pub parent: TypeId,
    pub args: Vec<TypeId>,
    pub properties: IndexMap<Symbol, TypeId>,
}

/// `A | B | C`. Flattened and built fresh at every union site; structural
/// identity again, compared by member set rather than by id.
#[derive(Clone, Debug)]
pub struct UnionType {
    pub members: Vec<TypeId>,
}

/// `{ name: T, age: T }`, insertion-ordered.
#[derive(Clone, Debug)]
pub struct ObjectType {
    pub properties: IndexMap<Symbol, TypeId>,
}

/// A `record` declaration with no generic parameters.
#[derive(Clone, Debug)]
pub struct RecordType {
    pub tag: Symbol,
    pub properties: IndexMap<Symbol, TypeId>,
}

/// The closed set of shapes a `TypeId` can resolve to.
#[derive(Clone, Debug)]
pub enum TypeData {
    /// `num`, `str`, `bool`, `any`, `object`, `void` — the six sentinel
    /// slots `TypeRegistry::new` reserves up front.
    Primitive(Symbol),
    Function(FunctionType),
    Generic(GenericType),
    GenericInstance(GenericInstanceType),
    Union(UnionType),
    Object(ObjectType),
    Record(RecordType),
    Param(ParamPlaceholder),
    /// Stands in for a type that failed to resolve; assignable to and from
    /// anything so one bad annotation doesn't cascade into a wall of
    /// further diagnostics.
    Error,
    /// The "no annotation written" marker. Never escapes the checker —
    /// every `TypeInfo::resolved` is overwritten with something concrete
    /// before the checker finishes with its node.
    Infer,
}

/// Every `TypeId` a compilation mints, keyed by an `IndexVec` the same way
/// `ave-par` keys `NodeId -> Span` and `ave-sem::scope` keys `RibId -> Rib`.
/// One `TypeRegistry` lives per `Session` (see `ave-drv`); nothing here is
/// process-global.
pub struct TypeRegistry {
    types: IndexVec<TypeId, TypeData>,
    by_tag: FxHashMap<Symbol, TypeId>,
    array_generic: TypeId,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut types: IndexVec<TypeId, TypeData> = IndexVec::new();
        types.push(TypeData::Primitive(symbol::TY_ANY)); // TypeId::ANY
        types.push(TypeData::Primitive(symbol::TY_OBJECT)); // TypeId::OBJECT
        types.push(TypeData::Primitive(symbol::TY_STR)); // TypeId::STRING
        types.push(TypeData::Primitive(symbol::TY_NUM)); // TypeId::NUMBER
        types.push(TypeData::Primitive(symbol::TY_BOOL)); // TypeId::BOOL
        types.push(TypeData::Primitive(symbol::TY_VOID)); // TypeId::VOID
        types.push(TypeData::Infer); // TypeId::INFER
        types.push(TypeData::Error); // TypeId::ERROR

        let mut by_tag = FxHashMap::default();
        by_tag.insert(symbol::TY_ANY, TypeId::ANY);
        by_tag.insert(symbol::TY_OBJECT, TypeId::OBJECT);
        by_tag.insert(symbol::TY_STR, TypeId::STRING);
        by_tag.insert(symbol::TY_NUM, TypeId::NUMBER);
        by_tag.insert(symbol::TY_BOOL, TypeId::BOOL);
        by_tag.insert(symbol::TY_VOID, TypeId::VOID);

        let mut registry = Self { types, by_tag, array_generic: TypeId::ERROR };

        let array_tag = Symbol::intern("Array");
        let array_id = registry
            .types
            .push(TypeData::Generic(GenericType { tag: array_tag, params: Vec::new(), properties: IndexMap::new() }));
        let t_param = registry.types.push(TypeData::Param(ParamPlaceholder {
            owner: array_id,
            name: Symbol::intern("T"),
            index: 0,
        }));
        if let TypeData::Generic(g) = &mut registry.types[array_id] {
            g.params = vec![t_param];
        }
        registry.by_tag.insert(array_tag, array_id);
        registry.array_generic = array_id;

        registry
    }

    pub fn array_generic(&self) -> TypeId {
        self.array_generic
    }

    pub fn get(&self, ty: TypeId) -> &TypeData {
        &self.types[ty]
    }

    pub fn get_mut(&mut self, ty: TypeId) -> &mut TypeData {
        &mut self.types[ty]
    }

    pub fn push(&mut self, data: TypeData) -> TypeId {
        self.types.push(data)
    }

    pub fn lookup_tag(&self, name: Symbol) -> Option<TypeId> {
        self.by_tag.get(&name).copied()
    }

    pub fn declare_tag(&mut self, name: Symbol, id: TypeId) {
        self.by_tag.insert(name, id);
    }

    pub fn known_tags(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.by_tag.keys().copied()
    }

    pub fn push_function(&mut self, params: Vec<FunctionParam>, ret: TypeId) -> TypeId {
        self.types.push(TypeData::Function(FunctionType { params, ret }))
    }

    /// Properties visible through `.name` or structural assignability —
    /// `Object`, `Record` and `GenericInstance` all carry one; nothing else
    /// does.
    pub fn properties_of(&self, ty: TypeId) -> Option<&IndexMap<Symbol, TypeId>> {
        match self.get(ty) {
            TypeData::Object(o) => Some(&o.properties),
            TypeData::Record(r) => Some(&r.properties),
            TypeData::GenericInstance(g) => Some(&g.properties),
            _ => None,
        }
    }

    /// `Array<T>`'s element type, if `ty` is an instance of the built-in
    /// array generic.
    pub fn array_element(&self, ty: TypeId) -> Option<TypeId> {
        match self.get(ty) {
            TypeData::GenericInstance(g) if g.parent == self.array_generic => Some(g.args[0]),
            _ => None,
        }
    }

    /// Instantiates `generic_id` (a `Generic`) with `args`, substituting
    /// every formal parameter out of its stored property types.
    pub fn instantiate(&mut self, generic_id: TypeId, args: Vec<TypeId>) -> TypeId {
        let (params, template) = match self.get(generic_id) {
            TypeData::Generic(g) => (g.params.clone(), g.properties.clone()),
            _ => return TypeId::ERROR,
        };
        let subst: FxHashMap<TypeId, TypeId> = params.into_iter().zip(args.iter().copied()).collect();
        let mut properties = IndexMap::new();
        for (name, ty) in template {
            let substituted = self.substitute(ty, &subst);
            properties.insert(name, substituted);
        }
        self.types.push(TypeData::GenericInstance(GenericInstanceType { parent: generic_id, args, properties }))
    }

    fn substitute(&mut self, ty: TypeId, subst: &FxHashMap<TypeId, TypeId>) -> TypeId {
        if let Some(replacement) = subst.get(&ty) {
            return *replacement;
        }
        match self.get(ty).clone() {
            TypeData::GenericInstance(inst) => {
                let new_args: Vec<TypeId> = inst.args.iter().map(|a| self.substitute(*a, subst)).collect();
                if new_args == inst.args {
                    ty
                } else {
                    self.instantiate(inst.parent, new_args)
                }
            }
            TypeData::Function(f) => {
                let params = f
                    .params
                    .iter()
                    .map(|p| FunctionParam { ty: self.substitute(p.ty, subst), ..p.clone() })
                    .collect();
                let ret = self.substitute(f.ret, subst);
                self.types.push(TypeData::Function(FunctionType { params, ret }))
            }
            TypeData::Union(u) => {
                let members = u.members.iter().map(|m| self.substitute(*m, subst)).collect();
                self.types.push(TypeData::Union(UnionType { members }))
            }
            TypeData::Object(o) => {
                let mut properties = IndexMap::new();
                for (name, t) in o.properties {
                    properties.insert(name, self.substitute(t, subst));
                }
                self.types.push(TypeData::Object(ObjectType { properties }))
            }
            _ => ty,
        }
    }

    /// A union of `existing` (itself a running accumulator, `TypeId::VOID`
    /// meaning "nothing yet") with `next`, flattening and deduplicating
    /// members. Used to infer an un-annotated function's return type from
    /// every `return` it contains.
    pub fn union_with(&mut self, existing: TypeId, next: TypeId) -> TypeId {
        if existing == TypeId::VOID {
            return next;
        }
        if self.type_eq(existing, next) {
            return existing;
        }
        let mut members = self.flatten_members(existing);
        for m in self.flatten_members(next) {
            if !members.iter().any(|e| self.type_eq(*e, m)) {
                members.push(m);
            }
        }
        if members.len() == 1 {
            return members[0];
        }
        self.types.push(TypeData::Union(UnionType { members }))
    }

    fn flatten_members(&self, ty: TypeId) -> Vec<TypeId> {
        match self.get(ty) {
            TypeData::Union(u) => u.members.clone(),
            _ => vec![ty],
        }
    }

    /// Structural equivalence for the two type shapes the spec calls out as
    /// not having id identity: `GenericInstance` (same parent, pairwise-equal
    /// args) and `Union` (same member set, order-independent).
    pub fn type_eq(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (TypeData::GenericInstance(x), TypeData::GenericInstance(y)) => {
                x.parent == y.parent
                    && x.args.len() == y.args.len()
                    && x.args.iter().zip(&y.args).all(|(p, q)| self.type_eq(*p, *q))
            }
            (TypeData::Union(x), TypeData::Union(y)) => {
                x.members.len() == y.members.len()
                    && x.members.iter().all(|m| y.members.iter().any(|n| self.type_eq(*m, *n)))
            }
            _ => false,
        }
    }

    /// Whether a value of type `source` may be assigned/passed/returned
    /// where `target` is expected.
    ///
    /// - `any` on either side always succeeds.
    /// - `t_error` on either side always succeeds (a prior diagnostic
    ///   already explains the real problem; this one mustn't cascade).
    /// - Identical ids always succeed.
    /// - A union target succeeds if every member of a flattened `source`
    ///   is assignable to some member of `target` (a bare scalar source is
    ///   treated as a one-element union, letting `str` assign into `str | num`).
    /// - Two function types are assignable if they have the same arity,
    ///   agree on which parameters are `rest`, and are parameter-type
    ///   equivalent (checked both directions — functions are used
    ///   invariantly here, not contravariantly) with an assignable return.
    /// - Two generic instances are assignable if `type_eq` holds.
    /// - An object/record/generic-instance target is satisfied by width
    ///   subtyping: every property it declares must exist on `source` with
    ///   an assignable type; `source` may carry extra properties.
    pub fn can_assign(&self, target: TypeId, source: TypeId) -> bool {
        if target == TypeId::ANY || source == TypeId::ANY {
            return true;
        }
        if target == source {
            return true;
        }
        if target == TypeId::ERROR || source == TypeId::ERROR {
            return true;
        }
        match self.get(target) {
            TypeData::Union(u) => {
                let source_members = self.flatten_members(source);
                source_members.iter().all(|m| u.members.iter().any(|um| self.can_assign(*um, *m)))
            }
            TypeData::Function(tf) => match self.get(source) {
                TypeData::Function(sf) => {
                    tf.params.len() == sf.params.len()
                        && tf
                            .params
                            .iter()
                            .zip(&sf.params)
                            .all(|(a, b)| a.rest == b.rest && self.can_assign(a.ty, b.ty) && self.can_assign(b.ty, a.ty))
                        && self.can_assign(tf.ret, sf.ret)
                }
                _ => false,
            },
            TypeData::GenericInstance(_) => self.type_eq(target, source),
            TypeData::Object(_) | TypeData::Record(_) => {
                let target_props = self.properties_of(target);
                match target_props {
                    Some(props) => props.iter().all(|(name, ty)| {
                        self.properties_of(source).and_then(|sp| sp.get(name)).map_or(false, |sty| self.can_assign(*ty, *sty))
                    }),
                    None => false,
                }
            }
            _ => false,
        }
    }

    pub fn binary_result(&self, op: BinaryOp, l: TypeId, r: TypeId) -> TypeId {
        if l == TypeId::ERROR || r == TypeId::ERROR {
            return TypeId::ERROR;
        }
        if l == TypeId::ANY || r == TypeId::ANY {
            return match op {
                BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::EqEq
                | BinaryOp::NotEq
                | BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Is => TypeId::BOOL,
                _ => TypeId::ANY,
            };
        }
        match op {
            BinaryOp::Add => {
                if l == TypeId::NUMBER && r == TypeId::NUMBER {
                    TypeId::NUMBER
                } else if l == TypeId::STRING || r == TypeId::STRING {
                    TypeId::STRING
                } else {
                    TypeId::ERROR
                }
            }
            BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::FloorDiv
            | BinaryOp::Mod
            | BinaryOp::Pow
            | BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor => {
                if l == TypeId::NUMBER && r == TypeId::NUMBER {
                    TypeId::NUMBER
                } else {
                    TypeId::ERROR
                }
            }
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                if l == TypeId::NUMBER && r == TypeId::NUMBER {
                    TypeId::BOOL
                } else {
                    TypeId::ERROR
                }
            }
            BinaryOp::EqEq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or | BinaryOp::Is => TypeId::BOOL,
        }
    }

    pub fn unary_result(&self, op: UnaryOp, operand: TypeId) -> TypeId {
        if operand == TypeId::ERROR {
            return TypeId::ERROR;
        }
        if operand == TypeId::ANY {
            return match op {
                UnaryOp::Not => TypeId::BOOL,
                _ => TypeId::ANY,
            };
        }
        match op {
            UnaryOp::Not => TypeId::BOOL,
            UnaryOp::Pos
            | UnaryOp::Neg
            | UnaryOp::PreIncrement
            | UnaryOp::PreDecrement
            | UnaryOp::PostIncrement
            | UnaryOp::PostDecrement => {
                if operand == TypeId::NUMBER {
                    TypeId::NUMBER
                } else {
                    TypeId::ERROR
                }
            }
        }
    }

    /// `+=`/`-=`/etc.: the same rule as the matching binary operator, since
    /// `x op= y` is defined as `x = x op y`.
    pub fn compound_assign_result(&self, op: AssignOp, target: TypeId, value: TypeId) -> TypeId {
        let binary_op = match op {
            AssignOp::Assign => return if self.can_assign(target, value) { target } else { TypeId::ERROR },
            AssignOp::AddAssign => BinaryOp::Add,
            AssignOp::SubAssign => BinaryOp::Sub,
            AssignOp::MulAssign => BinaryOp::Mul,
            AssignOp::DivAssign => BinaryOp::Div,
            AssignOp::FloorDivAssign => BinaryOp::FloorDiv,
            AssignOp::ModAssign => BinaryOp::Mod,
            AssignOp::PowAssign => BinaryOp::Pow,
        };
        let result = self.binary_result(binary_op, target, value);
        if result == TypeId::ERROR {
            return TypeId::ERROR;
        }
        if self.can_assign(target, result) {
            target
        } else {
            TypeId::ERROR
        }
    }

    /// Human-facing rendering for diagnostics: `"cannot assign 'str' to 'num'"`.
    pub fn display_name(&self, ty: TypeId) -> String {
        match self.get(ty) {
            TypeData::Primitive(tag) => tag.as_str().to_string(),
            TypeData::Error => "error".to_string(),
            TypeData::Infer => "infer".to_string(),
            TypeData::Param(p) => p.name.as_str().to_string(),
            TypeData::Record(r) => r.tag.as_str().to_string(),
            TypeData::Generic(g) => g.tag.as_str().to_string(),
            TypeData::Function(f) => {
                let params: Vec<String> = f.params.iter().map(|p| self.display_name(p.ty)).collect();
                format!("({}) -> {}", params.join(", "), self.display_name(f.ret))
            }
            TypeData::GenericInstance(g) => {
                let parent_tag = match self.get(g.parent) {
                    TypeData::Generic(parent) => parent.tag.as_str(),
                    _ => "?",
                };
                let args: Vec<String> = g.args.iter().map(|a| self.display_name(*a)).collect();
                format!("{}<{}>", parent_tag, args.join(", "))
            }
            TypeData::Union(u) => u.members.iter().map(|m| self.display_name(*m)).collect::<Vec<_>>().join(" | "),
            TypeData::Object(o) => {
                let fields: Vec<String> =
                    o.properties.iter().map(|(n, t)| format!("{}: {}", n.as_str(), self.display_name(*t))).collect();
                format!("{{ {} }}", fields.join(", "))
            }
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_land_at_their_declared_ids() {
        let reg = TypeRegistry::new();
        assert!(matches!(reg.get(TypeId::NUMBER), TypeData::Primitive(_)));
        assert_eq!(reg.display_name(TypeId::NUMBER), "num");
        assert_eq!(reg.display_name(TypeId::STRING), "str");
    }

    #[test]
    fn any_is_assignable_both_ways() {
        let reg = TypeRegistry::new();
        assert!(reg.can_assign(TypeId::ANY, TypeId::NUMBER));
        assert!(reg.can_assign(TypeId::NUMBER, TypeId::ANY));
    }

    #[test]
    fn mismatched_scalars_are_not_assignable() {
        let reg = TypeRegistry::new();
        assert!(!reg.can_assign(TypeId::NUMBER, TypeId::STRING));
    }

    #[test]
    fn scalar_source_assigns_into_containing_union() {
        let mut reg = TypeRegistry::new();
        let union = reg.push(TypeData::Union(UnionType { members: vec![TypeId::STRING, TypeId::NUMBER] }));
        assert!(reg.can_assign(union, TypeId::STRING));
        assert!(!reg.can_assign(union, TypeId::BOOL));
    }

    #[test]
    fn array_instantiation_is_structurally_equal_across_call_sites() {
        let mut reg = TypeRegistry::new();
        let array_generic = reg.array_generic();
        let a = reg.instantiate(array_generic, vec![TypeId::NUMBER]);
        let b = reg.instantiate(array_generic, vec![TypeId::NUMBER]);
        assert_ne!(a, b);
        assert!(reg.type_eq(a, b));
        assert_eq!(reg.array_element(a), Some(TypeId::NUMBER));
    }

    #[test]
    fn object_width_subtyping_allows_extra_properties() {
        let mut reg = TypeRegistry::new();
        let mut target_props = IndexMap::new();
        target_props.insert(Symbol::intern("age"), TypeId::NUMBER);
        let target = reg.push(TypeData::Object(ObjectType { properties: target_props }));

        let mut source_props = IndexMap::new();
        source_props.insert(Symbol::intern("age"), TypeId::NUMBER);
        source_props.insert(Symbol::intern("name"), TypeId::STRING);
        let source = reg.push(TypeData::Object(ObjectType { properties: source_props }));

        assert!(reg.can_assign(target, source));
    }

    #[test]
    fn binary_add_allows_string_concatenation() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.binary_result(BinaryOp::Add, TypeId::STRING, TypeId::STRING), TypeId::STRING);
        assert_eq!(reg.binary_result(BinaryOp::Add, TypeId::STRING, TypeId::NUMBER), TypeId::STRING);
        assert_eq!(reg.binary_result(BinaryOp::Add, TypeId::BOOL, TypeId::BOOL), TypeId::ERROR);
    }

    #[test]
    fn union_with_accumulates_distinct_members() {
        let mut reg = TypeRegistry::new();
        let acc = reg.union_with(TypeId::VOID, TypeId::NUMBER);
        assert_eq!(acc, TypeId::NUMBER);
        let acc = reg.union_with(acc, TypeId::STRING);
        assert!(matches!(reg.get(acc), TypeData::Union(_)));
        let acc2 = reg.union_with(acc, TypeId::NUMBER);
        assert!(reg.type_eq(acc, acc2));
    }
}
