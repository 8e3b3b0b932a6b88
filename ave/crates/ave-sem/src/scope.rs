//! The name-resolution scope tree. Grounded directly on the teacher's
//! `faxc_sem::scope::ScopeTree`: an `IndexVec<RibId, Rib>` of parent-linked
//! ribs, walked outward on every lookup. Ave has no labelled loops, so the
//! teacher's `RibKind::Loop(LabelId)` variant is dropped — `while`/`for`
//! bodies are plain `Block` ribs here.

use ave_par::ast::DeclKind;
use ave_util::{newtype_index, IndexVec, Span, Symbol, TypeId};
use rustc_hash::FxHashMap;

newtype_index!(pub struct RibId);

#[derive(Clone, Copy, Debug)]
pub enum RibKind {
    Module,
    Function,
    Block,
}

/// One resolved name: what kind of declaration introduced it, its type, and
/// whether reassignment is allowed.
#[derive(Clone, Debug)]
pub struct Binding {
    pub name: Symbol,
    pub kind: DeclKind,
    pub ty: TypeId,
    pub mutable: bool,
    pub initialized: bool,
    pub span: Span,
}

impl Binding {
    /// `let`/`var`/the colon-sugar form may be reassigned; `const` may not.
    pub fn mutable_for(kind: DeclKind) -> bool {
        !matches!(kind, DeclKind::Constant)
    }
}

pub struct Rib {
    bindings: FxHashMap<Symbol, Binding>,
    parent: Option<RibId>,
    kind: RibKind,
}

pub struct ScopeTree {
    ribs: IndexVec<RibId, Rib>,
    current: RibId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut ribs = IndexVec::new();
        let root = ribs.push(Rib { bindings: FxHashMap::default(), parent: None, kind: RibKind::Module });
        Self { ribs, current: root }
    }

    pub fn enter_scope(&mut self, kind: RibKind) -> RibId {
        let parent = self.current;
        let rib = self.ribs.push(Rib { bindings: FxHashMap::default(), parent: Some(parent), kind });
        self.current = rib;
        rib
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.ribs[self.current].parent {
            self.current = parent;
        }
    }

    pub fn current_kind(&self) -> RibKind {
        self.ribs[self.current].kind
    }

    /// Binds `name` in the current rib. If a binding with the same name
    /// already exists in this exact rib (the hoisting pre-seed having run
    /// first), it is refreshed in place rather than treated as a
    /// redeclaration — this is how a `var`/`func` hoist target gets its
    /// real type once the checker reaches the actual declaration.
    pub fn declare(&mut self, binding: Binding) {
        self.ribs[self.current].bindings.insert(binding.name, binding);
    }

    /// `true` if `name` is already bound in the *current* rib specifically
    /// (as opposed to an outer one) — used to flag redeclaration of a
    /// `let`/`const` within the same block.
    pub fn is_bound_in_current_rib(&self, name: Symbol) -> bool {
        self.ribs[self.current].bindings.contains_key(&name)
    }

    pub fn resolve(&self, name: Symbol) -> Option<&Binding> {
        let mut rib_id = self.current;
        loop {
            let rib = &self.ribs[rib_id];
            if let Some(binding) = rib.bindings.get(&name) {
                return Some(binding);
            }
            match rib.parent {
                Some(parent) => rib_id = parent,
                None => return None,
            }
        }
    }

    pub fn resolve_mut(&mut self, name: Symbol) -> Option<&mut Binding> {
        let mut rib_id = self.current;
        loop {
            if self.ribs[rib_id].bindings.contains_key(&name) {
                return self.ribs[rib_id].bindings.get_mut(&name);
            }
            match self.ribs[rib_id].parent {
                Some(parent) => rib_id = parent,
                None => return None,
            }
        }
    }

    /// Every name visible from the current rib outward, for "did you mean"
    /// suggestions on an undefined identifier.
    pub fn names_visible(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        let mut rib_id = self.current;
        loop {
            out.extend(self.ribs[rib_id].bindings.keys().copied());
            match self.ribs[rib_id].parent {
                Some(parent) => rib_id = parent,
                None => break,
            }
        }
        out
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ave_util::Span;

    fn binding(name: &str, kind: DeclKind, ty: TypeId) -> Binding {
        Binding { name: Symbol::intern(name), kind, ty, mutable: Binding::mutable_for(kind), initialized: true, span: Span::DUMMY }
    }

    #[test]
    fn resolves_through_parent_chain() {
        let mut tree = ScopeTree::new();
        tree.declare(binding("x", DeclKind::Block, TypeId::NUMBER));
        tree.enter_scope(RibKind::Block);
        assert_eq!(tree.resolve(Symbol::intern("x")).unwrap().ty, TypeId::NUMBER);
    }

    #[test]
    fn exit_scope_drops_inner_bindings() {
        let mut tree = ScopeTree::new();
        tree.enter_scope(RibKind::Block);
        tree.declare(binding("y", DeclKind::Block, TypeId::STRING));
        tree.exit_scope();
        assert!(tree.resolve(Symbol::intern("y")).is_none());
    }

    #[test]
    fn redeclaring_in_same_rib_refreshes_binding() {
        let mut tree = ScopeTree::new();
        tree.declare(binding("v", DeclKind::Function, TypeId::INFER));
        tree.declare(binding("v", DeclKind::Function, TypeId::NUMBER));
        assert_eq!(tree.resolve(Symbol::intern("v")).unwrap().ty, TypeId::NUMBER);
    }

    #[test]
    fn const_bindings_are_immutable() {
        let b = binding("c", DeclKind::Constant, TypeId::NUMBER);
        assert!(!b.mutable);
    }
}
