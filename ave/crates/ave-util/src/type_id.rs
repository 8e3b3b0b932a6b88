//! `TypeId` — the stable handle every annotation site and expression node
//! carries. It lives here, below both `ave-par` (which stamps `TypeId` into
//! `TypeInfo` before anything is resolved) and `ave-sem` (which owns the
//! `IndexVec<TypeId, TypeData>` registry it indexes), so neither crate has
//! to depend on the other to share the type.

use crate::index_vec::Idx;
use static_assertions::assert_eq_size;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

assert_eq_size!(TypeId, u32);

impl Idx for TypeId {
    fn from_usize(idx: usize) -> Self {
        assert!(idx <= u32::MAX as usize, "type id overflow");
        TypeId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sentinel ids assigned at fixed, well-known slots when a `TypeRegistry` is
/// constructed (see `ave_sem::types::TypeRegistry::new`), mirroring the
/// teacher's `DefId::DUMMY` sentinel pattern.
impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const OBJECT: TypeId = TypeId(1);
    pub const STRING: TypeId = TypeId(2);
    pub const NUMBER: TypeId = TypeId(3);
    pub const BOOL: TypeId = TypeId(4);
    pub const VOID: TypeId = TypeId(5);
    pub const INFER: TypeId = TypeId(6);
    pub const ERROR: TypeId = TypeId(7);

    /// One past the last reserved sentinel; the registry's first
    /// user-defined type starts here.
    pub const FIRST_USER_TYPE: u32 = 8;
}
