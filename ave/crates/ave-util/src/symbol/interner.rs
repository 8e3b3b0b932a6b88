//! Lock-free, process-wide string interner backed by `DashMap`.
//!
//! Keywords and primitive type names are pre-interned at fixed low indices so
//! they're usable as `const Symbol` values (see the `KW_*`/`TY_*` constants in
//! `mod.rs`) without touching the table at runtime.

use ahash::AHasher;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::LazyLock;

use super::{InternerStats, Symbol};

pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// The symbol table. Strings are leaked to get `'static` references; the
/// table only ever grows for the lifetime of one process, which is fine for
/// a compiler invocation.
pub struct StringTable {
    map: DashMap<u64, (&'static str, u32)>,
    next_index: AtomicU32,
    collisions: AtomicUsize,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Symbols below this index are reserved for keywords/primitive type names
/// and are pre-interned; see [`super::KW_VAR`] and friends.
const RESERVED_SYMBOLS_END: u32 = 64;

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity(256),
            next_index: AtomicU32::new(RESERVED_SYMBOLS_END),
            collisions: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    fn initialize_known_symbols(&self) {
        let known = [
            "var", "let", "const", "func", "record", "if", "elif", "else", "while", "for",
            "return", "true", "false", "and", "or", "is",
            "num", "str", "bool", "any", "object", "void",
        ];
        for (idx, symbol) in known.iter().enumerate() {
            let actual_idx = idx as u32;
            if actual_idx < RESERVED_SYMBOLS_END {
                let interned: &'static str = Box::leak(symbol.to_string().into_boxed_str());
                let hash = Self::hash_string(symbol);
                self.map.insert(hash, (interned, actual_idx));
            }
        }
    }

    fn hash_string(s: &str) -> u64 {
        let mut hasher = AHasher::default();
        s.hash(&mut hasher);
        hasher.finish()
    }

    pub fn intern(&self, s: &str) -> Symbol {
        let hash = Self::hash_string(s);
        if let Some(entry) = self.map.get(&hash) {
            if entry.0 == s {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Symbol { index: entry.1 };
            }
            self.collisions.fetch_add(1, Ordering::Relaxed);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
        let index = self.next_index.fetch_add(1, Ordering::SeqCst);
        self.map.insert(hash, (leaked, index));
        Symbol { index }
    }

    pub fn resolve(&self, sym: Symbol) -> &'static str {
        for entry in self.map.iter() {
            if entry.value().1 == sym.index {
                return entry.value().0;
            }
        }
        panic!("dangling symbol index {}", sym.index);
    }

    pub fn stats(&self) -> InternerStats {
        InternerStats {
            len: self.map.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_distinct_strings_to_distinct_symbols() {
        let table = StringTable::new();
        table.initialize_known_symbols();
        let a = table.intern("alpha");
        let b = table.intern("beta");
        assert_ne!(a, b);
    }

    #[test]
    fn interning_same_string_twice_is_idempotent() {
        let table = StringTable::new();
        table.initialize_known_symbols();
        let a = table.intern("repeated");
        let b = table.intern("repeated");
        assert_eq!(a, b);
        assert_eq!(table.resolve(a), "repeated");
    }
}
