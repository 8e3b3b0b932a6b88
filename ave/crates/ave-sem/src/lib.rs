//! ave-sem — symbol resolution and the type checker.
//!
//! Consumes the AST `ave-par` hands it and performs one post-order
//! (expressions) / pre-order (statements) walk: seeding each scope's symbol
//! table from the hoisted declarations the parser already collected,
//! resolving type annotations against the registry, and recording a
//! [`TypeId`] for every expression node. Like the stages below it, the
//! checker never aborts on a bad program — every failure is recorded on the
//! shared [`Handler`] and the offending node is typed `t_error` so later
//! checks degrade gracefully instead of cascading.

mod checker;
mod scope;
mod suggest;
pub mod types;

use ave_par::ast::NodeId;
use ave_par::ParsedData;
use ave_util::{FileId, Handler, TypeId};
use rustc_hash::FxHashMap;
use std::path::PathBuf;

pub use checker::Checker;
pub use types::{FunctionType, GenericInstanceType, GenericType, ObjectType, RecordType, TypeData, TypeRegistry, UnionType};

/// Everything `check()` hands downstream: the parsed data it consumed,
/// passed through unowned, plus the per-compilation type registry and the
/// `NodeId -> TypeId` side table the checker built while walking the tree.
/// `ParsedData::ast`'s `TypeInfo::resolved` cells are mutated in place by
/// the checker, so the typed annotations live on the tree itself; this
/// struct only needs to carry what has no home on the tree.
pub struct CheckedData {
    pub filename: PathBuf,
    pub file_id: FileId,
    pub source: String,
    pub ast: ave_par::ast::Program,
    pub registry: TypeRegistry,
    pub expr_types: FxHashMap<NodeId, TypeId>,
    pub has_error: bool,
}

/// Checks one parsed file. Never panics on malformed input — an
/// unresolvable reference or a type mismatch is a `Diagnostic` on
/// `handler`, not a `Result::Err`.
pub fn check(parsed: ParsedData, handler: &Handler) -> CheckedData {
    let had_errors_before = handler.len();
    let mut checker = Checker::new(handler);
    checker.check_program(&parsed.ast);
    let (registry, expr_types) = checker.into_parts();
    let has_error = parsed.has_error || handler.len() > had_errors_before;
    CheckedData {
        filename: parsed.filename,
        file_id: parsed.file_id,
        source: parsed.source,
        ast: parsed.ast,
        registry,
        expr_types,
        has_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ave_util::Handler;
    use std::path::PathBuf;

    fn check_str(src: &str) -> CheckedData {
        let handler = Handler::new();
        let file_id = FileId(0);
        let scanned = ave_lex::lex(PathBuf::from("<test>"), file_id, src.to_string(), &handler);
        let parsed = ave_par::parse(scanned, &handler);
        check(parsed, &handler)
    }

    #[test]
    fn clean_program_has_no_errors() {
        let data = check_str("let a = 1\n");
        assert!(!data.has_error);
    }

    #[test]
    fn type_mismatch_sets_has_error() {
        let data = check_str("mynum: num = 10\nmynum = \"aa\"\n");
        assert!(data.has_error);
    }

    #[test]
    fn every_expression_gets_a_type() {
        let data = check_str("1 + 2\n");
        assert!(!data.expr_types.is_empty());
        for ty in data.expr_types.values() {
            assert_ne!(*ty, TypeId::INFER);
        }
    }
}
