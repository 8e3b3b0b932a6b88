//! Shared low-level services for the Ave compiler front end: interned
//! symbols, source spans, the `IndexVec`/`Idx` pairing used for every
//! stable-id table (`TypeId`, `NodeId`, `RibId`), and the diagnostic
//! `Handler` every pipeline stage writes into.
//!
//! Nothing in this crate knows about Ave's grammar or type system; it is the
//! same foundation layer a front end for any language would need.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;
pub mod type_id;

pub use diagnostic::{Diagnostic, DiagnosticKind, Handler};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::{lookup_keyword, Symbol};
pub use type_id::TypeId;
