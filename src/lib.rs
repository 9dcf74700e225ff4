//! semindex - per-file semantic indexing over tree-sitter syntax trees
//!
//! Given a parsed tree-sitter tree for a JavaScript, TypeScript, Python, or
//! Rust file, [`build_index`] produces an [`Index`]: a scope tree, every
//! definition (functions, classes, interfaces, enums, structs, traits, type
//! aliases, variables, parameters, imports), and every reference (calls,
//! type references, assignments) it can find, with symbol ids stable across
//! runs on the same input.

pub mod constructors;
pub mod definitions;
pub mod error;
pub mod index;
pub mod lang;
pub mod references;
pub mod scope;
pub mod symbol;
pub mod tree;
pub mod types;

pub use error::{Error, Result};
pub use index::{build_index, build_indexes_parallel, IndexerOptions, ParsedFile};
pub use types::{Definition, Index, Language, Reference, Scope, ScopeTree};
