//! Error types for the semantic indexer
//!
//! Only [`Error::UnsupportedLanguage`] is meant to reach a caller of
//! [`crate::build_index`]. Every other failure mode encountered while
//! walking a single file (malformed fragments, unexpected node shapes) is
//! absorbed and recovered locally rather than propagated, so callers never
//! have to handle per-file extraction noise. The remaining variants exist
//! because the tree-sitter integration itself can fail in ways that are not
//! per-file extraction noise (a malformed language configuration, a parser
//! that refuses to initialize) and deserve a typed error rather than a panic.

use thiserror::Error;

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the semantic indexer.
#[derive(Error, Debug)]
pub enum Error {
    /// The language tag on the parsed file is not one of the four supported
    /// languages. The caller is expected to pre-filter its inputs to those.
    #[error("unsupported language: {language}")]
    UnsupportedLanguage { language: String },

    /// tree-sitter failed to parse the source into a tree, or the tree
    /// handed to [`crate::build_index`] was `None`.
    #[error("failed to parse {language} source: {message}")]
    ParseFailed { language: String, message: String },

    /// A tree-sitter query built from a [`crate::lang::LanguageConfig`] table
    /// was malformed. This indicates a bug in the configuration table, not a
    /// property of the input file.
    #[error("invalid query for {language}: {message}")]
    InvalidQuery { language: String, message: String },
}
