//! Index Assembly
//!
//! The public entry point. Orchestrates the scope builder, definition
//! extractor, reference extractor, and constructor detector over one parsed
//! file, in that order — each later stage consults the previous stage's
//! output read-only rather than tracking its own copy of the same state.
//! `build_indexes_parallel` is a thin `rayon` wrapper for running that
//! pipeline across many files at once: one independent [`Index`] per file,
//! no state shared across the closure boundary.

use std::collections::HashMap;

use rayon::prelude::*;
use tree_sitter::Tree;

use crate::constructors::detect_constructors;
use crate::definitions::extract_definitions;
use crate::error::{Error, Result};
use crate::references::extract_references;
use crate::scope::build_scopes;
use crate::tree::SourceView;
use crate::types::{CallbackContext, DefinitionData, Index, Language, Location, ReferenceData};

/// One file handed to [`build_index`]: its path, language, source text, and
/// already-parsed tree. Parsing itself is out of scope for this crate —
/// callers own their tree-sitter `Parser` and its grammar setup.
pub struct ParsedFile<'a> {
    pub file_path: String,
    pub language: String,
    pub source: &'a str,
    pub tree: &'a Tree,
}

/// Capacity hints for the vectors [`build_index`] fills, so a caller who
/// already knows roughly how large a file's index will be can avoid the
/// default incremental growth.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexerOptions {
    pub expected_definitions: usize,
    pub expected_references: usize,
}

/// Build the semantic index for one file.
///
/// The only error a caller needs to handle is [`Error::UnsupportedLanguage`];
/// every other failure mode (malformed fragments, inverted node positions,
/// unrecognized syntax shapes) is absorbed locally and logged at `debug`,
/// never propagated.
pub fn build_index(file: ParsedFile, options: IndexerOptions) -> Result<Index> {
    let language = Language::parse(&file.language).ok_or_else(|| Error::UnsupportedLanguage {
        language: file.language.clone(),
    })?;

    let root = file.tree.root_node();
    let source = SourceView::new(file.source);

    tracing::debug!(file = %file.file_path, language = %file.language, "building index");

    let scopes = build_scopes(&file.file_path, language, root);
    let definitions = extract_definitions(&file.file_path, language, source, root, &scopes);

    let mut known_types = HashMap::new();
    for def in definitions.classes.iter().chain(&definitions.interfaces).chain(&definitions.enums) {
        known_types.insert(def.name.clone(), def.symbol_id.clone());
    }

    let mut references = extract_references(&file.file_path, language, source, root);
    let constructor_refs = detect_constructors(&file.file_path, language, source, root, &known_types);

    references.reserve(constructor_refs.len().max(options.expected_references.saturating_sub(references.len())));
    references.extend(constructor_refs);
    references.sort_by_key(|r| (r.location.start_line, r.location.start_column));

    let mut index = Index::new(file.file_path.clone(), language);
    index.scopes = scopes;
    index.functions = definitions.functions;
    index.classes = definitions.classes;
    index.interfaces = definitions.interfaces;
    index.enums = definitions.enums;
    index.types = definitions.types;
    index.namespaces = definitions.namespaces;
    index.variables = definitions.variables;
    index.imported_symbols = definitions.imported_symbols;
    index.references = references;

    annotate_callbacks(&mut index);

    if options.expected_definitions > 0 && index.definition_count() == 0 {
        tracing::debug!(file = %index.file_path, "no definitions extracted from a file with a non-trivial capacity hint");
    }

    tracing::debug!(
        file = %index.file_path,
        definitions = index.definition_count(),
        references = index.references.len(),
        "index built"
    );

    Ok(index)
}

/// Mark reference-and-definition-level callback context for calls to
/// well-known higher-order methods (`map`, `filter`, `forEach`, ...): any
/// function/method *definition* that is itself the sole argument of such a
/// call is flagged so downstream tooling can tell a callback apart from a
/// plain top-level function. The receiver of that higher-order call (the
/// collection the callback was handed to) is carried along as
/// `callback_context.receiver_location`.
fn annotate_callbacks(index: &mut Index) {
    let callback_calls: HashMap<u32, Location> = index
        .references
        .iter()
        .filter(|r| crate::constructors::is_callback_method(&r.name))
        .filter_map(|r| match &r.data {
            ReferenceData::MethodCall { receiver_location } => Some((r.location.start_line, receiver_location.clone())),
            _ => None,
        })
        .collect();
    if callback_calls.is_empty() {
        return;
    }

    for function in &mut index.functions {
        annotate_function_data(&mut function.data, function.location.start_line, &callback_calls);
    }
    for owner in index.classes.iter_mut().chain(&mut index.interfaces).chain(&mut index.enums) {
        if let DefinitionData::Type(type_data) = &mut owner.data {
            for method in &mut type_data.methods {
                let line = method.location.start_line;
                annotate_function_data(&mut method.data, line, &callback_calls);
            }
        }
    }
}

fn annotate_function_data(data: &mut DefinitionData, start_line: u32, callback_calls: &HashMap<u32, Location>) {
    let Some(receiver_location) = callback_calls.get(&start_line) else { return };
    match data {
        DefinitionData::Function(f) => {
            f.callback_context = Some(CallbackContext { is_callback: true, receiver_location: Some(receiver_location.clone()) });
        }
        DefinitionData::Method(m) => {
            m.callback_context = Some(CallbackContext { is_callback: true, receiver_location: Some(receiver_location.clone()) });
        }
        _ => {}
    }
}

/// Build indexes for many files concurrently. Cross-file parallelism only:
/// each file produces its own independent [`Index`] with no shared mutable
/// state, so a `rayon` fan-out is pure glue around repeated [`build_index`]
/// calls. A file whose language is unsupported is dropped with a debug log
/// rather than failing the whole batch.
pub fn build_indexes_parallel(files: Vec<ParsedFile>, options: IndexerOptions) -> Vec<Index> {
    files
        .into_par_iter()
        .filter_map(|file| {
            let path = file.file_path.clone();
            match build_index(file, options) {
                Ok(index) => Some(index),
                Err(err) => {
                    tracing::debug!(file = %path, error = %err, "skipping file");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn build(language: &str, source: &str) -> Index {
        let mut parser = Parser::new();
        let ts_lang = match language {
            "javascript" => tree_sitter_javascript::LANGUAGE.into(),
            "typescript" => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            "python" => tree_sitter_python::LANGUAGE.into(),
            "rust" => tree_sitter_rust::LANGUAGE.into(),
            _ => unreachable!(),
        };
        parser.set_language(&ts_lang).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let file = ParsedFile {
            file_path: format!("test.{}", language),
            language: language.to_string(),
            source,
            tree: &tree,
        };
        build_index(file, IndexerOptions::default()).unwrap()
    }

    #[test]
    fn unsupported_language_is_the_only_error() {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_rust::LANGUAGE.into()).unwrap();
        let tree = parser.parse("fn main() {}", None).unwrap();
        let file = ParsedFile {
            file_path: "a.go".to_string(),
            language: "go".to_string(),
            source: "fn main() {}",
            tree: &tree,
        };
        let err = build_index(file, IndexerOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage { .. }));
    }

    #[test]
    fn js_new_expression_end_to_end() {
        let index = build("javascript", "class Widget {}\nconst w = new Widget();\n");
        assert_eq!(index.classes.len(), 1);
        assert!(index
            .references
            .iter()
            .any(|r| matches!(&r.data, crate::types::ReferenceData::ConstructorCall(d) if d.is_new_expression)));
    }

    #[test]
    fn rust_struct_and_impl_end_to_end() {
        let index = build(
            "rust",
            "struct Counter { value: i32 }\nimpl Counter {\n    fn new() -> Self { Counter { value: 0 } }\n}\n",
        );
        assert_eq!(index.classes.len(), 1);
        match &index.classes[0].data {
            DefinitionData::Type(data) => assert_eq!(data.methods.len(), 1),
            _ => panic!("expected type data"),
        }
        assert!(index
            .references
            .iter()
            .any(|r| r.name == "Counter" && matches!(&r.data, crate::types::ReferenceData::ConstructorCall(_))));
    }

    #[test]
    fn references_are_sorted_by_position() {
        let index = build(
            "python",
            "def f():\n    b()\n    a()\n",
        );
        let positions: Vec<u32> = index.references.iter().map(|r| r.location.start_line).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }
}
