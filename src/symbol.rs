//! Symbol Construction
//!
//! Pure functions building and parsing globally unique symbol identifiers.
//! No tree-sitter, no I/O — this module only manipulates strings, the same
//! separation of concerns kept elsewhere in this crate between plain data
//! types and the code that populates them.

use std::cmp::Ordering;

use crate::types::SymbolId;

/// Special names used for entities without a natural source-level name.
pub const CONSTRUCTOR_NAME: &str = "<constructor>";
pub const MODULE_NAME: &str = "<module>";
pub const DESTRUCTOR_NAME: &str = "<destructor>";
pub const GETTER_NAME: &str = "<getter>";
pub const SETTER_NAME: &str = "<setter>";
const ANONYMOUS_MARKER: &str = "<anonymous>";

/// The components a [`SymbolId`] is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolComponents {
    pub file_path: String,
    pub scope_path: Vec<String>,
    pub name: String,
}

impl SymbolComponents {
    pub fn new(
        file_path: impl Into<String>,
        scope_path: Vec<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            scope_path,
            name: name.into(),
        }
    }

    /// Build the name for an anonymous element: `<anonymous>:<line>:<col>`.
    pub fn anonymous_name(line: u32, column: u32) -> String {
        format!("{ANONYMOUS_MARKER}:{line}:{column}")
    }
}

/// Normalize a file path to forward slashes so the same file always
/// produces the same symbol id regardless of platform path separators.
fn normalize_path(file_path: &str) -> String {
    file_path.replace('\\', "/")
}

/// Construct a symbol id: `<file_path>#<scope_path_colon_joined>:<name>`.
pub fn construct_symbol(components: &SymbolComponents) -> SymbolId {
    let file_path = normalize_path(&components.file_path);
    let scope_joined = components.scope_path.join(":");
    format!("{file_path}#{scope_joined}:{}", components.name)
}

/// Parse a symbol id back into its components. The inverse of
/// [`construct_symbol`] for any id that function produces.
///
/// Ambiguity note: scope names are plain identifiers and never contain `:`,
/// but an anonymous element's name does (`<anonymous>:<line>:<col>`). We
/// detect that shape explicitly so the split is still unambiguous.
pub fn parse_symbol(symbol_id: &str) -> Option<SymbolComponents> {
    let (file_path, rest) = symbol_id.split_once('#')?;
    let tokens: Vec<&str> = rest.split(':').collect();
    if tokens.is_empty() {
        return None;
    }

    let anonymous_tail = tokens.len() >= 3
        && tokens[tokens.len() - 3] == ANONYMOUS_MARKER
        && tokens[tokens.len() - 2].parse::<u32>().is_ok()
        && tokens[tokens.len() - 1].parse::<u32>().is_ok();

    let name_token_count = if anonymous_tail { 3 } else { 1 };
    if tokens.len() < name_token_count {
        return None;
    }
    let split_at = tokens.len() - name_token_count;
    let scope_path: Vec<String> = tokens[..split_at].iter().map(|s| s.to_string()).collect();
    let name = tokens[split_at..].join(":");

    Some(SymbolComponents {
        file_path: file_path.to_string(),
        scope_path,
        name,
    })
}

/// Compare two components: file_path, then scope depth, then each scope
/// name in order, then name.
pub fn compare(a: &SymbolComponents, b: &SymbolComponents) -> Ordering {
    a.file_path
        .cmp(&b.file_path)
        .then_with(|| a.scope_path.len().cmp(&b.scope_path.len()))
        .then_with(|| a.scope_path.cmp(&b.scope_path))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_basic() {
        let c = SymbolComponents::new("src/a.rs", vec!["Foo".into()], "bar");
        assert_eq!(construct_symbol(&c), "src/a.rs#Foo:bar");
    }

    #[test]
    fn construct_normalizes_windows_paths() {
        let c = SymbolComponents::new("src\\a.rs", vec![], "bar");
        assert_eq!(construct_symbol(&c), "src/a.rs#:bar");
    }

    #[test]
    fn round_trip_named() {
        let c = SymbolComponents::new("f.ts", vec!["Outer".into(), "Inner".into()], "method");
        let id = construct_symbol(&c);
        assert_eq!(parse_symbol(&id).unwrap(), c);
    }

    #[test]
    fn round_trip_anonymous() {
        let name = SymbolComponents::anonymous_name(10, 4);
        let c = SymbolComponents::new("f.js", vec!["outer".into()], name);
        let id = construct_symbol(&c);
        assert_eq!(parse_symbol(&id).unwrap(), c);
    }

    #[test]
    fn round_trip_special_names() {
        for special in [
            CONSTRUCTOR_NAME,
            MODULE_NAME,
            DESTRUCTOR_NAME,
            GETTER_NAME,
            SETTER_NAME,
        ] {
            let c = SymbolComponents::new("f.py", vec!["C".into()], special);
            let id = construct_symbol(&c);
            assert_eq!(parse_symbol(&id).unwrap(), c);
        }
    }

    #[test]
    fn compare_orders_by_file_then_depth_then_names() {
        let a = SymbolComponents::new("a.rs", vec![], "x");
        let b = SymbolComponents::new("a.rs", vec!["Scope".into()], "x");
        assert_eq!(compare(&a, &b), Ordering::Less);
    }
}
