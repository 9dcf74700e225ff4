//! Tree Adapter
//!
//! A thin layer over `tree_sitter::Node` so every later component depends on
//! one small surface instead of the grammar directly. `tree_sitter::Node`
//! already exposes typed kinds, field access, and child iteration, so this
//! module is mostly conversion helpers: byte/row positions to [`Location`],
//! and text slicing that degrades to `""` instead of panicking on invalid
//! UTF-8 (tree-sitter nodes can, in principle, straddle a multi-byte
//! boundary incorrectly on a malformed tree).

use tree_sitter::Node;

use crate::types::Location;

/// A view over one file's source text, handed to every extractor alongside
/// the tree. Centralizing `source.as_bytes()` here avoids re-deriving it in
/// every pass.
#[derive(Clone, Copy)]
pub struct SourceView<'a> {
    pub text: &'a str,
}

impl<'a> SourceView<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// The verbatim source text spanned by `node`, or `""` if the node's
    /// byte range does not land on a UTF-8 boundary. Malformed fragments are
    /// recovered locally and never surfaced as an error.
    pub fn text_of(&self, node: Node) -> &'a str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }
}

/// Convert a node's span into a 1-indexed [`Location`]. tree-sitter
/// positions are 0-indexed; this is the single place that adds 1 to every
/// field on the way out to public types.
pub fn location_of(file_path: &str, node: Node) -> Location {
    let (start, end) = ordered_positions(node);
    Location::new(
        file_path,
        start.row as u32 + 1,
        start.column as u32 + 1,
        end.row as u32 + 1,
        end.column as u32 + 1,
    )
}

/// `start_position()`/`end_position()`, swapped and logged if the tree
/// reports an end position preceding its start. Recovered locally, logged
/// at debug only, never surfaced as an error.
fn ordered_positions(node: Node) -> (tree_sitter::Point, tree_sitter::Point) {
    let start = node.start_position();
    let end = node.end_position();
    if end < start {
        tracing::debug!(
            kind = node.kind(),
            "node end position precedes start position; swapping"
        );
        (end, start)
    } else {
        (start, end)
    }
}

/// `child_by_field_name`, trying each name in `fields` in order and
/// returning the first match. Used for forms with multiple possible name
/// fields (member expression, scoped identifier, generic type).
pub fn child_by_any_field<'a>(node: Node<'a>, fields: &[&str]) -> Option<Node<'a>> {
    fields.iter().find_map(|f| node.child_by_field_name(f))
}

/// All named children of `node`, in source order.
pub fn named_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All children (named and anonymous) of `node`, in source order.
pub fn children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_of_converts_to_one_indexed() {
        let source = "fn main() {}\n";
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        let root = tree.root_node();
        let loc = location_of("f.rs", root);
        assert_eq!(loc.start_line, 1);
        assert_eq!(loc.start_column, 1);
    }
}
