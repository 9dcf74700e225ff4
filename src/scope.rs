//! Scope Builder
//!
//! A single pre-order walk that emits the scope tree: one root module scope,
//! plus a nested scope per function/method/closure body, class/struct/enum/
//! trait/interface body, and lexical block. A scope always starts at the
//! body it opens, not the whole construct, so a name at `class Foo` lands
//! in the parent scope rather than its own.

use tree_sitter::Node;

use crate::lang::{container_kinds, ContainerKinds};
use crate::tree::location_of;
use crate::types::{Language, Scope, ScopeKind, ScopeTree};

struct Builder<'a> {
    file_path: &'a str,
    kinds: ContainerKinds,
    tree: ScopeTree,
    next_id: u32,
}

impl<'a> Builder<'a> {
    fn fresh_id(&mut self) -> String {
        let id = format!("{}#scope{}", self.file_path, self.next_id);
        self.next_id += 1;
        id
    }

    fn push_scope(
        &mut self,
        kind: ScopeKind,
        parent_id: Option<String>,
        node: Node,
        name: Option<String>,
    ) -> String {
        let id = self.fresh_id();
        self.tree.scopes.push(Scope {
            id: id.clone(),
            kind,
            parent_id,
            location: location_of(self.file_path, node),
            name,
        });
        id
    }

    fn walk(&mut self, node: Node<'a>, parent_id: String) {
        let kind_str = node.kind();

        if self.kinds.function_like.contains(&kind_str) {
            if let Some(body) = node.child_by_field_name("body") {
                let scope_id = self.push_scope(ScopeKind::Function, Some(parent_id.clone()), body, None);
                self.walk_children_except(node, body, parent_id);
                self.walk(body, scope_id);
                return;
            }
            // No body (e.g. an interface method signature with no block) —
            // nothing to open a scope over; recurse normally.
            self.walk_children_except(node, node, parent_id);
            return;
        }

        if self.kinds.class_like.contains(&kind_str) {
            if let Some(body) = node.child_by_field_name("body") {
                let scope_id = self.push_scope(ScopeKind::Class, Some(parent_id.clone()), body, None);
                self.walk_children_except(node, body, parent_id);
                self.walk(body, scope_id);
                return;
            }
            // Tuple/unit struct: no body, no class scope.
            self.walk_children_except(node, node, parent_id);
            return;
        }

        if kind_str == self.kinds.block_kind {
            let scope_id = self.push_scope(ScopeKind::Block, Some(parent_id.clone()), node, None);
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                self.walk(child, scope_id.clone());
            }
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child, parent_id.clone());
        }
    }

    /// Walk every child of `node` except `skip`, which the caller has
    /// already recursed into explicitly under its own new scope.
    fn walk_children_except(&mut self, node: Node<'a>, skip: Node<'a>, parent_id: String) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.id() == skip.id() {
                continue;
            }
            self.walk(child, parent_id.clone());
        }
    }
}

/// Build the scope tree for a whole file.
pub fn build_scopes(file_path: &str, language: Language, root: Node) -> ScopeTree {
    let mut builder = Builder {
        file_path,
        kinds: container_kinds(language),
        tree: ScopeTree::default(),
        next_id: 0,
    };

    let root_id = builder.push_scope(ScopeKind::Module, None, root, None);
    builder.tree.root_id = root_id.clone();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        builder.walk(child, root_id.clone());
    }

    builder.tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(lang: Language, source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        let ts_lang = match lang {
            Language::Javascript => tree_sitter_javascript::LANGUAGE.into(),
            Language::Typescript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
        };
        parser.set_language(&ts_lang).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn rust_struct_name_outside_its_own_scope() {
        let source = "struct Point { x: i32, y: i32 }\n";
        let tree = parse(Language::Rust, source);
        let scopes = build_scopes("p.rs", Language::Rust, tree.root_node());
        // One module (root) scope plus one class scope for the struct body.
        assert_eq!(scopes.scopes.len(), 2);
        let class_scope = scopes
            .scopes
            .iter()
            .find(|s| s.kind == ScopeKind::Class)
            .unwrap();
        // "struct Point " is 13 bytes; the body starts at column 14 (1-indexed),
        // strictly after the name "Point" which ends at column 13.
        assert!(class_scope.location.start_column > "struct Point".len() as u32);
    }

    #[test]
    fn tuple_struct_opens_no_scope() {
        let source = "struct Pair(i32, i32);\n";
        let tree = parse(Language::Rust, source);
        let scopes = build_scopes("p.rs", Language::Rust, tree.root_node());
        assert_eq!(scopes.scopes.len(), 1, "only the root module scope");
    }

    #[test]
    fn function_scope_excludes_parameters() {
        let source = "function greet(name) {\n  return name;\n}\n";
        let tree = parse(Language::Javascript, source);
        let scopes = build_scopes("g.js", Language::Javascript, tree.root_node());
        let fn_scope = scopes
            .scopes
            .iter()
            .find(|s| s.kind == ScopeKind::Function)
            .unwrap();
        // The scope starts at '{' on line 1, after "function greet(name) ".
        assert_eq!(fn_scope.location.start_line, 1);
        assert!(fn_scope.location.start_column > "function greet(name) ".len() as u32);
    }

    #[test]
    fn nested_if_block_inside_function_is_a_block_scope() {
        let source = "def f():\n    if True:\n        x = 1\n";
        let tree = parse(Language::Python, source);
        let scopes = build_scopes("f.py", Language::Python, tree.root_node());
        let kinds: Vec<_> = scopes.scopes.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&ScopeKind::Function));
        assert!(kinds.contains(&ScopeKind::Block));
    }
}
