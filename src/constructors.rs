//! Constructor Detector
//!
//! Two passes run over the same tree and are merged by `(line, column)`,
//! bespoke entries winning ties: a generic, configuration-driven pass
//! (`generic_pass`, parameterized by [`crate::lang::LanguageConfig`]) that
//! recognizes the unconditional and capitalization/factory-name-gated
//! constructor shapes every language shares, and a per-language bespoke
//! pass that layers on the forms a single table can't express (Rust enum
//! variants, smart pointers, `vec!`-style macros; Python
//! `super().__init__`; JS `Object.create`).

use std::collections::HashMap;

use tree_sitter::Node;

use crate::lang::{self, CALLBACK_METHOD_NAMES, RUST_CONSTRUCTOR_MACROS, RUST_SMART_POINTERS};
use crate::tree::{children, location_of, named_children, SourceView};
use crate::types::{ConstructorCallData, Language, Location, Reference, ReferenceData, ReferenceKind, SymbolId};

struct Entry {
    location: Location,
    name: String,
    data: ConstructorCallData,
}

fn key(loc: &Location) -> (u32, u32) {
    (loc.start_line, loc.start_column)
}

pub fn detect_constructors(
    file_path: &str,
    language: Language,
    source: SourceView,
    root: Node,
    known_types: &HashMap<String, SymbolId>,
) -> Vec<Reference> {
    let mut merged: HashMap<(u32, u32), Entry> = HashMap::new();

    for entry in generic_pass(file_path, language, source, root) {
        merged.insert(key(&entry.location), entry);
    }
    for entry in bespoke_pass(file_path, language, source, root) {
        merged.insert(key(&entry.location), entry);
    }

    let mut entries: Vec<_> = merged.into_values().collect();
    entries.sort_by_key(|e| key(&e.location));

    entries
        .into_iter()
        .map(|mut e| {
            if e.data.construct_target.is_none() {
                e.data.construct_target = known_types.get(&e.name).cloned();
            }
            Reference {
                kind: ReferenceKind::ConstructorCall,
                name: e.name,
                location: e.location,
                data: ReferenceData::ConstructorCall(e.data),
            }
        })
        .collect()
}

fn text(source: SourceView, node: Node) -> String {
    source.text_of(node).to_string()
}

fn count_arguments(args: Option<Node>) -> u32 {
    args.map(|a| named_children(a).len() as u32).unwrap_or(0)
}

// ===========================================================================
// Pass A: generic, configuration-driven
// ===========================================================================

fn generic_pass(file_path: &str, language: Language, source: SourceView, root: Node) -> Vec<Entry> {
    let config = lang::config_for(language);
    let mut out = Vec::new();
    walk_generic(file_path, source, root, config, &mut out);
    out
}

fn walk_generic(file_path: &str, source: SourceView, node: Node, config: &lang::LanguageConfig, out: &mut Vec<Entry>) {
    let kind = node.kind();

    if config.constructor_node_types.contains(&kind) {
        if let Some(entry) = build_unconditional_entry(file_path, source, node, config) {
            out.push(entry);
        }
    } else if config.potential_constructor_node_types.contains(&kind) && kind != "macro_invocation" {
        if let Some(entry) = build_conditional_entry(file_path, source, node, config) {
            out.push(entry);
        }
    }

    for child in children(node) {
        walk_generic(file_path, source, child, config, out);
    }
}

fn extract_name<'a>(node: Node<'a>, config: &lang::LanguageConfig) -> Option<Node<'a>> {
    config
        .name_extraction_fields
        .iter()
        .find(|(kind, _)| *kind == node.kind())
        .and_then(|(_, fields)| fields.iter().find_map(|f| node.child_by_field_name(f)))
}

fn build_unconditional_entry(file_path: &str, source: SourceView, node: Node, config: &lang::LanguageConfig) -> Option<Entry> {
    let name_node = extract_name(node, config)?;
    let name = text(source, name_node);
    let arguments_count = if node.kind() == "struct_expression" {
        // field_initializer_list lives under `body`, not `arguments`.
        node.child_by_field_name("body").map(|b| named_children(b).len() as u32).unwrap_or(0)
    } else {
        count_arguments(node.child_by_field_name(config.arguments_field_name))
    };
    let mut data = ConstructorCallData { arguments_count, ..Default::default() };
    if node.kind() == "new_expression" {
        data.is_new_expression = true;
    }
    Some(Entry { location: location_of(file_path, node), name, data })
}

fn build_conditional_entry(file_path: &str, source: SourceView, node: Node, config: &lang::LanguageConfig) -> Option<Entry> {
    let rules = &config.identification_rules;
    let function = extract_name(node, config).or_else(|| node.child_by_field_name("function"))?;

    // Member/attribute call: `Type.factory(...)` or `obj.method(...)`.
    if function.kind() == "member_expression" || function.kind() == "attribute" {
        let object = function.child_by_field_name("object");
        let property = function.child_by_field_name("property").or_else(|| function.child_by_field_name("attribute"));
        if let (Some(object), Some(property)) = (object, property) {
            let object_text = text(source, object);
            let property_text = text(source, property);
            let looks_like_type = rules.capitalization_pattern.map(|re| re.is_match(&object_text)).unwrap_or(false);
            let is_factory = rules.factory_method_names.contains(&property_text.as_str());
            if looks_like_type && is_factory {
                let data = ConstructorCallData {
                    arguments_count: count_arguments(node.child_by_field_name(config.arguments_field_name)),
                    is_factory_method: true,
                    ..Default::default()
                };
                return Some(Entry { location: location_of(file_path, node), name: object_text, data });
            }
        }
        return None;
    }

    // Plain call: `Widget(...)`.
    let name = text(source, function);
    if rules.requires_new_keyword {
        return None;
    }
    let looks_like_type = rules.capitalization_pattern.map(|re| re.is_match(&name)).unwrap_or(false);
    if !looks_like_type {
        return None;
    }
    let data = ConstructorCallData {
        arguments_count: count_arguments(node.child_by_field_name(config.arguments_field_name)),
        ..Default::default()
    };
    Some(Entry { location: location_of(file_path, node), name, data })
}

// ===========================================================================
// Pass B: per-language bespoke overlays
// ===========================================================================

fn bespoke_pass(file_path: &str, language: Language, source: SourceView, root: Node) -> Vec<Entry> {
    let mut out = Vec::new();
    match language {
        Language::Javascript | Language::Typescript => walk_bespoke_js(file_path, source, root, &mut out),
        Language::Python => walk_bespoke_python(file_path, source, root, &mut out),
        Language::Rust => walk_bespoke_rust(file_path, source, root, &mut out),
    }
    out
}

fn walk_bespoke_js(file_path: &str, source: SourceView, node: Node, out: &mut Vec<Entry>) {
    if node.kind() == "call_expression" {
        if let Some(function) = node.child_by_field_name("function") {
            if function.kind() == "member_expression" {
                let object = function.child_by_field_name("object").map(|n| text(source, n));
                let property = function.child_by_field_name("property").map(|n| text(source, n));
                if object.as_deref() == Some("Object") && property.as_deref() == Some("create") {
                    out.push(Entry {
                        location: location_of(file_path, node),
                        name: "Object".to_string(),
                        data: ConstructorCallData {
                            arguments_count: count_arguments(node.child_by_field_name("arguments")),
                            is_factory_method: true,
                            ..Default::default()
                        },
                    });
                }
            }
        }
    }
    for child in children(node) {
        walk_bespoke_js(file_path, source, child, out);
    }
}

fn walk_bespoke_python(file_path: &str, source: SourceView, node: Node, out: &mut Vec<Entry>) {
    if node.kind() == "call" {
        if let Some(function) = node.child_by_field_name("function") {
            if function.kind() == "attribute" {
                let object = function.child_by_field_name("object");
                let attribute = function.child_by_field_name("attribute").map(|n| text(source, n));
                let is_super_call = object.map(|o| o.kind() == "call" && o.child_by_field_name("function").map(|f| text(source, f)) == Some("super".to_string())).unwrap_or(false);
                if is_super_call && attribute.as_deref() == Some("__init__") {
                    out.push(Entry {
                        location: location_of(file_path, node),
                        name: "super".to_string(),
                        data: ConstructorCallData {
                            arguments_count: count_arguments(node.child_by_field_name("arguments")),
                            is_super_call: true,
                            ..Default::default()
                        },
                    });
                }
            }
        }
    }
    for child in children(node) {
        walk_bespoke_python(file_path, source, child, out);
    }
}

/// Walks up from a `scoped_identifier` to decide whether it sits in an
/// expression position rather than a `use` path or a type annotation, both of
/// which share the same node shape but never name a value being constructed.
fn is_value_position(node: Node) -> bool {
    let mut current = node;
    while let Some(parent) = current.parent() {
        match parent.kind() {
            "use_declaration" | "use_list" | "use_as_clause" | "use_wildcard" => return false,
            "type_identifier" | "generic_type" | "scoped_type_identifier" | "type_arguments" => return false,
            _ => {}
        }
        current = parent;
    }
    true
}

fn walk_bespoke_rust(file_path: &str, source: SourceView, node: Node, out: &mut Vec<Entry>) {
    match node.kind() {
        "call_expression" => {
            if let Some(function) = node.child_by_field_name("function") {
                if function.kind() == "scoped_identifier" {
                    let path = function.child_by_field_name("path").map(|n| text(source, n));
                    let member = function.child_by_field_name("name").map(|n| text(source, n));
                    if let (Some(path), Some(member)) = (path, member) {
                        let args = node.child_by_field_name("arguments");
                        if path == "Default" && member == "default" {
                            out.push(Entry {
                                location: location_of(file_path, node),
                                name: path,
                                data: ConstructorCallData {
                                    arguments_count: count_arguments(args),
                                    is_default_construction: true,
                                    ..Default::default()
                                },
                            });
                        } else if RUST_SMART_POINTERS.contains(&path.as_str()) {
                            out.push(Entry {
                                location: location_of(file_path, node),
                                name: path,
                                data: ConstructorCallData {
                                    arguments_count: count_arguments(args),
                                    is_smart_pointer: true,
                                    ..Default::default()
                                },
                            });
                        } else if member.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
                            // `Enum::Variant(...)`: the path is the enum, the
                            // member is the variant being constructed.
                            out.push(Entry {
                                location: location_of(file_path, node),
                                name: member,
                                data: ConstructorCallData {
                                    arguments_count: count_arguments(args),
                                    is_enum_variant: true,
                                    construct_target: None,
                                    ..Default::default()
                                },
                            });
                        }
                    }
                }
            }
        }
        "scoped_identifier" => {
            // A unit enum variant referenced without a call: `Status::Active`.
            // Excludes `use std::collections::HashMap;` and type paths like
            // `a::B`, which share this node shape but aren't value positions.
            let in_call = node.parent().map(|p| p.kind() == "call_expression").unwrap_or(false);
            if !in_call && is_value_position(node) {
                let path = node.child_by_field_name("path").map(|n| text(source, n));
                let member = node.child_by_field_name("name").map(|n| text(source, n));
                if let (Some(_path), Some(member)) = (path, member) {
                    if member.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
                        out.push(Entry {
                            location: location_of(file_path, node),
                            name: member,
                            data: ConstructorCallData { is_enum_variant: true, ..Default::default() },
                        });
                    }
                }
            }
        }
        "macro_invocation" => {
            let macro_name = node.child_by_field_name("macro").map(|n| text(source, n));
            if let Some(macro_name) = macro_name {
                if RUST_CONSTRUCTOR_MACROS.contains(&macro_name.as_str()) {
                    let token_count = node
                        .child_by_field_name("token_tree")
                        .map(|t| named_children(t).len() as u32)
                        .unwrap_or(0);
                    out.push(Entry {
                        location: location_of(file_path, node),
                        name: macro_name,
                        data: ConstructorCallData {
                            arguments_count: token_count,
                            is_macro_invocation: true,
                            is_factory_method: true,
                            ..Default::default()
                        },
                    });
                }
            }
        }
        _ => {}
    }
    for child in children(node) {
        walk_bespoke_rust(file_path, source, child, out);
    }
}

/// Callback-context heuristic shared by higher-order calls across languages:
/// is `name` one of the well-known collection methods that takes a function
/// as its first argument?
pub fn is_callback_method(name: &str) -> bool {
    CALLBACK_METHOD_NAMES.contains(&name)
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
    fn js_new_expression_is_detected() {
        let source = "const w = new Widget(1, 2);\n";
        let tree = parse(Language::Javascript, source);
        let refs = detect_constructors("a.js", Language::Javascript, SourceView::new(source), tree.root_node(), &HashMap::new());
        assert_eq!(refs.len(), 1);
        let ReferenceData::ConstructorCall(data) = &refs[0].data else { panic!() };
        assert!(data.is_new_expression);
        assert_eq!(data.arguments_count, 2);
    }

    #[test]
    fn rust_struct_literal_is_detected() {
        let source = "fn main() { let p = Point { x: 1, y: 2 }; }\n";
        let tree = parse(Language::Rust, source);
        let refs = detect_constructors("a.rs", Language::Rust, SourceView::new(source), tree.root_node(), &HashMap::new());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "Point");
    }

    #[test]
    fn rust_vec_macro_is_detected() {
        let source = "fn main() { let v = vec![1, 2, 3]; }\n";
        let tree = parse(Language::Rust, source);
        let refs = detect_constructors("a.rs", Language::Rust, SourceView::new(source), tree.root_node(), &HashMap::new());
        assert!(refs.iter().any(|r| {
            matches!(&r.data, ReferenceData::ConstructorCall(d) if d.is_macro_invocation) && r.name == "vec"
        }));
    }

    #[test]
    fn python_classmethod_factory_is_detected() {
        let source = "w = Widget.from_dict(data)\n";
        let tree = parse(Language::Python, source);
        let refs = detect_constructors("a.py", Language::Python, SourceView::new(source), tree.root_node(), &HashMap::new());
        assert_eq!(refs.len(), 1);
        assert!(matches!(&refs[0].data, ReferenceData::ConstructorCall(d) if d.is_factory_method));
    }

    #[test]
    fn python_super_init_is_detected() {
        let source = "class Child(Base):\n    def __init__(self):\n        super().__init__()\n";
        let tree = parse(Language::Python, source);
        let refs = detect_constructors("a.py", Language::Python, SourceView::new(source), tree.root_node(), &HashMap::new());
        assert!(refs.iter().any(|r| matches!(&r.data, ReferenceData::ConstructorCall(d) if d.is_super_call)));
    }
}
