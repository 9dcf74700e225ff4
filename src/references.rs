//! Reference Extractor
//!
//! Walks the tree independently of the definition extractor and emits a
//! [`Reference`] for every function call, method call, type reference, and
//! assignment it finds. Constructor calls are deliberately skipped here —
//! [`crate::constructors`] owns that classification and the two result sets
//! are merged by [`crate::index::build_index`].

use tree_sitter::Node;

use crate::lang;
use crate::tree::{children, location_of, named_children, SourceView};
use crate::types::{
    AssignmentType, Certainty, Language, Location, Reference, ReferenceData, ReferenceKind, TypeInfo,
};

pub fn extract_references(file_path: &str, language: Language, source: SourceView, root: Node) -> Vec<Reference> {
    let mut refs = Vec::new();
    match language {
        Language::Javascript | Language::Typescript => walk_js(file_path, language, source, root, &mut refs),
        Language::Python => walk_python(file_path, language, source, root, &mut refs),
        Language::Rust => walk_rust(file_path, language, source, root, &mut refs),
    }
    refs
}

fn text(source: SourceView, node: Node) -> String {
    source.text_of(node).to_string()
}

/// A bare identifier call whose name matches the language's capitalization/
/// factory heuristic is a constructor pattern, not a plain function call —
/// [`crate::constructors`] already emits a `constructor_call` for it, so
/// the reference extractor must not also emit a `function_call` at the
/// same position.
fn looks_like_constructor_call(language: Language, name: &str) -> bool {
    let rules = &lang::config_for(language).identification_rules;
    !rules.requires_new_keyword && rules.capitalization_pattern.map(|re| re.is_match(name)).unwrap_or(false)
}

// ===========================================================================
// JavaScript / TypeScript
// ===========================================================================

fn walk_js(file_path: &str, language: Language, source: SourceView, node: Node, out: &mut Vec<Reference>) {
    match node.kind() {
        "call_expression" => {
            if let Some(function) = node.child_by_field_name("function") {
                // `new X()` is a construction, handled by the constructor detector.
                if node.parent().map(|p| p.kind() == "new_expression").unwrap_or(false) {
                    // unreachable in practice: new_expression has its own "constructor" field,
                    // not a nested call_expression, but guarded for safety.
                } else if function.kind() == "member_expression" {
                    let property = function.child_by_field_name("property");
                    let object = function.child_by_field_name("object");
                    if let (Some(property), Some(object)) = (property, object) {
                        out.push(Reference {
                            kind: ReferenceKind::MethodCall,
                            name: text(source, property),
                            location: location_of(file_path, node),
                            data: ReferenceData::MethodCall { receiver_location: location_of(file_path, object) },
                        });
                    }
                } else if function.kind() == "identifier" {
                    let name = text(source, function);
                    if !looks_like_constructor_call(language, &name) {
                        out.push(Reference {
                            kind: ReferenceKind::FunctionCall,
                            name,
                            location: location_of(file_path, node),
                            data: ReferenceData::FunctionCall { target_symbol_id: None },
                        });
                    }
                }
            }
        }
        "type_annotation" => {
            if let Some(type_node) = named_children(node).into_iter().next() {
                if let Some(reference) = js_type_reference(file_path, source, type_node) {
                    out.push(reference);
                }
            }
        }
        "assignment_expression" => {
            if let (Some(left), Some(right)) = (node.child_by_field_name("left"), node.child_by_field_name("right")) {
                out.push(Reference {
                    kind: ReferenceKind::Assignment,
                    name: text(source, left),
                    location: location_of(file_path, node),
                    data: ReferenceData::Assignment { assignment_type: infer_js_assignment(source, right) },
                });
            }
        }
        _ => {}
    }
    for child in children(node) {
        walk_js(file_path, language, source, child, out);
    }
}

fn js_type_reference(file_path: &str, source: SourceView, node: Node) -> Option<Reference> {
    if node.kind() != "type_identifier" && node.kind() != "generic_type" {
        return None;
    }
    let (name_node, generics) = if node.kind() == "generic_type" {
        let name = node.child_by_field_name("name")?;
        let args = node
            .child_by_field_name("type_arguments")
            .map(|a| named_children(a).iter().map(|n| text(source, *n)).collect())
            .unwrap_or_default();
        (name, args)
    } else {
        (node, Vec::new())
    };
    Some(Reference {
        kind: ReferenceKind::TypeReference,
        name: text(source, name_node),
        location: location_of(file_path, node),
        data: ReferenceData::TypeReference {
            type_info: TypeInfo { type_name: text(source, name_node), certainty: Certainty::Declared, generics },
        },
    })
}

fn infer_js_assignment(source: SourceView, value: Node) -> Option<AssignmentType> {
    let type_name = match value.kind() {
        "string" | "template_string" => "string",
        "number" => "number",
        "true" | "false" => "boolean",
        "array" => "array",
        "object" => "object",
        _ => return None,
    };
    let _ = source;
    Some(AssignmentType { type_name: type_name.to_string(), certainty: Certainty::Inferred })
}

// ===========================================================================
// Python
// ===========================================================================

fn walk_python(file_path: &str, language: Language, source: SourceView, node: Node, out: &mut Vec<Reference>) {
    match node.kind() {
        "call" => {
            if let Some(function) = node.child_by_field_name("function") {
                if function.kind() == "attribute" {
                    let property = function.child_by_field_name("attribute");
                    let object = function.child_by_field_name("object");
                    if let (Some(property), Some(object)) = (property, object) {
                        out.push(Reference {
                            kind: ReferenceKind::MethodCall,
                            name: text(source, property),
                            location: location_of(file_path, node),
                            data: ReferenceData::MethodCall { receiver_location: location_of(file_path, object) },
                        });
                    }
                } else if function.kind() == "identifier" {
                    let name = text(source, function);
                    if !looks_like_constructor_call(language, &name) {
                        out.push(Reference {
                            kind: ReferenceKind::FunctionCall,
                            name,
                            location: location_of(file_path, node),
                            data: ReferenceData::FunctionCall { target_symbol_id: None },
                        });
                    }
                }
            }
        }
        "type" => {
            if let Some(type_node) = named_children(node).into_iter().next() {
                out.push(Reference {
                    kind: ReferenceKind::TypeReference,
                    name: text(source, type_node),
                    location: location_of(file_path, node),
                    data: ReferenceData::TypeReference {
                        type_info: TypeInfo { type_name: text(source, type_node), certainty: Certainty::Declared, generics: Vec::new() },
                    },
                });
            }
        }
        "assignment" => {
            if let (Some(left), Some(right)) = (node.child_by_field_name("left"), node.child_by_field_name("right")) {
                if left.kind() == "identifier" {
                    out.push(Reference {
                        kind: ReferenceKind::Assignment,
                        name: text(source, left),
                        location: location_of(file_path, node),
                        data: ReferenceData::Assignment { assignment_type: infer_python_assignment(source, right) },
                    });
                }
            }
        }
        _ => {}
    }
    for child in children(node) {
        walk_python(file_path, language, source, child, out);
    }
}

fn infer_python_assignment(source: SourceView, value: Node) -> Option<AssignmentType> {
    let type_name = match value.kind() {
        "string" => "str",
        "integer" => "int",
        "float" => "float",
        "true" | "false" => "bool",
        "list" => "list",
        "dictionary" => "dict",
        _ => return None,
    };
    let _ = source;
    Some(AssignmentType { type_name: type_name.to_string(), certainty: Certainty::Inferred })
}

// ===========================================================================
// Rust
// ===========================================================================

fn walk_rust(file_path: &str, language: Language, source: SourceView, node: Node, out: &mut Vec<Reference>) {
    match node.kind() {
        "call_expression" => {
            if let Some(function) = node.child_by_field_name("function") {
                match function.kind() {
                    "field_expression" => {
                        let property = function.child_by_field_name("field");
                        let object = function.child_by_field_name("value");
                        if let (Some(property), Some(object)) = (property, object) {
                            out.push(Reference {
                                kind: ReferenceKind::MethodCall,
                                name: text(source, property),
                                location: location_of(file_path, node),
                                data: ReferenceData::MethodCall { receiver_location: location_of(file_path, object) },
                            });
                        }
                    }
                    "identifier" => {
                        let name = text(source, function);
                        if !looks_like_constructor_call(language, &name) {
                            out.push(Reference {
                                kind: ReferenceKind::FunctionCall,
                                name,
                                location: location_of(file_path, node),
                                data: ReferenceData::FunctionCall { target_symbol_id: None },
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        "type_identifier" => {
            if is_type_reference_position(node) {
                out.push(Reference {
                    kind: ReferenceKind::TypeReference,
                    name: text(source, node),
                    location: location_of(file_path, node),
                    data: ReferenceData::TypeReference {
                        type_info: TypeInfo { type_name: text(source, node), certainty: Certainty::Declared, generics: Vec::new() },
                    },
                });
            }
        }
        "assignment_expression" => {
            if let (Some(left), Some(right)) = (node.child_by_field_name("left"), node.child_by_field_name("right")) {
                out.push(Reference {
                    kind: ReferenceKind::Assignment,
                    name: text(source, left),
                    location: location_of(file_path, node),
                    data: ReferenceData::Assignment { assignment_type: infer_rust_assignment(source, right) },
                });
            }
        }
        _ => {}
    }
    for child in children(node) {
        walk_rust(file_path, language, source, child, out);
    }
}

/// `type_identifier` shows up both as a reference (`let x: Foo`) and as the
/// name being *declared* (`struct Foo`). Skip the declaration position by
/// checking whether the immediate parent is a definition header rather than
/// a type position.
fn is_type_reference_position(node: Node) -> bool {
    node.parent()
        .map(|p| !matches!(p.kind(), "struct_item" | "enum_item" | "trait_item" | "type_item"))
        .unwrap_or(true)
}

fn infer_rust_assignment(source: SourceView, value: Node) -> Option<AssignmentType> {
    let type_name = match value.kind() {
        "string_literal" => "&str",
        "integer_literal" => "i32",
        "float_literal" => "f64",
        "boolean_literal" => "bool",
        _ => return None,
    };
    let _ = source;
    Some(AssignmentType { type_name: type_name.to_string(), certainty: Certainty::Inferred })
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
    fn js_method_call_captures_receiver_location() {
        let source = "obj.method(1);\n";
        let tree = parse(Language::Javascript, source);
        let refs = extract_references("a.js", Language::Javascript, SourceView::new(source), tree.root_node());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ReferenceKind::MethodCall);
        assert_eq!(refs[0].name, "method");
    }

    #[test]
    fn python_function_call_is_recorded() {
        let source = "do_thing(1, 2)\n";
        let tree = parse(Language::Python, source);
        let refs = extract_references("a.py", Language::Python, SourceView::new(source), tree.root_node());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ReferenceKind::FunctionCall);
        assert_eq!(refs[0].name, "do_thing");
    }

    #[test]
    fn rust_method_call_uses_field_expression() {
        let source = "fn main() { v.push(1); }\n";
        let tree = parse(Language::Rust, source);
        let refs = extract_references("a.rs", Language::Rust, SourceView::new(source), tree.root_node());
        assert!(refs.iter().any(|r| r.kind == ReferenceKind::MethodCall && r.name == "push"));
    }
}
