//! End-to-end coverage over the public `build_index` entry point: one
//! literal source snippet per supported construction idiom, plus the
//! crate-wide invariants that must hold no matter which language produced
//! the index.

use semindex::types::{ConstructorCallData, DefinitionData, ReferenceData, ScopeKind};
use semindex::{build_index, Error, IndexerOptions, ParsedFile, Reference};
use tree_sitter::{Parser, Tree};

fn parse(language: &str, source: &str) -> Tree {
    let mut parser = Parser::new();
    let ts_language = match language {
        "javascript" => tree_sitter_javascript::LANGUAGE.into(),
        "typescript" => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        "python" => tree_sitter_python::LANGUAGE.into(),
        "rust" => tree_sitter_rust::LANGUAGE.into(),
        other => panic!("unsupported test language {other}"),
    };
    parser.set_language(&ts_language).expect("grammar loads");
    parser.parse(source, None).expect("source parses")
}

fn index_of(language: &str, source: &str) -> semindex::Index {
    let tree = parse(language, source);
    let file = ParsedFile {
        file_path: format!("fixture.{}", extension(language)),
        language: language.to_string(),
        source,
        tree: &tree,
    };
    build_index(file, IndexerOptions::default()).expect("supported language builds")
}

fn extension(language: &str) -> &'static str {
    match language {
        "javascript" => "js",
        "typescript" => "ts",
        "python" => "py",
        "rust" => "rs",
        _ => unreachable!(),
    }
}

fn constructor_calls(index: &semindex::Index) -> Vec<(&Reference, &ConstructorCallData)> {
    index
        .references
        .iter()
        .filter_map(|r| match &r.data {
            ReferenceData::ConstructorCall(data) => Some((r, data)),
            _ => None,
        })
        .collect()
}

// ===========================================================================
// Scenario 1: JavaScript `new`
// ===========================================================================

#[test]
fn javascript_new_expression() {
    let index = index_of(
        "javascript",
        "class Person {}\nconst p = new Person('Alice');\n",
    );

    let calls = constructor_calls(&index);
    assert_eq!(calls.len(), 1);
    let (call_ref, data) = calls[0];
    assert_eq!(call_ref.name, "Person");
    assert!(data.is_new_expression);
    assert_eq!(data.arguments_count, 1);

    let p = index.variables.iter().find(|v| v.name == "p").expect("variable p");
    match &p.data {
        DefinitionData::Variable(v) => {
            let assignment = v.assignment_type.as_ref().expect("p has an assignment type");
            assert_eq!(assignment.type_name, "Person");
        }
        _ => panic!("expected variable data"),
    }
}

// ===========================================================================
// Scenario 2: Python class-method factory
// ===========================================================================

#[test]
fn python_classmethod_factory() {
    let index = index_of("python", "w = User.from_dict({\"name\": \"John\"})\n");

    let calls = constructor_calls(&index);
    assert_eq!(calls.len(), 1);
    let (call_ref, data) = calls[0];
    assert_eq!(call_ref.name, "User");
    assert!(data.is_factory_method);
    assert_eq!(data.arguments_count, 1);
}

// ===========================================================================
// Scenario 3: Rust struct literal
// ===========================================================================

#[test]
fn rust_struct_literal() {
    let index = index_of(
        "rust",
        "struct Point { x: i32, y: i32 }\nfn main() { let p = Point { x: 1, y: 2 }; }\n",
    );

    let calls = constructor_calls(&index);
    assert_eq!(calls.len(), 1);
    let (call_ref, data) = calls[0];
    assert_eq!(call_ref.name, "Point");
    assert_eq!(data.arguments_count, 2);

    let point = index.classes.iter().find(|c| c.name == "Point").expect("Point definition");
    let class_scope = index
        .scopes
        .scopes
        .iter()
        .find(|s| s.kind == ScopeKind::Class && s.location.start_line == point.location.start_line)
        .expect("Point opens a class scope on its own line");
    // "struct Point { x: i32, y: i32 }" - the scope opens at the body, so its
    // start column must land after the name token, not at the struct keyword.
    assert!(class_scope.location.start_column as usize > "struct Point ".len());
}

// ===========================================================================
// Scenario 4: Rust macro
// ===========================================================================

#[test]
fn rust_vec_macro() {
    let index = index_of("rust", "fn main() { let v = vec![1, 2, 3]; }\n");

    let calls = constructor_calls(&index);
    assert_eq!(calls.len(), 1);
    let (call_ref, data) = calls[0];
    assert_eq!(call_ref.name, "vec");
    assert!(data.is_macro_invocation);
    assert!(data.is_factory_method);
    assert_eq!(data.arguments_count, 3);
}

// ===========================================================================
// Scenario 5: TypeScript generic constructor
// ===========================================================================

#[test]
fn typescript_generic_new() {
    let index = index_of("typescript", "const list = new Array<string>();\n");

    let calls = constructor_calls(&index);
    assert_eq!(calls.len(), 1);
    let (call_ref, data) = calls[0];
    assert_eq!(call_ref.name, "Array");
    assert!(data.is_new_expression);

    let list = index.variables.iter().find(|v| v.name == "list").expect("variable list");
    match &list.data {
        DefinitionData::Variable(v) => {
            let assignment = v.assignment_type.as_ref().expect("list has an assignment type");
            assert_eq!(assignment.type_name, "Array");
        }
        _ => panic!("expected variable data"),
    }
}

// ===========================================================================
// Scenario 6: Python super().__init__
// ===========================================================================

#[test]
fn python_super_init() {
    let index = index_of(
        "python",
        "class Child(Base):\n    def __init__(self, name, age):\n        super().__init__(name, age)\n",
    );

    let calls = constructor_calls(&index);
    let super_call = calls.iter().find(|(r, _)| r.name == "super").expect("a super() constructor call");
    assert!(super_call.1.is_super_call);
    assert_eq!(super_call.1.arguments_count, 2);
}

// ===========================================================================
// Crate-wide invariants
// ===========================================================================

#[test]
fn unsupported_language_is_the_only_error() {
    let tree = parse("rust", "fn main() {}\n");
    let file = ParsedFile {
        file_path: "a.go".to_string(),
        language: "go".to_string(),
        source: "fn main() {}\n",
        tree: &tree,
    };
    let err = build_index(file, IndexerOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedLanguage { .. }));
}

/// Invariant 1: every definition's `defining_scope_id` resolves to a real
/// scope, and that scope's own location is a (non-strict) ancestor span of
/// the definition's location on the same line.
#[test]
fn every_definition_scope_id_resolves() {
    let index = index_of(
        "python",
        "class Greeter:\n    def greet(self, name):\n        return f\"hi {name}\"\n",
    );
    for def in index
        .functions
        .iter()
        .chain(&index.classes)
        .chain(&index.variables)
    {
        assert!(
            index.scopes.get(&def.defining_scope_id).is_some(),
            "definition {} points at a missing scope",
            def.name
        );
    }
}

/// Invariant 2 + 3: a class with a body opens a scope starting after its own
/// name; a Rust tuple struct (no body) opens no class scope at all.
#[test]
fn body_based_scope_rule_for_rust() {
    let index = index_of("rust", "struct Wrapper(i32);\nstruct Labeled { value: i32 }\n");

    let wrapper = index.classes.iter().find(|c| c.name == "Wrapper").expect("Wrapper definition");
    assert!(
        !index
            .scopes
            .scopes
            .iter()
            .any(|s| s.kind == ScopeKind::Class && s.location.start_line == wrapper.location.start_line),
        "a tuple struct must not open a class scope"
    );

    let labeled = index.classes.iter().find(|c| c.name == "Labeled").expect("Labeled definition");
    let scope = index
        .scopes
        .scopes
        .iter()
        .find(|s| s.kind == ScopeKind::Class && s.location.start_line == labeled.location.start_line)
        .expect("Labeled opens a class scope on its own line");
    assert!(scope.location.start_column as usize > "struct Labeled ".len());
}

/// Invariant 4: every method_call reference carries a receiver_location
/// equal to the receiver expression's own location.
#[test]
fn method_call_receiver_location_is_set() {
    let index = index_of("javascript", "obj.method(1, 2);\n");
    let method_call = index
        .references
        .iter()
        .find(|r| matches!(r.data, ReferenceData::MethodCall { .. }))
        .expect("a method call reference");
    match &method_call.data {
        ReferenceData::MethodCall { receiver_location } => {
            assert_eq!(receiver_location.start_line, method_call.location.start_line);
        }
        _ => unreachable!(),
    }
}

/// Invariant 5: constructor calls seen by both passes collapse to exactly
/// one record per (line, column) — bespoke beats generic. A Rust struct
/// literal is caught by the generic pass only, so a single call site must
/// still yield exactly one reference.
#[test]
fn constructor_merge_is_one_record_per_position() {
    let index = index_of(
        "rust",
        "fn main() { let p = Point { x: 1, y: 2 }; }\nstruct Point { x: i32, y: i32 }\n",
    );
    let calls = constructor_calls(&index);
    let mut positions: Vec<(u32, u32)> = calls.iter().map(|(r, _)| (r.location.start_line, r.location.start_column)).collect();
    let before = positions.len();
    positions.sort();
    positions.dedup();
    assert_eq!(before, positions.len());
}

/// Invariant 6: parsing a symbol id and reconstructing it is the identity
/// function for every symbol id this crate emits.
#[test]
fn symbol_ids_round_trip() {
    let index = index_of(
        "python",
        "class Greeter:\n    def greet(self):\n        pass\n",
    );
    for def in index.functions.iter().chain(&index.classes) {
        let parsed = semindex::symbol::parse_symbol(&def.symbol_id).expect("symbol id parses");
        let reconstructed = semindex::symbol::construct_symbol(&parsed);
        assert_eq!(reconstructed, def.symbol_id);
    }
}

/// Invariant 7: building the same input twice produces equal indexes.
#[test]
fn build_index_is_deterministic() {
    let source = "class Widget {\n    constructor() {}\n    render() { return this.value; }\n}\n";
    let a = index_of("javascript", source);
    let b = index_of("javascript", source);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

/// Invariant 8: an aliased import records both the alias and the original
/// name.
#[test]
fn aliased_import_keeps_original_name() {
    let index = index_of("python", "from collections import OrderedDict as OD\n");
    let import = index.imported_symbols.iter().find(|i| i.name == "OD").expect("aliased import");
    match &import.data {
        DefinitionData::Import(data) => {
            assert_eq!(data.original_name.as_deref(), Some("OrderedDict"));
        }
        _ => panic!("expected import data"),
    }
}

/// Invariant 9: an anonymous function passed to a well-known higher-order
/// method is flagged with callback_context.is_callback = true.
#[test]
fn callback_argument_is_flagged() {
    let index = index_of("javascript", "items.map(function increment(x) { return x + 1; });\n");
    let increment = index.functions.iter().find(|f| f.name == "increment").expect("increment function");
    match &increment.data {
        DefinitionData::Function(data) => {
            let ctx = data.callback_context.as_ref().expect("increment is used as a callback");
            assert!(ctx.is_callback);
        }
        _ => panic!("expected function data"),
    }
}

/// Invariant 10: a variable assigned the result of constructing class `C`
/// carries `assignment_type.type_name == C`.
#[test]
fn variable_assignment_type_matches_constructed_class() {
    let index = index_of(
        "javascript",
        "class Session {}\nconst s = new Session();\n",
    );
    let s = index.variables.iter().find(|v| v.name == "s").expect("variable s");
    match &s.data {
        DefinitionData::Variable(v) => {
            assert_eq!(v.assignment_type.as_ref().unwrap().type_name, "Session");
        }
        _ => panic!("expected variable data"),
    }
}

/// 1-indexed positions: the very first token in a file starts at line 1,
/// column 1, never at 0.
#[test]
fn positions_are_one_indexed() {
    let index = index_of("rust", "fn first() {}\n");
    let f = index.functions.iter().find(|f| f.name == "first").expect("first function");
    assert!(f.location.start_line >= 1);
    assert!(f.location.start_column >= 1);
}
