//! Language Configuration
//!
//! Process-wide, read-only per-language tables describing how each grammar
//! spells a constructor call, an assignment, and a name. Built once behind
//! `once_cell::sync::Lazy` statics and looked up by [`crate::types::Language`],
//! the same pattern used for the per-language query tables that used to live
//! directly in this codebase's tree-sitter extraction code: rather than
//! branching on language everywhere a construct is recognized, the branching
//! happens once here and every consumer reads a plain struct.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Language;

/// A single node-type/lhs-field pairing recognized as an assignment.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentPattern {
    pub node_type: &'static str,
    pub lhs_field: &'static str,
    pub rhs_field: &'static str,
}

/// Rules the generic constructor-detection pass uses to decide whether a
/// call-shaped node is actually a construction.
#[derive(Debug, Clone, Copy)]
pub struct IdentificationRules {
    /// JS/TS: only `new X(...)` counts, never a bare call, regardless of
    /// capitalization.
    pub requires_new_keyword: bool,
    /// A compiled check for "the callee name looks like a type" (JS bare
    /// calls, Rust `Type::new`). `None` when capitalization carries no
    /// meaning for this language's identification rules.
    pub capitalization_pattern: Option<&'static Regex>,
    /// Method names that count as factory constructors when called on a
    /// type-like receiver (`Widget.from_dict(...)`, `Type::default()`).
    pub factory_method_names: &'static [&'static str],
    /// Named escape hatches handled by the bespoke pass, recorded here only
    /// so the generic pass knows to skip them rather than double-count.
    pub special_patterns: &'static [&'static str],
}

/// A per-language lookup table consulted by the generic constructor pass and
/// by name extraction where a construct's name lives in more than one
/// possible field.
#[derive(Debug, Clone, Copy)]
pub struct LanguageConfig {
    pub language: Language,
    /// Node kinds that are unconditionally a construction (`new_expression`,
    /// `struct_expression`).
    pub constructor_node_types: &'static [&'static str],
    /// Node kinds that are a construction only once the identification rules
    /// confirm it (`call_expression`, `call`).
    pub potential_constructor_node_types: &'static [&'static str],
    /// `(node_type, field names to try in order)` for extracting a human
    /// name out of a construct whose name can live under different fields
    /// depending on shape (`member_expression` vs plain `identifier`).
    pub name_extraction_fields: &'static [(&'static str, &'static [&'static str])],
    pub identification_rules: IdentificationRules,
    /// The field holding a call's argument list, used for argument counting.
    pub arguments_field_name: &'static str,
    pub assignment_patterns: &'static [AssignmentPattern],
}

static CAPITALIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]").unwrap());

fn js_like_config(language: Language) -> LanguageConfig {
    LanguageConfig {
        language,
        constructor_node_types: &["new_expression"],
        potential_constructor_node_types: &["call_expression"],
        name_extraction_fields: &[
            ("new_expression", &["constructor"]),
            ("call_expression", &["function"]),
            ("member_expression", &["property"]),
        ],
        identification_rules: IdentificationRules {
            requires_new_keyword: false,
            capitalization_pattern: Some(&CAPITALIZED),
            factory_method_names: &["create", "from", "of", "getInstance"],
            special_patterns: &["Object.create"],
        },
        arguments_field_name: "arguments",
        assignment_patterns: &[
            AssignmentPattern { node_type: "variable_declarator", lhs_field: "name", rhs_field: "value" },
            AssignmentPattern { node_type: "assignment_expression", lhs_field: "left", rhs_field: "right" },
        ],
    }
}

static JAVASCRIPT: Lazy<LanguageConfig> = Lazy::new(|| js_like_config(Language::Javascript));
static TYPESCRIPT: Lazy<LanguageConfig> = Lazy::new(|| js_like_config(Language::Typescript));

static PYTHON: Lazy<LanguageConfig> = Lazy::new(|| LanguageConfig {
    language: Language::Python,
    // Python has no `new` keyword: every constructor call is a plain `call`
    // whose function looks like a type name.
    constructor_node_types: &[],
    potential_constructor_node_types: &["call"],
    name_extraction_fields: &[("call", &["function"]), ("attribute", &["attribute"])],
    identification_rules: IdentificationRules {
        requires_new_keyword: false,
        capitalization_pattern: Some(&CAPITALIZED),
        factory_method_names: &["from_dict", "from_json", "create", "build", "default"],
        special_patterns: &["super().__init__", "classmethod_factory", "dataclass_instantiation"],
    },
    arguments_field_name: "arguments",
    assignment_patterns: &[
        AssignmentPattern { node_type: "assignment", lhs_field: "left", rhs_field: "right" },
        AssignmentPattern { node_type: "augmented_assignment", lhs_field: "left", rhs_field: "right" },
    ],
});

static RUST: Lazy<LanguageConfig> = Lazy::new(|| LanguageConfig {
    language: Language::Rust,
    constructor_node_types: &["struct_expression"],
    potential_constructor_node_types: &["call_expression", "macro_invocation"],
    name_extraction_fields: &[
        ("struct_expression", &["name"]),
        ("call_expression", &["function"]),
        ("scoped_identifier", &["path"]),
        ("field_expression", &["field"]),
        ("macro_invocation", &["macro"]),
    ],
    identification_rules: IdentificationRules {
        requires_new_keyword: false,
        capitalization_pattern: Some(&CAPITALIZED),
        factory_method_names: &["new", "default", "from", "with_capacity"],
        special_patterns: &["enum_variant", "tuple_struct", "smart_pointer", "macro_invocation", "Default::default"],
    },
    arguments_field_name: "arguments",
    assignment_patterns: &[AssignmentPattern {
        node_type: "let_declaration",
        lhs_field: "pattern",
        rhs_field: "value",
    }],
});

/// Look up the configuration table for `language`.
pub fn config_for(language: Language) -> &'static LanguageConfig {
    match language {
        Language::Javascript => &JAVASCRIPT,
        Language::Typescript => &TYPESCRIPT,
        Language::Python => &PYTHON,
        Language::Rust => &RUST,
    }
}

/// Node-kind tables shared by the scope builder and the definition
/// extractor so both walks agree on what counts as a function/class-shaped
/// container without duplicating the list.
#[derive(Debug, Clone, Copy)]
pub struct ContainerKinds {
    pub function_like: &'static [&'static str],
    pub class_like: &'static [&'static str],
    pub block_kind: &'static str,
}

pub fn container_kinds(language: Language) -> ContainerKinds {
    match language {
        Language::Javascript | Language::Typescript => ContainerKinds {
            function_like: &[
                "function_declaration",
                "function_expression",
                "generator_function_declaration",
                "generator_function",
                "method_definition",
                "arrow_function",
            ],
            class_like: &["class_declaration", "class_expression", "interface_declaration", "enum_declaration"],
            block_kind: "statement_block",
        },
        Language::Python => ContainerKinds {
            function_like: &["function_definition", "lambda"],
            class_like: &["class_definition"],
            block_kind: "block",
        },
        Language::Rust => ContainerKinds {
            function_like: &["function_item", "closure_expression"],
            class_like: &["struct_item", "enum_item", "trait_item", "impl_item"],
            block_kind: "block",
        },
    }
}

/// Rust smart-pointer constructors recognized by the bespoke constructor
/// pass regardless of the generic capitalization check (`Box::new`,
/// `Rc::new`, ...).
pub const RUST_SMART_POINTERS: &[&str] = &["Box", "Rc", "Arc", "RefCell", "Cell", "Mutex", "RwLock"];

/// Rust macros treated as constructions when invoked (`vec![]`, `format!()`).
pub const RUST_CONSTRUCTOR_MACROS: &[&str] =
    &["vec", "hashmap", "btreemap", "hashset", "btreeset", "format"];

/// Higher-order call names treated as passing their first function-shaped
/// argument as a callback, shared across the JS/TS and Python configs.
pub const CALLBACK_METHOD_NAMES: &[&str] =
    &["map", "filter", "reduce", "forEach", "for_each", "then", "catch"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalization_pattern_matches_type_like_names() {
        assert!(CAPITALIZED.is_match("Widget"));
        assert!(!CAPITALIZED.is_match("widget"));
    }

    #[test]
    fn config_for_rust_has_struct_expression_as_unconditional_constructor() {
        let config = config_for(Language::Rust);
        assert!(config.constructor_node_types.contains(&"struct_expression"));
        assert!(config.potential_constructor_node_types.contains(&"macro_invocation"));
    }

    #[test]
    fn config_for_python_has_no_keyword_requirement() {
        let config = config_for(Language::Python);
        assert!(!config.identification_rules.requires_new_keyword);
        assert!(config.identification_rules.factory_method_names.contains(&"from_dict"));
    }
}
