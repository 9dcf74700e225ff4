//! Core data model for the semantic index: scopes, definitions, references,
//! and their kind-specific payloads. Everything here is plain, string-keyed
//! data with no tree-sitter dependency, so extractors can be tested against
//! it without parsing anything.

use serde::{Deserialize, Serialize};

// =============================================================================
// LOCATION
// =============================================================================

/// A source range, 1-indexed, with an exclusive end column reported as the
/// character count + 1 on the last line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub fn new(
        file_path: impl Into<String>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Does `self` contain `other` (inclusive of shared boundaries)?
    pub fn contains(&self, other: &Location) -> bool {
        (self.start_line, self.start_column) <= (other.start_line, other.start_column)
            && (other.end_line, other.end_column) <= (self.end_line, self.end_column)
    }

    /// Does this location's start position fall before `line`/`column`?
    pub fn starts_before(&self, line: u32, column: u32) -> bool {
        (self.start_line, self.start_column) < (line, column)
    }
}

// =============================================================================
// SCOPE
// =============================================================================

/// Classification of lexical scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Module,
    Function,
    Class,
    Block,
}

pub type ScopeId = String;

/// A lexical scope. `parent_id` is `None` only for the root module scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent_id: Option<ScopeId>,
    pub location: Location,
    pub name: Option<String>,
}

/// The scope tree for one file: scopes in deterministic pre-order, plus the
/// id of the root module scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeTree {
    pub scopes: Vec<Scope>,
    pub root_id: ScopeId,
}

impl ScopeTree {
    pub fn get(&self, id: &str) -> Option<&Scope> {
        self.scopes.iter().find(|s| s.id == id)
    }

    /// Walk from `id` up through `parent_id` links to the root.
    pub fn ancestors<'a>(&'a self, id: &str) -> Vec<&'a Scope> {
        let mut chain = Vec::new();
        let mut current = self.get(id);
        while let Some(scope) = current {
            chain.push(scope);
            current = scope.parent_id.as_deref().and_then(|p| self.get(p));
        }
        chain
    }

    /// The innermost scope whose location contains `line`/`column`.
    pub fn tightest_enclosing(&self, line: u32, column: u32) -> Option<&Scope> {
        let mut best: Option<&Scope> = None;
        for scope in &self.scopes {
            let loc = &scope.location;
            let within = (loc.start_line, loc.start_column) <= (line, column)
                && (line, column) <= (loc.end_line, loc.end_column);
            if !within {
                continue;
            }
            best = match best {
                None => Some(scope),
                Some(current) => {
                    let current_span = span_of(&current.location);
                    let candidate_span = span_of(loc);
                    if candidate_span < current_span {
                        Some(scope)
                    } else {
                        Some(current)
                    }
                }
            };
        }
        best
    }
}

fn span_of(loc: &Location) -> (u32, u32) {
    (
        loc.end_line.saturating_sub(loc.start_line),
        loc.end_column.saturating_sub(loc.start_column),
    )
}

// =============================================================================
// SYMBOL ID
// =============================================================================

/// A globally unique identifier: `<file_path>#<scope_path_colon_joined>:<name>`.
/// Constructed and parsed in [`crate::symbol`].
pub type SymbolId = String;

// =============================================================================
// DEFINITIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Function,
    Method,
    Class,
    Struct,
    Enum,
    Interface,
    Trait,
    TypeAlias,
    Variable,
    Parameter,
    Import,
    Namespace,
}

bitflags::bitflags! {
    /// Purely-syntactic flags on a definition: nothing here requires
    /// resolving a reference or looking outside the node itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DefinitionFlags: u8 {
        const IS_EXPORTED    = 0b0000_0001;
        const IS_ASYNC       = 0b0000_0010;
        const IS_STATIC      = 0b0000_0100;
        const IS_TEST        = 0b0000_1000;
        const IS_OPTIONAL    = 0b0001_0000;
    }
}

impl Default for DefinitionFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    Protected,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Certainty {
    Declared,
    Inferred,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentType {
    pub type_name: String,
    pub certainty: Certainty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCollection {
    pub collection_type: String,
    pub stored_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackContext {
    pub is_callback: bool,
    pub receiver_location: Option<Location>,
}

/// A single definition record. `data` carries the kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub symbol_id: SymbolId,
    pub name: String,
    pub location: Location,
    pub defining_scope_id: ScopeId,
    pub flags: DefinitionFlags,
    pub data: DefinitionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind_data")]
pub enum DefinitionData {
    Function(FunctionData),
    Method(MethodData),
    /// Shared shape for class/struct/enum/interface/trait. `shape` records
    /// which concrete syntactic form produced it so index assembly can
    /// bucket it correctly.
    Type(TypeData),
    TypeAlias(TypeAliasData),
    Variable(VariableData),
    Parameter(ParameterData),
    Import(ImportData),
    Namespace(NamespaceData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeShape {
    Class,
    Struct,
    Enum,
    Interface,
    Trait,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionData {
    pub parameters: Vec<Definition>,
    pub return_type: Option<String>,
    pub generics: Vec<String>,
    pub callback_context: Option<CallbackContext>,
    pub function_collection: Option<FunctionCollection>,
    pub derived_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodData {
    pub parameters: Vec<Definition>,
    pub return_type: Option<String>,
    pub decorators: Vec<String>,
    pub visibility: Visibility,
    pub callback_context: Option<CallbackContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyData {
    pub name: String,
    pub type_annotation: Option<String>,
    pub is_static: bool,
    pub visibility: Visibility,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantShape {
    Unit,
    Tuple,
    Struct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub shape: VariantShape,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeData {
    pub shape: TypeShape,
    pub methods: Vec<Definition>,
    pub properties: Vec<PropertyData>,
    pub members: Vec<EnumMember>,
    pub generics: Vec<String>,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAliasData {
    pub type_expression: String,
    pub generics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableData {
    pub assignment_type: Option<AssignmentType>,
    pub function_collection: Option<FunctionCollection>,
    pub derived_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterData {
    pub type_annotation: Option<String>,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Named,
    Default,
    Namespace,
    SideEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportData {
    pub original_name: Option<String>,
    pub import_path: String,
    pub import_kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceData {}

// =============================================================================
// REFERENCES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    FunctionCall,
    MethodCall,
    ConstructorCall,
    TypeReference,
    Assignment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub name: String,
    pub location: Location,
    pub data: ReferenceData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind_data")]
pub enum ReferenceData {
    FunctionCall {
        target_symbol_id: Option<SymbolId>,
    },
    MethodCall {
        receiver_location: Location,
    },
    ConstructorCall(ConstructorCallData),
    TypeReference {
        type_info: TypeInfo,
    },
    Assignment {
        assignment_type: Option<AssignmentType>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorCallData {
    pub construct_target: Option<SymbolId>,
    pub arguments_count: u32,
    pub is_new_expression: bool,
    pub is_factory_method: bool,
    pub is_enum_variant: bool,
    pub is_tuple_struct: bool,
    pub is_macro_invocation: bool,
    pub is_smart_pointer: bool,
    pub is_default_construction: bool,
    pub is_super_call: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub type_name: String,
    pub certainty: Certainty,
    pub generics: Vec<String>,
}

// =============================================================================
// INDEX
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Python,
    Rust,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Python => "python",
            Self::Rust => "rust",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "javascript" => Some(Self::Javascript),
            "typescript" => Some(Self::Typescript),
            "python" => Some(Self::Python),
            "rust" => Some(Self::Rust),
            _ => None,
        }
    }
}

/// The per-file semantic index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    pub file_path: String,
    pub language: Option<Language>,
    pub scopes: ScopeTree,
    pub functions: Vec<Definition>,
    pub classes: Vec<Definition>,
    pub interfaces: Vec<Definition>,
    pub enums: Vec<Definition>,
    pub types: Vec<Definition>,
    pub namespaces: Vec<Definition>,
    pub variables: Vec<Definition>,
    pub imported_symbols: Vec<Definition>,
    pub references: Vec<Reference>,
}

impl Index {
    pub fn new(file_path: impl Into<String>, language: Language) -> Self {
        Self {
            file_path: file_path.into(),
            language: Some(language),
            ..Default::default()
        }
    }

    /// Total number of top-level (non-nested) definitions.
    pub fn definition_count(&self) -> usize {
        self.functions.len()
            + self.classes.len()
            + self.interfaces.len()
            + self.enums.len()
            + self.types.len()
            + self.namespaces.len()
            + self.variables.len()
            + self.imported_symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(sl: u32, sc: u32, el: u32, ec: u32) -> Location {
        Location::new("f.rs", sl, sc, el, ec)
    }

    #[test]
    fn location_contains() {
        let outer = loc(1, 0, 10, 0);
        let inner = loc(2, 0, 3, 0);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn tightest_enclosing_prefers_narrower_scope() {
        let mut tree = ScopeTree::default();
        tree.root_id = "root".to_string();
        tree.scopes.push(Scope {
            id: "root".into(),
            kind: ScopeKind::Module,
            parent_id: None,
            location: loc(1, 0, 100, 0),
            name: None,
        });
        tree.scopes.push(Scope {
            id: "fn1".into(),
            kind: ScopeKind::Function,
            parent_id: Some("root".into()),
            location: loc(5, 0, 10, 0),
            name: Some("f".into()),
        });

        let found = tree.tightest_enclosing(6, 0).unwrap();
        assert_eq!(found.id, "fn1");
        let found_outside = tree.tightest_enclosing(50, 0).unwrap();
        assert_eq!(found_outside.id, "root");
    }

    #[test]
    fn default_definition_flags_empty() {
        assert_eq!(DefinitionFlags::default(), DefinitionFlags::empty());
    }
}
