//! Definition Extractor
//!
//! Walks the tree once per file and emits a [`Definition`] for every
//! function, method, class-shaped type, type alias, variable, parameter,
//! import, and namespace it recognizes. Runs after the scope builder and
//! consults its [`ScopeTree`] read-only: a definition's `defining_scope_id`
//! is always found by position lookup against the already-built tree, never
//! by tracking a parallel scope stack here.
//!
//! Methods and parameters are not flat index buckets; they nest inside the
//! [`FunctionData`]/[`MethodData`]/[`TypeData`] of the definition that owns
//! them. A method declared inside a class/trait/interface body is built
//! while that body's direct children are being walked. A Rust method is
//! different: `impl` blocks are syntactically separate from the
//! struct/enum they extend, so Rust methods are collected into a pending
//! list and merged into their owning type's `TypeData` once the whole file
//! has been walked.

use tree_sitter::Node;

use crate::lang::container_kinds;
use crate::symbol::{self, SymbolComponents};
use crate::tree::{children, location_of, named_children, SourceView};
use crate::types::{
    AssignmentType, Certainty, Definition, DefinitionData, DefinitionFlags, DefinitionKind,
    EnumMember, FunctionCollection, FunctionData, ImportData, ImportKind, Language, Location,
    MethodData, NamespaceData, ParameterData, PropertyData, ScopeId, ScopeTree, TypeAliasData,
    TypeData, TypeShape, VariableData, VariantShape, Visibility,
};

#[derive(Debug, Default)]
pub struct DefinitionSink {
    pub functions: Vec<Definition>,
    pub classes: Vec<Definition>,
    pub interfaces: Vec<Definition>,
    pub enums: Vec<Definition>,
    pub types: Vec<Definition>,
    pub namespaces: Vec<Definition>,
    pub variables: Vec<Definition>,
    pub imported_symbols: Vec<Definition>,
}

struct PendingImpl {
    type_name: String,
    trait_name: Option<String>,
    methods: Vec<Definition>,
}

struct Context<'a> {
    file_path: &'a str,
    source: SourceView<'a>,
    scopes: &'a ScopeTree,
    name_stack: Vec<String>,
    sink: DefinitionSink,
    pending_impls: Vec<PendingImpl>,
}

impl<'a> Context<'a> {
    fn scope_for(&self, loc: &Location) -> ScopeId {
        self.scopes
            .tightest_enclosing(loc.start_line, loc.start_column)
            .map(|s| s.id.clone())
            .unwrap_or_else(|| self.scopes.root_id.clone())
    }

    fn symbol_for(&self, name: &str) -> String {
        symbol::construct_symbol(&SymbolComponents::new(self.file_path, self.name_stack.clone(), name))
    }

    fn text(&self, node: Node) -> String {
        self.source.text_of(node).to_string()
    }
}

pub fn extract_definitions(
    file_path: &str,
    language: Language,
    source: SourceView,
    root: Node,
    scopes: &ScopeTree,
) -> DefinitionSink {
    let mut ctx = Context {
        file_path,
        source,
        scopes,
        name_stack: Vec::new(),
        sink: DefinitionSink::default(),
        pending_impls: Vec::new(),
    };

    match language {
        Language::Javascript => walk_js(&mut ctx, root, false),
        Language::Typescript => walk_js(&mut ctx, root, true),
        Language::Python => walk_python(&mut ctx, root),
        Language::Rust => walk_rust(&mut ctx, root),
    }

    if !ctx.pending_impls.is_empty() {
        merge_rust_impls(&mut ctx.sink, ctx.pending_impls);
    }

    ctx.sink
}

fn merge_rust_impls(sink: &mut DefinitionSink, pending: Vec<PendingImpl>) {
    for impl_block in pending {
        let target = sink
            .classes
            .iter_mut()
            .chain(sink.interfaces.iter_mut())
            .find(|d| d.name == impl_block.type_name);
        if let Some(def) = target {
            if let DefinitionData::Type(data) = &mut def.data {
                data.methods.extend(impl_block.methods);
                if let Some(trait_name) = impl_block.trait_name {
                    data.implements.push(trait_name);
                }
            }
        }
        // No matching type in this file (e.g. extending an imported type):
        // the methods are dropped rather than invented a home for them.
    }
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    children(node).iter().any(|c| c.kind() == kind)
}

fn is_exported(node: Node) -> bool {
    node.parent().map(|p| p.kind() == "export_statement").unwrap_or(false)
}

fn anonymous_name(loc: &Location) -> String {
    SymbolComponents::anonymous_name(loc.start_line, loc.start_column)
}

// ===========================================================================
// JavaScript / TypeScript
// ===========================================================================

fn walk_js(ctx: &mut Context, node: Node, ts: bool) {
    for child in children(node) {
        match child.kind() {
            "function_declaration" | "function_expression" | "generator_function_declaration"
            | "generator_function" => {
                let def = js_function(ctx, child);
                ctx.name_stack.push(def.name.clone());
                if let Some(body) = child.child_by_field_name("body") {
                    walk_js(ctx, body, ts);
                }
                ctx.name_stack.pop();
                ctx.sink.functions.push(def);
            }
            "class_declaration" | "class_expression" => {
                let def = js_class(ctx, child, ts);
                ctx.sink.classes.push(def);
            }
            "interface_declaration" if ts => {
                let def = js_interface(ctx, child);
                ctx.sink.interfaces.push(def);
            }
            "enum_declaration" if ts => {
                let def = js_enum(ctx, child);
                ctx.sink.enums.push(def);
            }
            "type_alias_declaration" if ts => {
                let def = js_type_alias(ctx, child);
                ctx.sink.types.push(def);
            }
            "lexical_declaration" | "variable_declaration" => {
                js_variables(ctx, child);
            }
            "import_statement" => {
                js_import(ctx, child);
            }
            "arrow_function" => {
                let def = js_arrow_function(ctx, child);
                ctx.name_stack.push(def.name.clone());
                if let Some(body) = child.child_by_field_name("body") {
                    walk_js(ctx, body, ts);
                }
                ctx.name_stack.pop();
                ctx.sink.functions.push(def);
            }
            _ => walk_js(ctx, child, ts),
        }
    }
}

/// Arrow functions never carry a `name` field — they're anonymous at the
/// syntax level even when bound to a variable (`const f = x => x`), so this
/// always uses the anonymous `<anonymous>:line:col` symbol name.
fn js_arrow_function(ctx: &Context, node: Node) -> Definition {
    let loc = location_of(ctx.file_path, node);
    let name = anonymous_name(&loc);
    let mut flags = DefinitionFlags::empty();
    if has_child_kind(node, "async") {
        flags |= DefinitionFlags::IS_ASYNC;
    }
    let body_scope = node
        .child_by_field_name("body")
        .map(|b| ctx.scope_for(&location_of(ctx.file_path, b)))
        .unwrap_or_else(|| ctx.scope_for(&loc));
    let parameters = if let Some(params) = node.child_by_field_name("parameters") {
        js_parameters(ctx, params, &body_scope)
    } else if let Some(param) = node.child_by_field_name("parameter") {
        js_parameter(ctx, param, &body_scope).into_iter().collect()
    } else {
        Vec::new()
    };
    Definition {
        kind: DefinitionKind::Function,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Function(FunctionData {
            parameters,
            return_type: node.child_by_field_name("return_type").map(|n| ctx.text(n)),
            generics: Vec::new(),
            callback_context: None,
            function_collection: None,
            derived_from: None,
        }),
    }
}

fn js_function(ctx: &Context, node: Node) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if is_exported(node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    if has_child_kind(node, "async") {
        flags |= DefinitionFlags::IS_ASYNC;
    }
    let body_scope = node
        .child_by_field_name("body")
        .map(|b| ctx.scope_for(&location_of(ctx.file_path, b)))
        .unwrap_or_else(|| ctx.scope_for(&loc));
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| js_parameters(ctx, p, &body_scope))
        .unwrap_or_default();
    Definition {
        kind: DefinitionKind::Function,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Function(FunctionData {
            parameters,
            return_type: node.child_by_field_name("return_type").map(|n| ctx.text(n)),
            generics: node
                .child_by_field_name("type_parameters")
                .map(|n| vec![ctx.text(n)])
                .unwrap_or_default(),
            callback_context: None,
            function_collection: None,
            derived_from: None,
        }),
    }
}

fn js_parameters(ctx: &Context, params: Node, owning_scope: &ScopeId) -> Vec<Definition> {
    named_children(params)
        .into_iter()
        .filter_map(|p| js_parameter(ctx, p, owning_scope))
        .collect()
}

fn js_parameter(ctx: &Context, node: Node, owning_scope: &ScopeId) -> Option<Definition> {
    let (name_node, type_annotation, default_value, optional) = match node.kind() {
        "identifier" => (Some(node), None, None, false),
        "required_parameter" | "optional_parameter" => (
            node.child_by_field_name("pattern"),
            node.child_by_field_name("type").map(|n| ctx.text(n)),
            node.child_by_field_name("value").map(|n| ctx.text(n)),
            node.kind() == "optional_parameter",
        ),
        "assignment_pattern" => (
            node.child_by_field_name("left"),
            None,
            node.child_by_field_name("right").map(|n| ctx.text(n)),
            false,
        ),
        "rest_pattern" | "object_pattern" | "array_pattern" => (Some(node), None, None, false),
        _ => return None,
    };
    let name_node = name_node?;
    let loc = location_of(ctx.file_path, name_node);
    let name = ctx.text(name_node);
    let mut flags = DefinitionFlags::empty();
    if optional {
        flags |= DefinitionFlags::IS_OPTIONAL;
    }
    Some(Definition {
        kind: DefinitionKind::Parameter,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: owning_scope.clone(),
        flags,
        data: DefinitionData::Parameter(ParameterData { type_annotation, default_value }),
    })
}

fn js_class(ctx: &mut Context, node: Node, ts: bool) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if is_exported(node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }

    let mut extends = Vec::new();
    let mut implements = Vec::new();
    if let Some(heritage) = named_children(node).into_iter().find(|c| c.kind() == "class_heritage") {
        for clause in named_children(heritage) {
            match clause.kind() {
                "extends_clause" => extends.extend(named_children(clause).iter().map(|n| ctx.text(*n))),
                "implements_clause" if ts => implements.extend(named_children(clause).iter().map(|n| ctx.text(*n))),
                _ => {}
            }
        }
    }

    ctx.name_stack.push(name.clone());
    let mut methods = Vec::new();
    let mut properties = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        for member in named_children(body) {
            match member.kind() {
                "method_definition" => methods.push(js_method(ctx, member, ts)),
                "field_definition" | "public_field_definition" => {
                    properties.push(js_property(ctx, member, ts))
                }
                _ => walk_js(ctx, member, ts),
            }
        }
    }
    ctx.name_stack.pop();

    Definition {
        kind: DefinitionKind::Class,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Type(TypeData {
            shape: TypeShape::Class,
            methods,
            properties,
            members: Vec::new(),
            generics: node.child_by_field_name("type_parameters").map(|n| vec![ctx.text(n)]).unwrap_or_default(),
            extends,
            implements,
        }),
    }
}

fn js_method(ctx: &mut Context, node: Node, ts: bool) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if has_child_kind(node, "async") {
        flags |= DefinitionFlags::IS_ASYNC;
    }
    if has_child_kind(node, "static") {
        flags |= DefinitionFlags::IS_STATIC;
    }
    let visibility = if ts && has_child_kind(node, "accessibility_modifier") {
        let modifier_text = children(node)
            .into_iter()
            .find(|c| c.kind() == "accessibility_modifier")
            .map(|n| ctx.text(n))
            .unwrap_or_default();
        match modifier_text.as_str() {
            "private" => Visibility::Private,
            "protected" => Visibility::Protected,
            _ => Visibility::Public,
        }
    } else {
        Visibility::None
    };

    let body_scope = node
        .child_by_field_name("body")
        .map(|b| ctx.scope_for(&location_of(ctx.file_path, b)))
        .unwrap_or_else(|| ctx.scope_for(&loc));
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| js_parameters(ctx, p, &body_scope))
        .unwrap_or_default();

    ctx.name_stack.push(name.clone());
    if let Some(body) = node.child_by_field_name("body") {
        walk_js(ctx, body, ts);
    }
    ctx.name_stack.pop();

    Definition {
        kind: DefinitionKind::Method,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Method(MethodData {
            parameters,
            return_type: node.child_by_field_name("return_type").map(|n| ctx.text(n)),
            decorators: Vec::new(),
            visibility,
            callback_context: None,
        }),
    }
}

fn js_property(ctx: &Context, node: Node, ts: bool) -> PropertyData {
    let name_node = node.child_by_field_name("property").or_else(|| node.child_by_field_name("name"));
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_default();
    let visibility = if ts && has_child_kind(node, "accessibility_modifier") {
        Visibility::Private
    } else {
        Visibility::None
    };
    PropertyData {
        name,
        type_annotation: node.child_by_field_name("type").map(|n| ctx.text(n)),
        is_static: has_child_kind(node, "static"),
        visibility,
        location: location_of(ctx.file_path, node),
    }
}

fn js_interface(ctx: &mut Context, node: Node) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut extends = Vec::new();
    if let Some(heritage) = named_children(node).into_iter().find(|c| c.kind() == "extends_type_clause") {
        extends.extend(named_children(heritage).iter().map(|n| ctx.text(*n)));
    }
    ctx.name_stack.push(name.clone());
    let mut methods = Vec::new();
    let mut properties = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        for member in named_children(body) {
            match member.kind() {
                "method_signature" => methods.push(js_method(ctx, member, true)),
                "property_signature" => properties.push(js_property(ctx, member, true)),
                _ => {}
            }
        }
    }
    ctx.name_stack.pop();
    let mut flags = DefinitionFlags::empty();
    if is_exported(node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    Definition {
        kind: DefinitionKind::Interface,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Type(TypeData {
            shape: TypeShape::Interface,
            methods,
            properties,
            members: Vec::new(),
            generics: node.child_by_field_name("type_parameters").map(|n| vec![ctx.text(n)]).unwrap_or_default(),
            extends,
            implements: Vec::new(),
        }),
    }
}

fn js_enum(ctx: &Context, node: Node) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let members = node
        .child_by_field_name("body")
        .map(|body| {
            named_children(body)
                .into_iter()
                .filter_map(|m| {
                    let member_name = match m.kind() {
                        "property_identifier" => Some(ctx.text(m)),
                        "enum_assignment" => m.child_by_field_name("name").map(|n| ctx.text(n)),
                        _ => None,
                    }?;
                    Some(EnumMember { name: member_name, shape: VariantShape::Unit, location: location_of(ctx.file_path, m) })
                })
                .collect()
        })
        .unwrap_or_default();
    let mut flags = DefinitionFlags::empty();
    if is_exported(node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    Definition {
        kind: DefinitionKind::Enum,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Type(TypeData {
            shape: TypeShape::Enum,
            methods: Vec::new(),
            properties: Vec::new(),
            members,
            generics: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
        }),
    }
}

fn js_type_alias(ctx: &Context, node: Node) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if is_exported(node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    let defining_scope_id = ctx.scope_for(&loc);
    Definition {
        kind: DefinitionKind::TypeAlias,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id,
        flags,
        data: DefinitionData::TypeAlias(TypeAliasData {
            type_expression: node.child_by_field_name("value").map(|n| ctx.text(n)).unwrap_or_default(),
            generics: node.child_by_field_name("type_parameters").map(|n| vec![ctx.text(n)]).unwrap_or_default(),
        }),
    }
}

fn js_variables(ctx: &mut Context, node: Node) {
    let exported = is_exported(node);
    for declarator in named_children(node) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else { continue };
        if name_node.kind() != "identifier" {
            continue; // destructuring patterns are skipped, matching the calibration elsewhere in this module
        }
        let name = ctx.text(name_node);
        let loc = location_of(ctx.file_path, declarator);
        let value = declarator.child_by_field_name("value");
        let assignment_type = declarator
            .child_by_field_name("type")
            .map(|n| AssignmentType { type_name: ctx.text(n), certainty: Certainty::Declared })
            .or_else(|| value.and_then(|v| infer_js_type(ctx, v)));
        let function_collection = value.and_then(|v| js_function_collection(ctx, v));
        let mut flags = DefinitionFlags::empty();
        if exported {
            flags |= DefinitionFlags::IS_EXPORTED;
        }
        ctx.sink.variables.push(Definition {
            kind: DefinitionKind::Variable,
            symbol_id: ctx.symbol_for(&name),
            name,
            location: loc.clone(),
            defining_scope_id: ctx.scope_for(&loc),
            flags,
            data: DefinitionData::Variable(VariableData { assignment_type, function_collection, derived_from: None }),
        });
        if let Some(v) = value {
            walk_js(ctx, v, true);
        }
    }
}

fn infer_js_type(ctx: &Context, value: Node) -> Option<AssignmentType> {
    let type_name = match value.kind() {
        "string" | "template_string" => "string",
        "number" => "number",
        "true" | "false" => "boolean",
        "array" => "array",
        "object" => "object",
        "new_expression" => return value.child_by_field_name("constructor").map(|c| AssignmentType {
            type_name: ctx.text(c),
            certainty: Certainty::Inferred,
        }),
        _ => return None,
    };
    Some(AssignmentType { type_name: type_name.to_string(), certainty: Certainty::Inferred })
}

fn js_function_collection(ctx: &Context, value: Node) -> Option<FunctionCollection> {
    if value.kind() != "array" {
        return None;
    }
    let elements = named_children(value);
    if elements.is_empty() || !elements.iter().all(|e| e.kind() == "identifier") {
        return None;
    }
    Some(FunctionCollection {
        collection_type: "array".to_string(),
        stored_references: elements.iter().map(|e| ctx.text(*e)).collect(),
    })
}

fn js_import(ctx: &mut Context, node: Node) {
    let import_path = node.child_by_field_name("source").map(|n| ctx.text(n)).unwrap_or_default();
    let Some(clause) = node.child_by_field_name("import_clause") else {
        let loc = location_of(ctx.file_path, node);
        ctx.sink.imported_symbols.push(Definition {
            kind: DefinitionKind::Import,
            symbol_id: ctx.symbol_for(&import_path),
            name: import_path.clone(),
            location: loc.clone(),
            defining_scope_id: ctx.scope_for(&loc),
            flags: DefinitionFlags::empty(),
            data: DefinitionData::Import(ImportData { original_name: None, import_path, import_kind: ImportKind::SideEffect }),
        });
        return;
    };
    for part in named_children(clause) {
        match part.kind() {
            "identifier" => {
                push_js_import(ctx, &import_path, ctx.text(part), None, ImportKind::Default, part);
            }
            "namespace_import" => {
                if let Some(n) = named_children(part).into_iter().next() {
                    push_js_import(ctx, &import_path, ctx.text(n), None, ImportKind::Namespace, part);
                }
            }
            "named_imports" => {
                for specifier in named_children(part) {
                    let original = specifier.child_by_field_name("name").map(|n| ctx.text(n));
                    let alias = specifier.child_by_field_name("alias").map(|n| ctx.text(n));
                    let bound_name = alias.clone().or_else(|| original.clone()).unwrap_or_default();
                    push_js_import(ctx, &import_path, bound_name, original, ImportKind::Named, specifier);
                }
            }
            _ => {}
        }
    }
}

fn push_js_import(ctx: &mut Context, import_path: &str, name: String, original_name: Option<String>, kind: ImportKind, node: Node) {
    let loc = location_of(ctx.file_path, node);
    ctx.sink.imported_symbols.push(Definition {
        kind: DefinitionKind::Import,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc.clone(),
        defining_scope_id: ctx.scope_for(&loc),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Import(ImportData { original_name, import_path: import_path.to_string(), import_kind: kind }),
    });
}

// ===========================================================================
// Python
// ===========================================================================

fn walk_python(ctx: &mut Context, node: Node) {
    for child in children(node) {
        match child.kind() {
            "function_definition" => {
                let def = python_function(ctx, child, &[]);
                ctx.name_stack.push(def.name.clone());
                if let Some(body) = child.child_by_field_name("body") {
                    walk_python(ctx, body);
                }
                ctx.name_stack.pop();
                ctx.sink.functions.push(def);
            }
            "decorated_definition" => python_decorated(ctx, child),
            "class_definition" => {
                let def = python_class(ctx, child, &[]);
                ctx.sink.classes.push(def);
            }
            "assignment" => python_assignment(ctx, child),
            "import_statement" => python_import_statement(ctx, child),
            "import_from_statement" => python_import_from(ctx, child),
            "lambda" => {
                let def = python_lambda(ctx, child);
                ctx.name_stack.push(def.name.clone());
                if let Some(body) = child.child_by_field_name("body") {
                    walk_python(ctx, body);
                }
                ctx.name_stack.pop();
                ctx.sink.functions.push(def);
            }
            _ => walk_python(ctx, child),
        }
    }
}

/// A `lambda` has no name token at all, so it always gets the anonymous
/// `<anonymous>:line:col` symbol name.
fn python_lambda(ctx: &Context, node: Node) -> Definition {
    let loc = location_of(ctx.file_path, node);
    let name = anonymous_name(&loc);
    let body_scope = node
        .child_by_field_name("body")
        .map(|b| ctx.scope_for(&location_of(ctx.file_path, b)))
        .unwrap_or_else(|| ctx.scope_for(&loc));
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| python_parameters(ctx, p, &body_scope))
        .unwrap_or_default();
    Definition {
        kind: DefinitionKind::Function,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Function(FunctionData {
            parameters,
            return_type: None,
            generics: Vec::new(),
            callback_context: None,
            function_collection: None,
            derived_from: None,
        }),
    }
}

fn python_decorators(node: Node, ctx: &Context) -> Vec<String> {
    children(node)
        .into_iter()
        .filter(|c| c.kind() == "decorator")
        .map(|d| ctx.text(d))
        .collect()
}

fn python_decorated(ctx: &mut Context, node: Node) {
    let decorators = python_decorators(node, ctx);
    let Some(inner) = node.child_by_field_name("definition") else { return };
    match inner.kind() {
        "function_definition" => {
            let def = python_function(ctx, inner, &decorators);
            ctx.name_stack.push(def.name.clone());
            if let Some(body) = inner.child_by_field_name("body") {
                walk_python(ctx, body);
            }
            ctx.name_stack.pop();
            ctx.sink.functions.push(def);
        }
        "class_definition" => {
            let def = python_class(ctx, inner, &decorators);
            ctx.sink.classes.push(def);
        }
        _ => {}
    }
}

fn python_function(ctx: &Context, node: Node, decorators: &[String]) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if has_child_kind(node, "async") {
        flags |= DefinitionFlags::IS_ASYNC;
    }
    if name.starts_with("test_") || decorators.iter().any(|d| d.contains("pytest")) {
        flags |= DefinitionFlags::IS_TEST;
    }
    let body_scope = node
        .child_by_field_name("body")
        .map(|b| ctx.scope_for(&location_of(ctx.file_path, b)))
        .unwrap_or_else(|| ctx.scope_for(&loc));
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| python_parameters(ctx, p, &body_scope))
        .unwrap_or_default();
    Definition {
        kind: DefinitionKind::Function,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Function(FunctionData {
            parameters,
            return_type: node.child_by_field_name("return_type").map(|n| ctx.text(n)),
            generics: Vec::new(),
            callback_context: None,
            function_collection: None,
            derived_from: None,
        }),
    }
}

fn python_parameters(ctx: &Context, params: Node, owning_scope: &ScopeId) -> Vec<Definition> {
    named_children(params)
        .into_iter()
        .filter_map(|p| python_parameter(ctx, p, owning_scope))
        .collect()
}

fn python_parameter(ctx: &Context, node: Node, owning_scope: &ScopeId) -> Option<Definition> {
    let (name_node, type_annotation, default_value) = match node.kind() {
        "identifier" => (Some(node), None, None),
        "typed_parameter" => (
            named_children(node).into_iter().find(|n| n.kind() == "identifier"),
            node.child_by_field_name("type").map(|n| ctx.text(n)),
            None,
        ),
        "default_parameter" => (
            node.child_by_field_name("name"),
            None,
            node.child_by_field_name("value").map(|n| ctx.text(n)),
        ),
        "typed_default_parameter" => (
            node.child_by_field_name("name"),
            node.child_by_field_name("type").map(|n| ctx.text(n)),
            node.child_by_field_name("value").map(|n| ctx.text(n)),
        ),
        "list_splat_pattern" | "dictionary_splat_pattern" => {
            (named_children(node).into_iter().next(), None, None)
        }
        _ => return None,
    };
    let name_node = name_node?;
    let loc = location_of(ctx.file_path, name_node);
    let name = ctx.text(name_node);
    Some(Definition {
        kind: DefinitionKind::Parameter,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: owning_scope.clone(),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Parameter(ParameterData { type_annotation, default_value }),
    })
}

fn python_class(ctx: &mut Context, node: Node, decorators: &[String]) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let extends = node
        .child_by_field_name("superclasses")
        .map(|n| named_children(n).iter().map(|a| ctx.text(*a)).collect())
        .unwrap_or_default();
    let _ = decorators;

    ctx.name_stack.push(name.clone());
    let mut methods = Vec::new();
    let mut properties = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        for member in named_children(body) {
            match member.kind() {
                "function_definition" => methods.push(python_method(ctx, member, &[])),
                "decorated_definition" => {
                    let decorators = python_decorators(member, ctx);
                    if let Some(inner) = member.child_by_field_name("definition") {
                        if inner.kind() == "function_definition" {
                            methods.push(python_method(ctx, inner, &decorators));
                        }
                    }
                }
                "assignment" => {
                    if let Some(prop) = python_class_property(ctx, member) {
                        properties.push(prop);
                    }
                }
                _ => walk_python(ctx, member),
            }
        }
    }
    ctx.name_stack.pop();

    Definition {
        kind: DefinitionKind::Class,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Type(TypeData {
            shape: TypeShape::Class,
            methods,
            properties,
            members: Vec::new(),
            generics: Vec::new(),
            extends,
            implements: Vec::new(),
        }),
    }
}

fn python_method(ctx: &mut Context, node: Node, decorators: &[String]) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if has_child_kind(node, "async") {
        flags |= DefinitionFlags::IS_ASYNC;
    }
    if decorators.iter().any(|d| d.contains("staticmethod") || d.contains("classmethod")) {
        flags |= DefinitionFlags::IS_STATIC;
    }
    let visibility = if name.starts_with("__") && !name.ends_with("__") {
        Visibility::Private
    } else if name.starts_with('_') {
        Visibility::Protected
    } else {
        Visibility::Public
    };

    let body_scope = node
        .child_by_field_name("body")
        .map(|b| ctx.scope_for(&location_of(ctx.file_path, b)))
        .unwrap_or_else(|| ctx.scope_for(&loc));
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| python_parameters(ctx, p, &body_scope))
        .unwrap_or_default();

    ctx.name_stack.push(name.clone());
    if let Some(body) = node.child_by_field_name("body") {
        walk_python(ctx, body);
    }
    ctx.name_stack.pop();

    Definition {
        kind: DefinitionKind::Method,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Method(MethodData {
            parameters,
            return_type: node.child_by_field_name("return_type").map(|n| ctx.text(n)),
            decorators: decorators.to_vec(),
            visibility,
            callback_context: None,
        }),
    }
}

fn python_class_property(ctx: &Context, node: Node) -> Option<PropertyData> {
    let name_node = node.child_by_field_name("left")?;
    if name_node.kind() != "identifier" {
        return None;
    }
    Some(PropertyData {
        name: ctx.text(name_node),
        type_annotation: node.child_by_field_name("type").map(|n| ctx.text(n)),
        is_static: true,
        visibility: Visibility::Public,
        location: location_of(ctx.file_path, node),
    })
}

fn python_assignment(ctx: &mut Context, node: Node) {
    let Some(name_node) = node.child_by_field_name("left") else { return };
    if name_node.kind() != "identifier" {
        return; // tuple/destructuring targets skipped
    }
    let name = ctx.text(name_node);
    let loc = location_of(ctx.file_path, node);
    let value = node.child_by_field_name("right");
    let assignment_type = node
        .child_by_field_name("type")
        .map(|n| AssignmentType { type_name: ctx.text(n), certainty: Certainty::Declared })
        .or_else(|| value.and_then(|v| infer_python_type(ctx, v)));
    ctx.sink.variables.push(Definition {
        kind: DefinitionKind::Variable,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc.clone(),
        defining_scope_id: ctx.scope_for(&loc),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Variable(VariableData { assignment_type, function_collection: None, derived_from: None }),
    });
    if let Some(v) = value {
        walk_python(ctx, v);
    }
}

fn infer_python_type(ctx: &Context, value: Node) -> Option<AssignmentType> {
    let type_name = match value.kind() {
        "string" => "str",
        "integer" => "int",
        "float" => "float",
        "true" | "false" => "bool",
        "list" => "list",
        "dictionary" => "dict",
        "call" => return value.child_by_field_name("function").map(|f| AssignmentType {
            type_name: ctx.text(f),
            certainty: Certainty::Inferred,
        }),
        _ => return None,
    };
    Some(AssignmentType { type_name: type_name.to_string(), certainty: Certainty::Inferred })
}

fn python_import_statement(ctx: &mut Context, node: Node) {
    for name in named_children(node) {
        match name.kind() {
            "dotted_name" => {
                let text = ctx.text(name);
                push_import(ctx, &text, text.clone(), None, ImportKind::Default, name);
            }
            "aliased_import" => {
                let original = name.child_by_field_name("name").map(|n| ctx.text(n)).unwrap_or_default();
                let alias = name.child_by_field_name("alias").map(|n| ctx.text(n)).unwrap_or_default();
                push_import(ctx, &original, alias, Some(original.clone()), ImportKind::Default, name);
            }
            _ => {}
        }
    }
}

fn python_import_from(ctx: &mut Context, node: Node) {
    let module = node.child_by_field_name("module_name").map(|n| ctx.text(n)).unwrap_or_default();
    for name in named_children(node) {
        match name.kind() {
            "dotted_name" | "identifier" => {
                let text = ctx.text(name);
                push_import(ctx, &module, text.clone(), Some(text), ImportKind::Named, name);
            }
            "aliased_import" => {
                let original = name.child_by_field_name("name").map(|n| ctx.text(n)).unwrap_or_default();
                let alias = name.child_by_field_name("alias").map(|n| ctx.text(n)).unwrap_or_default();
                push_import(ctx, &module, alias, Some(original), ImportKind::Named, name);
            }
            "wildcard_import" => {
                push_import(ctx, &module, "*".to_string(), None, ImportKind::Namespace, name);
            }
            _ => {}
        }
    }
}

fn push_import(ctx: &mut Context, import_path: &str, name: String, original_name: Option<String>, kind: ImportKind, node: Node) {
    let loc = location_of(ctx.file_path, node);
    ctx.sink.imported_symbols.push(Definition {
        kind: DefinitionKind::Import,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc.clone(),
        defining_scope_id: ctx.scope_for(&loc),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Import(ImportData { original_name, import_path: import_path.to_string(), import_kind: kind }),
    });
}

// ===========================================================================
// Rust
// ===========================================================================

fn walk_rust(ctx: &mut Context, node: Node) {
    for child in children(node) {
        match child.kind() {
            "function_item" => {
                let def = rust_function(ctx, child, DefinitionKind::Function);
                ctx.name_stack.push(def.name.clone());
                if let Some(body) = child.child_by_field_name("body") {
                    walk_rust(ctx, body);
                }
                ctx.name_stack.pop();
                ctx.sink.functions.push(def);
            }
            "struct_item" => {
                let def = rust_struct(ctx, child);
                ctx.sink.classes.push(def);
            }
            "enum_item" => {
                let def = rust_enum(ctx, child);
                ctx.sink.enums.push(def);
            }
            "trait_item" => {
                let def = rust_trait(ctx, child);
                ctx.sink.interfaces.push(def);
            }
            "impl_item" => rust_impl(ctx, child),
            "type_item" => ctx.sink.types.push(rust_type_alias(ctx, child)),
            "mod_item" => rust_module(ctx, child),
            "let_declaration" => rust_let(ctx, child),
            "use_declaration" => rust_use(ctx, child),
            "extern_crate_declaration" => rust_extern_crate(ctx, child),
            "closure_expression" => {
                let def = rust_closure(ctx, child);
                ctx.name_stack.push(def.name.clone());
                if let Some(body) = child.child_by_field_name("body") {
                    walk_rust(ctx, body);
                }
                ctx.name_stack.pop();
                ctx.sink.functions.push(def);
            }
            _ => walk_rust(ctx, child),
        }
    }
}

/// A closure has no name token, so it always gets the anonymous
/// `<anonymous>:line:col` symbol name, same as JS arrow functions and
/// Python lambdas.
fn rust_closure(ctx: &Context, node: Node) -> Definition {
    let loc = location_of(ctx.file_path, node);
    let name = anonymous_name(&loc);
    let body_scope = node
        .child_by_field_name("body")
        .map(|b| ctx.scope_for(&location_of(ctx.file_path, b)))
        .unwrap_or_else(|| ctx.scope_for(&loc));
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| rust_parameters(ctx, p, &body_scope))
        .unwrap_or_default();
    Definition {
        kind: DefinitionKind::Function,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Function(FunctionData {
            parameters,
            return_type: node.child_by_field_name("return_type").map(|n| ctx.text(n)),
            generics: Vec::new(),
            callback_context: None,
            function_collection: None,
            derived_from: None,
        }),
    }
}

fn rust_is_pub(ctx: &Context, node: Node) -> bool {
    children(node).into_iter().find(|c| c.kind() == "visibility_modifier").map(|v| ctx.text(v).starts_with("pub")).unwrap_or(false)
}

fn rust_function(ctx: &Context, node: Node, kind: DefinitionKind) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if rust_is_pub(ctx, node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    if has_child_kind(node, "async") {
        flags |= DefinitionFlags::IS_ASYNC;
    }
    if name.starts_with("test_") || has_attribute(node, ctx, "test") {
        flags |= DefinitionFlags::IS_TEST;
    }
    let body_scope = node
        .child_by_field_name("body")
        .map(|b| ctx.scope_for(&location_of(ctx.file_path, b)))
        .unwrap_or_else(|| ctx.scope_for(&loc));
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| rust_parameters(ctx, p, &body_scope))
        .unwrap_or_default();
    let data = FunctionData {
        parameters,
        return_type: node.child_by_field_name("return_type").map(|n| ctx.text(n)),
        generics: node.child_by_field_name("type_parameters").map(|n| vec![ctx.text(n)]).unwrap_or_default(),
        callback_context: None,
        function_collection: None,
        derived_from: None,
    };
    Definition {
        kind,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Function(data),
    }
}

/// Look for a preceding `#[name]`/`#[name(...)]` attribute_item sibling.
fn has_attribute(node: Node, ctx: &Context, name: &str) -> bool {
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.kind() != "attribute_item" {
            break;
        }
        if ctx.text(s).contains(name) {
            return true;
        }
        sibling = s.prev_sibling();
    }
    false
}

fn rust_parameters(ctx: &Context, params: Node, owning_scope: &ScopeId) -> Vec<Definition> {
    named_children(params)
        .into_iter()
        .filter_map(|p| rust_parameter(ctx, p, owning_scope))
        .collect()
}

fn rust_parameter(ctx: &Context, node: Node, owning_scope: &ScopeId) -> Option<Definition> {
    if node.kind() == "self_parameter" {
        let loc = location_of(ctx.file_path, node);
        return Some(Definition {
            kind: DefinitionKind::Parameter,
            symbol_id: ctx.symbol_for("self"),
            name: "self".to_string(),
            location: loc,
            defining_scope_id: owning_scope.clone(),
            flags: DefinitionFlags::empty(),
            data: DefinitionData::Parameter(ParameterData { type_annotation: None, default_value: None }),
        });
    }
    // Untyped closure parameters (`|x| ...`) are bare patterns, not wrapped
    // in a `parameter` node the way function parameters always are.
    let name_node = if node.kind() == "parameter" {
        node.child_by_field_name("pattern")?
    } else if node.kind() == "identifier" {
        node
    } else {
        return None;
    };
    let loc = location_of(ctx.file_path, name_node);
    let name = ctx.text(name_node);
    Some(Definition {
        kind: DefinitionKind::Parameter,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: owning_scope.clone(),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Parameter(ParameterData {
            type_annotation: node.child_by_field_name("type").map(|n| ctx.text(n)),
            default_value: None,
        }),
    })
}

fn rust_struct(ctx: &mut Context, node: Node) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if rust_is_pub(ctx, node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }

    ctx.name_stack.push(name.clone());
    let properties = node
        .child_by_field_name("body")
        .map(|body| {
            named_children(body)
                .into_iter()
                .filter(|f| f.kind() == "field_declaration")
                .map(|f| PropertyData {
                    name: f.child_by_field_name("name").map(|n| ctx.text(n)).unwrap_or_default(),
                    type_annotation: f.child_by_field_name("type").map(|n| ctx.text(n)),
                    is_static: false,
                    visibility: if rust_is_pub(ctx, f) { Visibility::Public } else { Visibility::Private },
                    location: location_of(ctx.file_path, f),
                })
                .collect()
        })
        .unwrap_or_default();
    ctx.name_stack.pop();

    Definition {
        kind: DefinitionKind::Struct,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Type(TypeData {
            shape: TypeShape::Struct,
            methods: Vec::new(),
            properties,
            members: Vec::new(),
            generics: node.child_by_field_name("type_parameters").map(|n| vec![ctx.text(n)]).unwrap_or_default(),
            extends: Vec::new(),
            implements: Vec::new(),
        }),
    }
}

fn rust_enum(ctx: &Context, node: Node) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let members = node
        .child_by_field_name("body")
        .map(|body| {
            named_children(body)
                .into_iter()
                .filter(|v| v.kind() == "enum_variant")
                .map(|v| {
                    let variant_name = v.child_by_field_name("name").map(|n| ctx.text(n)).unwrap_or_default();
                    let shape = match v.child_by_field_name("body") {
                        Some(b) if b.kind() == "field_declaration_list" => VariantShape::Struct,
                        Some(b) if b.kind() == "ordered_field_declaration_list" => VariantShape::Tuple,
                        _ => VariantShape::Unit,
                    };
                    EnumMember { name: variant_name, shape, location: location_of(ctx.file_path, v) }
                })
                .collect()
        })
        .unwrap_or_default();
    let mut flags = DefinitionFlags::empty();
    if rust_is_pub(ctx, node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    Definition {
        kind: DefinitionKind::Enum,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Type(TypeData {
            shape: TypeShape::Enum,
            methods: Vec::new(),
            properties: Vec::new(),
            members,
            generics: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
        }),
    }
}

fn rust_trait(ctx: &mut Context, node: Node) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if rust_is_pub(ctx, node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    ctx.name_stack.push(name.clone());
    let methods = node
        .child_by_field_name("body")
        .map(|body| {
            named_children(body)
                .into_iter()
                .filter(|m| m.kind() == "function_item" || m.kind() == "function_signature_item")
                .map(|m| rust_function(ctx, m, DefinitionKind::Method))
                .collect()
        })
        .unwrap_or_default();
    ctx.name_stack.pop();
    Definition {
        kind: DefinitionKind::Trait,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Type(TypeData {
            shape: TypeShape::Trait,
            methods,
            properties: Vec::new(),
            members: Vec::new(),
            generics: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
        }),
    }
}

fn rust_impl(ctx: &mut Context, node: Node) {
    let Some(type_node) = node.child_by_field_name("type") else { return };
    let type_name = ctx.text(type_node);
    let trait_name = node.child_by_field_name("trait").map(|n| ctx.text(n));

    ctx.name_stack.push(type_name.clone());
    let methods = node
        .child_by_field_name("body")
        .map(|body| {
            named_children(body)
                .into_iter()
                .filter(|m| m.kind() == "function_item")
                .map(|m| rust_function(ctx, m, DefinitionKind::Method))
                .collect()
        })
        .unwrap_or_default();
    ctx.name_stack.pop();

    if let Some(body) = node.child_by_field_name("body") {
        for member in named_children(body) {
            if member.kind() == "function_item" {
                let method_name = member.child_by_field_name("name").map(|n| ctx.text(n)).unwrap_or_default();
                ctx.name_stack.push(type_name.clone());
                ctx.name_stack.push(method_name);
                if let Some(fn_body) = member.child_by_field_name("body") {
                    walk_rust(ctx, fn_body);
                }
                ctx.name_stack.pop();
                ctx.name_stack.pop();
            }
        }
    }

    ctx.pending_impls.push(PendingImpl { type_name, trait_name, methods });
}

fn rust_type_alias(ctx: &Context, node: Node) -> Definition {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if rust_is_pub(ctx, node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    Definition {
        kind: DefinitionKind::TypeAlias,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc.clone(),
        defining_scope_id: ctx.scope_for(&loc),
        flags,
        data: DefinitionData::TypeAlias(TypeAliasData {
            type_expression: node.child_by_field_name("type").map(|n| ctx.text(n)).unwrap_or_default(),
            generics: node.child_by_field_name("type_parameters").map(|n| vec![ctx.text(n)]).unwrap_or_default(),
        }),
    }
}

fn rust_module(ctx: &mut Context, node: Node) {
    let name_node = node.child_by_field_name("name");
    let loc = location_of(ctx.file_path, node);
    let name = name_node.map(|n| ctx.text(n)).unwrap_or_else(|| anonymous_name(&loc));
    let mut flags = DefinitionFlags::empty();
    if rust_is_pub(ctx, node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    ctx.sink.namespaces.push(Definition {
        kind: DefinitionKind::Namespace,
        symbol_id: ctx.symbol_for(&name),
        name: name.clone(),
        location: loc,
        defining_scope_id: ctx.scope_for(&location_of(ctx.file_path, node)),
        flags,
        data: DefinitionData::Namespace(NamespaceData {}),
    });
    ctx.name_stack.push(name);
    if let Some(body) = node.child_by_field_name("body") {
        walk_rust(ctx, body);
    }
    ctx.name_stack.pop();
}

fn rust_let(ctx: &mut Context, node: Node) {
    let Some(pattern) = node.child_by_field_name("pattern") else { return };
    if pattern.kind() != "identifier" {
        return; // tuple/struct destructuring patterns skipped
    }
    let name = ctx.text(pattern);
    let loc = location_of(ctx.file_path, node);
    let value = node.child_by_field_name("value");
    let assignment_type = node
        .child_by_field_name("type")
        .map(|n| AssignmentType { type_name: ctx.text(n), certainty: Certainty::Declared })
        .or_else(|| value.and_then(|v| infer_rust_type(ctx, v)));
    ctx.sink.variables.push(Definition {
        kind: DefinitionKind::Variable,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc.clone(),
        defining_scope_id: ctx.scope_for(&loc),
        flags: DefinitionFlags::empty(),
        data: DefinitionData::Variable(VariableData { assignment_type, function_collection: None, derived_from: None }),
    });
    if let Some(v) = value {
        walk_rust(ctx, v);
    }
}

fn infer_rust_type(ctx: &Context, value: Node) -> Option<AssignmentType> {
    let type_name = match value.kind() {
        "string_literal" => "&str",
        "integer_literal" => "i32",
        "float_literal" => "f64",
        "boolean_literal" => "bool",
        "struct_expression" => return value.child_by_field_name("name").map(|n| AssignmentType {
            type_name: ctx.text(n),
            certainty: Certainty::Inferred,
        }),
        _ => return None,
    };
    Some(AssignmentType { type_name: type_name.to_string(), certainty: Certainty::Inferred })
}

fn rust_use(ctx: &mut Context, node: Node) {
    let Some(arg) = node.child_by_field_name("argument") else { return };
    let (name, original_name) = match arg.kind() {
        "use_as_clause" => {
            let path = arg.child_by_field_name("path").map(|n| ctx.text(n)).unwrap_or_default();
            let alias = arg.child_by_field_name("alias").map(|n| ctx.text(n)).unwrap_or_default();
            (alias, Some(path))
        }
        "scoped_identifier" => {
            let text = ctx.text(arg);
            (text.rsplit("::").next().unwrap_or(&text).to_string(), Some(text))
        }
        _ => (ctx.text(arg), None),
    };
    let loc = location_of(ctx.file_path, node);
    // `pub use` is a re-export, not a private import; reuse IS_EXPORTED the
    // same way every other `pub` item in this module does.
    let mut flags = DefinitionFlags::empty();
    if rust_is_pub(ctx, node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    ctx.sink.imported_symbols.push(Definition {
        kind: DefinitionKind::Import,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc.clone(),
        defining_scope_id: ctx.scope_for(&loc),
        flags,
        data: DefinitionData::Import(ImportData { original_name, import_path: ctx.text(arg), import_kind: ImportKind::Named }),
    });
}

fn rust_extern_crate(ctx: &mut Context, node: Node) {
    let Some(name_node) = node.child_by_field_name("name") else { return };
    let crate_name = ctx.text(name_node);
    let (name, original_name) = match node.child_by_field_name("alias") {
        Some(alias) => (ctx.text(alias), Some(crate_name.clone())),
        None => (crate_name.clone(), None),
    };
    let loc = location_of(ctx.file_path, node);
    let mut flags = DefinitionFlags::empty();
    if rust_is_pub(ctx, node) {
        flags |= DefinitionFlags::IS_EXPORTED;
    }
    ctx.sink.imported_symbols.push(Definition {
        kind: DefinitionKind::Import,
        symbol_id: ctx.symbol_for(&name),
        name,
        location: loc.clone(),
        defining_scope_id: ctx.scope_for(&loc),
        flags,
        data: DefinitionData::Import(ImportData { original_name, import_path: crate_name, import_kind: ImportKind::Default }),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::build_scopes;
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
    fn rust_function_and_parameter_are_extracted() {
        let source = "fn greet(name: &str) -> String {\n    name.to_string()\n}\n";
        let tree = parse(Language::Rust, source);
        let root = tree.root_node();
        let scopes = build_scopes("g.rs", Language::Rust, root);
        let sink = extract_definitions("g.rs", Language::Rust, SourceView::new(source), root, &scopes);
        assert_eq!(sink.functions.len(), 1);
        let f = &sink.functions[0];
        assert_eq!(f.name, "greet");
        match &f.data {
            DefinitionData::Function(data) => {
                assert_eq!(data.parameters.len(), 1);
                assert_eq!(data.parameters[0].name, "name");
            }
            _ => panic!("expected function data"),
        }
    }

    #[test]
    fn rust_impl_methods_merge_into_struct() {
        let source = "struct Counter { value: i32 }\nimpl Counter {\n    fn new() -> Self { Counter { value: 0 } }\n}\n";
        let tree = parse(Language::Rust, source);
        let root = tree.root_node();
        let scopes = build_scopes("c.rs", Language::Rust, root);
        let sink = extract_definitions("c.rs", Language::Rust, SourceView::new(source), root, &scopes);
        assert_eq!(sink.classes.len(), 1);
        match &sink.classes[0].data {
            DefinitionData::Type(data) => {
                assert_eq!(data.methods.len(), 1);
                assert_eq!(data.methods[0].name, "new");
            }
            _ => panic!("expected type data"),
        }
    }

    #[test]
    fn python_class_method_and_property_are_nested() {
        let source = "class Widget:\n    count = 0\n    def render(self):\n        return 1\n";
        let tree = parse(Language::Python, source);
        let root = tree.root_node();
        let scopes = build_scopes("w.py", Language::Python, root);
        let sink = extract_definitions("w.py", Language::Python, SourceView::new(source), root, &scopes);
        assert_eq!(sink.classes.len(), 1);
        match &sink.classes[0].data {
            DefinitionData::Type(data) => {
                assert_eq!(data.methods.len(), 1);
                assert_eq!(data.properties.len(), 1);
            }
            _ => panic!("expected type data"),
        }
    }

    #[test]
    fn typescript_interface_and_enum_are_extracted() {
        let source = "interface Shape {\n    area(): number;\n}\nenum Color { Red, Green }\n";
        let tree = parse(Language::Typescript, source);
        let root = tree.root_node();
        let scopes = build_scopes("s.ts", Language::Typescript, root);
        let sink = extract_definitions("s.ts", Language::Typescript, SourceView::new(source), root, &scopes);
        assert_eq!(sink.interfaces.len(), 1);
        assert_eq!(sink.enums.len(), 1);
        match &sink.enums[0].data {
            DefinitionData::Type(data) => assert_eq!(data.members.len(), 2),
            _ => panic!("expected type data"),
        }
    }

    #[test]
    fn javascript_named_import_is_extracted() {
        let source = "import { useState } from \"react\";\n";
        let tree = parse(Language::Javascript, source);
        let root = tree.root_node();
        let scopes = build_scopes("a.js", Language::Javascript, root);
        let sink = extract_definitions("a.js", Language::Javascript, SourceView::new(source), root, &scopes);
        assert_eq!(sink.imported_symbols.len(), 1);
        assert_eq!(sink.imported_symbols[0].name, "useState");
    }
}
