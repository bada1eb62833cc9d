//! Compilation-unit compilation
//!
//! Two phases, matching the build's concurrency model. The stateless parse
//! phase turns one `.java` source into a [`ParsedUnit`]: package, imports,
//! and every non-private type with its members' signature headers carved out
//! of the source text, Javadoc attached. The serial assemble phase feeds
//! those signatures through the registration driver and produces one
//! reStructuredText document per type, nested types included, with pending
//! references collected for the post-registration resolution pass.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Tree};

use crate::context::DocumentContext;
use crate::doc::{Directive, Document};
use crate::driver::register_declaration;
use crate::error::{JavadoxError, Result};
use crate::javadoc::JavadocConverter;
use crate::nodes::{cross_refs, plain};
use crate::registry::{Reference, SymbolRegistry};
use crate::signature::DeclarationKind;

/// A parsed compilation unit, ready for assembly (and for caching)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedUnit {
    /// Declared package, empty for the default package
    pub package: String,
    /// `(package, simple name)` pairs from non-static, non-wildcard imports
    pub imports: Vec<(String, String)>,
    /// Top-level non-private types
    pub types: Vec<ParsedType>,
}

/// One type declaration with carved signatures for it and its members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedType {
    pub name: String,
    pub signature: String,
    pub javadoc: Option<String>,
    pub members: Vec<ParsedMember>,
    pub nested: Vec<ParsedType>,
}

/// A field, method, or constructor with its carved signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedMember {
    pub kind: DeclarationKind,
    pub signature: String,
    pub javadoc: Option<String>,
}

/// A reference awaiting resolution once the registry is fully populated
#[derive(Debug, Clone)]
pub struct PendingReference {
    /// Reference text as written (role targets keep their `~` marker)
    pub raw: String,
    pub reference: Reference,
    /// Prose references get rewritten in the output; signature references
    /// are validated only
    pub in_prose: bool,
}

/// One assembled output document
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    /// Output-relative document name without suffix, e.g. `com/example/Widget`
    pub docname: String,
    pub package: String,
    /// Dotted type name, e.g. `Widget.Builder` for a nested type
    pub name: String,
    /// reStructuredText content, before reference rewriting
    pub text: String,
    pub references: Vec<PendingReference>,
    /// Duplicate-symbol warnings raised while registering this document
    pub duplicates: usize,
}

impl CompiledDocument {
    /// File basename for this document (nested-type dots become dashes)
    pub fn file_basename(&self) -> String {
        self.name.replace('.', "-")
    }
}

/// Compiles parsed units into documents
pub struct Compiler {
    converter: JavadocConverter,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            converter: JavadocConverter::new(),
        }
    }

    // ------------------------------------------------------------------
    // Parse phase (stateless, parallel-safe)
    // ------------------------------------------------------------------

    /// Parse one compilation unit; fatal to the file on any syntax error
    pub fn parse_unit(source: &str, path: &Path) -> Result<ParsedUnit> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| JavadoxError::ParseFailure {
                path: path.display().to_string(),
                message: format!("failed to load Java grammar: {:?}", e),
            })?;

        let tree: Tree = parser
            .parse(source, None)
            .ok_or_else(|| JavadoxError::ParseFailure {
                path: path.display().to_string(),
                message: "parser returned no tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(JavadoxError::ParseFailure {
                path: path.display().to_string(),
                message: "syntax error in compilation unit".to_string(),
            });
        }

        let mut unit = ParsedUnit {
            package: String::new(),
            imports: Vec::new(),
            types: Vec::new(),
        };

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    unit.package = package_name(&child, source);
                }
                "import_declaration" => {
                    if let Some(import) = import_entry(&child, source) {
                        unit.imports.push(import);
                    }
                }
                "class_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "annotation_type_declaration" => {
                    if !is_private(&child, source) {
                        unit.types.push(parse_type(&child, source));
                    }
                }
                _ => {}
            }
        }

        Ok(unit)
    }

    // ------------------------------------------------------------------
    // Assemble phase (serial; writes the registry)
    // ------------------------------------------------------------------

    /// Assemble one unit into documents, registering every declaration
    pub fn assemble(
        &self,
        unit: &ParsedUnit,
        registry: &mut SymbolRegistry,
    ) -> Result<Vec<CompiledDocument>> {
        let mut documents = Vec::new();
        for ty in &unit.types {
            self.assemble_type(unit, ty, &[], registry, &mut documents)?;
        }
        Ok(documents)
    }

    fn assemble_type(
        &self,
        unit: &ParsedUnit,
        ty: &ParsedType,
        outer: &[String],
        registry: &mut SymbolRegistry,
        documents: &mut Vec<CompiledDocument>,
    ) -> Result<()> {
        let dotted = if outer.is_empty() {
            ty.name.clone()
        } else {
            format!("{}.{}", outer.join("."), ty.name)
        };
        let file_basename = dotted.replace('.', "-");
        let docname = if unit.package.is_empty() {
            file_basename
        } else {
            format!("{}/{}", unit.package.replace('.', "/"), file_basename)
        };

        let mut ctx = DocumentContext::new(&docname);
        if !unit.package.is_empty() {
            ctx.set_package(&unit.package);
        }
        for (package, simple_name) in &unit.imports {
            ctx.add_import(package, simple_name);
        }
        for name in outer {
            ctx.push_type(name);
        }

        // Clear-before-rebuild: drop anything a previous compilation of this
        // document registered
        registry.clear_document(&docname);

        let mut duplicates = 0usize;
        let mut references = Vec::new();

        let registered =
            register_declaration(&ty.signature, DeclarationKind::Type, &ctx, registry)?;
        if registered.duplicate.is_some() {
            duplicates += 1;
        }
        for xref in cross_refs(&registered.nodes) {
            references.push(PendingReference {
                raw: xref.target.clone(),
                reference: Reference::from_cross_ref(xref),
                in_prose: false,
            });
        }

        let mut document = Document::new();
        document.add_heading(&dotted, '=');

        if !unit.package.is_empty() {
            let mut package_directive =
                Directive::with_argument("java:package", &unit.package);
            package_directive.add_option("noindex", "");
            document.add_directive(&package_directive);
        }
        for (package, simple_name) in &unit.imports {
            document.add_directive(&Directive::with_argument(
                "java:import",
                &format!("{} {}", package, simple_name),
            ));
        }
        document.add_directive(&Directive::with_argument(
            "index",
            &format!("single: {}", registered.index_text),
        ));

        let mut type_directive =
            Directive::with_argument("java:type", &plain(&registered.nodes));

        // The type itself is in scope for its own description and members
        ctx.push_type(&ty.name);

        if let Some(javadoc) = &ty.javadoc {
            let converted = self.converter.convert(javadoc);
            if !converted.body.is_empty() {
                type_directive.add_content(&converted.body);
            }
            for raw in converted.references {
                references.push(PendingReference {
                    reference: Reference::parse(&raw, &ctx),
                    raw,
                    in_prose: true,
                });
            }
        }

        for member in &ty.members {
            let registered =
                register_declaration(&member.signature, member.kind, &ctx, registry)?;
            if registered.duplicate.is_some() {
                duplicates += 1;
            }
            for xref in cross_refs(&registered.nodes) {
                references.push(PendingReference {
                    raw: xref.target.clone(),
                    reference: Reference::from_cross_ref(xref),
                    in_prose: false,
                });
            }

            let mut member_directive = Directive::with_argument(
                member_directive_name(member.kind),
                &plain(&registered.nodes),
            );
            if let Some(javadoc) = &member.javadoc {
                let converted = self.converter.convert(javadoc);
                if !converted.body.is_empty() {
                    member_directive.add_content(&converted.body);
                }
                for raw in converted.references {
                    references.push(PendingReference {
                        reference: Reference::parse(&raw, &ctx),
                        raw,
                        in_prose: true,
                    });
                }
            }
            type_directive.add_content(&member_directive.build());
        }

        document.add_directive(&type_directive);

        documents.push(CompiledDocument {
            docname,
            package: unit.package.clone(),
            name: dotted.clone(),
            text: document.build(),
            references,
            duplicates,
        });

        // Nested types become their own documents
        let mut inner_outer = outer.to_vec();
        inner_outer.push(ty.name.clone());
        for nested in &ty.nested {
            self.assemble_type(unit, nested, &inner_outer, registry, documents)?;
        }

        Ok(())
    }
}

fn member_directive_name(kind: DeclarationKind) -> &'static str {
    match kind {
        DeclarationKind::Field => "java:field",
        DeclarationKind::Method => "java:method",
        DeclarationKind::Constructor => "java:constructor",
        DeclarationKind::Type => "java:type",
    }
}

// ======================================================================
// Tree walking helpers (parse phase)
// ======================================================================

fn node_text<'s>(node: &Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Text of the dotted name inside a package declaration
fn package_name(node: &Node, source: &str) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "scoped_identifier" | "identifier") {
            return node_text(&child, source).to_string();
        }
    }
    String::new()
}

/// `(package, simple name)` for a plain type import; `None` for static or
/// wildcard imports
fn import_entry(node: &Node, source: &str) -> Option<(String, String)> {
    let mut cursor = node.walk();
    let mut is_static = false;
    let mut is_wildcard = false;
    let mut path = None;
    for child in node.children(&mut cursor) {
        match child.kind() {
            "static" => is_static = true,
            "asterisk" => is_wildcard = true,
            "scoped_identifier" | "identifier" => path = Some(node_text(&child, source)),
            _ => {}
        }
    }
    if is_static || is_wildcard {
        return None;
    }
    let path = path?;
    let (package, simple_name) = path.rsplit_once('.')?;
    Some((package.to_string(), simple_name.to_string()))
}

/// Whether a declaration's modifier list contains `private`
fn is_private(node: &Node, source: &str) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifiers" {
            return node_text(&child, source)
                .split_whitespace()
                .any(|word| word == "private");
        }
    }
    false
}

/// The declaration header: everything before the body, trimmed
fn header_text(node: &Node, source: &str, body_field: &str) -> String {
    let text = match node.child_by_field_name(body_field) {
        Some(body) => &source[node.start_byte()..body.start_byte()],
        None => node_text(node, source),
    };
    text.trim().trim_end_matches('{').trim().to_string()
}

/// Javadoc comment immediately preceding a declaration, if any
fn javadoc_for(node: &Node, source: &str) -> Option<String> {
    let sibling = node.prev_named_sibling()?;
    if !matches!(sibling.kind(), "block_comment" | "comment") {
        return None;
    }
    let text = node_text(&sibling, source);
    if text.starts_with("/**") {
        Some(text.to_string())
    } else {
        None
    }
}

fn parse_type(node: &Node, source: &str) -> ParsedType {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_default();

    let mut ty = ParsedType {
        signature: header_text(node, source, "body"),
        javadoc: javadoc_for(node, source),
        members: Vec::new(),
        nested: Vec::new(),
        name,
    };

    if let Some(body) = node.child_by_field_name("body") {
        match node.kind() {
            "enum_declaration" => parse_enum_body(&body, source, &mut ty),
            _ => parse_member_container(&body, source, &mut ty),
        }
    }
    ty
}

/// Walk a class, interface, or annotation body for members and nested types
fn parse_member_container(body: &Node, source: &str, ty: &mut ParsedType) {
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if is_private(&child, source) {
            continue;
        }
        match child.kind() {
            "field_declaration" | "constant_declaration" => {
                for signature in field_signatures(&child, source) {
                    ty.members.push(ParsedMember {
                        kind: DeclarationKind::Field,
                        signature,
                        javadoc: javadoc_for(&child, source),
                    });
                }
            }
            "method_declaration" => {
                ty.members.push(ParsedMember {
                    kind: DeclarationKind::Method,
                    signature: header_text(&child, source, "body"),
                    javadoc: javadoc_for(&child, source),
                });
            }
            "constructor_declaration" => {
                ty.members.push(ParsedMember {
                    kind: DeclarationKind::Constructor,
                    signature: header_text(&child, source, "body"),
                    javadoc: javadoc_for(&child, source),
                });
            }
            "annotation_type_element_declaration" => {
                ty.members.push(ParsedMember {
                    kind: DeclarationKind::Method,
                    signature: annotation_element_signature(&child, source),
                    javadoc: javadoc_for(&child, source),
                });
            }
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "annotation_type_declaration" => {
                ty.nested.push(parse_type(&child, source));
            }
            _ => {}
        }
    }
}

/// Enum bodies hold constants (documented as fields of the enum's own type)
/// followed by ordinary member declarations
fn parse_enum_body(body: &Node, source: &str, ty: &mut ParsedType) {
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "enum_constant" => {
                if let Some(name) = child.child_by_field_name("name") {
                    ty.members.push(ParsedMember {
                        kind: DeclarationKind::Field,
                        signature: format!(
                            "public static final {} {}",
                            ty.name,
                            node_text(&name, source)
                        ),
                        javadoc: javadoc_for(&child, source),
                    });
                }
            }
            "enum_body_declarations" => parse_member_container(&child, source, ty),
            _ => {}
        }
    }
}

/// One signature per declarator, so multi-variable fields document cleanly;
/// non-literal initializers are dropped here
fn field_signatures(node: &Node, source: &str) -> Vec<String> {
    let mut modifiers = String::new();
    let mut field_type = String::new();
    let mut signatures = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "modifiers" => {
                modifiers = node_text(&child, source)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
            }
            "variable_declarator" => {
                if let Some(signature) =
                    declarator_signature(&child, source, &modifiers, &field_type)
                {
                    signatures.push(signature);
                }
            }
            _ => {
                if node.child_by_field_name("type").map(|n| n.id()) == Some(child.id()) {
                    field_type = node_text(&child, source).to_string();
                }
            }
        }
    }
    signatures
}

fn declarator_signature(
    declarator: &Node,
    source: &str,
    modifiers: &str,
    field_type: &str,
) -> Option<String> {
    let name = declarator.child_by_field_name("name")?;
    let mut rendered = String::new();
    if !modifiers.is_empty() {
        rendered.push_str(modifiers);
        rendered.push(' ');
    }
    rendered.push_str(field_type);
    rendered.push(' ');
    rendered.push_str(node_text(&name, source));

    let mut cursor = declarator.walk();
    for child in declarator.children(&mut cursor) {
        if child.kind() == "dimensions" {
            rendered.push_str(node_text(&child, source));
        }
    }

    if let Some(value) = declarator.child_by_field_name("value") {
        if is_literal_node(&value) {
            rendered.push_str(" = ");
            rendered.push_str(node_text(&value, source));
        }
    }
    Some(rendered)
}

fn is_literal_node(node: &Node) -> bool {
    matches!(
        node.kind(),
        "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal"
            | "string_literal"
            | "character_literal"
            | "true"
            | "false"
            | "null_literal"
    )
}

/// `String value() default "x";` documents as `String value()`
fn annotation_element_signature(node: &Node, source: &str) -> String {
    let text = node_text(node, source).trim().trim_end_matches(';').trim();
    match text.find(" default ") {
        Some(index) => text[..index].trim().to_string(),
        None => text.to_string(),
    }
}
