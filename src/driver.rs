//! Per-declaration registration driver
//!
//! Orchestrates one declaration end to end: parse the signature, render it,
//! compute the disambiguating descriptor and fully-qualified name, insert it
//! into the registry, and produce the index-entry text. Scope (package and
//! outer-type chain) comes from the caller's [`DocumentContext`]; entering
//! and leaving nested type bodies is the caller's responsibility via
//! `push_type`/`pop_type`.

use crate::context::DocumentContext;
use crate::error::Result;
use crate::nodes::SignatureNode;
use crate::registry::{DuplicateSymbol, SymbolKind, SymbolRegistry};
use crate::render::SignatureRenderer;
use crate::signature::{parse_signature, Declaration, DeclarationKind};

/// Everything produced for one registered declaration
#[derive(Debug, Clone)]
pub struct RegisteredDeclaration {
    /// The parsed declaration
    pub declaration: Declaration,
    /// Rendered signature nodes, cross-reference placeholders included
    pub nodes: Vec<SignatureNode>,
    /// Name plus parameter key for members, plain name otherwise
    pub descriptor: String,
    /// Registered fully-qualified name
    pub fullname: String,
    pub kind: SymbolKind,
    /// Index entry, e.g. `get (Java method)`
    pub index_text: String,
    /// Present when this registration displaced another document's entry
    pub duplicate: Option<DuplicateSymbol>,
}

/// Parse, render, and register a single declaration signature
pub fn register_declaration(
    signature: &str,
    expected: DeclarationKind,
    ctx: &DocumentContext,
    registry: &mut SymbolRegistry,
) -> Result<RegisteredDeclaration> {
    let declaration = parse_signature(signature, expected)?;
    let renderer = SignatureRenderer::new(ctx);

    let (rendered, kind, index_name, index_kind) = match &declaration {
        Declaration::Type(t) => (
            renderer.type_declaration(t),
            SymbolKind::Type,
            t.name.clone(),
            format!("Java {}", t.kind.as_str()),
        ),
        Declaration::Field(f) => {
            let rendered = renderer.field(f);
            let name = rendered.descriptor.clone();
            (rendered, SymbolKind::Field, name, "Java field".to_string())
        }
        Declaration::Method(m) => (
            renderer.method(m),
            SymbolKind::Method,
            m.name.clone(),
            "Java method".to_string(),
        ),
        Declaration::Constructor(c) => (
            renderer.constructor(c),
            SymbolKind::Constructor,
            c.name.clone(),
            "Java constructor".to_string(),
        ),
    };

    let fullname = ctx.qualified_name(&rendered.descriptor);
    let basename = fullname
        .split('(')
        .next()
        .unwrap_or(&fullname)
        .to_string();

    let duplicate = registry.register(&fullname, ctx.document(), kind, &basename);

    Ok(RegisteredDeclaration {
        declaration,
        nodes: rendered.nodes,
        descriptor: rendered.descriptor,
        fullname,
        kind,
        index_text: format!("{} ({})", index_name, index_kind),
        duplicate,
    })
}

/// Register a package symbol for the document that indexes it
pub fn register_package(
    package: &str,
    document: &str,
    registry: &mut SymbolRegistry,
) -> (String, Option<DuplicateSymbol>) {
    let duplicate = registry.register(package, document, SymbolKind::Package, package);
    (format!("{} (package)", package), duplicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DocumentContext {
        let mut ctx = DocumentContext::new("com/example/Widget");
        ctx.set_package("com.example");
        ctx.push_type("Widget");
        ctx
    }

    #[test]
    fn test_method_registration() {
        let ctx = ctx();
        let mut registry = SymbolRegistry::new();
        let reg = register_declaration(
            "public List<String> get(int index)",
            DeclarationKind::Method,
            &ctx,
            &mut registry,
        )
        .unwrap();

        assert_eq!(reg.descriptor, "get(int)");
        assert_eq!(reg.fullname, "com.example.Widget.get(int)");
        assert_eq!(reg.index_text, "get (Java method)");
        let entry = registry.get("com.example.Widget.get(int)").unwrap();
        assert_eq!(entry.kind, SymbolKind::Method);
        assert_eq!(entry.basename, "com.example.Widget.get");
        assert_eq!(entry.document, "com/example/Widget");
    }

    #[test]
    fn test_type_registration_index_text() {
        let mut ctx = DocumentContext::new("com/example/Widget");
        ctx.set_package("com.example");
        let mut registry = SymbolRegistry::new();
        let reg = register_declaration(
            "public interface Widget",
            DeclarationKind::Type,
            &ctx,
            &mut registry,
        )
        .unwrap();
        assert_eq!(reg.index_text, "Widget (Java interface)");
        assert_eq!(reg.fullname, "com.example.Widget");
    }

    #[test]
    fn test_field_registration() {
        let ctx = ctx();
        let mut registry = SymbolRegistry::new();
        let reg = register_declaration(
            "public static final int MAX_SIZE = 100;",
            DeclarationKind::Field,
            &ctx,
            &mut registry,
        )
        .unwrap();
        assert_eq!(reg.fullname, "com.example.Widget.MAX_SIZE");
        assert_eq!(reg.index_text, "MAX_SIZE (Java field)");
    }

    #[test]
    fn test_kind_mismatch_propagates() {
        let ctx = ctx();
        let mut registry = SymbolRegistry::new();
        let err = register_declaration(
            "int size;",
            DeclarationKind::Constructor,
            &ctx,
            &mut registry,
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected constructor"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_across_documents_reported() {
        let mut registry = SymbolRegistry::new();
        let mut ctx_a = DocumentContext::new("a");
        ctx_a.set_package("com.example");
        ctx_a.push_type("Foo");
        let mut ctx_b = DocumentContext::new("b");
        ctx_b.set_package("com.example");
        ctx_b.push_type("Foo");

        let first =
            register_declaration("void bar()", DeclarationKind::Method, &ctx_a, &mut registry)
                .unwrap();
        assert!(first.duplicate.is_none());

        let second =
            register_declaration("void bar()", DeclarationKind::Method, &ctx_b, &mut registry)
                .unwrap();
        let dup = second.duplicate.expect("duplicate expected");
        assert_eq!(dup.previous_document, "a");
        assert_eq!(dup.document, "b");
        assert_eq!(registry.get("com.example.Foo.bar()").unwrap().document, "b");
    }

    #[test]
    fn test_package_registration() {
        let mut registry = SymbolRegistry::new();
        let (index_text, duplicate) =
            register_package("com.example", "com/example/package-index", &mut registry);
        assert_eq!(index_text, "com.example (package)");
        assert!(duplicate.is_none());
        assert_eq!(
            registry.get("com.example").unwrap().kind,
            SymbolKind::Package
        );
    }
}
