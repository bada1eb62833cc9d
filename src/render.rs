//! Signature rendering into typed node sequences
//!
//! Walks a declaration's types outer-to-inner and produces the node model in
//! `nodes`: one cross-reference placeholder per reference-chain link, plain
//! text for punctuation and primitives, trailing array brackets emitted once
//! after the full dotted chain. Import-map lookups happen here, at
//! formatting time.

use crate::context::DocumentContext;
use crate::format;
use crate::nodes::{CrossRef, ParameterNode, SignatureNode};
use crate::signature::ast::{
    ConstructorDeclaration, FieldDeclaration, JavaType, MethodDeclaration, TypeArgument,
    TypeDeclaration, TypeKind, TypeReference,
};

/// A fully rendered declaration signature
#[derive(Debug, Clone)]
pub struct RenderedSignature {
    pub nodes: Vec<SignatureNode>,
    /// Registry descriptor: the declared name, with a parenthesized
    /// parameter key for methods and constructors
    pub descriptor: String,
}

/// Renders declaration signatures against one document's context
pub struct SignatureRenderer<'a> {
    ctx: &'a DocumentContext,
}

impl<'a> SignatureRenderer<'a> {
    pub fn new(ctx: &'a DocumentContext) -> Self {
        Self { ctx }
    }

    /// Cross-reference placeholder for `target`, displayed as `display`
    fn make_xref(&self, target: &str, display: &str) -> SignatureNode {
        let (package, imported) = match self.ctx.import_of(target) {
            Some(package) => (Some(package.to_string()), true),
            None => (self.ctx.package().map(str::to_string), false),
        };
        SignatureNode::XRef(CrossRef {
            display: display.to_string(),
            target: target.to_string(),
            outer_type: self.ctx.outer_type(),
            package,
            imported,
        })
    }

    /// Render any type into display nodes
    ///
    /// Primitives and `void` are plain text; reference chains get one
    /// cross-reference per link with generics expanded recursively.
    pub fn type_nodes(&self, ty: &JavaType) -> Vec<SignatureNode> {
        match ty {
            JavaType::Void => vec![SignatureNode::Text("void".to_string())],
            JavaType::Primitive { kind, dimensions } => vec![SignatureNode::Text(format!(
                "{}{}",
                kind.as_str(),
                "[]".repeat(*dimensions)
            ))],
            JavaType::Reference(reference) => self.reference_nodes(reference),
        }
    }

    fn reference_nodes(&self, reference: &TypeReference) -> Vec<SignatureNode> {
        let dim = "[]".repeat(reference.dimensions);
        let mut parts = Vec::new();
        let mut target = reference.name.clone();
        let mut link = Some(reference);

        while let Some(current) = link {
            parts.push(self.make_xref(&target, &current.name));

            if !current.arguments.is_empty() {
                parts.push(SignatureNode::Text("<".to_string()));
                for (i, argument) in current.arguments.iter().enumerate() {
                    if i > 0 {
                        parts.push(SignatureNode::Text(", ".to_string()));
                    }
                    parts.extend(self.type_argument_nodes(argument));
                }
                parts.push(SignatureNode::Text(">".to_string()));
            }

            link = current.sub_type.as_deref();
            if let Some(next) = link {
                target.push('.');
                target.push_str(&next.name);
                parts.push(SignatureNode::Text(".".to_string()));
            } else if !dim.is_empty() {
                parts.push(SignatureNode::Text(dim.clone()));
            }
        }

        parts
    }

    fn type_argument_nodes(&self, argument: &TypeArgument) -> Vec<SignatureNode> {
        match argument {
            TypeArgument::Reference(reference) => self.reference_nodes(reference),
            TypeArgument::Wildcard(None) => vec![SignatureNode::Text("?".to_string())],
            TypeArgument::Wildcard(Some(bound)) => {
                let mut parts = vec![SignatureNode::Text(format!("? {} ", bound.kind.keyword()))];
                parts.extend(self.reference_nodes(&bound.bound));
                parts
            }
        }
    }

    /// Render an `extends`/`implements`/`throws` list, `", "`-joined
    pub fn type_list_nodes(&self, types: &[TypeReference]) -> Vec<SignatureNode> {
        let mut parts = Vec::new();
        for (i, reference) in types.iter().enumerate() {
            if i > 0 {
                parts.push(SignatureNode::Text(", ".to_string()));
            }
            parts.extend(self.reference_nodes(reference));
        }
        parts
    }

    fn modifier_nodes(&self, rendered: String, parts: &mut Vec<SignatureNode>) {
        if !rendered.is_empty() {
            parts.push(SignatureNode::Text(format!("{} ", rendered)));
        }
    }

    fn parameter_nodes(&self, parameters: &[crate::signature::ast::Parameter]) -> SignatureNode {
        SignatureNode::Parameters(
            parameters
                .iter()
                .map(|parameter| ParameterNode {
                    type_nodes: self.type_nodes(&parameter.ty),
                    varargs: parameter.varargs,
                    name: parameter.name.clone(),
                })
                .collect(),
        )
    }

    /// Render a method signature
    pub fn method(&self, method: &MethodDeclaration) -> RenderedSignature {
        let mut parts = Vec::new();
        self.modifier_nodes(format::modifiers(&method.modifiers), &mut parts);

        let type_params = format::type_params(&method.type_parameters);
        if !type_params.is_empty() {
            parts.push(SignatureNode::Text(format!("{} ", type_params)));
        }

        parts.push(SignatureNode::TypeGroup(
            self.type_nodes(&method.return_type),
        ));
        parts.push(SignatureNode::Text(" ".to_string()));
        parts.push(SignatureNode::Name(method.name.clone()));
        parts.push(self.parameter_nodes(&method.parameters));

        RenderedSignature {
            nodes: parts,
            descriptor: format::member_descriptor(&method.name, &method.parameters),
        }
    }

    /// Render a constructor signature
    pub fn constructor(&self, constructor: &ConstructorDeclaration) -> RenderedSignature {
        let mut parts = Vec::new();
        self.modifier_nodes(format::modifiers(&constructor.modifiers), &mut parts);
        parts.push(SignatureNode::Name(constructor.name.clone()));
        parts.push(self.parameter_nodes(&constructor.parameters));

        RenderedSignature {
            nodes: parts,
            descriptor: format::member_descriptor(&constructor.name, &constructor.parameters),
        }
    }

    /// Render a field signature; exactly one declarator is expected
    /// (enforced by the parser)
    pub fn field(&self, field: &FieldDeclaration) -> RenderedSignature {
        let declarator = &field.declarators[0];
        let mut parts = Vec::new();
        self.modifier_nodes(format::modifiers(&field.modifiers), &mut parts);

        parts.push(SignatureNode::TypeGroup(self.type_nodes(&field.ty)));
        parts.push(SignatureNode::Text(" ".to_string()));
        parts.push(SignatureNode::Name(declarator.name.clone()));

        if declarator.dimensions > 0 {
            parts.push(SignatureNode::Text("[]".repeat(declarator.dimensions)));
        }
        if let Some(literal) = &declarator.initializer {
            parts.push(SignatureNode::Text(format!(" = {}", literal)));
        }

        RenderedSignature {
            nodes: parts,
            descriptor: declarator.name.clone(),
        }
    }

    /// Render a type declaration header
    pub fn type_declaration(&self, declaration: &TypeDeclaration) -> RenderedSignature {
        let mut parts = Vec::new();
        self.modifier_nodes(format::modifiers(&declaration.modifiers), &mut parts);

        parts.push(SignatureNode::Text(format!(
            "{} ",
            declaration.kind.keyword()
        )));
        parts.push(SignatureNode::Name(declaration.name.clone()));

        if matches!(declaration.kind, TypeKind::Class | TypeKind::Interface) {
            let type_params = format::type_params(&declaration.type_parameters);
            if !type_params.is_empty() {
                parts.push(SignatureNode::Text(type_params));
            }
        }

        match declaration.kind {
            TypeKind::Class => {
                if let Some(superclass) = declaration.extends.first() {
                    parts.push(SignatureNode::Text(" extends ".to_string()));
                    parts.extend(self.reference_nodes(superclass));
                }
                if !declaration.implements.is_empty() {
                    parts.push(SignatureNode::Text(" implements ".to_string()));
                    parts.extend(self.type_list_nodes(&declaration.implements));
                }
            }
            TypeKind::Interface => {
                if !declaration.extends.is_empty() {
                    parts.push(SignatureNode::Text(" extends ".to_string()));
                    parts.extend(self.type_list_nodes(&declaration.extends));
                }
            }
            TypeKind::Enum => {
                if !declaration.implements.is_empty() {
                    parts.push(SignatureNode::Text(" implements ".to_string()));
                    parts.extend(self.type_list_nodes(&declaration.implements));
                }
            }
            TypeKind::Annotation => {}
        }

        RenderedSignature {
            nodes: parts,
            descriptor: declaration.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{cross_refs, plain};
    use crate::signature::parser::{parse_member_signature, parse_type_signature};
    use crate::signature::Declaration;

    fn ctx() -> DocumentContext {
        let mut ctx = DocumentContext::new("com/example/Widget");
        ctx.set_package("com.example");
        ctx
    }

    fn render_method(ctx: &DocumentContext, signature: &str) -> RenderedSignature {
        match parse_member_signature(signature).unwrap() {
            Declaration::Method(m) => SignatureRenderer::new(ctx).method(&m),
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_method_plain_form_and_key() {
        let ctx = ctx();
        let rendered = render_method(&ctx, "List<String> get(int index)");
        assert_eq!(plain(&rendered.nodes), "List<String> get(int index)");
        assert_eq!(rendered.descriptor, "get(int)");
    }

    #[test]
    fn test_modifiers_canonicalized_in_output() {
        let ctx = ctx();
        let rendered = render_method(&ctx, "final static public void reset()");
        assert_eq!(plain(&rendered.nodes), "public static final void reset()");
    }

    #[test]
    fn test_array_brackets_after_full_chain() {
        let ctx = ctx();
        let rendered = render_method(&ctx, "Map.Entry<K, V>[] entries()");
        let text = plain(&rendered.nodes);
        assert_eq!(text, "Map.Entry<K, V>[] entries()");
        // brackets never appear between chain links
        assert!(!text.contains("Map[]"));
    }

    #[test]
    fn test_chain_xref_targets_accumulate() {
        let ctx = ctx();
        let rendered = render_method(&ctx, "Map.Entry<K, V> first()");
        let refs = cross_refs(&rendered.nodes);
        let targets: Vec<&str> = refs.iter().map(|r| r.target.as_str()).collect();
        assert!(targets.contains(&"Map"));
        assert!(targets.contains(&"Map.Entry"));
    }

    #[test]
    fn test_imported_type_carries_its_package() {
        let mut ctx = ctx();
        ctx.add_import("java.util", "List");
        let rendered = render_method(&ctx, "List<String> all()");
        let refs = cross_refs(&rendered.nodes);
        let list = refs.iter().find(|r| r.target == "List").unwrap();
        assert!(list.imported);
        assert_eq!(list.package.as_deref(), Some("java.util"));
        let string = refs.iter().find(|r| r.target == "String").unwrap();
        assert!(!string.imported);
        assert_eq!(string.package.as_deref(), Some("com.example"));
    }

    #[test]
    fn test_primitives_render_without_xref() {
        let ctx = ctx();
        let rendered = render_method(&ctx, "int[] codes(double rate)");
        let text = plain(&rendered.nodes);
        assert_eq!(text, "int[] codes(double rate)");
        let refs = cross_refs(&rendered.nodes);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_wildcard_forms() {
        let ctx = ctx();
        let rendered = render_method(&ctx, "void copy(List<? super T> dst, List<? extends T> src)");
        let text = plain(&rendered.nodes);
        assert!(text.contains("List<? super T>"));
        assert!(text.contains("List<? extends T>"));

        let rendered = render_method(&ctx, "List<?> any()");
        assert!(plain(&rendered.nodes).contains("List<?>"));
    }

    #[test]
    fn test_varargs_rendering() {
        let ctx = ctx();
        let rendered = render_method(&ctx, "String format(String fmt, Object... args)");
        assert_eq!(
            plain(&rendered.nodes),
            "String format(String fmt, Object... args)"
        );
    }

    #[test]
    fn test_field_with_literal_initializer() {
        let ctx = ctx();
        let field = match parse_member_signature("public static final int MAX_SIZE = 100").unwrap()
        {
            Declaration::Field(f) => f,
            other => panic!("expected field, got {:?}", other),
        };
        let rendered = SignatureRenderer::new(&ctx).field(&field);
        assert_eq!(
            plain(&rendered.nodes),
            "public static final int MAX_SIZE = 100"
        );
        assert_eq!(rendered.descriptor, "MAX_SIZE");
    }

    #[test]
    fn test_type_declaration_rendering() {
        let ctx = ctx();
        let declaration =
            parse_type_signature("public class ArrayList<E> extends AbstractList<E> implements List<E>")
                .unwrap();
        let rendered = SignatureRenderer::new(&ctx).type_declaration(&declaration);
        assert_eq!(
            plain(&rendered.nodes),
            "public class ArrayList<E> extends AbstractList<E> implements List<E>"
        );
        assert_eq!(rendered.descriptor, "ArrayList");

        let declaration = parse_type_signature("public @interface Inject").unwrap();
        let rendered = SignatureRenderer::new(&ctx).type_declaration(&declaration);
        assert_eq!(plain(&rendered.nodes), "public @interface Inject");
    }

    #[test]
    fn test_structural_round_trip() {
        // parse -> render -> re-parse keeps chain length, argument count,
        // and wildcard bound kinds
        let ctx = ctx();
        let source = "Map.Entry<String, List<? extends Number>>[] flatten()";
        let first = match parse_member_signature(source).unwrap() {
            Declaration::Method(m) => m,
            other => panic!("expected method, got {:?}", other),
        };
        let rendered = SignatureRenderer::new(&ctx).method(&first);
        let reparsed = match parse_member_signature(&plain(&rendered.nodes)).unwrap() {
            Declaration::Method(m) => m,
            other => panic!("expected method, got {:?}", other),
        };
        assert_eq!(first.return_type, reparsed.return_type);
    }
}
