//! Canonical textual forms of modifiers, type parameters, and parameter keys
//!
//! These renderings are shared between signature display and the
//! disambiguation keys that distinguish overloaded members: the key for
//! `List<String> get(int index)` is `get(int)`, generics erased.

use crate::signature::ast::{
    JavaType, ModifierSet, Parameter, TypeArgument, TypeParameter, TypeReference,
};

/// Render a modifier set in canonical order: annotations first, then the
/// keyword modifiers ranked access / static / abstract-final / remaining.
/// Duplicate keywords are dropped; input order is irrelevant.
pub fn modifiers(mods: &ModifierSet) -> String {
    let mut parts: Vec<String> = mods
        .annotations()
        .iter()
        .map(|name| format!("@{}", name))
        .collect();
    parts.extend(mods.canonical().iter().map(|m| m.as_str().to_string()));
    parts.join(" ")
}

/// Render a generic type-parameter list as `<T, U extends Bound>`
///
/// Returns an empty string for an empty list so callers can append
/// unconditionally.
pub fn type_params(params: &[TypeParameter]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|param| {
            if param.bounds.is_empty() {
                param.name.clone()
            } else {
                let bounds: Vec<String> =
                    param.bounds.iter().map(reference_text).collect();
                format!("{} extends {}", param.name, bounds.join(" & "))
            }
        })
        .collect();
    format!("<{}>", rendered.join(", "))
}

/// Full textual form of a reference type, generic arguments included
pub fn reference_text(reference: &TypeReference) -> String {
    let mut out = String::new();
    let mut link = Some(reference);
    while let Some(current) = link {
        out.push_str(&current.name);
        if !current.arguments.is_empty() {
            let arguments: Vec<String> =
                current.arguments.iter().map(argument_text).collect();
            out.push('<');
            out.push_str(&arguments.join(", "));
            out.push('>');
        }
        link = current.sub_type.as_deref();
        if link.is_some() {
            out.push('.');
        }
    }
    out.push_str(&"[]".repeat(reference.dimensions));
    out
}

fn argument_text(argument: &TypeArgument) -> String {
    match argument {
        TypeArgument::Reference(reference) => reference_text(reference),
        TypeArgument::Wildcard(None) => "?".to_string(),
        TypeArgument::Wildcard(Some(bound)) => {
            format!("? {} {}", bound.kind.keyword(), reference_text(&bound.bound))
        }
    }
}

/// Erasure-style rendering of a type: the dotted chain without generic
/// arguments, with array brackets preserved
pub fn erased_type(ty: &JavaType) -> String {
    match ty {
        JavaType::Void => "void".to_string(),
        JavaType::Primitive { kind, dimensions } => {
            format!("{}{}", kind.as_str(), "[]".repeat(*dimensions))
        }
        JavaType::Reference(reference) => {
            format!(
                "{}{}",
                reference.dotted_name(),
                "[]".repeat(reference.dimensions)
            )
        }
    }
}

/// Canonical parameter-type key for a parameter list, generics erased
///
/// This is the disambiguation suffix: `(int, String)` in `get(int, String)`.
pub fn parameter_key(params: &[Parameter]) -> String {
    let types: Vec<String> = params.iter().map(|p| erased_type(&p.ty)).collect();
    types.join(", ")
}

/// Member descriptor: name plus parenthesized parameter key
pub fn member_descriptor(name: &str, params: &[Parameter]) -> String {
    format!("{}({})", name, parameter_key(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::ast::{Modifier, Primitive, TypeReference};

    #[test]
    fn test_modifier_rendering_order_independent() {
        let mut a = ModifierSet::new();
        a.add(Modifier::Final);
        a.add(Modifier::Static);
        a.add(Modifier::Public);
        a.add(Modifier::Static);
        assert_eq!(modifiers(&a), "public static final");
    }

    #[test]
    fn test_annotations_render_first() {
        let mut mods = ModifierSet::new();
        mods.add(Modifier::Public);
        mods.add_annotation("Override");
        assert_eq!(modifiers(&mods), "@Override public");
    }

    #[test]
    fn test_type_params() {
        assert_eq!(type_params(&[]), "");
        let params = vec![
            TypeParameter {
                name: "T".to_string(),
                bounds: vec![],
            },
            TypeParameter {
                name: "U".to_string(),
                bounds: vec![TypeReference::plain("Number")],
            },
        ];
        assert_eq!(type_params(&params), "<T, U extends Number>");
    }

    #[test]
    fn test_type_param_bounds_keep_generics() {
        let mut comparable = TypeReference::plain("Comparable");
        comparable.arguments = vec![crate::signature::ast::TypeArgument::Reference(
            TypeReference::plain("T"),
        )];
        let params = vec![TypeParameter {
            name: "T".to_string(),
            bounds: vec![comparable],
        }];
        assert_eq!(type_params(&params), "<T extends Comparable<T>>");
    }

    #[test]
    fn test_erased_type_drops_generics() {
        let mut list = TypeReference::plain("List");
        list.arguments = vec![crate::signature::ast::TypeArgument::Reference(
            TypeReference::plain("String"),
        )];
        assert_eq!(erased_type(&JavaType::Reference(list)), "List");
    }

    #[test]
    fn test_erased_type_keeps_arrays_and_chain() {
        let mut entry = TypeReference::plain("Map");
        entry.sub_type = Some(Box::new(TypeReference::plain("Entry")));
        entry.dimensions = 2;
        assert_eq!(erased_type(&JavaType::Reference(entry)), "Map.Entry[][]");
        assert_eq!(
            erased_type(&JavaType::Primitive {
                kind: Primitive::Int,
                dimensions: 1
            }),
            "int[]"
        );
    }

    #[test]
    fn test_member_descriptor() {
        let params = vec![
            Parameter {
                ty: JavaType::Primitive {
                    kind: Primitive::Int,
                    dimensions: 0,
                },
                name: "index".to_string(),
                varargs: false,
            },
            Parameter {
                ty: JavaType::Reference(TypeReference::plain("String")),
                name: "value".to_string(),
                varargs: false,
            },
        ];
        assert_eq!(member_descriptor("put", &params), "put(int, String)");
        assert_eq!(member_descriptor("clear", &[]), "clear()");
    }
}
