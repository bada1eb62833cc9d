//! Java declaration signature parsing
//!
//! A signature is a single declaration header carved out of a compilation
//! unit: `public static final int MAX_SIZE = 100`, `List<String> get(int
//! index)`, `public class Shape extends Figure`. This module turns such
//! strings into the structured [`ast`] model consumed by the renderers.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{
    BoundKind, ConstructorDeclaration, Declaration, DeclarationKind, FieldDeclaration, JavaType,
    MethodDeclaration, Modifier, ModifierSet, Parameter, Primitive, TypeArgument, TypeDeclaration,
    TypeKind, TypeParameter, TypeReference, VariableDeclarator, WildcardBound,
};
pub use parser::{parse_member_signature, parse_signature, parse_type_signature};
