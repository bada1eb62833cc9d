//! Structured representation of Java declaration signatures
//!
//! These trees are produced by the signature parser and consumed by the
//! renderers. They cover the declaration subset of the Java grammar: types,
//! fields, methods, and constructors, with generics, bounded wildcards,
//! varargs, and array dimensions.

use serde::{Deserialize, Serialize};

/// A possibly-nested, possibly-generic, possibly-array reference type mention
///
/// `Outer.Inner<T>[]` parses to a two-link chain via `sub_type`, with
/// `dimensions` stored on the outermost link and rendered once after the
/// full dotted chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    /// Simple identifier of this chain link
    pub name: String,
    /// Generic arguments of this link, empty when non-generic
    pub arguments: Vec<TypeArgument>,
    /// Nested link for `Outer.Inner` forms
    pub sub_type: Option<Box<TypeReference>>,
    /// Trailing `[]` count; meaningful only on the outermost link
    pub dimensions: usize,
}

impl TypeReference {
    /// A plain, non-generic reference to `name`
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments: Vec::new(),
            sub_type: None,
            dimensions: 0,
        }
    }

    /// Number of links in the `sub_type` chain (at least 1)
    pub fn chain_len(&self) -> usize {
        1 + self.sub_type.as_ref().map_or(0, |s| s.chain_len())
    }

    /// Dotted name of the full chain, without generics or dimensions
    pub fn dotted_name(&self) -> String {
        match &self.sub_type {
            Some(sub) => format!("{}.{}", self.name, sub.dotted_name()),
            None => self.name.clone(),
        }
    }
}

/// One generic type argument: a concrete type or a wildcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeArgument {
    /// A concrete reference type
    Reference(TypeReference),
    /// `?`, or `? extends T` / `? super T`
    Wildcard(Option<WildcardBound>),
}

/// The bound of a non-trivial wildcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildcardBound {
    pub kind: BoundKind,
    pub bound: TypeReference,
}

/// Direction of a wildcard bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundKind {
    Extends,
    Super,
}

impl BoundKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Extends => "extends",
            Self::Super => "super",
        }
    }
}

/// A primitive Java type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl Primitive {
    /// Canonical spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "boolean" => Some(Self::Boolean),
            "byte" => Some(Self::Byte),
            "short" => Some(Self::Short),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "char" => Some(Self::Char),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }
}

/// Any type usable in a declaration position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JavaType {
    /// `void`, valid only as a method return type
    Void,
    /// A primitive, possibly an array of primitives
    Primitive { kind: Primitive, dimensions: usize },
    /// A reference type chain
    Reference(TypeReference),
}

/// Java declaration modifier keywords, ordered by canonical rendering rank
///
/// The discriminant order is the canonical display order: access modifiers,
/// then `static`, then `abstract`/`final`, then the remaining keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Default,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Static => "static",
            Self::Abstract => "abstract",
            Self::Final => "final",
            Self::Default => "default",
            Self::Native => "native",
            Self::Synchronized => "synchronized",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
            Self::Strictfp => "strictfp",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            "static" => Some(Self::Static),
            "abstract" => Some(Self::Abstract),
            "final" => Some(Self::Final),
            "default" => Some(Self::Default),
            "native" => Some(Self::Native),
            "synchronized" => Some(Self::Synchronized),
            "transient" => Some(Self::Transient),
            "volatile" => Some(Self::Volatile),
            "strictfp" => Some(Self::Strictfp),
            _ => None,
        }
    }
}

/// Annotations plus keyword modifiers attached to a declaration
///
/// Keyword modifiers are deduplicated on insertion; annotations keep their
/// source order. Rendering order is canonical regardless of input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierSet {
    annotations: Vec<String>,
    modifiers: Vec<Modifier>,
}

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword modifier, ignoring duplicates
    pub fn add(&mut self, modifier: Modifier) {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
    }

    /// Add an annotation by simple name (without the leading `@`)
    pub fn add_annotation(&mut self, name: &str) {
        self.annotations.push(name.to_string());
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.modifiers.is_empty()
    }

    /// Annotations in source order
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Keyword modifiers sorted into canonical order
    pub fn canonical(&self) -> Vec<Modifier> {
        let mut out = self.modifiers.clone();
        out.sort();
        out
    }
}

/// A generic type parameter with optional bounds (`T extends A & B`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: Vec<TypeReference>,
}

/// A method or constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub ty: JavaType,
    pub name: String,
    pub varargs: bool,
}

/// One variable declared by a field declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub name: String,
    /// C-style trailing `[]` count on the declarator itself
    pub dimensions: usize,
    /// Verbatim literal initializer token, when the initializer is a literal
    pub initializer: Option<String>,
}

/// Kind keyword of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    /// Kind name as used in index entries (`Java class`, `Java annotation`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Annotation => "annotation",
        }
    }

    /// Declaration keyword as rendered in a signature
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Annotation => "@interface",
        }
    }
}

/// A class, interface, enum, or annotation declaration header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub modifiers: ModifierSet,
    pub kind: TypeKind,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    /// Single entry for a class, possibly many for an interface
    pub extends: Vec<TypeReference>,
    pub implements: Vec<TypeReference>,
}

/// A field declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub modifiers: ModifierSet,
    pub ty: JavaType,
    pub declarators: Vec<VariableDeclarator>,
}

/// A method declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub modifiers: ModifierSet,
    pub type_parameters: Vec<TypeParameter>,
    pub return_type: JavaType,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeReference>,
}

/// A constructor declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDeclaration {
    pub modifiers: ModifierSet,
    pub type_parameters: Vec<TypeParameter>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeReference>,
}

/// A parsed declaration of any kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Declaration {
    Type(TypeDeclaration),
    Field(FieldDeclaration),
    Method(MethodDeclaration),
    Constructor(ConstructorDeclaration),
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Self::Type(_) => DeclarationKind::Type,
            Self::Field(_) => DeclarationKind::Field,
            Self::Method(_) => DeclarationKind::Method,
            Self::Constructor(_) => DeclarationKind::Constructor,
        }
    }
}

/// Closed set of declaration kinds, used as the expected-kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    Type,
    Field,
    Method,
    Constructor,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Field => "field",
            Self::Method => "method",
            Self::Constructor => "constructor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_set_dedup() {
        let mut mods = ModifierSet::new();
        mods.add(Modifier::Final);
        mods.add(Modifier::Public);
        mods.add(Modifier::Final);
        mods.add(Modifier::Static);
        assert_eq!(
            mods.canonical(),
            vec![Modifier::Public, Modifier::Static, Modifier::Final]
        );
    }

    #[test]
    fn test_canonical_order_is_input_order_independent() {
        let mut a = ModifierSet::new();
        a.add(Modifier::Static);
        a.add(Modifier::Public);
        let mut b = ModifierSet::new();
        b.add(Modifier::Public);
        b.add(Modifier::Static);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn test_chain_len_and_dotted_name() {
        let inner = TypeReference::plain("Entry");
        let mut outer = TypeReference::plain("Map");
        outer.sub_type = Some(Box::new(inner));
        assert_eq!(outer.chain_len(), 2);
        assert_eq!(outer.dotted_name(), "Map.Entry");
    }

    #[test]
    fn test_primitive_spelling_roundtrip() {
        for kw in ["boolean", "byte", "short", "int", "long", "char", "float", "double"] {
            assert_eq!(Primitive::from_keyword(kw).unwrap().as_str(), kw);
        }
        assert!(Primitive::from_keyword("String").is_none());
    }
}
