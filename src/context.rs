//! Per-compilation-unit documentation context
//!
//! Tracks the current package, the stack of enclosing type names, and the
//! import map while one source document is processed. A fresh context is
//! built for every document; leaking one across documents is a correctness
//! bug.

use std::collections::HashMap;

/// Scoped state for the document currently being processed
#[derive(Debug, Clone)]
pub struct DocumentContext {
    document: String,
    package: Option<String>,
    outer_types: Vec<String>,
    imports: HashMap<String, String>,
}

impl DocumentContext {
    /// Start a context for the named output document
    pub fn new(document: &str) -> Self {
        Self {
            document: document.to_string(),
            package: None,
            outer_types: Vec::new(),
            imports: HashMap::new(),
        }
    }

    /// Name of the document under construction
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn set_package(&mut self, package: &str) {
        self.package = Some(package.to_string());
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Record that `simple_name` is declared in `package`
    pub fn add_import(&mut self, package: &str, simple_name: &str) {
        self.imports
            .insert(simple_name.to_string(), package.to_string());
    }

    /// Declaring package of an imported simple name
    pub fn import_of(&self, simple_name: &str) -> Option<&str> {
        self.imports.get(simple_name).map(String::as_str)
    }

    /// Enter a type body; every member registered until the matching
    /// [`pop_type`](Self::pop_type) is qualified by this name
    pub fn push_type(&mut self, name: &str) {
        self.outer_types.push(name.to_string());
    }

    pub fn pop_type(&mut self) {
        self.outer_types.pop();
    }

    /// Dotted chain of enclosing type names, empty at top level
    pub fn outer_type(&self) -> String {
        self.outer_types.join(".")
    }

    /// Fully-qualified name of a declaration at the current scope:
    /// `package.outerchain.name` with absent parts and their dots omitted
    pub fn qualified_name(&self, name: &str) -> String {
        let outer = self.outer_type();
        let mut parts: Vec<&str> = Vec::new();
        if let Some(package) = self.package.as_deref() {
            if !package.is_empty() {
                parts.push(package);
            }
        }
        if !outer.is_empty() {
            parts.push(&outer);
        }
        if !name.is_empty() {
            parts.push(name);
        }
        parts.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_composition() {
        let mut ctx = DocumentContext::new("com/example/Foo");
        assert_eq!(ctx.qualified_name("Foo"), "Foo");

        ctx.set_package("com.example");
        assert_eq!(ctx.qualified_name("Foo"), "com.example.Foo");

        ctx.push_type("Foo");
        ctx.push_type("Inner");
        assert_eq!(ctx.qualified_name("bar()"), "com.example.Foo.Inner.bar()");

        ctx.pop_type();
        assert_eq!(ctx.qualified_name("bar()"), "com.example.Foo.bar()");
    }

    #[test]
    fn test_import_map() {
        let mut ctx = DocumentContext::new("doc");
        ctx.add_import("java.util", "List");
        assert_eq!(ctx.import_of("List"), Some("java.util"));
        assert_eq!(ctx.import_of("Map"), None);
    }
}
