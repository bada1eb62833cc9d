//! Symbol registry and cross-reference resolution
//!
//! The registry is a process-wide, insertion-ordered table mapping
//! fully-qualified names to their source document, kind, and basename. It is
//! populated once per build by the registration driver and queried for every
//! cross-reference in every document; resolution never mutates it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::DocumentContext;
use crate::nodes::CrossRef;

/// Kind of a registered symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Package,
    Type,
    Field,
    Constructor,
    Method,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Type => "type",
            Self::Field => "field",
            Self::Constructor => "constructor",
            Self::Method => "method",
        }
    }
}

/// Registry record for one fully-qualified name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Document that declared the symbol
    pub document: String,
    pub kind: SymbolKind,
    /// Fully-qualified name with any parenthesized parameter key stripped
    pub basename: String,
}

/// Emitted when the same fully-qualified name is registered from two
/// different documents; the later registration wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSymbol {
    pub fullname: String,
    pub previous_document: String,
    pub document: String,
}

/// Resolves symbols against third-party documentation after internal
/// resolution fails
pub trait ExternalDocResolver {
    /// URL for `target`, a simple or fully-qualified name, if known
    fn resolve(&self, target: &str) -> Option<String>;
}

/// External resolver that knows no documentation sites
pub struct NoExternalDocs;

impl ExternalDocResolver for NoExternalDocs {
    fn resolve(&self, _target: &str) -> Option<String> {
        None
    }
}

/// Maps package prefixes to external Javadoc roots
///
/// `java.util.List` against root (`java`, `https://docs.oracle.com/javase/8/docs/api`)
/// resolves to `https://docs.oracle.com/javase/8/docs/api/java/util/List.html`.
#[derive(Debug, Clone, Default)]
pub struct JavadocLinks {
    roots: Vec<(String, String)>,
}

impl JavadocLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots for the JDK's own packages
    pub fn with_default_roots() -> Self {
        let mut links = Self::new();
        links.add_root("java", "https://docs.oracle.com/javase/8/docs/api");
        links.add_root("javax", "https://docs.oracle.com/javase/8/docs/api");
        links
    }

    pub fn add_root(&mut self, package_prefix: &str, base_url: &str) {
        self.roots.push((
            package_prefix.to_string(),
            base_url.trim_end_matches('/').to_string(),
        ));
    }
}

impl ExternalDocResolver for JavadocLinks {
    fn resolve(&self, target: &str) -> Option<String> {
        self.roots
            .iter()
            .find(|(prefix, _)| {
                target == prefix || target.starts_with(&format!("{}.", prefix))
            })
            .map(|(_, base)| format!("{}/{}.html", base, target.replace('.', "/")))
    }
}

/// A reference site, ready for resolution
///
/// Built either from raw reference text found in prose (with the `~`
/// short-display marker handled here) or from a signature cross-reference
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Lookup target with any leading `~` stripped
    pub target: String,
    /// Text to show when the reference renders
    pub display: String,
    pub package: Option<String>,
    pub imported: bool,
    pub outer_type: String,
}

impl Reference {
    /// Parse raw reference text against the current document context
    ///
    /// A leading `~` is stripped before lookup and switches the display to
    /// short form: the text after the last `.`, with any `(...)` suffix
    /// removed. The import-map key is the target's base type: the target
    /// without its `(...)` suffix and, when that suffix was present, without
    /// the final `.member` component.
    pub fn parse(raw: &str, ctx: &DocumentContext) -> Self {
        let target = raw.strip_prefix('~').unwrap_or(raw);

        let mut basetype = target;
        if let Some(open) = basetype.find('(') {
            basetype = &basetype[..open];
            if let Some(dot) = basetype.rfind('.') {
                basetype = &basetype[..dot];
            }
        }

        let (package, imported) = match ctx.import_of(basetype) {
            Some(package) => (Some(package.to_string()), true),
            None => (ctx.package().map(str::to_string), false),
        };

        let display = if raw.starts_with('~') {
            let stripped = target.split('(').next().unwrap_or(target);
            stripped
                .rsplit('.')
                .next()
                .unwrap_or(stripped)
                .to_string()
        } else {
            target.to_string()
        };

        Self {
            target: target.to_string(),
            display,
            package,
            imported,
            outer_type: ctx.outer_type(),
        }
    }

    /// Use an explicit display title instead of the derived one
    pub fn with_display(mut self, display: &str) -> Self {
        self.display = display.to_string();
        self
    }

    /// Build a resolution input from a signature placeholder
    pub fn from_cross_ref(xref: &CrossRef) -> Self {
        Self {
            target: xref.target.clone(),
            display: xref.display.clone(),
            package: xref.package.clone(),
            imported: xref.imported,
            outer_type: xref.outer_type.clone(),
        }
    }
}

/// Outcome of resolving one reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Matched a registered symbol
    Internal { fullname: String, document: String },
    /// Matched an external documentation site
    External { url: String },
    /// No match anywhere; the reference renders as plain text
    Unresolved,
}

/// Process-wide symbol table, insertion-ordered
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    objects: IndexMap<String, SymbolEntry>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, fullname: &str) -> Option<&SymbolEntry> {
        self.objects.get(fullname)
    }

    /// Insert or replace the entry for `fullname`
    ///
    /// Re-registration from a different document is not an error: it logs a
    /// warning naming both documents and the most recently processed
    /// document wins.
    pub fn register(
        &mut self,
        fullname: &str,
        document: &str,
        kind: SymbolKind,
        basename: &str,
    ) -> Option<DuplicateSymbol> {
        let duplicate = self.objects.get(fullname).and_then(|existing| {
            if existing.document != document {
                Some(DuplicateSymbol {
                    fullname: fullname.to_string(),
                    previous_document: existing.document.clone(),
                    document: document.to_string(),
                })
            } else {
                None
            }
        });

        if let Some(dup) = &duplicate {
            warn!(
                "duplicate description of {}, other instance in {}",
                dup.fullname, dup.previous_document
            );
        }

        self.objects.insert(
            fullname.to_string(),
            SymbolEntry {
                document: document.to_string(),
                kind,
                basename: basename.to_string(),
            },
        );

        duplicate
    }

    /// Drop every entry owned by `document` (clear-before-rebuild)
    pub fn clear_document(&mut self, document: &str) {
        self.objects.retain(|_, entry| entry.document != document);
    }

    /// Resolve a reference, trying in order: exact match, package-qualified,
    /// package-and-outer-type-qualified, fully-qualified suffix, basename
    /// suffix, then the external resolver (twice when the target was
    /// imported). Read-only; never mutates the registry.
    pub fn resolve(
        &self,
        reference: &Reference,
        external: &dyn ExternalDocResolver,
    ) -> Resolution {
        let target = reference.target.as_str();

        if let Some(entry) = self.objects.get(target) {
            return Resolution::Internal {
                fullname: target.to_string(),
                document: entry.document.clone(),
            };
        }

        if let Some(package) = reference.package.as_deref() {
            let fullname = format!("{}.{}", package, target);
            if let Some(entry) = self.objects.get(&fullname) {
                return Resolution::Internal {
                    fullname,
                    document: entry.document.clone(),
                };
            }

            if !reference.outer_type.is_empty() {
                let fullname = format!("{}.{}.{}", package, reference.outer_type, target);
                if let Some(entry) = self.objects.get(&fullname) {
                    return Resolution::Internal {
                        fullname,
                        document: entry.document.clone(),
                    };
                }
            }
        }

        // Suffix scan in registration order. An exact fully-qualified suffix
        // match wins immediately; otherwise the last basename match in
        // registration order is kept.
        let suffix = format!(".{}", target);
        let basename_suffix = suffix.split('(').next().unwrap_or(&suffix).to_string();
        let mut basename_match: Option<(String, String)> = None;

        for (fullname, entry) in &self.objects {
            if fullname.ends_with(&suffix) {
                return Resolution::Internal {
                    fullname: fullname.clone(),
                    document: entry.document.clone(),
                };
            } else if entry.basename.ends_with(&basename_suffix) {
                basename_match = Some((fullname.clone(), entry.document.clone()));
            }
        }

        if let Some((fullname, document)) = basename_match {
            return Resolution::Internal { fullname, document };
        }

        if let Some(url) = external.resolve(target) {
            return Resolution::External { url };
        }
        if reference.imported {
            if let Some(package) = reference.package.as_deref() {
                if let Some(url) = external.resolve(&format!("{}.{}", package, target)) {
                    return Resolution::External { url };
                }
            }
        }

        Resolution::Unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// External resolver that counts calls and never resolves
    struct CountingResolver {
        calls: Cell<usize>,
    }

    impl CountingResolver {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl ExternalDocResolver for CountingResolver {
        fn resolve(&self, _target: &str) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            None
        }
    }

    fn registry_with(entries: &[(&str, &str, SymbolKind)]) -> SymbolRegistry {
        let mut registry = SymbolRegistry::new();
        for (fullname, document, kind) in entries {
            let basename = fullname.split('(').next().unwrap().to_string();
            registry.register(fullname, document, *kind, &basename);
        }
        registry
    }

    fn reference(target: &str) -> Reference {
        Reference {
            target: target.to_string(),
            display: target.to_string(),
            package: None,
            imported: false,
            outer_type: String::new(),
        }
    }

    #[test]
    fn test_exact_match_ignores_context() {
        let registry = registry_with(&[("com.example.Foo", "com/example/Foo", SymbolKind::Type)]);
        let mut r = reference("com.example.Foo");
        r.package = Some("other.pkg".to_string());
        r.outer_type = "Bar".to_string();
        match registry.resolve(&r, &NoExternalDocs) {
            Resolution::Internal { fullname, .. } => assert_eq!(fullname, "com.example.Foo"),
            other => panic!("unexpected resolution {:?}", other),
        }
    }

    #[test]
    fn test_package_qualified_match() {
        let registry = registry_with(&[("com.example.Foo", "d", SymbolKind::Type)]);
        let mut r = reference("Foo");
        r.package = Some("com.example".to_string());
        assert!(matches!(
            registry.resolve(&r, &NoExternalDocs),
            Resolution::Internal { .. }
        ));
    }

    #[test]
    fn test_package_and_outer_type_match() {
        let registry = registry_with(&[("com.example.Foo.bar()", "d", SymbolKind::Method)]);
        let mut r = reference("bar()");
        r.package = Some("com.example".to_string());
        r.outer_type = "Foo".to_string();
        match registry.resolve(&r, &NoExternalDocs) {
            Resolution::Internal { fullname, .. } => {
                assert_eq!(fullname, "com.example.Foo.bar()");
            }
            other => panic!("unexpected resolution {:?}", other),
        }
    }

    #[test]
    fn test_suffix_match() {
        let registry = registry_with(&[("com.example.deep.Widget", "d", SymbolKind::Type)]);
        let r = reference("deep.Widget");
        assert!(matches!(
            registry.resolve(&r, &NoExternalDocs),
            Resolution::Internal { .. }
        ));
    }

    #[test]
    fn test_basename_fallback_last_match_wins() {
        let registry = registry_with(&[
            ("com.a.Foo.go(int)", "a", SymbolKind::Method),
            ("com.b.Foo.go(long)", "b", SymbolKind::Method),
        ]);
        // `go(String)` matches no exact suffix; both basenames end in `.go`
        let r = reference("go(String)");
        match registry.resolve(&r, &NoExternalDocs) {
            Resolution::Internal { fullname, .. } => {
                assert_eq!(fullname, "com.b.Foo.go(long)");
            }
            other => panic!("unexpected resolution {:?}", other),
        }
    }

    #[test]
    fn test_exact_suffix_beats_basename_match() {
        let registry = registry_with(&[
            ("com.a.Foo.go(int)", "a", SymbolKind::Method),
            ("com.b.Foo.go(long)", "b", SymbolKind::Method),
        ]);
        let r = reference("go(long)");
        match registry.resolve(&r, &NoExternalDocs) {
            Resolution::Internal { fullname, .. } => {
                assert_eq!(fullname, "com.b.Foo.go(long)");
            }
            other => panic!("unexpected resolution {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_registration_warns_once_and_overwrites() {
        let mut registry = SymbolRegistry::new();
        assert!(registry
            .register("com.example.Foo.bar()", "a", SymbolKind::Method, "com.example.Foo.bar")
            .is_none());
        let dup = registry
            .register("com.example.Foo.bar()", "b", SymbolKind::Method, "com.example.Foo.bar")
            .expect("duplicate expected");
        assert_eq!(dup.previous_document, "a");
        assert_eq!(dup.document, "b");
        assert_eq!(registry.get("com.example.Foo.bar()").unwrap().document, "b");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_document_reregistration_is_silent() {
        let mut registry = SymbolRegistry::new();
        registry.register("com.example.Foo", "a", SymbolKind::Type, "com.example.Foo");
        assert!(registry
            .register("com.example.Foo", "a", SymbolKind::Type, "com.example.Foo")
            .is_none());
    }

    #[test]
    fn test_clear_document_drops_only_owned_entries() {
        let mut registry = registry_with(&[
            ("com.a.One", "a", SymbolKind::Type),
            ("com.b.Two", "b", SymbolKind::Type),
            ("com.a.One.x", "a", SymbolKind::Field),
        ]);
        registry.clear_document("a");
        assert_eq!(registry.len(), 1);
        assert!(registry.get("com.b.Two").is_some());
    }

    #[test]
    fn test_external_called_once_when_not_imported() {
        let registry = SymbolRegistry::new();
        let counter = CountingResolver::new();
        let r = reference("Unknown");
        assert_eq!(registry.resolve(&r, &counter), Resolution::Unresolved);
        assert_eq!(counter.calls.get(), 1);
    }

    #[test]
    fn test_external_called_twice_when_imported() {
        let registry = SymbolRegistry::new();
        let counter = CountingResolver::new();
        let mut r = reference("Unknown");
        r.imported = true;
        r.package = Some("com.thirdparty".to_string());
        assert_eq!(registry.resolve(&r, &counter), Resolution::Unresolved);
        assert_eq!(counter.calls.get(), 2);
    }

    #[test]
    fn test_javadoc_links_url_shape() {
        let links = JavadocLinks::with_default_roots();
        assert_eq!(
            links.resolve("java.util.List").as_deref(),
            Some("https://docs.oracle.com/javase/8/docs/api/java/util/List.html")
        );
        assert!(links.resolve("com.example.Foo").is_none());
        // prefix must match whole package segments
        assert!(links.resolve("javafxish.Thing").is_none());
    }

    #[test]
    fn test_reference_tilde_short_display() {
        let mut ctx = DocumentContext::new("doc");
        ctx.set_package("com.example");
        let r = Reference::parse("~com.example.Foo.bar", &ctx);
        assert_eq!(r.display, "bar");
        assert_eq!(r.target, "com.example.Foo.bar");
    }

    #[test]
    fn test_reference_base_type_import_lookup() {
        let mut ctx = DocumentContext::new("doc");
        ctx.set_package("com.example");
        ctx.add_import("java.util", "List");
        // method form: import key is the type, not the member
        let r = Reference::parse("List.of(int)", &ctx);
        assert!(r.imported);
        assert_eq!(r.package.as_deref(), Some("java.util"));
        // plain form: the whole target is the key
        let r = Reference::parse("List", &ctx);
        assert!(r.imported);
        let r = Reference::parse("Map", &ctx);
        assert!(!r.imported);
        assert_eq!(r.package.as_deref(), Some("com.example"));
    }
}
