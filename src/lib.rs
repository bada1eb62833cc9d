//! javadox: Java API documentation compiler
//!
//! This library converts Java source code into structured documentation
//! pages. It parses single declaration signatures (types, fields, methods,
//! constructors) into a structured model, renders them as typed node
//! sequences with cross-reference placeholders, and resolves references
//! against a process-wide symbol registry populated while compiling a whole
//! source tree.
//!
//! # Example
//!
//! ```ignore
//! use javadox::context::DocumentContext;
//! use javadox::driver::register_declaration;
//! use javadox::registry::SymbolRegistry;
//! use javadox::signature::DeclarationKind;
//!
//! let mut ctx = DocumentContext::new("com/example/Widget");
//! ctx.set_package("com.example");
//! ctx.push_type("Widget");
//!
//! let mut registry = SymbolRegistry::new();
//! let registered = register_declaration(
//!     "public List<String> get(int index)",
//!     DeclarationKind::Method,
//!     &ctx,
//!     &mut registry,
//! )?;
//!
//! assert_eq!(registered.fullname, "com.example.Widget.get(int)");
//! ```

pub mod apidoc;
pub mod cli;
pub mod compile;
pub mod context;
pub mod doc;
pub mod driver;
pub mod error;
pub mod format;
pub mod javadoc;
pub mod nodes;
pub mod registry;
pub mod render;
pub mod signature;

// Re-export commonly used types
pub use cli::Cli;
pub use context::DocumentContext;
pub use error::{JavadoxError, Result};
pub use nodes::{CrossRef, SignatureNode};
pub use registry::{
    ExternalDocResolver, JavadocLinks, Reference, Resolution, SymbolKind, SymbolRegistry,
};
pub use signature::{parse_member_signature, parse_signature, parse_type_signature, Declaration};
