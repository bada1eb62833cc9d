//! Error types for javadox
//!
//! Per-declaration failures (signature syntax, kind mismatch, multiple
//! declarators) abort the declaration and its enclosing file; the batch
//! driver records them and continues with remaining files. Resolution
//! failures are warnings, not errors, and never appear here.

use std::process::ExitCode;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, JavadoxError>;

/// All errors produced by javadox
#[derive(Error, Debug)]
pub enum JavadoxError {
    /// Malformed modifier, type, or parameter syntax in a declaration signature
    #[error("syntax error in signature: {message}")]
    SignatureSyntax { message: String },

    /// The parsed declaration does not match the expected kind
    #[error("expected {expected} declaration, found {found}")]
    UnexpectedDeclarationKind {
        expected: &'static str,
        found: &'static str,
    },

    /// A field signature declared more than one variable
    #[error("only one field may be documented at a time ({count} declarators found)")]
    MultipleDeclarators { count: usize },

    /// A compilation unit could not be parsed
    #[error("failed to parse {path}: {message}")]
    ParseFailure { path: String, message: String },

    /// An input path does not exist or is not a directory
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// An output file already exists and neither --force nor --update was given
    #[error("{path} already exists (use --force to overwrite)")]
    OutputExists { path: String },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache record could not be read or written
    #[error("cache error: {0}")]
    Cache(#[from] serde_json::Error),
}

impl JavadoxError {
    /// Map errors to process exit codes for the CLI
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } => ExitCode::from(2),
            Self::OutputExists { .. } => ExitCode::from(3),
            _ => ExitCode::FAILURE,
        }
    }
}
