//! Batch documentation build
//!
//! Walks the input trees for `.java` sources, parses each file (in parallel,
//! the stateless phase), then serially registers every declaration and
//! assembles one document per type. Once the registry is fully populated a
//! resolution pass checks every pending reference: prose references rewrite
//! to external links or degrade to plain text, signature references are
//! validated. Finally documents, per-package indexes, and the top-level TOC
//! are written out.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use rayon::prelude::*;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::compile::{CompiledDocument, Compiler, ParsedUnit};
use crate::doc::{Directive, Document};
use crate::driver::register_package;
use crate::error::{JavadoxError, Result};
use crate::registry::{ExternalDocResolver, Resolution, SymbolRegistry};

/// Options controlling one batch build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Input roots; the first is the primary root excludes are anchored to
    pub input_paths: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Path suffixes to skip, relative to the primary root or absolute
    pub excludes: Vec<String>,
    pub cache_dir: Option<PathBuf>,
    /// Overwrite existing output files
    pub force: bool,
    /// Rewrite only files whose source is newer than the output
    pub update: bool,
    /// Skip the top-level table of contents
    pub no_toc: bool,
    /// Output file suffix without the dot
    pub suffix: String,
}

/// A file that failed to parse or compile
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub message: String,
}

/// A reference that resolved nowhere and rendered as plain text
#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedReference {
    pub document: String,
    pub target: String,
}

/// End-of-build summary
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub documents_written: usize,
    pub documents_skipped: usize,
    pub packages: Vec<String>,
    pub failures: Vec<FileFailure>,
    pub duplicate_symbols: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub unresolved: Vec<UnresolvedReference>,
}

impl BuildReport {
    /// Whether the build should exit non-zero
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Run a full batch build
pub fn build(options: &BuildOptions, external: &dyn ExternalDocResolver) -> Result<BuildReport> {
    let primary_root = options.input_paths.first().ok_or_else(|| {
        JavadoxError::FileNotFound {
            path: "<no input path>".to_string(),
        }
    })?;
    for input in &options.input_paths {
        if !input.is_dir() {
            return Err(JavadoxError::FileNotFound {
                path: input.display().to_string(),
            });
        }
    }
    fs::create_dir_all(&options.output_dir)?;
    if let Some(cache_dir) = &options.cache_dir {
        fs::create_dir_all(cache_dir)?;
    }
    let excludes = normalize_excludes(primary_root, &options.excludes);

    let mut source_files = Vec::new();
    for input in &options.input_paths {
        source_files.extend(find_source_files(input, &excludes));
    }
    source_files.sort();
    source_files.dedup();
    info!("found {} source files", source_files.len());

    let mut report = BuildReport::default();

    // Parallel phase: parse (or load from cache) every file. Stateless; no
    // registry access.
    let parsed: Vec<(PathBuf, Result<ParsedUnit>)> = source_files
        .par_iter()
        .map(|path| (path.clone(), parse_or_load(path, options.cache_dir.as_deref())))
        .collect();

    // Serial phase: registry writes in file order
    let compiler = Compiler::new();
    let mut registry = SymbolRegistry::new();
    let mut outputs: Vec<OutputDocument> = Vec::new();

    for (path, result) in parsed {
        let unit = match result {
            Ok(unit) => unit,
            Err(e) => {
                report.failures.push(FileFailure {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        match compiler.assemble(&unit, &mut registry) {
            Ok(documents) => {
                for document in documents {
                    report.duplicate_symbols += document.duplicates;
                    outputs.push(OutputDocument {
                        source: path.clone(),
                        document,
                    });
                }
            }
            Err(e) => {
                report.failures.push(FileFailure {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    // Package symbols live in their package-index documents
    let mut package_contents: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for output in &outputs {
        if output.document.package.is_empty() {
            continue;
        }
        package_contents
            .entry(output.document.package.clone())
            .or_default()
            .push(output.document.file_basename());
    }
    for package in package_contents.keys() {
        let docname = format!("{}/package-index", package.replace('.', "/"));
        let (_, duplicate) = register_package(package, &docname, &mut registry);
        if duplicate.is_some() {
            report.duplicate_symbols += 1;
        }
    }
    report.packages = package_contents.keys().cloned().collect();

    // Resolution pass: the registry is complete, resolve everything
    resolve_references(&mut outputs, &registry, external, &mut report);

    // Write documents
    for output in &outputs {
        write_document(output, options, &mut report)?;
    }

    // Per-package indexes
    for (package, contents) in &package_contents {
        write_package_index(package, contents, options, &mut report)?;
    }

    // Top-level table of contents
    if !options.no_toc {
        write_toc(package_contents.keys(), options)?;
    }

    Ok(report)
}

struct OutputDocument {
    source: PathBuf,
    document: CompiledDocument,
}

// ======================================================================
// Source discovery
// ======================================================================

/// Anchor relative excludes to the primary root and normalize them to
/// `/`-terminated path strings for suffix matching
pub fn normalize_excludes(root: &Path, excludes: &[String]) -> Vec<String> {
    excludes
        .iter()
        .map(|exclude| {
            let path = PathBuf::from(exclude);
            let absolute = if path.is_absolute() || exclude.starts_with(&root.display().to_string())
            {
                path
            } else {
                root.join(path)
            };
            let mut normalized = absolute.display().to_string();
            if !normalized.ends_with('/') {
                normalized.push('/');
            }
            normalized
        })
        .collect()
}

/// Whether a path matches any exclude (path-suffix semantics)
pub fn is_excluded(path: &Path, excludes: &[String]) -> bool {
    let mut candidate = path.display().to_string();
    if !candidate.ends_with('/') {
        candidate.push('/');
    }
    excludes.iter().any(|exclude| candidate.ends_with(exclude))
}

/// Recursively collect `.java` files under `dir`, pruning excluded and
/// hidden directories
pub fn find_source_files(dir: &Path, excludes: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files(dir, excludes, &mut files);
    files
}

fn collect_files(dir: &Path, excludes: &[String], files: &mut Vec<PathBuf>) {
    if is_excluded(dir, excludes) {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                continue;
            }
        }
        if path.is_dir() {
            collect_files(&path, excludes, files);
        } else if path.extension().and_then(|e| e.to_str()) == Some("java")
            && !is_excluded(&path, excludes)
        {
            files.push(path);
        }
    }
}

// ======================================================================
// Cache
// ======================================================================

fn mtime_secs(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()?
        .modified()
        .ok()?
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

fn cache_path(cache_dir: &Path, source: &Path) -> PathBuf {
    let mangled = source
        .display()
        .to_string()
        .replace(std::path::MAIN_SEPARATOR, ":");
    cache_dir.join(format!("{}-CACHE.json", mangled))
}

/// Parse a source file, reusing the cached unit when it is newer than the
/// source
fn parse_or_load(path: &Path, cache_dir: Option<&Path>) -> Result<ParsedUnit> {
    let cache_file = cache_dir.map(|dir| cache_path(dir, path));

    if let Some(cache_file) = &cache_file {
        let source_mtime = mtime_secs(path);
        let cache_mtime = mtime_secs(cache_file);
        if let (Some(source_mtime), Some(cache_mtime)) = (source_mtime, cache_mtime) {
            if cache_mtime >= source_mtime {
                if let Ok(json) = fs::read_to_string(cache_file) {
                    if let Ok(unit) = serde_json::from_str(&json) {
                        debug!("cache hit for {}", path.display());
                        return Ok(unit);
                    }
                }
            }
        }
    }

    let source = fs::read_to_string(path)?;
    let unit = Compiler::parse_unit(&source, path)?;

    if let Some(cache_file) = &cache_file {
        fs::write(cache_file, serde_json::to_string(&unit)?)?;
    }
    Ok(unit)
}

// ======================================================================
// Resolution pass
// ======================================================================

/// Resolve every pending reference against the populated registry
///
/// Prose role markup is rewritten in the document text: external matches
/// become hyperlinks, unresolved references degrade to their plain display
/// text. Signature references are validated and counted only; their display
/// text is already in place.
fn resolve_references(
    outputs: &mut [OutputDocument],
    registry: &SymbolRegistry,
    external: &dyn ExternalDocResolver,
    report: &mut BuildReport,
) {
    let role = Regex::new(r":java:ref:`([^`]+)`").expect("role pattern");

    for output in outputs.iter_mut() {
        let document = &mut output.document;
        let mut seen_unresolved: Vec<String> = Vec::new();

        // Signature placeholders: validate only
        for pending in document.references.iter().filter(|p| !p.in_prose) {
            match registry.resolve(&pending.reference, external) {
                Resolution::Internal { .. } => report.internal_links += 1,
                Resolution::External { .. } => report.external_links += 1,
                Resolution::Unresolved => {
                    if !seen_unresolved.contains(&pending.reference.target) {
                        seen_unresolved.push(pending.reference.target.clone());
                        warn!(
                            "{}: unresolved reference {}",
                            document.docname, pending.reference.target
                        );
                        report.unresolved.push(UnresolvedReference {
                            document: document.docname.clone(),
                            target: pending.reference.target.clone(),
                        });
                    }
                }
            }
        }

        // Prose roles: rewrite the text
        let references = document.references.clone();
        let docname = document.docname.clone();
        let rewritten = role.replace_all(&document.text, |caps: &Captures| {
            let inner = &caps[1];
            let (label, target) = match inner.rfind(" <") {
                Some(index) if inner.ends_with('>') => (
                    inner[..index].to_string(),
                    inner[index + 2..inner.len() - 1].to_string(),
                ),
                _ => (String::new(), inner.to_string()),
            };

            let pending = references
                .iter()
                .find(|p| p.in_prose && p.raw == target)
                .map(|p| p.reference.clone());
            let reference = match pending {
                Some(reference) => reference,
                // a role the converter did not account for; leave untouched
                None => return caps[0].to_string(),
            };
            let display = if label.is_empty() {
                reference.display.clone()
            } else {
                label
            };

            match registry.resolve(&reference, external) {
                Resolution::Internal { .. } => {
                    report.internal_links += 1;
                    caps[0].to_string()
                }
                Resolution::External { url } => {
                    report.external_links += 1;
                    format!("`{} <{}>`__", display, url)
                }
                Resolution::Unresolved => {
                    if !seen_unresolved.contains(&reference.target) {
                        seen_unresolved.push(reference.target.clone());
                        warn!("{}: unresolved reference {}", docname, reference.target);
                        report.unresolved.push(UnresolvedReference {
                            document: docname.clone(),
                            target: reference.target.clone(),
                        });
                    }
                    display
                }
            }
        });
        document.text = rewritten.into_owned();
    }
}

// ======================================================================
// Writers
// ======================================================================

/// Enforce the overwrite policy for an output path
fn check_overwrite(path: &Path, options: &BuildOptions) -> Result<()> {
    if path.exists() && !options.force && !options.update {
        return Err(JavadoxError::OutputExists {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

fn write_document(
    output: &OutputDocument,
    options: &BuildOptions,
    report: &mut BuildReport,
) -> Result<()> {
    let document = &output.document;
    let dir = if document.package.is_empty() {
        options.output_dir.clone()
    } else {
        options.output_dir.join(document.package.replace('.', "/"))
    };
    fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{}.{}", document.file_basename(), options.suffix));
    check_overwrite(&path, options)?;

    if options.update && path.exists() {
        let source_mtime = mtime_secs(&output.source).unwrap_or(u64::MAX);
        let dest_mtime = mtime_secs(&path).unwrap_or(0);
        if source_mtime < dest_mtime {
            report.documents_skipped += 1;
            return Ok(());
        }
    }

    fs::write(&path, &document.text)?;
    report.documents_written += 1;
    Ok(())
}

fn write_package_index(
    package: &str,
    contents: &[String],
    options: &BuildOptions,
    report: &mut BuildReport,
) -> Result<()> {
    let mut document = Document::new();
    document.add_heading(package, '=');
    document.add_directive(&Directive::with_argument("java:package", package));
    document.add_directive(&Directive::with_argument(
        "index",
        &format!("single: {} (package)", package),
    ));

    let mut toc = Directive::new("toctree");
    toc.add_option("maxdepth", "1");
    let mut sorted = contents.to_vec();
    sorted.sort();
    toc.add_content(&sorted.join("\n"));
    document.add_directive(&toc);

    let dir = options.output_dir.join(package.replace('.', "/"));
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("package-index.{}", options.suffix));
    check_overwrite(&path, options)?;

    fs::write(&path, document.build())?;
    report.documents_written += 1;
    Ok(())
}

fn write_toc<'a>(
    packages: impl Iterator<Item = &'a String>,
    options: &BuildOptions,
) -> Result<()> {
    let mut document = Document::new();
    document.add_heading("Javadoc", '=');

    let mut toc = Directive::new("toctree");
    toc.add_option("maxdepth", "2");
    let entries: Vec<String> = packages
        .map(|package| format!("{}/package-index", package.replace('.', "/")))
        .collect();
    toc.add_content(&entries.join("\n"));
    document.add_directive(&toc);

    let path = options
        .output_dir
        .join(format!("packages.{}", options.suffix));
    check_overwrite(&path, options)?;
    fs::write(&path, document.build())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_and_match_excludes() {
        let root = Path::new("/repo/src");
        let excludes = normalize_excludes(root, &["generated".to_string()]);
        assert_eq!(excludes, vec!["/repo/src/generated/".to_string()]);
        assert!(is_excluded(Path::new("/repo/src/generated"), &excludes));
        assert!(is_excluded(
            Path::new("/other/repo/src/generated"),
            &excludes
        ));
        assert!(!is_excluded(Path::new("/repo/src/main"), &excludes));
    }

    #[test]
    fn test_file_exclusion() {
        let root = Path::new("/repo");
        let excludes = normalize_excludes(root, &["Legacy.java".to_string()]);
        assert!(is_excluded(Path::new("/repo/com/Legacy.java"), &excludes));
        assert!(!is_excluded(Path::new("/repo/com/Modern.java"), &excludes));
    }

    #[test]
    fn test_cache_path_mangles_separators() {
        let path = cache_path(Path::new("/tmp/cache"), Path::new("/repo/src/Foo.java"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.contains(":repo:src:Foo.java"));
        assert!(name.ends_with("-CACHE.json"));
    }
}
