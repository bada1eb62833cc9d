//! CLI argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::apidoc::BuildOptions;

/// Java API documentation compiler with reStructuredText output
///
/// Looks recursively in INPUT_PATH for Java source files and creates
/// documents for all non-private types, organized by package under the
/// output directory. A package index is created for each package, and a top
/// level table of contents named packages.<suffix> is generated.
#[derive(Parser, Debug)]
#[command(name = "javadox")]
#[command(about = "Generate API documentation pages from Java sources")]
#[command(version)]
pub struct Cli {
    /// Directory to search for Java source files
    #[arg(value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Paths to skip, matched as path suffixes (directories or single files)
    #[arg(value_name = "EXCLUDE_PATH")]
    pub excludes: Vec<String>,

    /// Directory to place all output
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Overwrite all files
    #[arg(short, long)]
    pub force: bool,

    /// Directory to store cacheable per-file output
    #[arg(short, long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Overwrite new and changed files only
    #[arg(short, long)]
    pub update: bool,

    /// Don't create a table of contents file
    #[arg(short = 'T', long)]
    pub no_toc: bool,

    /// Output file suffix
    #[arg(short, long, default_value = "rst", value_name = "SUFFIX")]
    pub suffix: String,

    /// Additional input paths to scan
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub includes: Vec<PathBuf>,

    /// Map a package prefix to an external Javadoc root, e.g.
    /// `org.joda=https://www.joda.org/joda-time/apidocs`
    #[arg(long = "javadoc-url", value_name = "PREFIX=URL")]
    pub javadoc_urls: Vec<String>,

    /// Show verbose output
    #[arg(short, long, env = "JAVADOX_VERBOSE")]
    pub verbose: bool,
}

impl Cli {
    /// Build options for the batch driver
    pub fn build_options(&self) -> BuildOptions {
        let mut input_paths = vec![self.input_path.clone()];
        input_paths.extend(self.includes.iter().cloned());

        BuildOptions {
            input_paths,
            output_dir: self.output_dir.clone(),
            excludes: self.excludes.clone(),
            cache_dir: self.cache_dir.clone(),
            force: self.force,
            update: self.update,
            no_toc: self.no_toc,
            suffix: self.suffix.trim_start_matches('.').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::parse_from(["javadox", "-o", "docs/api", "src/main/java"]);
        assert_eq!(cli.input_path, PathBuf::from("src/main/java"));
        assert_eq!(cli.output_dir, PathBuf::from("docs/api"));
        assert!(!cli.force);
        assert_eq!(cli.build_options().suffix, "rst");
    }

    #[test]
    fn test_excludes_and_suffix_normalization() {
        let cli = Cli::parse_from([
            "javadox",
            "-o",
            "out",
            "-s",
            ".txt",
            "src",
            "generated",
            "Legacy.java",
        ]);
        let options = cli.build_options();
        assert_eq!(options.suffix, "txt");
        assert_eq!(options.excludes, vec!["generated", "Legacy.java"]);
    }

    #[test]
    fn test_includes_follow_primary_root() {
        let cli = Cli::parse_from(["javadox", "-o", "out", "-I", "extra", "src"]);
        let options = cli.build_options();
        assert_eq!(
            options.input_paths,
            vec![PathBuf::from("src"), PathBuf::from("extra")]
        );
    }
}
