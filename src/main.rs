//! javadox CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use javadox::apidoc::BuildReport;
use javadox::registry::JavadocLinks;
use javadox::{apidoc, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "javadox=debug"
    } else {
        "javadox=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(report) => {
            print_summary(&report);
            if report.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run(cli: &Cli) -> javadox::Result<BuildReport> {
    let options = cli.build_options();

    let mut links = JavadocLinks::with_default_roots();
    for spec in &cli.javadoc_urls {
        match spec.split_once('=') {
            Some((prefix, url)) => links.add_root(prefix, url),
            None => eprintln!("ignoring malformed --javadoc-url {:?}", spec),
        }
    }

    apidoc::build(&options, &links)
}

fn print_summary(report: &BuildReport) {
    println!(
        "{} documents written, {} up to date, {} packages",
        report.documents_written,
        report.documents_skipped,
        report.packages.len()
    );
    println!(
        "{} internal links, {} external links, {} unresolved references, {} duplicate symbols",
        report.internal_links,
        report.external_links,
        report.unresolved.len(),
        report.duplicate_symbols
    );

    for unresolved in &report.unresolved {
        eprintln!(
            "warning: {}: unresolved reference {}",
            unresolved.document, unresolved.target
        );
    }
    for failure in &report.failures {
        eprintln!("error: {}: {}", failure.path, failure.message);
    }
    if report.has_failures() {
        eprintln!("{} file(s) failed to compile", report.failures.len());
    }
}
