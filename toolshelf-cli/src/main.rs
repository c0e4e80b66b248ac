//! Toolshelf - keeps toolkit docs, bundles and the catalog in sync
//!
//! Main entry point for the `toolshelf` binary

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use toolshelf_core::bundle::bundle_toolkit;
use toolshelf_core::docs::DocsSynchronizer;
use toolshelf_core::site::SiteVariables;
use toolshelf_core::validator::{CatalogValidator, ValidationReport};
use toolshelf_core::{Slug, ToolshelfLayout};

mod catalog_cli;
mod serve;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "toolshelf",
    about = "Documentation, bundle and catalog tooling for toolkit collections",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Repository root (defaults to $TOOLSHELF_ROOT, then the current directory)
    #[clap(long, global = true)]
    root: Option<PathBuf>,

    /// Set log level (defaults to $RUST_LOG, then info)
    #[clap(long, global = true)]
    log_level: Option<LogLevel>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Package a toolkit directory into a zip bundle
    Bundle {
        /// Toolkit slug to bundle
        #[clap(long)]
        slug: String,

        /// Target zip path
        #[clap(long)]
        output: PathBuf,

        /// Do not print a summary line
        #[clap(long)]
        quiet: bool,
    },

    /// Sync generated docs, bundles and catalog entries
    Sync {
        /// Only sync a specific toolkit slug
        #[clap(long)]
        slug: Option<String>,
    },

    /// Validate toolkit catalog metadata
    Validate {
        /// Validate a single toolkit slug
        #[clap(long)]
        toolkit: Option<String>,

        /// Perform extra manifest checks
        #[clap(long)]
        strict: bool,

        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// List catalog entries
    Catalog {
        /// Output entries as JSON
        #[clap(long)]
        json: bool,
    },

    /// Serve bundles and the catalog over HTTP
    Serve {
        /// Address to listen on
        #[clap(long, default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },

    /// Print documentation site template variables as JSON
    SiteVars,
}

/// Initialize tracing with CLI flags
///
/// An explicit --log-level wins over RUST_LOG. Output always goes to stderr.
fn initialize_tracing(log_level: Option<&LogLevel>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level.to_filter_directive()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.log_level.as_ref());

    if let Command::SiteVars = cli.command {
        return site_vars_command();
    }

    let layout = ToolshelfLayout::discover_with_override(cli.root)
        .context("Failed to resolve repository root")?;
    debug!("Repository root: {}", layout.root.display());

    match cli.command {
        Command::Bundle {
            slug,
            output,
            quiet,
        } => bundle_command(&layout, &slug, output, quiet),
        Command::Sync { slug } => sync_command(layout, slug.as_deref()),
        Command::Validate {
            toolkit,
            strict,
            json,
        } => validate_command(layout, toolkit.as_deref(), strict, json),
        Command::Catalog { json } => catalog_cli::list_command(&layout, json),
        Command::Serve { bind } => serve::run(layout, bind).await,
        Command::SiteVars => site_vars_command(),
    }
}

fn bundle_command(
    layout: &ToolshelfLayout,
    slug: &str,
    output: PathBuf,
    quiet: bool,
) -> Result<()> {
    let slug = Slug::parse(slug)?;

    // Refuse to package a toolkit whose manifest would not load
    let manifest_path = layout.manifest_path(&slug);
    if manifest_path.is_file() {
        let content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        serde_json::from_str::<serde_json::Value>(&content)
            .with_context(|| format!("toolkits/{slug}/toolkit.json is not valid JSON"))?;
    }

    let summary = bundle_toolkit(layout, &slug, &output)?;
    if !quiet {
        let name = summary
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| summary.path.display().to_string());
        println!("Wrote {} ({} bytes)", name, summary.size);
    }
    Ok(())
}

fn sync_command(layout: ToolshelfLayout, slug: Option<&str>) -> Result<()> {
    let synchronizer = DocsSynchronizer::new(layout.clone());
    let report = match slug {
        Some(slug) => synchronizer.sync_toolkit(&Slug::parse(slug)?)?,
        None => synchronizer.sync_all()?,
    };

    for path in &report.written {
        println!("Updated {}", layout.relative(path));
    }
    info!(
        "Sync complete: {} written, {} unchanged",
        report.written.len(),
        report.unchanged.len()
    );
    Ok(())
}

fn validate_command(
    layout: ToolshelfLayout,
    toolkit: Option<&str>,
    strict: bool,
    json: bool,
) -> Result<()> {
    info!("Validating catalog in {}", layout.root.display());
    let validator = CatalogValidator::new(layout, strict);

    let report = match validator.validate(toolkit) {
        Ok(report) => report,
        Err(e) if e.is_not_found() => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        let json_output = serde_json::json!({
            "passed": report.passed(),
            "failures": report.failure_count(),
            "toolkits": report.toolkits,
            "missing_from_catalog": report.missing_from_catalog,
        });
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else {
        print_validation_report(&report);
    }

    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_validation_report(report: &ValidationReport) {
    for toolkit in &report.toolkits {
        if toolkit.passed() {
            println!("[OK] {}", toolkit.slug);
        } else {
            println!("[FAIL] {}", toolkit.slug);
            for issue in &toolkit.issues {
                println!("  - {}", issue.message);
            }
        }
    }

    if !report.missing_from_catalog.is_empty() {
        println!("Toolkits missing from catalog/toolkits.json:");
        for slug in &report.missing_from_catalog {
            println!("  - {slug}");
        }
    }
}

fn site_vars_command() -> Result<()> {
    let variables = SiteVariables::from_env();
    println!("{}", serde_json::to_string_pretty(&variables)?);
    Ok(())
}
