use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use metriq_catalog::InMemoryCatalog;
use metriq_core::{Config, Diagnostic, DiagnosticCode, Severity};
use metriq_sql::{ArtifactResolver, SqlNode, SqlParser};

/// Metriq - resolve SQL table references to curated metrics views
#[derive(Parser)]
#[command(name = "metriq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: metriq.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a query's table reference against the catalog
    Resolve {
        /// SQL text (omit when --file is given)
        sql: Option<String>,

        /// Read the query from a file instead
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Catalog JSON file (overrides the configured path)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List the artifacts registered in the catalog
    Catalog {
        /// Catalog JSON file (overrides the configured path)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logging goes to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("metriq.toml").exists() {
        Config::from_file(Path::new("metriq.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if cli.verbose {
        eprintln!("{} dialect: {:?}", "Using".cyan(), config.dialect);
    }

    match cli.command {
        Commands::Resolve { sql, file, catalog } => {
            resolve_command(&config, sql, file, catalog, cli.verbose)
        }
        Commands::Catalog { catalog } => catalog_command(&config, catalog, cli.verbose),
    }
}

/// Resolve command - parse a query and resolve its table reference
fn resolve_command(
    config: &Config,
    sql: Option<String>,
    file: Option<PathBuf>,
    catalog_override: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let catalog = load_catalog(config, catalog_override, verbose)?;
    let parser = SqlParser::from_dialect(&config.dialect);

    let parsed = match (&sql, &file) {
        (Some(_), Some(_)) => {
            return Err(anyhow::anyhow!("pass SQL text or --file, not both"));
        }
        (Some(sql), None) => parser.parse(sql, None),
        (None, Some(path)) => parser.parse_file(path),
        (None, None) => {
            return Err(anyhow::anyhow!("no query given; pass SQL text or --file"));
        }
    };

    let parsed = parsed.map_err(|e| anyhow::anyhow!("{}", e.to_diagnostic().message))?;

    let statement = parsed
        .first_statement()
        .ok_or_else(|| anyhow::anyhow!("query is empty"))?;

    match SqlNode::from_statement(statement) {
        None => {
            report_unresolved("query has no resolvable table reference");
        }
        Some(node) => {
            tracing::debug!(?node, "lowered table reference");

            let resolver = ArtifactResolver::new(&catalog);
            let found = resolver
                .resolve(&node)
                .map_err(|e| anyhow::anyhow!("[{}] {}", e.to_diagnostic().code, e))?;

            match found {
                Some(artifact) => {
                    println!("{} {}", "resolved".green().bold(), artifact);
                }
                None => {
                    report_unresolved("reference does not denote a known metrics view");
                }
            }
        }
    }

    Ok(())
}

fn report_unresolved(message: &str) {
    let diag = Diagnostic::new(DiagnosticCode::UnresolvedReference, Severity::Warn, message);
    println!(
        "{} [{}] {}",
        "unresolved".yellow().bold(),
        diag.code,
        diag.message
    );
}

/// Catalog command - list registered artifacts
fn catalog_command(
    config: &Config,
    catalog_override: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let catalog = load_catalog(config, catalog_override, verbose)?;

    if catalog.is_empty() {
        println!("{}", "catalog is empty".yellow());
        return Ok(());
    }

    for artifact in catalog.artifacts() {
        println!(
            "{:>14}  {}",
            artifact.kind.to_string().cyan(),
            artifact.name
        );
    }

    Ok(())
}

fn load_catalog(
    config: &Config,
    catalog_override: Option<PathBuf>,
    verbose: bool,
) -> Result<InMemoryCatalog> {
    let path = catalog_override
        .or_else(|| config.catalog_path())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no catalog file; pass --catalog or set [catalog] path in metriq.toml"
            )
        })?;

    if verbose {
        eprintln!("{} {}", "Loading catalog from:".cyan(), path.display());
    }

    let catalog = InMemoryCatalog::from_json_file(&path)
        .with_context(|| format!("failed to load catalog from {}", path.display()))?;

    if verbose {
        eprintln!("{} {} artifacts", "Loaded".cyan(), catalog.len());
    }

    Ok(catalog)
}
