//! apim-graph CLI
//!
//! Command-line interface for deriving API management resource graphs from
//! OpenAPI documents.

mod dry_run;

use anyhow::{bail, Context, Result};
use apim_graph_common::{ApiConfiguration, ResourceGraph};
use apim_graph_generator::{apply_graph, build_resource_graph, POLICY_EXTENSION_KEY};
use apim_graph_parser::{Extensible, OpenApiParser, OpenApiSpec};
use clap::{Parser, Subcommand};
use colored::*;
use dry_run::DryRunProvisioner;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "apim-graph")]
#[command(version, about = "Derive API management resource graphs from OpenAPI documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an OpenAPI document and summarize what it declares
    #[command(after_help = "EXAMPLES:\n  \
        apim-graph inspect --spec petstore.yaml")]
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Build the resource graph and print it as JSON
    #[command(after_help = "EXAMPLES:\n  \
        # Print the graph for the document named in the configuration\n  \
        apim-graph plan --config petstore-api.yaml\n\n  \
        # Override the document and write the graph to a file\n  \
        apim-graph plan \\\n    \
        --config petstore-api.yaml \\\n    \
        --spec ./petstore.json \\\n    \
        --output graph.json")]
    Plan {
        /// Path to the API configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// OpenAPI document (overrides document_location)
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Write the graph to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Provision the resource graph in dependency order
    #[command(after_help = "EXAMPLES:\n  \
        apim-graph apply --config petstore-api.yaml --dry-run")]
    Apply {
        /// Path to the API configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// OpenAPI document (overrides document_location)
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Log each resource instead of calling the management plane
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inspect { spec } => {
            inspect_command(spec.as_path(), cli.verbose)?;
        }
        Commands::Plan {
            config,
            spec,
            output,
        } => {
            plan_command(config.as_path(), spec.as_deref(), output.as_deref())?;
        }
        Commands::Apply {
            config,
            spec,
            dry_run,
        } => {
            apply_command(config.as_path(), spec.as_deref(), dry_run, cli.verbose).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn inspect_command(spec_path: &Path, verbose: bool) -> Result<()> {
    println!("{} Parsing document: {}", "→".cyan(), spec_path.display());

    let spec = load_document(spec_path)?;
    let operations: Vec<_> = spec
        .paths
        .iter()
        .flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, operation)| (path, method, operation))
        })
        .collect();

    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("\n{}", "Document:".bold());
    println!("  Title: {}", spec.info.title.yellow());
    println!("  Version: {}", spec.info.version.yellow());
    println!("  OpenAPI: {}", spec.openapi);
    println!("  Paths: {}", spec.paths.len());
    println!("  Operations: {}", operations.len());
    println!("  Schemas: {}", spec.schemas().count());
    println!(
        "  API policy: {}",
        if spec.extension_str(POLICY_EXTENSION_KEY).is_some() {
            "yes".green()
        } else {
            "no".normal()
        }
    );

    if verbose {
        println!("\n{}", "Operations:".bold());
        for (path, method, operation) in operations {
            let policy = if operation.extension_str(POLICY_EXTENSION_KEY).is_some() {
                " [policy]"
            } else {
                ""
            };
            println!(
                "  • {} {} ({}){}",
                method.as_str().cyan(),
                path,
                operation.operation_id.as_deref().unwrap_or("<generated>"),
                policy
            );
        }
    }

    Ok(())
}

fn plan_command(
    config_path: &Path,
    spec_override: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let (config, graph) = load_graph(config_path, spec_override)?;
    let json =
        serde_json::to_string_pretty(&graph).context("Failed to serialize resource graph")?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!("\n{}", "✓ Plan complete!".green().bold());
            print_graph_summary(&config, &graph);
            println!("\n  📄 {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

async fn apply_command(
    config_path: &Path,
    spec_override: Option<&Path>,
    dry_run: bool,
    verbose: bool,
) -> Result<()> {
    if !dry_run {
        bail!(
            "Only --dry-run is supported; live provisioning needs an external ResourceProvisioner"
        );
    }

    let (config, graph) = load_graph(config_path, spec_override)?;

    println!(
        "{} Applying {} resources (dry run)...",
        "→".cyan(),
        graph.resource_count()
    );
    let report = apply_graph(&graph, &DryRunProvisioner)
        .await
        .context("Failed to provision resource graph")?;

    println!("\n{}", "✓ Apply complete!".green().bold());
    print_graph_summary(&config, &graph);
    println!("  Catalog: {}", report.catalog_name.yellow());

    if verbose {
        println!("\n{}", "Schema bindings:".bold());
        for operation in &graph.operations {
            let request = operation
                .request
                .iter()
                .flat_map(|request| request.representations.iter());
            let responses = operation
                .responses
                .iter()
                .flat_map(|response| response.representations.iter());

            for representation in request.chain(responses) {
                let binding = representation.schema.resolve().await?;
                println!(
                    "  • {} {} → {}",
                    operation.operation_id.cyan(),
                    representation.content_type,
                    match (&binding.schema_id, &binding.type_name) {
                        (Some(schema_id), Some(type_name)) => format!("{}/{}", schema_id, type_name),
                        _ => "unbound".to_string(),
                    }
                );
            }
        }
    }

    Ok(())
}

fn load_graph(
    config_path: &Path,
    spec_override: Option<&Path>,
) -> Result<(ApiConfiguration, ResourceGraph)> {
    eprintln!(
        "{} Loading configuration: {}",
        "→".cyan(),
        config_path.display()
    );
    let config =
        ApiConfiguration::from_file(config_path).context("Failed to load configuration")?;

    let document = match spec_override {
        Some(path) => path.to_path_buf(),
        None => document_path(config_path, &config.document_location)?,
    };
    let config = config.with_document_location(document.display().to_string());

    let spec = load_document(&document)?;

    eprintln!("{} Building resource graph...", "→".cyan());
    let graph = build_resource_graph(&spec, &config).context("Failed to build resource graph")?;

    Ok((config, graph))
}

fn load_document(path: &Path) -> Result<OpenApiSpec> {
    let parser = OpenApiParser::from_file(path)
        .with_context(|| format!("Failed to load OpenAPI document {}", path.display()))?;
    Ok(parser.into_spec())
}

/// Resolve the configured document location against the configuration file
fn document_path(config_path: &Path, location: &str) -> Result<PathBuf> {
    if location.starts_with("http://") || location.starts_with("https://") {
        bail!(
            "Remote document location {} is not supported; download it and pass --spec",
            location
        );
    }

    let path = Path::new(location);
    match config_path.parent() {
        Some(dir) if path.is_relative() => Ok(dir.join(path)),
        _ => Ok(path.to_path_buf()),
    }
}

fn print_graph_summary(config: &ApiConfiguration, graph: &ResourceGraph) {
    println!("\n{}", "Resource graph:".bold());
    println!("  Component: {}", config.api_name.yellow());
    println!(
        "  Target: {}/{}",
        graph.target.resource_group, graph.target.service_name
    );
    println!("  API: {} ({})", graph.api.id.yellow(), graph.api.path);
    println!("  Schemas: {}", graph.schema_catalog.len());
    println!("  Operations: {}", graph.operations.len());
    println!("  Policies: {}", graph.policies.len());
}
