//! `stmt`: render scientific statements in the terminal

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use stmt_cache::{FileStore, TypeSchemaCache};
use stmt_core::{
    NodeStatus, ResolvedNode, StatementEndpoint, StatementView, StatementViewer, ViewerConfig,
};
use stmt_dispatch::{render_text, RecordOutcome};
use stmt_model::StatementNode;

#[derive(Parser)]
#[command(name = "stmt", version, about = "Statement viewer")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Articles API base URL
    #[arg(long, global = true)]
    api: Option<String>,

    /// Type-schema service base URL
    #[arg(long, global = true)]
    schema_service: Option<String>,

    /// Persisted schema cache directory
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and render a statement
    Show {
        /// Statement id
        id: String,
        /// Use the full statement endpoint
        #[arg(long)]
        full: bool,
        /// Print the resolved view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a type (e.g. `doi:21.T11969/P1004`)
    Resolve {
        /// `@type` value
        type_iri: String,
    },
    /// Inspect the persisted schema cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached type keys
    List,
    /// Remove every cached schema
    Clear,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(api) = &cli.api {
        config = config.with_api_base_url(api);
    }
    if let Some(url) = &cli.schema_service {
        config = config.with_schema_service_url(url);
    }
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = load_config(&cli)?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Show { id, full, json } => {
            let endpoint = if full {
                StatementEndpoint::Full
            } else {
                StatementEndpoint::ById
            };
            let viewer = StatementViewer::from_config(config)?;
            let view = viewer
                .load(&id, endpoint)
                .await
                .with_context(|| format!("loading statement {id}"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view);
            }
        }
        Commands::Resolve { type_iri } => {
            let viewer = StatementViewer::from_config(config)?;
            let node = StatementNode::from_value(json!({ "@type": type_iri }))?;
            let info = viewer.resolver().resolve(&node).await?;

            println!("{}", info.name);
            for property in &info.properties {
                println!("  {property}");
            }
        }
        Commands::Cache { action } => {
            let Some(dir) = config.cache_dir.clone() else {
                bail!("no cache directory configured (use --cache-dir or cache_dir in the config file)");
            };
            let cache = TypeSchemaCache::new(FileStore::new(&dir));
            match action {
                CacheAction::List => {
                    for (key, info) in cache.entries().await? {
                        println!("{key}\t{}\t{} properties", info.name, info.properties.len());
                    }
                }
                CacheAction::Clear => {
                    cache.clear().await?;
                    println!("cleared {}", dir.display());
                }
            }
        }
    }

    Ok(())
}

fn print_view(view: &StatementView) {
    match &view.label {
        Some(label) => println!("Statement {}: {label}", view.id),
        None => println!("Statement {}", view.id),
    }

    for outcome in &view.records {
        println!();
        match outcome {
            RecordOutcome::Rendered {
                index,
                label,
                directives,
            } => {
                println!("[{index}] {}", label.as_deref().unwrap_or("(untitled step)"));
                println!("{}", render_text(directives));
            }
            RecordOutcome::Skipped(err) => println!("(skipped: {err})"),
        }
    }

    if let Some(tree) = &view.tree {
        println!();
        println!("Content:");
        print_tree(tree, 1);
    }
}

fn print_tree(node: &ResolvedNode, indent: usize) {
    let pad = "  ".repeat(indent);
    let type_iri = node.type_iri.as_deref().unwrap_or("?");
    match &node.status {
        NodeStatus::Resolved(info) => println!("{pad}{} <{type_iri}>", info.name),
        NodeStatus::Failed(err) => println!("{pad}! <{type_iri}> {err}"),
    }
    for directive in &node.directives {
        for line in directive.to_string().lines() {
            println!("{pad}  {line}");
        }
    }
    for child in &node.children {
        print_tree(child, indent + 1);
    }
}
