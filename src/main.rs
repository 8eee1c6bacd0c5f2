// Command-line entry point for depviz.

use anyhow::{bail, Result};
use clap::Parser;
use depviz::api::dto::TreeNode;
use depviz::api::server;
use depviz::application::RenderPipeline;
use depviz::config::GraphConfig;
use depviz::infrastructure::ImportScanner;
use depviz::ports::DependencySource;
use std::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Source tree root to scan (overrides config)
    #[arg(short, long)]
    root: Option<String>,

    /// Internal import prefix, e.g. "cam/back/" (overrides config)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Render the dependency graph of one module
    #[arg(short, long)]
    target: Option<String>,

    /// Render the whole dependency universe
    #[arg(long)]
    all: bool,

    /// Keep redundant edges (skip transitive reduction)
    #[arg(long)]
    full: bool,

    /// Output format (dot, json)
    #[arg(short, long, default_value = "dot")]
    format: String,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Start the API server on this port instead of rendering once
    #[arg(long)]
    serve: Option<u16>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GraphConfig::load(path)?,
        None => GraphConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.scan_root = root.into();
    }
    if let Some(prefix) = &cli.prefix {
        config.import_prefix = prefix.clone();
    }
    config.validate()?;

    if let Some(port) = cli.serve {
        return server::start_server(port, config);
    }

    let scanner = ImportScanner::new(&config)?;
    let map = scanner.dependency_map()?;

    let rendered = match cli.format.as_str() {
        "json" => serde_json::to_string(&TreeNode::from_map(&map, &config.root_label()))?,
        "dot" => {
            let pipeline = RenderPipeline::new(&config);
            match (&cli.target, cli.all) {
                (Some(target), _) => pipeline.subtree_dot(&map, target, !cli.full),
                (None, true) => pipeline.universe_dot(&map, !cli.full),
                (None, false) => bail!("Pass --target <module> or --all to pick a graph"),
            }
        }
        other => bail!("Unknown format: {}", other),
    };

    match &cli.output {
        Some(path) => fs::write(path, &rendered)?,
        None => println!("{}", rendered),
    }
    Ok(())
}
