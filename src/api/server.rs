use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::api::dto::TreeNode;
use crate::application::RenderPipeline;
use crate::config::GraphConfig;
use crate::domain::depmap::DependencyMap;
use crate::infrastructure::ImportScanner;
use crate::ports::DependencySource;

#[derive(Debug, Deserialize)]
struct CommandReq {
    command: String,
    params: Option<serde_json::Value>,
}

pub fn start_server(port: u16, config: GraphConfig) -> Result<()> {
    let address = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind to {}", address))?;

    info!("API server listening on {}", address);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let config = config.clone();
                thread::spawn(move || {
                    if let Err(e) = handle_connection(stream, &config) {
                        error!("Connection error: {}", e);
                    }
                });
            }
            Err(e) => error!("Accept error: {}", e),
        }
    }

    Ok(())
}

fn handle_connection(mut stream: TcpStream, config: &GraphConfig) -> Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            break; // connection closed
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match process_command(trimmed, config) {
            Ok(data) => json!({
                "status": "success",
                "data": data
            }),
            Err(e) => json!({
                "status": "error",
                "message": e.to_string()
            }),
        };

        let response_str = serde_json::to_string(&response)?;
        stream.write_all(response_str.as_bytes())?;
        stream.write_all(b"\n")?;

        if let Ok(req) = serde_json::from_str::<CommandReq>(trimmed) {
            if req.command == "SHUTDOWN" {
                info!("Shutdown requested");
                std::process::exit(0);
            }
        }
    }
    Ok(())
}

fn process_command(json_str: &str, config: &GraphConfig) -> Result<serde_json::Value> {
    let req: CommandReq = serde_json::from_str(json_str).context("Invalid JSON format")?;

    match req.command.as_str() {
        "PING" => Ok(json!("PONG")),
        "TREE" => handle_tree(config),
        "GRAPH" => handle_graph(req.params, config),
        "GRAPH_ALL" => handle_graph_all(req.params, config),
        "SHUTDOWN" => Ok(json!("Shutting down...")),
        _ => anyhow::bail!("Unknown command: {}", req.command),
    }
}

/// Every command renders from a fresh snapshot of the source tree; node
/// state is never shared between requests.
fn fresh_map(config: &GraphConfig) -> Result<DependencyMap> {
    ImportScanner::new(config)?.dependency_map()
}

fn handle_tree(config: &GraphConfig) -> Result<serde_json::Value> {
    let map = fresh_map(config)?;
    let tree = TreeNode::from_map(&map, &config.root_label());
    Ok(serde_json::to_value(tree)?)
}

fn handle_graph(params: Option<serde_json::Value>, config: &GraphConfig) -> Result<serde_json::Value> {
    let params = params.ok_or_else(|| anyhow::anyhow!("Missing params for GRAPH"))?;
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing 'name' param"))?;
    let full = params.get("full").and_then(|v| v.as_bool()).unwrap_or(false);

    let map = fresh_map(config)?;
    let pipeline = RenderPipeline::new(config);
    Ok(json!(pipeline.subtree_dot(&map, name, !full)))
}

fn handle_graph_all(
    params: Option<serde_json::Value>,
    config: &GraphConfig,
) -> Result<serde_json::Value> {
    let full = params
        .as_ref()
        .and_then(|p| p.get("full"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let map = fresh_map(config)?;
    let pipeline = RenderPipeline::new(config);
    Ok(json!(pipeline.universe_dot(&map, !full)))
}
