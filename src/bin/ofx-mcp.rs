use anyhow::Result;
use ofx_mcp::config::Config;
use ofx_mcp::mcp::OfxMcpServer;
use rmcp::{ServiceExt, transport::stdio};
use std::env;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Value following `--config`, if given
fn config_arg(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("ofx-mcp {}", VERSION);
        return Ok(());
    }

    let verbose = args.iter().any(|a| a == "--debug" || a == "-v" || a == "--verbose");
    let default_filter = if verbose { "debug" } else { "info" };

    // stdout carries the protocol
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();

    info!(version = VERSION, "Starting ofx-mcp server");
    debug!(args = ?args, "Command line arguments");

    let config = match config_arg(&args) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    let server = OfxMcpServer::from_config(&config)?;
    debug!("OfxMcpServer created");

    info!("Connecting via stdio transport (stdin/stdout)...");
    let service = match server.serve(stdio()).await {
        Ok(s) => {
            info!("MCP service created successfully");
            s
        }
        Err(e) => {
            error!(error = %e, "Failed to create MCP service");
            anyhow::bail!("Failed to create MCP service: {}", e);
        }
    };

    info!("Server ready, waiting for requests on stdio...");
    service.waiting().await.map_err(|e| anyhow::anyhow!("Service error: {}", e))?;

    info!("Server shutting down");
    Ok(())
}
