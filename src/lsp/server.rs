use std::path::PathBuf;

use anyhow::Context;
use tower_lsp::{Client, ClientSocket, LspService, Server};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LspConfig, log_path};
use crate::lsp::backend::Backend;
use crate::lsp::protocol::{CONNECTOR_METHOD, CONNECTORS_METHOD, ConnectorListRequest};
use crate::lsp::service::ConnectorService;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs go to a file; stdout carries the JSON-RPC stream
fn init_file_logging() -> anyhow::Result<WorkerGuard> {
    let log_path = log_path();
    let log_dir = log_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {:?}", log_dir))?;

    let file_name = log_path
        .file_name()
        .context("log path has no file name")?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&log_dir, file_name));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    Ok(guard)
}

/// Builds the LSP service with the `ballerinaConnector` methods registered
pub fn build_service<F>(init: F) -> (LspService<Backend>, ClientSocket)
where
    F: FnOnce(Client) -> Backend,
{
    LspService::build(init)
        .custom_method(CONNECTORS_METHOD, Backend::connectors)
        .custom_method(CONNECTOR_METHOD, Backend::connector)
        .finish()
}

pub async fn run_server() -> anyhow::Result<()> {
    let _guard = init_file_logging()?;
    info!(
        "Starting ballerina-connector-lsp {}",
        env!("CARGO_PKG_VERSION")
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = build_service(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}

/// Runs a single connector listing and prints the response as JSON.
///
/// Failed sources are logged to stderr; their lists stay empty.
pub async fn print_connectors(request: ConnectorListRequest) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let service = ConnectorService::from_config(&LspConfig::default());
    let listing = service.list_connectors(&request).await;
    for failure in &listing.failures {
        warn!("{}", failure);
    }

    let output = serde_json::to_string_pretty(&listing.into_response())?;
    println!("{}", output);

    Ok(())
}
