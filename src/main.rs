use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ballerina_connector_lsp::lsp::protocol::ConnectorListRequest;
use ballerina_connector_lsp::lsp::server::{print_connectors, run_server};

#[derive(Parser)]
#[command(name = "ballerina-connector-lsp")]
#[command(version, about = "Language Server for Ballerina connector metadata")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List connectors from Ballerina Central and the project containing a file
    Connectors {
        /// File inside the project to scan for local connectors
        #[arg(long)]
        target_file: PathBuf,
        /// Restrict the registry search to a package
        #[arg(long, default_value = "")]
        package_name: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        None => runtime.block_on(run_server()),
        Some(Command::Connectors {
            target_file,
            package_name,
        }) => runtime.block_on(print_connectors(ConnectorListRequest {
            package_name,
            target_file: target_file.to_string_lossy().into_owned(),
        })),
    }
}
