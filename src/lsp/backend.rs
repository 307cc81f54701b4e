use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info, warn};

use crate::config::LspConfig;
use crate::lsp::protocol::{
    ConnectorListRequest, ConnectorListResponse, ConnectorRequest, ConnectorResponse,
};
use crate::lsp::service::{ConnectorService, Failure};

pub struct Backend {
    client: Client,
    service: RwLock<Arc<ConnectorService>>,
    /// Rebuild the service from `initializationOptions` on initialize
    configurable: bool,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            service: RwLock::new(Arc::new(ConnectorService::from_config(
                &LspConfig::default(),
            ))),
            configurable: true,
        }
    }

    /// Build a Backend around a prepared service; initialization options are ignored
    pub fn build(client: Client, service: ConnectorService) -> Self {
        Self {
            client,
            service: RwLock::new(Arc::new(service)),
            configurable: false,
        }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities::default()
    }

    async fn service(&self) -> Arc<ConnectorService> {
        self.service.read().await.clone()
    }

    async fn apply_initialization_options(&self, options: Option<serde_json::Value>) {
        let config = match options {
            Some(options) => serde_json::from_value::<LspConfig>(options)
                .inspect_err(|e| warn!("Ignoring invalid initialization options: {}", e))
                .unwrap_or_default(),
            None => LspConfig::default(),
        };
        info!("Configuration: {:?}", config);

        *self.service.write().await = Arc::new(ConnectorService::from_config(&config));
    }

    async fn report_failures(&self, failures: &[Failure]) {
        for failure in failures {
            error!("{}", failure);
            self.client
                .log_message(MessageType::ERROR, failure.to_string())
                .await;
        }
    }

    /// Handler for `ballerinaConnector/connectors`
    pub async fn connectors(&self, params: ConnectorListRequest) -> Result<ConnectorListResponse> {
        let listing = self.service().await.list_connectors(&params).await;
        self.report_failures(&listing.failures).await;
        Ok(listing.into_response())
    }

    /// Handler for `ballerinaConnector/connector`
    pub async fn connector(&self, params: ConnectorRequest) -> Result<ConnectorResponse> {
        let lookup = self.service().await.get_connector(&params).await;
        self.report_failures(&lookup.failures).await;
        Ok(lookup.into_response())
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;

        if self.configurable {
            self.apply_initialization_options(params.initialization_options)
                .await;
        }

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "ballerina-connector-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }
}
