//! Connector listing and lookup
//!
//! [`ConnectorService`] answers both `ballerinaConnector` methods. It never
//! fails as a whole: errors from individual sources or lookup strategies are
//! collected as [`Failure`]s next to whatever data could still be produced,
//! and the LSP layer reports them to the client.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::central::{CentralClient, CentralClientFactory, CentralError, HttpCentralClientFactory};
use crate::config::{DEFAULT_VERSION, LspConfig, PLATFORM_ANY};
use crate::connector::{Connector, ConnectorExtractor, SourceConnectorExtractor};
use crate::lsp::protocol::{
    CONNECTOR_METHOD, CONNECTORS_METHOD, ConnectorListRequest, ConnectorListResponse,
    ConnectorRequest, ConnectorResponse,
};
use crate::project::{
    BalaRepositoryResolver, FsProjectLoader, PackageResolver, ProjectError, ProjectLoader,
    resolve_bala_path,
};
use crate::settings::{FileSettingsSource, SettingsError, SettingsSource};

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Central(#[from] CentralError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("failed to serialize connector: {0}")]
    Json(#[from] serde_json::Error),
}

/// A source or strategy that failed while the request as a whole went on
#[derive(Debug)]
pub struct Failure {
    /// Operation description reported to the client
    pub message: String,
    pub error: ConnectorError,
}

impl Failure {
    pub fn new(message: impl Into<String>, error: ConnectorError) -> Self {
        Self {
            message: message.into(),
            error,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.message, self.error)
    }
}

/// Connector lookup strategies, tried in [`Strategy::ORDER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Registry lookup by connector id
    ById,
    /// Registry lookup by org, package, module, version and name
    ByFullyQualifiedName,
    /// Summary connectors of the project containing the target file
    ByLocalFile,
    /// Detailed connectors of the compiled package in the local repositories
    ByPackageCoordinate,
}

impl Strategy {
    pub const ORDER: [Strategy; 4] = [
        Strategy::ById,
        Strategy::ByFullyQualifiedName,
        Strategy::ByLocalFile,
        Strategy::ByPackageCoordinate,
    ];

    fn applies(self, request: &ConnectorRequest) -> bool {
        match self {
            Strategy::ById => request
                .connector_id
                .as_deref()
                .is_some_and(|id| !id.is_empty()),
            Strategy::ByFullyQualifiedName => request.is_full_connector,
            Strategy::ByLocalFile => request.target_file.is_some(),
            Strategy::ByPackageCoordinate => true,
        }
    }

    fn failure_message(self, request: &ConnectorRequest) -> String {
        match self {
            Strategy::ById | Strategy::ByFullyQualifiedName => operation_failed(CONNECTOR_METHOD),
            Strategy::ByLocalFile | Strategy::ByPackageCoordinate => format!(
                "Operation '{}' for {}:{} failed!",
                CONNECTOR_METHOD,
                cacheable_key(&request.org_name, &request.module_name, &request.version),
                request.name
            ),
        }
    }
}

/// Key identifying a package version in log messages. Empty versions use
/// [`DEFAULT_VERSION`].
pub fn cacheable_key(org: &str, module: &str, version: &str) -> String {
    let version = if version.is_empty() {
        DEFAULT_VERSION
    } else {
        version
    };
    format!("{}_{}_{}", org, module, version)
}

fn operation_failed(method: &str) -> String {
    format!("Operation '{}' failed!", method)
}

/// Result of a `ballerinaConnector/connectors` request
#[derive(Debug)]
pub struct ConnectorListing {
    pub response: ConnectorListResponse,
    pub failures: Vec<Failure>,
}

impl ConnectorListing {
    pub fn into_response(self) -> ConnectorListResponse {
        self.response
    }
}

/// Result of a `ballerinaConnector/connector` request
#[derive(Debug)]
pub struct ConnectorLookup {
    pub connector: Option<Value>,
    /// Strategy that produced `connector`
    pub resolved_by: Option<Strategy>,
    /// Failures of the strategies tried before the lookup ended
    pub failures: Vec<Failure>,
}

impl ConnectorLookup {
    pub fn into_response(self) -> ConnectorResponse {
        self.connector
    }
}

/// Collaborators used to answer connector requests
#[derive(Clone)]
pub struct ConnectorContext {
    pub settings: Arc<dyn SettingsSource>,
    pub central: Arc<dyn CentralClientFactory>,
    pub loader: Arc<dyn ProjectLoader>,
    pub extractor: Arc<dyn ConnectorExtractor>,
    pub resolver: Arc<dyn PackageResolver>,
    /// Ballerina distribution version reported to the registry
    pub ballerina_version: String,
}

impl ConnectorContext {
    /// Builds the filesystem and HTTP backed collaborators for `config`
    pub fn from_config(config: &LspConfig) -> Self {
        let ballerina_home = config.ballerina_home();
        info!(
            "Using Ballerina home {:?} and registry {}",
            ballerina_home,
            config.central_url()
        );

        Self {
            settings: Arc::new(FileSettingsSource::new(config.settings_path())),
            central: Arc::new(HttpCentralClientFactory::new(config.central_url())),
            loader: Arc::new(FsProjectLoader::new()),
            extractor: Arc::new(SourceConnectorExtractor::new()),
            resolver: Arc::new(BalaRepositoryResolver::new(&ballerina_home)),
            ballerina_version: config.ballerina_version(),
        }
    }
}

pub struct ConnectorService {
    ctx: ConnectorContext,
}

impl ConnectorService {
    pub fn new(ctx: ConnectorContext) -> Self {
        Self { ctx }
    }

    pub fn from_config(config: &LspConfig) -> Self {
        Self::new(ConnectorContext::from_config(config))
    }

    /// Lists registry connectors of `package_name` and summary connectors of
    /// the project containing `target_file`.
    ///
    /// Each source fails on its own; a failed source contributes an empty list.
    pub async fn list_connectors(&self, request: &ConnectorListRequest) -> ConnectorListing {
        let mut failures = Vec::new();

        let central = match self.search_central(&request.package_name).await {
            Ok(connectors) => connectors,
            Err(e) => {
                failures.push(Failure::new(operation_failed(CONNECTORS_METHOD), e));
                Vec::new()
            }
        };

        let local = match self.local_connectors(Path::new(&request.target_file), false) {
            Ok(connectors) => connectors,
            Err(e) => {
                failures.push(Failure::new(operation_failed(CONNECTORS_METHOD), e));
                Vec::new()
            }
        };

        debug!(
            "Listed {} registry and {} local connectors",
            central.len(),
            local.len()
        );

        ConnectorListing {
            response: ConnectorListResponse { central, local },
            failures,
        }
    }

    /// Runs the applicable strategies in order and stops at the first one
    /// that finds a connector
    pub async fn get_connector(&self, request: &ConnectorRequest) -> ConnectorLookup {
        let mut failures = Vec::new();

        for strategy in Strategy::ORDER {
            if !strategy.applies(request) {
                continue;
            }

            match self.run_strategy(strategy, request).await {
                Ok(Some(connector)) => {
                    debug!("Connector '{}' resolved by {:?}", request.name, strategy);
                    return ConnectorLookup {
                        connector: Some(connector),
                        resolved_by: Some(strategy),
                        failures,
                    };
                }
                Ok(None) => debug!("{:?} found no connector '{}'", strategy, request.name),
                Err(e) => failures.push(Failure::new(strategy.failure_message(request), e)),
            }
        }

        ConnectorLookup {
            connector: None,
            resolved_by: None,
            failures,
        }
    }

    async fn run_strategy(
        &self,
        strategy: Strategy,
        request: &ConnectorRequest,
    ) -> Result<Option<Value>, ConnectorError> {
        match strategy {
            Strategy::ById => {
                let id = request.connector_id.as_deref().unwrap_or_default();
                let connector = self
                    .central_client()?
                    .get_connector_by_id(id, PLATFORM_ANY, &self.ctx.ballerina_version)
                    .await?;
                Ok(non_null(connector))
            }
            Strategy::ByFullyQualifiedName => {
                let connector = self
                    .central_client()?
                    .get_connector_by_info(
                        &request.connector_info(),
                        PLATFORM_ANY,
                        &self.ctx.ballerina_version,
                    )
                    .await?;
                Ok(non_null(connector))
            }
            Strategy::ByLocalFile => {
                let target_file = request.target_file.as_deref().unwrap_or_default();
                let connectors = self.local_connectors(Path::new(target_file), false)?;
                find_by_name(connectors, &request.name)
            }
            Strategy::ByPackageCoordinate => {
                let bala_path = resolve_bala_path(
                    &*self.ctx.resolver,
                    &request.org_name,
                    &request.module_name,
                    &request.version,
                )?;
                let connectors = self.local_connectors(&bala_path, true)?;
                find_by_name(connectors, &request.name)
            }
        }
    }

    fn central_client(&self) -> Result<Arc<dyn CentralClient>, ConnectorError> {
        let settings = self.ctx.settings.load()?;
        Ok(self.ctx.central.create(&settings)?)
    }

    async fn search_central(&self, package_name: &str) -> Result<Vec<Value>, ConnectorError> {
        let result = self
            .central_client()?
            .search_connectors(package_name, PLATFORM_ANY, &self.ctx.ballerina_version)
            .await?;
        Ok(result.connectors)
    }

    fn local_connectors(&self, path: &Path, detailed: bool) -> Result<Vec<Connector>, ConnectorError> {
        let project = self.ctx.loader.load(path)?;
        Ok(self.ctx.extractor.extract(&project, detailed))
    }
}

fn non_null(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}

/// First connector whose name equals `name` exactly
fn find_by_name(connectors: Vec<Connector>, name: &str) -> Result<Option<Value>, ConnectorError> {
    connectors
        .into_iter()
        .find(|c| c.name == name)
        .map(serde_json::to_value)
        .transpose()
        .map_err(ConnectorError::from)
}
