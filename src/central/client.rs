//! Client traits for Ballerina Central

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::central::error::CentralError;
use crate::central::types::{CentralConnectorListResult, ConnectorInfo};
use crate::settings::Settings;

/// Connector lookups against Ballerina Central
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CentralClient: Send + Sync {
    /// Searches connectors of a package. An empty `package_name` matches every package.
    ///
    /// # Arguments
    /// * `package_name` - Package to search connectors in
    /// * `platform` - Platform tag (e.g., "any")
    /// * `ballerina_version` - Version of the Ballerina distribution making the request
    async fn search_connectors(
        &self,
        package_name: &str,
        platform: &str,
        ballerina_version: &str,
    ) -> Result<CentralConnectorListResult, CentralError>;

    /// Fetches the full metadata of a connector by its registry id
    async fn get_connector_by_id(
        &self,
        connector_id: &str,
        platform: &str,
        ballerina_version: &str,
    ) -> Result<serde_json::Value, CentralError>;

    /// Fetches the full metadata of a connector by its fully-qualified name
    async fn get_connector_by_info(
        &self,
        info: &ConnectorInfo,
        platform: &str,
        ballerina_version: &str,
    ) -> Result<serde_json::Value, CentralError>;
}

/// Builds a Central client from the current user settings
#[cfg_attr(test, automock)]
pub trait CentralClientFactory: Send + Sync {
    fn create(&self, settings: &Settings) -> Result<Arc<dyn CentralClient>, CentralError>;
}
