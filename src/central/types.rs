//! Wire types exchanged with Ballerina Central

use serde::{Deserialize, Serialize};

/// Fully-qualified connector name used to look a connector up on Central
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorInfo {
    pub org: String,
    pub package: String,
    pub module: String,
    pub version: String,
    pub name: String,
}

impl ConnectorInfo {
    pub fn new(
        org: impl Into<String>,
        package: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            org: org.into(),
            package: package.into(),
            module: module.into(),
            version: version.into(),
            name: name.into(),
        }
    }
}

/// Result of a connector search. Connector entries are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralConnectorListResult {
    pub connectors: Vec<serde_json::Value>,
    pub count: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Error body returned by Central on non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct CentralErrorBody {
    pub message: Option<String>,
}
