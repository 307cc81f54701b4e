//! Request and response types of the `ballerinaConnector` JSON-RPC methods

use serde::{Deserialize, Serialize};

use crate::central::types::ConnectorInfo;
use crate::connector::types::Connector;

/// Lists connectors from Ballerina Central and the local project
pub const CONNECTORS_METHOD: &str = "ballerinaConnector/connectors";

/// Resolves a single connector
pub const CONNECTOR_METHOD: &str = "ballerinaConnector/connector";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorListRequest {
    /// Package filter for the registry search; empty means every package
    pub package_name: String,
    /// File whose enclosing project is scanned for local connectors
    pub target_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorListResponse {
    pub central: Vec<serde_json::Value>,
    pub local: Vec<Connector>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorRequest {
    pub connector_id: Option<String>,
    #[serde(alias = "fullConnector")]
    pub is_full_connector: bool,
    pub org_name: String,
    pub package_name: String,
    pub module_name: String,
    pub version: String,
    pub name: String,
    pub target_file: Option<String>,
}

impl ConnectorRequest {
    /// Fully-qualified name used for registry lookups
    pub fn connector_info(&self) -> ConnectorInfo {
        ConnectorInfo::new(
            &self.org_name,
            &self.package_name,
            &self.module_name,
            &self.version,
            &self.name,
        )
    }
}

/// Connector object, or `null` when nothing matched
pub type ConnectorResponse = Option<serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connector_request_reads_wire_field_names() {
        let request: ConnectorRequest = serde_json::from_value(json!({
            "connectorId": "42",
            "isFullConnector": true,
            "orgName": "ballerinax",
            "packageName": "github",
            "moduleName": "github",
            "version": "4.0.0",
            "name": "Client",
            "targetFile": "/tmp/main.bal"
        }))
        .unwrap();

        assert_eq!(
            request,
            ConnectorRequest {
                connector_id: Some("42".to_string()),
                is_full_connector: true,
                org_name: "ballerinax".to_string(),
                package_name: "github".to_string(),
                module_name: "github".to_string(),
                version: "4.0.0".to_string(),
                name: "Client".to_string(),
                target_file: Some("/tmp/main.bal".to_string()),
            }
        );
    }

    #[test]
    fn connector_request_accepts_full_connector_alias_and_missing_fields() {
        let request: ConnectorRequest =
            serde_json::from_value(json!({"fullConnector": true, "name": "Client"})).unwrap();

        assert!(request.is_full_connector);
        assert_eq!(request.connector_id, None);
        assert_eq!(request.target_file, None);
        assert_eq!(request.org_name, "");
    }

    #[test]
    fn empty_list_response_serializes_both_arrays() {
        let value = serde_json::to_value(ConnectorListResponse::default()).unwrap();

        assert_eq!(value, json!({"central": [], "local": []}));
    }
}
