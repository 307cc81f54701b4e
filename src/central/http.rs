//! Ballerina Central registry API implementation

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::central::client::{CentralClient, CentralClientFactory};
use crate::central::error::CentralError;
use crate::central::types::{CentralConnectorListResult, CentralErrorBody, ConnectorInfo};
use crate::config::HTTP_TIMEOUT_SECS;
use crate::settings::{Proxy, Settings};

/// Header carrying the platform tag
const BALLERINA_PLATFORM: &str = "Ballerina-Platform";

/// Path segment of the connector endpoints
const CONNECTORS: &str = "connectors";

/// Registry client for the Ballerina Central REST API
pub struct HttpCentralClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpCentralClient {
    /// Creates a client without proxy or credentials
    pub fn new(base_url: &str) -> Result<Self, CentralError> {
        Self::with_settings(base_url, &Proxy::default(), None)
    }

    /// Creates a client bound to a proxy and an optional access token
    pub fn with_settings(
        base_url: &str,
        proxy: &Proxy,
        access_token: Option<String>,
    ) -> Result<Self, CentralError> {
        let mut builder = reqwest::Client::builder()
            .user_agent("ballerina-connector-lsp")
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS));

        if let Some(proxy_url) = proxy.url() {
            let mut http_proxy = reqwest::Proxy::all(&proxy_url)
                .map_err(|e| CentralError::Proxy(format!("{}: {}", proxy_url, e)))?;
            if let Some(username) = &proxy.username {
                http_proxy =
                    http_proxy.basic_auth(username, proxy.password.as_deref().unwrap_or_default());
            }
            debug!("Using proxy {} for Ballerina Central", proxy_url);
            builder = builder.proxy(http_proxy);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn headers(&self, platform: &str, ballerina_version: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(platform) {
            headers.insert(BALLERINA_PLATFORM, value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("ballerina/{}", ballerina_version)) {
            headers.insert(USER_AGENT, value);
        }
        if let Some(token) = &self.access_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    fn url(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url, CentralError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CentralError::InvalidResponse(format!("Invalid registry URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| CentralError::InvalidResponse("Registry URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        not_found: &str,
        platform: &str,
        ballerina_version: &str,
    ) -> Result<T, CentralError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .headers(self.headers(platform, ballerina_version))
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CentralError::NotFound(not_found.to_string()));
        }

        if !status.is_success() {
            warn!("Ballerina Central returned status {}: {}", status, url);
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CentralErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(CentralError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse Ballerina Central response: {}", e);
            CentralError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl CentralClient for HttpCentralClient {
    async fn search_connectors(
        &self,
        package_name: &str,
        platform: &str,
        ballerina_version: &str,
    ) -> Result<CentralConnectorListResult, CentralError> {
        let params: Vec<(&str, &str)> = if package_name.is_empty() {
            Vec::new()
        } else {
            vec![("package", package_name)]
        };
        let url = self.url(&[CONNECTORS], &params)?;

        self.get_json(url, package_name, platform, ballerina_version)
            .await
    }

    async fn get_connector_by_id(
        &self,
        connector_id: &str,
        platform: &str,
        ballerina_version: &str,
    ) -> Result<serde_json::Value, CentralError> {
        let url = self.url(&[CONNECTORS, connector_id], &[])?;

        self.get_json(url, connector_id, platform, ballerina_version)
            .await
    }

    async fn get_connector_by_info(
        &self,
        info: &ConnectorInfo,
        platform: &str,
        ballerina_version: &str,
    ) -> Result<serde_json::Value, CentralError> {
        let url = self.url(
            &[CONNECTORS, "info"],
            &[
                ("org", info.org.as_str()),
                ("package", info.package.as_str()),
                ("module", info.module.as_str()),
                ("version", info.version.as_str()),
                ("connector", info.name.as_str()),
            ],
        )?;
        let fqn = format!(
            "{}/{}:{}:{}",
            info.org, info.module, info.version, info.name
        );

        self.get_json(url, &fqn, platform, ballerina_version).await
    }
}

/// Creates a fresh [`HttpCentralClient`] per call from the current settings
pub struct HttpCentralClientFactory {
    base_url: String,
}

impl HttpCentralClientFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl CentralClientFactory for HttpCentralClientFactory {
    fn create(&self, settings: &Settings) -> Result<Arc<dyn CentralClient>, CentralError> {
        let client =
            HttpCentralClient::with_settings(&self.base_url, &settings.proxy, settings.access_token())?;
        Ok(Arc::new(client))
    }
}
