use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Platform tag sent to Ballerina Central for connector lookups
pub const PLATFORM_ANY: &str = "any";

/// Version used in place of an empty package version when building keys
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Ballerina distribution version reported to Ballerina Central by default
pub const DEFAULT_BALLERINA_VERSION: &str = "2201.8.0";

/// Production Ballerina Central registry API
pub const PRODUCTION_CENTRAL_URL: &str = "https://api.central.ballerina.io/2.0/registry";

/// Staging Ballerina Central registry API
pub const STAGING_CENTRAL_URL: &str = "https://api.staging-central.ballerina.io/2.0/registry";

/// Development Ballerina Central registry API
pub const DEV_CENTRAL_URL: &str = "https://api.dev-central.ballerina.io/2.0/registry";

/// Timeout for registry requests in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Name of the user settings file inside the Ballerina home directory
pub const SETTINGS_FILE_NAME: &str = "Settings.toml";

/// LSP configuration structure, read from `initializationOptions`
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LspConfig {
    /// Overrides the Ballerina Central registry URL
    pub central_url: Option<String>,
    /// Overrides the Ballerina version reported to the registry
    pub ballerina_version: Option<String>,
    /// Overrides the Ballerina home directory (`~/.ballerina`)
    pub ballerina_home: Option<PathBuf>,
}

impl LspConfig {
    /// Registry URL used to build Central clients
    pub fn central_url(&self) -> String {
        central_url_with_env(
            self.central_url.clone(),
            std::env::var("BALLERINA_DEV_CENTRAL").ok(),
            std::env::var("BALLERINA_STAGE_CENTRAL").ok(),
        )
    }

    /// Ballerina version reported to the registry
    pub fn ballerina_version(&self) -> String {
        self.ballerina_version
            .clone()
            .or_else(|| std::env::var("BALLERINA_VERSION").ok())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BALLERINA_VERSION.to_string())
    }

    /// Ballerina home directory holding `Settings.toml` and the bala repositories
    pub fn ballerina_home(&self) -> PathBuf {
        self.ballerina_home.clone().unwrap_or_else(|| {
            ballerina_home_with_env(std::env::var("BALLERINA_HOME_DIR").ok(), dirs::home_dir())
        })
    }

    /// Path to the user's `Settings.toml`
    pub fn settings_path(&self) -> PathBuf {
        self.ballerina_home().join(SETTINGS_FILE_NAME)
    }
}

/// Returns the path to the data directory for ballerina-connector-lsp.
/// Uses $XDG_DATA_HOME/ballerina-connector-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/ballerina-connector-lsp,
/// or ./ballerina-connector-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("ballerina-connector-lsp.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("ballerina-connector-lsp")
}

fn ballerina_home_with_env(home_dir_env: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    home_dir_env
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".ballerina")))
        .unwrap_or_else(|| PathBuf::from(".ballerina"))
}

fn central_url_with_env(
    explicit: Option<String>,
    dev_central: Option<String>,
    stage_central: Option<String>,
) -> String {
    if let Some(url) = explicit.filter(|url| !url.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }

    let enabled = |flag: Option<String>| flag.is_some_and(|v| v.eq_ignore_ascii_case("true"));

    if enabled(dev_central) {
        DEV_CENTRAL_URL.to_string()
    } else if enabled(stage_central) {
        STAGING_CENTRAL_URL.to_string()
    } else {
        PRODUCTION_CENTRAL_URL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn lsp_config_from_empty_object_uses_defaults() {
        let result = serde_json::from_value::<LspConfig>(json!({})).unwrap();

        assert_eq!(result, LspConfig::default());
    }

    #[test]
    fn lsp_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<LspConfig>(json!({
            "centralUrl": "http://localhost:9090/registry",
            "ballerinaVersion": "2201.9.0",
            "ballerinaHome": "/opt/ballerina-home"
        }))
        .unwrap();

        assert_eq!(
            result,
            LspConfig {
                central_url: Some("http://localhost:9090/registry".to_string()),
                ballerina_version: Some("2201.9.0".to_string()),
                ballerina_home: Some(PathBuf::from("/opt/ballerina-home")),
            }
        );
    }

    #[test]
    fn settings_path_is_inside_configured_home() {
        let config = LspConfig {
            ballerina_home: Some(PathBuf::from("/tmp/bal")),
            ..Default::default()
        };

        assert_eq!(config.settings_path(), PathBuf::from("/tmp/bal/Settings.toml"));
    }

    #[test]
    fn explicit_ballerina_version_wins() {
        let config = LspConfig {
            ballerina_version: Some("2201.1.0".to_string()),
            ..Default::default()
        };

        assert_eq!(config.ballerina_version(), "2201.1.0");
    }

    #[rstest]
    #[case(Some("http://localhost:8080/"), None, None, "http://localhost:8080")]
    #[case(None, Some("true"), None, DEV_CENTRAL_URL)]
    #[case(None, None, Some("TRUE"), STAGING_CENTRAL_URL)]
    #[case(None, Some("false"), Some("false"), PRODUCTION_CENTRAL_URL)]
    #[case(Some(""), None, None, PRODUCTION_CENTRAL_URL)]
    #[case(None, None, None, PRODUCTION_CENTRAL_URL)]
    fn central_url_with_env_resolves_in_priority_order(
        #[case] explicit: Option<&str>,
        #[case] dev: Option<&str>,
        #[case] stage: Option<&str>,
        #[case] expected: &str,
    ) {
        let url = central_url_with_env(
            explicit.map(String::from),
            dev.map(String::from),
            stage.map(String::from),
        );

        assert_eq!(url, expected);
    }

    #[test]
    fn ballerina_home_with_env_prefers_env_variable() {
        let path = ballerina_home_with_env(
            Some("/srv/ballerina".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/srv/ballerina"));
    }

    #[test]
    fn ballerina_home_with_env_falls_back_to_dot_ballerina() {
        let path = ballerina_home_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.ballerina"));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/ballerina-connector-lsp"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(
            path,
            PathBuf::from("/home/user/.local/share/ballerina-connector-lsp")
        );
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./ballerina-connector-lsp"));
    }
}
