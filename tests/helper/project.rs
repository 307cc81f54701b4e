//! Project and repository fixtures

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use ballerina_connector_lsp::central::HttpCentralClientFactory;
use ballerina_connector_lsp::connector::SourceConnectorExtractor;
use ballerina_connector_lsp::lsp::service::{ConnectorContext, ConnectorService};
use ballerina_connector_lsp::project::{BalaRepositoryResolver, FsProjectLoader};
use ballerina_connector_lsp::settings::FileSettingsSource;

pub const BALLERINA_VERSION: &str = "2201.8.0";

pub const CLIENT_SOURCE: &str = r#"import ballerina/http;

# Client for the inventory service.
@display {
    label: "Inventory",
    iconPath: "icon.png"
}
public isolated client class Client {
    final http:Client clientEp;

    # Initializes the client.
    # + serviceUrl - URL of the service
    public isolated function init(string serviceUrl = "http://localhost:9090") returns error? {
        self.clientEp = check new (serviceUrl);
    }

    # Lists items.
    # + return - The items
    resource isolated function get items(int 'limit = 10) returns json|error {
        return self.clientEp->get(string `/items?limit=${'limit}`);
    }

    remote isolated function addItem(json item) returns error? {
        _ = check self.clientEp->post("/items", item, targetType = json);
    }

    isolated function helper() {
    }
}

client class Internal {
}
"#;

/// Write a build project with `Ballerina.toml` and a single `main.bal`
pub fn create_build_project(root: &Path, org: &str, name: &str, version: &str) -> PathBuf {
    std::fs::create_dir_all(root).unwrap();
    std::fs::write(
        root.join("Ballerina.toml"),
        format!(
            "[package]\norg = \"{}\"\nname = \"{}\"\nversion = \"{}\"\n",
            org, name, version
        ),
    )
    .unwrap();
    let main = root.join("main.bal");
    std::fs::write(&main, CLIENT_SOURCE).unwrap();
    main
}

/// Install an extracted bala at `<repo>/<org>/<name>/<version>/any`
pub fn install_bala(repo: &Path, org: &str, name: &str, version: &str) -> PathBuf {
    let root = repo.join(org).join(name).join(version).join("any");
    let module_dir = root.join("modules").join(name);
    std::fs::create_dir_all(&module_dir).unwrap();
    std::fs::write(
        root.join("package.json"),
        format!(
            r#"{{"organization": "{}", "name": "{}", "version": "{}"}}"#,
            org, name, version
        ),
    )
    .unwrap();
    std::fs::write(module_dir.join("client.bal"), CLIENT_SOURCE).unwrap();
    root
}

/// Ballerina home layout with a Central bala cache
pub struct BallerinaHome {
    pub dir: TempDir,
}

impl BallerinaHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn bala_repository(&self) -> PathBuf {
        self.path()
            .join("repositories")
            .join("central.ballerina.io")
            .join("bala")
    }

    /// Service backed by the real filesystem and a registry at `central_url`
    pub fn service(&self, central_url: &str) -> ConnectorService {
        ConnectorService::new(ConnectorContext {
            settings: Arc::new(FileSettingsSource::new(self.path().join("Settings.toml"))),
            central: Arc::new(HttpCentralClientFactory::new(central_url)),
            loader: Arc::new(FsProjectLoader::new()),
            extractor: Arc::new(SourceConnectorExtractor::new()),
            resolver: Arc::new(BalaRepositoryResolver::new(self.path())),
            ballerina_version: BALLERINA_VERSION.to_string(),
        })
    }
}
