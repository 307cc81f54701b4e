use std::path::PathBuf;

use thiserror::Error;

use crate::toml::TomlError;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("No Ballerina project found at {0:?}")]
    ProjectNotFound(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Ballerina.toml at {path:?}: {source}")]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: TomlError,
    },

    #[error("Invalid package.json at {path:?}: {source}")]
    InvalidBalaMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no compiled package found for package '{0}'")]
    NoCompiledPackage(String),
}

impl ProjectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProjectError::Io {
            path: path.into(),
            source,
        }
    }
}
