//! Loaded project model

use std::fmt;
use std::path::PathBuf;

/// Identifies a package by organization, name and version
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PackageDescriptor {
    pub org: String,
    pub name: String,
    pub version: String,
}

impl PackageDescriptor {
    pub fn new(org: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.org, self.name, self.version)
    }
}

/// How a project was discovered on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// Directory with a `Ballerina.toml`
    Build,
    /// Standalone `.bal` file
    SingleFile,
    /// Extracted compiled package from a bala repository
    Bala,
}

/// A single `.bal` source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Fully-qualified module name (`http` or `http.auth`)
    pub name: String,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub kind: ProjectKind,
    pub source_root: PathBuf,
    pub package: PackageDescriptor,
    pub modules: Vec<Module>,
}

impl Project {
    pub fn documents(&self) -> impl Iterator<Item = (&Module, &Document)> {
        self.modules
            .iter()
            .flat_map(|module| module.documents.iter().map(move |doc| (module, doc)))
    }
}
