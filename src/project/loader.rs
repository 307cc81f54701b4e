//! Project loading from the filesystem

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::debug;

use crate::config::DEFAULT_VERSION;
use crate::project::error::ProjectError;
use crate::project::types::{Document, Module, PackageDescriptor, Project, ProjectKind};
use crate::toml::TomlDocument;

/// Manifest file of a build project
pub const BALLERINA_TOML: &str = "Ballerina.toml";

/// Package metadata file of an extracted bala
pub const BALA_PACKAGE_JSON: &str = "package.json";

/// Directory holding non-default modules
const MODULES_DIR: &str = "modules";

/// Source file extension
const BAL_EXTENSION: &str = "bal";

/// Organization used for projects without a manifest
const ANON_ORG: &str = "$anon";

/// Loads a Ballerina project from a path
#[cfg_attr(test, automock)]
pub trait ProjectLoader: Send + Sync {
    /// Loads the project rooted at, or containing, `path`.
    ///
    /// `path` may point at a file that does not exist yet (an unsaved editor
    /// buffer); the enclosing package is loaded in that case.
    fn load(&self, path: &Path) -> Result<Project, ProjectError>;
}

/// Loads build projects, single-file projects and extracted balas from disk
#[derive(Debug, Default, Clone)]
pub struct FsProjectLoader;

impl FsProjectLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ProjectLoader for FsProjectLoader {
    fn load(&self, path: &Path) -> Result<Project, ProjectError> {
        if path.is_dir() {
            return load_directory(path)
                .unwrap_or_else(|| Err(ProjectError::ProjectNotFound(path.to_path_buf())));
        }

        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        for ancestor in parent.ancestors() {
            match load_directory(ancestor) {
                // package.json of some other tool next to a modules/ directory
                Some(Err(ProjectError::InvalidBalaMetadata { path, source })) => {
                    debug!("Skipping {:?}, not bala metadata: {}", path, source);
                }
                Some(project) => return project,
                None => {}
            }
        }

        if path.extension().is_some_and(|ext| ext == BAL_EXTENSION) {
            return load_single_file(path);
        }

        Err(ProjectError::ProjectNotFound(path.to_path_buf()))
    }
}

/// Loads `dir` if it is a project root, `None` otherwise
fn load_directory(dir: &Path) -> Option<Result<Project, ProjectError>> {
    if dir.join(BALLERINA_TOML).is_file() {
        Some(load_build_project(dir))
    } else if is_bala_root(dir) {
        Some(load_bala_project(dir))
    } else {
        None
    }
}

fn is_bala_root(dir: &Path) -> bool {
    dir.join(BALA_PACKAGE_JSON).is_file() && dir.join(MODULES_DIR).is_dir()
}

fn load_build_project(root: &Path) -> Result<Project, ProjectError> {
    debug!("Loading build project at {:?}", root);

    let manifest_path = root.join(BALLERINA_TOML);
    let content = std::fs::read_to_string(&manifest_path)
        .map_err(|e| ProjectError::io(&manifest_path, e))?;
    let manifest =
        TomlDocument::parse(&content).map_err(|source| ProjectError::InvalidManifest {
            path: manifest_path.clone(),
            source,
        })?;

    let package = PackageDescriptor::new(
        manifest.get_str("package", "org").unwrap_or(ANON_ORG),
        manifest
            .get_str("package", "name")
            .map(String::from)
            .unwrap_or_else(|| file_name(root)),
        manifest
            .get_str("package", "version")
            .unwrap_or(DEFAULT_VERSION),
    );

    let mut modules = vec![Module {
        name: package.name.clone(),
        documents: read_documents(root)?,
    }];

    for sub_dir in sub_directories(&root.join(MODULES_DIR))? {
        modules.push(Module {
            name: format!("{}.{}", package.name, file_name(&sub_dir)),
            documents: read_documents(&sub_dir)?,
        });
    }

    Ok(Project {
        kind: ProjectKind::Build,
        source_root: root.to_path_buf(),
        package,
        modules,
    })
}

/// `package.json` of an extracted bala
#[derive(Debug, Deserialize)]
struct BalaPackageJson {
    organization: String,
    name: String,
    version: String,
}

fn load_bala_project(root: &Path) -> Result<Project, ProjectError> {
    debug!("Loading bala project at {:?}", root);

    let metadata_path = root.join(BALA_PACKAGE_JSON);
    let content = std::fs::read_to_string(&metadata_path)
        .map_err(|e| ProjectError::io(&metadata_path, e))?;
    let metadata: BalaPackageJson =
        serde_json::from_str(&content).map_err(|source| ProjectError::InvalidBalaMetadata {
            path: metadata_path.clone(),
            source,
        })?;

    let mut modules = Vec::new();
    for module_dir in sub_directories(&root.join(MODULES_DIR))? {
        modules.push(Module {
            name: file_name(&module_dir),
            documents: read_documents(&module_dir)?,
        });
    }

    Ok(Project {
        kind: ProjectKind::Bala,
        source_root: root.to_path_buf(),
        package: PackageDescriptor::new(metadata.organization, metadata.name, metadata.version),
        modules,
    })
}

fn load_single_file(path: &Path) -> Result<Project, ProjectError> {
    debug!("Loading single file project {:?}", path);

    let content = std::fs::read_to_string(path).map_err(|e| ProjectError::io(path, e))?;
    let document = Document {
        name: file_name(path),
        path: path.to_path_buf(),
        content,
    };

    Ok(Project {
        kind: ProjectKind::SingleFile,
        source_root: path.to_path_buf(),
        package: PackageDescriptor::new(ANON_ORG, ".", DEFAULT_VERSION),
        modules: vec![Module {
            name: ".".to_string(),
            documents: vec![document],
        }],
    })
}

/// Reads the `.bal` files directly inside `dir`, sorted by file name
fn read_documents(dir: &Path) -> Result<Vec<Document>, ProjectError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ProjectError::io(dir, e))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == BAL_EXTENSION))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let content = std::fs::read_to_string(&path).map_err(|e| ProjectError::io(&path, e))?;
            Ok(Document {
                name: file_name(&path),
                path,
                content,
            })
        })
        .collect()
}

/// Sorted sub directories of `dir`; a missing directory has none
fn sub_directories(dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ProjectError::io(dir, e))?;
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    Ok(dirs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
