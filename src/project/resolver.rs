//! Package resolution against the local bala repositories

use std::path::{Component, Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use semver::Version;
use tracing::{debug, warn};

use crate::config::PLATFORM_ANY;
use crate::project::error::ProjectError;
use crate::project::loader::BALA_PACKAGE_JSON;
use crate::project::types::PackageDescriptor;

/// Outcome of resolving a single package descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// A compiled package was found; holds its source root
    Resolved(PathBuf),
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResponse {
    pub descriptor: PackageDescriptor,
    pub status: ResolutionStatus,
}

/// Resolves package descriptors to compiled packages
#[cfg_attr(test, automock)]
pub trait PackageResolver: Send + Sync {
    /// Resolves each descriptor; responses are returned in request order
    fn resolve_packages(&self, descriptors: &[PackageDescriptor]) -> Vec<ResolutionResponse>;
}

/// Looks packages up in the bala repositories under the Ballerina home
/// (`<home>/repositories/<repo>/bala/<org>/<name>/<version>/<platform>`)
pub struct BalaRepositoryResolver {
    repositories: Vec<PathBuf>,
}

impl BalaRepositoryResolver {
    /// Uses the Central cache and the local repository of `ballerina_home`
    pub fn new(ballerina_home: &Path) -> Self {
        let repositories = ballerina_home.join("repositories");
        Self::with_repositories(vec![
            repositories.join("central.ballerina.io").join("bala"),
            repositories.join("local").join("bala"),
        ])
    }

    pub fn with_repositories(repositories: Vec<PathBuf>) -> Self {
        Self { repositories }
    }

    fn resolve_one(&self, descriptor: &PackageDescriptor) -> ResolutionStatus {
        let version_ok =
            descriptor.version.is_empty() || is_plain_component(&descriptor.version);
        if !is_plain_component(&descriptor.org)
            || !is_plain_component(&descriptor.name)
            || !version_ok
        {
            warn!("Rejected package coordinates {}", descriptor);
            return ResolutionStatus::Unresolved;
        }

        for repository in &self.repositories {
            let package_dir = repository.join(&descriptor.org).join(&descriptor.name);
            if !package_dir.is_dir() {
                continue;
            }

            let version_dir = if descriptor.version.is_empty() {
                match latest_version_dir(&package_dir) {
                    Some(dir) => dir,
                    None => continue,
                }
            } else {
                package_dir.join(&descriptor.version)
            };

            if let Some(root) = platform_dir(&version_dir) {
                debug!("Resolved {} to {:?}", descriptor, root);
                return ResolutionStatus::Resolved(root);
            }
        }

        debug!("No compiled package found for {}", descriptor);
        ResolutionStatus::Unresolved
    }
}

impl PackageResolver for BalaRepositoryResolver {
    fn resolve_packages(&self, descriptors: &[PackageDescriptor]) -> Vec<ResolutionResponse> {
        descriptors
            .iter()
            .map(|descriptor| ResolutionResponse {
                descriptor: descriptor.clone(),
                status: self.resolve_one(descriptor),
            })
            .collect()
    }
}

/// A single non-empty path segment that stays inside its parent directory
fn is_plain_component(component: &str) -> bool {
    let mut components = Path::new(component).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !component.contains(['/', '\\'])
}

/// Newest semver-named directory in `package_dir`
fn latest_version_dir(package_dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(package_dir)
        .inspect_err(|e| warn!("Failed to read {:?}: {}", package_dir, e))
        .ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            Version::parse(&name).ok().map(|v| (v, entry.path()))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, path)| path)
}

/// Platform directory holding the extracted bala, preferring `any`
fn platform_dir(version_dir: &Path) -> Option<PathBuf> {
    let any = version_dir.join(PLATFORM_ANY);
    if any.join(BALA_PACKAGE_JSON).is_file() {
        return Some(any);
    }

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(version_dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.join(BALA_PACKAGE_JSON).is_file())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Resolves `(org, name, version)` to the source root of its compiled package.
///
/// Only the first resolution response is consulted.
pub fn resolve_bala_path(
    resolver: &dyn PackageResolver,
    org: &str,
    name: &str,
    version: &str,
) -> Result<PathBuf, ProjectError> {
    let descriptor = PackageDescriptor::new(org, name, version);
    let responses = resolver.resolve_packages(std::slice::from_ref(&descriptor));

    match responses.into_iter().next() {
        Some(ResolutionResponse {
            status: ResolutionStatus::Resolved(path),
            ..
        }) => Ok(path),
        _ => Err(ProjectError::NoCompiledPackage(descriptor.to_string())),
    }
}
