//! Local project resolution layer
//!
//! # Modules
//!
//! - [`loader`]: `ProjectLoader` trait and the filesystem loader
//!   (build projects, single files, extracted balas)
//! - [`resolver`]: `PackageResolver` trait and the bala repository resolver
//! - [`types`]: project model (`Project`, `Module`, `Document`, `PackageDescriptor`)
//! - [`error`]: error type for loading and resolution

pub mod error;
pub mod loader;
pub mod resolver;
pub mod types;

pub use error::ProjectError;
pub use loader::{FsProjectLoader, ProjectLoader};
pub use resolver::{
    BalaRepositoryResolver, PackageResolver, ResolutionResponse, ResolutionStatus,
    resolve_bala_path,
};
pub use types::{Document, Module, PackageDescriptor, Project, ProjectKind};
