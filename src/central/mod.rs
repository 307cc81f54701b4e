//! Ballerina Central (remote package registry) layer
//!
//! - [`client`]: `CentralClient` and `CentralClientFactory` traits
//! - [`http`]: reqwest-based client for the Central REST API
//! - [`types`]: wire types (`ConnectorInfo`, search results)
//! - [`error`]: error type for registry calls

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{CentralClient, CentralClientFactory};
pub use error::CentralError;
pub use http::{HttpCentralClient, HttpCentralClientFactory};
pub use types::{CentralConnectorListResult, ConnectorInfo};
