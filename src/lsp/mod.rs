//! LSP (Language Server Protocol) implementation layer
//!
//! Exposes the `ballerinaConnector/connectors` and
//! `ballerinaConnector/connector` JSON-RPC methods.
//!
//! # Modules
//!
//! - [`backend`]: LSP backend implementing `LanguageServer` and the custom methods
//! - [`protocol`]: Request and response types of the custom methods
//! - [`service`]: Connector listing and the ordered lookup strategies
//! - [`server`]: LSP server initialization and lifecycle

pub mod backend;
pub mod protocol;
pub mod server;
pub mod service;
