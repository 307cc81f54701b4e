//! Connector extraction layer
//!
//! - [`extractor`]: `ConnectorExtractor` trait and the source scanning implementation
//! - [`source`]: lexical helpers (masking, brace matching, documentation)
//! - [`types`]: connector descriptors

pub mod extractor;
pub mod source;
pub mod types;

pub use extractor::{ConnectorExtractor, SourceConnectorExtractor};
pub use types::{
    Connector, ConnectorFunction, ConnectorPackage, DisplayAnnotation, Parameter, ReturnType,
};
