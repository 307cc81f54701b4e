pub mod central;
pub mod config;
pub mod connector;
pub mod lsp;
pub mod project;
pub mod settings;
pub mod toml;
