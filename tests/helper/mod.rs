#![allow(dead_code)]

pub mod lsp;
pub mod project;

pub use lsp::*;
pub use project::*;
