//! Minimal TOML reader for `Settings.toml` and `Ballerina.toml`
//!
//! Only flat tables with scalar values are collected; arrays of tables and
//! inline tables are ignored because neither file needs them here.

use indexmap::IndexMap;
use tracing::warn;

/// Scalar TOML value
#[derive(Debug, Clone, PartialEq)]
pub enum TomlValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    /// Any other value kept as raw source text
    Other(String),
}

/// Key/value pairs of a single table, in source order
pub type TomlTable = IndexMap<String, TomlValue>;

/// Parsed TOML document. Top-level pairs live in the table named `""`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TomlDocument {
    tables: IndexMap<String, TomlTable>,
}

/// Error type for TOML reading
#[derive(Debug, thiserror::Error)]
pub enum TomlError {
    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Invalid syntax in the file
    #[error("Invalid syntax at line {line}, column {column}")]
    InvalidSyntax { line: usize, column: usize },

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl TomlDocument {
    pub fn parse(content: &str) -> Result<Self, TomlError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_toml_ng::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set TOML language for tree-sitter: {}", e);
            TomlError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse TOML content");
            TomlError::ParseFailed("Failed to parse TOML".to_string())
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error_position(root);
            return Err(TomlError::InvalidSyntax { line, column });
        }

        let mut document = TomlDocument::default();
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            match child.kind() {
                "pair" => {
                    if let Some((key, value)) = read_pair(child, content) {
                        document.tables.entry(String::new()).or_default().insert(key, value);
                    }
                }
                "table" => document.process_table(child, content),
                _ => {}
            }
        }

        Ok(document)
    }

    /// Returns the table with the given (dotted) name
    pub fn table(&self, name: &str) -> Option<&TomlTable> {
        self.tables.get(name)
    }

    pub fn get(&self, table: &str, key: &str) -> Option<&TomlValue> {
        self.table(table).and_then(|t| t.get(key))
    }

    /// Returns a string value; empty strings are treated as absent
    pub fn get_str(&self, table: &str, key: &str) -> Option<&str> {
        match self.get(table, key) {
            Some(TomlValue::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, table: &str, key: &str) -> Option<i64> {
        match self.get(table, key) {
            Some(TomlValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    fn process_table(&mut self, table_node: tree_sitter::Node, content: &str) {
        let mut cursor = table_node.walk();
        let mut table_name: Option<String> = None;
        let mut pairs = TomlTable::new();

        for child in table_node.children(&mut cursor) {
            match child.kind() {
                "bare_key" | "dotted_key" | "quoted_key" if table_name.is_none() => {
                    table_name = Some(normalize_key(&content[child.byte_range()]));
                }
                "pair" => {
                    if let Some((key, value)) = read_pair(child, content) {
                        pairs.insert(key, value);
                    }
                }
                _ => {}
            }
        }

        let Some(name) = table_name else {
            return;
        };

        self.tables.entry(name).or_default().extend(pairs);
    }
}

/// Read a `key = value` pair
fn read_pair(pair_node: tree_sitter::Node, content: &str) -> Option<(String, TomlValue)> {
    let mut cursor = pair_node.walk();
    let mut key: Option<String> = None;
    let mut value: Option<TomlValue> = None;

    for child in pair_node.children(&mut cursor) {
        let text = &content[child.byte_range()];
        match child.kind() {
            "bare_key" | "dotted_key" | "quoted_key" => key = Some(normalize_key(text)),
            "string" => value = Some(TomlValue::String(unquote(text))),
            "integer" => {
                value = Some(
                    text.replace('_', "")
                        .parse::<i64>()
                        .map(TomlValue::Integer)
                        .unwrap_or_else(|_| TomlValue::Other(text.to_string())),
                )
            }
            "boolean" => value = Some(TomlValue::Boolean(text == "true")),
            "=" => {}
            _ if key.is_some() && value.is_none() => {
                value = Some(TomlValue::Other(text.to_string()));
            }
            _ => {}
        }
    }

    Some((key?, value?))
}

/// Strips whitespace around dots and quotes from each key segment
fn normalize_key(raw: &str) -> String {
    raw.split('.')
        .map(|segment| segment.trim().trim_matches('"').trim_matches('\''))
        .collect::<Vec<_>>()
        .join(".")
}

fn unquote(raw: &str) -> String {
    let raw = raw.trim();

    if let Some(inner) = raw
        .strip_prefix("\"\"\"")
        .and_then(|s| s.strip_suffix("\"\"\""))
    {
        return unescape(inner.strip_prefix('\n').unwrap_or(inner));
    }
    if let Some(inner) = raw.strip_prefix("'''").and_then(|s| s.strip_suffix("'''")) {
        return inner.strip_prefix('\n').unwrap_or(inner).to_string();
    }
    if let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return unescape(inner);
    }
    if let Some(inner) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.to_string();
    }

    raw.to_string()
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn first_error_position(node: tree_sitter::Node) -> (usize, usize) {
    if node.is_error() || node.is_missing() {
        let point = node.start_position();
        return (point.row + 1, point.column + 1);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_position(child);
        }
    }

    let point = node.start_position();
    (point.row + 1, point.column + 1)
}
