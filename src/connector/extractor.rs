//! Connector extraction from loaded projects

#[cfg(test)]
use mockall::automock;
use regex::Regex;
use tracing::{debug, warn};

use crate::connector::source::{
    Documentation, leading_metadata, mask, matching_close, nesting_depth, split_top_level,
};
use crate::connector::types::{
    Connector, ConnectorFunction, ConnectorPackage, DisplayAnnotation, Parameter, ReturnType,
};
use crate::project::types::{PackageDescriptor, Project};

/// Produces connector descriptors for a loaded project
#[cfg_attr(test, automock)]
pub trait ConnectorExtractor: Send + Sync {
    /// Extracts every connector of `project`.
    ///
    /// Summary mode (`detailed == false`) leaves `functions` empty; detailed
    /// mode also describes `init`, remote and resource methods.
    fn extract(&self, project: &Project, detailed: bool) -> Vec<Connector>;
}

/// Finds `public client class` definitions by scanning module sources
pub struct SourceConnectorExtractor {
    /// Class definition header: qualifiers, `class`, name, opening brace
    class_re: Regex,
    /// Method header inside a class body: qualifiers, `function`, name, `(`
    function_re: Regex,
    display_label_re: Regex,
    display_icon_path_re: Regex,
}

impl SourceConnectorExtractor {
    pub fn new() -> Self {
        Self {
            class_re: Regex::new(
                r"\b((?:(?:public|isolated|readonly|distinct|client)\s+)+)class\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{",
            )
            .unwrap(),
            function_re: Regex::new(
                r"\b((?:(?:public|private|remote|resource|isolated|transactional)\s+)*)function\s+([^(;{}]+?)\s*\(",
            )
            .unwrap(),
            display_label_re: Regex::new(r#"label\s*:\s*"([^"]*)""#).unwrap(),
            display_icon_path_re: Regex::new(r#"iconPath\s*:\s*"([^"]*)""#).unwrap(),
        }
    }

    fn extract_document(
        &self,
        package: &PackageDescriptor,
        module_name: &str,
        source: &str,
        detailed: bool,
    ) -> Vec<Connector> {
        let masked = mask(source);
        let mut connectors = Vec::new();

        for caps in self.class_re.captures_iter(&masked) {
            let Some(header) = caps.get(0) else {
                continue;
            };
            if nesting_depth(&masked, 0, header.start()) != 0 {
                continue;
            }

            let qualifiers: Vec<&str> = caps[1].split_whitespace().collect();
            if !qualifiers.contains(&"client") || !qualifiers.contains(&"public") {
                continue;
            }

            let name = caps[2].to_string();
            let open = header.end() - 1;
            let Some(close) = matching_close(&masked, open) else {
                warn!("Unterminated client class {} in module {}", name, module_name);
                continue;
            };

            let metadata = leading_metadata(source, &masked, header.start());
            let docs = Documentation::parse(&metadata.doc_lines);
            let display_annotation = self.display_annotation(&metadata.annotations);
            let functions = if detailed {
                self.extract_functions(source, &masked, open, close)
            } else {
                Vec::new()
            };

            connectors.push(Connector {
                display_name: display_annotation
                    .as_ref()
                    .and_then(|d| d.label.clone())
                    .unwrap_or_else(|| name.clone()),
                name,
                documentation: docs.description,
                module_name: module_name.to_string(),
                package: ConnectorPackage {
                    organization: package.org.clone(),
                    name: package.name.clone(),
                    version: package.version.clone(),
                },
                display_annotation,
                functions,
            });
        }

        connectors
    }

    /// Methods of the class body between `open` and `close`
    fn extract_functions(
        &self,
        source: &str,
        masked: &str,
        open: usize,
        close: usize,
    ) -> Vec<ConnectorFunction> {
        let body_start = open + 1;
        let mut functions = Vec::new();

        for caps in self.function_re.captures_iter(&masked[body_start..close]) {
            let Some(header) = caps.get(0) else {
                continue;
            };
            let start = body_start + header.start();
            if nesting_depth(masked, body_start, start) != 0 {
                continue;
            }

            let qualifiers: Vec<String> = caps[1].split_whitespace().map(String::from).collect();
            let is_resource = qualifiers.iter().any(|q| q == "resource");
            let is_remote = qualifiers.iter().any(|q| q == "remote");

            let signature = caps[2].trim();
            let (name, resource_path) = if is_resource {
                match signature.split_once(char::is_whitespace) {
                    Some((accessor, path)) => (accessor.to_string(), Some(path.trim().to_string())),
                    None => (signature.to_string(), None),
                }
            } else {
                (signature.to_string(), None)
            };

            if name != "init" && !is_remote && !is_resource {
                continue;
            }

            let paren_open = body_start + header.end() - 1;
            let Some(paren_close) = matching_close(masked, paren_open).filter(|&c| c < close)
            else {
                warn!("Unterminated parameter list of {} skipped", name);
                continue;
            };

            let docs = Documentation::parse(&leading_metadata(source, masked, start).doc_lines);
            let parameters = parameters(source, masked, paren_open + 1, paren_close, &docs);
            let return_type =
                return_type(source, masked, paren_close + 1, close).map(|type_name| ReturnType {
                    type_name,
                    documentation: docs.returns.clone(),
                });

            functions.push(ConnectorFunction {
                name,
                resource_path,
                qualifiers,
                documentation: docs.description,
                parameters,
                return_type,
            });
        }

        functions
    }

    fn display_annotation(&self, annotations: &str) -> Option<DisplayAnnotation> {
        let start = annotations.find("@display")?;
        let body = &annotations[start..];
        let body = body.find('}').map_or(body, |end| &body[..end]);

        Some(DisplayAnnotation {
            label: self.display_label_re.captures(body).map(|c| c[1].to_string()),
            icon_path: self
                .display_icon_path_re
                .captures(body)
                .map(|c| c[1].to_string()),
        })
    }
}

impl Default for SourceConnectorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorExtractor for SourceConnectorExtractor {
    fn extract(&self, project: &Project, detailed: bool) -> Vec<Connector> {
        let mut connectors = Vec::new();

        for (module, document) in project.documents() {
            let found =
                self.extract_document(&project.package, &module.name, &document.content, detailed);
            if !found.is_empty() {
                debug!(
                    "Found {} connectors in {}/{}",
                    found.len(),
                    module.name,
                    document.name
                );
            }
            connectors.extend(found);
        }

        connectors
    }
}

fn parameters(
    source: &str,
    masked: &str,
    from: usize,
    to: usize,
    docs: &Documentation,
) -> Vec<Parameter> {
    split_top_level(masked, from, to, b',')
        .into_iter()
        .filter(|&(start, end)| !masked[start..end].trim().is_empty())
        .filter_map(|(start, end)| {
            let parts = split_top_level(masked, start, end, b'=');
            let (decl_start, decl_end) = parts[0];
            let declaration = strip_annotations(source[decl_start..decl_end].trim());
            let (type_name, name) = declaration.rsplit_once(char::is_whitespace)?;
            let name = name.trim();

            Some(Parameter {
                name: name.to_string(),
                type_name: type_name.trim().to_string(),
                defaultable: parts.len() > 1,
                documentation: docs.parameter(name),
            })
        })
        .collect()
}

/// Drops leading `@name` / `@name { ... }` annotations from a declaration
fn strip_annotations(declaration: &str) -> &str {
    let mut rest = declaration.trim_start();

    while rest.starts_with('@') {
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '{')
            .unwrap_or(rest.len());
        let after = rest[name_end..].trim_start();
        rest = if after.starts_with('{') {
            after
                .find('}')
                .map_or("", |end| after[end + 1..].trim_start())
        } else {
            after
        };
    }

    rest
}

/// Type after `returns`, ending at the method body, `;` or `=`
fn return_type(source: &str, masked: &str, from: usize, limit: usize) -> Option<String> {
    if from >= limit {
        return None;
    }
    let after = &masked[from..limit];
    let rest = after.trim_start();
    rest.strip_prefix("returns")?;
    let type_start = from + (after.len() - rest.len()) + "returns".len();

    let bytes = masked.as_bytes();
    let mut depth = 0i32;
    let mut end = type_start;

    while end < limit {
        match bytes[end] {
            b'(' | b'[' | b'<' => depth += 1,
            b')' | b']' | b'>' => depth -= 1,
            b'{' if depth == 0 => {
                let preceding = masked[..end].trim_end();
                if preceding.ends_with("record") || preceding.ends_with("object") {
                    end = matching_close(masked, end).filter(|&c| c < limit)?;
                } else {
                    break;
                }
            }
            b';' | b'=' if depth == 0 => break,
            _ => {}
        }
        end += 1;
    }

    let type_name = source[type_start..end].trim();
    (!type_name.is_empty()).then(|| type_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::types::{Document, Module, ProjectKind};
    use std::path::PathBuf;

    const HTTP_CLIENT: &str = r#"import ballerina/http;

// Not a connector: no client qualifier.
public class Helper {
}

# Client for the GitHub REST API.
@display {
    label: "GitHub Client",
    iconPath: "icon.png"
}
public isolated client class Client {
    private final http:Client clientEp;

    # Initializes the client.
    # + config - Connection configuration
    # + serviceUrl - Base URL
    # + return - An error on failure
    public isolated function init(ConnectionConfig config, string serviceUrl = "https://api.github.com") returns error? {
        self.clientEp = check new (serviceUrl, {timeout: 60});
    }

    # Gets a repository.
    # + owner - Owner of the repository
    # + name - Repository name
    # + return - The repository or an error
    remote isolated function getRepository(string owner, string name) returns Repository|error {
        string path = string `/repos/${owner}/${name}`;
        return self.clientEp->get(path);
    }

    resource isolated function get users/[string id](map<string> headers = {}) returns record {| string login; |}|error {
        return error("not implemented");
    }

    isolated function buildPath(string a) returns string {
        return a + "}";
    }
}

client class InternalClient {
    remote function ping() returns error? {
    }
}
"#;

    fn project(source: &str) -> Project {
        Project {
            kind: ProjectKind::Build,
            source_root: PathBuf::from("/tmp/github"),
            package: PackageDescriptor::new("ballerinax", "github", "4.0.0"),
            modules: vec![Module {
                name: "github".to_string(),
                documents: vec![Document {
                    name: "client.bal".to_string(),
                    path: PathBuf::from("/tmp/github/client.bal"),
                    content: source.to_string(),
                }],
            }],
        }
    }

    #[test]
    fn extract_summary_finds_only_public_client_classes() {
        let connectors = SourceConnectorExtractor::new().extract(&project(HTTP_CLIENT), false);

        assert_eq!(connectors.len(), 1);
        let connector = &connectors[0];
        assert_eq!(connector.name, "Client");
        assert_eq!(connector.display_name, "GitHub Client");
        assert_eq!(
            connector.documentation.as_deref(),
            Some("Client for the GitHub REST API.")
        );
        assert_eq!(connector.module_name, "github");
        assert_eq!(
            connector.package,
            ConnectorPackage {
                organization: "ballerinax".to_string(),
                name: "github".to_string(),
                version: "4.0.0".to_string(),
            }
        );
        assert_eq!(
            connector.display_annotation,
            Some(DisplayAnnotation {
                label: Some("GitHub Client".to_string()),
                icon_path: Some("icon.png".to_string()),
            })
        );
        assert!(connector.functions.is_empty());
    }

    #[test]
    fn extract_detailed_describes_init_remote_and_resource_methods() {
        let connectors = SourceConnectorExtractor::new().extract(&project(HTTP_CLIENT), true);

        let functions = &connectors[0].functions;
        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["init", "getRepository", "get"]);

        let init = &functions[0];
        assert_eq!(init.qualifiers, vec!["public", "isolated"]);
        assert_eq!(init.documentation.as_deref(), Some("Initializes the client."));
        assert_eq!(
            init.parameters,
            vec![
                Parameter {
                    name: "config".to_string(),
                    type_name: "ConnectionConfig".to_string(),
                    defaultable: false,
                    documentation: Some("Connection configuration".to_string()),
                },
                Parameter {
                    name: "serviceUrl".to_string(),
                    type_name: "string".to_string(),
                    defaultable: true,
                    documentation: Some("Base URL".to_string()),
                },
            ]
        );
        assert_eq!(
            init.return_type,
            Some(ReturnType {
                type_name: "error?".to_string(),
                documentation: Some("An error on failure".to_string()),
            })
        );

        let remote = &functions[1];
        assert_eq!(
            remote.return_type.as_ref().map(|r| r.type_name.as_str()),
            Some("Repository|error")
        );
        assert_eq!(remote.parameters.len(), 2);

        let resource = &functions[2];
        assert_eq!(resource.resource_path.as_deref(), Some("users/[string id]"));
        assert_eq!(resource.parameters[0].type_name, "map<string>");
        assert!(resource.parameters[0].defaultable);
        assert_eq!(
            resource.return_type.as_ref().map(|r| r.type_name.as_str()),
            Some("record {| string login; |}|error")
        );
    }

    #[test]
    fn extract_uses_class_name_without_display_annotation() {
        let source = "public client class Plain {\n}\n";

        let connectors = SourceConnectorExtractor::new().extract(&project(source), false);

        assert_eq!(connectors[0].display_name, "Plain");
        assert_eq!(connectors[0].display_annotation, None);
        assert_eq!(connectors[0].documentation, None);
    }

    #[test]
    fn extract_ignores_classes_in_comments_and_strings() {
        let source = r#"// public client class Commented {}
string s = "public client class Quoted {}";
public client class Real {
}
"#;

        let connectors = SourceConnectorExtractor::new().extract(&project(source), false);
        let names: Vec<&str> = connectors.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Real"]);
    }

    #[test]
    fn extract_detailed_skips_method_with_unbalanced_parameter_list() {
        let source = "public client class A {\n    remote function foo(string a {\n    }\n}\nfunction bar) {}\n";

        let connectors = SourceConnectorExtractor::new().extract(&project(source), true);

        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].name, "A");
        assert!(connectors[0].functions.is_empty());
    }

    #[test]
    fn return_type_is_none_for_empty_or_inverted_range() {
        let source = "function f() returns int {}";
        let masked = mask(source);

        assert_eq!(return_type(source, &masked, 12, 12), None);
        assert_eq!(return_type(source, &masked, 20, 12), None);
        assert_eq!(
            return_type(source, &masked, 12, source.len()).as_deref(),
            Some("int")
        );
    }

    #[test]
    fn strip_annotations_removes_leading_annotations() {
        assert_eq!(
            strip_annotations(r#"@display {label: "Name"} string name"#),
            "string name"
        );
        assert_eq!(strip_annotations("@untainted string name"), "string name");
    }
}
