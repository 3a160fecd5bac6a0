//! OpenAPI document loader (JSON or YAML)

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::document::model::{
    ApiDocument, Operation, Parameter, ParameterLocation, PathItem, RequestBody, ResponseSpec,
};
use crate::models::HttpMethod;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Source format of a document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.json` files are JSON, everything else is read as YAML
    pub fn from_path(path: &Path) -> DocumentFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("document root must be an object")]
    NotAnObject,
    #[error("document has no `paths` object")]
    MissingPaths,
}

/// Read and parse an API document from disk
pub fn load_document(path: &Path) -> Result<ApiDocument, DocumentError> {
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&content, DocumentFormat::from_path(path))?;
    tracing::info!(
        path = %path.display(),
        title = %document.title,
        endpoints = document.endpoint_count(),
        "Loaded API document"
    );
    Ok(document)
}

/// Parse an API document from text
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<ApiDocument, DocumentError> {
    let spec: Value = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    build_document(&spec)
}

fn build_document(spec: &Value) -> Result<ApiDocument, DocumentError> {
    if !spec.is_object() {
        return Err(DocumentError::NotAnObject);
    }

    let mut document = ApiDocument::default();

    if let Some(info) = spec.get("info") {
        document.title = str_field(info, "title").unwrap_or_default();
        document.version = str_field(info, "version");
        document.description = str_field(info, "description");
    }

    // Entries that do not fit the expected shape are skipped
    document.servers = array_entries(spec, "servers");
    document.tags = array_entries(spec, "tags");

    let paths = spec
        .get("paths")
        .and_then(|p| p.as_object())
        .ok_or(DocumentError::MissingPaths)?;

    for (path, methods) in paths {
        let Some(methods_obj) = methods.as_object() else {
            continue;
        };

        let shared_params: Vec<Parameter> = methods
            .get("parameters")
            .and_then(|p| p.as_array())
            .map(|params| params.iter().filter_map(parse_parameter).collect())
            .unwrap_or_default();

        let mut item = PathItem {
            path: path.clone(),
            operations: Vec::new(),
        };

        for (method, operation) in methods_obj {
            // Skip non-HTTP method keys like "parameters"
            let Some(method) = HttpMethod::parse(method) else {
                continue;
            };
            let mut op = parse_operation(method, operation);

            // Path-level parameters apply unless the operation overrides them
            for param in &shared_params {
                if !op.parameters.iter().any(|p| p.name == param.name && p.location == param.location) {
                    op.parameters.push(param.clone());
                }
            }

            item.operations.push(op);
        }

        document.paths.push(item);
    }

    Ok(document)
}

fn array_entries<T: DeserializeOwned>(spec: &Value, key: &str) -> Vec<T> {
    spec.get(key)
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| serde_json::from_value(e.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_operation(method: HttpMethod, operation: &Value) -> Operation {
    let mut op = Operation::new(method);

    op.operation_id = str_field(operation, "operationId");
    op.summary = str_field(operation, "summary");
    op.description = str_field(operation, "description");
    op.deprecated = operation
        .get("deprecated")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if let Some(tags) = operation.get("tags").and_then(|t| t.as_array()) {
        op.tags = tags
            .iter()
            .filter_map(|t| t.as_str().map(String::from))
            .collect();
    }

    if let Some(params) = operation.get("parameters").and_then(|p| p.as_array()) {
        op.parameters = params.iter().filter_map(parse_parameter).collect();
    }

    op.request_body = operation.get("requestBody").map(parse_request_body);

    if let Some(responses) = operation.get("responses").and_then(|r| r.as_object()) {
        op.responses = responses
            .iter()
            .map(|(status, response)| ResponseSpec {
                status: status.clone(),
                description: str_field(response, "description"),
                json_schema: json_schema(response),
            })
            .collect();
    }

    op
}

fn parse_parameter(param: &Value) -> Option<Parameter> {
    let name = param.get("name")?.as_str()?.to_string();
    let location = ParameterLocation::parse(param.get("in")?.as_str()?)?;

    Some(Parameter {
        name,
        location,
        required: param.get("required").and_then(|r| r.as_bool()).unwrap_or(false),
        description: str_field(param, "description"),
        schema: param.get("schema").cloned(),
    })
}

fn parse_request_body(body: &Value) -> RequestBody {
    let content_types = body
        .get("content")
        .and_then(|c| c.as_object())
        .map(|c| c.keys().cloned().collect())
        .unwrap_or_default();

    RequestBody {
        required: body.get("required").and_then(|r| r.as_bool()).unwrap_or(false),
        content_types,
        json_schema: json_schema(body),
    }
}

/// `content["application/json"].schema` of a request body or response
fn json_schema(node: &Value) -> Option<Value> {
    node.get("content")?
        .get(JSON_MEDIA_TYPE)?
        .get("schema")
        .cloned()
}

fn str_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(|v| v.as_str()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS_JSON: &str = r#"{
        "openapi": "3.0.0",
        "info": { "title": "Users API", "version": "1.2.0" },
        "servers": [{ "url": "https://api.example.com" }],
        "tags": [{ "name": "Users" }],
        "paths": {
            "/users/{id}": {
                "parameters": [
                    { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
                    { "name": "verbose", "in": "query", "schema": { "type": "boolean" } }
                ],
                "get": {
                    "tags": ["Users"],
                    "summary": "Get user",
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "description": "User id", "schema": { "type": "integer" } }
                    ],
                    "responses": {
                        "200": { "description": "OK" },
                        "404": { "description": "Not found" }
                    }
                },
                "put": {
                    "tags": ["Users"],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "type": "object", "properties": { "name": { "type": "string" } } }
                            }
                        }
                    },
                    "responses": { "204": { "description": "Updated" } }
                }
            },
            "/users": {
                "post": { "tags": ["Users"], "responses": { "201": { "description": "Created" } } }
            }
        }
    }"#;

    #[test]
    fn test_parse_json_document() {
        let doc = parse_document(USERS_JSON, DocumentFormat::Json).unwrap();
        assert_eq!(doc.title, "Users API");
        assert_eq!(doc.version.as_deref(), Some("1.2.0"));
        assert_eq!(doc.first_server_url(), Some("https://api.example.com"));
        assert_eq!(doc.tags[0].name, "Users");
        assert_eq!(doc.endpoint_count(), 3);

        // Declaration order is preserved
        assert_eq!(doc.paths[0].path, "/users/{id}");
        assert_eq!(doc.paths[1].path, "/users");

        let get = doc.operation("/users/{id}", HttpMethod::GET).unwrap();
        let statuses: Vec<&str> = get.responses.iter().map(|r| r.status.as_str()).collect();
        assert_eq!(statuses, vec!["200", "404"]);
        assert_eq!(get.first_response_status(), Some("200"));
    }

    #[test]
    fn test_operation_parameters_override_path_level() {
        let doc = parse_document(USERS_JSON, DocumentFormat::Json).unwrap();
        let get = doc.operation("/users/{id}", HttpMethod::GET).unwrap();

        let ids: Vec<&Parameter> = get.parameters.iter().filter(|p| p.name == "id").collect();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].type_name(), Some("integer"));
        assert!(get.parameters.iter().any(|p| p.name == "verbose" && p.location == ParameterLocation::Query));
    }

    #[test]
    fn test_request_body_properties() {
        let doc = parse_document(USERS_JSON, DocumentFormat::Json).unwrap();
        let put = doc.operation("/users/{id}", HttpMethod::PUT).unwrap();
        let props = put.request_properties().unwrap();
        assert!(props.contains_key("name"));
        assert_eq!(put.request_body.as_ref().unwrap().content_types, vec!["application/json"]);
    }

    #[test]
    fn test_malformed_servers_and_tags_are_skipped() {
        let doc = parse_document(
            r#"{"servers": [{"description": "no url"}, {"url": "http://b"}], "tags": ["Users", {"name": "Pets"}], "paths": {}}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        assert_eq!(doc.first_server_url(), Some("http://b"));
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.tags[0].name, "Pets");
    }

    #[test]
    fn test_missing_paths_is_an_error() {
        let err = parse_document(r#"{"info": {"title": "x"}}"#, DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, DocumentError::MissingPaths));
    }

    #[test]
    fn test_load_yaml_from_disk() {
        let yaml = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
paths:
  /users:
    get:
      summary: Get all users
      responses:
        "200":
          description: OK
    post:
      summary: Create user
      responses:
        "201":
          description: Created
"#;

        let temp_dir = tempfile::tempdir().unwrap();
        let spec_path = temp_dir.path().join("openapi.yaml");
        std::fs::write(&spec_path, yaml).unwrap();

        let doc = load_document(&spec_path).unwrap();
        assert_eq!(doc.title(), "Test API");
        assert_eq!(doc.endpoint_count(), 2);
        assert_eq!(doc.paths[0].operations[1].method, HttpMethod::POST);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.json");
        let err = load_document(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
