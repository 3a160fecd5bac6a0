//! Endpoint presenter - projects one operation into display-ready rows

use serde_json::Value;

use crate::document::{Parameter, ParameterLocation, ResponseSpec};
use crate::models::HttpMethod;
use crate::navigation::ResolvedEndpoint;

const NO_SUMMARY: &str = "Endpoint details";
const NO_DESCRIPTION: &str = "No description.";
const NO_PARAM_DESCRIPTION: &str = "No description";
const UNKNOWN_TYPE: &str = "unknown";

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterRow {
    pub name: String,
    pub location: &'static str,
    pub required: bool,
    pub type_name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRow {
    pub name: String,
    pub type_name: String,
    pub description: Option<String>,
    pub required: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResponseView {
    pub status: String,
    pub description: String,
    pub properties: Vec<PropertyRow>,
    /// Pretty JSON of the response schema, `{}` when none is declared
    pub schema_json: String,
}

/// Everything the detail pane shows for one endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointView {
    pub method: HttpMethod,
    pub path: String,
    pub anchor: String,
    pub summary: String,
    pub description: String,
    pub deprecated: bool,
    pub tags: Vec<String>,
    pub path_params: Vec<ParameterRow>,
    pub query_params: Vec<ParameterRow>,
    /// Request schema rows; only populated for POST/PUT/PATCH
    pub request_properties: Vec<PropertyRow>,
    pub request_schema_json: Option<String>,
    pub responses: Vec<ResponseView>,
}

impl EndpointView {
    pub fn response(&self, status: &str) -> Option<&ResponseView> {
        self.responses.iter().find(|r| r.status == status)
    }
}

pub fn present(endpoint: &ResolvedEndpoint<'_>) -> EndpointView {
    let op = endpoint.operation;

    let request_schema = op.request_body.as_ref().and_then(|b| b.json_schema.as_ref());
    let (request_properties, request_schema_json) = match (request_schema, op.request_properties()) {
        (Some(schema), Some(props)) if endpoint.method.shows_request_schema() => (
            property_rows(schema),
            serde_json::to_string_pretty(props).ok(),
        ),
        _ => (Vec::new(), None),
    };

    EndpointView {
        method: endpoint.method,
        path: endpoint.path.to_string(),
        anchor: endpoint.anchor(),
        summary: op.summary.clone().unwrap_or_else(|| NO_SUMMARY.to_string()),
        description: op
            .description
            .clone()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        deprecated: op.deprecated,
        tags: op.tags.clone(),
        path_params: op.parameters_in(ParameterLocation::Path).map(parameter_row).collect(),
        query_params: op.parameters_in(ParameterLocation::Query).map(parameter_row).collect(),
        request_properties,
        request_schema_json,
        responses: op.responses.iter().map(response_view).collect(),
    }
}

fn parameter_row(p: &Parameter) -> ParameterRow {
    ParameterRow {
        name: p.name.clone(),
        location: p.location.as_str(),
        required: p.required,
        type_name: p.type_name().unwrap_or(UNKNOWN_TYPE).to_string(),
        description: p
            .description
            .clone()
            .unwrap_or_else(|| NO_PARAM_DESCRIPTION.to_string()),
    }
}

fn response_view(r: &ResponseSpec) -> ResponseView {
    let schema = r.json_schema.clone().unwrap_or_else(|| Value::Object(Default::default()));
    ResponseView {
        status: r.status.clone(),
        description: r
            .description
            .clone()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        properties: property_rows(&schema),
        schema_json: serde_json::to_string_pretty(&schema).unwrap_or_default(),
    }
}

/// Rows for `schema.properties`; `required` comes from the schema's `required` list
fn property_rows(schema: &Value) -> Vec<PropertyRow> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    schema
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| PropertyRow {
                    name: name.clone(),
                    type_name: schema_type(prop),
                    description: prop
                        .get("description")
                        .and_then(|d| d.as_str())
                        .map(String::from),
                    required: required.contains(&name.as_str()),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `type`, or the referenced schema name for `$ref` properties
fn schema_type(prop: &Value) -> String {
    if let Some(t) = prop.get("type").and_then(|t| t.as_str()) {
        return t.to_string();
    }
    prop.get("$ref")
        .and_then(|r| r.as_str())
        .and_then(|r| r.rsplit('/').next())
        .unwrap_or(UNKNOWN_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{parse_document, ApiDocument, DocumentFormat};
    use crate::navigation::resolve_fragment;

    const DOC: &str = r##"{
        "info": { "title": "Present" },
        "paths": {
            "/users/{id}": {
                "get": {
                    "summary": "Get user",
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } },
                        { "name": "fields", "in": "query", "description": "Sparse fieldset" }
                    ],
                    "responses": {
                        "200": {
                            "description": "The user",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "required": ["id"],
                                        "properties": {
                                            "id": { "type": "integer", "description": "Identifier" },
                                            "team": { "$ref": "#/components/schemas/Team" }
                                        }
                                    }
                                }
                            }
                        },
                        "404": {}
                    }
                },
                "patch": {
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "properties": { "name": { "type": "string" } } }
                            }
                        }
                    },
                    "responses": {}
                },
                "delete": {
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "properties": { "reason": { "type": "string" } } }
                            }
                        }
                    },
                    "responses": {}
                }
            }
        }
    }"##;

    fn doc() -> ApiDocument {
        parse_document(DOC, DocumentFormat::Json).unwrap()
    }

    #[test]
    fn test_present_get_operation() {
        let document = doc();
        let view = present(&resolve_fragment(&document, "get-users-1").unwrap());

        assert_eq!(view.summary, "Get user");
        assert_eq!(view.description, NO_DESCRIPTION);
        assert_eq!(view.anchor, "get-users-{id}");
        assert_eq!(view.path_params[0].type_name, "integer");
        assert!(view.path_params[0].required);
        assert_eq!(view.query_params[0].type_name, UNKNOWN_TYPE);
        assert_eq!(view.query_params[0].description, "Sparse fieldset");
        assert!(view.request_properties.is_empty());
    }

    #[test]
    fn test_response_properties_and_required_flags() {
        let document = doc();
        let view = present(&resolve_fragment(&document, "get-users-1").unwrap());

        let ok = view.response("200").unwrap();
        assert_eq!(ok.description, "The user");
        assert_eq!(ok.properties.len(), 2);
        assert!(ok.properties[0].required);
        assert_eq!(ok.properties[0].description.as_deref(), Some("Identifier"));
        assert!(!ok.properties[1].required);
        assert_eq!(ok.properties[1].type_name, "Team");

        let missing = view.response("404").unwrap();
        assert_eq!(missing.description, NO_DESCRIPTION);
        assert_eq!(missing.schema_json, "{}");
    }

    #[test]
    fn test_request_schema_only_for_body_methods() {
        let document = doc();
        let patch = present(&resolve_fragment(&document, "patch-users-1").unwrap());
        assert_eq!(patch.summary, NO_SUMMARY);
        assert_eq!(patch.request_properties[0].name, "name");
        assert!(patch.request_schema_json.is_some());

        let delete = present(&resolve_fragment(&document, "delete-users-1").unwrap());
        assert!(delete.request_properties.is_empty());
        assert!(delete.request_schema_json.is_none());
    }
}
