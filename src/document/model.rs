//! Read-only view over a loaded API description

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::HttpMethod;
use crate::navigation::token;

/// Section name for paths whose first operation carries no tag
pub const UNTAGGED_SECTION: &str = "default";

/// A server entry from `servers[]`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A tag entry from `tags[]`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameter location in request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(s: &str) -> Option<ParameterLocation> {
        match s {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// A declared operation parameter
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Value>,
}

impl Parameter {
    /// `schema.type`, when declared
    pub fn type_name(&self) -> Option<&str> {
        self.schema.as_ref()?.get("type")?.as_str()
    }
}

/// Request body declaration
#[derive(Clone, Debug, PartialEq)]
pub struct RequestBody {
    pub required: bool,
    /// Declared media types, in document order
    pub content_types: Vec<String>,
    /// Schema under `content["application/json"]`
    pub json_schema: Option<Value>,
}

impl RequestBody {
    /// `content["application/json"].schema.properties`
    pub fn json_properties(&self) -> Option<&Map<String, Value>> {
        self.json_schema.as_ref()?.get("properties")?.as_object()
    }
}

/// One entry of `responses`
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseSpec {
    pub status: String,
    pub description: Option<String>,
    /// Schema under `content["application/json"]`
    pub json_schema: Option<Value>,
}

/// One HTTP-method entry under a documented path
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Declaration order is kept; the first entry is the default response tab
    pub responses: Vec<ResponseSpec>,
}

impl Operation {
    pub fn new(method: HttpMethod) -> Self {
        Operation {
            method,
            operation_id: None,
            summary: None,
            description: None,
            deprecated: false,
            tags: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
        }
    }

    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    pub fn first_response_status(&self) -> Option<&str> {
        self.responses.first().map(|r| r.status.as_str())
    }

    pub fn response(&self, status: &str) -> Option<&ResponseSpec> {
        self.responses.iter().find(|r| r.status == status)
    }

    pub fn request_properties(&self) -> Option<&Map<String, Value>> {
        self.request_body.as_ref()?.json_properties()
    }
}

/// A documented path and its operations, in declaration order
#[derive(Clone, Debug, PartialEq)]
pub struct PathItem {
    pub path: String,
    pub operations: Vec<Operation>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.iter().find(|op| op.method == method)
    }
}

/// Identifies one operation in the document
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    pub path: String,
    pub method: HttpMethod,
}

impl EndpointKey {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        EndpointKey {
            path: path.into(),
            method,
        }
    }

    /// Fragment that navigates to this endpoint
    pub fn anchor(&self) -> String {
        token::anchor_for(self.method, &self.path)
    }
}

/// A sidebar group of endpoints
#[derive(Clone, Debug, PartialEq)]
pub struct SidebarSection {
    pub name: String,
    pub endpoints: Vec<EndpointKey>,
}

/// The static API description. Immutable once loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiDocument {
    pub title: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub servers: Vec<Server>,
    pub tags: Vec<Tag>,
    pub paths: Vec<PathItem>,
}

impl ApiDocument {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn first_server_url(&self) -> Option<&str> {
        self.servers
            .first()
            .map(|s| s.url.as_str())
            .filter(|u| !u.is_empty())
    }

    pub fn path_item(&self, path: &str) -> Option<&PathItem> {
        self.paths.iter().find(|p| p.path == path)
    }

    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.path_item(path)?.operation(method)
    }

    /// All `(path, operation)` pairs in declaration order
    pub fn endpoints(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.paths
            .iter()
            .flat_map(|item| item.operations.iter().map(move |op| (item.path.as_str(), op)))
    }

    pub fn endpoint_count(&self) -> usize {
        self.paths.iter().map(|p| p.operations.len()).sum()
    }

    /// Sidebar sections.
    ///
    /// A path is listed under a tag when its first declared operation carries
    /// that tag, and then all of the path's methods are listed. Without
    /// top-level `tags` the section list comes from operation tags in
    /// first-seen order, plus a trailing section for untagged paths.
    pub fn sidebar_sections(&self) -> Vec<SidebarSection> {
        let first_tags = |item: &PathItem| -> Vec<String> {
            item.operations
                .first()
                .map(|op| op.tags.clone())
                .unwrap_or_default()
        };

        let names: Vec<String> = if self.tags.is_empty() {
            let mut seen: Vec<String> = Vec::new();
            for item in &self.paths {
                for tag in first_tags(item) {
                    if !seen.contains(&tag) {
                        seen.push(tag);
                    }
                }
            }
            if self.paths.iter().any(|item| first_tags(item).is_empty()) {
                seen.push(UNTAGGED_SECTION.to_string());
            }
            seen
        } else {
            self.tags.iter().map(|t| t.name.clone()).collect()
        };

        names
            .into_iter()
            .map(|name| {
                let endpoints = self
                    .paths
                    .iter()
                    .filter(|item| {
                        let tags = first_tags(item);
                        if name == UNTAGGED_SECTION && self.tags.is_empty() {
                            tags.is_empty()
                        } else {
                            tags.contains(&name)
                        }
                    })
                    .flat_map(|item| {
                        item.operations
                            .iter()
                            .map(move |op| EndpointKey::new(item.path.clone(), op.method))
                    })
                    .collect();
                SidebarSection { name, endpoints }
            })
            .collect()
    }
}
