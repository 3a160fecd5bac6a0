use serde_json::Value;

use crate::constants::JSON_CONTENT_TYPE;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
    TRACE,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
        HttpMethod::HEAD,
        HttpMethod::OPTIONS,
        HttpMethod::TRACE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::TRACE => "TRACE",
        }
    }

    /// Lower-case form used as the document key and the fragment prefix
    pub fn as_key(&self) -> &'static str {
        match self {
            HttpMethod::GET => "get",
            HttpMethod::POST => "post",
            HttpMethod::PUT => "put",
            HttpMethod::PATCH => "patch",
            HttpMethod::DELETE => "delete",
            HttpMethod::HEAD => "head",
            HttpMethod::OPTIONS => "options",
            HttpMethod::TRACE => "trace",
        }
    }

    /// Case-insensitive parse; `None` for anything that is not an HTTP method
    pub fn parse(s: &str) -> Option<HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }

    /// Every method except GET carries the draft body
    pub fn sends_body(&self) -> bool {
        !matches!(self, HttpMethod::GET)
    }

    /// Methods whose request schema is shown in the detail pane
    pub fn shows_request_schema(&self) -> bool {
        matches!(self, HttpMethod::POST | HttpMethod::PUT | HttpMethod::PATCH)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP Header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }
}

/// A named parameter value in a draft (path or query)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamValue {
    pub name: String,
    pub value: String,
}

impl ParamValue {
    pub fn empty(name: impl Into<String>) -> Self {
        ParamValue {
            name: name.into(),
            value: String::new(),
        }
    }
}

/// User-editable staging area for one test call.
///
/// Seeded from the resolved endpoint each time the test dialog opens and
/// dropped when it closes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDraft {
    pub headers: Vec<Header>,
    pub path_params: Vec<ParamValue>,
    pub query_params: Vec<ParamValue>,
    pub body: String,
}

impl Default for RequestDraft {
    fn default() -> Self {
        RequestDraft {
            headers: vec![Header::new("Content-Type", JSON_CONTENT_TYPE)],
            path_params: Vec::new(),
            query_params: Vec::new(),
            body: String::new(),
        }
    }
}

impl RequestDraft {
    pub fn set_path_param(&mut self, name: &str, value: impl Into<String>) {
        if let Some(p) = self.path_params.iter_mut().find(|p| p.name == name) {
            p.value = value.into();
        }
    }

    pub fn set_query_param(&mut self, name: &str, value: impl Into<String>) {
        if let Some(p) = self.query_params.iter_mut().find(|p| p.name == name) {
            p.value = value.into();
        }
    }
}

/// Fully composed request handed to the network layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Enabled headers only, in draft order
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

/// Response body, decoded according to the advertised content type
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

/// Result of one executor invocation
#[derive(Clone, Debug, PartialEq)]
pub enum RequestOutcome {
    Response {
        status: u16,
        headers: Vec<(String, String)>,
        body: ResponseBody,
        elapsed_ms: u64,
        received_at: chrono::DateTime<chrono::Utc>,
    },
    Failed {
        error: String,
        elapsed_ms: u64,
    },
}

impl RequestOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestOutcome::Response { status, .. } => Some(*status),
            RequestOutcome::Failed { .. } => None,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self {
            RequestOutcome::Response { elapsed_ms, .. } | RequestOutcome::Failed { elapsed_ms, .. } => {
                *elapsed_ms
            }
        }
    }

    /// JSON view shown in the response panel
    pub fn to_display_json(&self) -> Value {
        match self {
            RequestOutcome::Response { status, headers, body, .. } => {
                let headers: serde_json::Map<String, Value> = headers
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                let data = match body {
                    ResponseBody::Json(v) => v.clone(),
                    ResponseBody::Text(t) => Value::String(t.clone()),
                };
                serde_json::json!({
                    "status": status,
                    "headers": headers,
                    "data": data,
                })
            }
            RequestOutcome::Failed { error, .. } => serde_json::json!({ "error": error }),
        }
    }

    pub fn to_display_text(&self) -> String {
        serde_json::to_string_pretty(&self.to_display_json()).unwrap_or_default()
    }
}
