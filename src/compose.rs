//! Request composer - seeds a draft from an endpoint and turns it into a URL

use serde_json::{Map, Value};

use crate::constants::FALLBACK_BASE_URL;
use crate::document::{ApiDocument, ParameterLocation};
use crate::models::{HttpMethod, ParamValue, PreparedRequest, RequestDraft};
use crate::navigation::ResolvedEndpoint;

/// Base URL: first declared server, then the configured API base, then localhost
pub fn resolve_base_url<'a>(document: &'a ApiDocument, configured: Option<&'a str>) -> &'a str {
    document
        .first_server_url()
        .or(configured.filter(|u| !u.trim().is_empty()))
        .unwrap_or(FALLBACK_BASE_URL)
}

/// Fresh draft for an endpoint. Same endpoint in, same draft out.
pub fn seed_draft(endpoint: &ResolvedEndpoint<'_>) -> RequestDraft {
    let op = endpoint.operation;

    let path_params = op
        .parameters_in(ParameterLocation::Path)
        .map(|p| ParamValue::empty(&p.name))
        .collect();
    let query_params = op
        .parameters_in(ParameterLocation::Query)
        .map(|p| ParamValue::empty(&p.name))
        .collect();

    let body = if endpoint.method.sends_body() {
        schema_body(op.request_properties())
    } else {
        String::new()
    };

    RequestDraft {
        path_params,
        query_params,
        body,
        ..RequestDraft::default()
    }
}

/// Pretty JSON of the request schema's property map (schema shape, not examples)
pub fn schema_body(properties: Option<&Map<String, Value>>) -> String {
    let value = Value::Object(properties.cloned().unwrap_or_default());
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| String::from("{}"))
}

/// Replace every literal `{name}` with its value, verbatim
pub fn substitute_path(template: &str, params: &[ParamValue]) -> String {
    params.iter().fold(template.to_string(), |path, p| {
        path.replace(&format!("{{{}}}", p.name), &p.value)
    })
}

/// `key=value` pairs joined with `&`, percent-encoded, blanks included
pub fn query_string(params: &[ParamValue]) -> String {
    params
        .iter()
        .map(|p| format!("{}={}", urlencoding::encode(&p.name), urlencoding::encode(&p.value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Join base, substituted path and query string
pub fn request_url(base: &str, template: &str, draft: &RequestDraft) -> String {
    let path = substitute_path(template, &draft.path_params);
    let query = query_string(&draft.query_params);
    let base = base.trim_end_matches('/');
    if query.is_empty() {
        format!("{}{}", base, path)
    } else {
        format!("{}{}?{}", base, path, query)
    }
}

/// Snapshot the draft into the request that gets sent
pub fn prepare_request(method: HttpMethod, base: &str, template: &str, draft: &RequestDraft) -> PreparedRequest {
    PreparedRequest {
        method,
        url: request_url(base, template, draft),
        headers: draft.headers.iter().filter(|h| h.enabled).cloned().collect(),
        body: method.sends_body().then(|| draft.body.clone()),
    }
}
