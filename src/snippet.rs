use serde_json::{Map, Value};

use crate::models::HttpMethod;

/// Languages offered for the endpoint code sample
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SnippetLanguage {
    #[default]
    Curl,
    JavaScript,
    Python,
}

impl SnippetLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetLanguage::Curl => "cURL",
            SnippetLanguage::JavaScript => "JavaScript",
            SnippetLanguage::Python => "Python",
        }
    }

    pub fn next(&self) -> SnippetLanguage {
        match self {
            SnippetLanguage::Curl => SnippetLanguage::JavaScript,
            SnippetLanguage::JavaScript => SnippetLanguage::Python,
            SnippetLanguage::Python => SnippetLanguage::Curl,
        }
    }
}

/// Everything a snippet needs; the URL is already joined with the base
pub struct SnippetRequest<'a> {
    pub method: HttpMethod,
    pub url: &'a str,
    pub body: Option<&'a Map<String, Value>>,
}

impl<'a> SnippetRequest<'a> {
    fn body_json(&self) -> Option<String> {
        if !self.method.sends_body() {
            return None;
        }
        let body = Value::Object(self.body.cloned().unwrap_or_default());
        serde_json::to_string(&body).ok()
    }
}

pub fn render(language: SnippetLanguage, request: &SnippetRequest<'_>) -> String {
    match language {
        SnippetLanguage::Curl => to_curl(request),
        SnippetLanguage::JavaScript => to_fetch(request),
        SnippetLanguage::Python => to_python(request),
    }
}

/// Format request as cURL command
pub fn to_curl(request: &SnippetRequest<'_>) -> String {
    let mut parts = vec![format!("curl -X {} \"{}\"", request.method.as_str(), request.url)];

    parts.push("-H \"Content-Type: application/json\"".to_string());

    if let Some(body) = request.body_json() {
        parts.push(format!("-d '{}'", body.replace('\'', "'\\''")));
    }

    parts.join(" \\\n  ")
}

/// Format request as a `fetch` call
pub fn to_fetch(request: &SnippetRequest<'_>) -> String {
    let mut out = format!(
        "fetch(\"{}\", {{\n  method: \"{}\",\n  headers: {{\n    \"Content-Type\": \"application/json\",\n  }},\n",
        request.url,
        request.method.as_str()
    );
    if let Some(body) = request.body_json() {
        out.push_str(&format!("  body: JSON.stringify({}),\n", body));
    }
    out.push_str("})\n.then(response => response.json())\n.then(data => console.log(data));");
    out
}

/// Format request with the `requests` library
pub fn to_python(request: &SnippetRequest<'_>) -> String {
    let mut out = String::from("import requests\n\n");
    let method = request.method.as_key();
    match request.body_json() {
        Some(body) => out.push_str(&format!(
            "response = requests.{}(\n    \"{}\",\n    headers={{\"Content-Type\": \"application/json\"}},\n    data='{}',\n)\n",
            method,
            request.url,
            body.replace('\'', "\\'")
        )),
        None => out.push_str(&format!(
            "response = requests.{}(\n    \"{}\",\n    headers={{\"Content-Type\": \"application/json\"}},\n)\n",
            method, request.url
        )),
    }
    out.push_str("print(response.status_code, response.text)");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".to_string(), serde_json::json!({ "type": "string" }));
        map
    }

    #[test]
    fn test_curl_get_has_no_body() {
        let req = SnippetRequest {
            method: HttpMethod::GET,
            url: "https://api.example.com/users",
            body: None,
        };
        let curl = to_curl(&req);
        assert!(curl.starts_with("curl -X GET \"https://api.example.com/users\""));
        assert!(!curl.contains("-d"));
    }

    #[test]
    fn test_curl_post_includes_schema_body() {
        let props = props();
        let req = SnippetRequest {
            method: HttpMethod::POST,
            url: "http://localhost:3000/users",
            body: Some(&props),
        };
        let curl = render(SnippetLanguage::Curl, &req);
        assert!(curl.contains(r#"-d '{"name":{"type":"string"}}'"#));
    }

    #[test]
    fn test_fetch_and_python_snippets() {
        let props = props();
        let req = SnippetRequest {
            method: HttpMethod::PUT,
            url: "http://h/x",
            body: Some(&props),
        };
        let js = render(SnippetLanguage::JavaScript, &req);
        assert!(js.contains("method: \"PUT\""));
        assert!(js.contains("body: JSON.stringify("));

        let py = render(SnippetLanguage::Python, &req);
        assert!(py.contains("requests.put("));
        assert!(py.contains("data='"));
    }

    #[test]
    fn test_language_cycle() {
        let lang = SnippetLanguage::default();
        assert_eq!(lang.next().next().next(), lang);
    }
}
