//! HTTP client wrapper - executes test requests and decodes responses

use std::time::{Duration, Instant};

use crate::constants::JSON_CONTENT_TYPE;
use crate::models::{HttpMethod, PreparedRequest, RequestOutcome, ResponseBody};

/// Build a request from the prepared snapshot
fn build_request(client: &reqwest::Client, request: &PreparedRequest) -> reqwest::RequestBuilder {
    let method = match request.method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        HttpMethod::TRACE => reqwest::Method::TRACE,
    };

    let mut req_builder = client.request(method, &request.url);

    // Invalid header names surface as a builder error on send
    for header in &request.headers {
        req_builder = req_builder.header(&header.key, &header.value);
    }

    if let Some(body) = &request.body {
        req_builder = req_builder.body(body.clone());
    }

    req_builder
}

fn is_json(headers: &reqwest::header::HeaderMap) -> bool {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains(JSON_CONTENT_TYPE))
}

/// Decode as JSON when advertised; a body that fails to parse stays text
fn decode_body(json: bool, text: String) -> ResponseBody {
    if json {
        if let Ok(value) = serde_json::from_str(&text) {
            return ResponseBody::Json(value);
        }
    }
    ResponseBody::Text(text)
}

/// Execute a prepared request. Never fails: transport problems become `Failed`.
pub async fn execute_request(client: &reqwest::Client, request: PreparedRequest) -> RequestOutcome {
    let start = Instant::now();
    let result = build_request(client, &request).send().await;

    let resp = match result {
        Ok(resp) => resp,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timed out".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                format!("Request failed: {}", e)
            };
            return RequestOutcome::Failed {
                error,
                elapsed_ms: start.elapsed().as_millis() as u64,
            };
        }
    };

    let status = resp.status().as_u16();
    let json = is_json(resp.headers());
    let headers = resp
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();

    match resp.text().await {
        Ok(text) => RequestOutcome::Response {
            status,
            headers,
            body: decode_body(json, text),
            elapsed_ms: start.elapsed().as_millis() as u64,
            received_at: chrono::Utc::now(),
        },
        Err(e) => RequestOutcome::Failed {
            error: format!("Error reading body: {}", e),
            elapsed_ms: start.elapsed().as_millis() as u64,
        },
    }
}

/// Create an HTTP client; no timeout unless one is configured
pub fn create_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to default HTTP client");
        reqwest::Client::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Header;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use tokio::net::TcpListener;

    /// What the stub server saw for one request
    #[derive(Debug, Clone)]
    struct SeenRequest {
        method: Method,
        uri: String,
        content_type: Option<String>,
        body: String,
    }

    type Seen = Arc<Mutex<Vec<SeenRequest>>>;

    fn record(seen: &Seen, method: Method, uri: &Uri, headers: &HeaderMap, body: String) {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        seen.lock().unwrap().push(SeenRequest {
            method,
            uri: uri.to_string(),
            content_type,
            body,
        });
    }

    async fn create_user(
        State(seen): State<Seen>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> impl IntoResponse {
        record(&seen, method, &uri, &headers, body);
        (
            StatusCode::CREATED,
            [
                (header::CONTENT_TYPE, "application/json"),
                (HeaderName::from_static("x-request-id"), "abc"),
            ],
            r#"{"id":1}"#,
        )
    }

    async fn not_found(
        State(seen): State<Seen>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> impl IntoResponse {
        record(&seen, method, &uri, &headers, body);
        (StatusCode::NOT_FOUND, "missing")
    }

    fn stub_router(seen: Seen) -> axum::Router {
        axum::Router::new()
            .route("/users", post(create_user))
            .route(
                "/broken",
                get(|| async { ([(header::CONTENT_TYPE, "application/json; charset=utf-8")], "{oops") }),
            )
            .fallback(not_found)
            .with_state(seen)
    }

    async fn spawn_http_server(app: axum::Router) -> (String, tokio::sync::oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
        (format!("http://{}", addr), shutdown_tx)
    }

    async fn spawn_stub() -> (String, Seen, tokio::sync::oneshot::Sender<()>) {
        let seen = Seen::default();
        let (base, shutdown) = spawn_http_server(stub_router(seen.clone())).await;
        (base, seen, shutdown)
    }

    #[tokio::test]
    async fn test_post_sends_headers_and_body() {
        let (base, seen, _shutdown) = spawn_stub().await;
        let client = create_client(None);

        let outcome = execute_request(
            &client,
            PreparedRequest {
                method: HttpMethod::POST,
                url: format!("{}/users", base),
                headers: vec![Header::new("Content-Type", "application/json")],
                body: Some(r#"{"name":"a"}"#.to_string()),
            },
        )
        .await;

        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].uri, "/users");
        assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(requests[0].body, r#"{"name":"a"}"#);

        match outcome {
            RequestOutcome::Response { status, headers, body, .. } => {
                assert_eq!(status, 201);
                assert!(headers.iter().any(|(k, v)| k == "x-request-id" && v == "abc"));
                assert_eq!(body, ResponseBody::Json(serde_json::json!({ "id": 1 })));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_text() {
        let (base, seen, _shutdown) = spawn_stub().await;
        let client = create_client(None);

        let outcome = execute_request(
            &client,
            PreparedRequest {
                method: HttpMethod::GET,
                url: format!("{}/nothing?q=", base),
                headers: Vec::new(),
                body: None,
            },
        )
        .await;

        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].uri, "/nothing?q=");
        assert!(requests[0].body.is_empty());

        assert_eq!(outcome.status(), Some(404));
        let RequestOutcome::Response { body, .. } = outcome else {
            panic!("expected a response");
        };
        assert_eq!(body, ResponseBody::Text("missing".to_string()));
    }

    #[tokio::test]
    async fn test_malformed_json_degrades_to_text() {
        let (base, _seen, _shutdown) = spawn_stub().await;
        let client = create_client(None);

        let outcome = execute_request(
            &client,
            PreparedRequest {
                method: HttpMethod::GET,
                url: format!("{}/broken", base),
                headers: Vec::new(),
                body: None,
            },
        )
        .await;

        let RequestOutcome::Response { status, body, .. } = outcome else {
            panic!("expected a response");
        };
        assert_eq!(status, 200);
        assert_eq!(body, ResponseBody::Text("{oops".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_failed_outcome() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = execute_request(
            &create_client(Some(Duration::from_secs(5))),
            PreparedRequest {
                method: HttpMethod::GET,
                url: format!("http://{}/users", addr),
                headers: Vec::new(),
                body: None,
            },
        )
        .await;

        match outcome {
            RequestOutcome::Failed { error, .. } => assert!(!error.is_empty()),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_header_name_is_failed_outcome() {
        let outcome = execute_request(
            &create_client(None),
            PreparedRequest {
                method: HttpMethod::GET,
                url: "http://127.0.0.1:9/".to_string(),
                headers: vec![Header::new("bad header", "x")],
                body: None,
            },
        )
        .await;
        assert!(matches!(outcome, RequestOutcome::Failed { .. }));
    }
}
