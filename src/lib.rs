//! # apidoc
//!
//! A terminal API reference browser for OpenAPI documents.
//!
//! ## Features
//! - Sidebar of tags and endpoints, grouped the way the document declares them
//! - Endpoint detail: parameters, request schema, response schemas per status
//! - Code snippets (cURL, JavaScript, Python)
//! - "Try it" dialog that sends one live request per Send
//! - Fragment navigation (`get-users-42`) with deep links from the command line
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod compose;
pub mod config;
pub mod constants;
pub mod document;
pub mod messages;
pub mod models;
pub mod navigation;
pub mod network;
pub mod presenter;
pub mod snippet;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::{AppSettings, Config};
pub use document::{load_document, parse_document, ApiDocument, DocumentError, DocumentFormat, EndpointKey};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Header, HttpMethod, PreparedRequest, RequestDraft, RequestOutcome, ResponseBody};
pub use navigation::{resolve_fragment, NavigationController, NavigationToken, ResolvedEndpoint};
pub use network::NetworkActor;
