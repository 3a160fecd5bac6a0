//! Navigation controller - keeps the fragment and the displayed endpoint in sync

use crate::document::{ApiDocument, EndpointKey};
use crate::navigation::matcher::{self, ResolvedEndpoint};

/// Which endpoint, if any, the detail view shows
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Idle,
    Resolved(EndpointKey),
}

/// What a fragment change did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Empty fragment; nothing to resolve
    Ignored,
    /// Fragment matched no operation; the previous view is kept
    Unresolved,
    /// Fragment resolved to the operation already displayed
    Unchanged(EndpointKey),
    /// A different operation is now displayed and should be scrolled into view
    Resolved { key: EndpointKey, scroll_to: String },
}

#[derive(Debug, Default)]
pub struct NavigationController {
    state: NavState,
    fragment: Option<String>,
    active_response_tab: Option<String>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    /// The last fragment set, matched or not
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn current(&self) -> Option<&EndpointKey> {
        match &self.state {
            NavState::Idle => None,
            NavState::Resolved(key) => Some(key),
        }
    }

    /// Re-derive the displayed endpoint from the document
    pub fn resolved<'a>(&self, document: &'a ApiDocument) -> Option<ResolvedEndpoint<'a>> {
        matcher::resolve_key(document, self.current()?)
    }

    pub fn active_response_tab(&self) -> Option<&str> {
        self.active_response_tab.as_deref()
    }

    /// Handle a fragment change (initial load, sidebar click, go-to prompt)
    pub fn navigate(&mut self, document: &ApiDocument, fragment: &str) -> NavigationOutcome {
        let fragment = fragment.trim();
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return NavigationOutcome::Ignored;
        }
        self.fragment = Some(fragment.to_string());

        let Some(resolved) = matcher::resolve_fragment(document, fragment) else {
            tracing::info!(fragment, "Fragment did not match any operation");
            return NavigationOutcome::Unresolved;
        };

        let key = resolved.key();
        if self.current() == Some(&key) {
            return NavigationOutcome::Unchanged(key);
        }

        tracing::info!(fragment, path = %key.path, method = %key.method, "Navigated to endpoint");
        self.active_response_tab = resolved.operation.first_response_status().map(String::from);
        self.state = NavState::Resolved(key.clone());
        NavigationOutcome::Resolved {
            scroll_to: resolved.anchor(),
            key,
        }
    }

    pub fn select_response_tab(&mut self, document: &ApiDocument, status: &str) {
        let declared = self
            .resolved(document)
            .is_some_and(|r| r.operation.response(status).is_some());
        if declared {
            self.active_response_tab = Some(status.to_string());
        }
    }

    pub fn next_response_tab(&mut self, document: &ApiDocument) {
        self.step_response_tab(document, 1);
    }

    pub fn prev_response_tab(&mut self, document: &ApiDocument) {
        self.step_response_tab(document, -1);
    }

    fn step_response_tab(&mut self, document: &ApiDocument, step: isize) {
        let Some(resolved) = self.resolved(document) else {
            return;
        };
        let responses = &resolved.operation.responses;
        if responses.is_empty() {
            return;
        }
        let len = responses.len() as isize;
        let current = self
            .active_response_tab
            .as_deref()
            .and_then(|s| responses.iter().position(|r| r.status == s))
            .map(|i| i as isize)
            .unwrap_or(0);
        let next = (current + step).rem_euclid(len) as usize;
        self.active_response_tab = Some(responses[next].status.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{parse_document, DocumentFormat};
    use crate::models::HttpMethod;

    const DOC: &str = r#"{
        "info": { "title": "Nav" },
        "paths": {
            "/users/{id}": {
                "get": { "responses": { "200": { "description": "OK" }, "404": { "description": "Missing" } } }
            },
            "/users": {
                "post": { "responses": { "201": { "description": "Created" }, "400": { "description": "Bad" } } }
            }
        }
    }"#;

    fn doc() -> ApiDocument {
        parse_document(DOC, DocumentFormat::Json).unwrap()
    }

    #[test]
    fn test_idle_to_resolved_selects_first_response() {
        let document = doc();
        let mut nav = NavigationController::new();
        assert_eq!(nav.state(), &NavState::Idle);

        let outcome = nav.navigate(&document, "#get-users-7");
        assert_eq!(
            outcome,
            NavigationOutcome::Resolved {
                key: EndpointKey::new("/users/{id}", HttpMethod::GET),
                scroll_to: "get-users-{id}".to_string(),
            }
        );
        assert_eq!(nav.active_response_tab(), Some("200"));
        assert_eq!(nav.fragment(), Some("get-users-7"));
    }

    #[test]
    fn test_unmatched_fragment_keeps_previous_view() {
        let document = doc();
        let mut nav = NavigationController::new();
        nav.navigate(&document, "get-users-7");
        nav.next_response_tab(&document);

        assert_eq!(nav.navigate(&document, "get-unknown"), NavigationOutcome::Unresolved);
        assert_eq!(nav.current(), Some(&EndpointKey::new("/users/{id}", HttpMethod::GET)));
        assert_eq!(nav.active_response_tab(), Some("404"));
    }

    #[test]
    fn test_unmatched_fragment_from_idle_stays_idle() {
        let document = doc();
        let mut nav = NavigationController::new();
        assert_eq!(nav.navigate(&document, "delete-users"), NavigationOutcome::Unresolved);
        assert_eq!(nav.state(), &NavState::Idle);
        assert_eq!(nav.navigate(&document, "  "), NavigationOutcome::Ignored);
    }

    #[test]
    fn test_switching_operation_resets_response_tab() {
        let document = doc();
        let mut nav = NavigationController::new();
        nav.navigate(&document, "get-users-7");
        nav.next_response_tab(&document);
        assert_eq!(nav.active_response_tab(), Some("404"));

        let outcome = nav.navigate(&document, "post-users");
        assert!(matches!(outcome, NavigationOutcome::Resolved { .. }));
        assert_eq!(nav.active_response_tab(), Some("201"));
    }

    #[test]
    fn test_same_operation_keeps_response_tab() {
        let document = doc();
        let mut nav = NavigationController::new();
        nav.navigate(&document, "get-users-7");
        nav.next_response_tab(&document);

        let outcome = nav.navigate(&document, "get-users-8");
        assert!(matches!(outcome, NavigationOutcome::Unchanged(_)));
        assert_eq!(nav.active_response_tab(), Some("404"));
    }

    #[test]
    fn test_response_tab_cycles_both_ways() {
        let document = doc();
        let mut nav = NavigationController::new();
        nav.navigate(&document, "post-users");
        nav.prev_response_tab(&document);
        assert_eq!(nav.active_response_tab(), Some("400"));
        nav.next_response_tab(&document);
        assert_eq!(nav.active_response_tab(), Some("201"));

        nav.select_response_tab(&document, "999");
        assert_eq!(nav.active_response_tab(), Some("201"));
        nav.select_response_tab(&document, "400");
        assert_eq!(nav.active_response_tab(), Some("400"));
    }
}
