//! Path template matcher - turns a navigation token into a declared operation
//!
//! Matching is best-effort and document-ordered:
//! 1. a path whose own slug equals the token's slug wins outright;
//! 2. otherwise each template becomes an anchored regex with every `{param}`
//!    replaced by a non-empty wildcard, and the first template (in declaration
//!    order) that fully matches and declares the method wins.
//!
//! Overlapping templates such as `/a/{id}` and `/a/b` therefore resolve by
//! document order for concrete values, not by specificity.

use regex::Regex;

use crate::document::{ApiDocument, EndpointKey, Operation};
use crate::models::HttpMethod;
use crate::navigation::token::{anchor_for, folded_path, NavigationToken};

/// Transient `(path, method, operation)` view produced by a successful match
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedEndpoint<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
}

impl<'a> ResolvedEndpoint<'a> {
    pub fn key(&self) -> EndpointKey {
        EndpointKey::new(self.path, self.method)
    }

    pub fn anchor(&self) -> String {
        anchor_for(self.method, self.path)
    }
}

/// Anchored pattern for a declared template.
///
/// Literal text is escaped with its own dashes folded to slashes, so it lines
/// up with a restored slug.
pub fn template_pattern(template: &str) -> String {
    let mut pattern = String::from("^");
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        pattern.push_str(&regex::escape(&folded_path(&rest[..open])));
        // a placeholder needs at least one character
        pattern.push_str(".+");
        rest = &rest[open + close + 1..];
    }
    pattern.push_str(&regex::escape(&folded_path(rest)));
    pattern.push('$');
    pattern
}

/// Resolve a raw fragment; `None` when it is malformed or matches nothing
pub fn resolve_fragment<'a>(document: &'a ApiDocument, fragment: &str) -> Option<ResolvedEndpoint<'a>> {
    let token = NavigationToken::parse(fragment)?;
    resolve(document, &token)
}

/// Resolve a parsed token against the document
pub fn resolve<'a>(document: &'a ApiDocument, token: &NavigationToken) -> Option<ResolvedEndpoint<'a>> {
    let method = token.method();
    let restored = token.restored_path();

    // Exact slug first, so every declared template is reachable by its own anchor
    for item in &document.paths {
        if folded_path(&item.path) == restored {
            if let Some(operation) = item.operation(method) {
                tracing::debug!(token = %token, path = %item.path, "Exact template match");
                return Some(ResolvedEndpoint {
                    path: &item.path,
                    method,
                    operation,
                });
            }
        }
    }

    for item in &document.paths {
        let regex = match Regex::new(&template_pattern(&item.path)) {
            Ok(regex) => regex,
            Err(e) => {
                tracing::warn!(path = %item.path, error = %e, "Skipping unmatchable template");
                continue;
            }
        };
        if !regex.is_match(&restored) {
            continue;
        }
        if let Some(operation) = item.operation(method) {
            tracing::debug!(token = %token, path = %item.path, "Structural template match");
            return Some(ResolvedEndpoint {
                path: &item.path,
                method,
                operation,
            });
        }
    }

    tracing::debug!(token = %token, "No template matched");
    None
}

/// Look an endpoint up by its key (no matching involved)
pub fn resolve_key<'a>(document: &'a ApiDocument, key: &EndpointKey) -> Option<ResolvedEndpoint<'a>> {
    let item = document.path_item(&key.path)?;
    let operation = item.operation(key.method)?;
    Some(ResolvedEndpoint {
        path: &item.path,
        method: key.method,
        operation,
    })
}
