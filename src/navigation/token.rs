//! Navigation tokens: `<method>-<slug>` fragments that address one endpoint

use crate::models::HttpMethod;

/// Parsed fragment identifying which operation to display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationToken {
    method: HttpMethod,
    /// Slug with percent-escapes already normalized
    slug: String,
}

impl NavigationToken {
    /// Parse a fragment such as `#get-users-123`.
    ///
    /// Returns `None` for an empty fragment or an unknown method segment.
    pub fn parse(fragment: &str) -> Option<NavigationToken> {
        let fragment = fragment.trim();
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return None;
        }

        let (method, slug) = fragment.split_once('-').unwrap_or((fragment, ""));
        let method = HttpMethod::parse(&method.to_ascii_lowercase())?;

        Some(NavigationToken {
            method,
            slug: normalize_escapes(slug),
        })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The slug turned back into a path: `users-123` becomes `/users/123`
    pub fn restored_path(&self) -> String {
        format!("/{}", self.slug.replace('-', "/"))
    }
}

impl std::fmt::Display for NavigationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.method.as_key(), self.slug)
    }
}

/// Fragment for a declared `(method, path)` pair
pub fn anchor_for(method: HttpMethod, path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    format!("{}-{}", method.as_key(), trimmed.replace('/', "-"))
}

/// A declared path as it looks after a slug round trip (dashes become slashes)
pub fn folded_path(path: &str) -> String {
    path.replace('-', "/")
}

/// Undo the percent-escaping browsers and terminals apply to `/`, `{` and `}`
fn normalize_escapes(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut rest = slug;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let escape = rest.get(pos + 1..pos + 3).map(|s| s.to_ascii_uppercase());
        match escape.as_deref() {
            Some("2F") => out.push('/'),
            Some("7B") => out.push('{'),
            Some("7D") => out.push('}'),
            _ => {
                out.push('%');
                rest = &rest[pos + 1..];
                continue;
            }
        }
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_for_path() {
        assert_eq!(anchor_for(HttpMethod::GET, "/users/{id}"), "get-users-{id}");
        assert_eq!(anchor_for(HttpMethod::DELETE, "/"), "delete-");
    }

    #[test]
    fn test_parse_lowercases_method_and_restores_path() {
        let token = NavigationToken::parse("#GET-users-123").unwrap();
        assert_eq!(token.method(), HttpMethod::GET);
        assert_eq!(token.restored_path(), "/users/123");
        assert_eq!(token.to_string(), "get-users-123");
    }

    #[test]
    fn test_parse_normalizes_percent_escapes() {
        let token = NavigationToken::parse("get-users-%7Bid%7D%2fposts").unwrap();
        assert_eq!(token.slug(), "users-{id}/posts");
        assert_eq!(token.restored_path(), "/users/{id}/posts");
    }

    #[test]
    fn test_parse_keeps_unknown_escapes() {
        let token = NavigationToken::parse("get-search-100%25").unwrap();
        assert_eq!(token.slug(), "search-100%25");
    }

    #[test]
    fn test_parse_rejects_empty_and_unknown_method() {
        assert!(NavigationToken::parse("").is_none());
        assert!(NavigationToken::parse("#").is_none());
        assert!(NavigationToken::parse("fetch-users").is_none());
    }

    #[test]
    fn test_method_only_token_is_root() {
        let token = NavigationToken::parse("get").unwrap();
        assert_eq!(token.restored_path(), "/");
    }
}
