//! Deciding between JSON and HTML responses.

use axum::http::{HeaderMap, header};

/// Path prefix of the JSON API.
pub const API_PREFIX: &str = "/api/";

/// True when the caller asked for JSON through the `Accept` header.
pub fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.to_ascii_lowercase().contains("application/json"))
}

/// True for script-issued requests (`X-Requested-With: XMLHttpRequest`).
pub fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}

pub fn is_api_path(path: &str) -> bool {
    path.starts_with(API_PREFIX) || path == "/api"
}

/// Reads answer with JSON for API paths or JSON `Accept`.
pub fn wants_json(path: &str, headers: &HeaderMap) -> bool {
    is_api_path(path) || accepts_json(headers)
}

/// Mutations additionally treat XHR callers as JSON callers.
pub fn is_json_caller(path: &str, headers: &HeaderMap) -> bool {
    wants_json(path, headers) || is_xhr(headers)
}

pub fn has_referer(headers: &HeaderMap) -> bool {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn api_paths_always_get_json() {
        assert!(wants_json("/api/tasks", &HeaderMap::new()));
        assert!(!wants_json("/tasks", &HeaderMap::new()));
        assert!(!wants_json("/apiary", &HeaderMap::new()));
    }

    #[test]
    fn accept_header_is_a_substring_match() {
        let h = headers(&[("accept", "text/html, application/json;q=0.9")]);
        assert!(wants_json("/tasks", &h));
    }

    #[test]
    fn xhr_counts_only_for_mutations() {
        let h = headers(&[("x-requested-with", "XMLHttpRequest")]);
        assert!(!wants_json("/createtasks", &h));
        assert!(is_json_caller("/createtasks", &h));
    }

    #[test]
    fn blank_referer_is_no_referer() {
        assert!(!has_referer(&headers(&[("referer", " ")])));
        assert!(has_referer(&headers(&[("referer", "http://localhost/tasks")])));
    }
}
