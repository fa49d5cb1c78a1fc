//! HTTP routes for Agora
//!
//! The endpoint surface is an explicit table built at startup: one
//! [`RouteDef`] per endpoint binding method + path pattern + access
//! requirement to a handler. The dispatcher in `server::http` walks the
//! table, extracts `{param}` segments, enforces the session requirement,
//! and hands the handler a [`RequestContext`]. Handlers call one or more
//! concept actions; the dispatcher is the sole error-recovery point.

pub mod auth_routes;
pub mod feed_routes;
pub mod format;
pub mod friend_routes;
pub mod health;
pub mod label_routes;
pub mod sort_routes;
pub mod source_routes;
pub mod template_routes;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use hyper::{Method, Response};
use serde::de::DeserializeOwned;

use crate::auth::Claims;
use crate::server::AppState;
use crate::types::{AgoraError, Result};

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Future returned by route handlers
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response<BoxBody>>> + Send>>;

/// Route handler: a plain function pointer so the table stays a value
pub type Handler = fn(RequestContext, Arc<AppState>) -> HandlerFuture;

/// Whether a route requires an authenticated session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Session,
}

/// One endpoint: method + path pattern + access + handler
pub struct RouteDef {
    pub method: Method,
    pub pattern: &'static str,
    pub access: Access,
    pub handler: Handler,
}

/// Everything a handler needs from the request, already validated
pub struct RequestContext {
    /// Path parameters extracted from the pattern
    pub params: HashMap<&'static str, String>,
    /// Raw request body (size-capped by the dispatcher)
    pub body: Bytes,
    /// Session claims; always present on `Access::Session` routes
    pub session: Option<Claims>,
}

impl RequestContext {
    /// Path parameter by name; missing parameters are a table bug
    pub fn param(&self, name: &str) -> Result<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AgoraError::Internal(format!("missing path parameter {:?}", name)))
    }

    /// Session claims; the dispatcher guarantees presence on session routes
    pub fn session(&self) -> Result<&Claims> {
        self.session
            .as_ref()
            .ok_or_else(|| AgoraError::Unauthenticated("no session".into()))
    }

    /// Deserialize the JSON body into the route's request type
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AgoraError::BadValues(format!("invalid JSON body: {}", e)))
    }
}

/// Match a path against a `{param}` pattern, extracting parameters
pub fn match_pattern(pattern: &'static str, path: &str) -> Option<HashMap<&'static str, String>> {
    let mut params = HashMap::new();
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(got)) => {
                if let Some(name) = expected.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    if got.is_empty() {
                        return None;
                    }
                    params.insert(name, got.to_string());
                } else if expected != got {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// The full endpoint table, built once at startup
pub fn route_table() -> Vec<RouteDef> {
    let mut table = Vec::new();

    table.extend(health::routes());
    table.extend(auth_routes::routes());
    table.extend(friend_routes::routes());
    table.extend(label_routes::routes());
    table.extend(sort_routes::routes());
    table.extend(source_routes::routes());
    table.extend(feed_routes::routes());
    table.extend(template_routes::routes());

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_patterns_match_exactly() {
        assert!(match_pattern("/friends", "/friends").is_some());
        assert!(match_pattern("/friends", "/friends/abc").is_none());
        assert!(match_pattern("/friends", "/labels").is_none());
    }

    #[test]
    fn parameters_are_extracted() {
        let params =
            match_pattern("/labels/{name}/resources/{resource}", "/labels/work/resources/r1")
                .expect("should match");
        assert_eq!(params.get("name").map(String::as_str), Some("work"));
        assert_eq!(params.get("resource").map(String::as_str), Some("r1"));
    }

    #[test]
    fn empty_segments_do_not_bind() {
        assert!(match_pattern("/users/{id}", "/users/").is_none());
    }

    #[test]
    fn table_has_no_duplicate_bindings() {
        let table = route_table();
        for (i, a) in table.iter().enumerate() {
            for b in table.iter().skip(i + 1) {
                assert!(
                    !(a.method == b.method && a.pattern == b.pattern),
                    "duplicate route {} {}",
                    a.method,
                    a.pattern
                );
            }
        }
    }
}
