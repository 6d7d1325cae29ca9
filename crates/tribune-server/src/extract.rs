//! Visitor identity extraction and embed-origin derivation.
//!
//! Identity is established outside this system (a session layer mints
//! an opaque id per visitor). It reaches us either in the
//! `x-visitor-id` header or, for browser `WebSocket` clients that
//! cannot set headers, in a `visitor` query parameter. The server never
//! inspects the value beyond checking it is present and non-empty.

use axum::extract::{FromRequestParts, Query};
use axum::http::HeaderMap;
use axum::http::header::HOST;
use axum::http::request::Parts;
use serde::Deserialize;
use tribune_types::UserId;

use crate::error::ApiError;

/// Header carrying the opaque visitor id.
pub const VISITOR_HEADER: &str = "x-visitor-id";

/// Query parameters understood by every endpoint.
#[derive(Debug, Deserialize)]
struct IdentityQuery {
    /// Query fallback for transports that cannot set headers.
    visitor: Option<String>,
}

/// Extractor for the opaque per-session visitor id.
#[derive(Debug, Clone)]
pub struct Visitor(pub UserId);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(VISITOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let from_query = Query::<IdentityQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|query| query.0.visitor);

        match from_header.or(from_query) {
            Some(id) if !id.is_empty() => Ok(Self(UserId::from(id))),
            _ => Err(ApiError::MissingIdentity),
        }
    }
}

/// Hostname the video player should be parameterized with, taken from
/// the request's `Host` header (port stripped).
pub fn embed_origin(headers: &HeaderMap) -> String {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .and_then(|host| host.split(':').next())
        .unwrap_or("localhost")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn embed_origin_strips_the_port() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("tribune.example:8080"));
        assert_eq!(embed_origin(&headers), "tribune.example");
    }

    #[test]
    fn embed_origin_falls_back_without_a_host() {
        assert_eq!(embed_origin(&HeaderMap::new()), "localhost");
    }
}
