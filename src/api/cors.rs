use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Browser access policy for the public endpoints.
///
/// The request origin is echoed back only when it is on the allow-list; other
/// origins get the response without an `Access-Control-Allow-Origin` header and
/// the browser blocks it.
#[derive(Clone, Debug)]
pub struct CorsPolicy {
    allowed_origins: Arc<HashSet<String>>,
    allowed_headers: HeaderValue,
}

impl CorsPolicy {
    #[must_use]
    pub fn new(allowed_origins: &[String], allowed_headers: &'static str) -> Self {
        let allowed_origins = allowed_origins
            .iter()
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self { allowed_origins: Arc::new(allowed_origins), allowed_headers: HeaderValue::from_static(allowed_headers) }
    }

    /// Returns the request's `Origin` header if it is allowed.
    #[must_use]
    pub fn allowed_origin(&self, request_headers: &HeaderMap) -> Option<HeaderValue> {
        let origin = request_headers.get(header::ORIGIN)?;
        let origin_str = origin.to_str().ok()?;
        self.allowed_origins.contains(origin_str).then(|| origin.clone())
    }

    pub fn decorate(&self, origin: Option<HeaderValue>, response_headers: &mut HeaderMap) {
        if let Some(origin) = origin {
            response_headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        response_headers.append(header::VARY, HeaderValue::from_static("Origin"));
        response_headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
        response_headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, self.allowed_headers.clone());
    }
}

pub async fn apply_cors(State(policy): State<CorsPolicy>, request: Request, next: Next) -> Response {
    let origin = policy.allowed_origin(request.headers());
    let mut response = next.run(request).await;
    policy.decorate(origin, response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(&["https://home.example.com/".to_string(), " ".to_string()], "Content-Type")
    }

    fn request_from(origin: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_str(origin).unwrap());
        headers
    }

    #[test]
    fn test_allowed_origin_is_echoed() {
        let policy = policy();
        let origin = policy.allowed_origin(&request_from("https://home.example.com"));

        let mut response = HeaderMap::new();
        policy.decorate(origin, &mut response);

        assert_eq!(response[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://home.example.com");
        assert_eq!(response[header::VARY], "Origin");
        assert_eq!(response[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(response[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[test]
    fn test_unknown_origin_gets_no_allow_origin() {
        let policy = policy();
        let origin = policy.allowed_origin(&request_from("https://evil.example.com"));
        assert!(origin.is_none());

        let mut response = HeaderMap::new();
        policy.decorate(origin, &mut response);

        assert!(response.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(response[header::VARY], "Origin");
    }

    #[test]
    fn test_missing_origin_is_not_allowed() {
        assert!(policy().allowed_origin(&HeaderMap::new()).is_none());
    }
}
