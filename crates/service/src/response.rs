//! Response record returned by every `GistApi` operation.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::errors::ServiceError;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Status code, reason phrase, optional body and headers.
/// `Content-Type: application/json` is always present.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub reason: &'static str,
    pub body: Option<String>,
    pub headers: HeaderMap,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiResponse {
    pub fn generate(status: StatusCode, body: Option<String>, extra: HeaderMap) -> Self {
        let mut headers = extra;
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        Self {
            status,
            reason: status.canonical_reason().unwrap_or(""),
            body: body.filter(|b| !b.is_empty()),
            headers,
        }
    }

    pub fn ok_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ServiceError> {
        let body = serde_json::to_string(value).map_err(|e| ServiceError::Internal(e.to_string()))?;
        Ok(Self::generate(StatusCode::OK, Some(body), HeaderMap::new()))
    }

    pub fn created(location: &str) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(location).map_err(|e| ServiceError::Internal(e.to_string()))?;
        headers.insert(header::LOCATION, value);
        Ok(Self::generate(StatusCode::CREATED, None, headers))
    }

    pub fn no_content() -> Self {
        Self::generate(StatusCode::NO_CONTENT, None, HeaderMap::new())
    }

    /// Failure response carrying `{"error": <kind>, "message": <text>}`.
    pub fn from_error(err: &ServiceError) -> Self {
        let body = serde_json::to_string(&ErrorBody { error: err.kind(), message: err.to_string() }).ok();
        Self::generate(err.status(), body, HeaderMap::new())
    }

    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body parsed as JSON, if there is one.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut res = Response::new(Body::from(self.body.unwrap_or_default()));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_sets_location_and_no_body() {
        let r = ApiResponse::created("/gists/7").unwrap();
        assert_eq!(r.status, StatusCode::CREATED);
        assert_eq!(r.reason, "Created");
        assert!(r.body.is_none());
        assert_eq!(r.header(header::LOCATION), Some("/gists/7"));
        assert_eq!(r.header(header::CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    }

    #[test]
    fn no_content_has_json_content_type() {
        let r = ApiResponse::no_content();
        assert_eq!(r.status, StatusCode::NO_CONTENT);
        assert_eq!(r.reason, "No Content");
        assert!(r.body.is_none());
        assert_eq!(r.header(header::CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    }

    #[test]
    fn error_body_names_kind() {
        let r = ApiResponse::from_error(&ServiceError::Store("connection reset".into()));
        assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = r.json().unwrap();
        assert_eq!(body["error"], "store_error");
        assert!(body["message"].as_str().unwrap().contains("connection reset"));
    }

    #[test]
    fn into_response_keeps_status_and_headers() {
        let r = ApiResponse::ok_json(&serde_json::json!({"id": 1})).unwrap().into_response();
        assert_eq!(r.status(), StatusCode::OK);
        assert_eq!(r.headers().get(header::CONTENT_TYPE).unwrap(), CONTENT_TYPE_JSON);
    }
}
