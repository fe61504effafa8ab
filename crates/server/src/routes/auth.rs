use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use service::{
    auth::{AuthPolicy, Credentials},
    gist::{properties::PropertyRegistry, repository::GistRepository, GistApi},
};

/// Shared, read-only state; every request builds its own `GistApi` from it.
#[derive(Clone)]
pub struct ServerState {
    pub repo: Arc<dyn GistRepository>,
    pub policy: AuthPolicy,
    pub properties: Arc<PropertyRegistry>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn GistRepository>, policy: AuthPolicy) -> Self {
        Self { repo, policy, properties: Arc::new(PropertyRegistry::default()) }
    }

    /// Per-request API carrying whatever credentials the request presented.
    pub fn api_for(&self, headers: &HeaderMap) -> GistApi<dyn GistRepository> {
        let mut api = GistApi::new(Arc::clone(&self.repo))
            .with_policy(self.policy)
            .with_properties(Arc::clone(&self.properties));
        if let Some(creds) = basic_credentials(headers) {
            api.set_credentials(creds.username, creds.password);
        }
        api
    }
}

/// Parse `Authorization: Basic base64(user:password)`.
/// A missing or malformed header yields `None`, leaving the caller anonymous.
pub fn basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        tracing::debug!(%scheme, "ignoring non-basic authorization scheme");
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (username, password) = text.split_once(':')?;
    Some(Credentials::new(username, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn parses_basic_header() {
        let encoded = STANDARD.encode("alice:pa:ss");
        let creds = basic_credentials(&headers(&format!("Basic {encoded}"))).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "pa:ss");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let encoded = STANDARD.encode("bob:x");
        assert!(basic_credentials(&headers(&format!("basic {encoded}"))).is_some());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(basic_credentials(&HeaderMap::new()).is_none());
        assert!(basic_credentials(&headers("Bearer abc.def")).is_none());
        assert!(basic_credentials(&headers("Basic !!!")).is_none());
        let no_colon = STANDARD.encode("alice");
        assert!(basic_credentials(&headers(&format!("Basic {no_colon}"))).is_none());
    }
}
