use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::domain::{GistFilter, GistId, GistPayload, GistRecord, Owner, Representation};
use super::properties::{PropertyAction, PropertyRegistry};
use super::repository::GistRepository;
use crate::auth::{password::verify_password, AuthPolicy, Credentials};
use crate::errors::ServiceError;
use crate::response::ApiResponse;

/// Request-scoped façade over a [`GistRepository`].
///
/// Every operation returns an [`ApiResponse`]; failures are folded into an
/// error response and logged, never dropped.
pub struct GistApi<R: GistRepository + ?Sized> {
    repo: Arc<R>,
    properties: Arc<PropertyRegistry>,
    policy: AuthPolicy,
    credentials: Option<Credentials>,
}

impl<R: GistRepository + ?Sized> GistApi<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            properties: Arc::new(PropertyRegistry::default()),
            policy: AuthPolicy::default(),
            credentials: None,
        }
    }

    pub fn with_policy(mut self, policy: AuthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_properties(mut self, properties: Arc<PropertyRegistry>) -> Self {
        self.properties = properties;
        self
    }

    /// Remember who is calling. Checked only when an owner has to be resolved.
    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) -> &mut Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// List gists, optionally restricted to those whose boolean field `filter` is true.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: Option<&str>) -> ApiResponse {
        finish("list", self.try_list(filter).await)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: GistId) -> ApiResponse {
        finish("get", self.try_get(id).await)
    }

    /// 204 when the gist exists and is starred, 404 otherwise.
    #[instrument(skip(self))]
    pub async fn is_starred(&self, id: GistId) -> ApiResponse {
        finish("is_starred", self.try_is_starred(id).await)
    }

    /// Create a gist owned by the calling user.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use axum::http::{header, StatusCode};
    /// use service::gist::{GistApi, repository::mock::InMemoryGistRepository};
    /// let repo = Arc::new(InMemoryGistRepository::new());
    /// repo.add_user_with_password("alice", "Passw0rd").unwrap();
    /// let mut api = GistApi::new(repo);
    /// api.set_credentials("alice", "Passw0rd");
    /// let res = tokio_test::block_on(api.create(r#"{"description":"d","content":"c"}"#));
    /// assert_eq!(res.status, StatusCode::CREATED);
    /// assert_eq!(res.header(header::LOCATION), Some("/gists/1"));
    /// ```
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &str) -> ApiResponse {
        finish("create", self.try_create(payload).await)
    }

    /// Partial update: only fields present in `payload` change.
    #[instrument(skip(self, payload))]
    pub async fn patch(&self, id: GistId, payload: &str) -> ApiResponse {
        finish("patch", self.try_patch(id, payload).await)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: GistId) -> ApiResponse {
        finish("delete", self.try_delete(id).await)
    }

    #[instrument(skip(self))]
    pub async fn put_property(&self, id: GistId, property: &str) -> ApiResponse {
        finish("put_property", self.toggle(id, property, PropertyAction::Put).await)
    }

    #[instrument(skip(self))]
    pub async fn delete_property(&self, id: GistId, property: &str) -> ApiResponse {
        finish("delete_property", self.toggle(id, property, PropertyAction::Delete).await)
    }

    async fn try_list(&self, filter: Option<&str>) -> Result<ApiResponse, ServiceError> {
        let filter = GistFilter::from_field(filter)?;
        let gists = self.repo.find_by(filter).await?;
        if gists.is_empty() {
            return Err(ServiceError::NotFound(format!("no gists match filter {filter}")));
        }
        let items: Vec<Representation> = gists.iter().map(GistRecord::representation).collect();
        ApiResponse::ok_json(&items)
    }

    async fn try_get(&self, id: GistId) -> Result<ApiResponse, ServiceError> {
        let gist = self.find(id).await?;
        ApiResponse::ok_json(&gist.representation())
    }

    async fn try_is_starred(&self, id: GistId) -> Result<ApiResponse, ServiceError> {
        match self.repo.find_by_id(id).await? {
            Some(gist) if gist.starred => Ok(ApiResponse::no_content()),
            Some(_) => Err(ServiceError::NotFound(format!("gist {id} is not starred"))),
            None => Err(ServiceError::not_found("gist")),
        }
    }

    async fn try_create(&self, payload: &str) -> Result<ApiResponse, ServiceError> {
        let payload = GistPayload::parse(payload)?;
        let owner = self.resolve_owner().await?;
        let created = self.repo.persist(payload.into_new_gist(owner)).await?;
        info!(id = created.id, owner = %created.owner.username, "gist_created");
        ApiResponse::created(&created.location())
    }

    async fn try_patch(&self, id: GistId, payload: &str) -> Result<ApiResponse, ServiceError> {
        let mut gist = self.find(id).await?;
        GistPayload::parse(payload)?.apply_to(&mut gist);
        let saved = self.repo.save(&gist).await?;
        info!(id, "gist_patched");
        ApiResponse::ok_json(&saved.representation())
    }

    async fn try_delete(&self, id: GistId) -> Result<ApiResponse, ServiceError> {
        if !self.repo.remove(id).await? {
            return Err(ServiceError::not_found("gist"));
        }
        info!(id, "gist_deleted");
        Ok(ApiResponse::no_content())
    }

    async fn toggle(&self, id: GistId, property: &str, action: PropertyAction) -> Result<ApiResponse, ServiceError> {
        if !self.properties.supports(property) {
            return Err(ServiceError::NotFound(format!("unsupported property: {property}")));
        }
        let mut gist = self.find(id).await?;
        self.properties.apply(property, action, &mut gist);
        self.repo.save(&gist).await?;
        info!(id, property, ?action, "gist_property_toggled");
        Ok(ApiResponse::no_content())
    }

    async fn find(&self, id: GistId) -> Result<GistRecord, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("gist"))
    }

    /// Unset or unknown username is a bad request; a wrong password is unauthorized.
    async fn resolve_owner(&self) -> Result<Owner, ServiceError> {
        let Some(creds) = &self.credentials else {
            return Err(ServiceError::Validation("no caller credentials supplied".into()));
        };
        let owner = self
            .repo
            .find_owner(&creds.username)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("unknown user: {}", creds.username)))?;

        if self.policy.verify_passwords {
            let stored = self
                .repo
                .find_credentials(owner.id)
                .await?
                .ok_or_else(|| ServiceError::Unauthorized("no password on record".into()))?;
            if !verify_password(&creds.password, &stored)? {
                return Err(ServiceError::Unauthorized("invalid credentials".into()));
            }
        }
        Ok(owner)
    }
}

fn finish(operation: &'static str, result: Result<ApiResponse, ServiceError>) -> ApiResponse {
    match result {
        Ok(res) => {
            debug!(operation, status = res.status.as_u16(), "gist_api_ok");
            res
        }
        Err(e) if e.is_client_error() => {
            warn!(operation, kind = e.kind(), error = %e, "gist_api_rejected");
            ApiResponse::from_error(&e)
        }
        Err(e) => {
            error!(operation, kind = e.kind(), error = %e, "gist_api_failed");
            ApiResponse::from_error(&e)
        }
    }
}
