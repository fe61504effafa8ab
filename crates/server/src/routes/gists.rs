use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use service::{errors::ServiceError, gist::domain::GistId, ApiResponse};

use super::auth::ServerState;

/// Ids that are not numbers, or overflow `GistId`, cannot name a stored gist.
fn parse_id(raw: &str) -> Result<GistId, ApiResponse> {
    raw.parse::<GistId>()
        .map_err(|_| ApiResponse::from_error(&ServiceError::not_found("gist")))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Boolean field that must be true, e.g. `starred`
    pub filter: Option<String>,
}

#[utoipa::path(
    get, path = "/gists", tag = "gists",
    params(ListQuery),
    responses(
        (status = 200, description = "Gists", body = [crate::openapi::GistDoc]),
        (status = 400, description = "Unknown filter field", body = crate::openapi::ErrorDoc),
        (status = 404, description = "No gist matches", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>, headers: HeaderMap, Query(q): Query<ListQuery>) -> ApiResponse {
    state.api_for(&headers).list(q.filter.as_deref()).await
}

#[utoipa::path(
    get, path = "/gists/starred", tag = "gists",
    responses(
        (status = 200, description = "Starred gists", body = [crate::openapi::GistDoc]),
        (status = 404, description = "Nothing starred", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_starred(State(state): State<ServerState>, headers: HeaderMap) -> ApiResponse {
    state.api_for(&headers).list(Some("starred")).await
}

#[utoipa::path(
    post, path = "/gists", tag = "gists",
    request_body = crate::openapi::GistPayloadDoc,
    responses(
        (status = 201, description = "Created; see the Location header"),
        (status = 400, description = "Malformed payload or unknown caller", body = crate::openapi::ErrorDoc),
        (status = 401, description = "Password rejected", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<ServerState>, headers: HeaderMap, body: String) -> ApiResponse {
    state.api_for(&headers).create(&body).await
}

#[utoipa::path(
    get, path = "/gists/{id}", tag = "gists",
    params(("id" = i32, Path, description = "Gist id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::GistDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, headers: HeaderMap, Path(id): Path<String>) -> ApiResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    state.api_for(&headers).get(id).await
}

#[utoipa::path(
    patch, path = "/gists/{id}", tag = "gists",
    params(("id" = i32, Path, description = "Gist id")),
    request_body = crate::openapi::GistPayloadDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::GistDoc),
        (status = 400, description = "Malformed payload", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn patch(State(state): State<ServerState>, headers: HeaderMap, Path(id): Path<String>, body: String) -> ApiResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    state.api_for(&headers).patch(id, &body).await
}

#[utoipa::path(
    delete, path = "/gists/{id}", tag = "gists",
    params(("id" = i32, Path, description = "Gist id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, headers: HeaderMap, Path(id): Path<String>) -> ApiResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    state.api_for(&headers).delete(id).await
}

/// Only `star` can be queried; `GET /gists/{id}/star` answers 204 when starred.
#[utoipa::path(
    get, path = "/gists/{id}/{property}", tag = "gists",
    params(("id" = i32, Path, description = "Gist id"), ("property" = String, Path, description = "Property name, e.g. star")),
    responses(
        (status = 204, description = "Property is set"),
        (status = 404, description = "Missing gist, unset or unsupported property", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn property_status(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path((id, property)): Path<(String, String)>,
) -> ApiResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match property.as_str() {
        "star" => state.api_for(&headers).is_starred(id).await,
        other => ApiResponse::from_error(&ServiceError::NotFound(format!("unsupported property: {other}"))),
    }
}

#[utoipa::path(
    put, path = "/gists/{id}/{property}", tag = "gists",
    params(("id" = i32, Path, description = "Gist id"), ("property" = String, Path, description = "Property name, e.g. star")),
    responses(
        (status = 204, description = "Property set"),
        (status = 404, description = "Missing gist or unsupported property", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn put_property(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path((id, property)): Path<(String, String)>,
) -> ApiResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    state.api_for(&headers).put_property(id, &property).await
}

#[utoipa::path(
    delete, path = "/gists/{id}/{property}", tag = "gists",
    params(("id" = i32, Path, description = "Gist id"), ("property" = String, Path, description = "Property name, e.g. star")),
    responses(
        (status = 204, description = "Property cleared"),
        (status = 404, description = "Missing gist or unsupported property", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_property(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path((id, property)): Path<(String, String)>,
) -> ApiResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    state.api_for(&headers).delete_property(id, &property).await
}
