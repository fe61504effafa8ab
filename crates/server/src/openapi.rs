use axum::Json;
use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Body of `POST /gists` and `PATCH /gists/{id}`; absent keys are left untouched.
#[derive(ToSchema)]
pub struct GistPayloadDoc {
    pub description: Option<String>,
    pub content: Option<String>,
    /// Boolean or integer, non-zero meaning true.
    pub starred: Option<bool>,
}

#[derive(ToSchema)]
pub struct GistDoc {
    pub id: i32,
    pub description: Option<String>,
    pub content: Option<String>,
    pub starred: bool,
    /// Username of the owner.
    pub owner: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    /// One of `not_found`, `bad_request`, `unauthorized`, `store_error`, `internal_error`.
    pub error: String,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::gists::list,
        crate::routes::gists::list_starred,
        crate::routes::gists::create,
        crate::routes::gists::get,
        crate::routes::gists::patch,
        crate::routes::gists::delete,
        crate::routes::gists::property_status,
        crate::routes::gists::put_property,
        crate::routes::gists::delete_property,
    ),
    components(
        schemas(
            HealthResponse,
            GistPayloadDoc,
            GistDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "gists")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
