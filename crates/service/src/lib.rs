//! Service layer for the gists API.
//! - `gist::GistApi` turns each API call into repository finds and flushes.
//! - `gist::repository::GistRepository` is the persistence seam (SeaORM or in-memory).
//! - `response::ApiResponse` is the status/reason/body/headers record every call returns.

pub mod errors;
pub mod auth;
pub mod gist;
pub mod response;
#[cfg(test)]
pub mod test_support;

pub use gist::GistApi;
pub use response::ApiResponse;
