//! Gist module: domain types, persistence seam, property registry and the
//! `GistApi` façade that shapes responses.

pub mod domain;
pub mod properties;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::GistApi;
