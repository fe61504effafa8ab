//! Caller identity: the credentials a request carries and the argon2 check
//! against what is stored for a user.

pub mod domain;
pub mod password;

pub use domain::{AuthPolicy, Credentials, StoredCredentials};
