use std::fmt;

use serde::{Deserialize, Serialize};

/// Credentials supplied by the caller of a single request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub user_id: i32,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// How strictly the caller's identity is checked when an owner is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthPolicy {
    /// When false the username alone identifies the owner (trusted internal caller).
    pub verify_passwords: bool,
}

impl Default for AuthPolicy {
    fn default() -> Self { Self { verify_passwords: true } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password() {
        let c = Credentials::new("alice", "hunter2");
        let shown = format!("{:?}", c);
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
    }
}
