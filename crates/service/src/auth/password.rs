use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;

use super::domain::StoredCredentials;
use crate::errors::ServiceError;

pub const PASSWORD_ALGORITHM: &str = "argon2";

/// Hash a password into a PHC string suitable for `user_credentials.password_hash`.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Check `password` against stored credentials. Unknown algorithms never match.
pub fn verify_password(password: &str, stored: &StoredCredentials) -> Result<bool, ServiceError> {
    if stored.password_algorithm != PASSWORD_ALGORITHM {
        return Ok(false);
    }
    let parsed = PasswordHash::new(&stored.password_hash).map_err(|e| ServiceError::Internal(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(hash: String, algorithm: &str) -> StoredCredentials {
        StoredCredentials { user_id: 1, password_hash: hash, password_algorithm: algorithm.into() }
    }

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("Passw0rd").unwrap();
        assert!(hash.starts_with("$argon2"));
        let creds = stored(hash, PASSWORD_ALGORITHM);
        assert!(verify_password("Passw0rd", &creds).unwrap());
        assert!(!verify_password("wrong", &creds).unwrap());
    }

    #[test]
    fn unknown_algorithm_never_matches() {
        let hash = hash_password("Passw0rd").unwrap();
        assert!(!verify_password("Passw0rd", &stored(hash, "md5")).unwrap());
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        let err = verify_password("x", &stored("not-a-phc-string".into(), PASSWORD_ALGORITHM)).unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }
}
