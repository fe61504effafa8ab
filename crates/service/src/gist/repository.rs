use async_trait::async_trait;

use super::domain::{GistFilter, GistId, GistRecord, NewGist, Owner};
use crate::auth::StoredCredentials;
use crate::errors::ServiceError;

/// Persistence seam for gists and their owners.
///
/// Every write commits before returning; a failed commit surfaces as
/// `ServiceError::Store`.
#[async_trait]
pub trait GistRepository: Send + Sync {
    async fn find_by_id(&self, id: GistId) -> Result<Option<GistRecord>, ServiceError>;
    /// Gists matching `filter`, ordered by id.
    async fn find_by(&self, filter: GistFilter) -> Result<Vec<GistRecord>, ServiceError>;
    async fn find_owner(&self, username: &str) -> Result<Option<Owner>, ServiceError>;
    async fn find_credentials(&self, user_id: i32) -> Result<Option<StoredCredentials>, ServiceError>;

    async fn persist(&self, gist: NewGist) -> Result<GistRecord, ServiceError>;
    /// Flush the mutable fields of an existing gist.
    async fn save(&self, gist: &GistRecord) -> Result<GistRecord, ServiceError>;
    /// Returns false when nothing was removed.
    async fn remove(&self, id: GistId) -> Result<bool, ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    use crate::auth::password::{hash_password, PASSWORD_ALGORITHM};

    #[derive(Default)]
    struct State {
        users: HashMap<String, Owner>,       // key: username
        creds: HashMap<i32, StoredCredentials>, // key: user_id
        gists: BTreeMap<GistId, GistRecord>,
        next_user_id: i32,
        next_gist_id: GistId,
    }

    #[derive(Default)]
    pub struct InMemoryGistRepository {
        state: Mutex<State>,
        fail_writes: AtomicBool,
    }

    impl InMemoryGistRepository {
        pub fn new() -> Self { Self::default() }

        fn state(&self) -> MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        fn check_writable(&self) -> Result<(), ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Store("simulated commit failure".into()));
            }
            Ok(())
        }

        /// Register a user; an existing username is returned unchanged.
        pub fn add_user(&self, username: &str) -> Owner {
            let mut state = self.state();
            if let Some(existing) = state.users.get(username) {
                return existing.clone();
            }
            state.next_user_id += 1;
            let owner = Owner { id: state.next_user_id, username: username.to_string() };
            state.users.insert(username.to_string(), owner.clone());
            owner
        }

        /// Register a user with an argon2-hashed password.
        pub fn add_user_with_password(&self, username: &str, password: &str) -> Result<Owner, ServiceError> {
            let owner = self.add_user(username);
            let hash = hash_password(password)?;
            self.state().creds.insert(
                owner.id,
                StoredCredentials { user_id: owner.id, password_hash: hash, password_algorithm: PASSWORD_ALGORITHM.into() },
            );
            Ok(owner)
        }

        /// Make every subsequent write fail as a commit failure would.
        pub fn fail_writes(&self, fail: bool) { self.fail_writes.store(fail, Ordering::SeqCst); }

        pub fn len(&self) -> usize { self.state().gists.len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }
    }

    #[async_trait]
    impl GistRepository for InMemoryGistRepository {
        async fn find_by_id(&self, id: GistId) -> Result<Option<GistRecord>, ServiceError> {
            Ok(self.state().gists.get(&id).cloned())
        }

        async fn find_by(&self, filter: GistFilter) -> Result<Vec<GistRecord>, ServiceError> {
            Ok(self.state().gists.values().filter(|g| filter.matches(g)).cloned().collect())
        }

        async fn find_owner(&self, username: &str) -> Result<Option<Owner>, ServiceError> {
            Ok(self.state().users.get(username).cloned())
        }

        async fn find_credentials(&self, user_id: i32) -> Result<Option<StoredCredentials>, ServiceError> {
            Ok(self.state().creds.get(&user_id).cloned())
        }

        async fn persist(&self, gist: NewGist) -> Result<GistRecord, ServiceError> {
            self.check_writable()?;
            let mut state = self.state();
            state.next_gist_id += 1;
            let now = Utc::now().into();
            let record = GistRecord {
                id: state.next_gist_id,
                owner: gist.owner,
                description: gist.description,
                content: gist.content,
                starred: gist.starred,
                created_at: now,
                updated_at: now,
            };
            state.gists.insert(record.id, record.clone());
            Ok(record)
        }

        async fn save(&self, gist: &GistRecord) -> Result<GistRecord, ServiceError> {
            self.check_writable()?;
            let mut state = self.state();
            let Some(stored) = state.gists.get_mut(&gist.id) else {
                return Err(ServiceError::not_found("gist"));
            };
            stored.description = gist.description.clone();
            stored.content = gist.content.clone();
            stored.starred = gist.starred;
            stored.updated_at = Utc::now().into();
            Ok(stored.clone())
        }

        async fn remove(&self, id: GistId) -> Result<bool, ServiceError> {
            self.check_writable()?;
            Ok(self.state().gists.remove(&id).is_some())
        }
    }
}
