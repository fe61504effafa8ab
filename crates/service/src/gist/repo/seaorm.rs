use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, Unchanged};
use tracing::debug;

use models::{gist, user, user_credentials};

use crate::auth::{password::{hash_password, PASSWORD_ALGORITHM}, StoredCredentials};
use crate::errors::ServiceError;
use crate::gist::domain::{GistFilter, GistId, GistRecord, NewGist, Owner};
use crate::gist::repository::GistRepository;

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmGistRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmGistRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    /// Create a user with an argon2 password. Users are never created through
    /// the gist API itself; this exists for provisioning and tests.
    pub async fn provision_user(&self, username: &str, password: &str) -> Result<Owner, ServiceError> {
        let created = user::create(&self.db, username).await?;
        let hash = hash_password(password)?;
        user_credentials::upsert_password(&self.db, created.id, hash, PASSWORD_ALGORITHM).await?;
        Ok(to_owner(created))
    }
}

fn to_owner(u: user::Model) -> Owner {
    Owner { id: u.id, username: u.username }
}

fn to_record(g: gist::Model, owner: Owner) -> GistRecord {
    GistRecord {
        id: g.id,
        owner,
        description: g.description,
        content: g.content,
        starred: g.starred,
        created_at: g.created_at,
        updated_at: g.updated_at,
    }
}

fn joined(row: (gist::Model, Option<user::Model>)) -> Result<GistRecord, ServiceError> {
    let (g, u) = row;
    let owner = u.ok_or_else(|| ServiceError::Store(format!("gist {} has no owner row", g.id)))?;
    Ok(to_record(g, to_owner(owner)))
}

#[async_trait::async_trait]
impl GistRepository for SeaOrmGistRepository {
    async fn find_by_id(&self, id: GistId) -> Result<Option<GistRecord>, ServiceError> {
        let row = gist::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?;
        row.map(joined).transpose()
    }

    async fn find_by(&self, filter: GistFilter) -> Result<Vec<GistRecord>, ServiceError> {
        let mut finder = gist::Entity::find().find_also_related(user::Entity);
        if filter == GistFilter::Starred {
            finder = finder.filter(gist::Column::Starred.eq(true));
        }
        let rows = finder.order_by_asc(gist::Column::Id).all(&self.db).await?;
        debug!(%filter, count = rows.len(), "gist rows loaded");
        rows.into_iter().map(joined).collect()
    }

    async fn find_owner(&self, username: &str) -> Result<Option<Owner>, ServiceError> {
        Ok(user::find_by_username(&self.db, username).await?.map(to_owner))
    }

    async fn find_credentials(&self, user_id: i32) -> Result<Option<StoredCredentials>, ServiceError> {
        let res = user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(|c| StoredCredentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn persist(&self, new: NewGist) -> Result<GistRecord, ServiceError> {
        let created = gist::create(&self.db, new.owner.id, new.description, new.content, new.starred).await?;
        Ok(to_record(created, new.owner))
    }

    async fn save(&self, record: &GistRecord) -> Result<GistRecord, ServiceError> {
        let am = gist::ActiveModel {
            id: Unchanged(record.id),
            description: Set(record.description.clone()),
            content: Set(record.content.clone()),
            starred: Set(record.starred),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let updated = am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ServiceError::not_found("gist"),
            other => ServiceError::from(other),
        })?;
        Ok(to_record(updated, record.owner.clone()))
    }

    async fn remove(&self, id: GistId) -> Result<bool, ServiceError> {
        let res = gist::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    #[tokio::test]
    async fn gist_crud_repository() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmGistRepository::new(db);

        let username = format!("svc_{}", &Uuid::new_v4().simple().to_string()[..12]);
        let owner = repo.provision_user(&username, "Passw0rd").await?;
        assert_eq!(repo.find_owner(&username).await?, Some(owner.clone()));
        let creds = repo.find_credentials(owner.id).await?.unwrap();
        assert_eq!(creds.password_algorithm, PASSWORD_ALGORITHM);

        let created = repo
            .persist(NewGist { owner: owner.clone(), description: Some("d".into()), content: Some("c".into()), starred: false })
            .await?;
        let found = repo.find_by_id(created.id).await?.unwrap();
        assert_eq!(found.owner, owner);
        assert_eq!(found.content.as_deref(), Some("c"));

        let mut changed = found.clone();
        changed.starred = true;
        let saved = repo.save(&changed).await?;
        assert!(saved.starred);
        assert_eq!(saved.description.as_deref(), Some("d"));

        let starred = repo.find_by(GistFilter::Starred).await?;
        assert!(starred.iter().any(|g| g.id == created.id));
        assert!(starred.iter().all(|g| g.starred));

        assert!(repo.remove(created.id).await?);
        assert!(!repo.remove(created.id).await?);
        assert!(repo.find_by_id(created.id).await?.is_none());

        let missing = repo.save(&changed).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));

        user::hard_delete(&repo.db, owner.id).await?;
        Ok(())
    }
}
