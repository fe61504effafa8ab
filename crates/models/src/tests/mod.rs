//! Database-backed tests. They run only when `DATABASE_URL` is set and
//! `SKIP_DB_TESTS` is not.

use crate::db::connect_with_config;
use configs::DatabaseConfig;
use crate::{gist, user, user_credentials};
use sea_orm::{DatabaseConnection, EntityTrait, ModelTrait};
use migration::MigratorTrait;
use anyhow::Result;
use uuid::Uuid;

async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let db = connect_with_config(&DatabaseConfig::default()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

fn unique_username() -> String {
    format!("models_{}", &Uuid::new_v4().simple().to_string()[..12])
}

#[tokio::test]
async fn test_user_and_gist_crud() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let owner = user::create(&db, &unique_username()).await?;
    let found = user::find_by_username(&db, &owner.username).await?;
    assert_eq!(found.map(|u| u.id), Some(owner.id));

    let g = gist::create(&db, owner.id, Some("d".into()), None, false).await?;
    assert_eq!(g.user_id, owner.id);
    assert_eq!(g.description.as_deref(), Some("d"));
    assert!(g.content.is_none());
    assert!(!g.starred);

    let related = g.find_related(user::Entity).one(&db).await?;
    assert_eq!(related.map(|u| u.username), Some(owner.username.clone()));

    // deleting the owner cascades to gists
    user::hard_delete(&db, owner.id).await?;
    assert!(gist::Entity::find_by_id(g.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_upsert_password_replaces_hash() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let owner = user::create(&db, &unique_username()).await?;
    let first = user_credentials::upsert_password(&db, owner.id, "hash-1".into(), "argon2").await?;
    let second = user_credentials::upsert_password(&db, owner.id, "hash-2".into(), "argon2").await?;
    assert_eq!(first.id, second.id);
    assert_eq!(second.password_hash, "hash-2");

    assert!(user_credentials::upsert_password(&db, owner.id, " ".into(), "argon2").await.is_err());

    user::hard_delete(&db, owner.id).await?;
    Ok(())
}
