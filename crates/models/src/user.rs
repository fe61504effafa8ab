use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{gist, user_credentials};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Gist,
    Credentials,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Gist => Entity::has_many(gist::Entity).into(),
            Relation::Credentials => Entity::has_one(user_credentials::Entity).into(),
        }
    }
}

impl Related<gist::Entity> for Entity {
    fn to() -> RelationDef { Relation::Gist.def() }
}

impl Related<user_credentials::Entity> for Entity {
    fn to() -> RelationDef { Relation::Credentials.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("username required".into()));
    }
    if trimmed.len() > 64 {
        return Err(errors::ModelError::Validation("username too long (<=64)".into()));
    }
    if trimmed.contains(':') {
        return Err(errors::ModelError::Validation("username must not contain ':'".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, username: &str) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    let am = ActiveModel {
        username: Set(username.trim().to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: i32) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_username;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("a:b").is_err());
        assert!(validate_username(&"x".repeat(65)).is_err());
    }
}
