use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ServiceError;

pub type GistId = i32;

/// Owning user as seen by the gist layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: i32,
    pub username: String,
}

/// A stored gist together with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistRecord {
    pub id: GistId,
    pub owner: Owner,
    pub description: Option<String>,
    pub content: Option<String>,
    pub starred: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl GistRecord {
    pub fn representation(&self) -> Representation {
        Representation {
            id: self.id,
            description: self.description.clone(),
            content: self.content.clone(),
            starred: self.starred,
            owner: self.owner.username.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn location(&self) -> String { format!("/gists/{}", self.id) }
}

/// Public JSON projection of a gist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    pub id: GistId,
    pub description: Option<String>,
    pub content: Option<String>,
    pub starred: bool,
    pub owner: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// A gist about to be persisted; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGist {
    pub owner: Owner,
    pub description: Option<String>,
    pub content: Option<String>,
    pub starred: bool,
}

/// Request body of create and patch. Every key is optional; `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GistPayload {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub starred: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

/// `starred` may arrive as a boolean or as an integer (non-zero is true).
fn deserialize_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<Flag>::deserialize(d)?.map(|f| match f {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    }))
}

impl GistPayload {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| ServiceError::Validation(format!("malformed JSON payload: {e}")))?;
        if !value.is_object() {
            return Err(ServiceError::Validation("payload must be a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| ServiceError::Validation(format!("invalid payload: {e}")))
    }

    pub fn into_new_gist(self, owner: Owner) -> NewGist {
        NewGist {
            owner,
            description: self.description,
            content: self.content,
            starred: self.starred.unwrap_or(false),
        }
    }

    /// Partial update: only keys present in the payload overwrite the record.
    pub fn apply_to(self, gist: &mut GistRecord) {
        if let Some(d) = self.description { gist.description = Some(d); }
        if let Some(c) = self.content { gist.content = Some(c); }
        if let Some(s) = self.starred { gist.starred = s; }
    }
}

/// Boolean field a listing can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GistFilter {
    All,
    Starred,
}

impl GistFilter {
    pub fn from_field(name: Option<&str>) -> Result<Self, ServiceError> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(GistFilter::All),
            Some(n) => n.parse(),
        }
    }

    pub fn matches(&self, gist: &GistRecord) -> bool {
        match self {
            GistFilter::All => true,
            GistFilter::Starred => gist.starred,
        }
    }
}

impl FromStr for GistFilter {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starred" => Ok(GistFilter::Starred),
            other => Err(ServiceError::Validation(format!("unknown filter field: {other}"))),
        }
    }
}

impl fmt::Display for GistFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GistFilter::All => f.write_str("all"),
            GistFilter::Starred => f.write_str("starred"),
        }
    }
}
