//! Community profile contract
//!
//! A community profile carries the letterhead and house rules an HOA wants
//! reflected in its letters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub guidelines: String,
    #[serde(default)]
    pub letterhead: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a community profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCommunity {
    pub name: String,
    pub guidelines: String,
    pub letterhead: String,
    pub logo_url: Option<String>,
}

impl NewCommunity {
    /// Materialize the profile with a fresh id
    pub fn into_community(self, created_at: DateTime<Utc>) -> Community {
        Community {
            id: Uuid::new_v4(),
            name: self.name,
            guidelines: self.guidelines,
            letterhead: self.letterhead,
            logo_url: self.logo_url,
            created_at,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommunityStoreError {
    #[error("Invalid community: {reason}")]
    Invalid { reason: String },

    #[error("Community store error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Community store unreachable: {message}")]
    Transport { message: String },
}

#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// All profiles, oldest first
    async fn list(&self) -> Result<Vec<Community>, CommunityStoreError>;

    async fn create(&self, community: NewCommunity) -> Result<Community, CommunityStoreError>;
}
