//! Supabase (PostgREST) community store

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::CommunityStoreConfig;
use crate::domain::community::{Community, CommunityStore, CommunityStoreError, NewCommunity};

pub struct SupabaseCommunityStore {
    client: Client,
    table_url: String,
    api_key: String,
}

impl SupabaseCommunityStore {
    pub fn new(
        project_url: &str,
        api_key: impl Into<String>,
        config: &CommunityStoreConfig,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to build Supabase HTTP client, using default client");
                Client::new()
            });

        Self {
            client,
            table_url: format!(
                "{}/rest/v1/{}",
                project_url.trim_end_matches('/'),
                config.table
            ),
            api_key: api_key.into(),
        }
    }

    /// Build from configuration; `None` unless both the URL and key are set
    pub fn from_config(config: &CommunityStoreConfig) -> Option<Self> {
        let url = config
            .supabase_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())?;
        let key = config
            .supabase_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self::new(url, key, config))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows(response: reqwest::Response) -> Result<Vec<Community>, CommunityStoreError> {
        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, "Supabase API error: {}", message);
            return Err(CommunityStoreError::Backend {
                status: status.as_u16(),
                message,
            });
        }
        let rows: Vec<CommunityRow> = response.json().await.map_err(transport)?;
        Ok(rows.into_iter().map(Community::from).collect())
    }
}

fn transport(e: reqwest::Error) -> CommunityStoreError {
    CommunityStoreError::Transport {
        message: e.to_string(),
    }
}

#[async_trait]
impl CommunityStore for SupabaseCommunityStore {
    async fn list(&self) -> Result<Vec<Community>, CommunityStoreError> {
        let response = self
            .authorized(self.client.get(&self.table_url))
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .send()
            .await
            .map_err(transport)?;
        Self::rows(response).await
    }

    async fn create(&self, community: NewCommunity) -> Result<Community, CommunityStoreError> {
        if community.name.trim().is_empty() {
            return Err(CommunityStoreError::Invalid {
                reason: "name is required".to_string(),
            });
        }

        debug!(name = %community.name, "Creating community profile");

        let insert = InsertRow {
            name: &community.name,
            guidelines: &community.guidelines,
            letterhead: &community.letterhead,
            logo_url: community.logo_url.as_deref(),
        };
        let response = self
            .authorized(self.client.post(&self.table_url))
            .header("Prefer", "return=representation")
            .json(&[insert])
            .send()
            .await
            .map_err(transport)?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CommunityStoreError::Backend {
                status: 200,
                message: "insert returned no rows".to_string(),
            })
    }
}

// === PostgREST row types (snake_case columns) ===

#[derive(Serialize)]
struct InsertRow<'a> {
    name: &'a str,
    guidelines: &'a str,
    letterhead: &'a str,
    logo_url: Option<&'a str>,
}

#[derive(Deserialize)]
struct CommunityRow {
    id: uuid::Uuid,
    name: String,
    #[serde(default)]
    guidelines: Option<String>,
    #[serde(default)]
    letterhead: Option<String>,
    #[serde(default)]
    logo_url: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CommunityRow> for Community {
    fn from(row: CommunityRow) -> Self {
        Community {
            id: row.id,
            name: row.name,
            guidelines: row.guidelines.unwrap_or_default(),
            letterhead: row.letterhead.unwrap_or_default(),
            logo_url: row.logo_url,
            created_at: row.created_at,
        }
    }
}
