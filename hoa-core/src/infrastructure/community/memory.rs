//! Process-local community store

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::community::{Community, CommunityStore, CommunityStoreError, NewCommunity};

#[derive(Debug, Default)]
pub struct InMemoryCommunityStore {
    communities: RwLock<Vec<Community>>,
}

impl InMemoryCommunityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommunityStore for InMemoryCommunityStore {
    async fn list(&self) -> Result<Vec<Community>, CommunityStoreError> {
        let communities = self.communities.read().await;
        let mut listed = communities.clone();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(listed)
    }

    async fn create(&self, community: NewCommunity) -> Result<Community, CommunityStoreError> {
        if community.name.trim().is_empty() {
            return Err(CommunityStoreError::Invalid {
                reason: "name is required".to_string(),
            });
        }
        let created = community.into_community(Utc::now());
        self.communities.write().await.push(created.clone());
        Ok(created)
    }
}
