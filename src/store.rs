use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Per-server setup state written by the `setup` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub is_configured: bool,
    pub setup_by: u64,
    pub setup_date: DateTime<Utc>,
    /// The only channel the bot answers in.
    pub channel_id: u64,
}

impl ServerConfig {
    pub fn configured(setup_by: u64, channel_id: u64) -> Self {
        Self {
            is_configured: true,
            setup_by,
            setup_date: Utc::now(),
            channel_id,
        }
    }
}

/// Server setup storage, keyed by server id.
///
/// `set` replaces the whole entry so concurrent setups resolve as last write wins.
/// `get` never fails: a backend that cannot read reports the server as absent.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, server_id: u64) -> Option<ServerConfig>;
    async fn set(&self, server_id: u64, config: ServerConfig) -> Result<()>;
    #[allow(dead_code)]
    async fn delete(&self, server_id: u64) -> Result<Option<ServerConfig>>;
}

/// Process-local store. Everything is lost on restart.
#[derive(Default)]
pub struct InMemoryConfigStore {
    servers: RwLock<HashMap<u64, ServerConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, server_id: u64) -> Option<ServerConfig> {
        self.servers.read().await.get(&server_id).cloned()
    }

    async fn set(&self, server_id: u64, config: ServerConfig) -> Result<()> {
        self.servers.write().await.insert(server_id, config);
        Ok(())
    }

    async fn delete(&self, server_id: u64) -> Result<Option<ServerConfig>> {
        Ok(self.servers.write().await.remove(&server_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_absent_server() {
        let store = InMemoryConfigStore::new();
        assert!(store.get(42).await.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_binding() {
        let store = InMemoryConfigStore::new();
        store.set(1, ServerConfig::configured(100, 10)).await.unwrap();
        store.set(1, ServerConfig::configured(200, 20)).await.unwrap();

        let config = store.get(1).await.unwrap();
        assert_eq!(config.setup_by, 200);
        assert_eq!(config.channel_id, 20);
        assert!(config.is_configured);
    }

    #[tokio::test]
    async fn test_servers_are_independent() {
        let store = InMemoryConfigStore::new();
        store.set(1, ServerConfig::configured(100, 10)).await.unwrap();
        store.set(2, ServerConfig::configured(100, 30)).await.unwrap();

        assert_eq!(store.get(1).await.unwrap().channel_id, 10);
        assert_eq!(store.get(2).await.unwrap().channel_id, 30);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_entry() {
        let store = InMemoryConfigStore::new();
        store.set(7, ServerConfig::configured(1, 2)).await.unwrap();

        let removed = store.delete(7).await.unwrap();
        assert_eq!(removed.map(|c| c.channel_id), Some(2));
        assert!(store.get(7).await.is_none());
        assert!(store.delete(7).await.unwrap().is_none());
    }
}
