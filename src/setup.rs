use anyhow::Result;
use tracing::info;

use crate::locale::{Language, Notice};
use crate::store::{ConfigStore, ServerConfig};

pub const SETUP_COMMAND: &str = "setup";
pub const SETUP_DESCRIPTION: &str = "Setup the bot for the server";

/// What the `setup` handler needs to know about one invocation.
#[derive(Debug, Clone)]
pub struct SetupRequest {
    pub server_id: Option<u64>,
    pub channel_id: u64,
    pub user_id: u64,
    pub is_admin: bool,
    pub locale: String,
}

/// Bind the invoking channel as the server's bot channel and return the reply text.
///
/// Non-admins and invocations outside a server leave the store untouched.
pub async fn run_setup(
    store: &dyn ConfigStore,
    request: &SetupRequest,
    panel_url: &str,
) -> Result<String> {
    let lang = Language::from_locale(&request.locale);

    if !request.is_admin {
        info!("Setup refused for non-admin user {}", request.user_id);
        return Ok(Notice::SetupDenied.render(lang));
    }

    let Some(server_id) = request.server_id else {
        return Ok(Notice::SetupOutsideServer.render(lang));
    };

    let config = ServerConfig::configured(request.user_id, request.channel_id);
    info!(
        "Server {} configured by {} at {} (channel {})",
        server_id,
        config.setup_by,
        config.setup_date.to_rfc3339(),
        config.channel_id
    );
    store.set(server_id, config).await?;

    Ok(Notice::SetupComplete(panel_url).render(lang))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryConfigStore;

    const PANEL: &str = "https://panel.example.com";

    fn request(user_id: u64, channel_id: u64, is_admin: bool) -> SetupRequest {
        SetupRequest {
            server_id: Some(1),
            channel_id,
            user_id,
            is_admin,
            locale: "en-US".to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_setup_binds_current_channel() {
        let store = InMemoryConfigStore::new();
        let reply = run_setup(&store, &request(100, 10, true), PANEL).await.unwrap();

        assert!(reply.starts_with("Bot setup complete!"));
        assert!(reply.contains(PANEL));
        let config = store.get(1).await.unwrap();
        assert!(config.is_configured);
        assert_eq!(config.setup_by, 100);
        assert_eq!(config.channel_id, 10);
    }

    #[tokio::test]
    async fn test_non_admin_is_refused_without_state_change() {
        let store = InMemoryConfigStore::new();
        let reply = run_setup(&store, &request(100, 10, false), PANEL).await.unwrap();

        assert_eq!(reply, "Sorry, you need to be an administrator to setup the bot.");
        assert!(store.get(1).await.is_none());
    }

    #[tokio::test]
    async fn test_second_setup_replaces_first() {
        let store = InMemoryConfigStore::new();
        run_setup(&store, &request(100, 10, true), PANEL).await.unwrap();
        run_setup(&store, &request(200, 20, true), PANEL).await.unwrap();

        let config = store.get(1).await.unwrap();
        assert_eq!(config.setup_by, 200);
        assert_eq!(config.channel_id, 20);
    }

    #[tokio::test]
    async fn test_arabic_locale_reply() {
        let store = InMemoryConfigStore::new();
        let mut req = request(100, 10, false);
        req.locale = "ar".to_string();

        let reply = run_setup(&store, &req, PANEL).await.unwrap();
        assert_eq!(reply, Notice::SetupDenied.render(Language::Arabic));
    }

    #[tokio::test]
    async fn test_outside_server_is_rejected() {
        let store = InMemoryConfigStore::new();
        let mut req = request(100, 10, true);
        req.server_id = None;

        let reply = run_setup(&store, &req, PANEL).await.unwrap();
        assert_eq!(reply, "The bot can only be set up inside a server.");
        assert!(store.get(1).await.is_none());
    }
}
