pub mod discord;

use anyhow::Result;
use async_trait::async_trait;

/// A file attached to an inbound message.
#[derive(Debug, Clone)]
pub struct AttachmentRef {
    pub filename: String,
    pub url: String,
}

/// A server message handed to the pipeline. Direct messages never get here.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub author_id: u64,
    pub server_id: u64,
    pub channel_id: u64,
    /// The message text, untrimmed
    pub text: String,
    pub attachments: Vec<AttachmentRef>,
}

/// Outbound operations bound to the inbound message being handled.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    /// Reply to the inbound message.
    async fn reply(&self, text: &str) -> Result<()>;
    /// Post to the inbound message's channel without referencing it.
    async fn send(&self, text: &str) -> Result<()>;
    async fn delete_original(&self) -> Result<()>;
}
