use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::attachments::{read_text_attachments, AttachmentFetcher};
use crate::chunk::{split_message, DISCORD_MESSAGE_LIMIT};
use crate::filter::ContentFilter;
use crate::llm::AnswerGenerator;
use crate::locale::{Language, Notice};
use crate::platform::{ChatSurface, IncomingMessage};
use crate::prompt::{build_prompt, system_preamble};
use crate::store::ConfigStore;

/// Lower-cased prefix that short-circuits to the panel link.
pub const PANEL_COMMAND: &str = "!panel";

/// Runs every server message through the gate chain.
/// The first gate that answers ends the handling of that message.
pub struct Pipeline {
    store: Arc<dyn ConfigStore>,
    filter: ContentFilter,
    generator: Arc<dyn AnswerGenerator>,
    fetcher: Arc<dyn AttachmentFetcher>,
    panel_url: String,
    preamble: String,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        filter: ContentFilter,
        generator: Arc<dyn AnswerGenerator>,
        fetcher: Arc<dyn AttachmentFetcher>,
        panel_url: String,
    ) -> Self {
        let preamble = system_preamble(&panel_url);
        Self {
            store,
            filter,
            generator,
            fetcher,
            panel_url,
            preamble,
        }
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    pub fn panel_url(&self) -> &str {
        &self.panel_url
    }

    /// Handle one message. Errors are delivery failures of gate replies only.
    pub async fn handle(&self, msg: &IncomingMessage, surface: &dyn ChatSurface) -> Result<()> {
        let lang = Language::from_marker(&msg.text);

        let server = match self.store.get(msg.server_id).await {
            Some(config) if config.is_configured => config,
            _ => {
                debug!("Server {} is not set up", msg.server_id);
                return surface.reply(&Notice::SetupRequired.render(lang)).await;
            }
        };

        if msg.channel_id != server.channel_id {
            debug!(
                "Message in channel {} ignored, bot channel is {}",
                msg.channel_id, server.channel_id
            );
            return surface.reply(&Notice::WrongChannel.render(lang)).await;
        }

        if msg.text.to_lowercase().starts_with(PANEL_COMMAND) {
            return surface
                .reply(&Notice::PanelUrl(&self.panel_url).render(lang))
                .await;
        }

        if self.filter.is_blocked(&msg.text) {
            info!(
                "Removing message from {} in server {}: blocked content",
                msg.author_id, msg.server_id
            );
            if let Err(e) = surface.delete_original().await {
                warn!("Failed to delete blocked message: {:#}", e);
            }
            return surface.send(&Notice::ContentRemoved.render(lang)).await;
        }

        let detected = Language::detect(&msg.text);
        debug!("Detected language {:?} for message from {}", detected, msg.author_id);

        let answer = match self.answer(msg).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Error processing message: {:#}", e);
                return surface.reply(&Notice::GenericError.render(lang)).await;
            }
        };

        self.deliver(&answer, surface).await;
        Ok(())
    }

    async fn answer(&self, msg: &IncomingMessage) -> Result<String> {
        let file_content = read_text_attachments(self.fetcher.as_ref(), &msg.attachments).await?;
        let prompt = build_prompt(&self.preamble, &msg.text, &file_content);
        self.generator.generate(&prompt).await
    }

    /// Each chunk is sent on its own; a failed chunk does not stop the rest.
    async fn deliver(&self, answer: &str, surface: &dyn ChatSurface) {
        let chunks = split_message(answer, DISCORD_MESSAGE_LIMIT);
        debug!("Delivering answer in {} chunk(s)", chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            if let Err(e) = surface.reply(chunk).await {
                warn!("Failed to deliver chunk {}: {:#}", index, e);
            }
        }
    }
}
