use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::builder::{
    CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage,
};
use serenity::http::Http;
use serenity::model::application::{Command, CommandInteraction, Interaction};
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::id::{ChannelId, MessageId};
use serenity::model::permissions::Permissions;
use serenity::prelude::{Context, EventHandler};
use serenity::Client;
use tracing::{debug, error, info, warn};

use crate::pipeline::Pipeline;
use crate::platform::{AttachmentRef, ChatSurface, IncomingMessage};
use crate::setup::{run_setup, SetupRequest, SETUP_COMMAND, SETUP_DESCRIPTION};

/// Outbound calls for one inbound Discord message, over the REST client.
struct MessageSurface {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

#[async_trait]
impl ChatSurface for MessageSurface {
    async fn reply(&self, text: &str) -> Result<()> {
        let message = CreateMessage::new()
            .content(text)
            .reference_message((self.channel_id, self.message_id));
        self.channel_id
            .send_message(&*self.http, message)
            .await
            .context("Failed to reply on Discord")?;
        Ok(())
    }

    async fn send(&self, text: &str) -> Result<()> {
        self.channel_id
            .say(&*self.http, text)
            .await
            .context("Failed to send Discord message")?;
        Ok(())
    }

    async fn delete_original(&self) -> Result<()> {
        self.channel_id
            .delete_message(&self.http, self.message_id)
            .await
            .context("Failed to delete Discord message")
    }
}

/// Application commands registered on startup.
pub fn application_commands() -> Vec<CreateCommand> {
    vec![CreateCommand::new(SETUP_COMMAND)
        .description(SETUP_DESCRIPTION)
        .default_member_permissions(Permissions::ADMINISTRATOR)]
}

struct DiscordHandler {
    pipeline: Arc<Pipeline>,
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);

        info!("Started refreshing application (/) commands.");
        match Command::set_global_commands(&ctx.http, application_commands()).await {
            Ok(cmds) => info!("Registered {} application command(s)", cmds.len()),
            Err(e) => error!("Failed to register application commands: {}", e),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let Some(guild_id) = msg.guild_id else {
            debug!("Ignoring direct message from {}", msg.author.id);
            return;
        };

        let incoming = IncomingMessage {
            author_id: msg.author.id.get(),
            server_id: guild_id.get(),
            channel_id: msg.channel_id.get(),
            text: msg.content.clone(),
            attachments: msg
                .attachments
                .iter()
                .map(|a| AttachmentRef {
                    filename: a.filename.clone(),
                    url: a.url.clone(),
                })
                .collect(),
        };

        let surface = MessageSurface {
            http: Arc::clone(&ctx.http),
            channel_id: msg.channel_id,
            message_id: msg.id,
        };

        if let Err(e) = self.pipeline.handle(&incoming, &surface).await {
            warn!("Failed to answer message {}: {:#}", msg.id, e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let content = match command.data.name.as_str() {
            SETUP_COMMAND => match self.handle_setup(&command).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!("Setup failed: {:#}", e);
                    return;
                }
            },
            other => {
                warn!("Unknown command: {}", other);
                respond(&ctx, &command, "Unknown command.", true).await;
                return;
            }
        };

        respond(&ctx, &command, &content, false).await;
    }
}

impl DiscordHandler {
    async fn handle_setup(&self, command: &CommandInteraction) -> Result<String> {
        let is_admin = command
            .member
            .as_ref()
            .and_then(|m| m.permissions)
            .is_some_and(|p| p.administrator());

        let request = SetupRequest {
            server_id: command.guild_id.map(|g| g.get()),
            channel_id: command.channel_id.get(),
            user_id: command.user.id.get(),
            is_admin,
            locale: command.locale.clone(),
        };

        run_setup(self.pipeline.store(), &request, self.pipeline.panel_url()).await
    }
}

async fn respond(ctx: &Context, command: &CommandInteraction, content: &str, ephemeral: bool) {
    let message = CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(ephemeral);
    if let Err(e) = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        warn!("Failed to respond to /{}: {}", command.data.name, e);
    }
}

/// Connect to the gateway and handle events until the connection ends.
pub async fn run(token: &str, pipeline: Arc<Pipeline>) -> Result<()> {
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    info!("Starting Discord platform...");

    let mut client = Client::builder(token, intents)
        .event_handler(DiscordHandler { pipeline })
        .await
        .context("Failed to create Discord client")?;

    client.start().await.context("Discord gateway error")?;
    Ok(())
}
