//! Outbound messaging seam
//!
//! Everything the engine does to Discord goes through [`Messenger`]: adding
//! reactions, sending and replying, reading recent history and resolving the
//! broadcast channel. [`SerenityMessenger`] is the live implementation.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::application::component::ButtonStyle;
use serenity::model::channel::{Message, ReactionType};
use serenity::model::id::{ChannelId, MessageId};
use std::sync::Arc;

use super::error::{DestinationResolutionError, DispatchError};
use super::reaction::ReactionMarker;

/// The parts of an inbound message the engine looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub content: String,
}

impl IncomingMessage {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            channel_id: self.channel_id,
            message_id: self.id,
        }
    }
}

impl From<&Message> for IncomingMessage {
    fn from(msg: &Message) -> Self {
        IncomingMessage {
            id: msg.id.0,
            channel_id: msg.channel_id.0,
            guild_id: msg.guild_id.map(|g| g.0),
            author_id: msg.author.id.0,
            author_is_bot: msg.author.bot,
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

/// A single button attached under a sent message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlButton {
    pub custom_id: String,
    pub label: String,
    pub emoji: Option<String>,
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn add_reaction(
        &self,
        message: MessageRef,
        marker: &ReactionMarker,
    ) -> Result<(), DispatchError>;

    async fn send_message(
        &self,
        channel_id: u64,
        text: &str,
        control: Option<&ControlButton>,
    ) -> Result<MessageRef, DispatchError>;

    async fn reply(&self, message: MessageRef, text: &str) -> Result<MessageRef, DispatchError>;

    /// Most recent messages of a channel, newest first
    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: u64,
    ) -> Result<Vec<IncomingMessage>, DispatchError>;

    async fn resolve_channel(&self, channel_id: u64) -> Result<(), DestinationResolutionError>;
}

/// [`Messenger`] backed by the serenity HTTP client
#[derive(Clone)]
pub struct SerenityMessenger {
    http: Arc<Http>,
}

impl SerenityMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Messenger for SerenityMessenger {
    async fn add_reaction(
        &self,
        message: MessageRef,
        marker: &ReactionMarker,
    ) -> Result<(), DispatchError> {
        ChannelId(message.channel_id)
            .create_reaction(
                &self.http,
                MessageId(message.message_id),
                marker.to_reaction_type(),
            )
            .await?;
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: u64,
        text: &str,
        control: Option<&ControlButton>,
    ) -> Result<MessageRef, DispatchError> {
        let sent = ChannelId(channel_id)
            .send_message(&self.http, |m| {
                m.content(text);
                if let Some(button) = control {
                    m.components(|c| {
                        c.create_action_row(|row| {
                            row.create_button(|btn| {
                                btn.custom_id(&button.custom_id)
                                    .label(&button.label)
                                    .style(ButtonStyle::Primary);
                                if let Some(emoji) = &button.emoji {
                                    btn.emoji(ReactionType::Unicode(emoji.clone()));
                                }
                                btn
                            })
                        })
                    });
                }
                m
            })
            .await?;

        Ok(MessageRef {
            channel_id,
            message_id: sent.id.0,
        })
    }

    async fn reply(&self, message: MessageRef, text: &str) -> Result<MessageRef, DispatchError> {
        let channel = ChannelId(message.channel_id);
        let sent = channel
            .send_message(&self.http, |m| {
                m.content(text)
                    .reference_message((channel, MessageId(message.message_id)))
            })
            .await?;

        Ok(MessageRef {
            channel_id: message.channel_id,
            message_id: sent.id.0,
        })
    }

    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: u64,
    ) -> Result<Vec<IncomingMessage>, DispatchError> {
        let messages = ChannelId(channel_id)
            .messages(&self.http, |retriever| retriever.limit(limit))
            .await?;
        Ok(messages.iter().map(IncomingMessage::from).collect())
    }

    async fn resolve_channel(&self, channel_id: u64) -> Result<(), DestinationResolutionError> {
        self.http
            .get_channel(channel_id)
            .await
            .map(|_| ())
            .map_err(|e| DestinationResolutionError {
                channel_id,
                reason: e.to_string(),
            })
    }
}
