//! Ratio command handler
//!
//! Handles: ratio
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_user_option;
use crate::core::{DispatchError, IncomingMessage, MessageRef, Messenger, ReactionMarker};

/// How far back in the channel the target's message is searched
pub const HISTORY_LIMIT: u64 = 100;

pub const RATIO_WARNING: &str =
    "Le ratio est à utiliser avec modération. (Je te le présenterais à l'occasion).";
pub const RATIO_TEXT: &str = "RATIO!";
pub const RATIO_MARKER: &str = "💟";

pub struct RatioHandler;

#[async_trait]
impl SlashCommandHandler for RatioHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["ratio"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let target = get_user_option(&command.data.options, "user")
            .ok_or_else(|| anyhow!("Missing user parameter"))?;

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|msg| msg.content(RATIO_WARNING).ephemeral(true))
            })
            .await?;

        match deliver_ratio(ctx.messenger.as_ref(), command.channel_id.0, target).await? {
            Some(reply) => info!(
                "Ratio'd user {} in channel {} (reply {})",
                target, reply.channel_id, reply.message_id
            ),
            None => debug!(
                "No recent message from {} in channel {}, nothing to ratio",
                target, command.channel_id
            ),
        }
        Ok(())
    }
}

/// Newest message of `user_id` in a newest-first history
pub fn find_latest_by(history: &[IncomingMessage], user_id: u64) -> Option<&IncomingMessage> {
    history.iter().find(|m| m.author_id == user_id)
}

/// Reply "RATIO!" to the target's latest message and react 💟 on the reply
pub async fn deliver_ratio(
    messenger: &dyn Messenger,
    channel_id: u64,
    target: u64,
) -> Result<Option<MessageRef>, DispatchError> {
    let history = messenger.recent_messages(channel_id, HISTORY_LIMIT).await?;
    let Some(latest) = find_latest_by(&history, target) else {
        return Ok(None);
    };

    let reply = messenger.reply(latest.message_ref(), RATIO_TEXT).await?;
    messenger
        .add_reaction(reply, &ReactionMarker::unicode(RATIO_MARKER))
        .await?;
    Ok(Some(reply))
}
