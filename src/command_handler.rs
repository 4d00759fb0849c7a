use anyhow::Result;
use chrono::Utc;
use log::{debug, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::{CommandContext, CommandRegistry};
use crate::core::{IncomingMessage, Messenger, SerenityMessenger};
use crate::features::birthdays::DailySchedule;
use crate::features::reactions::ReactionRuleSet;

/// Routes guild messages through the reaction rules and slash commands to their handler
#[derive(Clone)]
pub struct CommandHandler {
    registry: CommandRegistry,
    reactions: Arc<ReactionRuleSet>,
    schedule: DailySchedule,
    guild_id: u64,
}

impl CommandHandler {
    pub fn new(reactions: Arc<ReactionRuleSet>, schedule: DailySchedule, guild_id: u64) -> Self {
        Self {
            registry: CommandRegistry::with_builtin_handlers(),
            reactions,
            schedule,
            guild_id,
        }
    }

    pub async fn handle_message(&self, ctx: &Context, msg: &Message) {
        let messenger = SerenityMessenger::new(ctx.http.clone());
        self.handle_incoming(&messenger, &IncomingMessage::from(msg))
            .await;
    }

    /// Apply the reaction rules to a message of the bot's guild.
    /// Bot messages and other guilds are ignored. Returns the number of reactions added.
    pub async fn handle_incoming(&self, messenger: &dyn Messenger, msg: &IncomingMessage) -> usize {
        if msg.author_is_bot || msg.guild_id != Some(self.guild_id) {
            return 0;
        }

        let request_id = Uuid::new_v4();
        debug!(
            "[{}] 📥 Message {} | User: {} | Channel: {} | Content: '{}'",
            request_id,
            msg.id,
            msg.author_id,
            msg.channel_id,
            msg.content.chars().take(100).collect::<String>()
        );

        // Birthdays follow the announcement time zone, not the host's
        let today = self.schedule.today(Utc::now());
        let applied = self.reactions.apply(messenger, msg, today).await;
        if applied > 0 {
            debug!("[{request_id}] ✅ Added {applied} reactions");
        }
        applied
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("Unknown slash command: {}", command.data.name);
            return Ok(());
        };

        let context = Arc::new(CommandContext::new(Arc::new(SerenityMessenger::new(
            ctx.http.clone(),
        ))));
        handler.handle(context, ctx, command).await
    }
}
