use anyhow::Result;
use log::info;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

use crate::features::birthdays::BirthdayAck;

/// Response to a button click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentReply {
    Public(String),
    Ephemeral(String),
}

impl ComponentReply {
    /// Decide the response from the custom id alone; no per-button state exists
    pub fn route(custom_id: &str, activator: &str) -> Self {
        match BirthdayAck::parse(custom_id) {
            Some(ack) => ComponentReply::Public(ack.acknowledgment(activator)),
            None => ComponentReply::Ephemeral("Unknown component interaction.".to_string()),
        }
    }

    /// Message content and whether only the activator sees it
    pub fn into_response(self) -> (String, bool) {
        match self {
            ComponentReply::Public(text) => (text, false),
            ComponentReply::Ephemeral(text) => (text, true),
        }
    }
}

/// Handler for all message component interactions
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageComponentHandler;

impl MessageComponentHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle_component_interaction(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        let activator = interaction
            .member
            .as_ref()
            .and_then(|m| m.nick.clone())
            .unwrap_or_else(|| interaction.user.name.clone());

        info!(
            "Processing component interaction: {custom_id} from user: {}",
            interaction.user.id
        );

        let (content, ephemeral) = ComponentReply::route(custom_id, &activator).into_response();

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.content(content).ephemeral(ephemeral)
                    })
            })
            .await?;

        Ok(())
    }
}
