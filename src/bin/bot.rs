use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use mp2i_fun::commands::{register_guild_commands, CommandHandler};
use mp2i_fun::core::{Config, Messenger, SerenityMessenger};
use mp2i_fun::features::birthdays::{
    BirthdateRegistry, BirthdayAnnouncer, BirthdayScheduler, DailySchedule, MemberDirectory,
};
use mp2i_fun::features::reactions::{default_flavors, ReactionRuleSet};
use mp2i_fun::message_components::MessageComponentHandler;

struct Handler {
    command_handler: Arc<CommandHandler>,
    component_handler: MessageComponentHandler,
    guild_id: GuildId,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        self.command_handler.handle_message(&ctx, &msg).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        if let Err(e) = register_guild_commands(&ctx, self.guild_id).await {
            error!("❌ Failed to register guild slash commands: {e}");
        } else {
            info!("✅ Registered slash commands for guild {}", self.guild_id);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self
                    .command_handler
                    .handle_slash_command(&ctx, &command)
                    .await
                {
                    error!(
                        "Error handling slash command '{}': {}",
                        command.data.name, e
                    );
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self
                    .component_handler
                    .handle_component_interaction(&ctx, &component)
                    .await
                {
                    error!(
                        "Error handling component interaction '{}': {}",
                        component.data.custom_id, e
                    );

                    let _ = component
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message
                                        .content("❌ Sorry, I encountered an error processing your interaction.")
                                        .ephemeral(true)
                                })
                        })
                        .await;
                }
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting MP2I fun bot...");

    // Startup data is all-or-nothing: a bad record stops the bot here
    let directory = Arc::new(MemberDirectory::load(&config.members_path)?);
    info!("👥 Loaded {} members from {}", directory.len(), config.members_path.display());
    let registry = Arc::new(BirthdateRegistry::load_file(&config.birthdates_path, &directory)?);

    let schedule = DailySchedule::new(config.timezone, config.announce_time);
    let reactions = ReactionRuleSet::standard(
        registry.clone(),
        config.celebration_emoji.clone(),
        default_flavors(),
    );
    let command_handler = CommandHandler::new(Arc::new(reactions), schedule, config.discord_guild_id);

    let handler = Handler {
        command_handler: Arc::new(command_handler),
        component_handler: MessageComponentHandler::new(),
        guild_id: GuildId(config.discord_guild_id),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    // The broadcast channel is resolved once; failure is fatal
    let messenger: Arc<dyn Messenger> =
        Arc::new(SerenityMessenger::new(client.cache_and_http.http.clone()));
    let announcer =
        BirthdayAnnouncer::connect(messenger, config.birthday_channel_id, directory.clone()).await?;

    let job = BirthdayScheduler::new(schedule, registry, Arc::new(announcer)).start();

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        info!("🛑 Shutdown requested");
        job.stop().await;
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
