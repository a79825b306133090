use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use plantkeeper::commands::{register_global_commands, register_guild_commands, CommandHandler};
use plantkeeper::core::{Config, SchedulerMode};
use plantkeeper::database::Database;
use plantkeeper::features::care::{CareTracker, MetricCatalog};
use plantkeeper::features::reminders::{DiscordNotifier, ReminderScheduler};

struct Handler {
    command_handler: Arc<CommandHandler>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        // Guild commands update instantly; global ones can take up to an hour
        if let Some(guild_id) = self.guild_id {
            info!("🔧 Development mode: Registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id).await {
                error!("❌ Failed to register guild slash commands: {e}");
            }
        } else {
            info!("🌍 Production mode: Registering commands globally");
            if let Err(e) = register_global_commands(&ctx).await {
                error!("❌ Failed to register global slash commands: {e}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };

        if let Err(e) = self
            .command_handler
            .handle_slash_command(&ctx, &command)
            .await
        {
            error!(
                "Error handling slash command '{}': {}",
                command.data.name, e
            );
            if let Err(why) = command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message
                                .content("❌ Sorry, I encountered an error processing your command. Please try again.")
                                .ephemeral(true)
                        })
                })
                .await
            {
                warn!("Failed to send error response: {why}");
            }
        }
    }
}

/// Run a single reminder cycle over the REST API and exit
async fn run_reminders_once(config: &Config, tracker: CareTracker) -> Result<()> {
    let http = Arc::new(Http::new(&config.discord_token));
    let scheduler = ReminderScheduler::new(
        tracker,
        Arc::new(DiscordNotifier::new(http)),
        config.send_timeout,
    );

    let report = scheduler.run_once().await?;
    info!(
        "One-shot reminder cycle finished: {}",
        serde_json::to_string(&report)?
    );
    Ok(())
}

/// Connect to the gateway for commands and run the scheduler until shutdown
async fn run_bot(config: &Config, tracker: CareTracker) -> Result<()> {
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler {
        command_handler: Arc::new(CommandHandler::new(tracker.clone())),
        guild_id,
    };

    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let cancel = CancellationToken::new();

    // Start the reminder scheduler
    let scheduler = ReminderScheduler::new(
        tracker,
        Arc::new(DiscordNotifier::new(client.cache_and_http.http.clone())),
        config.send_timeout,
    );
    let period = config.check_interval;
    let scheduler_cancel = cancel.clone();
    let scheduler_task = tokio::spawn(async move {
        scheduler.run(period, scheduler_cancel).await;
    });

    // Ctrl-C stops the scheduler and disconnects the shards
    let shard_manager = client.shard_manager.clone();
    let shutdown_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        info!("Shutdown signal received");
        shutdown_cancel.cancel();
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");
    let result = client.start().await;

    cancel.cancel();
    if let Err(e) = scheduler_task.await {
        error!("Reminder scheduler task failed: {e}");
    }

    result.map_err(|why| {
        error!("Gateway connection failed: {why:?}");
        anyhow::anyhow!("Failed to establish gateway connection: {}", why)
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting plant care bot...");

    let database = Database::new(&config.database_path).await?;
    let catalog = Arc::new(MetricCatalog::from_config(&config));

    let imported = database.import_legacy_plants(&catalog).await?;
    if imported > 0 {
        info!("🌱 Migrated {imported} plant(s) from the legacy plants table");
    }

    let tracker = CareTracker::new(Arc::new(database), catalog);

    match config.scheduler_mode {
        SchedulerMode::Once => run_reminders_once(&config, tracker).await,
        SchedulerMode::Continuous => run_bot(&config, tracker).await,
    }
}
