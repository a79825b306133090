//! Utility command handlers
//!
//! Handles: ping, help, uptime
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Help text lists the plant care commands
//! - 1.0.0: ping, help, uptime

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Duration;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::features::care::MetricCatalog;

/// Handler for utility commands: ping, help, uptime
pub struct UtilityHandler;

#[async_trait]
impl SlashCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["ping", "help", "uptime"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let response = match command.data.name.as_str() {
            "ping" => "Pong!".to_string(),
            "help" => help_text(ctx.tracker.catalog()),
            "uptime" => format_uptime(ctx.start_time.elapsed()),
            _ => return Ok(()),
        };

        command
            .create_interaction_response(&serenity_ctx.http, |r| {
                r.kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|m| m.content(response))
            })
            .await?;

        info!(
            "{} command completed for user {}",
            command.data.name, command.user.id
        );
        Ok(())
    }
}

fn help_text(catalog: &MetricCatalog) -> String {
    let mut text = String::from(
        "**Plant Care Commands** (use them inside a plant thread)\n\
        `/water` - Log that you watered this plant\n\
        `/fertilize` - Log that you fertilized this plant\n\
        `/interval <days>` - Set the watering interval\n\
        `/fertilizer_interval <days>` - Set the fertilizer interval\n\
        `/status` - Show watering and fertilizer status\n\n\
        **Defaults:**\n",
    );
    for def in catalog.iter() {
        text.push_str(&format!(
            "• {}: every {} days\n",
            def.interval_label, def.default_interval_days
        ));
    }
    text
}

fn format_uptime(uptime: Duration) -> String {
    let days = uptime.as_secs() / 86400;
    let hours = (uptime.as_secs() % 86400) / 3600;
    let minutes = (uptime.as_secs() % 3600) / 60;
    let seconds = uptime.as_secs() % 60;

    if days > 0 {
        format!("⏱️ Uptime: {days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("⏱️ Uptime: {hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("⏱️ Uptime: {minutes}m {seconds}s")
    } else {
        format!("⏱️ Uptime: {seconds}s")
    }
}
