//! Plant care command handlers
//!
//! Handles: water, fertilize, interval, fertilizer_interval, status
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::{error, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::{resolve_plant_thread, CommandContext};
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_integer_option;
use crate::core::CareError;
use crate::features::care::{execute_care_command, CareCommand, CommandReply};

/// Handler for the per-thread care commands
pub struct CareHandler;

#[async_trait]
impl SlashCommandHandler for CareHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["water", "fertilize", "interval", "fertilizer_interval", "status"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let reply = match self.run(&ctx, serenity_ctx, command).await {
            Ok(reply) => reply,
            Err(e) => {
                match &e {
                    CareError::StoreUnavailable(_) => {
                        error!("/{} failed: {e}", command.data.name)
                    }
                    _ => warn!("/{} rejected: {e}", command.data.name),
                }
                CommandReply::from_error(&e)
            }
        };

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.content(&reply.content).ephemeral(reply.ephemeral)
                    })
            })
            .await?;

        Ok(())
    }
}

impl CareHandler {
    async fn run(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<CommandReply, CareError> {
        let days = get_integer_option(&command.data.options, "days");
        let care_command = CareCommand::from_invocation(&command.data.name, days)?;

        let thread_id = resolve_plant_thread(serenity_ctx, command.channel_id).await?;

        let now = chrono::Utc::now().timestamp();
        execute_care_command(&ctx.tracker, thread_id, &care_command, now).await
    }
}
