//! Slash command dispatch
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use log::{debug, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;
use crate::features::care::CareTracker;

#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(tracker: CareTracker) -> Self {
        CommandHandler {
            context: Arc::new(CommandContext::new(tracker)),
            registry: CommandRegistry::with_handlers(create_all_handlers()),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let name = command.data.name.as_str();
        debug!(
            "Slash command /{name} from user {} in channel {}",
            command.user.id, command.channel_id
        );

        match self.registry.get(name) {
            Some(handler) => handler.handle(Arc::clone(&self.context), ctx, command).await,
            None => {
                warn!("No handler registered for /{name}");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::features::care::MetricCatalog;

    #[tokio::test]
    async fn test_command_handler_registers_all_commands() {
        let db = Database::new(":memory:").await.unwrap();
        let tracker = CareTracker::new(Arc::new(db), Arc::new(MetricCatalog::standard(7, 30, 86_400)));
        let handler = CommandHandler::new(tracker);

        for name in ["ping", "help", "uptime", "water", "fertilize", "interval", "fertilizer_interval", "status"] {
            assert!(handler.registry().contains(name), "missing /{name}");
        }
    }
}
