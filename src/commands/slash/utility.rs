//! # Utility Commands
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    [
        ("ping", "Test bot responsiveness"),
        ("help", "Show the plant care commands"),
        ("uptime", "Show how long the bot has been running"),
    ]
    .into_iter()
    .map(|(name, description)| {
        let mut command = CreateApplicationCommand::default();
        command.name(name).description(description);
        command
    })
    .collect()
}
