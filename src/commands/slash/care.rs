//! # Plant Care Commands
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_simple_command("water", "Log that you watered this plant"),
        create_simple_command("fertilize", "Log that you fertilized this plant"),
        create_interval_command(
            "interval",
            "Set watering interval in days",
            "Number of days between watering checks",
        ),
        create_interval_command(
            "fertilizer_interval",
            "Set fertilizer interval in days",
            "Number of days between fertilizer checks",
        ),
        create_simple_command("status", "Check plant watering and fertilizer status"),
    ]
}

fn create_simple_command(name: &str, description: &str) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name(name).description(description);
    command
}

fn create_interval_command(
    name: &str,
    description: &str,
    days_description: &str,
) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(name)
        .description(description)
        .create_option(|option| {
            option
                .name("days")
                .description(days_description)
                .kind(CommandOptionType::Integer)
                .required(true)
                .min_int_value(1)
        });
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_care_commands() {
        let commands = create_commands();
        let names: Vec<&str> = commands
            .iter()
            .map(|c| c.0.get("name").unwrap().as_str().unwrap())
            .collect();

        assert_eq!(
            names,
            vec!["water", "fertilize", "interval", "fertilizer_interval", "status"]
        );
    }

    #[test]
    fn test_interval_commands_require_days() {
        let commands = create_commands();
        let interval = &commands[2];
        let options = interval.0.get("options").unwrap().as_array().unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0]["name"], "days");
        assert_eq!(options[0]["required"], true);
        assert_eq!(options[0]["min_value"], 1);
        // Long intervals are validated by the tracker, not capped here
        assert!(options[0].get("max_value").is_none());

        let fertilizer = &commands[3];
        let options = fertilizer.0.get("options").unwrap().as_array().unwrap();
        assert!(options[0].get("max_value").is_none());
    }
}
