//! # Ratio Command
//!
//! Reply "RATIO!" to a member's latest message in the channel.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_ratio_command()]
}

fn create_ratio_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("ratio")
        .description("Ratio the last message of a member in this channel")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("user")
                .description("The member to ratio")
                .kind(CommandOptionType::User)
                .required(true)
        });
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ratio_command() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let ratio = &commands[0];
        assert_eq!(ratio.0.get("name").unwrap().as_str().unwrap(), "ratio");

        let options = ratio.0.get("options").unwrap().as_array().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0]["name"].as_str(), Some("user"));
        assert_eq!(options[0]["required"].as_bool(), Some(true));
    }
}
