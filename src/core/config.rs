//! Environment configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{anyhow, Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use std::path::PathBuf;

use super::reaction::ReactionMarker;

pub const DEFAULT_BIRTHDATES_PATH: &str = "./data/birthdates.json";
pub const DEFAULT_MEMBERS_PATH: &str = "./data/members.json";
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";
pub const DEFAULT_ANNOUNCE_TIME: &str = "07:00";
pub const DEFAULT_CELEBRATION_EMOJI: &str = "<:prof:1015373456159805440>";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// The only guild the bot reacts in, also where slash commands are registered
    pub discord_guild_id: u64,
    pub birthday_channel_id: u64,
    pub birthdates_path: PathBuf,
    pub members_path: PathBuf,
    pub timezone: Tz,
    pub announce_time: NaiveTime,
    pub celebration_emoji: ReactionMarker,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup, so tests never touch the process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} environment variable is required"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let discord_token = required("DISCORD_TOKEN")?;
        let discord_guild_id = parse_snowflake("DISCORD_GUILD_ID", &required("DISCORD_GUILD_ID")?)?;
        let birthday_channel_id =
            parse_snowflake("BIRTHDAY_CHANNEL_ID", &required("BIRTHDAY_CHANNEL_ID")?)?;

        let timezone_name = or_default("BIRTHDAY_TIMEZONE", DEFAULT_TIMEZONE);
        let timezone: Tz = timezone_name
            .trim()
            .parse()
            .map_err(|e| anyhow!("BIRTHDAY_TIMEZONE '{timezone_name}' is not a known time zone: {e}"))?;

        let time_str = or_default("BIRTHDAY_ANNOUNCE_TIME", DEFAULT_ANNOUNCE_TIME);
        let announce_time = NaiveTime::parse_from_str(time_str.trim(), "%H:%M")
            .with_context(|| format!("BIRTHDAY_ANNOUNCE_TIME '{time_str}' must be HH:MM"))?;

        let emoji_str = or_default("CELEBRATION_EMOJI", DEFAULT_CELEBRATION_EMOJI);
        let celebration_emoji = ReactionMarker::parse(&emoji_str)
            .ok_or_else(|| anyhow!("CELEBRATION_EMOJI '{emoji_str}' is not an emoji"))?;

        Ok(Config {
            discord_token,
            discord_guild_id,
            birthday_channel_id,
            birthdates_path: PathBuf::from(or_default("BIRTHDATES_PATH", DEFAULT_BIRTHDATES_PATH)),
            members_path: PathBuf::from(or_default("MEMBERS_PATH", DEFAULT_MEMBERS_PATH)),
            timezone,
            announce_time,
            celebration_emoji,
            log_level: or_default("LOG_LEVEL", "info"),
        })
    }
}

fn parse_snowflake(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{key} '{value}' is not a valid Discord id"))
}
