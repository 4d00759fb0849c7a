//! Error taxonomy for the birthday and reaction engine
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Startup errors abort the bot. Dispatch errors are logged where they happen
//! and never retried.

use std::path::PathBuf;
use thiserror::Error;

/// Bad record in the birthdate or member sources. Always fatal at load.
#[derive(Debug, Error)]
pub enum StartupDataError {
    #[error("no member matches birthdate entry '{name}'")]
    UnresolvedName { name: String },

    #[error("birthdate '{value}' for '{name}' is not a DD-MM-YYYY date")]
    MalformedDate {
        name: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("birthdate entries '{first}' and '{second}' both resolve to member {user_id}")]
    DuplicateMember {
        user_id: u64,
        first: String,
        second: String,
    },

    #[error("member id '{0}' is not a valid Discord snowflake")]
    InvalidMemberId(String),

    #[error("member name for {0} is empty")]
    EmptyMemberName(u64),

    #[error("member {0} is listed twice")]
    DuplicateMemberId(u64),

    #[error("members {first} and {second} share the name '{name}'")]
    DuplicateMemberName { name: String, first: u64, second: u64 },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The broadcast channel could not be fetched at startup.
#[derive(Debug, Error)]
#[error("broadcast channel {channel_id} could not be resolved: {reason}")]
pub struct DestinationResolutionError {
    pub channel_id: u64,
    pub reason: String,
}

/// A single outbound action failed. Not retried.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Discord(#[from] serenity::Error),

    #[error("destination unavailable: {0}")]
    Unavailable(String),
}

/// A registry member has no display name in the member directory.
#[derive(Debug, Error)]
#[error("member {user_id} has a birthdate but no display name")]
pub struct LookupGap {
    pub user_id: u64,
}

#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error(transparent)]
    LookupGap(#[from] LookupGap),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
