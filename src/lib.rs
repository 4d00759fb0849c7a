// Core layer - configuration, errors, messaging seam
pub mod core;

// Features layer - birthdays and reactions
pub mod features;

// UI components
pub mod message_components;

// Application layer
pub mod command_handler;
pub mod commands;

#[cfg(test)]
pub(crate) mod testing;

pub use core::Config;

pub use features::{
    // Birthdays
    BirthdateRegistry, BirthdayAck, BirthdayAnnouncer, BirthdayScheduler, DailySchedule,
    MemberDirectory, ScheduledJob,
    // Reactions
    ReactionRuleSet,
};
