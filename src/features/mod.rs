//! # Features
//!
//! - `birthdays`: registry, daily announcement job, acknowledgment button
//! - `reactions`: contextual emoji under guild messages

pub mod birthdays;
pub mod reactions;

pub use birthdays::{
    BirthdateRegistry, BirthdayAck, BirthdayAnnouncer, BirthdayScheduler, DailySchedule,
    MemberDirectory, MemberName, RecurringDate, ScheduledJob,
};
pub use reactions::{default_flavors, ReactionRule, ReactionRuleSet};
