//! # Reactions Feature
//!
//! Contextual emoji reactions under guild messages.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod rule_set;
pub mod rules;

pub use rule_set::{default_flavors, ReactionRuleSet, DEFAULT_FLAVORS};
pub use rules::{ReactionRule, RuleInput, Trigger, FLAVOR_PROBABILITY};
