//! # Feature: Contextual Reactions
//!
//! Every rule is checked against every message; several rules may fire on the
//! same message and each adds its own reactions. Reactions are only ever
//! added, never removed, and a failed reaction does not stop the others.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use chrono::NaiveDate;
use log::{debug, warn};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

use super::rules::{ReactionRule, RuleInput};
use crate::core::{IncomingMessage, Messenger, ReactionMarker};
use crate::features::birthdays::BirthdateRegistry;

pub const CELEBRATION_PHRASE: &str = "cqfd";
pub const CHALLENGE_PHRASES: &[&str] = &["tu veux te battre", "vous voulez vous battre"];
pub const CHALLENGE_MARKERS: &[&str] = &["⭕", "🇺", "🇮"];
pub const BIRTHDAY_MARKER: &str = "🎉";

/// Members who occasionally get their own reaction
pub const DEFAULT_FLAVORS: &[(u64, &[&str])] = &[
    (726867561924263946, &["🕳️"]),
    (1015216092920168478, &["🏳‍🌈"]),
    (433713351592247299, &["🩴"]),
    (199545535017779200, &["🪜"]),
    (823477539167141930, &["🥇"]),
    (533272313588613132, &["🥕"]),
    (777852203414454273, &["🐀"]),
];

pub fn default_flavors() -> HashMap<u64, Vec<ReactionMarker>> {
    DEFAULT_FLAVORS
        .iter()
        .map(|(user_id, emojis)| {
            (
                *user_id,
                emojis.iter().map(|e| ReactionMarker::unicode(*e)).collect(),
            )
        })
        .collect()
}

pub struct ReactionRuleSet {
    rules: Vec<ReactionRule>,
    registry: Arc<BirthdateRegistry>,
}

impl ReactionRuleSet {
    pub fn new(registry: Arc<BirthdateRegistry>) -> Self {
        Self {
            rules: Vec::new(),
            registry,
        }
    }

    /// Birthday, celebration phrase, challenge and per-member flavor rules
    pub fn standard(
        registry: Arc<BirthdateRegistry>,
        celebration: ReactionMarker,
        flavors: HashMap<u64, Vec<ReactionMarker>>,
    ) -> Self {
        let challenge = CHALLENGE_MARKERS
            .iter()
            .map(|e| ReactionMarker::unicode(*e))
            .collect();

        Self::new(registry)
            .with_rule(ReactionRule::birthday(ReactionMarker::unicode(BIRTHDAY_MARKER)))
            .with_rule(ReactionRule::phrase(
                "celebration",
                &[CELEBRATION_PHRASE],
                vec![celebration],
            ))
            .with_rule(ReactionRule::phrase("challenge", CHALLENGE_PHRASES, challenge))
            .with_rule(ReactionRule::author_flavor(flavors))
    }

    pub fn with_rule(mut self, rule: ReactionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ReactionRule] {
        &self.rules
    }

    /// Markers to add under `message`, in rule order
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        message: &IncomingMessage,
        today: NaiveDate,
        rng: &mut R,
    ) -> Vec<ReactionMarker> {
        let lowered = message.content.to_lowercase();
        let input = RuleInput {
            author_id: message.author_id,
            lowered: &lowered,
            today,
            registry: &self.registry,
        };

        self.rules
            .iter()
            .flat_map(|rule| {
                let fired = rule.evaluate(&input, &mut *rng);
                if !fired.is_empty() {
                    debug!(
                        "Rule '{}' fired on message {} ({} reactions)",
                        rule.name(),
                        message.id,
                        fired.len()
                    );
                }
                fired
            })
            .collect()
    }

    /// Evaluate and add the reactions, returning how many were applied
    pub async fn apply(
        &self,
        messenger: &dyn Messenger,
        message: &IncomingMessage,
        today: NaiveDate,
    ) -> usize {
        let markers = {
            let mut rng = rand::rng();
            self.evaluate(message, today, &mut rng)
        };

        let mut applied = 0;
        for marker in &markers {
            match messenger.add_reaction(message.message_ref(), marker).await {
                Ok(()) => applied += 1,
                Err(e) => warn!("Failed to react {marker} on message {}: {e}", message.id),
            }
        }
        applied
    }
}
