//! Reaction rules
//!
//! A rule pairs a trigger with a firing probability. Triggers look at the
//! lower-cased message text, except the identity ones which look at the author.

use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashMap;

use crate::core::ReactionMarker;
use crate::features::birthdays::BirthdateRegistry;

/// Flavor reactions only land one time out of 25
pub const FLAVOR_PROBABILITY: f64 = 1.0 / 25.0;

/// What a rule sees of one message
pub struct RuleInput<'a> {
    pub author_id: u64,
    pub lowered: &'a str,
    pub today: NaiveDate,
    pub registry: &'a BirthdateRegistry,
}

#[derive(Debug, Clone)]
pub enum Trigger {
    /// The author's birthday is today
    Birthday { marker: ReactionMarker },
    /// Any of the phrases appears in the text; all markers are added in order
    Phrase {
        phrases: Vec<String>,
        markers: Vec<ReactionMarker>,
    },
    /// The author has a flavor set; one candidate is drawn uniformly
    AuthorFlavor {
        table: HashMap<u64, Vec<ReactionMarker>>,
    },
}

#[derive(Debug, Clone)]
pub struct ReactionRule {
    name: &'static str,
    trigger: Trigger,
    probability: f64,
}

impl ReactionRule {
    pub fn new(name: &'static str, trigger: Trigger) -> Self {
        Self {
            name,
            trigger,
            probability: 1.0,
        }
    }

    pub fn birthday(marker: ReactionMarker) -> Self {
        Self::new("birthday", Trigger::Birthday { marker })
    }

    pub fn phrase(name: &'static str, phrases: &[&str], markers: Vec<ReactionMarker>) -> Self {
        Self::new(
            name,
            Trigger::Phrase {
                phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
                markers,
            },
        )
    }

    pub fn author_flavor(table: HashMap<u64, Vec<ReactionMarker>>) -> Self {
        Self::new("flavor", Trigger::AuthorFlavor { table }).with_probability(FLAVOR_PROBABILITY)
    }

    /// Clamped into (0, 1]
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability.clamp(f64::MIN_POSITIVE, 1.0);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Markers this rule adds for the message, empty when it does not fire
    pub fn evaluate<R: Rng + ?Sized>(&self, input: &RuleInput<'_>, rng: &mut R) -> Vec<ReactionMarker> {
        let candidates = match &self.trigger {
            Trigger::Birthday { marker } => {
                if input.registry.is_recurring_match(input.author_id, input.today) {
                    vec![marker.clone()]
                } else {
                    Vec::new()
                }
            }
            Trigger::Phrase { phrases, markers } => {
                if phrases.iter().any(|p| input.lowered.contains(p.as_str())) {
                    markers.clone()
                } else {
                    Vec::new()
                }
            }
            Trigger::AuthorFlavor { table } => table
                .get(&input.author_id)
                .and_then(|candidates| candidates.choose(rng))
                .cloned()
                .into_iter()
                .collect(),
        };

        if candidates.is_empty() || self.probability >= 1.0 || rng.random_bool(self.probability) {
            candidates
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn input<'a>(author_id: u64, lowered: &'a str, registry: &'a BirthdateRegistry) -> RuleInput<'a> {
        RuleInput {
            author_id,
            lowered,
            today: today(),
            registry,
        }
    }

    #[test]
    fn test_birthday_trigger() {
        let raw = BTreeMap::from([("7".to_string(), "14-10-2001".to_string())]);
        let registry = BirthdateRegistry::load(&raw, |n| n.parse().ok()).unwrap();
        let rule = ReactionRule::birthday(ReactionMarker::unicode("🎉"));
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            rule.evaluate(&input(7, "hello", &registry), &mut rng),
            vec![ReactionMarker::unicode("🎉")]
        );
        assert!(rule.evaluate(&input(8, "hello", &registry), &mut rng).is_empty());
    }

    #[test]
    fn test_phrases_are_lowercased_at_construction() {
        let registry = BirthdateRegistry::default();
        let rule = ReactionRule::phrase("shout", &["HeLLo"], vec![ReactionMarker::unicode("👋")]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(rule.evaluate(&input(1, "oh hello there", &registry), &mut rng).len(), 1);
    }

    #[test]
    fn test_flavor_picks_from_candidates() {
        let registry = BirthdateRegistry::default();
        let candidates = vec![ReactionMarker::unicode("🥕"), ReactionMarker::unicode("🐀")];
        let rule = ReactionRule::author_flavor(HashMap::from([(3, candidates.clone())]))
            .with_probability(1.0);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let fired = rule.evaluate(&input(3, "", &registry), &mut rng);
            assert_eq!(fired.len(), 1);
            assert!(candidates.contains(&fired[0]));
        }
        assert!(rule.evaluate(&input(4, "", &registry), &mut rng).is_empty());
    }

    #[test]
    fn test_flavor_fires_about_once_in_25() {
        let registry = BirthdateRegistry::default();
        let rule = ReactionRule::author_flavor(HashMap::from([(
            3,
            vec![ReactionMarker::unicode("🥕")],
        )]));
        assert_eq!(rule.probability(), FLAVOR_PROBABILITY);

        let seeds = 0..10u64;
        let runs = 2500;
        let total: usize = seeds
            .clone()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..runs)
                    .filter(|_| !rule.evaluate(&input(3, "", &registry), &mut rng).is_empty())
                    .count()
            })
            .sum();

        let mean_per_seed = total as f64 / seeds.count() as f64;
        let expected = runs as f64 / 25.0;
        assert!(
            (mean_per_seed - expected).abs() <= expected * 0.2,
            "flavor fired {mean_per_seed} times per {runs} runs, expected ~{expected}"
        );
    }

    #[test]
    fn test_probability_is_clamped() {
        let rule = ReactionRule::birthday(ReactionMarker::unicode("🎉"));
        assert_eq!(rule.clone().with_probability(3.0).probability(), 1.0);
        assert!(rule.with_probability(0.0).probability() > 0.0);
    }
}
