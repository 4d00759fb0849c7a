//! Birthdate registry
//!
//! Maps a member to the (month, day) of their birthday. Built once at startup
//! and never mutated; a reload replaces the whole registry.
//!
//! Feb 29 is kept as stored and only matches on leap years.

use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::directory::MemberDirectory;
use crate::core::StartupDataError;

/// Textual format of the birthdate source
pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecurringDate {
    month: u32,
    day: u32,
}

impl RecurringDate {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year so Feb 29 is accepted
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| RecurringDate { month, day })
    }

    /// Parse a `DD-MM-YYYY` date, dropping the year
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map(Self::from)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        self.month == date.month() && self.day == date.day()
    }
}

impl From<NaiveDate> for RecurringDate {
    fn from(date: NaiveDate) -> Self {
        RecurringDate {
            month: date.month(),
            day: date.day(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BirthdateRegistry {
    dates: HashMap<u64, RecurringDate>,
}

impl BirthdateRegistry {
    /// Build the registry from `name → DD-MM-YYYY` records.
    ///
    /// All or nothing: the first unresolvable name, malformed date or duplicate
    /// member fails the whole load.
    pub fn load<R>(raw: &BTreeMap<String, String>, resolver: R) -> Result<Self, StartupDataError>
    where
        R: Fn(&str) -> Option<u64>,
    {
        let mut dates = HashMap::with_capacity(raw.len());
        let mut owners: HashMap<u64, &str> = HashMap::with_capacity(raw.len());

        for (name, value) in raw {
            let user_id = resolver(name)
                .ok_or_else(|| StartupDataError::UnresolvedName { name: name.clone() })?;
            let date = RecurringDate::parse(value).map_err(|source| {
                StartupDataError::MalformedDate {
                    name: name.clone(),
                    value: value.clone(),
                    source,
                }
            })?;
            if let Some(first) = owners.insert(user_id, name.as_str()) {
                return Err(StartupDataError::DuplicateMember {
                    user_id,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
            dates.insert(user_id, date);
        }

        Ok(BirthdateRegistry { dates })
    }

    /// Load from a JSON file, resolving names through the member directory.
    /// A missing file yields an empty registry.
    pub fn load_file(path: &Path, directory: &MemberDirectory) -> Result<Self, StartupDataError> {
        if !path.exists() {
            warn!("Birthdate source {} not found, no birthdays will be announced", path.display());
            return Ok(Self::default());
        }
        let raw = super::read_json_object(path)?;
        let registry = Self::load(&raw, |name| directory.resolve(name))?;
        info!("🎂 Loaded {} birthdates from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn get(&self, user_id: u64) -> Option<RecurringDate> {
        self.dates.get(&user_id).copied()
    }

    /// False when the member has no recorded birthdate
    pub fn is_recurring_match(&self, user_id: u64, today: NaiveDate) -> bool {
        self.dates
            .get(&user_id)
            .is_some_and(|date| date.matches(today))
    }

    /// Every member whose birthday is `today`, in ascending id order
    pub fn matches_on(&self, today: NaiveDate) -> Vec<u64> {
        let mut matching: Vec<u64> = self
            .dates
            .iter()
            .filter(|(_, date)| date.matches(today))
            .map(|(user_id, _)| *user_id)
            .collect();
        matching.sort_unstable();
        matching
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
