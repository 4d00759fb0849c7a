//! Member directory: display name ↔ Discord user id
//!
//! Loaded once from `members.json` (`{"<user id>": "First Last"}`). Names are
//! matched after trimming, collapsing inner whitespace and lower-casing.

use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::core::StartupDataError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberName {
    pub first: String,
    pub last: String,
}

impl MemberName {
    /// First whitespace-separated token is the first name, the rest is the last name
    pub fn parse(full: &str) -> Option<Self> {
        let mut tokens = full.split_whitespace();
        let first = tokens.next()?.to_string();
        let last = tokens.collect::<Vec<_>>().join(" ");
        Some(MemberName { first, last })
    }

    /// `First L.`, or just the first name when there is no last name
    pub fn short(&self) -> String {
        match self.last.chars().next() {
            Some(initial) => format!("{} {}.", self.first, initial),
            None => self.first.clone(),
        }
    }

    pub fn full(&self) -> String {
        if self.last.is_empty() {
            self.first.clone()
        } else {
            format!("{} {}", self.first, self.last)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    ids_by_name: HashMap<String, u64>,
    names_by_id: HashMap<u64, MemberName>,
}

impl MemberDirectory {
    /// Names and ids must both be unique; names are compared after normalization
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Result<Self, StartupDataError> {
        let mut directory = MemberDirectory::default();
        for (raw_id, full_name) in entries {
            let user_id: u64 = raw_id
                .trim()
                .parse()
                .map_err(|_| StartupDataError::InvalidMemberId(raw_id.clone()))?;
            let name =
                MemberName::parse(full_name).ok_or(StartupDataError::EmptyMemberName(user_id))?;
            let key = normalize(&name.full());
            if directory.names_by_id.insert(user_id, name).is_some() {
                return Err(StartupDataError::DuplicateMemberId(user_id));
            }
            if let Some(first) = directory.ids_by_name.insert(key.clone(), user_id) {
                return Err(StartupDataError::DuplicateMemberName {
                    name: key,
                    first,
                    second: user_id,
                });
            }
        }
        Ok(directory)
    }

    /// Missing file yields an empty directory; any birthdate entry will then fail to resolve
    pub fn load(path: &Path) -> Result<Self, StartupDataError> {
        if !path.exists() {
            warn!("Member directory {} not found, starting empty", path.display());
            return Ok(Self::default());
        }
        let entries = super::read_json_object(path)?;
        Self::from_entries(&entries)
    }

    pub fn resolve(&self, display_name: &str) -> Option<u64> {
        self.ids_by_name.get(&normalize(display_name)).copied()
    }

    pub fn name_of(&self, user_id: u64) -> Option<&MemberName> {
        self.names_by_id.get(&user_id)
    }

    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_id.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
