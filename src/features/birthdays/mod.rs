//! # Birthdays Feature
//!
//! Birthdate registry, member directory, daily announcement job and the
//! reusable "Happy Birthday !" button.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod announcer;
pub mod directory;
pub mod registry;
pub mod schedule;
pub mod scheduler;

pub use announcer::{announcement_text, BirthdayAck, BirthdayAnnouncer, BIRTHDAY_ACK_PREFIX};
pub use directory::{MemberDirectory, MemberName};
pub use registry::{BirthdateRegistry, RecurringDate, DATE_FORMAT};
pub use schedule::DailySchedule;
pub use scheduler::{BirthdayScheduler, ScheduledJob};

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::core::StartupDataError;

/// Read a flat `{"key": "value"}` JSON file. A repeated key is a parse error.
fn read_json_object(path: &Path) -> Result<BTreeMap<String, String>, StartupDataError> {
    let content = std::fs::read_to_string(path).map_err(|source| StartupDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str::<UniqueEntries>(&content)
        .map(|entries| entries.0)
        .map_err(|source| StartupDataError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// String map that fails on duplicate keys instead of keeping the last one
struct UniqueEntries(BTreeMap<String, String>);

impl<'de> Deserialize<'de> for UniqueEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = UniqueEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of string values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = BTreeMap::new();
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    if entries.contains_key(&key) {
                        return Err(de::Error::custom(format!("duplicate key '{key}'")));
                    }
                    entries.insert(key, value);
                }
                Ok(UniqueEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
