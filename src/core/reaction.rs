//! Reaction markers: unicode emoji or guild custom emoji
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serenity::model::channel::ReactionType;
use serenity::model::id::EmojiId;
use std::fmt;

/// An emoji that can be added under a message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReactionMarker {
    Unicode(String),
    Custom { name: String, id: u64, animated: bool },
}

impl ReactionMarker {
    pub fn unicode(emoji: impl Into<String>) -> Self {
        ReactionMarker::Unicode(emoji.into())
    }

    /// Parse either a raw unicode emoji or Discord's `<:name:id>` / `<a:name:id>` syntax
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let Some(inner) = input.strip_prefix('<').and_then(|s| s.strip_suffix('>')) else {
            return if input.contains(['<', '>', ':']) {
                None
            } else {
                Some(ReactionMarker::unicode(input))
            };
        };

        let parts: Vec<&str> = inner.split(':').collect();
        let [flag, name, id] = parts.as_slice() else {
            return None;
        };
        let animated = match *flag {
            "" => false,
            "a" => true,
            _ => return None,
        };
        if name.is_empty() {
            return None;
        }

        Some(ReactionMarker::Custom {
            name: name.to_string(),
            id: id.parse().ok()?,
            animated,
        })
    }

    pub fn to_reaction_type(&self) -> ReactionType {
        match self {
            ReactionMarker::Unicode(emoji) => ReactionType::Unicode(emoji.clone()),
            ReactionMarker::Custom { name, id, animated } => ReactionType::Custom {
                animated: *animated,
                id: EmojiId(*id),
                name: Some(name.clone()),
            },
        }
    }
}

impl fmt::Display for ReactionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionMarker::Unicode(emoji) => f.write_str(emoji),
            ReactionMarker::Custom { name, id, animated } => {
                let flag = if *animated { "a" } else { "" };
                write!(f, "<{flag}:{name}:{id}>")
            }
        }
    }
}
