//! Identity types for console entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Behaviour shared by every strongly-typed entity identifier.
///
/// Identifiers are opaque strings assigned by the remote authority. A blank
/// identifier stands for an entity that has not been persisted yet.
pub trait EntityIdType:
    Clone + fmt::Debug + fmt::Display + PartialEq + Eq + std::hash::Hash + Send + Sync + 'static
{
    /// Borrow the raw identifier.
    fn as_str(&self) -> &str;

    /// Build from a raw identifier.
    fn from_raw(raw: impl Into<String>) -> Self;

    /// True when no authoritative id has been assigned.
    fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// Wire form of an identifier. Some backends emit integer keys.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Integer(value) => value.to_string(),
        }
    }
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }
        }

        impl EntityIdType for $name {
            fn as_str(&self) -> &str {
                &self.0
            }

            fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a staff member.
    StaffId
);
define_entity_id!(
    /// Identifier of a chatbot.
    ChatbotId
);
define_entity_id!(
    /// Identifier of a knowledge namespace.
    NamespaceId
);
define_entity_id!(
    /// Identifier of a role.
    RoleId
);
define_entity_id!(
    /// Identifier of a person in the external member directory.
    MemberId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id_detection() {
        assert!(StaffId::new("").is_blank());
        assert!(StaffId::new("   ").is_blank());
        assert!(!StaffId::new("42").is_blank());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = NamespaceId::new("ns-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ns-1\"");
        let back: NamespaceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_integer_id_accepted() {
        let id: StaffId = serde_json::from_str("17").unwrap();
        assert_eq!(id.as_str(), "17");
    }

    #[test]
    fn test_display_matches_raw() {
        let id = MemberId::from("3");
        assert_eq!(id.to_string(), "3");
        assert_eq!(id.as_str(), "3");
    }
}
