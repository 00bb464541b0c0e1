//! Strongly typed identifiers.
//!
//! Newtype wrappers around `Uuid` that prevent accidental misuse of
//! different ID types at compile time.
//!
//! # Example
//!
//! ```
//! use riskgate_core::{UserId, FactorId};
//!
//! let user = UserId::new();
//! let factor = FactorId::new();
//!
//! fn requires_user(id: UserId) -> String {
//!     id.to_string()
//! }
//!
//! let _ = requires_user(user);
//! // requires_user(factor); // does not compile
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The underlying UUID parse error message.
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed ID type.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns a reference to the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Strongly typed identifier for user accounts.
    ///
    /// History rows and MFA factors are owned by a `UserId`; row-level
    /// security policies key on it.
    UserId
);

define_id!(
    /// Strongly typed identifier for enrolled second-factor credentials.
    FactorId
);

define_id!(
    /// Strongly typed identifier for MFA verification challenges.
    ChallengeId
);

define_id!(
    /// Strongly typed identifier for persisted risk assessments.
    AssessmentId
);

#[cfg(test)]
mod tests {
    use super::*;

    mod user_id_tests {
        use super::*;

        #[test]
        fn test_new_creates_valid_id() {
            let id = UserId::new();
            let id_str = id.to_string();
            // UUID format: 8-4-4-4-12 hex digits
            assert_eq!(id_str.len(), 36);
            assert!(id_str.contains('-'));
        }

        #[test]
        fn test_from_uuid_preserves_value() {
            let uuid = Uuid::new_v4();
            let id = UserId::from_uuid(uuid);
            assert_eq!(id.as_uuid(), &uuid);
        }

        #[test]
        fn test_display_returns_uuid_string() {
            let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
            let id = UserId::from_uuid(uuid);
            assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        }

        #[test]
        fn test_default_creates_new_id() {
            let id1 = UserId::default();
            let id2 = UserId::default();
            assert_ne!(id1, id2);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_user_id_serde_roundtrip() {
            let original = UserId::new();
            let json = serde_json::to_string(&original).unwrap();
            let deserialized: UserId = serde_json::from_str(&json).unwrap();
            assert_eq!(original, deserialized);
        }

        #[test]
        fn test_serializes_as_plain_string() {
            let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
            let id = FactorId::from_uuid(uuid);
            let json = serde_json::to_string(&id).unwrap();
            // Plain quoted string, not an object
            assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
        }
    }

    mod from_str_tests {
        use super::*;

        #[test]
        fn test_parse_valid_uuid() {
            let id: ChallengeId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
            assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        }

        #[test]
        fn test_parse_invalid_uuid_returns_error() {
            let result: std::result::Result<UserId, _> = "not-a-uuid".parse();
            assert!(result.is_err());
            let err = result.unwrap_err();
            assert_eq!(err.id_type, "UserId");
            assert!(!err.message.is_empty());
        }

        #[test]
        fn test_error_display() {
            let result: std::result::Result<AssessmentId, _> = "invalid".parse();
            let err = result.unwrap_err();
            let display = err.to_string();
            assert!(display.contains("AssessmentId"));
            assert!(display.contains("Failed to parse"));
        }
    }

    mod hash_eq_tests {
        use super::*;
        use std::collections::HashMap;

        #[test]
        fn test_same_uuid_is_equal() {
            let uuid = Uuid::new_v4();
            let id1 = UserId::from_uuid(uuid);
            let id2 = UserId::from_uuid(uuid);
            assert_eq!(id1, id2);
        }

        #[test]
        fn test_can_use_as_hashmap_key() {
            let mut map: HashMap<UserId, String> = HashMap::new();
            let id1 = UserId::new();
            let id2 = UserId::new();

            map.insert(id1, "alice".to_string());
            map.insert(id2, "bob".to_string());

            assert_eq!(map.get(&id1), Some(&"alice".to_string()));
            assert_eq!(map.get(&id2), Some(&"bob".to_string()));
        }

        #[test]
        fn test_copy_semantics() {
            let id1 = FactorId::new();
            let id2 = id1; // Copy
            assert_eq!(id1, id2);
        }
    }
}
