//! Core identifier types with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated RUM session identifier (`session.id`).
    ///
    /// Every event of one user session carries the same value; it is the
    /// partition key of the grouping pass.
    SessionId, "session.id"
);

define_string_id!(
    /// A validated view identifier (`view.id`).
    ///
    /// All events tracked while a view instance is on screen reference the
    /// same ID, which makes it the identity key of a view visit.
    ViewId, "view.id"
);

define_string_id!(
    /// A validated resource identifier (`resource.id`).
    ///
    /// Must be unique across all resource events of a session.
    ResourceId, "resource.id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_rejects_empty() {
        assert!(SessionId::new("").is_err());
        assert!(SessionId::new("valid-session").is_ok());
    }

    #[test]
    fn view_id_rejects_empty() {
        let err = ViewId::new("").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "view.id" });
        assert_eq!(err.to_string(), "view.id cannot be empty");
    }

    #[test]
    fn resource_id_serde_roundtrip() {
        let id = ResourceId::new("res-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"res-123\"");
        let parsed: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn session_id_serde_rejects_empty() {
        let result: Result<SessionId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn ids_order_lexicographically() {
        let a = SessionId::new("a").unwrap();
        let b = SessionId::new("b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn view_id_as_ref() {
        let id = ViewId::new("view-1").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "view-1");
    }
}
