//! Newtype domain identifiers.
//!
//! Every string the dispatcher routes on is wrapped in a distinct newtype so a
//! [`GroupId`] can never be passed where a [`ManifestName`] is expected, even
//! though both are plain strings in the generator's JSON.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, and a
// TryFrom<String> used by serde so deserialised values obey the same rule.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            // Callers guarantee `value` is non-empty.
            #[allow(dead_code)]
            pub(crate) fn from_literal(value: String) -> Self {
                debug_assert!(!value.is_empty());
                Self(value)
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| {
                    format!("{} must not be empty", stringify!($name))
                })
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single dispatcher execution (one process, one decision, one
/// generator call).
///
/// Attached to every span and exported to the generator so its logs can be
/// correlated with ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispatchRunId(Uuid);

impl DispatchRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`DispatchRunId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for DispatchRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed (directory / catalog names)
// ---------------------------------------------------------------------------

string_id! {
    /// Object id of an identity (directory) group, e.g. an Entra ID group GUID.
    GroupId
}

string_id! {
    /// Name of the Munki manifest assigned to members of a group.
    ManifestName
}

string_id! {
    /// Name of the software catalog a manifest draws from.
    CatalogName
}

string_id! {
    /// Free-form group classification understood by the generator.
    GroupType
}

string_id! {
    /// Hardware serial number of a single managed device.
    ///
    /// Present only for webhook-triggered runs.
    SerialNumber
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id_rejects_empty() {
        assert!(SerialNumber::new("").is_none());
        assert_eq!(SerialNumber::new("C02XYZ").unwrap().as_str(), "C02XYZ");
    }

    #[test]
    fn test_string_id_deserialize_rejects_empty() {
        let err = serde_json::from_str::<GroupId>("\"\"").unwrap_err();
        assert!(err.to_string().contains("GroupId must not be empty"));

        let id: GroupId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(DispatchRunId::new_random(), DispatchRunId::new_random());
    }
}
