//! Group-to-manifest mapping table.
//!
//! A [`GroupTable`] tells the generator which manifest and catalog to assign
//! to the members of each identity group. Order matters: generators may
//! resolve a device in several groups with first-match-wins, so the table is
//! passed downstream exactly as it was declared.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CatalogName, GroupId, GroupTableError, GroupType, ManifestName};

/// One row of the group table.
///
/// Serialised with the generator's historical keys: `id`, `name`, `catalog`,
/// `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMapping {
    /// Identity group whose members receive this manifest.
    #[serde(rename = "id")]
    pub group_id: GroupId,

    /// Manifest assigned to the group's members.
    #[serde(rename = "name")]
    pub manifest_name: ManifestName,

    /// Catalog the manifest draws from.
    pub catalog: CatalogName,

    /// Generator-specific classification of the group.
    #[serde(rename = "type")]
    pub group_type: GroupType,
}

impl GroupMapping {
    /// Creates a mapping from its four parts.
    pub fn new(
        group_id: GroupId,
        manifest_name: ManifestName,
        catalog: CatalogName,
        group_type: GroupType,
    ) -> Self {
        Self {
            group_id,
            manifest_name,
            catalog,
            group_type,
        }
    }
}

/// Ordered, validated sequence of [`GroupMapping`]s.
///
/// Invariants: at least one entry; `group_id` values are unique.
/// Deserialisation runs the same validation as [`GroupTable::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GroupMapping>", into = "Vec<GroupMapping>")]
pub struct GroupTable(Vec<GroupMapping>);

impl GroupTable {
    /// Validates and wraps `entries`, preserving their order.
    pub fn new(entries: Vec<GroupMapping>) -> Result<Self, GroupTableError> {
        if entries.is_empty() {
            return Err(GroupTableError::Empty);
        }

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if let Some(first) = seen.insert(entry.group_id.as_str(), index) {
                return Err(GroupTableError::DuplicateGroupId {
                    group_id: entry.group_id.to_string(),
                    first,
                    second: index,
                });
            }
        }

        Ok(Self(entries))
    }

    /// The two-entry reference table shipped with the runbook template.
    ///
    /// Deployments replace it with their own table file; the placeholder ids
    /// do not match any real directory group.
    pub fn reference() -> Self {
        Self(
            (1..=2)
                .map(|n| GroupMapping {
                    group_id: GroupId::from_literal(format!("id_of_aad_group_{n}")),
                    manifest_name: ManifestName::from_literal(format!("name_of_manifest_{n}")),
                    catalog: CatalogName::from_literal(format!("catalog_name_{n}")),
                    group_type: GroupType::from_literal(format!("type_of_group_{n}")),
                })
                .collect(),
        )
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[GroupMapping] {
        &self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a table holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, GroupMapping> {
        self.0.iter()
    }
}

impl TryFrom<Vec<GroupMapping>> for GroupTable {
    type Error = GroupTableError;

    fn try_from(entries: Vec<GroupMapping>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<GroupTable> for Vec<GroupMapping> {
    fn from(table: GroupTable) -> Self {
        table.0
    }
}

impl<'a> IntoIterator for &'a GroupTable {
    type Item = &'a GroupMapping;
    type IntoIter = std::slice::Iter<'a, GroupMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
