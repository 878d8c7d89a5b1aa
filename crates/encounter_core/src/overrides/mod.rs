//! Contract override data: teams, lances and unit spawn entries.
//!
//! This is the durable, authored half of an encounter. It never holds live
//! scene objects, only [`EncounterObjectRef`] guids that the scene registry
//! resolves on demand. Override data survives a contract restart; scene
//! objects are rebuilt for every encounter.
//!
//! Field names follow the contract JSON (`camelCase`). Everything is
//! optional on input so that partially authored contracts still load.

mod lance;
mod unit;

use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EncounterError, Result};

pub use lance::{LanceOverride, MANUAL_LANCE_DEF_ID, TURRET_LANCE_TAG};
pub use unit::{UnitSpawnPointOverride, UnitType, TAGGED_UNIT_DEF_ID};

/// Guid of an encounter object in the scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectGuid(String);

impl ObjectGuid {
    /// Wrap an existing guid string.
    #[must_use]
    pub fn new(guid: impl Into<String>) -> Self {
        Self(guid.into())
    }

    /// Generate a fresh v4 guid from the given random source.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bytes: [u8; 16] = rng.gen();
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
    }

    /// Borrow the guid string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the guid is unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ObjectGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectGuid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Weak reference to a scene object, stored in override data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterObjectRef {
    /// Guid of the referenced object.
    #[serde(rename = "EncounterObjectGuid", default)]
    pub guid: ObjectGuid,
}

impl EncounterObjectRef {
    /// Reference the object with the given guid.
    #[must_use]
    pub fn new(guid: impl Into<ObjectGuid>) -> Self {
        Self { guid: guid.into() }
    }
}

impl From<String> for ObjectGuid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ordered set of string tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSet {
    #[serde(default)]
    items: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    tag_set_source_file: String,
}

impl TagSet {
    /// Create an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the set contains `tag`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.items.contains(tag)
    }

    /// Add a tag. Returns false if it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.items.insert(tag.into())
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
            tag_set_source_file: String::new(),
        }
    }
}

/// One side of the encounter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamOverride {
    /// Team guid.
    pub team_guid: ObjectGuid,
    /// Faction key, matched against lance-size buckets.
    pub faction: String,
    /// Lances in authoring order.
    pub lance_override_list: Vec<LanceOverride>,
}

impl TeamOverride {
    /// Create an empty team for a faction.
    #[must_use]
    pub fn new(faction: impl Into<String>) -> Self {
        Self {
            faction: faction.into(),
            ..Self::default()
        }
    }
}

/// Objective entry carried through for downstream materialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectiveOverride {
    /// Objective guid.
    pub guid: ObjectGuid,
    /// Player-facing title.
    pub title: String,
    /// Whether completing this objective is required.
    pub is_primary_objective: bool,
    /// Display priority.
    pub priority: i32,
}

/// Override data for one contract instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractOverride {
    /// Opposing side.
    pub target_team: TeamOverride,
    /// Player's employer.
    pub employer_team: TeamOverride,
    /// Contract objectives.
    pub objective_list: Vec<ObjectiveOverride>,
}

impl ContractOverride {
    /// Parse override data from contract JSON.
    pub fn from_json_str(json: &str, label: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| EncounterError::JsonParse {
            path: label.to_string(),
            source,
        })
    }

    /// Teams in processing order: target first, then employer.
    pub fn teams_mut(&mut self) -> [&mut TeamOverride; 2] {
        [&mut self.target_team, &mut self.employer_team]
    }

    /// Total number of lances across both teams.
    #[must_use]
    pub fn lance_count(&self) -> usize {
        self.target_team.lance_override_list.len() + self.employer_team.lance_override_list.len()
    }
}
