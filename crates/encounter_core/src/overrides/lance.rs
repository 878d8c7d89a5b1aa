//! Lance override entries.

use serde::{Deserialize, Serialize};

use super::{EncounterObjectRef, TagSet, UnitSpawnPointOverride};

/// Lance definition id of a lance whose units are authored inline.
pub const MANUAL_LANCE_DEF_ID: &str = "Manual";

/// Lance tag marking a lance of static turrets.
pub const TURRET_LANCE_TAG: &str = "lance_type_turret";

/// One deployable squad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanceOverride {
    /// Lance name, used in logs and generation requests.
    pub name: String,
    /// Lance definition id, or [`MANUAL_LANCE_DEF_ID`].
    pub lance_def_id: String,
    /// Difficulty offset applied when the lance is generated.
    pub lance_difficulty_adjustment: i32,
    /// Spawner this lance is placed by.
    pub lance_spawner: EncounterObjectRef,
    /// Lance tags.
    pub lance_tag_set: TagSet,
    /// Difficulty tier chosen for this lance.
    pub selected_lance_difficulty: i32,
    /// Units in authoring order.
    pub unit_spawn_point_override_list: Vec<UnitSpawnPointOverride>,
    /// Key of the lance configuration this override came from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lance_key: Option<String>,
    /// Whether this lance may be autofilled.
    pub support_autofill: bool,
    /// Faction difficulty modifier already folded into `lance_difficulty_adjustment`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_difficulty_mod: Option<i32>,
}

impl Default for LanceOverride {
    fn default() -> Self {
        Self {
            name: String::new(),
            lance_def_id: String::new(),
            lance_difficulty_adjustment: 0,
            lance_spawner: EncounterObjectRef::default(),
            lance_tag_set: TagSet::default(),
            selected_lance_difficulty: 0,
            unit_spawn_point_override_list: Vec::new(),
            lance_key: None,
            support_autofill: true,
            applied_difficulty_mod: None,
        }
    }
}

impl LanceOverride {
    /// Create an empty lance placed by the given spawner.
    #[must_use]
    pub fn new(name: impl Into<String>, lance_def_id: impl Into<String>, spawner: &str) -> Self {
        Self {
            name: name.into(),
            lance_def_id: lance_def_id.into(),
            lance_spawner: EncounterObjectRef::new(spawner),
            ..Self::default()
        }
    }

    /// Whether the units are authored inline.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.lance_def_id == MANUAL_LANCE_DEF_ID
    }

    /// Whether this lance is made of turrets.
    #[must_use]
    pub fn is_turret_lance(&self) -> bool {
        self.lance_tag_set.contains(TURRET_LANCE_TAG)
            || self
                .unit_spawn_point_override_list
                .iter()
                .any(UnitSpawnPointOverride::is_turret)
    }

    /// Number of unit entries.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.unit_spawn_point_override_list.len()
    }

    /// First unit entry chosen by tags, if any.
    #[must_use]
    pub fn tagged_member(&self) -> Option<&UnitSpawnPointOverride> {
        self.unit_spawn_point_override_list
            .iter()
            .find(|unit| unit.is_tagged())
    }

    /// Difficulty adjustment as authored, before any faction modifier.
    #[must_use]
    pub fn base_difficulty_adjustment(&self) -> i32 {
        self.lance_difficulty_adjustment - self.applied_difficulty_mod.unwrap_or(0)
    }
}
