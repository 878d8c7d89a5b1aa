//! Unit spawn entries.

use serde::{Deserialize, Serialize};

use super::{EncounterObjectRef, ObjectGuid, TagSet};

/// Unit definition id of an entry whose unit is picked by tags at generation time.
pub const TAGGED_UNIT_DEF_ID: &str = "Tagged";

/// Kind of unit an entry spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitType {
    /// Battle mech.
    #[default]
    Mech,
    /// Ground vehicle.
    Vehicle,
    /// Static turret.
    Turret,
    /// Anything the pipeline does not need to distinguish.
    #[serde(other)]
    Other,
}

/// Spawn configuration for one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitSpawnPointOverride {
    /// Kind of unit.
    pub unit_type: UnitType,
    /// Unit definition id, or [`TAGGED_UNIT_DEF_ID`].
    pub unit_definition_id: String,
    /// Tags a generated unit must carry.
    pub unit_tag_set: TagSet,
    /// Tags a generated unit must not carry.
    pub unit_excluded_tag_set: TagSet,
    /// Pilot definition id.
    pub pilot_definition_id: String,
    /// Physical spawn point this unit is bound to.
    pub unit_spawn_point: EncounterObjectRef,
    /// Spawn point of the entry this one was cloned from, if autofilled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_origin: Option<ObjectGuid>,
    /// Difficulty tier the unit was generated at, if autofilled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_difficulty: Option<i32>,
}

impl UnitSpawnPointOverride {
    /// Create an entry for a concrete unit definition bound to a spawn point guid.
    #[must_use]
    pub fn new(unit_definition_id: impl Into<String>, spawn_point: impl Into<ObjectGuid>) -> Self {
        Self {
            unit_definition_id: unit_definition_id.into(),
            unit_spawn_point: EncounterObjectRef::new(spawn_point),
            ..Self::default()
        }
    }

    /// Whether this unit is selected by tags rather than a fixed definition.
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        self.unit_definition_id == TAGGED_UNIT_DEF_ID
    }

    /// Whether this entry spawns a turret.
    #[must_use]
    pub fn is_turret(&self) -> bool {
        self.unit_type == UnitType::Turret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_detection() {
        let tagged = UnitSpawnPointOverride::new(TAGGED_UNIT_DEF_ID, "u1");
        let fixed = UnitSpawnPointOverride::new("mechdef_atlas_AS7-D", "u2");
        assert!(tagged.is_tagged());
        assert!(!fixed.is_tagged());
    }

    #[test]
    fn test_generation_fields_omitted_until_set() {
        let unit = UnitSpawnPointOverride::new("mechdef_atlas_AS7-D", "u1");
        let json = serde_json::to_value(&unit).unwrap();
        assert!(json.get("templateOrigin").is_none());
        assert!(json.get("generatedDifficulty").is_none());
        assert_eq!(json["unitSpawnPoint"]["EncounterObjectGuid"], "u1");
    }
}
