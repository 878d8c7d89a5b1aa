//! Test fixtures and helpers.
//!
//! Pre-built settings, scenes and contracts for consistent testing.

use encounter_core::autofill::{GeneratedUnit, UnitGenerationRequest, UnitGenerator};
use encounter_core::config::{ExtendedLance, Settings};
use encounter_core::error::{EncounterError, Result};
use encounter_core::math::Vec3;
use encounter_core::overrides::{
    ContractOverride, LanceOverride, ObjectGuid, TeamOverride, UnitSpawnPointOverride,
    TAGGED_UNIT_DEF_ID,
};
use encounter_core::scene::{InMemoryScene, LanceSpawnerInfo, UnitSpawnPointInfo};

/// Guid of the spawner created by [`scene_with_spawner`].
pub const SPAWNER_GUID: &str = "spawner-opfor-1";

/// Name of the spawner created by [`scene_with_spawner`].
pub const SPAWNER_NAME: &str = "Lance_Enemy_OpposingForce";

/// Settings with one bucket: size 6 for `Locust`, difficulty +2.
#[must_use]
pub fn locust_settings() -> Settings {
    settings_with_bucket(6, "Locust", 2)
}

/// Default settings plus one lance-size bucket.
#[must_use]
pub fn settings_with_bucket(size: u32, faction: &str, difficulty_mod: i32) -> Settings {
    let mut settings = Settings::default();
    settings
        .extended_lances
        .lance_sizes
        .entry(size)
        .or_default()
        .push(ExtendedLance::new(faction, difficulty_mod));
    settings
}

/// Unit spawn point `UnitSpawnPoint{n}` with guid `{spawner}-p{n}`.
#[must_use]
pub fn spawn_point(spawner: &str, n: usize, position: Vec3) -> UnitSpawnPointInfo {
    UnitSpawnPointInfo {
        guid: ObjectGuid::new(format!("{spawner}-p{n}")),
        name: format!("UnitSpawnPoint{n}"),
        position,
    }
}

/// Spawner with `points` spawn points laid out 30 units apart along x.
#[must_use]
pub fn spawner(guid: &str, name: &str, origin: Vec3, points: usize) -> LanceSpawnerInfo {
    LanceSpawnerInfo {
        guid: ObjectGuid::new(guid),
        name: name.to_string(),
        position: origin,
        unit_spawn_points: (1..=points)
            .map(|n| {
                spawn_point(
                    guid,
                    n,
                    Vec3::new(origin.x + (n - 1) as f32 * 30.0, origin.y, origin.z),
                )
            })
            .collect(),
    }
}

/// Scene with a single opposing-force spawner holding `points` spawn points.
#[must_use]
pub fn scene_with_spawner(points: usize) -> InMemoryScene {
    let mut scene = InMemoryScene::new();
    scene.add_lance_spawner(spawner(SPAWNER_GUID, SPAWNER_NAME, Vec3::ZERO, points));
    scene
}

/// Manual lance on [`SPAWNER_GUID`] whose units bind to that spawner's points.
#[must_use]
pub fn manual_lance(name: &str, units: usize) -> LanceOverride {
    let mut lance = LanceOverride::new(name, "Manual", SPAWNER_GUID);
    lance.unit_spawn_point_override_list = (1..=units)
        .map(|n| UnitSpawnPointOverride::new("mechdef_locust_LCT-1V", format!("{SPAWNER_GUID}-p{n}")))
        .collect();
    lance
}

/// Same as [`manual_lance`] with the last unit marked as the tagged template.
#[must_use]
pub fn tagged_lance(name: &str, units: usize) -> LanceOverride {
    let mut lance = manual_lance(name, units);
    if let Some(last) = lance.unit_spawn_point_override_list.last_mut() {
        last.unit_definition_id = TAGGED_UNIT_DEF_ID.to_string();
    }
    lance
}

/// Contract with one target lance for `faction` and an empty employer team.
#[must_use]
pub fn contract_with_lance(faction: &str, lance: LanceOverride) -> ContractOverride {
    let mut target_team = TeamOverride::new(faction);
    target_team.lance_override_list.push(lance);
    ContractOverride {
        target_team,
        employer_team: TeamOverride::new("Player1sMercUnit"),
        objective_list: Vec::new(),
    }
}

/// Unit generator that names units after their lance slot.
///
/// Produces `"{prefix}_{lance}_{index}"`. Can be told to fail at one slot.
#[derive(Debug, Clone, Default)]
pub struct StubUnitGenerator {
    /// Prefix of generated definition ids.
    pub prefix: String,
    /// Slot index at which generation fails.
    pub fail_at: Option<usize>,
    /// Slot indices requested so far.
    pub requests: Vec<usize>,
}

impl StubUnitGenerator {
    /// Generator producing `mechdef_generated_*` ids.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: "mechdef_generated".to_string(),
            ..Self::default()
        }
    }

    /// Generator that fails at slot `index`.
    #[must_use]
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }
}

impl UnitGenerator for StubUnitGenerator {
    fn generate(&mut self, request: &UnitGenerationRequest<'_>) -> Result<GeneratedUnit> {
        if self.fail_at == Some(request.index) {
            return Err(EncounterError::UnitGeneration {
                lance: request.lance_name.to_string(),
                index: request.index,
                message: "stub failure".to_string(),
            });
        }
        self.requests.push(request.index);
        Ok(GeneratedUnit {
            unit_definition_id: format!("{}_{}_{}", self.prefix, request.lance_name, request.index),
            pilot_definition_id: Some(format!("pilot_{}", request.index)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_lance_binds_to_scene() {
        let scene = scene_with_spawner(3);
        let lance = manual_lance("Alpha", 3);
        let spawner = scene.spawner(&ObjectGuid::new(SPAWNER_GUID)).unwrap();
        for (unit, point) in lance.unit_spawn_point_override_list.iter().zip(&spawner.unit_spawn_points) {
            assert_eq!(unit.unit_spawn_point.guid, point.guid);
        }
    }

    #[test]
    fn test_tagged_lance() {
        let lance = tagged_lance("Alpha", 2);
        assert!(lance.tagged_member().is_some());
        assert!(tagged_lance("Empty", 0).tagged_member().is_none());
    }
}
