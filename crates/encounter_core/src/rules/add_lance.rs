//! Extra opposing lance built from the target team's first lance.

use super::{LogicStep, RunPayload};
use crate::error::{EncounterError, Result};
use crate::logic_state::LogicState;
use crate::overrides::{EncounterObjectRef, ObjectGuid};
use crate::scene::SceneRegistry;

/// Description of an additional lance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalLance {
    /// Name of the new lance.
    pub name: String,
    /// Spawner the new lance is placed by.
    pub lance_spawner_guid: ObjectGuid,
    /// Spawn point guids bound to the copied units, in unit order.
    pub unit_spawn_guids: Vec<ObjectGuid>,
}

impl AdditionalLance {
    /// Describe a lance placed by `spawner` with one spawn guid per unit.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        spawner: impl Into<ObjectGuid>,
        unit_spawn_guids: impl IntoIterator<Item = ObjectGuid>,
    ) -> Self {
        Self {
            name: name.into(),
            lance_spawner_guid: spawner.into(),
            unit_spawn_guids: unit_spawn_guids.into_iter().collect(),
        }
    }
}

/// Adds a copy of the target team's first lance, rebound to new scene objects.
#[derive(Debug, Clone)]
pub struct AddLanceToTargetTeam {
    lance: AdditionalLance,
}

impl AddLanceToTargetTeam {
    /// Create the step.
    #[must_use]
    pub fn new(lance: AdditionalLance) -> Self {
        Self { lance }
    }
}

impl LogicStep for AddLanceToTargetTeam {
    fn name(&self) -> &str {
        "AddLanceToTargetTeam"
    }

    fn run(
        &mut self,
        _state: &mut LogicState,
        scene: &mut dyn SceneRegistry,
        payload: &mut RunPayload<'_>,
    ) -> Result<()> {
        let team = &mut payload.contract_override.target_team;
        tracing::info!(lance = %self.lance.name, "Adding lance to target team");

        let Some(template) = team.lance_override_list.first() else {
            return Err(EncounterError::MissingTemplateLance(team.faction.clone()));
        };

        let mut lance = template.clone();
        lance.name.clone_from(&self.lance.name);
        lance.lance_spawner = EncounterObjectRef::new(self.lance.lance_spawner_guid.clone());
        // The copy starts from authored difficulty; extended lances re-apply the faction modifier.
        lance.lance_difficulty_adjustment = lance.base_difficulty_adjustment();
        lance.applied_difficulty_mod = None;

        if lance.unit_count() != self.lance.unit_spawn_guids.len() {
            tracing::warn!(
                lance = %self.lance.name,
                "Lance has {} units but {} spawn guids were given; only matching pairs are rebound",
                lance.unit_count(),
                self.lance.unit_spawn_guids.len()
            );
        }
        for (unit, guid) in lance
            .unit_spawn_point_override_list
            .iter_mut()
            .zip(&self.lance.unit_spawn_guids)
        {
            unit.unit_spawn_point = EncounterObjectRef::new(guid.clone());
        }

        if scene.resolve(&self.lance.lance_spawner_guid).is_none() {
            tracing::warn!(
                spawner = %self.lance.lance_spawner_guid,
                "Spawner for the added lance does not exist in the scene yet"
            );
        }

        team.lance_override_list.push(lance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofill::{GeneratedUnit, UnitGenerationRequest, UnitGenerator};
    use crate::contract::CampaignContext;
    use crate::overrides::{ContractOverride, LanceOverride, UnitSpawnPointOverride};
    use crate::scene::InMemoryScene;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Unused;

    impl UnitGenerator for Unused {
        fn generate(&mut self, request: &UnitGenerationRequest<'_>) -> Result<GeneratedUnit> {
            Ok(GeneratedUnit {
                unit_definition_id: request.unit.unit_definition_id.clone(),
                pilot_definition_id: None,
            })
        }
    }

    fn run_step(step: &mut AddLanceToTargetTeam, contract: &mut ContractOverride) -> Result<()> {
        let campaign = CampaignContext::default();
        let mut generator = Unused;
        let mut rng = SmallRng::seed_from_u64(0);
        let mut scene = InMemoryScene::new();
        let mut state = LogicState::new();
        let mut payload = RunPayload {
            contract_override: contract,
            campaign: &campaign,
            unit_generator: &mut generator,
            rng: &mut rng,
        };
        step.run(&mut state, &mut scene, &mut payload)
    }

    fn additional(guids: &[&str]) -> AdditionalLance {
        AdditionalLance::new(
            "Lance_Enemy_OpposingForce_CWolf",
            "spawner-wolf",
            guids.iter().copied().map(ObjectGuid::from),
        )
    }

    #[test]
    fn test_copies_first_lance() {
        let mut contract = ContractOverride::default();
        let mut first = LanceOverride::new("Alpha", "Manual", "spawner-1");
        first.lance_difficulty_adjustment = 2;
        for guid in ["u1", "u2"] {
            first
                .unit_spawn_point_override_list
                .push(UnitSpawnPointOverride::new("mechdef_locust", guid));
        }
        contract.target_team.lance_override_list.push(first.clone());

        let mut step = AddLanceToTargetTeam::new(additional(&["w1", "w2"]));
        run_step(&mut step, &mut contract).unwrap();

        let lances = &contract.target_team.lance_override_list;
        assert_eq!(lances.len(), 2);
        assert_eq!(lances[0], first);
        let added = &lances[1];
        assert_eq!(added.name, "Lance_Enemy_OpposingForce_CWolf");
        assert_eq!(added.lance_spawner.guid.as_str(), "spawner-wolf");
        assert_eq!(added.lance_difficulty_adjustment, 2);
        assert_eq!(added.unit_spawn_point_override_list[0].unit_spawn_point.guid.as_str(), "w1");
        assert_eq!(added.unit_spawn_point_override_list[1].unit_spawn_point.guid.as_str(), "w2");
    }

    #[test]
    fn test_copy_drops_applied_faction_mod() {
        let mut contract = ContractOverride::default();
        let mut first = LanceOverride::new("Alpha", "Manual", "spawner-1");
        first.lance_difficulty_adjustment = 3;
        first.applied_difficulty_mod = Some(2);
        contract.target_team.lance_override_list.push(first);

        let mut step = AddLanceToTargetTeam::new(additional(&[]));
        run_step(&mut step, &mut contract).unwrap();

        let added = &contract.target_team.lance_override_list[1];
        assert_eq!(added.lance_difficulty_adjustment, 1);
        assert_eq!(added.applied_difficulty_mod, None);
    }

    #[test]
    fn test_fewer_guids_than_units() {
        let mut contract = ContractOverride::default();
        let mut first = LanceOverride::new("Alpha", "Manual", "spawner-1");
        for guid in ["u1", "u2"] {
            first
                .unit_spawn_point_override_list
                .push(UnitSpawnPointOverride::new("mechdef_locust", guid));
        }
        contract.target_team.lance_override_list.push(first);

        let mut step = AddLanceToTargetTeam::new(additional(&["w1"]));
        run_step(&mut step, &mut contract).unwrap();

        let added = &contract.target_team.lance_override_list[1];
        assert_eq!(added.unit_spawn_point_override_list[0].unit_spawn_point.guid.as_str(), "w1");
        assert_eq!(added.unit_spawn_point_override_list[1].unit_spawn_point.guid.as_str(), "u2");
    }

    #[test]
    fn test_no_lance_to_copy() {
        let mut contract = ContractOverride::default();
        contract.target_team.faction = "Locust".to_string();

        let mut step = AddLanceToTargetTeam::new(additional(&[]));
        let err = run_step(&mut step, &mut contract).unwrap_err();
        assert!(matches!(err, EncounterError::MissingTemplateLance(faction) if faction == "Locust"));
        assert!(contract.target_team.lance_override_list.is_empty());
    }
}
