//! Entry point for encounter builds.

use std::path::Path;
use std::sync::Arc;

use rand::RngCore;

use crate::autofill::UnitGenerator;
use crate::config::Settings;
use crate::contract::{CampaignContext, Contract};
use crate::rules::{AdditionalLance, EncounterRules, EngineRun, RunPayload};
use crate::scene::SceneRegistry;

/// Host services for one encounter build.
pub struct EncounterServices<'a> {
    /// Campaign state passed to unit generation.
    pub campaign: &'a CampaignContext,
    /// Unit-generation service.
    pub unit_generator: &'a mut dyn UnitGenerator,
    /// Randomness source.
    pub rng: &'a mut dyn RngCore,
}

/// Owns the settings and runs encounter builds.
///
/// Settings are fixed at construction and shared read-only with every step.
#[derive(Debug, Clone)]
pub struct MissionControl {
    settings: Arc<Settings>,
    additional_lances: Vec<AdditionalLance>,
}

impl MissionControl {
    /// Create with explicit settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            additional_lances: Vec::new(),
        }
    }

    /// Load settings from `path`, falling back to defaults on any failure.
    #[must_use]
    pub fn init<P: AsRef<Path>>(path: P) -> Self {
        let mission_control = Self::new(Settings::load_or_default(path));
        tracing::info!("Mission control initialised");
        mission_control
    }

    /// Active settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Add an extra target-team lance to every subsequent build.
    pub fn add_target_lance(&mut self, lance: AdditionalLance) {
        self.additional_lances.push(lance);
    }

    /// Rules for the current settings.
    #[must_use]
    pub fn rules(&self) -> EncounterRules {
        self.additional_lances
            .iter()
            .cloned()
            .fold(EncounterRules::new(Arc::clone(&self.settings)), |rules, lance| {
                rules.with_additional_lance(lance)
            })
    }

    /// Run one encounter build against the contract's current override data.
    pub fn build_encounter(
        &self,
        contract: &mut Contract,
        scene: &mut dyn SceneRegistry,
        services: EncounterServices<'_>,
    ) -> EngineRun {
        tracing::info!(contract = contract.name(), "Building encounter");

        let mut engine = self.rules().build();
        let mut payload = RunPayload {
            contract_override: contract.override_data_mut(),
            campaign: services.campaign,
            unit_generator: services.unit_generator,
            rng: services.rng,
        };
        let run = engine.run(scene, &mut payload);

        if !run.failures.is_empty() {
            tracing::warn!(
                contract = contract.name(),
                "Encounter built with {} failed step(s)",
                run.failures.len()
            );
        }
        run
    }
}

impl Default for MissionControl {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofill::{GeneratedUnit, UnitGenerationRequest};
    use crate::config::ExtendedLance;
    use crate::error::Result;
    use crate::overrides::{ContractOverride, LanceOverride, ObjectGuid, UnitSpawnPointOverride};
    use crate::rules::EXTRA_LANCE_SPAWN_KEYS;
    use crate::scene::InMemoryScene;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Echo;

    impl UnitGenerator for Echo {
        fn generate(&mut self, request: &UnitGenerationRequest<'_>) -> Result<GeneratedUnit> {
            Ok(GeneratedUnit {
                unit_definition_id: request.unit.unit_definition_id.clone(),
                pilot_definition_id: None,
            })
        }
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let mission_control = MissionControl::init("/nonexistent/settings.json");
        assert_eq!(mission_control.settings(), &Settings::default());
    }

    #[test]
    fn test_build_failure_is_contained() {
        let mut mission_control = MissionControl::default();
        mission_control.add_target_lance(AdditionalLance::new(
            "Lance_Enemy_OpposingForce_CWolf",
            "spawner-wolf",
            [ObjectGuid::new("w1")],
        ));

        let mut contract = Contract::new("empty", ContractOverride::default());
        let mut scene = InMemoryScene::new();
        let campaign = CampaignContext::default();
        let mut generator = Echo;
        let mut rng = SmallRng::seed_from_u64(11);

        let run = mission_control.build_encounter(
            &mut contract,
            &mut scene,
            EncounterServices {
                campaign: &campaign,
                unit_generator: &mut generator,
                rng: &mut rng,
            },
        );

        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].step, "AddLanceToTargetTeam");
        // Extended lances still ran and published its keys.
        assert_eq!(run.state.get(&EXTRA_LANCE_SPAWN_KEYS).map(Vec::len), Some(0));
    }

    #[test]
    fn test_rebuild_without_restart_applies_faction_mod_once() {
        let mut settings = Settings::default();
        settings
            .extended_lances
            .lance_sizes
            .insert(6, vec![ExtendedLance::new("Locust", 2)]);
        let mut mission_control = MissionControl::new(settings);
        mission_control.add_target_lance(AdditionalLance::new(
            "Lance_Enemy_OpposingForce_CWolf",
            "spawner-wolf",
            [ObjectGuid::new("w1")],
        ));

        let mut authored = ContractOverride::default();
        authored.target_team.faction = "Locust".to_string();
        let mut lance = LanceOverride::new("Alpha", "Manual", "spawner-1");
        lance
            .unit_spawn_point_override_list
            .push(UnitSpawnPointOverride::new("mechdef_locust", "u1"));
        authored.target_team.lance_override_list.push(lance);

        let mut contract = Contract::new("rebuild", authored);
        let mut scene = InMemoryScene::new();
        let campaign = CampaignContext::default();
        let mut generator = Echo;
        let mut rng = SmallRng::seed_from_u64(13);

        for _ in 0..2 {
            mission_control.build_encounter(
                &mut contract,
                &mut scene,
                EncounterServices {
                    campaign: &campaign,
                    unit_generator: &mut generator,
                    rng: &mut rng,
                },
            );
        }

        let adjustments: Vec<i32> = contract
            .override_data()
            .target_team
            .lance_override_list
            .iter()
            .map(|lance| lance.lance_difficulty_adjustment)
            .collect();
        assert_eq!(adjustments, vec![2, 2, 2]);
    }

    #[test]
    fn test_restart_discards_build() {
        let mut authored = ContractOverride::default();
        let mut lance = LanceOverride::new("Alpha", "Manual", "spawner-1");
        lance
            .unit_spawn_point_override_list
            .push(UnitSpawnPointOverride::new("mechdef_locust", "u1"));
        authored.target_team.lance_override_list.push(lance);

        let mission_control = MissionControl::default();
        let mut contract = Contract::new("restart", authored);
        let mut scene = InMemoryScene::new();
        let campaign = CampaignContext::default();
        let mut generator = Echo;
        let mut rng = SmallRng::seed_from_u64(12);

        mission_control.build_encounter(
            &mut contract,
            &mut scene,
            EncounterServices {
                campaign: &campaign,
                unit_generator: &mut generator,
                rng: &mut rng,
            },
        );
        assert!(contract.is_modified());
        assert_eq!(contract.override_data().target_team.lance_override_list[0].unit_count(), 4);

        contract.restart();
        assert!(!contract.is_modified());
    }
}
