//! Extended lances: faction lance sizes, autofill and extra spawn points.
//!
//! For every lance of the target and employer teams this step applies the
//! faction difficulty modifier, fills under-populated lances up to the
//! faction lance size, and creates spawn points for units that have none.
//! Bad lance data only ever skips that lance.

use std::sync::Arc;

use rand::RngCore;
use serde::Serialize;

use super::{LogicStep, RunPayload};
use crate::autofill::{AutofillGenerator, UnitGenerator};
use crate::config::Settings;
use crate::contract::CampaignContext;
use crate::error::Result;
use crate::lance_size::LanceSizeResolver;
use crate::logic_state::{LogicState, StateKey};
use crate::overrides::{LanceOverride, ObjectGuid, TeamOverride};
use crate::scene::{LanceSpawnerInfo, SceneRegistry};
use crate::spawn_placer::SpawnPointPlacer;

/// Spawn points created this run, paired with their orientation anchor.
pub const EXTRA_LANCE_SPAWN_KEYS: StateKey<Vec<SpawnKeyPair>> =
    StateKey::new("ExtraLanceSpawnKeys");

/// Lookup keys of a created spawn point and the existing point it should face like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnKeyPair {
    /// `"{spawner}.UnitSpawnPoint{n}"` of the created point.
    pub spawn_key: String,
    /// `"{spawner}.{first existing point}"`.
    pub orientation_key: String,
}

/// What happened to one lance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanceOutcome {
    /// Turret lances are left alone.
    SkippedTurret,
    /// Manual lance with no units; a contract authoring defect.
    SkippedManualEmpty,
    /// Spawner guid did not resolve; spawn points were not touched.
    SpawnerMissing,
    /// Lance was processed.
    Processed {
        /// Units appended by autofill.
        autofilled: usize,
        /// Spawn points created for this lance.
        spawn_keys: Vec<SpawnKeyPair>,
    },
}

/// Services borrowed from the run payload for one team pass.
struct LanceServices<'s> {
    campaign: &'s CampaignContext,
    generator: &'s mut dyn UnitGenerator,
    rng: &'s mut dyn RngCore,
}

/// Pipeline step bringing lances up to their faction size.
#[derive(Debug, Clone)]
pub struct AddExtraLanceSpawnPoints {
    settings: Arc<Settings>,
}

impl AddExtraLanceSpawnPoints {
    /// Create the step.
    #[must_use]
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    fn resolver(&self) -> LanceSizeResolver<'_> {
        LanceSizeResolver::new(&self.settings.extended_lances)
    }

    /// Fold the faction difficulty modifier into the lance.
    ///
    /// The modifier is applied on top of the authored adjustment, so running
    /// this again with the same settings changes nothing. Returns the
    /// `(previous, updated)` adjustment when it changed.
    pub fn apply_difficulty_mod(&self, faction: &str, lance: &mut LanceOverride) -> Option<(i32, i32)> {
        let base = lance.base_difficulty_adjustment();
        let updated = self.resolver().resolve_difficulty_adjustment(faction, base);
        let previous = lance.lance_difficulty_adjustment;
        if updated == previous {
            return None;
        }

        tracing::info!(
            faction,
            lance = %lance.name,
            "Changing lance adjusted difficulty from '{previous}' to '{updated}'"
        );
        lance.lance_difficulty_adjustment = updated;
        lance.applied_difficulty_mod = Some(updated - base);
        Some((previous, updated))
    }

    fn augment_team(
        &self,
        team: &mut TeamOverride,
        scene: &mut dyn SceneRegistry,
        services: &mut LanceServices<'_>,
    ) -> Vec<SpawnKeyPair> {
        let mut spawners = scene.lance_spawners();
        let mut spawn_keys = Vec::new();

        for lance in &mut team.lance_override_list {
            let outcome = self.augment_lance(&team.faction, lance, &spawners, scene, services);
            if let LanceOutcome::Processed { spawn_keys: keys, .. } = outcome {
                // Later lances on the same spawner must see the points just created.
                if !keys.is_empty() {
                    spawners = scene.lance_spawners();
                }
                spawn_keys.extend(keys);
            }
        }

        spawn_keys
    }

    fn augment_lance(
        &self,
        faction: &str,
        lance: &mut LanceOverride,
        spawners: &[LanceSpawnerInfo],
        scene: &mut dyn SceneRegistry,
        services: &mut LanceServices<'_>,
    ) -> LanceOutcome {
        if lance.is_turret_lance() {
            tracing::debug!(faction, lance = %lance.name, "Detected a turret lance, ignoring for extended lances");
            return LanceOutcome::SkippedTurret;
        }

        let unit_count = lance.unit_count();
        if lance.is_manual() && unit_count == 0 {
            tracing::warn!(
                faction,
                lance = %lance.name,
                "Lance is set to manual but no units were specified. Fix the contract json! Ignoring for extended lances"
            );
            return LanceOutcome::SkippedManualEmpty;
        }

        self.apply_difficulty_mod(faction, lance);

        let target = self.resolver().resolve_target_size(faction);
        let autofilled = if unit_count > 0 && unit_count < target {
            self.autofill(faction, lance, target, services)
        } else {
            0
        };

        let Some(spawner) = LanceSpawnerInfo::find(spawners, &lance.lance_spawner.guid) else {
            tracing::warn!(
                faction,
                spawner = %lance.lance_spawner.guid,
                "Spawner not found. This is probably data from a restarted contract that hasn't been cleared up; it can be safely ignored"
            );
            return LanceOutcome::SpawnerMissing;
        };

        let spawn_keys = self.create_spawn_points(faction, lance, spawner, scene, services);
        LanceOutcome::Processed {
            autofilled,
            spawn_keys,
        }
    }

    fn autofill(
        &self,
        faction: &str,
        lance: &mut LanceOverride,
        target: usize,
        services: &mut LanceServices<'_>,
    ) -> usize {
        if !self.settings.extended_lances.autofill {
            tracing::debug!(
                faction,
                lance = %lance.name,
                "Lance has fewer units than the faction requires. Allowing as a valid setup as 'Autofill' is false"
            );
            return 0;
        }

        if !lance.support_autofill {
            tracing::debug!(
                faction,
                lance = %lance.name,
                key = lance.lance_key.as_deref().unwrap_or_default(),
                "Lance has autofill explicitly turned off"
            );
            return 0;
        }

        tracing::debug!(
            faction,
            lance = %lance.name,
            "Lance has fewer units than the faction requires. Autofilling {} units",
            target - lance.unit_count()
        );

        let before = lance.unit_count();
        let result = AutofillGenerator::new(services.campaign).fill(
            lance,
            target,
            &mut *services.generator,
            &mut *services.rng,
        );
        if let Err(e) = result {
            tracing::warn!(faction, lance = %lance.name, "Autofill stopped early: {e}");
        }
        lance.unit_count() - before
    }

    fn create_spawn_points(
        &self,
        faction: &str,
        lance: &mut LanceOverride,
        spawner: &LanceSpawnerInfo,
        scene: &mut dyn SceneRegistry,
        services: &mut LanceServices<'_>,
    ) -> Vec<SpawnKeyPair> {
        let existing = spawner.unit_spawn_points.len();
        let required = lance.unit_count();
        if required <= existing {
            return Vec::new();
        }

        tracing::info!(
            faction,
            lance = %lance.name,
            "Lance has more units ({required}) than spawn points ({existing}). Creating new lance spawns to accommodate"
        );

        let pending: Vec<ObjectGuid> = lance.unit_spawn_point_override_list[existing..]
            .iter_mut()
            .map(|unit| {
                if unit.unit_spawn_point.guid.is_empty() {
                    unit.unit_spawn_point.guid = ObjectGuid::random(&mut *services.rng);
                }
                unit.unit_spawn_point.guid.clone()
            })
            .collect();

        let placer = SpawnPointPlacer::new(&self.settings.spawn_placement);
        match placer.fill_spawner(scene, spawner, &pending, &mut *services.rng) {
            Ok(Some(fill)) => {
                for key in &fill.created_keys {
                    tracing::info!(faction, lance = %lance.name, "Created lance spawn point '{key}'");
                }
                fill.created_keys
                    .into_iter()
                    .map(|spawn_key| SpawnKeyPair {
                        spawn_key,
                        orientation_key: fill.orientation_key.clone(),
                    })
                    .collect()
            }
            Ok(None) => {
                tracing::warn!(
                    faction,
                    spawner = %spawner.name,
                    "Spawner has no unit spawn points to place new ones around"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(faction, spawner = %spawner.name, "Failed to create spawn points: {e}");
                Vec::new()
            }
        }
    }
}

impl LogicStep for AddExtraLanceSpawnPoints {
    fn name(&self) -> &str {
        "AddExtraLanceSpawnPoints"
    }

    fn run(
        &mut self,
        state: &mut LogicState,
        scene: &mut dyn SceneRegistry,
        payload: &mut RunPayload<'_>,
    ) -> Result<()> {
        tracing::info!("Adding lance spawn points to match contract override data");

        let mut services = LanceServices {
            campaign: payload.campaign,
            generator: &mut *payload.unit_generator,
            rng: &mut *payload.rng,
        };

        let mut spawn_keys = Vec::new();
        for team in payload.contract_override.teams_mut() {
            spawn_keys.extend(self.augment_team(team, scene, &mut services));
        }

        state.set(&EXTRA_LANCE_SPAWN_KEYS, spawn_keys)
    }
}
