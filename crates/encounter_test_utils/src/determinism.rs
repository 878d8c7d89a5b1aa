//! Seeded build determinism.
//!
//! An encounter build draws all of its randomness from the injected RNG.
//! Given the same settings, contract, scene and seed, two builds must leave
//! byte-identical override data and scene state behind.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use encounter_core::config::Settings;
use encounter_core::contract::{CampaignContext, Contract};
use encounter_core::mission::{EncounterServices, MissionControl};
use encounter_core::overrides::ContractOverride;
use encounter_core::rules::EXTRA_LANCE_SPAWN_KEYS;
use encounter_core::scene::InMemoryScene;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::fixtures::StubUnitGenerator;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Seed every run used.
    pub seed: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic build).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the build was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Encounter build is non-deterministic!\n\
                 Runs: {}\n\
                 Seed: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.seed,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Compute a hash of any hashable value.
#[must_use]
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Run one seeded build and hash everything it produced.
///
/// The hash covers the mutated override data, the scene (spawn points,
/// chunks, lookup keys) and the published spawn key pairs.
#[must_use]
pub fn build_hash(
    settings: &Settings,
    authored: &ContractOverride,
    scene: &InMemoryScene,
    seed: u64,
) -> u64 {
    let mission_control = MissionControl::new(settings.clone());
    let mut contract = Contract::new("determinism", authored.clone());
    let mut scene = scene.clone();
    let campaign = CampaignContext::default();
    let mut generator = StubUnitGenerator::new();
    let mut rng = SmallRng::seed_from_u64(seed);

    let run = mission_control.build_encounter(
        &mut contract,
        &mut scene,
        EncounterServices {
            campaign: &campaign,
            unit_generator: &mut generator,
            rng: &mut rng,
        },
    );

    let snapshot = serde_json::json!({
        "contract": contract.override_data(),
        "scene": scene,
        "spawnKeys": run.state.get(&EXTRA_LANCE_SPAWN_KEYS),
    });
    compute_hash(&snapshot.to_string())
}

/// Run the same seeded build `runs` times and compare results.
///
/// # Example
///
/// ```ignore
/// use encounter_test_utils::determinism::verify_build_determinism;
/// use encounter_test_utils::fixtures::*;
///
/// let result = verify_build_determinism(
///     5,
///     42,
///     &locust_settings(),
///     &contract_with_lance("Locust", manual_lance("Alpha", 4)),
///     &scene_with_spawner(3),
/// );
/// result.assert_deterministic();
/// ```
#[must_use]
pub fn verify_build_determinism(
    runs: usize,
    seed: u64,
    settings: &Settings,
    authored: &ContractOverride,
    scene: &InMemoryScene,
) -> DeterminismResult {
    let hashes: Vec<u64> = (0..runs)
        .map(|_| build_hash(settings, authored, scene, seed))
        .collect();
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        seed,
    }
}
