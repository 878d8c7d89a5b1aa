//! Offline encounter builds.
//!
//! Runs the same pipeline the game runs, against JSON contract and scene
//! files, with a placeholder unit generator standing in for the game's
//! unit database.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use encounter_core::autofill::{GeneratedUnit, UnitGenerationRequest, UnitGenerator};
use encounter_core::contract::{CampaignContext, Contract};
use encounter_core::error::EncounterError;
use encounter_core::mission::{EncounterServices, MissionControl};
use encounter_core::overrides::{ContractOverride, ObjectGuid, TagSet};
use encounter_core::rules::{SpawnKeyPair, EXTRA_LANCE_SPAWN_KEYS};
use encounter_core::scene::InMemoryScene;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::{Result, ToolError};

/// Inputs of one offline build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Settings file; missing or broken files fall back to defaults.
    pub settings: PathBuf,
    /// Contract override JSON.
    pub contract: PathBuf,
    /// Scene JSON.
    pub scene: PathBuf,
    /// RNG seed; a random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Simulated date, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Everything one build produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    /// Seed the build ran with.
    pub seed: u64,
    /// Override data after the build.
    pub contract_override: ContractOverride,
    /// Created spawn points and their orientation anchors.
    pub spawn_keys: Vec<SpawnKeyPair>,
    /// Scene lookup keys registered by the build.
    pub object_lookup: BTreeMap<String, ObjectGuid>,
    /// Steps that failed, as `"step: error"`.
    pub failures: Vec<String>,
}

/// Stand-in for the game's unit database.
///
/// Keeps the template's definition, except for `Tagged` templates which
/// become a difficulty-named placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderUnitGenerator;

impl UnitGenerator for PlaceholderUnitGenerator {
    fn generate(
        &mut self,
        request: &UnitGenerationRequest<'_>,
    ) -> encounter_core::error::Result<GeneratedUnit> {
        let unit_definition_id = if request.unit.is_tagged() {
            format!("mechdef_placeholder_d{}", request.difficulty)
        } else {
            request.unit.unit_definition_id.clone()
        };
        Ok(GeneratedUnit {
            unit_definition_id,
            pilot_definition_id: None,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        ToolError::Encounter(EncounterError::Io {
            path: path.display().to_string(),
            source,
        })
    })
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ToolError::InvalidDate(date.to_string())),
        None => Ok(CampaignContext::default().sim_date),
    }
}

/// Run one build and collect its results.
///
/// # Errors
///
/// Returns an error if the contract or scene cannot be read or parsed, or
/// the date is malformed. Step failures are reported in the result.
pub fn run_build(options: &BuildOptions) -> Result<BuildReport> {
    let mission_control = MissionControl::init(&options.settings);

    let contract_label = options.contract.display().to_string();
    let authored = ContractOverride::from_json_str(&read(&options.contract)?, &contract_label)?;
    let scene_label = options.scene.display().to_string();
    let mut scene = InMemoryScene::from_json_str(&read(&options.scene)?, &scene_label)?;

    let campaign = CampaignContext::new(parse_date(options.date.as_deref())?, TagSet::new());
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut generator = PlaceholderUnitGenerator;
    let mut contract = Contract::new(contract_label, authored);

    tracing::info!(seed, "Running offline encounter build");
    let run = mission_control.build_encounter(
        &mut contract,
        &mut scene,
        EncounterServices {
            campaign: &campaign,
            unit_generator: &mut generator,
            rng: &mut rng,
        },
    );

    Ok(BuildReport {
        seed,
        contract_override: contract.override_data().clone(),
        spawn_keys: run
            .state
            .get(&EXTRA_LANCE_SPAWN_KEYS)
            .cloned()
            .unwrap_or_default(),
        object_lookup: scene.object_lookup().clone(),
        failures: run
            .failures
            .iter()
            .map(|failure| format!("{}: {}", failure.step, failure.error))
            .collect(),
    })
}
