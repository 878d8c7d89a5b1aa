//! Encounter rule pipeline.
//!
//! A [`RuleEngine`] is an ordered list of [`LogicStep`]s. Running it executes
//! every step once, in insertion order, against one fresh [`LogicState`], one
//! scene registry and one [`RunPayload`]. There is no retry and no skipping:
//! a step that fails is logged and the next step still runs.

mod add_lance;
mod chunk;
mod encounter_rules;
mod extra_lance_spawn_points;

use rand::RngCore;

use crate::autofill::UnitGenerator;
use crate::contract::CampaignContext;
use crate::error::{EncounterError, Result};
use crate::logic_state::LogicState;
use crate::overrides::ContractOverride;
use crate::scene::SceneRegistry;

pub use add_lance::{AddLanceToTargetTeam, AdditionalLance};
pub use chunk::{
    AddEscapeChunk, DoesChunkExist, DynamicWithdrawBatch, ESCAPE_CHUNK_EXISTS, ESCAPE_CHUNK_NAME,
};
pub use encounter_rules::EncounterRules;
pub use extra_lance_spawn_points::{
    AddExtraLanceSpawnPoints, LanceOutcome, SpawnKeyPair, EXTRA_LANCE_SPAWN_KEYS,
};

/// Data and services shared by every step of one run.
pub struct RunPayload<'a> {
    /// Override data being configured.
    pub contract_override: &'a mut ContractOverride,
    /// Campaign state for unit generation.
    pub campaign: &'a CampaignContext,
    /// Host unit-generation service.
    pub unit_generator: &'a mut dyn UnitGenerator,
    /// Randomness for placement and generated guids. Seed it for reproducible builds.
    pub rng: &'a mut dyn RngCore,
}

/// One stage of the encounter pipeline.
pub trait LogicStep {
    /// Step name for logs.
    fn name(&self) -> &str;

    /// Run the step.
    ///
    /// An error is contained by the engine: it is logged and the run goes on.
    fn run(
        &mut self,
        state: &mut LogicState,
        scene: &mut dyn SceneRegistry,
        payload: &mut RunPayload<'_>,
    ) -> Result<()>;
}

/// A step that returned an error during a run.
#[derive(Debug)]
pub struct StepFailure {
    /// Name of the failed step.
    pub step: String,
    /// What went wrong.
    pub error: EncounterError,
}

/// Outcome of one engine run.
#[derive(Debug, Default)]
pub struct EngineRun {
    /// Blackboard as left by the last step.
    pub state: LogicState,
    /// Steps that failed, in run order.
    pub failures: Vec<StepFailure>,
}

/// Ordered pipeline of steps.
#[derive(Default)]
pub struct RuleEngine {
    steps: Vec<Box<dyn LogicStep>>,
}

impl RuleEngine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn add<S: LogicStep + 'static>(&mut self, step: S) {
        self.steps.push(Box::new(step));
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no steps were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in run order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.name())
    }

    /// Run every step once, in order, against a fresh blackboard.
    pub fn run(&mut self, scene: &mut dyn SceneRegistry, payload: &mut RunPayload<'_>) -> EngineRun {
        let mut run = EngineRun::default();

        for step in &mut self.steps {
            tracing::debug!(step = step.name(), "Running encounter logic");
            if let Err(error) = step.run(&mut run.state, scene, payload) {
                tracing::error!(step = step.name(), "{error}");
                run.failures.push(StepFailure {
                    step: step.name().to_string(),
                    error,
                });
            }
        }

        run
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.step_names()).finish()
    }
}
