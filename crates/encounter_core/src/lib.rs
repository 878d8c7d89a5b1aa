//! # Encounter Core
//!
//! Encounter configuration pipeline for contract missions.
//!
//! Before a mission starts, an ordered list of logic steps reads the
//! contract's override data and the scene, then mutates both:
//! - lances are resized per faction and autofilled from a template unit
//! - lance difficulty is scaled per faction
//! - spawn points are created for units that have none
//! - optional extra lances and an escape chunk are added
//!
//! The host engine is reached only through [`scene::SceneRegistry`] and
//! [`autofill::UnitGenerator`], so builds can run offline and in tests.
//!
//! ## Crate Structure
//!
//! - [`config`] - Settings and their loaders
//! - [`overrides`] - Contract override data model
//! - [`rules`] - Rule engine and its steps
//! - [`mission`] - Build entry point
//! - [`math`] - Ground-plane vectors and hex snapping

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod autofill;
pub mod config;
pub mod contract;
pub mod error;
pub mod lance_size;
pub mod logic_state;
pub mod math;
pub mod mission;
pub mod overrides;
pub mod rules;
pub mod scene;
pub mod spawn_placer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::autofill::{AutofillGenerator, GeneratedUnit, UnitGenerationRequest, UnitGenerator};
    pub use crate::config::{ExtendedLance, Settings};
    pub use crate::contract::{CampaignContext, Contract};
    pub use crate::error::{EncounterError, Result};
    pub use crate::logic_state::{LogicState, StateKey};
    pub use crate::math::Vec3;
    pub use crate::mission::{EncounterServices, MissionControl};
    pub use crate::overrides::{
        ContractOverride, LanceOverride, ObjectGuid, TeamOverride, UnitSpawnPointOverride,
    };
    pub use crate::rules::{
        AdditionalLance, EncounterRules, EngineRun, LogicStep, RuleEngine, RunPayload,
        SpawnKeyPair, EXTRA_LANCE_SPAWN_KEYS,
    };
    pub use crate::scene::{InMemoryScene, LanceSpawnerInfo, SceneRegistry, UnitSpawnPointInfo};
}
