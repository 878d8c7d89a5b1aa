//! Assembly of the encounter pipeline from settings.

use std::sync::Arc;

use super::{
    AddExtraLanceSpawnPoints, AddLanceToTargetTeam, AdditionalLance, DynamicWithdrawBatch,
    RuleEngine,
};
use crate::config::Settings;

/// Decides which steps an encounter build runs, and in which order.
///
/// Additional lances go first so that extended lances also size and place
/// them. The dynamic withdraw batch runs last.
#[derive(Debug, Clone)]
pub struct EncounterRules {
    settings: Arc<Settings>,
    additional_lances: Vec<AdditionalLance>,
}

impl EncounterRules {
    /// Rules for the given settings.
    #[must_use]
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            additional_lances: Vec::new(),
        }
    }

    /// Add an extra lance to the target team.
    #[must_use]
    pub fn with_additional_lance(mut self, lance: AdditionalLance) -> Self {
        self.additional_lances.push(lance);
        self
    }

    /// Build the engine.
    #[must_use]
    pub fn build(&self) -> RuleEngine {
        let mut engine = RuleEngine::new();

        for lance in &self.additional_lances {
            engine.add(AddLanceToTargetTeam::new(lance.clone()));
        }

        if self.settings.extended_lances.enable {
            engine.add(AddExtraLanceSpawnPoints::new(Arc::clone(&self.settings)));
        } else {
            tracing::debug!("Extended lances disabled");
        }

        if self.settings.dynamic_withdraw.enable {
            DynamicWithdrawBatch::install(&mut engine);
        }

        engine
    }
}
