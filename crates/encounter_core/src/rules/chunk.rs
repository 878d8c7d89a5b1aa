//! Chunk checks and the dynamic withdraw escape chunk.

use super::{LogicStep, RuleEngine, RunPayload};
use crate::error::Result;
use crate::logic_state::{LogicState, StateKey};
use crate::overrides::ObjectGuid;
use crate::scene::SceneRegistry;

/// Name of the chunk holding the withdraw escape logic.
pub const ESCAPE_CHUNK_NAME: &str = "Chunk_Escape";

/// Whether [`ESCAPE_CHUNK_NAME`] existed when checked.
pub const ESCAPE_CHUNK_EXISTS: StateKey<bool> = StateKey::new("Chunk_Escape_Exists");

/// Publishes whether a named chunk is present in the scene.
#[derive(Debug, Clone)]
pub struct DoesChunkExist {
    chunk_name: String,
    key: StateKey<bool>,
}

impl DoesChunkExist {
    /// Check for `chunk_name` and publish the answer under `key`.
    #[must_use]
    pub fn new(chunk_name: impl Into<String>, key: StateKey<bool>) -> Self {
        Self {
            chunk_name: chunk_name.into(),
            key,
        }
    }
}

impl LogicStep for DoesChunkExist {
    fn name(&self) -> &str {
        "DoesChunkExist"
    }

    fn run(
        &mut self,
        state: &mut LogicState,
        scene: &mut dyn SceneRegistry,
        _payload: &mut RunPayload<'_>,
    ) -> Result<()> {
        let exists = scene.find_chunk(&self.chunk_name).is_some();
        tracing::debug!(chunk = %self.chunk_name, exists, "Checked for chunk");
        state.set(&self.key, exists)
    }
}

/// Creates the escape chunk when an earlier check found none.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddEscapeChunk;

impl LogicStep for AddEscapeChunk {
    fn name(&self) -> &str {
        "AddEscapeChunk"
    }

    fn run(
        &mut self,
        state: &mut LogicState,
        scene: &mut dyn SceneRegistry,
        payload: &mut RunPayload<'_>,
    ) -> Result<()> {
        match state.get(&ESCAPE_CHUNK_EXISTS) {
            None => {
                tracing::debug!("Escape chunk was never checked, skipping");
            }
            Some(true) => {}
            Some(false) => {
                let guid = ObjectGuid::random(&mut *payload.rng);
                let chunk = scene.create_chunk(ESCAPE_CHUNK_NAME, guid);
                tracing::info!(guid = %chunk.guid, "Added escape chunk");
            }
        }
        Ok(())
    }
}

/// Steps that prepare the escape chunk for dynamic withdraw.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicWithdrawBatch;

impl DynamicWithdrawBatch {
    /// Append the batch to an engine.
    pub fn install(engine: &mut RuleEngine) {
        engine.add(DoesChunkExist::new(ESCAPE_CHUNK_NAME, ESCAPE_CHUNK_EXISTS));
        engine.add(AddEscapeChunk);
    }
}
