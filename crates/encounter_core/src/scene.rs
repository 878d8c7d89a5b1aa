//! Scene registry interface and an in-memory implementation.
//!
//! The host engine owns the live scene. The pipeline only sees it through
//! [`SceneRegistry`]: plain snapshots of spawners and spawn points, guid
//! resolution, and a handful of creation calls. Override data refers to
//! scene objects by guid and resolves them lazily through this interface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EncounterError, Result};
use crate::math::Vec3;
use crate::overrides::ObjectGuid;

/// Snapshot of one physical unit spawn point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSpawnPointInfo {
    /// Spawn point guid; unit overrides bind to this.
    pub guid: ObjectGuid,
    /// Object name, unique within its spawner (`UnitSpawnPoint1`, ...).
    pub name: String,
    /// Scene position.
    pub position: Vec3,
}

/// Snapshot of one lance spawner and its spawn points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanceSpawnerInfo {
    /// Spawner guid; lance overrides bind to this.
    pub guid: ObjectGuid,
    /// Object name.
    pub name: String,
    /// Scene position of the spawner itself.
    #[serde(default)]
    pub position: Vec3,
    /// Spawn points in child order.
    #[serde(default)]
    pub unit_spawn_points: Vec<UnitSpawnPointInfo>,
}

impl LanceSpawnerInfo {
    /// Find the spawner with `guid` in a snapshot.
    #[must_use]
    pub fn find<'a>(spawners: &'a [Self], guid: &ObjectGuid) -> Option<&'a Self> {
        spawners.iter().find(|spawner| &spawner.guid == guid)
    }

    /// Positions of this spawner's spawn points.
    pub fn spawn_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.unit_spawn_points.iter().map(|point| point.position)
    }
}

/// Named chunk (encounter logic container) in the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkInfo {
    /// Chunk guid.
    pub guid: ObjectGuid,
    /// Chunk name, e.g. `Chunk_Escape`.
    pub name: String,
}

/// What a guid resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    /// A lance spawner.
    LanceSpawner(LanceSpawnerInfo),
    /// A unit spawn point, with the guid of its spawner.
    UnitSpawnPoint {
        /// Owning spawner.
        spawner: ObjectGuid,
        /// The spawn point.
        point: UnitSpawnPointInfo,
    },
    /// A chunk.
    Chunk(ChunkInfo),
}

/// Access to the host scene during an encounter build.
pub trait SceneRegistry {
    /// Snapshot of every lance spawner in the encounter layer.
    fn lance_spawners(&self) -> Vec<LanceSpawnerInfo>;

    /// Resolve a guid to a scene object.
    fn resolve(&self, guid: &ObjectGuid) -> Option<SceneObject>;

    /// Positions of every unit spawn point in the scene, across all spawners.
    fn unit_spawn_positions(&self) -> Vec<Vec3>;

    /// Create a unit spawn point under a spawner.
    ///
    /// Fails with [`EncounterError::UnresolvedReference`] if the spawner is gone.
    fn create_unit_spawn_point(
        &mut self,
        spawner: &ObjectGuid,
        name: &str,
        position: Vec3,
        spawn_point_guid: &ObjectGuid,
    ) -> Result<UnitSpawnPointInfo>;

    /// Register an object under a lookup key for later steps and the host.
    fn register_object(&mut self, key: String, guid: ObjectGuid);

    /// Find a chunk by name.
    fn find_chunk(&self, name: &str) -> Option<ObjectGuid>;

    /// Create an empty chunk.
    fn create_chunk(&mut self, name: &str, guid: ObjectGuid) -> ChunkInfo;
}

/// Scene registry backed by plain data.
///
/// Used for offline builds and tests. Loads from JSON in the same shape it
/// serializes to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InMemoryScene {
    lance_spawners: Vec<LanceSpawnerInfo>,
    chunks: Vec<ChunkInfo>,
    object_lookup: BTreeMap<String, ObjectGuid>,
}

impl InMemoryScene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a scene description from JSON.
    pub fn from_json_str(json: &str, label: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| EncounterError::JsonParse {
            path: label.to_string(),
            source,
        })
    }

    /// Add a spawner.
    pub fn add_lance_spawner(&mut self, spawner: LanceSpawnerInfo) {
        self.lance_spawners.push(spawner);
    }

    /// Add a chunk.
    pub fn add_chunk(&mut self, chunk: ChunkInfo) {
        self.chunks.push(chunk);
    }

    /// Look up a spawner by guid.
    #[must_use]
    pub fn spawner(&self, guid: &ObjectGuid) -> Option<&LanceSpawnerInfo> {
        LanceSpawnerInfo::find(&self.lance_spawners, guid)
    }

    /// Keys registered during builds.
    #[must_use]
    pub fn object_lookup(&self) -> &BTreeMap<String, ObjectGuid> {
        &self.object_lookup
    }

    /// All chunks.
    #[must_use]
    pub fn chunks(&self) -> &[ChunkInfo] {
        &self.chunks
    }

    /// Total number of unit spawn points.
    #[must_use]
    pub fn unit_spawn_point_count(&self) -> usize {
        self.lance_spawners
            .iter()
            .map(|spawner| spawner.unit_spawn_points.len())
            .sum()
    }
}

impl SceneRegistry for InMemoryScene {
    fn lance_spawners(&self) -> Vec<LanceSpawnerInfo> {
        self.lance_spawners.clone()
    }

    fn resolve(&self, guid: &ObjectGuid) -> Option<SceneObject> {
        for spawner in &self.lance_spawners {
            if &spawner.guid == guid {
                return Some(SceneObject::LanceSpawner(spawner.clone()));
            }
            if let Some(point) = spawner.unit_spawn_points.iter().find(|p| &p.guid == guid) {
                return Some(SceneObject::UnitSpawnPoint {
                    spawner: spawner.guid.clone(),
                    point: point.clone(),
                });
            }
        }
        self.chunks
            .iter()
            .find(|chunk| &chunk.guid == guid)
            .map(|chunk| SceneObject::Chunk(chunk.clone()))
    }

    fn unit_spawn_positions(&self) -> Vec<Vec3> {
        self.lance_spawners
            .iter()
            .flat_map(LanceSpawnerInfo::spawn_positions)
            .collect()
    }

    fn create_unit_spawn_point(
        &mut self,
        spawner: &ObjectGuid,
        name: &str,
        position: Vec3,
        spawn_point_guid: &ObjectGuid,
    ) -> Result<UnitSpawnPointInfo> {
        let owner = self
            .lance_spawners
            .iter_mut()
            .find(|s| &s.guid == spawner)
            .ok_or_else(|| EncounterError::UnresolvedReference(spawner.to_string()))?;

        let point = UnitSpawnPointInfo {
            guid: spawn_point_guid.clone(),
            name: name.to_string(),
            position,
        };
        owner.unit_spawn_points.push(point.clone());
        Ok(point)
    }

    fn register_object(&mut self, key: String, guid: ObjectGuid) {
        self.object_lookup.insert(key, guid);
    }

    fn find_chunk(&self, name: &str) -> Option<ObjectGuid> {
        self.chunks
            .iter()
            .find(|chunk| chunk.name == name)
            .map(|chunk| chunk.guid.clone())
    }

    fn create_chunk(&mut self, name: &str, guid: ObjectGuid) -> ChunkInfo {
        let chunk = ChunkInfo {
            guid,
            name: name.to_string(),
        };
        self.chunks.push(chunk.clone());
        chunk
    }
}
