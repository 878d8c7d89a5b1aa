//! Spawn point placement for lances with more units than spawn points.
//!
//! New points are sampled around a random existing spawn point of the same
//! spawner, inside an annulus, then snapped to the placement grid. A candidate
//! too close to any other spawn point is resampled a bounded number of times;
//! after that the last candidate is accepted anyway. Placement never fails
//! for lack of free space.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SpawnPlacementSettings;
use crate::error::Result;
use crate::math::{HexGrid, Vec3};
use crate::overrides::ObjectGuid;
use crate::scene::{LanceSpawnerInfo, SceneRegistry};

/// Prefix of generated spawn point object names.
pub const UNIT_SPAWN_POINT_PREFIX: &str = "UnitSpawnPoint";

/// An accepted candidate position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Snapped scene position.
    pub position: Vec3,
    /// Resamples taken after the first candidate.
    pub resamples: u32,
    /// False when the retry bound ran out and a colliding candidate was kept.
    pub collision_free: bool,
}

/// Spawn points created for one spawner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnerFill {
    /// Lookup key of the spawner's first existing spawn point.
    pub orientation_key: String,
    /// Lookup keys of the created spawn points, in creation order.
    pub created_keys: Vec<String>,
}

/// Samples and registers new spawn points.
#[derive(Debug, Clone, Copy)]
pub struct SpawnPointPlacer<'a> {
    settings: &'a SpawnPlacementSettings,
    grid: HexGrid,
}

impl<'a> SpawnPointPlacer<'a> {
    /// Create a placer with the given tuning.
    #[must_use]
    pub fn new(settings: &'a SpawnPlacementSettings) -> Self {
        Self {
            settings,
            grid: HexGrid::new(settings.hex_size),
        }
    }

    /// Random grid-snapped position in the sampling annulus around `anchor`.
    pub fn sample_candidate<R: Rng + ?Sized>(&self, anchor: Vec3, rng: &mut R) -> Vec3 {
        let inner = self.settings.inner_radius.max(0.0);
        let outer = self.settings.outer_radius.max(inner);
        let angle = rng.gen_range(0.0..TAU);
        let distance = if outer > inner {
            rng.gen_range(inner..=outer)
        } else {
            inner
        };
        self.grid.snap(anchor.offset_polar(angle, distance))
    }

    /// Whether `candidate` sits too close to any occupied position.
    #[must_use]
    pub fn is_too_close(&self, candidate: Vec3, occupied: &[Vec3]) -> bool {
        let min_sq = self.settings.min_spawn_separation * self.settings.min_spawn_separation;
        occupied
            .iter()
            .any(|other| candidate.ground_distance_squared(*other) < min_sq)
    }

    /// Pick a position near a random anchor, avoiding occupied positions when possible.
    ///
    /// Returns `None` only when there are no anchors to sample around.
    pub fn place<R: Rng + ?Sized>(
        &self,
        anchors: &[Vec3],
        occupied: &[Vec3],
        rng: &mut R,
    ) -> Option<Placement> {
        let anchor = *anchors.choose(rng)?;
        let mut candidate = self.sample_candidate(anchor, rng);
        let mut resamples = 0;

        while self.is_too_close(candidate, occupied)
            && resamples < self.settings.max_placement_attempts
        {
            candidate = self.sample_candidate(anchor, rng);
            resamples += 1;
        }

        Some(Placement {
            position: candidate,
            resamples,
            collision_free: !self.is_too_close(candidate, occupied),
        })
    }

    /// Create one spawn point per pending guid under `spawner` and register each.
    ///
    /// Points are named `UnitSpawnPoint{E+1}` onwards, where `E` is the
    /// spawner's existing point count, and registered under
    /// `"{spawner}.{point}"`. The spawner's first existing point is
    /// registered as the orientation anchor. Returns `Ok(None)` when the
    /// spawner has no existing point to sample around.
    pub fn fill_spawner<R: Rng + ?Sized>(
        &self,
        scene: &mut dyn SceneRegistry,
        spawner: &LanceSpawnerInfo,
        pending: &[ObjectGuid],
        rng: &mut R,
    ) -> Result<Option<SpawnerFill>> {
        let Some(orientation_point) = spawner.unit_spawn_points.first() else {
            return Ok(None);
        };

        let orientation_key = format!("{}.{}", spawner.name, orientation_point.name);
        scene.register_object(orientation_key.clone(), orientation_point.guid.clone());

        let anchors: Vec<Vec3> = spawner.spawn_positions().collect();
        let mut occupied = scene.unit_spawn_positions();
        let existing = spawner.unit_spawn_points.len();
        let mut created_keys = Vec::with_capacity(pending.len());

        for (offset, guid) in pending.iter().enumerate() {
            let Some(placement) = self.place(&anchors, &occupied, rng) else {
                break;
            };
            if !placement.collision_free {
                tracing::debug!(
                    spawner = %spawner.name,
                    "No free spawn position after {} resamples, accepting overlap",
                    placement.resamples
                );
            }

            let name = format!("{UNIT_SPAWN_POINT_PREFIX}{}", existing + offset + 1);
            let point =
                scene.create_unit_spawn_point(&spawner.guid, &name, placement.position, guid)?;

            let key = format!("{}.{}", spawner.name, point.name);
            scene.register_object(key.clone(), point.guid.clone());
            occupied.push(point.position);
            created_keys.push(key);
        }

        Ok(Some(SpawnerFill {
            orientation_key,
            created_keys,
        }))
    }
}
