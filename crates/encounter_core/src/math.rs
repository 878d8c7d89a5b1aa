//! Scene-space math: positions and hex grid snapping.
//!
//! Scene positions are float triples in the host engine's units. `y` is height;
//! the ground plane is `x`/`z`. Placement only ever moves points across the
//! ground plane and keeps their height.

use serde::{Deserialize, Serialize};

const SQRT_3: f32 = 1.732_050_8;

/// Scene-space 3D position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X coordinate.
    pub x: f32,
    /// Height.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Vec3 {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Squared distance across the ground plane (avoids sqrt for comparisons).
    #[must_use]
    pub fn ground_distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Distance across the ground plane.
    #[must_use]
    pub fn ground_distance(self, other: Self) -> f32 {
        self.ground_distance_squared(other).sqrt()
    }

    /// Offset this position across the ground plane by `distance` along `angle` (radians).
    #[must_use]
    pub fn offset_polar(self, angle: f32, distance: f32) -> Self {
        Self::new(
            self.x + distance * angle.cos(),
            self.y,
            self.z + distance * angle.sin(),
        )
    }
}

/// Pointy-top hex grid laid over the ground plane.
///
/// Cells are addressed in axial coordinates `(q, r)`; `size` is the distance
/// from a cell centre to any of its corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexGrid {
    /// Centre-to-corner distance of one cell.
    pub size: f32,
}

impl HexGrid {
    /// Create a grid with the given cell size.
    #[must_use]
    pub const fn new(size: f32) -> Self {
        Self { size }
    }

    /// Axial cell containing the given position.
    #[must_use]
    pub fn cell_at(&self, position: Vec3) -> (i32, i32) {
        let q = (SQRT_3 / 3.0 * position.x - position.z / 3.0) / self.size;
        let r = (2.0 / 3.0 * position.z) / self.size;
        cube_round(q, r)
    }

    /// Centre of an axial cell, at height `y`.
    #[must_use]
    pub fn cell_center(&self, cell: (i32, i32), y: f32) -> Vec3 {
        let (q, r) = (cell.0 as f32, cell.1 as f32);
        Vec3::new(
            self.size * (SQRT_3 * q + SQRT_3 / 2.0 * r),
            y,
            self.size * (1.5 * r),
        )
    }

    /// Snap a position to the centre of the nearest cell, keeping its height.
    #[must_use]
    pub fn snap(&self, position: Vec3) -> Vec3 {
        if self.size <= 0.0 {
            return position;
        }
        self.cell_center(self.cell_at(position), position.y)
    }
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Round fractional axial coordinates to the nearest hex.
fn cube_round(q: f32, r: f32) -> (i32, i32) {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    (rq as i32, rr as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 50.0, 4.0);
        assert!((a.ground_distance(b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_offset_polar() {
        let p = Vec3::new(10.0, 2.0, 10.0).offset_polar(0.0, 24.0);
        assert!((p.x - 34.0).abs() < 1e-4);
        assert!((p.z - 10.0).abs() < 1e-4);
        assert_eq!(p.y, 2.0);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let grid = HexGrid::new(12.0);
        let snapped = grid.snap(Vec3::new(37.3, 5.0, -81.9));
        let again = grid.snap(snapped);
        assert!(snapped.ground_distance(again) < 1e-3);
        assert_eq!(snapped.y, 5.0);
    }

    #[test]
    fn test_snap_stays_within_one_cell() {
        let grid = HexGrid::new(12.0);
        for i in -20..20 {
            let p = Vec3::new(i as f32 * 7.3, 0.0, i as f32 * -3.1);
            // Any point is at most one corner distance from its cell centre.
            assert!(grid.snap(p).ground_distance(p) <= 12.0 + 1e-3);
        }
    }

    #[test]
    fn test_cell_center_roundtrip() {
        let grid = HexGrid::new(12.0);
        for cell in [(0, 0), (3, -2), (-5, 7), (10, 10)] {
            assert_eq!(grid.cell_at(grid.cell_center(cell, 0.0)), cell);
        }
    }

    #[test]
    fn test_zero_size_grid_does_not_snap() {
        let grid = HexGrid::new(0.0);
        let p = Vec3::new(1.5, 0.0, 2.5);
        assert_eq!(grid.snap(p), p);
    }
}
