//! Uniform grid broad phase for collision and probe queries.
//!
//! The grid answers "which bodies could be near this point" in O(K) where K is
//! the population of the surrounding cells, replacing the O(N²) all-pairs scan.
//! Results are a conservative over-approximation: callers still run the exact
//! overlap or wedge test on every candidate.
//!
//! ## Cell Size Choice
//!
//! Cell size (`grid_cell_size` in [`crate::config::ArenaConfig`]) should be at
//! least the side of the largest body.  With 128 px cells and a 64 px big
//! asteroid, a collision query checks a 3×3 neighbourhood.
//!
//! The grid does not wrap: bodies touching across the torus seam are not
//! candidates for one another, matching the overlap test.

use crate::arena::{FlightCollider, Wrecked};
use crate::config::ArenaConfig;
use crate::constants::GRID_CELL_SIZE;
use crate::kinematics::KinematicBody;
use bevy::math::DVec2;
use bevy::prelude::*;
use std::collections::HashMap;

/// Resource holding the broad-phase grid for this step.
#[derive(Resource, Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    /// Map from cell coordinates to entity list
    cells: HashMap<(i32, i32), Vec<Entity>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(GRID_CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    /// Compute grid cell coordinates for an arena position
    fn world_to_cell(&self, pos: DVec2) -> (i32, i32) {
        let x = (pos.x / self.cell_size).floor() as i32;
        let y = (pos.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Insert an entity at a position. Call after clear() for bulk rebuild.
    pub fn insert(&mut self, entity: Entity, pos: DVec2) {
        let cell = self.world_to_cell(pos);
        self.cells.entry(cell).or_default().push(entity);
    }

    /// Clear all grid data (call before each rebuild)
    pub fn clear(&mut self) {
        for v in self.cells.values_mut() {
            v.clear();
        }
        self.cells.retain(|_, v| !v.is_empty());
    }

    /// Get all entities in cells that overlap the square of half-side
    /// `max_distance` around `pos`, excluding `entity`.
    pub fn get_neighbors_excluding(
        &self,
        entity: Entity,
        pos: DVec2,
        max_distance: f64,
    ) -> Vec<Entity> {
        let cell = self.world_to_cell(pos);
        let cells_to_check = self.radius_in_cells(max_distance);

        let mut neighbors = Vec::new();

        for dx in -cells_to_check..=cells_to_check {
            for dy in -cells_to_check..=cells_to_check {
                let check_cell = (cell.0 + dx, cell.1 + dy);
                if let Some(entities) = self.cells.get(&check_cell) {
                    for &e in entities {
                        if e != entity {
                            neighbors.push(e);
                        }
                    }
                }
            }
        }

        neighbors
    }

    /// Compute how many cells in each direction we need to check for a given max distance
    fn radius_in_cells(&self, max_distance: f64) -> i32 {
        ((max_distance / self.cell_size).ceil() as i32).max(1)
    }
}

/// System to rebuild the grid from every live collidable body.
/// Must run BEFORE the systems that query it (enemy probe, collision pass).
pub fn rebuild_spatial_grid_system(
    mut grid: ResMut<SpatialGrid>,
    config: Res<ArenaConfig>,
    query: Query<(Entity, &KinematicBody), (With<FlightCollider>, Without<Wrecked>)>,
) {
    if grid.cell_size != config.grid_cell_size.max(1.0) {
        *grid = SpatialGrid::new(config.grid_cell_size);
    } else {
        grid.clear();
    }

    for (entity, body) in query.iter() {
        grid.insert(entity, body.position);
    }
}
