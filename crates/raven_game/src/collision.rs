//! Collision primitives: axis-aligned boxes and the static tile grid.
//!
//! Every gameplay body (player, enemies, interactables, hit volumes, vision
//! probes, platforms) is an [`Aabb`]; cross-entity checks are plain
//! [`Aabb::overlaps`] tests. Static level geometry is a [`CollisionGrid`] of
//! solid cells.
//!
//! The grid uses **axis-separable move-and-slide**: resolve X movement
//! first, then resolve Y using the already-corrected X position. This
//! prevents diagonal tunneling and gives the usual "slide along walls" feel.

use glam::Vec2;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize, Clone)]
pub struct CollisionFile {
    pub cell_size: i32,
    #[serde(default)]
    pub origin: GridOrigin,
    pub width: i32,
    pub height: i32,
    pub solids: Vec<GridCell>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct GridOrigin {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Strict intersection; touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }
}

#[derive(Debug, Clone)]
pub struct CollisionGrid {
    pub cell_size: i32,
    pub origin: GridOrigin,
    pub width: i32,
    pub height: i32,
    solids: HashSet<GridCell>,
}

impl CollisionGrid {
    pub fn from_file(file: CollisionFile) -> Self {
        let solids = file.solids.into_iter().collect();
        Self {
            cell_size: file.cell_size,
            origin: file.origin,
            width: file.width,
            height: file.height,
            solids,
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return false;
        }
        self.solids.contains(&GridCell { x, y })
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    pub(crate) fn resolve_axis_x(&self, aabb: Aabb, dx: f32) -> f32 {
        if dx == 0.0 {
            return aabb.center.x;
        }

        const EPS: f32 = 0.001;
        let mut candidate_x = aabb.center.x + dx;
        let y0 = self.world_to_cell_y(aabb.bottom() + EPS);
        let y1 = self.world_to_cell_y(aabb.top() - EPS);

        if dx > 0.0 {
            let x_cell = self.world_to_cell_x(candidate_x + aabb.half.x - EPS);
            for y in y0..=y1 {
                if self.is_solid(x_cell, y) {
                    candidate_x = candidate_x.min(self.cell_left_world(x_cell) - aabb.half.x);
                }
            }
            // Never push opposite to the motion.
            candidate_x = candidate_x.max(aabb.center.x);
        } else {
            let x_cell = self.world_to_cell_x(candidate_x - aabb.half.x + EPS);
            for y in y0..=y1 {
                if self.is_solid(x_cell, y) {
                    candidate_x = candidate_x.max(self.cell_right_world(x_cell) + aabb.half.x);
                }
            }
            candidate_x = candidate_x.min(aabb.center.x);
        }

        candidate_x
    }

    pub(crate) fn resolve_axis_y(&self, aabb: Aabb, dy: f32) -> f32 {
        if dy == 0.0 {
            return aabb.center.y;
        }

        const EPS: f32 = 0.001;
        let mut candidate_y = aabb.center.y + dy;
        let x0 = self.world_to_cell_x(aabb.left() + EPS);
        let x1 = self.world_to_cell_x(aabb.right() - EPS);

        if dy > 0.0 {
            let y_cell = self.world_to_cell_y(candidate_y + aabb.half.y - EPS);
            for x in x0..=x1 {
                if self.is_solid(x, y_cell) {
                    candidate_y = candidate_y.min(self.cell_bottom_world(y_cell) - aabb.half.y);
                }
            }
            candidate_y = candidate_y.max(aabb.center.y);
        } else {
            let y_cell = self.world_to_cell_y(candidate_y - aabb.half.y + EPS);
            for x in x0..=x1 {
                if self.is_solid(x, y_cell) {
                    candidate_y = candidate_y.max(self.cell_top_world(y_cell) + aabb.half.y);
                }
            }
            candidate_y = candidate_y.min(aabb.center.y);
        }

        candidate_y
    }

    fn world_to_cell_x(&self, world_x: f32) -> i32 {
        ((world_x - self.origin.x as f32) / self.cell_size as f32).floor() as i32
    }

    fn world_to_cell_y(&self, world_y: f32) -> i32 {
        ((world_y - self.origin.y as f32) / self.cell_size as f32).floor() as i32
    }

    fn cell_left_world(&self, x: i32) -> f32 {
        self.origin.x as f32 + (x * self.cell_size) as f32
    }

    fn cell_right_world(&self, x: i32) -> f32 {
        self.origin.x as f32 + ((x + 1) * self.cell_size) as f32
    }

    fn cell_bottom_world(&self, y: i32) -> f32 {
        self.origin.y as f32 + (y * self.cell_size) as f32
    }

    fn cell_top_world(&self, y: i32) -> f32 {
        self.origin.y as f32 + ((y + 1) * self.cell_size) as f32
    }
}

pub(crate) fn validate_collision_file(file: &CollisionFile) -> Result<(), String> {
    if file.cell_size <= 0 {
        return Err("Collision validation failed: cell_size must be > 0".to_string());
    }
    if file.width <= 0 || file.height <= 0 {
        return Err("Collision validation failed: width and height must be > 0".to_string());
    }

    let mut seen = HashSet::new();
    for cell in &file.solids {
        if cell.x < 0 || cell.x >= file.width || cell.y < 0 || cell.y >= file.height {
            return Err(format!(
                "Collision validation failed: solid cell out of bounds ({}, {})",
                cell.x, cell.y
            ));
        }
        if !seen.insert(*cell) {
            return Err(format!(
                "Collision validation failed: duplicate solid cell ({}, {})",
                cell.x, cell.y
            ));
        }
    }
    Ok(())
}
