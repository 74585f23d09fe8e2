use glam::Vec2;

use crate::collision::{Aabb, CollisionGrid};
use crate::config::GameConfig;
use crate::platform::MovingPlatform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub landing_tolerance: f32,
}

impl From<&GameConfig> for PhysicsConfig {
    fn from(config: &GameConfig) -> Self {
        Self {
            gravity: config.gravity,
            max_fall_speed: config.max_fall_speed,
            landing_tolerance: config.landing_tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
}

/// Gravity plus move-and-slide against the static grid and moving platforms,
/// for the one body that falls: the player.
#[derive(Debug, Clone, Copy)]
pub struct PlatformerPhysics {
    pub config: PhysicsConfig,
    pub grounded: bool,
    pub contacts: ContactState,
    /// Index of the platform the body is standing on, if any.
    pub support: Option<usize>,
}

impl PlatformerPhysics {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            grounded: false,
            contacts: ContactState::default(),
            support: None,
        }
    }

    pub fn can_jump(&self) -> bool {
        self.grounded
    }

    pub fn step(
        &mut self,
        body: &mut Aabb,
        velocity: &mut Vec2,
        grid: &CollisionGrid,
        platforms: &[MovingPlatform],
    ) {
        const EPS: f32 = 0.0001;

        velocity.y = (velocity.y - self.config.gravity).max(-self.config.max_fall_speed);
        let dx = velocity.x;
        let dy = velocity.y;

        let mut moved = *body;
        let grid_x = grid.resolve_axis_x(moved, dx);
        let resolved_x = clamp_x_against_platforms(platforms, moved, dx, grid_x);
        let collided_x = (resolved_x - (moved.center.x + dx)).abs() > EPS;
        moved.center.x = resolved_x;

        let grid_y = grid.resolve_axis_y(moved, dy);
        let (resolved_y, support) = clamp_y_against_platforms(
            platforms,
            moved,
            dy,
            grid_y,
            self.config.landing_tolerance,
        );
        let collided_y = (resolved_y - (moved.center.y + dy)).abs() > EPS;
        moved.center.y = resolved_y;

        *body = moved;
        self.support = support;
        self.contacts = ContactState {
            left: collided_x && dx < 0.0,
            right: collided_x && dx > 0.0,
            down: collided_y && dy < 0.0,
            up: collided_y && dy > 0.0,
        };

        if (self.contacts.left && velocity.x < 0.0) || (self.contacts.right && velocity.x > 0.0) {
            velocity.x = 0.0;
        }
        if self.contacts.up && velocity.y > 0.0 {
            velocity.y = 0.0;
        }
        // Grounded comes from contact, not from position heuristics.
        if self.contacts.down && velocity.y < 0.0 {
            velocity.y = 0.0;
            self.grounded = true;
        } else {
            if collided_y {
                velocity.y = 0.0;
            }
            self.grounded = false;
            self.support = None;
        }
    }
}

fn overlaps_vertically(a: &Aabb, b: &Aabb) -> bool {
    (a.center.y - b.center.y).abs() < a.half.y + b.half.y
}

fn overlaps_horizontally(a: &Aabb, b: &Aabb) -> bool {
    (a.center.x - b.center.x).abs() < a.half.x + b.half.x
}

fn clamp_x_against_platforms(platforms: &[MovingPlatform], aabb: Aabb, dx: f32, candidate: f32) -> f32 {
    const EPS: f32 = 0.001;
    let mut x = candidate;
    for platform in platforms {
        let solid = &platform.body;
        if !overlaps_vertically(&aabb, solid) {
            continue;
        }
        if dx > 0.0 && aabb.right() <= solid.left() + EPS {
            x = x.min(solid.left() - aabb.half.x);
        } else if dx < 0.0 && aabb.left() >= solid.right() - EPS {
            x = x.max(solid.right() + aabb.half.x);
        }
    }
    x
}

/// Falling bodies whose feet are at most `tolerance` below a platform top
/// still land on it, so a rising platform does not swallow its rider.
fn clamp_y_against_platforms(
    platforms: &[MovingPlatform],
    aabb: Aabb,
    dy: f32,
    candidate: f32,
    tolerance: f32,
) -> (f32, Option<usize>) {
    const EPS: f32 = 0.001;
    let mut y = candidate;
    let mut support = None;
    for (index, platform) in platforms.iter().enumerate() {
        let solid = &platform.body;
        if !overlaps_horizontally(&aabb, solid) {
            continue;
        }
        if dy < 0.0 && aabb.bottom() >= solid.top() - tolerance {
            let landed = solid.top() + aabb.half.y;
            if y < landed {
                y = landed;
                support = Some(index);
            }
        } else if dy > 0.0 && aabb.top() <= solid.bottom() + EPS {
            y = y.min(solid.bottom() - aabb.half.y);
        }
    }
    (y, support)
}
