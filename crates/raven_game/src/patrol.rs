//! Back-and-forth motion shared by moving platforms and patrolling enemies.

use glam::{IVec2, Vec2};

/// Anything that moves itself each tick by an oscillation rule.
pub trait PatrolBehavior {
    fn oscillator(&self) -> &Oscillator;

    /// Advance one tick. Returns the displacement applied to the body.
    fn patrol(&mut self) -> Vec2;
}

/// Oscillation about `origin`: per active axis, the direction reverses when
/// the offset from the origin reaches `range` while still heading outward.
/// Overshoot past `range` is bounded by one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    pub origin: Vec2,
    pub speed: f32,
    /// Each component is -1, 0 or 1; 0 disables that axis.
    pub direction: IVec2,
    pub range: f32,
}

impl Oscillator {
    pub fn new(origin: Vec2, speed: f32, direction: IVec2, range: f32) -> Self {
        Self {
            origin,
            speed,
            direction: direction.clamp(IVec2::NEG_ONE, IVec2::ONE),
            range,
        }
    }

    /// Velocity for a body currently at `position`, flipping direction at the
    /// range boundary first.
    pub fn velocity_at(&mut self, position: Vec2) -> Vec2 {
        let mut velocity = Vec2::ZERO;

        if self.direction.y != 0 {
            let offset = position.y - self.origin.y;
            if offset.abs() >= self.range && offset.signum() as i32 == self.direction.y {
                self.direction.y = -self.direction.y;
            }
            velocity.y = self.speed * self.direction.y as f32;
        }

        if self.direction.x != 0 {
            let offset = position.x - self.origin.x;
            if offset.abs() >= self.range && offset.signum() as i32 == self.direction.x {
                self.direction.x = -self.direction.x;
            }
            velocity.x = self.speed * self.direction.x as f32;
        }

        velocity
    }

    /// Point the horizontal direction toward `target_x`. Axes that are
    /// disabled stay disabled.
    pub fn turn_towards_x(&mut self, from_x: f32, target_x: f32) {
        let toward = if target_x < from_x { -1 } else { 1 };
        if self.direction.x == -toward {
            self.direction.x = toward;
        }
    }
}
