use glam::{IVec2, Vec2};

use crate::collision::Aabb;
use crate::patrol::{Oscillator, PatrolBehavior};

/// Solid box that oscillates about its spawn point. The player can stand on
/// it and is carried along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingPlatform {
    pub body: Aabb,
    pub velocity: Vec2,
    oscillator: Oscillator,
}

impl MovingPlatform {
    pub fn new(body: Aabb, speed: f32, direction: IVec2, range: f32) -> Self {
        Self {
            body,
            velocity: Vec2::ZERO,
            oscillator: Oscillator::new(body.center, speed, direction, range),
        }
    }
}

impl PatrolBehavior for MovingPlatform {
    fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    fn patrol(&mut self) -> Vec2 {
        self.velocity = self.oscillator.velocity_at(self.body.center);
        self.body.center += self.velocity;
        self.velocity
    }
}
