//! Animated entity base shared by the player, enemies and interactables.
//!
//! Each tick an entity (a) turns to match its horizontal velocity, (b) lets
//! its concrete type pick the active clip, (c) advances that clip, and (d) on
//! a completion signal falls back to idle. The completion name is handed back
//! to the caller, which owns every cross-entity reaction.

use glam::Vec2;
use raven_core::animation::{Clip, ClipKind, ClipSet, ClipStep, Facing};

use crate::assets::Texture;
use crate::collision::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VolumeId(pub u32);

/// Short-lived collider spawned by an attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitVolume {
    pub id: VolumeId,
    pub bounds: Aabb,
}

#[derive(Debug, Clone)]
pub struct AnimatedEntity {
    pub body: Aabb,
    pub velocity: Vec2,
    pub facing: Facing,
    pub alive: bool,
    clips: ClipSet<Texture>,
    active: ClipKind,
    frame: Texture,
}

impl AnimatedEntity {
    pub fn new(body: Aabb, clips: ClipSet<Texture>) -> Self {
        let frame = clips.get(ClipKind::Idle).current_frame()[Facing::Right.index()].clone();
        Self {
            body,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            alive: true,
            clips,
            active: ClipKind::Idle,
            frame,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.center
    }

    /// Texture to draw this tick.
    pub fn frame(&self) -> &Texture {
        &self.frame
    }

    pub fn active_kind(&self) -> ClipKind {
        self.active
    }

    pub fn clip(&self, kind: ClipKind) -> &Clip<Texture> {
        self.clips.get(kind)
    }

    pub fn play(&mut self, kind: ClipKind) {
        if self.active != kind && !self.clips.contains(kind) {
            log::warn!("No '{kind}' clip on entity; playing idle instead");
        }
        self.active = kind;
    }

    pub fn rewind(&mut self, kind: ClipKind) {
        self.clips.get_mut(kind).reset();
    }

    /// Whether the active clip suspends velocity control.
    pub fn locks_movement(&self) -> bool {
        self.clips.get(self.active).locks_movement()
    }

    /// Flip only on a strict sign disagreement, so zero velocity keeps the
    /// current facing.
    pub fn update_facing(&mut self) {
        if self.velocity.x < 0.0 && self.facing == Facing::Right {
            self.facing = Facing::Left;
        } else if self.velocity.x > 0.0 && self.facing == Facing::Left {
            self.facing = Facing::Right;
        }
    }

    /// Returns false when already dead.
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.velocity = Vec2::ZERO;
        self.play(ClipKind::Die);
        true
    }

    /// Step the active clip and refresh the render frame.
    pub fn advance(&mut self) -> Option<String> {
        let side = self.facing.index();
        match self.clips.get_mut(self.active).advance() {
            ClipStep::Frame(pair) => {
                self.frame = pair[side].clone();
                None
            }
            ClipStep::Finished(name) => {
                let name = name.map(str::to_owned);
                self.active = ClipKind::Idle;
                self.frame = self.clips.get(ClipKind::Idle).current_frame()[side].clone();
                name
            }
        }
    }
}

/// Implemented by every animated entity type. `select_clip` is the hook
/// through which each type maps its behavioural flags onto a clip.
pub trait Animated {
    fn entity(&self) -> &AnimatedEntity;
    fn entity_mut(&mut self) -> &mut AnimatedEntity;

    fn select_clip(&mut self) {}

    fn update_animation(&mut self) -> Option<String> {
        self.entity_mut().update_facing();
        self.select_clip();
        self.entity_mut().advance()
    }
}
