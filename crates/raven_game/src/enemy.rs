//! Patrolling enemies.
//!
//! Both kinds share one state machine:
//! `Idle <-> Patrol -> Exposure -> Run -> Attack`, with `Die` reachable from
//! anywhere. What differs per kind lives behind [`EnemyKind`] and the
//! [`VisionProbe`] capability: a Stalker sees ahead of itself and only arms
//! after its exposure clip, a Guardian is blind and armed from the start.

use glam::Vec2;
use raven_core::animation::{ClipKind, ClipSet, Facing};
use serde::Deserialize;

use crate::assets::{Texture, GUARDIAN, STALKER};
use crate::collision::Aabb;
use crate::config::GameConfig;
use crate::entity::{Animated, AnimatedEntity};
use crate::patrol::{Oscillator, PatrolBehavior};
use crate::sound::{Cue, SoundBoard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Stalker,
    Guardian,
}

impl EnemyKind {
    pub fn clip_family(self) -> &'static str {
        match self {
            Self::Stalker => STALKER,
            Self::Guardian => GUARDIAN,
        }
    }

    pub fn attack_cue(self) -> Cue {
        match self {
            Self::Stalker => Cue::StalkerAttack,
            Self::Guardian => Cue::GuardianAttack,
        }
    }

    pub fn armed_at_spawn(self) -> bool {
        matches!(self, Self::Guardian)
    }

    fn has_vision(self) -> bool {
        matches!(self, Self::Stalker)
    }

    fn arms_on_exposure(self) -> bool {
        matches!(self, Self::Stalker)
    }
}

/// Directional detection volume, rebuilt every tick.
pub trait VisionProbe {
    fn refresh_vision(&mut self);
    fn vision(&self) -> Option<&Aabb>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTuning {
    pub vision_reach: f32,
    pub vision_half: Vec2,
    pub aggro_speed_multiplier: f32,
}

impl From<&GameConfig> for EnemyTuning {
    fn from(config: &GameConfig) -> Self {
        Self {
            vision_reach: config.vision_reach,
            vision_half: config.vision_half(),
            aggro_speed_multiplier: config.aggro_speed_multiplier,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub entity: AnimatedEntity,
    kind: EnemyKind,
    oscillator: Oscillator,
    tuning: EnemyTuning,
    pub aggro: bool,
    pub can_attack: bool,
    pub attacking: bool,
    removed: bool,
    vision: Option<Aabb>,
}

impl Enemy {
    pub fn new(
        kind: EnemyKind,
        body: Aabb,
        clips: ClipSet<Texture>,
        oscillator: Oscillator,
        tuning: EnemyTuning,
    ) -> Self {
        let mut enemy = Self {
            entity: AnimatedEntity::new(body, clips),
            kind,
            oscillator,
            tuning,
            aggro: false,
            can_attack: kind.armed_at_spawn(),
            attacking: false,
            removed: false,
            vision: None,
        };
        enemy.refresh_vision();
        enemy
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn is_alive(&self) -> bool {
        self.entity.alive
    }

    /// Set once the die clip has played out; the enemy no longer collides or
    /// draws.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn aggro(&mut self, sounds: &mut SoundBoard) {
        if self.aggro || !self.entity.alive {
            return;
        }
        self.oscillator.speed *= self.tuning.aggro_speed_multiplier;
        self.aggro = true;
        self.entity.velocity.x = 0.0;
        self.entity.play(ClipKind::Exposure);
        sounds.play(Cue::StalkerExposure, false);
        log::debug!("{:?} at {:?} spotted the player", self.kind, self.entity.position());
    }

    /// Face `target_x`, reversing the patrol direction if it points away.
    pub fn turn_toward(&mut self, target_x: f32) {
        let from_x = self.entity.position().x;
        self.oscillator.turn_towards_x(from_x, target_x);
        self.entity.facing = if target_x < from_x {
            Facing::Left
        } else {
            Facing::Right
        };
        self.refresh_vision();
    }

    /// Returns whether the attack started.
    pub fn attack(&mut self, sounds: &mut SoundBoard) -> bool {
        if !self.can_attack || !self.entity.alive || self.entity.locks_movement() {
            return false;
        }
        sounds.play(self.kind.attack_cue(), false);
        self.entity.velocity.x = 0.0;
        self.attacking = true;
        self.entity.play(ClipKind::Attack);
        true
    }

    pub fn kill(&mut self) -> bool {
        let killed = self.entity.kill();
        if killed {
            self.attacking = false;
            log::debug!("{:?} at {:?} killed", self.kind, self.entity.position());
        }
        killed
    }

    pub fn tick(&mut self, sounds: &mut SoundBoard) {
        if self.entity.alive && !self.entity.locks_movement() {
            self.patrol();
        }
        self.refresh_vision();

        match self.update_animation().as_deref() {
            Some("attack") => self.attacking = false,
            Some("die") => {
                self.removed = true;
                self.vision = None;
            }
            Some("exposure") if self.kind.arms_on_exposure() => {
                self.can_attack = true;
                sounds.play(Cue::StalkerRun, true);
            }
            _ => {}
        }
    }
}

impl PatrolBehavior for Enemy {
    fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    fn patrol(&mut self) -> Vec2 {
        let velocity = self.oscillator.velocity_at(self.entity.position());
        self.entity.velocity.x = velocity.x;
        self.entity.body.center.x += velocity.x;
        Vec2::new(velocity.x, 0.0)
    }
}

impl VisionProbe for Enemy {
    fn refresh_vision(&mut self) {
        if !self.kind.has_vision() || self.removed {
            self.vision = None;
            return;
        }
        let ahead = if self.oscillator.direction.x < 0 { -1.0 } else { 1.0 };
        let center = self.entity.position() + Vec2::new(ahead * self.tuning.vision_reach, 0.0);
        self.vision = Some(Aabb::new(center, self.tuning.vision_half));
    }

    fn vision(&self) -> Option<&Aabb> {
        self.vision.as_ref()
    }
}

impl Animated for Enemy {
    fn entity(&self) -> &AnimatedEntity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut AnimatedEntity {
        &mut self.entity
    }

    fn select_clip(&mut self) {
        if !self.entity.alive {
            return;
        }
        let kind = if self.attacking {
            ClipKind::Attack
        } else if self.aggro {
            if self.entity.locks_movement() {
                ClipKind::Exposure
            } else {
                ClipKind::Run
            }
        } else if self.entity.velocity.x == 0.0 {
            ClipKind::Idle
        } else {
            ClipKind::Walk
        };
        self.entity.play(kind);
    }
}
