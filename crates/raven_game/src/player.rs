use glam::Vec2;
use raven_core::animation::{ClipKind, ClipSet};

use crate::assets::Texture;
use crate::collision::Aabb;
use crate::entity::{Animated, AnimatedEntity, HitVolume, VolumeId};

/// Something the level must act on after a player tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The attack clip ended; the level drops this hit volume.
    AttackFinished(VolumeId),
    /// The die clip ended; the level resets.
    DeathComplete,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub entity: AnimatedEntity,
    /// -1, 0 or 1 from held movement keys.
    pub horizontal_input: i8,
    pub jumping: bool,
    pub attacking: bool,
    attack_volume: Option<HitVolume>,
    speed: f32,
}

impl Player {
    pub fn new(body: Aabb, clips: ClipSet<Texture>, speed: f32) -> Self {
        Self {
            entity: AnimatedEntity::new(body, clips),
            horizontal_input: 0,
            jumping: false,
            attacking: false,
            attack_volume: None,
            speed,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.entity.alive
    }

    pub fn set_horizontal_input(&mut self, direction: i8) {
        self.horizontal_input = direction.clamp(-1, 1);
    }

    pub fn attack_volume(&self) -> Option<&HitVolume> {
        self.attack_volume.as_ref()
    }

    /// Returns whether the jump impulse was applied.
    pub fn jump(&mut self, grounded: bool, impulse: f32) -> bool {
        if !grounded || !self.entity.alive || self.entity.locks_movement() {
            return false;
        }
        self.entity.velocity.y = impulse;
        self.jumping = true;
        true
    }

    /// Spawn a hit volume in front of the player. Refused while a
    /// movement-locking clip plays, so at most one volume exists at a time.
    pub fn attack(&mut self, id: VolumeId, reach: f32, half_extents: Vec2) -> Option<HitVolume> {
        if !self.entity.alive || self.entity.locks_movement() {
            return None;
        }
        let offset = Vec2::new(self.entity.facing.sign() * reach, 0.0);
        let volume = HitVolume {
            id,
            bounds: Aabb::new(self.entity.position() + offset, half_extents),
        };
        self.attacking = true;
        self.attack_volume = Some(volume);
        self.entity.velocity.x = 0.0;
        self.entity.play(ClipKind::Attack);
        Some(volume)
    }

    pub fn kill(&mut self) -> bool {
        self.entity.kill()
    }

    pub fn tick(&mut self) -> Option<PlayerEvent> {
        if self.entity.alive && !self.entity.locks_movement() {
            self.entity.velocity.x = f32::from(self.horizontal_input) * self.speed;
        }

        match self.update_animation().as_deref() {
            Some("jump") => {
                self.jumping = false;
                None
            }
            Some("attack") => {
                self.attacking = false;
                self.attack_volume
                    .take()
                    .map(|volume| PlayerEvent::AttackFinished(volume.id))
            }
            Some("die") => {
                self.entity.play(ClipKind::Dead);
                Some(PlayerEvent::DeathComplete)
            }
            _ => None,
        }
    }
}

impl Animated for Player {
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
        } else if self.jumping && self.entity.velocity.y != 0.0 {
            ClipKind::Jump
        } else if self.entity.velocity.x == 0.0 {
            let current = self.entity.active_kind();
            if current != ClipKind::Idle && !self.entity.locks_movement() {
                self.entity.rewind(current);
            }
            ClipKind::Idle
        } else {
            ClipKind::Walk
        };
        self.entity.play(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ClipLibrary, PlaceholderLoader, PLAYER};
    use raven_core::animation::{ClipCatalog, Facing};

    fn player() -> Player {
        let library = ClipLibrary::build(&ClipCatalog::builtin(), &mut PlaceholderLoader::default())
            .expect("library builds");
        Player::new(
            Aabb::new(Vec2::new(100.0, 50.0), Vec2::new(9.0, 18.0)),
            library.instantiate(PLAYER).expect("player clips"),
            5.0,
        )
    }

    #[test]
    fn input_drives_velocity_and_walk_clip() {
        let mut p = player();
        p.set_horizontal_input(-4);
        assert_eq!(p.horizontal_input, -1);
        p.tick();
        assert_eq!(p.entity.velocity.x, -5.0);
        assert_eq!(p.entity.facing, Facing::Left);
        assert_eq!(p.entity.active_kind(), ClipKind::Walk);

        p.set_horizontal_input(0);
        p.tick();
        assert_eq!(p.entity.velocity.x, 0.0);
        assert_eq!(p.entity.facing, Facing::Left);
        assert_eq!(p.entity.active_kind(), ClipKind::Idle);
        assert_eq!(p.entity.clip(ClipKind::Walk).frame_index(), 0);
    }

    #[test]
    fn second_attack_while_attacking_returns_none() {
        let mut p = player();
        let first = p.attack(VolumeId(1), 24.0, Vec2::new(18.0, 20.0));
        let volume = first.expect("first attack spawns a volume");
        assert_eq!(volume.bounds.center, Vec2::new(124.0, 50.0));
        assert!(p.attack(VolumeId(2), 24.0, Vec2::new(18.0, 20.0)).is_none());
        assert_eq!(p.attack_volume().map(|v| v.id), Some(VolumeId(1)));
    }

    #[test]
    fn attack_and_jump_share_the_movement_lock() {
        let mut p = player();
        assert!(p.attack(VolumeId(1), 24.0, Vec2::new(18.0, 20.0)).is_some());
        for _ in 0..20 {
            p.tick();
        }
        assert!(p.entity.locks_movement());
        assert!(p.attack(VolumeId(2), 24.0, Vec2::new(18.0, 20.0)).is_none());
        assert!(!p.jump(true, 20.0));
        assert_eq!(p.attack_volume().map(|v| v.id), Some(VolumeId(1)));
    }

    #[test]
    fn attack_faces_the_current_direction() {
        let mut p = player();
        p.entity.facing = Facing::Left;
        let volume = p
            .attack(VolumeId(7), 24.0, Vec2::new(18.0, 20.0))
            .expect("attack spawns");
        assert_eq!(volume.bounds.center, Vec2::new(76.0, 50.0));
    }

    #[test]
    fn attack_locks_movement_until_finished() {
        let mut p = player();
        p.attack(VolumeId(3), 24.0, Vec2::new(18.0, 20.0));
        p.set_horizontal_input(1);
        let mut finished_at = None;
        for tick in 1..=60 {
            if let Some(event) = p.tick() {
                assert_eq!(event, PlayerEvent::AttackFinished(VolumeId(3)));
                finished_at = Some(tick);
                break;
            }
            assert_eq!(p.entity.velocity.x, 0.0);
        }
        // 4 frames x 10 ticks.
        assert_eq!(finished_at, Some(40));
        assert!(!p.attacking);
        assert!(p.attack_volume().is_none());

        p.tick();
        assert_eq!(p.entity.velocity.x, 5.0);
        assert!(p.attack(VolumeId(4), 24.0, Vec2::new(18.0, 20.0)).is_some());
    }

    #[test]
    fn jump_requires_ground() {
        let mut p = player();
        assert!(!p.jump(false, 20.0));
        assert_eq!(p.entity.velocity.y, 0.0);
        assert!(p.jump(true, 20.0));
        assert!(p.jumping);
        assert_eq!(p.entity.velocity.y, 20.0);
        p.tick();
        assert_eq!(p.entity.active_kind(), ClipKind::Jump);
    }

    #[test]
    fn death_completes_once_and_holds_dead_clip() {
        let mut p = player();
        p.set_horizontal_input(1);
        assert!(p.kill());
        assert!(!p.jump(true, 20.0));
        assert!(p.attack(VolumeId(1), 24.0, Vec2::ONE).is_none());

        let mut completions = Vec::new();
        for tick in 1..=200 {
            if let Some(event) = p.tick() {
                completions.push((tick, event));
            }
            assert_eq!(p.entity.velocity.x, 0.0);
        }
        // 9 frames x 5 ticks.
        assert_eq!(completions, vec![(45, PlayerEvent::DeathComplete)]);
        assert_eq!(p.entity.active_kind(), ClipKind::Dead);
    }
}
