//! One playable level: owns every entity, the static grid, the sound board
//! and the camera, and advances them in a fixed order each tick.
//!
//! Tick order (later steps read what earlier steps wrote):
//!  1. player physics (gravity, grid and platform collision, grounded)
//!  2. moving objects: platforms (carrying a supported player), enemies
//!  3. artifact and portal
//!  4. player; a finished death resets the level and ends the tick
//!  5. enemy vision and contact (aggro, enemy attack, player death)
//!  6. player hit volumes against unaware stalkers
//!  7. portal contact (win)
//!  8. video overlay once ended, 9. noise overlay
//! 10. camera follow and shake
//!
//! Reset rebuilds the whole state from the level file and the prebuilt clip
//! library; there is no partial rollback.

use glam::{IVec2, Vec2};
use raven_core::animation::ClipCatalog;

use crate::assets::{ClipLibrary, ImageLoader, Texture, ARTIFACT, NOISE, PLAYER, PORTAL, VIDEO};
use crate::camera::CameraRig;
use crate::collision::{Aabb, CollisionGrid};
use crate::config::GameConfig;
use crate::controls::Action;
use crate::enemy::{Enemy, EnemyKind, EnemyTuning, VisionProbe};
use crate::entity::{HitVolume, VolumeId};
use crate::interactable::{Artifact, NoiseOverlay, Portal, VideoOverlay};
use crate::level_file::{validate_level, LevelFile};
use crate::patrol::{Oscillator, PatrolBehavior};
use crate::physics::{PhysicsConfig, PlatformerPhysics};
use crate::platform::MovingPlatform;
use crate::player::{Player, PlayerEvent};
use crate::sound::{Cue, SoundBoard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteLayer {
    Props,
    Enemies,
    Player,
}

/// One world-space sprite to draw this frame, centred on `position`.
#[derive(Debug, Clone, Copy)]
pub struct SpriteView<'a> {
    pub layer: SpriteLayer,
    pub texture: &'a Texture,
    pub position: Vec2,
    pub size: Vec2,
}

impl<'a> SpriteView<'a> {
    fn new(layer: SpriteLayer, texture: &'a Texture, position: Vec2) -> Self {
        let (w, h) = texture.display_size();
        Self {
            layer,
            texture,
            position,
            size: Vec2::new(w, h),
        }
    }
}

/// Screen-space overlays for this frame.
#[derive(Debug, Clone, Copy)]
pub struct HudView<'a> {
    pub blood: bool,
    pub hint: bool,
    pub video: Option<&'a Texture>,
    pub noise: &'a Texture,
}

struct LevelState {
    player: Player,
    physics: PlatformerPhysics,
    platforms: Vec<MovingPlatform>,
    enemies: Vec<Enemy>,
    artifact: Artifact,
    portal: Portal,
    video: VideoOverlay,
    noise: NoiseOverlay,
    hit_volumes: Vec<HitVolume>,
    next_volume: u32,
    ended: bool,
    hint_active: bool,
    camera: CameraRig,
}

pub struct Level {
    config: GameConfig,
    source: LevelFile,
    library: ClipLibrary,
    grid: CollisionGrid,
    sounds: SoundBoard,
    state: LevelState,
    resets: u32,
    ticks: u64,
}

impl Level {
    pub fn new(
        config: GameConfig,
        source: LevelFile,
        catalog: &ClipCatalog,
        loader: &mut dyn ImageLoader,
        sounds: SoundBoard,
    ) -> Result<Self, String> {
        let library = ClipLibrary::build(catalog, loader)?;
        Self::with_library(config, source, library, sounds)
    }

    pub fn with_library(
        config: GameConfig,
        source: LevelFile,
        library: ClipLibrary,
        mut sounds: SoundBoard,
    ) -> Result<Self, String> {
        validate_level(&source)?;
        let grid = CollisionGrid::from_file(source.collision.clone());
        let state = build_state(&config, &source, &library)?;
        sounds.play(Cue::Background, true);
        log::info!(
            "Level '{}' loaded: {} platforms, {} enemies, {} solid cells",
            source.level_id,
            source.platforms.len(),
            source.enemies.len(),
            grid.solid_count()
        );
        Ok(Self {
            config,
            source,
            library,
            grid,
            sounds,
            state,
            resets: 0,
            ticks: 0,
        })
    }

    pub fn level_id(&self) -> &str {
        &self.source.level_id
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.state.enemies
    }

    pub fn platforms(&self) -> &[MovingPlatform] {
        &self.state.platforms
    }

    pub fn artifact(&self) -> &Artifact {
        &self.state.artifact
    }

    pub fn portal(&self) -> &Portal {
        &self.state.portal
    }

    pub fn hit_volumes(&self) -> &[HitVolume] {
        &self.state.hit_volumes
    }

    pub fn camera(&self) -> &CameraRig {
        &self.state.camera
    }

    pub fn is_grounded(&self) -> bool {
        self.state.physics.grounded
    }

    pub fn is_ended(&self) -> bool {
        self.state.ended
    }

    pub fn hint_active(&self) -> bool {
        self.state.hint_active
    }

    /// Resets survive resets; everything else is rebuilt.
    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, dt: f32) {
        self.ticks += 1;
        self.step_bodies();

        match self.state.player.tick() {
            Some(PlayerEvent::DeathComplete) => {
                log::info!("Player death finished; resetting level");
                self.reset();
                return;
            }
            Some(PlayerEvent::AttackFinished(id)) => {
                self.state.hit_volumes.retain(|volume| volume.id != id);
            }
            None => {}
        }

        self.resolve_enemy_contacts();
        self.resolve_player_hits();
        self.resolve_portal();

        let state = &mut self.state;
        if state.ended {
            state.video.tick();
        }
        state.noise.tick();
        let target = state.player.entity.position();
        state.camera.update(target, dt);
    }

    /// Apply a pressed action. Returns the hit volume an accepted attack
    /// spawned.
    pub fn on_activate_input(&mut self, action: Action) -> Option<HitVolume> {
        match action {
            Action::MoveLeft | Action::MoveRight => {
                let direction = if action == Action::MoveLeft { -1 } else { 1 };
                self.state.player.set_horizontal_input(direction);
                if self.state.player.is_alive() {
                    self.sounds.play(Cue::PlayerWalk, true);
                }
                None
            }
            Action::Jump => {
                let grounded = self.state.physics.can_jump();
                if self.state.player.jump(grounded, self.config.jump_speed) {
                    self.sounds.play(Cue::PlayerJump, false);
                }
                None
            }
            Action::Attack => {
                let state = &mut self.state;
                let id = VolumeId(state.next_volume);
                let reach = self.config.attack_reach;
                let volume = state.player.attack(id, reach, self.config.attack_half())?;
                state.next_volume += 1;
                state.hit_volumes.push(volume);
                self.sounds.play(Cue::PlayerAttack, false);
                Some(volume)
            }
            Action::Interact => {
                self.try_interact();
                None
            }
            Action::ToggleHint => {
                self.state.hint_active = !self.state.hint_active;
                None
            }
            Action::Reset => {
                self.reset();
                None
            }
        }
    }

    /// Only movement reacts to release: letting go of the direction the
    /// player is moving in stops them.
    pub fn on_release_input(&mut self, action: Action) {
        let released = match action {
            Action::MoveLeft => -1,
            Action::MoveRight => 1,
            _ => return,
        };
        if self.state.player.horizontal_input == released {
            self.state.player.set_horizontal_input(0);
            self.sounds.stop(Cue::PlayerWalk);
        }
    }

    pub fn reset(&mut self) {
        self.sounds.stop_all();
        match build_state(&self.config, &self.source, &self.library) {
            Ok(state) => {
                self.state = state;
                self.resets += 1;
                log::info!("Level '{}' reset (#{})", self.source.level_id, self.resets);
            }
            Err(e) => log::error!("Level reset failed, keeping current state: {e}"),
        }
        self.sounds.play(Cue::Background, true);
    }

    /// World-space sprites, back to front.
    pub fn sprites(&self) -> Vec<SpriteView<'_>> {
        let state = &self.state;
        let mut sprites = vec![
            SpriteView::new(
                SpriteLayer::Props,
                state.artifact.entity.frame(),
                state.artifact.entity.position(),
            ),
            SpriteView::new(
                SpriteLayer::Props,
                state.portal.entity.frame(),
                state.portal.entity.position(),
            ),
        ];
        sprites.extend(
            state
                .enemies
                .iter()
                .filter(|enemy| !enemy.is_removed())
                .map(|enemy| {
                    SpriteView::new(SpriteLayer::Enemies, enemy.entity.frame(), enemy.entity.position())
                }),
        );
        sprites.push(SpriteView::new(
            SpriteLayer::Player,
            state.player.entity.frame(),
            state.player.entity.position(),
        ));
        sprites
    }

    pub fn hud(&self) -> HudView<'_> {
        let state = &self.state;
        let alive = state.player.is_alive();
        HudView {
            blood: !alive,
            hint: state.hint_active && alive,
            video: state.ended.then(|| state.video.entity.frame()),
            noise: state.noise.entity.frame(),
        }
    }

    fn step_bodies(&mut self) {
        let state = &mut self.state;
        let player = &mut state.player.entity;
        state
            .physics
            .step(&mut player.body, &mut player.velocity, &self.grid, &state.platforms);

        for (index, platform) in state.platforms.iter_mut().enumerate() {
            let delta = platform.patrol();
            if state.physics.support == Some(index) {
                player.body.center += delta;
            }
        }
        for enemy in state.enemies.iter_mut().filter(|e| !e.is_removed()) {
            enemy.tick(&mut self.sounds);
        }

        state.artifact.tick();
        state.portal.tick();
    }

    fn resolve_enemy_contacts(&mut self) {
        let state = &mut self.state;
        let player_body = state.player.entity.body;
        for enemy in state.enemies.iter_mut().filter(|e| !e.is_removed()) {
            let spotted = enemy
                .vision()
                .is_some_and(|vision| vision.overlaps(&player_body));
            if spotted && !enemy.aggro && enemy.is_alive() {
                enemy.aggro(&mut self.sounds);
                enemy.turn_toward(player_body.center.x);
            } else if enemy.is_alive()
                && enemy.can_attack
                && state.player.is_alive()
                && enemy.entity.body.overlaps(&player_body)
            {
                enemy.attack(&mut self.sounds);
                if state.player.kill() {
                    state.camera.shake.start();
                    log::info!("Player killed by {:?}", enemy.kind());
                }
            }
        }
    }

    fn resolve_player_hits(&mut self) {
        let state = &mut self.state;
        for volume in &state.hit_volumes {
            for enemy in state.enemies.iter_mut() {
                if enemy.kind() == EnemyKind::Stalker
                    && !enemy.aggro
                    && enemy.is_alive()
                    && volume.bounds.overlaps(&enemy.entity.body)
                    && enemy.kill()
                {
                    self.sounds.play(Cue::EnemyDie, false);
                }
            }
        }
    }

    fn resolve_portal(&mut self) {
        let state = &mut self.state;
        if !state.portal.is_active() || !state.player.entity.body.overlaps(&state.portal.entity.body) {
            return;
        }
        if !state.ended {
            log::info!("Level '{}' complete", self.source.level_id);
        }
        state.ended = true;
        if !state.video.is_active() {
            self.sounds.play(Cue::Win, false);
        }
    }

    /// The artifact can be taken once every stalker is dead.
    fn try_interact(&mut self) -> bool {
        let state = &mut self.state;
        if !state.player.is_alive() || !state.player.entity.body.overlaps(&state.artifact.entity.body) {
            return false;
        }
        let stalkers_left = state
            .enemies
            .iter()
            .filter(|enemy| enemy.kind() == EnemyKind::Stalker && enemy.is_alive())
            .count();
        if stalkers_left > 0 {
            log::debug!("Artifact sealed: {stalkers_left} stalker(s) still alive");
            return false;
        }
        if !state.artifact.activate() {
            return false;
        }
        state.portal.activate();
        state.camera.shake.start();
        self.sounds.play(Cue::ArtifactActivate, false);
        log::info!("Artifact activated; portal open");
        true
    }
}

fn build_state(config: &GameConfig, source: &LevelFile, library: &ClipLibrary) -> Result<LevelState, String> {
    let start = Vec2::from(source.player_start);
    let player = Player::new(
        Aabb::new(start, config.player_half()),
        library.instantiate(PLAYER)?,
        config.player_speed,
    );

    let platforms = source
        .platforms
        .iter()
        .map(|spawn| {
            MovingPlatform::new(
                Aabb::new(Vec2::new(spawn.x, spawn.y), Vec2::new(spawn.w, spawn.h) * 0.5),
                spawn.speed,
                spawn.direction_vec(),
                spawn.range,
            )
        })
        .collect();

    let tuning = EnemyTuning::from(config);
    let mut enemies = Vec::with_capacity(source.enemies.len());
    for spawn in &source.enemies {
        let kind = spawn.resolved_kind();
        let center = Vec2::new(spawn.x, spawn.y);
        enemies.push(Enemy::new(
            kind,
            Aabb::new(center, config.enemy_half()),
            library.instantiate(kind.clip_family())?,
            Oscillator::new(center, spawn.speed, IVec2::new(spawn.direction, 0), spawn.range),
            tuning,
        ));
    }

    let prop_half = config.interactable_half();
    let viewport = config.viewport();
    let screen = Aabb::new(viewport * 0.5, viewport * 0.5);

    let mut camera = CameraRig::new(
        Vec2::new(source.width, source.height),
        viewport,
        config.follow_half_life,
        config.shake,
    );
    camera.snap_to(start);

    Ok(LevelState {
        player,
        physics: PlatformerPhysics::new(PhysicsConfig::from(config)),
        platforms,
        enemies,
        artifact: Artifact::new(
            Aabb::new(source.artifact.into(), prop_half),
            library.instantiate(ARTIFACT)?,
        ),
        portal: Portal::new(
            Aabb::new(source.portal.into(), prop_half),
            library.instantiate(PORTAL)?,
        ),
        video: VideoOverlay::new(screen, library.instantiate(VIDEO)?),
        noise: NoiseOverlay::new(screen, library.instantiate(NOISE)?),
        hit_volumes: Vec::new(),
        next_volume: 0,
        ended: false,
        hint_active: true,
        camera,
    })
}
