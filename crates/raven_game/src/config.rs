//! Tunable game constants, loadable from JSON. Every field has a default, so
//! an empty object (or no file at all) yields the shipped tuning.
//!
//! Velocities are in pixels per tick; the level advances one fixed tick at a
//! time and never scales gameplay motion by the frame delta.

use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default = "default_player_speed")]
    pub player_speed: f32,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_jump_speed")]
    pub jump_speed: f32,
    #[serde(default = "default_max_fall_speed")]
    pub max_fall_speed: f32,
    /// Seconds for the camera to close half the distance to the player.
    #[serde(default = "default_follow_half_life")]
    pub follow_half_life: f32,
    #[serde(default = "default_aggro_speed_multiplier")]
    pub aggro_speed_multiplier: f32,
    #[serde(default = "default_vision_reach")]
    pub vision_reach: f32,
    #[serde(default = "default_vision_half_extents")]
    pub vision_half_extents: [f32; 2],
    #[serde(default = "default_attack_reach")]
    pub attack_reach: f32,
    #[serde(default = "default_attack_half_extents")]
    pub attack_half_extents: [f32; 2],
    #[serde(default = "default_player_half_extents")]
    pub player_half_extents: [f32; 2],
    #[serde(default = "default_enemy_half_extents")]
    pub enemy_half_extents: [f32; 2],
    #[serde(default = "default_interactable_half_extents")]
    pub interactable_half_extents: [f32; 2],
    /// How far below a platform's top a falling body may be and still land.
    #[serde(default = "default_landing_tolerance")]
    pub landing_tolerance: f32,
    #[serde(default)]
    pub shake: ShakeConfig,
    #[serde(default = "default_asset_root")]
    pub asset_root: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ShakeConfig {
    #[serde(default = "default_shake_amplitude")]
    pub max_amplitude: f32,
    #[serde(default = "default_shake_acceleration")]
    pub acceleration_duration: f32,
    #[serde(default = "default_shake_falloff")]
    pub falloff_time: f32,
    #[serde(default = "default_shake_frequency")]
    pub frequency: f32,
}

impl GameConfig {
    pub fn vision_half(&self) -> Vec2 {
        Vec2::from(self.vision_half_extents)
    }

    pub fn attack_half(&self) -> Vec2 {
        Vec2::from(self.attack_half_extents)
    }

    pub fn player_half(&self) -> Vec2 {
        Vec2::from(self.player_half_extents)
    }

    pub fn enemy_half(&self) -> Vec2 {
        Vec2::from(self.enemy_half_extents)
    }

    pub fn interactable_half(&self) -> Vec2 {
        Vec2::from(self.interactable_half_extents)
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.window.width as f32, self.window.height as f32)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            player_speed: default_player_speed(),
            gravity: default_gravity(),
            jump_speed: default_jump_speed(),
            max_fall_speed: default_max_fall_speed(),
            follow_half_life: default_follow_half_life(),
            aggro_speed_multiplier: default_aggro_speed_multiplier(),
            vision_reach: default_vision_reach(),
            vision_half_extents: default_vision_half_extents(),
            attack_reach: default_attack_reach(),
            attack_half_extents: default_attack_half_extents(),
            player_half_extents: default_player_half_extents(),
            enemy_half_extents: default_enemy_half_extents(),
            interactable_half_extents: default_interactable_half_extents(),
            landing_tolerance: default_landing_tolerance(),
            shake: ShakeConfig::default(),
            asset_root: default_asset_root(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            max_amplitude: default_shake_amplitude(),
            acceleration_duration: default_shake_acceleration(),
            falloff_time: default_shake_falloff(),
            frequency: default_shake_frequency(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.window.width == 0 || config.window.height == 0 {
        return Err("Config validation failed: window size must be > 0".to_string());
    }
    if config.gravity < 0.0 {
        return Err("Config validation failed: gravity must be >= 0".to_string());
    }
    if config.max_fall_speed <= 0.0 {
        return Err("Config validation failed: max_fall_speed must be > 0".to_string());
    }
    if config.follow_half_life <= 0.0 {
        return Err("Config validation failed: follow_half_life must be > 0".to_string());
    }
    let extents = [
        ("vision_half_extents", config.vision_half_extents),
        ("attack_half_extents", config.attack_half_extents),
        ("player_half_extents", config.player_half_extents),
        ("enemy_half_extents", config.enemy_half_extents),
        ("interactable_half_extents", config.interactable_half_extents),
    ];
    for (name, [w, h]) in extents {
        if w <= 0.0 || h <= 0.0 {
            return Err(format!("Config validation failed: {name} must be > 0"));
        }
    }
    if config.shake.falloff_time <= 0.0 {
        return Err("Config validation failed: shake.falloff_time must be > 0".to_string());
    }
    Ok(())
}

fn default_title() -> String {
    "The Desert Raven".to_string()
}

const fn default_width() -> u32 {
    1280
}

const fn default_height() -> u32 {
    720
}

const fn default_player_speed() -> f32 {
    5.0
}

const fn default_gravity() -> f32 {
    1.0
}

const fn default_jump_speed() -> f32 {
    20.0
}

const fn default_max_fall_speed() -> f32 {
    30.0
}

const fn default_follow_half_life() -> f32 {
    0.3
}

const fn default_aggro_speed_multiplier() -> f32 {
    3.0
}

const fn default_vision_reach() -> f32 {
    108.0
}

const fn default_vision_half_extents() -> [f32; 2] {
    [54.0, 40.0]
}

const fn default_attack_reach() -> f32 {
    24.0
}

const fn default_attack_half_extents() -> [f32; 2] {
    [18.0, 20.0]
}

const fn default_player_half_extents() -> [f32; 2] {
    [9.0, 18.0]
}

const fn default_enemy_half_extents() -> [f32; 2] {
    [14.0, 22.0]
}

const fn default_interactable_half_extents() -> [f32; 2] {
    [20.0, 30.0]
}

const fn default_landing_tolerance() -> f32 {
    6.0
}

const fn default_shake_amplitude() -> f32 {
    20.0
}

const fn default_shake_acceleration() -> f32 {
    0.2
}

const fn default_shake_falloff() -> f32 {
    1.0
}

const fn default_shake_frequency() -> f32 {
    10.0
}

fn default_asset_root() -> String {
    "assets".to_string()
}
