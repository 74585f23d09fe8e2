//! Level authoring data. Positions are body centres in world pixels with y
//! pointing up; `width`/`height` bound the camera.

use glam::{IVec2, Vec2};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::collision::{validate_collision_file, CollisionFile};
use crate::enemy::EnemyKind;

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub width: f32,
    pub height: f32,
    pub player_start: Point,
    pub collision: CollisionFile,
    #[serde(default)]
    pub platforms: Vec<PlatformSpawn>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    pub artifact: Point,
    pub portal: Point,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlatformSpawn {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub speed: f32,
    pub direction: i32,
    pub range: f32,
    #[serde(default)]
    pub axis: Axis,
}

impl PlatformSpawn {
    pub fn direction_vec(&self) -> IVec2 {
        match self.axis {
            Axis::X => IVec2::new(self.direction, 0),
            Axis::Y => IVec2::new(0, self.direction),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub direction: i32,
    pub range: f32,
    #[serde(default)]
    pub kind: Option<EnemyKind>,
}

impl EnemySpawn {
    /// Untagged spawns that stand still are guardians; anything that patrols
    /// is a stalker.
    pub fn resolved_kind(&self) -> EnemyKind {
        match self.kind {
            Some(kind) => kind,
            None if self.direction == 0 => EnemyKind::Guardian,
            None => EnemyKind::Stalker,
        }
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level file {}: {e}", path.display()))?;
    let level: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&level)?;
    Ok(level)
}

pub(crate) fn validate_level(level: &LevelFile) -> Result<(), String> {
    if level.version != "0.1" {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            level.version
        ));
    }
    if level.width <= 0.0 || level.height <= 0.0 {
        return Err("Level validation failed: width and height must be > 0".to_string());
    }
    validate_collision_file(&level.collision)?;

    for (i, p) in level.platforms.iter().enumerate() {
        if p.w <= 0.0 || p.h <= 0.0 {
            return Err(format!(
                "Level validation failed: platform {i} must have positive size"
            ));
        }
        check_motion("platform", i, p.speed, p.direction, p.range)?;
    }
    for (i, e) in level.enemies.iter().enumerate() {
        check_motion("enemy", i, e.speed, e.direction, e.range)?;
    }
    if level.enemies.is_empty() {
        log::warn!(
            "Level '{}' has no enemies; the artifact can be taken immediately",
            level.level_id
        );
    }
    Ok(())
}

fn check_motion(what: &str, index: usize, speed: f32, direction: i32, range: f32) -> Result<(), String> {
    if !(-1..=1).contains(&direction) {
        return Err(format!(
            "Level validation failed: {what} {index} direction must be -1, 0 or 1 (got {direction})"
        ));
    }
    if speed < 0.0 || range < 0.0 {
        return Err(format!(
            "Level validation failed: {what} {index} speed and range must be >= 0"
        ));
    }
    Ok(())
}
