//! Raven game core: a single side-scrolling level with a player, patrolling
//! stalkers, stationary guardians, moving platforms, an artifact and an exit
//! portal. Rendering and audio output sit behind the `sprites`/`hud` views
//! and the `SoundBackend` trait, so the whole level runs headless.

pub mod assets;
pub mod camera;
pub mod collision;
pub mod config;
pub mod controls;
pub mod enemy;
pub mod entity;
pub mod interactable;
pub mod level;
pub mod level_file;
pub mod patrol;
pub mod physics;
pub mod platform;
pub mod player;
pub mod replay;
pub mod sound;

#[cfg(test)]
mod testing;
