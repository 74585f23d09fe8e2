use glam::Vec2;
use raven_core::input::{InputState, Key};
use raven_core::time::TimeState;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::controls::dispatch;
use crate::level::Level;

/// Scripted key input. Each frame's presses and releases land on its first
/// tick; the keys then stay as they are for `repeat` ticks.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplayFrame {
    #[serde(default)]
    pub press: Vec<Key>,
    #[serde(default)]
    pub release: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Key edges for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub press: Vec<Key>,
    pub release: Vec<Key>,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<TickInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            out.push(TickInput {
                press: frame.press.clone(),
                release: frame.release.clone(),
            });
            for _ in 1..frame.repeat.max(1) {
                out.push(TickInput::default());
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub ticks: u64,
    pub resets: u32,
    pub ended: bool,
    pub player_alive: bool,
    pub player_position: Vec2,
    pub enemies_alive: usize,
    pub artifact_active: bool,
}

impl ReplaySummary {
    pub fn of(level: &Level) -> Self {
        Self {
            ticks: level.ticks(),
            resets: level.resets(),
            ended: level.is_ended(),
            player_alive: level.player().is_alive(),
            player_position: level.player().entity.position(),
            enemies_alive: level.enemies().iter().filter(|e| e.is_alive()).count(),
            artifact_active: level.artifact().is_active(),
        }
    }
}

/// Drive `level` through the whole replay on a fixed-step clock fed with
/// exactly `fixed_dt` per frame, so runs never depend on the host clock.
pub fn run_replay(level: &mut Level, replay: &ReplaySequence) -> ReplaySummary {
    let mut time = TimeState::with_fixed_dt(f64::from(replay.fixed_dt));
    let mut input = InputState::new();

    for tick in replay.expanded_inputs() {
        for key in tick.release {
            input.key_up(key);
        }
        for key in tick.press {
            input.key_down(key);
        }

        time.feed(f64::from(replay.fixed_dt));
        while time.should_step() {
            // Edges are consumed by the first step of the frame.
            dispatch(&input, level);
            input.end_frame();
            level.tick(replay.fixed_dt);
        }
        time.end_frame();
    }

    let summary = ReplaySummary::of(level);
    log::info!(
        "Replay finished after {} ticks ({:.2}s simulated): resets={} ended={} player_alive={}",
        summary.ticks,
        time.total_time,
        summary.resets,
        summary.ended,
        summary.player_alive
    );
    summary
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_level, fixture_level};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "raven_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "press": ["right"], "repeat": 3 },
                { "press": ["space"], "release": ["right"] }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert_eq!(expanded[0].press, vec![Key::Right]);
        assert_eq!(expanded[1], TickInput::default());
        assert_eq!(expanded[3].press, vec![Key::Space]);
        assert_eq!(expanded[3].release, vec![Key::Right]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty frames should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_unknown_key() {
        let path = temp_file_path("key");
        fs::write(&path, r#"{ "frames": [ { "press": ["f13"] } ] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("unknown key should fail");
        assert!(err.contains("Failed to parse replay JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn walking_right_moves_the_player() {
        let replay = ReplaySequence {
            fixed_dt: default_dt(),
            frames: vec![
                ReplayFrame {
                    press: vec![Key::D],
                    repeat: 20,
                    ..Default::default()
                },
                ReplayFrame {
                    release: vec![Key::D],
                    repeat: 5,
                    ..Default::default()
                },
            ],
        };
        let (mut level, _) = build_level(fixture_level());
        let summary = run_replay(&mut level, &replay);
        assert_eq!(summary.ticks, 25);
        // Physics runs before the player applies input, so the 20 moves land
        // on ticks 2..=21.
        assert_eq!(summary.player_position.x, 200.0);
        assert!(level.is_grounded());
        assert!(summary.player_alive);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = ReplaySequence {
            fixed_dt: default_dt(),
            frames: vec![
                ReplayFrame {
                    press: vec![Key::Right],
                    repeat: 60,
                    ..Default::default()
                },
                ReplayFrame {
                    press: vec![Key::W, Key::Space],
                    repeat: 90,
                    ..Default::default()
                },
                ReplayFrame {
                    release: vec![Key::Right],
                    press: vec![Key::Left],
                    repeat: 45,
                },
            ],
        };

        let (mut run_a, _) = build_level(fixture_level());
        let (mut run_b, _) = build_level(fixture_level());
        let a = run_replay(&mut run_a, &replay);
        let b = run_replay(&mut run_b, &replay);
        assert_eq!(a, b);
        assert_eq!(a.ticks, 195);
    }
}
