//! Level fixtures shared by the unit tests.

use raven_core::animation::ClipCatalog;

use crate::assets::PlaceholderLoader;
use crate::config::GameConfig;
use crate::level::Level;
use crate::level_file::LevelFile;
use crate::sound::testing::{recording_board, SoundLog};

/// Flat floor along row 0, a stalker patrolling around x=500, a guardian at
/// x=800, the artifact and portal further right and one sideways platform
/// at x=1400. The player starts standing at (100, 50).
pub(crate) fn fixture_level() -> LevelFile {
    let solids: Vec<String> = (0..60)
        .map(|x| format!(r#"{{ "x": {x}, "y": 0 }}"#))
        .collect();
    let json = format!(
        r#"
        {{
          "version": "0.1",
          "level_id": "fixture",
          "width": 1920.0,
          "height": 320.0,
          "player_start": {{ "x": 100.0, "y": 50.0 }},
          "collision": {{ "cell_size": 32, "width": 60, "height": 10, "solids": [{}] }},
          "platforms": [
            {{ "x": 1400.0, "y": 100.0, "w": 96.0, "h": 16.0, "speed": 2.0, "direction": 1, "range": 40.0, "axis": "x" }}
          ],
          "enemies": [
            {{ "x": 500.0, "y": 54.0, "speed": 1.0, "direction": -1, "range": 50.0 }},
            {{ "x": 800.0, "y": 54.0, "speed": 0.0, "direction": 0, "range": 0.0 }}
          ],
          "artifact": {{ "x": 1000.0, "y": 62.0 }},
          "portal": {{ "x": 1100.0, "y": 62.0 }}
        }}
        "#,
        solids.join(", ")
    );
    serde_json::from_str(&json).expect("fixture parses")
}

pub(crate) fn build_level(file: LevelFile) -> (Level, SoundLog) {
    let (sounds, log) = recording_board();
    let level = Level::new(
        GameConfig::default(),
        file,
        &ClipCatalog::builtin(),
        &mut PlaceholderLoader::default(),
        sounds,
    )
    .expect("level builds");
    (level, log)
}
