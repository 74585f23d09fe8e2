//! Headless runner: loads the config, level and clip catalog, then drives the
//! level through a scripted replay on the fixed-step clock and logs the
//! outcome. Set `RUST_LOG=debug` to see every sound cue.
//!
//! Usage: `raven_game [level.json] [replay.json]`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use raven_core::animation::{load_clip_catalog, ClipCatalog};
use raven_game::assets::{FsImageLoader, ImageLoader, PlaceholderLoader};
use raven_game::config::{load_config_from_path, GameConfig};
use raven_game::level::Level;
use raven_game::level_file::load_level_from_path;
use raven_game::replay::{load_replay_from_path, run_replay};
use raven_game::sound::{LogBackend, SoundBoard};

const CONFIG_PATH: &str = "assets/config.json";
const CLIPS_PATH: &str = "assets/clips.json";
const LEVEL_PATH: &str = "assets/levels/desert.json";
const REPLAY_PATH: &str = "assets/replays/demo.json";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Raven starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let level_path = args.next().map_or_else(|| PathBuf::from(LEVEL_PATH), PathBuf::from);
    let replay_path = args.next().map_or_else(|| PathBuf::from(REPLAY_PATH), PathBuf::from);

    let config = load_config()?;
    let catalog = load_catalog()?;
    let level_file = load_level_from_path(&level_path)?;
    let replay = load_replay_from_path(&replay_path)?;

    let asset_root = Path::new(&config.asset_root);
    let mut loader: Box<dyn ImageLoader> = if asset_root.join("sprites").is_dir() {
        Box::new(FsImageLoader::new(asset_root))
    } else {
        log::warn!(
            "No sprite directory under '{}'; using placeholder frames",
            asset_root.display()
        );
        Box::new(PlaceholderLoader::default())
    };
    let sounds = SoundBoard::new(Box::new(LogBackend::default()));

    let mut level = Level::new(config, level_file, &catalog, loader.as_mut(), sounds)?;
    let summary = run_replay(&mut level, &replay);

    log::info!(
        "Level '{}': player at ({:.1}, {:.1}), {} enemies alive, artifact {}, {}",
        level.level_id(),
        summary.player_position.x,
        summary.player_position.y,
        summary.enemies_alive,
        if summary.artifact_active { "active" } else { "dormant" },
        if summary.ended { "portal reached" } else { "level not finished" }
    );
    Ok(())
}

fn load_config() -> Result<GameConfig, String> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        load_config_from_path(path)
    } else {
        log::warn!("{CONFIG_PATH} not found; using default tuning");
        Ok(GameConfig::default())
    }
}

fn load_catalog() -> Result<ClipCatalog, String> {
    let path = Path::new(CLIPS_PATH);
    if path.exists() {
        load_clip_catalog(path)
    } else {
        log::info!("{CLIPS_PATH} not found; using built-in clip catalog");
        Ok(ClipCatalog::builtin())
    }
}
