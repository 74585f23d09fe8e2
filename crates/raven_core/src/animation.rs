//! Directional frame clips and deterministic per-tick playback.
//!
//! A clip is a sequence of logical frames, each stored as a precomputed
//! `[face-right, face-left]` pair so that picking an orientation at draw time
//! is a plain index. Playback is tick-counted: every logical frame is shown
//! for `frames_per_image` ticks, so a full cycle is `frames_per_image * N`
//! calls to [`Clip::advance`].
//!
//! Clips either loop forever or halt at the end. A halting clip reports a
//! one-shot [`ClipStep::Finished`] carrying its name on the tick it wraps;
//! callers treat that as a completion event and move the owner off the clip.
//!
//! Clip definitions live in a [`ClipCatalog`] (entity id -> clip kind -> spec).
//! The catalog can be loaded from JSON or taken from [`ClipCatalog::builtin`].

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Which way an entity is looking. Indexes the frame pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn index(self) -> usize {
        match self {
            Self::Right => 0,
            Self::Left => 1,
        }
    }

    /// Unit sign along x: `1.0` for right, `-1.0` for left.
    pub fn sign(self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}

/// Named slot a clip fills on an entity.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClipKind {
    Idle,
    Walk,
    Run,
    Jump,
    Attack,
    Die,
    Dead,
    Exposure,
    Active,
    Consumed,
    Final,
}

impl ClipKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Attack => "attack",
            Self::Die => "die",
            Self::Dead => "dead",
            Self::Exposure => "exposure",
            Self::Active => "active",
            Self::Consumed => "consumed",
            Self::Final => "final",
        }
    }
}

impl std::fmt::Display for ClipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Authoring description of one clip.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClipSpec {
    /// Path pattern; `{}` is replaced by the 1-based frame number.
    pub frames: String,
    pub count: u32,
    #[serde(default = "default_frames_per_image")]
    pub frames_per_image: u32,
    /// Source art faces left, so its mirror becomes the right-facing frame.
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub locks_movement: bool,
    #[serde(default)]
    pub halt_at_end: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_upscale")]
    pub upscale: f32,
}

impl ClipSpec {
    pub fn new(frames: &str, count: u32, frames_per_image: u32) -> Self {
        Self {
            frames: frames.to_string(),
            count,
            frames_per_image,
            reverse: false,
            locks_movement: false,
            halt_at_end: false,
            name: None,
            upscale: default_upscale(),
        }
    }

    pub fn halting(mut self, name: &str) -> Self {
        self.halt_at_end = true;
        self.name = Some(name.to_string());
        self
    }

    pub fn locking(mut self) -> Self {
        self.locks_movement = true;
        self
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn upscaled(mut self, upscale: f32) -> Self {
        self.upscale = upscale;
        self
    }

    /// Expand the path pattern into one path per logical frame.
    pub fn frame_paths(&self) -> Vec<String> {
        (1..=self.count)
            .map(|i| self.frames.replace("{}", &i.to_string()))
            .collect()
    }
}

/// Result of one [`Clip::advance`] call.
#[derive(Debug, PartialEq)]
pub enum ClipStep<'a, T> {
    Frame(&'a [T; 2]),
    /// A halting clip wrapped. Carries the clip's name, if it has one.
    Finished(Option<&'a str>),
}

/// Runtime clip: frame pairs plus playback cursor.
#[derive(Debug, Clone)]
pub struct Clip<T> {
    frames: Vec<[T; 2]>,
    frames_per_image: u32,
    halt_at_end: bool,
    locks_movement: bool,
    name: Option<String>,
    frame_index: u32,
}

impl<T> Clip<T> {
    /// Build a clip from already-loaded frame pairs (`[right, left]`).
    pub fn from_frames(spec: &ClipSpec, frames: Vec<[T; 2]>) -> Result<Self, String> {
        if frames.is_empty() {
            return Err(format!("Clip '{}' has no frames", spec.frames));
        }
        if spec.frames_per_image == 0 {
            return Err(format!(
                "Clip '{}' has frames_per_image of zero",
                spec.frames
            ));
        }
        Ok(Self {
            frames,
            frames_per_image: spec.frames_per_image,
            halt_at_end: spec.halt_at_end,
            locks_movement: spec.locks_movement,
            name: spec.name.clone(),
            frame_index: 0,
        })
    }

    /// Number of ticks in one full playthrough.
    pub fn cycle_len(&self) -> u32 {
        self.frames_per_image * self.frames.len() as u32
    }

    pub fn advance(&mut self) -> ClipStep<'_, T> {
        self.frame_index += 1;
        if self.frame_index >= self.cycle_len() {
            self.frame_index = 0;
            if self.halt_at_end {
                return ClipStep::Finished(self.name.as_deref());
            }
        }
        ClipStep::Frame(&self.frames[(self.frame_index / self.frames_per_image) as usize])
    }

    pub fn current_frame(&self) -> &[T; 2] {
        &self.frames[(self.frame_index / self.frames_per_image) as usize]
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn locks_movement(&self) -> bool {
        self.locks_movement
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// The fixed set of clips an entity owns. Idle is mandatory; looking up a
/// kind the entity does not have yields idle.
#[derive(Debug, Clone)]
pub struct ClipSet<T> {
    idle: Clip<T>,
    others: HashMap<ClipKind, Clip<T>>,
}

impl<T> ClipSet<T> {
    pub fn new(idle: Clip<T>) -> Self {
        Self {
            idle,
            others: HashMap::new(),
        }
    }

    pub fn insert(&mut self, kind: ClipKind, clip: Clip<T>) {
        if kind == ClipKind::Idle {
            self.idle = clip;
        } else {
            self.others.insert(kind, clip);
        }
    }

    pub fn contains(&self, kind: ClipKind) -> bool {
        kind == ClipKind::Idle || self.others.contains_key(&kind)
    }

    pub fn get(&self, kind: ClipKind) -> &Clip<T> {
        self.others.get(&kind).unwrap_or(&self.idle)
    }

    pub fn get_mut(&mut self, kind: ClipKind) -> &mut Clip<T> {
        self.others.get_mut(&kind).unwrap_or(&mut self.idle)
    }
}

/// Clip definitions for every entity family, keyed by entity id.
#[derive(Debug, Clone)]
pub struct ClipCatalog {
    pub version: String,
    pub entities: HashMap<String, HashMap<ClipKind, ClipSpec>>,
}

impl ClipCatalog {
    pub fn entity(&self, id: &str) -> Option<&HashMap<ClipKind, ClipSpec>> {
        self.entities.get(id)
    }

    /// The shipped art set.
    pub fn builtin() -> Self {
        let mut entities = HashMap::new();

        entities.insert(
            "player".to_string(),
            HashMap::from([
                (ClipKind::Idle, ClipSpec::new("sprites/player/{}.png", 1, 5)),
                (ClipKind::Walk, ClipSpec::new("sprites/player/{}.png", 8, 5)),
                (
                    ClipKind::Jump,
                    ClipSpec::new("sprites/player/jump/jump{}.png", 6, 10).halting("jump"),
                ),
                (
                    ClipKind::Attack,
                    ClipSpec::new("sprites/player/player_attack/player_attack{}.png", 4, 10)
                        .locking()
                        .halting("attack"),
                ),
                (
                    ClipKind::Die,
                    ClipSpec::new("sprites/player/player_die/player_die{}.png", 9, 5)
                        .locking()
                        .halting("die"),
                ),
                (
                    ClipKind::Dead,
                    ClipSpec::new("sprites/player/player_die/player_die9.png", 1, 5).locking(),
                ),
            ]),
        );

        // Stalker art is drawn facing left.
        entities.insert(
            "stalker".to_string(),
            HashMap::from([
                (
                    ClipKind::Idle,
                    ClipSpec::new("sprites/mob1/idle/mob2_walk{}.png", 2, 10).reversed(true),
                ),
                (
                    ClipKind::Walk,
                    ClipSpec::new("sprites/mob1/idle/mob2_walk{}.png", 2, 10).reversed(true),
                ),
                (
                    ClipKind::Attack,
                    ClipSpec::new("sprites/mob1/attack/mob2_a{}.png", 5, 5)
                        .reversed(true)
                        .locking()
                        .halting("attack"),
                ),
                (
                    ClipKind::Die,
                    ClipSpec::new("sprites/mob1/mob1_die/mob1_die{}.png", 9, 10)
                        .reversed(true)
                        .locking()
                        .halting("die"),
                ),
                (
                    ClipKind::Exposure,
                    ClipSpec::new("sprites/mob1/exposure/mob2_e{}.png", 10, 7)
                        .reversed(true)
                        .locking()
                        .halting("exposure"),
                ),
                (
                    ClipKind::Run,
                    ClipSpec::new("sprites/mob1/run/mob2_run{}.png", 2, 5).reversed(true),
                ),
            ]),
        );

        entities.insert(
            "guardian".to_string(),
            HashMap::from([
                (
                    ClipKind::Idle,
                    ClipSpec::new("sprites/mob2/idle/mob2_s{}.png", 4, 10),
                ),
                (
                    ClipKind::Attack,
                    ClipSpec::new("sprites/mob2/attack/mob2_a{}.png", 5, 5)
                        .locking()
                        .halting("attack"),
                ),
            ]),
        );

        entities.insert(
            "artifact".to_string(),
            HashMap::from([
                (
                    ClipKind::Idle,
                    ClipSpec::new("sprites/artifact/idle/artifact1_{}.png", 6, 10),
                ),
                (
                    ClipKind::Active,
                    ClipSpec::new("sprites/artifact/active/artifact2_{}.png", 16, 7)
                        .halting("active"),
                ),
                (ClipKind::Consumed, ClipSpec::new("sprites/block.png", 1, 5)),
            ]),
        );

        entities.insert(
            "portal".to_string(),
            HashMap::from([
                (ClipKind::Idle, ClipSpec::new("sprites/block.png", 1, 100)),
                (ClipKind::Active, ClipSpec::new("sprites/portal/p_{}.png", 9, 7)),
            ]),
        );

        entities.insert(
            "video".to_string(),
            HashMap::from([
                (
                    ClipKind::Idle,
                    ClipSpec::new("sprites/video/video ({}).jpg", 30, 3)
                        .upscaled(2.5)
                        .halting("idle"),
                ),
                (
                    ClipKind::Final,
                    ClipSpec::new("sprites/video/video (30).jpg", 1, 3).upscaled(2.5),
                ),
            ]),
        );

        entities.insert(
            "noise".to_string(),
            HashMap::from([(
                ClipKind::Idle,
                ClipSpec::new("sprites/noise/n_{}.png", 3, 5).upscaled(2.5),
            )]),
        );

        Self {
            version: "0.1".to_string(),
            entities,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClipCatalogJson {
    version: String,
    entities: HashMap<String, HashMap<ClipKind, ClipSpec>>,
}

/// Load a clip catalog from disk.
pub fn load_clip_catalog(path: &Path) -> Result<ClipCatalog, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read clip catalog {}: {e}", path.display()))?;
    let json: ClipCatalogJson = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse clip catalog {}: {e}", path.display()))?;
    validate_catalog_json(&json)?;
    Ok(ClipCatalog {
        version: json.version,
        entities: json.entities,
    })
}

fn validate_catalog_json(json: &ClipCatalogJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Clip catalog validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.entities.is_empty() {
        return Err("Clip catalog validation failed: no entities".to_string());
    }
    for (entity, clips) in &json.entities {
        if !clips.contains_key(&ClipKind::Idle) {
            return Err(format!(
                "Clip catalog validation failed: entity '{entity}' has no idle clip"
            ));
        }
        for (kind, spec) in clips {
            if spec.count == 0 {
                return Err(format!(
                    "Clip catalog validation failed: '{entity}.{kind}' has zero frames"
                ));
            }
            if spec.frames_per_image == 0 {
                return Err(format!(
                    "Clip catalog validation failed: '{entity}.{kind}' has zero frames_per_image"
                ));
            }
            if spec.upscale <= 0.0 {
                return Err(format!(
                    "Clip catalog validation failed: '{entity}.{kind}' upscale must be > 0"
                ));
            }
            if spec.halt_at_end && spec.name.is_none() {
                log::warn!(
                    "Clip '{entity}.{kind}' halts without a name; its completion cannot be observed"
                );
            }
        }
    }
    Ok(())
}

const fn default_frames_per_image() -> u32 {
    5
}

const fn default_upscale() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "raven_clip_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn make_clip(count: u32, frames_per_image: u32, halt: Option<&str>) -> Clip<u32> {
        let mut spec = ClipSpec::new("f{}.png", count, frames_per_image);
        if let Some(name) = halt {
            spec = spec.halting(name);
        }
        let frames = (0..count).map(|i| [i, 100 + i]).collect();
        Clip::from_frames(&spec, frames).expect("valid clip")
    }

    #[test]
    fn looping_clip_wraps_without_signal() {
        let mut clip = make_clip(3, 4, None);
        for _ in 0..clip.cycle_len() {
            assert!(matches!(clip.advance(), ClipStep::Frame(_)));
        }
        assert_eq!(clip.frame_index(), 0);
    }

    #[test]
    fn halting_clip_fires_once_per_cycle() {
        let mut clip = make_clip(4, 3, Some("attack"));
        let mut fired = Vec::new();
        for tick in 1..=(clip.cycle_len() * 3) {
            let finished = match clip.advance() {
                ClipStep::Finished(name) => {
                    assert_eq!(name, Some("attack"));
                    true
                }
                ClipStep::Frame(_) => false,
            };
            if finished {
                fired.push(tick);
                assert_eq!(clip.frame_index(), 0);
            }
        }
        assert_eq!(fired, vec![12, 24, 36]);
    }

    #[test]
    fn advance_returns_post_advance_frame() {
        let mut clip = make_clip(3, 2, None);
        assert_eq!(clip.advance(), ClipStep::Frame(&[0, 100]));
        assert_eq!(clip.advance(), ClipStep::Frame(&[1, 101]));
        assert_eq!(clip.current_frame(), &[1, 101]);
        assert_eq!(clip.frame_index(), 2);
    }

    #[test]
    fn reset_rewinds_cursor() {
        let mut clip = make_clip(3, 2, None);
        clip.advance();
        clip.advance();
        clip.advance();
        clip.reset();
        assert_eq!(clip.frame_index(), 0);
        assert_eq!(clip.current_frame(), &[0, 100]);
    }

    #[test]
    fn from_frames_rejects_empty() {
        let spec = ClipSpec::new("f{}.png", 0, 5);
        let err = Clip::<u32>::from_frames(&spec, Vec::new()).expect_err("empty should fail");
        assert!(err.contains("no frames"));
    }

    #[test]
    fn clip_set_falls_back_to_idle() {
        let mut set = ClipSet::new(make_clip(1, 1, None));
        set.insert(ClipKind::Attack, make_clip(2, 1, Some("attack")));
        assert!(set.contains(ClipKind::Attack));
        assert!(!set.contains(ClipKind::Exposure));
        assert_eq!(set.get(ClipKind::Exposure).name(), None);
        assert_eq!(set.get(ClipKind::Attack).name(), Some("attack"));
        set.get_mut(ClipKind::Exposure).advance();
        assert_eq!(set.get(ClipKind::Idle).frame_index(), 0);
    }

    #[test]
    fn frame_paths_expand_pattern() {
        let spec = ClipSpec::new("sprites/run{}.png", 3, 5);
        assert_eq!(
            spec.frame_paths(),
            vec!["sprites/run1.png", "sprites/run2.png", "sprites/run3.png"]
        );
        let single = ClipSpec::new("sprites/block.png", 1, 5);
        assert_eq!(single.frame_paths(), vec!["sprites/block.png"]);
    }

    #[test]
    fn facing_flip_and_sign() {
        assert_eq!(Facing::Right.flipped(), Facing::Left);
        assert_eq!(Facing::Left.sign(), -1.0);
        assert_eq!(Facing::default(), Facing::Right);
    }

    #[test]
    fn builtin_catalog_has_idle_for_every_entity() {
        let catalog = ClipCatalog::builtin();
        for id in [
            "player", "stalker", "guardian", "artifact", "portal", "video", "noise",
        ] {
            let clips = catalog.entity(id).expect("entity present");
            assert!(clips.contains_key(&ClipKind::Idle), "{id} lacks idle");
        }
        let exposure = &catalog.entity("stalker").expect("stalker")[&ClipKind::Exposure];
        assert!(exposure.reverse && exposure.locks_movement && exposure.halt_at_end);
    }

    #[test]
    fn load_clip_catalog_parses_valid_file() {
        let path = temp_file_path("valid");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "entities": {
                "player": {
                  "idle": { "frames": "p/{}.png", "count": 2 },
                  "attack": {
                    "frames": "p/a{}.png", "count": 4, "frames_per_image": 10,
                    "locks_movement": true, "halt_at_end": true, "name": "attack"
                  }
                }
              }
            }"#,
        )
        .expect("write temp file");

        let catalog = load_clip_catalog(&path).expect("should parse");
        let player = catalog.entity("player").expect("player");
        assert_eq!(player[&ClipKind::Idle].frames_per_image, 5);
        assert_eq!(player[&ClipKind::Idle].upscale, 1.0);
        assert_eq!(player[&ClipKind::Attack].name.as_deref(), Some("attack"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_clip_catalog_rejects_missing_idle() {
        let path = temp_file_path("no_idle");
        fs::write(
            &path,
            r#"{"version":"0.1","entities":{"portal":{"active":{"frames":"p{}.png","count":9}}}}"#,
        )
        .expect("write temp file");
        let err = load_clip_catalog(&path).expect_err("missing idle should fail");
        assert!(err.contains("has no idle clip"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_clip_catalog_rejects_bad_version() {
        let path = temp_file_path("bad_version");
        fs::write(
            &path,
            r#"{"version":"9.9","entities":{"noise":{"idle":{"frames":"n{}.png","count":3}}}}"#,
        )
        .expect("write temp file");
        let err = load_clip_catalog(&path).expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_clip_catalog_rejects_zero_speed() {
        let path = temp_file_path("zero_speed");
        fs::write(
            &path,
            r#"{"version":"0.1","entities":{"noise":{"idle":{"frames":"n{}.png","count":3,"frames_per_image":0}}}}"#,
        )
        .expect("write temp file");
        let err = load_clip_catalog(&path).expect_err("zero speed should fail");
        assert!(err.contains("zero frames_per_image"));
        let _ = fs::remove_file(path);
    }
}
