//! Sound cue dispatch.
//!
//! Gameplay code names cues; a [`SoundBackend`] does the actual playback.
//! [`SoundBoard`] sits between them and keeps at most one live playback per
//! cue: starting a cue that is already playing stops the old instance first.
//! The board is owned by the level, so `stop_all` on reset leaves nothing
//! dangling.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Background,
    ArtifactActivate,
    Win,
    StalkerAttack,
    GuardianAttack,
    StalkerExposure,
    StalkerRun,
    EnemyDie,
    PlayerAttack,
    PlayerWalk,
    PlayerJump,
}

impl Cue {
    pub const ALL: &'static [Cue] = &[
        Cue::Background,
        Cue::ArtifactActivate,
        Cue::Win,
        Cue::StalkerAttack,
        Cue::GuardianAttack,
        Cue::StalkerExposure,
        Cue::StalkerRun,
        Cue::EnemyDie,
        Cue::PlayerAttack,
        Cue::PlayerWalk,
        Cue::PlayerJump,
    ];

    pub fn asset_path(self) -> &'static str {
        match self {
            Self::Background => "sounds/sound_bg.mp3",
            Self::ArtifactActivate => "sounds/art_all.mp3",
            Self::Win => "sounds/end.mp3",
            Self::StalkerAttack => "sounds/mob1_a.mp3",
            Self::GuardianAttack => "sounds/mob2_a.mp3",
            Self::StalkerExposure => "sounds/mob1_roar.mp3",
            Self::StalkerRun => "sounds/mob1_run.mp3",
            Self::EnemyDie => "sounds/mob_die.mp3",
            Self::PlayerAttack => "sounds/sound_attack.mp3",
            Self::PlayerWalk => "sounds/sound_walk.mp3",
            Self::PlayerJump => "sounds/sound_jump.mp3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackId(pub u64);

pub trait SoundBackend {
    fn play(&mut self, cue: Cue, looping: bool) -> PlaybackId;
    fn stop(&mut self, playback: PlaybackId);
}

/// Backend for headless runs: every cue becomes a debug log line.
#[derive(Debug, Default)]
pub struct LogBackend {
    next_id: u64,
}

impl SoundBackend for LogBackend {
    fn play(&mut self, cue: Cue, looping: bool) -> PlaybackId {
        self.next_id += 1;
        log::debug!(
            "sound: play {:?} ({}){}",
            cue,
            cue.asset_path(),
            if looping { " [loop]" } else { "" }
        );
        PlaybackId(self.next_id)
    }

    fn stop(&mut self, playback: PlaybackId) {
        log::debug!("sound: stop #{}", playback.0);
    }
}

pub struct SoundBoard {
    backend: Box<dyn SoundBackend>,
    active: HashMap<Cue, PlaybackId>,
}

impl SoundBoard {
    pub fn new(backend: Box<dyn SoundBackend>) -> Self {
        Self {
            backend,
            active: HashMap::new(),
        }
    }

    pub fn play(&mut self, cue: Cue, looping: bool) {
        if let Some(previous) = self.active.remove(&cue) {
            self.backend.stop(previous);
        }
        let playback = self.backend.play(cue, looping);
        self.active.insert(cue, playback);
    }

    pub fn stop(&mut self, cue: Cue) {
        if let Some(playback) = self.active.remove(&cue) {
            self.backend.stop(playback);
        }
    }

    pub fn stop_all(&mut self) {
        for (_, playback) in self.active.drain() {
            self.backend.stop(playback);
        }
    }

    pub fn is_active(&self, cue: Cue) -> bool {
        self.active.contains_key(&cue)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SoundEvent {
        Played(Cue, bool, PlaybackId),
        Stopped(PlaybackId),
    }

    /// Shared view of everything a [`RecordingBackend`] was asked to do.
    #[derive(Debug, Clone, Default)]
    pub struct SoundLog(Rc<RefCell<Vec<SoundEvent>>>);

    impl SoundLog {
        pub fn events(&self) -> Vec<SoundEvent> {
            self.0.borrow().clone()
        }

        pub fn plays_of(&self, cue: Cue) -> usize {
            self.0
                .borrow()
                .iter()
                .filter(|e| matches!(e, SoundEvent::Played(c, _, _) if *c == cue))
                .count()
        }
    }

    pub struct RecordingBackend {
        log: SoundLog,
        next_id: u64,
    }

    impl RecordingBackend {
        pub fn with_log() -> (Self, SoundLog) {
            let log = SoundLog::default();
            (
                Self {
                    log: log.clone(),
                    next_id: 0,
                },
                log,
            )
        }
    }

    impl SoundBackend for RecordingBackend {
        fn play(&mut self, cue: Cue, looping: bool) -> PlaybackId {
            self.next_id += 1;
            let id = PlaybackId(self.next_id);
            self.log.0.borrow_mut().push(SoundEvent::Played(cue, looping, id));
            id
        }

        fn stop(&mut self, playback: PlaybackId) {
            self.log.0.borrow_mut().push(SoundEvent::Stopped(playback));
        }
    }

    pub fn recording_board() -> (SoundBoard, SoundLog) {
        let (backend, log) = RecordingBackend::with_log();
        (SoundBoard::new(Box::new(backend)), log)
    }
}
