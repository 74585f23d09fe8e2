//! Non-combat animated entities: the artifact and portal the player
//! activates, and the two screen-space overlays (win video, ambient noise).

use raven_core::animation::{ClipKind, ClipSet};

use crate::assets::Texture;
use crate::collision::Aabb;
use crate::entity::{Animated, AnimatedEntity};

macro_rules! animated {
    ($ty:ty) => {
        impl Animated for $ty {
            fn entity(&self) -> &AnimatedEntity {
                &self.entity
            }

            fn entity_mut(&mut self) -> &mut AnimatedEntity {
                &mut self.entity
            }
        }
    };
}

/// Plays its activation clip once, then shows the consumed frame for good.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub entity: AnimatedEntity,
    active: bool,
}

impl Artifact {
    pub fn new(body: Aabb, clips: ClipSet<Texture>) -> Self {
        Self {
            entity: AnimatedEntity::new(body, clips),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns false if already active.
    pub fn activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.entity.play(ClipKind::Active);
        true
    }

    pub fn tick(&mut self) {
        if self.update_animation().as_deref() == Some("active") {
            self.entity.play(ClipKind::Consumed);
        }
    }
}

animated!(Artifact);

#[derive(Debug, Clone)]
pub struct Portal {
    pub entity: AnimatedEntity,
    active: bool,
}

impl Portal {
    pub fn new(body: Aabb, clips: ClipSet<Texture>) -> Self {
        Self {
            entity: AnimatedEntity::new(body, clips),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.entity.play(ClipKind::Active);
    }

    pub fn tick(&mut self) {
        self.update_animation();
    }
}

animated!(Portal);

/// Win cutscene: plays through once, then holds its final frame.
#[derive(Debug, Clone)]
pub struct VideoOverlay {
    pub entity: AnimatedEntity,
    active: bool,
}

impl VideoOverlay {
    pub fn new(body: Aabb, clips: ClipSet<Texture>) -> Self {
        Self {
            entity: AnimatedEntity::new(body, clips),
            active: false,
        }
    }

    /// True from the first tick on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tick(&mut self) {
        self.active = true;
        if self.update_animation().as_deref() == Some("idle") {
            self.entity.play(ClipKind::Final);
        }
    }
}

animated!(VideoOverlay);

#[derive(Debug, Clone)]
pub struct NoiseOverlay {
    pub entity: AnimatedEntity,
}

impl NoiseOverlay {
    pub fn new(body: Aabb, clips: ClipSet<Texture>) -> Self {
        Self {
            entity: AnimatedEntity::new(body, clips),
        }
    }

    pub fn tick(&mut self) {
        self.update_animation();
    }
}

animated!(NoiseOverlay);
