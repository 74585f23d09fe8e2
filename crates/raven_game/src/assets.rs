//! Texture loading and clip construction.
//!
//! The level never touches files directly: it asks an [`ImageLoader`] for
//! images by path and for their horizontal mirror, once per frame at load time.
//! [`ClipLibrary`] turns a [`ClipCatalog`] into ready-to-play clip sets for
//! every entity family; entities are instantiated from cheap clones of these
//! (frame images are shared behind `Arc`).

use image::{Rgba, RgbaImage};
use raven_core::animation::{Clip, ClipCatalog, ClipKind, ClipSet, ClipSpec};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub const PLAYER: &str = "player";
pub const STALKER: &str = "stalker";
pub const GUARDIAN: &str = "guardian";
pub const ARTIFACT: &str = "artifact";
pub const PORTAL: &str = "portal";
pub const VIDEO: &str = "video";
pub const NOISE: &str = "noise";

/// Entity families a level needs clips for.
pub const ENTITY_IDS: [&str; 7] = [PLAYER, STALKER, GUARDIAN, ARTIFACT, PORTAL, VIDEO, NOISE];

/// One orientation of one logical frame.
#[derive(Debug, Clone)]
pub struct Texture {
    pub path: Arc<str>,
    pub mirrored: bool,
    pub scale: f32,
    pub image: Arc<RgbaImage>,
}

impl Texture {
    /// Display size in pixels after upscaling.
    pub fn display_size(&self) -> (f32, f32) {
        (
            self.image.width() as f32 * self.scale,
            self.image.height() as f32 * self.scale,
        )
    }
}

pub trait ImageLoader {
    fn load(&mut self, path: &str) -> Result<Arc<RgbaImage>, String>;

    fn mirror(&mut self, image: &RgbaImage) -> Arc<RgbaImage> {
        Arc::new(image::imageops::flip_horizontal(image))
    }
}

/// Loads images from disk relative to an asset root, caching by path.
pub struct FsImageLoader {
    root: PathBuf,
    cache: HashMap<String, Arc<RgbaImage>>,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&mut self, path: &str) -> Result<Arc<RgbaImage>, String> {
        if let Some(image) = self.cache.get(path) {
            return Ok(image.clone());
        }
        let full_path = self.root.join(path);
        let image = image::open(&full_path)
            .map_err(|e| format!("Failed to load image {}: {e}", full_path.display()))?
            .to_rgba8();
        let image = Arc::new(image);
        self.cache.insert(path.to_string(), image.clone());
        Ok(image)
    }
}

/// Hands out a shared 1x1 magenta image for every path. Used for headless
/// runs without art.
pub struct PlaceholderLoader {
    image: Arc<RgbaImage>,
}

impl Default for PlaceholderLoader {
    fn default() -> Self {
        Self {
            image: Arc::new(RgbaImage::from_pixel(1, 1, Rgba([255, 0, 255, 255]))),
        }
    }
}

impl ImageLoader for PlaceholderLoader {
    fn load(&mut self, _path: &str) -> Result<Arc<RgbaImage>, String> {
        Ok(self.image.clone())
    }

    fn mirror(&mut self, _image: &RgbaImage) -> Arc<RgbaImage> {
        self.image.clone()
    }
}

/// Load every frame of `spec` and pair each with its mirror.
pub fn build_clip(spec: &ClipSpec, loader: &mut dyn ImageLoader) -> Result<Clip<Texture>, String> {
    let mut frames = Vec::with_capacity(spec.count as usize);
    for path in spec.frame_paths() {
        let source = loader.load(&path)?;
        let mirror = loader.mirror(&source);
        let path: Arc<str> = Arc::from(path.as_str());
        let plain = Texture {
            path: path.clone(),
            mirrored: false,
            scale: spec.upscale,
            image: source,
        };
        let flipped = Texture {
            path,
            mirrored: true,
            scale: spec.upscale,
            image: mirror,
        };
        frames.push(if spec.reverse {
            [flipped, plain]
        } else {
            [plain, flipped]
        });
    }
    Clip::from_frames(spec, frames)
}

pub fn build_clip_set(
    entity: &str,
    catalog: &ClipCatalog,
    loader: &mut dyn ImageLoader,
) -> Result<ClipSet<Texture>, String> {
    let specs = catalog
        .entity(entity)
        .ok_or_else(|| format!("Clip catalog has no entry for '{entity}'"))?;
    let idle_spec = specs
        .get(&ClipKind::Idle)
        .ok_or_else(|| format!("Clip catalog entry '{entity}' has no idle clip"))?;
    let mut set = ClipSet::new(build_clip(idle_spec, loader)?);
    for (kind, spec) in specs {
        if *kind != ClipKind::Idle {
            set.insert(*kind, build_clip(spec, loader)?);
        }
    }
    Ok(set)
}

/// Prebuilt clip sets for every entity family.
#[derive(Debug, Clone)]
pub struct ClipLibrary {
    sets: HashMap<String, ClipSet<Texture>>,
}

impl ClipLibrary {
    pub fn build(catalog: &ClipCatalog, loader: &mut dyn ImageLoader) -> Result<Self, String> {
        let mut sets = HashMap::new();
        for id in ENTITY_IDS {
            sets.insert(id.to_string(), build_clip_set(id, catalog, loader)?);
        }
        log::info!("Clip library built for {} entity families", sets.len());
        Ok(Self { sets })
    }

    /// A fresh clip set (all cursors at zero) for one entity.
    pub fn instantiate(&self, id: &str) -> Result<ClipSet<Texture>, String> {
        self.sets
            .get(id)
            .cloned()
            .ok_or_else(|| format!("Clip library has no clips for '{id}'"))
    }
}
