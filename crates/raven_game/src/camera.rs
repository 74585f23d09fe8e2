use glam::Vec2;
use std::f32::consts::TAU;

use crate::config::ShakeConfig;

/// Smoothed follow camera clamped to the level rectangle `[0, level_size]`.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub position: Vec2,
    pub viewport: Vec2,
    level_size: Vec2,
    half_life: f32,
    pub shake: ScreenShake,
}

impl CameraRig {
    pub fn new(level_size: Vec2, viewport: Vec2, half_life: f32, shake: ShakeConfig) -> Self {
        let mut rig = Self {
            position: Vec2::ZERO,
            viewport,
            level_size,
            half_life,
            shake: ScreenShake::new(shake),
        };
        rig.position = rig.clamp(viewport * 0.5);
        rig
    }

    pub fn snap_to(&mut self, target: Vec2) {
        self.position = self.clamp(target);
    }

    /// Close half the remaining distance every `half_life` seconds, so the
    /// motion is frame-rate independent.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let t = 1.0 - 2f32.powf(-dt / self.half_life);
        self.position = self.clamp(self.position.lerp(target, t));
    }

    pub fn update(&mut self, target: Vec2, dt: f32) {
        self.follow(target, dt);
        self.shake.update(dt);
    }

    /// Where the view is centred this frame, shake included.
    pub fn view_center(&self) -> Vec2 {
        self.position + self.shake.offset()
    }

    fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            clamp_axis(p.x, self.level_size.x, self.viewport.x),
            clamp_axis(p.y, self.level_size.y, self.viewport.y),
        )
    }
}

fn clamp_axis(value: f32, level: f32, view: f32) -> f32 {
    if level <= view {
        level * 0.5
    } else {
        value.clamp(view * 0.5, level - view * 0.5)
    }
}

/// Linear ramp up over `acceleration_duration`, linear falloff over
/// `falloff_time`, sinusoidal at `frequency` Hz. No randomness, so replays
/// stay reproducible.
#[derive(Debug, Clone, Copy)]
pub struct ScreenShake {
    config: ShakeConfig,
    elapsed: Option<f32>,
}

impl ScreenShake {
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            elapsed: None,
        }
    }

    /// Restarts the effect if it is already running.
    pub fn start(&mut self) {
        self.elapsed = Some(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(elapsed) = self.elapsed {
            let next = elapsed + dt;
            let total = self.config.acceleration_duration + self.config.falloff_time;
            self.elapsed = (next < total).then_some(next);
        }
    }

    pub fn amplitude(&self) -> f32 {
        let Some(t) = self.elapsed else {
            return 0.0;
        };
        let ramp = self.config.acceleration_duration;
        let scale = if t < ramp {
            t / ramp
        } else {
            (1.0 - (t - ramp) / self.config.falloff_time).max(0.0)
        };
        self.config.max_amplitude * scale
    }

    pub fn offset(&self) -> Vec2 {
        let Some(t) = self.elapsed else {
            return Vec2::ZERO;
        };
        let phase = TAU * self.config.frequency * t;
        Vec2::new(phase.sin(), (phase * 0.5).cos()) * self.amplitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig(level: Vec2) -> CameraRig {
        CameraRig::new(level, Vec2::new(1280.0, 720.0), 0.3, ShakeConfig::default())
    }

    #[test]
    fn follow_closes_half_the_gap_per_half_life() {
        let mut cam = rig(Vec2::new(10_000.0, 10_000.0));
        cam.snap_to(Vec2::new(1000.0, 1000.0));
        cam.follow(Vec2::new(1200.0, 1000.0), 0.3);
        assert!((cam.position.x - 1100.0).abs() < 0.01);
        assert!((cam.position.y - 1000.0).abs() < 0.01);
    }

    #[test]
    fn position_clamps_to_level_bounds() {
        let mut cam = rig(Vec2::new(4000.0, 2000.0));
        cam.snap_to(Vec2::new(-500.0, 5000.0));
        assert_eq!(cam.position, Vec2::new(640.0, 1640.0));
        for _ in 0..600 {
            cam.follow(Vec2::new(9000.0, -50.0), 1.0 / 60.0);
        }
        assert!(cam.position.x <= 3360.0);
        assert!(cam.position.y >= 360.0);
    }

    #[test]
    fn small_level_is_centered() {
        let mut cam = rig(Vec2::new(800.0, 400.0));
        cam.follow(Vec2::new(790.0, 10.0), 1.0);
        assert_eq!(cam.position, Vec2::new(400.0, 200.0));
    }

    #[test]
    fn shake_ramps_peaks_and_ends() {
        let mut shake = ScreenShake::new(ShakeConfig::default());
        assert_eq!(shake.offset(), Vec2::ZERO);
        shake.start();
        assert!(shake.is_active());
        assert_eq!(shake.amplitude(), 0.0);
        shake.update(0.1);
        assert!((shake.amplitude() - 10.0).abs() < 1e-4);
        shake.update(0.1);
        assert!((shake.amplitude() - 20.0).abs() < 1e-4);
        shake.update(0.5);
        assert!((shake.amplitude() - 10.0).abs() < 1e-3);
        assert!(shake.offset().length() <= 20.0 * 2f32.sqrt());
        shake.update(0.6);
        assert!(!shake.is_active());
        assert_eq!(shake.amplitude(), 0.0);
    }

    #[test]
    fn view_center_includes_shake() {
        let mut cam = rig(Vec2::new(10_000.0, 10_000.0));
        cam.snap_to(Vec2::new(2000.0, 2000.0));
        assert_eq!(cam.view_center(), cam.position);
        cam.shake.start();
        cam.update(Vec2::new(2000.0, 2000.0), 0.02);
        assert_ne!(cam.view_center(), cam.position);
    }
}
