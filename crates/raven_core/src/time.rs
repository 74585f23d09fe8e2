//! Fixed-timestep clock. Wall-clock time feeds an accumulator that is drained
//! in `fixed_dt` slices; the level only ever advances one slice at a time.

use std::time::Instant;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
    pub interpolation_alpha: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_fixed_dt(1.0 / 60.0)
    }

    pub fn with_fixed_dt(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            interpolation_alpha: 0.0,
        }
    }

    /// Measure wall-clock time since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.feed(real_dt);
    }

    /// Feed an explicit frame delta. Headless runs and replays use this to
    /// stay independent of the host clock.
    pub fn feed(&mut self, real_dt: f64) {
        self.real_dt = real_dt;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    pub fn should_step(&mut self) -> bool {
        // Tolerate float residue so feeding exactly `fixed_dt` yields one step.
        if self.accumulator + 1e-9 >= self.fixed_dt {
            self.accumulator = (self.accumulator - self.fixed_dt).max(0.0);
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator / self.fixed_dt;
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
