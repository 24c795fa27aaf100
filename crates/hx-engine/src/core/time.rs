/// Turns variable frame deltas into a whole number of fixed ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    /// Seconds per tick.
    dt: f64,
    /// Frame time not yet spent on a tick.
    accumulator: f64,
    /// Backlog cap per frame; anything past it is dropped.
    max_steps: u32,
}

impl FixedTimestep {
    /// Most ticks a single frame may request before the backlog is dropped.
    pub const DEFAULT_MAX_STEPS: u32 = 10;

    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time and return how many fixed ticks to run now.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        if frame_dt.is_nan() || frame_dt <= 0.0 || self.dt <= 0.0 {
            return 0;
        }
        // Cap the backlog so a long stall doesn't snowball.
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * f64::from(self.max_steps));
        let steps = (self.accumulator / self.dt).floor() as u32;
        self.accumulator -= f64::from(steps) * self.dt;
        steps
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        if self.dt > 0.0 {
            (self.accumulator / self.dt).clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
