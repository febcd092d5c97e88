//! Time management utilities
//!
//! The physics never reads a clock. Callers measure frame time however they
//! like and feed it to a [`FixedTimestep`], which hands back a whole number of
//! fixed-size simulation steps.

use std::time::Duration;

/// Default simulation rate in ticks per second
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Accumulator that converts variable frame times into fixed simulation steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
    total_steps: u64,
}

impl FixedTimestep {
    /// Create an accumulator running at `tick_rate` steps per second
    ///
    /// A zero rate falls back to [`DEFAULT_TICK_RATE`].
    pub fn new(tick_rate: u32) -> Self {
        let rate = if tick_rate == 0 { DEFAULT_TICK_RATE } else { tick_rate };
        Self {
            step: 1.0 / rate as f32,
            accumulator: 0.0,
            max_steps_per_frame: 8,
            total_steps: 0,
        }
    }

    /// Limit how many steps a single long frame may produce
    pub fn with_max_steps_per_frame(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    /// Length of one step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add elapsed frame time and return how many steps are now due
    ///
    /// Time beyond `max_steps_per_frame` steps is dropped so a stalled frame
    /// cannot trigger an unbounded catch-up.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.as_secs_f32();

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps_per_frame {
            self.accumulator = self.accumulator.min(self.step);
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    /// Total steps produced since creation
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Simulated time covered by all produced steps, in seconds
    pub fn simulated_time(&self) -> f32 {
        self.total_steps as f32 * self.step
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_step_is_sixtieth() {
        let timestep = FixedTimestep::default();
        assert_relative_eq!(timestep.step(), 1.0 / 60.0);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut timestep = FixedTimestep::new(60);
        // 10 ms is less than one 16.6 ms step
        assert_eq!(timestep.advance(Duration::from_millis(10)), 0);
        assert_eq!(timestep.advance(Duration::from_millis(10)), 1);
        assert_eq!(timestep.total_steps(), 1);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut timestep = FixedTimestep::new(60).with_max_steps_per_frame(4);
        assert_eq!(timestep.advance(Duration::from_secs(2)), 4);
        assert!(timestep.alpha() <= 1.0);
        // Leftover time was dropped, not queued
        assert!(timestep.advance(Duration::ZERO) <= 1);
    }

    #[test]
    fn test_zero_rate_falls_back_to_default() {
        let timestep = FixedTimestep::new(0);
        assert_relative_eq!(timestep.step(), 1.0 / DEFAULT_TICK_RATE as f32);
    }
}
