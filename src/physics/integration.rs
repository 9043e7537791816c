use crate::constants::physics_constants::MAX_FRAME_DELTA;

/// Fixed-timestep accumulator
///
/// Frame time is banked and spent in whole ticks so the simulation runs at
/// the same rate regardless of how fast frames are presented.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestep {
    tick_duration: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(tick_duration: f32) -> Self {
        Self {
            tick_duration,
            accumulator: 0.0,
        }
    }

    /// Accumulator for `rate` ticks per second
    pub fn from_rate(rate: f32) -> Self {
        Self::new(1.0 / rate)
    }

    pub fn tick_duration(&self) -> f32 {
        self.tick_duration
    }

    /// Unspent time carried to the next frame
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }

    /// Bank `frame_delta` seconds and run `step` once per whole tick
    ///
    /// Returns the number of ticks run.
    pub fn advance<F>(&mut self, frame_delta: f32, mut step: F) -> u32
    where
        F: FnMut(f32),
    {
        if self.tick_duration.is_nan() || self.tick_duration <= 0.0 {
            return 0;
        }

        // Clamp frame time to prevent spiral of death
        let frame_delta = frame_delta.clamp(0.0, MAX_FRAME_DELTA);
        self.accumulator += frame_delta;

        let mut ticks = 0;
        while self.accumulator >= self.tick_duration {
            step(self.tick_duration);
            self.accumulator -= self.tick_duration;
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_follow_accumulated_time() {
        let mut timestep = FixedTimestep::new(0.25);
        assert_eq!(timestep.advance(0.1, |_| {}), 0);
        assert_eq!(timestep.advance(0.1, |_| {}), 0);
        // 0.3 banked: one tick, 0.05 left
        assert_eq!(timestep.advance(0.1, |_| {}), 1);
        assert!((timestep.accumulated() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_step_receives_tick_duration() {
        let mut timestep = FixedTimestep::new(0.125);
        let mut seen = Vec::new();
        let ticks = timestep.advance(0.25, |dt| seen.push(dt));
        assert_eq!(ticks, 2);
        assert_eq!(seen, vec![0.125, 0.125]);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut timestep = FixedTimestep::new(0.125);
        // A 10 second stall only banks MAX_FRAME_DELTA
        let ticks = timestep.advance(10.0, |_| {});
        assert_eq!(ticks, 2);
        assert_eq!(timestep.advance(-1.0, |_| {}), 0);
    }

    #[test]
    fn test_one_second_of_frames_yields_tick_rate_ticks() {
        let mut timestep = FixedTimestep::from_rate(64.0);
        let mut total = 0;
        for _ in 0..64 {
            total += timestep.advance(1.0 / 64.0, |_| {});
        }
        assert_eq!(total, 64);
    }
}
