//! Fixed-rate tick scheduler fed by wall-clock frame deltas.
//!
//! Ticks are not time-scaled: a late frame does not catch up with extra
//! ticks. At most `max_steps_per_frame` ticks run per frame and whatever time
//! is left over beyond one tick interval is dropped, so under load the sprite
//! moves the same distance per tick but fewer ticks per second.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_steps_per_frame: u32,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub dropped_steps: u64,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new(tick_interval: Duration) -> Self {
        let fixed_dt = tick_interval.as_secs_f64();
        Self {
            fixed_dt,
            max_steps_per_frame: 1,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            dropped_steps: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: if fixed_dt > 0.0 { 1.0 / fixed_dt } else { 0.0 },
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feeds `real_dt` seconds into the scheduler. `begin_frame` calls this
    /// with the measured delta.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt;
        self.accumulator += real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.steps_this_frame >= self.max_steps_per_frame {
            return false;
        }
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Coalesces whatever whole ticks the frame could not run.
    pub fn end_frame(&mut self) {
        if self.accumulator >= self.fixed_dt && self.fixed_dt > 0.0 {
            let skipped = (self.accumulator / self.fixed_dt).floor();
            self.accumulator -= skipped * self.fixed_dt;
            self.dropped_steps += skipped as u64;
            log::trace!("Coalesced {} late tick(s)", skipped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sixteen_ms() -> TimeState {
        TimeState::new(Duration::from_millis(16))
    }

    fn run_frame(time: &mut TimeState, real_dt: f64) -> u32 {
        time.advance(real_dt);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        time.end_frame();
        steps
    }

    #[test]
    fn fixed_dt_matches_interval() {
        let time = sixteen_ms();
        assert!((time.fixed_dt - 0.016).abs() < 1e-12);
        assert_eq!(time.max_steps_per_frame, 1);
    }

    #[test]
    fn short_frame_runs_no_tick() {
        let mut time = sixteen_ms();
        assert_eq!(run_frame(&mut time, 0.010), 0);
        assert_eq!(time.fixed_step_count, 0);
    }

    #[test]
    fn partial_time_carries_into_next_frame() {
        let mut time = sixteen_ms();
        assert_eq!(run_frame(&mut time, 0.010), 0);
        assert_eq!(run_frame(&mut time, 0.010), 1);
        assert_eq!(time.fixed_step_count, 1);
    }

    #[test]
    fn late_frame_is_coalesced_to_one_tick() {
        let mut time = sixteen_ms();
        assert_eq!(run_frame(&mut time, 0.100), 1);
        assert_eq!(time.dropped_steps, 5);
        // Only the sub-tick remainder survives.
        assert_eq!(run_frame(&mut time, 0.0), 0);
    }

    #[test]
    fn higher_step_cap_allows_catch_up() {
        let mut time = sixteen_ms();
        time.max_steps_per_frame = 4;
        assert_eq!(run_frame(&mut time, 0.050), 3);
        assert_eq!(time.dropped_steps, 0);
    }

    #[test]
    fn steady_cadence_ticks_once_per_frame() {
        let mut time = sixteen_ms();
        let mut total = 0;
        for _ in 0..60 {
            total += run_frame(&mut time, 0.016);
        }
        assert_eq!(total, 60);
        assert_eq!(time.frame_count, 60);
        assert!((time.smoothed_fps - 62.5).abs() < 1e-6);
    }
}
