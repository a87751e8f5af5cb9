use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Wall-clock time since the scene started, plus a smoothed frame-rate readout.
///
/// Motion in this scene is a function of absolute elapsed time, not of an
/// accumulated delta, so there is no fixed-step accumulator here.
pub struct SceneClock {
    origin: Instant,
    last_instant: Instant,
    pub elapsed_secs: f64,
    pub real_dt: f64,
    pub frame_count: u64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl SceneClock {
    /// Seed the time origin. Elapsed time reads 0.0 until the first `begin_frame`.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            last_instant: now,
            elapsed_secs: 0.0,
            real_dt: 0.0,
            frame_count: 0,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        self.advance_to(Instant::now());
    }

    fn advance_to(&mut self, now: Instant) {
        self.real_dt = now.saturating_duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.elapsed_secs = now.saturating_duration_since(self.origin).as_secs_f64();
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn starts_at_zero_elapsed() {
        let clock = SceneClock::start();
        assert_eq!(clock.elapsed_secs, 0.0);
        assert_eq!(clock.frame_count, 0);
    }

    #[test]
    fn elapsed_is_measured_from_origin() {
        let mut clock = SceneClock::start();
        let origin = clock.origin;
        clock.advance_to(origin + Duration::from_millis(500));
        clock.advance_to(origin + Duration::from_millis(1500));
        assert!((clock.elapsed_secs - 1.5).abs() < 1e-9);
        assert!((clock.real_dt - 1.0).abs() < 1e-9);
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn smoothed_fps_converges_to_steady_rate() {
        let mut clock = SceneClock::start();
        let origin = clock.origin;
        for i in 1..=FPS_SAMPLE_COUNT as u64 {
            clock.advance_to(origin + Duration::from_millis(10 * i));
        }
        assert!((clock.smoothed_fps - 100.0).abs() < 1e-6);
        assert!((clock.smoothed_frame_time_ms - 10.0).abs() < 1e-6);
    }
}
