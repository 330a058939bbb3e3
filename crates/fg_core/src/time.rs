use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Per-frame delta source for the driver.
///
/// In measured mode each frame advances by the wall-clock time since the
/// previous frame, capped at `max_dt`. In fixed mode every frame advances by
/// the same step regardless of how long it took.
pub struct FrameClock {
    pub fixed_dt: Option<f32>,
    pub max_dt: f64,
    pub total_time: f64,
    pub frame_count: u64,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            fixed_dt: None,
            max_dt: 0.25,
            total_time: 0.0,
            frame_count: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn fixed(dt: f32) -> Self {
        Self {
            fixed_dt: Some(dt),
            ..Self::new()
        }
    }

    /// Restart wall-clock measurement, so setup time is not counted as a frame.
    pub fn restart(&mut self) {
        self.last_instant = Instant::now();
    }

    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let measured = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(measured)
    }

    /// Account for one frame that took `measured` seconds and return the
    /// simulation step to apply.
    pub fn advance(&mut self, measured: f64) -> f32 {
        self.real_dt = measured;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = measured;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        let dt = match self.fixed_dt {
            Some(fixed) => f64::from(fixed),
            None if measured > self.max_dt => {
                log::warn!(
                    "Frame took {:.1}ms, capping step to {}ms",
                    measured * 1000.0,
                    self.max_dt * 1000.0
                );
                self.max_dt
            }
            None => measured,
        };
        self.total_time += dt;
        dt as f32
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn measured_mode_passes_through_real_delta() {
        let mut clock = FrameClock::new();
        let dt = clock.advance(0.02);
        assert_relative_eq!(dt, 0.02);
        assert_relative_eq!(clock.total_time, 0.02);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn measured_mode_caps_long_frames() {
        let mut clock = FrameClock::new();
        let dt = clock.advance(3.0);
        assert_relative_eq!(dt, 0.25);
        assert_relative_eq!(clock.real_dt, 3.0);
    }

    #[test]
    fn fixed_mode_ignores_wall_clock() {
        let mut clock = FrameClock::fixed(1.0);
        assert_relative_eq!(clock.advance(0.001), 1.0);
        assert_relative_eq!(clock.advance(5.0), 1.0);
        assert_relative_eq!(clock.total_time, 2.0);
    }

    #[test]
    fn fps_smoothing_converges() {
        let mut clock = FrameClock::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            clock.advance(0.01);
        }
        assert_relative_eq!(clock.smoothed_fps, 100.0, epsilon = 1e-6);
        assert_relative_eq!(clock.smoothed_frame_time_ms, 10.0, epsilon = 1e-6);
    }
}
