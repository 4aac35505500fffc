//! Frame rate measurement
//!
//! Counts delivered frames over a rolling window of frame time. The readout
//! holds the count of the last completed window.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FpsCounter {
    window: f64,
    elapsed: f64,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new(window: f64) -> Self {
        Self {
            window: window.max(f64::EPSILON),
            elapsed: 0.0,
            frames: 0,
            fps: 0,
        }
    }

    /// Record one frame of `dt` seconds
    pub fn record(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        self.frames += 1;
        if self.elapsed > self.window {
            self.fps = (self.frames as f64 / self.elapsed * self.window).round() as u32;
            self.elapsed = 0.0;
            self.frames = 0;
        }
    }

    /// Frames per window, as of the last completed window
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(crate::consts::FPS_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_zero_until_first_window() {
        let mut fps = FpsCounter::default();
        for _ in 0..30 {
            fps.record(1.0 / 60.0);
        }
        assert_eq!(fps.fps(), 0);
    }

    #[test]
    fn test_fps_steady_rate() {
        let mut fps = FpsCounter::default();
        for _ in 0..200 {
            fps.record(1.0 / 60.0);
        }
        assert!((59..=61).contains(&fps.fps()));
    }

    #[test]
    fn test_fps_ignores_bad_frame_times() {
        let mut fps = FpsCounter::default();
        fps.record(f64::NAN);
        fps.record(-1.0);
        assert_eq!(fps.fps(), 0);
    }
}
