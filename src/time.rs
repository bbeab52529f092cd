//! Frame timing for the status readout.
//!
//! The simulation itself advances one fixed step per frame and never reads the
//! clock; this only measures how fast frames are being presented.

use std::time::{Duration, Instant};

/// Frame counter with a periodically refreshed FPS estimate.
#[derive(Debug)]
pub struct FrameTimer {
    start: Instant,
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Timer whose FPS estimate is refreshed every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: interval,
        }
    }

    /// Record a presented frame. Call once per frame.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }
    }

    /// Seconds since the timer was created.
    pub fn elapsed(&self) -> f32 {
        self.last_frame.duration_since(self.start).as_secs_f32()
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last refresh interval.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_new() {
        let timer = FrameTimer::new();
        assert_eq!(timer.frame(), 0);
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    fn test_fps_refreshes_after_interval() {
        let mut timer = FrameTimer::with_interval(Duration::from_secs(1));
        let start = timer.start;
        for i in 1..=30 {
            timer.tick_at(start + Duration::from_millis(i * 20));
        }
        // 30 frames in 600ms: not refreshed yet
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.frame(), 30);

        for i in 31..=50 {
            timer.tick_at(start + Duration::from_millis(i * 20));
        }
        assert!((timer.fps() - 50.0).abs() < 0.01);
        assert!((timer.delta() - 0.02).abs() < 1e-4);
        assert!((timer.elapsed() - 1.0).abs() < 1e-4);
    }
}
