use std::thread::sleep;
use std::time::{Duration, Instant};

use tracing::debug;

/// Caps the loop at a fixed number of frames per second and tracks the
/// rate actually achieved.
pub struct FramePacer {
    target_fps: u32,
    frame_time: Duration,
    frame_start: Instant,
    frame_count: u32,
    current_fps: u32,
    window_start: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        FramePacer {
            target_fps: target_fps.max(1),
            frame_time: frame_time(target_fps),
            frame_start: now,
            frame_count: 0,
            current_fps: 0,
            window_start: now,
        }
    }

    pub fn start_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Sleeps for whatever is left of the frame, then updates the measured
    /// rate once a full second has passed.
    pub fn end_frame(&mut self) {
        let left = self.remaining(self.frame_start.elapsed());
        if !left.is_zero() {
            sleep(left);
        }

        self.frame_count += 1;
        let now = Instant::now();
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            self.current_fps = self.frame_count;
            self.frame_count = 0;
            self.window_start = now;
            debug!(fps = self.current_fps, target = self.target_fps, "frame rate");
        }
    }

    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame_time.saturating_sub(elapsed)
    }

    pub fn fps(&self) -> u32 {
        self.current_fps
    }
}

fn frame_time(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}
