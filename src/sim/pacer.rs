//! Fixed-rate frame pacing
//!
//! Sleeps until the next frame boundary on a monotonic clock. A tick that
//! overruns its budget simply starts the next frame late; there is no
//! catch-up.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

/// Frames used for the rolling FPS estimate
const FPS_SAMPLES: usize = 60;

#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    last: Instant,
    frame_times: VecDeque<Instant>,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs(1) / fps.max(1),
            last: Instant::now(),
            frame_times: VecDeque::with_capacity(FPS_SAMPLES + 1),
        }
    }

    /// Target frame duration
    pub fn frame(&self) -> Duration {
        self.frame
    }

    /// Block until the current frame's budget is used up
    pub fn wait(&mut self) {
        let elapsed = self.last.elapsed();
        match self.frame.checked_sub(elapsed) {
            Some(remaining) if !remaining.is_zero() => thread::sleep(remaining),
            _ => log::trace!("frame overran by {:?}", elapsed - self.frame),
        }
        self.last = Instant::now();

        self.frame_times.push_back(self.last);
        if self.frame_times.len() > FPS_SAMPLES {
            self.frame_times.pop_front();
        }
    }

    /// Measured frame rate over the last few frames
    pub fn fps(&self) -> Option<f32> {
        let (first, last) = (self.frame_times.front()?, self.frame_times.back()?);
        let elapsed = last.duration_since(*first).as_secs_f32();
        if elapsed <= 0.0 {
            return None;
        }
        Some((self.frame_times.len() - 1) as f32 / elapsed)
    }
}
