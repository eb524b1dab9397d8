use std::time::{Duration, Instant};

const FPS_PERIOD: Duration = Duration::from_secs(1);

/// Frames-per-second counter for the render loop.
///
/// The boundary advances by whole seconds and never snaps to "now",
/// so a slow frame does not shift the measurement window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    boundary: Instant,
    frames: u32,
}

impl FpsCounter {
    pub fn new(start: Instant) -> Self {
        Self {
            boundary: start,
            frames: 0,
        }
    }

    /// Called at the top of each iteration.
    ///
    /// Returns the number of frames completed in the last second when a boundary was crossed.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        if now.saturating_duration_since(self.boundary) < FPS_PERIOD {
            return None;
        }

        let measured = self.frames;
        self.frames = 0;
        self.boundary += FPS_PERIOD;
        Some(measured)
    }

    /// Called once the frame has been drawn and presented.
    #[inline]
    pub fn frame_done(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    #[inline]
    pub fn frames_this_second(&self) -> u32 {
        self.frames
    }
}
