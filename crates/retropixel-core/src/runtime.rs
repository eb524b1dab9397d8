use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::signals::{ShutdownSignal, StopReason};

/// State shared between the render loop, both workers and the application.
pub(crate) struct RuntimeState {
    pub(crate) signal: ShutdownSignal,
    fps_bits: AtomicU64,
    frames: AtomicU64,
    fixed_updates: AtomicU64,
    fixed_interval_ms: AtomicU64,
}

impl RuntimeState {
    fn new(fixed_interval_ms: u64) -> Self {
        Self {
            signal: ShutdownSignal::new(),
            fps_bits: AtomicU64::new(0f64.to_bits()),
            frames: AtomicU64::new(0),
            fixed_updates: AtomicU64::new(0),
            fixed_interval_ms: AtomicU64::new(fixed_interval_ms),
        }
    }

    pub(crate) fn reset_counters(&self) {
        self.fps_bits.store(0f64.to_bits(), Ordering::Release);
        self.frames.store(0, Ordering::Release);
        self.fixed_updates.store(0, Ordering::Release);
    }

    #[inline]
    pub(crate) fn publish_fps(&self, fps: f64) {
        self.fps_bits.store(fps.to_bits(), Ordering::Release);
    }

    #[inline]
    pub(crate) fn frame_completed(&self) -> u64 {
        self.frames.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    pub(crate) fn fixed_update_completed(&self) {
        self.fixed_updates.fetch_add(1, Ordering::AcqRel);
    }
}

/// Read handle over the live engine state.
///
/// Cheap to clone; games usually grab one in `on_preload` and read it from hooks.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Arc<RuntimeState>,
}

impl RuntimeHandle {
    pub(crate) fn new(fixed_interval_ms: u64) -> Self {
        Self {
            inner: Arc::new(RuntimeState::new(fixed_interval_ms)),
        }
    }

    #[inline]
    pub(crate) fn state(&self) -> &RuntimeState {
        &self.inner
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.inner.signal.is_running()
    }

    #[inline]
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.inner.signal.reason()
    }

    /// Frames rendered during the last whole second.
    #[inline]
    pub fn fps(&self) -> f64 {
        f64::from_bits(self.inner.fps_bits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.inner.frames.load(Ordering::Acquire)
    }

    #[inline]
    pub fn fixed_update_count(&self) -> u64 {
        self.inner.fixed_updates.load(Ordering::Acquire)
    }

    #[inline]
    pub fn fixed_update_interval(&self) -> Duration {
        Duration::from_millis(self.inner.fixed_interval_ms.load(Ordering::Acquire))
    }

    /// Change the fixed-update interval.
    ///
    /// The fixed-update worker reads the interval once when `run()` starts,
    /// so calling this while running has no effect on the current run.
    /// Zero is ignored.
    pub fn set_fixed_update_interval(&self, ms: u64) {
        if ms == 0 {
            log::warn!("ignoring fixed update interval of 0ms");
            return;
        }
        self.inner.fixed_interval_ms.store(ms, Ordering::Release);
        if self.is_running() {
            log::debug!("fixed update interval set to {ms}ms while running; not applied to this run");
        }
    }
}
