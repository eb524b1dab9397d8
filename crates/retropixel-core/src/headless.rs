use std::{
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::{
    config::EngineConfig,
    core_invariants::require,
    error::{EngineError, EngineResult},
    input::{InputEvent, InputSource},
    platform::{Platform, RenderSurfaces},
    surface::PixelSurface,
};

/// Platform without a display: surfaces live in memory, input comes from a channel.
///
/// Used for tests and for running a game without a window.
pub struct HeadlessPlatform {
    events_tx: Sender<InputEvent>,
    events_rx: Receiver<InputEvent>,
    shared: Arc<HeadlessShared>,
    fail_surfaces: bool,
}

#[derive(Default)]
struct HeadlessShared {
    presented: AtomicU64,
    locks: AtomicU64,
    unlocks: AtomicU64,
    live_windows: AtomicUsize,
    last_frame: Mutex<Vec<u32>>,
    title: Mutex<String>,
    teardown: Mutex<Vec<&'static str>>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        log::debug!("headless platform up");
        Self {
            events_tx,
            events_rx,
            shared: Arc::new(HeadlessShared::default()),
            fail_surfaces: false,
        }
    }

    /// Platform whose surface creation always fails.
    pub fn with_failing_surfaces() -> Self {
        let mut platform = Self::new();
        platform.fail_surfaces = true;
        platform
    }

    /// Inject input events as if they came from a window.
    ///
    /// Events queued before a run reach that run. Whatever is still queued
    /// when its engine is dropped is discarded.
    #[inline]
    pub fn input_sender(&self) -> Sender<InputEvent> {
        self.events_tx.clone()
    }

    /// Send a quit after `delay` from a helper thread.
    pub fn quit_after(&self, delay: Duration) -> thread::JoinHandle<()> {
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = tx.send(InputEvent::Quit);
        })
    }

    /// Observer that stays usable while an engine borrows the platform.
    #[inline]
    pub fn probe(&self) -> HeadlessProbe {
        HeadlessProbe {
            shared: self.shared.clone(),
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HeadlessPlatform {
    fn drop(&mut self) {
        log::debug!("headless platform shut down");
    }
}

impl Platform for HeadlessPlatform {
    type Surface = HeadlessSurface;
    type Window = HeadlessWindow;
    type Input = HeadlessInput;

    fn create_surfaces(
        &mut self,
        config: &EngineConfig,
    ) -> EngineResult<RenderSurfaces<HeadlessSurface, HeadlessWindow, HeadlessInput>> {
        if self.fail_surfaces {
            return Err(EngineError::platform("headless surface creation disabled"));
        }

        self.shared.live_windows.fetch_add(1, Ordering::AcqRel);
        *self.shared.title.lock() = config.window_title.clone();

        Ok(RenderSurfaces {
            surface: HeadlessSurface {
                pixels: vec![0; config.pixel_count()],
                locked: false,
                shared: self.shared.clone(),
            },
            window: HeadlessWindow {
                size: config.window_size(),
                shared: self.shared.clone(),
            },
            input: HeadlessInput {
                events: self.events_rx.clone(),
            },
        })
    }

    fn present(&mut self, _window: &mut HeadlessWindow, surface: &HeadlessSurface) -> EngineResult<()> {
        require(!surface.locked, "presenting a locked surface");

        {
            let mut last = self.shared.last_frame.lock();
            last.clear();
            last.extend_from_slice(surface.pixels());
        }
        self.shared.presented.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn set_title(&mut self, _window: &HeadlessWindow, title: &str) {
        *self.shared.title.lock() = title.to_string();
    }
}

/// One run's view of the platform input queue.
///
/// Events still queued when it is released are discarded, so nothing sent
/// to one run leaks into the next.
pub struct HeadlessInput {
    events: Receiver<InputEvent>,
}

impl InputSource for HeadlessInput {
    #[inline]
    fn poll(&mut self) -> Option<InputEvent> {
        self.events.poll()
    }
}

impl Drop for HeadlessInput {
    fn drop(&mut self) {
        let stale = self.events.try_iter().count();
        if stale > 0 {
            log::debug!("dropped {stale} input events queued after the run ended");
        }
    }
}

pub struct HeadlessSurface {
    pixels: Vec<u32>,
    locked: bool,
    shared: Arc<HeadlessShared>,
}

impl PixelSurface for HeadlessSurface {
    fn lock(&mut self) -> EngineResult<()> {
        require(!self.locked, "surface locked twice");
        self.locked = true;
        self.shared.locks.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn unlock(&mut self) {
        self.locked = false;
        self.shared.unlocks.fetch_add(1, Ordering::AcqRel);
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        self.shared.teardown.lock().push("surface");
    }
}

pub struct HeadlessWindow {
    size: (u32, u32),
    shared: Arc<HeadlessShared>,
}

impl HeadlessWindow {
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        self.shared.teardown.lock().push("window");
        self.shared.live_windows.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Read-only view of what the headless platform has seen.
#[derive(Clone)]
pub struct HeadlessProbe {
    shared: Arc<HeadlessShared>,
}

impl HeadlessProbe {
    pub fn presented_frames(&self) -> u64 {
        self.shared.presented.load(Ordering::Acquire)
    }

    pub fn lock_count(&self) -> u64 {
        self.shared.locks.load(Ordering::Acquire)
    }

    pub fn unlock_count(&self) -> u64 {
        self.shared.unlocks.load(Ordering::Acquire)
    }

    /// Windows created and not yet dropped.
    pub fn live_windows(&self) -> usize {
        self.shared.live_windows.load(Ordering::Acquire)
    }

    /// Copy of the most recently presented surface.
    pub fn last_frame(&self) -> Vec<u32> {
        self.shared.last_frame.lock().clone()
    }

    pub fn title(&self) -> String {
        self.shared.title.lock().clone()
    }

    /// Native resources in the order they were released.
    pub fn teardown_order(&self) -> Vec<&'static str> {
        self.shared.teardown.lock().clone()
    }
}
