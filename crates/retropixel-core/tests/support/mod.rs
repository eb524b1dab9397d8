//! Recording game used by the engine integration tests.

#![allow(dead_code)]

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use parking_lot::Mutex;
use retropixel_core::{
    EngineResult, Frame, Game, KeyEvent, MouseButtonEvent, PreloadContext, RuntimeHandle,
};

pub const RED: u32 = 0xFF0000;

/// Counts every hook call and remembers input in arrival order.
#[derive(Default)]
pub struct Recorder {
    pub draws: AtomicU64,
    pub fixed_updates: AtomicU64,
    pub fixed_starts: Mutex<Vec<Instant>>,
    pub fixed_deltas: Mutex<Vec<f64>>,
    pub input: Mutex<Vec<String>>,
    pub fps_seen: Mutex<Vec<f64>>,
    pub runtime: Mutex<Option<RuntimeHandle>>,
    /// Interval to set from `on_preload`.
    pub preload_interval_ms: Option<u64>,
    /// Interval to set from inside the second fixed update.
    pub late_interval_ms: Option<u64>,
}

impl Recorder {
    pub fn hook_calls(&self) -> u64 {
        self.draws.load(Ordering::Acquire)
            + self.fixed_updates.load(Ordering::Acquire)
            + self.input.lock().len() as u64
    }

    pub fn draw_count(&self) -> u64 {
        self.draws.load(Ordering::Acquire)
    }

    pub fn fixed_count(&self) -> u64 {
        self.fixed_updates.load(Ordering::Acquire)
    }
}

impl Game for Recorder {
    fn on_preload(&mut self, ctx: &mut PreloadContext<'_>) -> EngineResult<()> {
        if let Some(ms) = self.preload_interval_ms {
            ctx.set_fixed_update_interval(ms);
        }
        *self.runtime.lock() = Some(ctx.runtime());
        Ok(())
    }

    fn on_draw(&self, frame: &mut Frame<'_>) -> EngineResult<()> {
        let (w, h) = (frame.width(), frame.height());
        frame.draw_pixel(w / 2, h / 2, RED);

        let mut seen = self.fps_seen.lock();
        if seen.last().copied() != Some(frame.fps()) {
            seen.push(frame.fps());
        }
        drop(seen);

        self.draws.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn on_fixed_update(&self, delta_secs: f64) {
        self.fixed_starts.lock().push(Instant::now());
        self.fixed_deltas.lock().push(delta_secs);
        let n = self.fixed_updates.fetch_add(1, Ordering::AcqRel) + 1;

        if n == 2 {
            if let (Some(ms), Some(rt)) = (self.late_interval_ms, self.runtime.lock().as_ref()) {
                rt.set_fixed_update_interval(ms);
            }
        }
    }

    fn on_key(&self, key: &KeyEvent) {
        self.input.lock().push(format!("key {:?} {:?}", key.code, key.state));
    }

    fn on_mouse_click(&self, ev: &MouseButtonEvent) {
        self.input.lock().push(format!("click {:?} {:?}", ev.button, ev.state));
    }

    fn on_mouse_move(&self, x: f64, y: f64) {
        self.input.lock().push(format!("move {x} {y}"));
    }

    fn on_mouse_scroll(&self, dx: f64, dy: f64) {
        self.input.lock().push(format!("scroll {dx} {dy}"));
    }
}
