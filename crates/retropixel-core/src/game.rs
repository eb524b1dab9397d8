use crate::{
    config::EngineConfig,
    error::EngineResult,
    input::{KeyEvent, MouseButtonEvent},
    runtime::RuntimeHandle,
    surface::Frame,
};

/// Game hooks driven by the engine.
///
/// The engine never knows the concrete game. Hooks run on three threads:
/// `on_draw` on the render loop, `on_fixed_update` on the fixed-update worker
/// and the input hooks on the input-poll worker, hence `&self` and `Sync`.
/// Use atomics or a lock for state shared between them.
///
/// The input hooks log by default; the rest do nothing.
pub trait Game: Sync {
    /// Runs once after the render surfaces exist and before any other hook.
    fn on_preload(&mut self, _ctx: &mut PreloadContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// Draw into the locked pixel buffer. Called once per rendered frame.
    fn on_draw(&self, _frame: &mut Frame<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// Called at the fixed-update interval with the wall-clock seconds since the previous call.
    fn on_fixed_update(&self, _delta_secs: f64) {}

    fn on_key(&self, key: &KeyEvent) {
        log::info!(
            "KEY: key={:?} scancode={} state={:?} mod={:?} repeat={}",
            key.code,
            key.scancode,
            key.state,
            key.modifiers,
            key.repeat
        );
    }

    fn on_mouse_click(&self, ev: &MouseButtonEvent) {
        log::info!(
            "MOUSE: button={:?} state={:?} clicks={} at=({:.2},{:.2})",
            ev.button,
            ev.state,
            ev.clicks,
            ev.x,
            ev.y
        );
    }

    fn on_mouse_move(&self, x: f64, y: f64) {
        log::info!("CURSOR: x={x:.2} y={y:.2}");
    }

    fn on_mouse_scroll(&self, dx: f64, dy: f64) {
        log::info!("SCROLL: dx={dx:.2} dy={dy:.2}");
    }
}

/// What a game may touch while preloading.
pub struct PreloadContext<'a> {
    config: &'a EngineConfig,
    runtime: &'a RuntimeHandle,
}

impl<'a> PreloadContext<'a> {
    pub(crate) fn new(config: &'a EngineConfig, runtime: &'a RuntimeHandle) -> Self {
        Self { config, runtime }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// Handle for reading FPS and counters from hooks later on.
    #[inline]
    pub fn runtime(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    /// Override the fixed-update interval for the coming run. Zero is ignored.
    #[inline]
    pub fn set_fixed_update_interval(&mut self, ms: u64) {
        self.runtime.set_fixed_update_interval(ms);
    }
}
