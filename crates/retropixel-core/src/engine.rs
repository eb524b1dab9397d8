use std::{panic, thread, time::Instant};

use crate::{
    config::EngineConfig,
    core_invariants::bad_state,
    error::{EngineError, EngineResult, HookStage},
    game::{Game, PreloadContext},
    platform::{Platform, RenderSurfaces},
    runtime::{RuntimeHandle, RuntimeState},
    signals::StopReason,
    surface::{Frame, PixelLock},
    telemetry::FpsCounter,
    workers,
};

/// Status returned by [`Engine::run`] after a quit.
pub const EXIT_CLEAN: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed; no native resources yet.
    Uninitialized,
    /// Surfaces exist and the game has preloaded.
    Ready,
    /// Render loop and both workers are live.
    Running,
    /// Shutdown observed; joining workers.
    Stopping,
    /// `run()` finished. The engine cannot run again.
    Stopped,
}

/// Pixel engine: one render loop on the caller's thread plus a fixed-update
/// worker and an input-poll worker, all stopped by a single shutdown signal.
pub struct Engine<'p, P: Platform, G: Game> {
    config: EngineConfig,
    state: EngineState,
    surfaces: Option<RenderSurfaces<P::Surface, P::Window, P::Input>>,
    runtime: RuntimeHandle,
    game: G,
    platform: &'p mut P,
}

impl<'p, P: Platform, G: Game> Engine<'p, P, G> {
    pub fn new(config: EngineConfig, platform: &'p mut P, game: G) -> EngineResult<Self> {
        config.validate()?;
        let runtime = RuntimeHandle::new(config.fixed_update_interval_ms);

        Ok(Self {
            config,
            state: EngineState::Uninitialized,
            surfaces: None,
            runtime,
            game,
            platform,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[inline]
    pub fn runtime(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.runtime.fps()
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.runtime.frame_count()
    }

    #[inline]
    pub fn game(&self) -> &G {
        &self.game
    }

    #[inline]
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Window size in physical pixels.
    #[inline]
    pub fn window_size(&self) -> (u32, u32) {
        self.config.window_size()
    }

    /// Change how often `on_fixed_update` runs. Only effective before `run()`; zero is ignored.
    pub fn set_fixed_update_interval(&mut self, ms: u64) {
        self.runtime.set_fixed_update_interval(ms);
    }

    /// Create the render surfaces and let the game preload.
    ///
    /// `run()` calls this itself when the engine is still uninitialised.
    pub fn preload(&mut self) -> EngineResult<()> {
        if self.state != EngineState::Uninitialized {
            return Err(EngineError::InvalidState {
                op: "preload",
                state: self.state,
            });
        }

        let surfaces = self.platform.create_surfaces(&self.config)?;
        self.surfaces = Some(surfaces);

        let mut ctx = PreloadContext::new(&self.config, &self.runtime);
        if let Err(e) = self.game.on_preload(&mut ctx) {
            self.surfaces = None;
            return Err(EngineError::with_hook(HookStage::Preload, e));
        }

        self.state = EngineState::Ready;

        let (w, h) = self.config.window_size();
        log::info!(
            "ready: {}x{} pixels in a {}x{} window",
            self.config.logical_width,
            self.config.logical_height,
            w,
            h
        );
        Ok(())
    }

    /// Run until the input source delivers a quit.
    ///
    /// Both workers are joined before this returns, so no hook runs afterwards.
    /// Returns [`EXIT_CLEAN`] on a normal quit.
    pub fn run(&mut self) -> EngineResult<i32> {
        match self.state {
            EngineState::Uninitialized => self.preload()?,
            EngineState::Ready => {}
            state => return Err(EngineError::InvalidState { op: "run", state }),
        }

        let Self {
            config,
            state,
            surfaces,
            runtime,
            game,
            platform,
        } = self;

        let Some(RenderSurfaces {
            surface,
            window,
            input,
        }) = surfaces.as_mut()
        else {
            bad_state("engine is ready without render surfaces");
        };

        let game: &G = game;
        let config: &EngineConfig = config;
        let interval = runtime.fixed_update_interval();
        let shared = runtime.state();

        shared.reset_counters();
        shared.signal.arm();
        *state = EngineState::Running;
        log::info!("running (fixed update every {}ms)", interval.as_millis());

        let outcome = thread::scope(|scope| -> EngineResult<()> {
            let fixed = thread::Builder::new()
                .name("retropixel-fixed-update".into())
                .spawn_scoped(scope, move || workers::run_fixed_update(game, shared, interval));
            let fixed = match fixed {
                Ok(handle) => handle,
                Err(e) => {
                    shared.signal.request(StopReason::Fault);
                    return Err(EngineError::other(format!("spawn fixed update worker: {e}")));
                }
            };

            let poll = thread::Builder::new()
                .name("retropixel-input".into())
                .spawn_scoped(scope, move || workers::run_input_poll(game, shared, input));
            let poll = match poll {
                Ok(handle) => handle,
                Err(e) => {
                    shared.signal.request(StopReason::Fault);
                    return Err(EngineError::other(format!("spawn input worker: {e}")));
                }
            };

            let rendered = {
                let _trip = shared.signal.trip_on_unwind();
                render_loop(&mut **platform, surface, window, game, shared, config)
            };
            if let Err(e) = &rendered {
                log::error!("render loop failed: {e}");
                shared.signal.request(StopReason::Fault);
            }

            *state = EngineState::Stopping;
            log::debug!("stopping, waiting for workers");

            let joined = [fixed.join(), poll.join()];
            for result in joined {
                if let Err(payload) = result {
                    panic::resume_unwind(payload);
                }
            }

            rendered
        });

        *state = EngineState::Stopped;
        outcome?;

        log::info!(
            "stopped after {} frames ({} fixed updates)",
            runtime.frame_count(),
            runtime.fixed_update_count()
        );
        Ok(EXIT_CLEAN)
    }
}

impl<P: Platform, G: Game> Drop for Engine<'_, P, G> {
    fn drop(&mut self) {
        if let Some(surfaces) = self.surfaces.take() {
            log::info!("exiting, cleaning up");
            drop(surfaces);
        }
    }
}

fn render_loop<P, G>(
    platform: &mut P,
    surface: &mut P::Surface,
    window: &mut P::Window,
    game: &G,
    runtime: &RuntimeState,
    config: &EngineConfig,
) -> EngineResult<()>
where
    P: Platform,
    G: Game + ?Sized,
{
    let mut fps = FpsCounter::new(Instant::now());
    let mut measured = 0.0;
    let mut index: u64 = 0;

    while runtime.signal.is_running() {
        if let Some(frames) = fps.tick(Instant::now()) {
            measured = f64::from(frames);
            runtime.publish_fps(measured);
            platform.set_title(window, &format!("{} [{:.2} FPS]", config.window_title, measured));
            log::debug!("fps={frames}");
        }

        {
            let mut lock = PixelLock::acquire(&mut *surface)?;
            let mut frame = Frame::new(
                lock.pixels_mut(),
                config.logical_width,
                config.logical_height,
                measured,
                index,
            );
            game.on_draw(&mut frame)
                .map_err(|e| EngineError::with_hook(HookStage::Draw, e))?;
        }
        platform.present(window, surface)?;

        fps.frame_done();
        index = runtime.frame_completed();
    }

    Ok(())
}
