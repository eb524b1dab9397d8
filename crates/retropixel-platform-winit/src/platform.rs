use std::{
    num::NonZeroU32,
    sync::Arc,
    time::{Duration, Instant},
};

use crossbeam_channel::Receiver;
use retropixel_core::{
    core_invariants::require, EngineConfig, EngineError, EngineResult, InputEvent, PixelSurface,
    Platform, RenderSurfaces,
};
use softbuffer::{Context, Surface};
use winit::{
    event_loop::{EventLoop, OwnedDisplayHandle},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::Window,
};

use crate::{
    blit,
    config::{WindowRequest, WinitPlatformConfig},
    handler::Host,
    interrupt,
};

/// How long `create_surfaces` pumps the event loop waiting for the window.
const WINDOW_OPEN_TIMEOUT: Duration = Duration::from_secs(5);
const WINDOW_OPEN_PUMP: Duration = Duration::from_millis(10);

/// Desktop platform: a winit event loop pumped from the render thread, with
/// softbuffer presenting the upscaled pixel buffer.
///
/// Must be created on the main thread, and only once per process.
pub struct WinitPlatform {
    config: WinitPlatformConfig,
    host: Host,
    context: Context<OwnedDisplayHandle>,
    // Dropped last; the context and every window share its display connection.
    event_loop: EventLoop<()>,
}

impl WinitPlatform {
    pub fn new() -> EngineResult<Self> {
        Self::with_config(WinitPlatformConfig::default())
    }

    pub fn with_config(config: WinitPlatformConfig) -> EngineResult<Self> {
        let event_loop = EventLoop::new().map_err(EngineError::platform)?;
        let context = Context::new(event_loop.owned_display_handle()).map_err(EngineError::platform)?;

        log::info!("winit platform ready");

        Ok(Self {
            config,
            host: Host::default(),
            context,
            event_loop,
        })
    }

    #[inline]
    pub fn config(&self) -> &WinitPlatformConfig {
        &self.config
    }

    /// Dispatch whatever the OS has queued without blocking.
    fn pump_events(&mut self) {
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.host);
        if let PumpStatus::Exit(code) = status {
            log::warn!("event loop exited with code {code}");
            self.host.send(InputEvent::Quit);
        }
    }

    fn wait_for_window(&mut self) -> EngineResult<Arc<Window>> {
        let deadline = Instant::now() + WINDOW_OPEN_TIMEOUT;

        loop {
            let status = self
                .event_loop
                .pump_app_events(Some(WINDOW_OPEN_PUMP), &mut self.host);

            if let Some(created) = self.host.take_created() {
                return created.map_err(EngineError::Platform);
            }

            if let PumpStatus::Exit(code) = status {
                return Err(EngineError::platform(format!(
                    "event loop exited with code {code} before the window opened"
                )));
            }

            if Instant::now() >= deadline {
                return Err(EngineError::platform("timed out waiting for the window to open"));
            }
        }
    }
}

impl Drop for WinitPlatform {
    fn drop(&mut self) {
        log::debug!("winit platform shut down");
    }
}

impl Platform for WinitPlatform {
    type Surface = WinitPixelSurface;
    type Window = WinitWindow;
    type Input = Receiver<InputEvent>;

    fn create_surfaces(
        &mut self,
        config: &EngineConfig,
    ) -> EngineResult<RenderSurfaces<WinitPixelSurface, WinitWindow, Receiver<InputEvent>>> {
        let (tx, rx) = crossbeam_channel::unbounded();
        if self.config.ctrl_c_quits {
            interrupt::route_interrupts_to(tx.clone());
        }

        let size = config.window_size();
        self.host.request_window(
            WindowRequest {
                title: config.window_title.clone(),
                size,
                resizable: self.config.resizable,
            },
            tx,
        );

        let window = self.wait_for_window()?;
        let mut surface = Surface::new(&self.context, window.clone()).map_err(EngineError::platform)?;

        let inner = window.inner_size();
        if let (Some(w), Some(h)) = (NonZeroU32::new(inner.width), NonZeroU32::new(inner.height)) {
            surface.resize(w, h).map_err(EngineError::platform)?;
        }

        Ok(RenderSurfaces {
            surface: WinitPixelSurface {
                pixels: vec![0; config.pixel_count()],
                width: config.logical_width,
                height: config.logical_height,
                locked: false,
            },
            window: WinitWindow {
                surface,
                window,
                size: (inner.width, inner.height),
            },
            input: rx,
        })
    }

    fn present(&mut self, window: &mut WinitWindow, surface: &WinitPixelSurface) -> EngineResult<()> {
        require(!surface.locked, "presenting a locked surface");

        window.draw(surface)?;
        self.pump_events();
        Ok(())
    }

    fn set_title(&mut self, window: &WinitWindow, title: &str) {
        window.window.set_title(title);
    }
}

/// The logical-size pixel buffer the game draws into.
pub struct WinitPixelSurface {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    locked: bool,
}

impl WinitPixelSurface {
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl PixelSurface for WinitPixelSurface {
    fn lock(&mut self) -> EngineResult<()> {
        require(!self.locked, "surface locked twice");
        self.locked = true;
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
    }
}

/// A native window and the softbuffer surface presenting into it.
pub struct WinitWindow {
    // Drop order: surface before the window it draws into.
    surface: Surface<OwnedDisplayHandle, Arc<Window>>,
    window: Arc<Window>,
    size: (u32, u32),
}

impl WinitWindow {
    #[inline]
    pub fn inner(&self) -> &Window {
        &self.window
    }

    fn draw(&mut self, src: &WinitPixelSurface) -> EngineResult<()> {
        let inner = self.window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(inner.width), NonZeroU32::new(inner.height)) else {
            // Minimized.
            return Ok(());
        };

        if (inner.width, inner.height) != self.size {
            self.surface.resize(w, h).map_err(EngineError::platform)?;
            self.size = (inner.width, inner.height);
        }

        let mut buffer = self.surface.buffer_mut().map_err(EngineError::platform)?;
        blit::stretch(
            src.pixels(),
            src.width,
            src.height,
            &mut buffer,
            inner.width,
            inner.height,
        );

        self.window.pre_present_notify();
        buffer.present().map_err(EngineError::platform)
    }
}

impl Drop for WinitWindow {
    fn drop(&mut self) {
        log::debug!("window closed");
    }
}
