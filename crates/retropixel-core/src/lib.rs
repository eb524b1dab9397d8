#![forbid(unsafe_op_in_unsafe_fn)]

//! RetroPixel engine core.
//!
//! A small logical pixel buffer drawn by a game, upscaled into a window by a
//! [`Platform`], with a fixed-update worker and an input-poll worker running
//! next to the render loop.

pub mod config;
pub mod core_invariants;
pub mod engine;
pub mod error;
pub mod game;
pub mod headless;
pub mod input;
pub mod platform;
pub mod runtime;
pub mod signals;
pub mod surface;
pub mod telemetry;
pub mod workers;

pub use config::EngineConfig;
pub use engine::{Engine, EngineState, EXIT_CLEAN};
pub use error::{EngineError, EngineResult, HookStage};
pub use game::{Game, PreloadContext};
pub use headless::{HeadlessInput, HeadlessPlatform, HeadlessProbe};
pub use input::{
    ButtonState, InputEvent, InputSource, KeyCode, KeyEvent, Modifiers, MouseButton,
    MouseButtonEvent,
};
pub use platform::{Platform, RenderSurfaces};
pub use runtime::RuntimeHandle;
pub use signals::{ShutdownSignal, StopReason};
pub use surface::{draw_pixel, map_range, rgb, Frame, PixelLock, PixelSurface};
