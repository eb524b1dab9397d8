#![forbid(unsafe_op_in_unsafe_fn)]

//! Desktop backend for the RetroPixel engine on winit and softbuffer.

mod blit;
mod config;
mod handler;
mod input_bridge;
mod interrupt;
mod platform;

pub use blit::stretch;
pub use config::WinitPlatformConfig;
pub use input_bridge::{map_key, ClickCounter, MULTI_CLICK_WINDOW, PIXELS_PER_LINE};
pub use platform::{WinitPixelSurface, WinitPlatform, WinitWindow};
