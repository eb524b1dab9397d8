use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Fixed-update cadence used when nothing else is configured.
pub const DEFAULT_FIXED_UPDATE_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Width of the logical pixel buffer.
    #[serde(default = "default_logical_width")]
    pub logical_width: u32,
    /// Height of the logical pixel buffer.
    #[serde(default = "default_logical_height")]
    pub logical_height: u32,
    /// Integer upscale factor applied to the window.
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_title")]
    pub window_title: String,
    #[serde(default = "default_fixed_update_interval_ms")]
    pub fixed_update_interval_ms: u64,
}

fn default_logical_width() -> u32 { 64 }
fn default_logical_height() -> u32 { 32 }
fn default_scale() -> u32 { 8 }
fn default_title() -> String { "RetroPixelEngine".to_string() }
fn default_fixed_update_interval_ms() -> u64 { DEFAULT_FIXED_UPDATE_MS }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            logical_width: default_logical_width(),
            logical_height: default_logical_height(),
            scale: default_scale(),
            window_title: default_title(),
            fixed_update_interval_ms: default_fixed_update_interval_ms(),
        }
    }
}

impl EngineConfig {
    pub fn new(logical_width: u32, logical_height: u32, scale: u32, title: impl Into<String>) -> Self {
        Self {
            logical_width,
            logical_height,
            scale,
            window_title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_fixed_update_interval_ms(mut self, ms: u64) -> Self {
        self.fixed_update_interval_ms = ms;
        self
    }

    /// Window size in physical pixels: logical size times the scale factor.
    ///
    /// Only meaningful for a config that passed [`EngineConfig::validate`].
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.logical_width.saturating_mul(self.scale),
            self.logical_height.saturating_mul(self.scale),
        )
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.logical_width as usize * self.logical_height as usize
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.logical_width == 0 || self.logical_height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "logical size must be non-zero, got {}x{}",
                self.logical_width, self.logical_height
            )));
        }
        if self.scale == 0 {
            return Err(EngineError::InvalidConfig("scale must be non-zero".to_string()));
        }
        if self.fixed_update_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "fixed_update_interval_ms must be non-zero".to_string(),
            ));
        }
        let overflow = self.logical_width.checked_mul(self.scale).is_none()
            || self.logical_height.checked_mul(self.scale).is_none();
        if overflow {
            return Err(EngineError::InvalidConfig(format!(
                "window size {}x{} * {} overflows",
                self.logical_width, self.logical_height, self.scale
            )));
        }
        Ok(())
    }

    pub fn load_toml(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("read '{}': {e}", path.display())))?;
        Self::from_toml_str(&text)
            .map_err(|e| EngineError::Config(format!("'{}': {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let cfg: EngineConfig =
            toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
