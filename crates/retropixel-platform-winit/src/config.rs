use winit::{dpi::PhysicalSize, window::WindowAttributes};

/// Host-side options that are not part of the engine config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinitPlatformConfig {
    /// Let the user resize the window; the logical buffer is stretched to fit.
    pub resizable: bool,
    /// Turn Ctrl-C into a quit event for the running engine.
    pub ctrl_c_quits: bool,
}

impl Default for WinitPlatformConfig {
    #[inline]
    fn default() -> Self {
        Self {
            resizable: false,
            ctrl_c_quits: true,
        }
    }
}

/// Everything needed to open one window once the event loop is active.
#[derive(Debug, Clone)]
pub(crate) struct WindowRequest {
    pub title: String,
    pub size: (u32, u32),
    pub resizable: bool,
}

impl WindowRequest {
    pub(crate) fn attributes(&self) -> WindowAttributes {
        let (width, height) = self.size;
        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(self.resizable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::Size;

    #[test]
    fn window_is_opened_at_the_scaled_physical_size() {
        let request = WindowRequest {
            title: "RetroPixelEngine".to_string(),
            size: (512, 256),
            resizable: false,
        };

        let attrs = request.attributes();
        assert_eq!(attrs.title, "RetroPixelEngine");
        assert_eq!(attrs.inner_size, Some(Size::Physical(PhysicalSize::new(512, 256))));
        assert!(!attrs.resizable);
    }

    #[test]
    fn resizable_flag_reaches_the_window() {
        let request = WindowRequest {
            title: String::new(),
            size: (64, 32),
            resizable: true,
        };
        assert!(request.attributes().resizable);
    }
}
