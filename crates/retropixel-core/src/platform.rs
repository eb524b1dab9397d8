use crate::{config::EngineConfig, error::EngineResult, input::InputSource, surface::PixelSurface};

/// Native windowing/rendering/input library seen from the engine.
///
/// Creating the platform initialises the library; dropping it shuts the library down.
/// One platform can serve several engines one after another.
pub trait Platform {
    /// Streaming pixel surface of the logical size.
    type Surface: PixelSurface;
    /// Window plus whatever renderer presents into it.
    type Window;
    /// Moved onto the input-poll worker for the duration of a run.
    type Input: InputSource + Send;

    /// Open a window of `config.window_size()` and a `logical_width x logical_height` surface.
    fn create_surfaces(
        &mut self,
        config: &EngineConfig,
    ) -> EngineResult<RenderSurfaces<Self::Surface, Self::Window, Self::Input>>;

    /// Stretch the surface over the window and show it.
    fn present(&mut self, window: &mut Self::Window, surface: &Self::Surface) -> EngineResult<()>;

    fn set_title(&mut self, window: &Self::Window, title: &str);
}

/// Native resources owned by one engine.
///
/// Field order is the drop order: surface, then window, then input.
pub struct RenderSurfaces<S, W, I> {
    pub surface: S,
    pub window: W,
    pub input: I,
}
