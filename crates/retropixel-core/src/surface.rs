use crate::error::EngineResult;

/// Streaming off-screen bitmap of `0x00RRGGBB` pixels owned by the platform.
pub trait PixelSurface {
    /// Begin exclusive write access.
    fn lock(&mut self) -> EngineResult<()>;

    /// Pixel storage, row-major, `width * height` long. Only written between lock and unlock.
    fn pixels_mut(&mut self) -> &mut [u32];

    fn pixels(&self) -> &[u32];

    /// Publish what was written since `lock`.
    fn unlock(&mut self);
}

/// Scoped write access to a [`PixelSurface`]. Unlocks on drop, including unwinding.
pub struct PixelLock<'a, S: PixelSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: PixelSurface + ?Sized> PixelLock<'a, S> {
    pub fn acquire(surface: &'a mut S) -> EngineResult<Self> {
        surface.lock()?;
        Ok(Self { surface })
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        self.surface.pixels_mut()
    }
}

impl<S: PixelSurface + ?Sized> Drop for PixelLock<'_, S> {
    fn drop(&mut self) {
        self.surface.unlock();
    }
}

/// Pack 8-bit channels into the surface pixel format.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Write `color` at `x + y * width`.
///
/// Coordinates outside the logical buffer are a caller bug. Debug builds assert;
/// release builds only catch offsets past the end of the slice.
#[inline]
pub fn draw_pixel(pixels: &mut [u32], width: u32, x: u32, y: u32, color: u32) {
    debug_assert!(x < width, "x={x} outside logical width {width}");
    let idx = x as usize + y as usize * width as usize;
    debug_assert!(idx < pixels.len(), "pixel ({x},{y}) outside logical buffer");
    pixels[idx] = color;
}

/// What `Game::on_draw` gets each frame: the locked pixel buffer plus frame info.
pub struct Frame<'a> {
    pixels: &'a mut [u32],
    width: u32,
    height: u32,
    fps: f64,
    index: u64,
}

impl<'a> Frame<'a> {
    pub fn new(pixels: &'a mut [u32], width: u32, height: u32, fps: f64, index: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            fps,
            index,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Last measured frames per second.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Zero-based index of this frame within the run.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    #[inline]
    pub fn draw_pixel(&mut self, x: u32, y: u32, color: u32) {
        debug_assert!(y < self.height, "y={y} outside logical height {}", self.height);
        draw_pixel(&mut *self.pixels, self.width, x, y, color);
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut *self.pixels
    }
}

/// Linearly remap `x` from `[a, b]` to `[c, d]`.
#[inline]
pub fn map_range(x: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    (x - a) / (b - a) * (d - c) + c
}
