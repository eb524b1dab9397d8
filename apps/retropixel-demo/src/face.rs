use retropixel_core::{map_range, rgb, EngineResult, Frame, Game};

/// Offsets from the buffer center: nose, two eyes, a five pixel mouth.
const FACE: [(i32, i32); 8] = [
    (0, 0),
    (-2, -3),
    (2, -3),
    (2, 2),
    (1, 2),
    (0, 2),
    (-1, 2),
    (-2, 2),
];

const PULSE_FRAMES: u64 = 60;

/// Red face in the middle of the screen, pulsing with the frame counter.
#[derive(Debug, Default)]
pub struct SimpleExample;

impl SimpleExample {
    pub fn face_pixels(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
        let (cx, cy) = ((width / 2) as i32, (height / 2) as i32);
        FACE.iter().filter_map(move |&(dx, dy)| {
            let x = u32::try_from(cx + dx).ok()?;
            let y = u32::try_from(cy + dy).ok()?;
            (x < width && y < height).then_some((x, y))
        })
    }

    pub fn shade(frame_index: u64) -> u32 {
        let phase = (frame_index % PULSE_FRAMES) as f32;
        let red = map_range(phase, 0.0, (PULSE_FRAMES - 1) as f32, 96.0, 255.0);
        rgb(red as u8, 0, 0)
    }
}

impl Game for SimpleExample {
    fn on_draw(&self, frame: &mut Frame<'_>) -> EngineResult<()> {
        frame.clear(0);

        let color = Self::shade(frame.index());
        for (x, y) in Self::face_pixels(frame.width(), frame.height()) {
            frame.draw_pixel(x, y, color);
        }
        Ok(())
    }

    fn on_fixed_update(&self, delta_secs: f64) {
        log::info!("fixed update called {:.2}ms ago", delta_secs * 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_is_centered_on_the_default_buffer() {
        let px: Vec<_> = SimpleExample::face_pixels(64, 32).collect();
        assert_eq!(px.len(), 8);
        assert_eq!(px[0], (32, 16));
        assert!(px.contains(&(30, 13)));
        assert!(px.contains(&(34, 18)));
    }

    #[test]
    fn tiny_buffers_clip_instead_of_overflowing() {
        let px: Vec<_> = SimpleExample::face_pixels(2, 2).collect();
        assert!(px.iter().all(|&(x, y)| x < 2 && y < 2));
        assert!(px.len() < 8);
    }

    #[test]
    fn shade_pulses_from_dim_to_full_red() {
        assert_eq!(SimpleExample::shade(0), rgb(96, 0, 0));
        assert_eq!(SimpleExample::shade(PULSE_FRAMES - 1), rgb(255, 0, 0));
        assert_eq!(SimpleExample::shade(PULSE_FRAMES), rgb(96, 0, 0));
    }

    #[test]
    fn draw_paints_only_the_face() {
        let mut pixels = vec![0xFFFFFF; 64 * 32];
        let mut frame = Frame::new(&mut pixels, 64, 32, 0.0, PULSE_FRAMES - 1);
        SimpleExample.on_draw(&mut frame).unwrap();

        let red = rgb(255, 0, 0);
        assert_eq!(pixels.iter().filter(|&&p| p == red).count(), 8);
        assert_eq!(pixels.iter().filter(|&&p| p == 0).count(), 64 * 32 - 8);
    }
}
