//! Blinkenlights in the style of the WOPR computer from *WarGames*.
//!
//! The panel is split into horizontal bands of red and yellow. Every frame
//! each pixel is independently re-rolled: one chance in three it is dark,
//! otherwise it shows its band's color.

use super::Pattern;
use crate::error::SurfaceError;
use crate::surface::DisplaySurface;
use crate::{Brightness, GRID_SIZE, PixelColor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Band color for each row, top (row 0) to bottom (row 7).
const ROW_COLORS: [PixelColor; GRID_SIZE as usize] = [
    PixelColor::Yellow,
    PixelColor::Yellow,
    PixelColor::Red,
    PixelColor::Yellow,
    PixelColor::Yellow,
    PixelColor::Red,
    PixelColor::Red,
    PixelColor::Red,
];

#[derive(Debug)]
pub struct WoprPattern {
    rng: StdRng,
}

impl WoprPattern {
    pub const PACING: Duration = Duration::from_millis(500);
    pub const BRIGHTNESS: Brightness = Brightness::MAX;

    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic pixel noise, for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for WoprPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for WoprPattern {
    fn pacing(&self) -> Duration {
        Self::PACING
    }

    fn activate(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        surface.set_brightness(Self::BRIGHTNESS)
    }

    fn draw(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        surface.clear();
        for (row, &band) in ROW_COLORS.iter().enumerate().rev() {
            for col in 0..GRID_SIZE {
                let color = match self.rng.gen_range(0..3u8) {
                    0 => PixelColor::Off,
                    _ => band,
                };
                surface.set_pixel(row as u8, col, color);
            }
        }
        surface.write_display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameBuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn activate_sets_full_brightness() {
        let mut fb = FrameBuffer::new();
        WoprPattern::seeded(1).activate(&mut fb).unwrap();
        assert_eq!(fb.brightness(), Some(Brightness::MAX));
    }

    #[test]
    fn lit_pixels_use_their_band_color() {
        let mut fb = FrameBuffer::new();
        let mut wopr = WoprPattern::seeded(7);
        for _ in 0..50 {
            wopr.draw(&mut fb).unwrap();
            for (row, _, color) in fb.lit_pixels() {
                assert_eq!(color, ROW_COLORS[row as usize]);
            }
        }
    }

    #[test]
    fn about_two_thirds_of_pixels_are_lit() {
        let mut fb = FrameBuffer::new();
        let mut wopr = WoprPattern::seeded(42);
        let frames = 100;
        let mut lit = 0;
        for _ in 0..frames {
            wopr.draw(&mut fb).unwrap();
            lit += fb.lit_pixels().len();
        }
        let ratio = lit as f64 / (frames * 64) as f64;
        assert!((0.60..0.73).contains(&ratio), "lit ratio {ratio}");
    }

    #[test]
    fn same_seed_same_frames() {
        let mut a = FrameBuffer::new();
        let mut b = FrameBuffer::new();
        let mut wopr_a = WoprPattern::seeded(3);
        let mut wopr_b = WoprPattern::seeded(3);
        for _ in 0..5 {
            wopr_a.draw(&mut a).unwrap();
            wopr_b.draw(&mut b).unwrap();
            assert_eq!(a.lit_pixels(), b.lit_pixels());
        }
    }
}
