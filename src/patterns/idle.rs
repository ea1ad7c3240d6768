//! A single green pixel crawling backwards through the grid, one step per
//! second. Starts in the bottom-right corner and wraps around forever.

use super::Pattern;
use crate::error::SurfaceError;
use crate::surface::DisplaySurface;
use crate::{Brightness, GRID_SIZE, PixelColor};
use std::time::Duration;

const LAST: u8 = GRID_SIZE - 1;

#[derive(Debug)]
pub struct IdlePattern {
    row: u8,
    col: u8,
}

impl IdlePattern {
    pub const PACING: Duration = Duration::from_millis(1000);
    pub const BRIGHTNESS: Brightness = Brightness::new(8);

    pub fn new() -> Self {
        Self {
            row: LAST,
            col: LAST,
        }
    }

    /// `(row, col)` of the pixel lit by the most recent frame.
    pub fn position(&self) -> (u8, u8) {
        (self.row, self.col)
    }

    fn step(&mut self) {
        if self.col == 0 {
            self.col = LAST;
            self.row = if self.row == 0 { LAST } else { self.row - 1 };
        } else {
            self.col -= 1;
        }
    }
}

impl Default for IdlePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for IdlePattern {
    fn pacing(&self) -> Duration {
        Self::PACING
    }

    fn activate(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        self.row = LAST;
        self.col = LAST;
        surface.set_brightness(Self::BRIGHTNESS)
    }

    fn draw(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        surface.clear();
        surface.set_pixel(self.row, self.col, PixelColor::Off);
        self.step();
        surface.set_pixel(self.row, self.col, PixelColor::Green);
        surface.write_display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameBuffer;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn activated() -> (IdlePattern, FrameBuffer) {
        let mut fb = FrameBuffer::new();
        let mut idle = IdlePattern::new();
        idle.activate(&mut fb).unwrap();
        (idle, fb)
    }

    #[test]
    fn activate_sets_brightness_8() {
        let (idle, fb) = activated();
        assert_eq!(fb.brightness(), Some(Brightness::new(8)));
        assert_eq!(idle.position(), (7, 7));
    }

    #[rstest]
    #[case(1, (7, 6))]
    #[case(7, (7, 0))]
    #[case(8, (6, 7))]
    #[case(63, (0, 0))]
    fn pixel_crawls_backwards(#[case] frames: usize, #[case] expected: (u8, u8)) {
        let (mut idle, mut fb) = activated();
        for _ in 0..frames {
            idle.draw(&mut fb).unwrap();
        }
        assert_eq!(idle.position(), expected);
        assert_eq!(
            fb.lit_pixels(),
            vec![(expected.0, expected.1, PixelColor::Green)]
        );
    }

    #[test]
    fn crawl_returns_to_start_after_64_frames() {
        let (mut idle, mut fb) = activated();
        for _ in 0..64 {
            idle.draw(&mut fb).unwrap();
            assert_eq!(fb.lit_pixels().len(), 1);
        }
        assert_eq!(idle.position(), (7, 7));
        assert_eq!(fb.lit_pixels(), vec![(7, 7, PixelColor::Green)]);
    }
}
