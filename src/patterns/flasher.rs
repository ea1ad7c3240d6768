//! Whole-panel on/off flashing. The fire and panic alerts each get their own
//! instance with a different color.

use super::Pattern;
use crate::error::SurfaceError;
use crate::surface::DisplaySurface;
use crate::{Brightness, GRID_SIZE, PixelColor};
use std::time::Duration;

#[derive(Debug)]
pub struct FlasherPattern {
    color: PixelColor,
    lit_next: bool,
}

impl FlasherPattern {
    pub const PACING: Duration = Duration::from_millis(500);
    pub const BRIGHTNESS: Brightness = Brightness::MAX;

    pub fn new(color: PixelColor) -> Self {
        Self {
            color,
            lit_next: true,
        }
    }

    pub fn color(&self) -> PixelColor {
        self.color
    }
}

impl Pattern for FlasherPattern {
    fn pacing(&self) -> Duration {
        Self::PACING
    }

    fn activate(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        self.lit_next = true;
        surface.set_brightness(Self::BRIGHTNESS)
    }

    fn draw(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        let fill = if self.lit_next {
            self.color
        } else {
            PixelColor::Off
        };
        self.lit_next = !self.lit_next;

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                surface.set_pixel(row, col, fill);
            }
        }
        surface.write_display()
    }
}
