//! Primes below 256, one per frame, each drawn as an 8-bit row.
//!
//! The row cursor walks down the panel and wraps every eight frames; the
//! prime cursor restarts (together with the row) after the last entry.

use super::Pattern;
use crate::error::SurfaceError;
use crate::surface::DisplaySurface;
use crate::{Brightness, GRID_SIZE, PaletteCycle, PixelColor};
use std::time::Duration;

pub const PRIMES: [u8; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

#[derive(Debug, Default)]
pub struct PrimePattern {
    index: usize,
    row: u8,
    palette: PaletteCycle,
}

impl PrimePattern {
    pub const PACING: Duration = Duration::from_millis(200);
    pub const BRIGHTNESS: Brightness = Brightness::MAX;

    pub fn new() -> Self {
        Self::default()
    }

    /// Index into [`PRIMES`] of the prime shown by the latest frame.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Row the next frame will draw on.
    pub fn next_row(&self) -> u8 {
        self.row
    }
}

impl Pattern for PrimePattern {
    fn pacing(&self) -> Duration {
        Self::PACING
    }

    fn activate(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        self.index = 0;
        self.row = 0;
        self.palette.reset();
        surface.set_brightness(Self::BRIGHTNESS)
    }

    fn draw(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        surface.clear();

        // The cursor moves before drawing, so PRIMES[0] first shows up on
        // the wrap-around frame.
        self.index += 1;
        if self.index >= PRIMES.len() {
            self.index = 0;
            self.row = 0;
        }
        let number = PRIMES[self.index];
        let row = self.row;
        self.row = (self.row + 1) % GRID_SIZE;

        for col in 0..GRID_SIZE {
            let color = self.palette.advance();
            if number & (1 << col) != 0 {
                surface.set_pixel(row, col, color);
            } else {
                surface.set_pixel(row, col, PixelColor::Off);
            }
        }
        surface.write_display()
    }
}
