//! Fibonacci numbers as 64-bit images.
//!
//! Byte `n` of the current term lights column `n`; bit `b` of that byte
//! lights row `b`. Lit pixels take the next color of a rotating palette.

use super::Pattern;
use crate::error::SurfaceError;
use crate::surface::DisplaySurface;
use crate::{Brightness, GRID_SIZE, PaletteCycle, PixelColor};
use std::time::Duration;

/// Largest Fibonacci number that fits in an `i64` (F92). Once the sequence
/// passes it, it restarts from the seed.
pub const FIB_LIMIT: u64 = 7_540_113_804_746_346_429;

const SEED: [u64; 3] = [1, 1, 2];

/// Three consecutive Fibonacci terms; the newest is the one displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FibonacciSequence {
    terms: [u64; 3],
}

impl FibonacciSequence {
    pub fn new() -> Self {
        Self { terms: SEED }
    }

    pub fn terms(&self) -> [u64; 3] {
        self.terms
    }

    pub fn current(&self) -> u64 {
        self.terms[2]
    }

    /// Step to the next term, or back to the seed once past [`FIB_LIMIT`].
    pub fn advance(&mut self) {
        let [_, b, c] = self.terms;
        self.terms = match b.checked_add(c).filter(|&next| next <= FIB_LIMIT) {
            Some(next) => [b, c, next],
            None => SEED,
        };
    }
}

impl Default for FibonacciSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct FibonacciPattern {
    sequence: FibonacciSequence,
    palette: PaletteCycle,
}

impl FibonacciPattern {
    pub const PACING: Duration = Duration::from_millis(200);
    pub const BRIGHTNESS: Brightness = Brightness::new(5);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(&self) -> FibonacciSequence {
        self.sequence
    }
}

impl Pattern for FibonacciPattern {
    fn pacing(&self) -> Duration {
        Self::PACING
    }

    fn activate(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        self.sequence = FibonacciSequence::new();
        self.palette.reset();
        surface.set_brightness(Self::BRIGHTNESS)
    }

    fn draw(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        // No clear: every pixel is rewritten below.
        let value = self.sequence.current();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let color = self.palette.advance();
                let byte = value >> (8 * u32::from(col));
                if byte & (1 << row) != 0 {
                    surface.set_pixel(row, col, color);
                } else {
                    surface.set_pixel(row, col, PixelColor::Off);
                }
            }
        }
        surface.write_display()?;
        self.sequence.advance();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameBuffer;
    use pretty_assertions::assert_eq;

    fn activated() -> (FibonacciPattern, FrameBuffer) {
        let mut fb = FrameBuffer::new();
        let mut fib = FibonacciPattern::new();
        fib.activate(&mut fb).unwrap();
        (fib, fb)
    }

    #[test]
    fn sequence_starts_at_seed() {
        assert_eq!(FibonacciSequence::new().terms(), [1, 1, 2]);
    }

    #[test]
    fn sequence_advances_like_fibonacci() {
        let mut seq = FibonacciSequence::new();
        let terms: Vec<u64> = (0..8)
            .map(|_| {
                seq.advance();
                seq.current()
            })
            .collect();
        assert_eq!(terms, vec![3, 5, 8, 13, 21, 34, 55, 89]);
    }

    #[test]
    fn sequence_resets_right_after_the_limit() {
        let mut seq = FibonacciSequence::new();
        for _ in 0..89 {
            seq.advance();
            assert!(seq.current() <= FIB_LIMIT);
        }
        assert_eq!(seq.current(), FIB_LIMIT);

        seq.advance();
        assert_eq!(seq.terms(), [1, 1, 2]);

        seq.advance();
        assert_eq!(seq.current(), 3);
    }

    #[test]
    fn activate_sets_brightness_5() {
        let (_, fb) = activated();
        assert_eq!(fb.brightness(), Some(Brightness::new(5)));
    }

    #[test]
    fn first_frames_show_seed_bits() {
        let (mut fib, mut fb) = activated();

        // 2 = bit 1 of byte 0: row 1, column 0, ninth palette step.
        fib.draw(&mut fb).unwrap();
        assert_eq!(fb.lit_pixels(), vec![(1, 0, PixelColor::Yellow)]);

        // 3 = bits 0 and 1. The palette kept running across the 64 pixels
        // of the previous frame.
        fib.draw(&mut fb).unwrap();
        assert_eq!(
            fb.lit_pixels(),
            vec![(0, 0, PixelColor::Red), (1, 0, PixelColor::Green)]
        );
        assert_eq!(fb.write_count(), 2);
    }

    #[test]
    fn high_byte_maps_to_last_column() {
        let (mut fib, mut fb) = activated();
        for _ in 0..89 {
            fib.sequence.advance();
        }
        fib.draw(&mut fb).unwrap();

        let rows_in_last_col: Vec<u8> = fb
            .lit_pixels()
            .into_iter()
            .filter(|&(_, col, _)| col == 7)
            .map(|(row, _, _)| row)
            .collect();
        assert_eq!(rows_in_last_col, vec![3, 5, 6]);
        assert_eq!(fib.sequence().terms(), [1, 1, 2]);
    }

    #[test]
    fn activate_restarts_sequence() {
        let (mut fib, mut fb) = activated();
        for _ in 0..5 {
            fib.draw(&mut fb).unwrap();
        }
        fib.activate(&mut fb).unwrap();
        assert_eq!(fib.sequence().terms(), [1, 1, 2]);
    }
}
