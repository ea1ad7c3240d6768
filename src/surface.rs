//! The display collaborator: an 8x8 grid of 2-bit pixels.
//!
//! Hardware drivers live outside this crate. They implement
//! [`DisplaySurface`] and get handed to [`StatusMatrix::new`](crate::StatusMatrix::new).
//! Two software surfaces ship here:
//! - [`FrameBuffer`]: pure in-memory grid, used by tests and as the backing
//!   store of the terminal surface
//! - [`TerminalSurface`]: prints each written frame to any `io::Write`
//!
//! ## Rust concepts
//! - Trait objects (`&mut dyn DisplaySurface`) so patterns stay non-generic
//! - `impl<W: Write>` blocks for writer-agnostic output
//! - `?` converting `io::Error` into `SurfaceError` through `From`

use crate::error::SurfaceError;
use crate::{Brightness, GRID_SIZE, PixelColor};
use std::io::Write;

const CELLS: usize = GRID_SIZE as usize;

type Grid = [[PixelColor; CELLS]; CELLS];

/// Contract of the physical LED backpack.
///
/// `clear` and `set_pixel` only touch the driver's in-memory buffer and
/// cannot fail. The calls that talk to the bus return `Result`.
pub trait DisplaySurface {
    /// One-time hardware initialization.
    fn begin(&mut self) -> Result<(), SurfaceError>;

    /// Blank the in-memory buffer.
    fn clear(&mut self);

    /// Set one pixel in the in-memory buffer. Coordinates outside the grid
    /// are ignored.
    fn set_pixel(&mut self, row: u8, col: u8, color: PixelColor);

    fn set_brightness(&mut self, level: Brightness) -> Result<(), SurfaceError>;

    /// Flush the in-memory buffer to the LEDs.
    fn write_display(&mut self) -> Result<(), SurfaceError>;
}

// ── FrameBuffer ──────────────────────────────────────────────────────

/// In-memory surface that remembers the buffer, the last flushed frame,
/// and the last brightness it was given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    buffer: Grid,
    shown: Grid,
    brightness: Option<Brightness>,
    begun: bool,
    writes: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color of a pixel in the last flushed frame.
    pub fn pixel(&self, row: u8, col: u8) -> PixelColor {
        self.shown
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or_default()
    }

    /// Every lit pixel of the last flushed frame as `(row, col, color)`,
    /// in row-major order.
    pub fn lit_pixels(&self) -> Vec<(u8, u8, PixelColor)> {
        let mut lit = Vec::new();
        for (row, cells) in self.shown.iter().enumerate() {
            for (col, color) in cells.iter().enumerate() {
                if color.is_lit() {
                    lit.push((row as u8, col as u8, *color));
                }
            }
        }
        lit
    }

    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    pub fn is_begun(&self) -> bool {
        self.begun
    }

    /// Number of `write_display` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn rows(&self) -> &Grid {
        &self.shown
    }
}

impl DisplaySurface for FrameBuffer {
    fn begin(&mut self) -> Result<(), SurfaceError> {
        self.begun = true;
        Ok(())
    }

    fn clear(&mut self) {
        self.buffer = Grid::default();
    }

    fn set_pixel(&mut self, row: u8, col: u8, color: PixelColor) {
        if let Some(cell) = self
            .buffer
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            *cell = color;
        }
    }

    fn set_brightness(&mut self, level: Brightness) -> Result<(), SurfaceError> {
        self.brightness = Some(level);
        Ok(())
    }

    fn write_display(&mut self) -> Result<(), SurfaceError> {
        self.shown = self.buffer;
        self.writes += 1;
        Ok(())
    }
}

// ── TerminalSurface ──────────────────────────────────────────────────

/// Prints every flushed frame to a writer, one text line per matrix row.
///
/// With `ansi` enabled the cursor is sent home before each frame and pixels
/// are drawn as colored dots, so a terminal shows a live animation. Without
/// it each pixel is a letter (`.`, `G`, `R`, `Y`), which suits log files.
pub struct TerminalSurface<W: Write> {
    frame: FrameBuffer,
    out: W,
    ansi: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, ansi: bool) -> Self {
        Self {
            frame: FrameBuffer::new(),
            out,
            ansi,
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn glyph(&self, color: PixelColor) -> &'static str {
        match (self.ansi, color) {
            (false, PixelColor::Off) => ".",
            (false, PixelColor::Green) => "G",
            (false, PixelColor::Red) => "R",
            (false, PixelColor::Yellow) => "Y",
            (true, PixelColor::Off) => "\x1b[90m·\x1b[0m",
            (true, PixelColor::Green) => "\x1b[32m●\x1b[0m",
            (true, PixelColor::Red) => "\x1b[31m●\x1b[0m",
            (true, PixelColor::Yellow) => "\x1b[33m●\x1b[0m",
        }
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn begin(&mut self) -> Result<(), SurfaceError> {
        self.frame.begin()?;
        if self.ansi {
            // Clear screen once; later frames only move the cursor home.
            write!(self.out, "\x1b[2J")?;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    fn set_pixel(&mut self, row: u8, col: u8, color: PixelColor) {
        self.frame.set_pixel(row, col, color);
    }

    fn set_brightness(&mut self, level: Brightness) -> Result<(), SurfaceError> {
        self.frame.set_brightness(level)
    }

    fn write_display(&mut self) -> Result<(), SurfaceError> {
        self.frame.write_display()?;

        let mut text = String::new();
        if self.ansi {
            text.push_str("\x1b[H");
        }
        let level = self.frame.brightness().unwrap_or_default().level();
        text.push_str(&format!("brightness {level:>2}/15\n"));
        for cells in self.frame.rows() {
            for color in cells {
                text.push_str(self.glyph(*color));
            }
            text.push('\n');
        }

        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
