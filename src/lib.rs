//! Status indicator core for an 8x8 bicolor LED matrix.
//!
//! The matrix cycles through animated modes on a timer and can be forced
//! into an alert state (fire or panic) by an external alarm subsystem.
//! This crate holds the scheduling and concurrency core:
//! - [`mode`]: the mode enum, its rotation table, and the dwell-timer controller
//! - [`patterns`]: the six frame renderers
//! - [`render`]: the orchestrator that owns the lock and the render thread
//! - [`surface`]: the display collaborator trait plus software surfaces
//!
//! The shared helpers below (colors, brightness, palette cycling, signal
//! handling) are used by several of those modules and by the demo binary.

pub mod error;
pub mod mode;
pub mod patterns;
pub mod render;
pub mod surface;

pub use error::{IndicatorError, SurfaceError};
pub use mode::{Mode, ModeController};
pub use render::{IndicatorStatus, StatusMatrix};
pub use surface::{DisplaySurface, FrameBuffer, TerminalSurface};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Grid ───────────────────────────────────────────────────────────

/// Rows and columns on the matrix. The panel is always square.
pub const GRID_SIZE: u8 = 8;

// ── Color ──────────────────────────────────────────────────────────

/// One of the four states a bicolor pixel can show.
///
/// The discriminants are the wire codes the LED backpack expects, so
/// `PixelColor::Yellow as u8 == 3` (both the red and green dies lit).
///
/// # Rust concept: fieldless enums with explicit discriminants
/// `#[repr(u8)]` pins the size and lets `as u8` produce the code directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelColor {
    #[default]
    Off = 0,
    Green = 1,
    Red = 2,
    Yellow = 3,
}

impl PixelColor {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a 2-bit code back to a color. Only the low two bits are used.
    pub fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0 => Self::Off,
            1 => Self::Green,
            2 => Self::Red,
            _ => Self::Yellow,
        }
    }

    pub fn is_lit(self) -> bool {
        self != Self::Off
    }
}

// ── Brightness ─────────────────────────────────────────────────────

/// Backpack dimming level, 0 (dimmest) to 15 (full).
///
/// # Rust concept: newtypes
/// Wrapping the `u8` means a `Brightness` can never hold 200; the range
/// check happens once, in [`Brightness::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Brightness(u8);

impl Brightness {
    pub const MAX: Self = Self(15);

    /// Clamp `level` into 0-15.
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX.0 {
            Self::MAX
        } else {
            Self(level)
        }
    }

    pub const fn level(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

// ── Palette cycling ────────────────────────────────────────────────

/// Rotating 3-color palette shared by the Fibonacci and Prime patterns.
///
/// Each call to [`advance`](Self::advance) yields green, red, yellow, green, ...
/// starting from green after a reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaletteCycle {
    step: u8,
}

impl PaletteCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }

    pub fn advance(&mut self) -> PixelColor {
        self.step = if self.step >= 3 { 1 } else { self.step + 1 };
        PixelColor::from_code(self.step)
    }
}

// ── Signal handling ────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// The flag is shared between the main loop and the signal handler. `Arc`
/// gives both shared ownership, `AtomicBool` makes the flag thread-safe
/// without a mutex.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────
