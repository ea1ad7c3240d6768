//! Frame renderers, one per display mode.
//!
//! Each pattern owns a small animation cursor. `activate` resets that cursor
//! and sets the pattern's brightness; `draw` emits exactly one frame and
//! advances the cursor. Pacing is reported by [`Pattern::pacing`] and applied
//! by the render loop, which sleeps *before* taking the matrix lock to draw.
//!
//! ## Rust concepts
//! - Object-safe traits: `&mut dyn Pattern` lets the orchestrator dispatch
//!   on the mode without generics
//! - `&mut dyn DisplaySurface` so patterns work with any backend

mod fibonacci;
mod flasher;
mod idle;
mod prime;
mod wopr;

pub use fibonacci::{FIB_LIMIT, FibonacciPattern, FibonacciSequence};
pub use flasher::FlasherPattern;
pub use idle::IdlePattern;
pub use prime::{PRIMES, PrimePattern};
pub use wopr::WoprPattern;

use crate::error::SurfaceError;
use crate::surface::DisplaySurface;
use std::time::Duration;

pub trait Pattern: Send {
    /// Delay before each frame. Sets the mode's frame rate.
    fn pacing(&self) -> Duration;

    /// Reset the animation and configure brightness for this pattern.
    fn activate(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError>;

    /// Draw one frame, flush it, and advance the animation.
    fn draw(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError>;
}
