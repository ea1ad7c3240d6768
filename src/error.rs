//! Error types for the status matrix.
//!
//! The scheduling core itself has no failure modes. Everything that can go
//! wrong comes from the display collaborator or from the thin boundary where
//! callers hand us raw mode codes.

use thiserror::Error;

/// A failure reported by a [`DisplaySurface`](crate::surface::DisplaySurface).
///
/// The render loop does not catch or retry these. The first one it sees ends
/// the loop and is returned through the render thread's `JoinHandle`.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("display I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("display bus error: {0}")]
    Bus(String),
}

#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("unknown mode code {0} (expected 0-5)")]
    UnknownModeCode(u8),

    #[error("unknown mode name `{0}`")]
    UnknownModeName(String),

    #[error("render loop is already running")]
    AlreadyRunning,

    #[error("failed to spawn render thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
