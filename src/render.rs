//! Render thread and mode-change API: the status matrix orchestrator.
//!
//! One [`StatusMatrix`] owns the display surface, the mode controller and
//! one instance of every pattern, all behind a single `Mutex`. The render
//! thread and any number of caller threads share that lock:
//! - the render thread reads the mode, sleeps the pattern's pacing *without*
//!   the lock, then locks to draw one frame, then locks again to let the
//!   controller auto-advance
//! - callers lock briefly in [`StatusMatrix::set_mode`] and friends
//!
//! The lock is never held across a sleep and is never nested.
//!
//! ## Rust concepts
//! - `Arc<Mutex<T>>` for one owned resource shared with a spawned thread
//! - `thread::Builder` to name the thread and surface spawn errors
//! - `JoinHandle<Result<..>>` to hand a fatal error back to whoever joins
//! - Split borrows of struct fields (`&mut self.surface` next to
//!   `self.patterns.get_mut(..)`)

use crate::PixelColor;
use crate::error::{IndicatorError, SurfaceError};
use crate::mode::{Mode, ModeController};
use crate::patterns::{
    FibonacciPattern, FlasherPattern, IdlePattern, Pattern, PrimePattern, WoprPattern,
};
use crate::surface::DisplaySurface;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

// ── Status ───────────────────────────────────────────────────────────

/// Snapshot of what the matrix is doing, for status reporting.
#[derive(Clone, Debug, Serialize)]
pub struct IndicatorStatus {
    /// Mode currently on screen
    pub mode: Mode,
    /// True while an alert mode holds the display
    pub locked: bool,
    /// Whole seconds since the mode was last set
    pub seconds_in_mode: u64,
    /// Frames drawn by the render thread since start-up
    pub frames_rendered: u64,
    /// Crate version
    pub version: String,
}

// ── Shared state ─────────────────────────────────────────────────────

/// One instance of every pattern, dispatched by mode.
struct Patterns {
    fibonacci: FibonacciPattern,
    idle: IdlePattern,
    fire: FlasherPattern,
    panic: FlasherPattern,
    prime: PrimePattern,
    wopr: WoprPattern,
}

impl Patterns {
    fn new() -> Self {
        Self {
            fibonacci: FibonacciPattern::new(),
            idle: IdlePattern::new(),
            fire: FlasherPattern::new(PixelColor::Red),
            panic: FlasherPattern::new(PixelColor::Yellow),
            prime: PrimePattern::new(),
            wopr: WoprPattern::new(),
        }
    }

    fn get(&self, mode: Mode) -> &dyn Pattern {
        match mode {
            Mode::Fibonacci => &self.fibonacci,
            Mode::Prime => &self.prime,
            Mode::Wopr => &self.wopr,
            Mode::Idle => &self.idle,
            Mode::Fire => &self.fire,
            Mode::Panic => &self.panic,
        }
    }

    fn get_mut(&mut self, mode: Mode) -> &mut dyn Pattern {
        match mode {
            Mode::Fibonacci => &mut self.fibonacci,
            Mode::Prime => &mut self.prime,
            Mode::Wopr => &mut self.wopr,
            Mode::Idle => &mut self.idle,
            Mode::Fire => &mut self.fire,
            Mode::Panic => &mut self.panic,
        }
    }

    /// Activate every pattern once. The order fixes the brightness left on
    /// the panel at start-up (the last one wins).
    fn activate_all(&mut self, surface: &mut dyn DisplaySurface) -> Result<(), SurfaceError> {
        let order: [&mut dyn Pattern; 6] = [
            &mut self.fibonacci,
            &mut self.idle,
            &mut self.fire,
            &mut self.panic,
            &mut self.prime,
            &mut self.wopr,
        ];
        for pattern in order {
            pattern.activate(surface)?;
        }
        Ok(())
    }
}

/// Everything the lock protects.
struct MatrixState<S> {
    surface: S,
    controller: ModeController,
    patterns: Patterns,
    frames: u64,
}

impl<S: DisplaySurface> MatrixState<S> {
    fn draw(&mut self, mode: Mode) -> Result<(), SurfaceError> {
        self.patterns.get_mut(mode).draw(&mut self.surface)?;
        self.frames += 1;
        Ok(())
    }
}

/// Lock the shared state. A panic on another thread while it held the lock
/// leaves the state usable (every mutation is a plain field write), so a
/// poisoned lock is taken over rather than propagated.
fn lock_state<S>(shared: &Mutex<MatrixState<S>>) -> MutexGuard<'_, MatrixState<S>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Orchestrator ─────────────────────────────────────────────────────

/// The status matrix: shared display state plus the render thread that
/// animates it.
///
/// Rust concept: INTERIOR MUTABILITY
/// Every method takes `&self`. Mutation goes through the `Mutex`, so a
/// `StatusMatrix` can sit in an `Arc` and be driven from many threads.
pub struct StatusMatrix<S> {
    shared: Arc<Mutex<MatrixState<S>>>,
    started: AtomicBool,
}

impl<S: DisplaySurface> StatusMatrix<S> {
    /// Initialize the surface, build every pattern and activate them.
    /// The render thread is not started until [`run`](Self::run).
    pub fn new(mut surface: S) -> Result<Self, IndicatorError> {
        surface.begin()?;

        let mut patterns = Patterns::new();
        patterns.activate_all(&mut surface)?;

        let controller = ModeController::new();
        tracing::info!("Status matrix ready, starting in {} mode", controller.get());

        Ok(Self {
            shared: Arc::new(Mutex::new(MatrixState {
                surface,
                controller,
                patterns,
                frames: 0,
            })),
            started: AtomicBool::new(false),
        })
    }

    /// Request a mode change.
    ///
    /// With `override_lock` the controller is set to `mode` unconditionally.
    /// Then, override or not, the current mode is re-read: if it is Fire or
    /// Panic the call stops there, otherwise the controller is set to `mode`
    /// (again). The whole sequence runs in one critical section.
    ///
    /// Returns the mode in effect afterwards.
    pub fn set_mode(&self, mode: Mode, override_lock: bool) -> Mode {
        let mut state = lock_state(&self.shared);
        let previous = state.controller.get();

        if override_lock {
            state.controller.set(mode);
        }

        let current = state.controller.get();
        if current.is_locked() {
            if current != mode {
                tracing::debug!("Ignoring request for {} mode: {} is locked", mode, current);
            } else if previous != current {
                tracing::info!("Mode {} -> {} (override)", previous, current);
            }
            return current;
        }

        state.controller.set(mode);
        if previous != mode {
            tracing::info!(
                "Mode {} -> {}{}",
                previous,
                mode,
                if override_lock { " (override)" } else { "" }
            );
        }
        mode
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        lock_state(&self.shared).controller.get()
    }

    pub fn status(&self) -> IndicatorStatus {
        let state = lock_state(&self.shared);
        let mode = state.controller.get();
        IndicatorStatus {
            mode,
            locked: mode.is_locked(),
            seconds_in_mode: state.controller.dwell_at(Instant::now()).as_secs(),
            frames_rendered: state.frames,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Inspect the display surface under the matrix lock.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = lock_state(&self.shared);
        f(&state.surface)
    }
}

impl<S: DisplaySurface + Send + 'static> StatusMatrix<S> {
    /// Start the render thread. May be called once.
    ///
    /// The thread runs until the process exits, unless the display surface
    /// reports an error: then the loop stops and the error comes back out of
    /// the returned handle's `join()`.
    pub fn run(&self) -> Result<JoinHandle<Result<(), SurfaceError>>, IndicatorError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(IndicatorError::AlreadyRunning);
        }

        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name("status-matrix".to_string())
            .spawn(move || render_loop(shared))
            .map_err(|e| {
                self.started.store(false, Ordering::SeqCst);
                IndicatorError::Spawn(e)
            })
    }
}

// ── Render loop ──────────────────────────────────────────────────────

/// Draw frames forever: read the mode, display one frame of its pattern,
/// let the controller auto-advance.
fn render_loop<S: DisplaySurface>(shared: Arc<Mutex<MatrixState<S>>>) -> Result<(), SurfaceError> {
    tracing::info!("Render thread started");

    loop {
        let (mode, pacing) = {
            let state = lock_state(&shared);
            let mode = state.controller.get();
            (mode, state.patterns.get(mode).pacing())
        };

        if let Err(e) = display_frame(&shared, mode, pacing) {
            tracing::error!("Display failed in {} mode, render thread stopping: {}", mode, e);
            return Err(e);
        }

        let advanced = lock_state(&shared).controller.evaluate();
        if let Some(next) = advanced {
            tracing::info!("Auto-advancing from {} to {} mode", mode, next);
        }
    }
}

/// Sleep the pacing interval, then draw one frame under the lock.
fn display_frame<S: DisplaySurface>(
    shared: &Mutex<MatrixState<S>>,
    mode: Mode,
    pacing: Duration,
) -> Result<(), SurfaceError> {
    thread::sleep(pacing);
    lock_state(shared).draw(mode)
}

// ── Tests ────────────────────────────────────────────────────────────
