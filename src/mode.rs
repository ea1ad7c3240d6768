//! Display modes and the dwell-timer controller that rotates through them.
//!
//! Three modes take part in the automatic demo rotation:
//! Fibonacci → Prime → Wopr → Fibonacci, one step every [`DWELL`].
//! Idle is a demo mode too but it is sticky: once set it stays until an
//! external call changes it. Fire and Panic are *locked* alert modes that
//! only an override can enter or leave.
//!
//! ## Rust concepts
//! - `TryFrom<u8>` / `FromStr` for checked conversion at the API boundary
//! - `Option` as the result of a transition that may not happen
//! - Passing `Instant` explicitly so time-based logic is testable

use crate::error::IndicatorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// How long a rotating mode stays on screen before auto-advancing.
pub const DWELL: Duration = Duration::from_secs(30);

/// What the matrix is showing.
///
/// The discriminants are the public mode codes used by the alarm subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Mode {
    Fibonacci = 0,
    Prime = 1,
    Wopr = 2,
    Idle = 3,
    Fire = 4,
    Panic = 5,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Fibonacci,
        Mode::Prime,
        Mode::Wopr,
        Mode::Idle,
        Mode::Fire,
        Mode::Panic,
    ];

    /// Modes that auto-advance, in rotation order. The last wraps to the first.
    pub const ROTATION: [Mode; 3] = [Mode::Fibonacci, Mode::Prime, Mode::Wopr];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Fibonacci => "fibonacci",
            Mode::Prime => "prime",
            Mode::Wopr => "wopr",
            Mode::Idle => "idle",
            Mode::Fire => "fire",
            Mode::Panic => "panic",
        }
    }

    /// Fire and Panic: only an override call can move the matrix out of them.
    pub fn is_locked(self) -> bool {
        matches!(self, Mode::Fire | Mode::Panic)
    }

    /// The mode the rotation moves to after this one, or `None` when this
    /// mode never auto-advances (Idle, Fire, Panic).
    pub fn next_in_rotation(self) -> Option<Mode> {
        let pos = Self::ROTATION.iter().position(|&m| m == self)?;
        Some(Self::ROTATION[(pos + 1) % Self::ROTATION.len()])
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Mode {
    type Error = IndicatorError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Mode::ALL
            .get(code as usize)
            .copied()
            .ok_or(IndicatorError::UnknownModeCode(code))
    }
}

impl FromStr for Mode {
    type Err = IndicatorError;

    /// Accepts a mode name (case-insensitive) or its numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Mode::try_from(code);
        }
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| IndicatorError::UnknownModeName(s.to_string()))
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Current mode plus the instant it became active.
///
/// The controller holds no lock of its own. It lives inside the
/// orchestrator's shared state, so every call already happens under the
/// matrix lock.
#[derive(Clone, Debug)]
pub struct ModeController {
    current: Mode,
    started_at: Instant,
}

impl ModeController {
    /// Start in Fibonacci mode, dwell timer running from now.
    pub fn new() -> Self {
        Self::starting_at(Mode::Fibonacci, Instant::now())
    }

    pub fn starting_at(mode: Mode, now: Instant) -> Self {
        Self {
            current: mode,
            started_at: now,
        }
    }

    /// Switch to `mode` and restart the dwell timer. No questions asked.
    pub fn set(&mut self, mode: Mode) {
        self.set_at(mode, Instant::now());
    }

    pub fn set_at(&mut self, mode: Mode, now: Instant) {
        self.current = mode;
        self.started_at = now;
    }

    pub fn get(&self) -> Mode {
        self.current
    }

    /// Time spent in the current mode as of `now`.
    pub fn dwell_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn evaluate(&mut self) -> Option<Mode> {
        self.evaluate_at(Instant::now())
    }

    /// Advance to the next rotation mode if the current one has been shown
    /// for longer than [`DWELL`]. Returns the new mode when it changed.
    pub fn evaluate_at(&mut self, now: Instant) -> Option<Mode> {
        let next = self.current.next_in_rotation()?;
        if self.dwell_at(now) > DWELL {
            self.set_at(next, now);
            Some(next)
        } else {
            None
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[rstest]
    #[case(Mode::Fibonacci, Some(Mode::Prime))]
    #[case(Mode::Prime, Some(Mode::Wopr))]
    #[case(Mode::Wopr, Some(Mode::Fibonacci))]
    #[case(Mode::Idle, None)]
    #[case(Mode::Fire, None)]
    #[case(Mode::Panic, None)]
    fn rotation_table(#[case] from: Mode, #[case] to: Option<Mode>) {
        assert_eq!(from.next_in_rotation(), to);
    }

    #[test]
    fn rotation_never_enters_idle_or_alerts() {
        let mut mode = Mode::Fibonacci;
        for _ in 0..30 {
            mode = mode.next_in_rotation().unwrap();
            assert!(Mode::ROTATION.contains(&mode));
        }
    }

    #[rstest]
    #[case(Mode::Fire, true)]
    #[case(Mode::Panic, true)]
    #[case(Mode::Idle, false)]
    #[case(Mode::Wopr, false)]
    fn locked_modes(#[case] mode: Mode, #[case] locked: bool) {
        assert_eq!(mode.is_locked(), locked);
    }

    #[test]
    fn codes_round_trip_through_try_from() {
        for mode in Mode::ALL {
            assert_eq!(Mode::try_from(mode.code()).unwrap(), mode);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(matches!(
            Mode::try_from(6),
            Err(IndicatorError::UnknownModeCode(6))
        ));
    }

    #[rstest]
    #[case("fire", Mode::Fire)]
    #[case("WOPR", Mode::Wopr)]
    #[case(" idle ", Mode::Idle)]
    #[case("1", Mode::Prime)]
    fn parse_mode_names_and_codes(#[case] input: &str, #[case] expected: Mode) {
        assert_eq!(input.parse::<Mode>().unwrap(), expected);
    }

    #[test]
    fn parse_unknown_name_fails() {
        assert!(matches!(
            "disco".parse::<Mode>(),
            Err(IndicatorError::UnknownModeName(name)) if name == "disco"
        ));
    }

    #[test]
    fn mode_serializes_as_snake_case_name() {
        assert_eq!(serde_json::to_string(&Mode::Panic).unwrap(), "\"panic\"");
    }

    #[test]
    fn mode_deserializes_from_name() {
        let mode: Mode = serde_json::from_str("\"wopr\"").unwrap();
        assert_eq!(mode, Mode::Wopr);
        assert!(serde_json::from_str::<Mode>("\"disco\"").is_err());
    }

    #[test]
    fn rotation_advances_after_each_dwell_period() {
        let t0 = Instant::now();
        let mut ctl = ModeController::starting_at(Mode::Fibonacci, t0);

        assert_eq!(ctl.evaluate_at(t0 + secs(31)), Some(Mode::Prime));
        // Halfway through the next dwell period nothing changes.
        assert_eq!(ctl.evaluate_at(t0 + secs(45)), None);
        assert_eq!(ctl.get(), Mode::Prime);
        assert_eq!(ctl.evaluate_at(t0 + secs(62)), Some(Mode::Wopr));
        assert_eq!(ctl.evaluate_at(t0 + secs(80)), None);
        assert_eq!(ctl.get(), Mode::Wopr);
        assert_eq!(ctl.evaluate_at(t0 + secs(93)), Some(Mode::Fibonacci));
    }

    #[test]
    fn exactly_thirty_seconds_does_not_advance() {
        let t0 = Instant::now();
        let mut ctl = ModeController::starting_at(Mode::Prime, t0);
        assert_eq!(ctl.evaluate_at(t0 + DWELL), None);
        assert_eq!(ctl.get(), Mode::Prime);
    }

    #[rstest]
    #[case(Mode::Idle)]
    #[case(Mode::Fire)]
    #[case(Mode::Panic)]
    fn sticky_modes_never_auto_advance(#[case] mode: Mode) {
        let t0 = Instant::now();
        let mut ctl = ModeController::starting_at(mode, t0);
        for minutes in 1..=60 {
            assert_eq!(ctl.evaluate_at(t0 + secs(minutes * 60)), None);
        }
        assert_eq!(ctl.get(), mode);
    }

    #[test]
    fn set_restarts_dwell_timer() {
        let t0 = Instant::now();
        let mut ctl = ModeController::starting_at(Mode::Fibonacci, t0);
        ctl.set_at(Mode::Wopr, t0 + secs(25));
        assert_eq!(ctl.dwell_at(t0 + secs(40)), secs(15));
        assert_eq!(ctl.evaluate_at(t0 + secs(50)), None);
        assert_eq!(ctl.evaluate_at(t0 + secs(56)), Some(Mode::Fibonacci));
    }

    #[test]
    fn dwell_before_start_is_zero() {
        let t0 = Instant::now();
        let ctl = ModeController::starting_at(Mode::Prime, t0 + secs(10));
        assert_eq!(ctl.dwell_at(t0), Duration::ZERO);
    }
}
