//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to simulated wall time is held in `SimClock`:
//!
//!   simulated_ms = tick * step_ms
//!
//! Using an integer tick as the canonical time unit means all movement-delay
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//!
//! The default step is 300 ms of simulated time per tick — one full-cell
//! straight move at the reference walking speed of 1.33 m/s on a 0.4 m cell.

use std::fmt;

/// Simulated milliseconds per tick when nothing else is configured.
pub const DEFAULT_STEP_MS: u32 = 300;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated milliseconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated milliseconds one tick represents.
    pub step_ms: u32,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0 with the given resolution.
    pub fn new(step_ms: u32) -> Self {
        Self {
            step_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Rewind to tick 0 (simulation restart).
    #[inline]
    pub fn rewind(&mut self) {
        self.current_tick = Tick::ZERO;
    }

    /// Simulated milliseconds elapsed since tick 0.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.current_tick.0 * self.step_ms as u64
    }

    /// Simulated seconds elapsed since tick 0.
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.now_ms() as f64 / 1000.0
    }
}

impl Default for SimClock {
    fn default() -> Self {
        SimClock::new(DEFAULT_STEP_MS)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} s)", self.current_tick, self.now_secs())
    }
}
