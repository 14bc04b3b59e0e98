//! `pd-sim` — the tick-stepped movement engine of the rust_pd crowd
//! simulator.
//!
//! # Tick anatomy
//!
//! ```text
//! for each pedestrian, in creation (ascending-id) order:
//!   ① Boundary   — with periodic boundaries, a pedestrian next to a Target
//!                  teleports to column 0 (or waits) and is done.
//!   ② Gate       — with individual speeds, skip pedestrians whose per-cell
//!                  delay has not elapsed (no side effects at all).
//!   ③ Candidate  — own cell vs. straight then diagonal neighbors, costed
//!                  as static field + repulsion from every other pedestrian;
//!                  an adjacent free Target wins outright.
//!   ④ Move       — straight commits immediately; diagonal accumulates
//!                  ±0.71 per axis and commits once both reach a full cell.
//!   ⑤ Commit     — vacate, record history, occupy; arriving on a Target
//!                  queues removal (absorbing) or stays put (blocking).
//! then: sweep queued removals, snapshot the grid, advance the clock.
//! ```
//!
//! Moves mutate shared grid state immediately, so later pedestrians in the
//! same tick observe earlier pedestrians' new positions.  This sequential
//! contract is what rules out double occupancy.
//!
//! # Instrumentation
//!
//! Cells registered as measuring points emit a [`MeasureRecord`] (local
//! density over a 9×9 window, trail speed from the pedestrian's bounded
//! history) through [`SimObserver::on_measure`] whenever a committed move
//! lands on them.

pub mod engine;
pub mod error;
pub mod measure;
pub mod observer;
pub mod options;
pub mod pedestrian;
pub mod spline;


pub use engine::{DIAGONAL_STEP, Simulation, Snapshot};
pub use error::{SimError, SimResult};
pub use measure::{DENSITY_WINDOW, MeasureRecord, local_density};
pub use observer::{NoopObserver, SimObserver};
pub use options::{DEFAULT_R_MAX, DEFAULT_WALKING_SPEED, SimOptions};
pub use pedestrian::{HISTORY_CAPACITY, HistoryEntry, Pedestrian};
pub use spline::{AGE_KNOTS, AgeSpeedCurve, SPEED_KNOTS};
