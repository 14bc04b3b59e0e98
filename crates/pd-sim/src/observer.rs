//! Simulation observer trait for progress reporting and data collection.

use pd_core::Tick;

use crate::engine::Snapshot;
use crate::measure::MeasureRecord;

/// Callbacks invoked by the engine at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers receive read-only data —
/// records and snapshots, never live grid references.
///
/// # Example — measurement printer
///
/// ```rust,ignore
/// struct MeasurePrinter;
///
/// impl SimObserver for MeasurePrinter {
///     fn on_measure(&mut self, record: &MeasureRecord) {
///         println!(
///             "ped {} at ({}, {}): {:.2} ped/m², {:.2} m/s",
///             record.pedestrian_id, record.row, record.col,
///             record.density, record.speed,
///         );
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any pedestrian moves.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `active` is the number of pedestrians still in the simulation after
    /// this tick's removals.
    fn on_tick_end(&mut self, _tick: Tick, _active: usize) {}

    /// Called whenever a committed move (or teleport) lands on a registered
    /// measuring point.
    fn on_measure(&mut self, _record: &MeasureRecord) {}

    /// Called once per tick with the freshly recorded grid snapshot.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}

    /// Called once when a run finishes (evacuation complete or tick cap).
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to step the
/// engine but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
