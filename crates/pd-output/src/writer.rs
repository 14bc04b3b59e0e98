//! The `OutputWriter` trait implemented by backend writers.

use pd_sim::{MeasureRecord, Snapshot};

use crate::OutputResult;

/// Trait implemented by output backends (CSV today; the observer is
/// backend-agnostic).
///
/// All methods are infallible from the engine's perspective — errors are
/// stored by [`OutputObserver`][crate::OutputObserver] and retrieved with
/// `take_error` after the run.
pub trait OutputWriter {
    /// Write one measuring-point record.
    fn write_measure(&mut self, record: &MeasureRecord) -> OutputResult<()>;

    /// Write one per-tick grid snapshot.  `cols` is the grid's width, used
    /// to split the flat code array into rows.
    fn write_snapshot(&mut self, snapshot: &Snapshot, cols: u32) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
