//! `OutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use pd_core::Tick;
use pd_sim::{MeasureRecord, SimObserver, Snapshot};

use crate::OutputError;
use crate::writer::OutputWriter;

/// A [`SimObserver`] that forwards measurement records and per-tick
/// snapshots to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After the run finishes, check for errors
/// with [`take_error`][Self::take_error].
pub struct OutputObserver<W: OutputWriter> {
    writer:     W,
    /// Grid width, used to split flat snapshot code arrays into rows.
    cols:       u32,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputObserver<W> {
    /// Create an observer backed by `writer` for a grid `cols` cells wide.
    pub fn new(writer: W, cols: u32) -> Self {
        Self {
            writer,
            cols,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for OutputObserver<W> {
    fn on_measure(&mut self, record: &MeasureRecord) {
        let result = self.writer.write_measure(record);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let cols = self.cols;
        let result = self.writer.write_snapshot(snapshot, cols);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
