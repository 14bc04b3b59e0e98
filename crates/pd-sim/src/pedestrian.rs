//! Per-pedestrian state.

use std::collections::VecDeque;

use pd_core::{CellIndex, PedestrianId};

/// How many vacated cells the movement history remembers.
pub const HISTORY_CAPACITY: usize = 10;

/// Path length credited for a diagonal transition between two buffered
/// cells, in cell units (√2 rounded the way the validation cases expect).
pub const DIAGONAL_TRANSITION_LENGTH: f64 = 1.42;

/// One entry of the movement history: the cell a pedestrian vacated and
/// when (simulated ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    pub row:     u32,
    pub col:     u32,
    pub time_ms: u64,
}

/// A pedestrian: identity, occupied cell, fractional movement state, and a
/// bounded trail of recent moves for local speed measurement.
///
/// The occupied cell is a [`CellIndex`] into the grid arena — the grid owns
/// every cell; a pedestrian only points at one.
#[derive(Debug, Clone)]
pub struct Pedestrian {
    pub id: PedestrianId,

    /// Arena index of the occupied cell.
    pub cell: CellIndex,

    /// Fractional progress accumulators in roughly `(-1, 1)`.  Diagonal
    /// attempts deposit ±0.71 per tick into both; a full-cell move commits
    /// once both reach magnitude 1 and the sign-preserved remainders stay
    /// behind.
    pub sub_row: f64,
    pub sub_col: f64,

    /// Walking speed in m/s.
    pub speed: f64,

    /// Age in years, when the pedestrian was created through the
    /// age-calibrated population utility.
    pub age: Option<u32>,

    /// Committed full-cell moves so far.
    pub steps: u32,

    /// Simulated time of the last movement attempt, in ms.
    pub last_move_ms: u64,

    /// The last [`HISTORY_CAPACITY`] vacated cells, oldest first.
    pub history: VecDeque<HistoryEntry>,
}

impl Pedestrian {
    pub fn new(id: PedestrianId, cell: CellIndex, speed: f64) -> Self {
        Pedestrian {
            id,
            cell,
            sub_row: 0.0,
            sub_col: 0.0,
            speed,
            age: None,
            steps: 0,
            last_move_ms: 0,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Milliseconds of simulated time this pedestrian needs per metre —
    /// the inverse of its speed.  The per-cell delay used by the speed gate
    /// is this value scaled by the grid's cell size.
    #[inline]
    pub fn delay_ms(&self) -> f64 {
        1000.0 / self.speed
    }

    /// Append a vacated cell to the history, evicting the oldest entry once
    /// the buffer is full.
    pub(crate) fn record_departure(&mut self, row: u32, col: u32, time_ms: u64) {
        if self.history.len() >= HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry { row, col, time_ms });
    }

    /// Average speed over the buffered trail, in m/s.
    ///
    /// Path length counts 1.0 per straight transition and
    /// [`DIAGONAL_TRANSITION_LENGTH`] per diagonal one (both axes changed),
    /// scaled by `cell_scale`; divided by the simulated time between the
    /// first and last entries.  Degrades to `0.0` with fewer than two
    /// samples or zero elapsed time rather than failing.
    pub fn measured_speed(&self, cell_scale: f64) -> f64 {
        if self.history.len() < 2 {
            return 0.0;
        }
        let start_ms = self.history[0].time_ms;
        let mut distance = 0.0;
        let mut elapsed_ms = 0;
        let mut prev = &self.history[0];
        for entry in self.history.iter().skip(1) {
            elapsed_ms = entry.time_ms - start_ms;
            distance += if entry.row != prev.row && entry.col != prev.col {
                DIAGONAL_TRANSITION_LENGTH
            } else {
                1.0
            };
            prev = entry;
        }
        if elapsed_ms > 0 {
            distance * cell_scale / (elapsed_ms as f64 / 1000.0)
        } else {
            0.0
        }
    }
}
