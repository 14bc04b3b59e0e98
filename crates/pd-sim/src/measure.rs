//! Density measurement and the record emitted at measuring points.

use pd_core::PedestrianId;
use pd_grid::{CellType, Grid};

/// Side length of the square density-sampling window, in cells.
pub const DENSITY_WINDOW: u32 = 9;

/// One measurement, produced when a committed move (or teleport) lands on a
/// registered measuring point.  Handed to the observer; persistence is the
/// sink's concern.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureRecord {
    pub pedestrian_id: PedestrianId,
    pub age:           Option<u32>,
    /// Coordinates of the measuring point.
    pub row: u32,
    pub col: u32,
    /// Simulated time of the crossing, in ms.
    pub time_ms: u64,
    /// Local crowd density in pedestrians/m².
    pub density: f64,
    /// The crossing pedestrian's trail speed in m/s.
    pub speed: f64,
}

/// Half-open `[lo, hi)` sampling range of up to [`DENSITY_WINDOW`] cells
/// centered on `center`, shifted inward near the borders so the window
/// never leaves `0..extent` and never collapses to zero width.
pub(crate) fn window_bounds(center: u32, extent: u32) -> (u32, u32) {
    let half = DENSITY_WINDOW / 2;
    let lo = center.saturating_sub(half);
    let hi = (lo + DENSITY_WINDOW).min(extent);
    let lo = hi.saturating_sub(DENSITY_WINDOW);
    (lo, hi)
}

/// Crowd density around `(row, col)`: Pedestrian-typed cells inside the
/// sampling window divided by the window's area in m².
///
/// The window is [`DENSITY_WINDOW`]² cells where the grid allows, clipped
/// to the grid's extent near edges (a corner still samples a full-size
/// window shifted inward when the grid is large enough).
pub fn local_density(grid: &Grid, row: u32, col: u32) -> f64 {
    let (row_lo, row_hi) = window_bounds(row, grid.rows);
    let (col_lo, col_hi) = window_bounds(col, grid.cols);

    let mut count = 0usize;
    for r in row_lo..row_hi {
        for c in col_lo..col_hi {
            if grid.cell(grid.index(r, c)).cell_type == CellType::Pedestrian {
                count += 1;
            }
        }
    }
    let area_m2 =
        ((row_hi - row_lo) * (col_hi - col_lo)) as f64 * grid.cell_scale * grid.cell_scale;
    count as f64 / area_m2
}
