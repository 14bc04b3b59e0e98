//! Error types for pd-sim.

use pd_core::PedestrianId;
use pd_grid::GridError;
use thiserror::Error;

/// Errors raised by simulation construction and operations.
///
/// Per-tick movement itself is infallible by design — a pedestrian with no
/// improving neighbor simply stands still — so everything here comes from
/// the operation surface (adding pedestrians, populating, editing).
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("cell ({row}, {col}) is not free")]
    CellOccupied { row: u32, col: u32 },

    #[error("pedestrian speed must be a positive finite m/s value, got {0}")]
    InvalidSpeed(f64),

    #[error("density must be a non-negative finite ped/m² value, got {0}")]
    InvalidDensity(f64),

    #[error("density asks for {requested} pedestrians but only {free} cells are free")]
    DensityTooHigh { requested: usize, free: usize },

    #[error("pedestrian {id} stands on ({row}, {col}) which is typed {found:?}")]
    InvalidOccupancy {
        id:    PedestrianId,
        row:   u32,
        col:   u32,
        found: pd_grid::CellType,
    },

    #[error("pedestrians {first} and {second} both occupy ({row}, {col})")]
    PedestrianOverlap {
        first:  PedestrianId,
        second: PedestrianId,
        row:    u32,
        col:    u32,
    },
}

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;
