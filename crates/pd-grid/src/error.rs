//! Error types for pd-grid.

use thiserror::Error;

/// Errors raised while constructing or editing a grid.
///
/// Construction never silently repairs a malformed scenario — the first
/// offending cell aborts with its coordinates in the message.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("scenario matrix is empty")]
    EmptyMatrix,

    #[error("scenario matrix is ragged: row {row} has {got} columns, expected {expected}")]
    RaggedMatrix {
        row:      usize,
        got:      usize,
        expected: usize,
    },

    #[error("invalid cell code {code} at ({row}, {col}); valid codes are 0..=3")]
    InvalidCode { row: usize, col: usize, code: u8 },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row:  u32,
        col:  u32,
        rows: u32,
        cols: u32,
    },

    #[error("cell scale must be a positive finite number of meters, got {0}")]
    InvalidCellScale(f64),
}

/// Alias for `Result<T, GridError>`.
pub type GridResult<T> = Result<T, GridError>;
