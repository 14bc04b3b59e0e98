//! `pd-grid` — the discrete walking surface of the rust_pd crowd simulator.
//!
//! # Data layout
//!
//! The grid is an **arena**: a flat row-major `Vec<Cell>` owned by [`Grid`],
//! indexed by [`CellIndex`](pd_core::CellIndex).  Nothing else ever owns or
//! aliases a cell; pedestrians and measuring points refer to cells by index.
//!
//! Neighbor topology (4 straight + 4 diagonal, clipped at the border) is
//! computed once at construction and never changes afterwards.
//!
//! # Cost fields
//!
//! Each cell carries two static cost-to-nearest-target fields, rebuilt by the
//! interchangeable [`CostField`] strategies:
//!
//! | Strategy             | Field                | Obstacle geometry |
//! |----------------------|----------------------|-------------------|
//! | [`EuclideanField`]   | `distance_to_target` | ignored (straight line) |
//! | [`ShortestPathField`]| `dijkstra_cost`      | respected (geodesic)    |
//!
//! # Wire encoding
//!
//! Scenarios enter and leave as rectangular `u8` matrices with the codes
//! `0 = Empty`, `1 = Pedestrian`, `2 = Obstacle`, `3 = Target`.

pub mod cell;
pub mod error;
pub mod field;
pub mod grid;

#[cfg(test)]
mod tests;

pub use cell::{Cell, CellType};
pub use error::{GridError, GridResult};
pub use field::{CostField, EuclideanField, ShortestPathField};
pub use grid::Grid;
