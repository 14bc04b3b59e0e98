//! Static cost-field builders.
//!
//! # Pluggability
//!
//! The engine evaluates candidate cells through the [`CostField`] trait, so
//! a run can swap the Euclidean field for the obstacle-respecting
//! shortest-path field (or an application-supplied strategy) without
//! touching the tick loop.
//!
//! # Cost units
//!
//! All costs are in **cell units** (`f64`): a straight neighbor step is 1, a
//! diagonal step √2.  `f64::INFINITY` marks unreachable cells and — with
//! obstacle avoidance on — Obstacle cells themselves.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use pd_core::CellIndex;

use crate::cell::{Cell, CellType};
use crate::grid::Grid;

// ── CostField trait ───────────────────────────────────────────────────────────

/// A static per-cell estimate of the effort to reach the nearest Target.
///
/// `rebuild` recomputes the whole field from the grid's current geometry
/// (and clears the grid's stale flag); `cost` reads one cell's value.
/// Implementations must be idempotent: two consecutive `rebuild`s with no
/// intervening edit yield identical fields.
pub trait CostField {
    /// Recompute the field over every cell.
    fn rebuild(&self, grid: &mut Grid);

    /// The field value stored on `cell`.
    fn cost(&self, cell: &Cell) -> f64;
}

// ── EuclideanField ────────────────────────────────────────────────────────────

/// Straight-line distance to the nearest Target.
///
/// Ignores obstacle *geometry* — the line may cross walls — except that an
/// Obstacle cell itself is priced at ∞ when avoidance is on.  O(cells ×
/// targets); with no Target on the grid every cell stays at ∞.
#[derive(Debug)]
pub struct EuclideanField;

impl CostField for EuclideanField {
    fn rebuild(&self, grid: &mut Grid) {
        let targets: Vec<(f64, f64)> = grid
            .cells_of_type(CellType::Target)
            .iter()
            .map(|&i| {
                let c = grid.cell(i);
                (c.row as f64, c.col as f64)
            })
            .collect();

        let avoidance = grid.obstacle_avoidance;
        for cell in &mut grid.cells {
            if avoidance && cell.cell_type == CellType::Obstacle {
                cell.distance_to_target = f64::INFINITY;
                continue;
            }
            let mut min_dist = f64::INFINITY;
            for &(tr, tc) in &targets {
                let dr = cell.row as f64 - tr;
                let dc = cell.col as f64 - tc;
                let dist = (dr * dr + dc * dc).sqrt();
                if dist < min_dist {
                    min_dist = dist;
                }
            }
            cell.distance_to_target = min_dist;
        }
        grid.fields_stale = false;
    }

    #[inline]
    fn cost(&self, cell: &Cell) -> f64 {
        cell.distance_to_target
    }
}

// ── ShortestPathField ─────────────────────────────────────────────────────────

/// Geodesic distance to the nearest Target, flooded by a single multi-source
/// Dijkstra pass.
///
/// Every Target seeds the heap at cost 0 simultaneously — one flood covers
/// all targets.  Obstacle cells are never entered or relaxed through, so the
/// field bends around walls; cells isolated by obstacles keep ∞, which the
/// engine treats as "no improving neighbor", not as an error.
#[derive(Debug)]
pub struct ShortestPathField;

impl CostField for ShortestPathField {
    fn rebuild(&self, grid: &mut Grid) {
        let n = grid.cell_count();
        // dist[i] = best known cost (cell units) to reach cell i from any target.
        let mut dist = vec![f64::INFINITY; n];

        // Min-heap: (cost, cell). Reverse makes BinaryHeap (max) behave as
        // min-heap. Secondary key CellIndex ensures deterministic tie-breaking.
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, CellIndex)>> = BinaryHeap::new();

        for idx in grid.cells_of_type(CellType::Target) {
            dist[idx.index()] = 0.0;
            heap.push(Reverse((OrderedFloat(0.0), idx)));
        }

        while let Some(Reverse((cost, idx))) = heap.pop() {
            let cost = cost.into_inner();

            // Skip stale heap entries.
            if cost > dist[idx.index()] {
                continue;
            }

            let cell = &grid.cells[idx.index()];
            for (neighbors, weight) in [
                (&cell.straight_neighbors, 1.0),
                (&cell.diagonal_neighbors, std::f64::consts::SQRT_2),
            ] {
                for &nb in neighbors {
                    if grid.cells[nb.index()].cell_type == CellType::Obstacle {
                        continue;
                    }
                    let new_cost = cost + weight;
                    if new_cost < dist[nb.index()] {
                        dist[nb.index()] = new_cost;
                        heap.push(Reverse((OrderedFloat(new_cost), nb)));
                    }
                }
            }
        }

        for (i, d) in dist.into_iter().enumerate() {
            grid.cells[i].dijkstra_cost = d;
        }
        grid.fields_stale = false;
    }

    #[inline]
    fn cost(&self, cell: &Cell) -> f64 {
        cell.dijkstra_cost
    }
}
