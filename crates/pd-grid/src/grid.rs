//! The grid arena: sole owner of all cells.

use pd_core::CellIndex;

use crate::cell::{Cell, CellType};
use crate::error::{GridError, GridResult};

/// A rectangular arena of [`Cell`]s plus the scenario-wide parameters.
///
/// Fields are `pub` for direct indexed access on hot paths, but a grid must
/// be created through [`Grid::new`] or [`Grid::from_matrix`] so the neighbor
/// topology and validation invariants hold.
#[derive(Debug, Clone)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,

    /// Meters per cell edge.
    pub cell_scale: f64,

    /// When on (the normal mode), Obstacle cells hold `∞` in both cost
    /// fields and never participate in distance computations.
    pub obstacle_avoidance: bool,

    /// Row-major cell arena; `cells[row * cols + col]`.
    pub cells: Vec<Cell>,

    /// Set when an edit changed the Obstacle/Target population, meaning the
    /// static cost fields no longer describe the scenario.  Cleared by
    /// [`CostField::rebuild`](crate::CostField::rebuild).
    pub(crate) fields_stale: bool,
}

impl Grid {
    // ── Construction ──────────────────────────────────────────────────────

    /// An all-Empty grid.  Zero dimensions are permitted (useful as a
    /// placeholder); `cell_scale` must be a positive finite meter count.
    pub fn new(rows: u32, cols: u32, obstacle_avoidance: bool, cell_scale: f64) -> GridResult<Grid> {
        if !cell_scale.is_finite() || cell_scale <= 0.0 {
            return Err(GridError::InvalidCellScale(cell_scale));
        }
        let mut cells = Vec::with_capacity(rows as usize * cols as usize);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(row, col, CellType::Empty));
            }
        }
        let mut grid = Grid {
            rows,
            cols,
            cell_scale,
            obstacle_avoidance,
            cells,
            fields_stale: true,
        };
        grid.assign_neighbors();
        Ok(grid)
    }

    /// Build a grid from a scenario matrix in the 0..=3 wire encoding.
    ///
    /// The matrix must be non-empty and rectangular and every code valid;
    /// the first violation aborts construction.
    pub fn from_matrix(
        matrix:             &[Vec<u8>],
        obstacle_avoidance: bool,
        cell_scale:         f64,
    ) -> GridResult<Grid> {
        if matrix.is_empty() || matrix[0].is_empty() {
            return Err(GridError::EmptyMatrix);
        }
        let expected = matrix[0].len();
        for (row, codes) in matrix.iter().enumerate() {
            if codes.len() != expected {
                return Err(GridError::RaggedMatrix {
                    row,
                    got: codes.len(),
                    expected,
                });
            }
        }

        let rows = matrix.len() as u32;
        let cols = expected as u32;
        let mut grid = Grid::new(rows, cols, obstacle_avoidance, cell_scale)?;
        for (row, codes) in matrix.iter().enumerate() {
            for (col, &code) in codes.iter().enumerate() {
                let cell_type = CellType::from_code(code)
                    .ok_or(GridError::InvalidCode { row, col, code })?;
                let idx = grid.index(row as u32, col as u32);
                let cell = &mut grid.cells[idx.index()];
                cell.cell_type = cell_type;
                cell.reset_base_costs();
            }
        }
        Ok(grid)
    }

    /// Compute each cell's straight and diagonal neighbor lists.
    ///
    /// Scan order is fixed (up, left, right, down; then the diagonals
    /// NW, NE, SW, SE) — the candidate search relies on it for
    /// deterministic tie-breaking.
    fn assign_neighbors(&mut self) {
        for row in 0..self.rows as i64 {
            for col in 0..self.cols as i64 {
                let mut straight = Vec::with_capacity(4);
                let mut diagonal = Vec::with_capacity(4);
                for dr in -1..=1i64 {
                    for dc in -1..=1i64 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let (nr, nc) = (row + dr, col + dc);
                        if nr < 0 || nr >= self.rows as i64 || nc < 0 || nc >= self.cols as i64 {
                            continue;
                        }
                        let idx = self.index(nr as u32, nc as u32);
                        if dr == 0 || dc == 0 {
                            straight.push(idx);
                        } else {
                            diagonal.push(idx);
                        }
                    }
                }
                let idx = self.index(row as u32, col as u32);
                self.cells[idx.index()].straight_neighbors = straight;
                self.cells[idx.index()].diagonal_neighbors = diagonal;
            }
        }
    }

    // ── Index access ──────────────────────────────────────────────────────

    /// Flat arena index of `(row, col)`.  Caller guarantees bounds; use
    /// [`require_in_bounds`](Self::require_in_bounds) for external input.
    #[inline]
    pub fn index(&self, row: u32, col: u32) -> CellIndex {
        CellIndex(row * self.cols + col)
    }

    #[inline]
    pub fn cell(&self, idx: CellIndex) -> &Cell {
        &self.cells[idx.index()]
    }

    #[inline]
    pub fn cell_mut(&mut self, idx: CellIndex) -> &mut Cell {
        &mut self.cells[idx.index()]
    }

    /// The cell at `(row, col)`, or `None` outside the grid.
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        (row < self.rows && col < self.cols).then(|| self.cell(self.index(row, col)))
    }

    /// Bounds-check external coordinates, yielding the arena index.
    pub fn require_in_bounds(&self, row: u32, col: u32) -> GridResult<CellIndex> {
        if row < self.rows && col < self.cols {
            Ok(self.index(row, col))
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Walkable area of the whole grid in m².
    #[inline]
    pub fn area_m2(&self) -> f64 {
        self.cell_count() as f64 * self.cell_scale * self.cell_scale
    }

    /// Indices of all cells currently holding `cell_type`, in row-major
    /// order.
    pub fn cells_of_type(&self, cell_type: CellType) -> Vec<CellIndex> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.cell_type == cell_type)
            .map(|(i, _)| CellIndex(i as u32))
            .collect()
    }

    // ── Editing ───────────────────────────────────────────────────────────

    /// Cycle the cell's type one step through
    /// Empty → Pedestrian → Obstacle → Target → Empty.
    ///
    /// Returns `(old, new)`.  When the Obstacle/Target population changed,
    /// the cell's base costs are reset and the cost fields are marked stale
    /// for rebuild before the next tick.
    pub fn cycle_cell_type(&mut self, row: u32, col: u32) -> GridResult<(CellType, CellType)> {
        let idx = self.require_in_bounds(row, col)?;
        let old = self.cells[idx.index()].cell_type;
        let new = old.cycled();
        self.cells[idx.index()].cell_type = new;

        let static_geometry = |t: CellType| matches!(t, CellType::Obstacle | CellType::Target);
        if static_geometry(old) || static_geometry(new) {
            self.cells[idx.index()].reset_base_costs();
            self.fields_stale = true;
        }
        Ok((old, new))
    }

    /// `true` while the cost fields are out of date with respect to the
    /// scenario geometry (construction, or an edit touching
    /// Obstacle/Target cells).
    #[inline]
    pub fn fields_stale(&self) -> bool {
        self.fields_stale
    }

    /// Every cell's current type, row-major.  Pairs with
    /// [`restore_types`](Self::restore_types) for simulation restarts.
    pub fn cell_types(&self) -> Vec<CellType> {
        self.cells.iter().map(|c| c.cell_type).collect()
    }

    /// Overwrite every cell's type from a saved state, clearing the
    /// `visited` trails and resetting base costs.  The fields become stale
    /// and must be rebuilt before the next tick.
    ///
    /// `types` must have one entry per cell (debug-asserted).
    pub fn restore_types(&mut self, types: &[CellType]) {
        debug_assert_eq!(types.len(), self.cells.len());
        for (cell, &cell_type) in self.cells.iter_mut().zip(types) {
            cell.cell_type = cell_type;
            cell.visited = false;
            cell.reset_base_costs();
        }
        self.fields_stale = true;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Any straight or diagonal neighbor of `idx` is a Target.
    pub fn has_target_neighbor(&self, idx: CellIndex) -> bool {
        let cell = self.cell(idx);
        cell.straight_neighbors
            .iter()
            .chain(cell.diagonal_neighbors.iter())
            .any(|&n| self.cell(n).cell_type == CellType::Target)
    }

    // ── Exports ───────────────────────────────────────────────────────────

    /// The scenario as a wire-encoded matrix.  Round-trips with
    /// [`from_matrix`](Self::from_matrix).
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| self.cell(self.index(row, col)).cell_type.code())
                    .collect()
            })
            .collect()
    }

    /// Flat row-major copy of every cell's type code (snapshot form).
    pub fn type_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.cell_type.code()).collect()
    }

    /// The Euclidean cost field as a matrix, for debugging/visualization.
    pub fn euclidean_costs(&self) -> Vec<Vec<f64>> {
        self.cost_matrix(|c| c.distance_to_target)
    }

    /// The shortest-path cost field as a matrix, for debugging/visualization.
    pub fn shortest_path_costs(&self) -> Vec<Vec<f64>> {
        self.cost_matrix(|c| c.dijkstra_cost)
    }

    fn cost_matrix(&self, read: impl Fn(&Cell) -> f64) -> Vec<Vec<f64>> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| read(self.cell(self.index(row, col))))
                    .collect()
            })
            .collect()
    }
}
