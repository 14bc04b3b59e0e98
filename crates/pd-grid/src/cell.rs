//! The cell: one square of the walking surface.

use pd_core::CellIndex;

// ── CellType ──────────────────────────────────────────────────────────────────

/// What currently occupies a cell.
///
/// The discriminants are the wire encoding used by scenario matrices and
/// snapshot exports: `0 = Empty`, `1 = Pedestrian`, `2 = Obstacle`,
/// `3 = Target`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CellType {
    #[default]
    Empty      = 0,
    Pedestrian = 1,
    Obstacle   = 2,
    Target     = 3,
}

impl CellType {
    /// The wire code of this type.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code; `None` for anything outside `0..=3`.
    pub fn from_code(code: u8) -> Option<CellType> {
        match code {
            0 => Some(CellType::Empty),
            1 => Some(CellType::Pedestrian),
            2 => Some(CellType::Obstacle),
            3 => Some(CellType::Target),
            _ => None,
        }
    }

    /// The type that follows `self` in the editor cycle
    /// Empty → Pedestrian → Obstacle → Target → Empty.
    pub fn cycled(self) -> CellType {
        match self {
            CellType::Empty      => CellType::Pedestrian,
            CellType::Pedestrian => CellType::Obstacle,
            CellType::Obstacle   => CellType::Target,
            CellType::Target     => CellType::Empty,
        }
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One grid cell: immutable position and topology, mutable occupancy and
/// cost-field values.
///
/// Cells live only inside the [`Grid`](crate::Grid) arena and are referred to
/// by [`CellIndex`] everywhere else.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: u32,
    pub col: u32,

    pub cell_type: CellType,

    /// Euclidean cost field: straight-line distance (in cells) to the
    /// nearest Target.  `f64::INFINITY` for an Obstacle whenever obstacle
    /// avoidance is on, and everywhere before the field is first built.
    pub distance_to_target: f64,

    /// Shortest-path cost field: geodesic distance (in cells, diagonals
    /// √2) to the nearest Target, flooded by Dijkstra.  `0.0` at Targets,
    /// `f64::INFINITY` until flooded and for unreachable cells.
    pub dijkstra_cost: f64,

    /// Set once any pedestrian has vacated this cell.  Visualization only;
    /// no decision logic reads it.
    pub visited: bool,

    /// Up/down/left/right neighbors within bounds.  Fixed at construction.
    pub straight_neighbors: Vec<CellIndex>,

    /// The four diagonal neighbors within bounds.  Fixed at construction.
    pub diagonal_neighbors: Vec<CellIndex>,
}

impl Cell {
    pub(crate) fn new(row: u32, col: u32, cell_type: CellType) -> Self {
        let mut cell = Cell {
            row,
            col,
            cell_type,
            distance_to_target: 0.0,
            dijkstra_cost:      0.0,
            visited:            false,
            straight_neighbors: Vec::new(),
            diagonal_neighbors: Vec::new(),
        };
        cell.reset_base_costs();
        cell
    }

    /// Restore both cost fields to their pre-flood base values for the
    /// current `cell_type`.  Called at construction and after an edit.
    pub(crate) fn reset_base_costs(&mut self) {
        // Until a field is built every cell counts as unreachable; obstacles
        // additionally stay at ∞ through any Euclidean rebuild with
        // avoidance on.
        self.distance_to_target = f64::INFINITY;
        self.dijkstra_cost = if self.cell_type == CellType::Target {
            0.0
        } else {
            f64::INFINITY
        };
    }

    /// Euclidean distance between the centers of `self` and `other`, in
    /// cell units.
    ///
    /// Returns `f64::INFINITY` when `self` is an Obstacle and avoidance is
    /// on: an obstacle's own position never participates in path costs.
    pub fn distance_to(&self, other: &Cell, obstacle_avoidance: bool) -> f64 {
        if obstacle_avoidance && self.cell_type == CellType::Obstacle {
            return f64::INFINITY;
        }
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }

    /// Repulsion potential another pedestrian's cell adds to this cell:
    /// zero at and beyond `r_max`, `exp(r_max² − r²)` inside, growing
    /// sharply as `r → 0`.
    pub fn repulsion_from(&self, other: &Cell, r_max: f64) -> f64 {
        let r = self.distance_to(other, true);
        if r >= r_max {
            0.0
        } else {
            (r_max * r_max - r * r).exp()
        }
    }

    /// Explicit coordinate equality (cells are equal iff they are the same
    /// square; occupancy and costs don't matter).
    #[inline]
    pub fn same_position(&self, other: &Cell) -> bool {
        self.row == other.row && self.col == other.col
    }
}
