//! Unit tests for pd-grid.
//!
//! All tests use hand-crafted scenario matrices so they run without any
//! external files.

#[cfg(test)]
mod helpers {
    use crate::Grid;

    /// Obstacle-free 5×5 grid with a single Target in the top-left corner.
    ///
    /// The optimal path from the far corner (4,4) is four diagonal steps,
    /// so the shortest-path cost there must be 4·√2, not the axis-aligned 8.
    pub fn open_5x5_corner_target() -> Grid {
        let mut matrix = vec![vec![0u8; 5]; 5];
        matrix[0][0] = 3;
        Grid::from_matrix(&matrix, true, 1.0).unwrap()
    }

    /// 5×5 grid with a full obstacle wall across row 2, splitting the grid
    /// into a reachable north half (Target at (0,2)) and an isolated south.
    pub fn walled_5x5() -> Grid {
        let mut matrix = vec![vec![0u8; 5]; 5];
        matrix[0][2] = 3;
        for col in 0..5 {
            matrix[2][col] = 2;
        }
        Grid::from_matrix(&matrix, true, 1.0).unwrap()
    }
}

// ── Construction & matrix round-trip ──────────────────────────────────────────

#[cfg(test)]
mod construction {
    use crate::{CellType, Grid, GridError};

    #[test]
    fn empty_matrix_rejected() {
        let err = Grid::from_matrix(&[], true, 1.0).unwrap_err();
        assert!(matches!(err, GridError::EmptyMatrix));
        let err = Grid::from_matrix(&[vec![]], true, 1.0).unwrap_err();
        assert!(matches!(err, GridError::EmptyMatrix));
    }

    #[test]
    fn ragged_matrix_rejected() {
        let matrix = vec![vec![0u8, 0, 0], vec![0u8, 0]];
        let err = Grid::from_matrix(&matrix, true, 1.0).unwrap_err();
        assert!(matches!(
            err,
            GridError::RaggedMatrix { row: 1, got: 2, expected: 3 }
        ));
    }

    #[test]
    fn invalid_code_rejected() {
        let matrix = vec![vec![0u8, 4]];
        let err = Grid::from_matrix(&matrix, true, 1.0).unwrap_err();
        assert!(matches!(err, GridError::InvalidCode { row: 0, col: 1, code: 4 }));
    }

    #[test]
    fn bad_cell_scale_rejected() {
        assert!(matches!(
            Grid::new(2, 2, true, 0.0).unwrap_err(),
            GridError::InvalidCellScale(_)
        ));
        assert!(matches!(
            Grid::new(2, 2, true, f64::NAN).unwrap_err(),
            GridError::InvalidCellScale(_)
        ));
    }

    #[test]
    fn matrix_roundtrip() {
        let matrix = vec![
            vec![0u8, 1, 2],
            vec![3u8, 0, 1],
            vec![2u8, 2, 3],
        ];
        let grid = Grid::from_matrix(&matrix, true, 0.4).unwrap();
        assert_eq!(grid.to_matrix(), matrix);

        // Reconstructing from the export reproduces the layout again.
        let again = Grid::from_matrix(&grid.to_matrix(), true, 0.4).unwrap();
        assert_eq!(again.to_matrix(), matrix);
    }

    #[test]
    fn out_of_bounds_reported() {
        let grid = Grid::new(3, 4, true, 1.0).unwrap();
        assert!(grid.require_in_bounds(2, 3).is_ok());
        let err = grid.require_in_bounds(3, 0).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { row: 3, col: 0, rows: 3, cols: 4 }));
    }

    #[test]
    fn cells_of_type_row_major() {
        let matrix = vec![vec![1u8, 0], vec![0u8, 1]];
        let grid = Grid::from_matrix(&matrix, true, 1.0).unwrap();
        let peds = grid.cells_of_type(CellType::Pedestrian);
        assert_eq!(peds.len(), 2);
        assert!(peds[0] < peds[1], "row-major creation order");
        assert_eq!(grid.cell(peds[0]).row, 0);
        assert_eq!(grid.cell(peds[1]).row, 1);
    }
}

// ── Neighbor topology ─────────────────────────────────────────────────────────

#[cfg(test)]
mod topology {
    use crate::Grid;

    #[test]
    fn interior_cell_has_full_neighborhood() {
        let grid = Grid::new(3, 3, true, 1.0).unwrap();
        let center = grid.cell(grid.index(1, 1));
        assert_eq!(center.straight_neighbors.len(), 4);
        assert_eq!(center.diagonal_neighbors.len(), 4);
    }

    #[test]
    fn corner_and_edge_cells_are_clipped() {
        let grid = Grid::new(3, 3, true, 1.0).unwrap();
        let corner = grid.cell(grid.index(0, 0));
        assert_eq!(corner.straight_neighbors.len(), 2);
        assert_eq!(corner.diagonal_neighbors.len(), 1);

        let edge = grid.cell(grid.index(0, 1));
        assert_eq!(edge.straight_neighbors.len(), 3);
        assert_eq!(edge.diagonal_neighbors.len(), 2);
    }

    #[test]
    fn straight_scan_order_is_up_left_right_down() {
        let grid = Grid::new(3, 3, true, 1.0).unwrap();
        let center = grid.cell(grid.index(1, 1));
        let coords: Vec<(u32, u32)> = center
            .straight_neighbors
            .iter()
            .map(|&i| {
                let c = grid.cell(i);
                (c.row, c.col)
            })
            .collect();
        assert_eq!(coords, vec![(0, 1), (1, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn neighbor_sets_are_symmetric() {
        let grid = Grid::new(4, 5, true, 1.0).unwrap();
        for (i, cell) in grid.cells.iter().enumerate() {
            for &n in cell.straight_neighbors.iter().chain(&cell.diagonal_neighbors) {
                let back = grid.cells[n.index()]
                    .straight_neighbors
                    .iter()
                    .chain(&grid.cells[n.index()].diagonal_neighbors)
                    .any(|&b| b.index() == i);
                assert!(back, "neighbor relation must be symmetric");
            }
        }
    }
}

// ── Cell distance & repulsion ─────────────────────────────────────────────────

#[cfg(test)]
mod distances {
    use crate::Grid;

    #[test]
    fn euclidean_between_centers() {
        let grid = Grid::new(4, 4, true, 1.0).unwrap();
        let a = grid.cell(grid.index(0, 0));
        let b = grid.cell(grid.index(3, 3));
        let expected = ((3f64 * 3.0) + (3.0 * 3.0)).sqrt();
        assert!((a.distance_to(b, true) - expected).abs() < 1e-12);
        assert!(a.same_position(a));
        assert!(!a.same_position(b));
    }

    #[test]
    fn obstacle_distance_is_infinite_under_avoidance() {
        let matrix = vec![vec![2u8, 0]];
        let grid = Grid::from_matrix(&matrix, true, 1.0).unwrap();
        let wall = grid.cell(grid.index(0, 0));
        let open = grid.cell(grid.index(0, 1));
        assert!(wall.distance_to(open, true).is_infinite());
        // With avoidance off the straight-line distance comes back.
        assert!((wall.distance_to(open, false) - 1.0).abs() < 1e-12);
        // Distance *from* a normal cell *to* an obstacle is still finite.
        assert!((open.distance_to(wall, true) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn repulsion_vanishes_at_cutoff() {
        let grid = Grid::new(1, 4, true, 1.0).unwrap();
        let a = grid.cell(grid.index(0, 0));
        let far = grid.cell(grid.index(0, 3));
        assert_eq!(a.repulsion_from(far, 1.5), 0.0);
    }

    #[test]
    fn repulsion_grows_as_pedestrians_close_in() {
        let grid = Grid::new(1, 3, true, 1.0).unwrap();
        let a = grid.cell(grid.index(0, 0));
        let near = grid.cell(grid.index(0, 1));
        let r_max = 1.5f64;

        let at_one = a.repulsion_from(near, r_max);
        let at_zero = a.repulsion_from(a, r_max);
        // exp(r_max² − r²): e^1.25 at r=1, e^2.25 at r=0.
        assert!((at_one - (r_max * r_max - 1.0).exp()).abs() < 1e-12);
        assert!((at_zero - (r_max * r_max).exp()).abs() < 1e-12);
        assert!(at_zero > at_one, "closer pedestrians must repel harder");
    }
}

// ── Cost fields ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod fields {
    use crate::{CellType, CostField, EuclideanField, Grid, ShortestPathField};

    #[test]
    fn euclidean_nearest_target() {
        let mut grid = super::helpers::open_5x5_corner_target();
        EuclideanField.rebuild(&mut grid);

        // Target cell costs 0; (4,4) costs √32 as the crow flies.
        assert_eq!(grid.cell(grid.index(0, 0)).distance_to_target, 0.0);
        let far = grid.cell(grid.index(4, 4)).distance_to_target;
        assert!((far - 32f64.sqrt()).abs() < 1e-9);
        assert!(!grid.fields_stale());
    }

    #[test]
    fn euclidean_is_idempotent() {
        let mut grid = super::helpers::walled_5x5();
        EuclideanField.rebuild(&mut grid);
        let first = grid.euclidean_costs();
        EuclideanField.rebuild(&mut grid);
        assert_eq!(grid.euclidean_costs(), first);
    }

    #[test]
    fn euclidean_picks_closest_of_many_targets() {
        let mut matrix = vec![vec![0u8; 7]];
        matrix[0][0] = 3;
        matrix[0][6] = 3;
        let mut grid = Grid::from_matrix(&matrix, true, 1.0).unwrap();
        EuclideanField.rebuild(&mut grid);
        assert_eq!(grid.cell(grid.index(0, 2)).distance_to_target, 2.0);
        assert_eq!(grid.cell(grid.index(0, 5)).distance_to_target, 1.0);
    }

    #[test]
    fn no_target_leaves_everything_unreachable() {
        let mut grid = Grid::new(3, 3, true, 1.0).unwrap();
        EuclideanField.rebuild(&mut grid);
        ShortestPathField.rebuild(&mut grid);
        for cell in &grid.cells {
            assert!(cell.distance_to_target.is_infinite());
            assert!(cell.dijkstra_cost.is_infinite());
        }
    }

    #[test]
    fn shortest_path_honors_diagonals() {
        let mut grid = super::helpers::open_5x5_corner_target();
        ShortestPathField.rebuild(&mut grid);

        let far = grid.cell(grid.index(4, 4)).dijkstra_cost;
        assert!(
            (far - 4.0 * std::f64::consts::SQRT_2).abs() < 1e-9,
            "expected the diagonal geodesic 4√2, got {far}"
        );
        // A straight run along the top edge costs its Chebyshev length.
        assert!((grid.cell(grid.index(0, 4)).dijkstra_cost - 4.0).abs() < 1e-9);
    }

    #[test]
    fn shortest_path_bends_around_walls() {
        // Corridor with a wall forcing a detour:
        //   T 0 0
        //   2 2 0
        //   0 0 0
        let matrix = vec![
            vec![3u8, 0, 0],
            vec![2u8, 2, 0],
            vec![0u8, 0, 0],
        ];
        let mut grid = Grid::from_matrix(&matrix, true, 1.0).unwrap();
        ShortestPathField.rebuild(&mut grid);

        // (2,0) cannot cut through the wall; it must route via (2,1)→(1,2)
        // or similar.  Straight-line distance would be 2; the geodesic is
        // longer.
        let cost = grid.cell(grid.index(2, 0)).dijkstra_cost;
        assert!(cost > 2.0 + 1e-9, "wall must force a detour, got {cost}");
        assert!(cost.is_finite());
    }

    #[test]
    fn obstacles_stay_infinite_in_both_fields() {
        let mut grid = super::helpers::walled_5x5();
        EuclideanField.rebuild(&mut grid);
        ShortestPathField.rebuild(&mut grid);
        for idx in grid.cells_of_type(CellType::Obstacle) {
            let cell = grid.cell(idx);
            assert!(cell.distance_to_target.is_infinite());
            assert!(cell.dijkstra_cost.is_infinite());
        }
    }

    #[test]
    fn isolated_region_keeps_infinite_cost() {
        let mut grid = super::helpers::walled_5x5();
        ShortestPathField.rebuild(&mut grid);
        // South of the wall no cell can reach the Target.
        for row in 3..5 {
            for col in 0..5 {
                assert!(
                    grid.cell(grid.index(row, col)).dijkstra_cost.is_infinite(),
                    "({row},{col}) is walled off and must stay at ∞"
                );
            }
        }
        // North of the wall everything is reachable.
        for col in 0..5 {
            assert!(grid.cell(grid.index(1, col)).dijkstra_cost.is_finite());
        }
    }

    #[test]
    fn target_cells_cost_zero() {
        let mut grid = super::helpers::walled_5x5();
        ShortestPathField.rebuild(&mut grid);
        for idx in grid.cells_of_type(CellType::Target) {
            assert_eq!(grid.cell(idx).dijkstra_cost, 0.0);
        }
    }
}

// ── Editing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod editing {
    use crate::{CellType, CostField, EuclideanField, Grid};

    #[test]
    fn cycle_walks_all_four_types() {
        let mut grid = Grid::new(1, 1, true, 1.0).unwrap();
        assert_eq!(
            grid.cycle_cell_type(0, 0).unwrap(),
            (CellType::Empty, CellType::Pedestrian)
        );
        assert_eq!(
            grid.cycle_cell_type(0, 0).unwrap(),
            (CellType::Pedestrian, CellType::Obstacle)
        );
        assert_eq!(
            grid.cycle_cell_type(0, 0).unwrap(),
            (CellType::Obstacle, CellType::Target)
        );
        assert_eq!(
            grid.cycle_cell_type(0, 0).unwrap(),
            (CellType::Target, CellType::Empty)
        );
    }

    #[test]
    fn cycle_out_of_bounds_is_an_error() {
        let mut grid = Grid::new(2, 2, true, 1.0).unwrap();
        assert!(grid.cycle_cell_type(5, 0).is_err());
    }

    #[test]
    fn geometry_edit_invalidates_fields() {
        let mut matrix = vec![vec![0u8; 3]];
        matrix[0][2] = 3;
        let mut grid = Grid::from_matrix(&matrix, true, 1.0).unwrap();
        EuclideanField.rebuild(&mut grid);
        assert!(!grid.fields_stale());

        // Empty → Pedestrian does not touch the static geometry.
        grid.cycle_cell_type(0, 0).unwrap();
        assert!(!grid.fields_stale());

        // Pedestrian → Obstacle does.
        grid.cycle_cell_type(0, 0).unwrap();
        assert!(grid.fields_stale());

        EuclideanField.rebuild(&mut grid);
        assert!(grid.cell(grid.index(0, 0)).distance_to_target.is_infinite());
    }

    #[test]
    fn new_target_changes_the_rebuilt_field() {
        let mut matrix = vec![vec![0u8; 5]];
        matrix[0][4] = 3;
        let mut grid = Grid::from_matrix(&matrix, true, 1.0).unwrap();
        EuclideanField.rebuild(&mut grid);
        assert_eq!(grid.cell(grid.index(0, 0)).distance_to_target, 4.0);

        // Cycle (0,1) all the way to Target and rebuild.
        for _ in 0..3 {
            grid.cycle_cell_type(0, 1).unwrap();
        }
        assert_eq!(grid.cell(grid.index(0, 1)).cell_type, CellType::Target);
        EuclideanField.rebuild(&mut grid);
        assert_eq!(grid.cell(grid.index(0, 0)).distance_to_target, 1.0);
    }

    #[test]
    fn target_neighbor_query() {
        let matrix = vec![
            vec![0u8, 0, 0],
            vec![0u8, 3, 0],
            vec![0u8, 0, 0],
        ];
        let grid = Grid::from_matrix(&matrix, true, 1.0).unwrap();
        assert!(grid.has_target_neighbor(grid.index(0, 0)));
        assert!(grid.has_target_neighbor(grid.index(2, 1)));
        // The target cell itself has no target neighbor here.
        assert!(!grid.has_target_neighbor(grid.index(1, 1)));
    }
}
