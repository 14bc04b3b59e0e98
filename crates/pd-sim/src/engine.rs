//! The `Simulation` struct and its tick loop.

use log::{debug, info};
use rustc_hash::FxHashSet;

use pd_core::{CellIndex, PedestrianId, PedestrianIdGen, SimClock, SimRng, Tick};
use pd_grid::{Cell, CellType, CostField, Grid};

use crate::error::{SimError, SimResult};
use crate::measure::{MeasureRecord, local_density};
use crate::observer::SimObserver;
use crate::options::SimOptions;
use crate::pedestrian::Pedestrian;
use crate::spline::AgeSpeedCurve;

/// Horizontal and vertical progress a diagonal attempt deposits per tick,
/// approximating 1/√2 so two diagonal ticks match one orthogonal cell of
/// progress on each axis.
pub const DIAGONAL_STEP: f64 = 0.71;

// ── Snapshot ─────────────────────────────────────────────────────────────────

/// One recorded grid state, kept for external playback.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub tick: Tick,
    /// Row-major cell-type codes (`rows × cols` entries, 0..=3 encoding).
    pub codes: Vec<u8>,
}

/// Outcome of the candidate search for one pedestrian.
enum Candidate {
    /// No neighbor improves on the current cell.
    Stay,
    /// Best candidate shares a row or column with the current cell.
    Straight(CellIndex),
    /// Best candidate is one of the diagonals.
    Diagonal(CellIndex),
}

// ── Simulation ───────────────────────────────────────────────────────────────

/// The simulation engine: owns the grid, the active pedestrians, the clock,
/// and the per-tick snapshot history.
///
/// `F` selects the static cost field for the run (Euclidean or
/// shortest-path); the tick loop itself is field-agnostic.
///
/// Pedestrians are processed strictly in ascending-id (creation) order and
/// each committed move mutates the grid immediately, so a pedestrian
/// processed later in the same tick sees the already-updated positions of
/// earlier ones.  Ticks are therefore sequential, not simultaneous — the
/// no-double-occupancy guarantee depends on this ordering.
#[derive(Debug)]
pub struct Simulation<F: CostField> {
    pub grid:    Grid,
    pub field:   F,
    pub options: SimOptions,
    pub clock:   SimClock,

    pedestrians: Vec<Pedestrian>,
    id_gen:      PedestrianIdGen,

    /// Registered measuring points, in registration order.
    measuring_points: Vec<CellIndex>,
    /// Membership set for the per-commit landing check.
    measuring_index: FxHashSet<CellIndex>,

    /// Cell types at construction time, for [`reset`](Self::reset).
    initial_types: Vec<CellType>,

    /// One snapshot per completed tick, oldest first.
    snapshots: Vec<Snapshot>,
}

impl<F: CostField> Simulation<F> {
    // ── Construction ──────────────────────────────────────────────────────

    /// Take ownership of a validated grid and create one pedestrian per
    /// pre-placed `Pedestrian` cell, in row-major order.
    pub fn new(grid: Grid, field: F, options: SimOptions) -> SimResult<Simulation<F>> {
        if !options.default_speed.is_finite() || options.default_speed <= 0.0 {
            return Err(SimError::InvalidSpeed(options.default_speed));
        }
        let initial_types = grid.cell_types();
        let clock = SimClock::new(options.step_ms);
        let mut sim = Simulation {
            grid,
            field,
            options,
            clock,
            pedestrians:      Vec::new(),
            id_gen:           PedestrianIdGen::new(),
            measuring_points: Vec::new(),
            measuring_index:  FxHashSet::default(),
            initial_types,
            snapshots:        Vec::new(),
        };
        sim.pedestrians = sim.derive_pedestrians();
        sim.validate()?;
        Ok(sim)
    }

    /// One fresh pedestrian per `Pedestrian`-typed cell, row-major, with
    /// newly issued ids.
    fn derive_pedestrians(&mut self) -> Vec<Pedestrian> {
        let speed = self.options.default_speed;
        self.grid
            .cells_of_type(CellType::Pedestrian)
            .into_iter()
            .map(|idx| Pedestrian::new(self.id_gen.fresh(), idx, speed))
            .collect()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn pedestrians(&self) -> &[Pedestrian] {
        &self.pedestrians
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.pedestrians.len()
    }

    pub fn pedestrian(&self, id: PedestrianId) -> Option<&Pedestrian> {
        self.pedestrians.iter().find(|p| p.id == id)
    }

    #[inline]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    #[inline]
    pub fn measuring_points(&self) -> &[CellIndex] {
        &self.measuring_points
    }

    /// Re-check the occupancy invariants: every pedestrian stands on a
    /// `Pedestrian` cell (or a `Target` cell in non-absorbing mode) and no
    /// two pedestrians share a coordinate.
    pub fn validate(&self) -> SimResult<()> {
        for p in &self.pedestrians {
            let cell = self.grid.cell(p.cell);
            let standing_on_target =
                cell.cell_type == CellType::Target && !self.options.absorbing_targets;
            if cell.cell_type != CellType::Pedestrian && !standing_on_target {
                return Err(SimError::InvalidOccupancy {
                    id:    p.id,
                    row:   cell.row,
                    col:   cell.col,
                    found: cell.cell_type,
                });
            }
        }
        for (a, first) in self.pedestrians.iter().enumerate() {
            for second in self.pedestrians.iter().skip(a + 1) {
                if first.cell == second.cell {
                    let cell = self.grid.cell(first.cell);
                    return Err(SimError::PedestrianOverlap {
                        first:  first.id,
                        second: second.id,
                        row:    cell.row,
                        col:    cell.col,
                    });
                }
            }
        }
        Ok(())
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Place a new pedestrian on a free cell.
    pub fn add_pedestrian(&mut self, row: u32, col: u32, speed: f64) -> SimResult<PedestrianId> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SimError::InvalidSpeed(speed));
        }
        let idx = self.grid.require_in_bounds(row, col)?;
        if self.grid.cell(idx).cell_type != CellType::Empty {
            return Err(SimError::CellOccupied { row, col });
        }
        self.grid.cell_mut(idx).cell_type = CellType::Pedestrian;
        let id = self.id_gen.fresh();
        self.pedestrians.push(Pedestrian::new(id, idx, speed));
        Ok(id)
    }

    /// Populate random free cells up to `density` pedestrians/m² over the
    /// whole grid area.
    ///
    /// With `with_ages`, each pedestrian gets an age drawn uniformly from
    /// 18..=80 and the walking speed the calibration curve assigns to it;
    /// otherwise everyone walks at 1.0 m/s.
    pub fn populate_density(
        &mut self,
        density:   f64,
        with_ages: bool,
        rng:       &mut SimRng,
    ) -> SimResult<usize> {
        if !density.is_finite() || density < 0.0 {
            return Err(SimError::InvalidDensity(density));
        }
        let requested = (density * self.grid.area_m2()) as usize;
        let free = self.grid.cells_of_type(CellType::Empty).len();
        if requested > free {
            return Err(SimError::DensityTooHigh { requested, free });
        }

        let curve = with_ages.then(AgeSpeedCurve::new);
        for _ in 0..requested {
            // Rejection-sample a free cell; `requested <= free` guarantees
            // termination.
            let idx = loop {
                let row = rng.gen_range(0..self.grid.rows);
                let col = rng.gen_range(0..self.grid.cols);
                let idx = self.grid.index(row, col);
                if self.grid.cell(idx).cell_type == CellType::Empty {
                    break idx;
                }
            };
            let (age, speed) = match &curve {
                Some(curve) => {
                    let age = rng.gen_range(18..=80u32);
                    (Some(age), curve.speed_at(age as f64))
                }
                None => (None, 1.0),
            };
            self.grid.cell_mut(idx).cell_type = CellType::Pedestrian;
            let mut ped = Pedestrian::new(self.id_gen.fresh(), idx, speed);
            ped.age = age;
            self.pedestrians.push(ped);
        }
        info!("populated {requested} pedestrian(s) at {density} ped/m²");
        Ok(requested)
    }

    /// Cycle a cell's type one step (the editor operation).
    ///
    /// When the edit adds or removes a `Pedestrian` cell, the whole active
    /// list is re-derived from the grid with freshly issued ids; cost-field
    /// invalidation for Obstacle/Target edits happens inside the grid.
    pub fn cycle_cell(&mut self, row: u32, col: u32) -> SimResult<(CellType, CellType)> {
        let (old, new) = self.grid.cycle_cell_type(row, col)?;
        if old == CellType::Pedestrian || new == CellType::Pedestrian {
            self.pedestrians = self.derive_pedestrians();
        }
        Ok((old, new))
    }

    /// Register a measuring point.  Registering the same cell twice is a
    /// no-op.
    pub fn add_measuring_point(&mut self, row: u32, col: u32) -> SimResult<()> {
        let idx = self.grid.require_in_bounds(row, col)?;
        if self.measuring_index.insert(idx) {
            self.measuring_points.push(idx);
        }
        Ok(())
    }

    /// Restore the construction-time scenario: initial cell types, fresh
    /// pedestrians, cleared snapshots, clock at zero.
    pub fn reset(&mut self) {
        self.grid.restore_types(&self.initial_types);
        self.pedestrians = self.derive_pedestrians();
        self.snapshots.clear();
        self.clock.rewind();
        info!("simulation reset to initial state");
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run until the crowd has fully evacuated or the clock reaches
    /// `tick_cap`.  Returns the final tick.
    pub fn run<O: SimObserver>(&mut self, tick_cap: u64, observer: &mut O) -> Tick {
        if self.grid.fields_stale() {
            self.field.rebuild(&mut self.grid);
        }
        while !self.pedestrians.is_empty() && self.clock.current_tick.0 < tick_cap {
            self.tick(observer);
        }
        let final_tick = self.clock.current_tick;
        info!(
            "run ended at {final_tick} with {} pedestrian(s) remaining",
            self.pedestrians.len()
        );
        observer.on_sim_end(final_tick);
        final_tick
    }

    /// Advance the simulation by exactly one tick.
    ///
    /// A tick runs to completion over all pedestrians before returning;
    /// external observers only ever see between-tick state.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) {
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);

        if self.grid.fields_stale() {
            debug!("cost field stale; rebuilding before {tick}");
            self.field.rebuild(&mut self.grid);
        }

        let now = self.clock.now_ms();
        let mut to_remove: Vec<PedestrianId> = Vec::new();

        for i in 0..self.pedestrians.len() {
            self.step_pedestrian(i, now, &mut to_remove, observer);
        }

        // Mark-then-sweep: absorbed pedestrians leave only after the whole
        // scan, so their repulsion still applied to everyone this tick.
        if !to_remove.is_empty() {
            self.pedestrians.retain(|p| !to_remove.contains(&p.id));
        }

        self.snapshots.push(Snapshot {
            tick,
            codes: self.grid.type_codes(),
        });
        if let Some(snapshot) = self.snapshots.last() {
            observer.on_snapshot(snapshot);
        }
        observer.on_tick_end(tick, self.pedestrians.len());
        self.clock.advance();
    }

    fn step_pedestrian<O: SimObserver>(
        &mut self,
        i:         usize,
        now:       u64,
        to_remove: &mut Vec<PedestrianId>,
        observer:  &mut O,
    ) {
        // Corridor wrap-around replaces the whole decision algorithm for
        // pedestrians that reached the far end: jump back to column 0 of
        // the same row, or wait until that cell clears.
        if self.options.periodic_boundary {
            let at = self.pedestrians[i].cell;
            if self.grid.has_target_neighbor(at) {
                let wrap = self.grid.index(self.grid.cell(at).row, 0);
                if self.grid.cell(wrap).cell_type == CellType::Empty {
                    self.commit_move(i, wrap, now, to_remove, observer);
                }
                return;
            }
        }

        if !self.options.constant_speed {
            let p = &self.pedestrians[i];
            let per_cell_delay = p.delay_ms() * self.grid.cell_scale;
            let due = now as f64 > p.last_move_ms as f64 + per_cell_delay;
            if !due || p.steps > self.options.max_steps {
                // Not this pedestrian's turn yet: no evaluation, no side
                // effects.
                return;
            }
        }

        match self.choose_candidate(i) {
            Candidate::Stay => {}
            Candidate::Straight(next) => {
                // A straight displacement is a full ±1 on one axis; it
                // commits in the tick it is chosen.
                self.pedestrians[i].last_move_ms = now;
                self.commit_move(i, next, now, to_remove, observer);
            }
            Candidate::Diagonal(next) => {
                let (next_row, next_col) = {
                    let c = self.grid.cell(next);
                    (c.row as f64, c.col as f64)
                };
                let (cur_row, cur_col) = {
                    let c = self.grid.cell(self.pedestrians[i].cell);
                    (c.row as f64, c.col as f64)
                };
                let p = &mut self.pedestrians[i];
                p.last_move_ms = now;
                let full_row = p.sub_row + (next_row - cur_row) * DIAGONAL_STEP;
                let full_col = p.sub_col + (next_col - cur_col) * DIAGONAL_STEP;
                if full_row.abs() >= 1.0 && full_col.abs() >= 1.0 {
                    // Drop the whole cells, keep the sign-preserved
                    // remainders.
                    p.sub_row = full_row % 1.0;
                    p.sub_col = full_col % 1.0;
                    self.commit_move(i, next, now, to_remove, observer);
                } else {
                    p.sub_row = full_row;
                    p.sub_col = full_col;
                }
            }
        }
    }

    /// Pick the cheapest enterable neighbor, starting from the pedestrian's
    /// own cell as the baseline.
    ///
    /// Straight neighbors are scanned before diagonals and only a strictly
    /// lower cost displaces the running best, so ties favor straight moves.
    /// An adjacent unoccupied Target short-circuits the comparison — the
    /// pedestrian always walks straight onto it regardless of repulsion.
    fn choose_candidate(&self, i: usize) -> Candidate {
        let me = &self.pedestrians[i];
        let current = self.grid.cell(me.cell);

        let mut best = Candidate::Stay;
        let mut best_cost = self.cell_cost(current, me.id);

        for &n in &current.straight_neighbors {
            let cell = self.grid.cell(n);
            match cell.cell_type {
                CellType::Pedestrian | CellType::Obstacle => continue,
                CellType::Target => {
                    if !self.is_occupied(n) {
                        return Candidate::Straight(n);
                    }
                }
                CellType::Empty => {
                    let cost = self.cell_cost(cell, me.id);
                    if cost < best_cost {
                        best = Candidate::Straight(n);
                        best_cost = cost;
                    }
                }
            }
        }
        for &n in &current.diagonal_neighbors {
            let cell = self.grid.cell(n);
            match cell.cell_type {
                CellType::Pedestrian | CellType::Obstacle => continue,
                CellType::Target => {
                    if !self.is_occupied(n) {
                        return Candidate::Diagonal(n);
                    }
                }
                CellType::Empty => {
                    let cost = self.cell_cost(cell, me.id);
                    if cost < best_cost {
                        best = Candidate::Diagonal(n);
                        best_cost = cost;
                    }
                }
            }
        }
        best
    }

    /// Static field cost of `cell` plus the repulsion of every *other*
    /// active pedestrian (including ones already queued for removal this
    /// tick — they leave only at the sweep).
    fn cell_cost(&self, cell: &Cell, me: PedestrianId) -> f64 {
        let mut cost = self.field.cost(cell);
        for other in &self.pedestrians {
            if other.id != me {
                cost += cell.repulsion_from(self.grid.cell(other.cell), self.options.r_max);
            }
        }
        cost
    }

    /// An active pedestrian stands on `idx`.
    ///
    /// A pedestrian standing on a Target leaves the cell typed `Target`, so
    /// Target occupancy is tracked through the pedestrian list rather than
    /// the cell type.
    fn is_occupied(&self, idx: CellIndex) -> bool {
        self.pedestrians.iter().any(|p| p.cell == idx)
    }

    /// Vacate the old cell, move, occupy, and handle target arrival and
    /// measuring points.  Shared by normal moves and boundary teleports.
    fn commit_move<O: SimObserver>(
        &mut self,
        i:         usize,
        new_idx:   CellIndex,
        now:       u64,
        to_remove: &mut Vec<PedestrianId>,
        observer:  &mut O,
    ) {
        let old_idx = self.pedestrians[i].cell;
        let (old_row, old_col) = {
            let c = self.grid.cell(old_idx);
            (c.row, c.col)
        };

        {
            let old = self.grid.cell_mut(old_idx);
            old.cell_type = CellType::Empty;
            old.visited = true;
        }

        {
            let p = &mut self.pedestrians[i];
            p.record_departure(old_row, old_col, now);
            p.cell = new_idx;
            p.steps += 1;
            p.last_move_ms = now;
        }

        if self.grid.cell(new_idx).cell_type == CellType::Target {
            // The cell keeps its Target type.  Absorbing targets swallow
            // the pedestrian at the end of the tick; otherwise it stays,
            // standing on (and blocking) the target.
            if self.options.absorbing_targets {
                to_remove.push(self.pedestrians[i].id);
            }
        } else {
            self.grid.cell_mut(new_idx).cell_type = CellType::Pedestrian;
        }

        if self.measuring_index.contains(&new_idx) {
            let cell = self.grid.cell(new_idx);
            let p = &self.pedestrians[i];
            let record = MeasureRecord {
                pedestrian_id: p.id,
                age:           p.age,
                row:           cell.row,
                col:           cell.col,
                time_ms:       now,
                density:       local_density(&self.grid, cell.row, cell.col),
                speed:         p.measured_speed(self.grid.cell_scale),
            };
            observer.on_measure(&record);
        }
    }
}
