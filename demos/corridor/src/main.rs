//! corridor — periodic-boundary corridor scenario for rust_pd.
//!
//! A long corridor with a target column at its right end and periodic
//! boundary conditions: pedestrians that reach the end re-enter at column 0,
//! so a fixed crowd circulates at steady state.  A measuring point in the
//! middle of the corridor samples local density and speed on every
//! crossing — the classic setup for validating fundamental-diagram
//! behavior at a chosen density.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use log::info;

use pd_core::{SimRng, Tick};
use pd_grid::{Grid, ShortestPathField};
use pd_output::{CsvWriter, OutputObserver, OutputWriter};
use pd_sim::{MeasureRecord, SimObserver, SimOptions, Simulation};

// ── Constants ─────────────────────────────────────────────────────────────────

const ROWS:         u32 = 10;
const COLS:         u32 = 50;
const CELL_SCALE_M: f64 = 0.4;
const DENSITY:      f64 = 0.5; // pedestrians per m²
const SEED:         u64 = 42;
const TICKS:        u64 = 500;

// ── Observer wrapper to aggregate measurements ────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:       OutputObserver<W>,
    ticks:       usize,
    crossings:   usize,
    speed_sum:   f64,
    density_sum: f64,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: OutputObserver<W>) -> Self {
        Self {
            inner,
            ticks: 0,
            crossings: 0,
            speed_sum: 0.0,
            density_sum: 0.0,
        }
    }

    fn mean_speed(&self) -> f64 {
        if self.crossings == 0 {
            0.0
        } else {
            self.speed_sum / self.crossings as f64
        }
    }

    fn mean_density(&self) -> f64 {
        if self.crossings == 0 {
            0.0
        } else {
            self.density_sum / self.crossings as f64
        }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, active: usize) {
        self.ticks += 1;
        self.inner.on_tick_end(tick, active);
    }

    fn on_measure(&mut self, record: &MeasureRecord) {
        self.crossings += 1;
        self.speed_sum += record.speed;
        self.density_sum += record.density;
        self.inner.on_measure(record);
    }

    fn on_snapshot(&mut self, snapshot: &pd_sim::Snapshot) {
        self.inner.on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// Empty corridor with a full target column along the right edge.
fn build_corridor() -> Result<Grid> {
    let mut matrix = vec![vec![0u8; COLS as usize]; ROWS as usize];
    for row in matrix.iter_mut() {
        row[COLS as usize - 1] = 3;
    }
    Ok(Grid::from_matrix(&matrix, true, CELL_SCALE_M)?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== corridor — rust_pd crowd simulator ===");
    println!(
        "{ROWS}×{COLS} cells à {CELL_SCALE_M} m  |  density {DENSITY} ped/m²  |  seed {SEED}"
    );
    println!();

    // 1. Build the corridor and the simulation.
    let grid = build_corridor()?;
    let options = SimOptions {
        absorbing_targets: false,
        constant_speed:    false,
        periodic_boundary: true,
        ..SimOptions::default()
    };
    let mut sim = Simulation::new(grid, ShortestPathField, options)?;

    // 2. Populate with an age-calibrated crowd.
    let mut rng = SimRng::new(SEED);
    let placed = sim.populate_density(DENSITY, true, &mut rng)?;
    info!("corridor populated with {placed} pedestrians");

    // 3. Measuring point in the middle of the corridor.
    sim.add_measuring_point(ROWS / 2, COLS / 2)?;

    // 4. CSV output.
    std::fs::create_dir_all("output/corridor")?;
    let writer = CsvWriter::new(Path::new("output/corridor"))?;
    let cols = sim.grid.cols;
    let mut obs = CountingObserver::new(OutputObserver::new(writer, cols));

    // 5. Run.
    let t0 = Instant::now();
    let final_tick = sim.run(TICKS, &mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulated {final_tick} in {:.3} s", elapsed.as_secs_f64());
    println!("  pedestrians        : {placed} placed, {} still active", sim.active_count());
    println!("  ticks              : {}", obs.ticks);
    println!("  measuring crossings: {}", obs.crossings);
    println!("  mean density       : {:.3} ped/m²", obs.mean_density());
    println!("  mean speed         : {:.3} m/s", obs.mean_speed());
    println!("  output             : output/corridor/{{measurements,snapshots}}.csv");
    println!();

    // 7. A few sampled pedestrians.
    println!("{:<14} {:<6} {:<12} {:<8}", "Pedestrian", "Age", "Speed m/s", "Steps");
    println!("{}", "-".repeat(42));
    for p in sim.pedestrians().iter().take(8) {
        println!(
            "{:<14} {:<6} {:<12.2} {:<8}",
            p.id.0,
            p.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
            p.speed,
            p.steps,
        );
    }

    Ok(())
}
