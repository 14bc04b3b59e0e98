//! Unit tests for pd-output.

#[cfg(test)]
mod csv_files {
    use std::fs;

    use pd_grid::{EuclideanField, Grid};
    use pd_sim::{SimOptions, Simulation};

    use crate::{CsvWriter, OutputObserver};

    /// Tiny corridor with a measuring point in the middle.
    fn run_corridor(dir: &std::path::Path) {
        let matrix = vec![vec![1u8, 0, 0, 3]];
        let grid = Grid::from_matrix(&matrix, true, 1.0).unwrap();
        let mut sim = Simulation::new(grid, EuclideanField, SimOptions::default()).unwrap();
        sim.add_measuring_point(0, 2).unwrap();

        let writer = CsvWriter::new(dir).unwrap();
        let mut obs = OutputObserver::new(writer, sim.grid.cols);
        sim.run(100, &mut obs);
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn measurement_file_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        run_corridor(dir.path());

        let contents = fs::read_to_string(dir.path().join("measurements.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "pedestrian_id,age,row,col,time_ms,density,speed"
        );
        // The single pedestrian crosses the measuring point exactly once.
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("1,,0,2,300,"), "got {}", lines[1]);
    }

    #[test]
    fn snapshot_file_carries_one_row_per_grid_row_per_tick() {
        let dir = tempfile::tempdir().unwrap();
        run_corridor(dir.path());

        let contents = fs::read_to_string(dir.path().join("snapshots.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "tick,row,codes");
        // 1-row grid, 3 ticks to evacuate → 3 snapshot rows.
        assert_eq!(lines.len(), 4);
        // Tick 0: the pedestrian has advanced one cell.
        assert_eq!(lines[1], "0,0,0 1 0 3");
        // Final tick: the corridor is empty again, the target remains.
        assert_eq!(lines[3], "2,0,0 0 0 3");
    }

    #[test]
    fn missing_directory_fails_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(CsvWriter::new(&missing).is_err());
    }
}

#[cfg(test)]
mod observer {
    use pd_core::{PedestrianId, Tick};
    use pd_sim::{MeasureRecord, SimObserver, Snapshot};

    use crate::writer::OutputWriter;
    use crate::{OutputObserver, OutputResult};

    /// A writer that always fails, for exercising error storage.
    struct FailingWriter;

    impl OutputWriter for FailingWriter {
        fn write_measure(&mut self, _record: &MeasureRecord) -> OutputResult<()> {
            Err(std::io::Error::other("disk on fire").into())
        }
        fn write_snapshot(&mut self, _snapshot: &Snapshot, _cols: u32) -> OutputResult<()> {
            Err(std::io::Error::other("still on fire").into())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn first_error_is_kept_and_taken_once() {
        let mut obs = OutputObserver::new(FailingWriter, 4);
        let record = MeasureRecord {
            pedestrian_id: PedestrianId(1),
            age:           None,
            row:           0,
            col:           0,
            time_ms:       0,
            density:       0.0,
            speed:         0.0,
        };
        obs.on_measure(&record);
        obs.on_snapshot(&Snapshot { tick: Tick(0), codes: vec![0; 4] });

        let err = obs.take_error().expect("the first failure is stored");
        assert!(err.to_string().contains("disk on fire"));
        assert!(obs.take_error().is_none(), "take_error drains the slot");
    }
}
