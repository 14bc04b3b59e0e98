//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `measurements.csv`
//! - `snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use pd_sim::{MeasureRecord, Snapshot};

use crate::OutputResult;
use crate::writer::OutputWriter;

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    measurements: Writer<File>,
    snapshots:    Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut measurements = Writer::from_path(dir.join("measurements.csv"))?;
        measurements.write_record([
            "pedestrian_id",
            "age",
            "row",
            "col",
            "time_ms",
            "density",
            "speed",
        ])?;

        let mut snapshots = Writer::from_path(dir.join("snapshots.csv"))?;
        snapshots.write_record(["tick", "row", "codes"])?;

        Ok(Self {
            measurements,
            snapshots,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_measure(&mut self, record: &MeasureRecord) -> OutputResult<()> {
        self.measurements.write_record(&[
            record.pedestrian_id.0.to_string(),
            record.age.map(|a| a.to_string()).unwrap_or_default(),
            record.row.to_string(),
            record.col.to_string(),
            record.time_ms.to_string(),
            record.density.to_string(),
            record.speed.to_string(),
        ])?;
        Ok(())
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot, cols: u32) -> OutputResult<()> {
        for (row, codes) in snapshot.codes.chunks(cols.max(1) as usize).enumerate() {
            let joined = codes
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            self.snapshots.write_record(&[
                snapshot.tick.0.to_string(),
                row.to_string(),
                joined,
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.measurements.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
