//! `pd-output` — simulation output writers for the rust_pd crowd simulator.
//!
//! Two data streams leave the core:
//!
//! | Stream       | File               | Contents                          |
//! |--------------|--------------------|-----------------------------------|
//! | Measurements | `measurements.csv` | One row per measuring-point crossing |
//! | Snapshots    | `snapshots.csv`    | One row per grid row per tick     |
//!
//! Backends implement [`OutputWriter`] and are driven by [`OutputObserver`],
//! which implements `pd_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pd_output::{CsvWriter, OutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = OutputObserver::new(writer, sim.grid.cols);
//! sim.run(1_000, &mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use writer::OutputWriter;
