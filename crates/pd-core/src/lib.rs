//! `pd-core` — foundational types for the `rust_pd` crowd simulator.
//!
//! This crate is a dependency of every other `pd-*` crate.  It intentionally
//! has no `pd-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                      |
//! |----------|-----------------------------------------------|
//! | [`ids`]  | `PedestrianId`, `CellIndex`, `PedestrianIdGen` |
//! | [`time`] | `Tick`, `SimClock`                            |
//! | [`rng`]  | `SimRng` (seeded, deterministic)              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{CellIndex, PedestrianId, PedestrianIdGen};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
