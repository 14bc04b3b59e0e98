//! Per-run simulation options.

use pd_core::time::DEFAULT_STEP_MS;

/// Reference adult walking speed in m/s.
pub const DEFAULT_WALKING_SPEED: f64 = 1.33;

/// Radius (in cells) beyond which pedestrians stop repelling each other.
pub const DEFAULT_R_MAX: f64 = 1.5;

/// Knobs that select a scenario's behavior for one run.
///
/// The defaults reproduce the standard validation setup: absorbing targets,
/// uniform speed, no boundary wrap-around.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimOptions {
    /// Remove a pedestrian when it reaches a Target.  When off, arriving
    /// pedestrians stay in the simulation standing on the Target cell,
    /// blocking it for everyone else.
    pub absorbing_targets: bool,

    /// When `true` (the default) every pedestrian may attempt a move each
    /// tick.  When `false`, moves are gated by each pedestrian's individual
    /// speed: an attempt is allowed only after `1000/speed · cell_scale`
    /// simulated milliseconds have passed since the last one, and only
    /// while the step budget lasts.
    pub constant_speed: bool,

    /// Corridor wrap-around: a pedestrian adjacent to a Target teleports to
    /// column 0 of its row instead of walking onto the target.
    pub periodic_boundary: bool,

    /// Step budget per pedestrian under individual speeds.
    pub max_steps: u32,

    /// Simulated milliseconds per tick.
    pub step_ms: u32,

    /// Repulsion cutoff radius in cells.
    pub r_max: f64,

    /// Speed assigned to pedestrians created from scenario matrices and
    /// edits, in m/s.
    pub default_speed: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            absorbing_targets: true,
            constant_speed:    true,
            periodic_boundary: false,
            max_steps:         1000,
            step_ms:           DEFAULT_STEP_MS,
            r_max:             DEFAULT_R_MAX,
            default_speed:     DEFAULT_WALKING_SPEED,
        }
    }
}
