use crate::utils;

/// Deepest tree this crate will allocate. `4^(14 + 1) - 1` nodes is the largest count that
/// still fits in the `i32` indices used by GPU consumers.
pub const MAX_SUPPORTED_DEPTH: usize = 14;

/// Size in bytes of one transferred node record.
pub const NODE_SIZE_BYTES: usize = 20;

pub const DEFAULT_SIMULATION_CONFIG: utils::SimulationConfig = utils::SimulationConfig {
    max_depth: 8,
    theta: 0.5,
    gravitational_constant: 1.0,
    softening: 1.0e-3,
};
