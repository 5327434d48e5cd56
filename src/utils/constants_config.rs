// src/utils/constants_config.rs
use crate::utils::{
    DEFAULT_SIMULATION_CONFIG,
    MAX_SUPPORTED_DEPTH,
    errors::QuadtreeError
};

/// Parameters fixed for the lifetime of a simulation: the tree depth that sizes the node
/// array, and the knobs the force pass uses when it walks the finished tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub max_depth: usize,
    /// Opening angle. A node of width `w` at distance `d` is treated as a single body when
    /// `w / d < theta`.
    pub theta: f32,
    pub gravitational_constant: f32,
    /// Plummer softening length.
    pub softening: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        DEFAULT_SIMULATION_CONFIG
    }
}

impl SimulationConfig {
    pub fn new(
        max_depth: Option<usize>,
        theta: Option<f32>,
        gravitational_constant: Option<f32>,
        softening: Option<f32>
    ) -> Self {
        let default = SimulationConfig::default();
        Self {
            max_depth: max_depth.unwrap_or(default.max_depth),
            theta: theta.unwrap_or(default.theta),
            gravitational_constant: gravitational_constant.unwrap_or(default.gravitational_constant),
            softening: softening.unwrap_or(default.softening),
        }
    }

    /// Checks every field, returning the first problem found.
    ///
    /// # Example
    /// ```
    /// use linear_quadtree::utils::SimulationConfig;
    ///
    /// assert!(SimulationConfig::default().validate().is_ok());
    /// assert!(SimulationConfig::new(None, Some(-1.0), None, None).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), QuadtreeError> {
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(QuadtreeError::CapacityOverflow { max_depth: self.max_depth });
        }
        if !self.theta.is_finite() || self.theta < 0.0 {
            return Err(QuadtreeError::InvalidParameter(format!("theta must be finite and non-negative, got {}", self.theta)));
        }
        if !self.gravitational_constant.is_finite() || self.gravitational_constant <= 0.0 {
            return Err(QuadtreeError::InvalidParameter(format!("gravitational constant must be positive, got {}", self.gravitational_constant)));
        }
        if !self.softening.is_finite() || self.softening < 0.0 {
            return Err(QuadtreeError::InvalidParameter(format!("softening must be finite and non-negative, got {}", self.softening)));
        }
        Ok(())
    }
}
