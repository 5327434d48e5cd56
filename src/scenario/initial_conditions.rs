//! Seeded initial conditions for a simulation.
//!
//! # Example
//!
//! ```
//! use linear_quadtree::scenario::{generate_bodies, points_of, Layout, ScenarioConfig};
//! use linear_quadtree::geometry::Vec2;
//!
//! let config = ScenarioConfig {
//!     count: 1000,
//!     seed: 7,
//!     min_mass: 10.0,
//!     max_mass: 100.0,
//!     low: Vec2::new(0.0, 0.0),
//!     high: Vec2::new(1280.0, 1280.0),
//!     layout: Layout::Uniform,
//! };
//! let bodies = generate_bodies(&config).expect("Failed to generate bodies");
//! let points = points_of(&bodies);
//! assert_eq!(points.len(), 1000);
//! ```
use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{Point, Vec2};
use crate::utils::QuadtreeError;

/// A simulated body. The first three fields have the layout of a [`Point`], so the
/// position and mass can be fed to the tree without reshuffling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub mass: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Body {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y, self.mass)
    }
}

/// How bodies are spread over the scenario rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layout {
    /// Uniform over `[low, high)`, at rest.
    Uniform,
    /// A disc inscribed in `[low, high)` that rotates rigidly with the given angular
    /// velocity (radians per time unit, counter-clockwise for positive values).
    Spiral { angular_velocity: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenarioConfig {
    pub count: usize,
    pub seed: u64,
    pub min_mass: f32,
    pub max_mass: f32,
    pub low: Vec2,
    pub high: Vec2,
    pub layout: Layout,
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<(), QuadtreeError> {
        if !(self.min_mass.is_finite() && self.max_mass.is_finite()) || self.min_mass <= 0.0 || self.min_mass > self.max_mass {
            return Err(QuadtreeError::InvalidParameter(format!(
                "mass range [{}, {}] must be positive and ordered",
                self.min_mass, self.max_mass
            )));
        }
        let extent_ok = self.low.x < self.high.x
            && self.low.y < self.high.y
            && (self.high.x - self.low.x).is_finite()
            && (self.high.y - self.low.y).is_finite();
        if !extent_ok {
            return Err(QuadtreeError::InvalidParameter(format!(
                "scenario rectangle [{:?}, {:?}) is empty or unbounded",
                self.low, self.high
            )));
        }
        if let Layout::Spiral { angular_velocity } = self.layout {
            if !angular_velocity.is_finite() {
                return Err(QuadtreeError::InvalidParameter("angular velocity must be finite".to_string()));
            }
        }
        Ok(())
    }
}

/// Generates `config.count` bodies. The same config always yields the same bodies.
///
/// # Errors
///
/// `InvalidParameter` if the mass range or rectangle is unusable.
pub fn generate_bodies(config: &ScenarioConfig) -> Result<Vec<Body>, QuadtreeError> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let bodies: Vec<Body> = match config.layout {
        Layout::Uniform => (0..config.count)
            .map(|_| Body {
                x: rng.random_range(config.low.x..config.high.x),
                y: rng.random_range(config.low.y..config.high.y),
                mass: rng.random_range(config.min_mass..=config.max_mass),
                vx: 0.0,
                vy: 0.0,
            })
            .collect(),
        Layout::Spiral { angular_velocity } => {
            let center = Vec2::new(
                config.low.x + (config.high.x - config.low.x) * 0.5,
                config.low.y + (config.high.y - config.low.y) * 0.5,
            );
            let radius = 0.5 * (config.high.x - config.low.x).min(config.high.y - config.low.y);
            (0..config.count)
                .map(|_| {
                    // sqrt keeps the surface density uniform
                    let r = radius * rng.random::<f32>().sqrt();
                    let angle = TAU * rng.random::<f32>();
                    let (sin, cos) = angle.sin_cos();
                    Body {
                        x: center.x + r * cos,
                        y: center.y + r * sin,
                        mass: rng.random_range(config.min_mass..=config.max_mass),
                        vx: -angular_velocity * r * sin,
                        vy: angular_velocity * r * cos,
                    }
                })
                .collect()
        }
    };
    debug!("Generated {} bodies with seed {}", bodies.len(), config.seed);
    Ok(bodies)
}

/// Positions and masses of `bodies`, in order.
pub fn points_of(bodies: &[Body]) -> Vec<Point> {
    bodies.iter().map(Body::point).collect()
}
