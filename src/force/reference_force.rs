//! A CPU reference for the force pass that normally runs on the GPU.
//!
//! It reads the flat node array the same way a device kernel would: leaves are exact
//! single-body interactions, saturated nodes and far-enough internal nodes act as one
//! pseudo-body at their centroid, and everything else is opened into its four children.
//! Bodies are independent, so they are evaluated in parallel with rayon.
//!
//! The bodies being evaluated are expected to be the ones the tree was built from. A body
//! that lies inside an aggregated node is one of the points summed into it, so it is taken
//! back out of the sum before the centroid is formed and never pulls on itself. A body that
//! was not inserted is treated as a test mass and sees every node whole.
//!
//! # Example
//!
//! ```
//! use linear_quadtree::force::ForceEvaluator;
//! use linear_quadtree::geometry::Point;
//! use linear_quadtree::quadtree::LinearQuadtree;
//! use linear_quadtree::utils::SimulationConfig;
//!
//! let bodies = [Point::new(-1.0, 0.0, 1.0), Point::new(1.0, 0.0, 1.0)];
//! let mut tree = LinearQuadtree::new(4).unwrap();
//! let bounds = tree.build(&bodies).unwrap();
//!
//! let evaluator = ForceEvaluator::new(&SimulationConfig::default());
//! let acc = evaluator.accelerations(tree.nodes(), bounds, &bodies);
//!
//! // equal masses pull each other together symmetrically
//! assert!(acc[0].x > 0.0 && acc[1].x < 0.0);
//! assert!((acc[0].x + acc[1].x).abs() < 1e-6);
//! ```
use rayon::prelude::*;

use crate::frame::{BuiltFrame, TreeConsumer};
use crate::geometry::{Point, Quadrant, Rect, Vec2};
use crate::quadtree::{child_index, Node, NodeState};
use crate::utils::SimulationConfig;

/// Barnes–Hut traversal parameters, taken from a [`SimulationConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceEvaluator {
    pub theta: f32,
    pub gravitational_constant: f32,
    pub softening: f32,
}

impl ForceEvaluator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            theta: config.theta,
            gravitational_constant: config.gravitational_constant,
            softening: config.softening,
        }
    }

    /// Acceleration of `body` due to every mass in the tree.
    ///
    /// A leaf at exactly the body's position is the body itself and contributes nothing.
    /// Aggregated nodes containing the body act through the centroid of their other points.
    pub fn acceleration_at(&self, nodes: &[Node], bounds: Rect, body: Point) -> Vec2 {
        let mut acc = Vec2::ZERO;
        if nodes.is_empty() {
            return acc;
        }
        let mut stack = vec![(0usize, bounds)];
        while let Some((index, rect)) = stack.pop() {
            let node = &nodes[index];
            match node.state() {
                NodeState::Empty => {}
                NodeState::Leaf(q) => {
                    if q.x != body.x || q.y != body.y {
                        acc += self.pull(body, q);
                    }
                }
                NodeState::Saturated { .. } => {
                    if let Some(c) = centroid_without(node, rect, body) {
                        acc += self.pull(body, c);
                    }
                }
                NodeState::Internal { .. } => {
                    let Some(c) = centroid_without(node, rect, body) else { continue };
                    let dx = c.x - body.x;
                    let dy = c.y - body.y;
                    let dist = (dx * dx + dy * dy).sqrt();
                    let size = rect.width().max(rect.height());
                    if dist > 0.0 && size / dist < self.theta {
                        acc += self.pull(body, c);
                    } else {
                        for quadrant in Quadrant::ALL {
                            let child = child_index(index, quadrant);
                            if child < nodes.len() {
                                stack.push((child, rect.child(quadrant)));
                            }
                        }
                    }
                }
            }
        }
        acc
    }

    /// Accelerations for every body, evaluated in parallel.
    pub fn accelerations(&self, nodes: &[Node], bounds: Rect, bodies: &[Point]) -> Vec<Vec2> {
        bodies
            .par_iter()
            .map(|&body| self.acceleration_at(nodes, bounds, body))
            .collect()
    }

    /// Softened acceleration of `body` towards `source`.
    fn pull(&self, body: Point, source: Point) -> Vec2 {
        let dx = source.x - body.x;
        let dy = source.y - body.y;
        let dist_sq = dx * dx + dy * dy + self.softening * self.softening;
        if dist_sq == 0.0 {
            return Vec2::ZERO;
        }
        let inv_dist = dist_sq.sqrt().recip();
        let scale = self.gravitational_constant * source.mass * inv_dist * inv_dist * inv_dist;
        Vec2::new(scale * dx, scale * dy)
    }
}

/// Centroid of `node` with `body` removed from its sums when `body` lies inside `rect`.
///
/// `None` when nothing but the body itself is left.
fn centroid_without(node: &Node, rect: Rect, body: Point) -> Option<Point> {
    if !rect.contains(body.x, body.y) {
        return node.centroid();
    }
    let others = node.point_count().checked_sub(1).filter(|&n| n > 0)?;
    let sum = node.point();
    let n = others as f32;
    Some(Point::new(
        (sum.x - body.x) / n,
        (sum.y - body.y) / n,
        sum.mass - body.mass,
    ))
}

/// Exact O(N²) accelerations, for checking the tree approximation.
pub fn direct_accelerations(bodies: &[Point], gravitational_constant: f32, softening: f32) -> Vec<Vec2> {
    let evaluator = ForceEvaluator { theta: 0.0, gravitational_constant, softening };
    bodies
        .par_iter()
        .enumerate()
        .map(|(i, &body)| {
            let mut acc = Vec2::ZERO;
            for (j, &other) in bodies.iter().enumerate() {
                if i != j {
                    acc += evaluator.pull(body, other);
                }
            }
            acc
        })
        .collect()
}

/// One force pass over a finished frame, for a fixed set of bodies.
pub struct ForcePass<'b> {
    pub evaluator: ForceEvaluator,
    pub bodies: &'b [Point],
}

impl<'b> ForcePass<'b> {
    pub fn new(evaluator: ForceEvaluator, bodies: &'b [Point]) -> Self {
        Self { evaluator, bodies }
    }
}

impl TreeConsumer for ForcePass<'_> {
    type Output = Vec<Vec2>;

    fn consume(&mut self, frame: &BuiltFrame<'_>) -> Vec<Vec2> {
        self.evaluator.accelerations(frame.nodes, frame.bounds, self.bodies)
    }
}
