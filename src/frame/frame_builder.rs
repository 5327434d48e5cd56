//! Per-frame orchestration: validate, clear, bound, insert, hand off.
//!
//! A frame either builds completely or is rejected before the node array is touched, so a
//! consumer can always fall back to the last tree that built successfully.
//!
//! # Example
//!
//! ```
//! use linear_quadtree::frame::{BuiltFrame, FrameBuilder, TreeConsumer};
//! use linear_quadtree::geometry::Point;
//! use linear_quadtree::utils::SimulationConfig;
//!
//! struct RootMass;
//!
//! impl TreeConsumer for RootMass {
//!     type Output = f32;
//!     fn consume(&mut self, frame: &BuiltFrame<'_>) -> f32 {
//!         frame.nodes[0].point().mass
//!     }
//! }
//!
//! let config = SimulationConfig::new(Some(4), None, None, None);
//! let mut builder = FrameBuilder::new(&config).unwrap();
//! builder.build(&[Point::new(0.0, 0.0, 2.0), Point::new(1.0, 1.0, 3.0)]).unwrap();
//!
//! assert_eq!(builder.hand_off(&mut RootMass), Some(5.0));
//!
//! // a rejected frame keeps the previous tree available
//! assert!(builder.build(&[]).is_err());
//! assert_eq!(builder.hand_off(&mut RootMass), Some(5.0));
//! ```
use log::{debug, warn};

use crate::bounds::find_bounding_box;
use crate::frame::{timed, FrameTimer, NoopTimer};
use crate::geometry::{Point, Rect};
use crate::quadtree::{LinearQuadtree, Node};
use crate::utils::{QuadtreeError, SimulationConfig};

/// A successfully built tree, borrowed for the duration of one hand-off.
#[derive(Debug, Clone, Copy)]
pub struct BuiltFrame<'a> {
    /// Sequence number of the build that produced this tree, starting at 1.
    pub frame: u64,
    pub bounds: Rect,
    pub body_count: usize,
    pub max_depth: usize,
    pub nodes: &'a [Node],
}

/// The downstream reader of a finished tree.
///
/// The consumer only ever sees a shared borrow of the node array. The next build needs
/// `&mut FrameBuilder`, so a hand-off is always finished before the array is rewritten.
pub trait TreeConsumer {
    type Output;

    fn consume(&mut self, frame: &BuiltFrame<'_>) -> Self::Output;
}

#[derive(Debug, Clone, Copy)]
struct FrameRecord {
    frame: u64,
    bounds: Rect,
    body_count: usize,
}

/// Owns the node array for the lifetime of a simulation and rebuilds it every frame.
#[derive(Debug)]
pub struct FrameBuilder<T: FrameTimer = NoopTimer> {
    tree: LinearQuadtree,
    timer: T,
    frames_built: u64,
    frames_rejected: u64,
    last_valid: Option<FrameRecord>,
}

impl FrameBuilder<NoopTimer> {
    pub fn new(config: &SimulationConfig) -> Result<Self, QuadtreeError> {
        Self::with_timer(config, NoopTimer)
    }
}

impl<T: FrameTimer> FrameBuilder<T> {
    /// Validates `config` and allocates the tree.
    pub fn with_timer(config: &SimulationConfig, timer: T) -> Result<Self, QuadtreeError> {
        config.validate()?;
        Ok(Self {
            tree: LinearQuadtree::new(config.max_depth)?,
            timer,
            frames_built: 0,
            frames_rejected: 0,
            last_valid: None,
        })
    }

    /// Rebuilds the tree from this frame's bodies.
    ///
    /// # Errors
    ///
    /// Anything [`find_bounding_box`] rejects. The previous tree stays in place and remains
    /// available through [`FrameBuilder::latest`].
    pub fn build(&mut self, points: &[Point]) -> Result<BuiltFrame<'_>, QuadtreeError> {
        self.timer.begin("Tree creation time:");
        let bounds = match timed(&mut self.timer, "Bounding box:", || find_bounding_box(points)) {
            Ok(bounds) => bounds,
            Err(e) => {
                self.timer.end();
                self.frames_rejected += 1;
                warn!("Rejected frame {}: {}; keeping the previous tree", self.frames_built + 1, e);
                return Err(e);
            }
        };

        let tree = &mut self.tree;
        timed(&mut self.timer, "Clear:", || tree.clear());
        timed(&mut self.timer, "Insert:", || tree.insert_all(bounds, points));
        self.timer.end();

        self.frames_built += 1;
        let stats = self.tree.stats();
        debug!(
            "Built frame {}: {} bodies, {} leaves, {} internal, {} saturated, depth {:?}",
            self.frames_built,
            points.len(),
            stats.leaves,
            stats.internal,
            stats.saturated,
            stats.deepest_level
        );
        let record = FrameRecord { frame: self.frames_built, bounds, body_count: points.len() };
        self.last_valid = Some(record);
        Ok(self.frame_view(record))
    }

    /// The most recent tree that built successfully.
    pub fn latest(&self) -> Option<BuiltFrame<'_>> {
        self.last_valid.map(|record| self.frame_view(record))
    }

    /// Passes the latest valid tree to `consumer`. Returns `None` if no frame has built yet.
    pub fn hand_off<C: TreeConsumer>(&self, consumer: &mut C) -> Option<C::Output> {
        self.latest().map(|frame| consumer.consume(&frame))
    }

    pub fn tree(&self) -> &LinearQuadtree {
        &self.tree
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn frames_built(&self) -> u64 {
        self.frames_built
    }

    pub fn frames_rejected(&self) -> u64 {
        self.frames_rejected
    }

    /// Tears down the simulation's tree.
    pub fn destroy(self) {
        self.tree.destroy();
    }

    fn frame_view(&self, record: FrameRecord) -> BuiltFrame<'_> {
        BuiltFrame {
            frame: record.frame,
            bounds: record.bounds,
            body_count: record.body_count,
            max_depth: self.tree.max_depth(),
            nodes: self.tree.nodes(),
        }
    }
}
