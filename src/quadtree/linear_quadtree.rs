//! The linear quadtree: a complete 4-ary tree stored in one flat array.
//!
//! Node `i` has its children at `4i + 1 ..= 4i + 4`, in NW, NE, SW, SE order. The array is
//! sized once from the maximum depth and reused every frame, so the whole tree can be
//! handed to another computation unit as a single contiguous block.
//!
//! # Example
//!
//! ```
//! use linear_quadtree::quadtree::{LinearQuadtree, NodeState};
//! use linear_quadtree::geometry::Point;
//!
//! let mut tree = LinearQuadtree::new(4).unwrap();
//! let bodies = [
//!     Point::new(0.1, 0.1, 1.0),
//!     Point::new(0.9, 0.8, 2.0),
//!     Point::new(0.4, 0.6, 1.5),
//! ];
//! tree.build(&bodies).unwrap();
//!
//! assert_eq!(tree.root().point_count(), 3);
//! assert!(matches!(tree.root().state(), NodeState::Internal { count: 3, .. }));
//! ```
use std::ops::RangeInclusive;

use log::{debug, error};

use crate::bounds::find_bounding_box;
use crate::geometry::{Point, Quadrant, Rect};
use crate::quadtree::{Node, NodeState};
use crate::utils::{level_start, tree_length, QuadtreeError, MAX_SUPPORTED_DEPTH};

/// Index range of the four children of `parent`.
#[inline]
pub fn child_range(parent: usize) -> RangeInclusive<usize> {
    let low = 4 * parent + 1;
    low..=low + 3
}

#[inline]
pub fn child_index(parent: usize, quadrant: Quadrant) -> usize {
    4 * parent + 1 + quadrant.index()
}

#[inline]
pub fn parent_index(index: usize) -> Option<usize> {
    if index == 0 {
        None
    } else {
        Some((index - 1) / 4)
    }
}

/// Level of `index` in the implicit tree; the root is level 0.
pub fn depth_of(index: usize) -> usize {
    let mut depth = 0;
    let mut i = index;
    while let Some(parent) = parent_index(i) {
        i = parent;
        depth += 1;
    }
    depth
}

/// The extent covered by `index`, derived from the extent of the root.
///
/// # Examples
///
/// ```
/// use linear_quadtree::quadtree::node_bounds;
/// use linear_quadtree::geometry::{Rect, Vec2};
///
/// let root = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
/// // index 2 is the north-east child of the root
/// assert_eq!(node_bounds(root, 2), Rect::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)));
/// ```
pub fn node_bounds(root: Rect, index: usize) -> Rect {
    let mut path = Vec::new();
    let mut i = index;
    while let Some(parent) = parent_index(i) {
        path.push(Quadrant::from_index(i - child_index(parent, Quadrant::NorthWest)));
        i = parent;
    }
    path.into_iter()
        .rev()
        .flatten()
        .fold(root, |rect, quadrant| rect.child(quadrant))
}

/// Node counts by state, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub empty: usize,
    pub leaves: usize,
    pub internal: usize,
    pub saturated: usize,
    /// Deepest level holding at least one point, `None` for an empty tree.
    pub deepest_level: Option<usize>,
}

impl TreeStats {
    pub fn occupied(&self) -> usize {
        self.leaves + self.internal + self.saturated
    }
}

/// A fixed-capacity quadtree over `4^(max_depth + 1) - 1` nodes.
///
/// Created once, cleared and rebuilt each frame, dropped at teardown. No node is
/// individually allocated or freed.
#[derive(Debug, Clone)]
pub struct LinearQuadtree {
    nodes: Vec<Node>,
    max_depth: usize,
}

impl LinearQuadtree {
    /// Allocates a zeroed tree for `max_depth`.
    ///
    /// The array comes from a zeroed allocation rather than a slot-by-slot fill, so pages of
    /// a deep tree are only touched once they are written.
    ///
    /// # Errors
    ///
    /// Returns `CapacityOverflow` if `max_depth` exceeds [`MAX_SUPPORTED_DEPTH`].
    pub fn new(max_depth: usize) -> Result<Self, QuadtreeError> {
        if max_depth > MAX_SUPPORTED_DEPTH {
            error!("Refusing to allocate a quadtree of depth {} (max {})", max_depth, MAX_SUPPORTED_DEPTH);
            return Err(QuadtreeError::CapacityOverflow { max_depth });
        }
        let length = tree_length(max_depth).ok_or(QuadtreeError::CapacityOverflow { max_depth })?;
        debug!(
            "Allocating linear quadtree: depth {}, {} nodes, {} bytes",
            max_depth,
            length,
            length.saturating_mul(std::mem::size_of::<Node>())
        );
        // `Node::EMPTY` is all zero bits, so a zeroed allocation is already a cleared tree
        Ok(Self {
            nodes: bytemuck::allocation::zeroed_vec(length),
            max_depth,
        })
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of node slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// The node array as raw bytes, ready to upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Resets every slot to the empty state.
    pub fn clear(&mut self) {
        self.nodes.fill(Node::EMPTY);
    }

    /// Releases the backing storage. Equivalent to dropping the tree.
    pub fn destroy(self) {
        debug!("Releasing linear quadtree of {} nodes", self.nodes.len());
    }

    /// Clears the tree and inserts every point, using the tightest bounds around them.
    ///
    /// Input is validated before anything is cleared; on error the previous contents are
    /// left untouched.
    ///
    /// # Returns
    ///
    /// The root extent used for this build.
    ///
    /// # Errors
    ///
    /// Any error from [`find_bounding_box`].
    pub fn build(&mut self, points: &[Point]) -> Result<Rect, QuadtreeError> {
        let bounds = find_bounding_box(points)?;
        self.clear();
        self.insert_all(bounds, points);
        Ok(bounds)
    }

    /// Clears the tree and inserts every point into a caller-chosen root extent.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a degenerate extent, `NonFinitePoint` or `PointOutOfBounds`
    /// for the first offending point. The tree is unchanged on error.
    pub fn build_within(&mut self, bounds: Rect, points: &[Point]) -> Result<(), QuadtreeError> {
        if !bounds.is_valid() {
            return Err(QuadtreeError::InvalidParameter(format!("degenerate root extent {:?}", bounds)));
        }
        for (index, p) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(QuadtreeError::NonFinitePoint { index });
            }
            if !bounds.contains(p.x, p.y) {
                return Err(QuadtreeError::PointOutOfBounds { index, x: p.x, y: p.y });
            }
        }
        self.clear();
        self.insert_all(bounds, points);
        Ok(())
    }

    /// Inserts one point into the subtree rooted at `node_index`, whose extent is `bounds`.
    ///
    /// The arguments are checked before the recursion starts: `depth` must not exceed the
    /// tree's maximum depth and must be the level of `node_index`, the index must be inside
    /// the array, and the point must be finite and inside `bounds`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linear_quadtree::quadtree::LinearQuadtree;
    /// use linear_quadtree::geometry::{Point, Rect, Vec2};
    ///
    /// let mut tree = LinearQuadtree::new(1).unwrap();
    /// let bounds = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
    /// tree.insert(0, 0, bounds, Point::new(0.5, 1.5, 1.0)).unwrap();
    /// tree.insert(0, 0, bounds, Point::new(1.5, 1.5, 3.0)).unwrap();
    ///
    /// assert_eq!(tree.root().point_count(), 2);
    /// assert_eq!(tree.nodes()[1].point(), Point::new(0.5, 1.5, 1.0));
    /// assert_eq!(tree.nodes()[2].point(), Point::new(1.5, 1.5, 3.0));
    ///
    /// // outside the half-open extent
    /// assert!(tree.insert(0, 0, bounds, Point::new(2.0, 1.0, 1.0)).is_err());
    /// ```
    pub fn insert(
        &mut self,
        depth: usize,
        node_index: usize,
        bounds: Rect,
        point: Point,
    ) -> Result<(), QuadtreeError> {
        if depth > self.max_depth {
            return Err(QuadtreeError::InvalidDepth { depth, max_depth: self.max_depth });
        }
        if node_index >= self.nodes.len() {
            error!("Node index {} is outside of the tree ({} nodes)", node_index, self.nodes.len());
            return Err(QuadtreeError::CapacityViolation { index: node_index, capacity: self.nodes.len() });
        }
        if depth_of(node_index) != depth {
            return Err(QuadtreeError::InvalidDepth { depth, max_depth: self.max_depth });
        }
        if !point.is_finite() {
            return Err(QuadtreeError::NonFinitePoint { index: 0 });
        }
        if !bounds.contains(point.x, point.y) {
            return Err(QuadtreeError::PointOutOfBounds { index: 0, x: point.x, y: point.y });
        }
        self.insert_unchecked(depth, node_index, bounds, point);
        Ok(())
    }

    /// Inserts `points` in order at the root. Bounds must already contain every point.
    pub(crate) fn insert_all(&mut self, bounds: Rect, points: &[Point]) {
        for p in points {
            self.insert_unchecked(0, 0, bounds, *p);
        }
    }

    fn insert_unchecked(&mut self, depth: usize, node_index: usize, bounds: Rect, point: Point) {
        let at_max_depth = depth == self.max_depth;
        match (self.nodes[node_index].state(), at_max_depth) {
            (NodeState::Empty, _) => {
                self.nodes[node_index].store(point);
                return;
            }
            (_, true) => {
                // compress into a single pseudo-point instead of growing children
                self.nodes[node_index].set_has_children(false);
            }
            (NodeState::Leaf(resident), false) => {
                self.nodes[node_index].set_has_children(true);
                self.descend(depth, node_index, bounds, point);
                self.descend(depth, node_index, bounds, resident);
            }
            (NodeState::Internal { .. }, false) | (NodeState::Saturated { .. }, false) => {
                self.nodes[node_index].set_has_children(true);
                self.descend(depth, node_index, bounds, point);
            }
        }
        self.nodes[node_index].accumulate(point);
    }

    fn descend(&mut self, depth: usize, node_index: usize, bounds: Rect, point: Point) {
        let quadrant = bounds.quadrant_of(point.x, point.y);
        let child = child_index(node_index, quadrant);
        debug_assert!(child < self.nodes.len(), "child {} beyond capacity {}", child, self.nodes.len());
        self.insert_unchecked(depth + 1, child, bounds.child(quadrant), point);
    }

    /// Counts nodes by state across every addressable level.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for depth in 0..=self.max_depth {
            let start = level_start(depth);
            let end = level_start(depth + 1).min(self.nodes.len());
            for node in &self.nodes[start..end] {
                match node.state() {
                    NodeState::Empty => {
                        stats.empty += 1;
                        continue;
                    }
                    NodeState::Leaf(_) => stats.leaves += 1,
                    NodeState::Internal { .. } => stats.internal += 1,
                    NodeState::Saturated { .. } => stats.saturated += 1,
                }
                stats.deepest_level = Some(depth);
            }
        }
        stats
    }
}
