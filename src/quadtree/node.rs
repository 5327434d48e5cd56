use bytemuck::{Pod, Zeroable};

use crate::geometry::Point;

/// One slot of the linear quadtree, laid out for direct transfer to a GPU buffer.
///
/// The record is `{has_children, point_count, point}` in 20 bytes. `has_children` is stored
/// as a `u32` holding 0 or 1; on little-endian targets that is byte-identical to a C `bool`
/// followed by three zeroed padding bytes.
///
/// No tag is stored. Use [`Node::state`] to get the tagged view:
///
/// | point_count | has_children | state |
/// |---|---|---|
/// | 0 | false | `Empty` |
/// | 1 | false | `Leaf` |
/// | ≥1 | true | `Internal` |
/// | ≥2 | false | `Saturated` |
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct Node {
    has_children: u32,
    point_count: i32,
    point: Point,
}

/// The tagged view of a [`Node`].
///
/// # Examples
///
/// ```
/// use linear_quadtree::quadtree::{Node, NodeState};
///
/// match Node::EMPTY.state() {
///     NodeState::Empty => {}
///     other => panic!("Expected an Empty node, got {:?}", other),
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeState {
    /// Nothing has been inserted here this frame.
    Empty,
    /// Exactly one original point, stored as-is.
    Leaf(Point),
    /// Split into four children; `sum` covers every point beneath.
    Internal { sum: Point, count: usize },
    /// Reached the maximum depth with more than one point; `sum` is the merged pseudo-point.
    Saturated { sum: Point, count: usize },
}

impl Node {
    pub const EMPTY: Node = Node {
        has_children: 0,
        point_count: 0,
        point: Point::ZERO,
    };

    pub fn has_children(&self) -> bool {
        self.has_children != 0
    }

    pub fn point_count(&self) -> usize {
        self.point_count.max(0) as usize
    }

    /// The stored point: the occupant of a leaf, or the raw sum for aggregated nodes.
    pub fn point(&self) -> Point {
        self.point
    }

    pub fn is_empty(&self) -> bool {
        self.point_count <= 0
    }

    pub fn state(&self) -> NodeState {
        match (self.point_count(), self.has_children()) {
            (0, _) => NodeState::Empty,
            (1, false) => NodeState::Leaf(self.point),
            (count, true) => NodeState::Internal { sum: self.point, count },
            (count, false) => NodeState::Saturated { sum: self.point, count },
        }
    }

    /// The node as a single pseudo-body: position averaged over `point_count`, total mass.
    ///
    /// The average is unweighted, matching the raw coordinate sums the tree keeps. Returns
    /// `None` for an empty node.
    ///
    /// # Examples
    ///
    /// ```
    /// use linear_quadtree::quadtree::LinearQuadtree;
    /// use linear_quadtree::geometry::{Point, Rect, Vec2};
    ///
    /// let mut tree = LinearQuadtree::new(0).unwrap();
    /// let bounds = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
    /// tree.insert(0, 0, bounds, Point::new(0.5, 1.5, 1.0)).unwrap();
    /// tree.insert(0, 0, bounds, Point::new(1.5, 1.5, 3.0)).unwrap();
    ///
    /// assert_eq!(tree.root().centroid(), Some(Point::new(1.0, 1.5, 4.0)));
    /// ```
    pub fn centroid(&self) -> Option<Point> {
        let count = self.point_count();
        if count == 0 {
            return None;
        }
        let n = count as f32;
        Some(Point::new(self.point.x / n, self.point.y / n, self.point.mass))
    }

    pub(crate) fn store(&mut self, point: Point) {
        self.point = point;
        self.point_count = 1;
    }

    pub(crate) fn accumulate(&mut self, point: Point) {
        self.point += point;
        self.point_count += 1;
    }

    pub(crate) fn set_has_children(&mut self, has_children: bool) {
        self.has_children = u32::from(has_children);
    }
}
