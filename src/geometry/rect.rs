use super::Vec2;

/// One of the four children of a subdivided rectangle.
///
/// The discriminant is the child's offset inside its parent's child range, so the order
/// NW, NE, SW, SE is also the storage order in the node array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Quadrant> {
        Quadrant::ALL.get(index).copied()
    }

    fn is_east(self) -> bool {
        matches!(self, Quadrant::NorthEast | Quadrant::SouthEast)
    }

    fn is_north(self) -> bool {
        matches!(self, Quadrant::NorthWest | Quadrant::NorthEast)
    }
}

/// An axis-aligned, half-open rectangle `[min, max)`.
///
/// Points on the left and bottom edges are inside, points on the right and top edges are
/// not. Subdividing at the midpoint therefore yields four children that never overlap and
/// together cover the parent exactly.
///
/// # Examples
///
/// ```
/// use linear_quadtree::geometry::{Rect, Vec2};
///
/// let rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
///
/// assert!(rect.contains(0.0, 0.0));  // bottom-left corner
/// assert!(rect.contains(1.0, 1.0));  // center
/// assert!(!rect.contains(2.0, 1.0)); // right edge (exclusive)
/// assert!(!rect.contains(1.0, 2.0)); // top edge (exclusive)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// A rectangle can hold points when its corners are finite and `min < max` on both axes.
    ///
    /// `width` and `height` may still overflow to infinity for extents wider than `f32::MAX`.
    pub fn is_valid(&self) -> bool {
        self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
            && self.min.x < self.max.x
            && self.min.y < self.max.y
    }

    /// The point both bisecting lines pass through.
    ///
    /// Halves are taken before adding, so a span wider than `f32::MAX` still has a finite
    /// midpoint. The result is clamped into `[min, max]` against subnormal rounding.
    pub fn midpoint(&self) -> Vec2 {
        Vec2::new(
            half_way(self.min.x, self.max.x),
            half_way(self.min.y, self.max.y),
        )
    }

    /// Returns true if the point (x, y) is inside this rectangle.
    ///
    /// Lower bounds are inclusive and upper bounds exclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min.x &&
            x <  self.max.x &&
            y >= self.min.y &&
            y <  self.max.y
    }

    /// The quadrant of this rectangle that contains `(x, y)`.
    ///
    /// A point on a bisecting line belongs to the east or north side, which is the only
    /// child whose half-open extent contains it. The exact center is north-east.
    ///
    /// The result is only meaningful when `contains(x, y)` holds.
    ///
    /// # Examples
    ///
    /// ```
    /// use linear_quadtree::geometry::{Quadrant, Rect, Vec2};
    ///
    /// let rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
    /// assert_eq!(rect.quadrant_of(0.5, 1.5), Quadrant::NorthWest);
    /// assert_eq!(rect.quadrant_of(1.0, 1.0), Quadrant::NorthEast);
    /// assert_eq!(rect.quadrant_of(0.0, 0.0), Quadrant::SouthWest);
    /// assert_eq!(rect.quadrant_of(1.0, 0.999), Quadrant::SouthEast);
    /// ```
    pub fn quadrant_of(&self, x: f32, y: f32) -> Quadrant {
        let mid = self.midpoint();
        match (y >= mid.y, x >= mid.x) {
            (true, false) => Quadrant::NorthWest,
            (true, true) => Quadrant::NorthEast,
            (false, false) => Quadrant::SouthWest,
            (false, true) => Quadrant::SouthEast,
        }
    }

    /// The extent of one child after bisecting both axes.
    pub fn child(&self, quadrant: Quadrant) -> Rect {
        let mid = self.midpoint();
        let (min_x, max_x) = if quadrant.is_east() { (mid.x, self.max.x) } else { (self.min.x, mid.x) };
        let (min_y, max_y) = if quadrant.is_north() { (mid.y, self.max.y) } else { (self.min.y, mid.y) };
        Rect::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    /// Subdivides the rectangle into its four children, in NW, NE, SW, SE order.
    pub fn subdivide(&self) -> [Rect; 4] {
        Quadrant::ALL.map(|q| self.child(q))
    }
}

#[inline]
fn half_way(low: f32, high: f32) -> f32 {
    (low * 0.5 + high * 0.5).max(low).min(high)
}
