use std::ops::{Add, AddAssign};

use bytemuck::{Pod, Zeroable};

use crate::utils::QuadtreeError;

/// A mass-bearing sample in 2D space.
///
/// Outside of the tree this is a single body. Inside an aggregated node it is the running
/// sum of every position and mass beneath that node; dividing `x` and `y` by the node's
/// point count gives the centroid.
///
/// The layout is three packed `f32`s so a slice of points can be handed to a GPU buffer
/// as-is.
///
/// # Examples
///
/// ```
/// use linear_quadtree::geometry::Point;
///
/// let a = Point::new(1.0, 2.0, 3.0);
/// let b = Point::new(0.5, 0.5, 1.0);
/// assert_eq!(a + b, Point::new(1.5, 2.5, 4.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub mass: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0, mass: 0.0 };

    pub const fn new(x: f32, y: f32, mass: f32) -> Self {
        Self { x, y, mass }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.mass.is_finite()
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, p: Self) {
        self.x += p.x;
        self.y += p.y;
        self.mass += p.mass;
    }
}

impl Add for Point {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

/// A plain 2D vector, used for rectangle corners and accelerations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, v: Self) {
        self.x += v.x;
        self.y += v.y;
    }
}

/// Reinterprets a flat `[x0, y0, mass0, x1, y1, mass1, ...]` buffer as points without
/// copying.
///
/// # Errors
///
/// Returns `InvalidParameter` if the length is not a multiple of three.
///
/// # Examples
///
/// ```
/// use linear_quadtree::geometry::{points_from_flat, Point};
///
/// let flat = [0.5, 1.5, 1.0, 1.5, 1.5, 3.0];
/// let points = points_from_flat(&flat).unwrap();
/// assert_eq!(points, &[Point::new(0.5, 1.5, 1.0), Point::new(1.5, 1.5, 3.0)]);
/// assert!(points_from_flat(&flat[..4]).is_err());
/// ```
pub fn points_from_flat(data: &[f32]) -> Result<&[Point], QuadtreeError> {
    bytemuck::try_cast_slice(data).map_err(|_| {
        QuadtreeError::InvalidParameter(format!(
            "flat point buffer length {} is not a multiple of 3",
            data.len()
        ))
    })
}
