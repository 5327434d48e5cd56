use crate::geometry::{Point, Rect, Vec2};
use crate::utils::{next_up, QuadtreeError};

/// Computes the tightest half-open rectangle `[min, max)` that contains every point.
///
/// `min` is the smallest coordinate on each axis. `max` is the next representable `f32`
/// above the largest coordinate, so the point that defines the upper edge still satisfies
/// `x < max.x` and `y < max.y`. Shrinking any side by any amount excludes a point. A set of
/// identical points yields a rectangle one ulp wide, which is still valid for insertion.
///
/// Any finite set is accepted, however wide, except one whose largest coordinate is exactly
/// `f32::MAX`: no finite `f32` lies above it, so the half-open upper edge cannot be formed.
///
/// # Arguments
///
/// * `points` - The bodies of the current frame, in any order.
///
/// # Errors
///
/// * `EmptyPointSet` if `points` is empty.
/// * `NonFinitePoint` for the first point with a NaN or infinite component.
/// * `InvalidParameter` if a coordinate equals `f32::MAX`.
///
/// # Examples
///
/// ```
/// use linear_quadtree::bounds::find_bounding_box;
/// use linear_quadtree::geometry::Point;
///
/// let points = [Point::new(0.5, 1.5, 1.0), Point::new(1.5, -1.0, 3.0)];
/// let bounds = find_bounding_box(&points).unwrap();
///
/// assert_eq!(bounds.min.x, 0.5);
/// assert_eq!(bounds.min.y, -1.0);
/// assert!(bounds.max.x > 1.5 && bounds.max.y > 1.5);
/// assert!(points.iter().all(|p| bounds.contains(p.x, p.y)));
/// ```
pub fn find_bounding_box(points: &[Point]) -> Result<Rect, QuadtreeError> {
    if points.is_empty() {
        return Err(QuadtreeError::EmptyPointSet);
    }

    let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);

    for (index, p) in points.iter().enumerate() {
        if !p.is_finite() {
            return Err(QuadtreeError::NonFinitePoint { index });
        }
        if p.x < min.x {
            min.x = p.x;
        }
        if p.y < min.y {
            min.y = p.y;
        }
        if p.x > max.x {
            max.x = p.x;
        }
        if p.y > max.y {
            max.y = p.y;
        }
    }

    let bounds = Rect::new(min, Vec2::new(next_up(max.x), next_up(max.y)));
    if !bounds.is_valid() {
        return Err(QuadtreeError::InvalidParameter(format!(
            "largest coordinate {:?} has no finite f32 above it",
            max
        )));
    }
    Ok(bounds)
}
