//! A linear (array-indexed) quadtree for Barnes–Hut n-body approximation.
//!
//! Each frame the tree is cleared, bounded around the current bodies and refilled one body
//! at a time. The result is a flat array of fixed-size node records that a separate force
//! stage, typically a GPU kernel, can read as one contiguous block.
pub mod utils;
pub mod geometry;
pub mod bounds;
pub mod quadtree;
pub mod frame;
pub mod force;
pub mod scenario;

pub use bounds::find_bounding_box;
pub use frame::{BuiltFrame, FrameBuilder, TreeConsumer};
pub use geometry::{Point, Quadrant, Rect, Vec2};
pub use quadtree::{LinearQuadtree, Node, NodeState};
pub use utils::{ErrorKind, QuadtreeError, SimulationConfig};

/// ### General helper function
/// - Asserts that two floating point numbers are approximately equal.
///
/// ### Arguments
///
/// * `a` - The first floating point number.
/// * `b` - The second floating point number.
/// * `epsilon` - The maximum difference between `a` and `b` for them to be considered equal.
/// * `optional_message` - An optional message to display if the assertion fails.
///
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32, optional_message: Option<&str>) {
    match optional_message {
        Some(message) => assert!((a - b).abs() < epsilon, "a: {:?},\nb: {:?},\nepsilon: {:?},\n message: {:?}", a, b, epsilon, message),
        None => assert!((a - b).abs() < epsilon, "Expected {} to be approximately equal to {} (epsilon: {})", a, b, epsilon),
    }
}
