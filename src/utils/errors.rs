use std::fmt;
use std::error::Error;

/// Broad classes of failure a tree build can report.
///
/// Every `QuadtreeError` maps to exactly one kind; callers that only care whether a frame
/// was rejected for bad input or because the node array would have been overrun can match
/// on this instead of on the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed input that violates a precondition.
    InvalidArgument,
    /// Node index arithmetic would leave the fixed-size node array.
    CapacityViolation,
}

/// Represents errors that can occur while building or querying a linear quadtree.
#[derive(Debug, Clone, PartialEq)]
pub enum QuadtreeError {
    /// The bounding box of an empty point set was requested.
    EmptyPointSet,
    /// The point at `index` has a NaN or infinite coordinate or mass.
    NonFinitePoint { index: usize },
    /// The point at `index` does not lie inside the half-open extent it is being inserted
    /// into.
    PointOutOfBounds { index: usize, x: f32, y: f32 },
    /// An insertion depth larger than the tree's maximum depth, or one that does not match
    /// the level of the node index it was paired with.
    InvalidDepth { depth: usize, max_depth: usize },
    /// A configuration or scenario parameter is out of range.
    InvalidParameter(String),
    /// A node index outside of the backing array.
    CapacityViolation { index: usize, capacity: usize },
    /// The node count for `max_depth` does not fit in the supported index range.
    CapacityOverflow { max_depth: usize },
}

impl QuadtreeError {
    /// Returns the broad class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuadtreeError::EmptyPointSet
            | QuadtreeError::NonFinitePoint { .. }
            | QuadtreeError::PointOutOfBounds { .. }
            | QuadtreeError::InvalidDepth { .. }
            | QuadtreeError::InvalidParameter(_) => ErrorKind::InvalidArgument,
            QuadtreeError::CapacityViolation { .. }
            | QuadtreeError::CapacityOverflow { .. } => ErrorKind::CapacityViolation,
        }
    }
}

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuadtreeError::EmptyPointSet => write!(f, "Cannot bound an empty point set"),
            QuadtreeError::NonFinitePoint { index } => {
                write!(f, "Point {} has a non-finite coordinate or mass", index)
            }
            QuadtreeError::PointOutOfBounds { index, x, y } => {
                write!(f, "Point {} at ({}, {}) lies outside of the node extent", index, x, y)
            }
            QuadtreeError::InvalidDepth { depth, max_depth } => {
                write!(f, "Invalid depth {} for a tree of max depth {}", depth, max_depth)
            }
            QuadtreeError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            QuadtreeError::CapacityViolation { index, capacity } => {
                write!(f, "Node index {} exceeds tree capacity {}", index, capacity)
            }
            QuadtreeError::CapacityOverflow { max_depth } => {
                write!(f, "A tree of max depth {} does not fit in memory", max_depth)
            }
        }
    }
}

impl Error for QuadtreeError {}
