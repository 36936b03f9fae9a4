//! Geometry primitives shared by every analysis stage.
//!
//! Pure value types with no I/O:
//! - BoundingBox: the left/top/width/height rectangle every element carries
//! - LineSegment: a stroked segment with thickness and a stable identity

mod bbox;
mod segment;

pub use bbox::{BoundingBox, Overlap};
pub use segment::LineSegment;

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;
