// math/mod.rs
//
// Vector and segment primitives shared by colliders and hit testing.

pub mod segment;
pub mod vector;

pub use segment::{Intersection, Segment};
pub use vector::{normalize_angle, Vector2, VectorExt};
