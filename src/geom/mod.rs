//! L0: points, segments, and the numerically robust predicate layer (`spec.md` §3, §4.1).

pub mod point;
pub mod predicates;
pub mod segment;

pub use point::Point;
pub use predicates::{
  angle, bisector, circumcircle, collinear, compute_intersection, intersection_exists,
  orientation, signed_area, strict_intersection_exists, subtended_angle, vertex_angle, Line,
  Orientation, Parabola,
};
pub use segment::Segment;
