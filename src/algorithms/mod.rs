//! Sweep-line algorithms built on top of [`crate::tree`]'s stateful-comparator status
//! structure (`spec.md` §4.4/§4.5/§4.6).

pub mod bentley_ottmann;
pub mod monotone;
pub mod voronoi;
