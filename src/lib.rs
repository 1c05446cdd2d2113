//! A 2D computational-geometry kernel: a numerically robust predicate layer, a
//! self-balancing red-black tree used both as a generic container and as the status
//! structure of three sweep-line algorithms, a doubly-connected edge list (DCEL), and
//! orthogonal range search over 1D/2D range trees and kd-trees.
//!
//! The top-level modules mirror the kernel's layering: [`tolerance`] and [`geom`] are the
//! numeric foundation everything else builds on; [`tree`] is the ordered-container
//! primitive; [`dcel`] and [`polygon`] are the planar-subdivision layer; [`range`] is
//! orthogonal search; [`algorithms`] holds the three sweep-line algorithms (monotone
//! partition/triangulation, Bentley-Ottmann intersection, Fortune's Voronoi diagram) built
//! on top of all of the above.

pub mod algorithms;
pub mod dcel;
pub mod geom;
pub mod polygon;
pub mod range;
pub mod tolerance;
pub mod tree;

use thiserror::Error;

/// The error taxonomy shared by every module in this crate: a precondition the caller
/// violated, a numerical degeneracy the algorithm could not resolve, a structural
/// invariant that validation found broken, or a failure crossing an external boundary
/// (e.g. malformed input data).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
  #[error("precondition violated: {0}")]
  Precondition(String),

  #[error("numerical degeneracy: {0}")]
  Degeneracy(String),

  #[error("structural invariant violated on {entity}: expected {expected}, found {actual}")]
  Invariant {
    entity: String,
    expected: String,
    actual: String,
  },

  #[error("malformed input: {0}")]
  ExternalBoundary(String),
}

pub type Result<T> = std::result::Result<T, Error>;
