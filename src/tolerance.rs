//! Epsilon ladder shared by every predicate in the kernel.
//!
//! `spec.md` §3.1 requires that "all control-flow decisions use the predicate layer,
//! never direct `==` on coordinates." Every comparison in this crate ultimately bottoms
//! out in one of the helpers below, scaled by the magnitude of its inputs rather than a
//! single global constant.

/// Absolute floor below which a quantity snaps to zero regardless of scale.
pub const ABSOLUTE_EPS: f64 = 1e-12;

/// Relative tolerance factor: two values are considered equal when their difference is
/// within `RELATIVE_EPS * max(|a|, |b|)`.
pub const RELATIVE_EPS: f64 = 1e-9;

/// `true` if `a` and `b` are equal up to the relative/absolute tolerance ladder.
pub fn approx_eq(a: f64, b: f64) -> bool {
  let diff = (a - b).abs();
  if diff <= ABSOLUTE_EPS {
    return true;
  }
  let scale = a.abs().max(b.abs());
  diff <= RELATIVE_EPS * scale
}

/// `true` if `value` is close enough to zero to be treated as exactly zero, scaled by
/// `magnitude` (typically the largest operand that fed into computing `value`).
pub fn approx_zero(value: f64, magnitude: f64) -> bool {
  value.abs() <= ABSOLUTE_EPS.max(RELATIVE_EPS * magnitude)
}

/// Three-way comparison of `a` against `b` that collapses "nearly equal" into `Equal`.
pub fn approx_cmp(a: f64, b: f64) -> std::cmp::Ordering {
  use std::cmp::Ordering::*;
  if approx_eq(a, b) {
    Equal
  } else if a < b {
    Less
  } else {
    Greater
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exact_equal() {
    assert!(approx_eq(1.0, 1.0));
  }

  #[test]
  fn relative_scale() {
    assert!(approx_eq(1e9, 1e9 + 1.0));
    assert!(!approx_eq(1.0, 1.0 + 1e-3));
  }

  #[test]
  fn zero_floor() {
    assert!(approx_zero(1e-13, 1.0));
    assert!(!approx_zero(1e-6, 1.0));
  }
}
