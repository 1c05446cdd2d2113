//! A 1D range tree over the ordered tree in [`crate::tree`] (`spec.md` §4.7).
//!
//! Unlike the classic textbook presentation (data at the leaves only), our backing
//! [`RedBlackTree`] stores a key at every node, so the query walks the two boundary paths
//! from the split node and, at every node that falls inside the range, reports that node
//! *and* its entire off-path subtree in one shot.

use ordered_float::OrderedFloat;

use crate::tree::{NaturalOrder, NodeId, RedBlackTree};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

pub struct RangeTree1D {
  tree: RedBlackTree<OrderedFloat<f64>, (), NaturalOrder>,
}

impl RangeTree1D {
  pub fn new(values: impl IntoIterator<Item = f64>) -> RangeTree1D {
    let mut tree = RedBlackTree::new();
    for v in values {
      tree.insert(OrderedFloat(v), ());
    }
    RangeTree1D { tree }
  }

  pub fn len(&self) -> usize {
    self.tree.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tree.is_empty()
  }

  pub fn insert(&mut self, value: f64) {
    self.tree.insert(OrderedFloat(value), ());
  }

  /// All stored values in `[range.min, range.max]`, ascending.
  pub fn range_search(&self, range: &Range) -> Vec<f64> {
    let lo = OrderedFloat(range.min);
    let hi = OrderedFloat(range.max);
    let Some(split) = self.tree.find_split_node(&lo, &hi) else {
      return Vec::new();
    };
    let mut out = vec![self.tree.key(split).0];

    let mut v = self.tree.left_child(split);
    while let Some(id) = v {
      let k = self.tree.key(id).0;
      if k >= range.min {
        out.push(k);
        self.report_subtree(self.tree.right_child(id), &mut out);
        v = self.tree.left_child(id);
      } else {
        v = self.tree.right_child(id);
      }
    }

    let mut v = self.tree.right_child(split);
    while let Some(id) = v {
      let k = self.tree.key(id).0;
      if k <= range.max {
        out.push(k);
        self.report_subtree(self.tree.left_child(id), &mut out);
        v = self.tree.right_child(id);
      } else {
        v = self.tree.left_child(id);
      }
    }

    out.sort_by(|a, b| a.partial_cmp(b).unwrap());
    out
  }

  fn report_subtree(&self, id: Option<NodeId>, out: &mut Vec<f64>) {
    let Some(id) = id else { return };
    self.report_subtree(self.tree.left_child(id), out);
    out.push(self.tree.key(id).0);
    self.report_subtree(self.tree.right_child(id), out);
  }
}

/// `O(n)` reference implementation.
pub fn brute_force_range_search(values: &[f64], range: &Range) -> Vec<f64> {
  let mut out: Vec<f64> = values.iter().copied().filter(|v| *v >= range.min && *v <= range.max).collect();
  out.sort_by(|a, b| a.partial_cmp(b).unwrap());
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn matches_brute_force_on_fixed_set() {
    let values = vec![5.0, 1.0, 9.0, 3.0, 7.0, -2.0, 4.4, 100.0];
    let tree = RangeTree1D::new(values.iter().copied());
    let range = Range { min: 0.0, max: 7.0 };
    let mut got = tree.range_search(&range);
    got.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(got, brute_force_range_search(&values, &range));
  }

  #[test]
  fn property_random_sets_match_brute_force() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..20 {
      let values: Vec<f64> = (0..200).map(|_| rng.gen_range(-500.0..500.0)).collect();
      let tree = RangeTree1D::new(values.iter().copied());
      for _ in 0..10 {
        let a = rng.gen_range(-500.0..500.0);
        let b = rng.gen_range(-500.0..500.0);
        let range = Range {
          min: a.min(b),
          max: a.max(b),
        };
        let mut got = tree.range_search(&range);
        got.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(got, brute_force_range_search(&values, &range));
      }
    }
  }
}
