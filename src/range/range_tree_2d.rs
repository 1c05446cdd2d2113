//! A static 2D range tree: a balanced primary tree over `x`, where every node additionally
//! carries an "associate" secondary structure indexing its whole subtree by `y`
//! (`spec.md` §4.7). Built once from a fixed point set — unlike [`super::kdtree::KdTree`]
//! there is no incremental insert.

use ordered_float::OrderedFloat;

use crate::geom::Point;
use crate::tree::{NaturalOrder, NodeId as TreeNodeId, RedBlackTree};

use super::Range2D;

type YKey = (OrderedFloat<f64>, OrderedFloat<f64>, u32);

/// The `y`-indexed associate structure stored at every primary-tree node.
struct AssociateTree {
  tree: RedBlackTree<YKey, Point, NaturalOrder>,
}

impl AssociateTree {
  fn build(points: &[Point]) -> AssociateTree {
    let mut tree = RedBlackTree::new();
    for (i, p) in points.iter().enumerate() {
      tree.insert((OrderedFloat(p.y), OrderedFloat(p.x), i as u32), *p);
    }
    AssociateTree { tree }
  }

  fn query(&self, y_min: f64, y_max: f64, out: &mut Vec<Point>) {
    let lo = (OrderedFloat(y_min), OrderedFloat(f64::MIN), u32::MIN);
    let hi = (OrderedFloat(y_max), OrderedFloat(f64::MAX), u32::MAX);
    let Some(split) = self.tree.find_split_node(&lo, &hi) else {
      return;
    };
    out.push(*self.tree.value(split));

    let mut v = self.tree.left_child(split);
    while let Some(id) = v {
      let y = self.tree.key(id).0 .0;
      if y >= y_min {
        out.push(*self.tree.value(id));
        self.report_subtree(self.tree.right_child(id), out);
        v = self.tree.left_child(id);
      } else {
        v = self.tree.right_child(id);
      }
    }

    let mut v = self.tree.right_child(split);
    while let Some(id) = v {
      let y = self.tree.key(id).0 .0;
      if y <= y_max {
        out.push(*self.tree.value(id));
        self.report_subtree(self.tree.left_child(id), out);
        v = self.tree.right_child(id);
      } else {
        v = self.tree.left_child(id);
      }
    }
  }

  fn report_subtree(&self, id: Option<TreeNodeId>, out: &mut Vec<Point>) {
    let Some(id) = id else { return };
    self.report_subtree(self.tree.left_child(id), out);
    out.push(*self.tree.value(id));
    self.report_subtree(self.tree.right_child(id), out);
  }
}

struct Node {
  x_val: f64,
  point: Option<Point>,
  left: Option<u32>,
  right: Option<u32>,
  associate: AssociateTree,
}

pub struct RangeTree2D {
  nodes: Vec<Node>,
  root: Option<u32>,
}

impl RangeTree2D {
  pub fn new(points: &[Point]) -> RangeTree2D {
    if points.is_empty() {
      return RangeTree2D {
        nodes: Vec::new(),
        root: None,
      };
    }
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
    let mut nodes = Vec::new();
    let root = Self::build(&sorted, 0, sorted.len() - 1, &mut nodes);
    RangeTree2D {
      nodes,
      root: Some(root),
    }
  }

  fn build(points: &[Point], start: usize, end: usize, nodes: &mut Vec<Node>) -> u32 {
    let distance = end - start;
    let mid = distance / 2 + start;
    let associate = AssociateTree::build(&points[start..=end]);
    let (left, right, point) = if distance == 0 {
      (None, None, Some(points[mid]))
    } else {
      let l = Self::build(points, start, mid, nodes);
      let r = Self::build(points, mid + 1, end, nodes);
      (Some(l), Some(r), None)
    };
    nodes.push(Node {
      x_val: points[mid].x,
      point,
      left,
      right,
      associate,
    });
    (nodes.len() - 1) as u32
  }

  fn is_leaf(&self, id: u32) -> bool {
    let n = &self.nodes[id as usize];
    n.left.is_none() && n.right.is_none()
  }

  fn find_split_node(&self, x_min: f64, x_max: f64) -> Option<u32> {
    let mut v = self.root?;
    while !self.is_leaf(v) && (x_max <= self.nodes[v as usize].x_val || x_min > self.nodes[v as usize].x_val) {
      v = if x_max <= self.nodes[v as usize].x_val {
        self.nodes[v as usize].left.unwrap()
      } else {
        self.nodes[v as usize].right.unwrap()
      };
    }
    Some(v)
  }

  pub fn range_query(&self, range: &Range2D) -> Vec<Point> {
    let mut out = Vec::new();
    let Some(split) = self.find_split_node(range.x_min, range.x_max) else {
      return out;
    };
    if self.is_leaf(split) {
      let p = self.nodes[split as usize].point.unwrap();
      if range.contains(&p) {
        out.push(p);
      }
      return out;
    }

    // Left boundary path.
    let mut v = self.nodes[split as usize].left.unwrap();
    loop {
      let node = &self.nodes[v as usize];
      if self.is_leaf(v) {
        let p = node.point.unwrap();
        if range.contains(&p) {
          out.push(p);
        }
        break;
      }
      if range.x_min <= node.x_val {
        if let Some(r) = node.right {
          self.nodes[r as usize].associate.query(range.y_min, range.y_max, &mut out);
        }
        v = node.left.unwrap();
      } else {
        v = node.right.unwrap();
      }
    }

    // Right boundary path.
    let mut v = self.nodes[split as usize].right.unwrap();
    loop {
      let node = &self.nodes[v as usize];
      if self.is_leaf(v) {
        let p = node.point.unwrap();
        if range.contains(&p) {
          out.push(p);
        }
        break;
      }
      if range.x_max >= node.x_val {
        if let Some(l) = node.left {
          self.nodes[l as usize].associate.query(range.y_min, range.y_max, &mut out);
        }
        v = node.right.unwrap();
      } else {
        v = node.left.unwrap();
      }
    }

    out.retain(|p| range.contains(p));
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::range::brute_force_range_query;

  #[test]
  fn matches_brute_force_on_random_sets() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    let mut rng = SmallRng::seed_from_u64(11);
    let points: Vec<Point> = (0..1000).map(|_| rng.gen::<Point>()).collect();
    let tree = RangeTree2D::new(&points);

    for _ in 0..50 {
      let x0 = rng.gen_range(-1e3..1e3);
      let x1 = rng.gen_range(-1e3..1e3);
      let y0 = rng.gen_range(-1e3..1e3);
      let y1 = rng.gen_range(-1e3..1e3);
      let range = Range2D {
        x_min: x0.min(x1),
        x_max: x0.max(x1),
        y_min: y0.min(y1),
        y_max: y0.max(y1),
      };
      let mut got = tree.range_query(&range);
      let mut want = brute_force_range_query(&points, &range);
      let key = |p: &Point| (OrderedFloat(p.x), OrderedFloat(p.y));
      got.sort_by_key(key);
      want.sort_by_key(key);
      assert_eq!(got.len(), want.len());
    }
  }

  #[test]
  fn single_point_matches() {
    let points = vec![Point::new(1.0, 2.0)];
    let tree = RangeTree2D::new(&points);
    let range = Range2D {
      x_min: 0.0,
      x_max: 5.0,
      y_min: 0.0,
      y_max: 5.0,
    };
    assert_eq!(tree.range_query(&range), vec![Point::new(1.0, 2.0)]);
  }
}
